mod samples;
mod scene;
mod widgets;

pub use samples::*;
pub use scene::{ObjectWrite, RecordingSceneBackend};
pub use widgets::{Call, MockWidgets};

/// Routes `log` output through the test harness. Safe to call from every test.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
