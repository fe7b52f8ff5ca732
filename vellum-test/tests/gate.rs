use bumpalo::Bump;
use glam::{IVec2, UVec2, Vec2};
use vellum::{
    ui::{Gui, Input, Inspector, Monitor, RecordingBackend, Window},
    GuiOptions,
};
use vellum_test::{init_logger, FlagCount, RenderSettings};

fn gui() -> Gui<RecordingBackend> {
    init_logger();
    let options = GuiOptions {
        command_memory_hint: 64 * 1024,
        ..GuiOptions::default()
    };
    Gui::new(RecordingBackend::new(&options), Bump::new(), options)
}

fn flag_count_window(id: u32, value: FlagCount) -> Window {
    Window::new("Counters", id, Vec2::new(10.0, 10.0), Vec2::new(200.0, 100.0), Inspector::new(value))
}

fn value(gui: &Gui<RecordingBackend>, id: u32) -> Option<&FlagCount> {
    let window = gui.windows().get(id)?;
    Some(&window.content::<Inspector<FlagCount>>()?.value)
}

#[test]
pub fn first_tick_draws_second_does_not() {
    let mut gui = gui();
    assert!(gui.register_window(flag_count_window(1, FlagCount::default())));

    assert!(gui.tick());
    assert!(!gui.tick());
    assert!(!gui.tick());
}

#[test]
pub fn empty_gui_bakes_once() {
    let mut gui = gui();
    assert!(gui.tick());
    assert!(!gui.tick());
}

#[test]
pub fn edits_cause_exactly_one_redraw() {
    let mut gui = gui();
    gui.register_window(flag_count_window(1, FlagCount::default()));
    gui.tick();

    gui.backend_mut().queue(Input::toggle("Flag"));
    assert!(gui.tick());
    assert_eq!(value(&gui, 1).map(|v| v.flag), Some(true));
    assert!(!gui.tick());

    gui.backend_mut().queue(Input::set_text("Count", "12"));
    assert!(gui.tick());
    assert_eq!(value(&gui, 1).map(|v| v.count), Some(12));
    assert!(!gui.tick());
}

#[test]
pub fn program_changes_are_picked_up() {
    let mut gui = gui();
    gui.register_window(flag_count_window(1, FlagCount::default()));
    gui.tick();

    let inspector = gui
        .windows_mut()
        .get_mut(1)
        .and_then(|w| w.content_mut::<Inspector<FlagCount>>());
    if let Some(inspector) = inspector {
        inspector.value.count = 99;
    }

    assert!(gui.tick());
    assert!(!gui.tick());
}

#[test]
pub fn forced_redraws() {
    let mut gui = gui();
    gui.tick();

    gui.request_redraw();
    assert!(gui.tick());
    assert!(!gui.tick());

    gui.resize(UVec2::new(1280, 720));
    assert!(gui.tick());
    gui.resize(UVec2::new(1280, 720));
    assert!(!gui.tick());
    assert_eq!(gui.size(), UVec2::new(1280, 720));

    let monitor = Monitor {
        offset: IVec2::ZERO,
        size: UVec2::new(1920, 1080),
        scale: 1.0,
    };
    gui.set_monitors(&[monitor]);
    assert!(gui.tick());
    gui.set_monitors(&[monitor]);
    assert!(!gui.tick());
    assert_eq!(gui.monitors(), [monitor]);
}

#[test]
pub fn registering_changes_the_frame() {
    let mut gui = gui();
    gui.tick();

    gui.register_window(flag_count_window(1, FlagCount::default()));
    assert!(gui.tick());
    assert!(!gui.tick());

    assert!(gui.unregister_window(1));
    assert!(gui.tick());
    assert!(!gui.unregister_window(1));
    assert!(!gui.tick());
}

#[test]
pub fn collapsed_scope_is_remembered() {
    let mut gui = gui();
    gui.register_window(Window::new(
        "Settings",
        3,
        Vec2::ZERO,
        Vec2::new(300.0, 400.0),
        Inspector::new(RenderSettings::default()),
    ));
    gui.tick();

    gui.backend_mut().queue(Input::ToggleScope {
        label: "counters".into(),
    });
    assert!(gui.tick());

    // Fields of the collapsed scope no longer take input.
    gui.backend_mut().queue(Input::toggle("Flag"));
    assert!(!gui.tick());
    assert_eq!(gui.backend().pending(), 0);

    let settings = gui
        .windows()
        .get(3)
        .and_then(|w| w.content::<Inspector<RenderSettings>>())
        .map(|i| i.value.counters.flag);
    assert_eq!(settings, Some(false));
}

#[test]
pub fn read_only_inspector_ignores_input() {
    let mut gui = gui();
    gui.register_window(Window::new(
        "Read only",
        4,
        Vec2::ZERO,
        Vec2::splat(100.0),
        Inspector::read_only(FlagCount::default()),
    ));
    gui.tick();

    gui.backend_mut().queue(Input::toggle("Flag"));
    assert!(!gui.tick());
    let flag = gui
        .windows()
        .get(4)
        .and_then(|w| w.content::<Inspector<FlagCount>>())
        .map(|i| i.value.flag);
    assert_eq!(flag, Some(false));
}

#[test]
pub fn delta_is_measured_between_ticks() {
    let mut gui = gui();
    gui.tick();
    std::thread::sleep(std::time::Duration::from_millis(2));
    gui.tick();
    assert!(gui.delta() >= std::time::Duration::from_millis(2));
}
