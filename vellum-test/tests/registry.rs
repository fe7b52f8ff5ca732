use bumpalo::Bump;
use glam::Vec2;
use vellum::{
    ui::{Gui, Input, Inspector, RecordingBackend, Window, WindowFlags},
    GuiOptions,
};
use vellum_test::{init_logger, FlagCount, MockWidgets};

fn gui() -> Gui<RecordingBackend> {
    init_logger();
    let options = GuiOptions::default();
    Gui::new(RecordingBackend::new(&options), Bump::new(), options)
}

fn window(id: u32) -> Window {
    Window::new(
        &format!("Window {id}"),
        id,
        Vec2::splat(id as f32 * 10.0),
        Vec2::new(200.0, 150.0),
        Inspector::new(FlagCount::default()),
    )
}

#[test]
pub fn duplicate_ids_are_rejected() {
    let mut gui = gui();
    assert!(gui.register_window(window(1)));
    assert!(!gui.register_window(window(1)));
    assert_eq!(gui.windows().len(), 1);

    let taken = gui.windows_mut().take(1);
    assert_eq!(taken.map(|w| w.id()), Some(1));
    assert!(gui.windows().is_empty());
}

#[test]
pub fn closed_windows_are_dropped() {
    let mut gui = gui();
    for id in 1..=3 {
        gui.register_window(window(id));
    }
    gui.tick();

    gui.backend_mut().queue(Input::CloseWindow { id: 2 });
    assert!(gui.tick());

    let ids: Vec<_> = gui.windows().iter().map(Window::id).collect();
    assert_eq!(ids, [1, 3]);
    assert!(!gui.tick());
}

#[test]
pub fn windows_without_close_button_stay() {
    let mut gui = gui();
    gui.register_window(window(1).with_flags(WindowFlags::DEFAULT_SCROLL_NO_CLOSE));
    gui.tick();

    gui.backend_mut().queue(Input::CloseWindow { id: 1 });
    gui.tick();
    assert_eq!(gui.windows().len(), 1);
}

#[test]
pub fn collapsed_windows_are_hidden() {
    let mut gui = gui();
    gui.register_window(window(1));
    gui.tick();
    assert!(gui.windows().get(1).is_some_and(Window::is_visible));

    gui.backend_mut().queue(Input::CollapseWindow { id: 1 });
    assert!(gui.tick());
    assert!(gui.windows().get(1).is_some_and(|w| !w.is_visible()));
    assert_eq!(gui.backend().is_window_collapsed(1), Some(true));

    // Content of a collapsed window takes no input.
    gui.backend_mut().queue(Input::toggle("Flag"));
    gui.tick();
    let flag = gui
        .windows()
        .get(1)
        .and_then(|w| w.content::<Inspector<FlagCount>>())
        .map(|i| i.value.flag);
    assert_eq!(flag, Some(false));

    gui.backend_mut().queue(Input::ExpandWindow { id: 1 });
    assert!(gui.tick());
    assert!(gui.windows().get(1).is_some_and(Window::is_visible));
}

#[test]
pub fn focus_is_tracked() {
    let mut gui = gui();
    gui.register_window(window(1));
    gui.register_window(window(2));
    gui.tick();
    assert!(!gui.windows().any_focused());

    gui.backend_mut().queue(Input::FocusWindow { id: 2 });
    assert!(gui.tick());
    assert!(gui.windows().any_focused());
    assert!(gui.windows().get(2).is_some_and(Window::has_focus));
    assert!(gui.windows().get(1).is_some_and(|w| !w.has_focus()));

    gui.backend_mut().queue(Input::CloseWindow { id: 2 });
    gui.tick();
    assert!(!gui.windows().any_focused());
    assert_eq!(gui.backend().focused_window(), None);
}

#[test]
pub fn bounds_sync_back_clamped() {
    let mut gui = gui();
    gui.register_window(
        window(1)
            .with_min_size(Vec2::new(100.0, 100.0))
            .with_max_size(Vec2::new(400.0, 300.0)),
    );
    gui.tick();

    gui.backend_mut().queue(Input::MoveWindow {
        id: 1,
        pos: Vec2::new(50.0, 60.0),
    });
    gui.backend_mut().queue(Input::ResizeWindow {
        id: 1,
        size: Vec2::new(800.0, 20.0),
    });
    assert!(gui.tick());

    let clamped = (Vec2::new(50.0, 60.0), Vec2::new(400.0, 100.0));
    let bounds = gui.windows().get(1).map(|w| (w.pos(), w.size()));
    assert_eq!(bounds, Some(clamped));

    // The backend snaps to the clamped size on the next frame and keeps it.
    assert!(gui.tick());
    assert_eq!(gui.backend().window_bounds(1), Some(clamped));
    assert!(!gui.tick());
    assert_eq!(gui.backend().window_bounds(1), Some(clamped));
}

#[test]
pub fn static_windows_do_not_move() {
    let mut gui = gui();
    gui.register_window(window(1).with_flags(WindowFlags::STATIC));
    gui.tick();

    gui.backend_mut().queue(Input::MoveWindow {
        id: 1,
        pos: Vec2::new(500.0, 500.0),
    });
    assert!(!gui.tick());
    assert_eq!(gui.windows().get(1).map(Window::pos), Some(Vec2::splat(10.0)));
}

#[test]
pub fn every_window_is_opened_and_closed() {
    init_logger();
    let mut registry = vellum::ui::WindowRegistry::new();
    registry.add(window(1));
    registry.add(window(2));

    let mut widgets = MockWidgets::new();
    let arena = Bump::new();
    registry.render(&mut widgets, &arena, &GuiOptions::default());

    let windows: Vec<_> = widgets
        .calls
        .iter()
        .filter_map(|call| match call {
            vellum_test::Call::BeginWindow { id, .. } => Some(*id),
            _ => None,
        })
        .collect();
    assert_eq!(windows, [1, 2]);
    let ends = widgets
        .calls
        .iter()
        .filter(|call| **call == vellum_test::Call::EndWindow)
        .count();
    assert_eq!(ends, 2);
}
