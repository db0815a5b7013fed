use mousetrack::draw::color::{BLACK, OUTLINE_GREY};
use mousetrack::draw::{Color, Raster};
use mousetrack::input::MouseButton;
use mousetrack::layout::{BackgroundStyle, Monitor, VerticalAxis, background, compute_bounding_box};
use mousetrack::track::{LiveSettings, SessionOptions, Tracker};
use std::fs::File;
use std::sync::Arc;
use tempfile::TempDir;

const OPAQUE_WHITE: Color = Color::new(255, 255, 255, 255);

fn tracker(monitors: Vec<Monitor>, opacity: u8, width: u32) -> Tracker {
    Tracker::new(
        monitors,
        VerticalAxis::TopDown,
        Arc::new(LiveSettings::new(opacity, width)),
        SessionOptions::default(),
    )
}

fn snapshot(tracker: &Tracker) -> Raster {
    tracker.compositor().expect("session started").snapshot()
}

#[test]
fn strokes_and_markers_land_on_the_desktop_map() {
    let mut tracker = tracker(vec![Monitor::new(0, 0, 100, 100, true)], 100, 3);
    tracker.start().unwrap();

    tracker.on_move(10, 50);
    tracker.on_move(90, 50);
    assert!(tracker.on_click(20, 20, MouseButton::Left, true));
    assert!(!tracker.on_click(20, 20, MouseButton::Left, false));
    tracker.stop().unwrap();

    let raster = snapshot(&tracker);
    assert_eq!((raster.width(), raster.height()), (100, 100));
    assert_eq!(raster.pixel(0, 0), Some(OUTLINE_GREY));
    assert_eq!(raster.pixel(50, 80), Some(BLACK));
    assert_eq!(raster.pixel(50, 50), Some(OPAQUE_WHITE));
    // translucent green over black
    assert_eq!(raster.pixel(20, 20), Some(Color::new(0, 100, 0, 255)));
}

#[test]
fn secondary_monitor_left_of_primary_shifts_strokes() {
    let monitors = vec![
        Monitor::new(0, 0, 100, 100, true),
        Monitor::new(-50, 0, 50, 100, false),
    ];
    let mut tracker = tracker(monitors, 100, 3);
    tracker.start().unwrap();

    tracker.on_move(-40, 50);
    tracker.on_move(40, 50);
    tracker.stop().unwrap();

    let raster = snapshot(&tracker);
    assert_eq!((raster.width(), raster.height()), (150, 100));
    // pointer x = -30 is canvas column 20, on the secondary monitor
    assert_eq!(raster.pixel(20, 50), Some(OPAQUE_WHITE));
    assert_eq!(raster.pixel(80, 50), Some(OPAQUE_WHITE));
    assert_eq!(raster.pixel(120, 50), Some(BLACK));
}

#[test]
fn translucent_strokes_accumulate_where_paths_cross() {
    let mut tracker = tracker(vec![Monitor::new(0, 0, 64, 64, true)], 50, 4);
    tracker.start().unwrap();

    tracker.on_move(5, 32);
    tracker.on_move(60, 32);
    tracker.stop().unwrap();
    let once = snapshot(&tracker).pixel(32, 32).unwrap();

    tracker.start().unwrap();
    tracker.on_move(5, 32);
    tracker.on_move(60, 32);
    tracker.on_move(32, 5);
    tracker.on_move(32, 60);
    tracker.stop().unwrap();
    let twice = snapshot(&tracker).pixel(32, 32).unwrap();

    assert_eq!(once, Color::new(128, 128, 128, 255));
    assert!(twice.r > once.r, "{twice:?} should be brighter than {once:?}");
}

#[test]
fn saved_file_matches_the_canvas_and_cleans_it() {
    let out = TempDir::new().unwrap();
    let mut tracker = tracker(vec![Monitor::new(0, 0, 80, 40, true)], 100, 2);
    tracker.start().unwrap();
    tracker.on_move(5, 20);
    tracker.on_move(75, 20);
    tracker.stop().unwrap();

    let before = snapshot(&tracker);
    let path = tracker.save(out.path(), true, true).unwrap();
    assert!(path.starts_with(out.path()));

    let decoded = Raster::read_png(&mut File::open(&path).unwrap()).unwrap();
    assert_eq!(decoded, before);

    let after = snapshot(&tracker);
    assert_eq!(after.pixel(40, 20), Some(BLACK));
}

#[test]
fn disabled_channels_leave_no_trace() {
    let monitors = vec![Monitor::new(0, 0, 64, 64, true)];
    let mut tracker = tracker(monitors.clone(), 100, 3);
    tracker.settings().set_move_enabled(false);
    tracker
        .settings()
        .set_click_enabled(MouseButton::Right, false);
    tracker.start().unwrap();

    tracker.on_move(5, 32);
    tracker.on_move(60, 32);
    assert!(!tracker.on_click(32, 32, MouseButton::Right, true));
    tracker.stop().unwrap();

    let bounds = compute_bounding_box(&monitors).unwrap();
    let untouched = background(
        &monitors,
        &bounds,
        VerticalAxis::TopDown,
        &BackgroundStyle::default(),
    );
    assert_eq!(snapshot(&tracker), untouched);
}
