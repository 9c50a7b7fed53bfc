use imglib::{
    test_helpers::{make_args, make_pixels, mount_queued},
    AnnotationCanvas, CanvasArgs, ColorSchemeSource, ColorSchemeWatcher, DisplayMode, Event,
    Events, GeometryReport, KeyCode, PointGeometry, QueuedHost, RectGeometry, ShapeI,
    CONTROLS_HEIGHT,
};

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-8, "{a} != {b}");
}

fn assert_rect(r: &RectGeometry, expected: [f64; 4]) {
    assert_close(r.left, expected[0]);
    assert_close(r.top, expected[1]);
    assert_close(r.width, expected[2]);
    assert_close(r.height, expected[3]);
}

fn drag(from: (f64, f64), to: (f64, f64)) -> [Events; 3] {
    [
        Events::default()
            .events(vec![Event::Pressed(KeyCode::MouseLeft)])
            .mousepos_canvas(Some(from.into())),
        Events::default()
            .events(vec![Event::Held(KeyCode::MouseLeft)])
            .mousepos_canvas(Some(to.into())),
        Events::default()
            .events(vec![Event::Released(KeyCode::MouseLeft)])
            .mousepos_canvas(Some(to.into())),
    ]
}

#[test]
fn test_box_and_point_on_400_300() {
    let (mut canvas, _watcher) = mount_queued(400, 300);
    canvas.add_box();
    let report = canvas.host().last_report().unwrap().clone();
    assert_eq!(report.rects.len(), 1);
    assert_rect(&report.rects[0], [60.0, 45.0, 80.0, 60.0]);
    assert!(report.points.is_empty());

    canvas.add_point();
    let report = canvas.host().last_report().unwrap().clone();
    assert_eq!(report.rects.len(), 1);
    assert_eq!(report.points.len(), 1);
    // the first point has radius 4 and its bounding box starts at 60, 45
    assert_close(report.points[0].x, 64.0);
    assert_close(report.points[0].y, 49.0);

    canvas.add_box();
    let report = canvas.host().last_report().unwrap();
    assert_rect(&report.rects[1], [63.0, 48.0, 80.0, 60.0]);
    assert_eq!(canvas.host().reports().len(), 3);
}

#[test]
fn test_counter_wraps_after_51_boxes() {
    let (mut canvas, _watcher) = mount_queued(400, 300);
    for _ in 0..52 {
        canvas.add_box();
    }
    let report = canvas.report();
    assert_eq!(report.rects.len(), 52);
    assert_rect(&report.rects[50], [210.0, 195.0, 80.0, 60.0]);
    // the 52nd box uses the wrapped counter
    assert_rect(&report.rects[51], [60.0, 45.0, 80.0, 60.0]);
    assert_eq!(canvas.box_counter().current(), 1);
    assert_eq!(canvas.point_counter().current(), 0);
}

#[test]
fn test_clear_all() {
    let (mut canvas, _watcher) = mount_queued(400, 300);
    canvas.add_box();
    canvas.add_box();
    canvas.add_point();
    canvas.select(2);
    canvas.clear_all();
    assert_eq!(canvas.host().last_report(), Some(&GeometryReport::default()));
    assert_eq!(canvas.selected(), None);
    assert_eq!(canvas.box_counter().current(), 0);
    assert_eq!(canvas.point_counter().current(), 0);
    canvas.add_box();
    assert_rect(
        &canvas.host().last_report().unwrap().rects[0],
        [60.0, 45.0, 80.0, 60.0],
    );
}

#[test]
fn test_remove_without_selection() {
    let (mut canvas, _watcher) = mount_queued(400, 300);
    canvas.add_box();
    canvas.add_point();
    let before = canvas.report();
    canvas.remove_selected();
    assert_eq!(canvas.host().last_report(), Some(&before));
    assert_eq!(canvas.host().reports().len(), 3);
}

#[test]
fn test_report_is_idempotent() {
    let (mut canvas, _watcher) = mount_queued(400, 300);
    canvas.add_box();
    canvas.add_point();
    let n_reports = canvas.host().reports().len();
    assert_eq!(canvas.report(), canvas.report());
    assert_eq!(canvas.host().reports().len(), n_reports);
    assert_eq!(canvas.report(), *canvas.host().last_report().unwrap());
}

#[test]
fn test_background_is_exact_copy() {
    let (canvas, _watcher) = mount_queued(7, 5);
    let expected = make_pixels(ShapeI::new(7, 5));
    assert_eq!(canvas.background().unwrap().as_raw(), &expected);
    assert_eq!(canvas.host().frame_heights(), &[5.0 + CONTROLS_HEIGHT]);
}

#[test]
fn test_empty_buffer_falls_back() {
    let watcher = ColorSchemeWatcher::default();
    let args = CanvasArgs::new(ShapeI::new(8, 4), vec![], "red", "blue");
    let mut canvas = AnnotationCanvas::mount(args, QueuedHost::default(), &watcher);
    let background = canvas.background().unwrap();
    assert_eq!(background.dimensions(), (8, 4));
    assert!(background.pixels().all(|p| p.0 == [0, 0, 0, 0]));
    canvas.add_box();
    assert_eq!(canvas.report().rects.len(), 1);
}

#[test]
fn test_reinit_on_image_change() {
    let (mut canvas, _watcher) = mount_queued(400, 300);
    canvas.add_box();
    canvas.add_point();

    // colors alone keep the surface
    let mut args = make_args(400, 300);
    args.box_color = "green".to_string();
    canvas.set_args(args);
    assert_eq!(canvas.report().rects.len(), 1);
    assert_eq!(canvas.host().frame_heights().len(), 1);

    canvas.set_args(make_args(200, 100));
    assert!(canvas.report().is_empty());
    assert_eq!(canvas.surface().unwrap().shape(), ShapeI::new(200, 100));
    assert_eq!(
        canvas.host().frame_heights(),
        &[300.0 + CONTROLS_HEIGHT, 100.0 + CONTROLS_HEIGHT]
    );

    // same dimensions, different pixels
    let mut args = make_args(200, 100);
    args.image_data[0] = args.image_data[0].wrapping_add(1);
    canvas.add_box();
    canvas.set_args(args);
    assert!(canvas.report().is_empty());
    assert_eq!(canvas.host().frame_heights().len(), 3);
}

#[test]
fn test_prior_geometry_is_restored() {
    let watcher = ColorSchemeWatcher::default();
    let rects = vec![RectGeometry {
        left: 10.0,
        top: 20.0,
        width: 30.0,
        height: 40.0,
    }];
    let points = vec![PointGeometry { x: 50.0, y: 60.0 }];
    let args = make_args(400, 300).with_prior_geometry(rects.clone(), points.clone());
    let canvas = AnnotationCanvas::mount(args, QueuedHost::default(), &watcher);
    let report = canvas.report();
    assert_eq!(report.rects, rects);
    assert_eq!(report.points, points);
}

#[test]
fn test_prior_geometry_is_restored_on_reinit() {
    let (mut canvas, _watcher) = mount_queued(400, 300);
    canvas.add_box();
    let rects = vec![RectGeometry::from((10.0, 20.0, 30.0, 40.0))];
    let points = vec![PointGeometry::from((50.0, 60.0))];
    // same image, the prior geometry only applies to fresh surfaces
    canvas.set_args(make_args(400, 300).with_prior_geometry(rects.clone(), points.clone()));
    assert_eq!(canvas.report().rects.len(), 1);
    assert!(canvas.report().points.is_empty());

    canvas.set_args(make_args(200, 100).with_prior_geometry(rects.clone(), points.clone()));
    let report = canvas.report();
    assert_eq!(report.rects, rects);
    assert_eq!(report.points, points);
}

#[test]
fn test_drag_reports_once() {
    let (mut canvas, _watcher) = mount_queued(400, 300);
    canvas.add_box();
    let n_reports = canvas.host().reports().len();
    for events in drag((70.0, 50.0), (80.0, 60.0)) {
        canvas.handle_events(&events);
    }
    assert_eq!(canvas.host().reports().len(), n_reports + 1);
    assert_rect(
        &canvas.host().last_report().unwrap().rects[0],
        [70.0, 55.0, 80.0, 60.0],
    );
    assert_eq!(canvas.selected(), Some(0));

    // clicking does not modify anything
    let click = Events::default()
        .events(vec![
            Event::Pressed(KeyCode::MouseLeft),
            Event::Released(KeyCode::MouseLeft),
        ])
        .mousepos_canvas(Some((100.0, 80.0).into()));
    assert!(!canvas.handle_events(&click));
    assert_eq!(canvas.host().reports().len(), n_reports + 1);

    // clicking into empty space deselects
    let click = Events::default()
        .events(vec![
            Event::Pressed(KeyCode::MouseLeft),
            Event::Released(KeyCode::MouseLeft),
        ])
        .mousepos_canvas(Some((390.0, 290.0).into()));
    canvas.handle_events(&click);
    assert_eq!(canvas.selected(), None);
}

#[test]
fn test_press_starts_at_press_position() {
    let (mut canvas, _watcher) = mount_queued(400, 300);
    canvas.add_box();
    canvas.add_point();
    // the press arrives late, 7 pixels to the right of the point centered at 64, 49
    let late_press = Events::default()
        .events(vec![
            Event::Pressed(KeyCode::MouseLeft),
            Event::Held(KeyCode::MouseLeft),
        ])
        .mousepos_canvas(Some((71.0, 49.0).into()))
        .presspos_canvas(Some((64.0, 49.0).into()));
    canvas.handle_events(&late_press);
    assert_eq!(canvas.selected(), Some(1));
    let release = Events::default()
        .events(vec![Event::Released(KeyCode::MouseLeft)])
        .mousepos_canvas(Some((84.0, 49.0).into()));
    assert!(canvas.handle_events(&release));
    let report = canvas.host().last_report().unwrap();
    assert_close(report.points[0].x, 84.0);
    assert_rect(&report.rects[0], [60.0, 45.0, 80.0, 60.0]);
}

#[test]
fn test_resize_reports_scaled_rect() {
    let (mut canvas, _watcher) = mount_queued(400, 300);
    canvas.add_box();
    canvas.select(0);
    // bottom right corner of the box at 60, 45 with extent 80x60
    for events in drag((140.0, 105.0), (180.0, 135.0)) {
        canvas.handle_events(&events);
    }
    let report = canvas.host().last_report().unwrap();
    assert_rect(&report.rects[0], [60.0, 45.0, 120.0, 90.0]);
}

#[test]
fn test_select_at() {
    let (mut canvas, _watcher) = mount_queued(400, 300);
    canvas.add_box();
    canvas.add_point();
    assert_eq!(canvas.select_at((64.0, 49.0).into()), Some(1));
    assert_eq!(canvas.select_at((100.0, 80.0).into()), Some(0));
    assert_eq!(canvas.select_at((0.0, 0.0).into()), None);
    canvas.select_at((64.0, 49.0).into());
    canvas.remove_selected();
    let report = canvas.host().last_report().unwrap();
    assert!(report.points.is_empty());
    assert_eq!(report.rects.len(), 1);
}

#[test]
fn test_display_mode_follows_preference() {
    let watcher = ColorSchemeWatcher::new(DisplayMode::Dark);
    let mut canvas = AnnotationCanvas::mount(make_args(40, 30), QueuedHost::default(), &watcher);
    assert_eq!(canvas.display_mode(), DisplayMode::Dark);
    assert_eq!(watcher.n_listeners(), 1);
    canvas.add_box();
    let before = canvas.report();

    watcher.set(DisplayMode::Light);
    assert!(canvas.poll_display_mode());
    assert_eq!(canvas.display_mode(), DisplayMode::Light);
    assert!(!canvas.poll_display_mode());
    // styling has no effect on geometry
    assert_eq!(canvas.report(), before);
    assert_eq!(canvas.host().reports().len(), 1);

    drop(canvas);
    assert_eq!(watcher.n_listeners(), 0);
    watcher.set(DisplayMode::Dark);
    assert_eq!(watcher.current(), DisplayMode::Dark);
}

#[test]
fn test_report_json_to_host() {
    let (mut canvas, _watcher) = mount_queued(400, 300);
    canvas.add_box();
    let s = serde_json::to_string(canvas.host().last_report().unwrap()).unwrap();
    assert_eq!(
        s,
        r#"{"rects":[{"left":60.0,"top":45.0,"width":80.0,"height":60.0}],"points":[]}"#
    );
}
