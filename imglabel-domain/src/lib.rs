mod bb;
mod core;
pub mod result;
pub use bb::{BbF, BbI};
pub use core::{Circle, Point, PtF, PtI, ShapeF, ShapeI, TPtF};
pub use result::{to_lbl, LblError, LblResult};

/// Scale factor that maps `shape_from` onto `shape_to` per axis, e.g., from the on-screen rect of
/// the canvas to the canvas pixels.
pub fn axis_scales(shape_from: ShapeF, shape_to: ShapeF) -> (TPtF, TPtF) {
    let scale = |from: TPtF, to: TPtF| if from > 0.0 { to / from } else { 1.0 };
    (scale(shape_from.w, shape_to.w), scale(shape_from.h, shape_to.h))
}

/// Transforms a position relative to the top left of a displayed rect into canvas coordinates.
pub fn pos_to_canvas(pos: PtF, shape_displayed: ShapeF, shape_canvas: ShapeI) -> PtF {
    let (sx, sy) = axis_scales(shape_displayed, shape_canvas.into());
    PtF {
        x: pos.x * sx,
        y: pos.y * sy,
    }
}

/// Inverse of [`pos_to_canvas`](pos_to_canvas).
pub fn canvas_to_pos(p: PtF, shape_displayed: ShapeF, shape_canvas: ShapeI) -> PtF {
    let (sx, sy) = axis_scales(shape_canvas.into(), shape_displayed);
    PtF {
        x: p.x * sx,
        y: p.y * sy,
    }
}

#[test]
fn test_bb() {
    let bb = BbI {
        x: 10,
        y: 10,
        w: 10,
        h: 10,
    };
    assert!(!bb.contains((20u32, 20u32)));
    assert!(bb.contains((10u32, 10u32)));
    assert_eq!(bb.corner(0), PtI { x: 10, y: 10 });
    assert_eq!(bb.corner(1), PtI { x: 10, y: 19 });
    assert_eq!(bb.corner(2), PtI { x: 19, y: 19 });
    assert_eq!(bb.corner(3), PtI { x: 19, y: 10 });
    assert_eq!(bb.opposite_corner(0), PtI { x: 19, y: 19 });
    assert_eq!(bb.opposite_corner(1), PtI { x: 19, y: 10 });
    for (c, i) in bb.points_iter().zip(0..4) {
        assert_eq!(c, bb.corner(i));
    }
    let bb_f = BbF::from_arr(&[10.0, 10.0, 10.0, 10.0]);
    // continuous boxes reach up to x + w
    assert!(bb_f.contains((20.0, 20.0)));
    assert_eq!(bb_f.corner(2), PtF { x: 20.0, y: 20.0 });
    let (cx, cy) = bb_f.center_f();
    assert!(PtF { x: cx, y: cy }.is_close_to((15.0, 15.0).into()));
}

#[test]
fn test_pos_transform() {
    let shape_canvas = ShapeI::new(400, 300);
    let shape_displayed = ShapeF::new(200.0, 150.0);
    let p = pos_to_canvas((10.0, 20.0).into(), shape_displayed, shape_canvas);
    assert!(p.is_close_to((20.0, 40.0).into()));
    let back = canvas_to_pos(p, shape_displayed, shape_canvas);
    assert!(back.is_close_to((10.0, 20.0).into()));
    // degenerate display rects leave positions untouched
    let p = pos_to_canvas((3.0, 4.0).into(), ShapeF::new(0.0, 0.0), shape_canvas);
    assert!(p.is_close_to((3.0, 4.0).into()));
}

#[test]
fn test_serialize_bb() {
    let bb = BbF::from_arr(&[1.0, 2.0, 3.0, 4.0]);
    let s = serde_json::to_string(&bb).unwrap();
    assert_eq!(s, r#"{"x":1.0,"y":2.0,"w":3.0,"h":4.0}"#);
}
