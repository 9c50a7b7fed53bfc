use crate::color::Color;
use imglabel_domain::{BbF, Circle, PtF, ShapeI, TPtF};

/// Default placements start at this fraction of the canvas
pub const PLACEMENT_FRACTION: TPtF = 0.15;
/// Successive additions are shifted by this many pixels per counter step
pub const STAGGER_PX: TPtF = 3.0;
pub const BOX_SIZE_FRACTION: TPtF = 0.2;
pub const POINT_SIZE_FRACTION: TPtF = 0.01;
/// Resizing never shrinks a box below this extent
pub const MIN_EXTENT: TPtF = 1.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PrimitiveStyle {
    pub stroke_width: TPtF,
    /// stroke width does not scale with the object
    pub stroke_uniform: bool,
    pub has_rotating_point: bool,
}
impl Default for PrimitiveStyle {
    fn default() -> Self {
        Self {
            stroke_width: 1.0,
            stroke_uniform: true,
            has_rotating_point: false,
        }
    }
}

fn staggered_origin(shape: ShapeI, counter: usize) -> PtF {
    let offset = counter as TPtF * STAGGER_PX;
    PtF {
        x: TPtF::from(shape.w) * PLACEMENT_FRACTION + offset,
        y: TPtF::from(shape.h) * PLACEMENT_FRACTION + offset,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BoxPrimitive {
    pub left: TPtF,
    pub top: TPtF,
    pub width: TPtF,
    pub height: TPtF,
    pub scale_x: TPtF,
    pub scale_y: TPtF,
    pub stroke_color: Color,
    pub style: PrimitiveStyle,
}
impl BoxPrimitive {
    pub fn new_default(shape: ShapeI, counter: usize, stroke_color: Color) -> Self {
        let origin = staggered_origin(shape, counter);
        Self::from_bb(
            BbF {
                x: origin.x,
                y: origin.y,
                w: TPtF::from(shape.w) * BOX_SIZE_FRACTION,
                h: TPtF::from(shape.h) * BOX_SIZE_FRACTION,
            },
            stroke_color,
        )
    }
    pub fn from_bb(bb: BbF, stroke_color: Color) -> Self {
        Self {
            left: bb.x,
            top: bb.y,
            width: bb.w,
            height: bb.h,
            scale_x: 1.0,
            scale_y: 1.0,
            stroke_color,
            style: PrimitiveStyle::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PointPrimitive {
    pub left: TPtF,
    pub top: TPtF,
    pub radius: TPtF,
    pub scale_x: TPtF,
    pub scale_y: TPtF,
    pub fill_color: Color,
    pub stroke_color: Color,
    pub style: PrimitiveStyle,
}
impl PointPrimitive {
    /// The radius is the point size derived from the canvas width.
    pub fn default_radius(shape: ShapeI) -> TPtF {
        TPtF::from(shape.w) * POINT_SIZE_FRACTION
    }
    pub fn new_default(shape: ShapeI, counter: usize, color: Color) -> Self {
        let origin = staggered_origin(shape, counter);
        Self {
            left: origin.x,
            top: origin.y,
            radius: Self::default_radius(shape),
            scale_x: 1.0,
            scale_y: 1.0,
            fill_color: color,
            stroke_color: color,
            style: PrimitiveStyle::default(),
        }
    }
    pub fn centered(center: PtF, radius: TPtF, color: Color) -> Self {
        Self {
            left: center.x - radius,
            top: center.y - radius,
            radius,
            scale_x: 1.0,
            scale_y: 1.0,
            fill_color: color,
            stroke_color: color,
            style: PrimitiveStyle::default(),
        }
    }
    pub fn circle(&self) -> Circle {
        let bb = Primitive::point_bb(self);
        Circle {
            center: bb.center_f().into(),
            radius: self.radius * self.scale_x.min(self.scale_y),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Box(BoxPrimitive),
    Point(PointPrimitive),
}

impl Primitive {
    fn point_bb(p: &PointPrimitive) -> BbF {
        BbF {
            x: p.left,
            y: p.top,
            w: 2.0 * p.radius * p.scale_x,
            h: 2.0 * p.radius * p.scale_y,
        }
    }
    /// Axis aligned bounding box in surface coordinates with the scale applied
    pub fn bounding_rect(&self) -> BbF {
        match self {
            Self::Box(b) => BbF {
                x: b.left,
                y: b.top,
                w: b.width * b.scale_x,
                h: b.height * b.scale_y,
            },
            Self::Point(p) => Self::point_bb(p),
        }
    }
    pub fn center_point(&self) -> PtF {
        self.bounding_rect().center_f().into()
    }
    pub fn is_box(&self) -> bool {
        matches!(self, Self::Box(_))
    }
    pub fn is_point(&self) -> bool {
        matches!(self, Self::Point(_))
    }
    pub fn translate(&mut self, dx: TPtF, dy: TPtF) {
        let (left, top) = match self {
            Self::Box(b) => (&mut b.left, &mut b.top),
            Self::Point(p) => (&mut p.left, &mut p.top),
        };
        *left += dx;
        *top += dy;
    }
    /// Whether `p` lies on the primitive, `tolerance` widens the hit area.
    pub fn hit(&self, p: PtF, tolerance: TPtF) -> bool {
        match self {
            Self::Box(_) => self.bounding_rect().expand(tolerance).contains(p),
            Self::Point(point) => point.circle().contains(p, tolerance),
        }
    }
    /// Fits the primitive into `bb` by adapting position and scale, the unscaled extent is kept.
    /// Points are only moved, although scaled points are supported: `circle` and the reported
    /// center honor the scale of a point, e.g., of one scaled by a host.
    pub fn resize_to(&mut self, bb: BbF) {
        match self {
            Self::Box(b) => {
                b.left = bb.x;
                b.top = bb.y;
                if b.width > 0.0 {
                    b.scale_x = bb.w.max(MIN_EXTENT) / b.width;
                }
                if b.height > 0.0 {
                    b.scale_y = bb.h.max(MIN_EXTENT) / b.height;
                }
            }
            Self::Point(p) => {
                p.left = bb.x;
                p.top = bb.y;
            }
        }
    }
    pub fn stroke_color(&self) -> Color {
        match self {
            Self::Box(b) => b.stroke_color,
            Self::Point(p) => p.stroke_color,
        }
    }
}

#[cfg(test)]
fn shape_400_300() -> ShapeI {
    ShapeI::new(400, 300)
}

#[test]
fn test_default_box() {
    let b = BoxPrimitive::new_default(shape_400_300(), 0, Color::DEFAULT_BOX);
    let bb = Primitive::Box(b.clone()).bounding_rect();
    assert!(bb.all_corners_close(BbF::from_arr(&[60.0, 45.0, 80.0, 60.0])));
    assert_eq!(b.style, PrimitiveStyle::default());
    let b = BoxPrimitive::new_default(shape_400_300(), 50, Color::DEFAULT_BOX);
    assert!((b.left - 210.0).abs() < 1e-8);
    assert!((b.top - 195.0).abs() < 1e-8);
}

#[test]
fn test_default_point() {
    let p = PointPrimitive::new_default(shape_400_300(), 2, Color::DEFAULT_POINT);
    assert!((p.left - 66.0).abs() < 1e-8);
    assert!((p.top - 51.0).abs() < 1e-8);
    assert!((p.radius - 4.0).abs() < 1e-8);
    assert_eq!(p.fill_color, p.stroke_color);
    let prim = Primitive::Point(p);
    assert!(prim.center_point().is_close_to((70.0, 55.0).into()));
    assert!(prim.hit((70.0, 58.0).into(), 0.0));
    assert!(!prim.hit((70.0, 60.0).into(), 0.0));
}

#[test]
fn test_resize_and_move() {
    let mut prim = Primitive::Box(BoxPrimitive::from_bb(
        BbF::from_arr(&[10.0, 10.0, 20.0, 10.0]),
        Color::DEFAULT_BOX,
    ));
    prim.resize_to(BbF::from_arr(&[5.0, 5.0, 40.0, 5.0]));
    if let Primitive::Box(b) = &prim {
        assert!((b.scale_x - 2.0).abs() < 1e-8);
        assert!((b.scale_y - 0.5).abs() < 1e-8);
        // the unscaled extent is kept
        assert!((b.width - 20.0).abs() < 1e-8);
    }
    assert!(prim
        .bounding_rect()
        .all_corners_close(BbF::from_arr(&[5.0, 5.0, 40.0, 5.0])));
    prim.resize_to(BbF::from_arr(&[5.0, 5.0, 0.0, 0.0]));
    assert!(prim
        .bounding_rect()
        .all_corners_close(BbF::from_arr(&[5.0, 5.0, 1.0, 1.0])));
    prim.translate(1.0, -2.0);
    let bb = prim.bounding_rect();
    assert!(PtF { x: bb.x, y: bb.y }.is_close_to((6.0, 3.0).into()));
    assert!(prim.hit((6.5, 3.5).into(), 0.0));
    assert!(prim.hit((8.0, 3.5).into(), 1.0));
    assert!(!prim.hit((8.0, 3.5).into(), 0.5));
}

#[test]
fn test_centered_point() {
    let p = PointPrimitive::centered((100.0, 50.0).into(), 3.0, Color::DEFAULT_POINT);
    let prim = Primitive::Point(p);
    assert!(prim.center_point().is_close_to((100.0, 50.0).into()));
    let mut moved = prim.clone();
    moved.resize_to(BbF::from_arr(&[0.0, 0.0, 100.0, 100.0]));
    // points keep their size
    assert!(moved.center_point().is_close_to((3.0, 3.0).into()));

    let mut scaled = PointPrimitive::centered((100.0, 50.0).into(), 3.0, Color::DEFAULT_POINT);
    scaled.scale_x = 2.0;
    scaled.scale_y = 2.0;
    let circle = scaled.circle();
    assert!(circle.center.is_close_to((103.0, 53.0).into()));
    assert!((circle.radius - 6.0).abs() < 1e-8);
    assert!(Primitive::Point(scaled)
        .center_point()
        .is_close_to((103.0, 53.0).into()));
}
