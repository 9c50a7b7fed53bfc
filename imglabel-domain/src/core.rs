use crate::{lblerr, result::LblResult};
use image::GenericImageView;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Pixel boxes contain both their min and their max coordinate, continuous boxes do not.
pub trait CoordinateBox {
    fn size_addon() -> Self;
    fn is_close_to(&self, other: Self) -> bool;
}

impl CoordinateBox for TPtI {
    fn size_addon() -> Self {
        Self::one()
    }
    fn is_close_to(&self, other: Self) -> bool {
        *self == other
    }
}
impl CoordinateBox for TPtF {
    fn size_addon() -> Self {
        TPtF::zero()
    }
    fn is_close_to(&self, other: Self) -> bool {
        floats_close(*self, other)
    }
}

pub trait Calc:
    Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Sized
    + PartialOrd
    + From<u32>
    + Clone
    + Copy
{
    #[must_use]
    fn one() -> Self {
        Self::from(1)
    }
    #[must_use]
    fn zero() -> Self {
        Self::from(0)
    }
}
impl<T> Calc for T where
    T: Add<Output = Self>
        + Sub<Output = Self>
        + Mul<Output = Self>
        + Div<Output = Self>
        + Sized
        + PartialOrd
        + From<u32>
        + Clone
        + Copy
{
}

fn floats_close(x: TPtF, y: TPtF) -> bool {
    (x - y).abs() < 1e-10
}

pub type ShapeI = Shape<u32>;
pub type ShapeF = Shape<f64>;

impl From<ShapeI> for ShapeF {
    fn from(value: ShapeI) -> Self {
        Self {
            w: f64::from(value.w),
            h: f64::from(value.h),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Shape<T>
where
    T: Calc,
{
    pub w: T,
    pub h: T,
}
impl<T> Shape<T>
where
    T: Calc,
{
    pub fn new(w: T, h: T) -> Self {
        Self { w, h }
    }
}

impl ShapeI {
    pub fn from_im<I>(im: &I) -> Self
    where
        I: GenericImageView,
    {
        Self {
            w: im.width(),
            h: im.height(),
        }
    }
    /// Canvases need a positive extent in both directions.
    pub fn new_checked(w: u32, h: u32) -> LblResult<Self> {
        if w == 0 || h == 0 {
            Err(lblerr!("canvas dimensions need to be positive, got {}x{}", w, h))
        } else {
            Ok(Self { w, h })
        }
    }
    /// Number of bytes of an RGBA buffer covering this shape
    pub fn n_rgba_bytes(&self) -> usize {
        self.w as usize * self.h as usize * 4
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}

impl<T> Point<T>
where
    T: Calc,
{
    pub fn len_square(&self) -> T {
        self.x * self.x + self.y * self.y
    }
    pub fn dist_square(&self, other: &Self) -> T {
        <(T, T) as Into<Point<T>>>::into((
            // make this work also for unsigned types
            unsigned_dist(self.x, other.x),
            unsigned_dist(self.y, other.y),
        ))
        .len_square()
    }
    pub fn is_close_to(&self, other: Self) -> bool
    where
        T: CoordinateBox,
    {
        self.x.is_close_to(other.x) && self.y.is_close_to(other.y)
    }
}

fn unsigned_dist<T>(x1: T, x2: T) -> T
where
    T: Sub<Output = T> + PartialOrd,
{
    if x1 > x2 {
        x1 - x2
    } else {
        x2 - x1
    }
}

impl<T> From<(T, T)> for Point<T>
where
    T: Calc,
{
    fn from(value: (T, T)) -> Self {
        Self {
            x: value.0,
            y: value.1,
        }
    }
}

pub type TPtF = f64;
pub type TPtI = u32;
pub type PtF = Point<TPtF>;
pub type PtI = Point<TPtI>;

impl PtF {
    #[must_use]
    pub fn round_signed(&self) -> Point<i32> {
        Point {
            x: self.x.round() as i32,
            y: self.y.round() as i32,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct Circle {
    pub center: PtF,
    pub radius: TPtF,
}
impl Circle {
    /// `tolerance` widens the circle, tiny circles are hard to hit otherwise.
    pub fn contains(&self, p: PtF, tolerance: TPtF) -> bool {
        let r = self.radius + tolerance;
        self.center.dist_square(&p) <= r * r
    }
}

#[test]
fn test_point_ops() {
    let p = PtF { x: 2.0, y: 4.0 };
    let q = PtF { x: 1.0, y: 1.0 };
    assert!(p.dist_square(&q).is_close_to(10.0));
    let pi = PtI { x: 1, y: 5 };
    assert_eq!(pi.dist_square(&PtI { x: 4, y: 1 }), 25);
    assert_eq!(PtF { x: 1.6, y: -0.6 }.round_signed(), Point { x: 2, y: -1 });
}

#[test]
fn test_shape() {
    assert!(ShapeI::new_checked(0, 3).is_err());
    let shape = ShapeI::new_checked(4, 3).unwrap();
    assert_eq!(shape.n_rgba_bytes(), 48);
    let shape_f: ShapeF = shape.into();
    assert_eq!(shape_f, ShapeF::new(4.0, 3.0));
}

#[test]
fn test_circle() {
    let c = Circle {
        center: (10.0, 10.0).into(),
        radius: 2.0,
    };
    assert!(c.contains((11.0, 11.0).into(), 0.0));
    assert!(!c.contains((13.0, 10.0).into(), 0.0));
    assert!(c.contains((13.0, 10.0).into(), 1.5));
}
