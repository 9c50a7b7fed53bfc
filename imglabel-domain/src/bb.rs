use serde::{Deserialize, Serialize};

use crate::core::{Calc, CoordinateBox, Point, PtF, TPtF, TPtI};

pub type BbI = BB<TPtI>;
pub type BbF = BB<TPtF>;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct BB<T> {
    pub x: T,
    pub y: T,
    pub w: T,
    pub h: T,
}

impl<T> BB<T>
where
    T: Calc + CoordinateBox,
{
    /// `[x, y, w, h]`
    pub fn from_arr(a: &[T; 4]) -> Self {
        BB {
            x: a[0],
            y: a[1],
            w: a[2],
            h: a[3],
        }
    }

    pub fn y_max(&self) -> T {
        // y_max is still part of the box, hence -1 for pixel boxes
        self.y + self.h - T::size_addon()
    }

    pub fn x_max(&self) -> T {
        // x_max is still part of the box, hence -1 for pixel boxes
        self.x + self.w - T::size_addon()
    }

    /// Iteration order of corners
    /// 0   3
    /// v   ^
    /// 1 > 2
    #[allow(clippy::needless_lifetimes)]
    pub fn points_iter<'a>(&'a self) -> impl Iterator<Item = Point<T>> + 'a + Clone {
        (0..4).map(|idx| self.corner(idx))
    }

    pub fn corner(&self, idx: usize) -> Point<T> {
        let (x, y, w, h) = (self.x, self.y, self.w, self.h);
        match idx {
            0 => Point { x, y },
            1 => Point {
                x,
                y: y + h - T::size_addon(),
            },
            2 => (x + w - T::size_addon(), y + h - T::size_addon()).into(),
            3 => (x + w - T::size_addon(), y).into(),
            _ => panic!("bounding boxes only have 4, {idx} is out of bounds"),
        }
    }
    pub fn opposite_corner(&self, idx: usize) -> Point<T> {
        self.corner((idx + 2) % 4)
    }

    pub fn center_f(&self) -> (f64, f64)
    where
        T: Into<f64>,
    {
        (
            self.w.into() * 0.5 + self.x.into(),
            self.h.into() * 0.5 + self.y.into(),
        )
    }

    pub fn covers_y(&self, y: T) -> bool {
        self.y_max() >= y && self.y <= y
    }
    pub fn covers_x(&self, x: T) -> bool {
        self.x_max() >= x && self.x <= x
    }

    pub fn contains<P>(&self, p: P) -> bool
    where
        P: Into<Point<T>>,
    {
        let p = p.into();
        self.covers_x(p.x) && self.covers_y(p.y)
    }
}

impl BbF {
    /// Box spanned by two opposite corners given in any order
    pub fn from_points(p1: PtF, p2: PtF) -> Self {
        let (x_min, x_max) = (p1.x.min(p2.x), p1.x.max(p2.x));
        let (y_min, y_max) = (p1.y.min(p2.y), p1.y.max(p2.y));
        Self {
            x: x_min,
            y: y_min,
            w: x_max - x_min,
            h: y_max - y_min,
        }
    }

    /// Widened by `margin` on each side
    pub fn expand(&self, margin: TPtF) -> Self {
        Self {
            x: self.x - margin,
            y: self.y - margin,
            w: self.w + 2.0 * margin,
            h: self.h + 2.0 * margin,
        }
    }

    /// Index of the corner closest to `p` and its distance
    pub fn closest_corner(&self, p: PtF) -> (usize, TPtF) {
        let (idx, dist_square) = self
            .points_iter()
            .map(|c| c.dist_square(&p))
            .enumerate()
            .min_by(|(_, d1), (_, d2)| d1.total_cmp(d2))
            .unwrap_or((0, TPtF::MAX));
        (idx, dist_square.sqrt())
    }

    /// Box with corner `idx` moved to `to` while the opposite corner stays where it is.
    pub fn drag_corner(&self, idx: usize, to: PtF) -> Self {
        Self::from_points(self.opposite_corner(idx), to)
    }

    pub fn all_corners_close(&self, other: BbF) -> bool {
        fn close_floats(a: f64, b: f64) -> bool {
            (a - b).abs() < 1e-8
        }
        close_floats(self.x, other.x)
            && close_floats(self.y, other.y)
            && close_floats(self.w, other.w)
            && close_floats(self.h, other.h)
    }
}

impl From<BbF> for BbI {
    fn from(box_f: BbF) -> Self {
        let x = box_f.x.max(0.0).round() as u32;
        let y = box_f.y.max(0.0).round() as u32;
        let x_max = (box_f.x + box_f.w).max(0.0).round() as u32;
        let y_max = (box_f.y + box_f.h).max(0.0).round() as u32;
        BbI {
            x,
            y,
            w: x_max.saturating_sub(x),
            h: y_max.saturating_sub(y),
        }
    }
}

#[test]
fn test_closest_corner() {
    let bb = BbF::from_arr(&[10.0, 10.0, 20.0, 10.0]);
    let (idx, dist) = bb.closest_corner((31.0, 21.0).into());
    assert_eq!(idx, 2);
    assert!((dist - 2f64.sqrt()).abs() < 1e-8);
    let (idx, dist) = bb.closest_corner((10.0, 10.0).into());
    assert_eq!(idx, 0);
    assert!(dist.abs() < 1e-8);
}

#[test]
fn test_drag_corner() {
    let bb = BbF::from_arr(&[10.0, 10.0, 20.0, 10.0]);
    // drag the bottom right corner outwards
    let dragged = bb.drag_corner(2, (40.0, 30.0).into());
    assert!(dragged.all_corners_close(BbF::from_arr(&[10.0, 10.0, 30.0, 20.0])));
    // dragging beyond the opposite corner flips the box
    let flipped = bb.drag_corner(2, (0.0, 0.0).into());
    assert!(flipped.all_corners_close(BbF::from_arr(&[0.0, 0.0, 10.0, 10.0])));
}

#[test]
fn test_expand() {
    let bb = BbF::from_arr(&[10.0, 10.0, 20.0, 10.0]);
    assert!(!bb.contains((9.0, 10.0)));
    let wide = bb.expand(1.5);
    assert!(wide.all_corners_close(BbF::from_arr(&[8.5, 8.5, 23.0, 13.0])));
    assert!(wide.contains((9.0, 10.0)));
}

#[test]
fn test_float_to_int() {
    let bb_f = BbF::from_arr(&[1.0, 2.0, 5.0, 6.0]);
    assert_eq!(BbI::from(bb_f), BbI::from_arr(&[1, 2, 5, 6]));
    let bb_f = BbF::from_arr(&[-3.0, 2.4, 5.0, 6.0]);
    assert_eq!(BbI::from(bb_f), BbI::from_arr(&[0, 2, 2, 6]));
}
