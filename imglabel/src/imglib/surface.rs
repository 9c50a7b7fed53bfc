use crate::primitive::Primitive;
use image::RgbaImage;
use imglabel_domain::{PtF, ShapeI, TPtF};
use tracing::debug;

const CORNER_TOL_DENOMINATOR: TPtF = 50.0;
const MIN_CORNER_TOL: TPtF = 4.0;
/// Points are tiny, hence clicks close to them still hit.
const POINT_HIT_TOL: TPtF = 2.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
enum Manipulation {
    #[default]
    Idle,
    Move {
        idx: usize,
        prev: PtF,
        changed: bool,
    },
    Resize {
        idx: usize,
        corner: usize,
        changed: bool,
    },
}

/// Drawing area holding the primitives on top of the background image. Identity of a primitive
/// is its position in the object list.
#[derive(Clone, Debug)]
pub struct Surface {
    shape: ShapeI,
    background: RgbaImage,
    objects: Vec<Primitive>,
    selected: Option<usize>,
    manipulation: Manipulation,
}

impl Surface {
    pub fn new(shape: ShapeI, background: RgbaImage) -> Self {
        Self {
            shape,
            background,
            objects: vec![],
            selected: None,
            manipulation: Manipulation::Idle,
        }
    }
    pub fn shape(&self) -> ShapeI {
        self.shape
    }
    pub fn background(&self) -> &RgbaImage {
        &self.background
    }
    pub fn objects(&self) -> &[Primitive] {
        &self.objects
    }
    pub fn len(&self) -> usize {
        self.objects.len()
    }
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
    pub fn add(&mut self, primitive: Primitive) -> usize {
        self.objects.push(primitive);
        self.objects.len() - 1
    }
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }
    pub fn selected_object(&self) -> Option<&Primitive> {
        self.selected.and_then(|idx| self.objects.get(idx))
    }
    /// Out of range indices deselect.
    pub fn select(&mut self, idx: usize) {
        self.selected = (idx < self.objects.len()).then_some(idx);
    }
    pub fn deselect(&mut self) {
        self.selected = None;
    }

    pub fn remove(&mut self, idx: usize) -> Option<Primitive> {
        if idx >= self.objects.len() {
            return None;
        }
        self.manipulation = Manipulation::Idle;
        self.selected = match self.selected {
            Some(sel) if sel == idx => None,
            Some(sel) if sel > idx => Some(sel - 1),
            sel => sel,
        };
        Some(self.objects.remove(idx))
    }
    /// No selection is not an error, nothing happens in this case.
    pub fn remove_selected(&mut self) -> Option<Primitive> {
        let removed = self.selected.and_then(|idx| self.remove(idx));
        if removed.is_none() {
            debug!("nothing selected to remove");
        }
        removed
    }
    pub fn clear(&mut self) {
        self.objects.clear();
        self.selected = None;
        self.manipulation = Manipulation::Idle;
    }

    pub fn corner_tolerance(&self) -> TPtF {
        (TPtF::from(self.shape.w.min(self.shape.h)) / CORNER_TOL_DENOMINATOR).max(MIN_CORNER_TOL)
    }

    /// Topmost primitive at `p`, i.e., the last one added wins.
    pub fn find_target(&self, p: PtF) -> Option<usize> {
        self.objects
            .iter()
            .enumerate()
            .rev()
            .find(|(_, prim)| {
                let tol = if prim.is_point() { POINT_HIT_TOL } else { 0.0 };
                prim.hit(p, tol)
            })
            .map(|(idx, _)| idx)
    }

    fn grabbed_corner(&self, idx: usize, p: PtF) -> Option<usize> {
        let prim = self.objects.get(idx)?;
        if !prim.is_box() {
            return None;
        }
        let (corner, dist) = prim.bounding_rect().closest_corner(p);
        (dist < self.corner_tolerance()).then_some(corner)
    }

    /// Selects the primitive under the pointer and starts moving or resizing it. Corners of the
    /// already selected box take precedence over other primitives.
    pub fn pointer_pressed(&mut self, p: PtF) {
        let corner = self.selected.and_then(|idx| self.grabbed_corner(idx, p).map(|c| (idx, c)));
        self.manipulation = if let Some((idx, corner)) = corner {
            Manipulation::Resize {
                idx,
                corner,
                changed: false,
            }
        } else if let Some(idx) = self.find_target(p) {
            self.selected = Some(idx);
            Manipulation::Move {
                idx,
                prev: p,
                changed: false,
            }
        } else {
            self.selected = None;
            Manipulation::Idle
        };
    }

    /// Returns whether the geometry has changed.
    pub fn pointer_moved(&mut self, p: PtF) -> bool {
        match &mut self.manipulation {
            Manipulation::Idle => false,
            Manipulation::Move { idx, prev, changed } => {
                let (dx, dy) = (p.x - prev.x, p.y - prev.y);
                if dx == 0.0 && dy == 0.0 {
                    return false;
                }
                if let Some(prim) = self.objects.get_mut(*idx) {
                    prim.translate(dx, dy);
                    *prev = p;
                    *changed = true;
                    true
                } else {
                    false
                }
            }
            Manipulation::Resize {
                idx,
                corner,
                changed,
            } => {
                if let Some(prim) = self.objects.get_mut(*idx) {
                    let before = prim.bounding_rect();
                    let target = before.drag_corner(*corner, p);
                    prim.resize_to(target);
                    let after = prim.bounding_rect();
                    // the dragged corner can pass the opposite one and changes its index then
                    let (new_corner, _) = after.closest_corner(p);
                    *corner = new_corner;
                    let has_changed = !after.all_corners_close(before);
                    *changed |= has_changed;
                    has_changed
                } else {
                    false
                }
            }
        }
    }

    /// Ends a manipulation. Returns `true` if an object has been modified, which is the surface's
    /// native "object modified" notification.
    pub fn pointer_released(&mut self, p: PtF) -> bool {
        self.pointer_moved(p);
        let modified = match self.manipulation {
            Manipulation::Idle => false,
            Manipulation::Move { changed, .. } | Manipulation::Resize { changed, .. } => changed,
        };
        self.manipulation = Manipulation::Idle;
        if modified {
            debug!("object {:?} modified", self.selected);
        }
        modified
    }
    pub fn is_manipulating(&self) -> bool {
        self.manipulation != Manipulation::Idle
    }
}

#[cfg(test)]
use {
    crate::{
        color::Color,
        primitive::{BoxPrimitive, PointPrimitive},
    },
    imglabel_domain::BbF,
};

#[cfg(test)]
fn make_surface() -> Surface {
    let shape = ShapeI::new(400, 300);
    let mut surface = Surface::new(shape, RgbaImage::new(shape.w, shape.h));
    surface.add(Primitive::Box(BoxPrimitive::from_bb(
        BbF::from_arr(&[10.0, 10.0, 100.0, 50.0]),
        Color::DEFAULT_BOX,
    )));
    surface.add(Primitive::Point(PointPrimitive::centered(
        (50.0, 30.0).into(),
        2.0,
        Color::DEFAULT_POINT,
    )));
    surface
}

#[test]
fn test_select_topmost() {
    let mut surface = make_surface();
    assert_eq!(surface.find_target((50.0, 30.0).into()), Some(1));
    assert_eq!(surface.find_target((20.0, 20.0).into()), Some(0));
    assert_eq!(surface.find_target((200.0, 200.0).into()), None);
    surface.pointer_pressed((20.0, 20.0).into());
    assert_eq!(surface.selected(), Some(0));
    assert!(!surface.pointer_released((20.0, 20.0).into()));
    surface.pointer_pressed((200.0, 200.0).into());
    assert_eq!(surface.selected(), None);
    assert!(!surface.is_manipulating());
}

#[test]
fn test_remove() {
    let mut surface = make_surface();
    assert!(surface.remove_selected().is_none());
    assert_eq!(surface.len(), 2);
    surface.select(1);
    surface.remove(0);
    // selection follows its object
    assert_eq!(surface.selected(), Some(0));
    assert!(surface.selected_object().unwrap().is_point());
    assert!(surface.remove_selected().unwrap().is_point());
    assert_eq!(surface.selected(), None);
    assert_eq!(surface.len(), 0);
    surface.select(3);
    assert_eq!(surface.selected(), None);
}

#[test]
fn test_move() {
    let mut surface = make_surface();
    surface.pointer_pressed((20.0, 20.0).into());
    assert!(surface.pointer_moved((25.0, 22.0).into()));
    assert!(!surface.pointer_moved((25.0, 22.0).into()));
    assert!(surface.pointer_released((30.0, 24.0).into()));
    let bb = surface.objects()[0].bounding_rect();
    assert!(bb.all_corners_close(BbF::from_arr(&[20.0, 14.0, 100.0, 50.0])));
}

#[test]
fn test_resize() {
    let mut surface = make_surface();
    surface.select(0);
    // grab the bottom right corner
    surface.pointer_pressed((109.0, 59.0).into());
    assert!(surface.is_manipulating());
    surface.pointer_moved((150.0, 100.0).into());
    assert!(surface.pointer_released((160.0, 110.0).into()));
    let bb = surface.objects()[0].bounding_rect();
    assert!(bb.all_corners_close(BbF::from_arr(&[10.0, 10.0, 150.0, 100.0])));
    // the report flattens the scale, the unscaled size is untouched
    if let Primitive::Box(b) = &surface.objects()[0] {
        assert!((b.width - 100.0).abs() < 1e-8);
        assert!((b.scale_x - 1.5).abs() < 1e-8);
    }
}

#[test]
fn test_resize_past_opposite_corner() {
    let mut surface = make_surface();
    surface.select(0);
    surface.pointer_pressed((110.0, 60.0).into());
    surface.pointer_moved((0.0, 0.0).into());
    surface.pointer_released((5.0, 5.0).into());
    let bb = surface.objects()[0].bounding_rect();
    assert!(bb.all_corners_close(BbF::from_arr(&[5.0, 5.0, 5.0, 5.0])));
}

#[test]
fn test_clear() {
    let mut surface = make_surface();
    surface.select(0);
    surface.clear();
    assert!(surface.is_empty());
    assert_eq!(surface.selected(), None);
    assert_eq!(surface.corner_tolerance(), 6.0);
}
