//! Extruded boxes built from a key rectangle and its press progress.
//!
//! Layout space is y-down with the origin at the top-left; the negative z
//! axis points into the screen. Every face is a planar quad.

use glam::Vec3;

use crate::keyboard_core::animation::MAX_PRESS_PROGRESS;

/// pixels of slide per unit of press progress, on both axes
pub const SHIFT_PER_PRESS: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(v: f32) -> Self {
        Self::new(v, v, v)
    }

    pub fn offset(self, delta: f32) -> Self {
        let f = |c: f32| (c + delta).clamp(0.0, 1.0);
        Self::new(f(self.r), f(self.g), f(self.b))
    }

    pub fn to_color32(self) -> epaint::Color32 {
        let f = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        epaint::Color32::from_rgb(f(self.r), f(self.g), f(self.b))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceKind {
    Front,
    Top,
    Right,
    Bottom,
    Left,
}

impl FaceKind {
    /// fake light from the top-left
    pub const fn brightness_offset(self) -> f32 {
        match self {
            Self::Top => 0.07,
            Self::Front => 0.0,
            Self::Bottom => -0.02,
            Self::Left => -0.03,
            Self::Right => -0.05,
        }
    }
}

/// Draw submission group. Passes are painted in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum RenderPass {
    /// painted first, in submission order
    Background,
    /// painted far to near
    #[default]
    DepthSorted,
    /// painted after all sorted faces, ignoring depth
    AlwaysOnTop,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    pub kind: FaceKind,
    pub corners: [Vec3; 4],
    pub color: Rgb,
    pub pass: RenderPass,
}

impl Face {
    fn new(kind: FaceKind, corners: [Vec3; 4], base_color: Rgb) -> Self {
        Self {
            kind,
            corners,
            color: base_color.offset(kind.brightness_offset()),
            pass: RenderPass::DepthSorted,
        }
    }

    pub fn with_pass(mut self, pass: RenderPass) -> Self {
        self.pass = pass;
        self
    }

    pub fn translated(mut self, offset: Vec3) -> Self {
        self.corners.iter_mut().for_each(|corner| *corner += offset);
        self
    }

    /// mean z, more negative is farther away
    pub fn depth(&self) -> f32 {
        self.corners.iter().map(|corner| corner.z).sum::<f32>() / 4.0
    }

    /// z of the farthest corner
    ///
    /// Side faces reach back at least a full compressed depth, fronts recede
    /// at most half the depth, so every side face sorts before every front.
    pub fn far_depth(&self) -> f32 {
        self.corners
            .iter()
            .map(|corner| corner.z)
            .fold(f32::INFINITY, f32::min)
    }

    /// area in 3D, sum of the two triangles the quad is drawn with
    #[cfg(test)]
    fn area(&self) -> f32 {
        let [a, b, c, d] = self.corners;
        0.5 * ((b - a).cross(c - a).length() + (c - a).cross(d - a).length())
    }
}

/// The three quantities every keycap face is derived from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressOffsets {
    /// slide toward the top-left, applied to x and y
    pub shift: f32,
    /// how far the front face recedes
    pub offset_z: f32,
    /// visible depth left behind the front face
    pub compressed_depth: f32,
}

impl PressOffsets {
    pub fn new(depth: f32, press_progress: f32) -> Self {
        let press_progress = press_progress.clamp(0.0, MAX_PRESS_PROGRESS);
        Self {
            shift: SHIFT_PER_PRESS * press_progress,
            offset_z: depth * press_progress,
            compressed_depth: depth * (1.0 - 0.5 * press_progress),
        }
    }
}

/// Quad corners of a box whose front face starts at `front` (top-left corner)
/// and whose back face is `front + back_offset`.
struct Extrusion {
    front: Vec3,
    size: egui::Vec2,
    back_offset: Vec3,
}

impl Extrusion {
    fn front(&self) -> [Vec3; 4] {
        let Self { front: p, size, .. } = self;
        [
            *p,
            *p + Vec3::new(size.x, 0.0, 0.0),
            *p + Vec3::new(size.x, size.y, 0.0),
            *p + Vec3::new(0.0, size.y, 0.0),
        ]
    }

    fn side(&self, a: usize, b: usize) -> [Vec3; 4] {
        let front = self.front();
        let (a, b) = (front[a], front[b]);
        [a, b, b + self.back_offset, a + self.back_offset]
    }

    fn faces(&self, color: Rgb) -> [Face; 5] {
        [
            Face::new(FaceKind::Front, self.front(), color),
            Face::new(FaceKind::Top, self.side(0, 1), color),
            Face::new(FaceKind::Right, self.side(1, 2), color),
            Face::new(FaceKind::Bottom, self.side(3, 2), color),
            Face::new(FaceKind::Left, self.side(0, 3), color),
        ]
    }

    fn three_faces(&self, color: Rgb) -> [Face; 3] {
        [
            Face::new(FaceKind::Front, self.front(), color),
            Face::new(FaceKind::Top, self.side(0, 1), color),
            Face::new(FaceKind::Left, self.side(0, 3), color),
        ]
    }

    /// static box whose back face is pulled in by half its depth
    fn beveled(rect: egui::Rect, depth: f32) -> Self {
        let bevel = depth * 0.5;
        Self {
            front: Vec3::new(rect.min.x, rect.min.y, 0.0),
            size: rect.size(),
            back_offset: Vec3::new(-bevel, -bevel, -depth),
        }
    }
}

/// Front, top, right, bottom and left faces of a keycap.
pub fn keycap_faces(rect: egui::Rect, depth: f32, press_progress: f32, color: Rgb) -> [Face; 5] {
    let PressOffsets {
        shift,
        offset_z,
        compressed_depth,
    } = PressOffsets::new(depth, press_progress);
    Extrusion {
        front: Vec3::new(rect.min.x - shift, rect.min.y - shift, -offset_z),
        size: rect.size(),
        back_offset: Vec3::splat(-compressed_depth),
    }
    .faces(color)
}

/// Five faces of a box that ignores press progress.
pub fn beveled_box_faces(rect: egui::Rect, depth: f32, color: Rgb) -> [Face; 5] {
    Extrusion::beveled(rect, depth).faces(color)
}

/// Front, top and left faces only, for small interior parts.
pub fn three_faced_box(rect: egui::Rect, depth: f32, color: Rgb) -> [Face; 3] {
    Extrusion::beveled(rect, depth).three_faces(color)
}

const HOUSING_INSET: f32 = 0.3;
const HOUSING_COLOR: Rgb = Rgb::gray(0.5);
const STEM_SCALE: f32 = 0.7 * 0.8;
const STEM_DEPTH_RATIO: f32 = 0.7143;
const STEM_COLOR: Rgb = Rgb::new(0.1, 0.4, 0.1);

/// Exposed switch under a removed keycap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwitchInterior {
    /// static, never moves with press
    pub housing: [Face; 5],
    /// moves with press, always painted above the housing
    pub stem: [Face; 3],
}

impl SwitchInterior {
    pub fn new(key_rect: egui::Rect, depth: f32, press_progress: f32) -> Self {
        let housing_rect = egui::Rect::from_min_size(
            key_rect.min + key_rect.size() * HOUSING_INSET,
            key_rect.size() * (1.0 - 2.0 * HOUSING_INSET),
        );
        let housing_depth = 16.0 * (depth / 15.0);
        let housing = beveled_box_faces(housing_rect, housing_depth, HOUSING_COLOR);

        let stem_size = housing_rect.size() * STEM_SCALE;
        let stem_min =
            housing_rect.min + (housing_rect.size() - stem_size) / 2.0 + egui::vec2(2.0, 2.0);
        let stem_rect = egui::Rect::from_min_size(stem_min, stem_size);
        let stem_depth = (housing_depth - 6.0) * STEM_SCALE * STEM_DEPTH_RATIO;

        let PressOffsets {
            shift, offset_z, ..
        } = PressOffsets::new(depth, press_progress);
        let normalized_press = press_progress.clamp(0.0, MAX_PRESS_PROGRESS) / MAX_PRESS_PROGRESS;
        let resting_z = -(stem_depth / 2.0);
        let pressed_z = -(stem_depth - 1.0);
        let travel_z = resting_z + normalized_press * (pressed_z - resting_z);
        let offset = Vec3::new(-0.5 * shift, -0.5 * shift, -offset_z + travel_z);

        let stem = three_faced_box(stem_rect, stem_depth, STEM_COLOR)
            .map(|face| face.translated(offset).with_pass(RenderPass::AlwaysOnTop));

        Self { housing, stem }
    }

    pub fn faces(&self) -> impl Iterator<Item = &Face> {
        self.housing.iter().chain(self.stem.iter())
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    fn key_rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::pos2(100.0, 50.0), egui::vec2(60.0, 60.0))
    }

    const BASE: Rgb = Rgb::new(0.93, 0.93, 0.88);

    #[test]
    fn keycap_has_five_faces_with_area() {
        for press_progress in [0.0, 0.1, 0.25, 0.4, 0.5] {
            let faces = keycap_faces(key_rect(), 18.0, press_progress, BASE);
            let kinds: Vec<_> = faces.iter().map(|face| face.kind).collect();
            assert_eq!(
                kinds,
                [
                    FaceKind::Front,
                    FaceKind::Top,
                    FaceKind::Right,
                    FaceKind::Bottom,
                    FaceKind::Left
                ]
            );
            assert!(faces.iter().all(|face| face.area() > 1.0), "{press_progress}");
        }
    }

    #[test]
    fn released_keycap_is_unshifted_full_depth() {
        let faces = keycap_faces(key_rect(), 18.0, 0.0, BASE);
        let front = faces[0];
        assert_eq!(front.corners[0], Vec3::new(100.0, 50.0, 0.0));
        assert_eq!(front.corners[2], Vec3::new(160.0, 110.0, 0.0));
        let top = faces[1];
        assert_eq!(top.corners[3], Vec3::new(82.0, 32.0, -18.0));
    }

    #[test]
    fn pressed_keycap_shifts_and_compresses() {
        let faces = keycap_faces(key_rect(), 18.0, 0.5, BASE);
        let front = faces[0];
        assert_eq!(front.corners[0], Vec3::new(95.0, 45.0, -9.0));
        // compressed depth = 18 * 0.75
        let left = faces[4];
        assert_eq!(left.corners[3], Vec3::new(95.0 - 13.5, 45.0 - 13.5, -9.0 - 13.5));
    }

    #[test]
    fn compressed_depth_strictly_decreases() {
        let depths: Vec<_> = (0..=10)
            .map(|step| PressOffsets::new(18.0, step as f32 * 0.05).compressed_depth)
            .collect();
        assert!(depths.windows(2).all(|pair| pair[1] < pair[0]));
        assert_eq!(depths[0], 18.0);
        assert_eq!(depths[10], 13.5);
    }

    #[test]
    fn face_colors_follow_light() {
        let faces = keycap_faces(key_rect(), 15.0, 0.0, Rgb::gray(0.5));
        let brightness: Vec<_> = faces.iter().map(|face| face.color.r).collect();
        // front, top, right, bottom, left
        assert!(brightness[1] > brightness[0]);
        assert!(brightness[0] > brightness[3]);
        assert!(brightness[3] > brightness[4]);
        assert!(brightness[4] > brightness[2]);
    }

    #[test]
    fn three_faced_box_has_area() {
        let rect = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(10.0, 8.0));
        let faces = three_faced_box(rect, 4.0, STEM_COLOR);
        assert_eq!(faces.len(), 3);
        assert!(faces.iter().all(|face| face.area() > 0.0));
        assert_eq!(faces[2].kind, FaceKind::Left);
    }

    #[test]
    fn housing_ignores_press() {
        let released = SwitchInterior::new(key_rect(), 15.0, 0.0);
        let pressed = SwitchInterior::new(key_rect(), 15.0, 0.5);
        assert_eq!(released.housing, pressed.housing);
        assert_ne!(released.stem, pressed.stem);
        assert!(
            released
                .housing
                .iter()
                .all(|face| face.pass == RenderPass::DepthSorted)
        );
    }

    #[test]
    fn stem_sinks_and_stays_on_top() {
        let released = SwitchInterior::new(key_rect(), 15.0, 0.0);
        let pressed = SwitchInterior::new(key_rect(), 15.0, 0.5);
        assert!(
            pressed
                .stem
                .iter()
                .all(|face| face.pass == RenderPass::AlwaysOnTop && face.area() > 0.0)
        );
        assert!(pressed.stem[0].depth() < released.stem[0].depth());
        // 0.4 * 60 housing, centered in the key
        let housing_front = released.housing[0];
        assert_eq!(housing_front.corners[0], Vec3::new(118.0, 68.0, 0.0));
        assert_eq!(released.faces().count(), 8);
    }

    #[test]
    fn rgb_offset_is_clamped() {
        assert_eq!(Rgb::gray(0.98).offset(0.07), Rgb::gray(1.0));
        assert_eq!(Rgb::gray(0.01).offset(-0.05), Rgb::gray(0.0));
        assert_eq!(Rgb::gray(1.0).to_color32(), epaint::Color32::WHITE);
    }
}
