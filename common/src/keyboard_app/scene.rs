use std::cmp::Ordering;

use egui::{Color32, Pos2};
use epaint::Mesh;

use crate::{
    geometry::{self, Face, PressOffsets, RenderPass, SwitchInterior},
    keyboard_core::{key_slot::KeySlot, layout::KeyboardState},
};

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: Box<str>,
    pub center: Pos2,
}

/// A face plus the label painted right after it, if any.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SceneFace {
    face: Face,
    label: Option<usize>,
}

pub enum DrawItem<'a> {
    Mesh(Mesh),
    Label(&'a Label),
}

/// Faces and labels of one frame, ready to paint.
///
/// Faces are kept in paint order: every background face, then the depth sorted
/// faces from far to near, then the faces that ignore depth. A key's label is
/// painted right after its front face, so later faces may cover it.
#[derive(Debug, Default)]
pub struct Scene {
    faces: Vec<SceneFace>,
    labels: Vec<Label>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compose(&mut self, state: &KeyboardState) {
        self.faces.clear();
        self.labels.clear();
        let depth = state.metrics().depth;
        state
            .slots()
            .iter()
            .for_each(|slot| self.push_slot(slot, depth));
        // stable, equal keys keep submission order
        self.faces.sort_by(|a, b| paint_order(&a.face, &b.face));
    }

    fn push_faces(&mut self, faces: impl IntoIterator<Item = Face>) {
        self.faces
            .extend(faces.into_iter().map(|face| SceneFace { face, label: None }));
    }

    fn push_slot(&mut self, slot: &KeySlot, depth: f32) {
        let rect = slot.rect();
        let color = slot.category.base_color();
        if slot.category.is_inert() {
            let faces = geometry::keycap_faces(rect, depth, 0.0, color);
            self.push_faces(faces.map(|face| face.with_pass(RenderPass::Background)));
            return;
        }
        let press_progress = slot.press_progress();
        if slot.keycap_removed {
            let interior = SwitchInterior::new(rect, depth, press_progress);
            self.push_faces(interior.faces().copied());
            return;
        }
        let [front, sides @ ..] = geometry::keycap_faces(rect, depth, press_progress, color);
        let label = (!slot.label.is_empty()).then(|| {
            let shift = PressOffsets::new(depth, press_progress).shift;
            self.labels.push(Label {
                text: slot.label.clone(),
                center: rect.center() - egui::vec2(shift, shift),
            });
            self.labels.len() - 1
        });
        self.faces.push(SceneFace { face: front, label });
        self.push_faces(sides);
    }

    /// Meshes split wherever a label has to go between two faces.
    pub fn draw_items(&self) -> Vec<DrawItem<'_>> {
        let mut items = Vec::with_capacity(self.labels.len() * 2 + 1);
        let mut mesh = Mesh::default();
        for SceneFace { face, label } in &self.faces {
            push_quad(&mut mesh, face);
            if let Some(label) = label.and_then(|index| self.labels.get(index)) {
                items.push(DrawItem::Mesh(std::mem::take(&mut mesh)));
                items.push(DrawItem::Label(label));
            }
        }
        if !mesh.is_empty() {
            items.push(DrawItem::Mesh(mesh));
        }
        items
    }

    #[cfg(test)]
    fn faces(&self) -> Vec<Face> {
        self.faces.iter().map(|scene_face| scene_face.face).collect()
    }

    #[cfg(test)]
    fn labels(&self) -> &[Label] {
        &self.labels
    }
}

/// Farthest corner first, mean z breaks ties.
fn paint_order(a: &Face, b: &Face) -> Ordering {
    a.pass.cmp(&b.pass).then_with(|| match a.pass {
        RenderPass::DepthSorted => a
            .far_depth()
            .total_cmp(&b.far_depth())
            .then_with(|| a.depth().total_cmp(&b.depth())),
        RenderPass::Background | RenderPass::AlwaysOnTop => Ordering::Equal,
    })
}

/// Orthographic: z only decides the order faces were sorted in.
fn push_quad(mesh: &mut Mesh, face: &Face) {
    let color: Color32 = face.color.to_color32();
    let base = mesh.vertices.len() as u32;
    face.corners.iter().for_each(|corner| {
        mesh.colored_vertex(egui::pos2(corner.x, corner.y), color);
    });
    mesh.add_triangle(base, base + 1, base + 2);
    mesh.add_triangle(base, base + 2, base + 3);
}
