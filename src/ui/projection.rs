//! Perspective projection of card faces onto a halfblock raster.
//!
//! The raster is `width × height` pixels where one terminal cell holds two
//! vertically stacked pixels, so pixels come out roughly square.

use glam::{EulerRot, Mat4, Quat, Vec2, Vec3, Vec4Swizzles};

use crate::core::damp::Pose;
use crate::core::gallery::CardDimensions;
use crate::core::stage::CardFrame;

pub const CAMERA_POSITION: Vec3 = Vec3::new(0.0, 0.0, 12.0);
pub const FOV_DEGREES: f32 = 45.0;
const NEAR: f32 = 0.1;
const FAR: f32 = 100.0;
/// Height of the printed face above the card body's centre plane.
const FACE_LIFT: f32 = 0.08;
/// Inside-test slack, in barycentric units.
const EDGE_SLACK: f32 = 1e-4;

/// Texture coordinates of the face corners, in [`face_corners`] order.
pub const CORNER_UV: [Vec2; 4] = [Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y];

pub struct Camera {
    view: Mat4,
    view_proj: Mat4,
    width: f32,
    height: f32,
}

impl Camera {
    /// Camera for a raster of `width × height` pixels.
    pub fn new(width: f32, height: f32) -> Self {
        let aspect = if width > 0.0 && height > 0.0 {
            width / height
        } else {
            1.0
        };
        let view = Mat4::look_at_rh(CAMERA_POSITION, Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh(FOV_DEGREES.to_radians(), aspect, NEAR, FAR);
        Self {
            view,
            view_proj: proj * view,
            width,
            height,
        }
    }

    /// World point → raster position and clip-space `w`.  `None` when the
    /// point is behind the near plane.
    pub fn project(&self, point: Vec3) -> Option<(Vec2, f32)> {
        let clip = self.view_proj * point.extend(1.0);
        if !clip.w.is_finite() || clip.w <= NEAR {
            return None;
        }
        let ndc = clip.xy() / clip.w;
        let raster = Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.width,
            (1.0 - ndc.y) * 0.5 * self.height,
        );
        Some((raster, clip.w))
    }

    /// Distance in front of the camera along the view axis.
    pub fn depth(&self, point: Vec3) -> f32 {
        -(self.view * point.extend(1.0)).z
    }
}

pub fn card_transform(pose: &Pose) -> Mat4 {
    let r = pose.rotation;
    Mat4::from_scale_rotation_translation(
        pose.scale,
        Quat::from_euler(EulerRot::XYZ, r.x, r.y, r.z),
        pose.position,
    )
}

/// World-space corners of the printed face: top-left, top-right,
/// bottom-right, bottom-left.  The face lies in the card's local XZ plane,
/// image top toward local -Z.
pub fn face_corners(pose: &Pose, dims: &CardDimensions) -> [Vec3; 4] {
    let m = card_transform(pose);
    let (hw, hh) = (dims.plane[0] * 0.5, dims.plane[1] * 0.5);
    [
        Vec3::new(-hw, FACE_LIFT, -hh),
        Vec3::new(hw, FACE_LIFT, -hh),
        Vec3::new(hw, FACE_LIFT, hh),
        Vec3::new(-hw, FACE_LIFT, hh),
    ]
    .map(|p| m.transform_point3(p))
}

/// One card face in raster space.
#[derive(Debug, Clone)]
pub struct ProjectedQuad {
    pub index: usize,
    pub points: [Vec2; 4],
    inv_w: [f32; 4],
    /// View depth of the face centre.
    pub depth: f32,
    /// `|cos|` of the angle between face normal and view ray; 1 = head-on.
    pub facing: f32,
}

impl ProjectedQuad {
    pub fn project(index: usize, pose: &Pose, dims: &CardDimensions, camera: &Camera) -> Option<Self> {
        if !pose.is_finite() {
            return None;
        }
        let corners = face_corners(pose, dims);
        let mut points = [Vec2::ZERO; 4];
        let mut inv_w = [0.0; 4];
        for (i, corner) in corners.iter().enumerate() {
            let (p, w) = camera.project(*corner)?;
            points[i] = p;
            inv_w[i] = 1.0 / w;
        }

        let centre = (corners[0] + corners[2]) * 0.5;
        let normal = (corners[1] - corners[0]).cross(corners[3] - corners[0]);
        let to_camera = CAMERA_POSITION - centre;
        let facing = normal
            .try_normalize()
            .zip(to_camera.try_normalize())
            .map_or(0.0, |(n, v)| n.dot(v).abs());

        Some(Self {
            index,
            points,
            inv_w,
            depth: camera.depth(centre),
            facing,
        })
    }

    /// Axis-aligned raster bounds `(min, max)`.
    pub fn bounds(&self) -> (Vec2, Vec2) {
        let min = self.points.iter().fold(Vec2::splat(f32::MAX), |a, p| a.min(*p));
        let max = self.points.iter().fold(Vec2::splat(f32::MIN), |a, p| a.max(*p));
        (min, max)
    }

    /// Perspective-correct texture coordinate at raster point `p`, or `None`
    /// when `p` is outside the face.
    pub fn uv_at(&self, p: Vec2) -> Option<Vec2> {
        for [a, b, c] in [[0, 1, 2], [0, 2, 3]] {
            let Some(bary) = barycentric(p, self.points[a], self.points[b], self.points[c]) else {
                continue;
            };
            let weights = [
                bary.x * self.inv_w[a],
                bary.y * self.inv_w[b],
                bary.z * self.inv_w[c],
            ];
            let total: f32 = weights.iter().sum();
            if total.abs() < f32::EPSILON {
                return None;
            }
            let uv = (CORNER_UV[a] * weights[0] + CORNER_UV[b] * weights[1] + CORNER_UV[c] * weights[2])
                / total;
            return Some(uv.clamp(Vec2::ZERO, Vec2::ONE));
        }
        None
    }

    pub fn contains(&self, p: Vec2) -> bool {
        self.uv_at(p).is_some()
    }
}

fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Barycentric weights of `p` in triangle `abc` (either winding).
fn barycentric(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> Option<Vec3> {
    let area = edge(a, b, c);
    if area.abs() < 1e-6 {
        return None;
    }
    let w = Vec3::new(edge(b, c, p), edge(c, a, p), edge(a, b, p)) / area;
    (w.min_element() >= -EDGE_SLACK).then_some(w)
}

/// Project every card and order the result far → near (paint order).
pub fn project_cards(cards: &[CardFrame], camera: &Camera) -> Vec<ProjectedQuad> {
    let mut quads: Vec<ProjectedQuad> = cards
        .iter()
        .filter_map(|c| ProjectedQuad::project(c.index, &c.pose, &c.dimensions, camera))
        .collect();
    quads.sort_by(|a, b| b.depth.total_cmp(&a.depth));
    quads
}

/// Nearest card under raster point `p`.  `quads` must be in paint order.
pub fn pick(quads: &[ProjectedQuad], p: Vec2) -> Option<usize> {
    quads.iter().rev().find(|q| q.contains(p)).map(|q| q.index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::gallery::CardLayout;
    use std::f32::consts::FRAC_PI_2;

    fn facing_camera(position: Vec3) -> Pose {
        Pose {
            position,
            rotation: Vec3::new(FRAC_PI_2, 0.0, 0.0),
            scale: Vec3::ONE,
        }
    }

    #[test]
    fn a_card_facing_the_camera_is_centred_and_upright() {
        let camera = Camera::new(200.0, 100.0);
        let dims = CardLayout::Desktop.dimensions();
        let quad = ProjectedQuad::project(0, &facing_camera(Vec3::ZERO), &dims, &camera).unwrap();

        let uv = quad.uv_at(Vec2::new(100.0, 50.0)).unwrap();
        assert!((uv - Vec2::splat(0.5)).length() < 1e-2, "{uv:?}");
        // Image top-left lands up and to the left of centre.
        assert!(quad.points[0].x < 100.0 && quad.points[0].y < 50.0);
        assert!(quad.points[2].x > 100.0 && quad.points[2].y > 50.0);
        assert!(quad.facing > 0.99);
        assert!((quad.depth - 12.0).abs() < 0.2);
    }

    #[test]
    fn picks_the_nearest_card() {
        let camera = Camera::new(200.0, 100.0);
        let dims = CardLayout::Square.dimensions();
        let far = ProjectedQuad::project(0, &facing_camera(Vec3::ZERO), &dims, &camera).unwrap();
        let near = ProjectedQuad::project(1, &facing_camera(Vec3::new(0.0, 0.0, 2.0)), &dims, &camera).unwrap();

        let mut quads = vec![near, far];
        quads.sort_by(|a, b| b.depth.total_cmp(&a.depth));
        assert_eq!(quads[0].index, 0);
        assert_eq!(pick(&quads, Vec2::new(100.0, 50.0)), Some(1));
        assert_eq!(pick(&quads, Vec2::new(1.0, 1.0)), None);
    }

    #[test]
    fn cards_behind_the_camera_are_dropped() {
        let camera = Camera::new(80.0, 40.0);
        let dims = CardLayout::Mobile.dimensions();
        let behind = facing_camera(Vec3::new(0.0, 0.0, 20.0));
        assert!(ProjectedQuad::project(0, &behind, &dims, &camera).is_none());

        let mut broken = facing_camera(Vec3::ZERO);
        broken.position.x = f32::NAN;
        assert!(ProjectedQuad::project(0, &broken, &dims, &camera).is_none());
    }

    #[test]
    fn tilted_cards_face_the_camera_less() {
        let camera = Camera::new(200.0, 100.0);
        let dims = CardLayout::Desktop.dimensions();
        let resting = Pose {
            position: Vec3::ZERO,
            rotation: Vec3::new(0.4, 0.1, 0.0),
            scale: Vec3::ONE,
        };
        let quad = ProjectedQuad::project(0, &resting, &dims, &camera).unwrap();
        assert!(quad.facing < 0.5);
        assert!(quad.contains((quad.points[0] + quad.points[2]) * 0.5));
    }
}
