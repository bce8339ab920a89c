// Rotation, perspective and flat shading for the single-window cube.
// No z-buffer: faces are painted back to front, which is exact for a convex
// solid like the cube and nothing else.

use glam::{Mat3, Vec2, Vec3};

/// Corners of the cube `[-1, 1]^3`: 0..4 on z = -1, 4..8 on z = +1, each ring
/// going (-1,-1), (1,-1), (1,1), (-1,1).
pub const CUBE_VERTICES: [Vec3; 8] = [
    Vec3::new(-1.0, -1.0, -1.0),
    Vec3::new(1.0, -1.0, -1.0),
    Vec3::new(1.0, 1.0, -1.0),
    Vec3::new(-1.0, 1.0, -1.0),
    Vec3::new(-1.0, -1.0, 1.0),
    Vec3::new(1.0, -1.0, 1.0),
    Vec3::new(1.0, 1.0, 1.0),
    Vec3::new(-1.0, 1.0, 1.0),
];

/// Faces as vertex indices, wound so `(v1 - v0) x (v2 - v0)` points outward.
pub const FACES: [[usize; 4]; 6] = [
    [0, 3, 2, 1], // -z
    [4, 5, 6, 7], // +z
    [0, 1, 5, 4], // -y
    [3, 7, 6, 2], // +y
    [1, 2, 6, 5], // +x
    [0, 4, 7, 3], // -x
];

/// The +z face.
#[cfg(test)]
pub const FRONT_FACE: usize = 1;
#[cfg(test)]
pub const BACK_FACE: usize = 0;

/// Below this length a cross product is treated as degenerate.
const NORMAL_EPS: f32 = 1e-9;
/// Smallest camera-space depth we divide by.
const DEPTH_EPS: f32 = 1e-3;

/// Rotation for (pitch, yaw, roll). Points are treated as row vectors
/// multiplied by `Rx * Ry * Rz`, so the column-vector matrix is its transpose.
pub fn rotation(angles: Vec3) -> Mat3 {
    let rows = Mat3::from_rotation_x(angles.x) * Mat3::from_rotation_y(angles.y) * Mat3::from_rotation_z(angles.z);
    rows.transpose()
}

pub fn rotate(points: &[Vec3; 8], m: Mat3) -> [Vec3; 8] {
    (*points).map(|p| m * p)
}

/// A vertex after the perspective divide; `z` is kept for depth sorting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    pub xy: Vec2,
    pub z: f32,
}

/// `screen = (x, y) * focal / (z + camera_offset) + center`.
pub fn project(p: Vec3, focal: f32, camera_offset: f32, center: Vec2) -> Projected {
    let depth = (p.z + camera_offset).max(DEPTH_EPS);
    let f = focal / depth;
    Projected { xy: Vec2::new(p.x, p.y) * f + center, z: p.z }
}

/// Unit normal of the plane through `a`, `b`, `c`; zero if they are collinear.
pub fn face_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    let n = (b - a).cross(c - a);
    if n.length() < NORMAL_EPS {
        return Vec3::ZERO;
    }
    n.normalize()
}

/// Lambert term against `light_dir` (direction the light travels), floored at `ambient`.
pub fn face_intensity(normal: Vec3, light_dir: Vec3, ambient: f32) -> f32 {
    normal.dot(-light_dir.normalize_or_zero()).max(ambient)
}

/// Scale `hue` by `intensity`, clamped to 0..=255 per channel.
pub fn shade(hue: [u8; 3], intensity: f32) -> [u8; 3] {
    hue.map(|c| (c as f32 * intensity).clamp(0.0, 255.0) as u8)
}

/// Face indices, farthest first (largest summed z drawn first).
pub fn depth_order(projected: &[Projected; 8]) -> [usize; 6] {
    let depth = |f: usize| FACES[f].iter().map(|&i| projected[i].z).sum::<f32>();
    let mut order = [0, 1, 2, 3, 4, 5];
    order.sort_by(|&a, &b| depth(b).total_cmp(&depth(a)));
    order
}

/// First-order low-pass: move `alpha` of the way from `current` to `target`.
///
/// Applied once per frame, so the response time depends on the frame rate
/// (at 60 Hz and alpha 0.15 the gap halves roughly every 4 frames). Switching
/// to `1 - (1 - alpha)^(dt * hz)` would make it time-based.
pub fn ease_toward(current: f32, target: f32, alpha: f32) -> f32 {
    current + (target - current) * alpha
}

/// Window offset from screen centre to (pitch, yaw, roll) targets.
pub fn target_angles(offset: Vec2, tilt_scale: f32, roll_scale: f32) -> Vec3 {
    Vec3::new(
        offset.y / tilt_scale,
        offset.x / tilt_scale,
        (offset.x + offset.y) / roll_scale,
    )
}

/// Rotation angles that lag behind their targets.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Smoothed {
    pub angles: Vec3,
}

impl Smoothed {
    pub fn advance(&mut self, target: Vec3, alpha: f32) {
        self.angles = Vec3::new(
            ease_toward(self.angles.x, target.x, alpha),
            ease_toward(self.angles.y, target.y, alpha),
            ease_toward(self.angles.z, target.z, alpha),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn light() -> Vec3 {
        Vec3::new(0.4, -1.0, -0.6).normalize()
    }

    fn intensity_of(face: usize, verts: &[Vec3; 8]) -> f32 {
        let [a, b, c, _] = FACES[face];
        face_intensity(face_normal(verts[a], verts[b], verts[c]), light(), 0.1)
    }

    #[test]
    fn faces_wind_outward() {
        for face in FACES {
            let [a, b, c, d] = face.map(|i| CUBE_VERTICES[i]);
            let centroid = (a + b + c + d) / 4.0;
            let n = face_normal(a, b, c);
            assert!((n.length() - 1.0).abs() < 1e-6);
            assert!(n.dot(centroid) > 0.0, "face {face:?} winds inward");
        }
    }

    #[test]
    fn front_face_is_lit() {
        let front = intensity_of(FRONT_FACE, &CUBE_VERTICES);
        let back = intensity_of(BACK_FACE, &CUBE_VERTICES);
        assert!(front > 0.1);
        assert!((front - 0.6 / Vec3::new(0.4, -1.0, -0.6).length()).abs() < 1e-5);
        assert_eq!(back, 0.1);
    }

    #[test]
    fn half_turn_swaps_front_and_back_lighting() {
        let turned = rotate(&CUBE_VERTICES, rotation(Vec3::new(0.0, PI, 0.0)));
        let front = intensity_of(FRONT_FACE, &turned);
        let back = intensity_of(BACK_FACE, &turned);
        assert!(back > front);
        assert!((front - 0.1).abs() < 1e-5);
    }

    #[test]
    fn window_right_of_centre_turns_front_face_left() {
        let angles = target_angles(Vec2::new(350.0, 0.0), 350.0, 700.0);
        assert_eq!(angles, Vec3::new(0.0, 1.0, 0.5));

        let front_centre = rotation(angles) * Vec3::Z;
        let expected = Vec3::new(-(1.0f32.sin()) * 0.5f32.cos(), 1.0f32.sin() * 0.5f32.sin(), 1.0f32.cos());
        assert!((front_centre - expected).length() < 1e-5, "{front_centre:?}");
        assert!((front_centre - Vec3::new(-0.738, 0.403, 0.540)).length() < 1e-3);

        // A quarter pitch carries +z onto +y.
        let pitched = rotation(Vec3::new(FRAC_PI_2, 0.0, 0.0)) * Vec3::Z;
        assert!((pitched - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-6, "{pitched:?}");
    }

    #[test]
    fn collinear_points_give_zero_normal() {
        let n = face_normal(Vec3::ZERO, Vec3::X, Vec3::X * 2.0);
        assert_eq!(n, Vec3::ZERO);
        assert_eq!(face_intensity(n, light(), 0.1), 0.1);
    }

    #[test]
    fn perspective_divide() {
        let p = project(Vec3::new(1.0, 1.0, 1.0), 280.0, 4.0, Vec2::new(350.0, 350.0));
        assert_eq!(p.xy, Vec2::new(406.0, 406.0));
        assert_eq!(p.z, 1.0);

        let near = project(Vec3::new(1.0, 0.0, -1.0), 280.0, 4.0, Vec2::ZERO);
        let far = project(Vec3::new(1.0, 0.0, 1.0), 280.0, 4.0, Vec2::ZERO);
        assert!(near.xy.x > far.xy.x);
    }

    #[test]
    fn projection_survives_points_behind_the_camera() {
        let p = project(Vec3::new(1.0, 1.0, -10.0), 280.0, 4.0, Vec2::ZERO);
        assert!(p.xy.is_finite());
    }

    #[test]
    fn unrotated_depth_order_is_back_to_front() {
        let projected = CUBE_VERTICES.map(|v| project(v, 280.0, 4.0, Vec2::ZERO));
        let order = depth_order(&projected);
        assert_eq!(order[0], FRONT_FACE);
        assert_eq!(order[5], BACK_FACE);
    }

    #[test]
    fn shading_scales_and_clamps() {
        assert_eq!(shade([0, 255, 0], 0.5), [0, 127, 0]);
        assert_eq!(shade([0, 255, 100], 2.0), [0, 255, 200]);
        assert_eq!(shade([10, 20, 30], 0.0), [0, 0, 0]);
    }

    #[test]
    fn easing_lags_then_converges() {
        let mut s = Smoothed::default();
        let target = Vec3::new(1.0, -2.0, 0.5);
        s.advance(target, 0.15);
        assert!((s.angles.x - 0.15).abs() < 1e-6);
        assert!((s.angles.y + 0.3).abs() < 1e-6);
        for _ in 0..200 {
            s.advance(target, 0.15);
        }
        assert!((s.angles - target).length() < 1e-4);
    }

    #[test]
    fn targets_follow_window_offset() {
        let t = target_angles(Vec2::new(350.0, -175.0), 350.0, 700.0);
        assert!((t.x + 0.5).abs() < 1e-6);
        assert!((t.y - 1.0).abs() < 1e-6);
        assert!((t.z - 0.25).abs() < 1e-6);
    }
}
