use nalgebra::{Matrix2x3, Vector2, Vector3};
use serde::{Deserialize, Serialize};

use crate::dynamics::State;

// ---------------------------------------------------------------------------
// Orthographic camera (elevation / azimuth, degrees)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub elevation_deg: f64,
    pub azimuth_deg: f64,
}

impl Default for Camera {
    /// Angle that shows both wings of the butterfly.
    fn default() -> Self {
        Self { elevation_deg: 30.0, azimuth_deg: 45.0 }
    }
}

impl Camera {
    pub fn new(elevation_deg: f64, azimuth_deg: f64) -> Self {
        Self { elevation_deg, azimuth_deg }
    }

    /// Rows are the screen right and screen up directions in world coordinates.
    ///
    /// The camera sits at (cos el cos az, cos el sin az, sin el) looking at the
    /// origin, with world +z pointing up on screen whenever |el| < 90.
    pub fn basis(&self) -> Matrix2x3<f64> {
        let (se, ce) = self.elevation_deg.to_radians().sin_cos();
        let (sa, ca) = self.azimuth_deg.to_radians().sin_cos();
        Matrix2x3::new(
            -sa, ca, 0.0,
            -se * ca, -se * sa, ce,
        )
    }

    pub fn project_vector(&self, v: &Vector3<f64>) -> Vector2<f64> {
        self.basis() * v
    }

    pub fn project(&self, s: &State) -> [f64; 2] {
        let p = self.project_vector(&s.as_vector());
        [p.x, p.y]
    }

    /// Project a whole trajectory, reusing one basis.
    pub fn project_all(&self, states: &[State]) -> Vec<[f64; 2]> {
        let m = self.basis();
        states
            .iter()
            .map(|s| {
                let p = m * s.as_vector();
                [p.x, p.y]
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn origin_projects_to_origin() {
        assert_eq!(Camera::default().project(&State::ORIGIN), [0.0, 0.0]);
    }

    #[test]
    fn side_view_drops_x() {
        let cam = Camera::new(0.0, 0.0);
        let p = cam.project(&State::new(7.0, 2.0, 3.0));
        assert_relative_eq!(p[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(p[1], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn top_view_drops_z() {
        let cam = Camera::new(90.0, 0.0);
        let a = cam.project(&State::new(1.0, 2.0, 0.0));
        let b = cam.project(&State::new(1.0, 2.0, 50.0));
        assert_relative_eq!(a[0], b[0], epsilon = 1e-12);
        assert_relative_eq!(a[1], b[1], epsilon = 1e-9);
    }

    #[test]
    fn basis_rows_are_orthonormal() {
        let m = Camera::default().basis();
        let r0 = m.row(0);
        let r1 = m.row(1);
        assert_relative_eq!(r0.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(r1.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(r0.dot(&r1), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn project_all_matches_project() {
        let cam = Camera::new(12.0, -70.0);
        let states = [State::new(1.0, -4.0, 9.0), State::new(-3.0, 0.5, 2.0)];
        let all = cam.project_all(&states);
        assert_eq!(all[1], cam.project(&states[1]));
    }
}
