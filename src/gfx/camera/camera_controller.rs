use cgmath::{Matrix4, Point3, Vector3};

use super::pointer::PointerSample;

/// Horizontal distance of the camera from the scene origin
pub const ORBIT_RADIUS: f32 = 15.0;
/// Camera height with the pointer vertically centred
pub const BASE_HEIGHT: f32 = 10.0;
/// Height added per unit of vertical pointer offset
pub const HEIGHT_RANGE: f32 = 5.0;

/// Where the camera sits and what it looks at for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Point3<f32>,
    pub look_at: Point3<f32>,
}

impl CameraPose {
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.look_at, Vector3::unit_y())
    }
}

/// Maps the pointer onto an orbit around the origin.
///
/// Horizontal pointer offset sweeps the azimuth over a full half turn each way,
/// vertical offset raises or lowers the camera. Stateless: the same sample
/// always produces the same pose.
#[derive(Debug, Default, Clone, Copy)]
pub struct CameraController;

impl CameraController {
    pub fn new() -> Self {
        Self
    }

    pub fn pose(&self, sample: PointerSample) -> CameraPose {
        let azimuth = sample.x * std::f32::consts::PI;
        CameraPose {
            position: Point3::new(
                azimuth.sin() * ORBIT_RADIUS,
                BASE_HEIGHT + sample.y * HEIGHT_RANGE,
                azimuth.cos() * ORBIT_RADIUS,
            ),
            look_at: Point3::new(0.0, 0.0, 0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point3<f32>, b: Point3<f32>) -> bool {
        (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4 && (a.z - b.z).abs() < 1e-4
    }

    #[test]
    fn centred_pointer_looks_from_front() {
        let pose = CameraController::new().pose(PointerSample::CENTER);
        assert!(close(pose.position, Point3::new(0.0, 10.0, 15.0)));
        assert_eq!(pose.look_at, Point3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn top_right_pointer_looks_from_behind_and_above() {
        let pose = CameraController::new().pose(PointerSample::new(1.0, 1.0));
        assert!(close(pose.position, Point3::new(0.0, 15.0, -15.0)));
    }

    #[test]
    fn quarter_turn_moves_camera_to_side() {
        let pose = CameraController::new().pose(PointerSample::new(0.5, -1.0));
        assert!(close(pose.position, Point3::new(15.0, 5.0, 0.0)));
    }

    #[test]
    fn pose_is_stateless() {
        let controller = CameraController::new();
        let sample = PointerSample::new(0.3, -0.2);
        let _ = controller.pose(PointerSample::new(-0.9, 0.9));
        assert_eq!(controller.pose(sample), controller.pose(sample));
    }
}
