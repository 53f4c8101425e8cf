use cgmath::{perspective, Deg, Matrix4, Point3, Rad, SquareMatrix};

use super::camera_controller::CameraPose;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Perspective projection of the viewer camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
}

impl Projection {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            aspect: aspect_ratio(width, height),
            fovy: Deg(75.0).into(),
            znear: 0.1,
            zfar: 1000.0,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = aspect_ratio(width, height);
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

fn aspect_ratio(width: u32, height: u32) -> f32 {
    if height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct CameraUniform {
    /// The eye position of the camera in homogenous coordinates.
    ///
    /// Homogenous coordinates are used to fullfill the 16 byte alignment requirement.
    pub view_position: [f32; 4],

    /// Contains the view projection matrix.
    pub view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }
}

impl CameraUniform {
    pub fn from_pose(pose: &CameraPose, projection: &Projection) -> Self {
        Self {
            view_position: pose.position.to_homogeneous().into(),
            view_proj: (projection.matrix() * pose.view_matrix()).into(),
        }
    }

    pub fn eye(&self) -> Point3<f32> {
        let [x, y, z, _] = self.view_position;
        Point3::new(x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Vector4;

    use super::*;
    use crate::gfx::camera::{camera_controller::CameraController, pointer::PointerSample};

    #[test]
    fn projection_defaults() {
        let projection = Projection::new(1200, 800);
        assert!((projection.aspect - 1.5).abs() < 1e-6);
        assert_eq!(projection.znear, 0.1);
        assert_eq!(projection.zfar, 1000.0);
        let fovy: Deg<f32> = projection.fovy.into();
        assert!((fovy.0 - 75.0).abs() < 1e-4);
    }

    #[test]
    fn zero_height_keeps_square_aspect() {
        let mut projection = Projection::new(640, 480);
        projection.resize(640, 0);
        assert_eq!(projection.aspect, 1.0);
    }

    #[test]
    fn origin_projects_to_screen_centre() {
        let pose = CameraController::new().pose(PointerSample::new(0.2, 0.4));
        let uniform = CameraUniform::from_pose(&pose, &Projection::new(800, 600));
        let clip = Matrix4::from(uniform.view_proj) * Vector4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-4);
        assert!(ndc.y.abs() < 1e-4);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
        assert_eq!(uniform.eye(), pose.position);
        assert_ne!(uniform.eye(), Point3::new(0.0, 0.0, 0.0));
    }
}
