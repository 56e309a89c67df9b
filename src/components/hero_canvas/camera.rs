//! Fixed perspective camera and the parallax group transform.

use glam::{Mat4, Vec3};

use super::config::CameraConfig;
use super::input::Parallax;

/// Perspective camera looking down -z from `distance` units out.
#[derive(Clone, Debug)]
pub struct Camera {
	fov_y: f32,
	aspect: f32,
	near: f32,
	far: f32,
	distance: f32,
}

impl Camera {
	pub fn new(config: &CameraConfig, aspect: f32) -> Self {
		Self {
			fov_y: config.fov_degrees.to_radians(),
			aspect,
			near: config.near,
			far: config.far,
			distance: config.distance,
		}
	}

	pub fn set_aspect(&mut self, aspect: f32) {
		self.aspect = aspect;
	}

	pub fn aspect(&self) -> f32 {
		self.aspect
	}

	pub fn projection(&self) -> Mat4 {
		Mat4::perspective_rh_gl(self.fov_y, self.aspect, self.near, self.far)
	}

	pub fn view(&self) -> Mat4 {
		Mat4::from_translation(Vec3::new(0.0, 0.0, -self.distance))
	}

	/// Model-view-projection for the particle group offset by `parallax`.
	///
	/// Pointer y grows downward on screen while world y grows upward, so the
	/// group moves by `-parallax.y`.
	pub fn group_transform(&self, parallax: Parallax) -> Mat4 {
		let group = Mat4::from_translation(Vec3::new(parallax.x, -parallax.y, 0.0));
		self.projection() * self.view() * group
	}
}
