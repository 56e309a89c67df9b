//! Pointer parallax and surface size tracking.
//!
//! Observers only write here; the frame tick reads and smooths. Nothing in
//! this module touches particle or edge storage.

use super::config::FieldConfig;

/// Host surface size in CSS pixels plus the device pixel ratio in effect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
	pub pixel_ratio: f64,
}

impl Viewport {
	pub fn new(width: f64, height: f64, pixel_ratio: f64) -> Self {
		Self {
			width,
			height,
			pixel_ratio,
		}
	}

	/// Same viewport with the pixel ratio capped at `max`.
	///
	/// Ratios below 1 are kept as reported; a non-positive or NaN ratio is
	/// treated as 1.
	pub fn with_pixel_ratio_cap(self, max: f64) -> Self {
		let pixel_ratio = if self.pixel_ratio > 0.0 {
			self.pixel_ratio.min(max)
		} else {
			1.0
		};
		Self {
			pixel_ratio,
			..self
		}
	}

	pub fn aspect(&self) -> f32 {
		if self.height > 0.0 {
			(self.width / self.height) as f32
		} else {
			1.0
		}
	}

	/// Drawing buffer size in device pixels.
	pub fn buffer_size(&self) -> (u32, u32) {
		(
			(self.width * self.pixel_ratio).round().max(0.0) as u32,
			(self.height * self.pixel_ratio).round().max(0.0) as u32,
		)
	}
}

/// Scene offset in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Parallax {
	pub x: f32,
	pub y: f32,
}

/// Raw pointer target, its smoothed follower, and the current viewport.
pub struct InputTracker {
	target: Parallax,
	smoothed: Parallax,
	scale: f32,
	smoothing: f32,
	max_pixel_ratio: f64,
	viewport: Viewport,
	resized: bool,
}

impl InputTracker {
	pub fn new(viewport: Viewport, config: &FieldConfig) -> Self {
		Self {
			target: Parallax::default(),
			smoothed: Parallax::default(),
			scale: config.parallax_scale,
			smoothing: config.parallax_smoothing,
			max_pixel_ratio: config.max_pixel_ratio,
			viewport: viewport.with_pixel_ratio_cap(config.max_pixel_ratio),
			resized: false,
		}
	}

	/// Record a pointer position in window coordinates.
	///
	/// The position is normalized to `[-0.5, 0.5]` across the whole window,
	/// then scaled, so the window centre maps to a zero target.
	pub fn pointer_moved(
		&mut self,
		client_x: f64,
		client_y: f64,
		window_width: f64,
		window_height: f64,
	) {
		if window_width <= 0.0 || window_height <= 0.0 {
			return;
		}
		self.target = Parallax {
			x: (client_x / window_width - 0.5) as f32 * self.scale,
			y: (client_y / window_height - 0.5) as f32 * self.scale,
		};
	}

	/// Record a new surface size; picked up by the next tick.
	pub fn surface_resized(&mut self, viewport: Viewport) {
		let viewport = viewport.with_pixel_ratio_cap(self.max_pixel_ratio);
		if viewport != self.viewport {
			self.viewport = viewport;
			self.resized = true;
		}
	}

	/// The viewport if it changed since the last call.
	pub fn take_resize(&mut self) -> Option<Viewport> {
		std::mem::take(&mut self.resized).then_some(self.viewport)
	}

	/// Move the smoothed value one step toward the target and return it.
	pub fn smooth(&mut self) -> Parallax {
		self.smoothed.x += (self.target.x - self.smoothed.x) * self.smoothing;
		self.smoothed.y += (self.target.y - self.smoothed.y) * self.smoothing;
		self.smoothed
	}

	pub fn target(&self) -> Parallax {
		self.target
	}

	pub fn smoothed(&self) -> Parallax {
		self.smoothed
	}

	pub fn viewport(&self) -> Viewport {
		self.viewport
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn tracker() -> InputTracker {
		InputTracker::new(Viewport::new(1200.0, 800.0, 1.0), &FieldConfig::default())
	}

	#[test]
	fn centre_pointer_targets_zero() {
		let mut input = tracker();
		input.pointer_moved(600.0, 400.0, 1200.0, 800.0);
		assert_eq!(input.target(), Parallax { x: 0.0, y: 0.0 });
	}

	#[test]
	fn corners_reach_half_scale() {
		let mut input = tracker();
		input.pointer_moved(0.0, 800.0, 1200.0, 800.0);
		assert_eq!(input.target(), Parallax { x: -25.0, y: 25.0 });
	}

	#[test]
	fn degenerate_window_is_ignored() {
		let mut input = tracker();
		input.pointer_moved(10.0, 10.0, 0.0, 800.0);
		assert_eq!(input.target(), Parallax::default());
	}

	#[test]
	fn smoothing_decays_monotonically_without_overshoot() {
		let mut input = tracker();
		input.pointer_moved(1200.0, 0.0, 1200.0, 800.0);
		for _ in 0..200 {
			input.smooth();
		}
		let start = input.smoothed();
		assert!(start.x > 24.0 && start.y < -24.0);

		input.pointer_moved(600.0, 400.0, 1200.0, 800.0);
		let mut previous = start;
		for _ in 0..500 {
			let next = input.smooth();
			assert!(next.x >= 0.0 && next.x < previous.x);
			assert!(next.y <= 0.0 && next.y > previous.y);
			previous = next;
		}
		assert!(previous.x < 0.01 && previous.y > -0.01);
	}

	#[test]
	fn smoothing_uses_fixed_factor() {
		let mut input = tracker();
		input.pointer_moved(1200.0, 400.0, 1200.0, 800.0);
		let step = input.smooth();
		assert!((step.x - 25.0 * 0.04).abs() < 1e-6);
		assert_eq!(step.y, 0.0);
	}

	#[test]
	fn resize_is_reported_once_and_only_on_change() {
		let mut input = tracker();
		input.surface_resized(Viewport::new(1200.0, 800.0, 1.0));
		assert_eq!(input.take_resize(), None);

		input.surface_resized(Viewport::new(640.0, 480.0, 3.0));
		assert_eq!(input.take_resize(), Some(Viewport::new(640.0, 480.0, 2.0)));
		assert_eq!(input.take_resize(), None);
		assert!((input.viewport().aspect() - 4.0 / 3.0).abs() < 1e-6);
	}

	#[test]
	fn buffer_size_scales_by_pixel_ratio() {
		let viewport = Viewport::new(800.5, 600.0, 4.0).with_pixel_ratio_cap(2.0);
		assert_eq!(viewport.buffer_size(), (1601, 1200));
		assert_eq!(Viewport::new(10.0, 0.0, 1.0).aspect(), 1.0);
	}

	#[test]
	fn pixel_ratio_is_capped_but_never_raised() {
		let low = Viewport::new(800.0, 600.0, 0.75).with_pixel_ratio_cap(2.0);
		assert_eq!(low.pixel_ratio, 0.75);
		assert_eq!(low.buffer_size(), (600, 450));

		let high = Viewport::new(800.0, 600.0, 3.0).with_pixel_ratio_cap(2.0);
		assert_eq!(high.pixel_ratio, 2.0);

		for broken in [0.0, -1.0, f64::NAN] {
			let viewport = Viewport::new(800.0, 600.0, broken).with_pixel_ratio_cap(2.0);
			assert_eq!(viewport.pixel_ratio, 1.0);
		}
	}
}
