//! Device-class profiles and fixed simulation constants.
//!
//! The only runtime input is a single device-class signal: the window width
//! at activation time. It picks one of two [`Profile`]s, which stay fixed
//! until the engine is torn down. Everything else lives in [`FieldConfig`]
//! and is shared by both profiles.

/// Window width (CSS pixels) below which the compact profile is chosen.
pub const COMPACT_BREAKPOINT: f64 = 768.0;

/// Binary device class derived from the window width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceClass {
	/// Narrow viewports (phones, small tablets).
	Compact,
	/// Everything at or above the breakpoint.
	Full,
}

impl DeviceClass {
	/// Classify a window by its inner width.
	pub fn from_viewport_width(width: f64) -> Self {
		if width < COMPACT_BREAKPOINT {
			DeviceClass::Compact
		} else {
			DeviceClass::Full
		}
	}
}

/// Particle count and connection threshold for one engine instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Profile {
	/// Device class this profile was chosen for.
	pub class: DeviceClass,
	/// Number of simulated particles, `N`.
	pub particle_count: usize,
	/// Planar distance below which two particles are connected, `D`.
	pub connection_distance: f32,
}

impl Profile {
	/// Profile used below [`COMPACT_BREAKPOINT`].
	pub const COMPACT: Profile = Profile {
		class: DeviceClass::Compact,
		particle_count: 60,
		connection_distance: 100.0,
	};

	/// Profile used at or above [`COMPACT_BREAKPOINT`].
	pub const FULL: Profile = Profile {
		class: DeviceClass::Full,
		particle_count: 130,
		connection_distance: 140.0,
	};

	pub fn for_class(class: DeviceClass) -> Self {
		match class {
			DeviceClass::Compact => Self::COMPACT,
			DeviceClass::Full => Self::FULL,
		}
	}

	/// Worst-case number of connection segments for this profile.
	pub fn max_connections(&self) -> usize {
		max_connections(self.particle_count)
	}
}

/// Number of unordered pairs among `n` particles, `n·(n−1)/2`.
pub const fn max_connections(n: usize) -> usize {
	n * n.saturating_sub(1) / 2
}

/// Perspective camera parameters.
#[derive(Clone, Debug)]
pub struct CameraConfig {
	/// Vertical field of view in degrees.
	pub fov_degrees: f32,
	pub near: f32,
	pub far: f32,
	/// Distance of the camera from the origin along +z.
	pub distance: f32,
}

/// Profile-independent constants for spawning, motion, parallax and camera.
#[derive(Clone, Debug)]
pub struct FieldConfig {
	/// Spawn box size as a multiple of the surface size on x and y.
	pub spawn_spread: f32,
	/// Spawn box depth on z, centred on zero.
	pub spawn_depth: f32,
	/// Total span of the uniform velocity distribution per axis.
	pub velocity_span: f32,
	/// Positions wrap at this fraction of the surface extents.
	pub wrap_factor: f32,
	/// Parallax target magnitude across the normalized pointer range.
	pub parallax_scale: f32,
	/// Exponential smoothing factor applied to parallax each tick.
	pub parallax_smoothing: f32,
	/// Upper bound on the device pixel ratio used for the drawing buffer.
	pub max_pixel_ratio: f64,
	pub camera: CameraConfig,
}

impl Default for FieldConfig {
	fn default() -> Self {
		Self {
			spawn_spread: 1.6,
			spawn_depth: 120.0,
			velocity_span: 0.25,
			wrap_factor: 0.85,
			parallax_scale: 50.0,
			parallax_smoothing: 0.04,
			max_pixel_ratio: 2.0,
			camera: CameraConfig {
				fov_degrees: 60.0,
				near: 0.1,
				far: 2000.0,
				distance: 350.0,
			},
		}
	}
}
