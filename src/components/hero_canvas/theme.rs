//! Visual theming for the particle field.
//!
//! Colors, point and line styling, and the static fallback shown when no GPU
//! context is available. These are fixed configuration, never derived from
//! simulation state.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}

	/// Normalized `[r, g, b, a]` for shader uniforms (straight alpha).
	pub fn to_gl(self) -> [f32; 4] {
		[
			self.r as f32 / 255.0,
			self.g as f32 / 255.0,
			self.b as f32 / 255.0,
			self.a as f32,
		]
	}
}

/// Point cloud styling.
#[derive(Clone, Debug)]
pub struct PointStyle {
	pub color: Color,
	/// Point size in world units, attenuated by distance to the camera.
	pub size: f32,
	pub opacity: f64,
}

/// Connection line styling.
#[derive(Clone, Debug)]
pub struct LineStyle {
	pub color: Color,
	pub opacity: f64,
}

/// Static visual used when the capability probe fails.
#[derive(Clone, Debug)]
pub struct FallbackStyle {
	pub glow: Color,
	/// Percentage of the ellipse at which the glow reaches transparent.
	pub falloff: u8,
}

impl FallbackStyle {
	/// CSS `background` value for the container.
	pub fn to_css(&self) -> String {
		format!(
			"radial-gradient(ellipse at 50% 50%, {} 0%, transparent {}%)",
			self.glow.to_css(),
			self.falloff
		)
	}
}

/// Complete theme configuration.
#[derive(Clone, Debug)]
pub struct Theme {
	pub point: PointStyle,
	pub line: LineStyle,
	/// Clear color; fully transparent so page content behind shows through.
	pub clear: Color,
	pub fallback: FallbackStyle,
}

/// Terminal green used for both points and lines.
pub const ACCENT: Color = Color::rgb(0, 255, 65);

impl Default for Theme {
	fn default() -> Self {
		Self {
			point: PointStyle {
				color: ACCENT,
				size: 2.2,
				opacity: 0.85,
			},
			line: LineStyle {
				color: ACCENT,
				opacity: 0.18,
			},
			clear: Color::rgba(0, 0, 0, 0.0),
			fallback: FallbackStyle {
				glow: ACCENT.with_alpha(0.06),
				falloff: 70,
			},
		}
	}
}

impl Theme {
	/// Point color with opacity folded into alpha.
	pub fn point_color(&self) -> [f32; 4] {
		self.point.color.with_alpha(self.point.opacity).to_gl()
	}

	/// Line color with opacity folded into alpha.
	pub fn line_color(&self) -> [f32; 4] {
		self.line.color.with_alpha(self.line.opacity).to_gl()
	}
}
