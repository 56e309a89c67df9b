//! Drifting particles with toroidal wraparound.

use rand::Rng;

use super::config::FieldConfig;
use super::input::Viewport;

/// A single drifting particle.
///
/// `z` is fixed at spawn; only x and y move.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Particle {
	pub x: f32,
	pub y: f32,
	pub z: f32,
	pub vx: f32,
	pub vy: f32,
}

impl Particle {
	pub const fn at(x: f32, y: f32) -> Self {
		Self {
			x,
			y,
			z: 0.0,
			vx: 0.0,
			vy: 0.0,
		}
	}
}

/// Origin-centred box particles are seeded into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnExtents {
	pub width: f32,
	pub height: f32,
	pub depth: f32,
}

impl SpawnExtents {
	pub fn from_viewport(viewport: &Viewport, config: &FieldConfig) -> Self {
		Self {
			width: viewport.width as f32 * config.spawn_spread,
			height: viewport.height as f32 * config.spawn_spread,
			depth: config.spawn_depth,
		}
	}
}

/// Per-axis limits; a coordinate past `+x` reappears at `-x` and vice versa.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WrapBounds {
	pub x: f32,
	pub y: f32,
}

impl WrapBounds {
	pub fn from_viewport(viewport: &Viewport, wrap_factor: f32) -> Self {
		Self {
			x: viewport.width as f32 * wrap_factor,
			y: viewport.height as f32 * wrap_factor,
		}
	}
}

/// Owns the particles and a flat `[x, y, z, ...]` mirror ready for upload.
///
/// Both vectors are sized once; [`ParticleField::advance`] only writes into them.
pub struct ParticleField {
	particles: Vec<Particle>,
	positions: Vec<f32>,
}

impl ParticleField {
	/// Seed `count` particles uniformly inside `extents`, each velocity axis
	/// uniform in `±velocity_span / 2`.
	pub fn initialize<R: Rng + ?Sized>(
		count: usize,
		extents: SpawnExtents,
		velocity_span: f32,
		rng: &mut R,
	) -> Self {
		let mut centred = |span: f32| (rng.r#gen::<f32>() - 0.5) * span;
		let particles = (0..count)
			.map(|_| Particle {
				x: centred(extents.width),
				y: centred(extents.height),
				z: centred(extents.depth),
				vx: centred(velocity_span),
				vy: centred(velocity_span),
			})
			.collect();
		Self::from_particles(particles)
	}

	pub fn from_particles(particles: Vec<Particle>) -> Self {
		let mut positions = vec![0.0; particles.len() * 3];
		for (p, out) in particles.iter().zip(positions.chunks_exact_mut(3)) {
			out.copy_from_slice(&[p.x, p.y, p.z]);
		}
		Self {
			particles,
			positions,
		}
	}

	/// Move every particle by its velocity, wrapping each axis independently.
	///
	/// Velocity is never touched, so a wrapped particle keeps drifting the same way.
	pub fn advance(&mut self, bounds: WrapBounds) {
		for (p, out) in self
			.particles
			.iter_mut()
			.zip(self.positions.chunks_exact_mut(3))
		{
			p.x = wrap(p.x + p.vx, bounds.x);
			p.y = wrap(p.y + p.vy, bounds.y);
			out[0] = p.x;
			out[1] = p.y;
			out[2] = p.z;
		}
	}

	pub fn particles(&self) -> &[Particle] {
		&self.particles
	}

	/// Flat positions, three floats per particle.
	pub fn positions(&self) -> &[f32] {
		&self.positions
	}

	pub fn len(&self) -> usize {
		self.particles.len()
	}

	pub fn is_empty(&self) -> bool {
		self.particles.is_empty()
	}
}

fn wrap(value: f32, limit: f32) -> f32 {
	if value > limit {
		-limit
	} else if value < -limit {
		limit
	} else {
		value
	}
}
