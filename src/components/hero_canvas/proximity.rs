//! Proximity graph: which particle pairs are close enough to draw a line.
//!
//! Every tick all unordered pairs are tested on the x/y plane. Connected
//! pairs are written as 3-D segments into an [`EdgeBuffer`] that is sized for
//! the worst case once and never reallocated; only its active prefix is
//! meaningful for the current frame.

use super::config::max_connections;
use super::particles::Particle;

/// Floats per segment: two endpoints of three coordinates.
pub const SEGMENT_STRIDE: usize = 6;

/// Fixed-capacity segment store with an explicit active-length cursor.
pub struct EdgeBuffer {
	data: Vec<f32>,
	capacity: usize,
	active: usize,
}

impl EdgeBuffer {
	pub fn with_capacity(segments: usize) -> Self {
		Self {
			data: vec![0.0; segments * SEGMENT_STRIDE],
			capacity: segments,
			active: 0,
		}
	}

	/// Maximum number of segments, `Cmax`.
	pub fn capacity(&self) -> usize {
		self.capacity
	}

	/// Segments written since the last [`EdgeBuffer::clear`].
	pub fn active_len(&self) -> usize {
		self.active
	}

	/// Reset the cursor; trailing data is left stale.
	pub fn clear(&mut self) {
		self.active = 0;
	}

	/// Append a segment between `a` and `b`. Returns `false` when full.
	pub fn push(&mut self, a: &Particle, b: &Particle) -> bool {
		if self.active == self.capacity {
			return false;
		}
		let base = self.active * SEGMENT_STRIDE;
		self.data[base..base + SEGMENT_STRIDE].copy_from_slice(&[a.x, a.y, a.z, b.x, b.y, b.z]);
		self.active += 1;
		true
	}

	/// The active prefix, six floats per segment.
	pub fn active(&self) -> &[f32] {
		&self.data[..self.active * SEGMENT_STRIDE]
	}

	/// The whole backing store including stale trailing segments.
	pub fn storage(&self) -> &[f32] {
		&self.data
	}

	pub fn segment(&self, index: usize) -> Option<[f32; SEGMENT_STRIDE]> {
		if index >= self.active {
			return None;
		}
		let base = index * SEGMENT_STRIDE;
		self.data[base..base + SEGMENT_STRIDE].try_into().ok()
	}
}

/// Rebuilds the connection segments from particle positions each tick.
pub struct ProximityGraphBuilder {
	edges: EdgeBuffer,
}

impl ProximityGraphBuilder {
	/// Allocate an edge buffer for every pair among `particle_count` particles.
	pub fn new(particle_count: usize) -> Self {
		Self {
			edges: EdgeBuffer::with_capacity(max_connections(particle_count)),
		}
	}

	/// Connect every pair whose squared planar distance is strictly below
	/// `threshold²`. Returns the active edge count for this frame.
	///
	/// Endpoints keep their z so segments sit at the particles' depth.
	pub fn rebuild(&mut self, particles: &[Particle], threshold: f32) -> usize {
		let limit = threshold * threshold;
		self.edges.clear();

		'outer: for (i, a) in particles.iter().enumerate() {
			for b in &particles[i + 1..] {
				let (dx, dy) = (a.x - b.x, a.y - b.y);
				if dx * dx + dy * dy < limit && !self.edges.push(a, b) {
					break 'outer;
				}
			}
		}

		self.edges.active_len()
	}

	pub fn edges(&self) -> &EdgeBuffer {
		&self.edges
	}
}
