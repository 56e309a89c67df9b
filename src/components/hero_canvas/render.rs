//! Buffer-backed rendering of the point cloud and connection segments.
//!
//! The [`Renderer`] owns two GPU vertex buffers, sized once: one for the `N`
//! particle positions and one for the `Cmax` connection segments. Each frame
//! the active data is uploaded and the segment draw range is set to the
//! active prefix, so stale trailing segments are never rasterized. Both
//! buffers share one transform, the parallax-offset group.
//!
//! GPU access goes through [`GpuDevice`]; the browser implementation lives in
//! `gl.rs`.

use log::debug;

use super::camera::Camera;
use super::config::FieldConfig;
use super::error::EngineError;
use super::input::{Parallax, Viewport};
use super::proximity::{EdgeBuffer, SEGMENT_STRIDE};
use super::theme::Theme;

/// Primitive topology of a draw call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Primitive {
	Points,
	Lines,
}

/// Uniform values for one draw call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawParams {
	/// Column-major model-view-projection matrix.
	pub transform: [f32; 16],
	/// Straight-alpha RGBA.
	pub color: [f32; 4],
	/// Point size numerator; the vertex stage divides by clip w.
	pub point_scale: f32,
}

/// The slice of a GPU API the renderer needs.
///
/// Buffers hold `f32` vertex data, three floats per vertex.
pub trait GpuDevice {
	type Buffer;
	type Program;

	fn create_program(&self) -> Result<Self::Program, EngineError>;

	/// Allocate a dynamic vertex buffer holding `len` floats.
	fn create_buffer(&self, len: usize) -> Result<Self::Buffer, EngineError>;

	/// Write `data` to the start of `buffer`.
	fn upload(&self, buffer: &Self::Buffer, data: &[f32]);

	/// Resize the drawing buffer and viewport.
	fn resize(&self, viewport: &Viewport);

	fn clear(&self, color: [f32; 4]);

	/// Draw the first `vertices` vertices of `buffer`.
	fn draw(
		&self,
		program: &Self::Program,
		buffer: &Self::Buffer,
		primitive: Primitive,
		vertices: usize,
		params: &DrawParams,
	);

	fn delete_buffer(&self, buffer: Self::Buffer);

	fn delete_program(&self, program: Self::Program);
}

/// GPU objects released together by [`Renderer::dispose`].
struct GpuResources<D: GpuDevice> {
	program: D::Program,
	points: D::Buffer,
	edges: D::Buffer,
}

/// Owns the GPU buffers and camera; uploads and draws one frame at a time.
pub struct Renderer<D: GpuDevice> {
	device: D,
	resources: Option<GpuResources<D>>,
	camera: Camera,
	theme: Theme,
	viewport: Viewport,
	point_count: usize,
	edge_capacity: usize,
	/// Vertices of the edge buffer to draw, two per active segment.
	edge_draw_range: usize,
}

impl<D: GpuDevice> Renderer<D> {
	/// Allocate buffers for `point_count` particles and `edge_capacity` segments.
	///
	/// Anything allocated before a failure is released before returning.
	pub fn new(
		device: D,
		point_count: usize,
		edge_capacity: usize,
		viewport: Viewport,
		config: &FieldConfig,
		theme: Theme,
	) -> Result<Self, EngineError> {
		let program = device.create_program()?;
		let points = match device.create_buffer(point_count * 3) {
			Ok(buffer) => buffer,
			Err(e) => {
				device.delete_program(program);
				return Err(e);
			}
		};
		let edges = match device.create_buffer(edge_capacity * SEGMENT_STRIDE) {
			Ok(buffer) => buffer,
			Err(e) => {
				device.delete_buffer(points);
				device.delete_program(program);
				return Err(e);
			}
		};
		device.resize(&viewport);
		debug!(
			"hero-field: renderer ready ({} points, {} segment slots)",
			point_count, edge_capacity
		);

		Ok(Self {
			camera: Camera::new(&config.camera, viewport.aspect()),
			device,
			resources: Some(GpuResources {
				program,
				points,
				edges,
			}),
			theme,
			viewport,
			point_count,
			edge_capacity,
			edge_draw_range: 0,
		})
	}

	/// Upload this frame's positions and active segments, and set the draw range.
	pub fn upload_frame(&mut self, positions: &[f32], edges: &EdgeBuffer) {
		let Some(res) = &self.resources else {
			return;
		};
		let positions = &positions[..positions.len().min(self.point_count * 3)];
		let active = edges.active_len().min(self.edge_capacity);

		self.device.upload(&res.points, positions);
		self.device.upload(&res.edges, &edges.active()[..active * SEGMENT_STRIDE]);
		self.edge_draw_range = active * 2;
	}

	/// Clear and draw both layers with the group offset by `parallax`.
	pub fn render(&self, parallax: Parallax) {
		let Some(res) = &self.resources else {
			return;
		};
		let transform = self.camera.group_transform(parallax).to_cols_array();
		let (_, buffer_height) = self.viewport.buffer_size();

		self.device.clear(self.theme.clear.to_gl());

		if self.edge_draw_range > 0 {
			self.device.draw(
				&res.program,
				&res.edges,
				Primitive::Lines,
				self.edge_draw_range,
				&DrawParams {
					transform,
					color: self.theme.line_color(),
					point_scale: 0.0,
				},
			);
		}
		if self.point_count > 0 {
			self.device.draw(
				&res.program,
				&res.points,
				Primitive::Points,
				self.point_count,
				&DrawParams {
					transform,
					color: self.theme.point_color(),
					point_scale: self.theme.point.size * buffer_height as f32 / 2.0,
				},
			);
		}
	}

	/// Apply a new surface size to the drawing buffer and camera aspect.
	pub fn resize(&mut self, viewport: Viewport) {
		self.viewport = viewport;
		self.camera.set_aspect(viewport.aspect());
		if self.resources.is_some() {
			self.device.resize(&viewport);
		}
	}

	/// Release all GPU objects. Calling it again does nothing.
	pub fn dispose(&mut self) {
		if let Some(res) = self.resources.take() {
			self.device.delete_buffer(res.points);
			self.device.delete_buffer(res.edges);
			self.device.delete_program(res.program);
			self.edge_draw_range = 0;
			debug!("hero-field: renderer disposed");
		}
	}

	pub fn is_disposed(&self) -> bool {
		self.resources.is_none()
	}

	/// Number of edge-buffer vertices the next draw will read.
	pub fn edge_draw_range(&self) -> usize {
		self.edge_draw_range
	}

	pub fn camera(&self) -> &Camera {
		&self.camera
	}
}

impl<D: GpuDevice> Drop for Renderer<D> {
	fn drop(&mut self) {
		self.dispose();
	}
}
