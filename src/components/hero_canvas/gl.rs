//! WebGL 1 implementation of [`GpuDevice`], plus the capability probe.

use wasm_bindgen::JsCast;
use web_sys::{
	Document, HtmlCanvasElement, WebGlBuffer, WebGlContextAttributes, WebGlPowerPreference,
	WebGlProgram, WebGlRenderingContext as GL, WebGlShader, WebGlUniformLocation,
};

use super::error::EngineError;
use super::input::Viewport;
use super::render::{DrawParams, GpuDevice, Primitive};

const VERTEX_SHADER: &str = r#"
attribute vec3 a_position;
uniform mat4 u_transform;
uniform float u_point_scale;

void main() {
	gl_Position = u_transform * vec4(a_position, 1.0);
	gl_PointSize = u_point_scale / gl_Position.w;
}
"#;

const FRAGMENT_SHADER: &str = r#"
precision mediump float;
uniform vec4 u_color;

void main() {
	gl_FragColor = u_color;
}
"#;

/// Context names tried in order, newest first, by both the probe and the device.
const CONTEXT_KINDS: [&str; 2] = ["webgl", "experimental-webgl"];

/// Whether a throwaway canvas can produce a WebGL context.
///
/// The probe canvas is never attached to the document and is dropped on return.
pub fn probe(document: &Document) -> bool {
	let Ok(element) = document.create_element("canvas") else {
		return false;
	};
	let Ok(canvas) = element.dyn_into::<HtmlCanvasElement>() else {
		return false;
	};
	CONTEXT_KINDS
		.iter()
		.any(|kind| matches!(canvas.get_context(kind), Ok(Some(_))))
}

/// Linked program with its attribute and uniform locations resolved.
pub struct GlProgram {
	program: WebGlProgram,
	position: u32,
	transform: Option<WebGlUniformLocation>,
	color: Option<WebGlUniformLocation>,
	point_scale: Option<WebGlUniformLocation>,
}

/// A WebGL context bound to the canvas it draws into.
pub struct WebGlDevice {
	canvas: HtmlCanvasElement,
	gl: GL,
}

impl WebGlDevice {
	/// Acquire a transparent, non-antialiased context from `canvas`.
	pub fn new(canvas: HtmlCanvasElement) -> Result<Self, EngineError> {
		let attrs = WebGlContextAttributes::new();
		attrs.set_alpha(true);
		attrs.set_antialias(false);
		attrs.set_depth(false);
		attrs.set_premultiplied_alpha(true);
		attrs.set_power_preference(WebGlPowerPreference::HighPerformance);

		let gl: GL = CONTEXT_KINDS
			.iter()
			.find_map(|kind| {
				canvas
					.get_context_with_context_options(kind, &attrs)
					.ok()
					.flatten()
			})
			.ok_or(EngineError::ContextUnavailable)?
			.dyn_into()
			.map_err(|_| EngineError::ContextUnavailable)?;

		gl.disable(GL::DEPTH_TEST);
		gl.enable(GL::BLEND);
		gl.blend_func_separate(
			GL::SRC_ALPHA,
			GL::ONE_MINUS_SRC_ALPHA,
			GL::ONE,
			GL::ONE_MINUS_SRC_ALPHA,
		);

		Ok(Self { canvas, gl })
	}

	fn compile_shader(&self, kind: u32, source: &str) -> Result<WebGlShader, EngineError> {
		let shader = self
			.gl
			.create_shader(kind)
			.ok_or(EngineError::Allocation("shader"))?;
		self.gl.shader_source(&shader, source);
		self.gl.compile_shader(&shader);

		if self
			.gl
			.get_shader_parameter(&shader, GL::COMPILE_STATUS)
			.as_bool()
			.unwrap_or(false)
		{
			Ok(shader)
		} else {
			let log = self.gl.get_shader_info_log(&shader).unwrap_or_default();
			self.gl.delete_shader(Some(&shader));
			Err(EngineError::ShaderCompile(log))
		}
	}

	fn link_program(&self) -> Result<WebGlProgram, EngineError> {
		let vertex = self.compile_shader(GL::VERTEX_SHADER, VERTEX_SHADER)?;
		let fragment = match self.compile_shader(GL::FRAGMENT_SHADER, FRAGMENT_SHADER) {
			Ok(shader) => shader,
			Err(e) => {
				self.gl.delete_shader(Some(&vertex));
				return Err(e);
			}
		};
		let Some(program) = self.gl.create_program() else {
			self.gl.delete_shader(Some(&vertex));
			self.gl.delete_shader(Some(&fragment));
			return Err(EngineError::Allocation("program"));
		};

		self.gl.attach_shader(&program, &vertex);
		self.gl.attach_shader(&program, &fragment);
		self.gl.link_program(&program);

		// Linked programs keep their own copy; shaders are flagged for deletion.
		for shader in [&vertex, &fragment] {
			self.gl.detach_shader(&program, shader);
			self.gl.delete_shader(Some(shader));
		}

		if self
			.gl
			.get_program_parameter(&program, GL::LINK_STATUS)
			.as_bool()
			.unwrap_or(false)
		{
			Ok(program)
		} else {
			let log = self.gl.get_program_info_log(&program).unwrap_or_default();
			self.gl.delete_program(Some(&program));
			Err(EngineError::ProgramLink(log))
		}
	}
}

impl GpuDevice for WebGlDevice {
	type Buffer = WebGlBuffer;
	type Program = GlProgram;

	fn create_program(&self) -> Result<GlProgram, EngineError> {
		let program = self.link_program()?;
		let position = self.gl.get_attrib_location(&program, "a_position");
		if position < 0 {
			self.gl.delete_program(Some(&program));
			return Err(EngineError::ProgramLink("a_position not active".into()));
		}

		Ok(GlProgram {
			position: position as u32,
			transform: self.gl.get_uniform_location(&program, "u_transform"),
			color: self.gl.get_uniform_location(&program, "u_color"),
			point_scale: self.gl.get_uniform_location(&program, "u_point_scale"),
			program,
		})
	}

	fn create_buffer(&self, len: usize) -> Result<WebGlBuffer, EngineError> {
		let buffer = self
			.gl
			.create_buffer()
			.ok_or(EngineError::Allocation("vertex buffer"))?;
		self.gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
		self.gl.buffer_data_with_i32(
			GL::ARRAY_BUFFER,
			(len * size_of::<f32>()) as i32,
			GL::DYNAMIC_DRAW,
		);
		Ok(buffer)
	}

	fn upload(&self, buffer: &WebGlBuffer, data: &[f32]) {
		if data.is_empty() {
			return;
		}
		self.gl.bind_buffer(GL::ARRAY_BUFFER, Some(buffer));
		// SAFETY: the view is consumed by `bufferSubData` before anything can
		// allocate and grow wasm memory underneath it.
		unsafe {
			let view = js_sys::Float32Array::view(data);
			self.gl
				.buffer_sub_data_with_i32_and_array_buffer_view(GL::ARRAY_BUFFER, 0, &view);
		}
	}

	fn resize(&self, viewport: &Viewport) {
		let (width, height) = viewport.buffer_size();
		self.canvas.set_width(width);
		self.canvas.set_height(height);
		let style = self.canvas.style();
		let _ = style.set_property("width", &format!("{}px", viewport.width));
		let _ = style.set_property("height", &format!("{}px", viewport.height));
		self.gl.viewport(0, 0, width as i32, height as i32);
	}

	fn clear(&self, [r, g, b, a]: [f32; 4]) {
		self.gl.clear_color(r, g, b, a);
		self.gl.clear(GL::COLOR_BUFFER_BIT);
	}

	fn draw(
		&self,
		program: &GlProgram,
		buffer: &WebGlBuffer,
		primitive: Primitive,
		vertices: usize,
		params: &DrawParams,
	) {
		self.gl.use_program(Some(&program.program));
		self.gl.bind_buffer(GL::ARRAY_BUFFER, Some(buffer));
		self.gl.enable_vertex_attrib_array(program.position);
		self.gl.vertex_attrib_pointer_with_i32(program.position, 3, GL::FLOAT, false, 0, 0);

		self.gl
			.uniform_matrix4fv_with_f32_array(program.transform.as_ref(), false, &params.transform);
		self.gl.uniform4fv_with_f32_array(program.color.as_ref(), &params.color);
		self.gl.uniform1f(program.point_scale.as_ref(), params.point_scale);

		let mode = match primitive {
			Primitive::Points => GL::POINTS,
			Primitive::Lines => GL::LINES,
		};
		self.gl.draw_arrays(mode, 0, vertices as i32);
	}

	fn delete_buffer(&self, buffer: WebGlBuffer) {
		self.gl.delete_buffer(Some(&buffer));
	}

	fn delete_program(&self, program: GlProgram) {
		self.gl.disable_vertex_attrib_array(program.position);
		self.gl.delete_program(Some(&program.program));
	}
}
