//! Error types for the hero canvas engine.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errors raised while building or driving the particle field.
///
/// A missing GPU context detected by the capability probe is not reported
/// through this type; the lifecycle falls back to a static visual instead.
/// See [`EngineError::is_capability_failure`] for failures after the probe.
#[derive(Debug, Error)]
pub enum EngineError {
	/// The surface refused to hand out a WebGL context.
	#[error("GPU drawing context unavailable")]
	ContextUnavailable,

	/// A browser global (window, document) was not present.
	#[error("missing browser global: {0}")]
	MissingGlobal(&'static str),

	/// A shader stage failed to compile.
	#[error("shader compile failed: {0}")]
	ShaderCompile(String),

	/// The shader program failed to link.
	#[error("program link failed: {0}")]
	ProgramLink(String),

	/// The device could not allocate a GPU object.
	#[error("failed to allocate {0}")]
	Allocation(&'static str),

	/// A DOM or WebGL call threw.
	#[error("javascript error: {0}")]
	Js(String),
}

impl EngineError {
	/// Whether the GPU itself refused to cooperate, as opposed to the page.
	///
	/// These end in the static fallback exactly like a failed probe.
	pub fn is_capability_failure(&self) -> bool {
		matches!(
			self,
			Self::ContextUnavailable
				| Self::ShaderCompile(_)
				| Self::ProgramLink(_)
				| Self::Allocation(_)
		)
	}
}

impl From<JsValue> for EngineError {
	fn from(value: JsValue) -> Self {
		Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
	}
}
