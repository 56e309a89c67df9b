//! Animated particle field for hero backgrounds.
//!
//! Renders drifting points on a WebGL canvas, joined by faint lines whenever
//! two points come within a connection distance, with a gentle parallax that
//! follows the pointer:
//! - Constant-velocity drift with per-axis wraparound
//! - All-pairs proximity graph rebuilt every frame into a fixed-size buffer
//! - Two GPU buffers drawn with an explicit draw range, no per-frame allocation
//! - Smoothed pointer parallax and resize tracking
//! - Idempotent activate/deactivate tied to mount and unmount
//!
//! # Example
//!
//! ```ignore
//! use hero_field::HeroCanvas;
//!
//! view! {
//!     <section style="position: relative; min-height: 100vh;">
//!         <HeroCanvas />
//!         <h1>"Hello"</h1>
//!     </section>
//! }
//! ```

mod camera;
mod component;
pub mod config;
mod error;
mod gl;
mod input;
mod lifecycle;
mod particles;
mod proximity;
mod render;
mod scheduler;
#[cfg(test)]
mod testing;
pub mod theme;
mod web;

pub use camera::Camera;
pub use component::HeroCanvas;
pub use error::EngineError;
pub use gl::{GlProgram, WebGlDevice, probe};
pub use input::{InputTracker, Parallax, Viewport};
pub use lifecycle::{Host, LifecycleManager, LifecycleState, Scene};
pub use particles::{Particle, ParticleField, SpawnExtents, WrapBounds};
pub use proximity::{EdgeBuffer, ProximityGraphBuilder};
pub use render::{DrawParams, GpuDevice, Primitive, Renderer};
pub use scheduler::{AnimationFrameScheduler, FrameScheduler};
pub use theme::Theme;
pub use web::WebHost;
