//! hero-field: animated particle-field background for landing page heroes.
//!
//! This crate provides a WASM-based WebGL component that renders drifting
//! points joined by proximity lines, with pointer parallax and a static
//! fallback when no GPU context is available.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info};

pub mod components;

pub use components::hero_canvas::{HeroCanvas, LifecycleManager, LifecycleState, WebHost};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("hero-field: logging initialized");
}

/// Main application component.
/// A full-height hero section with the particle field behind its content.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="hero-field" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<section
			class="hero"
			style="position: relative; min-height: 100vh; overflow: hidden; background: #050805;"
		>
			<HeroCanvas />
			<div class="hero-overlay" style="position: relative; z-index: 1; pointer-events: none;">
				<h1>"Signal in the noise"</h1>
				<p class="subtitle">"Move the pointer to tilt the field."</p>
			</div>
		</section>
	}
}
