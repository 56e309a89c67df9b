//! Leptos component hosting the particle field.
//!
//! The component renders an empty, absolutely positioned container. Once the
//! container is mounted the engine is activated inside it; when the owning
//! scope is cleaned up the engine is deactivated, which stops the frame loop,
//! removes listeners, frees GPU buffers and detaches the canvas.

use leptos::prelude::*;
use log::{debug, warn};
use web_sys::HtmlElement;

use super::config::FieldConfig;
use super::lifecycle::LifecycleManager;
use super::theme::Theme;
use super::web::WebHost;

/// Animated particle field meant to sit behind hero content.
///
/// Place it inside a positioned parent; it fills the parent and ignores
/// pointer hit-testing for layout purposes (`aria-hidden`). Without WebGL the
/// container shows a static radial glow instead.
#[component]
pub fn HeroCanvas() -> impl IntoView {
	let container_ref = NodeRef::<leptos::html::Div>::new();
	let engine = StoredValue::new_local(None::<LifecycleManager<WebHost>>);

	Effect::new(move |_| {
		let Some(container) = container_ref.get() else {
			return;
		};
		if engine.with_value(Option::is_some) {
			return;
		}
		let container: HtmlElement = container.into();

		let theme = Theme::default();
		let host = match WebHost::new(container, theme.fallback.clone()) {
			Ok(host) => host,
			Err(e) => {
				warn!("hero-field: cannot mount: {}", e);
				return;
			}
		};

		let mut manager = LifecycleManager::new(host, FieldConfig::default(), theme);
		match manager.activate() {
			Ok(state) => debug!("hero-field: mounted in state {:?}", state),
			Err(e) => warn!("hero-field: mounted static fallback: {}", e),
		}
		// Kept even on failure so cleanup removes the fallback style.
		engine.set_value(Some(manager));
	});

	on_cleanup(move || {
		engine.try_update_value(|slot| {
			if let Some(mut manager) = slot.take() {
				manager.deactivate();
			}
		});
	});

	view! {
		<div
			node_ref=container_ref
			class="hero-canvas"
			aria-hidden="true"
			style="position: absolute; inset: 0; cursor: default;"
		/>
	}
}
