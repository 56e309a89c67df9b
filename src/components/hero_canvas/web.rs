//! Browser [`Host`]: a container element in the page, window listeners and
//! `requestAnimationFrame`.

use std::cell::RefCell;
use std::rc::Rc;

use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{
	AddEventListenerOptions, Document, HtmlCanvasElement, HtmlElement, MouseEvent, Node, Window,
};

use super::config::DeviceClass;
use super::error::EngineError;
use super::gl::{self, WebGlDevice};
use super::input::{InputTracker, Viewport};
use super::lifecycle::Host;
use super::scheduler::AnimationFrameScheduler;
use super::theme::FallbackStyle;

/// Pointer and resize closures registered on the window.
struct Listeners {
	pointer: Closure<dyn FnMut(MouseEvent)>,
	resize: Closure<dyn FnMut()>,
}

/// Mounts the engine into `container`.
pub struct WebHost {
	window: Window,
	document: Document,
	container: HtmlElement,
	fallback: FallbackStyle,
	canvas: Option<HtmlCanvasElement>,
	listeners: Option<Listeners>,
}

impl WebHost {
	pub fn new(container: HtmlElement, fallback: FallbackStyle) -> Result<Self, EngineError> {
		let window = web_sys::window().ok_or(EngineError::MissingGlobal("window"))?;
		let document = window
			.document()
			.ok_or(EngineError::MissingGlobal("document"))?;
		Ok(Self {
			window,
			document,
			container,
			fallback,
			canvas: None,
			listeners: None,
		})
	}
}

fn window_size(window: &Window) -> (f64, f64) {
	let dimension = |value: Result<JsValue, JsValue>| {
		value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
	};
	(dimension(window.inner_width()), dimension(window.inner_height()))
}

fn surface_viewport(window: &Window, container: &HtmlElement) -> Viewport {
	Viewport::new(
		container.client_width() as f64,
		container.client_height() as f64,
		window.device_pixel_ratio(),
	)
}

fn passive() -> AddEventListenerOptions {
	let options = AddEventListenerOptions::new();
	options.set_passive(true);
	options
}

impl Host for WebHost {
	type Device = WebGlDevice;
	type Scheduler = AnimationFrameScheduler;

	fn probe(&self) -> bool {
		gl::probe(&self.document)
	}

	fn viewport(&self) -> Viewport {
		surface_viewport(&self.window, &self.container)
	}

	fn device_class(&self) -> DeviceClass {
		DeviceClass::from_viewport_width(window_size(&self.window).0)
	}

	fn entropy(&self) -> u64 {
		let noise = (js_sys::Math::random() * u32::MAX as f64) as u64;
		((js_sys::Date::now() as u64) << 20) ^ noise
	}

	fn create_surface(&mut self) -> Result<WebGlDevice, EngineError> {
		let canvas: HtmlCanvasElement = self
			.document
			.create_element("canvas")?
			.dyn_into()
			.map_err(|_| EngineError::Allocation("canvas element"))?;
		let _ = canvas.style().set_property("display", "block");
		self.container.append_child(&canvas)?;
		self.canvas = Some(canvas.clone());

		WebGlDevice::new(canvas)
	}

	fn create_scheduler(&mut self) -> AnimationFrameScheduler {
		AnimationFrameScheduler::new(self.window.clone())
	}

	fn attach_listeners(&mut self, input: Rc<RefCell<InputTracker>>) -> Result<(), EngineError> {
		self.detach_listeners();

		let (input_pointer, window_pointer) = (input.clone(), self.window.clone());
		let pointer = Closure::new(move |ev: MouseEvent| {
			let (w, h) = window_size(&window_pointer);
			if let Ok(mut input) = input_pointer.try_borrow_mut() {
				input.pointer_moved(ev.client_x() as f64, ev.client_y() as f64, w, h);
			}
		});

		let (window_resize, container) = (self.window.clone(), self.container.clone());
		let resize = Closure::new(move || {
			if let Ok(mut input) = input.try_borrow_mut() {
				input.surface_resized(surface_viewport(&window_resize, &container));
			}
		});

		let options = passive();
		let listeners = Listeners { pointer, resize };
		let pointer_added = self
			.window
			.add_event_listener_with_callback_and_add_event_listener_options(
				"mousemove",
				listeners.pointer.as_ref().unchecked_ref(),
				&options,
			);
		let resize_added = self
			.window
			.add_event_listener_with_callback_and_add_event_listener_options(
				"resize",
				listeners.resize.as_ref().unchecked_ref(),
				&options,
			);
		// Keep the closures alive even on partial failure so detach can remove them.
		self.listeners = Some(listeners);
		pointer_added?;
		resize_added?;
		Ok(())
	}

	fn detach_listeners(&mut self) {
		let Some(listeners) = self.listeners.take() else {
			return;
		};
		for (event, callback) in [
			("mousemove", listeners.pointer.as_ref()),
			("resize", listeners.resize.as_ref()),
		] {
			if let Err(e) = self
				.window
				.remove_event_listener_with_callback(event, callback.unchecked_ref())
			{
				warn!("hero-field: failed to remove {} listener: {:?}", event, e);
			}
		}
	}

	fn detach_surface(&mut self) {
		let Some(canvas) = self.canvas.take() else {
			return;
		};
		let node: &Node = &canvas;
		if self.container.contains(Some(node)) {
			let _ = self.container.remove_child(&canvas);
		}
	}

	fn show_fallback(&mut self) {
		let _ = self
			.container
			.style()
			.set_property("background", &self.fallback.to_css());
	}

	fn clear_fallback(&mut self) {
		let _ = self.container.style().remove_property("background");
	}
}
