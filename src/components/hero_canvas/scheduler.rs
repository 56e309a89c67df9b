//! Per-frame scheduling.
//!
//! [`FrameScheduler`] keeps the engine independent of the host's frame
//! primitive. [`AnimationFrameScheduler`] drives ticks from
//! `requestAnimationFrame`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::Window;

/// Invokes a tick once per display frame between `start` and `stop`.
pub trait FrameScheduler {
	/// Begin ticking. Replaces any tick from an earlier `start`.
	fn start(&mut self, tick: Box<dyn FnMut()>);

	/// Cancel ticking. No tick runs after this returns.
	fn stop(&mut self);

	fn is_running(&self) -> bool;
}

/// Decides whether a delivered frame may tick.
#[derive(Default)]
struct TickGate {
	running: Cell<bool>,
	in_tick: Cell<bool>,
}

impl TickGate {
	/// Run `tick` unless stopped. Returns whether another frame is wanted.
	///
	/// A frame queued before `stop` may still be delivered once; it is
	/// swallowed here.
	fn pass(&self, tick: &mut dyn FnMut()) -> bool {
		if !self.running.get() {
			return false;
		}
		self.in_tick.set(true);
		tick();
		self.in_tick.set(false);
		self.running.get()
	}
}

/// State shared between the scheduler and its frame callback.
#[derive(Default)]
struct LoopState {
	gate: TickGate,
	handle: Cell<Option<i32>>,
	callback: RefCell<Option<Closure<dyn FnMut()>>>,
}

/// [`FrameScheduler`] backed by `requestAnimationFrame`.
pub struct AnimationFrameScheduler {
	window: Window,
	state: Rc<LoopState>,
}

impl AnimationFrameScheduler {
	pub fn new(window: Window) -> Self {
		Self {
			window,
			state: Rc::new(LoopState::default()),
		}
	}
}

fn request_frame(window: &Window, state: &LoopState) {
	let Some(ref cb) = *state.callback.borrow() else {
		return;
	};
	match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
		Ok(handle) => state.handle.set(Some(handle)),
		Err(e) => {
			warn!("hero-field: requestAnimationFrame failed: {:?}", e);
			state.gate.running.set(false);
		}
	}
}

impl FrameScheduler for AnimationFrameScheduler {
	fn start(&mut self, mut tick: Box<dyn FnMut()>) {
		self.stop();

		let (state, window) = (self.state.clone(), self.window.clone());
		*self.state.callback.borrow_mut() = Some(Closure::new(move || {
			state.handle.set(None);
			if state.gate.pass(&mut *tick) {
				request_frame(&window, &state);
			}
		}));

		self.state.gate.running.set(true);
		request_frame(&self.window, &self.state);
	}

	fn stop(&mut self) {
		self.state.gate.running.set(false);
		if let Some(handle) = self.state.handle.take() {
			let _ = self.window.cancel_animation_frame(handle);
		}
		// The callback cannot be dropped while it is executing. When stopped
		// from inside a tick it stays parked, inert, until the next `start`.
		if !self.state.gate.in_tick.get() {
			self.state.callback.borrow_mut().take();
		}
	}

	fn is_running(&self) -> bool {
		self.state.gate.running.get()
	}
}

/// Stops the loop and frees the callback.
///
/// Dropping the scheduler from inside its own tick leaks the parked callback
/// and the state it holds, since the closure cannot free itself while it runs.
/// [`LifecycleManager`](super::LifecycleManager) only tears down from outside
/// the tick.
impl Drop for AnimationFrameScheduler {
	fn drop(&mut self) {
		self.stop();
	}
}
