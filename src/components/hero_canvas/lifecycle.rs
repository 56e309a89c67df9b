//! Activation and teardown of the particle field engine.
//!
//! [`LifecycleManager::activate`] probes for a GPU context, then builds the
//! simulation, renderer and input tracking, attaches listeners and starts the
//! frame scheduler. [`LifecycleManager::deactivate`] undoes all of it in
//! reverse and is safe from any partial state, any number of times.
//!
//! Everything runs on one thread. Listeners write only to the shared
//! [`InputTracker`]; the frame tick is the single writer of particle and edge
//! storage.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::config::{DeviceClass, FieldConfig, Profile};
use super::error::EngineError;
use super::input::{InputTracker, Viewport};
use super::particles::{ParticleField, SpawnExtents, WrapBounds};
use super::proximity::ProximityGraphBuilder;
use super::render::{GpuDevice, Renderer};
use super::scheduler::FrameScheduler;
use super::theme::Theme;

/// The environment an engine is mounted into.
pub trait Host {
	/// Owned by the frame tick, which outlives any borrow of the host.
	type Device: GpuDevice + 'static;
	type Scheduler: FrameScheduler;

	/// Whether a GPU drawing context can be obtained at all.
	fn probe(&self) -> bool;

	/// Current surface size and device pixel ratio (uncapped).
	fn viewport(&self) -> Viewport;

	fn device_class(&self) -> DeviceClass;

	/// Seed for particle spawning.
	fn entropy(&self) -> u64;

	/// Create the drawing surface inside the container and bind a device to it.
	fn create_surface(&mut self) -> Result<Self::Device, EngineError>;

	fn create_scheduler(&mut self) -> Self::Scheduler;

	/// Start feeding pointer and resize events into `input`.
	fn attach_listeners(&mut self, input: Rc<RefCell<InputTracker>>) -> Result<(), EngineError>;

	/// Remove listeners. Must tolerate being called with none attached.
	fn detach_listeners(&mut self);

	/// Remove the drawing surface. Must tolerate being called with none attached.
	fn detach_surface(&mut self);

	fn show_fallback(&mut self);

	fn clear_fallback(&mut self);
}

/// Where a [`LifecycleManager`] is in its activation sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleState {
	Inactive,
	Probing,
	/// Simulation running.
	Active,
	/// No usable GPU; only the static fallback is shown.
	Fallback,
}

/// Everything one frame touches, owned by the frame tick.
pub struct Scene<D: GpuDevice> {
	profile: Profile,
	wrap_factor: f32,
	field: ParticleField,
	graph: ProximityGraphBuilder,
	renderer: Renderer<D>,
	frames: u64,
}

impl<D: GpuDevice> Scene<D> {
	/// Advance, reconnect, smooth and draw, strictly in that order.
	pub fn frame(&mut self, input: &mut InputTracker) {
		if let Some(viewport) = input.take_resize() {
			self.renderer.resize(viewport);
		}

		self.field
			.advance(WrapBounds::from_viewport(&input.viewport(), self.wrap_factor));
		self.graph
			.rebuild(self.field.particles(), self.profile.connection_distance);
		let parallax = input.smooth();

		self.renderer
			.upload_frame(self.field.positions(), self.graph.edges());
		self.renderer.render(parallax);
		self.frames += 1;
	}

	pub fn profile(&self) -> Profile {
		self.profile
	}

	pub fn field(&self) -> &ParticleField {
		&self.field
	}

	pub fn graph(&self) -> &ProximityGraphBuilder {
		&self.graph
	}

	pub fn renderer(&self) -> &Renderer<D> {
		&self.renderer
	}

	pub fn frames(&self) -> u64 {
		self.frames
	}
}

/// Sequences construction and teardown of one engine instance.
pub struct LifecycleManager<H: Host> {
	host: H,
	config: FieldConfig,
	theme: Theme,
	state: LifecycleState,
	scene: Option<Rc<RefCell<Scene<H::Device>>>>,
	input: Option<Rc<RefCell<InputTracker>>>,
	scheduler: Option<H::Scheduler>,
	surface_attached: bool,
	listeners_attached: bool,
}

impl<H: Host> LifecycleManager<H> {
	pub fn new(host: H, config: FieldConfig, theme: Theme) -> Self {
		Self {
			host,
			config,
			theme,
			state: LifecycleState::Inactive,
			scene: None,
			input: None,
			scheduler: None,
			surface_attached: false,
			listeners_attached: false,
		}
	}

	/// Probe, construct and start ticking.
	///
	/// A failed probe is not an error: the fallback is shown and
	/// [`LifecycleState::Fallback`] returned. The same happens when the GPU
	/// refuses a context or resources after a successful probe. Any other
	/// construction failure still ends with the fallback shown, but the error
	/// is returned. Calling this on an already activated manager returns the
	/// current state unchanged.
	pub fn activate(&mut self) -> Result<LifecycleState, EngineError> {
		if self.state != LifecycleState::Inactive {
			return Ok(self.state);
		}

		self.state = LifecycleState::Probing;
		if !self.host.probe() {
			info!("hero-field: no GPU context, showing static fallback");
			self.host.show_fallback();
			self.state = LifecycleState::Fallback;
			return Ok(self.state);
		}

		if let Err(e) = self.construct() {
			warn!("hero-field: activation failed, showing static fallback: {}", e);
			self.deactivate();
			self.host.show_fallback();
			self.state = LifecycleState::Fallback;
			return if e.is_capability_failure() {
				Ok(self.state)
			} else {
				Err(e)
			};
		}
		self.state = LifecycleState::Active;
		Ok(self.state)
	}

	fn construct(&mut self) -> Result<(), EngineError> {
		let profile = Profile::for_class(self.host.device_class());
		let viewport = self
			.host
			.viewport()
			.with_pixel_ratio_cap(self.config.max_pixel_ratio);

		self.surface_attached = true;
		let device = self.host.create_surface()?;

		let mut rng = SmallRng::seed_from_u64(self.host.entropy());
		let field = ParticleField::initialize(
			profile.particle_count,
			SpawnExtents::from_viewport(&viewport, &self.config),
			self.config.velocity_span,
			&mut rng,
		);
		let graph = ProximityGraphBuilder::new(profile.particle_count);
		let renderer = Renderer::new(
			device,
			profile.particle_count,
			profile.max_connections(),
			viewport,
			&self.config,
			self.theme.clone(),
		)?;

		let scene = Rc::new(RefCell::new(Scene {
			profile,
			wrap_factor: self.config.wrap_factor,
			field,
			graph,
			renderer,
			frames: 0,
		}));
		let input = Rc::new(RefCell::new(InputTracker::new(viewport, &self.config)));
		self.scene = Some(scene.clone());
		self.input = Some(input.clone());

		self.listeners_attached = true;
		self.host.attach_listeners(input.clone())?;

		let mut scheduler = self.host.create_scheduler();
		scheduler.start(Box::new(move || {
			scene.borrow_mut().frame(&mut input.borrow_mut());
		}));
		self.scheduler = Some(scheduler);

		info!(
			"hero-field: active with {} particles, connection distance {}",
			profile.particle_count, profile.connection_distance
		);
		Ok(())
	}

	/// Stop ticking, detach listeners, release GPU resources and remove the
	/// surface. A no-op when already inactive.
	pub fn deactivate(&mut self) {
		if let Some(mut scheduler) = self.scheduler.take() {
			scheduler.stop();
		}
		if std::mem::take(&mut self.listeners_attached) {
			self.host.detach_listeners();
		}
		self.input = None;
		if let Some(scene) = self.scene.take() {
			scene.borrow_mut().renderer.dispose();
		}
		if std::mem::take(&mut self.surface_attached) {
			self.host.detach_surface();
		}
		if self.state == LifecycleState::Fallback {
			self.host.clear_fallback();
		}
		if self.state != LifecycleState::Inactive {
			debug!("hero-field: deactivated from {:?}", self.state);
		}
		self.state = LifecycleState::Inactive;
	}

	pub fn state(&self) -> LifecycleState {
		self.state
	}

	pub fn host(&self) -> &H {
		&self.host
	}

	/// The running scene, if the simulation is active.
	pub fn scene(&self) -> Option<&Rc<RefCell<Scene<H::Device>>>> {
		self.scene.as_ref()
	}
}

impl<H: Host> Drop for LifecycleManager<H> {
	fn drop(&mut self) {
		self.deactivate();
	}
}
