//! In-memory stand-ins for the GPU, the frame clock and the host page.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use super::config::DeviceClass;
use super::error::EngineError;
use super::input::{InputTracker, Viewport};
use super::lifecycle::Host;
use super::render::{DrawParams, GpuDevice, Primitive};
use super::scheduler::FrameScheduler;

#[derive(Clone, Debug, PartialEq)]
pub enum DeviceCall {
	CreateProgram(u32),
	CreateBuffer(u32, usize),
	Upload(u32, usize),
	Resize(Viewport),
	Clear([f32; 4]),
	Draw(Primitive, usize, DrawParams),
	DeleteBuffer(u32),
	DeleteProgram(u32),
}

#[derive(Default)]
struct DeviceLog {
	calls: Vec<DeviceCall>,
	live: HashSet<u32>,
	next_id: u32,
	allocation_limit: Option<usize>,
	allocations: usize,
}

/// Records every call and tracks which objects are still alive.
#[derive(Clone, Default)]
pub struct MockDevice {
	log: Rc<RefCell<DeviceLog>>,
}

impl MockDevice {
	/// A device whose allocations fail after the first `limit` succeed.
	pub fn failing_after(limit: usize) -> Self {
		let device = Self::default();
		device.log.borrow_mut().allocation_limit = Some(limit);
		device
	}

	fn allocate(&self, what: &'static str) -> Result<u32, EngineError> {
		let mut log = self.log.borrow_mut();
		if log.allocation_limit.is_some_and(|limit| log.allocations >= limit) {
			return Err(EngineError::Allocation(what));
		}
		log.allocations += 1;
		log.next_id += 1;
		let id = log.next_id;
		log.live.insert(id);
		Ok(id)
	}

	fn record(&self, call: DeviceCall) {
		self.log.borrow_mut().calls.push(call);
	}

	pub fn calls(&self) -> Vec<DeviceCall> {
		self.log.borrow().calls.clone()
	}

	pub fn live_objects(&self) -> usize {
		self.log.borrow().live.len()
	}

	pub fn buffer_sizes(&self) -> Vec<usize> {
		self.filter_calls(|call| match call {
			DeviceCall::CreateBuffer(_, len) => Some(*len),
			_ => None,
		})
	}

	pub fn uploaded_lengths(&self) -> Vec<usize> {
		self.filter_calls(|call| match call {
			DeviceCall::Upload(_, len) => Some(*len),
			_ => None,
		})
	}

	pub fn draws(&self) -> Vec<(Primitive, usize)> {
		self.filter_calls(|call| match call {
			DeviceCall::Draw(primitive, vertices, _) => Some((*primitive, *vertices)),
			_ => None,
		})
	}

	pub fn last_params(&self) -> Option<DrawParams> {
		self.filter_calls(|call| match call {
			DeviceCall::Draw(_, _, params) => Some(*params),
			_ => None,
		})
		.pop()
	}

	fn filter_calls<T>(&self, f: impl FnMut(&DeviceCall) -> Option<T>) -> Vec<T> {
		self.log.borrow().calls.iter().filter_map(f).collect()
	}
}

impl GpuDevice for MockDevice {
	type Buffer = u32;
	type Program = u32;

	fn create_program(&self) -> Result<u32, EngineError> {
		let id = self.allocate("program")?;
		self.record(DeviceCall::CreateProgram(id));
		Ok(id)
	}

	fn create_buffer(&self, len: usize) -> Result<u32, EngineError> {
		let id = self.allocate("vertex buffer")?;
		self.record(DeviceCall::CreateBuffer(id, len));
		Ok(id)
	}

	fn upload(&self, buffer: &u32, data: &[f32]) {
		assert!(self.log.borrow().live.contains(buffer), "upload to freed buffer");
		self.record(DeviceCall::Upload(*buffer, data.len()));
	}

	fn resize(&self, viewport: &Viewport) {
		self.record(DeviceCall::Resize(*viewport));
	}

	fn clear(&self, color: [f32; 4]) {
		self.record(DeviceCall::Clear(color));
	}

	fn draw(
		&self,
		program: &u32,
		buffer: &u32,
		primitive: Primitive,
		vertices: usize,
		params: &DrawParams,
	) {
		let log = self.log.borrow();
		assert!(log.live.contains(program) && log.live.contains(buffer), "draw with freed object");
		drop(log);
		self.record(DeviceCall::Draw(primitive, vertices, *params));
	}

	fn delete_buffer(&self, buffer: u32) {
		assert!(self.log.borrow_mut().live.remove(&buffer), "double free");
		self.record(DeviceCall::DeleteBuffer(buffer));
	}

	fn delete_program(&self, program: u32) {
		assert!(self.log.borrow_mut().live.remove(&program), "double free");
		self.record(DeviceCall::DeleteProgram(program));
	}
}

/// Scheduler whose frames are fired by hand.
#[derive(Clone, Default)]
pub struct ManualScheduler {
	tick: Rc<RefCell<Option<Box<dyn FnMut()>>>>,
}

impl ManualScheduler {
	/// Run one frame. Returns `false` when nothing is scheduled.
	pub fn fire(&self) -> bool {
		match self.tick.borrow_mut().as_mut() {
			Some(tick) => {
				tick();
				true
			}
			None => false,
		}
	}
}

impl FrameScheduler for ManualScheduler {
	fn start(&mut self, tick: Box<dyn FnMut()>) {
		*self.tick.borrow_mut() = Some(tick);
	}

	fn stop(&mut self) {
		self.tick.borrow_mut().take();
	}

	fn is_running(&self) -> bool {
		self.tick.borrow().is_some()
	}
}

#[derive(Debug, Default, PartialEq)]
pub struct HostLog {
	pub surfaces_created: usize,
	pub surfaces_detached: usize,
	pub listeners_attached: usize,
	pub listeners_detached: usize,
	pub fallbacks_shown: usize,
	pub fallbacks_cleared: usize,
}

/// Host with a scripted probe result and observable side effects.
pub struct MockHost {
	pub supports_gpu: bool,
	pub viewport: Viewport,
	pub class: DeviceClass,
	pub device: MockDevice,
	pub scheduler: ManualScheduler,
	pub fail_surface: bool,
	pub fail_listeners: bool,
	pub log: HostLog,
	pub input: Option<Rc<RefCell<InputTracker>>>,
}

impl MockHost {
	pub fn new(supports_gpu: bool) -> Self {
		Self {
			supports_gpu,
			viewport: Viewport::new(1280.0, 720.0, 1.0),
			class: DeviceClass::Full,
			device: MockDevice::default(),
			scheduler: ManualScheduler::default(),
			fail_surface: false,
			fail_listeners: false,
			log: HostLog::default(),
			input: None,
		}
	}
}

impl Host for MockHost {
	type Device = MockDevice;
	type Scheduler = ManualScheduler;

	fn probe(&self) -> bool {
		self.supports_gpu
	}

	fn viewport(&self) -> Viewport {
		self.viewport
	}

	fn device_class(&self) -> DeviceClass {
		self.class
	}

	fn entropy(&self) -> u64 {
		0x5eed
	}

	fn create_surface(&mut self) -> Result<MockDevice, EngineError> {
		self.log.surfaces_created += 1;
		if self.fail_surface {
			return Err(EngineError::ContextUnavailable);
		}
		Ok(self.device.clone())
	}

	fn create_scheduler(&mut self) -> ManualScheduler {
		self.scheduler.clone()
	}

	fn attach_listeners(&mut self, input: Rc<RefCell<InputTracker>>) -> Result<(), EngineError> {
		if self.fail_listeners {
			return Err(EngineError::Js("addEventListener threw".into()));
		}
		self.log.listeners_attached += 1;
		self.input = Some(input);
		Ok(())
	}

	fn detach_listeners(&mut self) {
		self.log.listeners_detached += 1;
		self.input = None;
	}

	fn detach_surface(&mut self) {
		self.log.surfaces_detached += 1;
	}

	fn show_fallback(&mut self) {
		self.log.fallbacks_shown += 1;
	}

	fn clear_fallback(&mut self) {
		self.log.fallbacks_cleared += 1;
	}
}
