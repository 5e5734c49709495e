//! The game loop: a winit application that owns the window, the GPU context
//! and one [`Game`], and drives it through process-input, update and render
//! on every redraw.

use std::error::Error;
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, error, info};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{DeviceEvent, DeviceId, ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use super::graphics::{GpuContext, GpuError};
use super::input::InputHandler;

pub trait Game {
    fn process_input(&mut self, input: &mut InputHandler, delta_secs: f32);

    fn update(&mut self, delta_secs: f32, elapsed_secs: f32);

    fn render(&mut self, gpu: &GpuContext) -> Result<(), GpuError>;

    fn resize(&mut self, size: PhysicalSize<u32>);

    fn should_continue(&self) -> bool {
        true
    }

    /// Called once, before the game is dropped.
    fn destroy(&mut self);
}

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("event loop failed")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window")]
    Window(#[from] winit::error::OsError),

    #[error(transparent)]
    Gpu(#[from] GpuError),

    #[error("game failed to start: {0}")]
    Game(Box<dyn Error>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    pub delta_secs: f32,
    pub elapsed_secs: f32,
    pub frame_index: u64,
    /// Set once per second: frames per second over the last second.
    pub fps: Option<f32>,
}

/// Delta time is clamped so a stall (debugger, minimised window) does not
/// move everything by seconds at once.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
    fps_window_start: Instant,
    fps_frames: u32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    fn starting_at(now: Instant) -> Self {
        Self {
            start: now,
            last: now,
            frame_index: 0,
            dt_min: Duration::from_micros(100),
            dt_max: Duration::from_millis(250),
            fps_window_start: now,
            fps_frames: 0,
        }
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);
        self.last = now;

        self.fps_frames += 1;
        let window = now.saturating_duration_since(self.fps_window_start);
        let fps = (window >= Duration::from_secs(1)).then(|| {
            let fps = self.fps_frames as f32 / window.as_secs_f32();
            self.fps_window_start = now;
            self.fps_frames = 0;
            fps
        });

        let time = FrameTime {
            delta_secs: dt.as_secs_f32(),
            elapsed_secs: now.saturating_duration_since(self.start).as_secs_f32(),
            frame_index: self.frame_index,
            fps,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        time
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

type GameFactory<G> = Box<dyn FnMut(&GpuContext) -> Result<G, Box<dyn Error>>>;

/// Owns the window and runs one game in it until the window closes, Escape
/// is pressed or the game stops continuing.
pub struct Engine<G: Game> {
    settings: WindowSettings,
    factory: GameFactory<G>,
    input: InputHandler,
    clock: FrameClock,
    // dropped before the GPU context it draws with
    game: Option<G>,
    gpu: Option<GpuContext>,
    window: Option<Arc<Window>>,
    error: Option<RuntimeError>,
}

impl<G: Game> Engine<G> {
    pub fn new(
        settings: WindowSettings,
        factory: impl FnMut(&GpuContext) -> Result<G, Box<dyn Error>> + 'static,
    ) -> Self {
        Self {
            settings,
            factory: Box::new(factory),
            input: InputHandler::new(),
            clock: FrameClock::new(),
            game: None,
            gpu: None,
            window: None,
            error: None,
        }
    }

    pub fn run(mut self) -> Result<(), RuntimeError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self)?;
        match self.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<(), RuntimeError> {
        let attributes = Window::default_attributes()
            .with_title(self.settings.title.clone())
            .with_inner_size(LogicalSize::new(self.settings.width, self.settings.height));
        let window = Arc::new(event_loop.create_window(attributes)?);
        info!("Created window \"{}\"", self.settings.title);

        let gpu = pollster::block_on(GpuContext::new(window.clone()))?;
        let game = (self.factory)(&gpu).map_err(RuntimeError::Game)?;
        info!("Game started");

        self.clock = FrameClock::new();
        window.request_redraw();
        self.window = Some(window);
        self.gpu = Some(gpu);
        self.game = Some(game);
        Ok(())
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(game), Some(gpu)) = (self.game.as_mut(), self.gpu.as_ref()) else {
            return;
        };

        let time = self.clock.tick();
        if let Some(fps) = time.fps {
            debug!("{fps:.1} fps (frame {})", time.frame_index);
        }

        game.process_input(&mut self.input, time.delta_secs);
        if self.input.close_requested() || !game.should_continue() {
            self.shutdown(event_loop);
            return;
        }

        game.update(time.delta_secs, time.elapsed_secs);
        if let Err(err) = game.render(gpu) {
            error!("Render failed: {err}");
            self.error = Some(err.into());
            self.shutdown(event_loop);
            return;
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(mut game) = self.game.take() {
            info!("Shutting down");
            game.destroy();
        }
        event_loop.exit();
    }
}

impl<G: Game> ApplicationHandler for Engine<G> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.start(event_loop) {
            error!("Startup failed: {err}");
            self.error = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::RedrawRequested => self.frame(event_loop),
            WindowEvent::Resized(size) => {
                if let Some(gpu) = self.gpu.as_mut() {
                    gpu.resize(size);
                }
                if let Some(game) = self.game.as_mut() {
                    game.resize(size);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(keycode) = event.physical_key {
                    self.input
                        .handle_keyboard_input_event(keycode, event.state == ElementState::Pressed);
                }
            }
            WindowEvent::Focused(focused) => {
                if let Some(window) = &self.window {
                    self.input.handle_window_focus(focused, window);
                }
            }
            _ => (),
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.input.handle_mouse_motion(delta);
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(mut game) = self.game.take() {
            game.destroy();
        }
    }
}
