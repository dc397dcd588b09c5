//! Window host: winit event loop, GPU backend and the mounted page.

use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::config::PageConfig;
use crate::content::Content;
use crate::draw::DrawList;
use crate::error::RunError;
use crate::frame_loop::FrameClock;
use crate::gpu::GpuState;
use crate::input::{Input, InputAction};
use crate::page::{Listener, Page};
use crate::signals::{Signal, SignalHub};
use crate::surface::Viewport;

/// Open the page window and run until it is closed.
///
/// Content comes from `config.content` when set, otherwise the built-in
/// project list is used.
pub fn run(config: PageConfig) -> Result<(), RunError> {
    let content = match &config.content {
        Some(path) => Content::load(path)?,
        None => Content::default(),
    };

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config, content);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct App {
    config: PageConfig,
    /// Moved into the page on mount.
    content: Option<Content>,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    page: Option<Page>,
    hub: SignalHub<Listener>,
    input: Input,
    clock: FrameClock,
    draw_list: DrawList,
    error: Option<RunError>,
}

impl App {
    fn new(config: PageConfig, content: Content) -> Self {
        Self {
            config,
            content: Some(content),
            window: None,
            gpu: None,
            page: None,
            hub: SignalHub::new(),
            input: Input::default(),
            clock: FrameClock::new(),
            draw_list: DrawList::with_capacity(512),
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), RunError> {
        let settings = &self.config.window;
        let window_attrs = Window::default_attributes()
            .with_title(settings.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(settings.width, settings.height));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let gpu = pollster::block_on(GpuState::new(window.clone()))?;

        let size = window.inner_size();
        let viewport = Viewport::from_physical(size.width, size.height, window.scale_factor());
        self.input.set_viewport(viewport);

        let content = self.content.take().unwrap_or_default();
        let mut rng = SmallRng::from_entropy();
        let page = Page::mount(self.config.clone(), content, viewport, &mut self.hub, &mut rng);

        self.clock = FrameClock::new();
        self.window = Some(window);
        self.gpu = Some(gpu);
        self.page = Some(page);
        Ok(())
    }

    fn dispatch(&mut self, signal: Option<Signal>) {
        if let (Some(page), Some(signal)) = (&mut self.page, signal) {
            page.signal(&self.hub, signal);
        }
    }

    fn handle_input(&mut self, action: InputAction) {
        let signal = match action {
            InputAction::PointerMoved(position) => Some(Signal::PointerMove { position }),
            InputAction::PointerLeft => Some(Signal::PointerLeave),
            InputAction::Scroll(command) => self.page.as_mut().and_then(|page| page.apply_scroll(command)),
        };
        self.dispatch(signal);
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(page), Some(gpu)) = (&mut self.page, &mut self.gpu) else {
            return;
        };
        self.clock.update();
        self.draw_list.reset();
        if !page.frame(self.clock.now(), &mut self.draw_list) {
            return;
        }

        match gpu.render(&self.draw_list) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                tracing::error!("GPU out of memory, closing window");
                event_loop.exit();
            }
            Err(e) => tracing::warn!(error = ?e, "render error"),
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(page) = &mut self.page {
            page.teardown(&mut self.hub);
        }
        tracing::debug!(frames = self.clock.frame(), fps = self.clock.fps(), "window closing");
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.init(event_loop) {
            tracing::error!(error = %err, "failed to start page window");
            self.error = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::Resized(physical_size) => {
                let Some(window) = &self.window else {
                    return;
                };
                let scale_factor = window.scale_factor();
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(physical_size, scale_factor);
                }
                let viewport =
                    Viewport::from_physical(physical_size.width, physical_size.height, scale_factor);
                self.input.set_viewport(viewport);
                self.dispatch(Some(Signal::Resize(viewport)));
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                // A Resized event with the new physical size follows.
                tracing::debug!(scale_factor, "scale factor changed");
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            other => {
                if let Some(action) = self.input.handle_event(&other) {
                    self.handle_input(action);
                }
            }
        }
    }
}
