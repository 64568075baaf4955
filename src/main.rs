//! Starwater - An animated water surface under a starry sky
//!
//! Swells roll across the plane, chop digs into them, and the crests catch
//! the stars. Drag to orbit, scroll to zoom, arrow keys to tune the waves.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalPosition,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use starwater::camera::OrbitCamera;
use starwater::cli::Args;
use starwater::controls::{log_params, ControlAction, ControlPanel};
use starwater::environment::EnvironmentSlot;
use starwater::params::{
    format_hex_color, CameraSettings, RenderConfig, SnapshotConfig, WaterParams,
};
use starwater::rendering::{RenderSystem, SkyUniforms, WaterUniforms};
use starwater::snapshot::write_snapshot;
use starwater::viewport::Viewport;
use starwater::water::{FrameState, WaterSystem, WaveField};

/// Rolling frame-time average, logged once per second
struct FpsTracker {
    frame_times: VecDeque<Duration>,
    last_frame: Instant,
    last_report: Instant,
}

impl FpsTracker {
    fn new() -> Self {
        let now = Instant::now();
        Self {
            frame_times: VecDeque::new(),
            last_frame: now,
            last_report: now,
        }
    }

    fn record_frame(&mut self) {
        let now = Instant::now();
        self.frame_times.push_back(now - self.last_frame);
        self.last_frame = now;
        if self.frame_times.len() > 60 {
            self.frame_times.pop_front();
        }

        if now - self.last_report > Duration::from_secs(1) {
            let total: Duration = self.frame_times.iter().sum();
            let avg = total.as_secs_f32() / self.frame_times.len() as f32;
            if avg > 0.0 {
                log::debug!("FPS: {:.1}", 1.0 / avg);
            }
            self.last_report = now;
        }
    }
}

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,
    viewport: Viewport,

    // Scene
    water: WaterSystem,
    camera: OrbitCamera,
    environment: EnvironmentSlot,

    // Live parameters and their controls
    params: WaterParams,
    controls: ControlPanel,

    // Input
    dragging: bool,
    last_cursor: Option<PhysicalPosition<f64>>,

    // Configuration
    render_config: RenderConfig,

    // Time tracking
    start_time: Instant,
    fps: FpsTracker,

    // Setup failure reported once the event loop returns
    fatal: Option<String>,
}

impl App {
    fn new(render_config: RenderConfig, params: WaterParams, environment: EnvironmentSlot) -> Self {
        let water = WaterSystem::new(&render_config);
        let camera = OrbitCamera::new(CameraSettings::default());
        let viewport = Viewport::new(
            render_config.window_width as f64,
            render_config.window_height as f64,
            1.0,
            render_config.max_pixel_ratio,
        );

        Self {
            window: None,
            render_system: None,
            viewport,
            water,
            camera,
            environment,
            params,
            controls: ControlPanel::new(),
            dragging: false,
            last_cursor: None,
            render_config,
            start_time: Instant::now(),
            fps: FpsTracker::new(),
            fatal: None,
        }
    }

    /// Track a new window size and reallocate the framebuffer
    fn resize(&mut self, size: winit::dpi::PhysicalSize<u32>, scale_factor: f64) {
        let logical = size.to_logical::<f64>(scale_factor);
        self.viewport.resize(logical.width, logical.height, scale_factor);

        if self.viewport.is_empty() {
            return;
        }
        if let Some(render_system) = self.render_system.as_mut() {
            render_system.resize(self.viewport.framebuffer_size());
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        if code == KeyCode::KeyP {
            log::info!("Current parameters:");
            log_params(&self.params);
            return;
        }

        match self.controls.handle_key(code, &mut self.params) {
            ControlAction::None => {}
            ControlAction::Selected(control) => {
                let value = control.format_value(&self.params);
                log::info!("Selected {} = {}", control.name(), value);
            }
            ControlAction::Changed(key, value) => log::info!("{} = {:.3}", key.name(), value),
            ControlAction::ColorChanged(key, color) => {
                log::info!("{} = {}", key.name(), format_hex_color(color));
            }
            ControlAction::Reset => log::info!("Parameters reset to defaults"),
        }
    }

    /// Render a single frame
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(render_system) = self.render_system.as_mut() else {
            return;
        };

        // Pick up the sky the frame it finishes loading
        if let Some(map) = self.environment.poll() {
            render_system.set_environment(&map);
        }

        if self.viewport.is_empty() {
            return;
        }

        let time_s = self.start_time.elapsed().as_secs_f32();

        self.camera.update();
        let (view_proj, camera_position) = self.camera.view_proj(self.viewport.aspect_ratio());

        let frame = FrameState {
            elapsed_time: time_s,
            camera_position,
        };

        // Displacement stage
        self.water.update(&frame, &self.params.waves);
        render_system.update_vertices(&self.water.grid.vertices);

        // Shading inputs
        render_system.update_uniforms(&WaterUniforms::new(
            view_proj,
            frame.camera_position,
            &self.params.colors,
            render_system.has_environment(),
        ));
        render_system.update_sky_uniforms(&SkyUniforms {
            inv_view_proj: view_proj.inverse().to_cols_array_2d(),
        });

        match render_system.render() {
            Ok(()) => self.fps.record_frame(),
            Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                render_system.reconfigure()
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        // Create window
        let window_attributes = Window::default_attributes()
            .with_title("Starwater")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.fatal = Some(format!("Failed to create window: {}", e));
                event_loop.exit();
                return;
            }
        };

        let scale_factor = window.scale_factor();
        let logical = window.inner_size().to_logical::<f64>(scale_factor);
        self.viewport.resize(logical.width, logical.height, scale_factor);

        // Initialize rendering system
        let render_system = pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            &self.water.grid,
            self.viewport.framebuffer_size(),
            self.render_config.clear_color,
        ));

        let mut render_system = match render_system {
            Ok(render_system) => render_system,
            Err(e) => {
                self.fatal = Some(e);
                event_loop.exit();
                return;
            }
        };

        if let Some(map) = self.environment.current() {
            render_system.set_environment(map);
        }

        let (width, height) = render_system.framebuffer_size();
        log::info!(
            "Starwater is running ({}x{}, {} grid segments)",
            width,
            height,
            self.water.grid.segments()
        );
        log::info!("Drag to orbit, scroll to zoom, ESC to quit");
        log::info!("Up/Down select, Left/Right adjust, [ ] shift hue, P print, R reset");

        self.window = Some(window);
        self.render_system = Some(render_system);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        ..
                    },
                ..
            } => self.handle_key(code),
            WindowEvent::Resized(size) => {
                let scale_factor = self.window.as_ref().map_or(1.0, |w| w.scale_factor());
                self.resize(size, scale_factor);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(size) = self.window.as_ref().map(|w| w.inner_size()) {
                    self.resize(size, scale_factor);
                }
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.dragging = state == ElementState::Pressed;
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let (true, Some(last)) = (self.dragging, self.last_cursor) {
                    self.camera
                        .rotate((position.x - last.x) as f32, (position.y - last.y) as f32);
                }
                self.last_cursor = Some(position);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => (p.y / 50.0) as f32,
                };
                self.camera.zoom(-steps);
            }
            WindowEvent::RedrawRequested => self.render_frame(event_loop),
            _ => {}
        }
    }
}

/// Render one frame on the CPU and write it to disk
fn run_snapshot(
    config: &SnapshotConfig,
    render_config: &RenderConfig,
    params: &WaterParams,
    mut environment: EnvironmentSlot,
) -> Result<(), String> {
    let map = environment.wait();
    let field = WaveField::new(render_config.noise_seed);
    let eye = OrbitCamera::new(CameraSettings::default()).eye();

    write_snapshot(
        config,
        &field,
        params,
        map.as_deref(),
        eye,
        render_config.plane_size,
    )
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let render_config = args.render_config();
    let params = args.water_params()?;

    // Off the critical path: frames render without reflections until this lands
    let environment = EnvironmentSlot::load_async(render_config.environment_path.clone());

    if let Some(snapshot) = args.snapshot_config() {
        run_snapshot(&snapshot, &render_config, &params, environment)?;
        return Ok(());
    }

    log::info!("Starwater - initializing...");

    let mut app = App::new(render_config, params, environment);
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);
    event_loop.run_app(&mut app)?;

    match app.fatal {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}
