use anyhow::{Context, Result};
use clap::Parser;
use eduverse_kernel::{AgeGroup, Complexity, catalog};
use eduverse_render_wgpu::WgpuRenderer;
use eduverse_scene::{LoopControl, ViewerConfig, ViewerState};
use eduverse_session::{Action, FrameOutcome, Level, Session, SessionConfig};
use egui::Context as EguiContext;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "eduverse-desktop", about = "Generate and explore 3D learning worlds")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Simulated generation latency in milliseconds
    #[arg(long, default_value = "3000")]
    generation_delay_ms: u64,

    /// Number of background stars
    #[arg(long, default_value = "1000")]
    star_count: usize,

    /// Seed for star placement
    #[arg(long, default_value = "42")]
    star_seed: u64,

    #[arg(long, default_value = "1280")]
    width: u32,

    #[arg(long, default_value = "720")]
    height: u32,
}

impl Cli {
    fn session_config(&self) -> SessionConfig {
        SessionConfig {
            generation_delay: Duration::from_millis(self.generation_delay_ms),
            viewer: ViewerConfig {
                star_count: self.star_count,
                star_seed: self.star_seed,
                ..ViewerConfig::default()
            },
            ..SessionConfig::default()
        }
    }
}

/// Contents of the generator form.
struct GeneratorForm {
    topic: String,
    age_group: AgeGroup,
    complexity: Complexity,
}

/// Application state.
struct AppState {
    session: Session,
    form: GeneratorForm,
    show_info: bool,
    last_frame: Instant,
    last_outcome: Option<FrameOutcome>,
}

impl AppState {
    fn new(config: SessionConfig) -> Self {
        Self {
            session: Session::new(config),
            form: GeneratorForm {
                topic: String::new(),
                age_group: AgeGroup::default(),
                complexity: Complexity::default(),
            },
            show_info: true,
            last_frame: Instant::now(),
            last_outcome: None,
        }
    }

    fn apply(&mut self, action: Action) {
        // Errors are already surfaced as toasts.
        if let Err(e) = self.session.apply(action, Instant::now()) {
            tracing::debug!("action rejected: {e}");
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Space => self.apply(Action::TogglePlayback),
            KeyCode::KeyR => self.apply(Action::ResetCamera),
            KeyCode::KeyI => self.show_info = !self.show_info,
            KeyCode::Escape => self.apply(Action::CancelGeneration),
            _ => {}
        }
    }

    /// Draw every panel and overlay, returning the actions the user took.
    fn draw_ui(&mut self, ctx: &EguiContext) -> Vec<Action> {
        let mut actions = Vec::new();
        self.generator_panel(ctx, &mut actions);
        self.top_bar(ctx, &mut actions);
        self.badges(ctx, &mut actions);
        if self.show_info {
            self.info_panel(ctx);
        }
        self.overlays(ctx);
        self.toasts(ctx);
        actions
    }

    fn generator_panel(&mut self, ctx: &EguiContext, actions: &mut Vec<Action>) {
        let generating = self.session.viewer().is_generating();

        egui::SidePanel::left("generator")
            .default_width(300.0)
            .show(ctx, |ui| {
                ui.heading("EduVerse");
                ui.label("Turn any topic into an explorable 3D world.");
                ui.separator();

                ui.strong("Create Learning World");
                ui.label("Topic");
                let topic = ui.add(
                    egui::TextEdit::singleline(&mut self.form.topic)
                        .hint_text("e.g. Photosynthesis, Black Holes, Volcanoes"),
                );
                let submitted =
                    topic.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                ui.label("Age Group");
                egui::ComboBox::from_id_salt("age_group")
                    .selected_text(self.form.age_group.label())
                    .show_ui(ui, |ui| {
                        for group in AgeGroup::ALL {
                            ui.selectable_value(&mut self.form.age_group, group, group.label());
                        }
                    });

                ui.label("Complexity");
                egui::ComboBox::from_id_salt("complexity")
                    .selected_text(self.form.complexity.label())
                    .show_ui(ui, |ui| {
                        for level in Complexity::ALL {
                            ui.selectable_value(&mut self.form.complexity, level, level.label());
                        }
                    });

                ui.add_space(6.0);
                let label = if generating {
                    "Generating..."
                } else {
                    "Generate 3D World"
                };
                let clicked = ui
                    .add_enabled(!generating, egui::Button::new(label))
                    .clicked();
                if (clicked || submitted) && !generating {
                    actions.push(Action::generate(
                        self.form.topic.clone(),
                        self.form.age_group,
                        self.form.complexity,
                    ));
                }

                ui.separator();
                ui.strong("Explore Prebuilt Worlds");
                for card in catalog() {
                    ui.group(|ui| {
                        ui.horizontal(|ui| {
                            ui.label(egui::RichText::new(card.title).strong());
                            ui.small(card.difficulty.to_string());
                        });
                        ui.small(card.description);
                        if ui.button("Explore").clicked() {
                            actions.push(Action::SelectPrebuilt(card.id));
                        }
                    });
                }

                ui.separator();
                ui.small("Space: Play/Pause | R: Reset Camera | I: Info | Esc: Cancel");
            });
    }

    fn top_bar(&mut self, ctx: &EguiContext, actions: &mut Vec<Action>) {
        let viewer = self.session.viewer();
        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                match viewer.world() {
                    Some(world) => ui.strong(world.title()),
                    None => ui.strong("No world loaded"),
                };
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Info").clicked() {
                        self.show_info = !self.show_info;
                    }
                    if ui.button("Reset Camera").clicked() {
                        actions.push(Action::ResetCamera);
                    }
                    let play = if viewer.is_playing() { "Pause" } else { "Play" };
                    if ui.button(play).clicked() {
                        actions.push(Action::TogglePlayback);
                    }
                });
            });
        });
    }

    fn badges(&self, ctx: &EguiContext, actions: &mut Vec<Action>) {
        let viewer = self.session.viewer();
        let Some(world) = viewer.world() else {
            return;
        };
        egui::Area::new(egui::Id::new("scene_objects"))
            .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -16.0])
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.strong("Scene Objects");
                    ui.horizontal_wrapped(|ui| {
                        for object in world.objects() {
                            let c = object.color;
                            let selected = viewer.selected_object() == Some(object.name.as_str());
                            let text = egui::RichText::new(&object.name)
                                .color(egui::Color32::from_rgb(c.r, c.g, c.b));
                            if ui.selectable_label(selected, text).clicked() {
                                actions.push(Action::SelectObject(object.name.clone()));
                            }
                        }
                    });
                });
            });
    }

    fn info_panel(&self, ctx: &EguiContext) {
        let viewer = self.session.viewer();
        let Some(world) = viewer.world() else {
            return;
        };
        egui::Window::new("About this world")
            .anchor(egui::Align2::RIGHT_TOP, [-16.0, 48.0])
            .default_width(320.0)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(world.description());
                ui.small(format!(
                    "{} | {}",
                    world.age_group().label(),
                    world.complexity().label()
                ));
                ui.separator();
                ui.strong("Narration");
                ui.label(world.narration());
                ui.separator();
                ui.strong("Learning Objectives");
                for objective in world.learning_objectives() {
                    ui.label(format!("- {objective}"));
                }
                if let Some(object) = viewer.selected_object().and_then(|n| world.object(n)) {
                    ui.separator();
                    ui.strong(&object.name);
                    ui.label(&object.description);
                }
            });
    }

    fn overlays(&self, ctx: &EguiContext) {
        let state = self.session.viewer().state();
        if state == ViewerState::Populated {
            return;
        }
        egui::Area::new(egui::Id::new("viewport_overlay"))
            .anchor(egui::Align2::CENTER_CENTER, [150.0, 0.0])
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| match state {
                    ViewerState::Generating { .. } => {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.heading("Generating your 3D world...");
                        });
                        ui.label("Building objects, narration and learning objectives.");
                    }
                    _ => {
                        ui.heading("Ready to Explore");
                        ui.label("Enter a topic or pick a prebuilt world to begin.");
                    }
                });
            });
    }

    fn toasts(&self, ctx: &EguiContext) {
        let notifications = self.session.notifications();
        if notifications.is_empty() {
            return;
        }
        egui::Area::new(egui::Id::new("toasts"))
            .anchor(egui::Align2::RIGHT_BOTTOM, [-16.0, -16.0])
            .show(ctx, |ui| {
                for toast in notifications.iter() {
                    let color = match toast.level {
                        Level::Success => egui::Color32::from_rgb(80, 200, 120),
                        Level::Error => egui::Color32::from_rgb(230, 80, 80),
                        Level::Info => egui::Color32::LIGHT_BLUE,
                    };
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.colored_label(color, &toast.message);
                    });
                }
            });
    }
}

/// Window, surface and everything created from the GPU device.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn init(event_loop: &ActiveEventLoop, ctx: &EguiContext, size: PhysicalSize<u32>) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title("EduVerse")
            .with_inner_size(size);
        let window = Arc::new(event_loop.create_window(attrs)?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window.clone())?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no compatible GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("eduverse_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        let size = window.inner_size();
        let caps = surface.get_capabilities(&adapter);
        let surface_format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .context("surface reports no alpha modes")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(&device, surface_format, config.width, config.height);
        let egui_winit = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
    }
}

struct GpuApp {
    state: AppState,
    initial_size: PhysicalSize<u32>,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl GpuApp {
    fn new(config: SessionConfig, initial_size: PhysicalSize<u32>) -> Self {
        Self {
            state: AppState::new(config),
            initial_size,
            gpu: None,
            egui_ctx: EguiContext::default(),
        }
    }

    fn redraw(&mut self) {
        let now = Instant::now();
        let dt = (now - self.state.last_frame).as_secs_f32().min(0.1);
        self.state.last_frame = now;
        self.state.last_outcome = Some(self.state.session.tick(now, dt));

        let Some(gpu) = &mut self.gpu else {
            return;
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let viewer = self.state.session.viewer();
        gpu.renderer.render(
            &gpu.device,
            &gpu.queue,
            &view,
            viewer.graph(),
            viewer.camera(),
        );

        let raw_input = gpu.egui_winit.take_egui_input(&gpu.window);
        let mut actions = Vec::new();
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            actions = self.state.draw_ui(ctx);
        });
        gpu.egui_winit
            .handle_platform_output(&gpu.window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            gpu.egui_renderer
                .update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        gpu.egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            gpu.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            gpu.egui_renderer.free_texture(id);
        }
        output.present();

        let acted = !actions.is_empty();
        for action in actions {
            self.state.apply(action);
        }
        if acted {
            gpu.window.request_redraw();
        }
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match Gpu::init(event_loop, &self.egui_ctx, self.initial_size) {
            Ok(gpu) => {
                let size = gpu.window.inner_size();
                self.state.apply(Action::Resize {
                    width: size.width,
                    height: size.height,
                });
                gpu.window.request_redraw();
                self.gpu = Some(gpu);
            }
            Err(e) => {
                tracing::error!("failed to initialize graphics: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(gpu) = &mut self.gpu {
            let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
            if response.repaint {
                gpu.window.request_redraw();
            }
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                    gpu.window.request_redraw();
                }
                self.state.apply(Action::Resize {
                    width: new_size.width,
                    height: new_size.height,
                });
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                self.state.handle_key(key);
                if let Some(gpu) = &self.gpu {
                    gpu.window.request_redraw();
                }
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(gpu) = &self.gpu else {
            return;
        };
        let now = Instant::now();
        match self.state.last_outcome {
            Some(FrameOutcome {
                control: LoopControl::Continue,
                ..
            }) => {
                event_loop.set_control_flow(ControlFlow::Poll);
                gpu.window.request_redraw();
            }
            Some(FrameOutcome {
                next_wake: Some(deadline),
                ..
            }) => {
                if deadline <= now {
                    gpu.window.request_redraw();
                } else {
                    event_loop.set_control_flow(ControlFlow::WaitUntil(deadline));
                }
            }
            _ => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| if cli.verbose { "debug" } else { "info" }.to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("eduverse-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(
        cli.session_config(),
        PhysicalSize::new(cli.width, cli.height),
    );
    event_loop.run_app(&mut app)?;

    Ok(())
}
