//! Application shell: window, event loop, and the per-frame wiring between
//! input, the interaction session, the panels and the renderer.

use std::sync::Arc;
use std::time::Instant;

use cgmath::Rad;
use log::warn;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Cursor, CursorIcon, Window, WindowAttributes},
};

use crate::audio::MusicPlayer;
use crate::config::{AppConfig, SkyConfig};
use crate::environment::Environment;
use crate::gfx::{
    camera::{
        camera_controller::CameraController, camera_utils::CameraManager, orbit_camera::OrbitCamera,
    },
    rendering::render_engine::RenderEngine,
    scene::Scene,
};
use crate::interaction::{
    CameraSequencer, InteractableRegistry, InteractionSession, SequencerEvent,
};
use crate::ui::{PanelAction, PanelController, UiManager};

pub struct ShowroomApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    scene: Scene,
    session: InteractionSession,
    panels: PanelController,
    environment: Environment,
    music: Option<MusicPlayer>,
    theme: ThemeState,
    sky: SkyConfig,
    pointer: (f32, f32),
    last_frame: Instant,
}

impl ShowroomApp {
    /// Builds the application: loads the room and bird models, sets up the
    /// environment, and prepares the interaction session. GPU resources are
    /// created later, when the window appears.
    pub async fn new(config: AppConfig) -> Self {
        let event_loop = EventLoop::new().expect("Failed to create event loop");

        let mut camera = OrbitCamera::new(
            config.default_eye(),
            config.default_target(),
            Rad(config.camera.fov_degrees.to_radians()),
            1.5,
        );
        camera.znear = config.camera.znear;
        camera.zfar = config.camera.zfar;
        camera.bounds.min_distance = Some(config.camera.min_distance);
        camera.bounds.max_distance = Some(config.camera.max_distance);
        let controller = CameraController::new(0.005, 0.1);

        let mut scene = Scene::new(CameraManager::new(camera, controller));

        let default_pose = scene.camera_manager.camera.default_pose();
        let mut session = InteractionSession::new(
            InteractableRegistry::portfolio(),
            CameraSequencer::new(
                config.animation.duration_secs,
                config.animation.entry_duration_secs,
                default_pose,
            ),
        );

        // A missing room is survivable: the scene renders, there is just
        // nothing to click. No retry.
        if scene
            .try_load_model(&config.assets.room_model, "room")
            .is_some()
        {
            session.sequencer_mut().begin_entry(config.entry_eye());
        }

        let mut environment = Environment::new();
        environment.setup(&mut scene, &config.assets.bird_model, &mut rand::rng());

        let music = match MusicPlayer::new(&config.assets.music) {
            Ok(player) => Some(player),
            Err(err) => {
                warn!("Music disabled: {err}");
                None
            }
        };

        Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                window: None,
                render_engine: None,
                ui_manager: None,
                scene,
                session,
                panels: PanelController::new(),
                environment,
                music,
                theme: ThemeState::new(),
                sky: config.sky.clone(),
                pointer: (0.0, 0.0),
                last_frame: Instant::now(),
            },
        }
    }

    /// Runs the application (consumes self and starts the event loop).
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .expect("Event loop already consumed");
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self.app_state)?;
        Ok(())
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Ok(window) = event_loop.create_window(
            WindowAttributes::default()
                .with_title("Showroom")
                .with_inner_size(winit::dpi::LogicalSize::new(1200, 800)),
        ) {
            let window_handle = Arc::new(window);
            self.window = Some(window_handle.clone());

            let (width, height) = window_handle.inner_size().into();
            self.scene
                .camera_manager
                .camera
                .resize_projection(width, height);

            let window_clone = window_handle.clone();
            let renderer = pollster::block_on(async move {
                RenderEngine::new(window_clone, width, height).await
            });

            self.scene
                .init_gpu_resources(renderer.device(), renderer.queue());

            let ui_manager = UiManager::new(
                renderer.device(),
                renderer.queue(),
                renderer.surface_format(),
                &window_handle,
            );

            self.ui_manager = Some(ui_manager);
            self.render_engine = Some(renderer);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: winit::event::WindowEvent,
    ) {
        let Some(window) = self.window.as_ref().cloned() else {
            return;
        };

        // The UI gets first refusal on every input event.
        if let Some(ui_manager) = self.ui_manager.as_mut() {
            let ui_event: winit::event::Event<()> = winit::event::Event::WindowEvent {
                window_id,
                event: event.clone(),
            };
            if ui_manager.handle_input(&window, &ui_event) {
                window.request_redraw();
                return;
            }
        }

        match event {
            WindowEvent::KeyboardInput {
                event: key_event, ..
            } => {
                if matches!(
                    key_event.physical_key,
                    winit::keyboard::PhysicalKey::Code(winit::keyboard::KeyCode::Escape)
                ) {
                    event_loop.exit();
                    return;
                }
                self.scene.camera_manager.process_keyboard_event(&key_event);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer = (position.x as f32, position.y as f32);
                self.update_hover_cursor(&window);
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                self.handle_click();
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.scene
                    .camera_manager
                    .camera
                    .resize_projection(width, height);
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                self.redraw(&window);
            }
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: winit::event::DeviceEvent,
    ) {
        let Some(window) = self.window.as_ref() else {
            return;
        };

        if let Some(ui_manager) = self.ui_manager.as_ref() {
            if ui_manager.wants_mouse() {
                return;
            }
        }

        self.scene.camera_manager.process_event(&event, window);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}

impl AppState {
    fn surface_size(&self) -> Option<(f32, f32)> {
        let (width, height) = self.render_engine.as_ref()?.get_surface_size();
        Some((width as f32, height as f32))
    }

    /// Hover probe on pointer move: identical resolution to a click, but the
    /// result only picks the cursor icon. Skipped while interacting.
    fn update_hover_cursor(&mut self, window: &Window) {
        if self.session.is_interacting() {
            return;
        }
        let Some(surface) = self.surface_size() else {
            return;
        };
        let hovering = self
            .session
            .pointer_hover(self.pointer, surface, &self.scene);
        let icon = if hovering {
            CursorIcon::Pointer
        } else {
            CursorIcon::Default
        };
        window.set_cursor(Cursor::Icon(icon));
    }

    fn handle_click(&mut self) {
        let Some(surface) = self.surface_size() else {
            return;
        };
        self.session.pointer_pressed(
            self.pointer,
            surface,
            &self.scene,
            self.panels.is_popup_open(),
        );
    }

    fn redraw(&mut self, window: &Arc<Window>) {
        let Some(render_engine) = self.render_engine.as_mut() else {
            return;
        };

        let now = Instant::now();
        // Clamp pathological gaps (debugger pauses, suspend) so animations
        // cannot leap.
        let dt = (now - self.last_frame).as_secs_f32().min(0.1);
        self.last_frame = now;

        // Advance the camera sequencer and apply its side effects.
        let output = self.session.update(dt);
        if let Some(pose) = output.pose {
            self.scene.camera_manager.camera.set_pose(pose);
        }
        for event in output.events {
            match event {
                SequencerEvent::RevealSection(id) => self.panels.show_section(id),
                SequencerEvent::FocusSettled => {}
                SequencerEvent::ResetComplete => self.panels.hide_all(),
            }
        }
        self.scene
            .camera_manager
            .set_input_enabled(self.session.sequencer().orbit_enabled());

        self.theme.update(dt);
        render_engine.set_clear_color(self.theme.sky_color(&self.sky));

        self.environment.update(dt, &mut self.scene);
        self.panels.update(dt);

        self.scene.update();
        self.scene.update_all_transforms(render_engine.queue());
        render_engine.update(self.scene.camera_manager.camera.uniform);

        let mut actions: Vec<PanelAction> = Vec::new();
        let music_playing = self
            .music
            .as_ref()
            .map(|player| player.is_playing())
            .unwrap_or(false);

        if let Some(ui_manager) = self.ui_manager.as_mut() {
            let panels = &mut self.panels;
            let window_clone = window.clone();
            let actions_ref = &mut actions;
            render_engine.render_frame(
                &self.scene,
                Some(|device: &wgpu::Device,
                      queue: &wgpu::Queue,
                      encoder: &mut wgpu::CommandEncoder,
                      view: &wgpu::TextureView| {
                    ui_manager.draw(device, queue, encoder, &window_clone, view, |ui| {
                        panels.render(ui, music_playing, actions_ref);
                    });
                }),
            );
        } else {
            render_engine.render_frame(
                &self.scene,
                None::<fn(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView)>,
            );
        }

        for action in actions {
            self.handle_panel_action(action);
        }
    }

    fn handle_panel_action(&mut self, action: PanelAction) {
        match action {
            PanelAction::ClosePopup => {
                // Panel disappears immediately; sections and input are
                // restored only once the camera lands back home.
                self.panels.close_popup();
                if !self.session.begin_reset() {
                    // Full-portfolio mode never moved the camera.
                    self.panels.hide_all();
                }
            }
            PanelAction::OpenFullPortfolio => {
                self.panels.show_all();
            }
            PanelAction::ToggleTheme => {
                self.theme.toggle();
            }
            PanelAction::ToggleMusic => match self.music.as_mut() {
                Some(player) => {
                    player.toggle();
                }
                None => warn!("Music toggle ignored: no audio available"),
            },
            PanelAction::CloseWelcome => {
                self.panels.close_welcome();
            }
        }
    }
}

/// Day/night sky blend driven by the theme toggle. The clear colour eases
/// between the two configured skies over about a second.
struct ThemeState {
    dark: bool,
    blend: f32,
}

impl ThemeState {
    fn new() -> Self {
        Self {
            dark: false,
            blend: 0.0,
        }
    }

    fn toggle(&mut self) {
        self.dark = !self.dark;
    }

    fn update(&mut self, dt: f32) {
        let target = if self.dark { 1.0 } else { 0.0 };
        let step = dt / 1.0;
        if self.blend < target {
            self.blend = (self.blend + step).min(target);
        } else {
            self.blend = (self.blend - step).max(target);
        }
    }

    fn sky_color(&self, sky: &SkyConfig) -> [f32; 3] {
        let t = self.blend;
        [
            sky.day[0] + (sky.night[0] - sky.day[0]) * t,
            sky.day[1] + (sky.night[1] - sky.day[1]) * t,
            sky.day[2] + (sky.night[2] - sky.day[2]) * t,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_blend_eases_between_day_and_night() {
        let sky = SkyConfig::default();
        let mut theme = ThemeState::new();
        assert_eq!(theme.sky_color(&sky), sky.day);

        theme.toggle();
        theme.update(0.5);
        let mid = theme.sky_color(&sky);
        assert_ne!(mid, sky.day);
        assert_ne!(mid, sky.night);

        theme.update(1.0);
        assert_eq!(theme.sky_color(&sky), sky.night);

        theme.toggle();
        theme.update(2.0);
        assert_eq!(theme.sky_color(&sky), sky.day);
    }
}
