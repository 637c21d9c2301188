//! Vignette - a wandering walk through an endless, procedurally grown landscape
//!
//! Runs the frame loop headless: an autopilot walks the viewer around while the world
//! streams, the sky follows the wall clock, and pages turn on a fixed cadence.

mod settings;

use std::time::Instant;

use anyhow::{Context, Result};
use rand::SeedableRng;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use vignette_core::{Clock, GameTime, SystemClock};
use vignette_game::{InputAction, InputHandler, ViewerController};
use vignette_render::{FrameUniforms, GrassVertex, StarField, StarFieldConfig};
use vignette_world::{Environment, SceneGraph, StreamingDelta};

use settings::VignetteSettings;

/// Scripted input standing in for a person at the keyboard
struct Autopilot {
    page_interval: u64,
}

impl Autopilot {
    /// Feed this frame's key and pointer events to the handler
    fn drive(&self, frame: u64, input: &mut InputHandler) {
        // Walk in long legs, pausing to look around between them
        let leg = (frame / 600) % 4;
        let walking = frame % 600 < 480;
        input.handle_key("KeyW", walking);
        input.handle_key("KeyA", walking && leg == 1);
        input.handle_key("KeyD", walking && leg == 3);

        if !walking {
            input.handle_mouse_motion((2.0, 0.0));
        }

        if self.page_interval > 0 && frame > 0 && frame % self.page_interval == 0 {
            input.handle_key("Space", true);
        } else {
            input.handle_key("Space", false);
        }
    }
}

/// Application state
struct VignetteApp {
    settings: VignetteSettings,
    scene: SceneGraph,
    environment: Environment,
    viewer: ViewerController,
    input: InputHandler,
    game_time: GameTime,
    autopilot: Autopilot,
    page: u64,
    /// Bytes of grass vertex data uploaded so far
    grass_bytes: usize,
    stars: StarField,
}

impl VignetteApp {
    fn new(settings: VignetteSettings) -> Self {
        let mut rng = rand::rngs::StdRng::from_entropy();
        let stars = StarField::generate(&StarFieldConfig::default(), &mut rng);

        let mut input = InputHandler::new();
        input.set_cursor_captured(true);

        Self {
            environment: Environment::new(settings.world.clone()),
            viewer: ViewerController::with_config(settings.viewer.clone()),
            autopilot: Autopilot {
                page_interval: settings.simulation.page_interval_frames,
            },
            scene: SceneGraph::new(),
            input,
            game_time: GameTime::default(),
            page: 0,
            grass_bytes: 0,
            stars,
            settings,
        }
    }

    fn start(&mut self) {
        let delta = self.environment.init(self.viewer.position(), &mut self.scene);
        self.upload_chunks(&delta);
        info!(
            "Scene ready: {} nodes, {} stars",
            self.scene.len(),
            self.stars.len()
        );
    }

    /// Pack vertex data for freshly loaded chunks
    fn upload_chunks(&mut self, delta: &StreamingDelta) {
        for coord in &delta.loaded {
            if let Some(chunk) = self.environment.streamer().get_chunk(coord) {
                let vertices = GrassVertex::from_batch(&chunk.content.grass);
                self.grass_bytes += vertices.len() * GrassVertex::stride() as usize;
            }
        }
    }

    fn update(&mut self, delta: f32, clock: &impl Clock) {
        self.game_time.update(delta);
        let frame = self.game_time.frame_count;

        self.autopilot.drive(frame, &mut self.input);
        self.viewer.update(&self.input.state);

        if self.input.state.is_just_pressed(InputAction::AdvancePage) {
            self.page += 1;
            info!("Turning to page {}", self.page);
            let delta = self
                .environment
                .regenerate_world(self.viewer.position(), &mut self.scene);
            self.upload_chunks(&delta);
        }

        let report = self
            .environment
            .update(self.viewer.position(), clock, &mut self.scene);
        self.upload_chunks(&report.streaming);
        let uniforms = FrameUniforms::gather(&report.atmosphere, &report.wind);

        if !report.streaming.is_empty() {
            debug!(
                "Frame {}: +{} -{} chunks",
                frame,
                report.streaming.loaded.len(),
                report.streaming.unloaded.len()
            );
        }

        let interval = self.settings.simulation.report_interval_frames.max(1);
        if frame % interval == 0 {
            let position = self.viewer.position();
            info!(
                "{} ({}) | viewer ({:.1}, {:.1}) | {} chunks, {} trees swaying | wind {:.2} | ui {:.2} | {} B uniforms, {} KiB grass",
                report.atmosphere.clock,
                report.atmosphere.band.name(),
                position.x,
                position.z,
                self.environment.streamer().resident_count(),
                report.trees_swayed,
                report.wind.strength,
                self.viewer.ui_opacity(),
                uniforms.byte_len(),
                self.grass_bytes / 1024
            );
        }

        self.input.end_frame();
    }

    fn shutdown(&mut self) {
        self.environment.teardown(&mut self.scene);
        info!(
            "Stopped after {} frames ({:.1}s), {} pages",
            self.game_time.frame_count, self.game_time.total_time, self.page
        );
    }
}

fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;

    info!("Starting Vignette...");

    let settings = VignetteSettings::load();
    if settings.simulation.write_defaults {
        settings.save().context("Failed to write settings")?;
    }

    let frame_duration = settings.simulation.frame_duration();
    let max_frames = settings.simulation.max_frames;
    let clock = SystemClock;

    let mut app = VignetteApp::new(settings);
    app.start();

    let mut last_frame = Instant::now();
    loop {
        let now = Instant::now();
        let delta = now.duration_since(last_frame).as_secs_f32();
        last_frame = now;
        app.update(delta, &clock);

        if max_frames.is_some_and(|max| app.game_time.frame_count >= max) {
            break;
        }

        let elapsed = now.elapsed();
        if elapsed < frame_duration {
            std::thread::sleep(frame_duration - elapsed);
        }
    }

    app.shutdown();
    Ok(())
}
