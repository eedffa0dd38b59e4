//! Record and replay of VR tracking state.
//!
//! `VRPlayerEngine` captures the head camera transform, the controllers' standing transform
//! and both controllers' gamepad state once per visual frame, and can later push those frames
//! back into the live scene, substituting the recorded gamepads for the live ones.

pub mod codec;
pub mod config;
pub mod errors;
pub mod player;
pub mod recorder;
pub mod rig;
pub mod scheduler;
pub mod session;
pub mod substitution;
pub mod types;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use vr_host_integrations::{Camera, HeadControls, InputSource, Log, NoInputSource, ProgressDisplay, TrackedController};

use crate::{
    config::EngineConfig,
    errors::EngineError,
    player::Player,
    recorder::Recorder,
    rig::LiveRig,
    scheduler::{FixedRateClock, FrameClock},
    session::SessionStore,
    substitution::InputSubstitution,
    types::CONTROLLER_SLOTS,
};

/// The central orchestrator that owns the session and both loops.
///
/// Mutation rights: the session is only written by the recorder (append), the player (cursor)
/// and the load/clear commands; the rig is only touched by whichever loop is running; the
/// input routing is only flipped by the player. Running the recorder and the player at the
/// same time is not prevented here and is up to the caller.
pub struct VRPlayerEngine {
    config: EngineConfig,
    session: SessionStore,
    recorder: Recorder,
    player: Player,
    substitution: InputSubstitution,
    rig: Option<LiveRig>,
    display: Option<Box<dyn ProgressDisplay>>,
}

impl VRPlayerEngine {
    /// Builder for injection / customization.
    pub fn builder() -> VRPlayerEngineBuilder {
        VRPlayerEngineBuilder::default()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn is_recording(&self) -> bool {
        self.recorder.is_recording()
    }

    pub fn is_playing(&self) -> bool {
        self.player.is_playing()
    }

    /// Whether either loop wants more frames.
    pub fn is_active(&self) -> bool {
        self.is_recording() || self.is_playing()
    }

    /// The gamepad query application code should use. While playing it answers with the
    /// replayed gamepads, otherwise with the live ones.
    pub fn input_source(&self) -> InputSubstitution {
        self.substitution.clone()
    }

    /// The `"<cursor>/<frameCount>"` counter.
    pub fn frames_text(&self) -> String {
        self.session.progress_text()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Session commands
    // ─────────────────────────────────────────────────────────────────────

    /// Replaces the session with the one stored at `path`. On failure the current session is
    /// left untouched.
    pub fn load(&mut self, path: &Path) -> Result<(), EngineError> {
        let result = self.session.read_file(path);

        if let Err(error) = &result {
            tracing::error!(target: Log::Session, ?error, ?path, "Unable to load session");
        }

        self.refresh_display();
        result
    }

    /// Replaces the session with already-read session bytes.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<(), EngineError> {
        let result = self.session.load_bytes(bytes);

        match &result {
            Ok(()) => tracing::info!(target: Log::Session, frames = self.session.len(), "Loaded session"),
            Err(error) => tracing::error!(target: Log::Session, ?error, "Unable to load session"),
        }

        self.refresh_display();
        result
    }

    /// Serializes the current session as-is.
    pub fn save(&self) -> Result<Vec<u8>, EngineError> {
        self.session.serialize()
    }

    /// Writes the current session into `dir` (or the configured save directory) as
    /// `vr-<unix-millis>.json`, returning the path written.
    pub fn save_to_dir(&mut self, dir: Option<&Path>) -> Result<PathBuf, EngineError> {
        let dir = dir
            .map(Path::to_path_buf)
            .or_else(|| self.config.save_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."));

        let path = session::timestamped_file_name(&dir);

        if let Err(error) = self.session.write_file(&path) {
            tracing::error!(target: Log::Session, ?error, ?path, "Unable to save session");
            return Err(error);
        }

        self.refresh_display();
        Ok(path)
    }

    pub fn clear(&mut self) {
        tracing::info!(target: Log::Session, frames = self.session.len(), "Clearing session");
        self.session.clear();
        self.refresh_display();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Recording
    // ─────────────────────────────────────────────────────────────────────

    pub fn start_recording(&mut self) {
        if self.rig.is_none() {
            tracing::warn!(target: Log::Recorder, "No camera or controls available, not recording");
            return;
        }

        if self.is_playing() {
            tracing::warn!(target: Log::Recorder, "Recording while playback is running");
        }

        self.recorder.start();
        self.refresh_display();
    }

    pub fn stop_recording(&mut self) {
        self.recorder.stop();
        self.refresh_display();
    }

    /// Flips recording on or off. Returns whether the engine is now recording.
    pub fn toggle_recording(&mut self) -> bool {
        match self.is_recording() {
            true => self.stop_recording(),
            false => self.start_recording(),
        }

        self.is_recording()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Playback
    // ─────────────────────────────────────────────────────────────────────

    pub fn start_playback(&mut self) -> Result<(), EngineError> {
        let Some(rig) = self.rig.as_mut() else {
            tracing::warn!(target: Log::Playback, "No camera or controls available, not playing");
            return Ok(());
        };

        if self.recorder.is_recording() {
            tracing::warn!(target: Log::Playback, "Playback while recording is running");
        }

        if self.session.is_empty() {
            tracing::warn!(target: Log::Playback, "Session is empty, playback will idle");
        }

        self.player.start(rig, &self.substitution)?;
        self.refresh_display();
        Ok(())
    }

    pub fn stop_playback(&mut self) {
        if let Some(rig) = self.rig.as_mut() {
            self.player.stop(rig, &self.substitution);
        }

        self.refresh_display();
    }

    /// Flips playback on or off. Returns whether the engine is now playing.
    pub fn toggle_playback(&mut self) -> Result<bool, EngineError> {
        match self.is_playing() {
            true => self.stop_playback(),
            false => self.start_playback()?,
        }

        Ok(self.is_playing())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Frame loop
    // ─────────────────────────────────────────────────────────────────────

    /// Does one frame's worth of work: one capture if recording, one applied frame if playing.
    ///
    /// Hosts with their own refresh callback call this once per callback.
    pub fn on_animation_frame(&mut self) -> Result<(), EngineError> {
        let Some(rig) = self.rig.as_mut() else {
            return Ok(());
        };

        if self.recorder.is_recording() {
            let captured = self.recorder.tick(&mut self.session, rig, &self.substitution);
            show_progress(&self.session, &mut self.display);
            captured?;
        }

        if self.player.is_playing() {
            // The counter shows the frame being applied, before the cursor moves on.
            if !self.session.is_empty() {
                show_progress(&self.session, &mut self.display);
            }

            self.player.tick(&mut self.session, rig);
        }

        Ok(())
    }

    /// Ticks once per frame from `clock` for as long as a loop is running and the clock keeps
    /// producing frames. Returns the number of ticks done.
    pub fn run<C: FrameClock>(&mut self, clock: &mut C) -> Result<usize, EngineError> {
        let mut ticks = 0;

        while self.is_active() && clock.next_frame() {
            self.on_animation_frame()?;
            ticks += 1;
        }

        tracing::debug!(target: Log::Engine, ticks, "Frame loop finished");
        Ok(ticks)
    }

    /// Like `run`, paced at the configured refresh rate.
    pub fn run_at_configured_rate(&mut self) -> Result<usize, EngineError> {
        let mut clock = FixedRateClock::new(self.config.frame_rate_hz);
        self.run(&mut clock)
    }

    fn refresh_display(&mut self) {
        show_progress(&self.session, &mut self.display);
    }
}

fn show_progress(session: &SessionStore, display: &mut Option<Box<dyn ProgressDisplay>>) {
    if let Some(display) = display.as_mut() {
        display.show(&session.progress_text());
    }
}

impl fmt::Debug for VRPlayerEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VRPlayerEngine")
            .field("config", &self.config)
            .field("frames", &self.session.len())
            .field("cursor", &self.session.cursor())
            .field("recorder", &self.recorder.state())
            .field("player", &self.player.state())
            .field("substitution", &self.substitution)
            .field("rig", &self.rig)
            .finish_non_exhaustive()
    }
}

impl Drop for VRPlayerEngine {
    fn drop(&mut self) {
        // Don't leave the runtime with a frozen camera or a replayed gamepad query.
        if let Some(rig) = self.rig.as_mut() {
            self.player.stop(rig, &self.substitution);
        }
    }
}

#[derive(Default)]
pub struct VRPlayerEngineBuilder {
    config: Option<EngineConfig>,
    camera: Option<Box<dyn Camera>>,
    controls: Option<Box<dyn HeadControls>>,
    controllers: [Option<Box<dyn TrackedController>>; CONTROLLER_SLOTS],
    input: Option<Arc<dyn InputSource>>,
    display: Option<Box<dyn ProgressDisplay>>,
}

impl VRPlayerEngineBuilder {
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_camera(mut self, camera: impl Camera + 'static) -> Self {
        self.camera = Some(Box::new(camera));
        self
    }

    pub fn with_controls(mut self, controls: impl HeadControls + 'static) -> Self {
        self.controls = Some(Box::new(controls));
        self
    }

    /// Registers the tracked controller for `slot` (0 or 1). Slots left empty are treated as
    /// unavailable for the engine's whole lifetime.
    pub fn with_controller(mut self, slot: usize, controller: impl TrackedController + 'static) -> Self {
        match self.controllers.get_mut(slot) {
            Some(entry) => *entry = Some(Box::new(controller)),
            None => tracing::warn!(target: Log::Engine, slot, "Ignoring controller for unsupported slot"),
        }

        self
    }

    /// The live gamepad query. Defaults to one with nothing connected.
    pub fn with_input_source(mut self, input: impl InputSource + 'static) -> Self {
        self.input = Some(Arc::new(input));
        self
    }

    pub fn with_display(mut self, display: impl ProgressDisplay + 'static) -> Self {
        self.display = Some(Box::new(display));
        self
    }

    pub fn build(self) -> VRPlayerEngine {
        let config = self.config.unwrap_or_else(EngineConfig::from_env);

        let rig = match (self.camera, self.controls) {
            (Some(camera), Some(controls)) => Some(LiveRig {
                camera,
                controls,
                controllers: self.controllers,
            }),

            _ => {
                tracing::warn!(target: Log::Engine, "Built without a camera or controls, record and play are disabled");
                None
            },
        };

        if let Some(rig) = &rig {
            tracing::info!(
                target: Log::Engine,
                controller0 = rig.controller_available(0),
                controller1 = rig.controller_available(1),
                "Starting VRPlayerEngine"
            );
        }

        let input = self.input.unwrap_or_else(|| Arc::new(NoInputSource));

        let mut engine = VRPlayerEngine {
            session: SessionStore::new(),
            recorder: Recorder::default(),
            player: Player::default(),
            substitution: InputSubstitution::new(input),
            rig,
            display: self.display,
            config,
        };

        if let Some(path) = engine.config.session_path.clone() {
            // Already logged; an unreadable startup session just means starting empty.
            let _ = engine.load(&path);
        }

        engine.refresh_display();
        engine
    }
}
