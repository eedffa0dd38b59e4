use std::sync::Arc;

use vr_host_integrations::Log;

use crate::codec;
use crate::errors::EngineError;
use crate::rig::LiveRig;
use crate::session::SessionStore;
use crate::substitution::{InputSubstitution, SyntheticGamepads};
use crate::types::CONTROLLER_SLOTS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerState {
    #[default]
    Idle,
    Playing,
}

/// Writes recorded frames back into the live rig, one frame per tick, looping forever.
#[derive(Debug, Default)]
pub struct Player {
    state: PlayerState,
    gamepads: SyntheticGamepads,
}

impl Player {
    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlayerState::Playing
    }

    /// The replayed gamepads that application code sees while playing.
    pub fn gamepads(&self) -> &SyntheticGamepads {
        &self.gamepads
    }

    /// Takes over the camera, the controls and the gamepad query.
    ///
    /// The substitution is installed first so that a refused activation leaves the rig
    /// untouched.
    pub fn start(&mut self, rig: &mut LiveRig, substitution: &InputSubstitution) -> Result<(), EngineError> {
        if self.is_playing() {
            return Ok(());
        }

        substitution.activate(Arc::new(self.gamepads.clone()))?;
        rig.camera.set_matrix_auto_update(false);
        rig.controls.set_update_enabled(false);

        tracing::info!(target: Log::Playback, "Playback started");
        self.state = PlayerState::Playing;
        Ok(())
    }

    /// Hands the camera, controls and gamepad query back to the runtime.
    pub fn stop(&mut self, rig: &mut LiveRig, substitution: &InputSubstitution) {
        if !self.is_playing() {
            return;
        }

        rig.camera.set_matrix_auto_update(true);
        substitution.deactivate();
        rig.controls.set_update_enabled(true);

        tracing::info!(target: Log::Playback, "Playback stopped");
        self.state = PlayerState::Idle;
    }

    /// Applies the frame under the cursor and advances it. Returns the index of the applied
    /// frame, or `None` when idle or when there's nothing to play.
    pub fn tick(&mut self, session: &mut SessionStore, rig: &mut LiveRig) -> Option<usize> {
        if !self.is_playing() {
            return None;
        }

        let index = session.cursor();
        let frame = session.current()?;

        rig.camera.set_matrix(&frame.camera_matrix);

        // Both controllers get the same standing transform, the way it was captured.
        for controller in rig.controllers.iter_mut().flatten() {
            controller.set_standing_matrix(&frame.standing_matrix);
        }

        for slot in 0..CONTROLLER_SLOTS {
            if let Some(snapshot) = &frame.controllers[slot] {
                self.gamepads.update(slot, |gamepad| codec::decode(snapshot, gamepad));
            }
        }

        tracing::trace!(target: Log::Playback, frame = index, total = session.len(), "Applied frame");
        session.advance();
        Some(index)
    }
}
