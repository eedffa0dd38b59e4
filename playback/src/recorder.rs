use vr_host_integrations::{InputSource, Log};

use crate::codec;
use crate::errors::EngineError;
use crate::rig::LiveRig;
use crate::session::SessionStore;
use crate::types::{CONTROLLER_SLOTS, FramePacket};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecorderState {
    #[default]
    Idle,
    Recording,
}

/// Samples the live rig into the session, one frame per tick.
#[derive(Debug, Default)]
pub struct Recorder {
    state: RecorderState,
}

impl Recorder {
    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == RecorderState::Recording
    }

    pub fn start(&mut self) {
        if self.is_recording() {
            return;
        }

        tracing::info!(target: Log::Recorder, "Recording started");
        self.state = RecorderState::Recording;
    }

    /// Stops asking for more ticks. Frames captured so far are kept.
    pub fn stop(&mut self) {
        if !self.is_recording() {
            return;
        }

        tracing::info!(target: Log::Recorder, "Recording stopped");
        self.state = RecorderState::Idle;
    }

    /// Captures one frame and appends it to `session`. Returns whether a frame was captured.
    ///
    /// Input is only read for controllers that were available at startup; the other slots are
    /// recorded as absent. If a gamepad turns out to be malformed nothing is appended for this
    /// tick and the recorder goes idle.
    pub fn tick(&mut self, session: &mut SessionStore, rig: &LiveRig, input: &dyn InputSource) -> Result<bool, EngineError> {
        if !self.is_recording() {
            return Ok(false);
        }

        let gamepads = input.gamepads();
        let mut controllers = [None, None];

        for slot in 0..CONTROLLER_SLOTS {
            if !rig.controller_available(slot) {
                continue;
            }

            match codec::encode(slot, gamepads[slot].as_ref()) {
                Ok(snapshot) => controllers[slot] = snapshot,
                Err(e) => {
                    self.state = RecorderState::Idle;
                    tracing::error!(target: Log::Recorder, error = ?e, "Recording aborted");
                    return Err(e);
                },
            }
        }

        session.append(FramePacket {
            camera_matrix: rig.camera.matrix(),
            standing_matrix: rig.controls.standing_matrix(),
            controllers,
        });

        tracing::trace!(target: Log::Recorder, frames = session.len(), "Captured frame");
        Ok(true)
    }
}
