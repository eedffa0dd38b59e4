use std::fmt;

use vr_host_integrations::{Camera, HeadControls, TrackedController};

use crate::types::CONTROLLER_SLOTS;

/// The live scene objects the engine reads from while recording and writes into during
/// playback.
///
/// A controller slot holding `None` was not available when the engine was built, and stays
/// that way for the engine's lifetime.
pub struct LiveRig {
    pub camera: Box<dyn Camera>,
    pub controls: Box<dyn HeadControls>,
    pub controllers: [Option<Box<dyn TrackedController>>; CONTROLLER_SLOTS],
}

impl LiveRig {
    pub fn controller_available(&self, slot: usize) -> bool {
        self.controllers.get(slot).is_some_and(Option::is_some)
    }
}

impl fmt::Debug for LiveRig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveRig")
            .field("controller0_available", &self.controller_available(0))
            .field("controller1_available", &self.controller_available(1))
            .finish_non_exhaustive()
    }
}
