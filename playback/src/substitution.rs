//! Swapping the gamepad query out from under application code.
//!
//! Application code is handed an `InputSubstitution` as its `InputSource`. While nothing is
//! substituted every query goes straight to the live runtime; while playback is running the
//! same handle answers from the replayed gamepads instead. Callers can't tell the difference.

use std::fmt;
use std::sync::{Arc, Mutex};

use vr_host_integrations::{Gamepad, GamepadButton, GamepadList, GamepadPose, InputSource, Log};

use crate::errors::EngineError;
use crate::types::{CONTROLLER_SLOTS, SNAPSHOT_BUTTONS};

/// The id reported by replayed gamepads.
pub const SYNTHETIC_GAMEPAD_ID: &str = "OpenVR Gamepad";

/// A thread-safe, cloneable router between the live gamepad query and a substitute.
#[derive(Clone)]
pub struct InputSubstitution {
    live: Arc<dyn InputSource>,
    substitute: Arc<Mutex<Option<Arc<dyn InputSource>>>>,
}

impl InputSubstitution {
    pub fn new(live: Arc<dyn InputSource>) -> Self {
        Self {
            live,
            substitute: Arc::new(Mutex::new(None)),
        }
    }

    /// Routes every query through `source` until `deactivate` is called.
    ///
    /// Only one substitute may be installed at a time; a second activation is a programming
    /// error and is refused with `DoubleActivation`.
    pub fn activate(&self, source: Arc<dyn InputSource>) -> Result<(), EngineError> {
        let mut substitute = self.substitute.lock().expect("Unable to lock input substitute");

        if substitute.is_some() {
            tracing::error!(target: Log::Input, "Refusing to stack a second input substitute");
            return Err(EngineError::DoubleActivation);
        }

        *substitute = Some(source);
        tracing::info!(target: Log::Input, "Input substitution active");
        Ok(())
    }

    /// Puts the live source back. Does nothing if no substitute is installed.
    pub fn deactivate(&self) {
        let mut substitute = self.substitute.lock().expect("Unable to lock input substitute");

        if substitute.take().is_some() {
            tracing::info!(target: Log::Input, "Input substitution released");
        }
    }

    pub fn is_active(&self) -> bool {
        self.substitute.lock().expect("Unable to lock input substitute").is_some()
    }
}

impl InputSource for InputSubstitution {
    fn gamepads(&self) -> GamepadList {
        // Clone the handle out so the lock isn't held while the substitute runs.
        let substitute = self.substitute.lock().expect("Unable to lock input substitute").clone();

        match substitute {
            Some(source) => source.gamepads(),
            None => self.live.gamepads(),
        }
    }
}

impl fmt::Debug for InputSubstitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputSubstitution").field("active", &self.is_active()).finish()
    }
}

/// The two replayed gamepads. Slots 2 and 3 are always empty.
///
/// The slots are created once and mutated in place by playback, so a value merged on one
/// frame sticks around until a later frame overwrites it.
#[derive(Clone, Debug)]
pub struct SyntheticGamepads {
    slots: Arc<Mutex<[Gamepad; CONTROLLER_SLOTS]>>,
}

impl SyntheticGamepads {
    pub fn new() -> Self {
        Self {
            slots: Arc::new(Mutex::new([baseline_gamepad(), baseline_gamepad()])),
        }
    }

    /// Runs `f` against the gamepad in `slot`.
    pub fn update<F>(&self, slot: usize, f: F)
    where
        F: FnOnce(&mut Gamepad),
    {
        let mut slots = self.slots.lock().expect("Unable to lock synthetic gamepads");
        f(&mut slots[slot]);
    }

    /// A copy of the gamepad currently in `slot`.
    pub fn get(&self, slot: usize) -> Gamepad {
        self.slots.lock().expect("Unable to lock synthetic gamepads")[slot].clone()
    }
}

impl Default for SyntheticGamepads {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for SyntheticGamepads {
    fn gamepads(&self) -> GamepadList {
        let [first, second] = self.slots.lock().expect("Unable to lock synthetic gamepads").clone();
        [Some(first), Some(second), None, None]
    }
}

/// A gamepad at rest: centered stick, nothing pressed, no pose.
pub fn baseline_gamepad() -> Gamepad {
    Gamepad {
        id: SYNTHETIC_GAMEPAD_ID.to_string(),
        axes: vec![0.0, 0.0],
        buttons: vec![GamepadButton::default(); SNAPSHOT_BUTTONS],
        pose: GamepadPose::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vr_host_integrations::mock::MockInputSource;

    fn live_with_slot0() -> MockInputSource {
        let live = MockInputSource::default();
        live.set(
            0,
            Some(Gamepad {
                id: "Live Wand".into(),
                ..baseline_gamepad()
            }),
        );
        live
    }

    #[test]
    fn test_inactive_routes_to_live() {
        let substitution = InputSubstitution::new(Arc::new(live_with_slot0()));

        let gamepads = substitution.gamepads();
        assert_eq!(gamepads[0].as_ref().map(|g| g.id.as_str()), Some("Live Wand"));
        assert!(gamepads[1].is_none());
    }

    #[test]
    fn test_active_routes_to_substitute() {
        let substitution = InputSubstitution::new(Arc::new(live_with_slot0()));
        substitution.activate(Arc::new(SyntheticGamepads::new())).unwrap();

        let gamepads = substitution.gamepads();
        assert_eq!(gamepads[0].as_ref().unwrap().id, SYNTHETIC_GAMEPAD_ID);
        assert_eq!(gamepads[1].as_ref().unwrap().id, SYNTHETIC_GAMEPAD_ID);
        assert!(gamepads[2].is_none());
        assert!(gamepads[3].is_none());
    }

    #[test]
    fn test_double_activation_is_refused() {
        let substitution = InputSubstitution::new(Arc::new(live_with_slot0()));
        substitution.activate(Arc::new(SyntheticGamepads::new())).unwrap();

        let second = substitution.activate(Arc::new(SyntheticGamepads::new()));
        assert!(matches!(second, Err(EngineError::DoubleActivation)));
    }

    #[test]
    fn test_deactivate_restores_live_and_is_idempotent() {
        let substitution = InputSubstitution::new(Arc::new(live_with_slot0()));
        substitution.activate(Arc::new(SyntheticGamepads::new())).unwrap();

        substitution.deactivate();
        substitution.deactivate();

        assert!(!substitution.is_active());
        assert_eq!(substitution.gamepads()[0].as_ref().unwrap().id, "Live Wand");

        // The slot is free again.
        substitution.activate(Arc::new(SyntheticGamepads::new())).unwrap();
    }

    #[test]
    fn test_clones_share_routing() {
        let substitution = InputSubstitution::new(Arc::new(live_with_slot0()));
        let handed_to_app = substitution.clone();

        let synthetic = SyntheticGamepads::new();
        substitution.activate(Arc::new(synthetic.clone())).unwrap();
        synthetic.update(1, |g| g.axes = vec![0.3, 0.4]);

        assert_eq!(handed_to_app.gamepads()[1].as_ref().unwrap().axes, vec![0.3, 0.4]);
    }
}
