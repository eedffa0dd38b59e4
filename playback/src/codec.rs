//! Conversion between live gamepads and the snapshots stored in a session.

use vr_host_integrations::{Gamepad, GamepadButton, GamepadPose, Log};

use crate::errors::EngineError;
use crate::types::{ButtonSnapshot, InputSnapshot, PoseSnapshot, SNAPSHOT_BUTTONS};

/// Captures the state of the gamepad in `slot`, or `None` if nothing is plugged in there.
///
/// Only the first two axes and first four buttons are kept. A missing axis is recorded at rest,
/// but a device reporting fewer than four buttons is broken and there's nothing sensible to
/// record for it, so this fails with `MalformedDevice`.
pub fn encode(slot: usize, live: Option<&Gamepad>) -> Result<Option<InputSnapshot>, EngineError> {
    let Some(gamepad) = live else {
        return Ok(None);
    };

    let Some(buttons) = gamepad.buttons.get(..SNAPSHOT_BUTTONS) else {
        tracing::error!(
            target: Log::Input,
            slot,
            id = %gamepad.id,
            buttons = gamepad.buttons.len(),
            "Gamepad reports too few buttons to record"
        );

        return Err(EngineError::MalformedDevice {
            slot,
            buttons: gamepad.buttons.len(),
        });
    };

    Ok(Some(InputSnapshot {
        axes: std::array::from_fn(|i| gamepad.axes.get(i).copied().unwrap_or(0.0)),
        buttons: [
            button_snapshot(&buttons[0]),
            button_snapshot(&buttons[1]),
            button_snapshot(&buttons[2]),
            button_snapshot(&buttons[3]),
        ],
        pose: PoseSnapshot {
            position: gamepad.pose.position,
            orientation: gamepad.pose.orientation,
        },
    }))
}

/// Merges `snapshot` onto `target`, replacing its axes, buttons and pose wholesale.
///
/// Anything else on the target (its id, for one) is left alone.
pub fn decode(snapshot: &InputSnapshot, target: &mut Gamepad) {
    target.axes = snapshot.axes.to_vec();
    target.buttons = snapshot
        .buttons
        .iter()
        .map(|b| GamepadButton::new(b.pressed, b.touched, b.value))
        .collect();
    target.pose = GamepadPose {
        position: snapshot.pose.position,
        orientation: snapshot.pose.orientation,
    };
}

fn button_snapshot(button: &GamepadButton) -> ButtonSnapshot {
    ButtonSnapshot {
        pressed: button.pressed,
        touched: button.touched,
        value: button.value,
    }
}
