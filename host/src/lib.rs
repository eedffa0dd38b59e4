//! This crate describes the objects that live on the VR runtime side of things: the head
//! camera, the head-tracking controls, the tracked hand controllers and the gamepad query.
//!
//! Nothing in here knows about recording or playback. The player engine is handed
//! implementations of these traits and drives them; hosts implement them against whatever
//! scene graph they actually run (or use the `mock` module in tests).

mod gamepad;
pub use gamepad::{
    GAMEPAD_SLOTS, Gamepad, GamepadButton, GamepadList, GamepadPose, InputSource, NoInputSource,
};

mod scene;
pub use scene::{Camera, HeadControls, IDENTITY_MATRIX, Matrix4, ProgressDisplay, TrackedController};

pub mod logger;
pub mod mock;

/// Tracing targets used across the workspace.
///
/// These are plain string constants so they can be used directly in the `target:` slot of
/// the `tracing` macros, e.g `tracing::info!(target: Log::Playback, "...")`.
#[derive(Debug)]
pub struct Log;

#[allow(non_upper_case_globals)]
impl Log {
    /// Engine wiring, command dispatch and the frame loop.
    pub const Engine: &'static str = "vr_player::engine";

    /// Session loading, saving and clearing.
    pub const Session: &'static str = "vr_player::session";

    /// The capture loop.
    pub const Recorder: &'static str = "vr_player::recorder";

    /// The replay loop.
    pub const Playback: &'static str = "vr_player::playback";

    /// Gamepad encoding and input substitution.
    pub const Input: &'static str = "vr_player::input";

    /// Calls across the host boundary.
    pub const Host: &'static str = "vr_player::host";
}
