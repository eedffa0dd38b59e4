use std::ffi::c_char;
use std::path::Path;

use vr_host_integrations::{InputSource, Log};
use vr_playback::VRPlayerEngine;
use vr_playback::config::{EngineConfig, EngineConfigSource, JsonFileConfig};

use crate::host::{
    ForeignCamera, ForeignController, ForeignControls, ForeignDisplay, ForeignInputSource, VRPlayerGamepad,
    VRPlayerHostHooks,
};
use crate::{optional_c_str_to_string, with, with_returning};

/// Creates and leaks a player engine wired to the provided host callbacks.
///
/// `config_path` may be null (or not valid UTF-8), in which case configuration comes from the
/// environment alone.
/// The returned pointer must be handed back to every other `vrp_engine_*` call, and must
/// *not* be used after calling `vrp_engine_destroy`.
#[unsafe(no_mangle)]
pub extern "C" fn vrp_engine_create(hooks: VRPlayerHostHooks, config_path: *const c_char) -> usize {
    let fn_name = "vrp_engine_create";

    let config = match optional_c_str_to_string(config_path, fn_name, "config_path").ok().flatten() {
        Some(path) => JsonFileConfig::new(path).read_current().unwrap_or_else(|error| {
            tracing::error!(target: Log::Host, ?error, "Unable to read engine config, using environment");
            EngineConfig::from_env()
        }),

        None => EngineConfig::from_env(),
    };

    let mut builder = VRPlayerEngine::builder().with_config(config);

    if let Some(camera) = ForeignCamera::from_hooks(&hooks) {
        builder = builder.with_camera(camera);
    }

    if let Some(controls) = ForeignControls::from_hooks(&hooks) {
        builder = builder.with_controls(controls);
    }

    for slot in 0..hooks.controller_available.len() {
        if let Some(controller) = ForeignController::from_hooks(&hooks, slot) {
            builder = builder.with_controller(slot, controller);
        }
    }

    if let Some(input) = ForeignInputSource::from_hooks(&hooks) {
        builder = builder.with_input_source(input);
    }

    if let Some(display) = ForeignDisplay::from_hooks(&hooks) {
        builder = builder.with_display(display);
    }

    let engine_instance_ptr = Box::into_raw(Box::new(builder.build())) as usize;

    tracing::warn!(target: Log::Host, ptr = engine_instance_ptr, "Initialized VR player engine");

    engine_instance_ptr
}

/// The host should call this to notify the Rust side that it can safely shut the engine down.
/// Playback is stopped first, so the camera, controls and gamepad query are handed back.
#[unsafe(no_mangle)]
pub extern "C" fn vrp_engine_destroy(engine_instance_ptr: usize) {
    tracing::warn!(target: Log::Host, ptr = engine_instance_ptr, "Destroying VR player engine");

    // Coerce the instance back from the pointer so Rust can drop it. This is theoretically
    // safe since the host only passes pointers from `vrp_engine_create`.
    let engine = unsafe { Box::from_raw(engine_instance_ptr as *mut VRPlayerEngine) };
    drop(engine);
}

/// Replaces the in-memory session with the file at `path`. Returns `false` (leaving the
/// session untouched) if `path` is null or not UTF-8, or the file can't be read or isn't a
/// valid session.
#[unsafe(no_mangle)]
pub extern "C" fn vrp_engine_load(engine_instance_ptr: usize, path: *const c_char) -> bool {
    let path = match optional_c_str_to_string(path, "vrp_engine_load", "path") {
        Ok(Some(path)) => path,

        Ok(None) => {
            tracing::error!(target: Log::Host, "vrp_engine_load called without a path");
            return false;
        },

        Err(_) => return false,
    };

    with_returning::<VRPlayerEngine, _, _>(engine_instance_ptr, |engine| engine.load(Path::new(&path)).is_ok())
}

/// Saves the current session as `vr-<unix-millis>.json` into `dir`, or the configured save
/// directory when `dir` is null. Returns `false` if `dir` isn't UTF-8 or the write fails.
#[unsafe(no_mangle)]
pub extern "C" fn vrp_engine_save(engine_instance_ptr: usize, dir: *const c_char) -> bool {
    let Ok(dir) = optional_c_str_to_string(dir, "vrp_engine_save", "dir") else {
        return false;
    };

    with_returning::<VRPlayerEngine, _, _>(engine_instance_ptr, |engine| {
        engine.save_to_dir(dir.as_deref().map(Path::new)).is_ok()
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn vrp_engine_clear(engine_instance_ptr: usize) {
    with::<VRPlayerEngine, _>(engine_instance_ptr, |engine| engine.clear());
}

/// Starts or stops recording. Returns whether the engine is recording afterwards.
#[unsafe(no_mangle)]
pub extern "C" fn vrp_engine_toggle_recording(engine_instance_ptr: usize) -> bool {
    with_returning::<VRPlayerEngine, _, _>(engine_instance_ptr, |engine| engine.toggle_recording())
}

/// Starts or stops playback. Returns whether the engine is playing afterwards.
#[unsafe(no_mangle)]
pub extern "C" fn vrp_engine_toggle_playback(engine_instance_ptr: usize) -> bool {
    with_returning::<VRPlayerEngine, _, _>(engine_instance_ptr, |engine| match engine.toggle_playback() {
        Ok(playing) => playing,

        Err(error) => {
            tracing::error!(target: Log::Host, ?error, "Unable to toggle playback");
            engine.is_playing()
        },
    })
}

/// Should be called from the host's per-refresh callback. Does one frame of recording and/or
/// playback and returns whether either is still running (i.e, whether the host should keep
/// calling).
#[unsafe(no_mangle)]
pub extern "C" fn vrp_engine_on_animation_frame(engine_instance_ptr: usize) -> bool {
    with_returning::<VRPlayerEngine, _, _>(engine_instance_ptr, |engine| {
        if let Err(error) = engine.on_animation_frame() {
            tracing::error!(target: Log::Host, ?error, "Frame tick failed");
        }

        engine.is_active()
    })
}

/// The gamepad query application code should call instead of the runtime's own. During
/// playback this answers with the replayed gamepads.
///
/// Fills `out` and returns `true` when a gamepad is present in `slot`.
#[unsafe(no_mangle)]
pub extern "C" fn vrp_engine_get_gamepad(engine_instance_ptr: usize, slot: u32, out: *mut VRPlayerGamepad) -> bool {
    if out.is_null() {
        return false;
    }

    let gamepad = with_returning::<VRPlayerEngine, _, _>(engine_instance_ptr, |engine| {
        engine.input_source().gamepads().into_iter().nth(slot as usize).flatten()
    });

    match gamepad {
        Some(gamepad) => {
            // The host guarantees `out` points at a writable `VRPlayerGamepad`.
            unsafe { *out = VRPlayerGamepad::from_gamepad(&gamepad) };
            true
        },

        None => false,
    }
}
