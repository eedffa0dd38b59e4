//! End-to-end scenarios driving the engine through its command surface with in-memory
//! collaborators.

use vr_host_integrations::mock::{MockCamera, MockController, MockControls, MockDisplay, MockInputSource};
use vr_host_integrations::{Gamepad, GamepadButton, GamepadPose, IDENTITY_MATRIX, InputSource, Matrix4};
use vr_playback::config::EngineConfig;
use vr_playback::errors::EngineError;
use vr_playback::scheduler::CountedClock;
use vr_playback::VRPlayerEngine;

struct Rig {
    camera: MockCamera,
    controls: MockControls,
    controllers: [MockController; 2],
    input: MockInputSource,
    display: MockDisplay,
}

fn rig() -> Rig {
    Rig {
        camera: MockCamera::default(),
        controls: MockControls::default(),
        controllers: [MockController::default(), MockController::default()],
        input: MockInputSource::default(),
        display: MockDisplay::default(),
    }
}

/// Builds an engine around `rig`, with only the listed controllers available.
fn engine(rig: &Rig, available: &[usize]) -> VRPlayerEngine {
    let mut builder = VRPlayerEngine::builder()
        .with_config(EngineConfig::default())
        .with_camera(rig.camera.clone())
        .with_controls(rig.controls.clone())
        .with_input_source(rig.input.clone())
        .with_display(rig.display.clone());

    for &slot in available {
        builder = builder.with_controller(slot, rig.controllers[slot].clone());
    }

    builder.build()
}

fn tagged(tag: f32) -> Matrix4 {
    let mut matrix = IDENTITY_MATRIX;
    matrix[12] = tag;
    matrix
}

fn resting_wand() -> Gamepad {
    Gamepad {
        id: "OpenVR Gamepad".into(),
        axes: vec![0.1, 0.2],
        buttons: vec![GamepadButton::new(false, false, 0.0); 4],
        pose: GamepadPose {
            position: Some([0.0, 1.0, 0.0]),
            orientation: Some([0.0, 0.0, 0.0, 1.0]),
        },
    }
}

#[test]
fn test_record_three_ticks_with_one_controller() {
    let rig = rig();
    rig.input.set(0, Some(resting_wand()));
    rig.input.set(1, None);

    let mut engine = engine(&rig, &[0, 1]);
    engine.start_recording();

    let ticks = engine.run(&mut CountedClock::new(3)).unwrap();
    engine.stop_recording();

    assert_eq!(ticks, 3);
    let frames = engine.session().frames();
    assert_eq!(frames.len(), 3);

    for frame in frames {
        assert!(frame.controllers[1].is_none());
        assert_eq!(frame.controllers[0].as_ref().unwrap().axes, [0.1, 0.2]);
    }

    assert_eq!(rig.display.last().as_deref(), Some("0/3"));
}

#[test]
fn test_stop_recording_keeps_captured_frames() {
    let rig = rig();
    let mut engine = engine(&rig, &[]);

    assert!(engine.toggle_recording());
    engine.on_animation_frame().unwrap();
    engine.on_animation_frame().unwrap();
    assert!(!engine.toggle_recording());

    // Ticks after stopping capture nothing.
    engine.on_animation_frame().unwrap();
    assert_eq!(engine.session().len(), 2);
}

#[test]
fn test_empty_session_playback_does_nothing() {
    let rig = rig();
    let mut engine = engine(&rig, &[0, 1]);

    engine.load_bytes(b"[]").unwrap();
    engine.start_playback().unwrap();
    engine.on_animation_frame().unwrap();

    assert!(rig.camera.writes().is_empty());
    assert!(rig.controllers[0].writes().is_empty());
    assert_eq!(engine.frames_text(), "0/0");
}

#[test]
fn test_record_then_play_back_in_order() {
    let rig = rig();
    let mut engine = engine(&rig, &[0]);

    engine.start_recording();
    for tag in 1..=3 {
        rig.camera.move_to(tagged(tag as f32));
        engine.on_animation_frame().unwrap();
    }
    engine.stop_recording();

    assert!(engine.toggle_playback().unwrap());
    assert!(!rig.camera.auto_update());
    assert!(!rig.controls.update_enabled());

    engine.run(&mut CountedClock::new(3)).unwrap();

    assert_eq!(rig.camera.writes(), vec![tagged(1.0), tagged(2.0), tagged(3.0)]);
    assert_eq!(engine.session().cursor(), 0);
    assert_eq!(rig.controllers[0].writes().len(), 3);
    assert!(rig.controllers[1].writes().is_empty());

    assert!(!engine.toggle_playback().unwrap());
    assert!(rig.camera.auto_update());
    assert!(rig.controls.update_enabled());
}

#[test]
fn test_playback_counter_shows_applied_frame() {
    let rig = rig();
    let mut engine = engine(&rig, &[]);

    engine.start_recording();
    engine.run(&mut CountedClock::new(2)).unwrap();
    engine.stop_recording();

    engine.start_playback().unwrap();
    engine.run(&mut CountedClock::new(3)).unwrap();

    let history = rig.display.history();
    let tail: Vec<&str> = history[history.len() - 3..].iter().map(String::as_str).collect();
    assert_eq!(tail, vec!["0/2", "1/2", "0/2"]);
}

#[test]
fn test_application_sees_replayed_gamepads_only_while_playing() {
    let rig = rig();
    let mut live = resting_wand();
    live.axes = vec![0.9, -0.9];
    rig.input.set(0, Some(live));

    let mut engine = engine(&rig, &[0]);
    let app_input = engine.input_source();

    engine.start_recording();
    engine.on_animation_frame().unwrap();
    engine.stop_recording();

    // The live stick moves on; playback must still report what was recorded.
    let mut moved = resting_wand();
    moved.axes = vec![0.0, 0.5];
    rig.input.set(0, Some(moved));

    engine.start_playback().unwrap();
    engine.on_animation_frame().unwrap();
    assert_eq!(app_input.gamepads()[0].as_ref().unwrap().axes, vec![0.9, -0.9]);
    assert!(app_input.gamepads()[2].is_none());

    engine.stop_playback();
    assert_eq!(app_input.gamepads()[0].as_ref().unwrap().axes, vec![0.0, 0.5]);
}

#[test]
fn test_save_then_load_round_trips() {
    let rig = rig();
    rig.input.set(0, Some(resting_wand()));
    let mut engine = engine(&rig, &[0, 1]);

    engine.start_recording();
    for tag in 0..4 {
        rig.camera.move_to(tagged(tag as f32 * 0.1));
        engine.on_animation_frame().unwrap();
    }
    engine.stop_recording();

    let before = engine.session().frames().to_vec();
    let bytes = engine.save().unwrap();

    engine.clear();
    assert!(engine.session().is_empty());

    engine.load_bytes(&bytes).unwrap();
    assert_eq!(engine.session().frames(), before.as_slice());
    assert_eq!(engine.save().unwrap(), bytes);
}

#[test]
fn test_save_to_dir_and_load_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let rig = rig();
    let mut engine = engine(&rig, &[0]);

    engine.start_recording();
    engine.run(&mut CountedClock::new(2)).unwrap();
    engine.stop_recording();

    let path = engine.save_to_dir(Some(dir.path())).unwrap();
    assert_eq!(path.parent(), Some(dir.path()));

    let mut other = self::engine(&self::rig(), &[0]);
    other.load(&path).unwrap();
    assert_eq!(other.session().frames(), engine.session().frames());
}

#[test]
fn test_startup_session_is_loaded_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("take.json");

    let rig = rig();
    let mut recorder = engine(&rig, &[]);
    recorder.start_recording();
    recorder.run(&mut CountedClock::new(5)).unwrap();
    recorder.stop_recording();
    std::fs::write(&path, recorder.save().unwrap()).unwrap();

    let engine = VRPlayerEngine::builder()
        .with_config(EngineConfig {
            session_path: Some(path),
            ..EngineConfig::default()
        })
        .with_camera(MockCamera::default())
        .with_controls(MockControls::default())
        .build();

    assert_eq!(engine.session().len(), 5);
}

#[test]
fn test_malformed_file_leaves_session_unchanged() {
    let rig = rig();
    let mut engine = engine(&rig, &[]);

    engine.start_recording();
    engine.run(&mut CountedClock::new(2)).unwrap();
    engine.stop_recording();
    let before = engine.session().clone();

    let result = engine.load_bytes(br#"[[[1,0,0,0], {"axes": []}, null, null]]"#);

    assert!(matches!(result, Err(EngineError::InvalidSessionFile(_))));
    assert_eq!(engine.session(), &before);
}

#[test]
fn test_missing_file_reports_io_error() {
    let rig = rig();
    let mut engine = engine(&rig, &[]);

    let result = engine.load(std::path::Path::new("/no/such/session.json"));
    assert!(matches!(result, Err(EngineError::SessionIo(_))));
}

#[test]
fn test_clear_is_idempotent() {
    let rig = rig();
    let mut engine = engine(&rig, &[]);

    engine.start_recording();
    engine.run(&mut CountedClock::new(3)).unwrap();
    engine.stop_recording();

    engine.clear();
    engine.clear();

    assert!(engine.session().is_empty());
    assert_eq!(engine.session().cursor(), 0);
    assert_eq!(rig.display.last().as_deref(), Some("0/0"));
}

#[test]
fn test_malformed_gamepad_surfaces_from_tick() {
    let rig = rig();
    let mut broken = resting_wand();
    broken.buttons.truncate(1);
    rig.input.set(1, Some(broken));

    let mut engine = engine(&rig, &[1]);
    engine.start_recording();

    let result = engine.run(&mut CountedClock::new(5));

    assert!(matches!(result, Err(EngineError::MalformedDevice { slot: 1, buttons: 1 })));
    assert!(!engine.is_recording());
    assert!(engine.session().is_empty());
}

#[test]
fn test_without_camera_record_and_play_are_noops() {
    let controls = MockControls::default();
    let mut engine = VRPlayerEngine::builder()
        .with_config(EngineConfig::default())
        .with_controls(controls.clone())
        .build();

    engine.start_recording();
    assert!(!engine.is_recording());

    engine.start_playback().unwrap();
    assert!(!engine.is_playing());
    assert!(controls.update_enabled());

    assert_eq!(engine.run(&mut CountedClock::new(3)).unwrap(), 0);
}

#[test]
fn test_dropping_engine_releases_rig() {
    let rig = rig();
    let app_input = {
        let mut engine = engine(&rig, &[0]);
        engine.start_playback().unwrap();
        engine.input_source()
    };

    assert!(!app_input.is_active());
    assert!(rig.camera.auto_update());
    assert!(rig.controls.update_enabled());
}
