//! The in-memory recording plus its file format.
//!
//! A session file is a single JSON array of frames, each frame being the tuple
//! `[camera, standing, controller0 | null, controller1 | null]`.

use std::fs;
use std::path::{Path, PathBuf};

use time::OffsetDateTime;
use vr_host_integrations::Log;

use crate::errors::EngineError;
use crate::types::FramePacket;

/// An ordered list of frames and a playback cursor.
///
/// Whenever `frames` is non-empty the cursor is a valid index into it; when empty it's 0.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SessionStore {
    frames: Vec<FramePacket>,
    cursor: usize,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[FramePacket] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Adds a frame at the end. The cursor doesn't move.
    pub fn append(&mut self, frame: FramePacket) {
        self.frames.push(frame);
    }

    /// Replaces the whole recording and rewinds.
    pub fn load(&mut self, frames: Vec<FramePacket>) {
        self.frames = frames;
        self.cursor = 0;
    }

    pub fn clear(&mut self) {
        self.frames.clear();
        self.cursor = 0;
    }

    /// The frame under the cursor, if there are any frames at all.
    pub fn current(&self) -> Option<&FramePacket> {
        self.frames.get(self.cursor)
    }

    /// Moves the cursor forward one frame, wrapping back to the start after the last one.
    pub fn advance(&mut self) {
        if self.frames.is_empty() {
            self.cursor = 0;
            return;
        }

        self.cursor = (self.cursor + 1) % self.frames.len();
    }

    /// The `"<cursor>/<frameCount>"` counter shown to the user.
    pub fn progress_text(&self) -> String {
        format!("{}/{}", self.cursor, self.frames.len())
    }

    /// Serializes the current frames. The same frames always produce the same bytes.
    pub fn serialize(&self) -> Result<Vec<u8>, EngineError> {
        serde_json::to_vec(&self.frames).map_err(|e| EngineError::InvalidSessionFile(e.to_string()))
    }

    /// Parses session bytes without touching any existing session.
    pub fn deserialize(bytes: &[u8]) -> Result<Vec<FramePacket>, EngineError> {
        serde_json::from_slice(bytes).map_err(|e| EngineError::InvalidSessionFile(e.to_string()))
    }

    /// Replaces the recording with the frames in `bytes`.
    ///
    /// The bytes are fully parsed before anything is replaced, so a corrupt file leaves the
    /// current session exactly as it was.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<(), EngineError> {
        let frames = Self::deserialize(bytes)?;
        self.load(frames);
        Ok(())
    }

    pub fn read_file(&mut self, path: &Path) -> Result<(), EngineError> {
        let bytes = fs::read(path).map_err(|e| EngineError::SessionIo(format!("{}: {e}", path.display())))?;

        self.load_bytes(&bytes).map_err(|e| match e {
            EngineError::InvalidSessionFile(reason) => {
                EngineError::InvalidSessionFile(format!("{}: {reason}", path.display()))
            },
            other => other,
        })?;

        tracing::info!(target: Log::Session, ?path, frames = self.frames.len(), "Loaded session");
        Ok(())
    }

    pub fn write_file(&self, path: &Path) -> Result<(), EngineError> {
        let bytes = self.serialize()?;
        fs::write(path, bytes).map_err(|e| EngineError::SessionIo(format!("{}: {e}", path.display())))?;

        tracing::info!(target: Log::Session, ?path, frames = self.frames.len(), "Saved session");
        Ok(())
    }
}

/// Builds the `vr-<unix-millis>.json` path used when saving into a directory.
pub fn timestamped_file_name(dir: &Path) -> PathBuf {
    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    dir.join(format!("vr-{millis}.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ButtonSnapshot, InputSnapshot, PoseSnapshot};
    use vr_host_integrations::IDENTITY_MATRIX;

    fn frame(tag: f32) -> FramePacket {
        let mut camera_matrix = IDENTITY_MATRIX;
        camera_matrix[12] = tag;

        FramePacket {
            camera_matrix,
            standing_matrix: IDENTITY_MATRIX,
            controllers: [
                Some(InputSnapshot {
                    axes: [f64::from(tag), 0.0],
                    buttons: [ButtonSnapshot::default(); 4],
                    pose: PoseSnapshot::default(),
                }),
                None,
            ],
        }
    }

    fn session_of(n: usize) -> SessionStore {
        let mut session = SessionStore::new();
        for i in 0..n {
            session.append(frame(i as f32));
        }
        session
    }

    #[test]
    fn test_append_keeps_cursor() {
        let session = session_of(3);

        assert_eq!(session.len(), 3);
        assert_eq!(session.cursor(), 0);
        assert_eq!(session.progress_text(), "0/3");
    }

    #[test]
    fn test_advance_wraps_to_start() {
        let mut session = session_of(3);

        session.advance();
        session.advance();
        assert_eq!(session.cursor(), 2);

        session.advance();
        assert_eq!(session.cursor(), 0);
    }

    #[test]
    fn test_advance_on_empty_stays_at_zero() {
        let mut session = SessionStore::new();
        session.advance();

        assert_eq!(session.cursor(), 0);
        assert!(session.current().is_none());
    }

    #[test]
    fn test_clear_twice_matches_clear_once() {
        let mut once = session_of(2);
        once.advance();
        once.clear();

        let mut twice = session_of(2);
        twice.advance();
        twice.clear();
        twice.clear();

        assert_eq!(once, twice);
        assert_eq!(twice.progress_text(), "0/0");
    }

    #[test]
    fn test_load_rewinds_cursor() {
        let mut session = session_of(4);
        session.advance();
        session.advance();

        session.load(vec![frame(9.0)]);
        assert_eq!(session.cursor(), 0);
        assert_eq!(session.len(), 1);
    }

    #[test]
    fn test_serialize_is_reproducible() {
        let session = session_of(3);

        assert_eq!(session.serialize().unwrap(), session.serialize().unwrap());
    }

    #[test]
    fn test_empty_session_serializes_as_empty_array() {
        assert_eq!(SessionStore::new().serialize().unwrap(), b"[]".to_vec());
    }

    #[test]
    fn test_corrupt_bytes_leave_session_untouched() {
        let mut session = session_of(2);
        session.advance();
        let before = session.clone();

        let result = session.load_bytes(br#"[[1, 2, 3]]"#);

        assert!(matches!(result, Err(EngineError::InvalidSessionFile(_))));
        assert_eq!(session, before);
    }

    #[test]
    fn test_truncated_file_is_rejected() {
        let bytes = session_of(2).serialize().unwrap();
        let truncated = &bytes[..bytes.len() - 5];

        assert!(SessionStore::deserialize(truncated).is_err());
    }

    #[test]
    fn test_timestamped_file_name_shape() {
        let path = timestamped_file_name(Path::new("/tmp/sessions"));
        let name = path.file_name().unwrap().to_str().unwrap();

        assert!(name.starts_with("vr-"));
        assert!(name.ends_with(".json"));
        assert!(name["vr-".len()..name.len() - ".json".len()].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(path.parent(), Some(Path::new("/tmp/sessions")));
    }
}
