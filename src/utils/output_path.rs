//! Output file naming for synthesized audio.

use std::path::{Path, PathBuf};

use time::OffsetDateTime;
use time::macros::format_description;

use crate::core::base::{VoiceCloneError, VoiceCloneResult};
use crate::core::tts::AudioEncoding;

/// Maximum length of a user-supplied file name prefix.
pub const MAX_PREFIX_LENGTH: usize = 50;

/// Builds `dir/<prefix>_<YYYYMMDD_HHMMSS>.<ext>` for a synthesized clip.
///
/// The timestamp uses local time when the offset can be determined and UTC
/// otherwise.
pub fn timestamped_output_path(
    dir: &Path,
    prefix: &str,
    encoding: AudioEncoding,
) -> VoiceCloneResult<PathBuf> {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    output_path_at(dir, prefix, encoding, now)
}

pub(crate) fn output_path_at(
    dir: &Path,
    prefix: &str,
    encoding: AudioEncoding,
    at: OffsetDateTime,
) -> VoiceCloneResult<PathBuf> {
    let prefix = prefix.trim();
    if prefix.is_empty() {
        return Err(VoiceCloneError::InvalidRequest(
            "file name prefix must not be empty".to_string(),
        ));
    }
    if prefix.chars().count() > MAX_PREFIX_LENGTH {
        return Err(VoiceCloneError::InvalidRequest(format!(
            "file name prefix must be at most {MAX_PREFIX_LENGTH} characters"
        )));
    }
    if prefix.contains(['/', '\\']) {
        return Err(VoiceCloneError::InvalidRequest(
            "file name prefix must not contain path separators".to_string(),
        ));
    }

    let stamp = at
        .format(format_description!(
            "[year][month][day]_[hour][minute][second]"
        ))
        .map_err(|e| VoiceCloneError::InvalidRequest(format!("failed to format timestamp: {e}")))?;

    Ok(dir.join(format!("{prefix}_{stamp}.{}", encoding.file_extension())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_output_path_format() {
        let at = datetime!(2024-03-05 07:08:09 UTC);
        let path = output_path_at(Path::new("output"), "greeting", AudioEncoding::Mp3, at).unwrap();
        assert_eq!(path, PathBuf::from("output/greeting_20240305_070809.mp3"));
    }

    #[test]
    fn test_output_path_uses_encoding_extension() {
        let at = datetime!(2024-03-05 07:08:09 UTC);
        let path =
            output_path_at(Path::new("out"), "clip", AudioEncoding::OggOpus, at).unwrap();
        assert_eq!(path, PathBuf::from("out/clip_20240305_070809.ogg"));
    }

    #[test]
    fn test_prefix_rules() {
        let at = datetime!(2024-03-05 07:08:09 UTC);
        assert!(output_path_at(Path::new("out"), "  ", AudioEncoding::Mp3, at).is_err());
        let long = "a".repeat(MAX_PREFIX_LENGTH + 1);
        assert!(output_path_at(Path::new("out"), &long, AudioEncoding::Mp3, at).is_err());
        let exact = "a".repeat(MAX_PREFIX_LENGTH);
        assert!(output_path_at(Path::new("out"), &exact, AudioEncoding::Mp3, at).is_ok());
        assert!(output_path_at(Path::new("out"), "../x", AudioEncoding::Mp3, at).is_err());
    }
}
