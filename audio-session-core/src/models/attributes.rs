use serde::{Deserialize, Serialize};

/// Intended playback use, reported to the host with each focus request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioUsage {
    #[default]
    Media,
    Game,
    VoiceCommunication,
    Notification,
    Alarm,
    Unknown,
}

/// What kind of content is being played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    #[default]
    Music,
    Speech,
    Sonification,
    Movie,
    Unknown,
}

/// Immutable description of a session's playback use.
///
/// Defaults to media/music, the profile of a synthesizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AudioAttributes {
    pub usage: AudioUsage,
    pub content_type: ContentType,
}

impl AudioAttributes {
    pub fn new(usage: AudioUsage, content_type: ContentType) -> Self {
        Self { usage, content_type }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_media_music() {
        let attrs = AudioAttributes::default();
        assert_eq!(attrs.usage, AudioUsage::Media);
        assert_eq!(attrs.content_type, ContentType::Music);
    }

    #[test]
    fn deserializes_camel_case_fields() {
        let attrs: AudioAttributes =
            serde_json::from_str(r#"{"usage":"game","contentType":"sonification"}"#).unwrap();
        assert_eq!(attrs, AudioAttributes::new(AudioUsage::Game, ContentType::Sonification));
    }
}
