//! Write-time validation
//!
//! Validators are plain values handed to whatever persists the entity. They
//! never touch storage and never modify what they check.

use crate::types::PlaylistItem;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A rule that an entity broke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rule {
    /// The item has not been added to a playlist
    Playlist,
    /// The item has no video
    Video,
    /// The item's sequence is negative
    Sequence,
}

impl Rule {
    /// Name reported to callers
    pub fn as_str(&self) -> &'static str {
        match self {
            Rule::Playlist => "playlist",
            Rule::Video => "video",
            Rule::Sequence => "sequence",
        }
    }

    /// Human readable description of the requirement
    pub fn requirement(&self) -> &'static str {
        match self {
            Rule::Playlist => "item must belong to a playlist",
            Rule::Video => "item must reference a video",
            Rule::Sequence => "sequence must be zero or greater",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every rule an entity failed, in rule order
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed: {}", describe(.failed))]
pub struct ValidationError {
    failed: Vec<Rule>,
}

impl ValidationError {
    /// Rules that failed
    pub fn failed(&self) -> &[Rule] {
        &self.failed
    }

    /// Names of the rules that failed
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.failed.iter().map(Rule::as_str).collect()
    }

    pub fn contains(&self, rule: Rule) -> bool {
        self.failed.contains(&rule)
    }
}

fn describe(failed: &[Rule]) -> String {
    failed
        .iter()
        .map(|rule| format!("{} ({})", rule, rule.requirement()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Checks an entity before it is written
pub trait Validator<T>: Send + Sync {
    /// Evaluate every rule and report all failures at once
    ///
    /// # Errors
    /// A `ValidationError` naming each failed rule.
    fn validate(&self, value: &T) -> Result<(), ValidationError>;
}

/// Rules for saving or updating a [`PlaylistItem`]
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaylistItemValidator;

impl PlaylistItemValidator {
    pub fn new() -> Self {
        Self
    }
}

impl Validator<PlaylistItem> for PlaylistItemValidator {
    fn validate(&self, item: &PlaylistItem) -> Result<(), ValidationError> {
        let mut failed = Vec::new();

        if item.playlist_id().is_none() {
            failed.push(Rule::Playlist);
        }
        if item.video().is_none() {
            failed.push(Rule::Video);
        }
        if item.sequence() < 0 {
            failed.push(Rule::Sequence);
        }

        if failed.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { failed })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Playlist, Video, VideoId};

    fn video() -> Video {
        Video::new(VideoId::new("vid"), "A video", 90)
    }

    #[test]
    fn attached_item_passes() {
        let mut playlist = Playlist::new("Mix");
        let item = playlist
            .add_item(PlaylistItem::new("Item", video()))
            .unwrap();

        assert!(PlaylistItemValidator.validate(&item).is_ok());
    }

    #[test]
    fn unattached_item_fails_playlist_and_sequence() {
        let item = PlaylistItem::new("Item", video());

        let err = PlaylistItemValidator.validate(&item).unwrap_err();

        assert_eq!(err.failed(), [Rule::Playlist, Rule::Sequence]);
        assert!(!err.contains(Rule::Video));
    }

    #[test]
    fn payload_without_video_reports_every_rule() {
        let item: PlaylistItem = serde_json::from_str(r#"{"title":"bare"}"#).unwrap();

        let err = PlaylistItemValidator.validate(&item).unwrap_err();

        assert_eq!(err.rule_names(), ["playlist", "video", "sequence"]);
        let message = err.to_string();
        assert!(message.contains("playlist"));
        assert!(message.contains("video"));
        assert!(message.contains("sequence"));
    }

    #[test]
    fn negative_sequence_alone_is_reported() {
        let item: PlaylistItem = serde_json::from_str(
            r#"{
                "title": "odd",
                "sequence": -4,
                "playlist_id": "p1",
                "video": {"id": "v", "title": "v", "duration_seconds": 1}
            }"#,
        )
        .unwrap();

        let err = PlaylistItemValidator.validate(&item).unwrap_err();

        assert_eq!(err.failed(), [Rule::Sequence]);
    }

    #[test]
    fn validation_does_not_mutate_item() {
        let item = PlaylistItem::new("Item", video());
        let before = item.clone();

        let _ = PlaylistItemValidator.validate(&item);

        assert_eq!(item, before);
    }
}
