use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Audio,
    Video,
}

/// Reference to a live media track owned by the call session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MediaTrack {
    pub id: String,
    pub kind: TrackKind,
}

impl MediaTrack {
    #[must_use]
    pub fn audio(id: impl Into<String>) -> Self {
        Self { id: id.into(), kind: TrackKind::Audio }
    }

    #[must_use]
    pub fn video(id: impl Into<String>) -> Self {
        Self { id: id.into(), kind: TrackKind::Video }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParticipantTracks {
    pub audio: Option<MediaTrack>,
    pub video: Option<MediaTrack>,
}

/// A participant as the call session sees it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Participant {
    pub session_id: String,
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
    pub local: bool,
    #[serde(default)]
    pub tracks: ParticipantTracks,
}

/// The only participant fields exposed to the client framework.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublicParticipant {
    pub id: String,
    pub local: bool,
    pub name: String,
}

impl From<&Participant> for PublicParticipant {
    fn from(participant: &Participant) -> Self {
        Self {
            id: participant.user_id.clone(),
            local: participant.local,
            name: participant.user_name.clone(),
        }
    }
}

/// Snapshot of everyone in the call, remote participants keyed by session id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Participants {
    pub local: Option<Participant>,
    pub remote: HashMap<String, Participant>,
}

impl Participants {
    #[must_use]
    pub fn remote(&self, session_id: &str) -> Option<&Participant> {
        self.remote.get(session_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackBundle {
    pub audio: Option<MediaTrack>,
    pub video: Option<MediaTrack>,
}

impl From<&Participant> for TrackBundle {
    fn from(participant: &Participant) -> Self {
        Self {
            audio: participant.tracks.audio.clone(),
            video: participant.tracks.video.clone(),
        }
    }
}

/// Local and bot media, rebuilt from participant state on every request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tracks {
    pub local: TrackBundle,
    pub bot: Option<TrackBundle>,
}
