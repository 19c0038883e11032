use crate::protocol::models::{MediaDevice, MediaTrack, Participant, SelectedDevices};
use serde_json::Value;
use std::collections::HashMap;

/// Event kinds a call session emits and listeners subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    AvailableDevicesUpdated,
    SelectedDevicesUpdated,
    TrackStarted,
    TrackStopped,
    ParticipantJoined,
    ParticipantLeft,
    LocalAudioLevel,
    RemoteParticipantsAudioLevel,
    AppMessage,
    LeftMeeting,
}

impl EventKind {
    pub const ALL: [Self; 10] = [
        Self::AvailableDevicesUpdated,
        Self::SelectedDevicesUpdated,
        Self::TrackStarted,
        Self::TrackStopped,
        Self::ParticipantJoined,
        Self::ParticipantLeft,
        Self::LocalAudioLevel,
        Self::RemoteParticipantsAudioLevel,
        Self::AppMessage,
        Self::LeftMeeting,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AvailableDevicesUpdated => "available-devices-updated",
            Self::SelectedDevicesUpdated => "selected-devices-updated",
            Self::TrackStarted => "track-started",
            Self::TrackStopped => "track-stopped",
            Self::ParticipantJoined => "participant-joined",
            Self::ParticipantLeft => "participant-left",
            Self::LocalAudioLevel => "local-audio-level",
            Self::RemoteParticipantsAudioLevel => "remote-participants-audio-level",
            Self::AppMessage => "app-message",
            Self::LeftMeeting => "left-meeting",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub enum CallEvent {
    AvailableDevicesUpdated {
        devices: Vec<MediaDevice>,
    },
    SelectedDevicesUpdated {
        devices: SelectedDevices,
    },
    TrackStarted {
        track: MediaTrack,
        participant: Option<Participant>,
    },
    TrackStopped {
        track: MediaTrack,
        participant: Option<Participant>,
    },
    ParticipantJoined {
        participant: Participant,
    },
    ParticipantLeft {
        participant: Participant,
    },
    LocalAudioLevel {
        level: f32,
    },
    /// Audio levels keyed by remote participant session id.
    RemoteParticipantsAudioLevel {
        levels: HashMap<String, f32>,
    },
    AppMessage {
        data: Value,
        from_id: String,
    },
    LeftMeeting,
}

impl CallEvent {
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::AvailableDevicesUpdated { .. } => EventKind::AvailableDevicesUpdated,
            Self::SelectedDevicesUpdated { .. } => EventKind::SelectedDevicesUpdated,
            Self::TrackStarted { .. } => EventKind::TrackStarted,
            Self::TrackStopped { .. } => EventKind::TrackStopped,
            Self::ParticipantJoined { .. } => EventKind::ParticipantJoined,
            Self::ParticipantLeft { .. } => EventKind::ParticipantLeft,
            Self::LocalAudioLevel { .. } => EventKind::LocalAudioLevel,
            Self::RemoteParticipantsAudioLevel { .. } => EventKind::RemoteParticipantsAudioLevel,
            Self::AppMessage { .. } => EventKind::AppMessage,
            Self::LeftMeeting => EventKind::LeftMeeting,
        }
    }
}
