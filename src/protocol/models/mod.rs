pub mod auth;
pub mod devices;
pub mod participants;
pub mod state;

pub use auth::AuthBundle;
pub use devices::{AvailableDevices, DeviceKind, MediaDevice, SelectedDevices, same_device};
pub use participants::{
    MediaTrack, Participant, ParticipantTracks, Participants, PublicParticipant, TrackBundle,
    TrackKind, Tracks,
};
pub use state::TransportState;
