#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::multiple_crate_versions)]

//! Transport adapter that runs a realtime voice-assistant client over a
//! third-party audio/video call session.
//!
//! The call SDK is reached through [`call::CallSession`]; the client framework
//! drives a [`CallTransport`] and receives [`TransportCallbacks`].

pub mod call;
pub mod error;
pub mod protocol;
pub mod transport;

pub use call::{
    CallConfig, CallEvent, CallProvider, CallSession, EventKind, EventListener, ListenerId,
    Listeners, RoomConfig, RoomInfo, SessionRegistry,
};
pub use error::{Error, Result};
pub use protocol::messages::{CLIENT_READY, MESSAGE_LABEL, MessageEnvelope, TransportMessage};
pub use protocol::models::{
    AuthBundle, AvailableDevices, DeviceKind, MediaDevice, MediaTrack, Participant,
    ParticipantTracks, Participants, PublicParticipant, SelectedDevices, TrackBundle, TrackKind,
    Tracks, TransportState,
};
pub use transport::{
    AUDIO_LEVEL_INTERVAL, CallTransport, MessageHandler, MessageStream, TransportCallbacks,
    TransportOptions, TransportOptionsBuilder, message_channel,
};
pub use tokio_util::sync::CancellationToken;
