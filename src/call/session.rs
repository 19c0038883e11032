use crate::Result;
use crate::protocol::models::{MediaDevice, Participants, SelectedDevices};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use super::events::EventKind;
use super::listeners::{EventListener, ListenerId};

/// Media defaults applied when a call session is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CallConfig {
    pub start_video_off: bool,
    pub start_audio_off: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomConfig {
    /// Room expiry as a unix timestamp in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub config: RoomConfig,
}

/// One live call as exposed by the underlying call SDK.
///
/// Events are delivered to listeners registered with [`CallSession::on`],
/// one at a time and in the order the SDK produces them. Device switches
/// (`set_camera` and friends) are expected to emit
/// [`EventKind::SelectedDevicesUpdated`] before their future resolves.
#[async_trait]
pub trait CallSession: Send + Sync {
    async fn join(&self, url: &Url, token: Option<&str>) -> Result<()>;
    /// Leave the room. [`EventKind::LeftMeeting`] must be emitted before the
    /// future resolves; the session is destroyed right after.
    async fn leave(&self) -> Result<()>;
    /// Release the session. Registered listeners are dropped.
    async fn destroy(&self) -> Result<()>;
    async fn room(&self) -> Result<RoomInfo>;

    /// Start local capture and report the devices picked for it.
    async fn start_camera(&self) -> Result<SelectedDevices>;
    async fn enumerate_devices(&self) -> Result<Vec<MediaDevice>>;
    async fn set_camera(&self, device_id: &str) -> Result<Option<MediaDevice>>;
    async fn set_microphone(&self, device_id: &str) -> Result<Option<MediaDevice>>;
    async fn set_speaker(&self, device_id: &str) -> Result<Option<MediaDevice>>;

    fn set_local_audio(&self, enabled: bool);
    fn set_local_video(&self, enabled: bool);
    fn local_audio(&self) -> bool;
    fn local_video(&self) -> bool;

    async fn start_local_audio_level_observer(&self, interval: Duration) -> Result<()>;
    async fn start_remote_participants_audio_level_observer(&self, interval: Duration) -> Result<()>;
    fn stop_local_audio_level_observer(&self);
    fn stop_remote_participants_audio_level_observer(&self);
    fn is_local_audio_level_observer_running(&self) -> bool;
    fn is_remote_participants_audio_level_observer_running(&self) -> bool;

    /// Broadcast an app message to every participant.
    ///
    /// # Errors
    /// Returns an error if the session refuses the message.
    fn send_app_message(&self, data: Value) -> Result<()>;
    fn participants(&self) -> Participants;

    fn on(&self, kind: EventKind, listener: EventListener) -> ListenerId;
    fn off(&self, id: ListenerId);
}

/// Creates call sessions. Held by the [`super::SessionRegistry`].
pub trait CallProvider: Send + Sync {
    /// # Errors
    /// Returns an error if the SDK cannot create a session.
    fn create_session(&self, config: CallConfig) -> Result<Arc<dyn CallSession>>;
}
