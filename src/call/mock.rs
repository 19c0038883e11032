//! In-memory call session used by unit tests.

use crate::protocol::models::{
    DeviceKind, MediaDevice, Participant, ParticipantTracks, Participants, SelectedDevices,
};
use crate::{Error, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

use super::events::{CallEvent, EventKind};
use super::listeners::{EventListener, ListenerId, Listeners};
use super::session::{CallConfig, CallProvider, CallSession, RoomConfig, RoomInfo};

pub fn device(id: &str, kind: DeviceKind) -> MediaDevice {
    MediaDevice::new(id, format!("{id} label"), kind)
}

pub fn participant(session_id: &str, local: bool, tracks: ParticipantTracks) -> Participant {
    Participant {
        session_id: session_id.to_string(),
        user_id: format!("user-{session_id}"),
        user_name: format!("name-{session_id}"),
        local,
        tracks,
    }
}

#[derive(Default)]
pub struct MockCallSession {
    pub config: CallConfig,
    listeners: Listeners,
    calls: Mutex<Vec<String>>,
    devices: Mutex<Vec<MediaDevice>>,
    selected: Mutex<SelectedDevices>,
    participants: Mutex<Participants>,
    room: Mutex<RoomInfo>,
    sent: Mutex<Vec<Value>>,
    cancel_on_join: Mutex<Option<CancellationToken>>,
    pub fail_join: AtomicBool,
    pub fail_camera: AtomicBool,
    pub fail_enumerate: AtomicBool,
    pub fail_room: AtomicBool,
    /// Switches succeed but report no device back.
    pub switch_reports_none: AtomicBool,
    local_audio: AtomicBool,
    local_video: AtomicBool,
    local_observer: AtomicBool,
    remote_observer: AtomicBool,
    destroyed: AtomicBool,
}

impl MockCallSession {
    pub fn new(config: CallConfig) -> Self {
        let session = Self {
            config,
            ..Self::default()
        };
        session.local_audio.store(!config.start_audio_off, Ordering::SeqCst);
        session.local_video.store(!config.start_video_off, Ordering::SeqCst);
        *session.devices.lock() = vec![
            device("cam-1", DeviceKind::VideoInput),
            device("cam-2", DeviceKind::VideoInput),
            device("mic-1", DeviceKind::AudioInput),
            device("speaker-1", DeviceKind::AudioOutput),
        ];
        *session.selected.lock() = SelectedDevices {
            camera: Some(device("cam-1", DeviceKind::VideoInput)),
            microphone: Some(device("mic-1", DeviceKind::AudioInput)),
            speaker: Some(device("speaker-1", DeviceKind::AudioOutput)),
        };
        session
    }

    pub fn emit(&self, event: CallEvent) {
        self.listeners.emit(&event);
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.count(kind)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn sent(&self) -> Vec<Value> {
        self.sent.lock().clone()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::SeqCst)
    }

    pub fn set_room(&self, room: RoomInfo) {
        *self.room.lock() = room;
    }

    pub fn set_room_expiry(&self, exp: u64) {
        self.set_room(RoomInfo {
            name: Some("room".to_string()),
            config: RoomConfig { exp: Some(exp) },
        });
    }

    pub fn add_device(&self, device: MediaDevice) {
        self.devices.lock().push(device);
    }

    pub fn set_local_participant(&self, participant: Participant) {
        self.participants.lock().local = Some(participant);
    }

    pub fn add_remote(&self, participant: Participant) {
        self.participants
            .lock()
            .remote
            .insert(participant.session_id.clone(), participant);
    }

    /// Cancel `token` while the join is in flight.
    pub fn cancel_during_join(&self, token: CancellationToken) {
        *self.cancel_on_join.lock() = Some(token);
    }

    fn record(&self, call: &str) {
        self.calls.lock().push(call.to_string());
    }

    fn find_device(&self, device_id: &str) -> Result<MediaDevice> {
        self.devices
            .lock()
            .iter()
            .find(|d| d.device_id == device_id)
            .cloned()
            .ok_or_else(|| Error::call(format!("unknown device {device_id}")))
    }

    fn switch(
        &self,
        device_id: &str,
        apply: impl FnOnce(&mut SelectedDevices, MediaDevice),
    ) -> Result<Option<MediaDevice>> {
        let device = self.find_device(device_id)?;
        let selected = {
            let mut selected = self.selected.lock();
            apply(&mut *selected, device.clone());
            selected.clone()
        };
        self.emit(CallEvent::SelectedDevicesUpdated { devices: selected });
        if self.switch_reports_none.load(Ordering::SeqCst) {
            return Ok(None);
        }
        Ok(Some(device))
    }
}

#[async_trait]
impl CallSession for MockCallSession {
    async fn join(&self, url: &Url, _token: Option<&str>) -> Result<()> {
        self.record(&format!("join {url}"));
        if let Some(token) = self.cancel_on_join.lock().take() {
            token.cancel();
        }
        if self.fail_join.load(Ordering::SeqCst) {
            return Err(Error::call("room not found"));
        }
        Ok(())
    }

    async fn leave(&self) -> Result<()> {
        self.record("leave");
        self.emit(CallEvent::LeftMeeting);
        Ok(())
    }

    async fn destroy(&self) -> Result<()> {
        self.record("destroy");
        self.destroyed.store(true, Ordering::SeqCst);
        self.listeners.clear();
        Ok(())
    }

    async fn room(&self) -> Result<RoomInfo> {
        if self.fail_room.load(Ordering::SeqCst) {
            return Err(Error::call("room metadata unavailable"));
        }
        Ok(self.room.lock().clone())
    }

    async fn start_camera(&self) -> Result<SelectedDevices> {
        self.record("start_camera");
        if self.fail_camera.load(Ordering::SeqCst) {
            return Err(Error::call("camera permission denied"));
        }
        Ok(self.selected.lock().clone())
    }

    async fn enumerate_devices(&self) -> Result<Vec<MediaDevice>> {
        self.record("enumerate_devices");
        if self.fail_enumerate.load(Ordering::SeqCst) {
            return Err(Error::call("enumeration failed"));
        }
        Ok(self.devices.lock().clone())
    }

    async fn set_camera(&self, device_id: &str) -> Result<Option<MediaDevice>> {
        self.switch(device_id, |selected, device| selected.camera = Some(device))
    }

    async fn set_microphone(&self, device_id: &str) -> Result<Option<MediaDevice>> {
        self.switch(device_id, |selected, device| selected.microphone = Some(device))
    }

    async fn set_speaker(&self, device_id: &str) -> Result<Option<MediaDevice>> {
        self.switch(device_id, |selected, device| selected.speaker = Some(device))
    }

    fn set_local_audio(&self, enabled: bool) {
        self.local_audio.store(enabled, Ordering::SeqCst);
    }

    fn set_local_video(&self, enabled: bool) {
        self.local_video.store(enabled, Ordering::SeqCst);
    }

    fn local_audio(&self) -> bool {
        self.local_audio.load(Ordering::SeqCst)
    }

    fn local_video(&self) -> bool {
        self.local_video.load(Ordering::SeqCst)
    }

    async fn start_local_audio_level_observer(&self, interval: Duration) -> Result<()> {
        self.record(&format!("start_local_observer {}ms", interval.as_millis()));
        self.local_observer.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn start_remote_participants_audio_level_observer(&self, interval: Duration) -> Result<()> {
        self.record(&format!("start_remote_observer {}ms", interval.as_millis()));
        self.remote_observer.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn stop_local_audio_level_observer(&self) {
        self.record("stop_local_observer");
        self.local_observer.store(false, Ordering::SeqCst);
    }

    fn stop_remote_participants_audio_level_observer(&self) {
        self.record("stop_remote_observer");
        self.remote_observer.store(false, Ordering::SeqCst);
    }

    fn is_local_audio_level_observer_running(&self) -> bool {
        self.local_observer.load(Ordering::SeqCst)
    }

    fn is_remote_participants_audio_level_observer_running(&self) -> bool {
        self.remote_observer.load(Ordering::SeqCst)
    }

    fn send_app_message(&self, data: Value) -> Result<()> {
        self.sent.lock().push(data);
        Ok(())
    }

    fn participants(&self) -> Participants {
        self.participants.lock().clone()
    }

    fn on(&self, kind: EventKind, listener: EventListener) -> ListenerId {
        self.listeners.subscribe(kind, listener)
    }

    fn off(&self, id: ListenerId) {
        self.listeners.unsubscribe(id);
    }
}

#[derive(Default)]
pub struct MockProvider {
    sessions: Mutex<Vec<Arc<MockCallSession>>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sessions(&self) -> Vec<Arc<MockCallSession>> {
        self.sessions.lock().clone()
    }

    pub fn last(&self) -> Arc<MockCallSession> {
        self.sessions.lock().last().cloned().expect("a session was created")
    }
}

impl CallProvider for MockProvider {
    fn create_session(&self, config: CallConfig) -> Result<Arc<dyn CallSession>> {
        let session = Arc::new(MockCallSession::new(config));
        self.sessions.lock().push(Arc::clone(&session));
        Ok(session)
    }
}
