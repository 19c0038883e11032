use crate::call::{CallEvent, CallSession, EventKind, ListenerId, SessionRegistry};
use crate::protocol::messages::{MessageEnvelope, TransportMessage};
use crate::protocol::models::{
    AuthBundle, AvailableDevices, MediaDevice, TrackBundle, Tracks, TransportState,
};
use crate::{Error, Result};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use super::bridge::{EventBridge, Shared};
use super::callbacks::MessageHandler;
use super::options::TransportOptions;
use super::state::DeviceSlot;

/// Sampling interval for local and remote audio-level observers.
pub const AUDIO_LEVEL_INTERVAL: Duration = Duration::from_millis(100);

/// Transport that runs a voice-assistant client over a call session.
///
/// Lifecycle: [`initialize`](Self::initialize) → [`init_devices`](Self::init_devices)
/// → [`connect`](Self::connect) → [`send_ready_message`](Self::send_ready_message)
/// → [`disconnect`](Self::disconnect).
///
/// Thread safety: `CallTransport` is `Send + Sync`; wrap it in an `Arc` to
/// wait for readiness on one task while operating it from another.
pub struct CallTransport {
    registry: Arc<SessionRegistry>,
    shared: Mutex<Option<Arc<Shared>>>,
    session: Mutex<Option<Arc<dyn CallSession>>>,
    listeners: Mutex<Vec<ListenerId>>,
}

impl CallTransport {
    #[must_use]
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self {
            registry,
            shared: Mutex::new(None),
            session: Mutex::new(None),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Store callbacks, replace any existing call session and start listening to it.
    ///
    /// # Errors
    /// Returns an error if the stale session cannot be destroyed or a new one
    /// cannot be created.
    pub async fn initialize<F>(&self, options: TransportOptions, on_message: F) -> Result<()>
    where
        F: Fn(TransportMessage) + Send + Sync + 'static,
    {
        self.initialize_with_handler(options, Arc::new(on_message)).await
    }

    /// Same as [`initialize`](Self::initialize) with a shared handler, e.g. from
    /// [`super::message_channel`].
    ///
    /// # Errors
    /// Returns an error if the stale session cannot be destroyed or a new one
    /// cannot be created.
    pub async fn initialize_with_handler(
        &self,
        options: TransportOptions,
        on_message: MessageHandler,
    ) -> Result<()> {
        self.detach_listeners();

        let config = options.call_config();
        let shared = Arc::new(Shared::new(options.callbacks, on_message));
        let session = self.registry.create(config).await?;
        let listeners = EventBridge::attach(Arc::clone(&shared), &session);

        *self.session.lock() = Some(session);
        *self.listeners.lock() = listeners;
        *self.shared.lock() = Some(Arc::clone(&shared));

        tracing::debug!(
            "Call session created (video off: {}, audio off: {})",
            config.start_video_off,
            config.start_audio_off
        );
        shared.set_state(TransportState::Disconnected);
        Ok(())
    }

    /// Start the camera, report devices and start audio-level observers.
    ///
    /// # Errors
    /// Returns `NotInitialized` before `initialize`; camera and enumeration
    /// failures are returned unchanged.
    pub async fn init_devices(&self) -> Result<()> {
        let (session, shared) = self.attached()?;
        shared.set_state(TransportState::Initializing);

        let selected = session.start_camera().await?;
        let devices = session.enumerate_devices().await?;
        shared.notify_available(devices);

        for slot in DeviceSlot::ALL {
            let device = slot.pick(&selected).cloned();
            shared.devices.lock().set(slot, device.clone());
            shared.notify_device(slot, device);
        }

        if !session.is_local_audio_level_observer_running() {
            session.start_local_audio_level_observer(AUDIO_LEVEL_INTERVAL).await?;
        }
        if !session.is_remote_participants_audio_level_observer_running() {
            session
                .start_remote_participants_audio_level_observer(AUDIO_LEVEL_INTERVAL)
                .await?;
        }

        shared.set_state(TransportState::Initialized);
        Ok(())
    }

    /// Join the room described by `auth`.
    ///
    /// `cancel` is checked before and after the join. A cancellation seen
    /// after the join skips the connected notification but keeps the session.
    ///
    /// # Errors
    /// Returns `NotInitialized` before `initialize`, or `TransportStart` if
    /// the join fails.
    pub async fn connect(&self, auth: &AuthBundle, cancel: &CancellationToken) -> Result<()> {
        let (session, shared) = self.attached()?;
        if cancel.is_cancelled() {
            tracing::debug!("Connect cancelled before join");
            return Ok(());
        }

        shared.set_state(TransportState::Connecting);
        if let Err(err) = session.join(&auth.room_url, auth.token.as_deref()).await {
            tracing::warn!("Failed to join room: {err}");
            shared.set_state(TransportState::Error);
            return Err(Error::TransportStart);
        }

        match session.room().await {
            Ok(room) => *shared.expiry.lock() = room.config.exp,
            Err(err) => tracing::warn!("Failed to read room metadata: {err}"),
        }

        if cancel.is_cancelled() {
            tracing::debug!("Connect cancelled after join");
            return Ok(());
        }

        shared.set_state(TransportState::Connected);
        tracing::info!("Joined room {}", auth.room_url);
        shared.callbacks.connected();
        Ok(())
    }

    /// Wait for the first remote track, then announce the client as ready.
    ///
    /// There is no timeout: if no remote track ever starts, this never returns.
    ///
    /// # Errors
    /// Returns `NotInitialized` before `initialize`, `ConnectionClosed` if the
    /// session drops the listener first, or the send error.
    pub async fn send_ready_message(&self) -> Result<()> {
        let (session, shared) = self.attached()?;

        let (tx, rx) = oneshot::channel::<()>();
        let tx = Mutex::new(Some(tx));
        let listener = session.on(
            EventKind::TrackStarted,
            Arc::new(move |event| {
                if let CallEvent::TrackStarted { participant, .. } = event {
                    if participant.as_ref().is_some_and(|p| p.local) {
                        return;
                    }
                    if let Some(tx) = tx.lock().take() {
                        let _ = tx.send(());
                    }
                }
            }),
        );

        let started = rx.await;
        session.off(listener);
        started.map_err(|_| Error::ConnectionClosed)?;

        shared.set_state(TransportState::Ready);
        tracing::info!("Remote track started; sending client-ready");
        Self::broadcast(session.as_ref(), TransportMessage::client_ready())
    }

    /// Stop observers, leave the room and destroy the session.
    ///
    /// State is driven by the session's left-meeting event, not set here.
    ///
    /// # Errors
    /// Returns an error if leaving or destroying the session fails.
    pub async fn disconnect(&self) -> Result<()> {
        let current = self.session.lock().clone();
        let Some(session) = current else {
            return Ok(());
        };

        session.stop_local_audio_level_observer();
        session.stop_remote_participants_audio_level_observer();
        session.leave().await?;
        self.registry.destroy(&session).await?;

        self.session.lock().take();
        self.listeners.lock().clear();
        Ok(())
    }

    /// Broadcast a control message to all participants. Fire-and-forget.
    ///
    /// # Errors
    /// Returns `NotInitialized` before `initialize`, or the send error.
    pub fn send_message(&self, message: TransportMessage) -> Result<()> {
        let session = self.session()?;
        Self::broadcast(session.as_ref(), message)
    }

    /// # Errors
    /// Returns `NotInitialized` before `initialize`, or the switch error.
    pub async fn update_cam(&self, device_id: &str) -> Result<()> {
        self.update_device(DeviceSlot::Cam, device_id).await
    }

    /// # Errors
    /// Returns `NotInitialized` before `initialize`, or the switch error.
    pub async fn update_mic(&self, device_id: &str) -> Result<()> {
        self.update_device(DeviceSlot::Mic, device_id).await
    }

    /// # Errors
    /// Returns `NotInitialized` before `initialize`, or the switch error.
    pub async fn update_speaker(&self, device_id: &str) -> Result<()> {
        self.update_device(DeviceSlot::Speaker, device_id).await
    }

    /// # Errors
    /// Returns `NotInitialized` before `initialize`.
    pub fn enable_mic(&self, enabled: bool) -> Result<()> {
        self.session()?.set_local_audio(enabled);
        Ok(())
    }

    /// # Errors
    /// Returns `NotInitialized` before `initialize`.
    pub fn enable_cam(&self, enabled: bool) -> Result<()> {
        self.session()?.set_local_video(enabled);
        Ok(())
    }

    /// # Errors
    /// Returns `NotInitialized` before `initialize`.
    pub fn is_mic_enabled(&self) -> Result<bool> {
        Ok(self.session()?.local_audio())
    }

    /// # Errors
    /// Returns `NotInitialized` before `initialize`.
    pub fn is_cam_enabled(&self) -> Result<bool> {
        Ok(self.session()?.local_video())
    }

    /// # Errors
    /// Returns `NotInitialized` before `initialize`, or the enumeration error.
    pub async fn get_all_cams(&self) -> Result<Vec<MediaDevice>> {
        Ok(self.available_devices().await?.cams)
    }

    /// # Errors
    /// Returns `NotInitialized` before `initialize`, or the enumeration error.
    pub async fn get_all_mics(&self) -> Result<Vec<MediaDevice>> {
        Ok(self.available_devices().await?.mics)
    }

    /// # Errors
    /// Returns `NotInitialized` before `initialize`, or the enumeration error.
    pub async fn get_all_speakers(&self) -> Result<Vec<MediaDevice>> {
        Ok(self.available_devices().await?.speakers)
    }

    #[must_use]
    pub fn selected_cam(&self) -> Option<MediaDevice> {
        self.selected(DeviceSlot::Cam)
    }

    #[must_use]
    pub fn selected_mic(&self) -> Option<MediaDevice> {
        self.selected(DeviceSlot::Mic)
    }

    #[must_use]
    pub fn selected_speaker(&self) -> Option<MediaDevice> {
        self.selected(DeviceSlot::Speaker)
    }

    /// Local and bot media, rebuilt from the session's participants on each call.
    ///
    /// # Errors
    /// Returns `NotInitialized` before `initialize`.
    pub fn tracks(&self) -> Result<Tracks> {
        let (session, shared) = self.attached()?;
        let participants = session.participants();
        let bot_id = shared.bot_id.lock().clone();

        Ok(Tracks {
            local: participants
                .local
                .as_ref()
                .map(TrackBundle::from)
                .unwrap_or_default(),
            bot: bot_id
                .and_then(|id| participants.remote(&id).map(TrackBundle::from)),
        })
    }

    #[must_use]
    pub fn state(&self) -> TransportState {
        self.shared
            .lock()
            .as_ref()
            .map_or(TransportState::Uninitialized, |shared| shared.state.get())
    }

    /// Room expiry (unix seconds) captured on connect.
    #[must_use]
    pub fn expiry(&self) -> Option<u64> {
        self.shared
            .lock()
            .as_ref()
            .and_then(|shared| *shared.expiry.lock())
    }

    /// Session id of the participant currently treated as the bot.
    #[must_use]
    pub fn bot_id(&self) -> Option<String> {
        self.shared
            .lock()
            .as_ref()
            .and_then(|shared| shared.bot_id.lock().clone())
    }

    async fn update_device(&self, slot: DeviceSlot, device_id: &str) -> Result<()> {
        let (session, shared) = self.attached()?;
        let device = match slot {
            DeviceSlot::Cam => session.set_camera(device_id).await?,
            DeviceSlot::Mic => session.set_microphone(device_id).await?,
            DeviceSlot::Speaker => session.set_speaker(device_id).await?,
        };
        tracing::debug!("Switched {slot:?} to {device_id}");
        // Notification comes from the session's selected-devices event.
        if let Some(device) = device {
            shared.devices.lock().set(slot, Some(device));
        }
        Ok(())
    }

    async fn available_devices(&self) -> Result<AvailableDevices> {
        let session = self.session()?;
        Ok(AvailableDevices::partition(session.enumerate_devices().await?))
    }

    fn selected(&self, slot: DeviceSlot) -> Option<MediaDevice> {
        self.shared
            .lock()
            .as_ref()
            .and_then(|shared| shared.devices.lock().get(slot))
    }

    fn broadcast(session: &dyn CallSession, message: TransportMessage) -> Result<()> {
        let payload = serde_json::to_value(MessageEnvelope::wrap(message))?;
        session.send_app_message(payload)
    }

    fn session(&self) -> Result<Arc<dyn CallSession>> {
        self.session.lock().clone().ok_or(Error::NotInitialized)
    }

    fn attached(&self) -> Result<(Arc<dyn CallSession>, Arc<Shared>)> {
        let session = self.session()?;
        let shared = self.shared.lock().clone().ok_or(Error::NotInitialized)?;
        Ok((session, shared))
    }

    fn detach_listeners(&self) {
        let session = self.session.lock().take();
        let listeners = std::mem::take(&mut *self.listeners.lock());
        if let Some(session) = session {
            for id in listeners {
                session.off(id);
            }
        }
    }
}

impl std::fmt::Debug for CallTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallTransport")
            .field("state", &self.state())
            .field("attached", &self.session.lock().is_some())
            .finish_non_exhaustive()
    }
}
