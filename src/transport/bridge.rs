use crate::call::{CallEvent, CallSession, EventKind, ListenerId};
use crate::protocol::messages::MessageEnvelope;
use crate::protocol::models::{
    AvailableDevices, MediaDevice, Participant, PublicParticipant, TransportState,
};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

use super::callbacks::{MessageHandler, TransportCallbacks};
use super::state::{DeviceCache, DeviceSlot, StateCell};

/// State shared between the transport and the listeners it registers.
pub(crate) struct Shared {
    pub(crate) callbacks: TransportCallbacks,
    pub(crate) on_message: MessageHandler,
    pub(crate) state: StateCell,
    pub(crate) devices: Mutex<DeviceCache>,
    pub(crate) bot_id: Mutex<Option<String>>,
    pub(crate) expiry: Mutex<Option<u64>>,
}

impl Shared {
    pub(crate) fn new(callbacks: TransportCallbacks, on_message: MessageHandler) -> Self {
        Self {
            callbacks,
            on_message,
            state: StateCell::default(),
            devices: Mutex::new(DeviceCache::default()),
            bot_id: Mutex::new(None),
            expiry: Mutex::new(None),
        }
    }

    pub(crate) fn set_state(&self, state: TransportState) {
        if self.state.set(state) {
            tracing::debug!("Transport state changed: {state}");
            self.callbacks.state_changed(state);
        }
    }

    pub(crate) fn notify_available(&self, devices: Vec<MediaDevice>) {
        let available = AvailableDevices::partition(devices);
        self.callbacks.available_cams_updated(available.cams);
        self.callbacks.available_mics_updated(available.mics);
        self.callbacks.available_speakers_updated(available.speakers);
    }

    pub(crate) fn notify_device(&self, slot: DeviceSlot, device: Option<MediaDevice>) {
        match slot {
            DeviceSlot::Cam => self.callbacks.cam_updated(device),
            DeviceSlot::Mic => self.callbacks.mic_updated(device),
            DeviceSlot::Speaker => self.callbacks.speaker_updated(device),
        }
    }
}

/// Translates call-session events into transport callbacks.
pub(crate) struct EventBridge {
    shared: Arc<Shared>,
    session: Weak<dyn CallSession>,
}

impl EventBridge {
    /// Register one listener per event kind on `session`.
    pub(crate) fn attach(shared: Arc<Shared>, session: &Arc<dyn CallSession>) -> Vec<ListenerId> {
        let bridge = Arc::new(Self {
            shared,
            session: Arc::downgrade(session),
        });
        EventKind::ALL
            .into_iter()
            .map(|kind| {
                let bridge = Arc::clone(&bridge);
                session.on(kind, Arc::new(move |event| bridge.handle(event)))
            })
            .collect()
    }

    fn handle(&self, event: &CallEvent) {
        tracing::trace!("Bridging call event: {}", event.kind());
        let shared = &self.shared;
        match event {
            CallEvent::AvailableDevicesUpdated { devices } => {
                shared.notify_available(devices.clone());
            }
            CallEvent::SelectedDevicesUpdated { devices } => {
                for slot in DeviceSlot::ALL {
                    let device = slot.pick(devices);
                    let changed = shared.devices.lock().replace_if_changed(slot, device);
                    if changed {
                        shared.notify_device(slot, device.cloned());
                    }
                }
            }
            CallEvent::TrackStarted { track, participant } => {
                let participant = participant.as_ref().map(PublicParticipant::from);
                shared.callbacks.track_started(track.clone(), participant);
            }
            CallEvent::TrackStopped { track, participant } => {
                let participant = participant.as_ref().map(PublicParticipant::from);
                shared.callbacks.track_stopped(track.clone(), participant);
            }
            CallEvent::ParticipantJoined { participant } => self.participant_joined(participant),
            CallEvent::ParticipantLeft { participant } => self.participant_left(participant),
            CallEvent::LocalAudioLevel { level } => shared.callbacks.local_audio_level(*level),
            CallEvent::RemoteParticipantsAudioLevel { levels } => {
                let Some(session) = self.session.upgrade() else {
                    return;
                };
                let participants = session.participants();
                for (session_id, level) in levels {
                    if let Some(participant) = participants.remote(session_id) {
                        shared
                            .callbacks
                            .remote_audio_level(*level, PublicParticipant::from(participant));
                    }
                }
            }
            CallEvent::AppMessage { data, from_id } => {
                match MessageEnvelope::unwrap_app_message(data) {
                    Some(message) => (shared.on_message)(message),
                    None => {
                        tracing::trace!("Ignoring app message without control label from {from_id}");
                    }
                }
            }
            CallEvent::LeftMeeting => {
                shared.set_state(TransportState::Disconnecting);
                shared.bot_id.lock().take();
                tracing::info!("Left call");
                shared.callbacks.disconnected();
            }
        }
    }

    fn participant_joined(&self, participant: &Participant) {
        let public = PublicParticipant::from(participant);
        self.shared.callbacks.participant_joined(public.clone());
        if participant.local {
            return;
        }

        let recorded = {
            let mut bot_id = self.shared.bot_id.lock();
            if bot_id.is_none() {
                *bot_id = Some(participant.session_id.clone());
                true
            } else {
                false
            }
        };
        if recorded {
            tracing::info!("Bot joined: {}", participant.session_id);
            self.shared.callbacks.bot_connected(public);
        }
    }

    fn participant_left(&self, participant: &Participant) {
        let public = PublicParticipant::from(participant);
        self.shared.callbacks.participant_left(public.clone());
        if participant.local {
            return;
        }

        self.shared.bot_id.lock().take();
        tracing::info!("Remote participant left: {}", participant.session_id);
        self.shared.callbacks.bot_disconnected(public);
    }
}
