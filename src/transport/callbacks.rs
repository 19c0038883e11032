use crate::protocol::messages::TransportMessage;
use crate::protocol::models::{MediaDevice, MediaTrack, PublicParticipant, TransportState};
use futures::Stream;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

/// Sink for inbound control messages from the bot.
pub type MessageHandler = Arc<dyn Fn(TransportMessage) + Send + Sync>;

macro_rules! transport_callbacks {
    ($( $(#[$doc:meta])* $hook:ident => $emit:ident($($arg:ident: $ty:ty),*); )*) => {
        /// Hooks the transport invokes as the call progresses. Unset hooks are skipped.
        #[derive(Default)]
        pub struct TransportCallbacks {
            $( $hook: Option<Box<dyn Fn($($ty),*) + Send + Sync>>, )*
        }

        impl TransportCallbacks {
            #[must_use]
            pub fn new() -> Self {
                Self::default()
            }

            $(
                $(#[$doc])*
                #[must_use]
                pub fn $hook<F>(mut self, handler: F) -> Self
                where
                    F: Fn($($ty),*) + Send + Sync + 'static,
                {
                    self.$hook = Some(Box::new(handler));
                    self
                }

                pub(crate) fn $emit(&self, $($arg: $ty),*) {
                    if let Some(handler) = &self.$hook {
                        handler($($arg),*);
                    }
                }
            )*
        }
    };
}

transport_callbacks! {
    on_state_changed => state_changed(state: TransportState);
    on_available_cams_updated => available_cams_updated(cams: Vec<MediaDevice>);
    on_available_mics_updated => available_mics_updated(mics: Vec<MediaDevice>);
    on_available_speakers_updated => available_speakers_updated(speakers: Vec<MediaDevice>);
    /// Selected camera changed. `None` means no camera is selected.
    on_cam_updated => cam_updated(cam: Option<MediaDevice>);
    on_mic_updated => mic_updated(mic: Option<MediaDevice>);
    on_speaker_updated => speaker_updated(speaker: Option<MediaDevice>);
    on_track_started => track_started(track: MediaTrack, participant: Option<PublicParticipant>);
    on_track_stopped => track_stopped(track: MediaTrack, participant: Option<PublicParticipant>);
    on_participant_joined => participant_joined(participant: PublicParticipant);
    on_participant_left => participant_left(participant: PublicParticipant);
    /// The first remote participant joined and is now treated as the bot.
    on_bot_connected => bot_connected(participant: PublicParticipant);
    on_bot_disconnected => bot_disconnected(participant: PublicParticipant);
    on_local_audio_level => local_audio_level(level: f32);
    on_remote_audio_level => remote_audio_level(level: f32, participant: PublicParticipant);
    on_connected => connected();
    on_disconnected => disconnected();
}

/// Create a [`MessageHandler`] paired with a stream of the messages it receives.
#[must_use]
pub fn message_channel() -> (MessageHandler, MessageStream) {
    let (tx, rx) = mpsc::unbounded_channel();
    let handler: MessageHandler = Arc::new(move |message| {
        let _ = tx.send(message);
    });
    (handler, MessageStream { rx })
}

pub struct MessageStream {
    rx: mpsc::UnboundedReceiver<TransportMessage>,
}

impl MessageStream {
    pub async fn recv(&mut self) -> Option<TransportMessage> {
        self.rx.recv().await
    }

    /// # Errors
    /// Returns an error if no message is queued.
    pub fn try_recv(&mut self) -> Result<TransportMessage, mpsc::error::TryRecvError> {
        self.rx.try_recv()
    }
}

impl Stream for MessageStream {
    type Item = TransportMessage;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        Pin::new(&mut this.rx).poll_recv(cx)
    }
}
