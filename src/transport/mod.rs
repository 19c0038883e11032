//! The client-framework side: a [`CallTransport`] driven by lifecycle calls,
//! reporting back through [`TransportCallbacks`].

mod bridge;
mod call_transport;
mod callbacks;
mod options;
mod state;


pub use call_transport::{AUDIO_LEVEL_INTERVAL, CallTransport};
pub use callbacks::{MessageHandler, MessageStream, TransportCallbacks, message_channel};
pub use options::{TransportOptions, TransportOptionsBuilder};
