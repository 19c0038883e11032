use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransportState {
    #[default]
    Uninitialized,
    Disconnected,
    Initializing,
    Initialized,
    Connecting,
    Connected,
    Ready,
    Disconnecting,
    Error,
}

impl TransportState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Disconnected => "disconnected",
            Self::Initializing => "initializing",
            Self::Initialized => "initialized",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Ready => "ready",
            Self::Disconnecting => "disconnecting",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for TransportState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
