use crate::call::CallConfig;

use super::callbacks::TransportCallbacks;

/// Configuration handed to [`super::CallTransport::initialize`].
///
/// The camera starts off unless enabled; the microphone starts on unless
/// disabled.
pub struct TransportOptions {
    pub enable_cam: bool,
    pub enable_mic: bool,
    pub callbacks: TransportCallbacks,
}

impl TransportOptions {
    #[must_use]
    pub fn builder() -> TransportOptionsBuilder {
        TransportOptionsBuilder::new()
    }

    #[must_use]
    pub const fn call_config(&self) -> CallConfig {
        CallConfig {
            start_video_off: !self.enable_cam,
            start_audio_off: !self.enable_mic,
        }
    }
}

impl Default for TransportOptions {
    fn default() -> Self {
        TransportOptionsBuilder::new().build()
    }
}

pub struct TransportOptionsBuilder {
    enable_cam: Option<bool>,
    enable_mic: Option<bool>,
    callbacks: TransportCallbacks,
}

impl TransportOptionsBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            enable_cam: None,
            enable_mic: None,
            callbacks: TransportCallbacks::new(),
        }
    }

    #[must_use]
    pub const fn enable_cam(mut self, enabled: bool) -> Self {
        self.enable_cam = Some(enabled);
        self
    }

    #[must_use]
    pub const fn enable_mic(mut self, enabled: bool) -> Self {
        self.enable_mic = Some(enabled);
        self
    }

    #[must_use]
    pub fn callbacks(mut self, callbacks: TransportCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    #[must_use]
    pub fn build(self) -> TransportOptions {
        TransportOptions {
            enable_cam: self.enable_cam.unwrap_or(false),
            enable_mic: self.enable_mic.unwrap_or(true),
            callbacks: self.callbacks,
        }
    }
}

impl Default for TransportOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
