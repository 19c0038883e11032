use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    VideoInput,
    AudioInput,
    AudioOutput,
}

/// A capture or playback device as reported by the call session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MediaDevice {
    pub device_id: String,
    #[serde(default)]
    pub label: String,
    pub kind: DeviceKind,
}

impl MediaDevice {
    #[must_use]
    pub fn new(device_id: impl Into<String>, label: impl Into<String>, kind: DeviceKind) -> Self {
        Self {
            device_id: device_id.into(),
            label: label.into(),
            kind,
        }
    }
}

/// Devices currently in use by the call session. `None` means unselected.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectedDevices {
    pub camera: Option<MediaDevice>,
    pub microphone: Option<MediaDevice>,
    pub speaker: Option<MediaDevice>,
}

/// Enumerated devices split by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailableDevices {
    pub cams: Vec<MediaDevice>,
    pub mics: Vec<MediaDevice>,
    pub speakers: Vec<MediaDevice>,
}

impl AvailableDevices {
    #[must_use]
    pub fn partition<I>(devices: I) -> Self
    where
        I: IntoIterator<Item = MediaDevice>,
    {
        let mut available = Self::default();
        for device in devices {
            match device.kind {
                DeviceKind::VideoInput => available.cams.push(device),
                DeviceKind::AudioInput => available.mics.push(device),
                DeviceKind::AudioOutput => available.speakers.push(device),
            }
        }
        available
    }
}

/// Compare two selections by device id only.
#[must_use]
pub fn same_device(a: Option<&MediaDevice>, b: Option<&MediaDevice>) -> bool {
    a.map(|d| d.device_id.as_str()) == b.map(|d| d.device_id.as_str())
}
