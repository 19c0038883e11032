use crate::protocol::models::{MediaDevice, SelectedDevices, TransportState, same_device};
use parking_lot::Mutex;

/// Connection state that reports whether a write changed anything.
#[derive(Debug, Default)]
pub(crate) struct StateCell {
    state: Mutex<TransportState>,
}

impl StateCell {
    pub(crate) fn get(&self) -> TransportState {
        *self.state.lock()
    }

    /// Returns `true` only if `next` differs from the current state.
    pub(crate) fn set(&self, next: TransportState) -> bool {
        let mut state = self.state.lock();
        if *state == next {
            return false;
        }
        *state = next;
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DeviceSlot {
    Cam,
    Mic,
    Speaker,
}

impl DeviceSlot {
    pub(crate) const ALL: [Self; 3] = [Self::Cam, Self::Mic, Self::Speaker];

    pub(crate) fn pick(self, devices: &SelectedDevices) -> Option<&MediaDevice> {
        match self {
            Self::Cam => devices.camera.as_ref(),
            Self::Mic => devices.microphone.as_ref(),
            Self::Speaker => devices.speaker.as_ref(),
        }
    }
}

/// Last known cam/mic/speaker selection.
#[derive(Debug, Default)]
pub(crate) struct DeviceCache {
    selected: SelectedDevices,
}

impl DeviceCache {
    pub(crate) fn get(&self, slot: DeviceSlot) -> Option<MediaDevice> {
        slot.pick(&self.selected).cloned()
    }

    pub(crate) fn set(&mut self, slot: DeviceSlot, device: Option<MediaDevice>) {
        match slot {
            DeviceSlot::Cam => self.selected.camera = device,
            DeviceSlot::Mic => self.selected.microphone = device,
            DeviceSlot::Speaker => self.selected.speaker = device,
        }
    }

    /// Store `device` if its id differs from the cached one. Returns whether it did.
    pub(crate) fn replace_if_changed(&mut self, slot: DeviceSlot, device: Option<&MediaDevice>) -> bool {
        if same_device(slot.pick(&self.selected), device) {
            return false;
        }
        self.set(slot, device.cloned());
        true
    }
}
