// SPDX-FileCopyrightText: The djio authors
// SPDX-License-Identifier: MPL-2.0

//! Raw MIDI message helpers.

#[cfg(feature = "midir")]
pub mod midir;

/// Identifies a MIDI controller model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    pub vendor_name: &'static str,
    pub product_name: &'static str,
    /// Prefix of the port name under which the device is announced.
    pub port_name_prefix: &'static str,
}

/// A raw MIDI input event as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MidiEvent<'a> {
    /// 0-based MIDI channel, i.e. the low nibble of the status byte
    pub channel: u8,
    /// Note or controller number
    pub data1: u8,
    /// Velocity or controller value
    pub value: u8,
    pub status: u8,
    /// Scope hint of the host
    ///
    /// Carried for completeness. The mapping resolves controls
    /// by `status` and `data1` only.
    pub group: &'a str,
}

impl MidiEvent<'static> {
    /// Decode a 3-byte channel voice message.
    ///
    /// Returns `None` for system messages, running status and
    /// messages of any other length.
    #[must_use]
    pub fn try_from_short_message(input: &[u8]) -> Option<Self> {
        let [status, data1, value] = *input else {
            return None;
        };
        if status & 0x80 == 0 || status >= 0xf0 || data1 & 0x80 != 0 || value & 0x80 != 0 {
            return None;
        }
        Some(Self {
            channel: status & 0x0f,
            data1,
            value,
            status,
            group: "",
        })
    }
}

/// Sink for outgoing MIDI short messages.
pub trait MidiOutput {
    fn send_short_msg(&mut self, status: u8, data1: u8, data2: u8);
}

/// Collects all messages, e.g. for replaying or inspecting them later.
impl MidiOutput for Vec<[u8; 3]> {
    fn send_short_msg(&mut self, status: u8, data1: u8, data2: u8) {
        self.push([status, data1, data2]);
    }
}

pub const LED_OFF: u8 = 0x00;
pub const LED_ON: u8 = 0x7f;

/// Value of a relative encoder at rest.
pub const RELATIVE_CENTER: u8 = 0x40;

#[must_use]
pub const fn u7_be_to_u14(hi: u8, lo: u8) -> u16 {
    (hi as u16) << 7 | lo as u16
}

/// Map a 14-bit value onto the interval [0, 1].
#[must_use]
pub fn u14_to_normalized(input: u16) -> f64 {
    f64::from(input) / f64::from(0x3fff_u16)
}

/// Decode a 7-bit two's complement delta, e.g. of a browse encoder.
///
/// 0x01..=0x3f are positive, 0x40..=0x7f are negative steps.
#[must_use]
pub fn u7_twos_complement_delta(value: f64) -> f64 {
    if value > f64::from(0x3f_u8) {
        value - f64::from(0x80_u8)
    } else {
        value
    }
}

/// Decode a delta that is centered around [`RELATIVE_CENTER`], e.g. of a jog wheel.
#[must_use]
pub fn u7_centered_delta(value: f64) -> f64 {
    value - f64::from(RELATIVE_CENTER)
}

#[must_use]
pub fn led_value(value: f64) -> u8 {
    if value > 0.0 {
        LED_ON
    } else {
        LED_OFF
    }
}

#[cfg(test)]
mod tests;
