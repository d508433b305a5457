// SPDX-FileCopyrightText: The djio authors
// SPDX-License-Identifier: MPL-2.0

use super::*;

#[test]
fn u7_be_to_u14_bounds() {
    assert_eq!(0, u7_be_to_u14(0, 0));
    assert_eq!(127, u7_be_to_u14(0, 127));
    assert_eq!(128, u7_be_to_u14(1, 0));
    assert_eq!(16383, u7_be_to_u14(127, 127));
}

#[test]
#[allow(clippy::float_cmp)]
fn u14_to_normalized_bounds() {
    assert_eq!(0.0, u14_to_normalized(0));
    assert_eq!(1.0, u14_to_normalized(16383));
}

#[test]
#[allow(clippy::float_cmp)]
fn twos_complement_delta() {
    assert_eq!(0.0, u7_twos_complement_delta(0.0));
    assert_eq!(1.0, u7_twos_complement_delta(1.0));
    assert_eq!(63.0, u7_twos_complement_delta(63.0));
    assert_eq!(-64.0, u7_twos_complement_delta(64.0));
    assert_eq!(-1.0, u7_twos_complement_delta(127.0));
}

#[test]
#[allow(clippy::float_cmp)]
fn centered_delta() {
    assert_eq!(0.0, u7_centered_delta(64.0));
    assert_eq!(1.0, u7_centered_delta(65.0));
    assert_eq!(-1.0, u7_centered_delta(63.0));
}

#[test]
fn decode_short_message() {
    let event = MidiEvent::try_from_short_message(&[0x91, 0x0b, 0x7f]).unwrap();
    assert_eq!(1, event.channel);
    assert_eq!(0x91, event.status);
    assert_eq!(0x0b, event.data1);
    assert_eq!(0x7f, event.value);
}

#[test]
fn reject_malformed_short_messages() {
    assert!(MidiEvent::try_from_short_message(&[]).is_none());
    assert!(MidiEvent::try_from_short_message(&[0x90, 0x0b]).is_none());
    assert!(MidiEvent::try_from_short_message(&[0x90, 0x0b, 0x7f, 0x00]).is_none());
    // Running status
    assert!(MidiEvent::try_from_short_message(&[0x0b, 0x7f, 0x00]).is_none());
    // System message
    assert!(MidiEvent::try_from_short_message(&[0xf2, 0x00, 0x00]).is_none());
    // Data bytes must not have the high bit set
    assert!(MidiEvent::try_from_short_message(&[0x90, 0x8b, 0x00]).is_none());
}

#[test]
fn led_value_on_off() {
    assert_eq!(LED_OFF, led_value(0.0));
    assert_eq!(LED_ON, led_value(1.0));
    assert_eq!(LED_ON, led_value(0.5));
}
