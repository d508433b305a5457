// SPDX-FileCopyrightText: The djio authors
// SPDX-License-Identifier: MPL-2.0

//! # Pioneer DDJ-WeGO
//!
//! MIDI addresses of all controls in 4-deck mode. Deck controls are sent
//! on MIDI channels 1-4 (one per deck), the browser and mixer section
//! on channel 7. Knobs and faders are transmitted with 14-bit resolution
//! as two separate control changes for the most and least significant
//! 7 bits.

use strum::IntoEnumIterator as _;

use super::{MappingError, MidiAddress, MidiMapping};
use crate::{control::ControlName, deck::Deck, midi::DeviceDescriptor};

pub const DEVICE_DESCRIPTOR: DeviceDescriptor = DeviceDescriptor {
    vendor_name: "Pioneer",
    product_name: "DDJ-WeGO",
    port_name_prefix: "DDJ-WeGO",
};

/// Plus the deck index
const MIDI_STATUS_BUTTON_DECK: u8 = 0x90;
/// Plus the deck index
const MIDI_STATUS_CC_DECK: u8 = 0xb0;

const MIDI_STATUS_BUTTON_MAIN: u8 = 0x96;
const MIDI_STATUS_CC_MAIN: u8 = 0xb6;

/// Switches the controller into 4-deck mode.
///
/// The controller responds by sending the current position
/// of all knobs and faders.
pub const MIDI_MESSAGE_FOUR_DECK_MODE: [u8; 3] = [0x9c, 0x7b, 0x00];

const MAIN_BUTTONS: &[(&str, u8)] = &[("TraxButton", 0x41)];

const MAIN_CCS: &[(&str, u8)] = &[("TraxEncoder", 0x40), ("TraxEncoderShifted", 0x64)];

const MAIN_FINE_CCS: &[(&str, u8, u8)] = &[
    ("Crossfader", 0x1f, 0x3f),
    ("Master", 0x08, 0x28),
    ("Headphone", 0x0d, 0x2d),
    ("HeadphoneMix", 0x0c, 0x2c),
];

const DECK_BUTTONS: &[(&str, u8)] = &[
    ("Play", 0x0b),
    ("Cue", 0x0c),
    ("Sync", 0x58),
    ("SyncShifted", 0x5c),
    ("Pfl", 0x54),
    ("LoopButton", 0x14),
    ("JogTouchButton", 0x36),
    ("JogTouchButtonShifted", 0x67),
    ("Hotcue1", 0x2e),
    ("Hotcue2", 0x2f),
    ("Hotcue3", 0x30),
    ("Hotcue4", 0x31),
    ("Hotcue1Shifted", 0x3e),
    ("Hotcue2Shifted", 0x3f),
    ("Hotcue3Shifted", 0x40),
    ("Hotcue4Shifted", 0x41),
];

const DECK_CCS: &[(&str, u8)] = &[
    ("JogEncoder", 0x21),
    ("JogEncoderTouch", 0x22),
    ("JogEncoderTouchShifted", 0x23),
    ("LoopEncoder", 0x42),
    ("LoopEncoderShifted", 0x43),
];

const DECK_FINE_CCS: &[(&str, u8, u8)] = &[
    ("Tempo", 0x00, 0x20),
    ("EqHigh", 0x07, 0x27),
    ("EqMid", 0x0b, 0x2b),
    ("EqLow", 0x0f, 0x2f),
    ("Volume", 0x13, 0x33),
];

/// Deck buttons in the browser section.
///
/// Sent on the main channel with the deck index added to the note number.
const DECK_BROWSER_BUTTONS: &[(&str, u8)] = &[("Load", 0x46), ("LoadShifted", 0x58)];

fn insert_main(mapping: &mut MidiMapping) -> Result<(), MappingError> {
    for &(name, data1) in MAIN_BUTTONS {
        mapping.insert(
            ControlName::new(name),
            MidiAddress::new(MIDI_STATUS_BUTTON_MAIN, data1),
        )?;
    }
    for &(name, data1) in MAIN_CCS {
        mapping.insert(
            ControlName::new(name),
            MidiAddress::new(MIDI_STATUS_CC_MAIN, data1),
        )?;
    }
    for &(name, msb, lsb) in MAIN_FINE_CCS {
        mapping.insert_fine(
            &ControlName::new(name),
            MidiAddress::new(MIDI_STATUS_CC_MAIN, msb),
            MidiAddress::new(MIDI_STATUS_CC_MAIN, lsb),
        )?;
    }
    Ok(())
}

fn insert_deck(mapping: &mut MidiMapping, deck: Deck) -> Result<(), MappingError> {
    let index = deck.index();
    let button_status = MIDI_STATUS_BUTTON_DECK + index;
    let cc_status = MIDI_STATUS_CC_DECK + index;
    for &(name, data1) in DECK_BUTTONS {
        mapping.insert(
            deck.control_name(name),
            MidiAddress::new(button_status, data1),
        )?;
    }
    for &(name, data1) in DECK_CCS {
        mapping.insert(deck.control_name(name), MidiAddress::new(cc_status, data1))?;
    }
    for &(name, msb, lsb) in DECK_FINE_CCS {
        mapping.insert_fine(
            &deck.control_name(name),
            MidiAddress::new(cc_status, msb),
            MidiAddress::new(cc_status, lsb),
        )?;
    }
    for &(name, data1) in DECK_BROWSER_BUTTONS {
        mapping.insert(
            deck.control_name(name),
            MidiAddress::new(MIDI_STATUS_BUTTON_MAIN, data1 + index),
        )?;
    }
    Ok(())
}

/// Build the mapping of all controls.
pub fn build_mapping() -> Result<MidiMapping, MappingError> {
    let mut mapping = MidiMapping::new();
    insert_main(&mut mapping)?;
    for deck in Deck::iter() {
        insert_deck(&mut mapping, deck)?;
    }
    log::debug!(
        "Mapped {num_names} control names of {product_name}",
        num_names = mapping.len(),
        product_name = DEVICE_DESCRIPTOR.product_name,
    );
    Ok(mapping)
}
