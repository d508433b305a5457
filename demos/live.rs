// SPDX-FileCopyrightText: The djio authors
// SPDX-License-Identifier: MPL-2.0

//! Drives an in-memory engine from a connected controller.

use std::sync::mpsc;

use ddj_wego::{
    engine::memory::MemoryEngine,
    mapping::ddj_wego::DEVICE_DESCRIPTOR,
    midi::midir::MidirDevice,
    MappingState,
};

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let (tx, rx) = mpsc::channel::<Vec<u8>>();
    let mut device = MidirDevice::connect(&DEVICE_DESCRIPTOR, tx)?;
    let mut engine = MemoryEngine::new();
    let mut state = MappingState::init(&mut engine, device.output_mut())?;

    println!("Listening for input, press CTRL-C to exit...");
    for input in rx {
        if !state.handle_midi_message(&mut engine, &input) {
            continue;
        }
        for [status, data1, data2] in engine.take_sent_midi_messages() {
            ddj_wego::MidiOutput::send_short_msg(device.output_mut(), status, data1, data2);
        }
    }
    device.disconnect();
    Ok(())
}
