// SPDX-FileCopyrightText: The djio authors
// SPDX-License-Identifier: MPL-2.0

//! Replays a scripted MIDI session against an in-memory engine.
//!
//! Run with `RUST_LOG=trace` to follow the dispatching.

use ddj_wego::{engine::memory::MemoryEngine, Engine as _, MappingState};

const SESSION: &[[u8; 3]] = &[
    // Play deck 1
    [0x90, 0x0b, 0x7f],
    [0x90, 0x0b, 0x00],
    // Volume of deck 1 at ~3/4
    [0xb0, 0x13, 0x60],
    [0xb0, 0x33, 0x00],
    // Touch the jog wheel of deck 2, turn it, and release it
    [0x91, 0x36, 0x7f],
    [0xb1, 0x21, 0x44],
    [0xb1, 0x21, 0x42],
    [0x91, 0x36, 0x00],
    // Enable the crossfader and move it to the right
    [0x90, 0x5c, 0x7f],
    [0x90, 0x5c, 0x00],
    [0xb6, 0x1f, 0x7f],
    // Scroll the library
    [0xb6, 0x40, 0x01],
    [0xb6, 0x40, 0x01],
    // Not mapped
    [0x9f, 0x7f, 0x7f],
];

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let mut engine = MemoryEngine::new();
    let mut midi = Vec::<[u8; 3]>::new();
    let mut state = MappingState::init(&mut engine, &mut midi)?;
    println!("Initialization: {midi:02x?}");

    for input in SESSION {
        state.handle_midi_message(&mut engine, input);
    }

    for (group, key) in [
        ("[Channel1]", "play"),
        ("[Channel1]", "volume"),
        ("[Master]", "crossfader"),
        ("[Library]", "MoveVertical"),
    ] {
        println!("{group} {key} = {value}", value = engine.get_value(group, key));
    }
    println!("Scratch ticks: {ticks:?}", ticks = engine.scratch_ticks());
    println!(
        "LED feedback: {messages:02x?}",
        messages = engine.sent_midi_messages()
    );
    Ok(())
}
