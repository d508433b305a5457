// SPDX-FileCopyrightText: The djio authors
// SPDX-License-Identifier: MPL-2.0

//! In-memory engine
//!
//! A headless [`Engine`] that stores all values in memory and records every
//! interaction. Useful for testing mappings and for replaying MIDI input
//! without a media player.

use std::{
    collections::{HashMap, HashSet},
    fmt,
};

use float_cmp::approx_eq;

use super::{Connection, ConnectionCallback, Engine, ScratchParams};
use crate::MidiOutput;

struct ConnectionEntry {
    group: String,
    key: String,
    callback: ConnectionCallback,
}

#[derive(Default)]
pub struct MemoryEngine {
    values: HashMap<String, HashMap<String, f64>>,
    connections: Vec<ConnectionEntry>,
    scratching: HashMap<u8, ScratchParams>,
    scratch_ticks: Vec<(u8, f64)>,
    soft_takeover: HashSet<(String, String)>,
    soft_takeover_ignored: Vec<(String, String)>,
    sent_midi_messages: Vec<[u8; 3]>,
}

impl fmt::Debug for MemoryEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryEngine")
            .field("values", &self.values)
            .field("num_connections", &self.connections.len())
            .field("scratching", &self.scratching)
            .field("soft_takeover", &self.soft_takeover)
            .field("sent_midi_messages", &self.sent_midi_messages)
            .finish_non_exhaustive()
    }
}

impl MemoryEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scratch parameters of a deck while scratching.
    #[must_use]
    pub fn scratch_params(&self, deck: u8) -> Option<&ScratchParams> {
        self.scratching.get(&deck)
    }

    /// All scratch ticks in the order of arrival.
    #[must_use]
    pub fn scratch_ticks(&self) -> &[(u8, f64)] {
        &self.scratch_ticks
    }

    #[must_use]
    pub fn is_soft_takeover_enabled(&self, group: &str, key: &str) -> bool {
        self.soft_takeover
            .contains(&(group.to_owned(), key.to_owned()))
    }

    #[must_use]
    pub fn soft_takeover_ignored(&self) -> &[(String, String)] {
        &self.soft_takeover_ignored
    }

    #[must_use]
    pub fn num_connections(&self) -> usize {
        self.connections.len()
    }

    /// MIDI messages sent by connection callbacks.
    #[must_use]
    pub fn sent_midi_messages(&self) -> &[[u8; 3]] {
        &self.sent_midi_messages
    }

    pub fn take_sent_midi_messages(&mut self) -> Vec<[u8; 3]> {
        std::mem::take(&mut self.sent_midi_messages)
    }

    fn notify_connections(&mut self, group: &str, key: &str, value: f64) {
        let Self {
            connections,
            sent_midi_messages,
            ..
        } = self;
        let midi: &mut dyn MidiOutput = sent_midi_messages;
        for entry in connections
            .iter_mut()
            .filter(|entry| entry.group == group && entry.key == key)
        {
            (entry.callback)(&mut *midi, value);
        }
    }
}

impl Engine for MemoryEngine {
    fn get_value(&self, group: &str, key: &str) -> f64 {
        self.values
            .get(group)
            .and_then(|values| values.get(key))
            .copied()
            .unwrap_or_default()
    }

    fn set_value(&mut self, group: &str, key: &str, value: f64) {
        let old_value = self
            .values
            .entry(group.to_owned())
            .or_default()
            .insert(key.to_owned(), value)
            .unwrap_or_default();
        if approx_eq!(f64, old_value, value, ulps = 2) {
            return;
        }
        log::trace!("{group} {key}: {old_value} -> {value}");
        self.notify_connections(group, key, value);
    }

    fn get_parameter(&self, group: &str, key: &str) -> f64 {
        self.get_value(group, key)
    }

    fn set_parameter(&mut self, group: &str, key: &str, value: f64) {
        self.set_value(group, key, value);
    }

    fn make_connection(
        &mut self,
        group: &str,
        key: &str,
        callback: ConnectionCallback,
    ) -> Connection {
        let connection = Connection::new(self.connections.len());
        self.connections.push(ConnectionEntry {
            group: group.to_owned(),
            key: key.to_owned(),
            callback,
        });
        connection
    }

    fn trigger_connection(&mut self, connection: Connection) {
        let Some(entry) = self.connections.get(connection.id()) else {
            log::warn!("Unknown connection {connection:?}");
            return;
        };
        let value = self.get_value(&entry.group, &entry.key);
        let Self {
            connections,
            sent_midi_messages,
            ..
        } = self;
        if let Some(entry) = connections.get_mut(connection.id()) {
            (entry.callback)(sent_midi_messages as &mut dyn MidiOutput, value);
        }
    }

    fn scratch_enable(&mut self, deck: u8, params: ScratchParams) {
        self.scratching.insert(deck, params);
    }

    fn scratch_tick(&mut self, deck: u8, interval: f64) {
        self.scratch_ticks.push((deck, interval));
    }

    fn scratch_disable(&mut self, deck: u8, _ramp: bool) {
        self.scratching.remove(&deck);
    }

    fn is_scratching(&self, deck: u8) -> bool {
        self.scratching.contains_key(&deck)
    }

    fn soft_takeover(&mut self, group: &str, key: &str, enable: bool) {
        let entry = (group.to_owned(), key.to_owned());
        if enable {
            self.soft_takeover.insert(entry);
        } else {
            self.soft_takeover.remove(&entry);
        }
    }

    fn soft_takeover_ignore_next_value(&mut self, group: &str, key: &str) {
        self.soft_takeover_ignored
            .push((group.to_owned(), key.to_owned()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn led_connection(status: u8, data1: u8) -> ConnectionCallback {
        Box::new(move |midi: &mut dyn MidiOutput, value: f64| {
            midi.send_short_msg(status, data1, crate::midi::led_value(value));
        })
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn missing_values_default_to_zero() {
        let engine = MemoryEngine::new();
        assert_eq!(0.0, engine.get_value("[Channel1]", "play"));
    }

    #[test]
    fn toggle_value() {
        let mut engine = MemoryEngine::new();
        engine.toggle_value("[Channel1]", "play");
        assert!(engine.get_value("[Channel1]", "play") > 0.0);
        engine.toggle_value("[Channel1]", "play");
        assert!(engine.get_value("[Channel1]", "play") <= 0.0);
    }

    #[test]
    fn connections_fire_only_on_change() {
        let mut engine = MemoryEngine::new();
        let _connection = engine.make_connection("[Channel1]", "play", led_connection(0x90, 0x0b));
        engine.set_value("[Channel1]", "play", 1.0);
        engine.set_value("[Channel1]", "play", 1.0);
        engine.set_value("[Channel2]", "play", 1.0);
        engine.set_value("[Channel1]", "play", 0.0);
        assert_eq!(
            &[[0x90, 0x0b, 0x7f], [0x90, 0x0b, 0x00]],
            engine.sent_midi_messages()
        );
    }

    #[test]
    fn trigger_replays_current_value() {
        let mut engine = MemoryEngine::new();
        engine.set_value("[Channel2]", "pfl", 1.0);
        let connection = engine.make_connection("[Channel2]", "pfl", led_connection(0x91, 0x54));
        assert!(engine.sent_midi_messages().is_empty());
        engine.trigger_connection(connection);
        assert_eq!(&[[0x91, 0x54, 0x7f]], engine.sent_midi_messages());
    }

    #[test]
    fn soft_takeover() {
        let mut engine = MemoryEngine::new();
        engine.soft_takeover("[Channel1]", "rate", true);
        assert!(engine.is_soft_takeover_enabled("[Channel1]", "rate"));
        engine.soft_takeover_ignore_next_value("[Channel1]", "rate");
        assert_eq!(
            &[("[Channel1]".to_owned(), "rate".to_owned())],
            engine.soft_takeover_ignored()
        );
        engine.soft_takeover("[Channel1]", "rate", false);
        assert!(!engine.is_soft_takeover_enabled("[Channel1]", "rate"));
    }

    #[test]
    fn scratching() {
        let mut engine = MemoryEngine::new();
        assert!(!engine.is_scratching(1));
        engine.scratch_enable(1, ScratchParams::default());
        assert!(engine.is_scratching(1));
        assert!(!engine.is_scratching(2));
        engine.scratch_disable(1, true);
        assert!(!engine.is_scratching(1));
    }
}
