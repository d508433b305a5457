// SPDX-FileCopyrightText: The djio authors
// SPDX-License-Identifier: MPL-2.0

//! Host engine boundary
//!
//! The mapping does not own any player state. All parameters live in
//! the host's engine and are addressed by a group, e.g. `[Channel1]`,
//! and a key, e.g. `play`.

use crate::MidiOutput;

pub mod memory;

/// Handle of a persistent subscription.
///
/// Returned by [`Engine::make_connection()`]. The callback stays registered
/// for the lifetime of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[must_use]
pub struct Connection(usize);

impl Connection {
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn id(self) -> usize {
        self.0
    }
}

/// Invoked by the engine with the current value of the watched parameter.
pub type ConnectionCallback = Box<dyn FnMut(&mut dyn MidiOutput, f64)>;

/// Parameters of the scratch engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScratchParams {
    /// Number of jog wheel ticks per revolution
    pub intervals_per_rev: u32,
    /// Platter speed in revolutions per minute
    pub rpm: f64,
    /// Alpha coefficient of the alpha-beta filter
    pub alpha: f64,
    /// Beta coefficient of the alpha-beta filter
    pub beta: f64,
    /// Ramp up smoothly instead of stopping immediately
    pub ramp: bool,
}

impl Default for ScratchParams {
    fn default() -> Self {
        let alpha = 1.0 / 8.0;
        Self {
            intervals_per_rev: 512,
            rpm: 33.0 + 1.0 / 3.0,
            alpha,
            beta: alpha / 32.0,
            ramp: true,
        }
    }
}

/// Capabilities of the host engine consumed by the mapping.
///
/// Values are read and written in the engine's native range,
/// parameters in the normalized range [0, 1]. Boolean values are
/// represented by 0 and 1.
pub trait Engine {
    #[must_use]
    fn get_value(&self, group: &str, key: &str) -> f64;

    fn set_value(&mut self, group: &str, key: &str, value: f64);

    #[must_use]
    fn get_parameter(&self, group: &str, key: &str) -> f64;

    fn set_parameter(&mut self, group: &str, key: &str, value: f64);

    /// Subscribe to changes of a value.
    ///
    /// The engine invokes the callback synchronously whenever the value changes.
    fn make_connection(&mut self, group: &str, key: &str, callback: ConnectionCallback)
        -> Connection;

    /// Invoke the callback of a connection with the current value.
    fn trigger_connection(&mut self, connection: Connection);

    /// Hand over control of the playback speed of a deck to the jog wheel.
    ///
    /// `deck` is the 1-based channel number.
    fn scratch_enable(&mut self, deck: u8, params: ScratchParams);

    fn scratch_tick(&mut self, deck: u8, interval: f64);

    fn scratch_disable(&mut self, deck: u8, ramp: bool);

    #[must_use]
    fn is_scratching(&self, deck: u8) -> bool;

    /// Prevent sudden jumps when a physical control does not match the current value.
    fn soft_takeover(&mut self, group: &str, key: &str, enable: bool);

    fn soft_takeover_ignore_next_value(&mut self, group: &str, key: &str);

    /// Set a value to 1, e.g. to trigger an action.
    fn activate(&mut self, group: &str, key: &str) {
        self.set_value(group, key, 1.0);
    }

    /// Flip a boolean value.
    fn toggle_value(&mut self, group: &str, key: &str) {
        let value = if self.get_value(group, key) > 0.0 {
            0.0
        } else {
            1.0
        };
        self.set_value(group, key, value);
    }
}
