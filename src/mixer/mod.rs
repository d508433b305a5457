// SPDX-FileCopyrightText: The djio authors
// SPDX-License-Identifier: MPL-2.0

//! Deck-independent controls of the mixer and browser section.

use std::{cell::Cell, rc::Rc};

use crate::{
    control::{ButtonCallbacks, Callbacks, Control, ControlRegistry},
    deck::Deck,
    midi::u7_twos_complement_delta,
};

pub const MASTER_GROUP: &str = "[Master]";

pub const LIBRARY_GROUP: &str = "[Library]";

/// Scales gain controls to avoid clipping.
pub const GAIN_SCALE: f64 = 0.5;

pub const BROWSE_SPEED: f64 = 1.0;

pub const BROWSE_SHIFTED_SPEED: f64 = 5.0;

pub const CROSSFADER_CENTER: f64 = 0.5;

/// The controls of the mixer and browser section after they have been registered.
#[derive(Debug)]
pub struct MixerMapping {
    crossfader_ignored: Rc<Cell<bool>>,
}

impl MixerMapping {
    /// Create and register all deck-independent controls.
    ///
    /// The crossfader is ignored initially until the shifted sync button
    /// of the first deck is pressed.
    pub fn new(registry: &mut ControlRegistry) -> Self {
        let crossfader_ignored = Rc::new(Cell::new(true));

        let crossfader = {
            let crossfader_ignored = Rc::clone(&crossfader_ignored);
            Callbacks::new().on_value_changed(move |engine, value| {
                if crossfader_ignored.get() {
                    return;
                }
                engine.set_parameter(MASTER_GROUP, "crossfader", value);
            })
        };
        registry.register(Control::fine("Crossfader", crossfader));

        registry.register(Control::button(
            "TraxButton",
            ButtonCallbacks::new()
                .on_pressed(|engine| engine.activate(LIBRARY_GROUP, "MoveFocusForward")),
        ));

        for (name, key, scale) in [
            ("Master", "gain", GAIN_SCALE),
            ("Headphone", "headGain", GAIN_SCALE),
            ("HeadphoneMix", "headMix", 1.0),
        ] {
            registry.register(Control::fine(
                name,
                Callbacks::new().on_value_changed(move |engine, value| {
                    engine.set_parameter(MASTER_GROUP, key, value * scale);
                }),
            ));
        }

        // Centers the crossfader and toggles between ignoring and following it
        let toggle_crossfader = {
            let crossfader_ignored = Rc::clone(&crossfader_ignored);
            ButtonCallbacks::new().on_pressed(move |engine| {
                engine.set_parameter(MASTER_GROUP, "crossfader", CROSSFADER_CENTER);
                crossfader_ignored.set(!crossfader_ignored.get());
            })
        };
        registry.register(Control::deck_button(
            Deck::One.index(),
            "SyncShifted",
            toggle_crossfader,
        ));

        for (name, speed) in [
            ("TraxEncoder", BROWSE_SPEED),
            ("TraxEncoderShifted", BROWSE_SHIFTED_SPEED),
        ] {
            registry.register(Control::plain(
                name,
                Callbacks::new().on_new_value(move |engine, value| {
                    let delta = u7_twos_complement_delta(value);
                    engine.set_value(LIBRARY_GROUP, "MoveVertical", delta * speed);
                }),
            ));
        }

        Self { crossfader_ignored }
    }

    #[must_use]
    pub fn is_crossfader_ignored(&self) -> bool {
        self.crossfader_ignored.get()
    }
}
