// SPDX-FileCopyrightText: The djio authors
// SPDX-License-Identifier: MPL-2.0

//! Deck controls
//!
//! Wires the controls of a single deck to the engine and
//! reflects the state of the deck on the controller's LEDs.

use strum::{EnumCount, EnumIter, FromRepr};

use crate::{
    control::{ButtonCallbacks, Callbacks, Control, ControlName, ControlRegistry, Modifier},
    midi::{led_value, u7_centered_delta, MidiOutput},
    Connection, Engine, MidiMapping, ScratchParams,
};

/// Divides the jog wheel delta when nudging the playback speed.
pub const JOG_NUDGE_DIVISOR: f64 = 10.0;

/// Speed of the jog wheel while scratching with shift held down.
pub const JOG_SHIFTED_SCRATCH_SPEED: f64 = 20.0;

/// 1/32 beat
pub const BEATJUMP_SIZE_MIN: f64 = 0.031_25;

pub const BEATJUMP_SIZE_MAX: f64 = 128.0;

/// Hot cues that are bound to a performance pad.
///
/// Pad 3 is held down for changing the beatjump size and thus
/// not available as a hot cue.
pub const HOTCUE_PADS: [u8; 3] = [1, 2, 4];

/// Base name of the pad that modifies the loop encoder.
const BEATJUMP_SIZE_MODIFIER_PAD: &str = "Hotcue3";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount, FromRepr)]
#[repr(u8)]
pub enum Deck {
    /// Primary left deck
    One,
    /// Primary right deck
    Two,
    /// Secondary left deck
    Three,
    /// Secondary right deck
    Four,
}

impl Deck {
    /// 0-based index
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// 1-based channel number
    #[must_use]
    pub const fn channel(self) -> u8 {
        self.index() + 1
    }

    #[must_use]
    pub fn try_from_channel(channel: u8) -> Option<Self> {
        channel.checked_sub(1).and_then(Self::from_repr)
    }

    /// Engine group, e.g. `[Channel1]`
    #[must_use]
    pub fn group(self) -> String {
        format!("[Channel{channel}]", channel = self.channel())
    }

    /// Engine group of the equalizer effect
    #[must_use]
    pub fn eq_group(self) -> String {
        format!("[EqualizerRack1_{group}_Effect1]", group = self.group())
    }

    #[must_use]
    pub fn control_name(self, base_name: &str) -> ControlName {
        ControlName::deck_scoped(self.index(), base_name)
    }
}

/// Engine access scoped to the group of a deck.
#[derive(Debug, Clone)]
struct Channel {
    number: u8,
    group: String,
}

impl Channel {
    fn new(deck: Deck) -> Self {
        Self {
            number: deck.channel(),
            group: deck.group(),
        }
    }

    fn get_value(&self, engine: &dyn Engine, key: &str) -> f64 {
        engine.get_value(&self.group, key)
    }

    fn set_value(&self, engine: &mut dyn Engine, key: &str, value: f64) {
        engine.set_value(&self.group, key, value);
    }

    fn set_parameter(&self, engine: &mut dyn Engine, key: &str, value: f64) {
        engine.set_parameter(&self.group, key, value);
    }

    fn activate(&self, engine: &mut dyn Engine, key: &str) {
        engine.activate(&self.group, key);
    }

    fn toggle(&self, engine: &mut dyn Engine, key: &str) {
        engine.toggle_value(&self.group, key);
    }

    fn scratch_tick(&self, engine: &mut dyn Engine, delta: f64) {
        engine.scratch_tick(self.number, delta);
    }
}

/// The controls of a single deck after they have been registered.
#[derive(Debug)]
pub struct DeckMapping {
    deck: Deck,
    beatjump_size_modifier: Modifier,
    connections: Vec<Connection>,
}

impl DeckMapping {
    /// Create and register all controls of the deck.
    ///
    /// All LED connections are triggered once to synchronize
    /// the LEDs with the current state of the engine.
    pub fn new(
        deck: Deck,
        engine: &mut dyn Engine,
        mapping: &MidiMapping,
        registry: &mut ControlRegistry,
    ) -> Self {
        let channel = Channel::new(deck);
        let index = deck.index();

        let beatjump_size_modifier_pad =
            Control::deck_button(index, BEATJUMP_SIZE_MODIFIER_PAD, ButtonCallbacks::new());
        let beatjump_size_modifier = beatjump_size_modifier_pad.modifier();

        registry.register_all(transport_controls(index, &channel));
        registry.register_all(loop_controls(index, &channel, &beatjump_size_modifier));
        registry.register_all(mixer_controls(deck, &channel));
        registry.register_all(jog_controls(index, &channel));
        registry.register_all(hotcue_controls(index, &channel));
        registry.register(beatjump_size_modifier_pad);
        registry.register_all(load_controls(index, &channel));

        engine.soft_takeover(&channel.group, "rate", true);
        engine.soft_takeover(&channel.group, "volume", true);

        let connections = led_connections(deck, engine, mapping);
        for connection in &connections {
            engine.trigger_connection(*connection);
        }

        Self {
            deck,
            beatjump_size_modifier,
            connections,
        }
    }

    #[must_use]
    pub const fn deck(&self) -> Deck {
        self.deck
    }

    /// Whether the loop encoder currently changes the beatjump size.
    #[must_use]
    pub fn is_beatjump_size_modified(&self) -> bool {
        self.beatjump_size_modifier.is_active()
    }

    #[must_use]
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }
}

fn transport_controls(index: u8, channel: &Channel) -> Vec<Control> {
    let play = channel.clone();
    let cue = channel.clone();
    let sync = channel.clone();
    let pfl = channel.clone();
    vec![
        Control::deck_button(
            index,
            "Play",
            ButtonCallbacks::new().on_pressed(move |engine| play.toggle(engine, "play")),
        ),
        Control::deck_button(
            index,
            "Cue",
            ButtonCallbacks::new().on_value_changed(move |engine, value| {
                let pressed = if value > 0.0 { 1.0 } else { 0.0 };
                cue.set_value(engine, "cue_default", pressed);
            }),
        ),
        Control::deck_button(
            index,
            "Sync",
            ButtonCallbacks::new().on_pressed(move |engine| sync.activate(engine, "beatsync")),
        ),
        Control::deck_button(
            index,
            "Pfl",
            ButtonCallbacks::new().on_pressed(move |engine| pfl.toggle(engine, "pfl")),
        ),
    ]
}

fn loop_controls(index: u8, channel: &Channel, beatjump_size_modifier: &Modifier) -> Vec<Control> {
    let loop_button = channel.clone();
    let loop_size = channel.clone();
    let beatjump = channel.clone();
    let modifier = beatjump_size_modifier.clone();
    vec![
        Control::deck_button(
            index,
            "LoopButton",
            ButtonCallbacks::new().on_pressed(move |engine| {
                let size = loop_button.get_value(engine, "beatloop_size");
                loop_button.activate(engine, &format!("beatloop_{size}_toggle"));
            }),
        ),
        Control::deck_plain(
            index,
            "LoopEncoderShifted",
            Callbacks::new().on_new_value(move |engine, value| {
                let key = if is_counter_clockwise(value) {
                    "loop_halve"
                } else {
                    "loop_double"
                };
                loop_size.activate(engine, key);
            }),
        ),
        Control::deck_plain(
            index,
            "LoopEncoder",
            Callbacks::new().on_new_value(move |engine, value| {
                let counter_clockwise = is_counter_clockwise(value);
                if modifier.is_active() {
                    let factor = if counter_clockwise { 0.5 } else { 2.0 };
                    let size = beatjump.get_value(engine, "beatjump_size") * factor;
                    beatjump.set_value(
                        engine,
                        "beatjump_size",
                        size.clamp(BEATJUMP_SIZE_MIN, BEATJUMP_SIZE_MAX),
                    );
                } else {
                    let key = if counter_clockwise {
                        "beatjump_backward"
                    } else {
                        "beatjump_forward"
                    };
                    beatjump.activate(engine, key);
                }
            }),
        ),
    ]
}

/// The loop encoder sends values above the center when turned counter-clockwise.
fn is_counter_clockwise(value: f64) -> bool {
    value > f64::from(crate::midi::RELATIVE_CENTER)
}

fn mixer_controls(deck: Deck, channel: &Channel) -> Vec<Control> {
    let index = deck.index();
    let eq_group = deck.eq_group();
    let eq_controls = [
        ("EqLow", "parameter1"),
        ("EqMid", "parameter2"),
        ("EqHigh", "parameter3"),
    ]
    .into_iter()
    .map(|(base_name, key)| {
        let eq_group = eq_group.clone();
        Control::deck_fine(
            index,
            base_name,
            Callbacks::new().on_value_changed(move |engine, value| {
                engine.set_parameter(&eq_group, key, value);
            }),
        )
    });
    let volume = channel.clone();
    let tempo = channel.clone();
    eq_controls
        .chain([
            Control::deck_fine(
                index,
                "Volume",
                Callbacks::new().on_value_changed(move |engine, value| {
                    volume.set_parameter(engine, "volume", value);
                }),
            ),
            Control::deck_fine(
                index,
                "Tempo",
                Callbacks::new().on_value_changed(move |engine, value| {
                    tempo.set_parameter(engine, "rate", 1.0 - value);
                }),
            ),
        ])
        .collect()
}

fn jog_controls(index: u8, channel: &Channel) -> Vec<Control> {
    let mut controls = Vec::with_capacity(5);
    // The shifted touch sensor only ever sends non-zero values. Scratching is
    // enabled on every new value instead of on the pressed edge, which would
    // never be detected again after the first touch.
    for base_name in ["JogTouchButton", "JogTouchButtonShifted"] {
        let touch = channel.clone();
        let release = channel.clone();
        controls.push(Control::deck_button(
            index,
            base_name,
            ButtonCallbacks::new()
                .on_new_value(move |engine, value| {
                    if value > 0.0 {
                        engine.scratch_enable(touch.number, ScratchParams::default());
                    }
                })
                .on_released(move |engine| {
                    engine.scratch_disable(release.number, true);
                }),
        ));
    }
    let jog = channel.clone();
    controls.push(Control::deck_plain(
        index,
        "JogEncoder",
        Callbacks::new().on_new_value(move |engine, value| {
            let delta = u7_centered_delta(value);
            if engine.is_scratching(jog.number) {
                jog.scratch_tick(engine, delta);
            } else {
                jog.set_parameter(engine, "jog", delta / JOG_NUDGE_DIVISOR);
            }
        }),
    ));
    for (base_name, speed) in [
        ("JogEncoderTouch", 1.0),
        ("JogEncoderTouchShifted", JOG_SHIFTED_SCRATCH_SPEED),
    ] {
        let scratch = channel.clone();
        controls.push(Control::deck_plain(
            index,
            base_name,
            Callbacks::new().on_new_value(move |engine, value| {
                scratch.scratch_tick(engine, u7_centered_delta(value) * speed);
            }),
        ));
    }
    controls
}

fn hotcue_controls(index: u8, channel: &Channel) -> Vec<Control> {
    let mut controls = Vec::with_capacity(HOTCUE_PADS.len() * 2);
    for number in HOTCUE_PADS {
        let activate_key = format!("hotcue_{number}_activate");
        let release_key = activate_key.clone();
        let clear_key = format!("hotcue_{number}_clear");
        let press = channel.clone();
        let release = channel.clone();
        let clear = channel.clone();
        controls.push(Control::deck_button(
            index,
            &format!("Hotcue{number}"),
            ButtonCallbacks::new()
                .on_pressed(move |engine| press.set_value(engine, &activate_key, 1.0))
                .on_released(move |engine| release.set_value(engine, &release_key, 0.0)),
        ));
        controls.push(Control::deck_button(
            index,
            &format!("Hotcue{number}Shifted"),
            ButtonCallbacks::new().on_pressed(move |engine| clear.activate(engine, &clear_key)),
        ));
    }
    controls
}

fn load_controls(index: u8, channel: &Channel) -> Vec<Control> {
    let load = channel.clone();
    let eject = channel.clone();
    vec![
        Control::deck_button(
            index,
            "Load",
            ButtonCallbacks::new()
                .on_pressed(move |engine| load.activate(engine, "LoadSelectedTrack")),
        ),
        Control::deck_button(
            index,
            "LoadShifted",
            ButtonCallbacks::new().on_pressed(move |engine| {
                // Never eject a playing track
                if eject.get_value(engine, "play") > 0.0 {
                    return;
                }
                eject.activate(engine, "eject");
            }),
        ),
    ]
}

/// Engine keys and the base names of the controls whose LED reflects them.
const LED_KEYS: &[(&str, &str)] = &[
    ("play", "Play"),
    ("cue_indicator", "Cue"),
    ("sync_enabled", "Sync"),
    ("pfl", "Pfl"),
    ("loop_enabled", "LoopButton"),
];

fn led_connections(deck: Deck, engine: &mut dyn Engine, mapping: &MidiMapping) -> Vec<Connection> {
    let group = deck.group();
    let mut led_controls = LED_KEYS
        .iter()
        .map(|&(key, base_name)| (key.to_owned(), deck.control_name(base_name)))
        .collect::<Vec<_>>();
    for number in HOTCUE_PADS {
        let key = format!("hotcue_{number}_enabled");
        led_controls.push((key.clone(), deck.control_name(&format!("Hotcue{number}"))));
        led_controls.push((key, deck.control_name(&format!("Hotcue{number}Shifted"))));
    }
    led_controls
        .into_iter()
        .filter_map(|(key, name)| {
            let Some(address) = mapping.reverse_resolve(name.as_str()) else {
                log::warn!("No LED for {name}");
                return None;
            };
            let connection = engine.make_connection(
                &group,
                &key,
                Box::new(move |midi: &mut dyn MidiOutput, value: f64| {
                    midi.send_short_msg(address.status, address.data1, led_value(value));
                }),
            );
            Some(connection)
        })
        .collect()
}

#[cfg(test)]
mod tests;
