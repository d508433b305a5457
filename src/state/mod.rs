// SPDX-FileCopyrightText: The djio authors
// SPDX-License-Identifier: MPL-2.0

//! Mapping state and input dispatching
//!
//! The host invokes [`MappingState::init()`] once on startup and then
//! [`MappingState::midi_input()`] for each received MIDI message, always
//! from the same thread.

use strum::IntoEnumIterator as _;

use crate::{
    control::ControlRegistry,
    deck::{Deck, DeckMapping},
    mapping::{ddj_wego, MappingError, MidiMapping},
    midi::{MidiEvent, MidiOutput},
    mixer::MixerMapping,
    Engine,
};

#[derive(Debug)]
pub struct MappingState {
    mapping: MidiMapping,
    registry: ControlRegistry,
    mixer: MixerMapping,
    decks: Vec<DeckMapping>,
}

impl MappingState {
    /// Build the mapping and register all controls.
    ///
    /// Deck-independent controls are registered first, followed by the
    /// controls of each deck. Finally the controller is switched into
    /// 4-deck mode.
    pub fn init(engine: &mut dyn Engine, midi: &mut dyn MidiOutput) -> Result<Self, MappingError> {
        let mapping = ddj_wego::build_mapping()?;
        let mut registry = ControlRegistry::new();
        let mixer = MixerMapping::new(&mut registry);
        let decks = Deck::iter()
            .map(|deck| DeckMapping::new(deck, engine, &mapping, &mut registry))
            .collect::<Vec<_>>();
        let [status, data1, data2] = ddj_wego::MIDI_MESSAGE_FOUR_DECK_MODE;
        midi.send_short_msg(status, data1, data2);
        log::info!(
            "Initialized {product_name} with {num_decks} decks and {num_controls} controls",
            product_name = ddj_wego::DEVICE_DESCRIPTOR.product_name,
            num_decks = decks.len(),
            num_controls = registry.len(),
        );
        Ok(Self {
            mapping,
            registry,
            mixer,
            decks,
        })
    }

    /// Dispatch a MIDI input event to all registered controls.
    ///
    /// Returns `false` if the event has been ignored, because its
    /// address is not mapped to any control.
    pub fn midi_input(&mut self, engine: &mut dyn Engine, event: &MidiEvent<'_>) -> bool {
        let Some(name) = self.mapping.resolve(event.status, event.data1) else {
            log::debug!("Unmapped MIDI input: {event:?}");
            return false;
        };
        let accepted = self.registry.offer_value(engine, name, event.value);
        log::trace!(
            "Dispatched {name} = {value} to {accepted} control(s)",
            value = event.value
        );
        true
    }

    /// Decode and dispatch a raw short message.
    ///
    /// Returns `false` if the message is not a short message.
    /// Unmapped short messages are silently ignored.
    pub fn handle_midi_message(&mut self, engine: &mut dyn Engine, input: &[u8]) -> bool {
        let Some(event) = MidiEvent::try_from_short_message(input) else {
            log::warn!("Failed to decode MIDI input: {input:x?}");
            return false;
        };
        self.midi_input(engine, &event);
        true
    }

    #[must_use]
    pub const fn mapping(&self) -> &MidiMapping {
        &self.mapping
    }

    #[must_use]
    pub const fn registry(&self) -> &ControlRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn mixer(&self) -> &MixerMapping {
        &self.mixer
    }

    #[must_use]
    pub fn decks(&self) -> &[DeckMapping] {
        &self.decks
    }

    #[must_use]
    pub fn deck(&self, deck: Deck) -> Option<&DeckMapping> {
        self.decks.iter().find(|mapping| mapping.deck() == deck)
    }
}
