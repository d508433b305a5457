// SPDX-FileCopyrightText: The djio authors
// SPDX-License-Identifier: MPL-2.0

use float_cmp::approx_eq;

use super::*;
use crate::{
    engine::memory::MemoryEngine,
    mapping::ddj_wego,
    midi::{LED_OFF, LED_ON},
};

struct Fixture {
    engine: MemoryEngine,
    mapping: MidiMapping,
    registry: ControlRegistry,
    deck: DeckMapping,
}

impl Fixture {
    fn new(deck: Deck) -> Self {
        let mapping = ddj_wego::build_mapping().unwrap();
        let mut engine = MemoryEngine::new();
        let mut registry = ControlRegistry::new();
        let deck = DeckMapping::new(deck, &mut engine, &mapping, &mut registry);
        Self {
            engine,
            mapping,
            registry,
            deck,
        }
    }

    fn offer(&mut self, name: &str, value: u8) -> usize {
        self.registry
            .offer_value(&mut self.engine, &ControlName::new(name), value)
    }

    fn value(&self, key: &str) -> f64 {
        self.engine.get_value(&self.deck.deck().group(), key)
    }
}

#[test]
fn deck_channels() {
    assert_eq!(0, Deck::One.index());
    assert_eq!(1, Deck::One.channel());
    assert_eq!(4, Deck::Four.channel());
    assert_eq!(Some(Deck::Two), Deck::try_from_channel(2));
    assert_eq!(None, Deck::try_from_channel(0));
    assert_eq!(None, Deck::try_from_channel(5));
    assert_eq!("[Channel3]", Deck::Three.group());
    assert_eq!(
        "[EqualizerRack1_[Channel3]_Effect1]",
        Deck::Three.eq_group()
    );
    assert_eq!("1Play", Deck::Two.control_name("Play").as_str());
}

#[test]
fn controls_are_deck_scoped() {
    let fixture = Fixture::new(Deck::Two);
    for control in fixture.registry.iter() {
        assert!(control.name().starts_with('1'), "{}", control.name());
    }
}

#[test]
fn other_decks_are_ignored() {
    let mut fixture = Fixture::new(Deck::One);
    assert_eq!(0, fixture.offer("1Play", 127));
    assert!(fixture.value("play") <= 0.0);
    assert!(fixture.engine.get_value(&Deck::Two.group(), "play") <= 0.0);
    assert_eq!(1, fixture.offer("0Play", 127));
    assert!(fixture.value("play") > 0.0);
}

#[test]
fn soft_takeover() {
    let fixture = Fixture::new(Deck::Four);
    assert!(fixture
        .engine
        .is_soft_takeover_enabled("[Channel4]", "rate"));
    assert!(fixture
        .engine
        .is_soft_takeover_enabled("[Channel4]", "volume"));
    assert!(!fixture
        .engine
        .is_soft_takeover_enabled("[Channel1]", "rate"));
}

#[test]
fn cue_follows_button() {
    let mut fixture = Fixture::new(Deck::One);
    fixture.offer("0Cue", 127);
    assert!(fixture.value("cue_default") > 0.0);
    fixture.offer("0Cue", 0);
    assert!(fixture.value("cue_default") <= 0.0);
}

#[test]
fn sync_and_pfl() {
    let mut fixture = Fixture::new(Deck::One);
    fixture.offer("0Sync", 127);
    assert!(fixture.value("beatsync") > 0.0);
    fixture.offer("0Pfl", 127);
    assert!(fixture.value("pfl") > 0.0);
    fixture.offer("0Pfl", 0);
    fixture.offer("0Pfl", 127);
    assert!(fixture.value("pfl") <= 0.0);
}

#[test]
fn eq_and_volume() {
    let mut fixture = Fixture::new(Deck::Two);
    fixture.offer("1EqLowMsb", 127);
    fixture.offer("1EqLowLsb", 127);
    let eq_group = Deck::Two.eq_group();
    assert!(approx_eq!(
        f64,
        1.0,
        fixture.engine.get_parameter(&eq_group, "parameter1")
    ));
    assert!(approx_eq!(
        f64,
        0.0,
        fixture.engine.get_parameter(&eq_group, "parameter3")
    ));
    fixture.offer("1VolumeMsb", 64);
    assert!(approx_eq!(
        f64,
        f64::from(64 << 7) / 16383.0,
        fixture.engine.get_parameter("[Channel2]", "volume")
    ));
}

#[test]
fn tempo_is_inverted() {
    let mut fixture = Fixture::new(Deck::One);
    fixture.offer("0TempoMsb", 0);
    assert!(approx_eq!(f64, 1.0, fixture.value("rate")));
    fixture.offer("0TempoMsb", 127);
    fixture.offer("0TempoLsb", 127);
    assert!(approx_eq!(f64, 0.0, fixture.value("rate")));
}

#[test]
fn loop_button_toggles_beatloop_of_current_size() {
    let mut fixture = Fixture::new(Deck::One);
    fixture.engine.set_value("[Channel1]", "beatloop_size", 4.0);
    fixture.offer("0LoopButton", 127);
    assert!(fixture.value("beatloop_4_toggle") > 0.0);
    fixture.engine.set_value("[Channel1]", "beatloop_size", 0.5);
    fixture.offer("0LoopButton", 0);
    fixture.offer("0LoopButton", 127);
    assert!(fixture.value("beatloop_0.5_toggle") > 0.0);
}

#[test]
fn shifted_loop_encoder_resizes_loop() {
    let mut fixture = Fixture::new(Deck::One);
    fixture.offer("0LoopEncoderShifted", 0x41);
    assert!(fixture.value("loop_halve") > 0.0);
    assert!(fixture.value("loop_double") <= 0.0);
    fixture.offer("0LoopEncoderShifted", 0x3f);
    assert!(fixture.value("loop_double") > 0.0);
}

#[test]
fn loop_encoder_jumps() {
    let mut fixture = Fixture::new(Deck::One);
    fixture.offer("0LoopEncoder", 0x41);
    assert!(fixture.value("beatjump_backward") > 0.0);
    assert!(fixture.value("beatjump_forward") <= 0.0);
    fixture.offer("0LoopEncoder", 0x3f);
    assert!(fixture.value("beatjump_forward") > 0.0);
}

#[test]
#[allow(clippy::float_cmp)]
fn loop_encoder_resizes_beatjump_while_modifier_is_held() {
    let mut fixture = Fixture::new(Deck::One);
    fixture.engine.set_value("[Channel1]", "beatjump_size", 4.0);
    assert!(!fixture.deck.is_beatjump_size_modified());

    fixture.offer("0Hotcue3", 127);
    assert!(fixture.deck.is_beatjump_size_modified());
    // Pad 3 is not a hot cue
    assert!(fixture.value("hotcue_3_activate") <= 0.0);

    fixture.offer("0LoopEncoder", 0x41);
    assert_eq!(2.0, fixture.value("beatjump_size"));
    fixture.offer("0LoopEncoder", 0x3f);
    fixture.offer("0LoopEncoder", 0x3f);
    assert_eq!(8.0, fixture.value("beatjump_size"));
    assert!(fixture.value("beatjump_backward") <= 0.0);
    assert!(fixture.value("beatjump_forward") <= 0.0);

    fixture.offer("0Hotcue3", 0);
    assert!(!fixture.deck.is_beatjump_size_modified());
    fixture.offer("0LoopEncoder", 0x3f);
    assert_eq!(8.0, fixture.value("beatjump_size"));
    assert!(fixture.value("beatjump_forward") > 0.0);
}

#[test]
#[allow(clippy::float_cmp)]
fn beatjump_size_is_clamped() {
    let mut fixture = Fixture::new(Deck::One);
    fixture.offer("0Hotcue3", 127);
    fixture
        .engine
        .set_value("[Channel1]", "beatjump_size", BEATJUMP_SIZE_MAX);
    fixture.offer("0LoopEncoder", 0x3f);
    assert_eq!(BEATJUMP_SIZE_MAX, fixture.value("beatjump_size"));
    fixture
        .engine
        .set_value("[Channel1]", "beatjump_size", BEATJUMP_SIZE_MIN);
    fixture.offer("0LoopEncoder", 0x41);
    assert_eq!(BEATJUMP_SIZE_MIN, fixture.value("beatjump_size"));
}

#[test]
fn jog_touch_scratches() {
    let mut fixture = Fixture::new(Deck::Three);
    assert!(!fixture.engine.is_scratching(3));
    fixture.offer("2JogTouchButton", 127);
    assert!(fixture.engine.is_scratching(3));
    assert_eq!(
        Some(&ScratchParams::default()),
        fixture.engine.scratch_params(3)
    );
    fixture.offer("2JogEncoder", 0x42);
    assert_eq!(&[(3_u8, 2.0)], fixture.engine.scratch_ticks());

    fixture.offer("2JogTouchButton", 0);
    assert!(!fixture.engine.is_scratching(3));
    fixture.offer("2JogEncoder", 0x3e);
    assert_eq!(1, fixture.engine.scratch_ticks().len());
    assert!(approx_eq!(
        f64,
        -0.2,
        fixture.engine.get_parameter("[Channel3]", "jog")
    ));
}

#[test]
fn shifted_jog_touch_enables_scratching_on_every_touch() {
    let mut fixture = Fixture::new(Deck::One);
    fixture.offer("0JogTouchButtonShifted", 127);
    assert!(fixture.engine.is_scratching(1));
    fixture.engine.scratch_disable(1, true);
    // The sensor never sends a release
    fixture.offer("0JogTouchButtonShifted", 127);
    assert!(fixture.engine.is_scratching(1));
}

#[test]
fn touched_jog_encoders_tick() {
    let mut fixture = Fixture::new(Deck::One);
    fixture.offer("0JogEncoderTouch", 0x41);
    fixture.offer("0JogEncoderTouchShifted", 0x3f);
    assert_eq!(
        &[(1_u8, 1.0), (1_u8, -JOG_SHIFTED_SCRATCH_SPEED)],
        fixture.engine.scratch_ticks()
    );
}

#[test]
fn hotcues() {
    let mut fixture = Fixture::new(Deck::One);
    fixture.offer("0Hotcue1", 127);
    assert!(fixture.value("hotcue_1_activate") > 0.0);
    fixture.offer("0Hotcue1", 0);
    assert!(fixture.value("hotcue_1_activate") <= 0.0);
    fixture.offer("0Hotcue4Shifted", 127);
    assert!(fixture.value("hotcue_4_clear") > 0.0);
    assert!(fixture.value("hotcue_1_clear") <= 0.0);
}

#[test]
fn load_and_eject() {
    let mut fixture = Fixture::new(Deck::Two);
    fixture.offer("1Load", 127);
    assert!(fixture.value("LoadSelectedTrack") > 0.0);

    fixture.engine.set_value("[Channel2]", "play", 1.0);
    fixture.offer("1LoadShifted", 127);
    assert!(fixture.value("eject") <= 0.0);

    fixture.engine.set_value("[Channel2]", "play", 0.0);
    fixture.offer("1LoadShifted", 0);
    fixture.offer("1LoadShifted", 127);
    assert!(fixture.value("eject") > 0.0);
}

#[test]
fn leds_follow_engine() {
    let mut fixture = Fixture::new(Deck::Two);
    let initial_messages = fixture.engine.take_sent_midi_messages();
    assert_eq!(fixture.deck.connections().len(), initial_messages.len());
    assert!(initial_messages.iter().all(|[_, _, value]| *value == LED_OFF));

    let pad = fixture.mapping.reverse_resolve("1Hotcue2").unwrap();
    let shifted_pad = fixture.mapping.reverse_resolve("1Hotcue2Shifted").unwrap();
    fixture
        .engine
        .set_value("[Channel2]", "hotcue_2_enabled", 1.0);
    assert_eq!(
        vec![
            [pad.status, pad.data1, LED_ON],
            [shifted_pad.status, shifted_pad.data1, LED_ON]
        ],
        fixture.engine.take_sent_midi_messages()
    );

    fixture.offer("1Play", 127);
    assert_eq!(
        vec![[0x91, 0x0b, LED_ON]],
        fixture.engine.take_sent_midi_messages()
    );
}
