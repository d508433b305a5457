// SPDX-FileCopyrightText: The djio authors
// SPDX-License-Identifier: MPL-2.0

#![allow(rustdoc::invalid_rust_codeblocks)]
#![doc = include_str!("../README.md")]
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![warn(missing_debug_implementations)]
#![warn(unreachable_pub)]
#![warn(unsafe_code)]
#![warn(clippy::pedantic)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(rustdoc::broken_intra_doc_links)]
// Repetitions of module/type names occur frequently when using many
// modules for keeping the size of the source files handy. Often
// types have the same name as their parent module.
#![allow(clippy::module_name_repetitions)]
// Repeating the type name in `..Default::default()` expressions
// is not needed since the context is obvious.
#![allow(clippy::default_trait_access)]

pub mod control;
pub use self::control::{
    ButtonCallbacks, Callbacks, Control, ControlKind, ControlName, ControlRegistry, Modifier,
};

pub mod deck;
pub use self::deck::{Deck, DeckMapping};

pub mod engine;
pub use self::engine::{Connection, ConnectionCallback, Engine, ScratchParams};

pub mod mapping;
pub use self::mapping::{MappingError, MidiAddress, MidiMapping};

pub mod midi;
pub use self::midi::{DeviceDescriptor, MidiEvent, MidiOutput};

pub mod mixer;
pub use self::mixer::MixerMapping;

mod state;
pub use self::state::MappingState;
