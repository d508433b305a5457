// SPDX-FileCopyrightText: The djio authors
// SPDX-License-Identifier: MPL-2.0

//! Controls
//!
//! A control turns raw 7-bit MIDI values that are offered under a symbolic
//! name into semantic events: a new value, a changed value, or the
//! pressed/released edges of a button. Controls ignore all values that
//! are offered under a foreign name.
//!
//! Each control is one of three kinds:
//!
//! - *Plain*: Reports every new value and each change of the value.
//! - *Fine*: Combines two physical 7-bit controls, the most significant
//!   and least significant half, into a single 14-bit control with a
//!   normalized value in the interval [0, 1].
//! - *Button*: A plain control that also reports pressed/released edges.
//!
//! Deck-scoped controls are ordinary controls with the deck index
//! prepended to their name.

use std::{borrow::Borrow, cell::Cell, fmt, rc::Rc};

use derive_more::{Deref, Display};

use crate::{
    midi::{u14_to_normalized, u7_be_to_u14},
    Engine,
};

mod registry;
pub use self::registry::ControlRegistry;

/// Suffix of the most significant half of a fine control.
pub const FINE_MSB_SUFFIX: &str = "Msb";

/// Suffix of the least significant half of a fine control.
pub const FINE_LSB_SUFFIX: &str = "Lsb";

/// Unique symbolic name of a control.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Deref)]
pub struct ControlName(String);

impl ControlName {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Prefix the base name with the index of a deck.
    #[must_use]
    pub fn deck_scoped(deck_index: u8, base_name: &str) -> Self {
        Self(format!("{deck_index}{base_name}"))
    }

    #[must_use]
    pub fn with_suffix(&self, suffix: &str) -> Self {
        Self(format!("{}{suffix}", self.0))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ControlName {
    fn from(from: &str) -> Self {
        Self::new(from)
    }
}

impl From<String> for ControlName {
    fn from(from: String) -> Self {
        Self(from)
    }
}

impl AsRef<str> for ControlName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ControlName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

pub type ValueCallback = Box<dyn FnMut(&mut dyn Engine, f64)>;

pub type EdgeCallback = Box<dyn FnMut(&mut dyn Engine)>;

/// Optional value callbacks
///
/// Each callback may be absent, i.e. the corresponding event
/// is silently dropped.
#[derive(Default)]
pub struct Callbacks {
    on_new_value: Option<ValueCallback>,
    on_value_changed: Option<ValueCallback>,
}

impl Callbacks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Invoked for every accepted value.
    #[must_use]
    pub fn on_new_value(mut self, callback: impl FnMut(&mut dyn Engine, f64) + 'static) -> Self {
        self.on_new_value = Some(Box::new(callback));
        self
    }

    /// Invoked when the accepted value differs from the last value.
    #[must_use]
    pub fn on_value_changed(
        mut self,
        callback: impl FnMut(&mut dyn Engine, f64) + 'static,
    ) -> Self {
        self.on_value_changed = Some(Box::new(callback));
        self
    }

    fn notify_new_value(&mut self, engine: &mut dyn Engine, value: f64) {
        if let Some(on_new_value) = &mut self.on_new_value {
            on_new_value(engine, value);
        }
    }

    fn notify_value_changed(&mut self, engine: &mut dyn Engine, value: f64) {
        if let Some(on_value_changed) = &mut self.on_value_changed {
            on_value_changed(engine, value);
        }
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_new_value", &self.on_new_value.is_some())
            .field("on_value_changed", &self.on_value_changed.is_some())
            .finish()
    }
}

/// Optional callbacks of a button
#[derive(Default)]
pub struct ButtonCallbacks {
    value: Callbacks,
    on_pressed: Option<EdgeCallback>,
    on_released: Option<EdgeCallback>,
}

impl ButtonCallbacks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn on_new_value(mut self, callback: impl FnMut(&mut dyn Engine, f64) + 'static) -> Self {
        self.value = self.value.on_new_value(callback);
        self
    }

    #[must_use]
    pub fn on_value_changed(
        mut self,
        callback: impl FnMut(&mut dyn Engine, f64) + 'static,
    ) -> Self {
        self.value = self.value.on_value_changed(callback);
        self
    }

    /// Invoked on the transition to a non-zero value.
    #[must_use]
    pub fn on_pressed(mut self, callback: impl FnMut(&mut dyn Engine) + 'static) -> Self {
        self.on_pressed = Some(Box::new(callback));
        self
    }

    /// Invoked on the transition to zero.
    #[must_use]
    pub fn on_released(mut self, callback: impl FnMut(&mut dyn Engine) + 'static) -> Self {
        self.on_released = Some(Box::new(callback));
        self
    }
}

impl fmt::Debug for ButtonCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ButtonCallbacks")
            .field("value", &self.value)
            .field("on_pressed", &self.on_pressed.is_some())
            .field("on_released", &self.on_released.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Plain,
    Fine,
    Button,
}

/// The two 7-bit halves of a fine control.
#[derive(Debug)]
struct FineHalves {
    msb_name: ControlName,
    lsb_name: ControlName,
    last_msb: u8,
    last_lsb: u8,
}

impl FineHalves {
    fn new(name: &ControlName) -> Self {
        Self {
            msb_name: name.with_suffix(FINE_MSB_SUFFIX),
            lsb_name: name.with_suffix(FINE_LSB_SUFFIX),
            last_msb: 0,
            last_lsb: 0,
        }
    }

    /// Store the offered half and return the combined, normalized value.
    fn offer(&mut self, name: &str, value: u8) -> Option<f64> {
        if name == self.msb_name.as_str() {
            self.last_msb = value;
        } else if name == self.lsb_name.as_str() {
            self.last_lsb = value;
        } else {
            return None;
        }
        Some(u14_to_normalized(u7_be_to_u14(self.last_msb, self.last_lsb)))
    }
}

struct ButtonEdges {
    on_pressed: Option<EdgeCallback>,
    on_released: Option<EdgeCallback>,
}

impl ButtonEdges {
    fn notify(&mut self, engine: &mut dyn Engine, value: f64) {
        let callback = if value > 0.0 {
            &mut self.on_pressed
        } else {
            &mut self.on_released
        };
        if let Some(callback) = callback {
            callback(engine);
        }
    }
}

enum Behavior {
    Plain,
    Fine(FineHalves),
    Button(ButtonEdges),
}

/// Read-only view of the last value of a control.
///
/// Used for reading the state of a modifier, e.g. a held button, from the
/// callbacks of another control. Each read returns a snapshot of the current
/// value. No events are delivered.
#[derive(Debug, Clone)]
pub struct Modifier(Rc<Cell<f64>>);

impl Modifier {
    #[must_use]
    pub fn value(&self) -> f64 {
        self.0.get()
    }

    /// Whether the control is currently held, i.e. its last value is non-zero.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.value() > 0.0
    }
}

pub struct Control {
    name: ControlName,
    callbacks: Callbacks,
    behavior: Behavior,
    last_value: Rc<Cell<f64>>,
}

impl Control {
    fn with_behavior(name: ControlName, callbacks: Callbacks, behavior: Behavior) -> Self {
        Self {
            name,
            callbacks,
            behavior,
            last_value: Default::default(),
        }
    }

    #[must_use]
    pub fn plain(name: impl Into<ControlName>, callbacks: Callbacks) -> Self {
        Self::with_behavior(name.into(), callbacks, Behavior::Plain)
    }

    /// A 14-bit control that is fed by the sub-controls
    /// `<name>Msb` and `<name>Lsb`.
    #[must_use]
    pub fn fine(name: impl Into<ControlName>, callbacks: Callbacks) -> Self {
        let name = name.into();
        let halves = FineHalves::new(&name);
        Self::with_behavior(name, callbacks, Behavior::Fine(halves))
    }

    #[must_use]
    pub fn button(name: impl Into<ControlName>, callbacks: ButtonCallbacks) -> Self {
        let ButtonCallbacks {
            value,
            on_pressed,
            on_released,
        } = callbacks;
        let edges = ButtonEdges {
            on_pressed,
            on_released,
        };
        Self::with_behavior(name.into(), value, Behavior::Button(edges))
    }

    #[must_use]
    pub fn deck_plain(deck_index: u8, base_name: &str, callbacks: Callbacks) -> Self {
        Self::plain(ControlName::deck_scoped(deck_index, base_name), callbacks)
    }

    #[must_use]
    pub fn deck_fine(deck_index: u8, base_name: &str, callbacks: Callbacks) -> Self {
        Self::fine(ControlName::deck_scoped(deck_index, base_name), callbacks)
    }

    #[must_use]
    pub fn deck_button(deck_index: u8, base_name: &str, callbacks: ButtonCallbacks) -> Self {
        Self::button(ControlName::deck_scoped(deck_index, base_name), callbacks)
    }

    #[must_use]
    pub const fn name(&self) -> &ControlName {
        &self.name
    }

    #[must_use]
    pub const fn kind(&self) -> ControlKind {
        match self.behavior {
            Behavior::Plain => ControlKind::Plain,
            Behavior::Fine(_) => ControlKind::Fine,
            Behavior::Button(_) => ControlKind::Button,
        }
    }

    /// Raw 7-bit value for plain controls and buttons,
    /// normalized value in [0, 1] for fine controls.
    #[must_use]
    pub fn last_value(&self) -> f64 {
        self.last_value.get()
    }

    #[must_use]
    pub fn modifier(&self) -> Modifier {
        Modifier(Rc::clone(&self.last_value))
    }

    /// The names under which this control accepts values.
    pub fn input_names(&self) -> impl Iterator<Item = &ControlName> + '_ {
        let (first, second) = match &self.behavior {
            Behavior::Fine(halves) => (&halves.msb_name, Some(&halves.lsb_name)),
            Behavior::Plain | Behavior::Button(_) => (&self.name, None),
        };
        std::iter::once(first).chain(second)
    }

    /// Offer a raw 7-bit value.
    ///
    /// Returns `false` without any side effects if the name
    /// does not belong to this control.
    #[allow(clippy::float_cmp)] // Values of plain controls are exact
    pub fn offer_value(&mut self, engine: &mut dyn Engine, name: &str, value: u8) -> bool {
        let Self {
            name: own_name,
            callbacks,
            behavior,
            last_value,
        } = self;
        if let Behavior::Fine(halves) = behavior {
            let Some(value) = halves.offer(name, value) else {
                return false;
            };
            last_value.set(value);
            callbacks.notify_new_value(engine, value);
            // Either half is a meaningful update on its own. The change is reported
            // even if the combined value happens to be unchanged.
            callbacks.notify_value_changed(engine, value);
            return true;
        }
        if name != own_name.as_str() {
            return false;
        }
        let value = f64::from(value);
        callbacks.notify_new_value(engine, value);
        if last_value.get() == value {
            return true;
        }
        if let Behavior::Button(edges) = behavior {
            edges.notify(engine, value);
        }
        callbacks.notify_value_changed(engine, value);
        last_value.set(value);
        true
    }
}

impl fmt::Debug for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Control")
            .field("name", &self.name)
            .field("kind", &self.kind())
            .field("last_value", &self.last_value())
            .finish_non_exhaustive()
    }
}
