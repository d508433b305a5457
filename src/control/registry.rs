// SPDX-FileCopyrightText: The djio authors
// SPDX-License-Identifier: MPL-2.0

use super::{Control, ControlName};
use crate::Engine;

/// Ordered list of all registered controls
///
/// Filled once during initialization. Every offered value is
/// broadcast to all controls in registration order and each
/// control decides on its own if it accepts the value.
#[derive(Debug, Default)]
pub struct ControlRegistry {
    controls: Vec<Control>,
}

impl ControlRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, control: Control) {
        log::trace!("Registering control {name}", name = control.name());
        self.controls.push(control);
    }

    pub fn register_all(&mut self, controls: impl IntoIterator<Item = Control>) {
        for control in controls {
            self.register(control);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.controls.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Control> {
        self.controls.iter()
    }

    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Control> {
        self.controls
            .iter()
            .find(|control| control.name().as_str() == name)
    }

    /// Offer a value to all controls.
    ///
    /// Returns the number of controls that accepted the value.
    pub fn offer_value(&mut self, engine: &mut dyn Engine, name: &ControlName, value: u8) -> usize {
        let mut accepted = 0;
        for control in &mut self.controls {
            if control.offer_value(engine, name, value) {
                accepted += 1;
            }
        }
        accepted
    }
}
