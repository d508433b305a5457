// SPDX-FileCopyrightText: The djio authors
// SPDX-License-Identifier: MPL-2.0

//! Bidirectional mapping between MIDI addresses and control names.

use std::collections::{hash_map::Entry, HashMap};

use derive_more::Display;
use thiserror::Error;

use crate::control::{ControlName, FINE_LSB_SUFFIX, FINE_MSB_SUFFIX};

pub mod ddj_wego;

/// The status byte and first data byte of a MIDI short message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display("[{status:#04x}, {data1:#04x}]")]
pub struct MidiAddress {
    pub status: u8,
    pub data1: u8,
}

impl MidiAddress {
    #[must_use]
    pub const fn new(status: u8, data1: u8) -> Self {
        Self { status, data1 }
    }
}

#[derive(Debug, Error)]
pub enum MappingError {
    #[error("duplicate control name {name}")]
    DuplicateName { name: ControlName },
    #[error("MIDI address {address} is assigned to both {assigned} and {rejected}")]
    DuplicateAddress {
        address: MidiAddress,
        assigned: ControlName,
        rejected: ControlName,
    },
}

/// Maps MIDI addresses to control names and vice versa.
///
/// Each name has exactly one address and each address at most one name.
#[derive(Debug, Clone, Default)]
pub struct MidiMapping {
    names_by_status: HashMap<u8, HashMap<u8, ControlName>>,
    addresses_by_name: HashMap<ControlName, MidiAddress>,
}

impl MidiMapping {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: ControlName, address: MidiAddress) -> Result<(), MappingError> {
        if self.addresses_by_name.contains_key(&name) {
            return Err(MappingError::DuplicateName { name });
        }
        match self
            .names_by_status
            .entry(address.status)
            .or_default()
            .entry(address.data1)
        {
            Entry::Occupied(entry) => {
                return Err(MappingError::DuplicateAddress {
                    address,
                    assigned: entry.get().clone(),
                    rejected: name,
                });
            }
            Entry::Vacant(entry) => {
                entry.insert(name.clone());
            }
        }
        self.addresses_by_name.insert(name, address);
        Ok(())
    }

    /// Insert both halves of a fine control.
    pub fn insert_fine(
        &mut self,
        name: &ControlName,
        msb_address: MidiAddress,
        lsb_address: MidiAddress,
    ) -> Result<(), MappingError> {
        self.insert(name.with_suffix(FINE_MSB_SUFFIX), msb_address)?;
        self.insert(name.with_suffix(FINE_LSB_SUFFIX), lsb_address)
    }

    #[must_use]
    pub fn resolve(&self, status: u8, data1: u8) -> Option<&ControlName> {
        self.names_by_status.get(&status)?.get(&data1)
    }

    #[must_use]
    pub fn reverse_resolve(&self, name: &str) -> Option<MidiAddress> {
        self.addresses_by_name.get(name).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.addresses_by_name.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.addresses_by_name.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ControlName, MidiAddress)> {
        self.addresses_by_name
            .iter()
            .map(|(name, &address)| (name, address))
    }
}
