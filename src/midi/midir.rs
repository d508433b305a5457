// SPDX-FileCopyrightText: The djio authors
// SPDX-License-Identifier: MPL-2.0

//! MIDI transport driven by [`midir`].

use std::sync::mpsc;

use midir::{
    ConnectError, Ignore, InitError, MidiInput, MidiInputConnection, MidiInputPort,
    MidiOutputConnection, MidiOutputPort,
};
use thiserror::Error;

use super::{DeviceDescriptor, MidiOutput};

#[derive(Debug, Error)]
pub enum MidiPortError {
    #[error("no MIDI port found for \"{port_name_prefix}\"")]
    NotFound { port_name_prefix: &'static str },
    #[error(transparent)]
    Init(#[from] InitError),
    #[error(transparent)]
    ConnectInput(#[from] ConnectError<MidiInput>),
    #[error(transparent)]
    ConnectOutput(#[from] ConnectError<midir::MidiOutput>),
}

/// Receives raw MIDI input on the thread of the MIDI driver.
///
/// Dispatching requires exclusive access to the engine and thus must
/// happen on the thread of the host, e.g. by forwarding the messages
/// through a channel.
pub trait MidiInputHandler: Send {
    /// Returns `false` if the input has been dropped.
    fn handle_midi_input(&mut self, stamp: u64, input: &[u8]) -> bool;
}

impl MidiInputHandler for mpsc::Sender<Vec<u8>> {
    fn handle_midi_input(&mut self, _stamp: u64, input: &[u8]) -> bool {
        self.send(input.to_vec()).is_ok()
    }
}

// Adapter for the midir callback closure
fn handle_input<I>(stamp: u64, input: &[u8], input_handler: &mut I)
where
    I: MidiInputHandler,
{
    log::trace!("Received MIDI input: {stamp} {input:0x?}");
    if !input_handler.handle_midi_input(stamp, input) {
        log::warn!("Unhandled MIDI input {stamp} {input:x?}");
    }
}

/// Output port of a connected device.
#[allow(missing_debug_implementations)]
pub struct MidirOutput {
    connection: MidiOutputConnection,
}

impl MidiOutput for MidirOutput {
    fn send_short_msg(&mut self, status: u8, data1: u8, data2: u8) {
        let msg = [status, data1, data2];
        if let Err(err) = self.connection.send(&msg) {
            log::warn!("Failed to send MIDI output {msg:x?}: {err}");
        }
    }
}

/// A controller connected through both an input and an output port.
#[allow(missing_debug_implementations)]
pub struct MidirDevice<I>
where
    I: MidiInputHandler + 'static,
{
    descriptor: &'static DeviceDescriptor,
    input_connection: MidiInputConnection<I>,
    output: MidirOutput,
}

impl<I> MidirDevice<I>
where
    I: MidiInputHandler + 'static,
{
    /// Connect the first input and output port whose name starts with
    /// the port name prefix of the device.
    pub fn connect(
        descriptor: &'static DeviceDescriptor,
        input_handler: I,
    ) -> Result<Self, MidiPortError> {
        let port_name_prefix = descriptor.port_name_prefix;
        let mut input = MidiInput::new(port_name_prefix)?;
        input.ignore(Ignore::All);
        let output = midir::MidiOutput::new(port_name_prefix)?;
        let (Some((input_port_name, input_port)), Some((output_port_name, output_port))) = (
            find_input_port(&input, port_name_prefix),
            find_output_port(&output, port_name_prefix),
        ) else {
            return Err(MidiPortError::NotFound { port_name_prefix });
        };
        log::info!(
            "Connecting {product_name} (input port: \"{input_port_name}\", output port: \
             \"{output_port_name}\")",
            product_name = descriptor.product_name,
        );
        let input_connection = input.connect(
            &input_port,
            &input_port_name,
            |stamp, input, input_handler| handle_input(stamp, input, input_handler),
            input_handler,
        )?;
        let connection = output.connect(&output_port, &output_port_name)?;
        Ok(Self {
            descriptor,
            input_connection,
            output: MidirOutput { connection },
        })
    }

    #[must_use]
    pub const fn descriptor(&self) -> &'static DeviceDescriptor {
        self.descriptor
    }

    pub fn output_mut(&mut self) -> &mut MidirOutput {
        &mut self.output
    }

    /// Close both ports and return the input handler.
    pub fn disconnect(self) -> I {
        let Self {
            descriptor,
            input_connection,
            output,
        } = self;
        output.connection.close();
        let (_input, input_handler) = input_connection.close();
        log::info!(
            "Disconnected {product_name}",
            product_name = descriptor.product_name
        );
        input_handler
    }
}

fn find_input_port(input: &MidiInput, port_name_prefix: &str) -> Option<(String, MidiInputPort)> {
    input.ports().into_iter().find_map(|port| {
        let port_name = input.port_name(&port).ok()?;
        if !port_name.starts_with(port_name_prefix) {
            log::debug!("Skipping input port \"{port_name}\"");
            return None;
        }
        Some((port_name, port))
    })
}

fn find_output_port(
    output: &midir::MidiOutput,
    port_name_prefix: &str,
) -> Option<(String, MidiOutputPort)> {
    output.ports().into_iter().find_map(|port| {
        let port_name = output.port_name(&port).ok()?;
        if !port_name.starts_with(port_name_prefix) {
            log::debug!("Skipping output port \"{port_name}\"");
            return None;
        }
        Some((port_name, port))
    })
}
