// Copyright 2016-2018 Mateusz Sieczko and other GilRs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Per-device report.
//!
//! Slots of the input subsystem and legacy joystick nodes have no shared key, so they are joined
//! by rank: slot `i` is paired with the `i`-th smallest node index. The pairing is correct only
//! when both sides list the same physical devices in the same relative order. A device that only
//! one side knows about, or a device plugged in or removed between the two enumerations, shifts
//! every later pair and the report shows the wrong node name. The node name is informational
//! only and nothing else depends on it.

use crate::backend::{Backend, Controller, Device};
use crate::error::Error;

use uuid::Uuid;

use std::fmt::Display;
use std::io::{self, Write};

/// Printed instead of reports when the subsystem has no devices.
pub const NO_DEVICES: &str = "No joystick/gamepad detected.";
/// Printed for game controllers without mapping string.
pub const NO_MAPPING: &str = "(no mapping)";

/// Separates name and GUID in compact joystick lines.
const COMPACT_SEPARATOR: char = '%';
const LABEL_WIDTH: usize = 17;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Mode {
    /// Mapping string for controllers, `name%guid` for joysticks.
    #[default]
    Compact,
    /// Every field, one per line.
    Verbose,
}

/// A slot opened either as game controller or as raw joystick.
#[derive(Debug)]
pub enum Acquired<C, J> {
    Controller(C),
    Joystick(J),
}

/// Opens slot as game controller, falling back to raw joystick. Error is the joystick one.
pub fn acquire<B: Backend>(
    backend: &mut B,
    slot: usize,
) -> Result<Acquired<B::Controller, B::Joystick>, Error> {
    match backend.open_controller(slot) {
        Ok(controller) => Ok(Acquired::Controller(controller)),
        Err(e) => {
            debug!("Slot {} can't be opened as game controller: {}", slot, e);
            backend.open_joystick(slot).map(Acquired::Joystick)
        }
    }
}

/// Legacy joystick node paired with a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub index: u32,
    pub name: String,
}

/// Pairs `slot` with the node at the same position of the sorted `nodes`, not with node `slot`.
pub fn node_for_slot<F>(nodes: &[u32], slot: usize, resolve: F) -> Option<Node>
where
    F: FnOnce(u32) -> String,
{
    nodes.get(slot).map(|&index| Node {
        index,
        name: resolve(index),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
    Controller { mapping: Option<String> },
    Joystick { axes: usize },
}

/// Everything printed about one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceReport {
    pub slot: usize,
    pub node: Option<Node>,
    pub name: String,
    pub guid: Uuid,
    pub instance_id: u32,
    pub kind: Kind,
}

impl DeviceReport {
    pub fn new<C, J>(slot: usize, node: Option<Node>, device: &Acquired<C, J>) -> Self
    where
        C: Controller,
        J: Device,
    {
        match device {
            Acquired::Controller(c) => DeviceReport {
                slot,
                node,
                name: c.name().to_owned(),
                guid: c.guid(),
                instance_id: c.instance_id(),
                kind: Kind::Controller {
                    mapping: c.mapping().map(str::to_owned),
                },
            },
            Acquired::Joystick(j) => DeviceReport {
                slot,
                node,
                name: j.name().to_owned(),
                guid: j.guid(),
                instance_id: j.instance_id(),
                kind: Kind::Joystick {
                    axes: j.num_axes(),
                },
            },
        }
    }

    pub fn write_to<W: Write>(&self, mode: Mode, out: &mut W) -> io::Result<()> {
        match mode {
            Mode::Compact => self.write_compact(out),
            Mode::Verbose => self.write_verbose(out),
        }
    }

    fn write_compact<W: Write>(&self, out: &mut W) -> io::Result<()> {
        match self.kind {
            Kind::Controller { ref mapping } => {
                writeln!(out, "{}", mapping.as_deref().unwrap_or(NO_MAPPING))
            }
            Kind::Joystick { .. } => writeln!(
                out,
                "{}{}{}",
                self.name,
                COMPACT_SEPARATOR,
                self.guid.simple()
            ),
        }
    }

    fn write_verbose<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out)?;
        match self.kind {
            Kind::Controller { .. } => writeln!(out, "Gamepad {}", self.slot)?,
            Kind::Joystick { .. } => writeln!(out, "Joystick {} ", self.slot)?,
        }

        if let Some(ref node) = self.node {
            field(out, "UDEV name:", &node.name)?;
        }
        field(out, "SDL name:", &self.name)?;
        field(out, "SDL GUID:", self.guid.simple())?;
        match self.kind {
            Kind::Controller { ref mapping } => {
                field(out, "Mapping:", mapping.as_deref().unwrap_or(NO_MAPPING))?
            }
            Kind::Joystick { axes } => field(out, "Axes:", axes)?,
        }
        field(out, "Instance ID:", self.instance_id)?;
        if let Some(ref node) = self.node {
            field(out, "jsindex:", node.index)?;
        }

        Ok(())
    }
}

fn field<W: Write, T: Display>(out: &mut W, label: &str, value: T) -> io::Result<()> {
    writeln!(out, "{:<width$}{}", label, value, width = LABEL_WIDTH)
}

/// Writes one report (or one open failure line) per slot of `backend`, in slot order.
///
/// `nodes` must be sorted; `resolve` turns a node index into a display name. At most one device
/// is open at a time and every device is released before the next slot is looked at. Failing to
/// open a slot doesn't stop the loop. Only write errors are returned.
pub fn run<B, W, F>(
    backend: &mut B,
    nodes: &[u32],
    mode: Mode,
    mut resolve: F,
    out: &mut W,
) -> io::Result<()>
where
    B: Backend,
    W: Write,
    F: FnMut(u32) -> String,
{
    let count = backend.num_devices();
    if count == 0 {
        return writeln!(out, "{}", NO_DEVICES);
    }

    if nodes.len() != count {
        info!(
            "{} device(s) but {} joystick node(s), node names may be missing or misattributed",
            count,
            nodes.len()
        );
    }

    for slot in 0..count {
        let node = node_for_slot(nodes, slot, &mut resolve);

        let device = match acquire(backend, slot) {
            Ok(device) => device,
            Err(e) => {
                warn!("Failed to open slot {}: {}", slot, e);
                writeln!(out, "Could not open joystick {}: {}", slot, e)?;
                continue;
            }
        };
        let report = DeviceReport::new(slot, node, &device);
        drop(device);

        report.write_to(mode, out)?;
    }

    Ok(())
}
