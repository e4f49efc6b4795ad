// Copyright 2016-2018 Mateusz Sieczko and other GilRs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Interface of the high-level input subsystem.
//!
//! Slots are `0..num_devices()` in the subsystem's own enumeration order. They are unrelated to
//! legacy `jsN` node indices. A slot is opened either as a game controller (the subsystem knows a
//! standard mapping for it) or as a raw joystick. Handles are released when dropped.

use crate::error::Error;

use uuid::Uuid;

use std::io;
use std::path::Path;

pub trait Backend {
    type Joystick: Device;
    type Controller: Controller;

    fn num_devices(&self) -> usize;

    /// Fails if the device has no game controller mapping.
    fn open_controller(&mut self, slot: usize) -> Result<Self::Controller, Error>;

    fn open_joystick(&mut self, slot: usize) -> Result<Self::Joystick, Error>;

    /// Adds SDL mappings from file, one per line. Returns number of mappings added.
    fn add_mappings_from_file(&mut self, path: &Path) -> io::Result<usize>;
}

/// Identity and capabilities of an opened device.
pub trait Device {
    fn name(&self) -> &str;

    /// SDL2-compatible GUID.
    fn guid(&self) -> Uuid;

    /// Stays the same for as long as the device is connected.
    fn instance_id(&self) -> u32;

    /// Number of absolute axes, not counting hats.
    fn num_axes(&self) -> usize;
}

pub trait Controller: Device {
    /// SDL mapping string, if the subsystem reports one.
    fn mapping(&self) -> Option<&str>;
}
