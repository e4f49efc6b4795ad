// Copyright 2016-2018 Mateusz Sieczko and other GilRs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Fallback for platforms without joystick support. Nothing is ever enumerated.

use crate::backend::{self, Backend};
use crate::config::Config;
use crate::error::Error;
use crate::mapping::MappingDb;

use uuid::Uuid;

use std::io;
use std::path::Path;

// Platform name used in SDL mappings format
pub const NAME: &str = "Unknown";

pub fn joystick_sysnames() -> Vec<String> {
    Vec::new()
}

#[derive(Debug)]
pub struct Subsystem {
    mappings: MappingDb,
}

impl Subsystem {
    pub fn new(_config: &Config) -> Result<Self, Error> {
        Err(Error::NotSupported)
    }
}

impl Backend for Subsystem {
    type Joystick = Joystick;
    type Controller = Controller;

    fn num_devices(&self) -> usize {
        0
    }

    fn open_controller(&mut self, slot: usize) -> Result<Controller, Error> {
        Err(Error::InvalidSlot(slot))
    }

    fn open_joystick(&mut self, slot: usize) -> Result<Joystick, Error> {
        Err(Error::InvalidSlot(slot))
    }

    fn add_mappings_from_file(&mut self, path: &Path) -> io::Result<usize> {
        self.mappings.add_file_mappings(path)
    }
}

/// Can't be constructed.
#[derive(Debug)]
pub enum Joystick {}

/// Can't be constructed.
#[derive(Debug)]
pub enum Controller {}

impl backend::Device for Joystick {
    fn name(&self) -> &str {
        match *self {}
    }

    fn guid(&self) -> Uuid {
        match *self {}
    }

    fn instance_id(&self) -> u32 {
        match *self {}
    }

    fn num_axes(&self) -> usize {
        match *self {}
    }
}

impl backend::Device for Controller {
    fn name(&self) -> &str {
        match *self {}
    }

    fn guid(&self) -> Uuid {
        match *self {}
    }

    fn instance_id(&self) -> u32 {
        match *self {}
    }

    fn num_axes(&self) -> usize {
        match *self {}
    }
}

impl backend::Controller for Controller {
    fn mapping(&self) -> Option<&str> {
        match *self {}
    }
}
