// Copyright 2016-2018 Mateusz Sieczko and other GilRs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! gamepad-info - joystick and gamepad diagnostics
//! ================================================
//!
//! Lists every joystick the input subsystem can see, together with its SDL-compatible GUID and,
//! for devices with a known layout, the SDL game controller mapping string. Output can be pasted
//! straight into `gamecontrollerdb.txt` or `SDL_GAMECONTROLLERCONFIG`.
//!
//! Example
//! -------
//!
//! ```no_run
//! use gamepad_info::{config::Config, nodes, report, Subsystem};
//!
//! let config = Config::from_env(std::env::args().skip(1));
//! let mut subsystem = Subsystem::new(&config).unwrap();
//! let nodes = nodes::enumerate();
//!
//! report::run(
//!     &mut subsystem,
//!     &nodes,
//!     config.mode(),
//!     nodes::node_name,
//!     &mut std::io::stdout(),
//! )
//! .unwrap();
//! ```
//!
//! Device slots and `jsN` nodes
//! ----------------------------
//!
//! The kernel's legacy joystick nodes and the subsystem's device slots are enumerated
//! separately and share no identifier. [`report`] pairs them by position, so the `UDEV name`
//! and `jsindex` fields can be wrong when the two enumerations disagree.
//!
//! Platform specific notes
//! ======================
//!
//! Linux
//! -----
//!
//! Devices are discovered with udev and read from `/dev/input/event*`, so the user needs read
//! access to these files. Inside Flatpak, or when `GAMEPAD_INFO_DISABLE_UDEV` is set, the
//! `/dev/input` directory is listed instead. Other platforms report no devices.

#[macro_use]
extern crate log;

pub mod backend;
pub mod config;
pub mod error;
pub mod mapping;
pub mod nodes;
pub mod report;

mod platform;
mod utils;

pub use crate::error::Error;
pub use crate::platform::{Controller, Joystick, Subsystem};
