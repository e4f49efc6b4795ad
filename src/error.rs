// Copyright 2016-2018 Mateusz Sieczko and other GilRs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::io;

/// Errors reported by the input subsystem.
#[derive(Debug)]
pub enum Error {
    /// Could not create udev context.
    UdevCtx,
    /// Could not create udev enumerate object.
    UdevEnumerate,
    /// Current platform has no input subsystem.
    NotSupported,
    /// Slot index is not below the device count.
    InvalidSlot(usize),
    /// Device has no SDL-compatible mapping, so it can't be opened as a game controller.
    NoMapping,
    /// Operating system error, with the operation that failed.
    Io(io::Error, &'static str),
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UdevCtx => f.write_str("failed to create udev context"),
            Error::UdevEnumerate => f.write_str("failed to create udev enumerate object"),
            Error::NotSupported => f.write_str("platform is not supported"),
            Error::InvalidSlot(slot) => write!(f, "there is no device at index {}", slot),
            Error::NoMapping => f.write_str("device has no game controller mapping"),
            Error::Io(err, ctx) => write!(f, "{} failed: {}", ctx, err),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Io(err, _) => Some(err),
            _ => None,
        }
    }
}
