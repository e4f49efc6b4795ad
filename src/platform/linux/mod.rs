// Copyright 2016-2018 Mateusz Sieczko and other GilRs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

mod ioctl;
mod joystick;
mod udev;

pub use self::joystick::{Controller, Joystick, Subsystem};

use self::udev::{Device, Udev};

// Platform name used in SDL mappings format
pub const NAME: &str = "Linux";

/// Short names (`js0`, `event5`, ...) of input devices udev classifies as joysticks.
///
/// Returns nothing if udev is not available. All udev objects are released before returning.
pub fn joystick_sysnames() -> Vec<String> {
    let udev = match Udev::new() {
        Some(udev) => udev,
        None => {
            warn!("Failed to create udev context, no joystick nodes listed");
            return Vec::new();
        }
    };
    let en = match udev.enumerate_joysticks() {
        Some(en) => en,
        None => {
            warn!("Failed to create udev enumerate object, no joystick nodes listed");
            return Vec::new();
        }
    };

    let names = en
        .iter()
        .filter_map(|syspath| Device::from_syspath(&udev, &syspath))
        .filter_map(|dev| dev.sysname().map(|name| name.to_string_lossy().into_owned()))
        .collect::<Vec<_>>();
    debug!("udev joystick nodes: {:?}", names);

    names
}
