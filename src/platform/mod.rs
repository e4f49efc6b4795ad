// Copyright 2016-2018 Mateusz Sieczko and other GilRs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Module which exports the platform-specific types.
//!
//! Each backend has to provide:
//!
//! * A `Subsystem` implementing `backend::Backend`, with `new(&Config)`
//! * `Joystick` and `Controller` handle types
//! * A `joystick_sysnames()` function listing short names of joystick device nodes
//! * A static `str` which specifies the name of the SDL input mapping

#![allow(clippy::module_inception)]

pub use self::platform::*;

#[cfg(target_os = "linux")]
#[path = "linux/mod.rs"]
mod platform;

#[cfg(not(target_os = "linux"))]
#[path = "default/mod.rs"]
mod platform;
