// Copyright 2016-2018 Mateusz Sieczko and other GilRs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

// Diffing linux/input.h across different architectures (i686, x86_64 and arm) didn't show any
// difference, so the request codes are not conditionally compiled.

#![allow(non_camel_case_types)]

use libc as c;
use nix::{ioctl_read, ioctl_read_buf, request_code_read};

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct input_id {
    pub bustype: u16,
    pub vendor: u16,
    pub product: u16,
    pub version: u16,
}

ioctl_read!(eviocgid, b'E', 0x02, input_id);
ioctl_read_buf!(eviocgname, b'E', 0x06, u8);

/// `EVIOCGBIT(ev, len)`; the request number depends on the event type, so it can't be declared
/// with the nix macros.
pub unsafe fn eviocgbit(fd: c::c_int, ev: u32, len: c::c_int, buf: *mut u8) -> c::c_int {
    c::ioctl(fd, request_code_read!(b'E', 0x20 + ev, len) as _, buf)
}
