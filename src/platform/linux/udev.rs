// Copyright 2016-2018 Mateusz Sieczko and other GilRs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Thin RAII wrappers over the parts of libudev used for device discovery.

use libudev_sys as ud;
use std::ffi::{CStr, CString};

#[derive(Debug)]
pub struct Udev(*mut ud::udev);

impl Udev {
    pub fn new() -> Option<Self> {
        let u = unsafe { ud::udev_new() };
        if u.is_null() {
            None
        } else {
            Some(Udev(u))
        }
    }

    pub fn enumerate(&self) -> Option<Enumerate> {
        let en = unsafe { ud::udev_enumerate_new(self.0) };
        if en.is_null() {
            None
        } else {
            Some(Enumerate(en))
        }
    }

    /// Enumerator preconfigured for input devices classified as joysticks.
    pub fn enumerate_joysticks(&self) -> Option<Enumerate> {
        let en = self.enumerate()?;
        en.add_match_subsystem(c"input");
        en.add_match_property(c"ID_INPUT_JOYSTICK", c"1");
        en.scan_devices();
        Some(en)
    }
}

impl Drop for Udev {
    fn drop(&mut self) {
        unsafe {
            ud::udev_unref(self.0);
        }
    }
}

#[derive(Debug)]
pub struct Enumerate(*mut ud::udev_enumerate);

impl Enumerate {
    pub fn scan_devices(&self) {
        let ret = unsafe { ud::udev_enumerate_scan_devices(self.0) };
        if ret < 0 {
            warn!("udev device scan failed ({})", ret);
        }
    }

    pub fn add_match_property(&self, key: &CStr, val: &CStr) {
        let ret =
            unsafe { ud::udev_enumerate_add_match_property(self.0, key.as_ptr(), val.as_ptr()) };
        if ret < 0 {
            warn!("Failed to add udev property match {:?}={:?}", key, val);
        }
    }

    pub fn add_match_subsystem(&self, subsystem: &CStr) {
        let ret = unsafe { ud::udev_enumerate_add_match_subsystem(self.0, subsystem.as_ptr()) };
        if ret < 0 {
            warn!("Failed to add udev subsystem match {:?}", subsystem);
        }
    }

    pub fn iter(&self) -> DeviceIterator<'_> {
        DeviceIterator {
            entry: unsafe { ud::udev_enumerate_get_list_entry(self.0) },
            _enumerate: self,
        }
    }
}

impl Drop for Enumerate {
    fn drop(&mut self) {
        unsafe {
            ud::udev_enumerate_unref(self.0);
        }
    }
}

/// Iterates over syspaths of scanned devices. Borrows the enumerator, which owns the list.
pub struct DeviceIterator<'a> {
    entry: *mut ud::udev_list_entry,
    _enumerate: &'a Enumerate,
}

impl Iterator for DeviceIterator<'_> {
    type Item = CString;

    fn next(&mut self) -> Option<CString> {
        if self.entry.is_null() {
            return None;
        }

        let p_name = unsafe { ud::udev_list_entry_get_name(self.entry) };
        if p_name.is_null() {
            return None;
        }
        let name = unsafe { CStr::from_ptr(p_name).to_owned() };
        self.entry = unsafe { ud::udev_list_entry_get_next(self.entry) };

        Some(name)
    }
}

#[derive(Debug)]
pub struct Device(*mut ud::udev_device);

impl Device {
    pub fn from_syspath(udev: &Udev, path: &CStr) -> Option<Self> {
        let dev = unsafe { ud::udev_device_new_from_syspath(udev.0, path.as_ptr()) };
        if dev.is_null() {
            None
        } else {
            Some(Device(dev))
        }
    }

    /// Short kernel name, e.g. `js0` or `event12`.
    pub fn sysname(&self) -> Option<&CStr> {
        unsafe { opt_cstr(ud::udev_device_get_sysname(self.0)) }
    }

    pub fn devnode(&self) -> Option<&CStr> {
        unsafe { opt_cstr(ud::udev_device_get_devnode(self.0)) }
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        unsafe {
            ud::udev_device_unref(self.0);
        }
    }
}

/// Strings returned by libudev live as long as the object they were taken from.
unsafe fn opt_cstr<'a>(s: *const std::os::raw::c_char) -> Option<&'a CStr> {
    if s.is_null() {
        None
    } else {
        Some(CStr::from_ptr(s))
    }
}
