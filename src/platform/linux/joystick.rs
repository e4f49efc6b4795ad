// Copyright 2016-2018 Mateusz Sieczko and other GilRs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use super::ioctl;
use super::udev::{Device as UdevDevice, Udev};
use crate::backend::{self, Backend};
use crate::config::Config;
use crate::error::Error;
use crate::mapping::{self, MappingDb};
use crate::utils;

use libc as c;
use uuid::Uuid;

use std::ffi::OsStr;
use std::fs::{File, OpenOptions};
use std::io;
use std::mem::MaybeUninit;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::{AsRawFd, RawFd};
use std::path::{Path, PathBuf};

const INPUT_DIR_PATH: &str = "/dev/input";

/// Evdev backed input subsystem. Devices are discovered once, when it is created.
#[derive(Debug)]
pub struct Subsystem {
    devices: Vec<DeviceEntry>,
    mappings: MappingDb,
}

#[derive(Debug, Clone)]
struct DeviceEntry {
    devpath: PathBuf,
    instance_id: u32,
}

impl Subsystem {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let candidates = if Path::new("/.flatpak-info").exists() || config.disable_udev() {
            debug!(
                "Looks like we're in an environment without udev. Scanning {}",
                INPUT_DIR_PATH
            );
            scan_input_dir(Path::new(INPUT_DIR_PATH))?
        } else {
            scan_udev()?
        };

        let devices = candidates
            .into_iter()
            .filter(|devpath| probe(devpath))
            .enumerate()
            .map(|(instance_id, devpath)| DeviceEntry {
                devpath,
                instance_id: instance_id as u32,
            })
            .collect::<Vec<_>>();
        info!("Found {} joystick(s)", devices.len());

        let mut mappings = MappingDb::new();
        let included = mappings.add_included_mappings();
        let from_env = mappings.add_env_mappings(config);
        debug!("Mappings: {included} included, {from_env} from environment");

        Ok(Subsystem { devices, mappings })
    }
}

impl Backend for Subsystem {
    type Joystick = Joystick;
    type Controller = Controller;

    fn num_devices(&self) -> usize {
        self.devices.len()
    }

    fn open_controller(&mut self, slot: usize) -> Result<Controller, Error> {
        let joystick = self.open_joystick(slot)?;
        let mapping = match self.mappings.get(joystick.uuid) {
            Some(mapping) => mapping.to_owned(),
            None => {
                let generated = default_mapping(
                    joystick.uuid,
                    &joystick.name,
                    &joystick.buttons,
                    &joystick.axes,
                    &joystick.hats,
                )
                .ok_or(Error::NoMapping)?;
                debug!("Generated mapping for {}: {}", joystick.name, generated);
                generated
            }
        };
        let name = mapping::mapping_name(&mapping)
            .filter(|name| !name.is_empty())
            .unwrap_or(&joystick.name)
            .to_owned();

        Ok(Controller {
            joystick,
            name,
            mapping,
        })
    }

    fn open_joystick(&mut self, slot: usize) -> Result<Joystick, Error> {
        let entry = self.devices.get(slot).ok_or(Error::InvalidSlot(slot))?;
        Joystick::open(&entry.devpath, entry.instance_id)
    }

    fn add_mappings_from_file(&mut self, path: &Path) -> io::Result<usize> {
        self.mappings.add_file_mappings(path)
    }
}

/// Event devices udev classifies as joysticks. Legacy `js` interfaces are left out.
fn scan_udev() -> Result<Vec<PathBuf>, Error> {
    let udev = Udev::new().ok_or(Error::UdevCtx)?;
    let en = udev.enumerate_joysticks().ok_or(Error::UdevEnumerate)?;

    let devpaths = en
        .iter()
        .filter_map(|syspath| UdevDevice::from_syspath(&udev, &syspath))
        .filter_map(|dev| {
            dev.devnode()
                .map(|node| PathBuf::from(OsStr::from_bytes(node.to_bytes())))
        })
        .filter(|devpath| {
            let event = is_event_node(devpath);
            if !event {
                trace!("Device {:?} is not an event interface, ignoring.", devpath);
            }
            event
        })
        .collect();

    Ok(devpaths)
}

fn scan_input_dir(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let mut nodes = dir
        .read_dir()
        .map_err(|e| Error::Io(e, "reading input directory"))?
        .flatten()
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            let index = name.strip_prefix("event")?.parse::<u32>().ok()?;
            Some((index, entry.path()))
        })
        .collect::<Vec<_>>();
    nodes.sort_unstable_by_key(|&(index, _)| index);

    Ok(nodes.into_iter().map(|(_, path)| path).collect())
}

fn is_event_node(devpath: &Path) -> bool {
    devpath
        .file_name()
        .and_then(OsStr::to_str)
        .map(|name| name.starts_with("event"))
        .unwrap_or(false)
}

fn probe(devpath: &Path) -> bool {
    match Joystick::open(devpath, u32::MAX) {
        Ok(joystick) if joystick.is_joystick() => true,
        Ok(_) => {
            warn!(
                "{} doesn't have at least 1 button and 2 axes, ignoring.",
                devpath.display()
            );
            false
        }
        Err(e) => {
            error!("Failed to probe {}: {}", devpath.display(), e);
            false
        }
    }
}

/// Opened event device. The file descriptor is closed on drop.
#[derive(Debug)]
pub struct Joystick {
    file: File,
    devpath: PathBuf,
    name: String,
    uuid: Uuid,
    instance_id: u32,
    axes: Vec<u16>,
    buttons: Vec<u16>,
    hats: Vec<u16>,
}

impl Joystick {
    fn open(devpath: &Path, instance_id: u32) -> Result<Self, Error> {
        let file = OpenOptions::new()
            .read(true)
            .custom_flags(c::O_NONBLOCK)
            .open(devpath)
            .map_err(|e| Error::Io(e, "opening device"))?;
        let fd = file.as_raw_fd();

        let input_id = Self::get_input_id(fd).map_err(|e| Error::Io(e, "reading device id"))?;
        let name = Self::get_name(fd).unwrap_or_else(|| {
            error!("Failed to get name of device {}", devpath.display());
            "Unknown".into()
        });

        let mut key_bits = [0u8; (KEY_MAX / 8) as usize + 1];
        let mut abs_bits = [0u8; (ABS_MAX / 8) as usize + 1];
        Self::get_bits(fd, EV_KEY, &mut key_bits);
        Self::get_bits(fd, EV_ABS, &mut abs_bits);

        let joystick = Joystick {
            file,
            devpath: devpath.to_owned(),
            name,
            uuid: create_uuid(input_id),
            instance_id,
            axes: find_axes(&abs_bits),
            buttons: find_buttons(&key_bits),
            hats: utils::set_bits(&abs_bits, ABS_HAT0X..ABS_HAT3Y + 1).collect(),
        };

        debug!(
            "Opened {} ({}): uuid: {}, axes: {:?}, buttons: {:?}",
            joystick.devpath.display(),
            joystick.name,
            joystick.uuid.simple(),
            joystick.axes,
            joystick.buttons
        );

        Ok(joystick)
    }

    fn is_joystick(&self) -> bool {
        !self.buttons.is_empty() && self.axes.len() >= 2
    }

    fn get_name(fd: RawFd) -> Option<String> {
        let mut namebuff = [0u8; 128];
        unsafe { ioctl::eviocgname(fd, &mut namebuff) }.ok()?;
        let end = namebuff
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(namebuff.len());

        Some(String::from_utf8_lossy(&namebuff[..end]).into_owned())
    }

    fn get_input_id(fd: RawFd) -> io::Result<ioctl::input_id> {
        let mut iid = MaybeUninit::<ioctl::input_id>::uninit();
        unsafe {
            ioctl::eviocgid(fd, iid.as_mut_ptr())?;
            Ok(iid.assume_init())
        }
    }

    /// Leaves `bits` zeroed if the device doesn't support `ev`.
    fn get_bits(fd: RawFd, ev: u16, bits: &mut [u8]) {
        let ret = unsafe {
            ioctl::eviocgbit(fd, u32::from(ev), bits.len() as c::c_int, bits.as_mut_ptr())
        };
        if ret < 0 {
            bits.iter_mut().for_each(|b| *b = 0);
        }
    }
}

impl backend::Device for Joystick {
    fn name(&self) -> &str {
        &self.name
    }

    fn guid(&self) -> Uuid {
        self.uuid
    }

    fn instance_id(&self) -> u32 {
        self.instance_id
    }

    fn num_axes(&self) -> usize {
        self.axes.len()
    }
}

impl Drop for Joystick {
    fn drop(&mut self) {
        trace!(
            "Closing {} (fd {})",
            self.devpath.display(),
            self.file.as_raw_fd()
        );
    }
}

/// Joystick with a known SDL mapping.
#[derive(Debug)]
pub struct Controller {
    joystick: Joystick,
    name: String,
    mapping: String,
}

impl backend::Device for Controller {
    fn name(&self) -> &str {
        &self.name
    }

    fn guid(&self) -> Uuid {
        self.joystick.uuid
    }

    fn instance_id(&self) -> u32 {
        self.joystick.instance_id
    }

    fn num_axes(&self) -> usize {
        self.joystick.axes.len()
    }
}

impl backend::Controller for Controller {
    fn mapping(&self) -> Option<&str> {
        Some(&self.mapping)
    }
}

fn find_buttons(key_bits: &[u8]) -> Vec<u16> {
    utils::set_bits(key_bits, BTN_JOYSTICK..KEY_MAX + 1)
        .chain(utils::set_bits(key_bits, BTN_MISC..BTN_MOUSE))
        .collect()
}

/// Hats are reported by SDL separately, so they are not axes.
fn find_axes(abs_bits: &[u8]) -> Vec<u16> {
    utils::set_bits(abs_bits, 0..ABS_MAX + 1)
        .filter(|code| !(ABS_HAT0X..=ABS_HAT3Y).contains(code))
        .collect()
}

/// SDL mapping for devices that follow the kernel's gamepad layout (`BTN_SOUTH`, `ABS_X`,
/// `ABS_Y`, ...), for which no mapping is known. Buttons and axes are numbered by their position
/// in `buttons` and `axes`, like SDL numbers them.
fn default_mapping(
    uuid: Uuid,
    name: &str,
    buttons: &[u16],
    axes: &[u16],
    hats: &[u16],
) -> Option<String> {
    let button = |code| buttons.iter().position(|&b| b == code);
    let axis = |code| axes.iter().position(|&a| a == code);

    button(BTN_SOUTH)?;
    axis(ABS_X)?;
    axis(ABS_Y)?;

    let mut mapping = format!("{},{},", uuid.simple(), name);
    let mut add = |element: &str, source: String| {
        mapping.push_str(element);
        mapping.push(':');
        mapping.push_str(&source);
        mapping.push(',');
    };

    for &(element, code) in &GAMEPAD_BUTTONS {
        if let Some(idx) = button(code) {
            add(element, format!("b{}", idx));
        }
    }

    for &(element, code, trigger_btn) in &GAMEPAD_AXES {
        if let Some(idx) = axis(code) {
            add(element, format!("a{}", idx));
        } else if let Some(idx) = trigger_btn.and_then(|code| button(code)) {
            add(element, format!("b{}", idx));
        }
    }

    if hats.contains(&ABS_HAT0X) && hats.contains(&ABS_HAT0Y) {
        for &(element, direction) in &GAMEPAD_HAT {
            add(element, format!("h0.{}", direction));
        }
    } else {
        for &(element, code) in &GAMEPAD_DPAD {
            if let Some(idx) = button(code) {
                add(element, format!("b{}", idx));
            }
        }
    }

    Some(mapping)
}

/// Same layout as SDL2 joystick GUID on Linux.
fn create_uuid(iid: ioctl::input_id) -> Uuid {
    let bus = (u32::from(iid.bustype)).to_be();
    let vendor = iid.vendor.to_be();
    let product = iid.product.to_be();
    let version = iid.version.to_be();
    Uuid::from_fields(
        bus,
        vendor,
        0,
        &[
            (product >> 8) as u8,
            product as u8,
            0,
            0,
            (version >> 8) as u8,
            version as u8,
            0,
            0,
        ],
    )
}

const KEY_MAX: u16 = 0x2ff;
const EV_KEY: u16 = 0x01;
const EV_ABS: u16 = 0x03;
const ABS_MAX: u16 = 0x3f;

const BTN_MISC: u16 = 0x100;
const BTN_MOUSE: u16 = 0x110;
const BTN_JOYSTICK: u16 = 0x120;

const ABS_HAT0X: u16 = 0x10;
const ABS_HAT0Y: u16 = 0x11;
const ABS_HAT3Y: u16 = 0x17;

const ABS_X: u16 = 0x00;
const ABS_Y: u16 = 0x01;
const ABS_Z: u16 = 0x02;
const ABS_RX: u16 = 0x03;
const ABS_RY: u16 = 0x04;
const ABS_RZ: u16 = 0x05;

const BTN_SOUTH: u16 = 0x130;
const BTN_EAST: u16 = 0x131;
// BTN_X and BTN_Y, SDL uses these codes for its x and y.
const BTN_NORTH: u16 = 0x133;
const BTN_WEST: u16 = 0x134;
const BTN_TL: u16 = 0x136;
const BTN_TR: u16 = 0x137;
const BTN_TL2: u16 = 0x138;
const BTN_TR2: u16 = 0x139;
const BTN_SELECT: u16 = 0x13a;
const BTN_START: u16 = 0x13b;
const BTN_MODE: u16 = 0x13c;
const BTN_THUMBL: u16 = 0x13d;
const BTN_THUMBR: u16 = 0x13e;
const BTN_DPAD_UP: u16 = 0x220;
const BTN_DPAD_DOWN: u16 = 0x221;
const BTN_DPAD_LEFT: u16 = 0x222;
const BTN_DPAD_RIGHT: u16 = 0x223;

const GAMEPAD_BUTTONS: [(&str, u16); 11] = [
    ("a", BTN_SOUTH),
    ("b", BTN_EAST),
    ("x", BTN_NORTH),
    ("y", BTN_WEST),
    ("back", BTN_SELECT),
    ("guide", BTN_MODE),
    ("start", BTN_START),
    ("leftstick", BTN_THUMBL),
    ("rightstick", BTN_THUMBR),
    ("leftshoulder", BTN_TL),
    ("rightshoulder", BTN_TR),
];

/// Triggers fall back to their digital buttons.
const GAMEPAD_AXES: [(&str, u16, Option<u16>); 6] = [
    ("leftx", ABS_X, None),
    ("lefty", ABS_Y, None),
    ("rightx", ABS_RX, None),
    ("righty", ABS_RY, None),
    ("lefttrigger", ABS_Z, Some(BTN_TL2)),
    ("righttrigger", ABS_RZ, Some(BTN_TR2)),
];

const GAMEPAD_HAT: [(&str, u8); 4] = [("dpup", 1), ("dpdown", 4), ("dpleft", 8), ("dpright", 2)];

const GAMEPAD_DPAD: [(&str, u16); 4] = [
    ("dpup", BTN_DPAD_UP),
    ("dpdown", BTN_DPAD_DOWN),
    ("dpleft", BTN_DPAD_LEFT),
    ("dpright", BTN_DPAD_RIGHT),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sdl_uuid() {
        let x = Uuid::parse_str("030000005e0400008e02000020200000").unwrap();
        let y = create_uuid(ioctl::input_id {
            bustype: 0x3,
            vendor: 0x045e,
            product: 0x028e,
            version: 0x2020,
        });
        assert_eq!(x, y);
    }

    #[test]
    fn axes_skip_hats() {
        let mut abs_bits = [0u8; (ABS_MAX / 8) as usize + 1];
        // ABS_X, ABS_Y, ABS_RX, ABS_HAT0X, ABS_HAT0Y, ABS_HAT3Y, ABS_MISC
        for &bit in &[0x00u16, 0x01, 0x03, 0x10, 0x11, 0x17, 0x28] {
            abs_bits[(bit / 8) as usize] |= 1 << (bit % 8);
        }

        assert_eq!(find_axes(&abs_bits), vec![0x00, 0x01, 0x03, 0x28]);
    }

    #[test]
    fn buttons_in_joystick_ranges() {
        let mut key_bits = [0u8; (KEY_MAX / 8) as usize + 1];
        // KEY_A, BTN_0, BTN_LEFT (mouse), BTN_TRIGGER, BTN_SOUTH, BTN_DPAD_UP
        for &bit in &[0x1eu16, 0x100, 0x110, 0x120, 0x130, 0x220] {
            key_bits[(bit / 8) as usize] |= 1 << (bit % 8);
        }

        assert_eq!(find_buttons(&key_bits), vec![0x120, 0x130, 0x220, 0x100]);
    }

    fn pad_uuid() -> Uuid {
        Uuid::parse_str("03000000ff1100004133000010010000").unwrap()
    }

    #[test]
    fn generated_mapping_for_gamepad_layout() {
        let buttons = [
            BTN_SOUTH, BTN_EAST, BTN_NORTH, BTN_WEST, BTN_TL, BTN_TR, BTN_SELECT, BTN_START,
            BTN_MODE, BTN_THUMBL, BTN_THUMBR,
        ];
        let axes = [ABS_X, ABS_Y, ABS_Z, ABS_RX, ABS_RY, ABS_RZ];
        let hats = [ABS_HAT0X, ABS_HAT0Y];

        let mapping = default_mapping(pad_uuid(), "Generic Pad", &buttons, &axes, &hats).unwrap();
        assert_eq!(
            mapping,
            "03000000ff1100004133000010010000,Generic Pad,a:b0,b:b1,x:b2,y:b3,back:b6,guide:b8,\
             start:b7,leftstick:b9,rightstick:b10,leftshoulder:b4,rightshoulder:b5,leftx:a0,\
             lefty:a1,rightx:a3,righty:a4,lefttrigger:a2,righttrigger:a5,dpup:h0.1,dpdown:h0.4,\
             dpleft:h0.8,dpright:h0.2,"
        );

        let mut db = MappingDb::new();
        assert_eq!(db.insert(&mapping), 1);
        assert_eq!(crate::mapping::mapping_name(&mapping), Some("Generic Pad"));
    }

    #[test]
    fn generated_mapping_uses_digital_fallbacks() {
        let buttons = [BTN_SOUTH, BTN_EAST, BTN_TL2, BTN_TR2, BTN_DPAD_UP, BTN_DPAD_DOWN];
        let axes = [ABS_X, ABS_Y];

        let mapping = default_mapping(pad_uuid(), "Pad", &buttons, &axes, &[]).unwrap();
        assert!(mapping.ends_with(
            ",Pad,a:b0,b:b1,leftx:a0,lefty:a1,lefttrigger:b2,righttrigger:b3,dpup:b4,dpdown:b5,"
        ));
    }

    #[test]
    fn no_generated_mapping_without_gamepad_layout() {
        // Flight stick: BTN_TRIGGER, BTN_THUMB and a throttle.
        let stick_buttons = [0x120, 0x121];
        let axes = [ABS_X, ABS_Y, ABS_Z];
        assert_eq!(default_mapping(pad_uuid(), "Stick", &stick_buttons, &axes, &[]), None);

        let no_sticks = [ABS_Z, ABS_RZ];
        assert_eq!(default_mapping(pad_uuid(), "Pad", &[BTN_SOUTH], &no_sticks, &[]), None);
    }

    #[test]
    fn input_dir_scan_is_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for name in &["event10", "event2", "js0", "mice", "eventX", "by-id"] {
            File::create(dir.path().join(name)).unwrap();
        }

        let found = scan_input_dir(dir.path()).unwrap();
        assert_eq!(
            found,
            vec![dir.path().join("event2"), dir.path().join("event10")]
        );
    }

    #[test]
    fn event_nodes() {
        assert!(is_event_node(Path::new("/dev/input/event3")));
        assert!(!is_event_node(Path::new("/dev/input/js0")));
    }

    #[test]
    fn missing_device_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        match Joystick::open(&dir.path().join("event0"), 0) {
            Err(Error::Io(e, _)) => assert_eq!(e.kind(), io::ErrorKind::NotFound),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
