// Copyright 2016-2018 Mateusz Sieczko and other GilRs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Legacy joystick device nodes (`/dev/input/jsN`).
//!
//! The kernel numbers these nodes independently of any input library, so the indices returned by
//! [`enumerate`] are only meaningful for building sysfs paths, see [`node_name`].

use crate::platform;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Directory with one entry per input device node.
pub const SYSFS_INPUT_PATH: &str = "/sys/class/input";

/// Name file could not be opened.
pub const UNAVAILABLE: &str = "(unavailable)";
/// Name file was opened but nothing could be read from it.
pub const UNKNOWN: &str = "(unknown)";

const LEGACY_PREFIX: &str = "js";

/// Indices of joystick nodes present right now, sorted ascending.
///
/// Devices using other naming schemes (e.g. `eventN`) are left out. Empty if the device registry
/// is not available.
pub fn enumerate() -> Vec<u32> {
    let indices = sorted_indices(platform::joystick_sysnames());
    debug!("Legacy joystick nodes: {:?}", indices);

    indices
}

/// Index of a legacy node name: `js3` is 3. Anything else is `None`.
pub fn legacy_index(sysname: &str) -> Option<u32> {
    let digits = sysname.strip_prefix(LEGACY_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    digits.parse().ok()
}

/// Keeps legacy node names and returns their indices sorted ascending. Duplicates are kept.
pub fn sorted_indices<I, S>(sysnames: I) -> Vec<u32>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut indices = sysnames
        .into_iter()
        .filter_map(|name| legacy_index(name.as_ref()))
        .collect::<Vec<_>>();
    indices.sort_unstable();

    indices
}

/// Human-readable name of node `jsN`, read from sysfs. Never fails, see [`node_name_in`].
pub fn node_name(index: u32) -> String {
    node_name_in(Path::new(SYSFS_INPUT_PATH), index)
}

/// Reads first line of `<root>/js<index>/device/name`.
///
/// Returns [`UNAVAILABLE`] if the file can't be opened (device removed or never existed) and
/// [`UNKNOWN`] if nothing can be read from it.
pub fn node_name_in(root: &Path, index: u32) -> String {
    let path = root
        .join(format!("{}{}", LEGACY_PREFIX, index))
        .join("device")
        .join("name");

    let file = match File::open(&path) {
        Ok(file) => file,
        Err(e) => {
            debug!("Can't open {}: {}", path.display(), e);
            return UNAVAILABLE.to_owned();
        }
    };

    let mut line = Vec::new();
    match BufReader::new(file).read_until(b'\n', &mut line) {
        Ok(0) => UNKNOWN.to_owned(),
        Ok(_) => String::from_utf8_lossy(&line)
            .trim_end_matches(['\n', '\r'])
            .to_owned(),
        Err(e) => {
            debug!("Can't read {}: {}", path.display(), e);
            UNKNOWN.to_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_name(root: &Path, index: u32, content: &[u8]) {
        let dir = root.join(format!("js{}", index)).join("device");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("name"), content).unwrap();
    }

    #[test]
    fn legacy_names() {
        assert_eq!(legacy_index("js0"), Some(0));
        assert_eq!(legacy_index("js12"), Some(12));
        assert_eq!(legacy_index("event3"), None);
        assert_eq!(legacy_index("js"), None);
        assert_eq!(legacy_index("jsx1"), None);
        assert_eq!(legacy_index("js-1"), None);
        assert_eq!(legacy_index("js+1"), None);
        assert_eq!(legacy_index("mouse0"), None);
    }

    #[test]
    fn indices_sorted() {
        assert_eq!(sorted_indices(["js3", "js0", "js7", "js1"]), vec![0, 1, 3, 7]);
    }

    #[test]
    fn non_legacy_names_excluded() {
        let names = vec!["event12", "js10", "js2", "event3", "js2"];
        assert_eq!(sorted_indices(names), vec![2, 2, 10]);
    }

    #[test]
    fn nothing_found() {
        assert!(sorted_indices(Vec::<String>::new()).is_empty());
        assert!(sorted_indices(["event0", "event1"]).is_empty());
    }

    #[test]
    fn sorted_for_any_order() {
        let names = ["js9", "js4", "js11", "js0", "js4", "js5"];
        let indices = sorted_indices(names);
        assert!(indices.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(indices.len(), names.len());
    }

    #[test]
    fn name_from_sysfs() {
        let root = tempfile::tempdir().unwrap();
        write_name(root.path(), 0, b"Microsoft X-Box 360 pad\n");
        write_name(root.path(), 1, b"No newline");
        write_name(root.path(), 2, b"First\nSecond\n");

        assert_eq!(node_name_in(root.path(), 0), "Microsoft X-Box 360 pad");
        assert_eq!(node_name_in(root.path(), 1), "No newline");
        assert_eq!(node_name_in(root.path(), 2), "First");
    }

    #[test]
    fn name_sentinels() {
        let root = tempfile::tempdir().unwrap();
        write_name(root.path(), 4, b"");

        assert_eq!(node_name_in(root.path(), 3), UNAVAILABLE);
        assert_eq!(node_name_in(root.path(), 4), UNKNOWN);
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let root = tempfile::tempdir().unwrap();
        write_name(root.path(), 5, &[b'P', b'a', b'd', 0xff, b'\n']);

        assert_eq!(node_name_in(root.path(), 5), "Pad\u{fffd}");
    }

    #[test]
    #[cfg(unix)]
    fn unreadable_name_is_unknown() {
        let root = tempfile::tempdir().unwrap();
        // Opening a directory works, reading from it doesn't.
        fs::create_dir_all(root.path().join("js6").join("device").join("name")).unwrap();

        assert_eq!(node_name_in(root.path(), 6), UNKNOWN);
    }
}
