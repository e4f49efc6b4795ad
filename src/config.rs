// Copyright 2016-2018 Mateusz Sieczko and other GilRs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Command line and environment configuration.

use crate::report::Mode;

use std::env;
use std::path::{Path, PathBuf};

/// File with additional SDL mappings, loaded after the subsystem is initialized.
pub const MAPPING_FILE_VAR: &str = "SDL_GAMECONTROLLERCONFIG_FILE";
/// Inline SDL mappings, one per line.
pub const MAPPING_VAR: &str = "SDL_GAMECONTROLLERCONFIG";
/// Discover devices by listing `/dev/input` instead of asking udev.
pub const DISABLE_UDEV_VAR: &str = "GAMEPAD_INFO_DISABLE_UDEV";

const VERBOSE_FLAGS: [&str; 6] = ["-more", "--more", "-m", "-v", "-verbose", "--verbose"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    verbose: bool,
    mapping_file: Option<PathBuf>,
    mappings: Option<String>,
    disable_udev: bool,
}

impl Config {
    /// Reads arguments (without program name) and the process environment.
    pub fn from_env<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self::new(args, |key| env::var(key).ok())
    }

    /// Only the first argument is examined; unknown arguments are ignored.
    pub fn new<I, F>(args: I, var: F) -> Self
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let verbose = args
            .into_iter()
            .next()
            .map(|arg| VERBOSE_FLAGS.contains(&arg.as_str()))
            .unwrap_or(false);

        Config {
            verbose,
            mapping_file: var(MAPPING_FILE_VAR)
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
            mappings: var(MAPPING_VAR),
            disable_udev: var(DISABLE_UDEV_VAR).is_some(),
        }
    }

    pub fn mode(&self) -> Mode {
        if self.verbose {
            Mode::Verbose
        } else {
            Mode::Compact
        }
    }

    pub fn mapping_file(&self) -> Option<&Path> {
        self.mapping_file.as_deref()
    }

    pub fn mappings(&self) -> Option<&str> {
        self.mappings.as_deref()
    }

    pub fn disable_udev(&self) -> bool {
        self.disable_udev
    }
}
