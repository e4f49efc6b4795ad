// Copyright 2016-2018 Mateusz Sieczko and other GilRs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! SDL-compatible game controller mapping database.
//!
//! A device is reported as a game controller only if its GUID has an entry here. Entries come
//! from the built-in table, the `SDL_GAMECONTROLLERCONFIG` environment variable (which Steam
//! sets) and, optionally, a mapping file such as `gamecontrollerdb.txt`.

mod parser;

pub use self::parser::{Error as ParseError, ErrorKind as ParseErrorKind, Parser, Source, Token};

use crate::config::Config;
use crate::platform;

use fnv::FnvHashMap;
use uuid::Uuid;

use std::fs;
use std::io;
use std::path::Path;

#[derive(Debug, Default)]
pub struct MappingDb {
    mappings: FnvHashMap<Uuid, String>,
}

impl MappingDb {
    pub fn new() -> Self {
        MappingDb {
            mappings: FnvHashMap::default(),
        }
    }

    pub fn add_included_mappings(&mut self) -> usize {
        self.insert(include_str!("gamecontrollerdb.txt"))
    }

    pub fn add_env_mappings(&mut self, config: &Config) -> usize {
        config.mappings().map(|s| self.insert(s)).unwrap_or(0)
    }

    /// Loads every valid mapping from file. Returns number of mappings added.
    pub fn add_file_mappings(&mut self, path: &Path) -> io::Result<usize> {
        let data = fs::read_to_string(path)?;
        let added = self.insert(&data);
        debug!("Loaded {} mappings from {}", added, path.display());

        Ok(added)
    }

    /// Inserts mappings, one per line. Invalid lines and lines for other platforms are skipped.
    /// A later mapping for the same GUID replaces the earlier one.
    pub fn insert(&mut self, s: &str) -> usize {
        let mut added = 0;

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match validate(line) {
                Ok(uuid) => {
                    self.mappings.insert(uuid, line.to_owned());
                    added += 1;
                }
                Err(reason) => trace!("Skipping mapping {:?}: {}", line, reason),
            }
        }

        added
    }

    /// Returns mapping for exact GUID or, failing that, for the same device with any version.
    pub fn get(&self, uuid: Uuid) -> Option<&str> {
        self.mappings
            .get(&uuid)
            .or_else(|| self.mappings.get(&without_version(uuid)))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

/// Name field of a mapping line.
pub fn mapping_name(mapping: &str) -> Option<&str> {
    let mut parser = Parser::new(mapping);
    match (parser.next_token(), parser.next_token()) {
        (Some(Ok(Token::Uuid(_))), Some(Ok(Token::Name(name)))) => Some(name),
        _ => None,
    }
}

/// Only a broken GUID or a mapping for another platform rejects the line. Bindings this parser
/// doesn't understand are left to whoever reads the mapping string.
fn validate(line: &str) -> Result<Uuid, String> {
    let mut parser = Parser::new(line);
    let mut uuid = None;

    while let Some(token) = parser.next_token() {
        match token {
            Ok(Token::Uuid(u)) => uuid = Some(u),
            Ok(Token::Platform(name)) if name != platform::NAME => {
                return Err(format!("platform {} is not {}", name, platform::NAME));
            }
            Ok(_) => (),
            Err(e) => match e.kind() {
                ParseErrorKind::InvalidGuid
                | ParseErrorKind::UnexpectedEnd
                | ParseErrorKind::InvalidParserState => return Err(e.to_string()),
                _ => trace!("Ignoring field of mapping {:?}: {}", line, e),
            },
        }
    }

    uuid.ok_or_else(|| "missing GUID".to_owned())
}

/// SDL GUIDs keep the device version in bytes 12-13.
fn without_version(uuid: Uuid) -> Uuid {
    let mut bytes = *uuid.as_bytes();
    bytes[12] = 0;
    bytes[13] = 0;
    Uuid::from_bytes(bytes)
}
