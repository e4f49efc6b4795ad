// Copyright 2016-2018 Mateusz Sieczko and other GilRs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Tokenizer for SDL game controller mapping lines.

use std::error::Error as StdError;
use std::fmt::{self, Display};

use uuid::Uuid;

// Must be sorted!
static ELEMENTS_SDL: [&str; 36] = [
    "a",
    "b",
    "back",
    "c",
    "dpdown",
    "dpleft",
    "dpright",
    "dpup",
    "guide",
    "leftshoulder",
    "leftstick",
    "lefttrigger",
    "leftx",
    "lefty",
    "leftz",
    "misc1",
    "misc2",
    "misc3",
    "misc4",
    "misc5",
    "misc6",
    "paddle1",
    "paddle2",
    "paddle3",
    "paddle4",
    "rightshoulder",
    "rightstick",
    "righttrigger",
    "rightx",
    "righty",
    "rightz",
    "start",
    "touchpad",
    "x",
    "y",
    "z",
];

/// Keys that carry metadata about the mapping instead of binding an element.
const NON_ELEMENT_KEYS: [&str; 4] = ["crc", "hint", "sdk<=", "sdk>="];

pub struct Parser<'a> {
    data: &'a str,
    pos: usize,
    state: State,
}

impl<'a> Parser<'a> {
    pub fn new(mapping: &'a str) -> Self {
        Parser {
            data: mapping,
            pos: 0,
            state: State::Uuid,
        }
    }

    pub fn next_token(&mut self) -> Option<Result<Token<'a>, Error>> {
        if self.pos >= self.data.len() {
            None
        } else {
            Some(match self.state {
                State::Uuid => self.parse_uuid(),
                State::Name => self.parse_name(),
                State::KeyVal => self.parse_key_val(),
                State::Invalid => Err(Error::new(ErrorKind::InvalidParserState, self.pos)),
            })
        }
    }

    fn parse_uuid(&mut self) -> Result<Token<'a>, Error> {
        let next_comma = self.next_comma_or_end();
        let uuid_field = &self.data[self.pos..next_comma];
        let uuid = if uuid_field == "xinput" {
            Ok(Token::Uuid(Uuid::nil()))
        } else {
            Uuid::parse_str(uuid_field)
                .map(Token::Uuid)
                .map_err(|_| Error::new(ErrorKind::InvalidGuid, self.pos))
        };

        if uuid.is_err() {
            self.state = State::Invalid;
        } else if next_comma == self.data.len() {
            self.state = State::Invalid;

            return Err(Error::new(ErrorKind::UnexpectedEnd, self.pos));
        } else {
            self.state = State::Name;
            self.pos = next_comma + 1;
        }

        uuid
    }

    fn parse_name(&mut self) -> Result<Token<'a>, Error> {
        let next_comma = self.next_comma_or_end();
        let name = &self.data[self.pos..next_comma];

        self.state = State::KeyVal;
        self.pos = next_comma + 1;

        Ok(Token::Name(name))
    }

    fn parse_key_val(&mut self) -> Result<Token<'a>, Error> {
        let data = self.data;
        let next_comma = self.next_comma_or_end();
        let pair = &data[self.pos..next_comma];
        let pos = self.pos;
        self.pos = next_comma + 1;

        // Hint values contain their own `:`, e.g. `hint:!SDL_GAMECONTROLLER_USE_BUTTON_LABELS:=1`.
        let (key, value) = pair
            .split_once(':')
            .ok_or_else(|| Error::new(ErrorKind::InvalidKeyValPair, pos))?;

        if value.is_empty() {
            return Err(Error::new(ErrorKind::EmptyValue, pos));
        }

        if key == "platform" {
            return Ok(Token::Platform(value));
        }

        if NON_ELEMENT_KEYS.contains(&key) {
            return Ok(Token::Extra { key, value });
        }

        let element = match key.get(0..1) {
            Some("+") | Some("-") => &key[1..],
            _ => key,
        };
        if ELEMENTS_SDL.binary_search(&element).is_err() {
            return Err(Error::new(ErrorKind::UnknownElement, pos));
        }

        let source = Self::parse_source(value, pos)?;

        Ok(Token::Element {
            name: element,
            source,
        })
    }

    fn parse_source(value: &str, pos: usize) -> Result<Source, Error> {
        let invalid = || Error::new(ErrorKind::InvalidValue, pos);

        let (value, inverted) = match value.strip_suffix('~') {
            Some(stripped) => (stripped, true),
            None => (value, false),
        };

        let axis = match value.get(0..1) {
            Some("+") | Some("-") => value.get(1..),
            _ => Some(value),
        };

        match axis.and_then(|v| v.get(0..1)) {
            Some("a") => axis
                .and_then(|v| v[1..].parse().ok())
                .map(|index| Source::Axis { index, inverted })
                .ok_or_else(invalid),
            Some("b") if !inverted && axis == Some(value) => value[1..]
                .parse()
                .map(Source::Button)
                .map_err(|_| invalid()),
            Some("h") if !inverted && axis == Some(value) => {
                let dot_idx = value.find('.').ok_or_else(invalid)?;
                let hat = value[1..dot_idx]
                    .parse()
                    .map_err(|_| Error::new(ErrorKind::InvalidValue, pos + 1))?;
                let direction = value
                    .get((dot_idx + 1)..)
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| Error::new(ErrorKind::InvalidValue, pos + dot_idx + 1))?;

                Ok(Source::Hat { hat, direction })
            }
            _ => Err(invalid()),
        }
    }

    fn next_comma_or_end(&self) -> usize {
        self.data[self.pos..]
            .find(',')
            .map(|x| x + self.pos)
            .unwrap_or(self.data.len())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Token<'a> {
    Uuid(Uuid),
    Platform(&'a str),
    Name(&'a str),
    Element { name: &'a str, source: Source },
    Extra { key: &'a str, value: &'a str },
}

/// Physical input an SDL element is bound to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Source {
    Button(u16),
    Axis { index: u16, inverted: bool },
    Hat { hat: u16, direction: u16 },
}

#[derive(Copy, Clone, Eq, PartialEq)]
enum State {
    Uuid,
    Name,
    KeyVal,
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    pub(crate) position: usize,
    kind: ErrorKind,
}

impl Error {
    pub fn new(kind: ErrorKind, position: usize) -> Self {
        Error { position, kind }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidGuid,
    InvalidKeyValPair,
    InvalidValue,
    EmptyValue,
    UnknownElement,
    InvalidParserState,
    UnexpectedEnd,
}

impl StdError for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self.kind {
            ErrorKind::InvalidGuid => "GUID is invalid",
            ErrorKind::InvalidKeyValPair => "expected key value pair",
            ErrorKind::InvalidValue => "value is not valid",
            ErrorKind::EmptyValue => "value is empty",
            ErrorKind::UnknownElement => "invalid button or axis name",
            ErrorKind::InvalidParserState => "attempt to parse after unrecoverable error",
            ErrorKind::UnexpectedEnd => "mapping does not have all required fields",
        };

        f.write_fmt(format_args!("{} at {}", s, self.position))
    }
}
