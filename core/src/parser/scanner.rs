//! Per-entry scanner
//!
//! Classifies the characters of one comma-free entry and records where its
//! offset and name live. A fresh `EntryFields` is built for every entry.

use crate::disk::PartName;
use crate::error::{EnvPartError, Result};

/// Region of the entry the scanner is in
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum State {
    Size,
    Offset,
    Name,
    /// Past the closing bracket
    Tail,
}

/// Structural positions inside one entry
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EntryFields<'a> {
    pub number: u32,
    /// Whole entry; the size token starts at its first character
    pub text: &'a str,
    /// Everything after the `@`, if present
    pub offset: Option<&'a str>,
    open: Option<usize>,
    close: Option<usize>,
}

impl<'a> EntryFields<'a> {
    /// Scan `text`, failing on repeated `@`, `(` or `)`.
    ///
    /// `@` inside a bracketed name belongs to the name.
    pub fn scan(text: &'a str, number: u32) -> Result<Self> {
        let mut fields = Self {
            number,
            text,
            offset: None,
            open: None,
            close: None,
        };

        let mut state = State::Size;
        for (pos, byte) in text.bytes().enumerate() {
            state = match (state, byte) {
                (State::Name, b')') => {
                    record(&mut fields.close, pos, number, ')')?;
                    State::Tail
                }
                (State::Name, b'(') => {
                    record(&mut fields.open, pos, number, '(')?;
                    State::Name
                }
                (State::Name, _) => State::Name,
                (_, b'(') => {
                    record(&mut fields.open, pos, number, '(')?;
                    State::Name
                }
                (current, b')') => {
                    record(&mut fields.close, pos, number, ')')?;
                    current
                }
                (_, b'@') => {
                    if fields.offset.is_some() {
                        return Err(EnvPartError::DuplicateOffset { entry: number });
                    }
                    fields.offset = Some(&text[pos + 1..]);
                    State::Offset
                }
                (current, _) => current,
            };
        }

        Ok(fields)
    }

    /// Brackets must come as one `(` followed later by one `)`, or not at all.
    pub fn check_brackets(&self) -> Result<()> {
        match (self.open, self.close) {
            (None, None) => Ok(()),
            (Some(open), Some(close)) if close > open => Ok(()),
            _ => Err(EnvPartError::UnpairedBracket { entry: self.number }),
        }
    }

    /// Text strictly between the brackets, or empty without brackets
    pub fn name(&self) -> Result<PartName> {
        self.check_brackets()?;
        match (self.open, self.close) {
            (Some(open), Some(close)) => PartName::new(&self.text[open + 1..close])
                .ok_or(EnvPartError::NameTooLong { entry: self.number }),
            _ => Ok(PartName::empty()),
        }
    }
}

fn record(slot: &mut Option<usize>, pos: usize, entry: u32, bracket: char) -> Result<()> {
    if slot.is_some() {
        return Err(EnvPartError::DuplicateBracket { entry, bracket });
    }
    *slot = Some(pos);
    Ok(())
}
