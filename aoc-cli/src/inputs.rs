//! Puzzle input lookup on the local filesystem

use crate::error::InputError;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Input supplied directly for one puzzle, bypassing the input directory
#[derive(Debug, Clone)]
struct ExplicitInput {
    year: u16,
    day: u8,
    text: String,
}

/// File-based store of puzzle inputs
///
/// Directory structure: `{input_dir}/{year}_day{day:02}.txt`
#[derive(Debug, Clone)]
pub struct InputStore {
    input_dir: PathBuf,
    explicit: Option<ExplicitInput>,
}

impl InputStore {
    /// Create a store reading from `input_dir`
    pub fn new(input_dir: PathBuf) -> Self {
        Self {
            input_dir,
            explicit: None,
        }
    }

    /// Serve `text` for `year`/`day` instead of the file in the input directory
    pub fn with_explicit(mut self, year: u16, day: u8, text: String) -> Self {
        self.explicit = Some(ExplicitInput { year, day, text });
        self
    }

    /// Get the input path for a specific year/day
    pub fn input_path(&self, year: u16, day: u8) -> PathBuf {
        self.input_dir.join(format!("{}_day{:02}.txt", year, day))
    }

    fn explicit_for(&self, year: u16, day: u8) -> Option<&str> {
        self.explicit
            .as_ref()
            .filter(|e| e.year == year && e.day == day)
            .map(|e| e.text.as_str())
    }

    /// Check if input is available
    pub fn contains(&self, year: u16, day: u8) -> bool {
        self.explicit_for(year, day).is_some() || self.input_path(year, day).is_file()
    }

    /// Load the input for a puzzle
    pub fn get(&self, year: u16, day: u8) -> Result<String, InputError> {
        if let Some(text) = self.explicit_for(year, day) {
            return Ok(text.to_string());
        }

        let path = self.input_path(year, day);
        fs::read_to_string(&path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => InputError::Missing { path },
            _ => InputError::Io { path, source },
        })
    }
}
