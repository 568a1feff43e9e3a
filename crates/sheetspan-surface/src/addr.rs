//! Cell address parsing and formatting.
//!
//! Provides bidirectional conversion between spreadsheet-style A1 references
//! (e.g., "A1", "$B$2", "AA100") and 1-based row/column coordinates, plus the
//! address expressions a surface accepts when asked for a rectangle.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, SurfaceError};

/// Largest row a surface will address (Excel-compatible bound).
pub const MAX_ROWS: i64 = 1_048_576;
/// Largest column a surface will address (Excel-compatible bound).
pub const MAX_COLS: i64 = 16_384;

/// A single cell coordinate. Rows and columns are 1-based: `A1` is
/// `CellAddr { row: 1, col: 1 }`.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CellAddr {
    pub row: i64,
    pub col: i64,
}

impl CellAddr {
    pub fn new(row: i64, col: i64) -> CellAddr {
        CellAddr { row, col }
    }

    /// Parse an A1-style reference. Accepts lowercase letters and optional
    /// `$` markers. Returns None if the input is not a single-cell reference.
    pub fn from_a1(name: &str) -> Option<CellAddr> {
        let re = Regex::new(r"^\$?(?<letters>[A-Za-z]+)\$?(?<numbers>[0-9]+)$").unwrap();
        let caps = re.captures(name.trim())?;

        let col = letters_to_col(&caps["letters"])?;
        let row = caps["numbers"].parse::<i64>().ok()?;
        if row < 1 || row > MAX_ROWS || col > MAX_COLS {
            return None;
        }

        Some(CellAddr::new(row, col))
    }

    /// Format as A1 notation (e.g. `B3`).
    pub fn to_a1(self) -> String {
        format!("{}{}", col_to_letters(self.col), self.row)
    }
}

impl std::str::FromStr for CellAddr {
    type Err = SurfaceError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_a1(s).ok_or_else(|| SurfaceError::InvalidAddress(s.to_string()))
    }
}

impl fmt::Display for CellAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1())
    }
}

/// Convert a 1-based column number to letters (1 -> A, 26 -> Z, 27 -> AA).
/// Columns below 1 yield the empty string.
pub fn col_to_letters(col: i64) -> String {
    let mut result = String::new();
    let mut n = col;
    while n > 0 {
        n -= 1;
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        n /= 26;
    }
    result
}

/// Convert column letters to a 1-based column number (A -> 1, AA -> 27).
/// Returns None for empty or non-alphabetic input.
pub fn letters_to_col(letters: &str) -> Option<i64> {
    if letters.is_empty() || !letters.bytes().all(|b| b.is_ascii_alphabetic()) {
        return None;
    }
    Some(
        letters
            .to_ascii_uppercase()
            .bytes()
            .fold(0i64, |acc, c| acc * 26 + (c - b'A') as i64 + 1),
    )
}

/// An address expression handed to a surface when asking for a rectangle.
///
/// Mirrors what grid applications accept: a structured cell, a raw A1 string
/// (single cell, `A1:B2` span, whole-column `A:C`, whole-row `3:7`), or an
/// explicit whole-row/whole-column span.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddrSpec {
    Cell(CellAddr),
    A1(String),
    Rows(i64, i64),
    Cols(i64, i64),
}

impl From<CellAddr> for AddrSpec {
    fn from(addr: CellAddr) -> AddrSpec {
        AddrSpec::Cell(addr)
    }
}

impl From<(i64, i64)> for AddrSpec {
    fn from((row, col): (i64, i64)) -> AddrSpec {
        AddrSpec::Cell(CellAddr::new(row, col))
    }
}

impl From<&str> for AddrSpec {
    fn from(s: &str) -> AddrSpec {
        AddrSpec::A1(s.to_string())
    }
}

impl From<String> for AddrSpec {
    fn from(s: String) -> AddrSpec {
        AddrSpec::A1(s)
    }
}

/// A parsed span expression, normalized so starts never exceed ends.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SpanSpec {
    Cells(CellAddr, CellAddr),
    Rows(i64, i64),
    Cols(i64, i64),
}

/// Parse a raw span string: `B3`, `A1:C5`, `A:C` or `3:7`.
pub fn parse_span(s: &str) -> Result<SpanSpec> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(SurfaceError::InvalidAddress(s.to_string()));
    }

    let Some((first, second)) = trimmed.split_once(':') else {
        let cell = CellAddr::from_a1(trimmed)
            .ok_or_else(|| SurfaceError::InvalidAddress(s.to_string()))?;
        return Ok(SpanSpec::Cells(cell, cell));
    };

    if let (Some(a), Some(b)) = (CellAddr::from_a1(first), CellAddr::from_a1(second)) {
        return Ok(SpanSpec::Cells(
            CellAddr::new(a.row.min(b.row), a.col.min(b.col)),
            CellAddr::new(a.row.max(b.row), a.col.max(b.col)),
        ));
    }

    if let (Some(a), Some(b)) = (letters_to_col(first.trim()), letters_to_col(second.trim())) {
        return Ok(SpanSpec::Cols(a.min(b), a.max(b)));
    }

    if let (Ok(a), Ok(b)) = (first.trim().parse::<i64>(), second.trim().parse::<i64>()) {
        if a >= 1 && b >= 1 {
            return Ok(SpanSpec::Rows(a.min(b), a.max(b)));
        }
    }

    Err(SurfaceError::InvalidAddress(s.to_string()))
}
