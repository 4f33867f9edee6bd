//! Unbounded bidirectional tapes.
//!
//! The engine only talks to the `Tape` trait. Two representations are provided:
//! `SparseTape` keeps written cells in an ordered map, `DenseTape` keeps a contiguous
//! vector plus the logical position of its first cell. Both are total over `i64`:
//! unwritten cells read as the blank symbol and writes never fail.

use crate::types::{Symbol, MAX_WINDOW_RADIUS};
use std::collections::BTreeMap;

/// A single tape with an explicit blank fill value.
pub trait Tape {
    /// Creates an empty tape filled with `blank`.
    fn new(blank: Symbol) -> Self
    where
        Self: Sized;

    /// Returns the blank symbol of this tape.
    fn blank(&self) -> Symbol;

    /// Reads the cell at `position`. Never-written cells hold the blank.
    fn read(&self, position: i64) -> Symbol;

    /// Writes `symbol` at `position`, growing storage if needed.
    fn write(&mut self, position: i64, symbol: Symbol);

    /// Leftmost and rightmost written positions, or `None` for an untouched tape.
    fn bounds(&self) -> Option<(i64, i64)>;

    /// Renders the written span, extended to include the head and `min_radius` cells
    /// on each side of it. The radius is capped at `MAX_WINDOW_RADIUS`.
    ///
    /// Returns the rendered cells and the index of the head within them.
    fn render(&self, head: i64, min_radius: Option<usize>) -> (String, usize) {
        let radius = min_radius.map_or(0, |r| r.min(MAX_WINDOW_RADIUS) as i64);
        let (low, high) = self.bounds().unwrap_or((head, head));
        let left = low.min(head.saturating_sub(radius));
        let right = high.max(head.saturating_add(radius));

        let cells = (left..=right).map(|position| self.read(position)).collect();
        let local_head = usize::try_from(head.abs_diff(left)).unwrap_or(usize::MAX);
        (cells, local_head)
    }

    /// Returns the written span as a string.
    fn contents(&self) -> String {
        match self.bounds() {
            Some((low, high)) => (low..=high).map(|position| self.read(position)).collect(),
            None => String::new(),
        }
    }
}

/// A tape backed by an ordered map from position to symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparseTape {
    cells: BTreeMap<i64, Symbol>,
    blank: Symbol,
}

impl Tape for SparseTape {
    fn new(blank: Symbol) -> Self {
        Self {
            cells: BTreeMap::new(),
            blank,
        }
    }

    fn blank(&self) -> Symbol {
        self.blank
    }

    fn read(&self, position: i64) -> Symbol {
        self.cells.get(&position).copied().unwrap_or(self.blank)
    }

    fn write(&mut self, position: i64, symbol: Symbol) {
        self.cells.insert(position, symbol);
    }

    fn bounds(&self) -> Option<(i64, i64)> {
        let (&low, _) = self.cells.first_key_value()?;
        let (&high, _) = self.cells.last_key_value()?;
        Some((low, high))
    }
}

/// A tape backed by a growable vector.
///
/// `offset` is the logical position of `cells[0]`. Writes outside the current span pad
/// the vector with blanks, shifting `offset` when the tape grows to the left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenseTape {
    cells: Vec<Symbol>,
    offset: i64,
    blank: Symbol,
}

impl DenseTape {
    /// Maps a logical position to a vector index, if it is inside the current span.
    fn index(&self, position: i64) -> Option<usize> {
        let index = position.checked_sub(self.offset)?;
        usize::try_from(index)
            .ok()
            .filter(|&index| index < self.cells.len())
    }
}

impl Tape for DenseTape {
    fn new(blank: Symbol) -> Self {
        Self {
            cells: Vec::new(),
            offset: 0,
            blank,
        }
    }

    fn blank(&self) -> Symbol {
        self.blank
    }

    fn read(&self, position: i64) -> Symbol {
        self.index(position)
            .map_or(self.blank, |index| self.cells[index])
    }

    fn write(&mut self, position: i64, symbol: Symbol) {
        if self.cells.is_empty() {
            self.offset = position;
            self.cells.push(symbol);
            return;
        }

        if position < self.offset {
            // Extend to the left
            let mut grown = vec![self.blank; (self.offset - position) as usize];
            grown.append(&mut self.cells);
            self.cells = grown;
            self.offset = position;
        }

        let index = (position - self.offset) as usize;
        if index >= self.cells.len() {
            self.cells.resize(index + 1, self.blank);
        }
        self.cells[index] = symbol;
    }

    fn bounds(&self) -> Option<(i64, i64)> {
        if self.cells.is_empty() {
            return None;
        }
        Some((self.offset, self.offset + self.cells.len() as i64 - 1))
    }
}
