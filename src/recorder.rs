//! Rendering of instantaneous descriptions (IDs).
//!
//! An ID is a single line describing the current state, the memory register and the tape
//! around the head. Rendering is pure, so the same configuration always yields the same
//! line. External tools parse trace files, so the two formats below are stable:
//!
//! * `IdFormat::Labeled`: `ID: state=q0 mem_cache=_ tape=ab[c]d`
//! * `IdFormat::Tuple`: `(q0, abcd, 2)`

use crate::tape::Tape;
use crate::types::{IdFormat, EMPTY_MEMORY_GLYPH};
use serde::{Deserialize, Serialize};

/// Renders IDs in one fixed format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRecorder {
    format: IdFormat,
    radius: Option<usize>,
}

impl IdRecorder {
    /// Creates a recorder. `radius` is the number of cells always shown on each side of
    /// the head.
    pub fn new(format: IdFormat, radius: Option<usize>) -> Self {
        Self { format, radius }
    }

    pub fn format(&self) -> IdFormat {
        self.format
    }

    pub fn radius(&self) -> Option<usize> {
        self.radius
    }

    /// Renders one configuration.
    pub fn render<T: Tape>(
        &self,
        state: &str,
        tape: &T,
        head: i64,
        memory: Option<&str>,
    ) -> String {
        let (window, local_head) = tape.render(head, self.radius);

        match self.format {
            IdFormat::Tuple => format!("({state}, {window}, {local_head})"),
            IdFormat::Labeled => {
                let mut marked = String::with_capacity(window.len() + 2);
                for (i, c) in window.chars().enumerate() {
                    if i == local_head {
                        marked.push('[');
                        marked.push(c);
                        marked.push(']');
                    } else {
                        marked.push(c);
                    }
                }

                format!(
                    "ID: state={state} mem_cache={} tape={marked}",
                    memory.unwrap_or(EMPTY_MEMORY_GLYPH)
                )
            }
        }
    }
}
