// SPDX-License-Identifier: MIT
//
// In-memory command history.
//
// Walking back from the line being typed stashes it, so walking forward
// past the newest entry gives it back. Blank lines and immediate repeats
// are not recorded.

use n_line::{Direction, HistorySource};

/// Entries kept before the oldest is dropped.
const MAX_ENTRIES: usize = 500;

#[derive(Debug, Default)]
pub struct MemoryHistory {
    /// Oldest first.
    entries: Vec<String>,
    /// Index of the entry on screen; `entries.len()` means the live line.
    position: usize,
    /// The live line, while walking.
    stash: Option<String>,
}

impl MemoryHistory {
    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }
}

impl HistorySource for MemoryHistory {
    fn recall(&mut self, direction: Direction, current: &str) -> Option<String> {
        match direction {
            Direction::Older => {
                if self.position == 0 {
                    return None;
                }
                if self.position == self.entries.len() {
                    self.stash = Some(current.to_string());
                }
                self.position -= 1;
                Some(self.entries[self.position].clone())
            }
            Direction::Newer => {
                if self.position >= self.entries.len() {
                    return None;
                }
                self.position += 1;
                if self.position == self.entries.len() {
                    Some(self.stash.take().unwrap_or_default())
                } else {
                    Some(self.entries[self.position].clone())
                }
            }
        }
    }

    fn begin_line(&mut self) {
        self.position = self.entries.len();
        self.stash = None;
    }

    fn add(&mut self, line: &str) {
        if line.trim().is_empty() || self.entries.last().is_some_and(|last| last == line) {
            return;
        }
        self.entries.push(line.to_string());
        if self.entries.len() > MAX_ENTRIES {
            self.entries.remove(0);
        }
        self.position = self.entries.len();
    }
}
