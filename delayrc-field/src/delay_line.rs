// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Fixed-length delay line backed by a ring buffer.
//!
//! `head` always indexes the oldest stored state. `push_evict` overwrites
//! that slot with the newest state and advances `head`, so reading the
//! oldest value and replacing it is a single O(1) operation and the length
//! never changes.

use crate::state::NodeState;

/// History of the most recent `len` node states, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct DelayLine<S: NodeState> {
    buffer: Vec<S>,
    head: usize,
}

impl<S: NodeState> DelayLine<S> {
    /// Delay line of `len` copies of `value`. `len` must be at least 1.
    pub fn filled(len: usize, value: S) -> Self {
        assert!(len > 0, "Delay line needs at least one slot");
        Self {
            buffer: vec![value; len],
            head: 0,
        }
    }

    /// Delay line built from `values`, interpreted oldest first.
    pub fn from_history(values: Vec<S>) -> Self {
        assert!(!values.is_empty(), "Delay line needs at least one slot");
        Self {
            buffer: values,
            head: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// The oldest stored state (`z(t - delay)`).
    pub fn oldest(&self) -> S {
        self.buffer[self.head]
    }

    /// The most recently pushed state.
    pub fn newest(&self) -> S {
        let n = self.buffer.len();
        self.buffer[(self.head + n - 1) % n]
    }

    /// Append `value` as the newest state and return the evicted oldest one.
    pub fn push_evict(&mut self, value: S) -> S {
        let evicted = std::mem::replace(&mut self.buffer[self.head], value);
        self.head = (self.head + 1) % self.buffer.len();
        evicted
    }

    /// Overwrite every slot with `value`, keeping the length.
    pub fn fill(&mut self, value: S) {
        self.buffer.iter_mut().for_each(|slot| *slot = value);
        self.head = 0;
    }

    /// Iterate oldest first.
    pub fn iter(&self) -> impl Iterator<Item = S> + '_ {
        let (newer, older) = self.buffer.split_at(self.head);
        older.iter().chain(newer.iter()).copied()
    }

    /// Copy out the contents, oldest first.
    pub fn to_vec(&self) -> Vec<S> {
        self.iter().collect()
    }
}
