// Copyright 2020 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Provides the base data structures for Earley parse charts.
//!
//! A chart holds one bucket of parse states per input position. States are
//! kept in an arena indexed by creation order, so back pointers are plain
//! indices and merging never invalidates an existing reference.

use {
  crate::grammar::{Alternative, Sym},
  crate::utils::WasChanged,
  std::fmt::Debug,
};

/// Creation-order index of a state in a chart's arena. Doubles as the
/// state's debug id and as the identity used when merging back-pointer sets.
pub type StateId = usize;

/// Left-hand side of a dotted rule.
///
/// `Start` is the reserved augmented start nonterminal. It never occurs on
/// the right-hand side of any alternative, so it cannot collide with a
/// grammar nonterminal.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Head {
  Start,
  NonTerm(char),
}

impl Debug for Head {
  fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
    match self {
      Head::Start => fmt.write_str("<START>"),
      Head::NonTerm(ch) => write!(fmt, "<{}>", ch),
    }
  }
}

/// One dotted-rule item: a head, an alternative, the dot position within the
/// alternative, and the input position where the match began.
///
/// Structural equality is `(head, alt, dot, origin)`. Back pointers are not
/// part of the state; they live in the chart entry that owns it.
#[derive(Clone, PartialEq, Eq)]
pub struct ParseState {
  head: Head,
  alt: Alternative,
  dot: usize,
  origin: usize,
}

impl ParseState {
  /// Creates a parse state. Panics if `dot` lies outside the alternative;
  /// that is an algorithm bug, never a user-input problem.
  pub fn new(head: Head, alt: Alternative, dot: usize, origin: usize) -> Self {
    assert!(
      dot <= alt.len(),
      "malformed parse state: dot {} outside alternative of length {}",
      dot,
      alt.len()
    );
    ParseState {
      head,
      alt,
      dot,
      origin,
    }
  }

  pub fn head(&self) -> Head {
    self.head
  }

  pub fn alt(&self) -> &Alternative {
    &self.alt
  }

  pub fn dot(&self) -> usize {
    self.dot
  }

  pub fn origin(&self) -> usize {
    self.origin
  }

  pub fn is_complete(&self) -> bool {
    self.dot == self.alt.len()
  }

  /// The symbol just after the dot, or `None` when complete.
  pub fn next_sym(&self) -> Option<&Sym> {
    self.alt.sym_at(self.dot)
  }

  /// This state with the dot moved one symbol to the right.
  pub fn advanced(&self) -> ParseState {
    ParseState::new(self.head, self.alt.clone(), self.dot + 1, self.origin)
  }
}

impl Debug for ParseState {
  fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
    write!(fmt, "[{:?} ->", self.head)?;
    for (i, sym) in self.alt.syms().enumerate() {
      if i == self.dot {
        fmt.write_str(" .")?;
      }
      write!(fmt, " {:?}", sym)?;
    }
    if self.is_complete() {
      fmt.write_str(" .")?;
    }
    write!(fmt, ", @{}]", self.origin)
  }
}

struct StateEntry {
  state: ParseState,
  prev: Vec<StateId>,
}

/// The full parse chart: an arena of states plus one deduplicated bucket of
/// state ids per input position `0..=N`.
pub struct Chart {
  entries: Vec<StateEntry>,
  buckets: Vec<Vec<StateId>>,
}

impl Chart {
  /// Creates a chart for an input of `input_len` characters, with buckets
  /// for positions `0..=input_len`.
  pub fn new(input_len: usize) -> Self {
    Chart {
      entries: Vec::new(),
      buckets: vec![Vec::new(); input_len + 1],
    }
  }

  /// The number of buckets (input length plus one).
  pub fn num_positions(&self) -> usize {
    self.buckets.len()
  }

  pub fn bucket(&self, pos: usize) -> &[StateId] {
    &self.buckets[pos]
  }

  pub fn state(&self, id: StateId) -> &ParseState {
    &self.entries[id].state
  }

  /// The back pointers of the given state, in the order they were acquired.
  pub fn prev(&self, id: StateId) -> &[StateId] {
    &self.entries[id].prev
  }

  /// Linear scan of the bucket at `pos` for a structurally-equal state.
  pub fn find_equal(
    &self,
    state: &ParseState,
    pos: usize,
  ) -> Option<StateId> {
    self
      .buckets[pos]
      .iter()
      .copied()
      .find(|&id| self.entries[id].state == *state)
  }

  /// Inserts a state at `pos`, or merges its back pointers into the
  /// structurally-equal state already there. Returns whether the chart
  /// changed; this is the fixed-point driver's signal.
  ///
  /// Inserting at exactly one past the final bucket is a defined no-op:
  /// scanning at the last input character legitimately tries to extend one
  /// past the chart. Any position beyond that is a usage error.
  pub fn insert(
    &mut self,
    state: ParseState,
    prev: Vec<StateId>,
    pos: usize,
  ) -> WasChanged {
    if pos == self.buckets.len() {
      return WasChanged::Unchanged;
    }
    assert!(
      pos < self.buckets.len(),
      "chart position {} out of range (buckets 0..={})",
      pos,
      self.buckets.len()
    );

    match self.find_equal(&state, pos) {
      Some(id) => {
        // Merge collapses onto the earlier entry, keeping its id stable for
        // any back pointer already referring to it.
        let entry = &mut self.entries[id];
        let mut changed = WasChanged::Unchanged;
        for p in prev {
          if !entry.prev.contains(&p) {
            entry.prev.push(p);
            changed = WasChanged::Changed;
          }
        }
        changed
      }
      None => {
        let id = self.entries.len();
        self.entries.push(StateEntry { state, prev });
        self.buckets[pos].push(id);
        WasChanged::Changed
      }
    }
  }
}

impl Debug for Chart {
  fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
    for (pos, bucket) in self.buckets.iter().enumerate() {
      writeln!(fmt, "position {}:", pos)?;
      for &id in bucket {
        let entry = &self.entries[id];
        writeln!(fmt, "  #{} {:?} prev={:?}", id, entry.state, entry.prev)?;
      }
    }
    Ok(())
  }
}
