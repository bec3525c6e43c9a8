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

//! The Earley recognizer: prediction, completion and scanning driven to a
//! fixed point over each chart bucket in turn.
//!
//! Buckets are closed by re-reading the live, possibly-growing bucket rather
//! than a snapshot, because prediction and completion both add states to the
//! bucket currently being processed. Deduplication by `(head, alt, dot,
//! origin)` bounds each bucket by the grammar's finite item space, so the
//! closure terminates even for left-recursive or epsilon-cycling grammars.

use {
  crate::grammar::{Alternative, Grammar, Sym},
  crate::parser::chart::{Chart, Head, ParseState, StateId},
  crate::utils::{change_iter, change_loop, WasChanged},
};

pub(crate) struct ParserImpl<'a> {
  grammar: &'a Grammar,
  input: Vec<char>,
  chart: Chart,
}

impl<'a> ParserImpl<'a> {
  /// Builds a fresh chart for `input` and seeds position 0 with the
  /// augmented start item `<START> -> . <start_nt>`.
  pub fn new(grammar: &'a Grammar, input: &str) -> Self {
    let input: Vec<char> = input.chars().collect();
    let mut chart = Chart::new(input.len());

    let seed_alt: Alternative =
      std::iter::once(Sym::NonTerm(grammar.start_nt())).collect();
    chart.insert(ParseState::new(Head::Start, seed_alt, 0, 0), Vec::new(), 0);

    ParserImpl {
      grammar,
      input,
      chart,
    }
  }

  /// Runs the recognizer. Returns the finished chart and, if the input
  /// matched, the id of the complete augmented-start state in the final
  /// bucket.
  pub fn run(mut self) -> (Chart, Option<StateId>) {
    for pos in 0..self.chart.num_positions() {
      self.close_bucket(pos);
      self.scan(pos);
    }

    let last = self.chart.num_positions() - 1;
    let matched = self.chart.bucket(last).iter().copied().find(|&id| {
      let state = self.chart.state(id);
      state.head() == Head::Start && state.is_complete()
    });

    log::debug!(
      "earley recognizer finished: {} positions, matched = {:?}",
      self.chart.num_positions(),
      matched
    );
    (self.chart, matched)
  }

  fn close_bucket(&mut self, pos: usize) {
    change_loop(|| self.close_pass(pos));
  }

  fn close_pass(&mut self, pos: usize) -> WasChanged {
    let mut changed = WasChanged::Unchanged;
    let mut idx = 0;
    while idx < self.chart.bucket(pos).len() {
      let id = self.chart.bucket(pos)[idx];
      changed.merge(self.predict(id, pos));
      changed.merge(self.complete(id, pos));
      idx += 1;
    }
    changed
  }

  /// Prediction: for a state whose next symbol is a nonterminal, add every
  /// alternative of that nonterminal's production at the current position.
  fn predict(&mut self, id: StateId, pos: usize) -> WasChanged {
    let nt = match self.chart.state(id).next_sym() {
      Some(Sym::NonTerm(nt)) => *nt,
      _ => return WasChanged::Unchanged,
    };

    // Validated grammars have a rule for every referenced nonterminal.
    let rule = self.grammar.get_rule(nt);

    change_iter(rule.alts().iter(), |alt| {
      let state = ParseState::new(Head::NonTerm(nt), alt.clone(), 0, pos);
      self.chart.insert(state, vec![id], pos)
    })
  }

  /// Completion: for a complete state, advance every state at its origin
  /// that is waiting on its head. Re-insertion of an equal advanced state
  /// merges back pointers instead of duplicating, which is how converging
  /// derivations of the same span are represented.
  fn complete(&mut self, id: StateId, pos: usize) -> WasChanged {
    let state = self.chart.state(id);
    if !state.is_complete() {
      return WasChanged::Unchanged;
    }
    let head = match state.head() {
      Head::NonTerm(ch) => ch,
      // Nothing ever waits on the augmented start symbol.
      Head::Start => return WasChanged::Unchanged,
    };
    let origin = state.origin();
    log::trace!("completing {:?}", state);

    let advanced: Vec<ParseState> = self
      .chart
      .bucket(origin)
      .iter()
      .map(|&tid| self.chart.state(tid))
      .filter(|t| t.next_sym() == Some(&Sym::NonTerm(head)))
      .map(|t| t.advanced())
      .collect();

    change_iter(advanced.into_iter(), |st| {
      self.chart.insert(st, vec![id], pos)
    })
  }

  /// Scanning: after the bucket at `pos` has closed, advance every state
  /// whose next symbol is the terminal at `pos` into the next bucket.
  fn scan(&mut self, pos: usize) {
    let ch = match self.input.get(pos) {
      Some(&ch) => ch,
      None => return,
    };

    let ids: Vec<StateId> = self.chart.bucket(pos).to_vec();
    for id in ids {
      if self.chart.state(id).next_sym().and_then(Sym::as_term) == Some(ch) {
        let advanced = self.chart.state(id).advanced();
        log::trace!("scanned {:?} at {}", advanced, pos);
        self.chart.insert(advanced, vec![id], pos + 1);
      }
    }
  }
}
