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

//! Witness-derivation reconstruction over the chart's back-pointer graph.
//!
//! A state's back-pointer set can hold several predecessors when derivations
//! of the same span converged on one chart entry, and not every combination
//! of pointers composes back to the original input. The search therefore
//! runs breadth-first over partial paths, carrying the sentential form each
//! path implies, and accepts the first path whose form equals the input.
//! A hard cap on expanded nodes keeps the walk bounded over what is a
//! potentially exponential derivation space; hitting the cap means the match
//! stands but no derivation is reported.

use {
  crate::grammar::{Alternative, Sym},
  crate::parser::chart::{Chart, Head, StateId},
  crate::utils::ToDoc,
  im::Vector,
  std::collections::VecDeque,
};

/// One rule application: the expanded nonterminal and the sentential form
/// produced by the expansion, rendered as a plain string. Nonterminals not
/// yet expanded appear as their characters.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct DerivationStep {
  lhs: char,
  text: String,
}

impl DerivationStep {
  pub fn lhs(&self) -> char {
    self.lhs
  }

  pub fn text(&self) -> &str {
    &self.text
  }
}

/// An ordered list of rule applications taking the start symbol to the
/// input string.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Derivation {
  steps: Vec<DerivationStep>,
}

impl Derivation {
  pub fn steps(&self) -> &[DerivationStep] {
    &self.steps
  }

  pub fn to_pretty(&self) -> String {
    let arena = pretty::Arena::new();
    format!("{}", self.to_doc(&arena).into_doc().pretty(80))
  }
}

impl ToDoc for Derivation {
  fn to_doc<'a, DA: pretty::DocAllocator<'a>>(
    &self,
    da: &'a DA,
  ) -> pretty::DocBuilder<'a, DA>
  where
    DA::Doc: Clone,
  {
    da.intersperse(
      self
        .steps
        .iter()
        .map(|step| da.text(format!("{} => {}", step.lhs, step.text))),
      da.hardline(),
    )
  }
}

struct SearchNode {
  path: Vector<StateId>,
  form: Vector<Sym>,
}

/// Replaces the rightmost occurrence of `head` in `form` with the symbols of
/// `alt`. Walking back pointers meets later-position completions first, so
/// the rightmost occurrence is the most recently introduced one. Returns
/// `None` when the head does not occur; that path cannot compose back to the
/// input and is abandoned.
fn substitute(
  form: &Vector<Sym>,
  head: char,
  alt: &Alternative,
) -> Option<Vector<Sym>> {
  let idx = (0..form.len())
    .rev()
    .find(|&i| form.get(i) == Some(&Sym::NonTerm(head)))?;

  let mut result = form.clone();
  result.remove(idx);
  for (offset, sym) in alt.syms().enumerate() {
    result.insert(idx + offset, *sym);
  }
  Some(result)
}

fn matches_input(form: &Vector<Sym>, input: &[char]) -> bool {
  form.len() == input.len()
    && form
      .iter()
      .zip(input)
      .all(|(sym, &ch)| *sym == Sym::Term(ch))
}

fn render(form: &Vector<Sym>) -> String {
  form.iter().map(Sym::ch).collect()
}

/// Searches backward from the matched augmented-start state for one path
/// whose implied string is exactly `input`. Returns `None` when the search
/// exceeds `node_limit` expansions (or, defensively, exhausts its queue).
pub(crate) fn reconstruct(
  chart: &Chart,
  matched: StateId,
  input: &[char],
  node_limit: usize,
) -> Option<Derivation> {
  let initial_form: Vector<Sym> =
    chart.state(matched).alt().syms().copied().collect();

  let mut queue: VecDeque<SearchNode> = VecDeque::new();
  queue.push_back(SearchNode {
    path: Vector::unit(matched),
    form: initial_form,
  });

  let mut expanded = 0usize;
  while let Some(node) = queue.pop_front() {
    expanded += 1;
    if expanded > node_limit {
      log::debug!("derivation search exceeded {} expansions", node_limit);
      return None;
    }

    let last = *node.path.back().expect("search paths are never empty");
    for &pred in chart.prev(last) {
      let state = chart.state(pred);
      let form = if state.is_complete() {
        let head = match state.head() {
          Head::NonTerm(ch) => ch,
          Head::Start => continue,
        };
        match substitute(&node.form, head, state.alt()) {
          Some(form) => form,
          None => continue,
        }
      } else {
        node.form.clone()
      };

      let mut path = node.path.clone();
      path.push_back(pred);

      if matches_input(&form, input) {
        return Some(build_steps(chart, &path));
      }
      queue.push_back(SearchNode { path, form });
    }
  }

  // A proven match should always leave a witness; treat a dry queue the same
  // as the cap rather than looping further.
  None
}

/// Replays a successful path forward, collecting one step per completed
/// state. The path's first entry is the matched augmented-start state; its
/// alternative (the bare start nonterminal) seeds the form.
fn build_steps(chart: &Chart, path: &Vector<StateId>) -> Derivation {
  let first = *path.front().expect("successful paths are never empty");
  let mut form: Vector<Sym> = chart.state(first).alt().syms().copied().collect();

  let mut steps = Vec::new();
  for &id in path.iter().skip(1) {
    let state = chart.state(id);
    if !state.is_complete() {
      continue;
    }
    if let Head::NonTerm(head) = state.head() {
      form = substitute(&form, head, state.alt())
        .expect("successful paths replay without failure");
      steps.push(DerivationStep {
        lhs: head,
        text: render(&form),
      });
    }
  }

  Derivation { steps }
}
