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

//! Creation and manipulation of character grammars.
//!
//! A grammar here is a context-free grammar whose alphabet consists of single
//! characters, each tagged as a terminal or a nonterminal. A grammar consists
//! of
//!
//! - A start nonterminal
//! - A list of productions, each of which consists of
//!   - A head nonterminal
//!   - A list of distinct alternatives, where each alternative is a sequence
//!     of symbols. The empty sequence stands for epsilon.
//!
//! Grammars are read-only once constructed, and every nonterminal referenced
//! on an alternative's right-hand side must have a production of its own.
//! Construction reports the full set of undefined nonterminals otherwise.

pub mod builder;

use {
  crate::utils::{ToDoc, WasChanged},
  std::collections::BTreeSet,
  std::fmt::Debug,
};

pub use builder::{build, AltBuilder, GrammarBuilder, RuleBuilder};

/// A single grammar symbol (terminal or nonterminal).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sym {
  Term(char),
  NonTerm(char),
}

impl Sym {
  /// If this symbol is a terminal, returns a `Some` value containing its
  /// character. Returns `None` otherwise.
  pub fn as_term(&self) -> Option<char> {
    match self {
      Sym::Term(ch) => Some(*ch),
      Sym::NonTerm(_) => None,
    }
  }

  /// Gets a symbol as a nonterminal. Returns a `None` value otherwise.
  pub fn as_nonterm(&self) -> Option<char> {
    match self {
      Sym::NonTerm(ch) => Some(*ch),
      Sym::Term(_) => None,
    }
  }

  /// The underlying character, regardless of the terminal flag.
  pub fn ch(&self) -> char {
    match self {
      Sym::Term(ch) | Sym::NonTerm(ch) => *ch,
    }
  }
}

impl Debug for Sym {
  fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
    match self {
      Sym::Term(ch) => write!(fmt, "{:?}", ch),
      Sym::NonTerm(ch) => write!(fmt, "<{}>", ch),
    }
  }
}

impl ToDoc for Sym {
  fn to_doc<'a, DA: pretty::DocAllocator<'a>>(
    &self,
    da: &'a DA,
  ) -> pretty::DocBuilder<'a, DA>
  where
    DA::Doc: Clone,
  {
    match self {
      Sym::NonTerm(ch) => da
        .text("<")
        .append(da.text(ch.to_string()))
        .append(da.text(">")),
      Sym::Term(ch) => da.text(ch.to_string()),
    }
  }
}

/// One right-hand side of a production: an ordered sequence of symbols.
///
/// An alternative with zero symbols is the canonical representation of
/// epsilon.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct Alternative {
  syms: Vec<Sym>,
}

impl Alternative {
  pub fn new(syms: Vec<Sym>) -> Self {
    Alternative { syms }
  }

  /// The empty alternative.
  pub fn epsilon() -> Self {
    Alternative { syms: Vec::new() }
  }

  pub fn len(&self) -> usize {
    self.syms.len()
  }

  pub fn is_epsilon(&self) -> bool {
    self.syms.is_empty()
  }

  pub fn sym_at(&self, index: usize) -> Option<&Sym> {
    self.syms.get(index)
  }

  pub fn syms(&self) -> impl Iterator<Item = &Sym> + Clone {
    self.syms.iter()
  }
}

impl std::iter::FromIterator<Sym> for Alternative {
  fn from_iter<I: IntoIterator<Item = Sym>>(iter: I) -> Self {
    Alternative {
      syms: iter.into_iter().collect(),
    }
  }
}

impl ToDoc for Alternative {
  fn to_doc<'a, DA: pretty::DocAllocator<'a>>(
    &self,
    da: &'a DA,
  ) -> pretty::DocBuilder<'a, DA>
  where
    DA::Doc: Clone,
  {
    if self.syms.is_empty() {
      da.text("ε")
    } else {
      da.intersperse(self.syms.iter().map(|s| s.to_doc(da)), da.softline())
    }
  }
}

/// All of the alternatives for a single head nonterminal.
///
/// A production never contains two structurally-equal alternatives; adding a
/// duplicate is a no-op.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Production {
  head: char,
  alts: Vec<Alternative>,
}

impl Production {
  pub fn new(
    head: char,
    alts: impl IntoIterator<Item = Alternative>,
  ) -> Self {
    let mut prod = Production {
      head,
      alts: Vec::new(),
    };
    for alt in alts {
      prod.add_alt(alt);
    }
    prod
  }

  /// Returns the head nonterminal.
  pub fn head(&self) -> char {
    self.head
  }

  /// Returns the alternatives of this production, in insertion order.
  pub fn alts(&self) -> &[Alternative] {
    &self.alts
  }

  /// Adds an alternative, suppressing structural duplicates.
  pub fn add_alt(&mut self, alt: Alternative) -> WasChanged {
    if self.alts.contains(&alt) {
      WasChanged::Unchanged
    } else {
      self.alts.push(alt);
      WasChanged::Changed
    }
  }

  /// Merges all of `other`'s alternatives into this production.
  pub fn merge(&mut self, other: Production) -> WasChanged {
    let mut changed = WasChanged::Unchanged;
    for alt in other.alts {
      changed.merge(self.add_alt(alt));
    }
    changed
  }
}

impl ToDoc for Production {
  fn to_doc<'a, DA: pretty::DocAllocator<'a>>(
    &self,
    da: &'a DA,
  ) -> pretty::DocBuilder<'a, DA>
  where
    DA::Doc: Clone,
  {
    da.text(self.head.to_string())
      .append(da.text(" =>"))
      .append(da.softline())
      .append(da.intersperse(
        self.alts.iter().map(|alt| alt.to_doc(da)),
        da.text(" |").append(da.softline()),
      ))
  }
}

/// The set of undefined nonterminals found while validating a grammar.
///
/// A nonterminal is undefined when it appears on the right-hand side of some
/// alternative but no production has it as a head. Such a nonterminal could
/// never complete, so it is rejected at construction time rather than left to
/// silently fail every parse.
#[derive(Clone, Debug, thiserror::Error)]
#[error("grammar references undefined nonterminals: {undefined:?}")]
pub struct GrammarErrors {
  undefined: BTreeSet<char>,
}

impl GrammarErrors {
  /// The undefined nonterminals, in sorted order.
  pub fn undefined_nonterms(&self) -> &BTreeSet<char> {
    &self.undefined
  }
}

/// A context-free grammar over character symbols.
///
/// Grammars are read-only. Productions are kept in insertion order for
/// display; productions sharing a head are merged at construction.
#[derive(Clone, Debug)]
pub struct Grammar {
  start: char,
  rules: Vec<Production>,
}

impl Grammar {
  pub fn new(
    start: char,
    prods: impl IntoIterator<Item = Production>,
  ) -> Result<Self, GrammarErrors> {
    let mut rules: Vec<Production> = Vec::new();
    for prod in prods {
      match rules.iter().position(|r| r.head() == prod.head()) {
        Some(idx) => {
          rules[idx].merge(prod);
        }
        None => rules.push(prod),
      }
    }

    let g = Grammar { start, rules };
    g.check_grammar().map(|_| g)
  }

  /// Returns the start nonterminal for this grammar.
  pub fn start_nt(&self) -> char {
    self.start
  }

  /// Returns the productions of this grammar, in insertion order.
  pub fn rules(&self) -> impl Iterator<Item = &Production> {
    self.rules.iter()
  }

  /// Gets the production whose head is the given nonterminal.
  pub fn try_get_rule(&self, nt: char) -> Option<&Production> {
    self.rules.iter().find(|r| r.head() == nt)
  }

  /// Gets the production whose head is the given nonterminal. Panics if no
  /// such production exists; validated grammars always have one for every
  /// referenced nonterminal.
  pub fn get_rule(&self, nt: char) -> &Production {
    self
      .try_get_rule(nt)
      .expect("An NT rule exists in the grammar.")
  }

  fn referenced_nonterms(&self) -> BTreeSet<char> {
    let mut nts: BTreeSet<char> = self
      .rules
      .iter()
      .flat_map(|r| r.alts())
      .flat_map(|alt| alt.syms())
      .filter_map(|sym| sym.as_nonterm())
      .collect();
    nts.insert(self.start);
    nts
  }

  fn check_grammar(&self) -> Result<(), GrammarErrors> {
    let undefined: BTreeSet<char> = self
      .referenced_nonterms()
      .into_iter()
      .filter(|nt| self.try_get_rule(*nt).is_none())
      .collect();

    if undefined.is_empty() {
      Ok(())
    } else {
      Err(GrammarErrors { undefined })
    }
  }

  pub fn to_pretty(&self) -> String {
    let arena = pretty::Arena::new();
    format!("{}", self.to_doc(&arena).into_doc().pretty(80))
  }
}

impl ToDoc for Grammar {
  fn to_doc<'a, DA: pretty::DocAllocator<'a>>(
    &self,
    da: &'a DA,
  ) -> pretty::DocBuilder<'a, DA>
  where
    DA::Doc: Clone,
  {
    let start_entry = da
      .text("Start = ")
      .append(da.text(self.start.to_string()))
      .append(da.text(";"));

    let rule_entries = da.concat(self.rules.iter().map(|rule| {
      da.softline()
        .append(rule.to_doc(da))
        .append(da.text(";"))
    }));

    start_entry.append(rule_entries)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn alt(text: &str) -> Alternative {
    text
      .chars()
      .map(|ch| {
        if ch.is_ascii_uppercase() {
          Sym::NonTerm(ch)
        } else {
          Sym::Term(ch)
        }
      })
      .collect()
  }

  #[test]
  fn sym_accessors_split_by_kind() {
    assert_eq!(Sym::Term('0').as_term(), Some('0'));
    assert_eq!(Sym::Term('0').as_nonterm(), None);
    assert_eq!(Sym::NonTerm('X').as_term(), None);
    assert_eq!(Sym::NonTerm('X').as_nonterm(), Some('X'));
  }

  #[test]
  fn production_dedups_alternatives() {
    let mut prod = Production::new('S', vec![alt("0XX"), alt("0XX")]);
    assert_eq!(prod.alts().len(), 1);
    assert_eq!(prod.add_alt(alt("0XX")), WasChanged::Unchanged);
    assert_eq!(prod.add_alt(alt("1")), WasChanged::Changed);
    assert_eq!(prod.alts().len(), 2);
  }

  #[test]
  fn epsilon_is_distinct_from_nonempty() {
    let mut prod = Production::new('X', vec![Alternative::epsilon()]);
    assert_eq!(prod.add_alt(alt("1")), WasChanged::Changed);
    assert_eq!(prod.alts().len(), 2);
    assert!(prod.alts()[0].is_epsilon());
  }

  #[test]
  fn grammar_merges_same_head_productions() {
    let g = Grammar::new(
      'S',
      vec![
        Production::new('S', vec![alt("0")]),
        Production::new('S', vec![alt("1"), alt("0")]),
      ],
    )
    .unwrap();

    let rule = g.get_rule('S');
    assert_eq!(rule.alts().len(), 2);
  }

  #[test]
  fn grammar_preserves_insertion_order() {
    let g = Grammar::new(
      'S',
      vec![
        Production::new('S', vec![alt("XY")]),
        Production::new('X', vec![alt("0")]),
        Production::new('Y', vec![alt("1")]),
      ],
    )
    .unwrap();

    let heads: Vec<char> = g.rules().map(|r| r.head()).collect();
    assert_eq!(heads, vec!['S', 'X', 'Y']);
  }

  #[test]
  fn undefined_nonterminal_is_a_construction_error() {
    let err = Grammar::new(
      'S',
      vec![Production::new('S', vec![alt("0Z")])],
    )
    .unwrap_err();

    assert!(err.undefined_nonterms().contains(&'Z'));
    assert!(!err.undefined_nonterms().contains(&'S'));
  }

  #[test]
  fn undefined_start_is_a_construction_error() {
    let err = Grammar::new('S', vec![]).unwrap_err();
    assert!(err.undefined_nonterms().contains(&'S'));
  }

  #[test]
  fn pretty_renders_epsilon() {
    let g = Grammar::new(
      'S',
      vec![Production::new(
        'S',
        vec![Alternative::epsilon(), alt("0S")],
      )],
    )
    .unwrap();

    let text = g.to_pretty();
    assert!(text.contains("ε"), "missing epsilon in {:?}", text);
    assert!(text.contains("S =>"), "missing rule head in {:?}", text);
  }
}
