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

//! Earley parsing of character strings against a grammar.
//!
//! `parse` answers membership and, on a match, reconstructs one witness
//! derivation from the chart's back pointers. Each call builds an
//! independent chart, so a grammar may be shared freely across calls.

pub mod chart;
mod derivation;
mod earley;

use crate::grammar::Grammar;

pub use derivation::{Derivation, DerivationStep};

/// Per-call parser configuration.
#[derive(Clone, Copy, Debug)]
pub struct ParserConfig {
  /// The maximum number of nodes the derivation search may expand before it
  /// gives up and reports the derivation unavailable. The membership verdict
  /// itself is not affected.
  pub derivation_node_limit: usize,
}

impl Default for ParserConfig {
  fn default() -> Self {
    ParserConfig {
      derivation_node_limit: 50_000,
    }
  }
}

/// The outcome of a parse.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ParseResult {
  /// The input is in the grammar's language, with a witness derivation.
  Match(Derivation),
  /// The input is in the grammar's language, but the derivation search gave
  /// up before finding a witness. Distinct from `NoMatch`.
  MatchWithoutDerivation,
  /// The input is not in the grammar's language.
  NoMatch,
}

impl ParseResult {
  pub fn is_match(&self) -> bool {
    !matches!(self, ParseResult::NoMatch)
  }

  pub fn derivation(&self) -> Option<&Derivation> {
    match self {
      ParseResult::Match(derivation) => Some(derivation),
      _ => None,
    }
  }
}

/// Parses `input` against `grammar` with the default configuration.
pub fn parse(grammar: &Grammar, input: &str) -> ParseResult {
  parse_with_config(grammar, input, &ParserConfig::default())
}

/// Parses `input` against `grammar`. Never fails for a valid grammar;
/// internal invariant violations panic.
pub fn parse_with_config(
  grammar: &Grammar,
  input: &str,
  config: &ParserConfig,
) -> ParseResult {
  let (chart, matched) = earley::ParserImpl::new(grammar, input).run();

  let matched = match matched {
    Some(id) => id,
    None => return ParseResult::NoMatch,
  };

  let chars: Vec<char> = input.chars().collect();
  match derivation::reconstruct(
    &chart,
    matched,
    &chars,
    config.derivation_node_limit,
  ) {
    Some(derivation) => ParseResult::Match(derivation),
    None => ParseResult::MatchWithoutDerivation,
  }
}
