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

//! Membership testing and witness derivations for character grammars.
//!
//! `conga` decides whether a string belongs to the language of a
//! context-free grammar over single-character symbols, using a classic
//! Earley chart parser, and on a match reconstructs one derivation from the
//! chart's back pointers.
//!
//! ```
//! use conga::{build, parse, ParseResult};
//!
//! // S -> 0 X X;  X -> ε | 1
//! let g = build('S', |gb| {
//!   gb.add_rule('S', |rb| {
//!     rb.add_alt(|ab| {
//!       ab.add_term('0').add_nonterm('X').add_nonterm('X');
//!     });
//!   });
//!   gb.add_rule('X', |rb| {
//!     rb.add_alt(|_| {}).add_alt(|ab| {
//!       ab.add_term('1');
//!     });
//!   });
//! })
//! .unwrap();
//!
//! match parse(&g, "01") {
//!   ParseResult::Match(derivation) => {
//!     assert_eq!(derivation.steps().last().unwrap().text(), "01");
//!   }
//!   other => panic!("expected a match, got {:?}", other),
//! }
//! ```
//!
//! Grammars are validated at construction: a nonterminal referenced without
//! a production of its own is reported as a `GrammarErrors` value rather
//! than silently failing every parse. Parsing itself never fails for a
//! valid grammar; ambiguous, left-recursive, and epsilon-cycling grammars
//! are all legal inputs.

pub mod grammar;
pub mod parser;
pub mod utils;

pub use crate::{
  grammar::{build, Alternative, Grammar, GrammarErrors, Production, Sym},
  parser::{
    parse, parse_with_config, Derivation, DerivationStep, ParseResult,
    ParserConfig,
  },
};
