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

//! End-to-end parsing scenarios against the public API.

use conga::{build, parse, Grammar, ParseResult};

fn zero_x_x() -> anyhow::Result<Grammar> {
  // S -> 0 X X;  X -> ε | 1
  Ok(build('S', |gb| {
    gb.add_rule('S', |rb| {
      rb.add_alt(|ab| {
        ab.add_term('0').add_nonterm('X').add_nonterm('X');
      });
    });
    gb.add_rule('X', |rb| {
      rb.add_alt(|_| {}).add_alt(|ab| {
        ab.add_term('1');
      });
    });
  })?)
}

fn palindromes() -> anyhow::Result<Grammar> {
  // S -> 0 S 0 | 1 S 1 | 0 | 1 | ε
  Ok(build('S', |gb| {
    gb.add_rule('S', |rb| {
      rb.add_alt(|ab| {
        ab.add_term('0').add_nonterm('S').add_term('0');
      });
      rb.add_alt(|ab| {
        ab.add_term('1').add_nonterm('S').add_term('1');
      });
      rb.add_alt(|ab| {
        ab.add_term('0');
      });
      rb.add_alt(|ab| {
        ab.add_term('1');
      });
      rb.add_alt(|_| {});
    });
  })?)
}

fn assert_derivation_ends_at(result: &ParseResult, input: &str) {
  match result {
    ParseResult::Match(derivation) => {
      let steps = derivation.steps();
      assert_eq!(steps.last().unwrap().text(), input);
    }
    other => panic!("expected Match for {:?}, got {:?}", input, other),
  }
}

#[test]
fn epsilon_and_terminal_slots() -> anyhow::Result<()> {
  let g = zero_x_x()?;

  // One X empty, one X matching '1'.
  assert_derivation_ends_at(&parse(&g, "01"), "01");
  // Both X slots take epsilon.
  assert_derivation_ends_at(&parse(&g, "0"), "0");
  // Both X slots filled.
  assert_derivation_ends_at(&parse(&g, "011"), "011");
  // Only two X slots exist.
  assert_eq!(parse(&g, "0111"), ParseResult::NoMatch);
  assert_eq!(parse(&g, ""), ParseResult::NoMatch);
  Ok(())
}

#[test]
fn palindrome_membership() -> anyhow::Result<()> {
  let g = palindromes()?;

  assert_derivation_ends_at(&parse(&g, "101"), "101");
  assert_derivation_ends_at(&parse(&g, ""), "");
  assert_eq!(parse(&g, "10"), ParseResult::NoMatch);
  assert_eq!(
    parse(&g, "100010010101010101101000101"),
    ParseResult::NoMatch
  );
  Ok(())
}

#[test]
fn palindrome_derivations_are_witnesses() -> anyhow::Result<()> {
  let g = palindromes()?;

  match parse(&g, "0110") {
    ParseResult::Match(derivation) => {
      let steps = derivation.steps();
      // Every step expands S, and the last form is the input itself.
      assert!(steps.iter().all(|s| s.lhs() == 'S'));
      assert_eq!(steps[0].text(), "0S0");
      assert_eq!(steps.last().unwrap().text(), "0110");
    }
    other => panic!("expected Match, got {:?}", other),
  }
  Ok(())
}

#[test]
fn parsing_is_deterministic() -> anyhow::Result<()> {
  let g = palindromes()?;

  for input in &["", "0", "01", "0110", "10", "1001001"] {
    let first = parse(&g, input);
    for _ in 0..3 {
      assert_eq!(parse(&g, input), first, "verdict drifted for {:?}", input);
    }
  }
  Ok(())
}

#[test]
fn grammar_reuse_across_inputs() -> anyhow::Result<()> {
  // Each call builds an independent chart; earlier parses must not leak
  // into later ones.
  let g = zero_x_x()?;
  assert!(parse(&g, "011").is_match());
  assert_eq!(parse(&g, "111"), ParseResult::NoMatch);
  assert!(parse(&g, "011").is_match());
  Ok(())
}

#[test]
fn undefined_nonterminal_fails_at_construction() {
  let err = build('S', |gb| {
    gb.add_rule('S', |rb| {
      rb.add_alt(|ab| {
        ab.add_term('0').add_nonterm('B');
      });
    });
  })
  .unwrap_err();

  assert!(err.undefined_nonterms().contains(&'B'));
  assert!(err.to_string().contains("undefined nonterminals"));
}

#[test]
fn ambiguous_grammars_match_with_one_witness() -> anyhow::Result<()> {
  // E -> E + E | n is ambiguous for "n+n+n"; the parser still returns a
  // single witness derivation.
  let g = build('E', |gb| {
    gb.add_rule('E', |rb| {
      rb.add_alt(|ab| {
        ab.add_nonterm('E').add_term('+').add_nonterm('E');
      });
      rb.add_alt(|ab| {
        ab.add_term('n');
      });
    });
  })?;

  assert_derivation_ends_at(&parse(&g, "n+n+n"), "n+n+n");
  assert_eq!(parse(&g, "n+"), ParseResult::NoMatch);
  Ok(())
}
