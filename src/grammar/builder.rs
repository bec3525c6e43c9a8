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

use super::{Alternative, Grammar, GrammarErrors, Production, Sym};

pub struct AltBuilder {
  syms: Vec<Sym>,
}

impl AltBuilder {
  fn new() -> Self {
    AltBuilder { syms: Vec::new() }
  }

  fn build(self) -> Alternative {
    Alternative::new(self.syms)
  }

  pub fn add_term(&mut self, ch: char) -> &mut Self {
    self.syms.push(Sym::Term(ch));
    self
  }

  pub fn add_nonterm(&mut self, ch: char) -> &mut Self {
    self.syms.push(Sym::NonTerm(ch));
    self
  }
}

// ----------------

pub struct RuleBuilder {
  head: char,
  alts: Vec<Alternative>,
}

impl RuleBuilder {
  fn new(head: char) -> Self {
    RuleBuilder {
      head,
      alts: Vec::new(),
    }
  }

  fn build(self) -> Production {
    let RuleBuilder { head, alts } = self;
    Production::new(head, alts)
  }

  /// Adds an alternative to this rule. An empty body builds epsilon.
  pub fn add_alt(
    &mut self,
    build_fn: impl FnOnce(&mut AltBuilder),
  ) -> &mut Self {
    let mut builder = AltBuilder::new();
    build_fn(&mut builder);
    self.alts.push(builder.build());
    self
  }
}

// ----------------

pub struct GrammarBuilder {
  rules: Vec<Production>,
}

impl GrammarBuilder {
  fn new() -> Self {
    GrammarBuilder { rules: Vec::new() }
  }

  fn build(self, start: char) -> Result<Grammar, GrammarErrors> {
    Grammar::new(start, self.rules)
  }

  /// Adds a rule for the given head nonterminal. Rules sharing a head are
  /// merged by `Grammar::new`.
  pub fn add_rule(
    &mut self,
    head: char,
    build_fn: impl FnOnce(&mut RuleBuilder),
  ) -> &mut Self {
    let mut builder = RuleBuilder::new(head);
    build_fn(&mut builder);
    self.rules.push(builder.build());
    self
  }
}

/// Builds a grammar with the given start nonterminal.
pub fn build(
  start: char,
  build_fn: impl FnOnce(&mut GrammarBuilder),
) -> Result<Grammar, GrammarErrors> {
  let mut builder = GrammarBuilder::new();
  build_fn(&mut builder);
  builder.build(start)
}

#[cfg(test)]
mod tests {
  use super::build;

  #[test]
  fn builds_a_simple_grammar() {
    let g = build('S', |gb| {
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
    })
    .unwrap();

    assert_eq!(g.start_nt(), 'S');
    assert_eq!(g.get_rule('X').alts().len(), 2);
    assert!(g.get_rule('X').alts()[0].is_epsilon());
  }

  #[test]
  fn same_head_rules_merge() {
    let g = build('S', |gb| {
      gb.add_rule('S', |rb| {
        rb.add_alt(|ab| {
          ab.add_term('0');
        });
      });
      gb.add_rule('S', |rb| {
        rb.add_alt(|ab| {
          ab.add_term('1');
        });
      });
    })
    .unwrap();

    assert_eq!(g.get_rule('S').alts().len(), 2);
  }

  #[test]
  fn reports_undefined_nonterminals() {
    let err = build('S', |gb| {
      gb.add_rule('S', |rb| {
        rb.add_alt(|ab| {
          ab.add_nonterm('Q');
        });
      });
    })
    .unwrap_err();

    assert!(err.undefined_nonterms().contains(&'Q'));
  }
}
