use std::borrow::Cow;

use regex::RegexBuilder;
use rustc_hash::FxHashMap;

use crate::error::{Chainable, Result};
use crate::grammar::{Action, Grammar, Rule, State, StateId};
use crate::token::TokenKind;

/// The name of the state scanning starts in.
pub const ROOT: &str = "root";

#[derive(Debug, Clone)]
enum ActionSpec {
    None,
    Push(Cow<'static, str>),
    Pop(usize),
}

#[derive(Debug, Clone)]
struct RuleSpec {
    pattern: Cow<'static, str>,
    kind: TokenKind,
    action: ActionSpec,
}

/// Declares a [`Grammar`] state by state. Rules are kept in declaration
/// order; [`GrammarBuilder::build()`] compiles and validates the table.
#[derive(Debug, Clone)]
pub struct GrammarBuilder {
    name: String,
    states: Vec<(Cow<'static, str>, Vec<RuleSpec>)>,
}

impl GrammarBuilder {
    pub fn new<N: Into<String>>(name: N) -> Self {
        GrammarBuilder { name: name.into(), states: vec![] }
    }

    /// Starts a new state. Subsequent rules are added to it.
    pub fn state<S: Into<Cow<'static, str>>>(mut self, name: S) -> Self {
        self.states.push((name.into(), vec![]));
        self
    }

    pub fn rule<P>(self, pattern: P, kind: TokenKind) -> Self
        where P: Into<Cow<'static, str>>
    {
        self.add(pattern.into(), kind, ActionSpec::None)
    }

    pub fn push<P, S>(self, pattern: P, kind: TokenKind, state: S) -> Self
        where P: Into<Cow<'static, str>>, S: Into<Cow<'static, str>>
    {
        self.add(pattern.into(), kind, ActionSpec::Push(state.into()))
    }

    pub fn pop<P>(self, pattern: P, kind: TokenKind) -> Self
        where P: Into<Cow<'static, str>>
    {
        self.pop_n(pattern, kind, 1)
    }

    pub fn pop_n<P>(self, pattern: P, kind: TokenKind, n: usize) -> Self
        where P: Into<Cow<'static, str>>
    {
        self.add(pattern.into(), kind, ActionSpec::Pop(n))
    }

    fn add(mut self, pattern: Cow<'static, str>, kind: TokenKind, action: ActionSpec) -> Self {
        if self.states.is_empty() {
            self.states.push((ROOT.into(), vec![]));
        }

        if let Some((_, rules)) = self.states.last_mut() {
            rules.push(RuleSpec { pattern, kind, action });
        }

        self
    }

    pub fn build(self) -> Result<Grammar> {
        let mut index = FxHashMap::default();
        for (i, (name, _)) in self.states.iter().enumerate() {
            if index.insert(name.to_string(), StateId(i)).is_some() {
                return err! {
                    "lexer state declared more than once",
                    "grammar" => &self.name,
                    "state" => name,
                };
            }
        }

        let Some(&root) = index.get(ROOT) else {
            return err! {
                "grammar has no initial state",
                "grammar" => &self.name,
                "expected state" => ROOT,
            };
        };

        let mut states = Vec::with_capacity(self.states.len());
        for (state, specs) in &self.states {
            let mut rules = Vec::with_capacity(specs.len());
            for (i, spec) in specs.iter().enumerate() {
                let rule = compile(spec, &index).chain_with(|| error! {
                    "invalid lexer rule",
                    "grammar" => &self.name,
                    "state" => state,
                    "rule" => i,
                    "pattern" => &spec.pattern,
                })?;

                rules.push(rule);
            }

            states.push(State { name: state.to_string(), rules });
        }

        tracing::debug!(grammar = %self.name, states = states.len(), "compiled grammar");
        Ok(Grammar { name: self.name, states, index, root })
    }
}

fn compile(spec: &RuleSpec, index: &FxHashMap<String, StateId>) -> Result<Rule> {
    let action = match &spec.action {
        ActionSpec::None => Action::None,
        ActionSpec::Pop(n) => Action::Pop(*n),
        ActionSpec::Push(target) => match index.get(&**target) {
            Some(&id) => Action::Push(id),
            None => return err!("rule pushes an undefined state", "target" => target),
        },
    };

    // Anchor at the scan position; `^`/`$` match at line boundaries.
    let regex = RegexBuilder::new(&format!(r"\A(?:{})", spec.pattern))
        .multi_line(true)
        .build()?;

    Ok(Rule { pattern: spec.pattern.to_string(), regex, kind: spec.kind, action })
}
