//! A regex-driven, stack-based lexer engine.
//!
//! A [`Grammar`] is a set of named states, each holding an _ordered_ list of
//! rules. Scanning starts in the `root` state. At every position the current
//! state's rules are tried in order and the first one whose pattern matches
//! _at_ that position wins: its span is emitted with the rule's
//! [`TokenKind`] and its [`Action`] is applied to the state stack.
//!
//! ```
//! use tcdoc::grammar::{GrammarBuilder, LexOptions};
//! use tcdoc::token::TokenKind::*;
//!
//! let grammar = GrammarBuilder::new("Tiny")
//!     .state("root")
//!         .rule(r"\d+", Number)
//!         .rule(r"\s+", Whitespace)
//!         .push(r#"""#, String, "string")
//!     .state("string")
//!         .rule(r#"[^"]+"#, String)
//!         .pop(r#"""#, String)
//!     .build()
//!     .unwrap();
//!
//! let tokens = grammar.lex("12 \"ab\"", LexOptions::default()).unwrap();
//! assert_eq!(tokens.len(), 5);
//! ```

mod builder;
mod scan;

pub use builder::*;
pub use scan::*;

use std::fmt;

use regex::Regex;
use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::token::{Token, TokenKind};

/// Index of a state within its [`Grammar`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct StateId(pub(crate) usize);

/// What happens to the state stack after a rule matches.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Push(StateId),
    /// Pop this many states. The initial state is never popped.
    Pop(usize),
}

#[derive(Debug)]
pub struct Rule {
    pub(crate) pattern: String,
    pub(crate) regex: Regex,
    pub(crate) kind: TokenKind,
    pub(crate) action: Action,
}

#[derive(Debug)]
pub struct State {
    pub(crate) name: String,
    pub(crate) rules: Vec<Rule>,
}

/// A compiled, immutable rule table.
pub struct Grammar {
    pub(crate) name: String,
    pub(crate) states: Vec<State>,
    pub(crate) index: FxHashMap<String, StateId>,
    pub(crate) root: StateId,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct LexOptions {
    /// Fail if the state stack hasn't returned to the initial state when the
    /// input ends.
    pub strict: bool,
    /// Append a newline to input that doesn't end in one.
    pub ensure_newline: bool,
}

impl Rule {
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn action(&self) -> Action {
        self.action
    }
}

impl State {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

impl Grammar {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> StateId {
        self.root
    }

    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.index.get(name).copied()
    }

    pub fn state(&self, id: StateId) -> &State {
        &self.states[id.0]
    }

    pub fn states(&self) -> impl Iterator<Item = &State> {
        self.states.iter()
    }

    /// Returns a lazy token stream over `text` starting in the root state.
    pub fn tokens<'g, 't>(&'g self, text: &'t str) -> Tokens<'g, 't> {
        Tokens::new(self, text)
    }

    /// Lexes all of `text`. Only fails in strict mode, when the input leaves
    /// states open.
    pub fn lex<'t>(&self, text: &'t str, options: LexOptions) -> Result<Vec<Token<'t>>> {
        let mut tokens = self.tokens(text);
        if options.ensure_newline {
            tokens = tokens.with_trailing_newline();
        }

        let output: Vec<Token<'t>> = tokens.by_ref().collect();
        if options.strict {
            tokens.finish()?;
        } else if tokens.depth() > 1 {
            tracing::debug!(
                grammar = %self.name,
                open = ?tokens.open_states().collect::<Vec<_>>(),
                "input ended with open lexer states"
            );
        }

        Ok(output)
    }
}

impl fmt::Debug for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grammar")
            .field("name", &self.name)
            .field("states", &self.states.iter().map(|s| &s.name).collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
static_assertions::assert_impl_all!(Grammar: Send, Sync);
