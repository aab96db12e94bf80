use crate::error::Result;
use crate::grammar::{Action, Grammar, StateId};
use crate::token::{Token, TokenKind};

/// A lazy stream of tokens produced by scanning text with a [`Grammar`].
///
/// The state stack is explicit and inspectable: after the stream is
/// exhausted, [`Tokens::open_states()`] reports the states the input left
/// open and [`Tokens::finish()`] turns a non-empty remainder into an error.
#[derive(Debug, Clone)]
pub struct Tokens<'g, 't> {
    grammar: &'g Grammar,
    text: &'t str,
    pos: usize,
    stack: Vec<StateId>,
    trailing_newline: bool,
}

impl<'g, 't> Tokens<'g, 't> {
    pub(crate) fn new(grammar: &'g Grammar, text: &'t str) -> Self {
        Tokens {
            grammar,
            text,
            pos: 0,
            stack: vec![grammar.root],
            trailing_newline: false,
        }
    }

    /// Scan as though `text` ended with a newline when it doesn't.
    pub fn with_trailing_newline(mut self) -> Self {
        self.trailing_newline = !self.text.ends_with('\n');
        self
    }

    /// The current stack depth, including the initial state.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The current state.
    pub fn state(&self) -> &'g str {
        let id = self.stack.last().copied().unwrap_or(self.grammar.root);
        self.grammar.state(id).name()
    }

    /// The states pushed on top of the initial state, outermost first.
    pub fn open_states(&self) -> impl Iterator<Item = &'g str> + '_ {
        let grammar = self.grammar;
        self.stack.iter().skip(1).map(move |&id| grammar.state(id).name())
    }

    /// Drains the stream and checks that every pushed state was popped.
    pub fn finish(mut self) -> Result<()> {
        self.by_ref().for_each(drop);
        if self.depth() > 1 {
            let open = self.open_states().collect::<Vec<_>>().join(" > ");
            return err! {
                "input ended inside an unterminated lexer state",
                "grammar" => self.grammar.name(),
                "open states" => open,
                "end offset" => self.text.len(),
            };
        }

        Ok(())
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::None => {},
            Action::Push(state) => self.stack.push(state),
            Action::Pop(n) => {
                let keep = self.stack.len().saturating_sub(n).max(1);
                self.stack.truncate(keep);
            }
        }
    }

    fn fallback(&mut self, rest: &'t str) -> Token<'t> {
        let start = self.pos;
        let len = rest.chars().next().map_or(1, char::len_utf8);
        let text = &rest[..len];
        self.pos += len;

        if text == "\n" {
            self.stack.truncate(1);
            return Token::new(TokenKind::Whitespace, start, text);
        }

        tracing::trace!(grammar = self.grammar.name(), offset = start, ?text, "no rule matched");
        Token::new(TokenKind::Error, start, text)
    }
}

impl<'t> Iterator for Tokens<'_, 't> {
    type Item = Token<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest: &'t str = match self.text.get(self.pos..) {
            Some(rest) if !rest.is_empty() => rest,
            _ if self.trailing_newline => {
                self.trailing_newline = false;
                "\n"
            }
            _ => return None,
        };

        let id = self.stack.last().copied().unwrap_or(self.grammar.root);
        for rule in &self.grammar.state(id).rules {
            let Some(m) = rule.regex.find(rest) else { continue };
            if m.end() == 0 {
                continue;
            }

            let token = Token::new(rule.kind, self.pos, &rest[..m.end()]);
            self.pos += m.end();
            self.apply(rule.action);
            return Some(token);
        }

        Some(self.fallback(rest))
    }
}
