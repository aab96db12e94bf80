//! The Technetium rule table.
//!
//! States: `root` for code, `string` and `char` for quoted literals, and
//! `shell` for `$`-prefixed shell fragments which run to the end of the line.
//! Braces inside a shell fragment are highlighted as punctuation but do not
//! re-enter `root`.

use crate::error::Result;
use crate::grammar::{Grammar, GrammarBuilder};
use crate::registry::Lexer;
use crate::token::TokenKind::*;

pub const NAME: &str = "Technetium";
pub const ALIASES: &[&str] = &["technetium", "tech", "tc"];
pub const FILENAMES: &[&str] = &["*.tc"];

pub const KEYWORDS: &[&str] = &[
    "false", "true", "if", "else", "elif", "for", "in", "while", "case", "of",
    "func", "return", "unit",
];

// Multi-character operators come first: `->` must never lex as `-`, `>`.
const OPERATORS: &str = concat!(
    r"->|=>|<=|>=|!=|==|\|\||&&|\+=|-=|\*=|/=|%=",
    r"|\*|/|\+|-|%|:|>|<|=|~|\[|\]|\\",
);

pub fn grammar() -> Result<Grammar> {
    GrammarBuilder::new(NAME)
        .state("root")
            .rule(format!(r"(?:{})\b", KEYWORDS.join("|")), Keyword)
            .rule(r"\d+\.?\d*", Number)
            .rule(OPERATORS, Operator)
            .rule(r"[{}().,]", Punctuation)
            .rule(r"\s+", Whitespace)
            .rule(r"#.*?$", Comment)
            .push(r"'", StringChar, "char")
            .push(r#"""#, String, "string")
            .push(r"\$", Operator, "shell")
            .rule(r"\w[\w0-9]*", Name)
        .state("string")
            .rule(r#"[^"\\]+"#, String)
            .rule(r#"\\["\\nt]"#, StringEscape)
            .pop(r#"""#, String)
        .state("char")
            .rule(r"[^'\\]+", StringChar)
            .rule(r"\\['\\nt]", StringEscape)
            .pop(r"'", StringChar)
        .state("shell")
            .rule(r"\\[{}]", StringEscape)
            .rule(r"[{}]", Punctuation)
            .rule(r"[^\n{}\\]+", StringAffix)
            .pop(r"\n", Whitespace)
        .build()
}

/// The Technetium lexer with its aliases and filename patterns.
pub fn lexer() -> Result<Lexer> {
    Lexer::new(NAME, grammar()?)
        .aliases(ALIASES.iter().copied())
        .filenames(FILENAMES.iter().copied())
}

#[cfg(test)]
mod tests {
    use once_cell::sync::Lazy;

    use super::*;
    use crate::grammar::LexOptions;
    use crate::token::{Token, TokenKind};

    static GRAMMAR: Lazy<Grammar> = Lazy::new(|| grammar().unwrap());

    fn lex(text: &str) -> Vec<(TokenKind, &str)> {
        GRAMMAR.tokens(text).map(|t| (t.kind, t.text)).collect()
    }

    #[test]
    fn keywords_are_single_tokens() {
        for keyword in KEYWORDS {
            assert_eq!(lex(keyword), [(Keyword, *keyword)], "keyword {keyword}");
        }
    }

    #[test]
    fn keyword_prefixes_stay_names() {
        assert_eq!(lex("interval"), [(Name, "interval")]);
        assert_eq!(lex("ifx"), [(Name, "ifx")]);
        assert_eq!(lex("elif"), [(Keyword, "elif")]);
        assert_eq!(lex("in x"), [(Keyword, "in"), (Whitespace, " "), (Name, "x")]);
    }

    #[test]
    fn string_literal_pushes_and_pops() {
        let mut tokens = GRAMMAR.tokens(r#""abc""#);
        assert_eq!(tokens.next(), Some(Token::new(String, 0, "\"")));
        assert_eq!(tokens.state(), "string");
        assert_eq!(tokens.next(), Some(Token::new(String, 1, "abc")));
        assert_eq!(tokens.next(), Some(Token::new(String, 4, "\"")));
        assert_eq!(tokens.state(), "root");
        assert_eq!(tokens.next(), None);
        assert_eq!(tokens.depth(), 1);
    }

    #[test]
    fn string_escapes() {
        assert_eq!(lex(r#""a\"b\n""#), [
            (String, "\""),
            (String, "a"),
            (StringEscape, "\\\""),
            (String, "b"),
            (StringEscape, "\\n"),
            (String, "\""),
        ]);
    }

    #[test]
    fn char_literal_with_escaped_quote() {
        let mut tokens = GRAMMAR.tokens(r"'a\'b'");
        let lexed: Vec<_> = tokens.by_ref().map(|t| (t.kind, t.text)).collect();
        assert_eq!(lexed, [
            (StringChar, "'"),
            (StringChar, "a"),
            (StringEscape, r"\'"),
            (StringChar, "b"),
            (StringChar, "'"),
        ]);

        assert_eq!(tokens.depth(), 1);
    }

    #[test]
    fn line_comment_excludes_newline() {
        assert_eq!(lex("# hello"), [(Comment, "# hello")]);
        assert_eq!(lex("x # hi\ny"), [
            (Name, "x"),
            (Whitespace, " "),
            (Comment, "# hi"),
            (Whitespace, "\n"),
            (Name, "y"),
        ]);
    }

    #[test]
    fn arrow_is_one_operator() {
        assert_eq!(lex("->"), [(Operator, "->")]);
        assert_eq!(lex("a>=b"), [(Name, "a"), (Operator, ">="), (Name, "b")]);
        assert_eq!(lex("x > 1"), [
            (Name, "x"),
            (Whitespace, " "),
            (Operator, ">"),
            (Whitespace, " "),
            (Number, "1"),
        ]);
    }

    #[test]
    fn numbers_and_punctuation() {
        assert_eq!(lex("f(1.5, 20)"), [
            (Name, "f"),
            (Punctuation, "("),
            (Number, "1.5"),
            (Punctuation, ","),
            (Whitespace, " "),
            (Number, "20"),
            (Punctuation, ")"),
        ]);
    }

    #[test]
    fn unterminated_shell_leaves_stack_open() {
        let mut tokens = GRAMMAR.tokens("$");
        assert_eq!(tokens.next(), Some(Token::new(Operator, 0, "$")));
        assert_eq!(tokens.next(), None);
        assert_eq!(tokens.open_states().collect::<Vec<_>>(), ["shell"]);

        let lenient = GRAMMAR.lex("$", LexOptions::default()).unwrap();
        assert_eq!(lenient.len(), 1);

        let strict = LexOptions { strict: true, ..LexOptions::default() };
        let error = GRAMMAR.lex("$", strict).unwrap_err();
        assert!(error.context().iter().any(|(_, v)| v == "shell"));
    }

    #[test]
    fn shell_fragment_ends_at_newline() {
        let mut tokens = GRAMMAR.tokens("$ls {dir} \\{x\\}\ny");
        let lexed: Vec<_> = tokens.by_ref().map(|t| (t.kind, t.text)).collect();
        assert_eq!(lexed, [
            (Operator, "$"),
            (StringAffix, "ls "),
            (Punctuation, "{"),
            (StringAffix, "dir"),
            (Punctuation, "}"),
            (StringAffix, " "),
            (StringEscape, "\\{"),
            (StringAffix, "x"),
            (StringEscape, "\\}"),
            (Whitespace, "\n"),
            (Name, "y"),
        ]);

        assert_eq!(tokens.depth(), 1);
    }

    #[test]
    fn program() {
        let source = "func sq(x) {\n  return x * x # square\n}\n";
        let tokens = GRAMMAR.lex(source, LexOptions { strict: true, ..Default::default() }).unwrap();
        assert!(tokens.iter().all(|t| t.kind != Error));
        assert_eq!(tokens.iter().map(|t| t.text).collect::<std::string::String>(), source);

        let mut offset = 0;
        for token in &tokens {
            assert_eq!(token.span(), offset..offset + token.text.len());
            assert_eq!(&source[token.span()], token.text);
            offset = token.end();
        }
    }

    #[test]
    fn states_are_named() {
        for state in ["root", "string", "char", "shell"] {
            let id = GRAMMAR.state_id(state).unwrap();
            assert_eq!(GRAMMAR.state(id).name(), state);
        }

        assert_eq!(GRAMMAR.state_id("root"), Some(GRAMMAR.root()));
        assert!(GRAMMAR.state_id("comment").is_none());
    }
}
