use std::fmt::Write;

use crate::token::TokenKind;

/// How a single token kind is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rule {
    pub color: Option<&'static str>,
    pub bold: bool,
    pub italic: bool,
    /// Draw a border around the span, used for error tokens.
    pub border: Option<&'static str>,
}

/// A named color scheme for highlighted code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub name: &'static str,
    pub background: Option<&'static str>,
    rules: &'static [(TokenKind, Rule)],
}

const fn color(color: &'static str) -> Rule {
    Rule { color: Some(color), bold: false, italic: false, border: None }
}

const fn bold(rule: Rule) -> Rule {
    Rule { bold: true, ..rule }
}

const fn italic(rule: Rule) -> Rule {
    Rule { italic: true, ..rule }
}

const PLAIN: Rule = Rule { color: None, bold: false, italic: false, border: None };

pub static DEFAULT: Style = Style {
    name: "default",
    background: Some("#f8f8f8"),
    rules: &[
        (TokenKind::Whitespace, color("#bbbbbb")),
        (TokenKind::Comment, italic(color("#3d7b7b"))),
        (TokenKind::Keyword, bold(color("#008000"))),
        (TokenKind::Operator, color("#666666")),
        (TokenKind::Number, color("#666666")),
        (TokenKind::String, color("#ba2121")),
        (TokenKind::StringEscape, bold(color("#aa5d1f"))),
        (TokenKind::StringAffix, color("#ba2121")),
        (TokenKind::Error, Rule { border: Some("#ff0000"), ..PLAIN }),
    ],
};

pub static BW: Style = Style {
    name: "bw",
    background: None,
    rules: &[
        (TokenKind::Comment, italic(PLAIN)),
        (TokenKind::Keyword, bold(PLAIN)),
        (TokenKind::StringEscape, bold(PLAIN)),
        (TokenKind::Error, Rule { border: Some("#ff0000"), ..PLAIN }),
    ],
};

pub static STYLES: &[&Style] = &[&DEFAULT, &BW];

impl Style {
    pub fn find(name: &str) -> Option<&'static Style> {
        STYLES.iter().copied().find(|s| s.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Resolves a configured style name; `None` selects [`DEFAULT`].
    pub fn for_setting(name: Option<&str>) -> crate::error::Result<&'static Style> {
        let Some(name) = name else { return Ok(&DEFAULT) };
        Style::find(name).ok_or_else(|| error! {
            "unknown highlight style",
            "style" => name,
            "available" => STYLES.iter().map(|s| s.name).collect::<Vec<_>>().join(", "),
        })
    }

    /// The rule for `kind`, inherited from its parent kind if unset.
    pub fn rule(&self, kind: TokenKind) -> Option<Rule> {
        let mut kind = Some(kind);
        while let Some(k) = kind {
            if let Some((_, rule)) = self.rules.iter().find(|(rk, _)| *rk == k) {
                return Some(*rule);
            }

            kind = k.parent();
        }

        None
    }

    /// A style sheet scoping every rule under `selector`.
    #[allow(unused_must_use)]
    pub fn css(&self, selector: &str) -> String {
        let mut css = String::new();
        if let Some(background) = self.background {
            writeln!(&mut css, "{selector} {{ background: {background}; }}");
        }

        for &kind in TokenKind::ALL {
            if kind.css_class().is_empty() {
                continue;
            }

            let Some(rule) = self.rule(kind) else { continue };
            let mut decls = vec![];
            if let Some(color) = rule.color { decls.push(format!("color: {color}")); }
            if rule.bold { decls.push("font-weight: bold".into()); }
            if rule.italic { decls.push("font-style: italic".into()); }
            if let Some(border) = rule.border { decls.push(format!("border: 1px solid {border}")); }
            if decls.is_empty() {
                continue;
            }

            writeln!(&mut css, "{selector} .{} {{ {} }} /* {kind} */",
                kind.css_class(), decls.join("; "));
        }

        css
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup() {
        assert_eq!(Style::find("Default").unwrap().name, "default");
        assert_eq!(Style::for_setting(None).unwrap().name, "default");
        assert_eq!(Style::for_setting(Some("bw")).unwrap().name, "bw");
        assert!(Style::for_setting(Some("monokai")).is_err());
    }

    #[test]
    fn char_literals_inherit_string_color() {
        let rule = DEFAULT.rule(TokenKind::StringChar).unwrap();
        assert_eq!(rule.color, Some("#ba2121"));
        assert!(DEFAULT.rule(TokenKind::Name).is_none());
    }

    #[test]
    fn css_rules() {
        let css = DEFAULT.css(".highlight");
        assert!(css.starts_with(".highlight { background: #f8f8f8; }\n"));
        assert!(css.contains(".highlight .k { color: #008000; font-weight: bold } /* Keyword */\n"));
        assert!(css.contains(".highlight .sc { color: #ba2121 }"));
        assert!(!css.contains(".highlight .n "));

        let css = BW.css("pre");
        assert!(css.contains("pre .c { font-style: italic }"));
        assert!(!css.contains("color"));
    }
}
