use std::fmt::Write;

use pulldown_cmark_escape::escape_html;

use crate::token::{Token, TokenKind};

/// Renders tokens as HTML spans classed by [`TokenKind::css_class()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Formatter {
    /// Emit a line-number gutter next to the code.
    pub line_numbers: bool,
    /// Wrap the output in `<div class="highlight"><pre>`.
    pub wrap: bool,
}

impl Default for Formatter {
    fn default() -> Self {
        Formatter { line_numbers: false, wrap: true }
    }
}

impl Formatter {
    /// Renders the spans only, merging adjacent tokens of the same kind.
    pub fn spans<'t, I>(&self, tokens: I) -> String
        where I: IntoIterator<Item = Token<'t>>
    {
        let mut html = String::new();
        let mut pending: Option<(TokenKind, String)> = None;
        for token in tokens {
            match pending {
                Some((kind, ref mut text)) if kind == token.kind => text.push_str(token.text),
                _ => {
                    if let Some((kind, text)) = pending.take() {
                        push_span(&mut html, kind, &text);
                    }

                    pending = Some((token.kind, token.text.to_string()));
                }
            }
        }

        if let Some((kind, text)) = pending {
            push_span(&mut html, kind, &text);
        }

        html
    }

    pub fn format<'t, I>(&self, tokens: I) -> String
        where I: IntoIterator<Item = Token<'t>>
    {
        let mut lines = 0;
        let mut ends_with_newline = false;
        let tokens = tokens.into_iter().inspect(|t| {
            lines += memchr::memchr_iter(b'\n', t.text.as_bytes()).count();
            ends_with_newline = t.text.ends_with('\n');
        });

        let code = self.spans(tokens);
        if !ends_with_newline && !code.is_empty() {
            lines += 1;
        }

        match (self.wrap, self.line_numbers) {
            (false, _) => code,
            (true, false) => format!("<div class=\"highlight\"><pre>{code}</pre></div>"),
            (true, true) => code_div(lines, &code),
        }
    }

    /// Escapes `code` without highlighting, in the same layout as
    /// [`Formatter::format()`].
    pub fn plain(&self, code: &str) -> String {
        self.format(std::iter::once(Token::new(TokenKind::Text, 0, code)))
    }
}

fn push_span(html: &mut String, kind: TokenKind, text: &str) {
    if kind.is_plain() {
        let _ = escape_html(&mut *html, text);
        return;
    }

    let _ = write!(html, "<span class=\"{}\">", kind.css_class());
    let _ = escape_html(&mut *html, text);
    html.push_str("</span>");
}

/// Lays `code` out beside a gutter numbering its `lines`.
fn code_div(lines: usize, code: &str) -> String {
    let gutter = (1..=lines).map(|n| n.to_string()).collect::<Vec<_>>().join("\n");
    format!(
        "<div class=\"highlight\" style=\"display: flex;\">\
            <pre class=\"line-nums\">{gutter}</pre>\
            <pre class=\"code\">{code}</pre>\
        </div>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind::*;

    #[test]
    fn merges_and_escapes() {
        let tokens = vec![
            Token::new(Keyword, 0, "if"),
            Token::new(Whitespace, 2, " "),
            Token::new(Name, 3, "a"),
            Token::new(Operator, 4, "<"),
            Token::new(String, 5, "\""),
            Token::new(String, 6, "x&y"),
            Token::new(String, 9, "\""),
        ];

        let spans = Formatter::default().spans(tokens);
        assert_eq!(spans, concat!(
            r#"<span class="k">if</span> <span class="n">a</span>"#,
            r#"<span class="o">&lt;</span><span class="s">&quot;x&amp;y&quot;</span>"#,
        ));
    }

    #[test]
    fn wrapped_layouts() {
        let tokens = || vec![Token::new(Name, 0, "a"), Token::new(Whitespace, 1, "\n"), Token::new(Name, 2, "b")];

        let plain = Formatter::default().format(tokens());
        assert_eq!(plain, "<div class=\"highlight\"><pre><span class=\"n\">a</span>\n<span class=\"n\">b</span></pre></div>");

        let numbered = Formatter { line_numbers: true, wrap: true }.format(tokens());
        assert_eq!(numbered, concat!(
            "<div class=\"highlight\" style=\"display: flex;\">",
            "<pre class=\"line-nums\">1\n2</pre>",
            "<pre class=\"code\"><span class=\"n\">a</span>\n<span class=\"n\">b</span></pre>",
            "</div>",
        ));

        let empty = Formatter { line_numbers: true, wrap: true }.format(vec![]);
        assert!(empty.contains("<pre class=\"line-nums\"></pre><pre class=\"code\"></pre>"));

        let bare = Formatter { line_numbers: true, wrap: false }.format(tokens());
        assert!(!bare.contains("<div"));
    }

    #[test]
    fn plain_text_is_escaped() {
        let html = Formatter { line_numbers: false, wrap: false }.plain("<b>\n");
        assert_eq!(html, "&lt;b&gt;\n");
    }
}
