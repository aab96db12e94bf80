use pulldown_cmark::{html, CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use crate::error::Result;
use crate::grammar::LexOptions;
use crate::html::Formatter;
use crate::registry::Registry;
use crate::settings::Settings;

/// Replaces every code block in a Markdown event stream with highlighted
/// HTML. Fenced blocks are selected by the label's prefix before any `,`;
/// unlabeled and indented blocks use the configured highlight language.
pub struct Highlighter<'r, I> {
    registry: &'r Registry,
    default_language: &'r str,
    formatter: Formatter,
    block: Option<CodeBlock>,
    inner: I,
}

struct CodeBlock {
    label: Option<String>,
    code: String,
}

impl<'r, I> Highlighter<'r, I> {
    pub fn new(inner: I, registry: &'r Registry, settings: &'r Settings) -> Self {
        Highlighter {
            registry,
            default_language: &settings.highlight_language,
            formatter: Formatter::default(),
            block: None,
            inner,
        }
    }

    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = formatter;
        self
    }

    fn highlight(&self, block: CodeBlock) -> String {
        let lexer = self.registry.select(block.label.as_deref(), self.default_language);
        let Some(lexer) = lexer else {
            if let Some(label) = &block.label {
                tracing::debug!(label = %label, "no lexer for code block; rendering as plain text");
            }

            return self.formatter.plain(&block.code);
        };

        match lexer.grammar().lex(&block.code, LexOptions::default()) {
            Ok(tokens) => self.formatter.format(tokens),
            Err(e) => {
                tracing::warn!(lexer = lexer.name(), "highlighting failed: {e}");
                self.formatter.plain(&block.code)
            }
        }
    }
}

impl<'a, I: Iterator<Item = Event<'a>>> Iterator for Highlighter<'_, I> {
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.inner.next()? {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let label = match kind {
                        CodeBlockKind::Fenced(label) => label.split_once(',')
                            .map(|(prefix, _)| prefix.to_string())
                            .or_else(|| Some(label.to_string())),
                        CodeBlockKind::Indented => None,
                    };

                    self.block = Some(CodeBlock { label, code: String::new() });
                }
                Event::Text(text) if self.block.is_some() => {
                    if let Some(block) = self.block.as_mut() {
                        block.code.push_str(&text);
                    }
                }
                Event::End(TagEnd::CodeBlock) if self.block.is_some() => {
                    let block = self.block.take()?;
                    return Some(Event::Html(self.highlight(block).into()));
                },
                ev => return Some(ev),
            }
        }
    }
}

/// Renders `input` as HTML with every code block highlighted.
pub fn render(input: &str, registry: &Registry, settings: &Settings) -> Result<String> {
    render_with(input, registry, settings, Formatter::default())
}

/// Like [`render()`], laying out code blocks with `formatter`.
pub fn render_with(
    input: &str,
    registry: &Registry,
    settings: &Settings,
    formatter: Formatter,
) -> Result<String> {
    let options = Options::all().difference(Options::ENABLE_SMART_PUNCTUATION);
    let parser = Parser::new_ext(input, options);
    let events = Highlighter::new(parser, registry, settings).with_formatter(formatter);

    let mut output = String::with_capacity(input.len() * 2);
    html::push_html(&mut output, events);
    Ok(output)
}
