//! Documentation settings and syntax highlighting for technetium.
//!
//! # Overview
//!
//! `tcdoc` provides the pieces a documentation build needs to present
//! technetium code:
//!
//!   * [`Settings`](settings::Settings): the project's build parameters,
//!     read once from `docs.toml` and immutable afterwards.
//!
//!   * [`Grammar`](grammar::Grammar): a regex-driven lexer engine. Rules are
//!     grouped into named states and tried in order; the first rule matching
//!     at the current position wins and may push or pop states.
//!
//!   * [`technetium`]: the rule table for technetium source.
//!
//!   * [`Registry`](registry::Registry): lexers addressable by alias and file
//!     name, populated by explicit registration.
//!
//!   * [`sources`]: finds the files a registry can highlight, honoring the
//!     configured exclude patterns.
//!
//!   * [`html`], [`style`] and [`markdown`]: render token streams as classed
//!     HTML, generate the matching style sheet, and highlight code blocks in
//!     Markdown documents.
//!
//! ```
//! use tcdoc::registry::Registry;
//! use tcdoc::grammar::LexOptions;
//! use tcdoc::token::TokenKind;
//!
//! let registry = Registry::standard().unwrap();
//! let lexer = registry.find_by_name("tc").unwrap();
//! let tokens = lexer.grammar().lex("x -> 1", LexOptions::default()).unwrap();
//! assert_eq!(tokens[2].kind, TokenKind::Operator);
//! assert_eq!(tokens[2].text, "->");
//! ```

#[macro_use]
pub mod error;
pub mod token;
pub mod grammar;
pub mod technetium;
pub mod registry;
pub mod settings;
pub mod sources;
pub mod html;
pub mod style;
pub mod markdown;

pub use rayon;
