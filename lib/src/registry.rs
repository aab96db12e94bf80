use std::path::Path;
use std::sync::Arc;

use globset::{Glob, GlobSet, GlobSetBuilder};
use rustc_hash::FxHashMap;

use crate::error::{Chainable, Result};
use crate::grammar::Grammar;

/// A grammar together with the names and file patterns that select it.
#[derive(Debug, Clone)]
pub struct Lexer {
    name: String,
    aliases: Vec<String>,
    filenames: Vec<String>,
    globs: GlobSet,
    grammar: Arc<Grammar>,
}

impl Lexer {
    pub fn new<N: Into<String>>(name: N, grammar: Grammar) -> Self {
        Lexer {
            name: name.into(),
            aliases: vec![],
            filenames: vec![],
            globs: GlobSet::empty(),
            grammar: Arc::new(grammar),
        }
    }

    pub fn aliases<I, S>(mut self, aliases: I) -> Self
        where I: IntoIterator<Item = S>, S: Into<String>
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Adds file name globs, such as `*.tc`, and recompiles the glob set.
    pub fn filenames<I, S>(mut self, patterns: I) -> Result<Self>
        where I: IntoIterator<Item = S>, S: Into<String>
    {
        self.filenames.extend(patterns.into_iter().map(Into::into));

        let mut builder = GlobSetBuilder::new();
        for pattern in &self.filenames {
            let glob = Glob::new(pattern).chain_with(|| error! {
                "invalid lexer filename pattern",
                "lexer" => &self.name,
                "pattern" => pattern,
            })?;

            builder.add(glob);
        }

        self.globs = builder.build()?;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alias_names(&self) -> &[String] {
        &self.aliases
    }

    pub fn filename_patterns(&self) -> &[String] {
        &self.filenames
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Whether `path`'s file name matches one of this lexer's patterns.
    pub fn matches_filename(&self, path: &Path) -> bool {
        path.file_name().map_or(false, |name| self.globs.is_match(name))
    }
}

/// Lexers addressable by alias and by file name.
///
/// There is no process-wide registry: callers own a `Registry`, populate it
/// with [`Registry::register()`] or start from [`Registry::standard()`], and
/// share it read-only afterwards.
#[derive(Debug, Default, Clone)]
pub struct Registry {
    lexers: Vec<Arc<Lexer>>,
    aliases: FxHashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    /// A registry holding every lexer this crate ships.
    pub fn standard() -> Result<Self> {
        let mut registry = Registry::new();
        registry.register(crate::technetium::lexer()?)?;
        Ok(registry)
    }

    /// Registers `lexer` under its name and aliases, all lowercased. Fails
    /// without modifying `self` if any of them is already taken.
    pub fn register(&mut self, lexer: Lexer) -> Result<()> {
        let mut keys: Vec<String> = std::iter::once(lexer.name())
            .chain(lexer.alias_names().iter().map(|s| s.as_str()))
            .map(|s| s.to_ascii_lowercase())
            .collect();

        keys.sort();
        keys.dedup();
        for key in &keys {
            if let Some(&existing) = self.aliases.get(key) {
                return err! {
                    "lexer alias is already registered",
                    "alias" => key,
                    "registered to" => self.lexers[existing].name(),
                    "rejected lexer" => lexer.name(),
                };
            }
        }

        let index = self.lexers.len();
        for key in keys {
            self.aliases.insert(key, index);
        }

        tracing::debug!(lexer = lexer.name(), aliases = ?lexer.alias_names(), "registered lexer");
        self.lexers.push(Arc::new(lexer));
        Ok(())
    }

    /// Looks up a lexer by name or alias, ignoring ASCII case.
    pub fn find_by_name(&self, name: &str) -> Option<&Arc<Lexer>> {
        let name = name.trim();
        let index = match self.aliases.get(name) {
            Some(index) => *index,
            None => *self.aliases.get(&name.to_ascii_lowercase())?,
        };

        Some(&self.lexers[index])
    }

    /// The first registered lexer whose filename patterns match `path`.
    pub fn find_by_filename<P: AsRef<Path>>(&self, path: P) -> Option<&Arc<Lexer>> {
        let path = path.as_ref();
        self.lexers.iter().find(|lexer| lexer.matches_filename(path))
    }

    /// Selects a lexer for a code block: by `label` if given, falling back to
    /// `default` (typically the configured highlight language).
    pub fn select(&self, label: Option<&str>, default: &str) -> Option<&Arc<Lexer>> {
        let label = label.map(str::trim).filter(|l| !l.is_empty());
        let lexer = match label {
            Some(label) => self.find_by_name(label),
            None => self.find_by_name(default),
        };

        tracing::trace!(?label, default, found = ?lexer.map(|l| l.name()), "selected lexer");
        lexer
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Lexer>> {
        self.lexers.iter()
    }

    pub fn len(&self) -> usize {
        self.lexers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lexers.is_empty()
    }
}

#[cfg(test)]
static_assertions::assert_impl_all!(Registry: Send, Sync);
