use std::collections::BTreeMap;
use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{Chainable, Result};

/// The conventional settings file name within a documentation source root.
pub const SETTINGS_FILE: &str = "docs.toml";

/// Build parameters for a documentation project.
///
/// Every key is optional in `docs.toml`; an absent key keeps its value from
/// [`Settings::default()`]. Keys this struct doesn't know are collected in
/// `unknown`, reported, and written back out unchanged.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub project: String,
    pub author: String,
    pub copyright: String,
    /// The full version, including alpha/beta/rc tags.
    pub release: String,
    pub extensions: Vec<String>,
    pub templates_path: Vec<String>,
    /// Globs, relative to the source root, of files and directories to skip.
    pub exclude_patterns: Vec<String>,
    pub html_theme: String,
    pub html_static_path: Vec<String>,
    /// The document holding the root table of contents.
    pub master_doc: String,
    /// The language used for code blocks without an explicit tag.
    pub highlight_language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pygments_style: Option<String>,
    #[serde(flatten)]
    pub unknown: BTreeMap<String, toml::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            project: String::new(),
            author: String::new(),
            copyright: String::new(),
            release: String::new(),
            extensions: vec![],
            templates_path: vec![],
            exclude_patterns: vec![],
            html_theme: "alabaster".into(),
            html_static_path: vec![],
            master_doc: "index".into(),
            highlight_language: "default".into(),
            pygments_style: None,
            unknown: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// The settings of the technetium documentation itself.
    pub fn technetium() -> Self {
        Settings {
            project: "technetium".into(),
            author: "Matt Torrence".into(),
            copyright: "2020, Matt Torrence".into(),
            release: "0.1.0".into(),
            templates_path: vec!["_templates".into()],
            exclude_patterns: vec!["_build".into(), "Thumbs.db".into(), ".DS_Store".into()],
            html_static_path: vec!["static".into()],
            highlight_language: crate::technetium::ALIASES[0].into(),
            ..Settings::default()
        }
    }

    pub fn from_toml(string: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(string)?;
        for key in settings.unknown.keys() {
            tracing::warn!(key = %key, "ignoring unknown settings key");
        }

        Ok(settings)
    }

    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let string = std::fs::read_to_string(path).chain_with(|| error! {
            "failed to read settings file",
            "path" => path.display(),
        })?;

        Self::from_toml(&string).chain_with(|| error! {
            "invalid settings file",
            "path" => path.display(),
        })
    }

    /// Reads `dir/docs.toml` if it exists, otherwise returns the defaults.
    pub fn discover<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let path = dir.as_ref().join(SETTINGS_FILE);
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "no settings file; using defaults");
            return Ok(Settings::default());
        }

        Self::read(&path)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// The short `X.Y` version derived from `release`.
    pub fn version(&self) -> &str {
        let mut dots = self.release.match_indices('.').map(|(i, _)| i);
        match (dots.next(), dots.next()) {
            (Some(_), Some(second)) => &self.release[..second],
            _ => &self.release,
        }
    }

    pub fn excluder(&self) -> Result<Excluder> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.exclude_patterns {
            let glob = Glob::new(pattern).chain_with(|| error! {
                "invalid exclude pattern",
                "pattern" => pattern,
            })?;

            builder.add(glob);
        }

        Ok(Excluder { globs: builder.build()? })
    }
}

/// Matches source-relative paths against `exclude_patterns`.
#[derive(Debug, Clone)]
pub struct Excluder {
    globs: GlobSet,
}

impl Excluder {
    /// Whether `path`, or any directory containing it, is excluded.
    pub fn is_excluded<P: AsRef<Path>>(&self, path: P) -> bool {
        let path = path.as_ref();
        let path = path.strip_prefix(".").unwrap_or(path);
        path.ancestors()
            .filter(|p| !p.as_os_str().is_empty())
            .any(|p| self.globs.is_match(p))
    }
}
