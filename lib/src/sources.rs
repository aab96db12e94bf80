use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::error::Result;
use crate::registry::{Lexer, Registry};
use crate::settings::Excluder;

/// A source file with the lexer selected for it by file name.
#[derive(Debug, Clone)]
pub struct Source {
    pub path: PathBuf,
    /// `path` relative to the search root.
    pub relative: PathBuf,
    pub lexer: Arc<Lexer>,
}

impl Source {
    /// A source named on its own. `relative` keeps the path's directories so
    /// that `a/main.tc` and `b/main.tc` stay distinct; root, prefix, `.`
    /// and `..` components are dropped.
    pub fn single(path: &Path, lexer: Arc<Lexer>) -> Source {
        let relative = path.components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part),
                _ => None,
            })
            .collect();

        Source { path: path.to_path_buf(), relative, lexer }
    }

    pub fn read(&self) -> Result<String> {
        std::fs::read_to_string(&self.path).map_err(|e| error! {
            "failed to read source file",
            "path" => self.path.display(),
            e,
        })
    }
}

/// Finds every file under `root` that some registered lexer claims by file
/// name, skipping excluded paths. Excluded directories aren't descended into.
/// If `root` is itself a file, it is returned alone when a lexer claims it.
pub fn discover(root: &Path, excluder: &Excluder, registry: &Registry) -> Result<Vec<Source>> {
    if root.is_file() {
        let source = registry.find_by_filename(root)
            .map(|lexer| Source::single(root, lexer.clone()));

        return Ok(source.into_iter().collect());
    }

    if !root.is_dir() {
        return err!("source root does not exist", "path" => root.display());
    }

    let prune = Arc::new((root.to_path_buf(), excluder.clone()));
    let walker = jwalk::WalkDir::new(root)
        .follow_links(true)
        .sort(true)
        .process_read_dir(move |_, _, _, children| {
            let (root, excluder) = &*prune;
            children.retain(|child| match child {
                Ok(entry) => entry.path()
                    .strip_prefix(root)
                    .map_or(true, |relative| !excluder.is_excluded(relative)),
                Err(_) => true,
            });
        });

    let mut sources = vec![];
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("skipping unreadable entry: {e}");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if let Some(lexer) = registry.find_by_filename(&path) {
            let relative = path.strip_prefix(root).map(Path::to_path_buf).unwrap_or_else(|_| path.clone());
            sources.push(Source { relative, lexer: lexer.clone(), path });
        }
    }

    tracing::debug!(root = %root.display(), found = sources.len(), "discovered sources");
    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tcdoc-{}-{name}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn walks_and_prunes() {
        let root = scratch("walk");
        for file in ["a.tc", "notes.md", "lib/b.tc", "_build/stale.tc", "Thumbs.db"] {
            let path = root.join(file);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, "x = 1\n").unwrap();
        }

        let registry = Registry::standard().unwrap();
        let excluder = Settings::technetium().excluder().unwrap();
        let sources = discover(&root, &excluder, &registry).unwrap();

        let mut found: Vec<_> = sources.iter().map(|s| s.relative.clone()).collect();
        found.sort();
        assert_eq!(found, [PathBuf::from("a.tc"), PathBuf::from("lib/b.tc")]);
        assert!(sources.iter().all(|s| s.lexer.name() == "Technetium"));
        assert_eq!(sources[0].read().unwrap(), "x = 1\n");

        let single = discover(&root.join("lib/b.tc"), &excluder, &registry).unwrap();
        assert_eq!(single.len(), 1);
        assert!(single[0].relative.ends_with("lib/b.tc"));
        assert!(single[0].relative.is_relative());
        assert!(discover(&root.join("notes.md"), &excluder, &registry).unwrap().is_empty());
        assert!(discover(&root.join("missing"), &excluder, &registry).is_err());

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn single_sources_keep_directories() {
        let lexer = Registry::standard().unwrap().find_by_name("tc").unwrap().clone();

        let a = Source::single(Path::new("a/main.tc"), lexer.clone());
        let b = Source::single(Path::new("./b/main.tc"), lexer.clone());
        assert_eq!(a.relative, Path::new("a/main.tc"));
        assert_eq!(b.relative, Path::new("b/main.tc"));
        assert_eq!(b.path, Path::new("./b/main.tc"));

        let up = Source::single(Path::new("../lib/x.tc"), lexer.clone());
        assert_eq!(up.relative, Path::new("lib/x.tc"));

        let absolute = Source::single(Path::new("/srv/docs/y.tc"), lexer);
        assert_eq!(absolute.relative, Path::new("srv/docs/y.tc"));
    }
}
