use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tcdoc::rayon::prelude::*;
use tcdoc::error::{Chainable, Result};
use tcdoc::grammar::LexOptions;
use tcdoc::html::Formatter;
use tcdoc::registry::Lexer;
use tcdoc::sources::{self, Source};
use tcdoc::{err, error};

use crate::config::Config;
use crate::flags;

impl Config {
    fn lexer_named(&self, name: &str) -> Result<Arc<Lexer>> {
        match self.registry.find_by_name(name) {
            Some(lexer) => Ok(lexer.clone()),
            None => err! {
                "no lexer registered under that name",
                "name" => name,
                "available" => self.registry.iter()
                    .flat_map(|l| l.alias_names().iter().cloned())
                    .collect::<Vec<_>>()
                    .join(", "),
            },
        }
    }

    fn sources(&self, paths: &[PathBuf], lang: Option<&str>) -> Result<Vec<Source>> {
        let excluder = self.settings.excluder()?;
        let forced = lang.map(|name| self.lexer_named(name)).transpose()?;

        let mut found = vec![];
        for path in paths {
            match &forced {
                Some(lexer) if path.is_file() => found.push(Source::single(path, lexer.clone())),
                _ => {
                    let discovered = sources::discover(path, &excluder, &self.registry)?;
                    if discovered.is_empty() {
                        tracing::warn!(path = %path.display(), "no highlightable sources found");
                    }

                    found.extend(discovered.into_iter().map(|mut source| {
                        if let Some(lexer) = &forced {
                            source.lexer = lexer.clone();
                        }

                        source
                    }));
                }
            }
        }

        Ok(found)
    }

    pub fn highlight(&self, flags: &flags::Highlight) -> Result<()> {
        let start = std::time::SystemTime::now();
        let paths = match flags.paths.is_empty() {
            true => vec![PathBuf::from(".")],
            false => flags.paths.clone(),
        };

        let sources = self.sources(&paths, flags.lang.as_deref())?;
        if let Some(output) = &flags.output {
            check_targets(output, &sources)?;
        }

        let formatter = Formatter { line_numbers: flags.line_numbers, wrap: true };
        let options = LexOptions { strict: flags.strict, ensure_newline: false };

        let rendered: Vec<(Source, String)> = sources.into_par_iter()
            .map(|source| {
                let code = source.read()?;
                let tokens = source.lexer.grammar().lex(&code, options)
                    .chain_with(|| error! {
                        "failed to highlight source",
                        "path" => source.path.display(),
                        "lexer" => source.lexer.name(),
                    })?;

                let html = formatter.format(tokens);
                Ok((source, html))
            })
            .collect::<Result<_>>()?;

        let Some(output) = &flags.output else {
            for (_, html) in rendered {
                println!("{html}");
            }

            return Ok(());
        };

        for (source, html) in &rendered {
            write(&target(output, source), html)?;
        }

        println!("highlighted {} files in {}ms", rendered.len(), elapsed_ms(start));
        Ok(())
    }

    pub fn tokens(&self, flags: &flags::Tokens) -> Result<()> {
        let lexer = match &flags.lang {
            Some(name) => self.lexer_named(name)?,
            None => match self.registry.find_by_filename(&flags.path) {
                Some(lexer) => lexer.clone(),
                None => return err! {
                    "no lexer matches the file name; pass `--lang`",
                    "path" => flags.path.display(),
                    "patterns" => self.registry.iter()
                        .flat_map(|l| l.filename_patterns().iter().cloned())
                        .collect::<Vec<_>>()
                        .join(", "),
                },
            },
        };

        let code = std::fs::read_to_string(&flags.path).chain_with(|| error! {
            "failed to read source file",
            "path" => flags.path.display(),
        })?;

        let mut stream = lexer.grammar().tokens(&code);
        let tokens: Vec<_> = stream.by_ref().collect();
        if flags.json {
            println!("{}", serde_json::to_string_pretty(&tokens)?);
        } else {
            for token in &tokens {
                println!("{:>5}..{:<5} {:<24} {:?}", token.start, token.end(), token.kind, token.text);
            }
        }

        if stream.depth() > 1 {
            let open = stream.open_states().collect::<Vec<_>>();
            tracing::warn!(?open, "input ended with open lexer states");
        }

        Ok(())
    }
}

fn target(output: &Path, source: &Source) -> PathBuf {
    let mut target = output.join(&source.relative).into_os_string();
    target.push(".html");
    target.into()
}

/// Two sources that map to the same output file would overwrite each other.
fn check_targets(output: &Path, sources: &[Source]) -> Result<()> {
    let mut seen: BTreeMap<PathBuf, &Path> = BTreeMap::new();
    for source in sources {
        let target = target(output, source);
        if let Some(first) = seen.insert(target.clone(), &source.path) {
            return err! {
                "two sources map to the same output file",
                "output" => target.display(),
                "first" => first.display(),
                "second" => source.path.display(),
            };
        }
    }

    Ok(())
}

pub fn write(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(path, contents).chain_with(|| error! {
        "failed to write output file",
        "path" => path.display(),
    })
}

pub fn elapsed_ms(start: std::time::SystemTime) -> u128 {
    start.elapsed().map_or(0, |d| d.as_millis())
}
