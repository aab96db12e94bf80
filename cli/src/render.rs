use tcdoc::error::{Chainable, Result};
use tcdoc::html::Formatter;
use tcdoc::style::Style;
use tcdoc::{error, markdown};

use crate::config::Config;
use crate::flags;
use crate::highlight::{elapsed_ms, write};

impl Config {
    pub fn render(&self, flags: &flags::Render) -> Result<()> {
        let start = std::time::SystemTime::now();
        let input = std::fs::read_to_string(&flags.input).chain_with(|| error! {
            "failed to read markdown document",
            "path" => flags.input.display(),
        })?;

        let formatter = Formatter { line_numbers: flags.line_numbers, ..Formatter::default() };
        let html = markdown::render_with(&input, &self.registry, &self.settings, formatter)
            .chain_with(|| error! {
                "markdown rendering failed",
                "path" => flags.input.display(),
            })?;

        match &flags.output {
            Some(output) => {
                write(output, &html)?;
                println!("render time: {}ms", elapsed_ms(start));
            }
            None => print!("{html}"),
        }

        Ok(())
    }

    pub fn style(&self, flags: &flags::Style) -> Result<()> {
        let name = flags.name.as_deref().or(self.settings.pygments_style.as_deref());
        let style = Style::for_setting(name)?;
        let selector = flags.selector.as_deref().unwrap_or(".highlight");
        print!("{}", style.css(selector));
        Ok(())
    }

    pub fn show_settings(&self) -> Result<()> {
        print!("{}", self.settings.to_toml()?);
        println!("# version = {:?}", self.settings.version());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use tcdoc::registry::Registry;
    use tcdoc::settings::Settings;

    #[test]
    fn render_writes_highlighted_document() {
        let dir = std::env::temp_dir().join(format!("tcdoc-cli-{}-render", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);

        let output = dir.join("site/index.html");
        let config = Config { settings: Settings::technetium(), registry: Registry::standard().unwrap() };
        let flags = flags::Render {
            input: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../docsource/index.md")),
            line_numbers: true,
            output: Some(output.clone()),
        };

        config.render(&flags).unwrap();
        let html = std::fs::read_to_string(&output).unwrap();
        assert!(html.contains("<h1>technetium</h1>"));
        assert!(html.contains(r#"<pre class="line-nums">1"#));
        assert!(html.contains(r#"<span class="k">func</span>"#));

        let missing = flags::Render { input: dir.join("missing.md"), ..flags };
        let error = config.render(&missing).unwrap_err();
        assert_eq!(error.message(), "failed to read markdown document");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
