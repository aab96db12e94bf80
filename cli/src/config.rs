use std::path::Path;

use tcdoc::error::Result;
use tcdoc::registry::Registry;
use tcdoc::settings::Settings;

#[derive(Debug)]
pub struct Config {
    pub settings: Settings,
    pub registry: Registry,
}

impl Config {
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        let settings = match path {
            Some(path) => Settings::read(path)?,
            None => Settings::discover(".")?,
        };

        Ok(Config { settings, registry: Registry::standard()? })
    }
}
