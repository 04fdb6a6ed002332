//! config command - Show effective configuration and its sources

use anyhow::{Context as _, Result};
use serde::Serialize;

use super::Context;
use crate::core::config::{Config, PROJECT_CONFIG_FILE};

#[derive(Serialize)]
struct Effective {
    input_format: &'static str,
    kinds: Vec<&'static str>,
    export: EffectiveExport,
}

#[derive(Serialize)]
struct EffectiveExport {
    modules: bool,
    form_definitions: bool,
    strict: bool,
}

impl Effective {
    fn of(config: &Config) -> Self {
        Self {
            input_format: config.input_format().as_str(),
            kinds: config.kinds().into_iter().map(|k| k.as_str()).collect(),
            export: EffectiveExport {
                modules: config.modules(),
                form_definitions: config.form_definitions(),
                strict: config.strict(),
            },
        }
    }
}

/// Print the effective configuration as TOML.
pub fn show(ctx: &Context) -> Result<()> {
    let config = Config::load(Some(&ctx.cwd)).context("Failed to load config")?;
    let text = toml::to_string(&Effective::of(&config)).context("Failed to render config")?;
    print!("{text}");
    Ok(())
}

/// Print configuration file locations.
pub fn path(ctx: &Context) -> Result<()> {
    let config = Config::load(Some(&ctx.cwd)).context("Failed to load config")?;
    match config.global_config_loaded_from() {
        Some(path) => println!("global: {}", path.display()),
        None => {
            let default = Config::global_config_path().context("Failed to locate global config")?;
            println!("global: {} (not found)", default.display());
        }
    }
    match config.project_config_loaded_from() {
        Some(path) => println!("project: {}", path.display()),
        None => println!(
            "project: {} (not found)",
            ctx.cwd.join(PROJECT_CONFIG_FILE).display()
        ),
    }
    Ok(())
}
