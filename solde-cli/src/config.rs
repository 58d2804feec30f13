use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use solde_core::Layout;
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::{ensure_solde_home, solde_home};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub layout: Layout,
}

/// Explicit `--config` path, or `config.toml` under the solde home.
pub fn config_path(custom: Option<&Path>) -> Result<PathBuf> {
    match custom {
        Some(p) => Ok(p.to_path_buf()),
        None => Ok(solde_home()?.join("config.toml")),
    }
}

pub fn parse_config(s: &str) -> Result<Config> {
    toml::from_str(s).context("parse config.toml")
}

/// Load the effective configuration. A missing default file means defaults; a
/// missing explicit file is an error.
pub fn load_config(custom: Option<&Path>) -> Result<Config> {
    let p = config_path(custom)?;
    if !p.exists() {
        if custom.is_some() {
            bail!("config not found: {}", p.display());
        }
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s).with_context(|| format!("in {}", p.display()))
}

pub fn render_config(cfg: &Config) -> Result<String> {
    toml::to_string_pretty(cfg).context("serialize config")
}

pub fn save_config(cfg: &Config, path: &Path) -> Result<()> {
    let s = render_config(cfg)?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Write the default configuration unless a file is already there.
pub fn init_config(custom: Option<&Path>) -> Result<PathBuf> {
    let p = match custom {
        Some(p) => p.to_path_buf(),
        None => ensure_solde_home()?.join("config.toml"),
    };
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(p);
    }
    save_config(&Config::default(), &p)?;
    println!("Wrote {}", p.display());
    Ok(p)
}
