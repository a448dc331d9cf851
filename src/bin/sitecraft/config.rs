use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use spdlog::debug;

use sitecraft::config::{read_config, Config};

use crate::CFG_FILE_NAME;

/// The current directory, then the executable's directory, then the user
/// config directory.
fn find_config_path() -> Option<PathBuf> {
    let mut candidates = vec![];
    if let Ok(cur_dir) = env::current_dir() {
        candidates.push(cur_dir.join(CFG_FILE_NAME));
    }
    if let Some(exe_dir) = env::current_exe().ok().and_then(|exe| exe.parent().map(|p| p.to_path_buf())) {
        candidates.push(exe_dir.join(CFG_FILE_NAME));
    }
    if let Some(cfg_dir) = dirs::config_dir() {
        candidates.push(cfg_dir.join("sitecraft").join(CFG_FILE_NAME));
    }

    candidates.into_iter().find(|path| path.is_file())
}

pub(crate) fn open_config(cfg_path: Option<PathBuf>) -> Result<(PathBuf, Config)> {
    let config_path = match cfg_path.or_else(find_config_path) {
        Some(path) => path,
        None => return Err(anyhow!("Could not find {}. Run `sitecraft init --out-dir <dir>` to create a site", CFG_FILE_NAME)),
    };

    debug!("Reading config from {}", config_path.display());
    let config = read_config(&config_path)
        .with_context(|| format!("Could not load {}", config_path.display()))?;

    Ok((config_path, config))
}
