use std::fs;
use std::path::Path;

use anyhow::{bail, Result};
use spdlog::info;

use sitecraft::config::read_config;
use sitecraft::util::os_helper::get_name;

use crate::decompress::decompress_files;
use crate::CFG_FILE_NAME;

const STARTER_AUTHOR_LINE: &str = "author = \"The Team\"";

/// Puts the local user in as the site author
fn personalize_config(config_data: &str, author: &str) -> String {
    let author_line = format!("author = {}", toml::Value::String(author.to_string()));
    config_data.replacen(STARTER_AUTHOR_LINE, &author_line, 1)
}

pub fn bootstrap_cmd(out_dir: &Path) -> Result<()> {
    if out_dir.join(CFG_FILE_NAME).exists() {
        bail!("{} already holds a site ({} exists)", out_dir.display(), CFG_FILE_NAME);
    }
    fs::create_dir_all(out_dir)?;
    let out_dir = fs::canonicalize(out_dir)?;

    decompress_files(&out_dir)?;

    let cfg_path = out_dir.join(CFG_FILE_NAME);
    let config_data = fs::read_to_string(&cfg_path)?;
    fs::write(&cfg_path, personalize_config(&config_data, &get_name()))?;

    // The starter must always load
    read_config(&cfg_path)?;

    info!("Created a new site in {}", out_dir.display());
    println!("Next steps:");
    println!("  cd {}", out_dir.display());
    println!("  sitecraft dev");
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_personalize_config() {
        let cfg = "[site]\nname = \"x\"\nauthor = \"The Team\"\n";
        assert_eq!(personalize_config(cfg, "Dana Smith"), "[site]\nname = \"x\"\nauthor = \"Dana Smith\"\n");
    }

    #[test]
    fn test_bootstrap_new_site() -> Result<()> {
        let dir = TempDir::new()?;
        let site_dir = dir.path().join("my-site");
        bootstrap_cmd(&site_dir)?;

        let config = read_config(&site_dir.join(CFG_FILE_NAME))?;
        assert_eq!(config.paths.content_dir, fs::canonicalize(&site_dir)?.join("content/blog"));
        assert!(config.cms.is_some());

        assert!(bootstrap_cmd(&site_dir).is_err());
        Ok(())
    }
}
