//! Commands that strip optional parts from a site.
//!
//! The configuration is rewritten through a `toml::Table`, so comments in
//! `sitecraft.toml` do not survive these commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use spdlog::{info, warn};
use toml::{Table, Value};

use sitecraft::config::Config;

fn load_table(cfg_path: &Path) -> Result<Table> {
    let data = fs::read_to_string(cfg_path)?;
    let table = data.parse::<Table>()
        .with_context(|| format!("Error parsing {}", cfg_path.display()))?;
    Ok(table)
}

fn save_table(cfg_path: &Path, table: &Table) -> Result<()> {
    fs::write(cfg_path, toml::to_string_pretty(table)?)?;
    Ok(())
}

fn remove_cms(table: &mut Table) -> bool {
    table.remove("cms").is_some()
}

fn remove_demo(table: &mut Table) -> bool {
    table.remove("demo").is_some()
}

fn disable_dark_mode(table: &mut Table) {
    let theme = table.entry("theme").or_insert_with(|| Value::Table(Table::new()));
    if let Value::Table(theme) = theme {
        theme.insert("dark_mode".to_string(), Value::Boolean(false));
    }
}

pub fn remove_cms_cmd(cfg_path: &Path) -> Result<()> {
    let mut table = load_table(cfg_path)?;
    if remove_cms(&mut table) {
        save_table(cfg_path, &table)?;
        info!("Removed the CMS admin from {}", cfg_path.display());
    } else {
        info!("No [cms] table in {}", cfg_path.display());
    }
    Ok(())
}

pub fn remove_dark_mode_cmd(cfg_path: &Path) -> Result<()> {
    let mut table = load_table(cfg_path)?;
    disable_dark_mode(&mut table);
    save_table(cfg_path, &table)?;
    info!("Dark mode disabled in {}", cfg_path.display());
    Ok(())
}

/// Deletes the starter content listed in `[demo].paths`
pub fn remove_demo_cmd(cfg_path: &Path, config: &Config) -> Result<()> {
    let Some(ref demo) = config.demo else {
        info!("No [demo] table in {}", cfg_path.display());
        return Ok(());
    };

    for path in demo.paths.iter() {
        if path.is_dir() {
            fs::remove_dir_all(path)?;
        } else if path.is_file() {
            fs::remove_file(path)?;
        } else {
            warn!("Demo path {} does not exist", path.display());
            continue;
        }
        info!("Removed {}", path.display());
    }

    let mut table = load_table(cfg_path)?;
    remove_demo(&mut table);
    save_table(cfg_path, &table)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use sitecraft::config::read_config;

    use super::*;

    const CONFIG: &str = r##"
[site]
name = "Tiny"
url = "https://tiny.example"
description = "A tiny site"

[paths]
content_dir = "content/blog"
pages_dir = "pages"
template_dir = "template"
public_dir = "public"
output_dir = "dist"

[[nav]]
label = "Blog"
href = "/blog/"

[cms]
repo = "tiny/site"

[demo]
paths = ["content/blog/hello.md", "content/blog/gallery", "content/blog/gone.md"]
"##;

    #[test]
    fn test_table_edits() {
        let mut table = CONFIG.parse::<Table>().unwrap();
        assert!(remove_cms(&mut table));
        assert!(!remove_cms(&mut table));

        disable_dark_mode(&mut table);
        assert_eq!(table["theme"]["dark_mode"].as_bool(), Some(false));
        assert_eq!(table["nav"][0]["label"].as_str(), Some("Blog"));
    }

    #[test]
    fn test_commands_rewrite_config() -> Result<()> {
        let dir = TempDir::new()?;
        let cfg_path = dir.path().join("sitecraft.toml");
        fs::write(&cfg_path, CONFIG)?;
        let blog = dir.path().join("content/blog");
        fs::create_dir_all(blog.join("gallery"))?;
        fs::write(blog.join("hello.md"), "hi")?;
        fs::write(blog.join("gallery/index.md"), "pics")?;
        fs::write(blog.join("keep.md"), "mine")?;

        remove_cms_cmd(&cfg_path)?;
        remove_dark_mode_cmd(&cfg_path)?;
        let config = read_config(&cfg_path)?;
        assert!(config.cms.is_none());
        assert!(!config.theme.dark_mode);

        remove_demo_cmd(&cfg_path, &config)?;
        assert!(!blog.join("hello.md").exists());
        assert!(!blog.join("gallery").exists());
        assert!(blog.join("keep.md").exists());

        let config = read_config(&cfg_path)?;
        assert!(config.demo.is_none());
        assert_eq!(config.nav.len(), 1);
        Ok(())
    }
}
