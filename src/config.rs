use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::Deserialize;

use crate::nav::{validate_entries, NavEntry};
use crate::util::toml_date::TomlDate;

#[derive(Deserialize, Debug, Clone)]
pub struct SocialLink {
    pub name: String,
    pub url: String,
}

/// Business information shown across the site.
#[derive(Deserialize, Debug, Clone)]
pub struct Site {
    pub name: String,
    pub url: String,
    pub description: String,
    #[serde(default = "default_language")]
    pub language: String,
    pub author: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub founded: Option<TomlDate>,
    #[serde(default)]
    pub socials: Vec<SocialLink>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Seo {
    /// `{title}` and `{site}` are replaced when building the `<title>` tag
    pub title_template: String,
    pub default_image: Option<String>,
    pub twitter_handle: Option<String>,
    pub locale: String,
    pub keywords: Vec<String>,
}

impl Default for Seo {
    fn default() -> Self {
        Seo {
            title_template: "{title} | {site}".to_string(),
            default_image: None,
            twitter_handle: None,
            locale: "en_US".to_string(),
            keywords: vec![],
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct Paths {
    pub content_dir: PathBuf,
    pub pages_dir: PathBuf,
    pub template_dir: PathBuf,
    pub public_dir: PathBuf,
    pub output_dir: PathBuf,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Build {
    pub page_size: u32,
    pub home_post_count: usize,
    pub include_drafts: bool,
    pub rss_item_count: usize,
    pub index_base_name: String,
}

impl Default for Build {
    fn default() -> Self {
        Build {
            page_size: 6,
            home_post_count: 3,
            include_drafts: false,
            rss_item_count: 20,
            index_base_name: "index".to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ThemeConfig {
    pub dark_mode: bool,
    pub storage_key: String,
    pub dark_class: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        ThemeConfig {
            dark_mode: true,
            storage_key: crate::theme::DEFAULT_STORAGE_KEY.to_string(),
            dark_class: crate::theme::DEFAULT_DARK_CLASS.to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct Server {
    pub address: String,
    pub port: u16,
}

impl Default for Server {
    fn default() -> Self {
        Server {
            address: "127.0.0.1".to_string(),
            port: 4321,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Copy, Clone)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Settings for the Decap CMS admin page
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Cms {
    pub backend: String,
    pub repo: Option<String>,
    pub branch: String,
    pub media_folder: String,
    pub public_folder: String,
    pub local_backend: bool,
    pub script_url: String,
}

impl Default for Cms {
    fn default() -> Self {
        Cms {
            backend: "git-gateway".to_string(),
            repo: None,
            branch: "main".to_string(),
            media_folder: "public/images".to_string(),
            public_folder: "/images".to_string(),
            local_backend: false,
            script_url: "https://unpkg.com/decap-cms@^3.0.0/dist/decap-cms.js".to_string(),
        }
    }
}

/// Starter content shipped with a fresh site, removable in one go
#[derive(Deserialize, Debug, Clone, Default)]
pub struct Demo {
    #[serde(default)]
    pub paths: Vec<PathBuf>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub site: Site,
    #[serde(default)]
    pub seo: Seo,
    pub paths: Paths,
    #[serde(default)]
    pub nav: Vec<NavEntry>,
    #[serde(default)]
    pub build: Build,
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub server: Server,
    pub log: Option<Log>,
    pub cms: Option<Cms>,
    pub demo: Option<Demo>,
    /// Directory holding the configuration file
    #[serde(skip)]
    pub root_dir: PathBuf,
}

fn default_language() -> String {
    "en".to_string()
}

fn parse_path(path: PathBuf, base_dir: &Path) -> PathBuf {
    let str_path = path.to_string_lossy();
    let path = if str_path.starts_with("${exe_dir}") {
        match env::current_exe().ok().and_then(|exe| exe.parent().map(|p| p.to_path_buf())) {
            Some(exe_dir) => PathBuf::from(str_path.replace("${exe_dir}", &exe_dir.to_string_lossy())),
            None => path,
        }
    } else if str_path.starts_with("${config_dir}") {
        PathBuf::from(str_path.replace("${config_dir}", &base_dir.to_string_lossy()))
    } else {
        path
    };

    if path.is_relative() {
        base_dir.join(path)
    } else {
        path
    }
}

/// Parses configuration text. Relative paths are resolved against `base_dir`.
pub fn parse_config(cfg_content: &str, base_dir: &Path) -> io::Result<Config> {
    let mut cfg: Config = match toml::from_str::<Config>(cfg_content) {
        Ok(cfg) => cfg,
        Err(e) => return Err(io::Error::new(
            ErrorKind::InvalidData, format!("Error parsing configuration file: {}", e))),
    };

    if let Err(e) = validate_entries(&cfg.nav) {
        return Err(io::Error::new(ErrorKind::InvalidData, format!("Invalid navigation: {}", e)));
    }

    cfg.paths = Paths {
        content_dir: parse_path(cfg.paths.content_dir, base_dir),
        pages_dir: parse_path(cfg.paths.pages_dir, base_dir),
        template_dir: parse_path(cfg.paths.template_dir, base_dir),
        public_dir: parse_path(cfg.paths.public_dir, base_dir),
        output_dir: parse_path(cfg.paths.output_dir, base_dir),
    };

    if let Some(ref mut demo) = cfg.demo {
        demo.paths = std::mem::take(&mut demo.paths).into_iter()
            .map(|p| parse_path(p, base_dir))
            .collect();
    }

    cfg.root_dir = base_dir.to_path_buf();

    if cfg.build.page_size == 0 {
        return Err(io::Error::new(ErrorKind::InvalidData, "build.page_size must be greater than 0"));
    }

    Ok(cfg)
}

pub fn read_config(cfg_path: &Path) -> io::Result<Config> {
    let cfg_content = match fs::read_to_string(cfg_path) {
        Ok(content) => content,
        Err(e) => return Err(io::Error::new(e.kind(), format!("Error opening configuration file {}: {}", cfg_path.display(), e))),
    };

    let base_dir = match cfg_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => env::current_dir()?,
    };

    parse_config(&cfg_content, &base_dir)
}
