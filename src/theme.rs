//! Light/dark theme preference.
//!
//! The browser keeps the preference in `localStorage` and mirrors it as a
//! class on `<html>`. [`ThemeToggle`] models that contract over a
//! [`ThemeStorage`], and [`client_script`] emits the browser side of it.

use std::collections::{BTreeSet, HashMap};
use std::fmt::{Display, Formatter, Write};
use std::str::FromStr;

pub const DEFAULT_STORAGE_KEY: &str = "theme";
pub const DEFAULT_DARK_CLASS: &str = "dark";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(&self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl Display for Theme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            x => Err(format!("Unknown theme {}", x)),
        }
    }
}

/// Key/value storage with `localStorage` semantics
pub trait ThemeStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

#[derive(Default, Debug)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl ThemeStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.items.insert(key.to_string(), value.to_string());
    }
}

/// Class list of the document root element
#[derive(Default, Debug, PartialEq)]
pub struct DocumentRoot {
    classes: BTreeSet<String>,
}

impl DocumentRoot {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn toggle_class(&mut self, class: &str, force: bool) {
        if force {
            self.classes.insert(class.to_string());
        } else {
            self.classes.remove(class);
        }
    }
}

#[derive(Clone, Debug)]
pub struct ThemeOptions {
    pub storage_key: String,
    pub dark_class: String,
}

impl Default for ThemeOptions {
    fn default() -> Self {
        ThemeOptions {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            dark_class: DEFAULT_DARK_CLASS.to_string(),
        }
    }
}

pub struct ThemeToggle<S: ThemeStorage> {
    storage: S,
    root: DocumentRoot,
    options: ThemeOptions,
}

impl<S: ThemeStorage> ThemeToggle<S> {
    pub fn new(storage: S, options: ThemeOptions) -> Self {
        let mut toggle = ThemeToggle {
            storage,
            root: DocumentRoot::default(),
            options,
        };
        // Page load: the root reflects whatever was persisted
        let theme = toggle.get_theme();
        toggle.apply(theme);
        toggle
    }

    /// Persisted theme. Empty or unknown values read as light.
    pub fn get_theme(&self) -> Theme {
        self.storage.get(&self.options.storage_key)
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.storage.set(&self.options.storage_key, theme.as_str());
        self.apply(theme);
    }

    pub fn toggle(&mut self) -> Theme {
        let theme = self.get_theme().toggled();
        self.set_theme(theme);
        theme
    }

    pub fn root(&self) -> &DocumentRoot {
        &self.root
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn apply(&mut self, theme: Theme) {
        self.root.toggle_class(&self.options.dark_class, theme == Theme::Dark);
    }
}

fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// Browser implementation of the toggle. Elements with
/// `data-theme-toggle` flip the theme on click.
pub fn client_script(options: &ThemeOptions) -> String {
    let mut buf = String::new();
    let key = js_string(&options.storage_key);
    let class = js_string(&options.dark_class);

    let _ = writeln!(&mut buf, "const THEME_KEY = {};", key);
    let _ = writeln!(&mut buf, "const DARK_CLASS = {};", class);
    // storage access throws when the browser blocks it
    let _ = writeln!(&mut buf, "function getTheme() {{");
    let _ = writeln!(&mut buf, "  try {{");
    let _ = writeln!(&mut buf, "    const value = window.localStorage.getItem(THEME_KEY);");
    let _ = writeln!(&mut buf, "    return value === \"dark\" ? \"dark\" : \"light\";");
    let _ = writeln!(&mut buf, "  }} catch (e) {{");
    let _ = writeln!(&mut buf, "    return document.documentElement.classList.contains(DARK_CLASS) ? \"dark\" : \"light\";");
    let _ = writeln!(&mut buf, "  }}");
    let _ = writeln!(&mut buf, "}}");
    let _ = writeln!(&mut buf, "function setTheme(value) {{");
    let _ = writeln!(&mut buf, "  const theme = value === \"dark\" ? \"dark\" : \"light\";");
    let _ = writeln!(&mut buf, "  try {{");
    let _ = writeln!(&mut buf, "    window.localStorage.setItem(THEME_KEY, theme);");
    let _ = writeln!(&mut buf, "  }} catch (e) {{}}");
    let _ = writeln!(&mut buf, "  document.documentElement.classList.toggle(DARK_CLASS, theme === \"dark\");");
    let _ = writeln!(&mut buf, "}}");
    let _ = writeln!(&mut buf, "function bindThemeToggles() {{");
    let _ = writeln!(&mut buf, "  document.documentElement.classList.toggle(DARK_CLASS, getTheme() === \"dark\");");
    let _ = writeln!(&mut buf, "  document.querySelectorAll(\"[data-theme-toggle]\").forEach((button) => {{");
    let _ = writeln!(&mut buf, "    if (button.dataset.themeBound) return;");
    let _ = writeln!(&mut buf, "    button.dataset.themeBound = \"1\";");
    let _ = writeln!(&mut buf, "    button.addEventListener(\"click\", () => setTheme(getTheme() === \"dark\" ? \"light\" : \"dark\"));");
    let _ = writeln!(&mut buf, "  }});");
    let _ = writeln!(&mut buf, "}}");

    buf
}

/// Inline snippet for `<head>` so the first paint already has the right theme
pub fn head_snippet(options: &ThemeOptions) -> String {
    format!(
        "(function(){{var t=null;try{{t=window.localStorage.getItem({});}}catch(e){{}}document.documentElement.classList.toggle({},t===\"dark\");}})();",
        js_string(&options.storage_key),
        js_string(&options.dark_class),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toggle() -> ThemeToggle<MemoryStorage> {
        ThemeToggle::new(MemoryStorage::default(), ThemeOptions::default())
    }

    #[test]
    fn test_default_is_light() {
        let toggle = toggle();
        assert_eq!(toggle.get_theme(), Theme::Light);
        assert!(!toggle.root().has_class("dark"));
    }

    #[test]
    fn test_set_and_get() {
        let mut toggle = toggle();
        toggle.set_theme(Theme::Dark);
        assert_eq!(toggle.get_theme(), Theme::Dark);
        assert!(toggle.root().has_class("dark"));
        assert_eq!(toggle.storage().get("theme"), Some("dark".to_string()));

        toggle.set_theme(Theme::Light);
        assert_eq!(toggle.get_theme(), Theme::Light);
        assert!(!toggle.root().has_class("dark"));
        assert_eq!(toggle.storage().get("theme"), Some("light".to_string()));
    }

    #[test]
    fn test_set_is_idempotent() {
        let mut toggle = toggle();
        toggle.set_theme(Theme::Dark);
        toggle.set_theme(Theme::Dark);
        assert_eq!(toggle.get_theme(), Theme::Dark);
        assert!(toggle.root().has_class("dark"));

        let mut expected = DocumentRoot::default();
        expected.toggle_class("dark", true);
        assert_eq!(toggle.root(), &expected);
    }

    #[test]
    fn test_toggle() {
        let mut toggle = toggle();
        assert_eq!(toggle.toggle(), Theme::Dark);
        assert_eq!(toggle.toggle(), Theme::Light);
    }

    #[test]
    fn test_unknown_stored_value_reads_light() {
        let mut storage = MemoryStorage::default();
        storage.set("theme", "sepia");
        let toggle = ThemeToggle::new(storage, ThemeOptions::default());
        assert_eq!(toggle.get_theme(), Theme::Light);
    }

    #[test]
    fn test_persisted_dark_applies_on_load() {
        let mut storage = MemoryStorage::default();
        storage.set("ui-mode", "dark");
        let options = ThemeOptions { storage_key: "ui-mode".to_string(), dark_class: "theme-dark".to_string() };
        let toggle = ThemeToggle::new(storage, options);
        assert_eq!(toggle.get_theme(), Theme::Dark);
        assert!(toggle.root().has_class("theme-dark"));
    }

    #[test]
    fn test_parse_theme() {
        assert_eq!("dark".parse::<Theme>(), Ok(Theme::Dark));
        assert_eq!("light".parse::<Theme>(), Ok(Theme::Light));
        assert!("Dark".parse::<Theme>().is_err());
        assert_eq!(Theme::Dark.to_string(), "dark");
    }

    #[test]
    fn test_client_script_uses_options() {
        let options = ThemeOptions { storage_key: "ui-mode".to_string(), dark_class: "theme-dark".to_string() };
        let script = client_script(&options);
        assert!(script.contains(r#"const THEME_KEY = "ui-mode";"#));
        assert!(script.contains(r#"const DARK_CLASS = "theme-dark";"#));
        assert!(script.contains("[data-theme-toggle]"));

        let head = head_snippet(&options);
        assert!(head.contains(r#"getItem("ui-mode")"#));
    }

    #[test]
    fn test_client_script_survives_blocked_storage() {
        let options = ThemeOptions::default();
        let script = client_script(&options);
        let get_at = script.find("localStorage.getItem").unwrap();
        let set_at = script.find("localStorage.setItem").unwrap();
        for at in [get_at, set_at] {
            let try_at = script[..at].rfind("try {").unwrap();
            assert!(script[try_at..at].lines().count() <= 2, "storage access outside try");
            assert!(script[at..].contains("catch (e)"));
        }

        let head = head_snippet(&options);
        assert!(head.starts_with("(function(){var t=null;try{t=window.localStorage.getItem("));
        assert!(head.contains("}catch(e){}"));
    }
}
