use std::borrow::Cow;
use std::fmt::Write;
use std::path::Path;
use std::{fs, io};

use crate::theme::{client_script, ThemeOptions};

const SITE_CSS: &str = include_str!("../res/template/site.css");

/// Dropdown wiring: buttons with `data-dropdown-toggle` control the element
/// named by their `aria-controls`.
const DROPDOWN_SCRIPT: &str = r#"function bindDropdowns() {
  document.querySelectorAll("[data-dropdown-toggle]").forEach((button) => {
    if (button.dataset.dropdownBound) return;
    button.dataset.dropdownBound = "1";
    const menu = document.getElementById(button.getAttribute("aria-controls"));
    if (!menu) return;
    button.addEventListener("click", () => {
      const expanded = button.getAttribute("aria-expanded") === "true";
      button.setAttribute("aria-expanded", String(!expanded));
      menu.hidden = expanded;
    });
    button.addEventListener("keydown", (event) => {
      if (event.key === "Escape") {
        button.setAttribute("aria-expanded", "false");
        menu.hidden = true;
      }
    });
  });
}
"#;

/// The client bundle: theme toggle and dropdowns, bound on load and again
/// after every client side navigation.
pub fn site_script(dark_mode: bool, theme: &ThemeOptions) -> String {
    let mut buf = String::new();
    let mut binders = vec!["bindDropdowns"];

    if dark_mode {
        buf.push_str(&client_script(theme));
        binders.push("bindThemeToggles");
    }
    buf.push_str(DROPDOWN_SCRIPT);

    let _ = writeln!(&mut buf, "function bindAll() {{");
    for binder in binders.iter() {
        let _ = writeln!(&mut buf, "  {}();", binder);
    }
    let _ = writeln!(&mut buf, "}}");
    let _ = writeln!(&mut buf, "document.addEventListener(\"DOMContentLoaded\", bindAll);");
    let _ = writeln!(&mut buf, "document.addEventListener(\"sitecraft:navigated\", bindAll);");
    let _ = writeln!(&mut buf, "window.addEventListener(\"pageshow\", bindAll);");

    buf
}

pub fn site_css() -> &'static str {
    SITE_CSS
}

/// `site.css` from the template directory, or the built-in stylesheet
pub fn load_site_css(template_dir: &Path) -> io::Result<Cow<'static, str>> {
    let path = template_dir.join("site.css");
    if path.is_file() {
        Ok(Cow::Owned(fs::read_to_string(path)?))
    } else {
        Ok(Cow::Borrowed(SITE_CSS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_with_dark_mode() {
        let script = site_script(true, &ThemeOptions::default());
        assert!(script.contains("function setTheme(value)"));
        assert!(script.contains("  bindThemeToggles();"));
        assert!(script.contains("  bindDropdowns();"));
        assert!(script.contains("sitecraft:navigated"));
    }

    #[test]
    fn test_bundle_without_dark_mode() {
        let script = site_script(false, &ThemeOptions::default());
        assert!(!script.contains("setTheme"));
        assert!(!script.contains("bindThemeToggles"));
        assert!(script.contains("  bindDropdowns();"));
    }

    #[test]
    fn test_css_has_dark_overrides() {
        assert!(site_css().contains("html.dark"));
    }

    #[test]
    fn test_css_override() -> io::Result<()> {
        let dir = tempfile::TempDir::new()?;
        assert_eq!(load_site_css(dir.path())?, site_css());
        fs::write(dir.path().join("site.css"), "body { color: red; }")?;
        assert_eq!(load_site_css(dir.path())?, "body { color: red; }");
        Ok(())
    }
}
