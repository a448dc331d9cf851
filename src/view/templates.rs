use std::io::ErrorKind;
use std::path::Path;
use std::{fs, io};

use ramhorns::Template;
use spdlog::debug;

const BASE_TPL: &str = include_str!("../../res/template/base.tpl");
const HOME_TPL: &str = include_str!("../../res/template/home.tpl");
const POST_TPL: &str = include_str!("../../res/template/post.tpl");
const LIST_TPL: &str = include_str!("../../res/template/list.tpl");
const PAGE_TPL: &str = include_str!("../../res/template/page.tpl");
const NOT_FOUND_TPL: &str = include_str!("../../res/template/404.tpl");

/// The compiled templates of a site. Files found in the template directory
/// override the built-in ones.
pub struct Templates {
    pub base: Template<'static>,
    pub home: Template<'static>,
    pub post: Template<'static>,
    pub list: Template<'static>,
    pub page: Template<'static>,
    pub not_found: Template<'static>,
}

impl Templates {
    pub fn load(template_dir: &Path) -> io::Result<Templates> {
        Self::build(Some(template_dir))
    }

    pub fn embedded() -> io::Result<Templates> {
        Self::build(None)
    }

    fn build(template_dir: Option<&Path>) -> io::Result<Templates> {
        Ok(Templates {
            base: compile(template_dir, "base.tpl", BASE_TPL)?,
            home: compile(template_dir, "home.tpl", HOME_TPL)?,
            post: compile(template_dir, "post.tpl", POST_TPL)?,
            list: compile(template_dir, "list.tpl", LIST_TPL)?,
            page: compile(template_dir, "page.tpl", PAGE_TPL)?,
            not_found: compile(template_dir, "404.tpl", NOT_FOUND_TPL)?,
        })
    }
}

fn compile(template_dir: Option<&Path>, name: &str, default_src: &str) -> io::Result<Template<'static>> {
    let override_path = template_dir.map(|dir| dir.join(name)).filter(|p| p.is_file());
    let src = match override_path {
        Some(path) => {
            debug!("Using template {}", path.display());
            fs::read_to_string(&path)?
        }
        None => default_src.to_string(),
    };

    match Template::new(src) {
        Ok(template) => Ok(template),
        Err(e) => Err(io::Error::new(ErrorKind::InvalidInput, format!("Error parsing {} template: {}", name, e))),
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[derive(ramhorns::Content)]
    struct Title<'a> {
        post_title: &'a str,
    }

    #[test]
    fn test_embedded_templates_compile() {
        assert!(Templates::embedded().is_ok());
    }

    #[test]
    fn test_override_from_dir() -> io::Result<()> {
        let dir = TempDir::new()?;
        fs::write(dir.path().join("page.tpl"), "PAGE=[{{post_title}}]")?;
        let templates = Templates::load(dir.path())?;
        assert_eq!(templates.page.render(&Title { post_title: "<About>" }), "PAGE=[&lt;About&gt;]");
        Ok(())
    }

    #[test]
    fn test_invalid_override() -> io::Result<()> {
        let dir = TempDir::new()?;
        fs::write(dir.path().join("post.tpl"), "{{#open}} never closed")?;
        let err = Templates::load(dir.path()).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(err.to_string().starts_with("Error parsing post.tpl template"));
        Ok(())
    }
}
