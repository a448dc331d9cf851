//! Admin page for Decap CMS.
//!
//! The editable fields come from [`BLOG_SCHEMA`], so the admin UI and the
//! build time validation never disagree on what a post holds.

use std::path::Path;

use serde_json::{json, Map, Value};

use crate::config::{Cms, Config};
use crate::content::schema::{FieldKind, FieldSpec, BLOG_SCHEMA};

fn widget(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::String => "string",
        FieldKind::Text => "text",
        FieldKind::Date => "datetime",
        FieldKind::StringList => "list",
        FieldKind::Image => "image",
        FieldKind::Bool => "boolean",
    }
}

fn field_json(spec: &FieldSpec) -> Value {
    let mut field = Map::new();
    field.insert("label".to_string(), json!(spec.label));
    field.insert("name".to_string(), json!(spec.name));
    field.insert("widget".to_string(), json!(widget(spec.kind)));
    field.insert("required".to_string(), json!(spec.required));
    match spec.kind {
        FieldKind::Bool => { field.insert("default".to_string(), json!(false)); }
        FieldKind::Date => {
            field.insert("format".to_string(), json!("YYYY-MM-DD HH:mm:ss"));
        }
        _ => {}
    }
    Value::Object(field)
}

/// Folder as seen from the repository root, with forward slashes
fn repo_folder(path: &Path, root_dir: &Path) -> String {
    let relative = path.strip_prefix(root_dir).unwrap_or(path);
    relative.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .filter(|c| c != "/")
        .collect::<Vec<_>>()
        .join("/")
}

fn backend_json(cms: &Cms) -> Value {
    let mut backend = Map::new();
    backend.insert("name".to_string(), json!(cms.backend));
    if let Some(ref repo) = cms.repo {
        backend.insert("repo".to_string(), json!(repo));
    }
    backend.insert("branch".to_string(), json!(cms.branch));
    Value::Object(backend)
}

pub fn cms_config_json(config: &Config, cms: &Cms) -> Value {
    let mut fields: Vec<Value> = BLOG_SCHEMA.iter().map(field_json).collect();
    fields.push(json!({"label": "Body", "name": "body", "widget": "markdown"}));

    json!({
        "backend": backend_json(cms),
        "local_backend": cms.local_backend,
        "media_folder": cms.media_folder,
        "public_folder": cms.public_folder,
        "site_url": config.site.url,
        "display_url": config.site.url,
        "collections": [{
            "name": "blog",
            "label": "Blog",
            "folder": repo_folder(&config.paths.content_dir, &config.root_dir),
            "create": true,
            "slug": "{{slug}}",
            "extension": "md",
            "format": "toml-frontmatter",
            "fields": fields,
        }],
    })
}

/// `None` when the site has no `[cms]` table
pub fn admin_page(config: &Config) -> Option<String> {
    let cms = config.cms.as_ref()?;
    let cms_config = cms_config_json(config, cms).to_string().replace("</", "<\\/");
    let script_url = Value::String(cms.script_url.clone()).to_string();

    Some(format!(r##"<!doctype html>
<html>
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <meta name="robots" content="noindex" />
  <title>Content Manager</title>
  <script>window.CMS_MANUAL_INIT = true;</script>
  <script src={}></script>
</head>
<body>
  <script>CMS.init({{ config: {} }});</script>
</body>
</html>
"##, script_url, cms_config))
}

#[cfg(test)]
mod tests {
    use crate::config::parse_config;
    use crate::test_data::SITE_CONFIG;

    use super::*;

    #[test]
    fn test_fields_follow_schema() {
        let config = parse_config(SITE_CONFIG, Path::new("/srv/site")).unwrap();
        let cms = config.cms.as_ref().unwrap();
        let value = cms_config_json(&config, cms);

        assert_eq!(value["backend"]["name"], "github");
        assert_eq!(value["backend"]["repo"], "acme/site");
        assert_eq!(value["backend"]["branch"], "main");

        let collection = &value["collections"][0];
        assert_eq!(collection["folder"], "content/blog");
        assert_eq!(collection["format"], "toml-frontmatter");

        let fields = collection["fields"].as_array().unwrap();
        assert_eq!(fields.len(), BLOG_SCHEMA.len() + 1);
        assert_eq!(fields[0]["name"], "title");
        assert_eq!(fields[0]["required"], true);
        assert_eq!(fields[1]["widget"], "datetime");
        let hero = fields.iter().find(|f| f["name"] == "hero_image").unwrap();
        assert_eq!(hero["widget"], "image");
        assert_eq!(fields.last().unwrap()["widget"], "markdown");
    }

    #[test]
    fn test_admin_page() {
        let config = parse_config(SITE_CONFIG, Path::new("/srv/site")).unwrap();
        let html = admin_page(&config).unwrap();
        assert!(html.contains("<script src=\"https://unpkg.com/decap-cms@^3.0.0/dist/decap-cms.js\"></script>"));
        assert!(html.contains("CMS.init({ config: {"));
        assert!(html.contains("\"folder\":\"content/blog\""));
    }

    #[test]
    fn test_no_cms_table() {
        let cfg_str = SITE_CONFIG.replace("[cms]\nbackend = \"github\"\nrepo = \"acme/site\"\n", "");
        let config = parse_config(&cfg_str, Path::new("/srv/site")).unwrap();
        assert!(config.cms.is_none());
        assert!(admin_page(&config).is_none());
    }

    #[test]
    fn test_repo_folder_outside_root() {
        assert_eq!(repo_folder(Path::new("/data/blog"), Path::new("/srv/site")), "data/blog");
    }
}
