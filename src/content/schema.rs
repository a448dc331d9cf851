//! Schemas for the content collections.
//!
//! A schema is a list of [`FieldSpec`]s. Validation is a pure function from
//! front matter to a typed entry, collecting every problem of an entry
//! before failing. The CMS admin configuration is derived from the same
//! lists.

use std::collections::{BTreeSet, HashMap};
use std::fmt::{Display, Formatter};
use std::io;
use std::io::ErrorKind;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use spdlog::debug;
use toml::{Table, Value};

use crate::content::content_file::ContentFile;
use crate::content::content_format::ContentFormat;
use crate::content::front_matter::FrontMatter;
use crate::text_utils::parse_date_time;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Text,
    Date,
    StringList,
    Image,
    Bool,
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

pub const BLOG_SCHEMA: &[FieldSpec] = &[
    FieldSpec { name: "title", aliases: &[], label: "Title", kind: FieldKind::String, required: true },
    FieldSpec { name: "date", aliases: &["pubDate", "pub_date"], label: "Publish date", kind: FieldKind::Date, required: true },
    FieldSpec { name: "description", aliases: &[], label: "Description", kind: FieldKind::Text, required: false },
    FieldSpec { name: "author", aliases: &[], label: "Author", kind: FieldKind::String, required: false },
    FieldSpec { name: "tags", aliases: &[], label: "Tags", kind: FieldKind::StringList, required: false },
    FieldSpec { name: "hero_image", aliases: &["heroImage", "hero"], label: "Hero image", kind: FieldKind::Image, required: false },
    FieldSpec { name: "draft", aliases: &[], label: "Draft", kind: FieldKind::Bool, required: false },
];

pub const PAGE_SCHEMA: &[FieldSpec] = &[
    FieldSpec { name: "title", aliases: &[], label: "Title", kind: FieldKind::String, required: true },
    FieldSpec { name: "description", aliases: &[], label: "Description", kind: FieldKind::Text, required: false },
];

#[derive(Debug, Clone, PartialEq)]
pub struct BlogPost {
    pub slug: String,
    pub source: PathBuf,
    pub asset_dir: Option<PathBuf>,
    pub format: ContentFormat,
    pub title: String,
    pub date: NaiveDateTime,
    pub description: Option<String>,
    pub author: Option<String>,
    pub tags: BTreeSet<String>,
    pub hero_image: Option<String>,
    pub draft: bool,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub slug: String,
    pub source: PathBuf,
    pub asset_dir: Option<PathBuf>,
    pub format: ContentFormat,
    pub title: String,
    pub description: Option<String>,
    pub body: String,
}

/// Every schema violation found in one entry
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub source: PathBuf,
    pub issues: Vec<String>,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.source.display(), self.issues.join("; "))
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for io::Error {
    fn from(value: ValidationError) -> Self {
        io::Error::new(ErrorKind::InvalidData, value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
enum FieldValue {
    Str(String),
    Date(NaiveDateTime),
    List(Vec<String>),
    Bool(bool),
}

fn lookup<'a>(fields: &'a Table, spec: &FieldSpec) -> Option<&'a Value> {
    fields.get(spec.name)
        .or_else(|| spec.aliases.iter().find_map(|alias| fields.get(*alias)))
}

fn check_field(spec: &FieldSpec, value: &Value) -> Result<FieldValue, String> {
    let wrong_type = |expected: &str| format!("'{}' must be {}, found {}", spec.name, expected, value.type_str());

    match spec.kind {
        FieldKind::String | FieldKind::Text | FieldKind::Image => match value {
            Value::String(s) if s.trim().is_empty() && spec.required => Err(format!("'{}' must not be empty", spec.name)),
            Value::String(s) => Ok(FieldValue::Str(s.trim().to_string())),
            _ => Err(wrong_type("a string")),
        },
        FieldKind::Date => {
            let raw = match value {
                Value::Datetime(d) => d.to_string(),
                Value::String(s) => s.clone(),
                _ => return Err(wrong_type("a date")),
            };
            parse_date_time(&raw)
                .map(FieldValue::Date)
                .map_err(|e| format!("'{}' is not a valid date: {}", spec.name, e))
        }
        FieldKind::StringList => match value {
            Value::Array(items) => {
                let mut list = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::String(s) if !s.trim().is_empty() => list.push(s.trim().to_string()),
                        Value::String(_) => {}
                        other => return Err(format!("'{}' must only hold strings, found {}", spec.name, other.type_str())),
                    }
                }
                Ok(FieldValue::List(list))
            }
            Value::String(s) => Ok(FieldValue::List(
                s.split(',').map(str::trim).filter(|t| !t.is_empty()).map(str::to_string).collect())),
            _ => Err(wrong_type("a list of strings")),
        },
        FieldKind::Bool => match value {
            Value::Boolean(b) => Ok(FieldValue::Bool(*b)),
            _ => Err(wrong_type("a boolean")),
        },
    }
}

/// Checks `fields` against `schema`, returning the values of the present
/// fields or every issue found.
fn validate_fields(schema: &[FieldSpec], fields: &Table) -> Result<HashMap<&'static str, FieldValue>, Vec<String>> {
    let mut values = HashMap::new();
    let mut issues = vec![];

    for spec in schema {
        match lookup(fields, spec) {
            None if spec.required => issues.push(format!("missing required field '{}'", spec.name)),
            None => {}
            Some(value) => match check_field(spec, value) {
                Ok(v) => { values.insert(spec.name, v); }
                Err(issue) => issues.push(issue),
            },
        }
    }

    for key in fields.keys() {
        let known = schema.iter().any(|s| s.name == key || s.aliases.contains(&key.as_str()));
        if !known {
            debug!("Ignoring unknown front matter field '{}'", key);
        }
    }

    if issues.is_empty() {
        Ok(values)
    } else {
        Err(issues)
    }
}

fn take_str(values: &mut HashMap<&'static str, FieldValue>, name: &str) -> Option<String> {
    match values.remove(name) {
        Some(FieldValue::Str(s)) => Some(s),
        _ => None,
    }
}

fn slug_issue(content_file: &ContentFile) -> Option<String> {
    if content_file.slug.is_empty() {
        Some(format!("cannot derive a url slug from {}", content_file.file_path.display()))
    } else {
        None
    }
}

/// Validates a blog entry. Pure: nothing is read from disk.
pub fn validate_entry(content_file: &ContentFile, front_matter: FrontMatter) -> Result<BlogPost, ValidationError> {
    let to_error = |issues: Vec<String>| ValidationError { source: content_file.file_path.clone(), issues };

    let mut values = match validate_fields(BLOG_SCHEMA, &front_matter.fields) {
        Ok(values) => values,
        Err(mut issues) => {
            issues.extend(slug_issue(content_file));
            return Err(to_error(issues));
        }
    };
    if let Some(issue) = slug_issue(content_file) {
        return Err(to_error(vec![issue]));
    }

    let date = match values.remove("date") {
        Some(FieldValue::Date(d)) => d,
        _ => return Err(to_error(vec!["missing required field 'date'".to_string()])),
    };
    let tags = match values.remove("tags") {
        Some(FieldValue::List(tags)) => tags.into_iter().collect(),
        _ => BTreeSet::new(),
    };
    let draft = matches!(values.remove("draft"), Some(FieldValue::Bool(true)));

    Ok(BlogPost {
        slug: content_file.slug.clone(),
        source: content_file.file_path.clone(),
        asset_dir: content_file.asset_dir.clone(),
        format: content_file.format,
        title: take_str(&mut values, "title").unwrap_or_default(),
        date,
        description: take_str(&mut values, "description").filter(|d| !d.is_empty()),
        author: take_str(&mut values, "author").filter(|a| !a.is_empty()),
        tags,
        hero_image: take_str(&mut values, "hero_image").filter(|h| !h.is_empty()),
        draft,
        body: front_matter.body,
    })
}

pub fn validate_page(content_file: &ContentFile, front_matter: FrontMatter) -> Result<Page, ValidationError> {
    let mut values = match validate_fields(PAGE_SCHEMA, &front_matter.fields) {
        Ok(values) => values,
        Err(issues) => return Err(ValidationError { source: content_file.file_path.clone(), issues }),
    };
    if let Some(issue) = slug_issue(content_file) {
        return Err(ValidationError { source: content_file.file_path.clone(), issues: vec![issue] });
    }

    Ok(Page {
        slug: content_file.slug.clone(),
        source: content_file.file_path.clone(),
        asset_dir: content_file.asset_dir.clone(),
        format: content_file.format,
        title: take_str(&mut values, "title").unwrap_or_default(),
        description: take_str(&mut values, "description").filter(|d| !d.is_empty()),
        body: front_matter.body,
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::content::front_matter::parse_front_matter;
    use crate::test_data::{POST_DATA_HEADER, POST_DATA_TOML};

    use super::*;

    fn front_matter(fields: &str) -> FrontMatter {
        FrontMatter {
            fields: toml::from_str::<Table>(fields).unwrap(),
            body: "Body\n".to_string(),
        }
    }

    fn file(slug: &str) -> ContentFile {
        ContentFile::from_string(slug, &format!("blog/{}.md", slug), "")
    }

    #[test]
    fn test_valid_toml_entry() {
        let content_file = ContentFile::from_string("first-visit", "blog/first-visit.md", POST_DATA_TOML);
        let fm = parse_front_matter(&content_file).unwrap();
        let post = validate_entry(&content_file, fm).unwrap();

        assert_eq!(post.slug, "first-visit");
        assert_eq!(post.title, "What to expect on a first visit");
        assert_eq!(post.date.date(), NaiveDate::from_ymd_opt(2024, 2, 3).unwrap());
        assert_eq!(post.description.as_deref(), Some("A walk through our visit checklist."));
        assert_eq!(post.tags.iter().collect::<Vec<_>>(), ["checklist", "customers"]);
        assert_eq!(post.hero_image.as_deref(), Some("/images/van.jpg"));
        assert!(!post.draft);
    }

    #[test]
    fn test_valid_header_entry() {
        let content_file = ContentFile::from_string("winter-pipes", "blog/winter-pipes/index.md", POST_DATA_HEADER);
        let fm = parse_front_matter(&content_file).unwrap();
        let post = validate_entry(&content_file, fm).unwrap();

        assert_eq!(post.title, "Keeping pipes safe in winter");
        assert_eq!(post.author.as_deref(), Some("Dana"));
        assert_eq!(post.date.format("%Y-%m-%d %H:%M").to_string(), "2024-01-15 09:30");
        assert_eq!(post.tags.len(), 2);
    }

    #[test]
    fn test_missing_title_fails() {
        let err = validate_entry(&file("no-title"), front_matter("date = 2024-01-15")).unwrap_err();
        assert_eq!(err.source, PathBuf::from("blog/no-title.md"));
        assert_eq!(err.issues, vec!["missing required field 'title'".to_string()]);
        assert_eq!(err.to_string(), "blog/no-title.md: missing required field 'title'");
    }

    #[test]
    fn test_all_issues_are_reported() {
        let fm = front_matter(r#"
title = "   "
date = "last tuesday"
tags = ["ok", 3]
draft = "yes"
"#);
        let err = validate_entry(&file("broken"), fm).unwrap_err();
        assert_eq!(err.issues.len(), 4);
        assert_eq!(err.issues[0], "'title' must not be empty");
        assert!(err.issues[1].starts_with("'date' is not a valid date"));
        assert_eq!(err.issues[2], "'tags' must only hold strings, found integer");
        assert_eq!(err.issues[3], "'draft' must be a boolean, found string");
    }

    #[test]
    fn test_aliases_and_string_tags() {
        let fm = front_matter(r#"
title = "Hello"
pubDate = "2024-01-15"
heroImage = "hero.png"
tags = "one, two,,one"
"#);
        let post = validate_entry(&file("hello"), fm).unwrap();
        assert_eq!(post.hero_image.as_deref(), Some("hero.png"));
        assert_eq!(post.tags.iter().collect::<Vec<_>>(), ["one", "two"]);
        assert_eq!(post.body, "Body\n");
    }

    #[test]
    fn test_date_wrong_type() {
        let err = validate_entry(&file("x"), front_matter("title = \"x\"\ndate = 20240115")).unwrap_err();
        assert_eq!(err.issues, vec!["'date' must be a date, found integer".to_string()]);
    }

    #[test]
    fn test_empty_slug() {
        let fm = front_matter("title = \"x\"\ndate = 2024-01-15");
        let err = validate_entry(&file(""), fm).unwrap_err();
        assert!(err.issues[0].starts_with("cannot derive a url slug"));
    }

    #[test]
    fn test_validate_page() {
        let page = validate_page(&file("about"), front_matter("title = \"About us\"")).unwrap();
        assert_eq!(page.title, "About us");
        assert!(page.description.is_none());

        let err = validate_page(&file("about"), front_matter("description = \"x\"")).unwrap_err();
        assert_eq!(err.issues, vec!["missing required field 'title'".to_string()]);
    }

    #[test]
    fn test_into_io_error() {
        let err: io::Error = ValidationError { source: PathBuf::from("a.md"), issues: vec!["bad".to_string()] }.into();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert_eq!(err.to_string(), "a.md: bad");
    }
}
