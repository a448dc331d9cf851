use std::collections::{BTreeMap, HashMap};
use std::fmt::{Display, Formatter};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::{fs, io};

use spdlog::{info, warn};

use crate::content::content_file::ContentFile;
use crate::content::front_matter::{parse_front_matter, FrontMatter};
use crate::content::schema::{validate_entry, validate_page, BlogPost, Page, ValidationError};
use crate::text_utils::slugify;

/// Slugs the generator uses for its own routes
pub const RESERVED_PAGE_SLUGS: &[&str] = &["blog", "admin", "scripts", "styles", "rss", "sitemap", "404"];

/// Finds content sources below a directory: flat files (`post.md`) and
/// directories holding an index file (`post/index.md`).
pub struct SourceList {
    pub root_dir: PathBuf,
    pub index_base_name: String,
}

impl SourceList {
    pub fn retrieve(&self) -> io::Result<Vec<ContentFile>> {
        if !self.root_dir.is_dir() {
            warn!("Content directory {} does not exist", self.root_dir.display());
            return Ok(vec![]);
        }

        let mut entries: Vec<_> = fs::read_dir(&self.root_dir)?
            .collect::<io::Result<Vec<_>>>()?;
        entries.sort_by_key(|e| e.file_name());

        let mut sources = vec![];
        for entry in entries {
            let path = entry.path();
            let file_type = entry.file_type()?;

            if file_type.is_file() {
                if ContentFile::guess_type(&path).is_none() {
                    continue;
                }
                let slug = Self::slug_of(&path, true);
                sources.push(ContentFile::from_file(slug, path, None)?);
            } else if file_type.is_dir() {
                if let Some(index_file) = Self::index_file(&path, &self.index_base_name)? {
                    let slug = Self::slug_of(&path, false);
                    sources.push(ContentFile::from_file(slug, index_file, Some(path))?);
                }
            }
        }

        Ok(sources)
    }

    fn slug_of(path: &Path, strip_extension: bool) -> String {
        let name = if strip_extension { path.file_stem() } else { path.file_name() };
        name.map(|n| slugify(&n.to_string_lossy())).unwrap_or_default()
    }

    fn index_file(dir: &Path, base_name: &str) -> io::Result<Option<PathBuf>> {
        let mut candidates = vec![];
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let path = entry.path();
            let stem_matches = path.file_stem().map(|s| s == base_name).unwrap_or(false);
            if stem_matches && ContentFile::guess_type(&path).is_some() {
                candidates.push(path);
            }
        }
        candidates.sort();
        Ok(candidates.into_iter().next())
    }
}

#[derive(Debug)]
pub enum CollectionError {
    Io(io::Error),
    Invalid(Vec<ValidationError>),
}

impl Display for CollectionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectionError::Io(e) => write!(f, "{}", e),
            CollectionError::Invalid(errors) => {
                write!(f, "{} invalid content entr{}:", errors.len(), if errors.len() == 1 { "y" } else { "ies" })?;
                for error in errors {
                    write!(f, "\n  - {}", error)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for CollectionError {}

impl From<io::Error> for CollectionError {
    fn from(value: io::Error) -> Self {
        CollectionError::Io(value)
    }
}

impl From<CollectionError> for io::Error {
    fn from(value: CollectionError) -> Self {
        match value {
            CollectionError::Io(e) => e,
            invalid => io::Error::new(ErrorKind::InvalidData, invalid.to_string()),
        }
    }
}

fn validate_all<T>(
    files: &[ContentFile],
    validate: impl Fn(&ContentFile, FrontMatter) -> Result<T, ValidationError>,
) -> (Vec<T>, Vec<ValidationError>) {
    let mut valid = vec![];
    let mut failures = vec![];

    for file in files {
        let front_matter = match parse_front_matter(file) {
            Ok(fm) => fm,
            Err(e) => {
                failures.push(ValidationError { source: file.file_path.clone(), issues: vec![e.to_string()] });
                continue;
            }
        };
        match validate(file, front_matter) {
            Ok(item) => valid.push(item),
            Err(e) => failures.push(e),
        }
    }

    (valid, failures)
}

fn duplicate_slugs<'a>(items: impl Iterator<Item=(&'a str, &'a Path)>) -> Vec<ValidationError> {
    let mut seen: HashMap<&str, &Path> = HashMap::new();
    let mut failures = vec![];
    for (slug, source) in items {
        if let Some(first) = seen.get(slug) {
            failures.push(ValidationError {
                source: source.to_path_buf(),
                issues: vec![format!("slug '{}' is already used by {}", slug, first.display())],
            });
        } else {
            seen.insert(slug, source);
        }
    }
    failures
}

/// Every tag gets its own route, so a tag must slugify to something and
/// different tags may not share a slug.
fn tag_slug_conflicts(posts: &[BlogPost]) -> Vec<ValidationError> {
    let mut seen: HashMap<String, (&str, &Path)> = HashMap::new();
    let mut failures = vec![];
    for post in posts {
        let mut issues = vec![];
        for tag in post.tags.iter() {
            let slug = slugify(tag);
            if slug.is_empty() {
                issues.push(format!("tag '{}' has no characters usable in a route", tag));
                continue;
            }
            match seen.get(&slug) {
                Some((first, source)) if *first != tag.as_str() => issues.push(format!(
                    "tag '{}' has the same route slug '{}' as tag '{}' in {}", tag, slug, first, source.display())),
                Some(_) => {}
                None => {
                    seen.insert(slug, (tag.as_str(), post.source.as_path()));
                }
            }
        }
        if !issues.is_empty() {
            failures.push(ValidationError { source: post.source.clone(), issues });
        }
    }
    failures
}

#[derive(Debug, Clone, PartialEq)]
pub struct TagCount {
    pub tag: String,
    pub slug: String,
    pub count: usize,
}

/// The validated blog entries, newest first
#[derive(Debug, Default)]
pub struct Collection {
    pub posts: Vec<BlogPost>,
}

impl Collection {
    pub fn load(dir: &Path, index_base_name: &str, include_drafts: bool) -> Result<Collection, CollectionError> {
        let sources = SourceList { root_dir: dir.to_path_buf(), index_base_name: index_base_name.to_string() };
        let files = sources.retrieve()?;
        Self::from_files(&files, include_drafts)
    }

    /// Validates every file. Any invalid entry fails the whole collection,
    /// and all failures are reported together.
    pub fn from_files(files: &[ContentFile], include_drafts: bool) -> Result<Collection, CollectionError> {
        let (mut posts, mut failures) = validate_all(files, validate_entry);
        failures.extend(duplicate_slugs(posts.iter().map(|p| (p.slug.as_str(), p.source.as_path()))));
        failures.extend(tag_slug_conflicts(&posts));

        if !failures.is_empty() {
            return Err(CollectionError::Invalid(failures));
        }

        let total = posts.len();
        if !include_drafts {
            posts.retain(|p| !p.draft);
        }
        if posts.len() < total {
            info!("Skipping {} draft post(s)", total - posts.len());
        }

        posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));
        Ok(Collection { posts })
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn find(&self, slug: &str) -> Option<&BlogPost> {
        self.posts.iter().find(|p| p.slug == slug)
    }

    /// Tags by frequency, ties by name
    pub fn tags(&self) -> Vec<TagCount> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for post in self.posts.iter() {
            for tag in post.tags.iter() {
                *counts.entry(tag.as_str()).or_insert(0) += 1;
            }
        }

        let mut tags: Vec<TagCount> = counts.into_iter()
            .map(|(tag, count)| TagCount { tag: tag.to_string(), slug: slugify(tag), count })
            .collect();
        tags.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
        tags
    }

    pub fn with_tag(&self, tag: &str) -> Vec<&BlogPost> {
        self.posts.iter().filter(|p| p.tags.contains(tag)).collect()
    }
}

pub fn load_pages(dir: &Path, index_base_name: &str) -> Result<Vec<Page>, CollectionError> {
    let sources = SourceList { root_dir: dir.to_path_buf(), index_base_name: index_base_name.to_string() };
    let files = sources.retrieve()?;
    pages_from_files(&files)
}

pub fn pages_from_files(files: &[ContentFile]) -> Result<Vec<Page>, CollectionError> {
    let (pages, mut failures) = validate_all(files, validate_page);
    failures.extend(duplicate_slugs(pages.iter().map(|p| (p.slug.as_str(), p.source.as_path()))));

    for page in pages.iter() {
        if RESERVED_PAGE_SLUGS.contains(&page.slug.as_str()) {
            failures.push(ValidationError {
                source: page.source.clone(),
                issues: vec![format!("slug '{}' is reserved for generated pages", page.slug)],
            });
        }
    }

    if failures.is_empty() {
        Ok(pages)
    } else {
        Err(CollectionError::Invalid(failures))
    }
}
