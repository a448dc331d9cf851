use std::collections::HashSet;

use serde::Deserialize;
use uuid::Uuid;

use crate::text_utils::slugify;

/// One entry of the navigation tree as written in the configuration.
///
/// Entries with children render as dropdowns. The tree is owned, so it
/// cannot contain cycles.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct NavEntry {
    pub label: String,
    pub href: Option<String>,
    #[serde(default)]
    pub children: Vec<NavEntry>,
}

#[derive(ramhorns::Content, Debug, Clone, PartialEq)]
pub struct NavItem {
    pub label: String,
    pub href: String,
    pub active: bool,
    pub has_children: bool,
    pub dropdown_id: String,
    pub children: Vec<NavItem>,
}

/// Deterministic element id for a dropdown, usable from `aria-controls`.
///
/// The readable part is the slug of the label. The suffix is taken from a
/// name based UUID of the exact label, so "About us" and "About-Us" differ.
pub fn dropdown_id(label: &str) -> String {
    let digest = Uuid::new_v5(&Uuid::NAMESPACE_URL, label.as_bytes()).simple().to_string();
    let suffix = &digest[..8];
    let slug = slugify(label);
    if slug.is_empty() {
        format!("dropdown-{}", suffix)
    } else {
        format!("dropdown-{}-{}", slug, suffix)
    }
}

impl NavEntry {
    /// Checks this entry and its children
    pub fn validate(&self) -> Result<(), String> {
        self.validate_under("")
    }

    fn validate_under(&self, parent: &str) -> Result<(), String> {
        let path = if parent.is_empty() {
            self.label.clone()
        } else {
            format!("{} > {}", parent, self.label)
        };

        if self.label.trim().is_empty() {
            return Err(format!("entry with an empty label under '{}'", parent));
        }

        let has_href = self.href.as_ref().map(|h| !h.trim().is_empty()).unwrap_or(false);
        if !has_href && self.children.is_empty() {
            return Err(format!("'{}' needs either an href or children", path));
        }

        for child in self.children.iter() {
            child.validate_under(&path)?;
        }
        Ok(())
    }
}

fn collect_dropdowns<'a>(entries: &'a [NavEntry], labels: &mut Vec<&'a str>) {
    for entry in entries.iter().filter(|e| !e.children.is_empty()) {
        labels.push(&entry.label);
        collect_dropdowns(&entry.children, labels);
    }
}

/// Validates every entry. Dropdown ids come from the label, so two
/// dropdowns anywhere in the tree may not share one.
pub fn validate_entries(entries: &[NavEntry]) -> Result<(), String> {
    entries.iter().try_for_each(NavEntry::validate)?;

    let mut labels = vec![];
    collect_dropdowns(entries, &mut labels);
    let mut seen = HashSet::new();
    match labels.into_iter().find(|label| !seen.insert(*label)) {
        Some(label) => Err(format!("dropdown label '{}' is used more than once", label)),
        None => Ok(()),
    }
}

fn is_active(href: &str, current_path: &str) -> bool {
    if href == current_path {
        return true;
    }
    href != "/" && href.ends_with('/') && current_path.starts_with(href)
}

/// Builds the view model of the navigation for the page at `current_path`.
pub fn nav_items(entries: &[NavEntry], current_path: &str) -> Vec<NavItem> {
    entries.iter().map(|entry| {
        let children = nav_items(&entry.children, current_path);
        let href = entry.href.clone().unwrap_or_default();
        let active = (!href.is_empty() && is_active(&href, current_path))
            || children.iter().any(|c| c.active);

        NavItem {
            label: entry.label.clone(),
            href,
            active,
            has_children: !children.is_empty(),
            dropdown_id: dropdown_id(&entry.label),
            children,
        }
    }).collect()
}
