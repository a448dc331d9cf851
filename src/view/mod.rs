pub mod layout;
pub mod list_renderer;
pub mod post_renderer;
pub mod rss_renderer;
pub mod sitemap_renderer;
pub mod templates;


use crate::config::Config;
use crate::content::Content;
use crate::text_utils::{format_date, format_iso_date, slugify};

#[derive(ramhorns::Content)]
pub struct ViewTag {
    pub tag: String,
    pub link: String,
    pub count: usize,
}

impl ViewTag {
    pub fn new(tag: &str, count: usize) -> ViewTag {
        ViewTag {
            tag: tag.to_string(),
            link: tag_route(tag),
            count,
        }
    }
}

#[derive(ramhorns::Content)]
pub struct PostItem {
    pub title: String,
    pub link: String,
    pub date: String,
    pub iso_date: String,
    pub description: Option<String>,
    pub hero_image: Option<String>,
    pub summary: String,
    pub tags: Vec<ViewTag>,
}

impl PostItem {
    pub fn from_content(content: &Content) -> PostItem {
        let post = content.post;
        PostItem {
            title: post.title.clone(),
            link: content.link.clone(),
            date: format_date(&post.date),
            iso_date: format_iso_date(&post.date),
            description: post.description.clone(),
            hero_image: post.hero_image.as_deref().map(|img| resolve_asset(&content.link, img)),
            summary: content.rendered.clone(),
            tags: post.tags.iter().map(|t| ViewTag::new(t, 0)).collect(),
        }
    }
}

#[derive(ramhorns::Content)]
pub struct SocialView {
    pub name: String,
    pub url: String,
}

/// Business details for templates
#[derive(ramhorns::Content)]
pub struct SiteView {
    pub name: String,
    pub url: String,
    pub description: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub founded_year: Option<String>,
    pub socials: Vec<SocialView>,
}

impl SiteView {
    pub fn from_config(config: &Config) -> SiteView {
        let site = &config.site;
        SiteView {
            name: site.name.clone(),
            url: site.url.clone(),
            description: site.description.clone(),
            email: site.email.clone(),
            phone: site.phone.clone(),
            address: site.address.clone(),
            founded_year: site.founded.map(|d| d.year().to_string()),
            socials: site.socials.iter()
                .map(|s| SocialView { name: s.name.clone(), url: s.url.clone() })
                .collect(),
        }
    }
}

pub fn post_route(slug: &str) -> String {
    format!("/blog/{}/", slug)
}

pub fn tag_route(tag: &str) -> String {
    format!("/blog/tag/{}/", slugify(tag))
}

pub fn page_route(slug: &str) -> String {
    format!("/{}/", slug)
}

/// Relative asset paths belong to the entry at `route`
pub fn resolve_asset(route: &str, path: &str) -> String {
    if path.contains("://") || path.starts_with('/') {
        path.to_string()
    } else if route.ends_with('/') {
        format!("{}{}", route, path.trim_start_matches("./"))
    } else {
        format!("{}/{}", route, path.trim_start_matches("./"))
    }
}

pub fn absolute_url(base_url: &str, route: &str) -> String {
    if route.contains("://") {
        return route.to_string();
    }
    let base_url = base_url.trim_end_matches('/');
    if route.starts_with('/') {
        format!("{}{}", base_url, route)
    } else {
        format!("{}/{}", base_url, route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes() {
        assert_eq!(post_route("winter-pipes"), "/blog/winter-pipes/");
        assert_eq!(tag_route("Big Jobs"), "/blog/tag/big-jobs/");
        assert_eq!(page_route("about"), "/about/");
    }

    #[test]
    fn test_resolve_asset() {
        assert_eq!(resolve_asset("/blog/post/", "hero.jpg"), "/blog/post/hero.jpg");
        assert_eq!(resolve_asset("/blog/post", "./hero.jpg"), "/blog/post/hero.jpg");
        assert_eq!(resolve_asset("/blog/post/", "/images/hero.jpg"), "/images/hero.jpg");
        assert_eq!(resolve_asset("/blog/post/", "https://cdn.example/a.jpg"), "https://cdn.example/a.jpg");
    }

    #[test]
    fn test_absolute_url() {
        assert_eq!(absolute_url("https://acme.example/", "/blog/"), "https://acme.example/blog/");
        assert_eq!(absolute_url("https://acme.example", "rss.xml"), "https://acme.example/rss.xml");
        assert_eq!(absolute_url("https://acme.example", "https://cdn.example/a.jpg"), "https://cdn.example/a.jpg");
    }
}
