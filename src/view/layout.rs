use chrono::{Datelike, Local};
use ramhorns::Template;

use crate::config::Config;
use crate::nav::{nav_items, NavItem};
use crate::theme::{head_snippet, ThemeOptions};
use crate::view::{absolute_url, SiteView};

/// Per page data for the `<head>` and the layout
pub struct PageMeta {
    /// `None` for the home page, which is titled after the site
    pub title: Option<String>,
    pub description: Option<String>,
    pub route: String,
    pub image: Option<String>,
    pub og_type: &'static str,
}

impl PageMeta {
    pub fn new(title: &str, route: &str) -> PageMeta {
        PageMeta {
            title: Some(title.to_string()),
            description: None,
            route: route.to_string(),
            image: None,
            og_type: "website",
        }
    }
}

#[derive(ramhorns::Content)]
struct LayoutView<'a> {
    lang: &'a str,
    page_title: String,
    description: &'a str,
    keywords: String,
    canonical_url: String,
    og_type: &'a str,
    og_image: Option<String>,
    locale: &'a str,
    twitter_handle: Option<&'a str>,
    site: SiteView,
    nav: Vec<NavItem>,
    dark_mode: bool,
    theme_head_script: String,
    cms_enabled: bool,
    year: i32,
    body: &'a str,
}

pub struct LayoutRenderer<'a> {
    template: &'a Template<'static>,
    config: &'a Config,
    theme_head_script: String,
}

impl<'a> LayoutRenderer<'a> {
    pub fn new(template: &'a Template<'static>, config: &'a Config) -> LayoutRenderer<'a> {
        let options = ThemeOptions {
            storage_key: config.theme.storage_key.clone(),
            dark_class: config.theme.dark_class.clone(),
        };
        LayoutRenderer {
            template,
            config,
            theme_head_script: head_snippet(&options),
        }
    }

    pub fn page_title(&self, title: Option<&str>) -> String {
        let site_name = self.config.site.name.as_str();
        match title {
            None => site_name.to_string(),
            Some(title) => self.config.seo.title_template
                .replace("{title}", title)
                .replace("{site}", site_name),
        }
    }

    pub fn render(&self, meta: &PageMeta, body: &str) -> String {
        let config = self.config;
        let og_image = meta.image.as_deref()
            .or(config.seo.default_image.as_deref())
            .map(|img| absolute_url(&config.site.url, img));

        self.template.render(&LayoutView {
            lang: &config.site.language,
            page_title: self.page_title(meta.title.as_deref()),
            description: meta.description.as_deref().unwrap_or(&config.site.description),
            keywords: config.seo.keywords.join(", "),
            canonical_url: absolute_url(&config.site.url, &meta.route),
            og_type: meta.og_type,
            og_image,
            locale: &config.seo.locale,
            twitter_handle: config.seo.twitter_handle.as_deref(),
            site: SiteView::from_config(config),
            nav: nav_items(&config.nav, &meta.route),
            dark_mode: config.theme.dark_mode,
            theme_head_script: self.theme_head_script.clone(),
            cms_enabled: config.cms.is_some(),
            year: Local::now().year(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use crate::config::parse_config;
    use crate::test_data::SITE_CONFIG;

    use super::*;

    const LAYOUT: &str = "<title>{{page_title}}</title>|{{canonical_url}}|{{og_image}}|{{description}}|\
{{#nav}}[{{label}}{{#active}}*{{/active}}{{#has_children}}:{{dropdown_id}}{{/has_children}}]{{/nav}}|\
{{#dark_mode}}DARK{{/dark_mode}}|{{{body}}}";

    #[test]
    fn test_render_layout() {
        let config = parse_config(SITE_CONFIG, Path::new("/srv")).unwrap();
        let template = Template::new(LAYOUT.to_string()).unwrap();
        let layout = LayoutRenderer::new(&template, &config);

        let mut meta = PageMeta::new("Blog", "/blog/");
        meta.description = Some("All posts".to_string());
        let html = layout.render(&meta, "<main>posts</main>");

        let services_id = crate::nav::dropdown_id("Services");
        assert_eq!(html, format!(
            "<title>Blog | Acme Plumbing</title>|https://acme-plumbing.example/blog/|https://acme-plumbing.example/images/og.png|All posts|\
[Home][Services:{}][Blog*]|DARK|<main>posts</main>", services_id));
    }

    #[test]
    fn test_home_title_and_post_image() {
        let config = parse_config(SITE_CONFIG, Path::new("/srv")).unwrap();
        let template = Template::new("{{page_title}}|{{og_image}}|{{description}}".to_string()).unwrap();
        let layout = LayoutRenderer::new(&template, &config);

        let meta = PageMeta {
            title: None,
            description: None,
            route: "/".to_string(),
            image: Some("/blog/post/hero.jpg".to_string()),
            og_type: "website",
        };
        assert_eq!(layout.render(&meta, ""), "Acme Plumbing|https://acme-plumbing.example/blog/post/hero.jpg|Friendly plumbers since 1998");
    }
}
