//! Static generation of a whole site.
//!
//! The build is planned in memory first: every route is rendered into an
//! [`Output`] before anything touches `output_dir`. [`check`] runs the same
//! plan and throws it away.

use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::{fs, io};

use spdlog::{debug, info};

use crate::assets::{load_site_css, site_script};
use crate::cms::admin_page;
use crate::collection::{load_pages, Collection, TagCount};
use crate::config::Config;
use crate::content::content_renderer::{render_body, RenderOptions};
use crate::content::Content;
use crate::paginator::{page_route as list_page_route, Paginator};
use crate::text_utils::format_iso_date;
use crate::theme::ThemeOptions;
use crate::view::layout::{LayoutRenderer, PageMeta};
use crate::view::list_renderer::{render_home, ListRenderer};
use crate::view::post_renderer::PostRenderer;
use crate::view::rss_renderer::RssChannel;
use crate::view::sitemap_renderer::{render_sitemap, SitemapEntry};
use crate::view::templates::Templates;
use crate::view::{page_route, post_route, resolve_asset, tag_route, SiteView};

pub const BLOG_ROUTE: &str = "/blog/";

#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub include_drafts: bool,
}

impl BuildOptions {
    pub fn from_config(config: &Config) -> BuildOptions {
        BuildOptions { include_drafts: config.build.include_drafts }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuildReport {
    /// Every generated route, sorted
    pub routes: Vec<String>,
    pub post_count: usize,
    pub page_count: usize,
}

enum OutputData {
    Bytes(Vec<u8>),
    CopyOf(PathBuf),
}

struct Output {
    /// Relative to the output directory
    path: PathBuf,
    data: OutputData,
}

#[derive(ramhorns::Content)]
struct NotFoundView {
    site: SiteView,
}

#[derive(Default)]
struct Plan {
    outputs: Vec<Output>,
    routes: BTreeSet<String>,
    sitemap: Vec<SitemapEntry>,
}

impl Plan {
    fn add_route(&mut self, route: &str, data: Vec<u8>) {
        self.outputs.push(Output { path: route_file(route), data: OutputData::Bytes(data) });
        self.routes.insert(route.to_string());
    }

    fn add_html(&mut self, route: &str, html: String, last_mod: Option<String>) {
        self.add_route(route, html.into_bytes());
        self.sitemap.push(SitemapEntry { route: route.to_string(), last_mod });
    }

    fn add_copies(&mut self, src_dir: &Path, dst_dir: &Path, skip: Option<&Path>) -> io::Result<()> {
        for (relative, absolute) in list_files(src_dir)? {
            if skip.map(|s| s == absolute).unwrap_or(false) {
                continue;
            }
            self.outputs.push(Output { path: dst_dir.join(relative), data: OutputData::CopyOf(absolute) });
        }
        Ok(())
    }
}

/// `/` is `index.html`, `/blog/` is `blog/index.html` and `/rss.xml` stays a file
fn route_file(route: &str) -> PathBuf {
    let trimmed = route.trim_start_matches('/');
    if route.ends_with('/') {
        PathBuf::from(trimmed).join("index.html")
    } else {
        PathBuf::from(trimmed)
    }
}

fn list_files(dir: &Path) -> io::Result<Vec<(PathBuf, PathBuf)>> {
    let mut files = vec![];
    if !dir.is_dir() {
        return Ok(files);
    }

    let mut pending = vec![PathBuf::new()];
    while let Some(relative_dir) = pending.pop() {
        let mut entries: Vec<_> = fs::read_dir(dir.join(&relative_dir))?
            .collect::<io::Result<Vec<_>>>()?;
        entries.sort_by_key(|e| e.file_name());
        for entry in entries {
            let relative = relative_dir.join(entry.file_name());
            if entry.file_type()?.is_dir() {
                pending.push(relative);
            } else {
                files.push((relative, entry.path()));
            }
        }
    }
    Ok(files)
}

fn xml_error(e: quick_xml::Error) -> io::Error {
    io::Error::new(ErrorKind::Other, format!("Error writing xml: {}", e))
}

fn plan_site(config: &Config, options: &BuildOptions) -> io::Result<(Plan, BuildReport)> {
    let templates = Templates::load(&config.paths.template_dir)?;
    let collection = Collection::load(&config.paths.content_dir, &config.build.index_base_name, options.include_drafts)?;
    let pages = load_pages(&config.paths.pages_dir, &config.build.index_base_name)?;
    info!("Loaded {} post(s) and {} page(s)", collection.len(), pages.len());

    let layout = LayoutRenderer::new(&templates.base, config);
    let mut plan = Plan::default();

    plan.add_copies(&config.paths.public_dir, Path::new(""), None)?;

    let previews = collection.posts.iter()
        .map(|post| Content::preview(post, post_route(&post.slug)))
        .collect::<io::Result<Vec<_>>>()?;
    let tags = collection.tags();

    // home
    let latest = &previews[..previews.len().min(config.build.home_post_count)];
    let home = render_home(&templates.home, SiteView::from_config(config), latest);
    let home_meta = PageMeta { title: None, ..PageMeta::new("", "/") };
    plan.add_html("/", layout.render(&home_meta, &home), None);

    // blog index and tag indexes
    plan_list(&mut plan, config, &templates, &layout, "Blog", BLOG_ROUTE, &previews, &tags);
    for tag in tags.iter() {
        let tagged: Vec<Content> = previews.iter()
            .filter(|c| c.post.tags.contains(&tag.tag))
            .cloned()
            .collect();
        let heading = format!("Posts tagged \"{}\"", tag.tag);
        plan_list(&mut plan, config, &templates, &layout, &heading, &tag_route(&tag.tag), &tagged, &tags);
    }

    // posts
    let post_renderer = PostRenderer::new(&templates.post);
    for (i, post) in collection.posts.iter().enumerate() {
        let route = post_route(&post.slug);
        let content = Content::full(post, route.clone())?;
        let newer = i.checked_sub(1).and_then(|n| previews.get(n));
        let older = previews.get(i + 1);
        let body = post_renderer.render(&content, newer, older);

        let meta = PageMeta {
            description: post.description.clone(),
            image: post.hero_image.as_deref().map(|img| resolve_asset(&route, img)),
            og_type: "article",
            ..PageMeta::new(&post.title, &route)
        };
        plan.add_html(&route, layout.render(&meta, &body), Some(format_iso_date(&post.date)));

        if let Some(ref asset_dir) = post.asset_dir {
            plan.add_copies(asset_dir, &route_dir(&route), Some(&post.source))?;
        }
    }

    // standalone pages
    let page_renderer = PostRenderer::new(&templates.page);
    for page in pages.iter() {
        let route = page_route(&page.slug);
        let rendered = render_body(page.format, &page.body, &RenderOptions::FullContent)
            .map_err(|e| io::Error::new(e.kind(), format!("{} - file={}", e, page.source.display())))?;
        let body = page_renderer.render_page(page, &rendered);
        let meta = PageMeta { description: page.description.clone(), ..PageMeta::new(&page.title, &route) };
        plan.add_html(&route, layout.render(&meta, &body), None);

        if let Some(ref asset_dir) = page.asset_dir {
            plan.add_copies(asset_dir, &route_dir(&route), Some(&page.source))?;
        }
    }

    let not_found = templates.not_found.render(&NotFoundView { site: SiteView::from_config(config) });
    let not_found_meta = PageMeta::new("Page not found", "/404.html");
    plan.add_route("/404.html", layout.render(&not_found_meta, &not_found).into_bytes());

    if let Some(admin) = admin_page(config) {
        plan.add_route("/admin/", admin.into_bytes());
    }

    let rss = RssChannel {
        ch_title: &config.site.name,
        ch_link: &config.site.url,
        ch_desc: &config.site.description,
        language: &config.site.language,
    };
    let feed_items = &previews[..previews.len().min(config.build.rss_item_count)];
    plan.add_route("/rss.xml", rss.render(feed_items).map_err(xml_error)?);

    let theme = ThemeOptions {
        storage_key: config.theme.storage_key.clone(),
        dark_class: config.theme.dark_class.clone(),
    };
    plan.add_route("/scripts/site.js", site_script(config.theme.dark_mode, &theme).into_bytes());
    plan.add_route("/styles/site.css", load_site_css(&config.paths.template_dir)?.as_bytes().to_vec());

    let sitemap = render_sitemap(&config.site.url, &plan.sitemap).map_err(xml_error)?;
    plan.add_route("/sitemap.xml", sitemap);

    let report = BuildReport {
        routes: plan.routes.iter().cloned().collect(),
        post_count: collection.len(),
        page_count: pages.len(),
    };
    Ok((plan, report))
}

#[allow(clippy::too_many_arguments)]
fn plan_list(plan: &mut Plan, config: &Config, templates: &Templates, layout: &LayoutRenderer,
             heading: &str, base_route: &str, contents: &[Content], tags: &[TagCount]) {
    let paginator = Paginator::from(contents, config.build.page_size);
    let renderer = ListRenderer::new(&templates.list, paginator.page_count().max(1), base_route);

    for (number, items) in paginator.pages() {
        let route = list_page_route(base_route, number);
        let body = renderer.render(heading, items, number, tags);
        let title = if number > 1 { format!("{} - page {}", heading, number) } else { heading.to_string() };
        plan.add_html(&route, layout.render(&PageMeta::new(&title, &route), &body), None);
    }
}

fn route_dir(route: &str) -> PathBuf {
    PathBuf::from(route.trim_matches('/'))
}

/// `output_dir` is wiped on every build, so it may not overlap the site or
/// any directory the build reads from.
fn check_output_dir(config: &Config) -> io::Result<()> {
    let output_dir = &config.paths.output_dir;
    if config.root_dir.starts_with(output_dir) {
        return Err(io::Error::new(ErrorKind::InvalidInput,
                                  format!("Refusing to clean {}, it holds the site itself", output_dir.display())));
    }

    let sources = [
        ("content_dir", &config.paths.content_dir),
        ("pages_dir", &config.paths.pages_dir),
        ("template_dir", &config.paths.template_dir),
        ("public_dir", &config.paths.public_dir),
    ];
    for (name, dir) in sources {
        if dir.starts_with(output_dir) || output_dir.starts_with(dir) {
            return Err(io::Error::new(ErrorKind::InvalidInput,
                                      format!("Refusing to clean {}, it overlaps {} {}",
                                              output_dir.display(), name, dir.display())));
        }
    }
    Ok(())
}

/// Validates configuration, templates and content without writing anything
pub fn check(config: &Config, options: &BuildOptions) -> io::Result<BuildReport> {
    let (_, report) = plan_site(config, options)?;
    Ok(report)
}

pub fn generate(config: &Config, options: &BuildOptions) -> io::Result<BuildReport> {
    let (plan, report) = plan_site(config, options)?;
    let output_dir = &config.paths.output_dir;

    check_output_dir(config)?;
    if output_dir.exists() {
        debug!("Cleaning {}", output_dir.display());
        fs::remove_dir_all(output_dir)?;
    }

    for output in plan.outputs {
        let target = output_dir.join(&output.path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        match output.data {
            OutputData::Bytes(bytes) => fs::write(&target, bytes)?,
            OutputData::CopyOf(source) => {
                fs::copy(&source, &target)?;
            }
        }
    }

    info!("Generated {} route(s) into {}", report.routes.len(), output_dir.display());
    Ok(report)
}
