use ramhorns::Template;

use crate::content::Content;
use crate::content::schema::Page;
use crate::text_utils::{format_date, format_iso_date};
use crate::view::{resolve_asset, ViewTag};

#[derive(ramhorns::Content)]
struct NeighbourLink {
    title: String,
    link: String,
}

#[derive(ramhorns::Content)]
struct ViewItem<'a> {
    post_title: &'a str,
    author: Option<&'a str>,
    description: Option<&'a str>,
    tags: Vec<ViewTag>,
    date: String,
    iso_date: String,
    hero_image: Option<String>,
    post_content: &'a str,
    newer: Option<NeighbourLink>,
    older: Option<NeighbourLink>,
}

#[derive(ramhorns::Content)]
struct PageItem<'a> {
    post_title: &'a str,
    description: Option<&'a str>,
    post_content: &'a str,
}

pub struct PostRenderer<'a> {
    pub template: &'a Template<'static>,
}

impl<'a> PostRenderer<'a> {
    pub fn new(template: &'a Template<'static>) -> PostRenderer<'a> {
        PostRenderer { template }
    }

    /// `newer` and `older` are the neighbouring posts in date order
    pub fn render(&self, content: &Content, newer: Option<&Content>, older: Option<&Content>) -> String {
        let post = content.post;
        let neighbour = |c: &Content| NeighbourLink { title: c.post.title.clone(), link: c.link.clone() };

        self.template.render(&ViewItem {
            post_title: &post.title,
            author: post.author.as_deref(),
            description: post.description.as_deref(),
            tags: post.tags.iter().map(|t| ViewTag::new(t, 0)).collect(),
            date: format_date(&post.date),
            iso_date: format_iso_date(&post.date),
            hero_image: post.hero_image.as_deref().map(|img| resolve_asset(&content.link, img)),
            post_content: &content.rendered,
            newer: newer.map(neighbour),
            older: older.map(neighbour),
        })
    }

    pub fn render_page(&self, page: &Page, rendered: &str) -> String {
        self.template.render(&PageItem {
            post_title: &page.title,
            description: page.description.as_deref(),
            post_content: rendered,
        })
    }
}
