use ramhorns::Template;

use crate::collection::TagCount;
use crate::content::Content;
use crate::paginator::page_route;
use crate::view::{PostItem, SiteView, ViewTag};

#[derive(ramhorns::Content)]
struct ListPage<'a> {
    heading: &'a str,
    post_list: Vec<PostItem>,
    has_posts: bool,
    tags: Vec<ViewTag>,
    page_list: Vec<ViewPagination>,
    show_pagination: bool,
    prev_link: Option<String>,
    next_link: Option<String>,
}

#[derive(ramhorns::Content)]
struct ViewPagination {
    current: bool,
    number: u32,
    link: String,
}

#[derive(ramhorns::Content)]
struct HomePage {
    site: SiteView,
    post_list: Vec<PostItem>,
    has_posts: bool,
}

pub struct ListRenderer<'a> {
    pub template: &'a Template<'static>,
    pub page_count: u32,
    /// Route of the first page, e.g. `/blog/`
    pub base_route: String,
}

impl<'a> ListRenderer<'a> {
    pub fn new(template: &'a Template<'static>, page_count: u32, base_route: &str) -> ListRenderer<'a> {
        ListRenderer {
            template,
            page_count,
            base_route: base_route.to_string(),
        }
    }

    pub fn render(&self, heading: &str, contents: &[Content], cur_page: u32, tags: &[TagCount]) -> String {
        let post_list: Vec<PostItem> = contents.iter().map(PostItem::from_content).collect();

        let mut page_list: Vec<ViewPagination> = Vec::with_capacity(self.page_count as usize);
        for i in 1..=self.page_count {
            page_list.push(ViewPagination {
                current: i == cur_page,
                number: i,
                link: page_route(&self.base_route, i),
            })
        }

        let prev_link = (cur_page > 1).then(|| page_route(&self.base_route, cur_page - 1));
        let next_link = (cur_page < self.page_count).then(|| page_route(&self.base_route, cur_page + 1));

        self.template.render(&ListPage {
            heading,
            has_posts: !post_list.is_empty(),
            post_list,
            tags: tags.iter().map(|t| ViewTag::new(&t.tag, t.count)).collect(),
            page_list,
            show_pagination: self.page_count > 1,
            prev_link,
            next_link,
        })
    }
}

pub fn render_home(template: &Template<'static>, site: SiteView, contents: &[Content]) -> String {
    let post_list: Vec<PostItem> = contents.iter().map(PostItem::from_content).collect();
    template.render(&HomePage {
        site,
        has_posts: !post_list.is_empty(),
        post_list,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::path::PathBuf;

    use chrono::NaiveDate;

    use crate::content::content_format::ContentFormat;
    use crate::content::schema::BlogPost;

    use super::*;

    fn blog_post(slug: &str, day: u32) -> BlogPost {
        BlogPost {
            slug: slug.to_string(),
            source: PathBuf::from(format!("{}.md", slug)),
            asset_dir: None,
            format: ContentFormat::Markdown,
            title: format!("Title {}", slug),
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap().and_hms_opt(0, 0, 0).unwrap(),
            description: None,
            author: None,
            tags: BTreeSet::new(),
            hero_image: None,
            draft: false,
            body: String::new(),
        }
    }

    const LIST_TPL: &str = "{{heading}}:{{#post_list}}[{{title}}|{{link}}|{{date}}|{{{summary}}}]{{/post_list}}\
{{^has_posts}}none{{/has_posts}}|{{#tags}}{{tag}}({{count}}){{/tags}}|\
{{#show_pagination}}{{#page_list}}{{#current}}*{{/current}}{{number}}={{link}} {{/page_list}}{{/show_pagination}}|\
{{#prev_link}}prev={{prev_link}}{{/prev_link}} {{#next_link}}next={{next_link}}{{/next_link}}";

    #[test]
    fn test_render_list_page() {
        let template = Template::new(LIST_TPL.to_string()).unwrap();
        let renderer = ListRenderer::new(&template, 3, "/blog/");

        let a = blog_post("a", 5);
        let b = blog_post("b", 4);
        let contents = vec![
            Content { post: &a, link: "/blog/a/".to_string(), rendered: "<p>A</p>".to_string() },
            Content { post: &b, link: "/blog/b/".to_string(), rendered: "<p>B</p>".to_string() },
        ];
        let tags = vec![TagCount { tag: "news".to_string(), slug: "news".to_string(), count: 4 }];

        let res = renderer.render("Blog", &contents, 2, &tags);
        assert_eq!(res, "Blog:[Title a|/blog/a/|March 5, 2024|<p>A</p>][Title b|/blog/b/|March 4, 2024|<p>B</p>]|news(4)|\
1=/blog/ *2=/blog/page/2/ 3=/blog/page/3/ |prev=/blog/ next=/blog/page/3/");
    }

    #[test]
    fn test_render_empty_single_page() {
        let template = Template::new(LIST_TPL.to_string()).unwrap();
        let renderer = ListRenderer::new(&template, 1, "/blog/tag/news/");
        let res = renderer.render("Tag: news", &[], 1, &[]);
        assert_eq!(res, "Tag: news:none||| ");
    }
}
