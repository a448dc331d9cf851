use std::io;
use std::io::ErrorKind;

use lazy_static::lazy_static;
use markdown::Options;
use regex::Regex;

use crate::content::content_format::ContentFormat;

pub const MORE_TAG: &str = "<!-- more -->";

#[derive(Clone, Debug)]
pub struct ImagePrefix(pub String);

#[derive(Clone, Debug)]
pub enum RenderOptions {
    /// Content up to the `<!-- more -->` marker, with relative images
    /// pointing at the entry's own route
    PreviewOnly(ImagePrefix),
    FullContent,
}

pub trait ContentRenderer {
    fn render(body: &str, render_options: &RenderOptions) -> io::Result<String>;
}

pub struct MarkdownRenderer {}

pub struct HtmlRenderer {}

pub fn render_body(format: ContentFormat, body: &str, render_options: &RenderOptions) -> io::Result<String> {
    match format {
        ContentFormat::Markdown => MarkdownRenderer::render(body, render_options),
        ContentFormat::Html => HtmlRenderer::render(body, render_options),
    }
}

pub fn extract_content(body: &str, render_options: &RenderOptions) -> String {
    match render_options {
        RenderOptions::PreviewOnly(_) => {
            let mut content = String::new();
            for line in body.lines() {
                if line.contains(MORE_TAG) {
                    break;
                }
                content.push_str(line);
                content.push('\n');
            }
            content
        }
        RenderOptions::FullContent => body.to_string(),
    }
}

pub fn remove_comments(md_post: &str) -> io::Result<String> {
    let mut res: String = String::new();
    let mut slice = Some(md_post);

    let start_comment = "<!--";
    let end_comment = "-->";

    while let Some(block) = slice {
        let md_buf: &str = match block.find(start_comment) {
            Some(start) => {
                let to_render: &str = &block[0..start];

                let next: &str = &block[(start + start_comment.len())..];
                match next.find(end_comment) {
                    Some(end) => {
                        slice = Some(&next[(end + end_comment.len())..]);
                    }
                    None => {
                        return Err(io::Error::new(
                            ErrorKind::InvalidData,
                            "Error finding end of comment",
                        ));
                    }
                };

                to_render
            }
            None => {
                slice = None;
                block
            }
        };
        res.push_str(md_buf);
    }

    Ok(res)
}

fn with_trailing_slash(prefix: &str) -> String {
    if prefix.ends_with('/') {
        prefix.to_string()
    } else {
        format!("{}/", prefix)
    }
}

fn is_relative_url(url: &str) -> bool {
    !(url.contains("://") || url.starts_with('/') || url.starts_with('#') || url.starts_with("data:"))
}

impl ContentRenderer for MarkdownRenderer {
    fn render(body: &str, render_options: &RenderOptions) -> io::Result<String> {
        let content = extract_content(body, render_options);
        let buf = remove_comments(&content)?;
        let buf = match render_options {
            RenderOptions::PreviewOnly(ImagePrefix(prefix)) => Self::change_images(prefix, &buf),
            RenderOptions::FullContent => buf,
        };

        match markdown::to_html_with_options(buf.as_str(), &Options::gfm()) {
            Ok(x) => Ok(x),
            Err(e) => Err(io::Error::new(ErrorKind::InvalidInput, e.reason.as_str())),
        }
    }
}

impl MarkdownRenderer {
    fn change_images(prefix: &str, md_post: &str) -> String {
        lazy_static! {
            static ref MD_IMAGE_REGEX: Regex = Regex::new(r"!\[(?P<alt>[^\]]*)\]\((?P<url>[^)\s]+)(?P<rest>[^)]*)\)").unwrap();
        }

        let prefix = with_trailing_slash(prefix);
        MD_IMAGE_REGEX.replace_all(md_post, |caps: &regex::Captures| {
            let url = &caps["url"];
            if is_relative_url(url) {
                format!("![{}]({}{}{})", &caps["alt"], prefix, url.trim_start_matches("./"), &caps["rest"])
            } else {
                caps[0].to_string()
            }
        }).to_string()
    }
}

impl ContentRenderer for HtmlRenderer {
    fn render(body: &str, render_options: &RenderOptions) -> io::Result<String> {
        let content = extract_content(body, render_options);
        let rendered = match render_options {
            RenderOptions::PreviewOnly(ImagePrefix(prefix)) => Self::change_images(prefix, &remove_comments(&content)?),
            RenderOptions::FullContent => content,
        };
        Ok(rendered)
    }
}

impl HtmlRenderer {
    fn change_images(prefix: &str, html: &str) -> String {
        lazy_static! {
            static ref IMG_REGEX: Regex = Regex::new(r#"<img[^>]*src="([^"]*)"[^>]*>"#).unwrap();
        }

        let prefix = with_trailing_slash(prefix);
        IMG_REGEX.replace_all(html, |captures: &regex::Captures| {
            let tag = &captures[0];
            let src = &captures[1];
            if is_relative_url(src) {
                let prefixed_src = format!("{}{}", prefix, src.trim_start_matches("./"));
                tag.replace(&format!("src=\"{}\"", src), &format!("src=\"{}\"", prefixed_src))
            } else {
                tag.to_string()
            }
        }).to_string()
    }
}
