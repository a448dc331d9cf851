pub mod content_file;
pub mod content_format;
pub mod content_renderer;
pub mod front_matter;
pub mod schema;

use std::io;

use crate::content::content_renderer::{render_body, ImagePrefix, RenderOptions};
use crate::content::schema::BlogPost;

/// A post ready for the views: the validated entry plus its rendered HTML
#[derive(Clone)]
pub struct Content<'a> {
    pub post: &'a BlogPost,
    pub link: String,
    pub rendered: String,
}

impl<'a> Content<'a> {
    pub fn preview(post: &'a BlogPost, link: String) -> io::Result<Content<'a>> {
        let options = RenderOptions::PreviewOnly(ImagePrefix(link.clone()));
        let rendered = render_body(post.format, &post.body, &options).map_err(|e| with_source(e, post))?;
        Ok(Content { post, link, rendered })
    }

    pub fn full(post: &'a BlogPost, link: String) -> io::Result<Content<'a>> {
        let rendered = render_body(post.format, &post.body, &RenderOptions::FullContent).map_err(|e| with_source(e, post))?;
        Ok(Content { post, link, rendered })
    }
}

fn with_source(e: io::Error, post: &BlogPost) -> io::Error {
    io::Error::new(e.kind(), format!("{} - file={}", e, post.source.display()))
}
