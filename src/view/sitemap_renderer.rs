use std::io::Cursor;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::view::absolute_url;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

pub struct SitemapEntry {
    pub route: String,
    /// `YYYY-MM-DD`
    pub last_mod: Option<String>,
}

impl SitemapEntry {
    pub fn new(route: &str) -> SitemapEntry {
        SitemapEntry { route: route.to_string(), last_mod: None }
    }
}

pub fn render_sitemap(site_url: &str, entries: &[SitemapEntry]) -> quick_xml::Result<Vec<u8>> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut urlset = BytesStart::new("urlset");
    urlset.push_attribute(("xmlns", SITEMAP_NS));
    writer.write_event(Event::Start(urlset))?;

    for entry in entries {
        writer.write_event(Event::Start(BytesStart::new("url")))?;
        push_text(&mut writer, "loc", &absolute_url(site_url, &entry.route))?;
        if let Some(ref last_mod) = entry.last_mod {
            push_text(&mut writer, "lastmod", last_mod)?;
        }
        writer.write_event(Event::End(BytesEnd::new("url")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("urlset")))?;
    Ok(writer.into_inner().into_inner())
}

fn push_text(writer: &mut Writer<Cursor<Vec<u8>>>, tag: &str, text: &str) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::str;

    use super::*;

    #[test]
    fn test_render_sitemap() {
        let entries = vec![
            SitemapEntry::new("/"),
            SitemapEntry { route: "/blog/a&b/".to_string(), last_mod: Some("2024-01-15".to_string()) },
        ];
        let xml = render_sitemap("https://acme.example/", &entries).unwrap();
        assert_eq!(str::from_utf8(&xml).unwrap(),
                   "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\
<url><loc>https://acme.example/</loc></url>\
<url><loc>https://acme.example/blog/a&amp;b/</loc><lastmod>2024-01-15</lastmod></url>\
</urlset>");
    }
}
