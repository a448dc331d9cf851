use std::io::Cursor;

use chrono::{TimeZone, Utc};
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::content::Content;
use crate::view::absolute_url;

/* Example
<?xml version="1.0" encoding="UTF-8" ?>
<rss version="2.0">
<channel>
  <title>Acme Plumbing</title>
  <link>https://acme-plumbing.example</link>
  <description>Friendly plumbers since 1998</description>
  <item>
    <title>Keeping pipes safe in winter</title>
    <link>https://acme-plumbing.example/blog/winter-pipes/</link>
    <guid isPermaLink="true">https://acme-plumbing.example/blog/winter-pipes/</guid>
    <description><![CDATA[<p>Cold snaps are hard on plumbing.</p>]]></description>
    <category>winter</category>
    <pubDate>Mon, 15 Jan 2024 09:30:00 +0000</pubDate>
  </item>
</channel>
</rss>
*/

pub struct RssChannel<'a> {
    pub ch_title: &'a str,
    pub ch_link: &'a str,
    pub ch_desc: &'a str,
    pub language: &'a str,
}

impl<'a> RssChannel<'a> {
    pub fn render(&self, contents: &[Content]) -> quick_xml::Result<Vec<u8>> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));

        let decl = Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None));
        writer.write_event(decl)?;

        let mut rss = BytesStart::new("rss");
        rss.push_attribute(("version", "2.0"));
        writer.write_event(Event::Start(rss))?;

        writer.write_event(Event::Start(BytesStart::new("channel")))?;
        push_text(&mut writer, "title", self.ch_title)?;
        push_text(&mut writer, "link", self.ch_link)?;
        push_text(&mut writer, "description", self.ch_desc)?;
        push_text(&mut writer, "language", self.language)?;

        for content in contents {
            writer.write_event(Event::Start(BytesStart::new("item")))?;

            push_text(&mut writer, "title", &content.post.title)?;

            let link = absolute_url(self.ch_link, &content.link);
            push_text(&mut writer, "link", &link)?;

            let mut guid_elem = BytesStart::new("guid");
            guid_elem.push_attribute(("isPermaLink", "true"));
            writer.write_event(Event::Start(guid_elem))?;
            writer.write_event(Event::Text(BytesText::new(&link)))?;
            writer.write_event(Event::End(BytesEnd::new("guid")))?;

            let description = content.post.description.as_deref().unwrap_or(&content.rendered);
            push_cdata(&mut writer, "description", description)?;

            for tag in content.post.tags.iter() {
                push_text(&mut writer, "category", tag)?;
            }

            let dt = Utc.from_utc_datetime(&content.post.date);
            push_text(&mut writer, "pubDate", &dt.to_rfc2822())?;

            writer.write_event(Event::End(BytesEnd::new("item")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("channel")))?;
        writer.write_event(Event::End(BytesEnd::new("rss")))?;

        Ok(writer.into_inner().into_inner())
    }
}

fn push_text(writer: &mut Writer<Cursor<Vec<u8>>>, tag: &str, text: &str) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn push_cdata(writer: &mut Writer<Cursor<Vec<u8>>>, tag: &str, text: &str) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    if text.contains("]]>") {
        let new_text = text.replace("]]>", "]] >");
        writer.write_event(Event::CData(BytesCData::new(&new_text)))?;
    } else {
        writer.write_event(Event::CData(BytesCData::new(text)))?;
    }
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::path::PathBuf;
    use std::str;

    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

    use crate::content::content_format::ContentFormat;
    use crate::content::schema::BlogPost;

    use super::*;

    fn create_post(id: &str, description: Option<&str>) -> BlogPost {
        let dt = NaiveDateTime::new(
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            NaiveTime::from_hms_opt(5, 6, 7).unwrap(),
        );
        BlogPost {
            slug: format!("post-{}", id),
            source: PathBuf::from(format!("post-{}.md", id)),
            asset_dir: None,
            format: ContentFormat::Markdown,
            title: format!("title-of-post-{}", id),
            date: dt,
            description: description.map(str::to_string),
            author: None,
            tags: BTreeSet::from([format!("tag-{}", id)]),
            hero_image: None,
            draft: false,
            body: String::new(),
        }
    }

    #[test]
    fn render_xml() {
        let first = create_post("1", None);
        let second = create_post("2", Some("described & short"));
        let contents = vec![
            Content { post: &first, link: "/blog/post-1/".to_string(), rendered: "summary-of-post-1".to_string() },
            Content { post: &second, link: "/blog/post-2/".to_string(), rendered: "summary-of-post-2".to_string() },
        ];

        let rss = RssChannel {
            ch_title: "my feed",
            ch_link: "https://acme.example",
            ch_desc: "My blog feed",
            language: "en",
        };
        let xml = rss.render(&contents).unwrap();
        assert_eq!(str::from_utf8(&xml).unwrap(), EXPECTED);
    }

    const EXPECTED: &str = r##"<?xml version="1.0" encoding="UTF-8"?><rss version="2.0"><channel><title>my feed</title><link>https://acme.example</link><description>My blog feed</description><language>en</language><item><title>title-of-post-1</title><link>https://acme.example/blog/post-1/</link><guid isPermaLink="true">https://acme.example/blog/post-1/</guid><description><![CDATA[summary-of-post-1]]></description><category>tag-1</category><pubDate>Tue, 2 Jan 2024 05:06:07 +0000</pubDate></item><item><title>title-of-post-2</title><link>https://acme.example/blog/post-2/</link><guid isPermaLink="true">https://acme.example/blog/post-2/</guid><description><![CDATA[described & short]]></description><category>tag-2</category><pubDate>Tue, 2 Jan 2024 05:06:07 +0000</pubDate></item></channel></rss>"##;
}
