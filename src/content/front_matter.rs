use std::io;
use std::io::ErrorKind;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use toml::{Table, Value};

use crate::content::content_file::ContentFile;
use crate::content::content_format::ContentFormat;

const TOML_FENCE: &str = "+++";

/// Front matter fields and the body that follows them
#[derive(Debug, Clone, PartialEq)]
pub struct FrontMatter {
    pub fields: Table,
    pub body: String,
}

/// Splits a content file into front matter and body.
///
/// Two layouts are understood:
///
/// ```text
/// +++                          <!--
/// title = "Hello"              [DATE]: # (2024-01-15)
/// date = 2024-01-15            [TAGS]: # (news rust)
/// +++                          -->
///                              # Hello
/// Body                         Body
/// ```
///
/// In the header layout the title may come from the first heading.
pub fn parse_front_matter(content_file: &ContentFile) -> io::Result<FrontMatter> {
    let raw = content_file.raw_content.as_str();
    let first_line = raw.lines().find(|l| !l.trim().is_empty()).map(str::trim);

    if first_line == Some(TOML_FENCE) {
        parse_toml_front_matter(&content_file.file_path, raw)
    } else {
        parse_header_front_matter(content_file)
    }
}

fn parse_toml_front_matter(file_name: &Path, raw: &str) -> io::Result<FrontMatter> {
    let mut lines = raw.lines().skip_while(|l| l.trim().is_empty());
    lines.next();

    let mut block = String::new();
    let mut closed = false;
    for line in lines.by_ref() {
        if line.trim() == TOML_FENCE {
            closed = true;
            break;
        }
        block.push_str(line);
        block.push('\n');
    }

    if !closed {
        return Err(io::Error::new(
            ErrorKind::InvalidData,
            format!("Closing {} of the front matter is missing - file={}", TOML_FENCE, file_name.display())));
    }

    let fields = match toml::from_str::<Table>(&block) {
        Ok(fields) => fields,
        Err(e) => return Err(io::Error::new(
            ErrorKind::InvalidData,
            format!("Invalid front matter: {} - file={}", e, file_name.display()))),
    };

    Ok(FrontMatter {
        fields,
        body: join_lines(lines),
    })
}

fn parse_header_front_matter(content_file: &ContentFile) -> io::Result<FrontMatter> {
    let file_name = &content_file.file_path;
    let all_lines = content_file.raw_content.lines();
    let mut fields = Table::new();

    let mut lines = all_lines.clone();
    let mut maybe_line = lines.next();

    // Skip optional HTML comment in the beginning
    let mut start_with_comment = false;

    while let Some(line) = maybe_line {
        let line = line.trim();
        if line.is_empty() {
            maybe_line = lines.next();
            continue;
        }
        if line == "<!--" {
            maybe_line = lines.next();
            start_with_comment = true;
        }
        break;
    }

    while let Some(line) = maybe_line {
        if line.trim().is_empty() {
            maybe_line = lines.next();
            continue;
        }

        let Some((key, val)) = extract_header_key_val(line) else {
            break;
        };
        let key = key.to_ascii_lowercase();
        let value = header_value(&key, val);
        fields.insert(key, value);

        maybe_line = lines.next();
    }

    if start_with_comment {
        loop {
            match maybe_line {
                Some(line) if line.trim() == "-->" => {
                    maybe_line = lines.next();
                    break;
                }
                Some(_) => maybe_line = lines.next(),
                None => return Err(io::Error::new(
                    ErrorKind::InvalidData,
                    format!("End of comment in the header is missing - file={}", file_name.display()))),
            }
        }
    }

    // Without any header key the whole file is body
    let (mut lines, mut maybe_line) = if fields.is_empty() {
        let mut lines = all_lines;
        let first = lines.next();
        (lines, first)
    } else {
        (lines, maybe_line)
    };

    while let Some(line) = maybe_line {
        if !line.trim().is_empty() {
            break;
        }
        maybe_line = lines.next();
    }

    if !fields.contains_key("title") {
        let title = maybe_line.and_then(|line| match content_file.format {
            ContentFormat::Markdown => parse_title_markdown(line),
            ContentFormat::Html => parse_title_html(line),
        });
        if let Some(title) = title {
            fields.insert("title".to_string(), Value::String(title));
            maybe_line = lines.next();
            while let Some(line) = maybe_line {
                if !line.trim().is_empty() {
                    break;
                }
                maybe_line = lines.next();
            }
        }
    }

    let mut body = String::new();
    if let Some(line) = maybe_line {
        body.push_str(line);
        body.push('\n');
    }
    body.push_str(&join_lines(lines));

    Ok(FrontMatter { fields, body })
}

fn header_value(key: &str, val: &str) -> Value {
    match key {
        "tags" => Value::Array(extract_tags(val).into_iter().map(Value::String).collect()),
        "draft" => match val.trim() {
            "true" => Value::Boolean(true),
            "false" => Value::Boolean(false),
            other => Value::String(other.to_string()),
        },
        _ => Value::String(val.trim().to_string()),
    }
}

fn parse_title_markdown(line: &str) -> Option<String> {
    line.strip_prefix("# ").map(|title| title.trim().to_string())
}

fn parse_title_html(line: &str) -> Option<String> {
    lazy_static! {
        static ref TITLE_REGEX: Regex = Regex::new(r"<h[12][^>]*>(?P<title>.+)</h[12]>").unwrap();
    }

    TITLE_REGEX.captures(line)
        .and_then(|cap| cap.name("title").map(|v| v.as_str().trim().to_string()))
}

/// Tags are separated by spaces or commas
fn extract_tags(tags_str: &str) -> Vec<String> {
    tags_str.split(|c: char| c == ' ' || c == ',')
        .filter(|x| !x.is_empty())
        .map(|s| s.to_string())
        .collect()
}

fn extract_header_key_val(line: &str) -> Option<(&str, &str)> {
    lazy_static! {
        static ref HEADER_REGEX: Regex = Regex::new(r"^\s*\[(?P<key>\w+)\]: # \((?P<value>.*)\)\s*$").unwrap();
    }

    HEADER_REGEX.captures(line).and_then(|cap| {
        let key = cap.name("key").map(|key| key.as_str());
        let val = cap.name("value").map(|val| val.as_str());
        match (key, val) {
            (Some(key), Some(val)) => Some((key, val)),
            _ => None
        }
    })
}

fn join_lines<'a>(lines: impl Iterator<Item = &'a str>) -> String {
    let mut content = String::new();
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }
    content
}
