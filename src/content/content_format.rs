#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ContentFormat {
    Markdown,
    Html,
}

impl ContentFormat {
    pub fn from_extension(ext: &str) -> Option<ContentFormat> {
        match ext {
            "md" | "markdown" => Some(ContentFormat::Markdown),
            "html" | "htm" => Some(ContentFormat::Html),
            _ => None,
        }
    }
}
