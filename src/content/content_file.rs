use std::{fs, io};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::content::content_format::ContentFormat;

/// A content source as found on disk, before any parsing
#[derive(Debug, Clone)]
pub struct ContentFile {
    pub slug: String,
    pub file_path: PathBuf,
    /// Set for directory entries (`post/index.md`), whose siblings are assets
    pub asset_dir: Option<PathBuf>,
    pub format: ContentFormat,
    pub raw_content: String,
}

impl ContentFile {
    pub fn from_file(slug: String, file_path: PathBuf, asset_dir: Option<PathBuf>) -> io::Result<ContentFile> {
        let format = match Self::guess_type(&file_path) {
            None => return Err(io::Error::new(ErrorKind::Unsupported, format!("Could not guess the type of the file {}", file_path.display()))),
            Some(format) => format,
        };

        let raw_content = fs::read_to_string(&file_path)?;

        Ok(ContentFile {
            slug,
            file_path,
            asset_dir,
            format,
            raw_content,
        })
    }

    pub fn from_string(slug: &str, file_path: &str, raw_content: &str) -> ContentFile {
        let file_path = PathBuf::from(file_path);
        let format = Self::guess_type(&file_path).unwrap_or(ContentFormat::Markdown);
        ContentFile {
            slug: slug.to_string(),
            file_path,
            asset_dir: None,
            format,
            raw_content: raw_content.to_string(),
        }
    }

    pub fn guess_type(file_name: &Path) -> Option<ContentFormat> {
        let ext = file_name.extension()?.to_str()?.to_ascii_lowercase();
        ContentFormat::from_extension(&ext)
    }
}
