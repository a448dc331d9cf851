use std::io;
use std::path::Path;

use flate2::read::GzDecoder;
use tar::Archive;

/// The starter site, packed from `res/` at build time
const STARTER_SITE: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/res.tar.gz"));

pub fn decompress_files(output: &Path) -> io::Result<()> {
    let tar = GzDecoder::new(STARTER_SITE);
    let mut archive = Archive::new(tar);
    archive.unpack(output)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_uncompress() -> io::Result<()> {
        let dir = TempDir::new()?;
        decompress_files(dir.path())?;
        assert!(dir.path().join("sitecraft.toml").is_file());
        assert!(dir.path().join("template/base.tpl").is_file());
        assert!(dir.path().join("content/blog/new-boiler/index.md").is_file());
        Ok(())
    }
}
