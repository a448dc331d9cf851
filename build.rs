use std::fs::File;
use std::path::{Path, PathBuf};
use std::{env, io};

use flate2::write::GzEncoder;
use flate2::Compression;

// Packs the starter site under `res/` into `$OUT_DIR/res.tar.gz`,
// which `sitecraft init` unpacks.
fn compress_dir(src_dir: &Path, archive_path: &Path) -> io::Result<()> {
    let tar_gz = File::create(archive_path)?;
    let enc = GzEncoder::new(tar_gz, Compression::default());
    let mut tar = tar::Builder::new(enc);
    tar.append_dir_all(".", src_dir)?;
    tar.into_inner()?.finish()?;
    Ok(())
}

fn main() -> io::Result<()> {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").map_err(io::Error::other)?;
    let out_dir = env::var("OUT_DIR").map_err(io::Error::other)?;

    let res_dir = PathBuf::from(manifest_dir).join("res");
    println!("cargo:rerun-if-changed={}", res_dir.display());

    compress_dir(&res_dir, &PathBuf::from(out_dir).join("res.tar.gz"))
}
