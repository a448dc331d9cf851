use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use chrono::{Local, NaiveDateTime};
use spdlog::info;

use sitecraft::config::Config;
use sitecraft::text_utils::slugify;
use sitecraft::util::os_helper::get_name;

use crate::NewPostArgs;

fn toml_string(value: &str) -> String {
    toml::Value::String(value.to_string()).to_string()
}

fn render_front_matter(title: &str, author: &str, date: &NaiveDateTime, draft: bool) -> String {
    let mut buf = String::new();

    let _ = writeln!(&mut buf, "+++");
    let _ = writeln!(&mut buf, "title = {}", toml_string(title));
    let _ = writeln!(&mut buf, "date = {}", date.format("%Y-%m-%dT%H:%M:%S"));
    let _ = writeln!(&mut buf, "# description = \"One sentence for lists and search engines\"");
    let _ = writeln!(&mut buf, "author = {}", toml_string(author));
    let _ = writeln!(&mut buf, "tags = []");
    let _ = writeln!(&mut buf, "# hero_image = \"hero.jpg\"");
    let _ = writeln!(&mut buf, "draft = {}", draft);
    let _ = writeln!(&mut buf, "+++");
    buf
}

fn render_body() -> String {
    let mut buf = String::new();

    let _ = writeln!(&mut buf);
    let _ = writeln!(&mut buf, "This is the introduction, shown in post lists.");
    let _ = writeln!(&mut buf);
    let _ = writeln!(&mut buf, "<!-- more -->");
    let _ = writeln!(&mut buf);
    let _ = writeln!(&mut buf, "And this is the rest of your post.");

    buf
}

/// `<slug>.md`, or `<slug>/index.md` for posts that keep images next to them
fn post_path(content_dir: &Path, slug: &str, as_dir: bool, index_base_name: &str) -> PathBuf {
    if as_dir {
        content_dir.join(slug).join(format!("{}.md", index_base_name))
    } else {
        content_dir.join(format!("{}.md", slug))
    }
}

pub fn post_cmd(args: NewPostArgs, config: &Config) -> Result<PathBuf> {
    let slug = slugify(&args.title);
    if slug.is_empty() {
        bail!("Cannot derive a file name from the title '{}'", args.title);
    }

    let author = args.author.clone().unwrap_or_else(get_name);
    let date = Local::now().naive_local();

    let path = post_path(&config.paths.content_dir, &slug, args.dir, &config.build.index_base_name);
    let existing = if args.dir { path.parent().map(Path::to_path_buf) } else { Some(path.clone()) };
    if existing.map(|p| p.exists()).unwrap_or(false) {
        bail!("A post named '{}' already exists", slug);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut post = render_front_matter(&args.title, &author, &date, args.draft);
    post.push_str(&render_body());
    fs::write(&path, post)?;

    info!("Created post {}", path.display());
    Ok(path)
}
