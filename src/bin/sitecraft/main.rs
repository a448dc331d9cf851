use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use spdlog::{info, warn};

use sitecraft::config::Config;
use sitecraft::generator::{check, generate, BuildOptions, BuildReport};
use sitecraft::logger::configure_logger;
use sitecraft::server::server_run;

use crate::bootstrap::bootstrap_cmd;
use crate::config::open_config;
use crate::maintenance::{remove_cms_cmd, remove_dark_mode_cmd, remove_demo_cmd};
use crate::post::post_cmd;

mod bootstrap;
mod config;
mod decompress;
mod maintenance;
mod post;

const CFG_FILE_NAME: &str = "sitecraft.toml";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path of sitecraft.toml. Searched in the current directory, the
    /// executable's directory and the user config directory when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Builds the site including drafts and serves it
    Dev,
    /// Builds the site into the output directory
    Build {
        /// Include posts marked as draft
        #[arg(long)]
        drafts: bool,
    },
    /// Serves an already built site
    Preview,
    /// Validates configuration, templates and content without writing anything
    Check,
    /// Creates a new site from the starter template
    Init {
        /// Directory where the new site will be created
        #[arg(short, long)]
        out_dir: PathBuf,
    },
    /// Creates a new blog post
    NewPost(NewPostArgs),
    /// Removes the CMS admin page
    RemoveCms,
    /// Deletes the demo content shipped with the starter
    RemoveDemo,
    /// Turns the dark mode toggle off
    RemoveDarkMode,
}

#[derive(Args, Debug)]
struct NewPostArgs {
    /// Title of the post
    #[arg(short, long)]
    title: String,

    /// Name of the author. If empty, OS user real name is being used
    #[arg(short, long)]
    author: Option<String>,

    /// Creates `<slug>/index.md`, for posts with images next to them
    #[arg(long)]
    dir: bool,

    /// Marks the post as draft
    #[arg(long)]
    draft: bool,
}

fn print_report(action: &str, config: &Config, report: &BuildReport) {
    info!("{} {} route(s): {} post(s), {} page(s)", action, report.routes.len(), report.post_count, report.page_count);
    for route in report.routes.iter() {
        println!("  {}", route);
    }
    println!("Output directory: {}", config.paths.output_dir.display());
}

#[ntex::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let command = match cli.command {
        Command::Init { out_dir } => return bootstrap_cmd(&out_dir),
        command => command,
    };

    let (cfg_path, config) = open_config(cli.config)?;
    if let Err(err) = configure_logger(&config) {
        warn!("Error creating logger sinks. Using console instead. Desc={}", err);
    }
    info!("Using configuration {}", cfg_path.display());

    match command {
        Command::Dev => {
            let options = BuildOptions { include_drafts: true };
            let report = generate(&config, &options)?;
            print_report("Built", &config, &report);
            server_run(config).await?;
        }
        Command::Build { drafts } => {
            let options = BuildOptions { include_drafts: drafts || config.build.include_drafts };
            let report = generate(&config, &options)?;
            print_report("Built", &config, &report);
        }
        Command::Preview => server_run(config).await?,
        Command::Check => {
            let report = check(&config, &BuildOptions::from_config(&config))?;
            info!("Everything is valid: {} route(s), {} post(s), {} page(s)",
                  report.routes.len(), report.post_count, report.page_count);
        }
        Command::NewPost(args) => {
            let path = post_cmd(args, &config)?;
            println!("{}", path.display());
        }
        Command::RemoveCms => remove_cms_cmd(&cfg_path)?,
        Command::RemoveDemo => remove_demo_cmd(&cfg_path, &config)?,
        Command::RemoveDarkMode => remove_dark_mode_cmd(&cfg_path)?,
        Command::Init { .. } => unreachable!("handled before loading the configuration"),
    }

    Ok(())
}
