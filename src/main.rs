use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use wpblocks::publish::{self, PublishOptions};
use wpblocks::wordpress::WordPressClient;
use wpblocks::{Config, Error};

#[derive(Parser)]
#[command(name = "wpblocks")]
#[command(about = "Convert Markdown posts to WordPress block markup and publish them")]
#[command(version)]
struct Cli {
    /// Log level when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert one Markdown file
    Convert {
        /// Input Markdown file
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Treat the whole file as the body
        #[arg(long)]
        keep_front_matter: bool,
    },

    /// Print the blocks found in a Markdown file
    Inspect {
        /// Input Markdown file
        input: PathBuf,
    },

    /// Convert the configured posts and send them to WordPress
    Publish {
        /// Config file
        #[arg(short, long, default_value = "wpblocks.toml")]
        config: PathBuf,

        /// Convert and resolve post ids without sending
        #[arg(long)]
        dry_run: bool,

        /// Only publish these files from the config
        files: Vec<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = wpblocks::logging::init(&cli.log_level) {
        eprintln!("Error initialising logging: {}", e);
    }

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> wpblocks::Result<ExitCode> {
    match command {
        Command::Convert {
            input,
            output,
            keep_front_matter,
        } => {
            let source = read(&input)?;
            let html = if keep_front_matter {
                wpblocks::markdown_to_gutenberg(&source)
            } else {
                wpblocks::post_to_gutenberg(&source)
            };

            match output {
                Some(output) => {
                    fs::write(&output, html).map_err(|e| Error::io(&output, e))?;
                    info!("Created {}", output.display());
                }
                None => print!("{}", html),
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Inspect { input } => {
            let source = read(&input)?;
            for spanned in wpblocks::parse_spanned(wpblocks::extract_content(&source)) {
                println!("{}", spanned.describe());
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Publish {
            config,
            dry_run,
            files,
        } => {
            let mut config = Config::load(&config)?;
            config.apply_env();

            let posts = publish::select_posts(&config.posts, &files);
            if posts.is_empty() {
                info!("no posts to publish");
                return Ok(ExitCode::SUCCESS);
            }

            let client = WordPressClient::new(&config.wordpress)?;
            let options = PublishOptions {
                delay: config.publish.delay(),
                dry_run,
            };
            let report = publish::publish_posts(&posts, &client, &options);

            println!(
                "{} published, {} failed",
                report.succeeded(),
                report.failed()
            );
            Ok(if report.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

fn read(path: &Path) -> wpblocks::Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}
