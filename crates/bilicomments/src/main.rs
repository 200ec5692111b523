// SPDX-FileCopyrightText: 2026 bilicomments Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! bilicomments - Bilibili comments for AI agents.
//!
//! Binary entry point: runs the MCP server on stdio, or fetches one page of
//! comments from the command line for manual checks.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod credentials;
mod server;
mod tools;

use std::path::PathBuf;

use bilicomments_client::BiliClient;
use bilicomments_config::BiliConfig;
use bilicomments_core::BiliError;
use clap::{Args, Parser, Subcommand};
use tracing::{error, info, warn};

use crate::tools::{
    failure_text, CommentTools, DynamicCommentsArgs, VideoAid, VideoCommentsArgs,
    DYNAMIC_FAILURE_PREFIX, VIDEO_FAILURE_PREFIX,
};

/// bilicomments - Bilibili comments for AI agents.
#[derive(Parser, Debug)]
#[command(name = "bilicomments", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the default search path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the MCP server on stdio (default).
    Serve,
    /// Print one page of comments for a video (BV id, av id or numeric aid).
    Video {
        id: String,
        /// 0 sorts by time, 1 by popularity.
        #[arg(long, default_value_t = 0)]
        sort: i64,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Print one page of comments for a dynamic.
    Dynamic {
        id: String,
        #[command(flatten)]
        page: PageArgs,
    },
}

#[derive(Args, Debug)]
struct PageArgs {
    #[arg(long, default_value_t = 1)]
    page: i64,
    #[arg(long, default_value_t = 20)]
    page_size: i64,
    /// Skip nested replies.
    #[arg(long)]
    no_replies: bool,
    /// Output format: markdown or json.
    #[arg(long, default_value = "markdown")]
    format: String,
    /// Cookie containing SESSDATA; falls back to BILIBILI_SESSDATA.
    #[arg(long)]
    cookie: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => bilicomments_config::load_and_validate_path(path),
        None => bilicomments_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            bilicomments_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.server.log_level);

    if let Err(e) = run(cli.command.unwrap_or(Commands::Serve), &config).await {
        error!(error = %e, "bilicomments exited with an error");
        eprintln!("bilicomments: {e}");
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: &BiliConfig) -> Result<(), BiliError> {
    let client = BiliClient::new(config)?;
    let configured = config.credentials.sessdata.clone();
    if credentials::has_ambient_sessdata(configured.as_deref()) {
        info!("session cookie available from environment or config");
    } else {
        warn!(
            "no {} set and no credentials.sessdata configured; every call must pass a cookie",
            credentials::SESSDATA_ENV_VAR
        );
    }
    let tools = CommentTools::new(client, configured);

    match command {
        Commands::Serve => server::run_server(tools).await,
        Commands::Video { id, sort, page } => {
            let (bvid, aid) = if id.starts_with("BV") || id.starts_with("bv") {
                (Some(id), None)
            } else {
                (None, Some(VideoAid::Text(id)))
            };
            let args = VideoCommentsArgs {
                bvid,
                aid,
                page: page.page,
                page_size: page.page_size,
                sort,
                include_replies: !page.no_replies,
                output_format: page.format,
                cookie: page.cookie,
            };
            print_outcome(tools.video_comments(args).await, VIDEO_FAILURE_PREFIX)
        }
        Commands::Dynamic { id, page } => {
            let args = DynamicCommentsArgs {
                dynamic_id: id,
                page: page.page,
                page_size: page.page_size,
                include_replies: !page.no_replies,
                output_format: page.format,
                cookie: page.cookie,
            };
            print_outcome(tools.dynamic_comments(args).await, DYNAMIC_FAILURE_PREFIX)
        }
    }
}

/// Prints a one-shot result the way the tool would return it.
fn print_outcome(result: Result<String, BiliError>, prefix: &str) -> Result<(), BiliError> {
    match result {
        Ok(text) => {
            println!("{text}");
            Ok(())
        }
        Err(err) => {
            println!("{}", failure_text(prefix, &err));
            Err(err)
        }
    }
}

/// Logs go to stderr; stdout carries the MCP transport.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "bilicomments={log_level},bilicomments_client={log_level},bilicomments_wbi={log_level},bilicomments_resilience={log_level},warn"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_ansi(false)
        .init();
}
