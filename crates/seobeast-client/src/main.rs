//! `seobeast`: inspect the content a SEOBeast website exposes.
//!
//! Reads `SEOBEAST_API_URL` / `SEOBEAST_WEBSITE_SLUG`; `--api-url` and
//! `--website` override them. Output is
//! pretty-printed JSON on stdout, logs go to stderr (`RUST_LOG`).

use anyhow::Context;
use clap::{Parser, Subcommand};
use seobeast_client::{ApiConfig, PostsQuery, SeobeastClient};
use seobeast_std::SystemEnv;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "seobeast")]
#[command(about = "Query the SEOBeast public content API", long_about = None)]
struct Args {
    /// Overrides SEOBEAST_API_URL.
    #[arg(long)]
    api_url: Option<String>,

    /// Overrides SEOBEAST_WEBSITE_SLUG.
    #[arg(long)]
    website: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List published posts.
    Posts {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        tag: Option<String>,
    },
    /// Fetch one post by slug.
    Post { slug: String },
    Categories,
    Tags,
    /// Print the RSS feed URL.
    Feed,
}

fn api_config(args: &Args) -> ApiConfig {
    let mut config = ApiConfig::from_env(&SystemEnv);
    if let Some(url) = &args.api_url {
        config.base_url = url.clone();
    }
    if let Some(website) = &args.website {
        config.website_slug = website.clone();
    }
    config
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let client = SeobeastClient::new(&api_config(&args)).context("invalid API configuration")?;

    match args.command {
        Command::Posts {
            page,
            limit,
            category,
            tag,
        } => {
            let query = PostsQuery {
                page,
                limit,
                category,
                tag,
            };
            print_json(&client.get_posts(&query).await?)
        }
        Command::Post { slug } => print_json(&client.get_post(&slug).await?),
        Command::Categories => print_json(&client.get_categories().await?),
        Command::Tags => print_json(&client.get_tags().await?),
        Command::Feed => {
            println!("{}", client.feed_url());
            Ok(())
        }
    }
}
