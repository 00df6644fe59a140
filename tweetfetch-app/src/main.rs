//! `tweetfetch` binary: load config, run one fetch, print JSON to stdout.
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tweetfetch_common::observability::init_logging;
use tweetfetch_config::{TweetfetchConfig, TweetfetchConfigLoader};
use tweetfetch_http::{HttpClient, ReqwestTransport};
use tweetfetch_social::twitter::{Credentials, TwitterApi};

use cli::{Cli, Command};
mod cli;

const DEFAULT_CONFIG_FILE: &str = "tweetfetch.yaml";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) Load config (env wins)
    let cfg = load_config(cli.config.as_deref())?;

    // 2) Logging goes to a file so stdout stays clean JSON
    let log_path = init_logging(cfg.logging.to_log_config())?;
    tracing::info!(log = %log_path.display(), base_url = %cfg.twitter.base_url, "tweetfetch starting");

    let api = build_api(&cfg)?;

    let tweets = match &cli.command {
        Command::Search(args) => api.fetch_by_search(args.to_options()).await,
        Command::Timeline(args) => api.fetch_by_user(args.to_options()).await,
    }
    .inspect_err(|e| tracing::error!(error = %e, "fetch failed"))?;

    tracing::info!(count = tweets.len(), "fetch complete");

    let out = if cli.pretty {
        serde_json::to_string_pretty(&tweets)?
    } else {
        serde_json::to_string(&tweets)?
    };
    println!("{out}");
    Ok(())
}

fn load_config(explicit: Option<&Path>) -> Result<TweetfetchConfig> {
    let loader = match explicit {
        Some(path) => TweetfetchConfigLoader::new().with_file(path),
        None => TweetfetchConfigLoader::new().with_optional_file(DEFAULT_CONFIG_FILE),
    };
    loader.load().context("failed to load configuration")
}

fn build_api(cfg: &TweetfetchConfig) -> Result<TwitterApi> {
    let transport = ReqwestTransport::new(&cfg.twitter.base_url)
        .with_context(|| format!("invalid twitter.base_url {:?}", cfg.twitter.base_url))?;
    let http = HttpClient::new(Arc::new(transport)).with_user_agent(&cfg.twitter.user_agent);
    let credentials = Credentials::new(&cfg.twitter.api_key, &cfg.twitter.api_secret);
    Ok(TwitterApi::with_http(credentials, http)?)
}
