use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use appshelf_catalog::{Catalog, CatalogLoader, CatalogSource, LoadedCatalog};
use appshelf_fetch::{AssetFetcher, ImageResource, ReqwestClient};
use appshelf_install::{CommandInstaller, InstallCoordinator};
use clap::{Parser, Subcommand};
use console::style;
use tokio::sync::mpsc::unbounded_channel;
use tracing::debug;

use crate::browser::{Browser, ImageLoader, ImageSlot};
use crate::config::Config;
use crate::output::{FormatConfig, InstallProgress, catalog_table};

#[derive(Debug, Parser)]
#[command(name = "appshelf", version = env!("CARGO_PKG_VERSION"), about, long_about = None, propagate_version = true)]
pub struct App {
    /// TOML configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(alias = "ls", name = "list", about = "List the catalog")]
    List,
    #[command(name = "show", about = "Show one entry with its images")]
    Show(ShowArg),
    #[command(alias = "i", name = "install", about = "Install an entry with the toolkit command")]
    Install(QueryArg),
}

#[derive(Debug, Clone, clap::Args)]
pub struct ShowArg {
    /// Entry ID or exact name; the first entry when omitted
    pub query: Option<String>,
}

#[derive(Debug, Clone, clap::Args)]
pub struct QueryArg {
    /// Entry ID or exact name
    pub query: String,
}

impl App {
    pub async fn run(self) -> Result<ExitCode> {
        let config = Config::load(self.config.as_deref())?;
        let client = ReqwestClient::new().context("failed to build http client")?;
        match self.cmd {
            Commands::List => list(&config, client).await,
            Commands::Show(arg) => show(&config, client, arg.query.as_deref()).await,
            Commands::Install(arg) => install(&config, client, &arg.query).await,
        }
    }
}

async fn load(config: &Config, client: ReqwestClient) -> Result<LoadedCatalog> {
    let source = CatalogSource::new(client)
        .endpoint(config.endpoint.clone())
        .cache_path(config.cache_path.clone());
    CatalogLoader::new(source)
        .parser(config.parser()?)
        .timeout(config.timeout())
        .load()
        .await
        .context("failed to load catalog")
}

async fn list(config: &Config, client: ReqwestClient) -> Result<ExitCode> {
    let LoadedCatalog { catalog, origin } = load(config, client).await?;
    let header = format!("{} apps ({origin})", catalog.len());
    let table = catalog_table(
        &catalog,
        FormatConfig {
            header: Some(header),
        },
    );
    println!("{table}");
    Ok(ExitCode::SUCCESS)
}

async fn show(config: &Config, client: ReqwestClient, query: Option<&str>) -> Result<ExitCode> {
    let loaded = load(config, client.clone()).await?;

    let mut browser = Browser::new(Arc::new(Catalog::default()));
    let mut requests = browser.replace_catalog(Arc::new(loaded.catalog));
    if let Some(query) = query {
        let index = browser
            .catalog()
            .position(query)
            .with_context(|| format!("no catalog entry matches {query:?}"))?;
        requests = browser.select(index);
    }
    let pending = requests.len();
    debug!(epoch = browser.epoch(), pending, "loading images");

    let fetcher = AssetFetcher::new(client).timeout(config.timeout());
    let (mut loader, mut rx) = ImageLoader::new(fetcher);
    loader.load(requests);
    for _ in 0..pending {
        let Some(image) = rx.recv().await else { break };
        browser.apply(image);
    }

    let details = browser.details().context("the catalog is empty")?;
    println!("{} {}", style(&details.name).bold(), details.version);
    if !details.developer.is_empty() {
        println!("by {}", details.developer);
    }
    if !details.date.is_empty() {
        println!("released {}", details.date);
    }
    if !details.summary.is_empty() {
        println!("\n{}\n", details.summary);
    }
    if !details.website_host.is_empty() {
        println!("website     {} ({})", details.website_host, details.website);
    }
    println!("icon        {}", describe(browser.image(ImageSlot::Icon)));
    println!("screenshot  {}", describe(browser.image(ImageSlot::Screenshot)));
    if let Some(job) = browser.install_target() {
        println!("package     {}", job.package);
    }
    Ok(ExitCode::SUCCESS)
}

fn describe(image: Option<&ImageResource>) -> String {
    match image {
        None => style("none").dim().to_string(),
        Some(image) if image.is_placeholder() => style("unavailable").yellow().to_string(),
        Some(image) => format!("{} ({} bytes)", image.name(), image.content().len()),
    }
}

async fn install(config: &Config, client: ReqwestClient, query: &str) -> Result<ExitCode> {
    let loaded = load(config, client.clone()).await?;
    let entry = loaded
        .catalog
        .find(query)
        .with_context(|| format!("no catalog entry matches {query:?}"))?;

    let installer = CommandInstaller::locate(&config.installer)
        .context("the toolkit command is required to install apps")?;
    let coordinator = InstallCoordinator::new(client, installer)
        .self_package(config.self_package.clone())
        .icon_timeout(config.timeout());

    let (tx, mut rx) = unbounded_channel();
    let progress = InstallProgress::new();
    let started = coordinator.install(entry, tx);

    while let Some(status) = rx.recv().await {
        progress.update(&status);
    }
    progress.finish();

    let handle = match started {
        Ok(handle) => handle,
        Err(e) => {
            debug!(error = %e, "install not started");
            return Ok(ExitCode::FAILURE);
        }
    };
    let outcome = handle.await.context("install task did not complete")?;
    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
