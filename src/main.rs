mod app;
mod browse;
mod cache;
mod catalog;
mod config;
mod event;
mod format;
mod logging;
mod ui;

use catalog::{CachedCatalog, Catalog, TmdbClient};
use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use ui::views::{MovieDetailView, MovieListView};

#[derive(Parser, Debug)]
#[command(name = "cinetrack")]
#[command(about = "Browse and search TMDB movies from the terminal")]
#[command(version)]
struct Args {
  /// Path to config file (default: ./cinetrack.yaml or $XDG_CONFIG_HOME/cinetrack/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Open the detail page of this TMDB movie id
  #[arg(short, long)]
  movie: Option<u64>,

  /// Start with the results for this title search
  #[arg(short, long)]
  search: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();
  let _log_guard = logging::init_logger()?;
  info!(version = env!("CARGO_PKG_VERSION"), "starting");

  let config = config::Config::load(args.config.as_deref())?;

  let client = TmdbClient::new(&config)?;
  let host = client.host().to_string();
  let client: Arc<dyn Catalog> = Arc::new(client);

  let mut catalog = CachedCatalog::new(Arc::clone(&client), config.browse.stale_time())
    .with_gc_time(config.browse.gc_time());

  // First page of the popular listing is loaded before the UI comes up
  match client.list_popular(1).await {
    Ok(page) => catalog.seed_initial_page(page),
    Err(e) => warn!(error = %e, "initial page failed to load, fetching on demand"),
  }

  let image_base_url = config.tmdb.image_base_url.clone();
  let root = match args.search.as_deref().map(str::trim) {
    Some(term) if !term.is_empty() => {
      MovieListView::with_search(config.browse.debounce(), image_base_url.clone(), term)
    }
    _ => MovieListView::new(config.browse.debounce(), image_base_url.clone()),
  };

  let mut app = app::App::new(catalog, host, config.browse.tick_rate(), Box::new(root));
  if let Some(id) = args.movie {
    app.push(Box::new(MovieDetailView::new(id, image_base_url, None)));
  }

  app.run().await?;

  Ok(())
}
