//! Read access to the remote movie catalog.

mod api_types;
mod cached;
mod client;
mod error;
mod images;
#[cfg(test)]
pub mod testing;
mod types;

pub use cached::{CachedCatalog, DataSource};
pub use client::TmdbClient;
pub use error::CatalogError;
pub use images::{image_url, ImageSize};
pub use types::{CatalogItem, CatalogItemDetail, Page, PAGE_SIZE};

use async_trait::async_trait;

/// The three reads the browser needs from a catalog.
///
/// Implemented by [`TmdbClient`] for the real API and by
/// `testing::MockCatalog` in tests.
#[async_trait]
pub trait Catalog: Send + Sync {
  /// One page of the popular listing.
  async fn list_popular(&self, page: u32) -> Result<Page<CatalogItem>, CatalogError>;

  /// Full details for one movie.
  async fn get_detail(&self, id: u64) -> Result<CatalogItemDetail, CatalogError>;

  /// One page of title search results.
  async fn search(&self, term: &str, page: u32) -> Result<Page<CatalogItem>, CatalogError>;
}
