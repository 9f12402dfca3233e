use async_trait::async_trait;
use color_eyre::{eyre::eyre, Result};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::catalog::api_types::{ApiMovieDetail, ApiMovieListResponse};
use crate::catalog::types::{CatalogItem, CatalogItemDetail, Page};
use crate::catalog::{Catalog, CatalogError};
use crate::config::{AuthStyle, Config, TmdbConfig};

#[derive(Clone)]
enum Credential {
  ApiKey(String),
  Bearer(String),
}

/// TMDB API client
///
/// Every call issues exactly one GET and classifies failures into
/// [`CatalogError`]. Retrying is left to callers.
#[derive(Clone)]
pub struct TmdbClient {
  client: reqwest::Client,
  base_url: String,
  credential: Credential,
}

impl TmdbClient {
  pub fn new(config: &Config) -> Result<Self> {
    let api_key = Config::get_api_key()?;
    Self::with_credential(&config.tmdb, api_key)
  }

  pub fn with_credential(config: &TmdbConfig, api_key: String) -> Result<Self> {
    let client = reqwest::Client::builder()
      .timeout(config.timeout())
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    let credential = match config.auth {
      AuthStyle::ApiKey => Credential::ApiKey(api_key),
      AuthStyle::Bearer => Credential::Bearer(api_key),
    };

    Ok(Self {
      client,
      base_url: config.base_url.trim_end_matches('/').to_string(),
      credential,
    })
  }

  /// Host part of the base URL, for display
  pub fn host(&self) -> &str {
    self
      .base_url
      .split("://")
      .nth(1)
      .unwrap_or(&self.base_url)
      .split('/')
      .next()
      .unwrap_or(&self.base_url)
  }

  async fn get_json<T: DeserializeOwned>(
    &self,
    path: &str,
    query: &[(&str, String)],
  ) -> Result<T, CatalogError> {
    let url = format!("{}{}", self.base_url, path);
    debug!(path, ?query, "TMDB request");

    let mut request = self.client.get(&url).query(query);
    request = match &self.credential {
      Credential::ApiKey(key) => request.query(&[("api_key", key)]),
      Credential::Bearer(token) => request.bearer_auth(token),
    };

    // without_url keeps the api_key query parameter out of messages and logs
    let response = request.send().await.map_err(|e| {
      let err = CatalogError::from_transport(&e.without_url(), path);
      warn!(path, error = %err, "TMDB request failed");
      err
    })?;

    let status = response.status();
    let body = response
      .text()
      .await
      .map_err(|e| CatalogError::from_transport(&e.without_url(), path))?;

    if !status.is_success() {
      let err = CatalogError::from_status(status, path, &body);
      warn!(path, status = status.as_u16(), error = %err, "TMDB returned an error");
      return Err(err);
    }

    serde_json::from_str(&body).map_err(|e| {
      let err = CatalogError::ServerFailure(format!("{}: malformed response: {}", path, e));
      warn!(path, error = %err, "TMDB payload did not decode");
      err
    })
  }
}

fn validate_page(page: u32) -> Result<(), CatalogError> {
  if page == 0 {
    return Err(CatalogError::ValidationFailure(
      "page numbers start at 1".to_string(),
    ));
  }
  Ok(())
}

#[async_trait]
impl Catalog for TmdbClient {
  async fn list_popular(&self, page: u32) -> Result<Page<CatalogItem>, CatalogError> {
    validate_page(page)?;

    let response: ApiMovieListResponse = self
      .get_json("/movie/popular", &[("page", page.to_string())])
      .await?;

    Ok(response.into())
  }

  async fn get_detail(&self, id: u64) -> Result<CatalogItemDetail, CatalogError> {
    if id == 0 {
      return Err(CatalogError::ValidationFailure(
        "movie ids start at 1".to_string(),
      ));
    }

    let response: ApiMovieDetail = self.get_json(&format!("/movie/{}", id), &[]).await?;

    Ok(response.into())
  }

  async fn search(&self, term: &str, page: u32) -> Result<Page<CatalogItem>, CatalogError> {
    validate_page(page)?;
    let term = term.trim();
    if term.is_empty() {
      return Err(CatalogError::ValidationFailure(
        "search term must not be empty".to_string(),
      ));
    }

    let response: ApiMovieListResponse = self
      .get_json(
        "/search/movie",
        &[("query", term.to_string()), ("page", page.to_string())],
      )
      .await?;

    Ok(response.into())
  }
}
