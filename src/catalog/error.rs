//! Error taxonomy for catalog reads.
//!
//! Errors are classified once, at the client boundary, and then carried
//! unchanged through the cache and into the view model.

use reqwest::StatusCode;
use thiserror::Error;

/// Why a catalog read failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
  /// No response at all (connection refused, DNS, timeout)
  #[error("Network failure: {0}")]
  NetworkFailure(String),

  /// 401 or 403, usually a missing or revoked API key
  #[error("Unauthorized: {0}")]
  Unauthorized(String),

  /// 404
  #[error("Not found: {0}")]
  NotFound(String),

  /// 429
  #[error("Rate limited: {0}")]
  RateLimited(String),

  /// 5xx, unexpected statuses and payloads we could not decode
  #[error("Server failure: {0}")]
  ServerFailure(String),

  /// The caller asked for something the catalog cannot serve (page 0, blank term)
  #[error("Invalid request: {0}")]
  ValidationFailure(String),
}

impl CatalogError {
  /// Classify a non-success HTTP status.
  pub fn from_status(status: StatusCode, context: &str, body: &str) -> Self {
    let message = match remote_message(body) {
      Some(remote) => format!("{} ({} {})", context, status.as_u16(), remote),
      None => format!("{} ({})", context, status.as_u16()),
    };

    match status.as_u16() {
      404 => Self::NotFound(message),
      401 | 403 => Self::Unauthorized(message),
      429 => Self::RateLimited(message),
      400 | 422 => Self::ValidationFailure(message),
      _ => Self::ServerFailure(message),
    }
  }

  /// Classify a transport error from reqwest.
  pub fn from_transport(err: &reqwest::Error, context: &str) -> Self {
    if let Some(status) = err.status() {
      return Self::from_status(status, context, "");
    }
    if err.is_decode() {
      return Self::ServerFailure(format!("{}: malformed response: {}", context, err));
    }
    Self::NetworkFailure(format!("{}: {}", context, err))
  }

  /// Short human title for the error kind.
  pub fn title(&self) -> &'static str {
    match self {
      Self::NetworkFailure(_) => "Network Error",
      Self::Unauthorized(_) => "Unauthorized",
      Self::NotFound(_) => "Not Found",
      Self::RateLimited(_) => "Too Many Requests",
      Self::ServerFailure(_) => "Server Error",
      Self::ValidationFailure(_) => "Invalid Request",
    }
  }

  /// The message without the kind prefix.
  pub fn message(&self) -> &str {
    match self {
      Self::NetworkFailure(m)
      | Self::Unauthorized(m)
      | Self::NotFound(m)
      | Self::RateLimited(m)
      | Self::ServerFailure(m)
      | Self::ValidationFailure(m) => m,
    }
  }

  pub fn is_not_found(&self) -> bool {
    matches!(self, Self::NotFound(_))
  }
}

/// TMDB error bodies look like `{"status_code": 34, "status_message": "..."}`.
fn remote_message(body: &str) -> Option<String> {
  #[derive(serde::Deserialize)]
  struct TmdbStatus {
    status_message: String,
  }

  serde_json::from_str::<TmdbStatus>(body)
    .ok()
    .map(|s| s.status_message)
}
