//! Serde-deserializable types matching TMDB API responses.
//!
//! These types are separate from domain types to allow lenient deserialization
//! (TMDB sends `null`, `""` and missing fields interchangeably) while keeping
//! domain types focused on application needs.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use super::types::{
  CatalogItem, CatalogItemDetail, Genre, Page, ProductionCompany, ProductionCountry,
  SpokenLanguage,
};

// ============================================================================
// Movie list entries (popular, search)
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiMovie {
  pub id: u64,
  #[serde(default, deserialize_with = "null_as_default")]
  pub title: String,
  #[serde(default)]
  pub original_title: Option<String>,
  #[serde(default)]
  pub overview: Option<String>,
  pub poster_path: Option<String>,
  pub backdrop_path: Option<String>,
  #[serde(default, deserialize_with = "null_as_default")]
  pub vote_average: f32,
  #[serde(default, deserialize_with = "null_as_default")]
  pub vote_count: u32,
  #[serde(default)]
  pub release_date: Option<String>,
  #[serde(default, deserialize_with = "null_as_default")]
  pub popularity: f64,
  #[serde(default, deserialize_with = "null_as_default")]
  pub original_language: String,
  #[serde(default, deserialize_with = "null_as_default")]
  pub genre_ids: Vec<u32>,
  #[serde(default, deserialize_with = "null_as_default")]
  pub adult: bool,
}

impl ApiMovie {
  pub fn into_item(self) -> CatalogItem {
    let original_title = self
      .original_title
      .unwrap_or_else(|| self.title.clone());

    CatalogItem {
      id: self.id,
      title: self.title,
      original_title,
      overview: self.overview.unwrap_or_default(),
      poster_path: non_empty(self.poster_path),
      backdrop_path: non_empty(self.backdrop_path),
      vote_average: self.vote_average,
      vote_count: self.vote_count,
      release_date: parse_release_date(self.release_date.as_deref()),
      popularity: self.popularity,
      original_language: self.original_language,
      genre_ids: self.genre_ids,
      adult: self.adult,
    }
  }
}

// ============================================================================
// Paginated response (popular, search)
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiMovieListResponse {
  #[serde(default = "first_page")]
  pub page: u32,
  #[serde(default)]
  pub results: Vec<ApiMovie>,
  #[serde(default)]
  pub total_pages: u32,
  #[serde(default)]
  pub total_results: u64,
}

fn first_page() -> u32 {
  1
}

impl From<ApiMovieListResponse> for Page<CatalogItem> {
  fn from(response: ApiMovieListResponse) -> Self {
    Page {
      items: response
        .results
        .into_iter()
        .map(ApiMovie::into_item)
        .collect(),
      page_number: response.page.max(1),
      total_pages: response.total_pages,
      total_results: response.total_results,
    }
  }
}

// ============================================================================
// Movie detail response
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiGenre {
  pub id: u32,
  #[serde(default, deserialize_with = "null_as_default")]
  pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiProductionCompany {
  pub id: u64,
  #[serde(default, deserialize_with = "null_as_default")]
  pub name: String,
  pub logo_path: Option<String>,
  #[serde(default, deserialize_with = "null_as_default")]
  pub origin_country: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiProductionCountry {
  pub iso_3166_1: String,
  #[serde(default, deserialize_with = "null_as_default")]
  pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiSpokenLanguage {
  pub iso_639_1: String,
  #[serde(default, deserialize_with = "null_as_default")]
  pub name: String,
  #[serde(default, deserialize_with = "null_as_default")]
  pub english_name: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiMovieDetail {
  #[serde(flatten)]
  pub movie: ApiMovie,
  #[serde(default, deserialize_with = "null_as_default")]
  pub budget: u64,
  #[serde(default, deserialize_with = "null_as_default")]
  pub revenue: u64,
  pub runtime: Option<u32>,
  #[serde(default)]
  pub status: Option<String>,
  #[serde(default)]
  pub tagline: Option<String>,
  #[serde(default)]
  pub genres: Vec<ApiGenre>,
  #[serde(default)]
  pub production_companies: Vec<ApiProductionCompany>,
  #[serde(default)]
  pub production_countries: Vec<ApiProductionCountry>,
  #[serde(default)]
  pub spoken_languages: Vec<ApiSpokenLanguage>,
}

impl From<ApiMovieDetail> for CatalogItemDetail {
  fn from(detail: ApiMovieDetail) -> Self {
    let mut item = detail.movie.into_item();
    // Detail responses carry `genres` instead of `genre_ids`
    if item.genre_ids.is_empty() {
      item.genre_ids = detail.genres.iter().map(|g| g.id).collect();
    }

    CatalogItemDetail {
      item,
      budget: detail.budget,
      revenue: detail.revenue,
      runtime: detail.runtime.filter(|&m| m > 0),
      status: detail.status.unwrap_or_default(),
      tagline: detail.tagline.unwrap_or_default(),
      genres: detail
        .genres
        .into_iter()
        .map(|g| Genre {
          id: g.id,
          name: g.name,
        })
        .collect(),
      production_companies: detail
        .production_companies
        .into_iter()
        .map(|c| ProductionCompany {
          id: c.id,
          name: c.name,
          logo_path: non_empty(c.logo_path),
          origin_country: c.origin_country,
        })
        .collect(),
      production_countries: detail
        .production_countries
        .into_iter()
        .map(|c| ProductionCountry {
          code: c.iso_3166_1,
          name: c.name,
        })
        .collect(),
      spoken_languages: detail
        .spoken_languages
        .into_iter()
        .map(|l| SpokenLanguage {
          code: l.iso_639_1,
          name: l.name,
          english_name: l.english_name,
        })
        .collect(),
    }
  }
}

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Default + Deserialize<'de>,
{
  Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// TMDB sends `""` for unknown release dates.
fn parse_release_date(raw: Option<&str>) -> Option<NaiveDate> {
  raw
    .filter(|s| !s.is_empty())
    .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

fn non_empty(value: Option<String>) -> Option<String> {
  value.filter(|s| !s.is_empty())
}
