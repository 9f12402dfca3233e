use chrono::NaiveDate;

/// Number of items per page. Fixed by TMDB, not something we can ask for.
pub const PAGE_SIZE: u32 = 20;

/// A movie as it appears in list and search results
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItem {
  pub id: u64,
  pub title: String,
  pub original_title: String,
  pub overview: String,
  pub poster_path: Option<String>,
  pub backdrop_path: Option<String>,
  /// 0-10
  pub vote_average: f32,
  pub vote_count: u32,
  pub release_date: Option<NaiveDate>,
  pub popularity: f64,
  pub original_language: String,
  pub genre_ids: Vec<u32>,
  pub adult: bool,
}

impl CatalogItem {
  pub fn year(&self) -> Option<i32> {
    use chrono::Datelike;
    self.release_date.map(|d| d.year())
  }
}

/// Full movie details
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItemDetail {
  pub item: CatalogItem,
  pub budget: u64,
  pub revenue: u64,
  pub runtime: Option<u32>,
  pub status: String,
  pub tagline: String,
  pub genres: Vec<Genre>,
  pub production_companies: Vec<ProductionCompany>,
  pub production_countries: Vec<ProductionCountry>,
  pub spoken_languages: Vec<SpokenLanguage>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genre {
  pub id: u32,
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductionCompany {
  pub id: u64,
  pub name: String,
  pub logo_path: Option<String>,
  pub origin_country: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductionCountry {
  /// ISO 3166-1 code
  pub code: String,
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpokenLanguage {
  /// ISO 639-1 code
  pub code: String,
  pub name: String,
  pub english_name: String,
}

/// One page of a paginated listing
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
  pub items: Vec<T>,
  /// 1-indexed
  pub page_number: u32,
  pub total_pages: u32,
  pub total_results: u64,
}

impl<T> Page<T> {
  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }
}
