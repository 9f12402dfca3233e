use std::fmt;

/// Identity of a cacheable catalog request.
///
/// Two keys are equal iff the operation and every parameter are equal,
/// which is what drives cache hits and in-flight deduplication.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum QueryKey {
  /// Page of the popular listing
  Popular { page: u32 },
  /// Page of title search results
  Search { term: String, page: u32 },
  /// Details for a single movie
  Detail { id: u64 },
}

impl QueryKey {
  pub fn popular(page: u32) -> Self {
    Self::Popular { page }
  }

  /// Search terms are trimmed so "batman" and "batman " share an entry.
  pub fn search(term: &str, page: u32) -> Self {
    Self::Search {
      term: term.trim().to_string(),
      page,
    }
  }

  pub fn detail(id: u64) -> Self {
    Self::Detail { id }
  }

  pub fn description(&self) -> String {
    match self {
      Self::Popular { page } => format!("popular movies, page {}", page),
      Self::Search { term, page } => format!("search '{}', page {}", term, page),
      Self::Detail { id } => format!("movie {}", id),
    }
  }
}

impl fmt::Display for QueryKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Popular { page } => write!(f, "popular:{}", page),
      Self::Search { term, page } => write!(f, "search:{}:{}", term, page),
      Self::Detail { id } => write!(f, "detail:{}", id),
    }
  }
}
