/// Returned instead of a URL when the catalog has no image for an item.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder-movie.jpg";

/// TMDB image size tokens we use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
  W185,
  W500,
  W780,
  Original,
}

impl ImageSize {
  pub fn token(self) -> &'static str {
    match self {
      ImageSize::W185 => "w185",
      ImageSize::W500 => "w500",
      ImageSize::W780 => "w780",
      ImageSize::Original => "original",
    }
  }
}

/// Compose a retrievable image URL from an opaque TMDB path fragment.
pub fn image_url(base_url: &str, size: ImageSize, path: Option<&str>) -> String {
  match path.filter(|p| !p.is_empty()) {
    Some(path) => format!(
      "{}/{}/{}",
      base_url.trim_end_matches('/'),
      size.token(),
      path.trim_start_matches('/')
    ),
    None => PLACEHOLDER_IMAGE.to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_image_url() {
    assert_eq!(
      image_url("https://image.tmdb.org/t/p", ImageSize::W500, Some("/abc.jpg")),
      "https://image.tmdb.org/t/p/w500/abc.jpg"
    );
    assert_eq!(
      image_url("https://image.tmdb.org/t/p/", ImageSize::Original, Some("/abc.jpg")),
      "https://image.tmdb.org/t/p/original/abc.jpg"
    );
  }

  #[test]
  fn test_missing_path_uses_placeholder() {
    assert_eq!(
      image_url("https://image.tmdb.org/t/p", ImageSize::W500, None),
      PLACEHOLDER_IMAGE
    );
    assert_eq!(
      image_url("https://image.tmdb.org/t/p", ImageSize::W780, Some("")),
      PLACEHOLDER_IMAGE
    );
  }
}
