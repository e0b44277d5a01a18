use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::constants;

// --- Identifiers ---

/// Prefix of locally generated identifiers. Keeps them disjoint from numeric TMDb ids.
pub const CUSTOM_ID_PREFIX: &str = "custom-";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MovieId {
  Tmdb(u64),
  /// Full identifier including the `custom-` prefix.
  Custom(String),
}

impl MovieId {
  /// Parse the identifier segment of a `/movie/<id>` path.
  pub fn parse(s: &str) -> Option<Self> {
    let s = s.trim();
    if let Some(rest) = s.strip_prefix(CUSTOM_ID_PREFIX) {
      if !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()) {
        return Some(MovieId::Custom(s.to_string()));
      }
      return None;
    }
    s.parse().ok().map(MovieId::Tmdb)
  }
}

impl fmt::Display for MovieId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      MovieId::Tmdb(id) => write!(f, "{}", id),
      MovieId::Custom(id) => f.write_str(id),
    }
  }
}

// --- TMDb-shaped records ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Genre {
  #[serde(default)]
  pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
  #[serde(default)]
  pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrewMember {
  #[serde(default)]
  pub name: String,
  pub job: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credits {
  #[serde(default)]
  pub cast: Vec<CastMember>,
  #[serde(default)]
  pub crew: Vec<CrewMember>,
}

/// A movie as returned by the TMDb search and detail endpoints.
/// Search results carry no `genres`/`credits`; detail responses usually do.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiMovie {
  pub id: u64,
  pub title: Option<String>,
  pub original_title: Option<String>,
  pub name: Option<String>,
  pub release_date: Option<String>,
  pub first_air_date: Option<String>,
  pub overview: Option<String>,
  pub poster_path: Option<String>,
  pub genres: Option<Vec<Genre>>,
  pub credits: Option<Credits>,
}

// --- User-entered records ---

/// A movie entered through the add form. Lives only for the session.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomMovie {
  pub id: MovieId,
  pub title: String,
  pub year: u16,
  pub description: Option<String>,
  /// Either a full `http(s)` URL or a TMDb-style path fragment.
  pub poster: String,
  pub trailer: Option<String>,
}

impl CustomMovie {
  fn poster_is_url(&self) -> bool {
    self.poster.starts_with("http")
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MovieRecord {
  Api(ApiMovie),
  Custom(CustomMovie),
}

// --- Poster resolution ---

/// The three poster slots a record may populate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PosterFields<'a> {
  /// Path fragment appended to the image base (`poster_path`).
  pub poster_path: Option<&'a str>,
  /// Full URL (`Poster`).
  pub full_url: Option<&'a str>,
  /// Generic poster value (`poster`).
  pub generic: Option<&'a str>,
}

/// Marker some catalogs use for "no poster".
const NOT_AVAILABLE: &str = "N/A";

/// Pick the displayable poster URL, falling back to the placeholder image.
pub fn resolve_poster(fields: &PosterFields<'_>) -> String {
  let usable = |v: Option<&str>| v.filter(|s| !s.is_empty() && *s != NOT_AVAILABLE).map(str::to_string);

  if let Some(path) = fields.poster_path.filter(|s| !s.is_empty()) {
    return format!("{}{}", constants().tmdb_image_base, path);
  }
  usable(fields.full_url).or_else(|| usable(fields.generic)).unwrap_or_else(|| constants().fallback_poster.clone())
}

/// The placeholder used when no poster is known or the real one fails to load.
pub fn fallback_poster() -> &'static str {
  &constants().fallback_poster
}

// --- Normalization ---

fn first_non_empty<'a>(candidates: impl IntoIterator<Item = Option<&'a str>>) -> Option<&'a str> {
  candidates.into_iter().flatten().find(|s| !s.is_empty())
}

impl MovieRecord {
  pub fn id(&self) -> MovieId {
    match self {
      MovieRecord::Api(m) => MovieId::Tmdb(m.id),
      MovieRecord::Custom(m) => m.id.clone(),
    }
  }

  pub fn is_custom(&self) -> bool {
    matches!(self, MovieRecord::Custom(_))
  }

  pub fn poster_fields(&self) -> PosterFields<'_> {
    match self {
      MovieRecord::Api(m) => PosterFields { poster_path: m.poster_path.as_deref(), ..Default::default() },
      MovieRecord::Custom(m) if m.poster_is_url() => {
        PosterFields { full_url: Some(m.poster.as_str()), ..Default::default() }
      }
      MovieRecord::Custom(m) => PosterFields { poster_path: Some(m.poster.as_str()), ..Default::default() },
    }
  }

  pub fn poster_url(&self) -> String {
    resolve_poster(&self.poster_fields())
  }

  /// First non-empty of title, original title, name. Empty when none is set.
  pub fn display_title(&self) -> String {
    match self {
      MovieRecord::Api(m) => {
        first_non_empty([m.title.as_deref(), m.original_title.as_deref(), m.name.as_deref()]).unwrap_or("").to_string()
      }
      MovieRecord::Custom(m) => m.title.clone(),
    }
  }

  /// Four-character year, or an empty string.
  pub fn display_year(&self) -> String {
    match self {
      MovieRecord::Api(m) => first_non_empty([m.release_date.as_deref(), m.first_air_date.as_deref()])
        .map(|d| d.chars().take(4).collect())
        .unwrap_or_default(),
      MovieRecord::Custom(m) => format!("{:04}", m.year),
    }
  }

  pub fn plot(&self) -> Option<&str> {
    match self {
      MovieRecord::Api(m) => first_non_empty([m.overview.as_deref()]),
      MovieRecord::Custom(m) => first_non_empty([m.description.as_deref()]),
    }
  }

  /// Comma-joined genre names, `None` when the record has no genre list.
  pub fn genres(&self) -> Option<String> {
    match self {
      MovieRecord::Api(ApiMovie { genres: Some(genres), .. }) => {
        Some(genres.iter().map(|g| g.name.as_str()).collect::<Vec<_>>().join(", "))
      }
      _ => None,
    }
  }

  fn credits(&self) -> Option<&Credits> {
    match self {
      MovieRecord::Api(m) => m.credits.as_ref(),
      MovieRecord::Custom(_) => None,
    }
  }

  pub fn director(&self) -> Option<&str> {
    self.credits()?.crew.iter().find(|c| c.job.as_deref() == Some("Director")).map(|c| c.name.as_str())
  }

  /// The first few cast names, comma-joined.
  pub fn top_cast(&self) -> Option<String> {
    let cast = &self.credits()?.cast;
    if cast.is_empty() {
      return None;
    }
    Some(cast.iter().take(constants().top_cast_limit).map(|a| a.name.as_str()).collect::<Vec<_>>().join(", "))
  }

  /// Trailer URL the user typed into the add form, if any.
  pub fn trailer_hint(&self) -> Option<&str> {
    match self {
      MovieRecord::Custom(m) => first_non_empty([m.trailer.as_deref()]),
      MovieRecord::Api(_) => None,
    }
  }
}
