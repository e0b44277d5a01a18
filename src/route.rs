use std::fmt;
use std::str::FromStr;

use anyhow::{Result, anyhow};

use crate::movie::MovieId;

/// The two addressable views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
  /// `/`
  Catalog,
  /// `/movie/<id>`
  Movie(MovieId),
}

impl FromStr for Route {
  type Err = anyhow::Error;

  fn from_str(s: &str) -> Result<Self> {
    let path = s.trim().trim_end_matches('/');
    if path.is_empty() {
      return Ok(Route::Catalog);
    }
    let id = path.strip_prefix("/movie/").ok_or_else(|| anyhow!("Unknown route '{}'", s))?;
    MovieId::parse(id).map(Route::Movie).ok_or_else(|| anyhow!("Invalid movie id '{}' in route '{}'", id, s))
  }
}

impl fmt::Display for Route {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Route::Catalog => f.write_str("/"),
      Route::Movie(id) => write!(f, "/movie/{}", id),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_catalog() {
    assert_eq!("/".parse::<Route>().unwrap(), Route::Catalog);
    assert_eq!("".parse::<Route>().unwrap(), Route::Catalog);
  }

  #[test]
  fn parse_movie() {
    assert_eq!("/movie/27205".parse::<Route>().unwrap(), Route::Movie(MovieId::Tmdb(27205)));
    assert_eq!("/movie/603/".parse::<Route>().unwrap(), Route::Movie(MovieId::Tmdb(603)));
    assert_eq!(
      "/movie/custom-1700000000000".parse::<Route>().unwrap(),
      Route::Movie(MovieId::Custom("custom-1700000000000".to_string()))
    );
  }

  #[test]
  fn parse_rejects_unknown() {
    assert!("/tv/1".parse::<Route>().is_err());
    assert!("/movie/".parse::<Route>().is_err());
    assert!("/movie/abc".parse::<Route>().is_err());
  }

  #[test]
  fn display_round_trips() {
    for route in [Route::Catalog, Route::Movie(MovieId::Tmdb(27205)), Route::Movie(MovieId::Custom("custom-9".to_string()))] {
      assert_eq!(route.to_string().parse::<Route>().unwrap(), route);
    }
  }
}
