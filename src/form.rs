use crate::catalog::IdGenerator;
use crate::movie::CustomMovie;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
  Title,
  Year,
  Poster,
  Description,
  Trailer,
}

impl FormField {
  pub const ALL: [FormField; 5] =
    [FormField::Title, FormField::Year, FormField::Poster, FormField::Description, FormField::Trailer];

  pub fn label(self) -> &'static str {
    match self {
      FormField::Title => "Title",
      FormField::Year => "Year",
      FormField::Poster => "Poster URL",
      FormField::Description => "Description",
      FormField::Trailer => "YouTube Trailer URL",
    }
  }

  pub fn required(self) -> bool {
    matches!(self, FormField::Title | FormField::Year | FormField::Poster)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
  Missing(FormField),
  InvalidYear,
}

impl std::fmt::Display for FormError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      FormError::Missing(field) => write!(f, "{} is required.", field.label()),
      FormError::InvalidYear => f.write_str("Year must be a four-digit number."),
    }
  }
}

/// Add-movie form. All fields start empty and return to empty after a successful submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddMovieForm {
  pub title: String,
  pub year: String,
  pub poster: String,
  pub description: String,
  pub trailer: String,
}

impl AddMovieForm {
  pub fn field(&self, field: FormField) -> &str {
    match field {
      FormField::Title => &self.title,
      FormField::Year => &self.year,
      FormField::Poster => &self.poster,
      FormField::Description => &self.description,
      FormField::Trailer => &self.trailer,
    }
  }

  pub fn field_mut(&mut self, field: FormField) -> &mut String {
    match field {
      FormField::Title => &mut self.title,
      FormField::Year => &mut self.year,
      FormField::Poster => &mut self.poster,
      FormField::Description => &mut self.description,
      FormField::Trailer => &mut self.trailer,
    }
  }

  pub fn is_empty(&self) -> bool {
    *self == Self::default()
  }

  pub fn validate(&self) -> Result<u16, FormError> {
    for field in FormField::ALL.into_iter().filter(|f| f.required()) {
      if self.field(field).trim().is_empty() {
        return Err(FormError::Missing(field));
      }
    }
    let year = self.year.trim();
    if year.len() != 4 || !year.chars().all(|c| c.is_ascii_digit()) {
      return Err(FormError::InvalidYear);
    }
    year.parse().map_err(|_| FormError::InvalidYear)
  }

  /// Validate and build a new record. On success the form is cleared; on failure it is left untouched.
  pub fn submit(&mut self, ids: &mut IdGenerator) -> Result<CustomMovie, FormError> {
    let year = self.validate()?;
    let optional = |s: &str| Some(s.trim().to_string()).filter(|s| !s.is_empty());
    let movie = CustomMovie {
      id: ids.next_id(),
      title: self.title.trim().to_string(),
      year,
      description: optional(&self.description),
      poster: self.poster.trim().to_string(),
      trailer: optional(&self.trailer),
    };
    *self = Self::default();
    Ok(movie)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::movie::MovieId;

  fn filled() -> AddMovieForm {
    AddMovieForm {
      title: "X".to_string(),
      year: "1984".to_string(),
      poster: "Y".to_string(),
      description: String::new(),
      trailer: String::new(),
    }
  }

  #[test]
  fn missing_year_emits_nothing() {
    let mut form = AddMovieForm { year: String::new(), ..filled() };
    let mut ids = IdGenerator::default();
    assert_eq!(form.submit(&mut ids), Err(FormError::Missing(FormField::Year)));
    assert_eq!(form.title, "X");
    assert_eq!(form.poster, "Y");
  }

  #[test]
  fn required_fields_checked_in_order() {
    let form = AddMovieForm::default();
    assert_eq!(form.validate(), Err(FormError::Missing(FormField::Title)));
    let form = AddMovieForm { poster: "  ".to_string(), ..filled() };
    assert_eq!(form.validate(), Err(FormError::Missing(FormField::Poster)));
  }

  #[test]
  fn year_must_be_four_digits() {
    for bad in ["84", "19845", "nine", "２０２０"] {
      let form = AddMovieForm { year: bad.to_string(), ..filled() };
      assert_eq!(form.validate(), Err(FormError::InvalidYear), "year {:?}", bad);
    }
  }

  #[test]
  fn submit_emits_record_and_resets() {
    let mut form = AddMovieForm { description: " A tale ".to_string(), ..filled() };
    let mut ids = IdGenerator::default();
    let movie = form.submit(&mut ids).unwrap();

    assert!(matches!(&movie.id, MovieId::Custom(id) if !id.is_empty()));
    assert_eq!(movie.title, "X");
    assert_eq!(movie.year, 1984);
    assert_eq!(movie.poster, "Y");
    assert_eq!(movie.description.as_deref(), Some("A tale"));
    assert_eq!(movie.trailer, None);
    assert!(form.is_empty());
  }

  #[test]
  fn consecutive_submits_get_distinct_ids() {
    let mut ids = IdGenerator::default();
    let a = filled().submit(&mut ids).unwrap();
    let b = filled().submit(&mut ids).unwrap();
    assert_ne!(a.id, b.id);
  }

  #[test]
  fn error_messages() {
    assert_eq!(FormError::Missing(FormField::Poster).to_string(), "Poster URL is required.");
    assert_eq!(FormError::InvalidYear.to_string(), "Year must be a four-digit number.");
  }
}
