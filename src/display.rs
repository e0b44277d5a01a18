use clap::ValueEnum;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CliDisplayMode {
  Auto,
  Direct,
  Ascii,
  None,
}

/// How posters are drawn in the detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
  /// Text only; posters are not downloaded.
  Off,
  Ascii,
  Direct,
}

impl DisplayMode {
  pub fn label(self) -> &'static str {
    match self {
      DisplayMode::Off => "off",
      DisplayMode::Ascii => "ascii",
      DisplayMode::Direct => "half-block",
    }
  }

  pub fn from_config(s: &str) -> Option<Self> {
    match s.to_lowercase().as_str() {
      "off" | "none" => Some(DisplayMode::Off),
      "ascii" => Some(DisplayMode::Ascii),
      "direct" | "half-block" => Some(DisplayMode::Direct),
      _ => None,
    }
  }

  pub fn shows_posters(self) -> bool {
    self != DisplayMode::Off
  }
}

/// Detect the best display mode the terminal supports.
///
/// `COLORTERM` of `truecolor`/`24bit` gets half-block colour rendering, anything else ASCII.
pub fn detect_display_mode() -> DisplayMode {
  detect_from(std::env::var("COLORTERM").ok().as_deref())
}

fn detect_from(colorterm: Option<&str>) -> DisplayMode {
  match colorterm.map(str::to_lowercase).as_deref() {
    Some("truecolor") | Some("24bit") => DisplayMode::Direct,
    _ => DisplayMode::Ascii,
  }
}

/// CLI flag wins, then the saved preference, then detection.
pub fn resolve_display_mode(cli: CliDisplayMode, saved: Option<&str>) -> DisplayMode {
  match cli {
    CliDisplayMode::Auto => saved.and_then(DisplayMode::from_config).unwrap_or_else(detect_display_mode),
    CliDisplayMode::Direct => DisplayMode::Direct,
    CliDisplayMode::Ascii => DisplayMode::Ascii,
    CliDisplayMode::None => DisplayMode::Off,
  }
}
