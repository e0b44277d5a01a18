use ratatui::style::Color;

pub struct Theme {
  pub name: &'static str,
  pub bg: Color,
  pub fg: Color,
  pub accent: Color,
  pub muted: Color,
  pub border: Color,
  pub highlight_fg: Color,
  pub highlight_bg: Color,
  pub stripe_bg: Color,
  pub status: Color,
  pub error: Color,
  pub key_fg: Color,
  pub key_bg: Color,
  /// Badge colour for user-entered records.
  pub custom: Color,
}

pub const THEMES: [Theme; 3] = [
  Theme {
    name: "Neon",
    bg: Color::Rgb(18, 18, 24),
    fg: Color::Rgb(225, 228, 235),
    accent: Color::Rgb(0, 255, 231),
    muted: Color::Rgb(110, 118, 135),
    border: Color::Rgb(50, 60, 75),
    highlight_fg: Color::Rgb(18, 18, 24),
    highlight_bg: Color::Rgb(0, 255, 231),
    stripe_bg: Color::Rgb(24, 25, 33),
    status: Color::Rgb(120, 200, 255),
    error: Color::Rgb(255, 82, 82),
    key_fg: Color::Rgb(18, 18, 24),
    key_bg: Color::Rgb(0, 200, 185),
    custom: Color::Rgb(255, 200, 87),
  },
  Theme {
    name: "Matinee",
    bg: Color::Rgb(32, 20, 22),
    fg: Color::Rgb(240, 226, 210),
    accent: Color::Rgb(226, 68, 60),
    muted: Color::Rgb(150, 120, 110),
    border: Color::Rgb(80, 50, 50),
    highlight_fg: Color::Rgb(32, 20, 22),
    highlight_bg: Color::Rgb(240, 190, 90),
    stripe_bg: Color::Rgb(40, 26, 28),
    status: Color::Rgb(240, 190, 90),
    error: Color::Rgb(255, 110, 90),
    key_fg: Color::Rgb(32, 20, 22),
    key_bg: Color::Rgb(226, 68, 60),
    custom: Color::Rgb(130, 200, 150),
  },
  Theme {
    name: "Noir",
    bg: Color::Black,
    fg: Color::Gray,
    accent: Color::White,
    muted: Color::DarkGray,
    border: Color::DarkGray,
    highlight_fg: Color::Black,
    highlight_bg: Color::White,
    stripe_bg: Color::Rgb(16, 16, 16),
    status: Color::Gray,
    error: Color::LightRed,
    key_fg: Color::Black,
    key_bg: Color::Gray,
    custom: Color::LightYellow,
  },
];
