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
}

pub const LIGHT: Theme = Theme {
  name: "light",
  bg: Color::Rgb(250, 248, 244),
  fg: Color::Rgb(40, 42, 48),
  accent: Color::Rgb(204, 51, 63),
  muted: Color::Rgb(128, 130, 138),
  border: Color::Rgb(208, 204, 196),
  highlight_fg: Color::Rgb(255, 255, 255),
  highlight_bg: Color::Rgb(204, 51, 63),
  stripe_bg: Color::Rgb(242, 239, 233),
  status: Color::Rgb(46, 125, 120),
  error: Color::Rgb(190, 60, 30),
  key_fg: Color::Rgb(250, 248, 244),
  key_bg: Color::Rgb(96, 98, 108),
};

pub const DARK: Theme = Theme {
  name: "dark",
  bg: Color::Rgb(18, 19, 24),
  fg: Color::Rgb(228, 230, 235),
  accent: Color::Rgb(255, 92, 102),
  muted: Color::Rgb(120, 126, 140),
  border: Color::Rgb(52, 56, 68),
  highlight_fg: Color::Rgb(18, 19, 24),
  highlight_bg: Color::Rgb(255, 92, 102),
  stripe_bg: Color::Rgb(26, 28, 35),
  status: Color::Rgb(110, 200, 190),
  error: Color::Rgb(255, 140, 100),
  key_fg: Color::Rgb(18, 19, 24),
  key_bg: Color::Rgb(160, 166, 180),
};

/// Theme for the document's dark-mode flag.
pub fn for_mode(dark: bool) -> &'static Theme {
  if dark { &DARK } else { &LIGHT }
}
