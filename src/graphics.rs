use image::{DynamicImage, imageops::FilterType};
use ratatui::{
  buffer::Buffer,
  layout::Rect,
  style::{Color, Style},
  widgets::Widget,
};

use crate::display::DisplayMode;

// --- Poster Widget ---

pub struct PosterWidget<'a> {
  pub image: &'a DynamicImage,
  pub display_mode: DisplayMode,
}

const ASCII_CHARS: [&str; 10] = [" ", ".", ":", "-", "=", "+", "*", "#", "%", "@"];

/// Scale a poster to fit `area`, keeping its aspect ratio.
///
/// Half-block cells hold two pixel rows, so `Direct` gets twice the vertical
/// resolution. ASCII cells are roughly twice as tall as wide, so the height is halved.
pub fn fit_to_area(image: &DynamicImage, area: Rect, mode: DisplayMode) -> DynamicImage {
  let w = u32::from(area.width).max(1);
  let h = u32::from(area.height).max(1);
  match mode {
    DisplayMode::Direct => image.resize(w, h * 2, FilterType::Triangle),
    _ => {
      let square = image.resize(w, h * 2, FilterType::Triangle);
      square.resize_exact(square.width(), (square.height() / 2).max(1), FilterType::Triangle)
    }
  }
}

impl Widget for PosterWidget<'_> {
  fn render(self, area: Rect, buf: &mut Buffer) {
    if area.is_empty() {
      return;
    }
    match self.display_mode {
      DisplayMode::Direct => render_direct(self.image, area, buf),
      DisplayMode::Ascii => render_ascii(self.image, area, buf),
      DisplayMode::Off => {}
    }
  }
}

fn to_u16(v: u32) -> u16 {
  u16::try_from(v).unwrap_or(u16::MAX)
}

fn render_direct(image: &DynamicImage, area: Rect, buf: &mut Buffer) {
  // Image is already resized by the caller; just convert to RGB8.
  let rgb = image.to_rgb8();
  let img_w = rgb.width().min(u32::from(area.width));
  let img_h = rgb.height();
  let cell_h = img_h.div_ceil(2);
  let offset_x = u32::from(area.width).saturating_sub(img_w) / 2;
  let offset_y = u32::from(area.height).saturating_sub(cell_h) / 2;

  for y in 0..cell_h.min(u32::from(area.height)) {
    for x in 0..img_w {
      let upper = rgb.get_pixel(x, y * 2);
      let lower_y = y * 2 + 1;
      let fg = Color::Rgb(upper[0], upper[1], upper[2]);
      let bg = if lower_y < img_h {
        let lower = rgb.get_pixel(x, lower_y);
        Color::Rgb(lower[0], lower[1], lower[2])
      } else {
        Color::Reset
      };
      buf.set_string(
        area.x.saturating_add(to_u16(offset_x + x)),
        area.y.saturating_add(to_u16(offset_y + y)),
        "▀",
        Style::default().fg(fg).bg(bg),
      );
    }
  }
}

fn render_ascii(image: &DynamicImage, area: Rect, buf: &mut Buffer) {
  let luma = image.to_luma8();
  let img_w = luma.width().min(u32::from(area.width));
  let img_h = luma.height().min(u32::from(area.height));
  let offset_x = u32::from(area.width).saturating_sub(img_w) / 2;
  let offset_y = u32::from(area.height).saturating_sub(img_h) / 2;

  for y in 0..img_h {
    for x in 0..img_w {
      let pixel = luma.get_pixel(x, y)[0];
      let idx = ((f32::from(pixel) / 255.0) * (ASCII_CHARS.len() - 1) as f32).round() as usize;
      buf.set_string(
        area.x.saturating_add(to_u16(offset_x + x)),
        area.y.saturating_add(to_u16(offset_y + y)),
        ASCII_CHARS[idx.min(ASCII_CHARS.len() - 1)],
        Style::default(),
      );
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use image::{Rgb, RgbImage};

  fn solid(w: u32, h: u32, value: u8) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb([value, value, value])))
  }

  #[test]
  fn fit_keeps_within_area() {
    let poster = solid(200, 300, 128);
    let area = Rect::new(0, 0, 20, 15);
    let direct = fit_to_area(&poster, area, DisplayMode::Direct);
    assert!(direct.width() <= 20 && direct.height() <= 30);
    let ascii = fit_to_area(&poster, area, DisplayMode::Ascii);
    assert!(ascii.width() <= 20 && ascii.height() <= 15);
  }

  #[test]
  fn ascii_render_uses_brightness_ramp() {
    let area = Rect::new(0, 0, 4, 2);
    let mut buf = Buffer::empty(area);
    PosterWidget { image: &solid(4, 2, 255), display_mode: DisplayMode::Ascii }.render(area, &mut buf);
    assert_eq!(buf[(0, 0)].symbol(), "@");
    assert_eq!(buf[(3, 1)].symbol(), "@");
  }

  #[test]
  fn direct_render_fills_half_blocks() {
    let area = Rect::new(0, 0, 2, 1);
    let mut buf = Buffer::empty(area);
    PosterWidget { image: &solid(2, 2, 10), display_mode: DisplayMode::Direct }.render(area, &mut buf);
    assert_eq!(buf[(0, 0)].symbol(), "▀");
    assert_eq!(buf[(0, 0)].fg, Color::Rgb(10, 10, 10));
    assert_eq!(buf[(0, 0)].bg, Color::Rgb(10, 10, 10));
  }

  #[test]
  fn off_renders_nothing() {
    let area = Rect::new(0, 0, 2, 1);
    let mut buf = Buffer::empty(area);
    PosterWidget { image: &solid(2, 2, 10), display_mode: DisplayMode::Off }.render(area, &mut buf);
    assert_eq!(buf[(0, 0)].symbol(), " ");
  }
}
