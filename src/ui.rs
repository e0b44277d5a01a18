use ratatui::{
  Frame,
  layout::{Alignment, Constraint, Layout, Rect},
  style::{Modifier, Style, Stylize},
  text::{Line, Span},
  widgets::{Block, BorderType, List, ListItem, Padding, Paragraph, Wrap},
};

use crate::app::{App, AppMode};
use crate::detail::{DetailStatus, DetailView};
use crate::form::FormField;
use crate::graphics::{PosterWidget, fit_to_area};
use crate::movie::MovieRecord;
use crate::route::Route;
use crate::search::SearchPhase;
use crate::theme::Theme;
use crate::youtube::embed_url;

// --- Helpers ---

/// Compute the display width of the first `n` chars (accounting for double-width CJK).
pub fn display_width(s: &str, n: usize) -> usize {
  use unicode_width::UnicodeWidthChar;
  s.chars().take(n).map(|c| c.width().unwrap_or(0)).sum()
}

/// Truncate a string to `max_width` characters, appending "…" if truncated.
fn truncate_str(s: &str, max_width: usize) -> String {
  if s.chars().count() <= max_width {
    s.to_string()
  } else {
    let truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
    format!("{}…", truncated)
  }
}

fn panel<'a>(theme: &Theme, title: impl Into<Line<'a>>, focused: bool) -> Block<'a> {
  let border = if focused { theme.accent } else { theme.border };
  Block::bordered()
    .title(title)
    .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
    .border_type(BorderType::Rounded)
    .border_style(Style::default().fg(border))
}

// --- UI Rendering ---

pub fn ui(frame: &mut Frame, app: &mut App) {
  let theme = app.theme();

  frame.render_widget(Block::default().style(Style::default().bg(theme.bg)), frame.area());

  let [header_area, main_area, status_area, input_area, footer_area] = Layout::vertical([
    Constraint::Length(1),
    Constraint::Min(3),
    Constraint::Length(1),
    Constraint::Length(3),
    Constraint::Length(1),
  ])
  .areas(frame.area());

  render_header(frame, theme, header_area);
  match app.route {
    Route::Catalog => render_catalog(frame, app, main_area),
    Route::Movie(_) => render_detail(frame, app, main_area),
  }
  render_status(frame, app, status_area);
  render_input(frame, app, input_area);
  render_footer(frame, app, footer_area);
}

fn render_header(frame: &mut Frame, theme: &Theme, area: Rect) {
  let left = Line::from(Span::styled(" 🎬 cinedex ", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)));
  frame.render_widget(left, area);

  let version = format!("v{} ", env!("CARGO_PKG_VERSION"));
  let right = Line::from(Span::styled(&version, Style::default().fg(theme.muted)));
  let right_area =
    Rect { x: area.x + area.width.saturating_sub(version.len() as u16), width: version.len() as u16, ..area };
  frame.render_widget(right, right_area);
}

// --- Catalog ---

fn render_catalog(frame: &mut Frame, app: &mut App, area: Rect) {
  if app.mode == AppMode::Form {
    let form_h = FormField::ALL.len() as u16 + 3;
    let [form_area, list_area] = Layout::vertical([Constraint::Length(form_h), Constraint::Min(3)]).areas(area);
    render_form(frame, app, form_area);
    render_results(frame, app, list_area);
  } else if app.catalog.is_empty() {
    render_welcome(frame, app, area);
  } else {
    render_results(frame, app, area);
  }
}

fn render_welcome(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let hint = match app.search.phase() {
    SearchPhase::Fetching => "Loading movies…",
    SearchPhase::Failed => "Nothing to show yet. Try another search.",
    SearchPhase::Idle | SearchPhase::Loaded => "Type a title below and press Enter, or press a to add your own.",
  };
  let text = vec![
    Line::from(""),
    Line::from(Span::styled("🎬  Welcome to cinedex", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))),
    Line::from(""),
    Line::from(Span::styled("Browse TMDb. Keep your own picks.", Style::default().fg(theme.fg))),
    Line::from(""),
    Line::from(Span::styled(hint, Style::default().fg(theme.muted))),
  ];
  let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
    Block::bordered().border_type(BorderType::Rounded).border_style(Style::default().fg(theme.border)),
  );
  frame.render_widget(paragraph, area);
}

fn render_results(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();

  // Inner width: area minus 2 borders minus 2 chars for highlight symbol ("▶ ")
  let inner_w = area.width.saturating_sub(4) as usize;

  let items: Vec<ListItem> = app
    .catalog
    .entries()
    .iter()
    .enumerate()
    .map(|(i, record)| {
      let is_selected = Some(i) == app.list_state.selected();
      let fg = if is_selected { theme.highlight_fg } else { theme.fg };
      let bg = if is_selected {
        theme.highlight_bg
      } else if i % 2 == 1 {
        theme.stripe_bg
      } else {
        theme.bg
      };

      let year = record.display_year();
      let badge = if record.is_custom() { "★ mine  " } else { "" };
      let right_w = badge.chars().count() + year.chars().count();
      let title = truncate_str(&record.display_title(), inner_w.saturating_sub(right_w + 2));
      let gap = inner_w.saturating_sub(title.chars().count() + right_w);

      let line = Line::from(vec![
        Span::styled(title, Style::default().fg(fg)),
        Span::raw(" ".repeat(gap)),
        Span::styled(badge, Style::default().fg(theme.custom)),
        Span::styled(year, Style::default().fg(theme.muted)),
      ]);
      ListItem::new(line).bg(bg)
    })
    .collect();

  let search = &app.search;
  let prev = if search.has_prev() { "◀" } else { " " };
  let next = if search.has_next() { "▶" } else { " " };
  let pager = format!(" {} Page {} of {} {} ", prev, search.page(), search.total_pages(), next);
  let title = format!(" Movies · {} ", search.term());

  let list = List::new(items)
    .block(
      panel(theme, title, app.mode == AppMode::Results)
        .title_bottom(Line::from(Span::styled(pager, Style::default().fg(theme.muted))).right_aligned()),
    )
    .highlight_symbol("▶ ")
    .highlight_style(Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD));

  frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn render_form(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let label_w = FormField::ALL.iter().map(|f| f.label().len()).max().unwrap_or(0) + 3;
  let inner_w = area.width.saturating_sub(4) as usize;

  let mut lines: Vec<Line> = FormField::ALL
    .iter()
    .map(|&field| {
      let focused = field == app.form_focus;
      let marker = if field.required() { "*" } else { " " };
      let label = format!("{:<width$}", format!("{}{}", field.label(), marker), width = label_w);
      let value = app.form.field(field);
      let shown = truncate_str(value, inner_w.saturating_sub(label_w + 1));
      let value_style =
        if focused { Style::default().fg(theme.fg).add_modifier(Modifier::UNDERLINED) } else { Style::default().fg(theme.fg) };
      let label_style = if focused { Style::default().fg(theme.accent) } else { Style::default().fg(theme.muted) };
      Line::from(vec![Span::styled(label, label_style), Span::styled(shown, value_style)])
    })
    .collect();

  match &app.form_error {
    Some(err) => lines.push(Line::from(Span::styled(format!("⚠  {}", err), Style::default().fg(theme.error)))),
    None => lines.push(Line::from(Span::styled("* required", Style::default().fg(theme.muted)))),
  }

  let paragraph =
    Paragraph::new(lines).block(panel(theme, " Add Movie ", true).padding(Padding::horizontal(1)));
  frame.render_widget(paragraph, area);

  // Place the cursor after the focused field's value.
  if let Some(row) = FormField::ALL.iter().position(|f| *f == app.form_focus) {
    let value = app.form.field(app.form_focus);
    let col = (label_w + display_width(value, value.chars().count())).min(inner_w);
    frame.set_cursor_position((area.x + 2 + col as u16, area.y + 1 + row as u16));
  }
}

// --- Detail ---

fn render_detail(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let Some(view) = app.detail.as_ref() else { return };

  let block = panel(theme, format!(" Movie {} ", view.id()), true).padding(Padding::horizontal(1));
  let (lines, record) = match view.status() {
    DetailStatus::Loading => {
      let text = Paragraph::new(Span::styled("Loading…", Style::default().fg(theme.status))).block(block);
      frame.render_widget(text, area);
      return;
    }
    DetailStatus::Failed(message) => {
      let text = Paragraph::new(Span::styled(format!("⚠  {}", message), Style::default().fg(theme.error))).block(block);
      frame.render_widget(text, area);
      return;
    }
    DetailStatus::Loaded(record) => (detail_lines(theme, view, record), record.clone()),
  };

  let [poster_area, info_area] = Layout::horizontal([Constraint::Percentage(35), Constraint::Percentage(65)]).areas(area);
  render_poster(frame, app, &record, poster_area);
  frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }).block(block), info_area);
}

fn detail_lines(theme: &Theme, view: &DetailView, record: &MovieRecord) -> Vec<Line<'static>> {
  let mut lines = vec![
    Line::from(""),
    Line::from(vec![
      Span::styled(record.display_title(), Style::default().fg(theme.fg).add_modifier(Modifier::BOLD)),
      Span::styled(format!("  ({})", record.display_year()), Style::default().fg(theme.muted)),
    ]),
    Line::from(""),
  ];

  let mut fact = |label: &'static str, value: String| {
    lines.push(Line::from(vec![
      Span::styled(format!("{:<10}", label), Style::default().fg(theme.muted)),
      Span::styled(value, Style::default().fg(theme.fg)),
    ]));
  };
  if let Some(genres) = record.genres() {
    fact("Genre", genres);
  }
  if let Some(director) = record.director() {
    fact("Director", director.to_string());
  }
  if let Some(cast) = record.top_cast() {
    fact("Actors", cast);
  }
  if record.is_custom() {
    lines.push(Line::from(Span::styled("★ Added by you", Style::default().fg(theme.custom))));
  }

  if let Some(plot) = record.plot() {
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(plot.to_string(), Style::default().fg(theme.fg))));
  }

  lines.push(Line::from(""));
  let trailer = view.trailer();
  let trailer_line = if let Some(video_id) = &trailer.video_id {
    Line::from(vec![
      Span::styled(format!("{:<10}", "Trailer"), Style::default().fg(theme.muted)),
      Span::styled(embed_url(video_id), Style::default().fg(theme.accent).add_modifier(Modifier::UNDERLINED)),
    ])
  } else if trailer.loading {
    Line::from(Span::styled("Loading trailer…", Style::default().fg(theme.status)))
  } else if let Some(err) = &trailer.error {
    Line::from(Span::styled(err.clone(), Style::default().fg(theme.error)))
  } else {
    Line::from("")
  };
  lines.push(trailer_line);
  lines.push(Line::from(Span::styled(record.poster_url(), Style::default().fg(theme.muted))));
  lines
}

fn render_poster(frame: &mut Frame, app: &mut App, record: &MovieRecord, area: Rect) {
  let theme = app.theme();
  let area = Rect { y: area.y + 1, height: area.height.saturating_sub(2), ..area };
  let url = record.poster_url();

  let Some((loaded_url, image)) = app.poster.loaded.as_ref().filter(|(u, _)| *u == url) else {
    let loading = app.display_mode.shows_posters() && app.tasks.poster_loading(&url);
    let text = if loading { "Loading poster…" } else { "" };
    let placeholder = Paragraph::new(Span::styled(text, Style::default().fg(theme.muted))).alignment(Alignment::Center);
    frame.render_widget(placeholder, area);
    return;
  };

  let needs_resize = match &app.poster.resized {
    Some((u, w, h, _)) => u != loaded_url || *w != area.width || *h != area.height,
    None => true,
  };
  if needs_resize {
    let resized = fit_to_area(image, area, app.display_mode);
    app.poster.resized = Some((loaded_url.clone(), area.width, area.height, resized));
  }

  if let Some((_, _, _, ref resized)) = app.poster.resized {
    frame.render_widget(PosterWidget { image: resized, display_mode: app.display_mode }, area);
  }
}

// --- Status, input, footer ---

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let (text, style) = if let Some(msg) = &app.status_message {
    (format!(" ⏳ {}", msg), Style::default().fg(theme.status))
  } else if let Some(err) = &app.last_error {
    (format!(" ⚠  {}", err), Style::default().fg(theme.error))
  } else if let Some(err) = app.search.error() {
    (format!(" ⚠  {}", err), Style::default().fg(theme.error))
  } else if let Some(info) = &app.info_message {
    (format!(" {}", info), Style::default().fg(theme.status))
  } else {
    let count = app.catalog.len();
    let mine = app.catalog.custom_count();
    (format!(" {} movies ({} yours) · posters: {}", count, mine, app.display_mode.label()), Style::default().fg(theme.muted))
  };
  frame.render_widget(Paragraph::new(text).style(style), area);
}

fn render_input(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let border_color = if app.mode == AppMode::Input { theme.accent } else { theme.border };
  let input_block = Block::bordered()
    .title(" Search TMDb ")
    .title_style(Style::default().fg(border_color))
    .border_type(BorderType::Rounded)
    .border_style(Style::default().fg(border_color))
    .padding(Padding::horizontal(1));

  let inner_w = area.width.saturating_sub(4) as usize;
  let cursor_col = display_width(&app.input, app.cursor_position);

  if cursor_col < app.input_scroll {
    app.input_scroll = cursor_col;
  } else if cursor_col >= app.input_scroll + inner_w {
    app.input_scroll = cursor_col.saturating_sub(inner_w) + 1;
  }

  let visible: String = app
    .input
    .chars()
    .scan(0usize, |col, c| {
      let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
      let start = *col;
      *col += w;
      Some((start, *col, c))
    })
    .skip_while(|(_, end, _)| *end <= app.input_scroll)
    .take_while(|(start, _, _)| *start < app.input_scroll + inner_w)
    .map(|(_, _, c)| c)
    .collect();

  let paragraph = Paragraph::new(visible).style(Style::default().fg(theme.fg)).block(input_block);
  frame.render_widget(paragraph, area);

  if app.mode == AppMode::Input {
    let cursor_x = area.x + 2 + (cursor_col - app.input_scroll) as u16;
    frame.set_cursor_position((cursor_x, area.y + 1));
  }
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let keys: Vec<(&str, &str)> = match app.mode {
    AppMode::Input => vec![("Enter", "Search"), ("↓", "Results"), ("^t", "Theme"), ("^c", "Quit")],
    AppMode::Results => {
      let mut k = vec![("Enter", "Details"), ("j/k", "Navigate")];
      if app.search.has_prev() || app.search.has_next() {
        k.push(("←/→", "Page"));
      }
      k.extend([("a", "Add"), ("h", "Home"), ("/", "Search"), ("^t", "Theme")]);
      k
    }
    AppMode::Form => {
      let esc = if app.form.is_empty() { "Cancel" } else { "Close (keeps draft)" };
      vec![("Tab", "Next field"), ("Enter", "Add movie"), ("Esc", esc)]
    }
    AppMode::Detail => {
      let mut k = vec![("Esc", "Back"), ("h", "Home")];
      if app.detail.as_ref().is_some_and(|v| v.trailer().video_id.is_some()) {
        k.push(("o", "Open trailer"));
      }
      k.push(("^t", "Theme"));
      k
    }
  };

  let spans: Vec<Span> = keys
    .iter()
    .enumerate()
    .flat_map(|(i, (key, action))| {
      let mut s = vec![
        Span::styled(format!(" {} ", key), Style::default().fg(theme.key_fg).bg(theme.key_bg)),
        Span::styled(format!(" {} ", action), Style::default().fg(theme.muted)),
      ];
      if i < keys.len() - 1 {
        s.push(Span::raw("  "));
      }
      s
    })
    .collect();

  frame.render_widget(Line::from(spans), area);

  let theme_label = format!("{} ", theme.name);
  let right = Line::from(Span::styled(&theme_label, Style::default().fg(theme.muted)));
  let right_area =
    Rect { x: area.x + area.width.saturating_sub(theme_label.len() as u16), width: theme_label.len() as u16, ..area };
  frame.render_widget(right, right_area);
}
