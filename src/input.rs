use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, AppMode};
use crate::route::Route;

// --- Helpers ---

/// Convert a char index to a byte offset within the string.
pub fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
  s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}

// --- Event Handling ---

pub fn handle_key_event(app: &mut App, key: KeyEvent) {
  if key.modifiers.contains(KeyModifiers::CONTROL) {
    match key.code {
      KeyCode::Char('c') => {
        app.should_quit = true;
        return;
      }
      KeyCode::Char('t') => {
        app.next_theme();
        return;
      }
      KeyCode::Char('o') => {
        app.open_trailer();
        return;
      }
      _ => {}
    }
  }

  match app.mode {
    AppMode::Input => handle_input_key(app, key),
    AppMode::Results => handle_results_key(app, key),
    AppMode::Form => handle_form_key(app, key),
    AppMode::Detail => handle_detail_key(app, key),
  }
}

fn handle_input_key(app: &mut App, key: KeyEvent) {
  app.clear_error();
  match key.code {
    KeyCode::Enter => {
      app.submit_search();
    }
    KeyCode::Char(c) => {
      let byte_idx = char_to_byte_index(&app.input, app.cursor_position);
      app.input.insert(byte_idx, c);
      app.cursor_position += 1;
    }
    KeyCode::Backspace => {
      if app.cursor_position > 0 {
        app.cursor_position -= 1;
        let byte_idx = char_to_byte_index(&app.input, app.cursor_position);
        app.input.remove(byte_idx);
      }
    }
    KeyCode::Delete => {
      if app.cursor_position < app.input.chars().count() {
        let byte_idx = char_to_byte_index(&app.input, app.cursor_position);
        app.input.remove(byte_idx);
      }
    }
    KeyCode::Left => {
      app.cursor_position = app.cursor_position.saturating_sub(1);
    }
    KeyCode::Right => {
      if app.cursor_position < app.input.chars().count() {
        app.cursor_position += 1;
      }
    }
    KeyCode::Home => {
      app.cursor_position = 0;
    }
    KeyCode::End => {
      app.cursor_position = app.input.chars().count();
    }
    KeyCode::Esc => {
      if !app.input.is_empty() {
        app.set_input("");
      } else {
        app.mode = AppMode::Results;
      }
    }
    KeyCode::Down => {
      app.mode = AppMode::Results;
    }
    _ => {}
  }
}

fn handle_results_key(app: &mut App, key: KeyEvent) {
  match key.code {
    KeyCode::Enter => {
      app.open_selected();
    }
    KeyCode::Down | KeyCode::Char('j') => {
      app.select_next();
    }
    KeyCode::Up | KeyCode::Char('k') => {
      app.select_prev();
    }
    KeyCode::Right | KeyCode::Char('n') => {
      app.next_page();
    }
    KeyCode::Left | KeyCode::Char('p') => {
      app.prev_page();
    }
    KeyCode::Char('a') => {
      app.open_form();
    }
    KeyCode::Char('h') => {
      app.go_home();
    }
    KeyCode::Char('/') | KeyCode::Esc => {
      app.mode = AppMode::Input;
    }
    _ => {}
  }
}

fn handle_form_key(app: &mut App, key: KeyEvent) {
  match key.code {
    KeyCode::Enter => {
      app.submit_form();
    }
    KeyCode::Tab | KeyCode::Down => {
      app.focus_next_field();
    }
    KeyCode::BackTab | KeyCode::Up => {
      app.focus_prev_field();
    }
    KeyCode::Char(c) => {
      app.form.field_mut(app.form_focus).push(c);
    }
    KeyCode::Backspace => {
      app.form.field_mut(app.form_focus).pop();
    }
    KeyCode::Esc => {
      app.form_error = None;
      app.mode = AppMode::Results;
    }
    _ => {}
  }
}

fn handle_detail_key(app: &mut App, key: KeyEvent) {
  match key.code {
    KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => {
      app.navigate(Route::Catalog);
    }
    KeyCode::Char('h') => {
      app.go_home();
    }
    KeyCode::Char('o') => {
      app.open_trailer();
    }
    _ => {}
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::Credentials;
  use crate::display::DisplayMode;
  use crate::form::FormField;

  fn press(app: &mut App, code: KeyCode) {
    handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
  }

  fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
      press(app, KeyCode::Char(c));
    }
  }

  fn app() -> App {
    App::new(Credentials::default(), reqwest::Client::new(), DisplayMode::Off)
  }

  // --- char_to_byte_index ---

  #[test]
  fn char_to_byte_ascii() {
    assert_eq!(char_to_byte_index("hello", 0), 0);
    assert_eq!(char_to_byte_index("hello", 3), 3);
    assert_eq!(char_to_byte_index("hello", 5), 5); // past end
  }

  #[test]
  fn char_to_byte_multibyte() {
    let s = "aé日"; // a=1 byte, é=2 bytes, 日=3 bytes
    assert_eq!(char_to_byte_index(s, 0), 0);
    assert_eq!(char_to_byte_index(s, 1), 1);
    assert_eq!(char_to_byte_index(s, 2), 3);
    assert_eq!(char_to_byte_index(s, 3), 6); // past end
  }

  #[test]
  fn char_to_byte_empty() {
    assert_eq!(char_to_byte_index("", 0), 0);
    assert_eq!(char_to_byte_index("", 5), 0);
  }

  // --- key handling ---

  #[tokio::test]
  async fn typing_a_search_resets_to_first_page() {
    let mut app = app();
    app.mode = AppMode::Input;
    app.set_input("");
    type_text(&mut app, "Alien");
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.search.term(), "Alien");
    assert_eq!(app.search.page(), 1);
    assert_eq!(app.mode, AppMode::Results);
  }

  #[tokio::test]
  async fn blank_search_is_not_submitted() {
    let mut app = app();
    app.mode = AppMode::Input;
    app.set_input("   ");
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.search.term(), "Avengers");
    assert_eq!(app.mode, AppMode::Input);
    assert!(app.last_error.is_some());
  }

  #[tokio::test]
  async fn form_keys_edit_focused_field() {
    let mut app = app();
    press(&mut app, KeyCode::Char('a'));
    assert_eq!(app.mode, AppMode::Form);
    type_text(&mut app, "Home Movie");
    press(&mut app, KeyCode::Tab);
    assert_eq!(app.form_focus, FormField::Year);
    type_text(&mut app, "19999");
    press(&mut app, KeyCode::Backspace);
    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "poster.png");
    press(&mut app, KeyCode::Enter);

    assert_eq!(app.mode, AppMode::Results);
    assert_eq!(app.catalog.custom_count(), 1);
    assert_eq!(app.catalog.entries()[0].display_title(), "Home Movie");
    assert_eq!(app.catalog.entries()[0].display_year(), "1999");
  }

  #[tokio::test]
  async fn escape_leaves_detail_view() {
    let mut app = app();
    app.navigate(Route::Movie(crate::movie::MovieId::Tmdb(603)));
    assert_eq!(app.mode, AppMode::Detail);
    press(&mut app, KeyCode::Esc);
    assert_eq!(app.route, Route::Catalog);
    assert_eq!(app.mode, AppMode::Results);
  }

  #[tokio::test]
  async fn ctrl_c_quits_from_any_mode() {
    let mut app = app();
    app.mode = AppMode::Form;
    handle_key_event(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert!(app.should_quit);
    assert!(app.form.is_empty());
  }
}
