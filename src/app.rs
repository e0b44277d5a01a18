use anyhow::{Result, anyhow};
use image::DynamicImage;
use ratatui::widgets::ListState;
use reqwest::Client;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, IdGenerator};
use crate::config::{Config, Credentials};
use crate::constants::constants;
use crate::detail::{DetailRequest, DetailView, TrailerRequest};
use crate::display::DisplayMode;
use crate::form::{AddMovieForm, FormField};
use crate::movie::{ApiMovie, MovieId};
use crate::poster::load_poster;
use crate::route::Route;
use crate::search::{SearchController, SearchPage, SearchRequest};
use crate::theme::THEMES;
use crate::tmdb::TmdbClient;
use crate::youtube::{YoutubeClient, watch_url};

// --- Types ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
  /// Typing in the search box.
  Input,
  /// Moving through the catalog list.
  Results,
  /// Filling in the add-movie form.
  Form,
  /// Looking at a single record.
  Detail,
}

/// A spawned request whose result arrives over a oneshot channel.
/// Dropping it aborts the task, so replacing a slot cancels the superseded request.
pub(crate) struct Pending<T> {
  rx: oneshot::Receiver<T>,
  handle: JoinHandle<()>,
}

impl<T: Send + 'static> Pending<T> {
  fn spawn<F>(fut: F) -> Self
  where
    F: Future<Output = T> + Send + 'static,
  {
    let (tx, rx) = oneshot::channel();
    let handle = tokio::spawn(async move {
      let _ = tx.send(fut.await);
    });
    Self { rx, handle }
  }
}

impl<T> Drop for Pending<T> {
  fn drop(&mut self) {
    self.handle.abort();
  }
}

enum Polled<T> {
  Ready(T),
  /// The task ended without reporting (panicked or aborted).
  Lost,
}

/// Check a task slot without blocking. A finished or lost task is removed from the slot.
fn poll_slot<K, T>(slot: &mut Option<(K, Pending<T>)>) -> Option<(K, Polled<T>)> {
  let (key, mut pending) = slot.take()?;
  match pending.rx.try_recv() {
    Ok(value) => Some((key, Polled::Ready(value))),
    Err(oneshot::error::TryRecvError::Empty) => {
      *slot = Some((key, pending));
      None
    }
    Err(oneshot::error::TryRecvError::Closed) => Some((key, Polled::Lost)),
  }
}

/// In-flight requests, each tagged with the sequence number or URL it belongs to.
#[derive(Default)]
pub(crate) struct AsyncTasks {
  pub(crate) search: Option<(u64, Pending<Result<SearchPage>>)>,
  pub(crate) detail: Option<(u64, Pending<Result<ApiMovie>>)>,
  pub(crate) trailer: Option<(u64, Pending<Result<Option<String>>>)>,
  pub(crate) poster: Option<(String, Pending<Option<DynamicImage>>)>,
}

impl AsyncTasks {
  /// Whether a poster load for `url` is still in flight.
  pub(crate) fn poster_loading(&self, url: &str) -> bool {
    self.poster.as_ref().is_some_and(|(u, _)| u == url)
  }
}

/// Poster rendering cache: the loaded image and its copy resized to the last drawn area.
#[derive(Default)]
pub struct PosterCache {
  pub loaded: Option<(String, DynamicImage)>,
  pub resized: Option<(String, u16, u16, DynamicImage)>,
  /// URL whose poster and fallback both failed; nothing is drawn for it.
  pub failed: Option<String>,
}


pub struct App {
  pub route: Route,
  pub mode: AppMode,
  pub input: String,
  pub cursor_position: usize,
  pub input_scroll: usize,
  pub theme_index: usize,
  pub display_mode: DisplayMode,
  pub search: SearchController,
  pub catalog: Catalog,
  pub list_state: ListState,
  pub form: AddMovieForm,
  pub form_focus: FormField,
  pub form_error: Option<String>,
  pub detail: Option<DetailView>,
  pub poster: PosterCache,
  pub status_message: Option<String>,
  /// Informational message, lower priority than status/error.
  pub info_message: Option<String>,
  pub last_error: Option<String>,
  error_time: Option<Instant>,
  pub should_quit: bool,
  ids: IdGenerator,
  http: Client,
  tmdb: TmdbClient,
  youtube: YoutubeClient,
  pub(crate) tasks: AsyncTasks,
}

impl App {
  pub fn new(credentials: Credentials, http: Client, display_mode: DisplayMode) -> Self {
    let config = Config::load();
    let theme_index =
      if let Some(ref name) = config.theme_name { THEMES.iter().position(|t| t.name == name).unwrap_or(0) } else { 0 };

    let seed = constants().seed_query.clone();
    let info_message = match credentials.missing().as_slice() {
      [] => None,
      missing => Some(format!("{} not set; remote lookups will fail.", missing.join(" and "))),
    };

    Self {
      route: Route::Catalog,
      mode: AppMode::Results,
      cursor_position: seed.chars().count(),
      input: seed.clone(),
      input_scroll: 0,
      theme_index,
      display_mode,
      search: SearchController::new(seed),
      catalog: Catalog::default(),
      list_state: ListState::default(),
      form: AddMovieForm::default(),
      form_focus: FormField::Title,
      form_error: None,
      detail: None,
      poster: PosterCache::default(),
      status_message: None,
      info_message,
      last_error: None,
      error_time: None,
      should_quit: false,
      ids: IdGenerator::default(),
      tmdb: TmdbClient::new(http.clone(), credentials.tmdb_api_key),
      youtube: YoutubeClient::new(http.clone(), credentials.youtube_api_key),
      http,
      tasks: AsyncTasks::default(),
    }
  }

  pub fn theme(&self) -> &'static crate::theme::Theme {
    // Safety: theme_index is always bounded by modular arithmetic in next_theme()
    // and by position() on initialization.
    &THEMES[self.theme_index]
  }

  /// Set an error message with auto-dismiss tracking.
  pub fn set_error(&mut self, msg: String) {
    self.last_error = Some(msg);
    self.error_time = Some(Instant::now());
  }

  pub fn clear_error(&mut self) {
    self.last_error = None;
    self.error_time = None;
  }

  /// Clear stale error messages after 5 seconds.
  pub fn expire_error(&mut self) {
    if let Some(t) = self.error_time
      && t.elapsed() >= Duration::from_secs(5)
    {
      self.clear_error();
    }
  }

  pub fn next_theme(&mut self) {
    self.theme_index = (self.theme_index + 1) % THEMES.len();
    self.save_config();
  }

  fn save_config(&self) {
    let config =
      Config { theme_name: Some(self.theme().name.to_string()), display_mode: Some(self.display_mode.label().to_string()) };
    config.save();
  }

  /// Kick off the initial catalog load, then show `route`.
  pub fn start(&mut self, route: Route, query: Option<&str>) {
    let request = match query {
      Some(q) => {
        self.set_input(q);
        self.search.set_search_term(q)
      }
      None => self.search.start(),
    };
    self.run_search(request);
    self.navigate(route);
  }

  pub fn set_input(&mut self, text: &str) {
    self.input = text.to_string();
    self.cursor_position = self.input.chars().count();
    self.input_scroll = 0;
  }

  // --- Catalog ---

  /// Submit the search box.
  pub fn submit_search(&mut self) {
    let term = self.input.trim().to_string();
    if term.is_empty() {
      self.set_error("Enter a search term.".to_string());
      return;
    }
    info!(term = %term, "search triggered");
    let request = self.search.set_search_term(&term);
    self.run_search(request);
    self.mode = AppMode::Results;
  }

  pub fn next_page(&mut self) {
    let request = self.search.next_page();
    self.run_search(request);
  }

  pub fn prev_page(&mut self) {
    let request = self.search.prev_page();
    self.run_search(request);
  }

  /// Home: catalog view with the seed search.
  pub fn go_home(&mut self) {
    let request = self.search.reset_home();
    let seed = self.search.term().to_string();
    self.set_input(&seed);
    self.run_search(request);
    self.navigate(Route::Catalog);
  }

  fn run_search(&mut self, request: Option<SearchRequest>) {
    let Some(SearchRequest { term, page, seq }) = request else { return };
    self.clear_error();
    self.status_message = Some(format!("Searching '{}' (page {})…", term, page));

    let tmdb = self.tmdb.clone();
    let pending = Pending::spawn(async move { tmdb.search_movies(&term, page).await });
    // Replacing the slot aborts any earlier search.
    self.tasks.search = Some((seq, pending));
  }

  pub fn selected_id(&self) -> Option<MovieId> {
    let selected = self.list_state.selected()?;
    self.catalog.entries().get(selected).map(|r| r.id())
  }

  pub fn select_next(&mut self) {
    let count = self.catalog.len();
    if count > 0 {
      let i = self.list_state.selected().map_or(0, |i| (i + 1) % count);
      self.list_state.select(Some(i));
    }
  }

  pub fn select_prev(&mut self) {
    let count = self.catalog.len();
    if count > 0 {
      let i = self.list_state.selected().map_or(0, |i| if i == 0 { count - 1 } else { i - 1 });
      self.list_state.select(Some(i));
    }
  }

  fn reset_selection(&mut self) {
    self.list_state.select(if self.catalog.is_empty() { None } else { Some(0) });
  }

  // --- Form ---

  pub fn open_form(&mut self) {
    self.form_focus = FormField::Title;
    self.form_error = None;
    self.mode = AppMode::Form;
  }

  pub fn focus_next_field(&mut self) {
    let idx = FormField::ALL.iter().position(|f| *f == self.form_focus).unwrap_or(0);
    self.form_focus = FormField::ALL[(idx + 1) % FormField::ALL.len()];
  }

  pub fn focus_prev_field(&mut self) {
    let idx = FormField::ALL.iter().position(|f| *f == self.form_focus).unwrap_or(0);
    self.form_focus = FormField::ALL[(idx + FormField::ALL.len() - 1) % FormField::ALL.len()];
  }

  pub fn submit_form(&mut self) {
    match self.form.submit(&mut self.ids) {
      Ok(movie) => {
        info!(id = %movie.id, title = %movie.title, year = movie.year, "custom movie added");
        self.info_message = Some(format!("Added '{}'.", movie.title));
        self.catalog.add_custom(movie);
        self.list_state.select(Some(0));
        self.form_error = None;
        self.form_focus = FormField::Title;
        self.mode = AppMode::Results;
      }
      Err(e) => {
        debug!(err = %e, "form rejected");
        self.form_error = Some(e.to_string());
      }
    }
  }

  // --- Navigation ---

  pub fn navigate(&mut self, route: Route) {
    debug!(route = %route, "navigate");
    match &route {
      Route::Catalog => {
        self.detail = None;
        self.tasks.detail = None;
        self.tasks.trailer = None;
        self.tasks.poster = None;
        self.poster = PosterCache::default();
        self.mode = AppMode::Results;
      }
      Route::Movie(id) => {
        let local = self.catalog.get(id).cloned();
        let (view, request) = DetailView::open(id.clone(), local);
        self.detail = Some(view);
        self.tasks.trailer = None;
        self.tasks.poster = None;
        self.poster = PosterCache::default();
        self.mode = AppMode::Detail;
        self.run_detail(request);
        self.sync_detail_effects();
      }
    }
    self.route = route;
  }

  pub fn open_selected(&mut self) {
    if let Some(id) = self.selected_id() {
      self.navigate(Route::Movie(id));
    }
  }

  fn run_detail(&mut self, request: Option<DetailRequest>) {
    let Some(DetailRequest { id, seq }) = request else {
      self.tasks.detail = None;
      return;
    };
    let tmdb = self.tmdb.clone();
    self.tasks.detail = Some((seq, Pending::spawn(async move { tmdb.movie_details(id).await })));
  }

  fn run_trailer(&mut self, request: TrailerRequest) {
    let TrailerRequest { query, seq } = request;
    info!(query = %query, "trailer search");
    let youtube = self.youtube.clone();
    self.tasks.trailer = Some((seq, Pending::spawn(async move { youtube.search_trailer(&query).await })));
  }

  /// Re-run the detail view's dependent fetches: the trailer search when the
  /// record's title/year changed, and the poster when its URL changed.
  fn sync_detail_effects(&mut self) {
    let Some(view) = self.detail.as_mut() else { return };
    if let Some(request) = view.trailer_request() {
      self.run_trailer(request);
    }

    let Some(url) = self.detail.as_ref().and_then(|v| v.record()).map(|r| r.poster_url()) else { return };
    if !self.display_mode.shows_posters() {
      return;
    }
    let already = self.poster.loaded.as_ref().is_some_and(|(u, _)| *u == url)
      || self.poster.failed.as_deref() == Some(url.as_str())
      || self.tasks.poster_loading(&url);
    if already {
      return;
    }
    let http = self.http.clone();
    let target = url.clone();
    self.tasks.poster = Some((url, Pending::spawn(async move { load_poster(&http, &target).await })));
  }

  /// Open the current trailer in the system browser.
  pub fn open_trailer(&mut self) {
    let Some(video_id) = self.detail.as_ref().and_then(|v| v.trailer().video_id.clone()) else {
      self.set_error("No trailer to open.".to_string());
      return;
    };
    let url = watch_url(&video_id);
    #[cfg(target_os = "macos")]
    let cmd = "open";
    #[cfg(not(target_os = "macos"))]
    let cmd = "xdg-open";
    match std::process::Command::new(cmd)
      .arg(&url)
      .stdin(std::process::Stdio::null())
      .stdout(std::process::Stdio::null())
      .stderr(std::process::Stdio::null())
      .spawn()
    {
      Ok(mut child) => {
        // Reap the child in a background thread to avoid zombie processes.
        std::thread::spawn(move || {
          let _ = child.wait();
        });
      }
      Err(e) => {
        warn!(err = %e, "failed to open browser");
        self.set_error(format!("Failed to open browser: {}", e));
      }
    }
  }

  // --- Task polling ---

  pub fn check_pending(&mut self) {
    if let Some((seq, polled)) = poll_slot(&mut self.tasks.search) {
      self.status_message = None;
      let outcome = match polled {
        Polled::Ready(result) => result,
        Polled::Lost => Err(anyhow!("search task failed")),
      };
      if let Some(results) = self.search.apply(seq, outcome.map_err(|e| format!("{:#}", e))) {
        info!(term = %self.search.term(), page = self.search.page(), count = results.len(), "search loaded");
        self.catalog.replace_api(results);
        self.reset_selection();
      }
    }

    if let Some((seq, polled)) = poll_slot(&mut self.tasks.detail) {
      let outcome = match polled {
        Polled::Ready(result) => result,
        Polled::Lost => Err(anyhow!("detail task failed")),
      };
      let applied =
        self.detail.as_mut().is_some_and(|view| view.apply_detail(seq, outcome.map_err(|e| format!("{:#}", e))));
      if applied {
        self.sync_detail_effects();
      }
    }

    if let Some((seq, polled)) = poll_slot(&mut self.tasks.trailer) {
      let outcome = match polled {
        Polled::Ready(result) => result,
        Polled::Lost => Err(anyhow!("trailer task failed")),
      };
      if let Some(view) = self.detail.as_mut() {
        view.apply_trailer(seq, outcome.map_err(|e| format!("{:#}", e)));
      }
    }

    if let Some((url, polled)) = poll_slot(&mut self.tasks.poster) {
      match polled {
        Polled::Ready(Some(image)) => {
          self.poster.loaded = Some((url, image));
          self.poster.resized = None;
        }
        Polled::Ready(None) | Polled::Lost => {
          debug!(url = %url, "poster unavailable");
          self.poster.failed = Some(url);
        }
      }
    }
  }
}
