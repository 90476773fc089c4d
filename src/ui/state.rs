//! Browser state and key handling, independent of the terminal

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::dataset::Dataset;
use crate::filter::ListQuery;
use crate::router::{self, Page, LIST_LINK};
use crate::schema::Tab;
use crate::view::{compose, ListBody, TabView};
use crate::writer::export_missions_to;

/// Which part of the list page receives keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    Search,
    Facets,
}

pub struct BrowserState {
    dataset: Arc<Dataset>,
    tab: Tab,
    queries: HashMap<Tab, ListQuery>,
    /// Current query string; the page is always derived from it
    location: String,
    page: Page,
    focus: Focus,
    cursor: usize,
    facet_index: usize,
    option_index: usize,
    export_file: PathBuf,
    status: Option<String>,
    should_quit: bool,
}

impl BrowserState {
    pub fn new(dataset: Arc<Dataset>, export_file: PathBuf) -> Self {
        Self {
            dataset,
            tab: Tab::Characters,
            queries: HashMap::new(),
            location: LIST_LINK.to_string(),
            page: Page::List,
            focus: Focus::List,
            cursor: 0,
            facet_index: 0,
            option_index: 0,
            export_file,
            status: None,
            should_quit: false,
        }
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn facet_index(&self) -> usize {
        self.facet_index
    }

    pub fn option_index(&self) -> usize {
        self.option_index
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn query(&self) -> ListQuery {
        self.queries.get(&self.tab).cloned().unwrap_or_default()
    }

    fn query_mut(&mut self) -> &mut ListQuery {
        self.queries.entry(self.tab).or_default()
    }

    /// The current tab under its query
    pub fn view(&self) -> TabView {
        compose(&self.dataset, self.tab, &self.query())
    }

    /// Follow a link. Detail pages switch to the tab of their entity type.
    pub fn navigate(&mut self, query: &str) {
        debug!(from = %self.location, to = query, "navigate");
        self.location = query.to_string();
        self.page = router::open(&self.dataset, query);
        let kind = match &self.page {
            Page::Detail(view) => Some(view.kind),
            Page::NotFound { kind, .. } => Some(*kind),
            Page::List => None,
        };
        if let Some(kind) = kind {
            self.set_tab(kind.into());
        }
        self.focus = Focus::List;
    }

    pub fn set_tab(&mut self, tab: Tab) {
        if tab != self.tab {
            self.tab = tab;
            self.cursor = 0;
            self.facet_index = 0;
            self.option_index = 0;
            self.status = None;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.page {
            Page::List => match self.focus {
                Focus::List => self.handle_list_key(key.code),
                Focus::Search => self.handle_search_key(key.code),
                Focus::Facets => self.handle_facet_key(key.code),
            },
            Page::Detail(_) | Page::NotFound { .. } => match key.code {
                KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => self.navigate(LIST_LINK),
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            },
        }
    }

    fn handle_list_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => self.set_tab(self.tab.next()),
            KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => self.set_tab(self.tab.prev()),
            KeyCode::Char('/') => self.focus = Focus::Search,
            KeyCode::Char('f') if !self.tab.schema().facets.is_empty() => {
                self.focus = Focus::Facets;
                self.option_index = 0;
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let len = self.view().body.len();
                if self.cursor + 1 < len {
                    self.cursor += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Enter => self.open_selected(),
            KeyCode::Char('x') if self.tab == Tab::Missions => self.export(),
            KeyCode::Char('c') => {
                self.queries.remove(&self.tab);
                self.cursor = 0;
            }
            _ => {}
        }
    }

    fn handle_search_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(c) => {
                self.query_mut().search.push(c);
                self.cursor = 0;
            }
            KeyCode::Backspace => {
                self.query_mut().search.pop();
                self.cursor = 0;
            }
            KeyCode::Enter | KeyCode::Esc => self.focus = Focus::List,
            _ => {}
        }
    }

    fn handle_facet_key(&mut self, code: KeyCode) {
        let facets = self.tab.schema().facets;
        if facets.is_empty() {
            self.focus = Focus::List;
            return;
        }
        match code {
            KeyCode::Esc | KeyCode::Char('f') => self.focus = Focus::List,
            KeyCode::Right | KeyCode::Tab => {
                self.facet_index = (self.facet_index + 1) % facets.len();
                self.option_index = 0;
            }
            KeyCode::Left | KeyCode::BackTab => {
                self.facet_index = (self.facet_index + facets.len() - 1) % facets.len();
                self.option_index = 0;
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let len = self.current_options().len();
                if self.option_index + 1 < len {
                    self.option_index += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.option_index = self.option_index.saturating_sub(1)
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                let column = facets[self.facet_index].column;
                if let Some(value) = self.current_options().get(self.option_index).cloned() {
                    self.query_mut().toggle(column, &value);
                    self.cursor = 0;
                }
            }
            _ => {}
        }
    }

    /// Options of the facet under the picker, plus any selected values no longer offered
    pub fn current_options(&self) -> Vec<String> {
        let view = self.view();
        let Some(state) = view.facets.get(self.facet_index) else {
            return Vec::new();
        };
        let mut options = state.options.clone();
        for value in &state.selected {
            if !options.contains(value) {
                options.push(value.clone());
            }
        }
        options
    }

    fn open_selected(&mut self) {
        let link = match self.view().body {
            ListBody::Cards(cards) => cards.get(self.cursor).map(|c| c.link.clone()),
            ListBody::Table(_) => None,
        };
        if let Some(link) = link {
            self.navigate(&link);
        }
    }

    fn export(&mut self) {
        let query = self.query();
        self.status = Some(
            match export_missions_to(&self.dataset, &query, &self.export_file) {
                Ok(rows) => format!("Exported {} missions to {}", rows, self.export_file.display()),
                Err(err) => {
                    warn!("export failed: {:#}", err);
                    format!("Export failed: {:#}", err)
                }
            },
        );
    }
}
