//! UI Components for the terminal interface

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{
    Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, TableState, Tabs, Wrap,
};
use ratatui::Frame;

use super::state::{BrowserState, Focus};
use crate::filter::FacetState;
use crate::router::Page;
use crate::schema::Tab;
use crate::view::{Card, DetailView, Field, ListBody, TableView};

const ACCENT: Color = Color::Red;

fn block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(ACCENT))
}

/// Tab bar across the top
pub struct TabBar {
    selected: Tab,
}

impl TabBar {
    pub fn new(selected: Tab) -> Self {
        Self { selected }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<String> = Tab::ALL.iter().map(|t| t.to_string()).collect();
        let tabs = Tabs::new(titles)
            .select(self.selected.index())
            .block(block(" Devil May Cry Database "))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, area);
    }
}

/// Search line and one row per facet
pub struct FilterPanel<'a> {
    search: &'a str,
    facets: &'a [FacetState],
    focus: Focus,
    facet_index: usize,
    options: Vec<String>,
    option_index: usize,
}

impl<'a> FilterPanel<'a> {
    pub fn new(state: &BrowserState, search: &'a str, facets: &'a [FacetState]) -> Self {
        let options = if state.focus() == Focus::Facets {
            state.current_options()
        } else {
            Vec::new()
        };
        Self {
            search,
            facets,
            focus: state.focus(),
            facet_index: state.facet_index(),
            options,
            option_index: state.option_index(),
        }
    }

    pub fn height(&self) -> u16 {
        // borders + search line + one line per facet
        2 + 1 + self.facets.len() as u16
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let mut lines = Vec::with_capacity(1 + self.facets.len());

        let cursor = if self.focus == Focus::Search { "▏" } else { "" };
        let search_style = if self.focus == Focus::Search {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let placeholder = if self.search.is_empty() && self.focus != Focus::Search {
            Span::styled("Type / to filter by name, game, etc.", Style::default().fg(Color::DarkGray))
        } else {
            Span::styled(format!("{}{}", self.search, cursor), search_style)
        };
        lines.push(Line::from(vec![Span::raw(" Search: "), placeholder]));

        for (idx, facet) in self.facets.iter().enumerate() {
            let picking = self.focus == Focus::Facets && idx == self.facet_index;
            let label_style = if picking {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let mut spans = vec![Span::styled(format!(" {}: ", facet.label), label_style)];

            let options: &[String] = if picking { &self.options } else { &facet.options };
            for (opt_idx, option) in options.iter().enumerate() {
                let selected = facet.selected.contains(option);
                let mut style = if selected {
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Gray)
                };
                if picking && opt_idx == self.option_index {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                let mark = if selected { "[x]" } else { "[ ]" };
                spans.push(Span::styled(format!("{} {}", mark, option), style));
                spans.push(Span::raw("  "));
            }
            lines.push(Line::from(spans));
        }

        let paragraph = Paragraph::new(lines).block(block(" Filters "));
        frame.render_widget(paragraph, area);
    }
}

fn card_item(card: &Card) -> ListItem<'_> {
    let mut lines = vec![Line::from(Span::styled(
        card.title.as_str(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    if !card.subtitle.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("  {}", card.subtitle),
            Style::default().fg(Color::DarkGray),
        )));
    }
    if !card.body.is_empty() {
        lines.push(Line::from(format!("  {}", card.body)));
    }
    lines.push(Line::from(Span::styled(
        format!("  Open details {}", card.link),
        Style::default().fg(Color::Blue),
    )));
    lines.push(Line::from(""));
    ListItem::new(Text::from(lines))
}

/// Cards or the mission table
pub struct ListPanel<'a> {
    body: &'a ListBody,
    title: String,
    cursor: usize,
}

impl<'a> ListPanel<'a> {
    pub fn new(body: &'a ListBody, title: String, cursor: usize) -> Self {
        Self { body, title, cursor }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = block(&self.title);
        match self.body {
            ListBody::Cards(cards) if cards.is_empty() => {
                let paragraph = Paragraph::new(" No matches").block(block);
                frame.render_widget(paragraph, area);
            }
            ListBody::Cards(cards) => {
                let items: Vec<ListItem> = cards.iter().map(card_item).collect();
                let list = List::new(items)
                    .block(block)
                    .highlight_symbol("▶ ")
                    .highlight_style(Style::default().fg(Color::Yellow));
                let mut list_state = ListState::default().with_selected(Some(self.cursor));
                frame.render_stateful_widget(list, area, &mut list_state);
            }
            ListBody::Table(table) => self.render_table(frame, area, block, table),
        }
    }

    fn render_table(&self, frame: &mut Frame, area: Rect, block: Block, table: &TableView) {
        let header = Row::new(table.columns.iter().map(|c| Cell::from(c.as_str())))
            .style(Style::default().add_modifier(Modifier::BOLD));
        let rows = table
            .rows
            .iter()
            .map(|r| Row::new(r.iter().map(|v| Cell::from(v.as_str()))));
        let widths = vec![Constraint::Fill(1); table.columns.len().max(1)];

        let widget = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().fg(Color::Yellow));
        let mut table_state = TableState::default().with_selected(Some(self.cursor));
        frame.render_stateful_widget(widget, area, &mut table_state);
    }
}

fn field_lines(fields: &[Field]) -> Vec<Line<'_>> {
    fields
        .iter()
        .map(|f| {
            Line::from(vec![
                Span::styled(format!("{}: ", f.label), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(f.value.as_str()),
            ])
        })
        .collect()
}

/// Detail page of one entity
pub struct DetailPanel<'a> {
    view: &'a DetailView,
}

impl<'a> DetailPanel<'a> {
    pub fn new(view: &'a DetailView) -> Self {
        Self { view }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let outer = block(" Details ");
        let inner = outer.inner(area);
        frame.render_widget(outer, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // back link
                Constraint::Length(2), // title
                Constraint::Length(1), // image
                Constraint::Min(3),    // description
                Constraint::Length(self.fields_height()),
            ])
            .split(inner);

        frame.render_widget(
            Paragraph::new(Span::styled("← Back to list (Esc)", Style::default().fg(Color::Blue))),
            chunks[0],
        );
        frame.render_widget(
            Paragraph::new(Span::styled(
                self.view.title.as_str(),
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            )),
            chunks[1],
        );
        if let Some(url) = &self.view.image_url {
            frame.render_widget(
                Paragraph::new(Span::styled(format!("Image: {}", url), Style::default().fg(Color::DarkGray))),
                chunks[2],
            );
        }
        frame.render_widget(
            Paragraph::new(self.view.description.as_str()).wrap(Wrap { trim: true }),
            chunks[3],
        );

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[4]);
        let divider = Block::default().borders(Borders::TOP).border_style(Style::default().fg(Color::DarkGray));
        frame.render_widget(Paragraph::new(field_lines(&self.view.left)).block(divider.clone()), columns[0]);
        frame.render_widget(Paragraph::new(field_lines(&self.view.right)).block(divider), columns[1]);
    }

    fn fields_height(&self) -> u16 {
        1 + self.view.left.len().max(self.view.right.len()) as u16
    }
}

fn render_not_found(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            "Item not found.",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("Back to list (Esc)", Style::default().fg(Color::Blue))),
    ];
    frame.render_widget(Paragraph::new(lines).block(block(" Details ")), area);
}

fn render_status(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let help = match (state.page(), state.focus()) {
        (Page::List, Focus::Search) => "type to search · Enter/Esc done",
        (Page::List, Focus::Facets) => "←/→ facet · ↑/↓ option · Space toggle · Esc close",
        (Page::List, Focus::List) if state.tab() == Tab::Missions => {
            "Tab switch · / search · f filters · c clear · x export CSV · q quit"
        }
        (Page::List, Focus::List) => "Tab switch · / search · f filters · c clear · Enter details · q quit",
        _ => "Esc back · q quit",
    };
    let mut spans = vec![Span::styled(format!(" {}", help), Style::default().fg(Color::DarkGray))];
    if let Some(status) = state.status() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(status, Style::default().fg(Color::Green)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Draw the whole screen for `state`
pub fn draw(frame: &mut Frame, state: &BrowserState) {
    let area = frame.area();

    match state.page() {
        Page::List => {
            let view = state.view();
            let filters = FilterPanel::new(state, &view.search, &view.facets);
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3),                // Tabs
                    Constraint::Length(filters.height()), // Search and facets
                    Constraint::Min(5),                   // Cards
                    Constraint::Length(1),                // Status
                ])
                .split(area);

            TabBar::new(state.tab()).render(frame, chunks[0]);
            filters.render(frame, chunks[1]);
            let title = format!(" {} ({} of {}) ", view.tab, view.body.len(), view.total);
            ListPanel::new(&view.body, title, state.cursor()).render(frame, chunks[2]);
            render_status(frame, chunks[3], state);
        }
        page => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Min(5),
                    Constraint::Length(1),
                ])
                .split(area);

            TabBar::new(state.tab()).render(frame, chunks[0]);
            match page {
                Page::Detail(view) => DetailPanel::new(view).render(frame, chunks[1]),
                _ => render_not_found(frame, chunks[1]),
            }
            render_status(frame, chunks[2], state);
        }
    }
}
