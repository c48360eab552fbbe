use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use pokedex::chart::{self, STAT_LABELS};
use pokedex::{Catalog, Category, DexConfig, DexError, RawEntry, Record, Validator};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, BarChart, Block, Borders, Cell, Chart, Dataset, Gauge, GraphType, Paragraph, Row,
        Table, TableState, Wrap,
    },
    Frame, Terminal,
};
use std::io;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Records,
    Averages,
    Chart,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Records => Page::Averages,
            Page::Averages => Page::Chart,
            Page::Chart => Page::Records,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Records => Page::Chart,
            Page::Averages => Page::Records,
            Page::Chart => Page::Averages,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Records => "Pokédex",
            Page::Averages => "Type Averages",
            Page::Chart => "Charts",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// Selected Pokémon's stats
    Bars,
    /// Fire vs Grass averages
    Lines,
    /// Selected Pokémon's stat distribution
    Distribution,
}

impl ChartKind {
    pub fn next(&self) -> Self {
        match self {
            ChartKind::Bars => ChartKind::Lines,
            ChartKind::Lines => ChartKind::Distribution,
            ChartKind::Distribution => ChartKind::Bars,
        }
    }
}

/// What a line of typed input will be used for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    SearchName,
    SearchId,
    FilterType,
    UpdateStat,
    UpdateBasic,
    Add,
    Report,
    SaveAs,
    SaveAsThenQuit,
}

impl InputAction {
    pub fn prompt(&self) -> &'static str {
        match self {
            InputAction::SearchName => "Name: ",
            InputAction::SearchId => "National Number: ",
            InputAction::UpdateStat => "Stat and value (e.g. hp 60): ",
            InputAction::UpdateBasic => "Field and value (e.g. height_m 1.70 m): ",
            InputAction::Add => "Type|No. XXXX|Name|Species|Height|Weight|Abilities|HP|Atk|Def|SpA|SpD|Spe: ",
            InputAction::Report => "Type to report (fire/grass): ",
            InputAction::FilterType => "Show type (fire/grass, empty for all): ",
            InputAction::SaveAs | InputAction::SaveAsThenQuit => "Save as (.txt or .json): ",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    Delete,
    QuitUnsaved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Input { action: InputAction, buffer: String },
    Confirm(ConfirmAction),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub text: String,
    pub error: bool,
}

pub struct App {
    pub catalog: Catalog,
    pub state: TableState,
    pub current_page: Page,
    pub chart_kind: ChartKind,
    pub show_detail: bool,
    pub mode: Mode,
    pub status: Option<Status>,
    /// Records table shows only this type when set
    pub filter: Option<Category>,
    autosave: bool,
    report_dir: PathBuf,
    quit: bool,
}

impl App {
    pub fn new(catalog: Catalog, config: &DexConfig) -> Self {
        let mut state = TableState::default();
        if catalog.count() > 0 {
            state.select(Some(0));
        }

        Self {
            catalog,
            state,
            current_page: Page::Records,
            chart_kind: ChartKind::Bars,
            show_detail: false,
            mode: Mode::Normal,
            status: None,
            filter: None,
            autosave: config.autosave,
            report_dir: config.report_dir.clone(),
            quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Catalog indices of the visible table rows
    pub fn rows(&self) -> Vec<usize> {
        match self.filter {
            Some(category) => self.catalog.category_positions(category),
            None => (0..self.catalog.count()).collect(),
        }
    }

    /// Catalog index of the highlighted row
    pub fn selected_index(&self) -> Option<usize> {
        self.state.selected().and_then(|row| self.rows().get(row).copied())
    }

    pub fn selected_record(&self) -> Option<&Record> {
        self.selected_index().and_then(|i| self.catalog.entries().get(i))
    }

    // ========================================================================
    // NAVIGATION
    // ========================================================================

    pub fn next(&mut self) {
        let len = self.rows().len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i >= len - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.rows().len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.rows().len();
        if len == 0 {
            return;
        }
        let i = self.state.selected().map(|i| (i + 20).min(len - 1)).unwrap_or(0);
        self.state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        if self.rows().is_empty() {
            return;
        }
        let i = self.state.selected().map(|i| i.saturating_sub(20)).unwrap_or(0);
        self.state.select(Some(i));
    }

    /// Keep the selection inside the table after it shrinks or grows
    fn clamp_selection(&mut self) {
        let len = self.rows().len();
        let selected = match self.state.selected() {
            _ if len == 0 => None,
            Some(i) => Some(i.min(len - 1)),
            None => Some(0),
        };
        self.state.select(selected);
    }

    /// Highlight the row showing catalog entry `index`, dropping a filter that hides it
    fn select_index(&mut self, index: usize) {
        if !self.rows().contains(&index) {
            self.filter = None;
        }
        let row = self.rows().iter().position(|&i| i == index);
        self.state.select(row);
    }

    fn set_filter(&mut self, filter: Option<Category>) {
        self.filter = filter;
        let first = if self.rows().is_empty() { None } else { Some(0) };
        self.state.select(first);
    }

    // ========================================================================
    // STATUS
    // ========================================================================

    fn info(&mut self, text: impl Into<String>) {
        self.status = Some(Status {
            text: text.into(),
            error: false,
        });
    }

    fn error(&mut self, text: impl Into<String>) {
        let text = text.into();
        warn!("{}", text);
        self.status = Some(Status { text, error: true });
    }

    // ========================================================================
    // KEYS
    // ========================================================================

    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.mode.clone() {
            Mode::Normal => self.handle_normal(key),
            Mode::Input { action, buffer } => self.handle_input(key, action, buffer),
            Mode::Confirm(action) => self.handle_confirm(key, action),
        }
    }

    fn prompt(&mut self, action: InputAction) {
        self.mode = Mode::Input {
            action,
            buffer: String::new(),
        };
    }

    fn handle_normal(&mut self, key: KeyEvent) {
        self.status = None;

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                if self.catalog.is_dirty() {
                    self.mode = Mode::Confirm(ConfirmAction::QuitUnsaved);
                } else {
                    self.quit = true;
                }
            }
            KeyCode::Enter => self.show_detail = !self.show_detail,
            KeyCode::BackTab => self.current_page = self.current_page.previous(),
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    self.current_page = self.current_page.previous();
                } else {
                    self.current_page = self.current_page.next();
                }
            }
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            KeyCode::PageDown => self.page_down(),
            KeyCode::PageUp => self.page_up(),
            KeyCode::Home => {
                if !self.rows().is_empty() {
                    self.state.select(Some(0));
                }
            }
            KeyCode::End => {
                let len = self.rows().len();
                if len > 0 {
                    self.state.select(Some(len - 1));
                }
            }
            KeyCode::Char('c') if self.current_page == Page::Chart => {
                self.chart_kind = self.chart_kind.next();
            }
            KeyCode::Char('/') => self.prompt(InputAction::SearchName),
            KeyCode::Char('#') => self.prompt(InputAction::SearchId),
            KeyCode::Char('t') => self.prompt(InputAction::FilterType),
            KeyCode::Char('a') => self.prompt(InputAction::Add),
            KeyCode::Char('r') => self.prompt(InputAction::Report),
            KeyCode::Char('u') | KeyCode::Char('i') | KeyCode::Char('d') => {
                if self.selected_record().is_none() {
                    self.error("No Pokémon selected");
                    return;
                }
                match key.code {
                    KeyCode::Char('u') => self.prompt(InputAction::UpdateStat),
                    KeyCode::Char('i') => self.prompt(InputAction::UpdateBasic),
                    _ => self.mode = Mode::Confirm(ConfirmAction::Delete),
                }
            }
            KeyCode::Char('s') => self.save(),
            _ => {}
        }
    }

    fn handle_input(&mut self, key: KeyEvent, action: InputAction, mut buffer: String) {
        match key.code {
            KeyCode::Esc => self.mode = Mode::Normal,
            KeyCode::Enter => {
                self.mode = Mode::Normal;
                if let Err(e) = self.submit(action, buffer.trim()) {
                    self.error(e.to_string());
                }
            }
            KeyCode::Backspace => {
                buffer.pop();
                self.mode = Mode::Input { action, buffer };
            }
            KeyCode::Char(c) => {
                buffer.push(c);
                self.mode = Mode::Input { action, buffer };
            }
            _ => {}
        }
    }

    fn handle_confirm(&mut self, key: KeyEvent, action: ConfirmAction) {
        let answer = match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(true),
            KeyCode::Char('n') | KeyCode::Char('N') => Some(false),
            KeyCode::Esc => None,
            _ => return,
        };
        self.mode = Mode::Normal;

        match (action, answer) {
            (_, None) | (ConfirmAction::Delete, Some(false)) => {}
            (ConfirmAction::Delete, Some(true)) => self.delete_selected(),
            (ConfirmAction::QuitUnsaved, Some(false)) => self.quit = true,
            (ConfirmAction::QuitUnsaved, Some(true)) => match self.catalog.save_back() {
                Ok(path) => {
                    info!("Saved to {} before quitting", path.display());
                    self.quit = true;
                }
                Err(DexError::MissingPath(_)) => self.prompt(InputAction::SaveAsThenQuit),
                Err(e) => self.error(e.to_string()),
            },
        }
    }

    // ========================================================================
    // ACTIONS
    // ========================================================================

    fn submit(&mut self, action: InputAction, input: &str) -> pokedex::Result<()> {
        match action {
            InputAction::SearchName => {
                let index = self.catalog.position_by_name(input)?;
                self.show_found(index);
            }
            InputAction::SearchId => {
                let id = input.strip_prefix("No. ").unwrap_or(input);
                let index = self.catalog.position_by_id(id)?;
                self.show_found(index);
            }
            InputAction::FilterType => {
                if input.is_empty() {
                    self.set_filter(None);
                    self.info(format!("Showing all {} Pokémon", self.catalog.count()));
                    return Ok(());
                }
                let Some(category) = Category::parse(input) else {
                    self.error(format!("Unknown type '{}': use fire or grass", input));
                    return Ok(());
                };
                self.set_filter(Some(category));
                self.current_page = Page::Records;
                let shown = self.rows().len();
                self.info(format!("Showing {} {} Pokémon", shown, category));
            }
            InputAction::UpdateStat => {
                let Some(index) = self.selected_index() else { return Ok(()) };
                let (field, value) = input.split_once(char::is_whitespace).unwrap_or((input, ""));
                self.catalog.update_stat_at(index, field, value)?;
                let name = self.catalog.entries()[index].name().to_string();
                self.after_mutation(format!("Updated {} of {}", field.trim(), name));
            }
            InputAction::UpdateBasic => {
                let Some(index) = self.selected_index() else { return Ok(()) };
                let (field, value) = input.split_once(char::is_whitespace).unwrap_or((input, ""));
                let edit = Validator::parse_basic_field(field, value.trim())?;
                self.catalog.update_basic_field_at(index, edit)?;
                let name = self.catalog.entries()[index].name().to_string();
                self.after_mutation(format!("Updated {} of {}", field.trim(), name));
            }
            InputAction::Add => {
                let record = RawEntry::parse_line(input)?.into_record()?;
                let name = record.name().to_string();
                self.catalog.add(record);
                self.select_index(self.catalog.count() - 1);
                self.after_mutation(format!("{} added to the Pokédex", name));
            }
            InputAction::Report => {
                match self.catalog.export_category_report(input, &self.report_dir)? {
                    Some(path) => self.info(format!("Type report exported to {}", path.display())),
                    None => self.error(format!("No Pokémon of type '{}' to report", input)),
                }
            }
            InputAction::SaveAs => {
                let path = self.catalog.save_path(input)?;
                self.info(format!("Pokédex saved to {}", path.display()));
            }
            InputAction::SaveAsThenQuit => {
                let path = self.catalog.save_path(input)?;
                info!("Saved to {} before quitting", path.display());
                self.quit = true;
            }
        }
        Ok(())
    }

    fn show_found(&mut self, index: usize) {
        self.select_index(index);
        self.current_page = Page::Records;
        self.show_detail = true;
        if let Some(record) = self.selected_record() {
            let text = format!("Found {} (No. {})", record.name(), record.id());
            self.info(text);
        }
    }

    fn delete_selected(&mut self) {
        let Some(index) = self.selected_index() else { return };
        match self.catalog.remove_at(index) {
            Ok(removed) => {
                self.clamp_selection();
                self.after_mutation(format!("{} removed from the Pokédex", removed.name()));
            }
            Err(e) => self.error(e.to_string()),
        }
    }

    fn save(&mut self) {
        match self.catalog.save_back() {
            Ok(path) => self.info(format!("Pokédex saved to {}", path.display())),
            Err(DexError::MissingPath(_)) => self.prompt(InputAction::SaveAs),
            Err(e) => self.error(e.to_string()),
        }
    }

    /// Autosave back to the loaded file when configured and possible
    fn after_mutation(&mut self, message: String) {
        let has_file = self.catalog.json_path().is_some() || self.catalog.text_path().is_some();
        if !self.autosave || !has_file {
            self.info(message);
            return;
        }

        match self.catalog.save_back() {
            Ok(_) => self.info(format!("{} (saved)", message)),
            Err(e) => self.error(format!("{}, but saving failed: {}", message, e)),
        }
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    while !app.should_quit() {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key);
            }
        }
    }
    Ok(())
}

// ============================================================================
// RENDERING
// ============================================================================

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar / prompt
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.current_page {
        Page::Records if app.show_detail => {
            let content_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(chunks[1]);

            render_table(f, content_chunks[0], app);
            render_detail_panel(f, content_chunks[1], app);
        }
        Page::Records => render_table(f, chunks[1], app),
        Page::Averages => render_averages(f, chunks[1], app),
        Page::Chart => render_chart(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let pages = [Page::Records, Page::Averages, Page::Chart];

    let mut tab_spans = vec![];
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(page.title().to_string(), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Total: {}", app.catalog.count()),
        Style::default().fg(Color::White),
    ));
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("🔥 {}", app.catalog.find_by_category(Category::Fire).len()),
        Style::default().fg(Color::Red),
    ));
    tab_spans.push(Span::raw("  "));
    tab_spans.push(Span::styled(
        format!("🌿 {}", app.catalog.find_by_category(Category::Grass).len()),
        Style::default().fg(Color::Green),
    ));
    if app.catalog.is_dirty() {
        tab_spans.push(Span::raw("  |  "));
        tab_spans.push(Span::styled("● unsaved", Style::default().fg(Color::Yellow)));
    }

    let header = Paragraph::new(vec![Line::from(tab_spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn category_color(category: Category) -> Color {
    match category {
        Category::Fire => Color::Red,
        Category::Grass => Color::Green,
    }
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["No.", "Name", "Type", "Species", "Total"].iter().map(|h| {
        Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let visible = app.rows();
    let rows = visible.iter().map(|&i| &app.catalog.entries()[i]).map(|record| {
        let color = category_color(record.category());

        let cells = vec![
            Cell::from(record.id().to_string()),
            Cell::from(truncate(record.name(), 20)),
            Cell::from(record.category().label()).style(Style::default().fg(color)),
            Cell::from(truncate(record.species(), 24)),
            Cell::from(record.stats().total().to_string()),
        ];

        Row::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Length(22),
            Constraint::Length(7),
            Constraint::Length(26),
            Constraint::Length(6),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(match app.filter {
                Some(category) => format!(" Pokédex - {} ", category),
                None => " Pokédex ".to_string(),
            }),
    )
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let text = match app.selected_record() {
        Some(record) => record.describe(),
        None => "\nNo Pokémon selected".to_string(),
    };

    let detail = Paragraph::new(text).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Details "),
    );

    f.render_widget(detail, area);
}

fn render_averages(f: &mut Frame, area: Rect, app: &App) {
    let mut lines = vec![];

    for category in Category::ALL {
        let heading = Style::default()
            .fg(category_color(category))
            .add_modifier(Modifier::BOLD);
        lines.push(Line::from(Span::styled(format!("[Type: {}]", category.label()), heading)));
        lines.push(Line::from(category.info()));
        lines.push(Line::from(""));

        match category.average_stats(app.catalog.entries()) {
            Some(averages) => {
                lines.push(Line::from(format!("Average Stats ({} Pokémon):", averages.count)));
                lines.push(Line::from(averages.summary_line()));
            }
            None => lines.push(Line::from(Span::styled(
                format!("No {} Pokémon in the Pokédex.", category.label()),
                Style::default().fg(Color::DarkGray),
            ))),
        }
        lines.push(Line::from(""));
    }

    let averages = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Type Averages "),
    );

    f.render_widget(averages, area);
}

fn render_chart(f: &mut Frame, area: Rect, app: &App) {
    let block = |title: String| {
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(title)
    };

    match app.chart_kind {
        ChartKind::Bars => {
            let Some(record) = app.selected_record() else {
                return render_empty_chart(f, area, "Select a Pokémon on the Pokédex page");
            };

            let bars: Vec<(&str, u64)> = chart::stat_bars(record)
                .into_iter()
                .map(|(label, value)| (label, u64::from(value)))
                .collect();

            let barchart = BarChart::default()
                .block(block(format!(" {} - Attribute Bar Chart ", record.name())))
                .data(bars.as_slice())
                .bar_width(9)
                .bar_gap(2)
                .bar_style(Style::default().fg(category_color(record.category())))
                .value_style(Style::default().fg(Color::Black).bg(category_color(record.category())));

            f.render_widget(barchart, area);
        }
        ChartKind::Lines => {
            let Some(lines) = chart::category_lines(app.catalog.entries()) else {
                return render_empty_chart(f, area, "No data to plot");
            };

            let points = |series: &[f64]| -> Vec<(f64, f64)> {
                series.iter().enumerate().map(|(i, v)| (i as f64, *v)).collect()
            };
            let fire = points(lines.series(Category::Fire));
            let grass = points(lines.series(Category::Grass));

            let datasets = vec![
                Dataset::default()
                    .name("Fire")
                    .marker(symbols::Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(Color::Red))
                    .data(&fire),
                Dataset::default()
                    .name("Grass")
                    .marker(symbols::Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(Color::Green))
                    .data(&grass),
            ];

            let y_max = (lines.max() * 1.1).max(10.0);
            let line_chart = Chart::new(datasets)
                .block(block(" Type Averages - Fire vs Grass ".to_string()))
                .x_axis(
                    Axis::default()
                        .title("Attributes")
                        .bounds([0.0, (STAT_LABELS.len() - 1) as f64])
                        .labels(STAT_LABELS.iter().map(|l| Span::raw(*l)).collect()),
                )
                .y_axis(
                    Axis::default()
                        .title("Average Value")
                        .bounds([0.0, y_max])
                        .labels(vec![
                            Span::raw("0"),
                            Span::raw(format!("{:.0}", y_max / 2.0)),
                            Span::raw(format!("{:.0}", y_max)),
                        ]),
                );

            f.render_widget(line_chart, area);
        }
        ChartKind::Distribution => {
            let Some(record) = app.selected_record() else {
                return render_empty_chart(f, area, "Select a Pokémon on the Pokédex page");
            };

            let outer = block(format!(" {} - Stat Distribution ", record.name()));
            let inner = outer.inner(area);
            f.render_widget(outer, area);

            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(2); 6])
                .split(inner);

            for ((label, pct), row) in chart::stat_distribution(record).into_iter().zip(rows.iter()) {
                let gauge = Gauge::default()
                    .gauge_style(Style::default().fg(category_color(record.category())))
                    .ratio((pct / 100.0).clamp(0.0, 1.0))
                    .label(format!("{} {:.1}%", label, pct));
                f.render_widget(gauge, *row);
            }
        }
    }
}

fn render_empty_chart(f: &mut Frame, area: Rect, message: &str) {
    let empty = Paragraph::new(format!("\n  {}", message))
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL).title(" Charts "));
    f.render_widget(empty, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let line = match &app.mode {
        Mode::Input { action, buffer } => Line::from(vec![
            Span::styled(action.prompt(), Style::default().fg(Color::Yellow)),
            Span::raw(buffer.clone()),
            Span::styled("█", Style::default().fg(Color::White)),
        ]),
        Mode::Confirm(ConfirmAction::Delete) => Line::from(Span::styled(
            format!(
                " Delete {}? (y/n)",
                app.selected_record().map(|r| r.name()).unwrap_or("this Pokémon")
            ),
            Style::default().fg(Color::Red),
        )),
        Mode::Confirm(ConfirmAction::QuitUnsaved) => Line::from(Span::styled(
            " You have unsaved changes. Save before quitting? (y/n, Esc to stay)",
            Style::default().fg(Color::Yellow),
        )),
        Mode::Normal => match &app.status {
            Some(status) => {
                let color = if status.error { Color::Red } else { Color::Green };
                Line::from(Span::styled(format!(" {}", status.text), Style::default().fg(color)))
            }
            None => key_hints(app),
        },
    };

    let status_bar = Paragraph::new(vec![line]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn key_hints(app: &App) -> Line<'static> {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);
    let mut spans = vec![Span::styled(
        format!(" Row: {}/{} ", selected, app.rows().len()),
        Style::default().fg(Color::Cyan),
    )];

    let mut hints = vec![
        ("/", "Name"),
        ("#", "No."),
        ("t", "Type"),
        ("u", "Stat"),
        ("i", "Info"),
        ("a", "Add"),
        ("d", "Delete"),
        ("r", "Report"),
        ("s", "Save"),
        ("Tab", "Page"),
    ];
    if app.current_page == Page::Chart {
        hints.push(("c", "Chart"));
    }

    for (key, label) in hints {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(key, Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(format!(" {}", label)));
    }
    spans.push(Span::raw(" | "));
    spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    spans.push(Span::raw(" Quit"));

    Line::from(spans)
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pokedex::{Kind, StatBlock};
    use tempfile::tempdir;

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_line(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
        press(app, KeyCode::Enter);
    }

    fn app_with(config: &DexConfig) -> App {
        let mut catalog = Catalog::new();
        catalog.add(
            Record::new(Kind::Charmander)
                .with_id("0004")
                .with_name("Charmander")
                .with_stats(StatBlock::new(39, 52, 43, 60, 50, 65).unwrap()),
        );
        catalog.add(
            Record::new(Kind::Bulbasaur)
                .with_id("0001")
                .with_name("Bulbasaur")
                .with_stats(StatBlock::new(45, 49, 49, 65, 65, 45).unwrap()),
        );
        App::new(catalog, config)
    }

    fn app() -> App {
        app_with(&DexConfig {
            autosave: false,
            ..DexConfig::default()
        })
    }

    #[test]
    fn test_navigation_wraps() {
        let mut app = app();
        assert_eq!(app.state.selected(), Some(0));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.state.selected(), Some(0), "Down wraps to the top");
        press(&mut app, KeyCode::Up);
        assert_eq!(app.state.selected(), Some(1));
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.current_page, Page::Averages);
    }

    #[test]
    fn test_search_by_name_selects_record() {
        let mut app = app();
        press(&mut app, KeyCode::Char('/'));
        type_line(&mut app, "bulbasaur");

        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.selected_record().unwrap().id(), "0001");
        assert!(app.show_detail);
    }

    #[test]
    fn test_search_miss_reports_error() {
        let mut app = app();
        press(&mut app, KeyCode::Char('#'));
        type_line(&mut app, "No. 0150");

        let status = app.status.clone().unwrap();
        assert!(status.error);
        assert!(status.text.contains("0150"), "Got: {}", status.text);
    }

    #[test]
    fn test_update_stat_on_selection() {
        let mut app = app();
        press(&mut app, KeyCode::Char('u'));
        type_line(&mut app, "hp 100");

        assert_eq!(app.catalog.find_by_id("0004").unwrap().stats().get("hp").unwrap(), 100);
        assert!(app.catalog.is_dirty());
    }

    #[test]
    fn test_update_basic_info_validates() {
        let mut app = app();
        press(&mut app, KeyCode::Char('i'));
        type_line(&mut app, "height_m 1.7");
        assert!(app.status.clone().unwrap().error, "Missing unit is rejected");

        press(&mut app, KeyCode::Char('i'));
        type_line(&mut app, "height_m 1.70 m");
        assert_eq!(app.catalog.find_by_id("0004").unwrap().height_m(), 1.7);
    }

    #[test]
    fn test_add_and_delete() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        type_line(&mut app, "Fire|No. 0077|Ponyta|Fire Horse|1.00 m|30.00 kg|Run Away;Flash Fire|50|85|55|65|65|90");

        assert_eq!(app.catalog.count(), 3);
        assert_eq!(app.selected_record().unwrap().name(), "Ponyta");

        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.mode, Mode::Confirm(ConfirmAction::Delete));
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.catalog.count(), 2);
        assert_eq!(app.state.selected(), Some(1), "Selection stays in range");
    }

    #[test]
    fn test_quit_prompts_when_dirty() {
        let mut app = app();
        press(&mut app, KeyCode::Char('q'));
        assert_eq!(app.mode, Mode::Confirm(ConfirmAction::QuitUnsaved));
        assert!(!app.should_quit());

        press(&mut app, KeyCode::Esc);
        assert!(!app.should_quit());

        press(&mut app, KeyCode::Char('q'));
        press(&mut app, KeyCode::Char('n'));
        assert!(app.should_quit());
    }

    #[test]
    fn test_save_without_file_asks_for_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dex.json");

        let mut app = app();
        press(&mut app, KeyCode::Char('s'));
        assert!(matches!(app.mode, Mode::Input { action: InputAction::SaveAs, .. }));

        type_line(&mut app, path.to_str().unwrap());
        assert!(path.exists());
        assert!(!app.catalog.is_dirty());
    }

    #[test]
    fn test_autosave_after_mutation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dex.txt");

        let mut app = app_with(&DexConfig::default());
        app.catalog.save_path(&path).unwrap();

        press(&mut app, KeyCode::Char('u'));
        type_line(&mut app, "speed 70");

        assert!(!app.catalog.is_dirty(), "Autosave writes back immediately");
        let mut reloaded = Catalog::new();
        reloaded.load_text(&path).unwrap();
        assert_eq!(reloaded.find_by_id("0004").unwrap().stats().get("speed").unwrap(), 70);
    }

    #[test]
    fn test_report_export() {
        let dir = tempdir().unwrap();
        let mut app = app_with(&DexConfig {
            report_dir: dir.path().to_path_buf(),
            autosave: false,
            ..DexConfig::default()
        });

        press(&mut app, KeyCode::Char('r'));
        type_line(&mut app, "grass");
        assert!(dir.path().join("grass.txt").exists());

        press(&mut app, KeyCode::Char('r'));
        type_line(&mut app, "water");
        assert!(app.status.clone().unwrap().error);
    }

    #[test]
    fn test_duplicate_ids_act_on_selected_row() {
        let mut catalog = Catalog::new();
        for name in ["Ponyta", "Magmar"] {
            catalog.add(
                Record::new(Kind::GenericFire)
                    .with_id("0001")
                    .with_name(name)
                    .with_stats(StatBlock::new(50, 85, 55, 65, 65, 90).unwrap()),
            );
        }
        let mut app = App::new(
            catalog,
            &DexConfig {
                autosave: false,
                ..DexConfig::default()
            },
        );

        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected_record().unwrap().name(), "Magmar");

        press(&mut app, KeyCode::Char('u'));
        type_line(&mut app, "hp 99");
        let hp: Vec<u32> = app.catalog.entries().iter().map(|r| r.stats().get("hp").unwrap()).collect();
        assert_eq!(hp, vec![50, 99], "Only the highlighted row is updated");

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        let names: Vec<&str> = app.catalog.entries().iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["Ponyta"], "Only the highlighted row is removed");
    }

    #[test]
    fn test_type_filter_limits_rows() {
        let mut app = app();
        press(&mut app, KeyCode::Char('t'));
        assert!(matches!(app.mode, Mode::Input { action: InputAction::FilterType, .. }));
        type_line(&mut app, "Grass");

        assert_eq!(app.filter, Some(Category::Grass));
        assert_eq!(app.rows(), vec![1]);
        assert_eq!(app.selected_record().unwrap().name(), "Bulbasaur");

        press(&mut app, KeyCode::Down);
        assert_eq!(app.state.selected(), Some(0), "Navigation stays inside the filtered rows");

        press(&mut app, KeyCode::Char('u'));
        type_line(&mut app, "attack 60");
        assert_eq!(app.catalog.find_by_id("0001").unwrap().stats().get("attack").unwrap(), 60);

        press(&mut app, KeyCode::Char('t'));
        type_line(&mut app, "water");
        assert!(app.status.clone().unwrap().error, "Unknown type is rejected");
        assert_eq!(app.filter, Some(Category::Grass), "Filter is kept on a bad type");

        // Searching for a hidden record drops the filter
        press(&mut app, KeyCode::Char('/'));
        type_line(&mut app, "charmander");
        assert_eq!(app.filter, None);
        assert_eq!(app.selected_record().unwrap().name(), "Charmander");

        press(&mut app, KeyCode::Char('t'));
        type_line(&mut app, "fire");
        press(&mut app, KeyCode::Char('t'));
        type_line(&mut app, "");
        assert_eq!(app.filter, None);
        assert_eq!(app.rows().len(), 2);
    }

    #[test]
    fn test_quit_save_as_then_quits() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dex.txt");

        let mut app = app();
        press(&mut app, KeyCode::Char('u'));
        type_line(&mut app, "hp 40");
        press(&mut app, KeyCode::Char('q'));
        press(&mut app, KeyCode::Char('y'));
        assert!(matches!(app.mode, Mode::Input { action: InputAction::SaveAsThenQuit, .. }));
        assert!(!app.should_quit());

        type_line(&mut app, path.to_str().unwrap());
        assert!(path.exists());
        assert!(app.should_quit(), "Quit goes ahead once the save succeeds");
    }

    #[test]
    fn test_quit_save_as_failure_keeps_running() {
        let dir = tempdir().unwrap();
        let mut app = app();
        press(&mut app, KeyCode::Char('u'));
        type_line(&mut app, "hp 40");
        press(&mut app, KeyCode::Char('q'));
        press(&mut app, KeyCode::Char('y'));

        type_line(&mut app, dir.path().join("dex.csv").to_str().unwrap());
        assert!(app.status.clone().unwrap().error);
        assert!(!app.should_quit());
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("Pokémon", 10), "Pokémon");
        assert_eq!(truncate("Pokémon Center", 8), "Poké...");
    }
}
