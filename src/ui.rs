use anyhow::Result;
use badge_report::{RecordFields, Session, AppConfig, GRADE_CHOICES, LEVEL_CHOICES};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Group,
    Leader,
    Name,
    Romanized,
    Id,
    Level,
    Badge,
    Date,
    Grade,
    Note,
}

impl Field {
    pub const ALL: [Field; 10] = [
        Field::Group,
        Field::Leader,
        Field::Name,
        Field::Romanized,
        Field::Id,
        Field::Level,
        Field::Badge,
        Field::Date,
        Field::Grade,
        Field::Note,
    ];

    fn index(self) -> usize {
        Field::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn label(&self) -> &str {
        match self {
            Field::Group => "团名",
            Field::Leader => "队长姓名",
            Field::Name => "中文姓名",
            Field::Romanized => "英文名",
            Field::Id => "ID",
            Field::Level => "现级别(현급위)",
            Field::Badge => "技能章(기능장명)",
            Field::Date => "承认日(인가일)",
            Field::Grade => "年级(구분)",
            Field::Note => "备注",
        }
    }

    fn choices(&self) -> &'static [&'static str] {
        match self {
            Field::Level => &LEVEL_CHOICES,
            Field::Grade => &GRADE_CHOICES,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Export,
    Import,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Form,
    Editing(u32),
    ConfirmDelete(u32),
    ConfirmOverwrite(PathBuf),
    Prompt(PromptKind, String),
}

pub struct App {
    pub session: Session,
    pub config: AppConfig,
    pub values: [String; 10],
    pub focus: Field,
    pub mode: Mode,
    pub table_state: TableState,
    pub suggestion: usize,
    pub status: String,
}

impl App {
    pub fn new(session: Session, config: AppConfig) -> Self {
        let mut values: [String; 10] = Default::default();
        values[Field::Group.index()] = session.group_name.clone();
        values[Field::Leader.index()] = session.leader_name.clone();

        let status = match session.notices.first() {
            Some(notice) => format!("⚠ {}", notice),
            None => format!(
                "Loaded {} names, {} badges",
                session.names.len(),
                session.badges.len()
            ),
        };

        Self {
            session,
            config,
            values,
            focus: Field::Name,
            mode: Mode::Form,
            table_state: TableState::default(),
            suggestion: 0,
            status,
        }
    }

    pub fn value(&self, field: Field) -> &str {
        &self.values[field.index()]
    }

    fn set(&mut self, field: Field, value: impl Into<String>) {
        self.values[field.index()] = value.into();
        self.sync_header();
    }

    fn sync_header(&mut self) {
        self.session.group_name = self.values[Field::Group.index()].clone();
        self.session.leader_name = self.values[Field::Leader.index()].clone();
    }

    pub fn focus_next(&mut self) {
        let i = (self.focus.index() + 1) % Field::ALL.len();
        self.focus = Field::ALL[i];
        self.suggestion = 0;
    }

    pub fn focus_previous(&mut self) {
        let len = Field::ALL.len();
        let i = (self.focus.index() + len - 1) % len;
        self.focus = Field::ALL[i];
        self.suggestion = 0;
    }

    pub fn type_char(&mut self, c: char) {
        let mut value = self.value(self.focus).to_string();
        value.push(c);
        self.set(self.focus, value);
        self.suggestion = 0;
    }

    pub fn backspace(&mut self) {
        let mut value = self.value(self.focus).to_string();
        value.pop();
        self.set(self.focus, value);
        self.suggestion = 0;
    }

    /// Step through level/grade choices
    pub fn cycle_choice(&mut self, forward: bool) {
        let choices = self.focus.choices();
        if choices.is_empty() {
            return;
        }
        let current = choices.iter().position(|c| *c == self.value(self.focus));
        let next = match (current, forward) {
            (Some(i), true) => (i + 1) % choices.len(),
            (Some(i), false) => (i + choices.len() - 1) % choices.len(),
            (None, true) => 0,
            (None, false) => choices.len() - 1,
        };
        self.set(self.focus, choices[next]);
    }

    pub fn badge_suggestions(&self) -> Vec<&str> {
        self.session.badges.filter(self.value(Field::Badge))
    }

    pub fn move_suggestion(&mut self, down: bool) {
        let len = self.badge_suggestions().len();
        if len == 0 {
            return;
        }
        self.suggestion = if down {
            (self.suggestion + 1) % len
        } else {
            (self.suggestion + len - 1) % len
        };
    }

    pub fn accept_suggestion(&mut self) {
        let picked = self
            .badge_suggestions()
            .get(self.suggestion)
            .map(|s| s.to_string());
        if let Some(badge) = picked {
            self.set(Field::Badge, badge);
            self.suggestion = 0;
        }
    }

    /// Romanized name and ID from the lookup, or a derived romanization
    pub fn fill_from_lookup(&mut self) {
        let name = self.value(Field::Name).trim().to_string();
        if name.is_empty() {
            self.status = "Enter a name first".to_string();
            return;
        }
        let (romanized, identifier) = self.session.candidate_for(&name);
        self.set(Field::Romanized, romanized);
        if !identifier.is_empty() || self.value(Field::Id).is_empty() {
            self.set(Field::Id, identifier);
        }
    }

    fn form_fields(&self) -> RecordFields {
        RecordFields {
            name: self.value(Field::Name).trim().to_string(),
            romanized_name: self.value(Field::Romanized).trim().to_string(),
            identifier: self.value(Field::Id).trim().to_string(),
            level: self.value(Field::Level).trim().to_string(),
            badge_name: self.value(Field::Badge).trim().to_string(),
            approval_date: self.value(Field::Date).trim().to_string(),
            grade: self.value(Field::Grade).trim().to_string(),
            note: self.value(Field::Note).trim().to_string(),
        }
    }

    fn load_form(&mut self, fields: &RecordFields) {
        self.set(Field::Name, fields.name.clone());
        self.set(Field::Romanized, fields.romanized_name.clone());
        self.set(Field::Id, fields.identifier.clone());
        self.set(Field::Level, fields.level.clone());
        self.set(Field::Badge, fields.badge_name.clone());
        self.set(Field::Date, fields.approval_date.clone());
        self.set(Field::Grade, fields.grade.clone());
        self.set(Field::Note, fields.note.clone());
    }

    /// Person fields are cleared; level, badge, date and grade carry over to the next row
    fn clear_person(&mut self) {
        for field in [Field::Name, Field::Romanized, Field::Id, Field::Note] {
            self.set(field, String::new());
        }
        self.focus = Field::Name;
    }

    /// Add the form as a new row, or save it over the row being edited
    pub fn submit(&mut self) {
        let fields = self.form_fields();
        match self.mode {
            Mode::Editing(sequence) => {
                if self.session.edit_record(sequence, fields) {
                    self.status = format!("Row {} updated", sequence);
                }
                self.mode = Mode::Form;
                self.clear_person();
            }
            _ => {
                let sequence = self.session.add_record(fields).sequence;
                self.table_state.select(Some(sequence as usize - 1));
                self.status = format!("Row {} added", sequence);
                self.clear_person();
            }
        }
    }

    fn selected_sequence(&self) -> Option<u32> {
        self.table_state
            .selected()
            .filter(|i| *i < self.session.records.len())
            .map(|i| i as u32 + 1)
    }

    pub fn begin_edit(&mut self) {
        let Some(sequence) = self.selected_sequence() else {
            self.status = "Select a row first".to_string();
            return;
        };
        if let Some(record) = self.session.records.get(sequence) {
            let fields = record.fields.clone();
            self.load_form(&fields);
            self.mode = Mode::Editing(sequence);
            self.focus = Field::Name;
            self.status = format!("Editing row {} (Enter saves, Esc cancels)", sequence);
        }
    }

    /// Deleting, exporting or importing mid-edit would drop the loaded row
    fn editing_blocks(&mut self) -> bool {
        if matches!(self.mode, Mode::Editing(_)) {
            self.status = "Finish or Esc the edit first".to_string();
            true
        } else {
            false
        }
    }

    pub fn request_delete(&mut self) {
        if self.editing_blocks() {
            return;
        }
        match self.selected_sequence() {
            Some(sequence) => {
                self.mode = Mode::ConfirmDelete(sequence);
                self.status = format!("Delete row {}? (y/n)", sequence);
            }
            None => self.status = "Select a row first".to_string(),
        }
    }

    pub fn confirm_delete(&mut self, confirmed: bool) {
        if let Mode::ConfirmDelete(sequence) = self.mode {
            if confirmed && self.session.delete_record(sequence).is_some() {
                let len = self.session.records.len();
                self.table_state
                    .select(if len == 0 { None } else { Some((sequence as usize - 1).min(len - 1)) });
                self.status = format!("Row {} deleted", sequence);
            } else {
                self.status = "Delete cancelled".to_string();
            }
        }
        self.mode = Mode::Form;
    }

    pub fn begin_prompt(&mut self, kind: PromptKind) {
        if self.editing_blocks() {
            return;
        }
        if kind == PromptKind::Export && self.session.records.is_empty() {
            self.status = "⚠ No records: add at least one row before exporting".to_string();
            return;
        }
        self.mode = Mode::Prompt(kind, String::new());
    }

    pub fn finish_prompt(&mut self) {
        let Mode::Prompt(kind, input) = std::mem::replace(&mut self.mode, Mode::Form) else {
            return;
        };
        let input = input.trim();
        if input.is_empty() {
            self.status = "Cancelled".to_string();
            return;
        }

        match kind {
            PromptKind::Export => {
                let path = self.config.output_path(input);
                if path.exists() {
                    self.status = format!("{} exists. Overwrite? (y/n)", path.display());
                    self.mode = Mode::ConfirmOverwrite(path);
                } else {
                    self.export_to(&path);
                }
            }
            PromptKind::Import => {
                let path = PathBuf::from(input);
                match self.session.import_names(&path) {
                    Ok(count) => self.status = format!("Imported {} names", count),
                    Err(e) => {
                        warn!(error = %e, "import failed");
                        self.status = format!("✗ {}", e);
                    }
                }
            }
        }
    }

    pub fn confirm_overwrite(&mut self, confirmed: bool) {
        if let Mode::ConfirmOverwrite(path) = std::mem::replace(&mut self.mode, Mode::Form) {
            if confirmed {
                self.export_to(&path);
            } else {
                self.status = "Export cancelled".to_string();
            }
        }
    }

    fn export_to(&mut self, path: &Path) {
        match self.session.export(path) {
            Ok(()) => {
                info!(path = %path.display(), "report exported");
                self.status = format!("Saved to {}", path.display());
            }
            Err(e) => {
                warn!(error = %e, "export failed");
                self.status = format!("✗ {}", e);
            }
        }
    }

    pub fn next_row(&mut self) {
        let len = self.session.records.len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            Some(_) => 0,
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous_row(&mut self) {
        let len = self.session.records.len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }

    /// Returns false when the app should quit
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match self.mode.clone() {
            Mode::ConfirmDelete(_) => {
                self.confirm_delete(matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')));
                return true;
            }
            Mode::ConfirmOverwrite(_) => {
                self.confirm_overwrite(matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')));
                return true;
            }
            Mode::Prompt(kind, mut input) => {
                match key.code {
                    KeyCode::Enter => self.finish_prompt(),
                    KeyCode::Esc => {
                        self.mode = Mode::Form;
                        self.status = "Cancelled".to_string();
                    }
                    KeyCode::Backspace => {
                        input.pop();
                        self.mode = Mode::Prompt(kind, input);
                    }
                    KeyCode::Char(c) => {
                        input.push(c);
                        self.mode = Mode::Prompt(kind, input);
                    }
                    _ => {}
                }
                return true;
            }
            Mode::Form | Mode::Editing(_) => {}
        }

        match key.code {
            KeyCode::Esc => {
                if matches!(self.mode, Mode::Editing(_)) {
                    self.mode = Mode::Form;
                    self.clear_person();
                    self.status = "Edit cancelled".to_string();
                } else {
                    return false;
                }
            }
            KeyCode::Char('e') if ctrl => self.begin_edit(),
            KeyCode::Char('d') if ctrl => self.request_delete(),
            KeyCode::Char('s') if ctrl => self.begin_prompt(PromptKind::Export),
            KeyCode::Char('o') if ctrl => self.begin_prompt(PromptKind::Import),
            KeyCode::Up if ctrl => self.previous_row(),
            KeyCode::Down if ctrl => self.next_row(),
            KeyCode::PageUp => self.previous_row(),
            KeyCode::PageDown => self.next_row(),
            KeyCode::F(2) => self.fill_from_lookup(),
            KeyCode::Tab => self.focus_next(),
            KeyCode::BackTab => self.focus_previous(),
            KeyCode::Enter => self.submit(),
            KeyCode::Up if self.focus == Field::Badge => self.move_suggestion(false),
            KeyCode::Down if self.focus == Field::Badge => self.move_suggestion(true),
            KeyCode::Right if self.focus == Field::Badge => self.accept_suggestion(),
            KeyCode::Up => self.focus_previous(),
            KeyCode::Down => self.focus_next(),
            KeyCode::Left => self.cycle_choice(false),
            KeyCode::Right => self.cycle_choice(true),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Char(c) if !ctrl => self.type_char(c),
            _ => {}
        }
        true
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press && !app.handle_key(key) {
                return Ok(());
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Header
            Constraint::Length(12), // Form + badge picker
            Constraint::Min(0),     // Preview table
            Constraint::Length(3),  // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    let form_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(chunks[1]);

    render_form(f, form_chunks[0], app);
    render_badge_picker(f, form_chunks[1], app);
    render_table(f, chunks[2], app);
    render_status_bar(f, chunks[3], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mode = match &app.mode {
        Mode::Form => "New row".to_string(),
        Mode::Editing(seq) => format!("Editing row {}", seq),
        Mode::ConfirmDelete(seq) => format!("Delete row {}?", seq),
        Mode::ConfirmOverwrite(_) => "Overwrite?".to_string(),
        Mode::Prompt(PromptKind::Export, _) => "Export".to_string(),
        Mode::Prompt(PromptKind::Import, _) => "Import".to_string(),
    };

    let spans = vec![
        Span::styled(
            "기능장 인가 보고서",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Rows: {}", app.session.records.len()),
            Style::default().fg(Color::White),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Names: {}", app.session.names.len()),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  "),
        Span::styled(
            format!("Badges: {}", app.session.badges.len()),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  |  "),
        Span::styled(mode, Style::default().fg(Color::Cyan)),
    ];

    let header = Paragraph::new(vec![Line::from(spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn render_form(f: &mut Frame, area: Rect, app: &App) {
    let lines: Vec<Line> = Field::ALL
        .iter()
        .map(|field| {
            let focused = *field == app.focus;
            let label_style = if focused {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Cyan)
            };
            let mut value = app.value(*field).to_string();
            if focused {
                value.push('▏');
            }
            let hint = if field.choices().is_empty() { "" } else { "  ←/→" };
            Line::from(vec![
                Span::styled(format!("  {:<18}", field.label()), label_style),
                Span::raw(value),
                Span::styled(hint, Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();

    let title = match app.mode {
        Mode::Editing(seq) => format!(" Edit row {} ", seq),
        _ => " Entry ".to_string(),
    };

    let form = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(title),
    );

    f.render_widget(form, area);
}

fn render_badge_picker(f: &mut Frame, area: Rect, app: &App) {
    let suggestions = app.badge_suggestions();
    let items: Vec<ListItem> = suggestions
        .iter()
        .map(|badge| {
            ListItem::new(format!("{} → {}", badge, app.session.badges.translate(badge)))
        })
        .collect();

    let mut state = ListState::default();
    if app.focus == Field::Badge && !suggestions.is_empty() {
        state.select(Some(app.suggestion.min(suggestions.len() - 1)));
    }

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(" Badges (↑/↓, → pick) "),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("→ ");

    f.render_stateful_widget(list, area, &mut state);
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["序号", "姓名", "英文名", "ID", "现级别", "技能章名", "承认日", "年级", "备注"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.session.records.iter().map(|record| {
        let cells = record.cells().into_iter().map(|c| Cell::from(truncate(&c, 18)));
        Row::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(5),
            Constraint::Length(10),
            Constraint::Length(18),
            Constraint::Length(10),
            Constraint::Length(14),
            Constraint::Length(16),
            Constraint::Length(12),
            Constraint::Length(6),
            Constraint::Min(6),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Preview "),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = Vec::new();

    if let Mode::Prompt(kind, input) = &app.mode {
        let label = match kind {
            PromptKind::Export => " Save report as: ",
            PromptKind::Import => " Import names from: ",
        };
        spans.push(Span::styled(label, Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(format!("{}▏", input)));
        spans.push(Span::styled("  (Enter ok, Esc cancel)", Style::default().fg(Color::DarkGray)));
    } else {
        spans.push(Span::styled(format!(" {} ", app.status), Style::default().fg(Color::Cyan)));
        for (key, action) in [
            ("Enter", " Add/Save"),
            ("F2", " Lookup"),
            ("^E", " Edit"),
            ("^D", " Delete"),
            ("^S", " Export"),
            ("^O", " Import"),
            ("PgUp/PgDn", " Rows"),
        ] {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(key, Style::default().fg(Color::Yellow)));
            spans.push(Span::raw(action));
        }
        spans.push(Span::raw(" | "));
        spans.push(Span::styled("Esc", Style::default().fg(Color::Red)));
        spans.push(Span::raw(" Quit"));
    }

    let status_bar = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{}…", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn app_in(dir: &TempDir) -> App {
        let name_map_path = dir.path().join("names.csv");
        let badge_path = dir.path().join("badges.csv");
        fs::write(&name_map_path, "中文名,英文名,ID\n王小明,WANG XM,1001\n").unwrap();
        fs::write(&badge_path, "中文技能章,韩文技能章\n急救,응급처치\n露营,캠핑\n").unwrap();
        let config = AppConfig {
            name_map_path,
            badge_path,
            output_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        App::new(Session::open(&config), config)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_lookup_then_add() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);

        type_str(&mut app, "王小明");
        app.handle_key(key(KeyCode::F(2)));
        assert_eq!(app.value(Field::Romanized), "WANG XM");
        assert_eq!(app.value(Field::Id), "1001");

        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.session.records.len(), 1);
        assert_eq!(app.session.records.get(1).unwrap().fields.identifier, "1001");
        assert_eq!(app.value(Field::Name), "");
    }

    #[test]
    fn test_group_field_syncs_to_session() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        app.focus = Field::Group;
        type_str(&mut app, "7");
        assert_eq!(app.session.group_name, "7");
    }

    #[test]
    fn test_level_cycles_through_choices() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        app.focus = Field::Level;

        app.handle_key(key(KeyCode::Right));
        assert_eq!(app.value(Field::Level), LEVEL_CHOICES[0]);
        app.handle_key(key(KeyCode::Left));
        assert_eq!(app.value(Field::Level), LEVEL_CHOICES[4]);
    }

    #[test]
    fn test_badge_picker() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        app.focus = Field::Badge;

        type_str(&mut app, "露");
        assert_eq!(app.badge_suggestions(), vec!["露营"]);
        app.handle_key(key(KeyCode::Right));
        assert_eq!(app.value(Field::Badge), "露营");
    }

    #[test]
    fn test_edit_and_delete_selected_row() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        for name in ["甲", "乙", "丙"] {
            type_str(&mut app, name);
            app.handle_key(key(KeyCode::Enter));
        }

        app.table_state.select(Some(1));
        app.handle_key(ctrl('e'));
        assert_eq!(app.mode, Mode::Editing(2));
        assert_eq!(app.value(Field::Name), "乙");
        app.handle_key(key(KeyCode::Backspace));
        type_str(&mut app, "丁");
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.session.records.get(2).unwrap().fields.name, "丁");

        app.table_state.select(Some(0));
        app.handle_key(ctrl('d'));
        app.handle_key(key(KeyCode::Char('n')));
        assert_eq!(app.session.records.len(), 3);

        app.handle_key(ctrl('d'));
        app.handle_key(key(KeyCode::Char('y')));
        let names: Vec<_> = app.session.records.iter().map(|r| r.fields.name.clone()).collect();
        assert_eq!(names, vec!["丁", "丙"]);
        assert_eq!(app.session.records.get(2).unwrap().sequence, 2);
    }

    #[test]
    fn test_export_blocked_without_rows() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        app.handle_key(ctrl('s'));
        assert_eq!(app.mode, Mode::Form);
    }

    #[test]
    fn test_export_prompt_writes_file() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        type_str(&mut app, "王小明");
        app.handle_key(key(KeyCode::Enter));

        app.handle_key(ctrl('s'));
        type_str(&mut app, "out");
        app.handle_key(key(KeyCode::Enter));

        assert!(dir.path().join("out.docx").exists());
        assert_eq!(app.mode, Mode::Form);
    }

    #[test]
    fn test_delete_and_export_refused_while_editing() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        for name in ["甲", "乙"] {
            type_str(&mut app, name);
            app.handle_key(key(KeyCode::Enter));
        }

        app.table_state.select(Some(1));
        app.handle_key(ctrl('e'));
        app.table_state.select(Some(0));
        app.handle_key(ctrl('d'));
        assert_eq!(app.mode, Mode::Editing(2));
        assert_eq!(app.status, "Finish or Esc the edit first");
        app.handle_key(ctrl('s'));
        app.handle_key(ctrl('o'));
        assert_eq!(app.mode, Mode::Editing(2));

        app.handle_key(key(KeyCode::Backspace));
        type_str(&mut app, "丙");
        app.handle_key(key(KeyCode::Enter));

        let names: Vec<_> = app.session.records.iter().map(|r| r.fields.name.clone()).collect();
        assert_eq!(names, vec!["甲", "丙"]);
        assert_eq!(app.mode, Mode::Form);
    }

    #[test]
    fn test_export_asks_before_overwriting() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        let existing = dir.path().join("out.docx");
        fs::write(&existing, "keep me").unwrap();
        type_str(&mut app, "王小明");
        app.handle_key(key(KeyCode::Enter));

        app.handle_key(ctrl('s'));
        type_str(&mut app, "out");
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.mode, Mode::ConfirmOverwrite(existing.clone()));
        app.handle_key(key(KeyCode::Char('n')));
        assert_eq!(app.mode, Mode::Form);
        assert_eq!(fs::read_to_string(&existing).unwrap(), "keep me");

        app.handle_key(ctrl('s'));
        type_str(&mut app, "out");
        app.handle_key(key(KeyCode::Enter));
        app.handle_key(key(KeyCode::Char('y')));
        assert_eq!(app.mode, Mode::Form);
        assert!(fs::read(&existing).unwrap().starts_with(b"PK"));
    }

    #[test]
    fn test_escape_quits_only_from_form() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        type_str(&mut app, "甲");
        app.handle_key(key(KeyCode::Enter));
        app.table_state.select(Some(0));
        app.handle_key(ctrl('e'));

        assert!(app.handle_key(key(KeyCode::Esc)));
        assert_eq!(app.mode, Mode::Form);
        assert!(!app.handle_key(key(KeyCode::Esc)));
    }
}
