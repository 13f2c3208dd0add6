//! Full-screen dashboard UI.
//!
//! Six pages mirror the CLI surface: Dashboard, Bugs, Teams, Bounties,
//! Reports, Export. Switching pages rebuilds the target view, so filters,
//! tabs, and open dialogs never leak across navigation.

mod bounties;
mod bugs;
mod dashboard;
mod dialog;
mod export;
mod reports;
mod teams;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::time::{Duration, Instant};

use ladybug_core::config::ProjectConfig;
use ladybug_core::state::AppState;

use bounties::{BountiesAction, BountiesView};
use bugs::{BugsAction, BugsView};
use dashboard::DashboardView;
use export::{ExportAction, ExportView};
use reports::ReportsView;
use teams::{TeamsAction, TeamsView};

const TICK: Duration = Duration::from_millis(100);
const STATUS_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Dashboard,
    Bugs,
    Teams,
    Bounties,
    Reports,
    Export,
}

impl Page {
    const ALL: [Self; 6] = [
        Self::Dashboard,
        Self::Bugs,
        Self::Teams,
        Self::Bounties,
        Self::Reports,
        Self::Export,
    ];

    const fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Bugs => "Bugs",
            Self::Teams => "Teams",
            Self::Bounties => "Bounties",
            Self::Reports => "Reports",
            Self::Export => "Export",
        }
    }
}

struct App {
    state: AppState,
    config: ProjectConfig,
    page: Page,
    dashboard: DashboardView,
    bugs: BugsView,
    teams: TeamsView,
    bounties: BountiesView,
    reports: ReportsView,
    export: ExportView,
    status: Option<(String, Instant)>,
    quit: bool,
}

impl App {
    fn new(state: AppState, config: ProjectConfig) -> Self {
        let dashboard = DashboardView::new(&config);
        let bugs = BugsView::new(&config);
        let teams = TeamsView::new();
        let bounties = BountiesView::new();
        let reports = ReportsView::new(&config);
        let export = ExportView::new(&config);
        Self {
            state,
            config,
            page: Page::Dashboard,
            dashboard,
            bugs,
            teams,
            bounties,
            reports,
            export,
            status: None,
            quit: false,
        }
    }

    fn input_captured(&self) -> bool {
        match self.page {
            Page::Bugs => self.bugs.input_active(),
            Page::Teams => self.teams.dialog_open(),
            Page::Bounties => self.bounties.dialog_open(),
            Page::Dashboard | Page::Reports | Page::Export => false,
        }
    }

    /// Switch pages, rebuilding the target view so transient state resets.
    fn goto(&mut self, page: Page) {
        if self.page == page {
            return;
        }
        match page {
            Page::Dashboard => self.dashboard = DashboardView::new(&self.config),
            Page::Bugs => self.bugs = BugsView::new(&self.config),
            Page::Teams => self.teams = TeamsView::new(),
            Page::Bounties => self.bounties = BountiesView::new(),
            Page::Reports => self.reports = ReportsView::new(&self.config),
            Page::Export => self.export = ExportView::new(&self.config),
        }
        self.page = page;
    }

    fn set_status(&mut self, message: String) {
        self.status = Some((message, Instant::now()));
    }

    fn handle_key(&mut self, key: KeyEvent) {
        // Global navigation only applies while no dialog or prompt
        // captures input.
        if !self.input_captured() {
            match key.code {
                KeyCode::Char('q') => {
                    self.quit = true;
                    return;
                }
                KeyCode::Char(c @ '1'..='6') => {
                    let index = (c as usize) - ('1' as usize);
                    if let Some(&page) = Page::ALL.get(index) {
                        self.goto(page);
                    }
                    return;
                }
                _ => {}
            }
        }

        match self.page {
            Page::Dashboard | Page::Reports => {}
            Page::Bugs => {
                if let Some(BugsAction::Notice(msg)) = self.bugs.handle_key(key, &mut self.state) {
                    self.set_status(msg);
                }
            }
            Page::Teams => {
                if let Some(TeamsAction::Notice(msg)) = self.teams.handle_key(key, &mut self.state)
                {
                    self.set_status(msg);
                }
            }
            Page::Bounties => {
                if let Some(BountiesAction::Notice(msg)) =
                    self.bounties.handle_key(key, &mut self.state)
                {
                    self.set_status(msg);
                }
            }
            Page::Export => {
                if let Some(ExportAction::Notice(msg)) = self.export.handle_key(key, &self.state) {
                    self.set_status(msg);
                }
            }
        }
    }

    fn tick(&mut self) {
        if let Some(ExportAction::Notice(msg)) = self.export.tick() {
            self.set_status(msg);
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(frame.area());

        self.render_tabs(frame, chunks[0]);

        match self.page {
            Page::Dashboard => self.dashboard.render(frame, chunks[1], &self.state),
            Page::Bugs => self.bugs.render(frame, chunks[1], &self.state),
            Page::Teams => self.teams.render(frame, chunks[1], &self.state),
            Page::Bounties => self.bounties.render(frame, chunks[1], &self.state),
            Page::Reports => self.reports.render(frame, chunks[1], &self.state),
            Page::Export => self.export.render(frame, chunks[1], &self.state),
        }

        self.render_status(frame, chunks[2]);
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let mut spans = Vec::new();
        for (i, page) in Page::ALL.iter().enumerate() {
            let style = if *page == self.page {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            spans.push(Span::styled(format!(" {} {} ", i + 1, page.label()), style));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let content = match &self.status {
            Some((msg, at)) if at.elapsed() < STATUS_TTL => Line::from(vec![
                Span::styled("✓ ", Style::default().fg(Color::Green)),
                Span::raw(msg.clone()),
            ]),
            _ => Line::from(Span::styled(
                " 1-6 pages  q quit",
                Style::default().fg(Color::DarkGray),
            )),
        };
        frame.render_widget(
            Paragraph::new(content).block(Block::default().borders(Borders::NONE)),
            area,
        );
    }
}

/// Run the full-screen UI until the user quits.
pub fn run(state: AppState, config: &ProjectConfig) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, App::new(state, config.clone()));

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop(
    terminal: &mut Terminal<ratatui::backend::CrosstermBackend<std::io::Stdout>>,
    mut app: App,
) -> Result<()> {
    while !app.quit {
        terminal.draw(|frame| app.render(frame))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
        app.tick();
    }
    Ok(())
}
