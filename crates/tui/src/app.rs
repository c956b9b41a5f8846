use std::{
    cmp, io, thread,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use hauler_core::{
    game::{make_rng, Game, GameSettings},
    AppConfig, Content, SaveEntry, SaveManager,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::{
    banner,
    input::InputLine,
    play::{Detail, PlayState, Prompt, Step},
};

const TICK_RATE: Duration = Duration::from_millis(40);
const LOG_LINES: usize = 7;

#[derive(Debug, Clone)]
struct Theme {
    primary_fg: Color,
    accent: Color,
    muted: Color,
    selection_bg: Color,
    success: Color,
    warning: Color,
    danger: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_fg: Color::White,
            accent: Color::Cyan,
            muted: Color::DarkGray,
            selection_bg: Color::DarkGray,
            success: Color::Green,
            warning: Color::Yellow,
            danger: Color::Red,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Menu,
    Continue,
    Play,
}

enum AppEvent {
    Input(Event),
    Tick,
}

/// Terminal front end: menu, save browser and the play screen.
pub struct HaulerApp {
    config: AppConfig,
    content: Content,
    save_manager: SaveManager,
    saves: Vec<SaveEntry>,
    screen: Screen,
    menu_cursor: usize,
    continue_cursor: usize,
    continue_offset: usize,
    list_height: usize,
    play_state: Option<PlayState>,
    input: InputLine,
    active_save: Option<SaveEntry>,
    status: String,
    should_quit: bool,
    last_tick: Instant,
    theme: Theme,
}

impl HaulerApp {
    pub fn new(config: AppConfig, content: Content, save_manager: SaveManager) -> Self {
        Self {
            config,
            content,
            save_manager,
            saves: Vec::new(),
            screen: Screen::Menu,
            menu_cursor: 0,
            continue_cursor: 0,
            continue_offset: 0,
            list_height: 1,
            play_state: None,
            input: InputLine::default(),
            active_save: None,
            status: "Ready".to_string(),
            should_quit: false,
            last_tick: Instant::now(),
            theme: Theme::default(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        match self.refresh_saves() {
            Ok(()) => self.set_status(format!("{} saved voyages found", self.saves.len())),
            Err(err) => self.set_status(format!("Failed to load saves: {err}")),
        }

        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx);

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            let maybe_event = event_rx.recv().await;
            if !self.process_app_event(maybe_event) || self.should_quit {
                break;
            }
        }

        restore_terminal(&mut terminal)?;
        Ok(())
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status = message.into();
    }

    fn process_app_event(&mut self, maybe_event: Option<AppEvent>) -> bool {
        match maybe_event {
            Some(AppEvent::Input(event)) => {
                if let Err(err) = self.handle_input(event) {
                    error!(?err, "input handling failed");
                    self.set_status(format!("Error: {err}"));
                }
                true
            }
            Some(AppEvent::Tick) => {
                self.handle_tick();
                true
            }
            None => false,
        }
    }

    fn handle_tick(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_tick);
        self.last_tick = now;
        if let Some(state) = self.play_state.as_mut() {
            state.log.advance(elapsed);
        }
    }

    fn refresh_saves(&mut self) -> Result<()> {
        self.saves = self.save_manager.entries()?;
        Ok(())
    }

    fn handle_input(&mut self, event: Event) -> Result<()> {
        let Event::Key(key) = event else {
            return Ok(());
        };
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            if self.screen == Screen::Play {
                self.leave_play();
            }
            self.should_quit = true;
            return Ok(());
        }
        match self.screen {
            Screen::Menu => self.handle_menu_key(key),
            Screen::Continue => self.handle_continue_key(key),
            Screen::Play => self.handle_play_key(key),
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => {
                self.menu_cursor = cmp::min(self.menu_cursor + 1, MENU_ITEMS.len() - 1);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.menu_cursor = self.menu_cursor.saturating_sub(1);
            }
            KeyCode::Char(ch @ '1'..='3') => {
                self.menu_cursor = ch as usize - '1' as usize;
                self.activate_menu()?;
            }
            KeyCode::Enter => self.activate_menu()?,
            _ => {}
        }
        Ok(())
    }

    fn activate_menu(&mut self) -> Result<()> {
        match self.menu_cursor {
            0 => self.start_new_game()?,
            1 => match self.refresh_saves() {
                Ok(()) => {
                    self.screen = Screen::Continue;
                    self.move_continue_cursor(0);
                    if self.saves.is_empty() {
                        self.set_status("No saves available");
                    } else {
                        self.set_status("Select a save to continue");
                    }
                }
                Err(err) => self.set_status(format!("Failed to load saves: {err}")),
            },
            _ => self.should_quit = true,
        }
        Ok(())
    }

    fn handle_continue_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => {
                self.screen = Screen::Menu;
                self.set_status("Returned to main menu");
            }
            KeyCode::Char('j') | KeyCode::Down => self.move_continue_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_continue_cursor(-1),
            KeyCode::Enter => {
                if let Some(entry) = self.saves.get(self.continue_cursor).cloned() {
                    if let Err(err) = self.load_save_entry(entry) {
                        error!(?err, "failed to load save");
                        self.set_status(format!("Failed to load save: {err}"));
                    }
                } else {
                    self.set_status("No saves available");
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn move_continue_cursor(&mut self, delta: isize) {
        let total = self.saves.len();
        if total == 0 {
            self.continue_cursor = 0;
            self.continue_offset = 0;
            return;
        }
        let idx = (self.continue_cursor as isize + delta).clamp(0, total as isize - 1);
        self.continue_cursor = idx as usize;
        let visible = self.list_height.max(1);
        if self.continue_cursor < self.continue_offset {
            self.continue_offset = self.continue_cursor;
        } else if self.continue_cursor >= self.continue_offset + visible {
            self.continue_offset = self.continue_cursor + 1 - visible;
        }
        self.continue_offset = self.continue_offset.min(total.saturating_sub(visible));
    }

    fn text_delay(&self) -> Duration {
        Duration::from_millis(self.config.text_speed_ms)
    }

    fn start_new_game(&mut self) -> Result<()> {
        let game = Game::new(
            GameSettings::from(&self.config),
            &self.content,
            make_rng(self.config.seed),
        )?;
        let state = PlayState::start(game, self.text_delay());
        let name = format!("Voyage {}", Local::now().format("%Y-%m-%d %H:%M"));
        match self
            .save_manager
            .create_save(Some(&name), state.game.snapshot())
        {
            Ok(entry) => {
                info!(path = %entry.path.display(), "save created");
                self.set_status(format!("New voyage saved as {}", entry.name));
                self.active_save = Some(entry);
            }
            Err(err) => {
                error!(?err, "failed to create save");
                self.set_status(format!("Voyage started but save failed: {err}"));
                self.active_save = None;
            }
        }
        self.enter_play(state);
        Ok(())
    }

    fn load_save_entry(&mut self, entry: SaveEntry) -> Result<()> {
        let payload = self.save_manager.load(&entry)?;
        let game = Game::restore(
            payload.into_snapshot(),
            &self.content,
            make_rng(self.config.seed),
        )?;
        info!(save = %entry.name, "save loaded");
        self.set_status(format!("Loaded {}", entry.name));
        self.active_save = Some(entry);
        let state = PlayState::resume(game, self.text_delay());
        self.enter_play(state);
        Ok(())
    }

    fn enter_play(&mut self, state: PlayState) {
        self.input.clear();
        self.last_tick = Instant::now();
        self.play_state = Some(state);
        self.screen = Screen::Play;
    }

    fn leave_play(&mut self) {
        self.persist_active_session();
        self.play_state = None;
        self.input.clear();
        self.screen = Screen::Menu;
        if let Err(err) = self.refresh_saves() {
            error!(?err, "failed to refresh saves");
        }
    }

    fn persist_active_session(&mut self) {
        let Some(state) = self.play_state.as_ref() else {
            return;
        };
        let snapshot = state.game.snapshot();
        let result = match self.active_save.as_ref() {
            Some(entry) => self.save_manager.update_save(entry, snapshot),
            None => self.save_manager.create_save(None, snapshot),
        };
        match result {
            Ok(entry) => {
                self.set_status(format!(
                    "Saved {} at {}",
                    entry.name,
                    entry.updated_at.with_timezone(&Local).format("%H:%M:%S")
                ));
                self.active_save = Some(entry);
            }
            Err(err) => {
                error!(?err, "auto-save failed");
                self.set_status(format!("Auto-save failed: {err}"));
            }
        }
    }

    fn handle_play_key(&mut self, key: KeyEvent) -> Result<()> {
        let Some(mut state) = self.play_state.take() else {
            self.screen = Screen::Menu;
            return Ok(());
        };
        let step = match key.code {
            KeyCode::Char(ch) if ch.is_ascii_digit() => {
                self.input.push(ch);
                Step::Continue
            }
            KeyCode::Backspace => {
                self.input.backspace();
                Step::Continue
            }
            KeyCode::Esc => {
                self.input.clear();
                state.cancel()
            }
            KeyCode::Enter => {
                if state.log.is_revealing() && self.input.as_str().is_empty() {
                    state.log.flush();
                    Step::Continue
                } else {
                    state.notice = None;
                    let raw = self.input.take();
                    state.submit(&raw)
                }
            }
            _ => Step::Continue,
        };
        self.play_state = Some(state);

        match step {
            Step::Continue => {}
            Step::TurnDone => {
                if let Some(state) = self.play_state.as_mut() {
                    state.next_turn();
                }
                self.persist_active_session();
            }
            Step::Exit => self.leave_play(),
        }
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame) {
        match self.screen {
            Screen::Menu => self.draw_menu(frame),
            Screen::Continue => self.draw_continue(frame),
            Screen::Play => self.draw_play(frame),
        }
    }

    fn draw_menu(&mut self, frame: &mut Frame) {
        let area = frame.size();
        let banner_lines = banner::render("Hauler");
        let banner_height = banner_lines.len() as u16;
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length((banner_height + 2).min(area.height)),
                Constraint::Min(3),
                Constraint::Length(3),
            ])
            .split(area);

        let banner_content: Vec<Line> = banner_lines
            .into_iter()
            .map(|line| {
                Line::from(Span::styled(
                    line,
                    Style::default()
                        .fg(self.theme.accent)
                        .add_modifier(Modifier::BOLD),
                ))
            })
            .collect();
        frame.render_widget(
            Paragraph::new(banner_content).alignment(Alignment::Center),
            layout[0],
        );

        let menu_height = (MENU_ITEMS.len() as u16)
            .saturating_mul(2)
            .saturating_add(2)
            .min(layout[1].height);
        let menu_width = 28.min(layout[1].width.max(1));
        let menu_area = centered_rect(menu_width, menu_height, layout[1]);

        let menu_lines: Vec<Line> = MENU_ITEMS
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                if idx == self.menu_cursor {
                    Line::from(Span::styled(
                        format!("▶ {item}"),
                        Style::default()
                            .fg(self.theme.accent)
                            .add_modifier(Modifier::BOLD),
                    ))
                } else {
                    Line::from(Span::styled(
                        format!("  {item}"),
                        Style::default().fg(self.theme.primary_fg),
                    ))
                }
            })
            .collect();
        let menu = Paragraph::new(menu_lines)
            .block(Block::default().borders(Borders::ALL).title("Menu"))
            .alignment(Alignment::Center);
        frame.render_widget(menu, menu_area);
        self.render_status(frame, layout[2]);
    }

    fn draw_continue(&mut self, frame: &mut Frame) {
        let area = frame.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(3)])
            .split(area);

        self.list_height = chunks[0].height.saturating_sub(2) as usize;
        self.move_continue_cursor(0);
        let total = self.saves.len();
        let visible = self.list_height.max(1);

        let mut list_state = ListState::default();
        let items: Vec<ListItem> = if total == 0 {
            vec![ListItem::new(Line::from("  No saves found"))]
        } else {
            list_state.select(Some(self.continue_cursor - self.continue_offset));
            let end = cmp::min(self.continue_offset + visible, total);
            self.saves[self.continue_offset..end]
                .iter()
                .enumerate()
                .map(|(idx, entry)| {
                    let marker = if self.continue_offset + idx == self.continue_cursor {
                        Span::styled("▶ ", Style::default().fg(self.theme.accent))
                    } else {
                        Span::raw("  ")
                    };
                    let timestamp = entry.updated_at.with_timezone(&Local).format("%Y-%m-%d %H:%M");
                    ListItem::new(Line::from(vec![
                        marker,
                        Span::raw(format!(
                            "{}  {}  turn {}  {:.0} cr  [{}]",
                            entry.name, entry.planet, entry.turn, entry.credits, timestamp
                        )),
                    ]))
                })
                .collect()
        };

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Continue Voyage"))
            .highlight_style(Style::default().bg(self.theme.selection_bg));
        frame.render_stateful_widget(list, chunks[0], &mut list_state);
        self.render_status(frame, chunks[1]);
    }

    fn draw_play(&mut self, frame: &mut Frame) {
        let area = frame.size();
        let Some(state) = self.play_state.as_ref() else {
            let paragraph = Paragraph::new("No voyage in progress")
                .block(Block::default().borders(Borders::ALL).title("Play"))
                .alignment(Alignment::Center);
            frame.render_widget(paragraph, area);
            return;
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(12),
                Constraint::Length(LOG_LINES as u16 + 2),
                Constraint::Length(3),
            ])
            .split(area);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(32),
                Constraint::Length(48),
                Constraint::Min(30),
            ])
            .split(rows[0]);

        self.render_ship(frame, columns[0], state);
        self.render_prompt(frame, columns[1], state);
        self.render_detail(frame, columns[2], state);
        self.render_log(frame, rows[1], state);
        self.render_status(frame, rows[2]);
    }

    fn render_ship(&self, frame: &mut Frame, area: Rect, state: &PlayState) {
        let player = state.game.player();
        let label = Style::default().fg(self.theme.muted);
        let field = |name: &str, value: String| {
            Line::from(vec![
                Span::styled(format!("{name:<11}"), label),
                Span::raw(value),
            ])
        };
        let fuel_ratio = if player.fuel_tank_capacity() > 0.0 {
            player.fuel_level() / player.fuel_tank_capacity()
        } else {
            0.0
        };
        let fuel_style = if fuel_ratio < 0.25 {
            Style::default().fg(self.theme.danger)
        } else {
            Style::default().fg(self.theme.primary_fg)
        };

        let mut lines = vec![
            field("Planet", state.game.current_planet_name().to_string()),
            field(
                "Turn",
                format!("{} (difficulty {})", player.turn(), state.game.difficulty()),
            ),
            field("Credits", format!("{:.2}", player.credits())),
            field(
                "Level",
                format!(
                    "{} ({} / {} xp)",
                    player.level(),
                    player.experience(),
                    player.experience_to_next_level()
                ),
            ),
            Line::from(vec![
                Span::styled(format!("{:<11}", "Fuel"), label),
                Span::styled(
                    format!(
                        "{:.1} / {:.1}",
                        player.fuel_level(),
                        player.fuel_tank_capacity()
                    ),
                    fuel_style,
                ),
            ]),
            field(
                "Cargo",
                format!("{} / {}", player.cargo_used(), player.cargo_capacity()),
            ),
            field("Ship level", player.ship_level().to_string()),
            field("Efficiency", format!("{:.2}", player.fuel_efficiency())),
            field(
                "Passengers",
                format!(
                    "{} pods, {} life support",
                    player.passenger_pod_capacity(),
                    player.life_support_expansion()
                ),
            ),
            field("Net profit", format!("{:.2}", player.net_profit())),
        ];
        if !player.active_quests().is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Active quests",
                Style::default().fg(self.theme.accent),
            )));
            for quest in player.active_quests() {
                lines.push(Line::from(format!("• {} → {}", quest.title, quest.destination)));
            }
        }

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Ship"))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_prompt(&self, frame: &mut Frame, area: Rect, state: &PlayState) {
        let mut lines = vec![Line::from(Span::styled(
            state.question(),
            Style::default()
                .fg(self.theme.accent)
                .add_modifier(Modifier::BOLD),
        ))];
        if matches!(state.prompt, Prompt::Quests) {
            lines.push(Line::from("  0. Decline"));
        }
        for (idx, option) in state.options().iter().enumerate() {
            lines.push(Line::from(format!("{:>3}. {option}", idx + 1)));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("> ", Style::default().fg(self.theme.accent)),
            Span::raw(self.input.as_str().to_string()),
            Span::styled("_", Style::default().fg(self.theme.muted)),
        ]));
        if let Some(notice) = state.notice.as_ref() {
            lines.push(Line::from(Span::styled(
                notice.clone(),
                Style::default().fg(self.theme.warning),
            )));
        }

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Orders"))
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect, state: &PlayState) {
        match &state.detail {
            Detail::Market => self.render_market(frame, area, state),
            Detail::Scan(planet) => {
                let mut lines = vec![
                    Line::from(Span::styled(
                        planet.name.clone(),
                        Style::default()
                            .fg(self.theme.accent)
                            .add_modifier(Modifier::BOLD),
                    )),
                    Line::from(format!(
                        "{} world, {} climate, {} geology",
                        planet.planet_type, planet.climate, planet.geology
                    )),
                    Line::from(format!("Economy level {:.2}", planet.economy_level)),
                    Line::from(format!(
                        "Population {} in {} settlements, {} spaceports",
                        planet.demographics.population,
                        planet.demographics.settlements,
                        planet.demographics.spaceports
                    )),
                    Line::from(""),
                    Line::from(Span::styled(
                        "Resources",
                        Style::default().fg(self.theme.muted),
                    )),
                ];
                for (name, abundance) in &planet.resources {
                    lines.push(Line::from(format!("  {name:<16} {abundance:.2}")));
                }
                lines.push(Line::from(""));
                lines.push(Line::from(planet.history.clone()));
                let paragraph = Paragraph::new(lines)
                    .block(Block::default().borders(Borders::ALL).title("Scan"))
                    .wrap(Wrap { trim: true });
                frame.render_widget(paragraph, area);
            }
            Detail::Overview(overview) => {
                let header = Row::new(
                    std::iter::once(Cell::from("Planet")).chain(
                        overview
                            .commodities
                            .iter()
                            .map(|name| Cell::from(name.clone())),
                    ),
                )
                .style(Style::default().fg(self.theme.accent));
                let rows = overview.rows.iter().map(|row| {
                    let style = if row.planet == state.game.current_planet_name() {
                        Style::default().fg(self.theme.success)
                    } else {
                        Style::default()
                    };
                    Row::new(
                        std::iter::once(Cell::from(row.planet.clone()))
                            .chain(row.prices.iter().map(|price| Cell::from(format!("{price:.1}")))),
                    )
                    .style(style)
                });
                let widths: Vec<Constraint> = std::iter::once(Constraint::Length(14))
                    .chain(overview.commodities.iter().map(|_| Constraint::Length(9)))
                    .collect();
                let table = Table::new(rows, widths).header(header).block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("Market Overview"),
                );
                frame.render_widget(table, area);
            }
        }
    }

    fn render_market(&self, frame: &mut Frame, area: Rect, state: &PlayState) {
        let player = state.game.player();
        let header = Row::new(["Commodity", "Price", "Held", "Paid"])
            .style(Style::default().fg(self.theme.accent));
        let rows = state.quote.iter().map(|(name, price)| {
            let (held, paid) = match player.cargo(name) {
                Some(lot) => (lot.quantity.to_string(), format!("{:.2}", lot.avg_buy_price)),
                None => ("-".to_string(), "-".to_string()),
            };
            Row::new([
                Cell::from(name.clone()),
                Cell::from(format!("{price:.2}")),
                Cell::from(held),
                Cell::from(paid),
            ])
        });
        let widths = [
            Constraint::Length(16),
            Constraint::Length(10),
            Constraint::Length(6),
            Constraint::Length(10),
        ];
        let title = format!("Market at {}", state.game.current_planet_name());
        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(table, area);
    }

    fn render_log(&self, frame: &mut Frame, area: Rect, state: &PlayState) {
        let lines: Vec<Line> = state
            .log
            .tail(LOG_LINES)
            .into_iter()
            .map(Line::from)
            .collect();
        let title = if state.log.is_revealing() {
            "Log (Enter to skip)"
        } else {
            "Log"
        };
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Status");
        let secondary = match self.active_save.as_ref() {
            Some(entry) => format!("Saving to {}  (auto-save enabled)", entry.name),
            None => format!("Saves tracked: {}", self.saves.len()),
        };
        let paragraph = Paragraph::new(Line::from(vec![
            Span::raw(self.status.clone()),
            Span::styled(format!("  •  {secondary}"), Style::default().fg(self.theme.muted)),
        ]))
        .block(block)
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}

const MENU_ITEMS: [&str; 3] = ["New Game", "Continue", "Quit"];

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_fits_inside_area() {
        let area = Rect::new(0, 0, 80, 24);
        assert_eq!(centered_rect(20, 10, area), Rect::new(30, 7, 20, 10));
        assert_eq!(centered_rect(100, 30, area), area);
    }
}
