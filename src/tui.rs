use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use std::io::stdout;
use tracing::{info, warn};

use crate::config::Config;
use crate::db::Database;
use crate::filter::{FilterCategory, FilterSelection};
use crate::models::{Candidate, Job, Listing, Role};
use crate::queue::{Outcome, TriageQueue, TriageState};
use crate::swipe::SwipeDirection;
use crate::unlock::{format_cents, UnlockLedger, UnlockRequest};

pub type FilterFn<T> = fn(&[T], &FilterSelection, &str) -> Vec<T>;

/// Detail panel content for a listing, with contact fields hidden until unlocked.
pub trait Detail {
    fn detail(&self, unlocked: bool) -> Vec<Line<'static>>;

    fn location(&self) -> Option<&str>;
}

impl Detail for Job {
    fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    fn detail(&self, unlocked: bool) -> Vec<Line<'static>> {
        let mut lines = vec![Line::from(Span::styled(
            self.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ))];

        let company = if unlocked {
            self.company_name.clone()
        } else {
            self.public_company()
        };
        lines.push(Line::from(format!("at {}", company)));
        if let Some(location) = &self.location {
            lines.push(Line::from(format!("Location: {}", location)));
        }
        if let Some(pay) = &self.pay_range {
            lines.push(Line::from(format!("Pay: {}", pay)));
        }
        if let Some(job_type) = &self.job_type {
            lines.push(Line::from(format!("Type: {}", job_type)));
        }
        lines.push(Line::from(format!("Applicants: {}", self.applicant_count)));
        lines.push(Line::from(""));

        if let Some(description) = &self.description {
            for line in textwrap::fill(description, 70).lines() {
                lines.push(Line::from(line.to_string()));
            }
            lines.push(Line::from(""));
        }

        push_contact(&mut lines, unlocked, &self.contact_email, &self.contact_phone);
        lines
    }
}

impl Detail for Candidate {
    fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    fn detail(&self, unlocked: bool) -> Vec<Line<'static>> {
        let mut lines = vec![Line::from(Span::styled(
            self.display_title(),
            Style::default().add_modifier(Modifier::BOLD),
        ))];

        if unlocked {
            lines.push(Line::from(self.name.clone()));
        }
        if let Some(location) = &self.location {
            lines.push(Line::from(format!("Location: {}", location)));
        }
        lines.push(Line::from(format!("Experience: {} yrs", self.years_experience)));
        if let Some(education) = &self.education {
            lines.push(Line::from(format!("Education: {}", education)));
        }
        if let Some(pay) = self.preferred_pay_range.as_ref().or(self.target_pay.as_ref()) {
            lines.push(Line::from(format!("Target pay: {}", pay)));
        }
        if !self.skills().is_empty() {
            lines.push(Line::from(format!("Skills: {}", self.skills().join(", "))));
        }
        lines.push(Line::from(""));

        if let Some(bio) = &self.bio {
            for line in textwrap::fill(bio, 70).lines() {
                lines.push(Line::from(line.to_string()));
            }
            lines.push(Line::from(""));
        }

        push_contact(&mut lines, unlocked, &self.email, &self.phone);
        lines
    }
}

fn push_contact(
    lines: &mut Vec<Line<'static>>,
    unlocked: bool,
    email: &Option<String>,
    phone: &Option<String>,
) {
    if !unlocked {
        lines.push(Line::from(Span::styled(
            "(Contact details locked. Save and press p to unlock)",
            Style::default().fg(Color::DarkGray),
        )));
        return;
    }
    if let Some(email) = email {
        lines.push(Line::from(format!("Email: {}", email)));
    }
    if let Some(phone) = phone {
        lines.push(Line::from(format!("Phone: {}", phone)));
    }
}

struct AppState<T> {
    role: Role,
    listings: Vec<T>,
    filters: FilterSelection,
    filter_fn: FilterFn<T>,
    queue: TriageQueue<T>,
    ledger: UnlockLedger,
    query: String,
    editing_query: bool,
    /// Selected row while the cart is open.
    cart: Option<usize>,
    scroll_offset: u16,
    drag_start: Option<u16>,
    drag_offset_px: f32,
    status: Option<String>,
    fee_cents: u32,
    swipe_threshold_px: f32,
    cell_width_px: f32,
}

impl<T: Listing + Detail + Clone> AppState<T> {
    fn refilter(&mut self) {
        let deck = (self.filter_fn)(&self.listings, &self.filters, &self.query);
        self.queue.refresh(deck, &self.query);
        self.scroll_offset = 0;
    }

    fn report(&mut self, outcome: Option<Outcome>) {
        self.scroll_offset = 0;
        self.status = outcome.map(|o| describe(&o));
    }

    fn toggle_location_filter(&mut self) {
        let Some(location) = self.queue.current().and_then(|i| i.location()).map(str::to_string)
        else {
            return;
        };
        let active = self.filters.toggle(FilterCategory::Locations, &location);
        self.refilter();
        self.status = Some(if active {
            format!("Filtering to {} ({} listings)", location, self.queue.deck().len())
        } else {
            format!("Removed {} filter", location)
        });
    }

    fn clear_filters(&mut self) {
        if self.filters.is_empty() {
            return;
        }
        self.filters.clear();
        self.refilter();
        self.status = Some("Filters cleared".to_string());
    }

    fn recover_last(&mut self) {
        let Some(last) = self.queue.passed().last() else {
            return;
        };
        let id = last.id().to_string();
        let outcome = self.queue.recover(&id);
        self.report(outcome);
    }

    fn toggle_bookmark(&mut self) {
        let Some(item) = self.queue.current().cloned() else {
            return;
        };
        let outcome = self.queue.toggle_saved(&item);
        self.report(Some(outcome));
    }

    fn open_cart(&mut self) {
        if self.queue.saved().is_empty() {
            self.status = Some("Nothing saved to unlock".to_string());
            return;
        }
        self.cart = Some(0);
        self.status = Some(format!(
            "Cart: {} for {}",
            self.queue.saved().len(),
            format_cents(self.cart_total_cents())
        ));
    }

    fn cart_total_cents(&self) -> u64 {
        u64::from(self.fee_cents) * self.queue.saved().len() as u64
    }

    fn move_cart(&mut self, down: bool) {
        let Some(selected) = self.cart else {
            return;
        };
        let last = self.queue.saved().len().saturating_sub(1);
        self.cart = Some(if down {
            (selected + 1).min(last)
        } else {
            selected.saturating_sub(1)
        });
    }

    fn remove_from_cart(&mut self) {
        let Some(selected) = self.cart else {
            return;
        };
        let Some(id) = self.queue.saved().get(selected).map(|s| s.id().to_string()) else {
            return;
        };
        self.queue.remove_saved(&id);
        let remaining = self.queue.saved().len();
        if remaining == 0 {
            self.cart = None;
            self.status = Some(format!("Removed {}, cart is empty", id));
        } else {
            self.cart = Some(selected.min(remaining - 1));
            self.status = Some(format!(
                "Removed {}, {} for {}",
                id,
                remaining,
                format_cents(self.cart_total_cents())
            ));
        }
    }

    /// Pays for everything in the cart and closes it.
    fn checkout(&mut self, db: &Database) -> Result<()> {
        self.cart = None;
        let request = UnlockRequest::new(self.role, self.queue.saved().to_vec());
        if request.count() == 0 {
            self.status = Some("Nothing saved to unlock".to_string());
            return Ok(());
        }
        db.record_unlocks(&request, self.fee_cents)?;
        self.ledger.apply(&request);
        self.queue.take_saved(&request.ids());
        let total = request.total_cents(self.fee_cents);
        info!(role = %self.role, count = request.count(), total, "checkout complete");
        self.status = Some(format!(
            "Unlocked {} for {}",
            request.count(),
            format_cents(total)
        ));
        Ok(())
    }

    fn handle_cart_key(&mut self, key: KeyEvent, db: &Database) -> Result<()> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('p') | KeyCode::Char('q') => {
                self.cart = None;
                self.status = None;
            }
            KeyCode::Down | KeyCode::Char('j') => self.move_cart(true),
            KeyCode::Up | KeyCode::Char('k') => self.move_cart(false),
            KeyCode::Char('d') | KeyCode::Delete | KeyCode::Backspace => self.remove_from_cart(),
            KeyCode::Enter => self.checkout(db)?,
            _ => {}
        }
        Ok(())
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.drag_start = Some(mouse.column);
                self.drag_offset_px = 0.0;
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(start) = self.drag_start {
                    let cells = f32::from(mouse.column) - f32::from(start);
                    self.drag_offset_px = cells * self.cell_width_px;
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let offset = self.drag_offset_px;
                self.drag_start = None;
                self.drag_offset_px = 0.0;
                if let Some(direction) =
                    SwipeDirection::from_drag(offset, self.swipe_threshold_px)
                {
                    let outcome = self.queue.swipe(direction);
                    self.report(outcome);
                }
            }
            _ => {}
        }
    }

    fn handle_query_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => self.editing_query = false,
            KeyCode::Backspace => {
                self.query.pop();
                self.refilter();
            }
            KeyCode::Char(c) => {
                self.query.push(c);
                self.refilter();
            }
            _ => {}
        }
    }
}

fn describe(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Passed { id, recovered: true } => {
            format!("Passed {} again (back in the bin)", id)
        }
        Outcome::Passed { id, .. } => format!("Passed {}", id),
        Outcome::Saved { id, recovered: true } => format!("Saved {} from the bin", id),
        Outcome::Saved { id, .. } => format!("Saved {}", id),
        Outcome::AlreadySaved { id } => format!("{} is already saved", id),
        Outcome::Undone { id } => format!("Undid pass on {}", id),
        Outcome::Recovered { count } => format!("Recovered {} to review", count),
        Outcome::BinCleared { count } => format!("Cleared {} from the bin", count),
        Outcome::Bookmarked { id } => format!("Bookmarked {}", id),
        Outcome::Unbookmarked { id } => format!("Removed {} from saved", id),
    }
}

pub fn run_browse<T: Listing + Detail + Clone>(
    db: &Database,
    role: Role,
    listings: Vec<T>,
    filters: FilterSelection,
    query: String,
    filter_fn: FilterFn<T>,
    config: &Config,
) -> Result<()> {
    let deck = filter_fn(&listings, &filters, &query);
    if deck.is_empty() {
        println!("No listings match.");
        return Ok(());
    }

    let mut state = AppState {
        role,
        listings,
        filters,
        filter_fn,
        queue: TriageQueue::new(deck, &query),
        ledger: db.unlock_ledger(role)?,
        query,
        editing_query: false,
        cart: None,
        scroll_offset: 0,
        drag_start: None,
        drag_offset_px: 0.0,
        status: None,
        fee_cents: config.interaction_fee_cents,
        swipe_threshold_px: config.swipe_threshold_px,
        cell_width_px: config.cell_width_px,
    };

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_loop(&mut terminal, &mut state, db);

    // Restore terminal
    stdout().execute(DisableMouseCapture)?;
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    if !state.queue.saved().is_empty() {
        warn!(
            count = state.queue.saved().len(),
            "leaving with saved listings that were not unlocked"
        );
    }
    result
}

fn run_loop<T: Listing + Detail + Clone>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut AppState<T>,
    db: &Database,
) -> Result<()> {
    let mut list_state = ListState::default();

    loop {
        list_state.select(match state.queue.state() {
            TriageState::Reviewing { cursor, .. } => Some(cursor),
            _ => None,
        });
        terminal.draw(|frame| draw(frame, state, &mut list_state))?;

        match event::read()? {
            Event::Mouse(mouse) => state.handle_mouse(mouse),
            Event::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if state.editing_query {
                    state.handle_query_key(key);
                    continue;
                }
                if state.cart.is_some() {
                    state.handle_cart_key(key, db)?;
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Left | KeyCode::Char('h') => {
                        let outcome = state.queue.skip();
                        state.report(outcome);
                    }
                    KeyCode::Right | KeyCode::Char('l') => {
                        let outcome = state.queue.save();
                        state.report(outcome);
                    }
                    KeyCode::Char('u') => {
                        let outcome = state.queue.undo();
                        state.report(outcome);
                    }
                    KeyCode::Char('r') => state.recover_last(),
                    KeyCode::Char('R') => {
                        let outcome = state.queue.recover_all();
                        state.report(outcome);
                    }
                    KeyCode::Char('c') => {
                        let outcome = state.queue.clear_bin();
                        state.report(Some(outcome));
                    }
                    KeyCode::Char('b') => state.toggle_bookmark(),
                    KeyCode::Char('t') => state.toggle_location_filter(),
                    KeyCode::Char('x') => state.clear_filters(),
                    KeyCode::Char('p') => state.open_cart(),
                    KeyCode::Char('/') => state.editing_query = true,
                    KeyCode::Char('J') | KeyCode::PageDown => {
                        state.scroll_offset = state.scroll_offset.saturating_add(3);
                    }
                    KeyCode::Char('K') | KeyCode::PageUp => {
                        state.scroll_offset = state.scroll_offset.saturating_sub(3);
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn draw<T: Listing + Detail + Clone>(
    frame: &mut Frame,
    state: &AppState<T>,
    list_state: &mut ListState,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(frame.area());

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(rows[0]);

    // Left panel: the filtered deck
    let items: Vec<ListItem> = state
        .queue
        .deck()
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let id = item.id();
            let marker = if state.queue.is_saved(id) {
                "+"
            } else if state.queue.passed().iter().any(|p| p.id() == id) {
                "x"
            } else if i < state.queue.cursor() {
                "-"
            } else {
                " "
            };
            let lock = if state.ledger.is_unlocked(state.role, id) {
                "*"
            } else {
                " "
            };
            ListItem::new(format!("{}{} {}", marker, lock, truncate(&item.headline(), 40)))
        })
        .collect();

    let title = match state.role {
        Role::Seeker => "Jobs",
        Role::Employer => "Candidates",
    };
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(format!(
            " {} ({}) queued {} saved {} passed {} ",
            title,
            state.queue.deck().len(),
            state.queue.recovery().len(),
            state.queue.saved().len(),
            state.queue.passed().len(),
        )))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, chunks[0], list_state);

    // Right panel: cart when open, otherwise the current card
    if let Some(selected) = state.cart {
        draw_cart(frame, state, selected, chunks[1]);
    } else {
        let detail = Paragraph::new(build_detail(state))
            .block(Block::default().borders(Borders::ALL).title(card_title(state)))
            .wrap(Wrap { trim: false })
            .scroll((state.scroll_offset, 0));
        frame.render_widget(detail, chunks[1]);
    }

    // Footer: search, status, help
    let cursor = if state.editing_query { "_" } else { "" };
    let search = format!(
        " search: {}{}  filters: {}",
        state.queue.query(),
        cursor,
        state.filters.active_count()
    );
    let status = state.status.as_deref().unwrap_or("");
    let help = if state.cart.is_some() {
        " j/k:select  d:remove  enter:pay  esc:back".to_string()
    } else {
        let undo = if state.queue.can_undo() { "u:undo " } else { "" };
        format!(
            " h/l:pass/save  {}r/R:recover  c:clear bin  b:bookmark  /:search  t/x:filter  \
             p:cart ({} each)  q:quit",
            undo,
            format_cents(u64::from(state.fee_cents)),
        )
    };
    let footer = Paragraph::new(vec![
        Line::from(search),
        Line::from(Span::styled(
            format!(" {}", status),
            Style::default().fg(Color::Yellow),
        )),
        Line::from(Span::styled(help, Style::default().fg(Color::DarkGray))),
    ]);
    frame.render_widget(footer, rows[1]);
}

fn draw_cart<T: Listing + Detail + Clone>(
    frame: &mut Frame,
    state: &AppState<T>,
    selected: usize,
    area: Rect,
) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    let fee = format_cents(u64::from(state.fee_cents));
    let items: Vec<ListItem> = state
        .queue
        .saved()
        .iter()
        .map(|item| ListItem::new(format!("{:<48} {:>8}", truncate(&item.headline(), 48), fee)))
        .collect();
    let mut cart_state = ListState::default();
    cart_state.select(Some(selected));
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Cart "))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, parts[0], &mut cart_state);

    let total = Paragraph::new(Line::from(Span::styled(
        format!(
            " {} x {} = {}",
            state.queue.saved().len(),
            fee,
            format_cents(state.cart_total_cents())
        ),
        Style::default().add_modifier(Modifier::BOLD),
    )))
    .block(Block::default().borders(Borders::ALL).title(" Total "));
    frame.render_widget(total, parts[1]);
}

fn card_title<T: Listing + Detail + Clone>(state: &AppState<T>) -> String {
    let drag = if state.drag_offset_px.abs() > 0.0 {
        format!(" drag {:+.0}px", state.drag_offset_px)
    } else {
        String::new()
    };
    match state.queue.state() {
        TriageState::Recovering { remaining, .. } => {
            format!(" Recovered · {} to review{} ", remaining, drag)
        }
        TriageState::Reviewing { cursor, .. } => format!(
            " {} of {}{} ",
            cursor + 1,
            state.queue.deck().len(),
            drag
        ),
        TriageState::Exhausted => " All caught up ".to_string(),
    }
}

fn build_detail<T: Listing + Detail + Clone>(state: &AppState<T>) -> Text<'static> {
    let Some(item) = state.queue.current() else {
        return Text::from(vec![
            Line::from("No more listings in this deck."),
            Line::from(Span::styled(
                "Press R to review passed listings, or / to change the search.",
                Style::default().fg(Color::DarkGray),
            )),
        ]);
    };

    let unlocked = state.ledger.is_unlocked(state.role, item.id());
    let mut lines = item.detail(unlocked);
    if state.queue.is_saved(item.id()) {
        lines.insert(
            0,
            Line::from(Span::styled("[saved]", Style::default().fg(Color::Green))),
        );
    }
    Text::from(lines)
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
