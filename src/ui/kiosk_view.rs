use crate::calc::CardMetrics;
use crate::data::{AssetCache, Event, KioskSettings};
use crate::kiosk::{Kiosk, SwipeTracker};
use anyhow::Result;
use crossterm::event::{
    self, Event as CEvent, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io::Stdout;
use std::time::{Duration, Instant};
use tracing::{debug, info};

const ACCENT: Color = Color::Indexed(178); // gold
const MAX_POLL: Duration = Duration::from_millis(250);

/// How a kiosk session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exit {
    /// The Back control on the carousel: hand over to this screen.
    Navigate(String),
    Quit,
}

/// Something on screen that reacts to a click or tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Back,
    PreviousCard,
    NextCard,
    Card(usize),
    CloseGallery,
    PreviousImage,
    NextImage,
    Thumbnail(usize),
}

pub struct App {
    kiosk: Kiosk,
    settings: KioskSettings,
    assets: AssetCache,
    swipe: SwipeTracker,
    metrics: CardMetrics,
    /// Clickable regions from the last render.
    hit_areas: Vec<(Rect, Target)>,
    /// Cell where the current pointer press started.
    press: Option<(u16, u16)>,
    pub exit: Option<Exit>,
}

impl App {
    pub fn new(kiosk: Kiosk, settings: KioskSettings, assets: AssetCache, columns: u16) -> Self {
        let swipe = SwipeTracker::new(settings.swipe_threshold_px);
        let mut app = App {
            kiosk,
            settings,
            assets,
            swipe,
            metrics: CardMetrics::for_viewport(0.0),
            hit_areas: Vec::new(),
            press: None,
            exit: None,
        };
        app.resize(columns);
        app
    }

    pub fn kiosk(&self) -> &Kiosk {
        &self.kiosk
    }

    pub fn metrics(&self) -> CardMetrics {
        self.metrics
    }

    pub fn resize(&mut self, columns: u16) {
        let width = self.px(columns);
        if width != self.metrics.viewport_width {
            self.metrics = CardMetrics::for_viewport(width);
        }
    }

    fn px(&self, column: u16) -> f32 {
        column as f32 * self.settings.cell_width_px
    }

    fn cells(&self, px: f32) -> i32 {
        (px / self.settings.cell_width_px).round() as i32
    }

    pub fn tick(&mut self, now: Instant) -> bool {
        let outcome = self.kiosk.tick(now);
        if outcome.timed_out {
            debug!(timers = ?self.kiosk.active_timers(), "gallery timed out");
        }
        outcome.changed()
    }

    /// How long the loop may wait for input before a timer is due.
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        self.kiosk
            .next_deadline()
            .saturating_duration_since(now)
            .min(MAX_POLL)
    }

    /// Back from the gallery closes it; back from the carousel leaves the kiosk.
    fn back(&mut self, now: Instant) {
        if self.kiosk.is_gallery_open() {
            self.kiosk.close(now);
        } else {
            let destination = self.settings.back_destination.clone();
            info!(%destination, "navigating away from kiosk");
            self.exit = Some(Exit::Navigate(destination));
        }
    }

    /// Returns true if the app should quit.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers, now: Instant) -> bool {
        if code == KeyCode::Char('q')
            || (code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL))
        {
            self.exit = Some(Exit::Quit);
            return true;
        }

        self.kiosk.interaction(now);
        let digit = match code {
            KeyCode::Char(c) => c.to_digit(10).filter(|d| *d > 0).map(|d| d as usize - 1),
            _ => None,
        };

        if self.kiosk.is_gallery_open() {
            match code {
                KeyCode::Left | KeyCode::Char('h') => self.kiosk.previous_image(now),
                KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => {
                    self.kiosk.next_image(now)
                }
                KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => self.back(now),
                _ => {
                    if let Some(d) = digit {
                        self.kiosk.jump_to_image(d, now);
                    }
                }
            }
        } else {
            match code {
                KeyCode::Left | KeyCode::Char('h') => self.kiosk.previous_card(),
                KeyCode::Right | KeyCode::Char('l') => self.kiosk.next_card(),
                KeyCode::Enter | KeyCode::Char(' ') => {
                    self.kiosk.open_focused(now);
                }
                KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => self.back(now),
                _ => {
                    if let Some(d) = digit {
                        self.kiosk.select_card(d);
                    }
                }
            }
        }
        self.exit.is_some()
    }

    /// Pointer input: press/drag/release act as touch, the wheel scrolls cards.
    pub fn handle_mouse(&mut self, kind: MouseEventKind, column: u16, row: u16, now: Instant) {
        match kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.kiosk.interaction(now);
                self.press = Some((column, row));
                if self.kiosk.is_gallery_open() {
                    self.swipe.cancel();
                } else {
                    self.swipe.touch_start(self.px(column));
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if !self.kiosk.is_gallery_open() {
                    self.swipe.touch_move(self.px(column));
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let press = self.press.take();
                if let Some(swipe) = self.swipe.touch_end() {
                    self.kiosk.swipe(swipe);
                    return;
                }
                // a click needs press and release on the same control
                let Some((x0, y0)) = press else { return };
                if let Some(target) = self.target_at(x0, y0) {
                    if self.target_at(column, row) == Some(target) {
                        self.activate(target, now);
                    }
                }
            }
            MouseEventKind::ScrollDown => self.kiosk.wheel(1.0),
            MouseEventKind::ScrollUp => self.kiosk.wheel(-1.0),
            _ => {}
        }
    }

    fn target_at(&self, column: u16, row: u16) -> Option<Target> {
        let pos = Position::new(column, row);
        self.hit_areas
            .iter()
            .rev()
            .find(|(rect, _)| rect.contains(pos))
            .map(|(_, target)| *target)
    }

    fn activate(&mut self, target: Target, now: Instant) {
        match target {
            Target::Back | Target::CloseGallery => self.back(now),
            Target::PreviousCard => self.kiosk.previous_card(),
            Target::NextCard => self.kiosk.next_card(),
            Target::Card(index) => {
                self.kiosk.open_event(index, now);
            }
            Target::PreviousImage => self.kiosk.previous_image(now),
            Target::NextImage => self.kiosk.next_image(now),
            Target::Thumbnail(index) => {
                self.kiosk.jump_to_image(index, now);
            }
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    pub fn render(&mut self, f: &mut Frame, now: Instant) {
        let area = f.area();
        self.resize(area.width);
        self.hit_areas.clear();
        if self.kiosk.is_gallery_open() {
            self.render_gallery(f, area, now);
        } else {
            self.render_carousel(f, area);
        }
    }

    fn render_carousel(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // title bar
                Constraint::Min(8),    // cards
                Constraint::Length(1), // key hints
            ])
            .split(area);

        self.render_header(f, chunks[0]);

        let row = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(3),
            ])
            .split(chunks[1]);
        self.button(f, row[0], "◀", Target::PreviousCard);
        self.button(f, row[2], "▶", Target::NextCard);
        self.render_track(f, row[1]);

        let hints = Paragraph::new(Line::from(
            "←/→ or swipe: browse   Enter: open   1-9: jump   b: back   q: quit",
        ))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
        f.render_widget(hints, chunks[2]);
    }

    fn render_header(&mut self, f: &mut Frame, area: Rect) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(10),
                Constraint::Min(10),
                Constraint::Length(24),
            ])
            .split(area);

        self.button(f, cols[0], "Back", Target::Back);

        let title = Paragraph::new(vec![
            Line::from(Span::styled(
                self.settings.title.clone(),
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                self.settings.subtitle.clone(),
                Style::default().add_modifier(Modifier::DIM),
            )),
        ])
        .alignment(Alignment::Center);
        f.render_widget(title, cols[1]);

        if let Some(logo) = self.settings.logo.clone() {
            let label = match self.assets.get(&logo) {
                Some(asset) => format!("[{}]", asset.file_name()),
                None => "📷".to_string(),
            };
            let p = Paragraph::new(label)
                .alignment(Alignment::Right)
                .style(Style::default().fg(Color::DarkGray));
            f.render_widget(p, cols[2]);
        }
    }

    /// Lays the cards out on a track shifted left by the focused card's offset.
    fn render_track(&mut self, f: &mut Frame, track: Rect) {
        let metrics = self.metrics;
        let card_cols = self.cells(metrics.card_width).max(1);
        let lead_px = (self.px(track.width) - metrics.card_width) / 2.0;
        let offset_px = metrics.track_offset(self.kiosk.current_card());
        let left_edge = track.x as i32;
        let right_edge = left_edge + track.width as i32;

        for index in 0..self.kiosk.catalog().len() {
            let x_px = lead_px + index as f32 * metrics.stride() - offset_px;
            let left = left_edge + self.cells(x_px);
            let (clip_left, clip_right) = (left.max(left_edge), (left + card_cols).min(right_edge));
            if clip_right <= clip_left {
                continue;
            }
            let rect = Rect::new(
                clip_left as u16,
                track.y,
                (clip_right - clip_left) as u16,
                track.height,
            );
            self.render_card(f, rect, index);
            self.hit_areas.push((rect, Target::Card(index)));
        }
    }

    fn render_card(&mut self, f: &mut Frame, rect: Rect, index: usize) {
        let Some(event) = self.kiosk.catalog().get(index) else {
            return;
        };
        let active = index == self.kiosk.current_card();
        let cover_index = self.kiosk.carousel().cover_index(event.id);
        let reference = event.cover(cover_index).to_string();

        let mut lines = image_lines(&mut self.assets, &reference, &event.title);
        lines.push(Line::from(""));
        lines.extend(caption_lines(event));
        if event.cover_images.len() > 1 {
            lines.push(Line::from(""));
            lines.push(indicator_line(event.cover_images.len(), cover_index));
        }

        let border = if active {
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let card = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).border_style(border));
        f.render_widget(card, rect);
    }

    fn render_gallery(&mut self, f: &mut Frame, area: Rect, now: Instant) {
        let Some(gallery) = self.kiosk.gallery().cloned() else {
            return;
        };
        let Some(event) = self.kiosk.selected_event().cloned() else {
            return;
        };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // back + countdown
                Constraint::Min(5),    // image
                Constraint::Length(3), // controls
                Constraint::Length(1), // thumbnails
                Constraint::Length(1), // key hints
            ])
            .split(area);

        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(10), Constraint::Min(0), Constraint::Length(16)])
            .split(chunks[0]);
        self.button(f, top[0], "Back", Target::CloseGallery);
        if let Some(remaining) = self.kiosk.inactivity_remaining(now) {
            let secs = remaining.as_millis().div_ceil(1000);
            let p = Paragraph::new(format!("returns in {secs}s"))
                .alignment(Alignment::Right)
                .style(Style::default().fg(Color::DarkGray));
            f.render_widget(p, top[2]);
        }

        let reference = event.gallery_image(gallery.current_image()).to_string();
        let image = Paragraph::new(image_lines(&mut self.assets, &reference, &event.title))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(image, chunks[1]);

        let controls = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(14),
                Constraint::Min(10),
                Constraint::Length(14),
            ])
            .split(chunks[2]);
        self.button(f, controls[0], "◀ Previous", Target::PreviousImage);
        self.button(f, controls[2], "Next ▶", Target::NextImage);
        let info = Paragraph::new(vec![
            Line::from(Span::styled(
                event.title.clone(),
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            )),
            Line::from(format!(
                "{} / {}",
                gallery.current_image() + 1,
                gallery.image_count()
            )),
        ])
        .alignment(Alignment::Center);
        f.render_widget(info, controls[1]);

        self.render_thumbnails(f, chunks[3], gallery.image_count(), gallery.current_image());

        let hints = Paragraph::new(Line::from(
            "←/→: image   1-9: jump   Esc/b: back   q: quit",
        ))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
        f.render_widget(hints, chunks[4]);
    }

    fn render_thumbnails(&mut self, f: &mut Frame, area: Rect, count: usize, current: usize) {
        const THUMB: u16 = 4;
        let total = THUMB.saturating_mul(count as u16).min(area.width);
        let start = area.x + (area.width - total) / 2;
        for i in 0..count {
            let x = start + THUMB * i as u16;
            if x + THUMB > area.x + area.width {
                break;
            }
            let rect = Rect::new(x, area.y, THUMB, 1);
            let style = if i == current {
                Style::default().fg(Color::Black).bg(ACCENT)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            f.render_widget(Paragraph::new(format!("{:^4}", i + 1)).style(style), rect);
            self.hit_areas.push((rect, Target::Thumbnail(i)));
        }
    }

    fn button(&mut self, f: &mut Frame, rect: Rect, label: &str, target: Target) {
        let p = Paragraph::new(label.to_string())
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(p, rect);
        self.hit_areas.push((rect, target));
    }
}

/// The picture slot: the resolved file, or a camera placeholder with the title.
fn image_lines(assets: &mut AssetCache, reference: &str, title: &str) -> Vec<Line<'static>> {
    match assets.get(reference) {
        Some(asset) => vec![
            Line::from(Span::styled(
                format!("🖼  {}", asset.file_name()),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("{} KB", asset.bytes.div_ceil(1024)),
                Style::default().add_modifier(Modifier::DIM),
            )),
        ],
        None => vec![
            Line::from("📷"),
            Line::from(Span::styled(
                title.to_string(),
                Style::default().add_modifier(Modifier::ITALIC),
            )),
        ],
    }
}

fn caption_lines(event: &Event) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        event.title.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    if let Some(date) = event.display_date() {
        lines.push(Line::from(Span::styled(
            date.to_string(),
            Style::default().fg(Color::Gray),
        )));
    }
    lines
}

fn indicator_line(count: usize, active: usize) -> Line<'static> {
    let spans: Vec<Span> = (0..count)
        .map(|i| {
            if i == active {
                Span::styled("● ", Style::default().fg(ACCENT))
            } else {
                Span::styled("○ ", Style::default().fg(Color::DarkGray))
            }
        })
        .collect();
    Line::from(spans)
}

// ── App event loop ────────────────────────────────────────────────────────────

pub fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<Exit> {
    loop {
        terminal.draw(|f| app.render(f, Instant::now()))?;
        if event::poll(app.poll_timeout(Instant::now()))? {
            let now = Instant::now();
            match event::read()? {
                CEvent::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key.code, key.modifiers, now);
                }
                CEvent::Mouse(mouse) => app.handle_mouse(mouse.kind, mouse.column, mouse.row, now),
                CEvent::Resize(columns, _) => app.resize(columns),
                _ => {}
            }
        }
        app.tick(Instant::now());
        if let Some(exit) = app.exit.take() {
            return Ok(exit);
        }
    }
}
