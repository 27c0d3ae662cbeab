//! Terminal rendering of a session snapshot.

use flappy::session::{OverReason, SessionSnapshot, SessionState};
use flappy::{AgentStatus, Session};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// World dimensions needed to scale a snapshot onto the terminal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneDims {
    pub world_width: f64,
    pub world_height: f64,
    pub floor_y: f64,
    pub bird_width: f64,
    pub bird_height: f64,
    pub pipe_width: f64,
}

impl SceneDims {
    pub fn from_session(session: &Session) -> Self {
        let config = session.config();
        let sprites = session.sprites();
        Self {
            world_width: config.world.width as f64,
            world_height: config.world.height as f64,
            floor_y: config.world.floor_y,
            bird_width: sprites.bird_width() as f64,
            bird_height: sprites.bird_height() as f64,
            pipe_width: sprites.pipe_width() as f64,
        }
    }
}

/// What one terminal cell shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Sky,
    Pipe,
    /// Floor texture; alternates to show scrolling.
    Floor(bool),
    Bird(BirdGlyph),
    CrashedBird,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BirdGlyph {
    Up,
    Level,
    Dive,
}

/// Rasterize a snapshot into `cols` x `rows` cells, sampling each cell's
/// center in world coordinates.
pub fn rasterize(snapshot: &SessionSnapshot, dims: &SceneDims, cols: usize, rows: usize) -> Vec<Vec<Cell>> {
    if cols == 0 || rows == 0 {
        return Vec::new();
    }
    let x_scale = dims.world_width / cols as f64;
    let y_scale = dims.world_height / rows as f64;

    (0..rows)
        .map(|row| {
            let y = (row as f64 + 0.5) * y_scale;
            (0..cols)
                .map(|col| {
                    let x = (col as f64 + 0.5) * x_scale;
                    cell_at(snapshot, dims, x, y, x_scale, y_scale)
                })
                .collect()
        })
        .collect()
}

fn cell_at(snapshot: &SessionSnapshot, dims: &SceneDims, x: f64, y: f64, x_scale: f64, y_scale: f64) -> Cell {
    // Birds sit on top of everything; a bird smaller than a cell still shows
    for agent in snapshot.visible_agents() {
        let inside_x = x + x_scale / 2.0 > agent.x && x - x_scale / 2.0 < agent.x + dims.bird_width;
        let inside_y = y + y_scale / 2.0 > agent.y && y - y_scale / 2.0 < agent.y + dims.bird_height;
        if inside_x && inside_y {
            if agent.status == AgentStatus::Crashed {
                return Cell::CrashedBird;
            }
            let glyph = if agent.tilt > 0.0 {
                BirdGlyph::Up
            } else if agent.tilt <= -80.0 {
                BirdGlyph::Dive
            } else {
                BirdGlyph::Level
            };
            return Cell::Bird(glyph);
        }
    }

    if y >= dims.floor_y {
        let offset = (x - snapshot.floor.x1).rem_euclid(48.0);
        return Cell::Floor(offset < 24.0);
    }

    for pipe in &snapshot.pipes {
        if x >= pipe.x && x < pipe.x + dims.pipe_width && (y < pipe.gap_center || y >= pipe.bottom) {
            return Cell::Pipe;
        }
    }

    Cell::Sky
}

fn cell_span(cell: Cell) -> Span<'static> {
    match cell {
        Cell::Sky => Span::raw(" "),
        Cell::Pipe => Span::styled("█", Style::default().fg(Color::Green)),
        Cell::Floor(true) => Span::styled("▓", Style::default().fg(Color::Yellow)),
        Cell::Floor(false) => Span::styled("▒", Style::default().fg(Color::Yellow)),
        Cell::Bird(glyph) => {
            let ch = match glyph {
                BirdGlyph::Up => "▲",
                BirdGlyph::Level => "►",
                BirdGlyph::Dive => "▼",
            };
            Span::styled(
                ch,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        }
        Cell::CrashedBird => Span::styled("✖", Style::default().fg(Color::Red)),
    }
}

/// Areas of the flappy screen.
///
/// ```text
/// ┌ Flappy Bird ─────────────────────────────┐
/// │ Score 3 · Tick 120 · Gap 180-380          │  hud
/// │                              ┌ Flock ───┐ │
/// │   [play field]               │ ●●○●●○…  │ │  field + flock (populations)
/// │                              └──────────┘ │
/// │ [Space] flap  [R] restart  [Q] quit       │  keys
/// └───────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub hud: Rect,
    pub field: Rect,
    /// Only present when more than one bird is flying.
    pub flock: Option<Rect>,
    pub keys: Rect,
}

const FLOCK_PANEL_WIDTH: u16 = 22;

/// Split the inside of the outer border. `population` decides whether the
/// flock panel gets a column.
pub fn screen_layout(inner: Rect, population: usize) -> ScreenLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(4), Constraint::Length(1)])
        .split(inner);

    let (field, flock) = if population > 1 && rows[1].width > FLOCK_PANEL_WIDTH * 2 {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(20), Constraint::Length(FLOCK_PANEL_WIDTH)])
            .split(rows[1]);
        (cols[0], Some(cols[1]))
    } else {
        (rows[1], None)
    };

    ScreenLayout {
        hud: rows[0],
        field,
        flock,
        keys: rows[2],
    }
}

fn screen_title(snapshot: &SessionSnapshot) -> String {
    match snapshot.generation {
        Some(generation) => format!(" Flappy Bird · Gen {} ", generation),
        None => " Flappy Bird ".to_string(),
    }
}

/// One-line heads-up display: score, tick and the gap birds steer by.
pub fn hud_text(snapshot: &SessionSnapshot) -> String {
    let mut text = format!(" Score {} · Tick {}", snapshot.score, snapshot.frame);
    if snapshot.agents.len() > 1 {
        text.push_str(&format!(" · Alive {}/{}", snapshot.live_count, snapshot.agents.len()));
    }
    if let Some(gap) = snapshot.lookahead {
        text.push_str(&format!(" · Gap {:.0}-{:.0}", gap.upper, gap.lower));
    }
    text
}

fn hud_color(snapshot: &SessionSnapshot) -> Color {
    match snapshot.state {
        SessionState::Running => Color::Green,
        SessionState::AgentDead => Color::Red,
        SessionState::SessionOver => Color::White,
    }
}

/// Render the whole game screen.
pub fn render_flappy(frame: &mut Frame, area: Rect, snapshot: &SessionSnapshot, dims: &SceneDims) {
    frame.render_widget(Clear, area);
    let border = Block::default()
        .title(screen_title(snapshot))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = border.inner(area);
    frame.render_widget(border, area);

    let layout = screen_layout(inner, snapshot.agents.len());

    frame.render_widget(
        Paragraph::new(hud_text(snapshot)).style(
            Style::default()
                .fg(hud_color(snapshot))
                .add_modifier(Modifier::BOLD),
        ),
        layout.hud,
    );
    render_play_area(frame, layout.field, snapshot, dims);
    if let Some(flock) = layout.flock {
        render_flock(frame, flock, snapshot);
    }
    render_keys(frame, layout.keys, snapshot);

    if snapshot.state == SessionState::SessionOver {
        render_result_card(frame, layout.field, snapshot);
    }
}

fn render_play_area(frame: &mut Frame, area: Rect, snapshot: &SessionSnapshot, dims: &SceneDims) {
    let grid = rasterize(snapshot, dims, area.width as usize, area.height as usize);
    let lines: Vec<Line> = grid
        .into_iter()
        .map(|row| Line::from(row.into_iter().map(cell_span).collect::<Vec<_>>()))
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

/// Status glyph per agent, wrapped to `width` columns.
pub fn flock_rows(snapshot: &SessionSnapshot, width: usize) -> Vec<Vec<AgentStatus>> {
    if width == 0 {
        return Vec::new();
    }
    snapshot
        .agents
        .chunks(width)
        .map(|chunk| chunk.iter().map(|a| a.status).collect())
        .collect()
}

fn render_flock(frame: &mut Frame, area: Rect, snapshot: &SessionSnapshot) {
    let block = Block::default()
        .title(" Flock ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 || inner.width < 2 {
        return;
    }

    let crashed = snapshot
        .agents
        .iter()
        .filter(|a| a.status == AgentStatus::Crashed)
        .count();
    let dead = snapshot.agents.len() - snapshot.live_count - crashed;
    let label = Style::default().fg(Color::DarkGray);
    let mut lines = vec![
        Line::from(vec![
            Span::styled(" alive ", label),
            Span::styled(snapshot.live_count.to_string(), Style::default().fg(Color::Green)),
            Span::styled("  dead ", label),
            Span::styled(dead.to_string(), Style::default().fg(Color::Red)),
        ]),
        Line::from(""),
    ];

    let width = inner.width.saturating_sub(2) as usize;
    let room = (inner.height as usize).saturating_sub(lines.len());
    for row in flock_rows(snapshot, width).into_iter().take(room) {
        let mut spans = vec![Span::raw(" ")];
        spans.extend(row.into_iter().map(|status| match status {
            AgentStatus::Alive => Span::styled("●", Style::default().fg(Color::Yellow)),
            AgentStatus::Crashed => Span::styled("✖", Style::default().fg(Color::Red)),
            AgentStatus::Dead => Span::styled("○", Style::default().fg(Color::DarkGray)),
        }));
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_keys(frame: &mut Frame, area: Rect, snapshot: &SessionSnapshot) {
    let keys: &[(&str, &str)] = match snapshot.state {
        SessionState::SessionOver => &[("R", "play again"), ("Q", "quit")],
        _ if snapshot.frame == 0 => &[("Space", "start flapping"), ("Q", "quit")],
        _ => &[("Space/Up", "flap"), ("Q", "quit")],
    };
    let spans: Vec<Span> = keys
        .iter()
        .flat_map(|(key, action)| {
            [
                Span::styled(format!(" [{}]", key), Style::default().fg(Color::White)),
                Span::styled(format!(" {}", action), Style::default().fg(Color::DarkGray)),
            ]
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Heading and color of the end-of-session card.
pub fn result_heading(reason: Option<OverReason>) -> (&'static str, Color) {
    match reason {
        Some(OverReason::ScoreCeiling) => ("Ceiling reached", Color::Green),
        Some(OverReason::Stopped) => ("Stopped", Color::Gray),
        Some(OverReason::TickLimit) => ("Out of time", Color::Gray),
        Some(OverReason::AllAgentsDead) | None => ("Grounded", Color::Red),
    }
}

/// Small card centered over the play field; the frozen scene stays visible
/// around it.
fn render_result_card(frame: &mut Frame, field: Rect, snapshot: &SessionSnapshot) {
    let width = 28.min(field.width);
    let height = 5.min(field.height);
    let card = Rect {
        x: field.x + (field.width - width) / 2,
        y: field.y + (field.height - height) / 2,
        width,
        height,
    };
    let (heading, color) = result_heading(snapshot.over_reason);

    frame.render_widget(Clear, card);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));
    let inner = block.inner(card);
    frame.render_widget(block, card);

    let pipes = if snapshot.score == 1 { "pipe" } else { "pipes" };
    let lines = vec![
        Line::from(Span::styled(
            heading,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("{} {} in {} ticks", snapshot.score, pipes, snapshot.frame)),
        Line::from(Span::styled("[R] again  [Q] quit", Style::default().fg(Color::DarkGray))),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use flappy::{GameConfig, SpriteSet};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn session() -> Session {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        Session::solo(GameConfig::default(), SpriteSet::default(), &mut rng).unwrap()
    }

    #[test]
    fn test_rasterize_shows_bird_floor_and_pipe() {
        let session = session();
        let dims = SceneDims::from_session(&session);
        let grid = rasterize(&session.snapshot(), &dims, 60, 80);

        assert_eq!(grid.len(), 80);
        assert_eq!(grid[0].len(), 60);
        // Bird at (230, 350) lands around column 23, row 35
        assert!(matches!(grid[36][25], Cell::Bird(_)));
        // Floor from y = 700 down
        assert!(matches!(grid[75][5], Cell::Floor(_)));
        // First pipe starts at x = 700, off the right edge of a 600-wide world
        assert!(grid.iter().flatten().all(|c| *c != Cell::Pipe));
    }

    fn population_snapshot(size: usize) -> SessionSnapshot {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        Session::new(GameConfig::population(), SpriteSet::default(), size, &mut rng)
            .unwrap()
            .with_generation(3)
            .snapshot()
    }

    #[test]
    fn test_solo_layout_has_no_flock_panel() {
        let inner = Rect::new(1, 1, 78, 38);
        let layout = screen_layout(inner, 1);
        assert!(layout.flock.is_none());
        assert_eq!(layout.hud.height, 1);
        assert_eq!(layout.keys.height, 1);
        assert_eq!(layout.field.width, 78);
        assert_eq!(layout.field.height, 36);
    }

    #[test]
    fn test_population_layout_adds_flock_panel() {
        let inner = Rect::new(1, 1, 78, 38);
        let layout = screen_layout(inner, 50);
        let flock = layout.flock.unwrap();
        assert_eq!(flock.width, FLOCK_PANEL_WIDTH);
        assert_eq!(layout.field.width + flock.width, 78);
        assert_eq!(flock.y, layout.field.y);
    }

    #[test]
    fn test_narrow_screen_drops_flock_panel() {
        let layout = screen_layout(Rect::new(0, 0, 30, 20), 50);
        assert!(layout.flock.is_none());
    }

    #[test]
    fn test_hud_text_lists_population_and_gap() {
        let snapshot = population_snapshot(5);
        let text = hud_text(&snapshot);
        assert!(text.starts_with(" Score 0 · Tick 0 · Alive 5/5 · Gap "));
        assert_eq!(screen_title(&snapshot), " Flappy Bird · Gen 3 ");

        let solo = session().snapshot();
        assert!(!hud_text(&solo).contains("Alive"));
        assert_eq!(screen_title(&solo), " Flappy Bird ");
    }

    #[test]
    fn test_flock_rows_wrap_by_width() {
        let mut snapshot = population_snapshot(7);
        snapshot.agents[4].status = AgentStatus::Dead;
        let rows = flock_rows(&snapshot, 3);
        assert_eq!(rows.iter().map(Vec::len).collect::<Vec<_>>(), vec![3, 3, 1]);
        assert_eq!(rows[1][1], AgentStatus::Dead);
        assert!(flock_rows(&snapshot, 0).is_empty());
    }

    #[test]
    fn test_result_heading_per_reason() {
        assert_eq!(result_heading(Some(OverReason::ScoreCeiling)).0, "Ceiling reached");
        assert_eq!(result_heading(Some(OverReason::AllAgentsDead)).1, Color::Red);
        assert_eq!(result_heading(Some(OverReason::TickLimit)).0, "Out of time");
    }

    #[test]
    fn test_rasterize_empty_area() {
        let session = session();
        let dims = SceneDims::from_session(&session);
        assert!(rasterize(&session.snapshot(), &dims, 0, 10).is_empty());
    }
}
