use std::collections::HashSet;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{Cell, EndReason, Grid, Phase, RenderSnapshot};
use crate::metrics::GameMetrics;

/// Presentation-only settings owned by the front end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
    /// Draw a dot in every empty cell
    pub show_grid: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self { show_grid: true }
    }
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        snapshot: &RenderSnapshot,
        grid: &Grid,
        view: ViewOptions,
        metrics: &GameMetrics,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(snapshot, metrics), chunks[0]);
        frame.render_widget(self.render_grid(snapshot, grid, view, chunks[1]), chunks[1]);

        match snapshot.phase {
            Phase::Ended => {
                let popup = centered(chunks[1], 40, 9);
                frame.render_widget(Clear, popup);
                frame.render_widget(self.render_game_over(snapshot, metrics), popup);
            }
            Phase::Idle => {
                let popup = centered(chunks[1], 30, 3);
                frame.render_widget(Clear, popup);
                frame.render_widget(
                    Paragraph::new("Get ready...")
                        .alignment(Alignment::Center)
                        .block(Block::default().borders(Borders::ALL)),
                    popup,
                );
            }
            Phase::Running => {}
        }

        frame.render_widget(self.render_controls(), chunks[2]);
    }

    fn render_grid(
        &self,
        snapshot: &RenderSnapshot,
        grid: &Grid,
        view: ViewOptions,
        area: Rect,
    ) -> Paragraph<'_> {
        let (width, height) = grid.cell_count();
        let body: HashSet<Cell> = snapshot.segments.iter().copied().collect();
        let head = snapshot.head();
        let empty = if view.show_grid { "· " } else { "  " };

        // Only cells that fit inside the border are built, following the head
        let focus = head.unwrap_or_else(|| grid.center());
        let columns = visible_range(width, area.width.saturating_sub(2) as u32 / 2, focus.x);
        let rows = visible_range(height, area.height.saturating_sub(2) as u32, focus.y);

        let lines: Vec<Line> = rows
            .map(|y| {
                let spans: Vec<Span> = columns
                    .clone()
                    .map(|x| {
                        let cell = Cell::new(x, y);
                        if Some(cell) == head {
                            Span::styled(
                                "■ ",
                                Style::default()
                                    .fg(Color::Cyan)
                                    .add_modifier(Modifier::BOLD),
                            )
                        } else if body.contains(&cell) {
                            Span::styled("□ ", Style::default().fg(Color::Red))
                        } else if Some(cell) == snapshot.food {
                            Span::styled(
                                "● ",
                                Style::default()
                                    .fg(Color::Yellow)
                                    .add_modifier(Modifier::BOLD),
                            )
                        } else {
                            Span::styled(empty, Style::default().fg(Color::DarkGray))
                        }
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Thick)
                    .border_style(Style::default().fg(Color::Blue))
                    .title(" Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, snapshot: &RenderSnapshot, metrics: &GameMetrics) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(snapshot.score.to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("Speed: ", label),
            Span::styled(snapshot.speed_level.to_string(), value),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(metrics.best_score.to_string(), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
        ]);

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_game_over(&self, snapshot: &RenderSnapshot, metrics: &GameMetrics) -> Paragraph<'_> {
        let (title, color) = match snapshot.end_reason {
            Some(EndReason::BoardCleared) => ("BOARD CLEARED!", Color::Green),
            _ => ("GAME OVER", Color::Red),
        };
        let cause = match snapshot.end_reason {
            Some(EndReason::Wall) => "You hit the wall",
            Some(EndReason::SelfCollision) => "You bit yourself",
            Some(EndReason::BoardCleared) => "No room left for food",
            None => "",
        };

        let text = vec![
            Line::from(Span::styled(
                title,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(cause, Style::default().fg(Color::Gray))),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    snapshot.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(
                    format!("Games: {}", metrics.games_played),
                    Style::default().fg(Color::Gray),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Play again? ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" / quit ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(color)),
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("Space", Style::default().fg(Color::Cyan)),
            Span::raw(" grid | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ]);

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// A `width` x `height` rect centered in `area`, clipped to fit
/// The `visible` consecutive indices out of `0..len` that keep `focus` near
/// the middle
fn visible_range(len: u32, visible: u32, focus: i32) -> std::ops::Range<i32> {
    if len <= visible {
        return 0..len as i32;
    }
    let max_start = (len - visible) as i64;
    let start = (focus as i64 - visible as i64 / 2).clamp(0, max_start) as i32;
    start..start + visible as i32
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    popup
}
