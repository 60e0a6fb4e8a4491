use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::Frame;

use crate::canvas::CellCanvas;
use crate::config::{BORDER_HALF_BLOCK, Theme};
use crate::game::{DeathReason, GameStatus};
use crate::ui::overlay::render_game_over;

/// Renders the full frame: walls, the canvas contents, and the game-over popup.
pub fn render(
    frame: &mut Frame<'_>,
    canvas: &CellCanvas,
    status: GameStatus,
    death_reason: Option<DeathReason>,
    theme: &Theme,
) {
    let (inner_width, inner_height) = canvas.interior_size();
    let board = centered_board(frame.area(), inner_width, inner_height);

    let block = Block::bordered()
        .border_set(BORDER_HALF_BLOCK)
        .border_style(Style::new().fg(theme.border_fg).bg(theme.border_bg));
    let inner = block.inner(board);
    frame.render_widget(block, board);
    frame.render_widget(canvas, inner);

    if status == GameStatus::Stopped {
        render_game_over(frame, board, death_reason, theme);
    }
}

/// Centers a bordered box around an `inner_width` x `inner_height` play field,
/// shrinking it to fit `area`.
fn centered_board(area: Rect, inner_width: u16, inner_height: u16) -> Rect {
    let width = inner_width.saturating_add(2).min(area.width);
    let height = inner_height.saturating_add(2).min(area.height);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;
    use ratatui::style::Color;
    use ratatui::Terminal;

    use crate::canvas::{CellCanvas, RenderSurface};
    use crate::config::{GridSize, THEME_CLASSIC};
    use crate::game::{DeathReason, GameStatus};
    use crate::snake::Point;

    use super::{centered_board, render};

    #[test]
    fn board_is_centered_with_border() {
        let board = centered_board(Rect::new(0, 0, 80, 40), 58, 29);

        assert_eq!(board, Rect::new(10, 5, 60, 31));
    }

    #[test]
    fn board_shrinks_to_small_terminals() {
        let board = centered_board(Rect::new(0, 0, 20, 10), 58, 29);

        assert_eq!(board, Rect::new(0, 0, 20, 10));
    }

    #[test]
    fn frame_shows_canvas_inside_walls() {
        let grid = GridSize {
            width: 6,
            height: 5,
        };
        let mut canvas = CellCanvas::new(grid, 2);
        canvas.draw_circle(Point::new(1, 1), Color::Green);

        let mut terminal = Terminal::new(TestBackend::new(12, 6)).expect("test terminal");
        terminal
            .draw(|frame| render(frame, &canvas, GameStatus::Running, None, &THEME_CLASSIC))
            .expect("draw should succeed");

        let buffer = terminal.backend().buffer();
        assert_eq!(buffer[(1, 1)].symbol(), "●");
        assert_eq!(buffer[(0, 1)].symbol(), "█");
    }

    #[test]
    fn stopped_game_shows_overlay() {
        let grid = GridSize {
            width: 30,
            height: 30,
        };
        let canvas = CellCanvas::new(grid, 2);

        let mut terminal = Terminal::new(TestBackend::new(60, 31)).expect("test terminal");
        terminal
            .draw(|frame| {
                render(
                    frame,
                    &canvas,
                    GameStatus::Stopped,
                    Some(DeathReason::WallCollision),
                    &THEME_CLASSIC,
                )
            })
            .expect("draw should succeed");

        let rendered: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(rendered.contains("GAME OVER"));
        assert!(rendered.contains("You hit the wall"));
    }
}
