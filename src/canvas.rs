use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Widget;

use crate::config::{GLYPH_CIRCLE, GridSize};
use crate::snake::Point;

/// Drawing target the game issues its render requests to.
pub trait RenderSurface {
    /// Wipes everything drawn so far.
    fn clear(&mut self);

    /// Draws a filled circle on the grid cell at `at`.
    fn draw_circle(&mut self, at: Point, color: Color);
}

/// In-memory grid of colored cells, shown on screen as a ratatui widget.
///
/// Each grid cell spans `cell_width` terminal columns and one row.
#[derive(Debug, Clone)]
pub struct CellCanvas {
    grid: GridSize,
    cell_width: u16,
    cells: Vec<Option<Color>>,
}

impl CellCanvas {
    /// # Panics
    ///
    /// Panics on a zero-sized grid or cell width.
    #[must_use]
    pub fn new(grid: GridSize, cell_width: u16) -> Self {
        assert!(
            grid.width > 0 && grid.height > 0 && cell_width > 0,
            "canvas needs a non-empty grid and cell width"
        );

        Self {
            grid,
            cell_width,
            cells: vec![None; usize::from(grid.width) * usize::from(grid.height)],
        }
    }

    /// Returns the surface size in terminal cells as `(columns, rows)`.
    #[must_use]
    pub fn surface_size(&self) -> (u16, u16) {
        (self.grid.width.saturating_mul(self.cell_width), self.grid.height)
    }

    /// Returns the size of the drawn playable window, walls excluded.
    #[must_use]
    pub fn interior_size(&self) -> (u16, u16) {
        (
            (self.grid.width - 1).saturating_mul(self.cell_width),
            self.grid.height - 1,
        )
    }

    /// Returns the color painted at `at`, if any.
    #[must_use]
    pub fn color_at(&self, at: Point) -> Option<Color> {
        self.index(at).and_then(|index| self.cells[index])
    }

    /// Returns the number of painted cells.
    #[must_use]
    pub fn painted(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    fn index(&self, at: Point) -> Option<usize> {
        let x = u16::try_from(at.x).ok()?;
        let y = u16::try_from(at.y).ok()?;
        if x >= self.grid.width || y >= self.grid.height {
            return None;
        }

        Some(usize::from(y) * usize::from(self.grid.width) + usize::from(x))
    }
}

impl RenderSurface for CellCanvas {
    fn clear(&mut self) {
        self.cells.fill(None);
    }

    fn draw_circle(&mut self, at: Point, color: Color) {
        if let Some(index) = self.index(at) {
            self.cells[index] = Some(color);
        }
    }
}

/// Renders the playable interior, cells `1..width` x `1..height`, from the
/// top-left of `area`. Whatever does not fit is clipped.
impl Widget for &CellCanvas {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for y in 1..self.grid.height {
            let row = area.y.saturating_add(y - 1);
            if row >= area.bottom() {
                break;
            }

            for x in 1..self.grid.width {
                let column = area.x.saturating_add((x - 1).saturating_mul(self.cell_width));
                if column >= area.right() {
                    break;
                }

                let point = Point::new(i32::from(x), i32::from(y));
                if let Some(color) = self.color_at(point) {
                    buf.set_string(column, row, GLYPH_CIRCLE, Style::new().fg(color));
                }
            }
        }
    }
}
