//! Terminal rendering: layout, the pixel canvas the board is painted on,
//! and the statistics panel.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
    Frame,
};

use crate::app::App;
use crate::grid::{Grid, Size};
use crate::mapper::{cell_squares, Square};

pub const BORDER_COLOR: Color = Color::Black;
pub const LIVE_COLOR: Color = Color::Red;
pub const DEAD_COLOR: Color = Color::DarkGray;

/// Pixels trimmed from each side of a cell to leave a grid line.
pub const CELL_MARGIN: u32 = 1;

const BOARD_TITLE: &str = "Game of Life [Space: Play/Pause | Enter: Step | Up/Down: Speed | Click: Toggle | q: Quit]";

/// Screen areas for the board and the statistics panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Panes {
    pub board: Rect,
    pub stats: Rect,
}

impl Panes {
    pub fn split(area: Rect) -> Panes {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(75), Constraint::Percentage(25)].as_ref())
            .split(area);
        Panes {
            board: chunks[0],
            stats: chunks[1],
        }
    }

    /// The drawable part of the board pane, inside its border.
    pub fn board_inner(&self) -> Rect {
        board_block().inner(self.board)
    }

    /// Board size in pixels. Every terminal cell is two pixels tall.
    pub fn window(&self) -> Size {
        let inner = self.board_inner();
        Size::new(u32::from(inner.width), u32::from(inner.height) * 2)
    }
}

fn board_block() -> Block<'static> {
    Block::default().borders(Borders::ALL).title(BOARD_TITLE)
}

/// A framebuffer of colours. Pixels that were never painted stay `None`.
#[derive(Debug, Clone)]
pub struct PixelCanvas {
    size: Size,
    pixels: Vec<Option<Color>>,
}

impl PixelCanvas {
    pub fn new(size: Size) -> Self {
        PixelCanvas {
            size,
            pixels: vec![None; size.area()],
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        if x < self.size.width && y < self.size.height {
            self.pixels[(y * self.size.width + x) as usize]
        } else {
            None
        }
    }

    /// Fills a square, clipped to the canvas.
    pub fn fill_square(&mut self, square: Square, color: Color) {
        let x_end = (square.x + square.side).min(self.size.width);
        let y_end = (square.y + square.side).min(self.size.height);
        for y in square.y..y_end {
            let row = (y * self.size.width) as usize;
            for x in square.x..x_end {
                self.pixels[row + x as usize] = Some(color);
            }
        }
    }

    /// Paints every cell of `grid`: a border-coloured square, then the
    /// inset live or dead square on top.
    pub fn paint(grid: &Grid, scale: u32, window: Size) -> Self {
        let mut canvas = PixelCanvas::new(window);
        if scale == 0 {
            return canvas;
        }
        for (pos, alive) in grid.cells() {
            let (outer, inner) = cell_squares(pos.x as u32, pos.y as u32, scale, CELL_MARGIN);
            canvas.fill_square(outer, BORDER_COLOR);
            canvas.fill_square(inner, if alive { LIVE_COLOR } else { DEAD_COLOR });
        }
        canvas
    }

    /// Copies the canvas into `area`, two pixels per terminal cell using the
    /// upper half block glyph.
    fn render_into(&self, area: Rect, buf: &mut Buffer) {
        for row in 0..area.height {
            for col in 0..area.width {
                let px = u32::from(col);
                let py = u32::from(row) * 2;
                let top = self.get(px, py);
                let bottom = self.get(px, py + 1);
                if top.is_none() && bottom.is_none() {
                    continue;
                }
                buf.get_mut(area.x + col, area.y + row)
                    .set_symbol("▀")
                    .set_fg(top.unwrap_or(Color::Reset))
                    .set_bg(bottom.unwrap_or(Color::Reset));
            }
        }
    }
}

/// The bordered board pane.
pub struct Board<'a> {
    app: &'a App,
}

impl<'a> Board<'a> {
    pub fn new(app: &'a App) -> Self {
        Board { app }
    }
}

impl Widget for Board<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = board_block();
        let inner = block.inner(area);
        block.render(area, buf);
        let window = Size::new(u32::from(inner.width), u32::from(inner.height) * 2);
        PixelCanvas::paint(self.app.grid(), self.app.scale(), window).render_into(inner, buf);
    }
}

fn stats_text(app: &App) -> String {
    let stats = app.stats();
    let (memory_used, memory_total) = app.memory_kb();
    format!(
        "Statistics:\n\
        Generation: {}\n\
        Current Population: {}\n\
        Cells Created: {}\n\
        Cells Destroyed: {}\n\
        Birth Rate: {:.2}/gen\n\
        Death Rate: {:.2}/gen\n\
        Grid: {}x{}\n\
        Scale: {}px/cell\n\
        Step Delay: {}ms\n\
        Memory Usage: {}KB/{:.2}MB\n\
        Status: {}\n",
        stats.generation,
        stats.current_population,
        stats.cells_created,
        stats.cells_destroyed,
        stats.birth_rate(),
        stats.death_rate(),
        app.grid().width(),
        app.grid().height(),
        app.scale(),
        app.delay_ms(),
        memory_used,
        memory_total as f64 / 1024.0,
        if app.running() { "Running" } else { "Paused" }
    )
}

/// Draws the statistics panel.
fn draw_stats(f: &mut Frame, app: &App, area: Rect) {
    let stats_widget = Paragraph::new(stats_text(app))
        .style(Style::default().fg(Color::White))
        .block(Block::default().borders(Borders::ALL).title("Statistics"))
        .wrap(Wrap { trim: true });

    f.render_widget(stats_widget, area);
}

/// Draws one full frame.
pub fn draw(f: &mut Frame, app: &App) {
    let panes = Panes::split(f.size());
    f.render_widget(Board::new(app), panes.board);
    draw_stats(f, app, panes.stats);
}
