/// Wireframe rasterizer for terminal rendering
use crossterm::{
    cursor,
    event::{self, Event},
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use kframe_core::coordinates::flip_vertical;
use kframe_core::{Face, Renderer, Result};
use log::warn;
use nalgebra::Point2;
use std::io::Write;
use std::time::Duration;

use crate::input::is_cancel;

const EDGE_CHAR: char = '#';
const VERTEX_CHAR: char = '@';

/// Character grid that face edges are rasterized into
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<char>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![' '; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.cells.fill(' ');
    }

    pub fn get(&self, x: usize, y: usize) -> Option<char> {
        if x < self.width && y < self.height {
            Some(self.cells[y * self.width + x])
        } else {
            None
        }
    }

    /// Set one cell; anything off the grid is dropped
    pub fn plot(&mut self, x: i64, y: i64, c: char) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.cells[y as usize * self.width + x as usize] = c;
        }
    }

    /// Bresenham line between two cells, endpoints included
    pub fn line(&mut self, from: (i64, i64), to: (i64, i64), c: char) {
        let (mut x, mut y) = from;
        let dx = (to.0 - x).abs();
        let dy = -(to.1 - y).abs();
        let sx = if x < to.0 { 1 } else { -1 };
        let sy = if y < to.1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.plot(x, y, c);
            if (x, y) == to {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        self.cells
            .chunks(self.width.max(1))
            .take(self.height)
            .map(|row| row.iter().collect())
    }
}

/// Draws projected wireframes on a terminal
///
/// Projected points are in screen units with y pointing up. They are
/// flipped against the screen height and scaled onto the canvas, one row
/// below the status line.
pub struct WireframeRenderer<W: Write> {
    canvas: Canvas,
    screen_width: f64,
    screen_height: f64,
    frame_duration: Duration,
    status: String,
    writer: W,
}

impl<W: Write> WireframeRenderer<W> {
    pub fn new(
        writer: W,
        columns: u16,
        rows: u16,
        screen: (u32, u32),
        frame_duration: Duration,
    ) -> Self {
        Self {
            canvas: Canvas::new(columns as usize, rows.saturating_sub(1) as usize),
            screen_width: f64::from(screen.0),
            screen_height: f64::from(screen.1),
            frame_duration,
            status: String::new(),
            writer,
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn resize(&mut self, columns: u16, rows: u16) {
        self.canvas = Canvas::new(columns as usize, rows.saturating_sub(1) as usize);
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Canvas cell for a flipped screen point. Points far outside the grid
    /// map to `None` so degenerate projections never stall the line loop.
    fn to_cell(&self, point: &Point2<f64>) -> Option<(i64, i64)> {
        let x = point.x * self.canvas.width().saturating_sub(1) as f64 / self.screen_width;
        let y = point.y * self.canvas.height().saturating_sub(1) as f64 / self.screen_height;
        let limit = 4.0 * self.canvas.width().max(self.canvas.height()) as f64;
        if x.is_finite() && y.is_finite() && x.abs() <= limit && y.abs() <= limit {
            Some((x.round() as i64, y.round() as i64))
        } else {
            None
        }
    }

    /// Rasterize face outlines into the canvas without printing
    pub fn rasterize(&mut self, points: &[Point2<f64>], faces: &[Face]) {
        self.canvas.clear();
        let cells: Vec<Option<(i64, i64)>> = flip_vertical(points, self.screen_height)
            .iter()
            .map(|p| self.to_cell(p))
            .collect();

        for face in faces {
            for (a, b) in face.edges() {
                if let (Some(Some(from)), Some(Some(to))) = (cells.get(a), cells.get(b)) {
                    self.canvas.line(*from, *to, EDGE_CHAR);
                }
            }
        }
        for &(x, y) in cells.iter().flatten() {
            self.canvas.plot(x, y, VERTEX_CHAR);
        }
    }

    fn present(&mut self) -> std::io::Result<()> {
        self.writer.queue(cursor::MoveTo(0, 0))?;
        self.writer.queue(SetForegroundColor(Color::Yellow))?;
        self.writer.queue(Print(&self.status))?;
        self.writer.queue(SetForegroundColor(Color::Cyan))?;
        for (row, line) in self.canvas.rows().enumerate() {
            self.writer.queue(cursor::MoveTo(0, row as u16 + 1))?;
            self.writer.queue(Print(line))?;
        }
        self.writer.queue(ResetColor)?;
        self.writer.flush()
    }
}

impl<W: Write> Renderer for WireframeRenderer<W> {
    fn draw(&mut self, points: &[Point2<f64>], faces: &[Face]) -> Result<()> {
        self.rasterize(points, faces);
        self.present()?;
        Ok(())
    }

    fn wait_frame(&mut self) -> Result<()> {
        std::thread::sleep(self.frame_duration);
        Ok(())
    }

    fn keep_playing(&mut self) -> bool {
        loop {
            match event::poll(Duration::ZERO) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) if is_cancel(&key) => return false,
                    Ok(Event::Resize(columns, rows)) => self.resize(columns, rows),
                    Ok(_) => {}
                    Err(e) => {
                        warn!("failed to read terminal event: {e}");
                        return true;
                    }
                },
                Ok(false) => return true,
                Err(e) => {
                    warn!("failed to poll terminal events: {e}");
                    return true;
                }
            }
        }
    }
}
