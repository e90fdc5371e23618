//! Terminal user interface for the sweeping multi-channel graph.
//!
//! Renders every channel's window buffer onto a braille canvas, channels
//! stacked into horizontal lanes, with a status footer showing stream
//! parameters and a frame-rate meter.

use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::*,
    symbols::Marker,
    widgets::canvas::{Canvas, Line as CanvasLine},
    widgets::Paragraph,
};
use std::io::{stdout, Stdout};
use std::time::Instant;

use crate::sweep::SweepWriter;

/// User input command during streaming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeCommand {
    /// Keep streaming (no key pressed)
    Continue,
    /// Exit the scope (Escape, 'q', or Ctrl+C)
    Quit,
    /// Pause/resume the stream (Space key)
    TogglePause,
}

/// Trace colors, cycled across channels.
const PALETTE: [Color; 8] = [
    Color::Rgb(230, 180, 80),
    Color::Rgb(200, 140, 60),
    Color::Rgb(240, 210, 130),
    Color::Rgb(170, 120, 70),
    Color::Rgb(250, 190, 100),
    Color::Rgb(210, 170, 110),
    Color::Rgb(190, 150, 90),
    Color::Rgb(235, 200, 150),
];

/// Terminal UI for the sweeping real-time graph.
///
/// Owns the terminal, the pause flag, and the FPS meter. The buffers it
/// draws are owned by the sweep writer; this type only reads them.
pub struct ScopeTui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    axis_count: usize,
    sample_rate: u32,
    frame_budget: std::time::Duration,
    frames: u32,
    fps: f64,
    fps_window_start: Instant,
    /// Whether the stream is currently paused
    pub is_paused: bool,
}

impl ScopeTui {
    /// Creates a new TUI instance and enters alternate screen mode.
    ///
    /// `frame_budget` is how long input polling blocks each frame; it sets
    /// the refresh ceiling (16 ms for ~60 FPS).
    ///
    /// # Errors
    /// - If terminal cannot be initialized
    /// - If raw mode cannot be enabled
    /// - If alternate screen cannot be entered
    pub fn new(
        axis_count: usize,
        sample_rate: u32,
        frame_budget: std::time::Duration,
    ) -> anyhow::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(ScopeTui {
            terminal,
            axis_count,
            sample_rate,
            frame_budget,
            frames: 0,
            fps: 0.0,
            fps_window_start: Instant::now(),
            is_paused: false,
        })
    }

    /// Renders one frame: all channel traces plus the status footer.
    ///
    /// NaN slots (the sweep gap and never-written space) are not connected;
    /// each line segment is drawn only between two finite neighbors.
    ///
    /// # Errors
    /// - If terminal rendering fails
    pub fn render(&mut self, writer: &SweepWriter) -> anyhow::Result<()> {
        self.update_fps();

        // Copy these values before the draw closure to avoid borrow issues
        let axis_count = self.axis_count;
        let sample_rate = self.sample_rate;
        let fps = self.fps;
        let is_paused = self.is_paused;

        self.terminal.draw(|frame| {
            let area = frame.area();
            let footer_height = 1;

            let content_area = Rect {
                x: area.x,
                y: area.y,
                width: area.width,
                height: area.height.saturating_sub(footer_height),
            };

            // One braille cell is two pixels wide; don't draw finer than that.
            let pixel_width = (content_area.width as usize * 2).max(1);
            let stride = (writer.capacity() / pixel_width).max(1);

            let canvas = Canvas::default()
                .marker(Marker::Braille)
                .x_bounds([0.0, writer.capacity() as f64])
                .y_bounds([0.0, axis_count as f64])
                .paint(|ctx| {
                    for channel in 0..writer.channel_count() {
                        let slots = writer.channel(channel);
                        let lane = channel % axis_count;
                        // Lanes stack top to bottom, traces centered in each
                        let base = (axis_count - 1 - lane) as f64 + 0.5;
                        let color = PALETTE[channel % PALETTE.len()];

                        let mut x = 0usize;
                        while x + stride < slots.len() {
                            let y1 = slots[x];
                            let y2 = slots[x + stride];
                            if y1.is_finite() && y2.is_finite() {
                                ctx.draw(&CanvasLine {
                                    x1: x as f64,
                                    y1: base + y1 * 0.45,
                                    x2: (x + stride) as f64,
                                    y2: base + y2 * 0.45,
                                    color,
                                });
                            }
                            x += stride;
                        }
                    }
                });

            frame.render_widget(canvas, content_area);

            let footer_area = Rect {
                x: area.x,
                y: area.y + area.height.saturating_sub(footer_height),
                width: area.width,
                height: footer_height,
            };

            let indicator = if is_paused {
                Span::styled("⏸ ", Style::default().fg(Color::Yellow))
            } else {
                Span::styled("● ", Style::default().fg(Color::Red))
            };

            let status = Line::from(vec![
                indicator,
                Span::raw(format!(
                    "{} ch @ {} Hz / FPS={:.1} / space pause / q quit",
                    writer.channel_count(),
                    sample_rate,
                    fps
                )),
            ]);

            let footer = Paragraph::new(status).style(
                Style::default()
                    .fg(Color::Rgb(185, 207, 212))
                    .bg(Color::Rgb(0, 0, 0)),
            );

            frame.render_widget(footer, footer_area);
        })?;

        Ok(())
    }

    /// Updates the FPS meter over a rolling two-second window.
    fn update_fps(&mut self) {
        self.frames += 1;
        let elapsed = self.fps_window_start.elapsed();
        if elapsed.as_millis() > 2000 {
            self.fps = self.frames as f64 / elapsed.as_secs_f64();
            self.frames = 0;
            self.fps_window_start = Instant::now();
        }
    }

    /// Processes user input and returns the appropriate scope command.
    ///
    /// Blocks for up to the frame budget waiting for a key, which paces the
    /// frame loop. All unrecognized keys are ignored.
    ///
    /// # Returns
    /// - `Continue` if no key or unrecognized key was pressed
    /// - `Quit` if Escape, 'q', or Ctrl+C was pressed
    /// - `TogglePause` if Space was pressed
    ///
    /// # Errors
    /// - If event polling fails
    pub fn handle_input(&mut self) -> anyhow::Result<ScopeCommand> {
        if event::poll(self.frame_budget)? {
            if let Event::Key(key) = event::read()? {
                return Ok(match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => {
                        tracing::debug!("Escape or 'q' pressed: quitting");
                        ScopeCommand::Quit
                    }
                    KeyCode::Char('c')
                        if key
                            .modifiers
                            .contains(crossterm::event::KeyModifiers::CONTROL) =>
                    {
                        tracing::debug!("Ctrl+C pressed: quitting");
                        ScopeCommand::Quit
                    }
                    KeyCode::Char(' ') => {
                        tracing::debug!("Space pressed: toggling pause");
                        self.is_paused = !self.is_paused;
                        ScopeCommand::TogglePause
                    }
                    _ => ScopeCommand::Continue,
                });
            }
        }
        Ok(ScopeCommand::Continue)
    }

    /// Cleans up terminal state and exits alternate screen mode.
    ///
    /// # Errors
    /// - If terminal mode cannot be disabled
    /// - If cursor cannot be shown
    pub fn cleanup(&mut self) -> anyhow::Result<()> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            crossterm::terminal::LeaveAlternateScreen
        )?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}
