//! The sweeping graph frame loop.
//!
//! Loads and validates configuration, builds the stream (pacing source,
//! demo generators, sweep writer), and drives it from the display refresh
//! loop: each frame reads the monotonic clock, ticks the stream, and renders
//! the window buffers. Supports an external pause/resume trigger via SIGUSR1.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::SweepscopeConfig;
use crate::sweep::{demo_channels, PacingSource, SweepStream, SweepWriter};
use crate::ui::{ErrorScreen, ScopeCommand, ScopeTui};

/// Refresh budget per frame (~60 FPS).
const FRAME_BUDGET: Duration = Duration::from_millis(16);

/// Command-line overrides for the stream configuration.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunOverrides {
    pub channels: Option<usize>,
    pub sample_rate: Option<u32>,
    pub time_view_ms: Option<u32>,
    pub seed: Option<u64>,
}

/// Runs the sweeping real-time graph until the user quits.
///
/// # Errors
/// - If the configuration is invalid
/// - If the terminal UI cannot be initialized
pub async fn handle_run(overrides: RunOverrides) -> Result<(), anyhow::Error> {
    tracing::info!("=== sweepscope started ===");

    let mut config = match SweepscopeConfig::load() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("Failed to load configuration: {err}");
            show_error_screen(&format!(
                "Configuration Error:\n\n{err}\n\nPlease check your ~/.config/sweepscope/sweepscope.toml file and try again."
            ))?;
            return Err(anyhow::anyhow!("Configuration error: {err}"));
        }
    };

    if let Some(channels) = overrides.channels {
        config.stream.channel_count = channels;
    }
    if let Some(sample_rate) = overrides.sample_rate {
        config.stream.sample_rate = sample_rate;
    }
    if let Some(time_view_ms) = overrides.time_view_ms {
        config.window.time_view_ms = time_view_ms;
    }
    if let Some(seed) = overrides.seed {
        config.stream.seed = Some(seed);
    }

    if let Err(err) = config.validate() {
        tracing::error!("Invalid configuration: {err}");
        show_error_screen(&format!("Configuration Error:\n\n{err}"))?;
        return Err(err);
    }

    tracing::info!(
        "Configuration: {} channels @ {}Hz, {}ms window ({} slots), gap {:.1}%, catch-up {}ms",
        config.stream.channel_count,
        config.stream.sample_rate,
        config.window.time_view_ms,
        config.capacity(),
        config.window.gap_fraction * 100.0,
        config.stream.max_catch_up_ms
    );

    let pacing = PacingSource::new(
        config.stream.sample_rate,
        config.stream.max_catch_up_ms as f64,
    );
    let writer = SweepWriter::new(
        config.capacity(),
        config.stream.channel_count,
        config.window.gap_fraction,
    )?;
    let generators = demo_channels(
        config.stream.channel_count,
        config.stream.seed.unwrap_or(0),
    );
    let mut stream = SweepStream::new(pacing, generators, writer)?;

    let mut tui = ScopeTui::new(
        config.window.axis_count,
        config.stream.sample_rate,
        FRAME_BUDGET,
    )
    .map_err(|e| anyhow::anyhow!("Failed to initialize UI: {e}"))?;

    // SIGUSR1 toggles pause externally, e.g. from a window manager keybind
    let pause_signal = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGUSR1, pause_signal.clone())
        .map_err(|e| anyhow::anyhow!("Failed to register signal handler: {e}"))?;

    tracing::debug!("Entering frame loop. Press 'q' or Escape to quit, Space to pause.");
    let clock = Instant::now();
    let result = frame_loop(&mut stream, &mut tui, &pause_signal, clock);

    tui.cleanup()
        .map_err(|e| anyhow::anyhow!("Failed to restore terminal: {e}"))?;

    tracing::info!("sweepscope stopped");
    result
}

/// Drives the stream once per display refresh until the user quits.
fn frame_loop(
    stream: &mut SweepStream<crate::sweep::DemoWave>,
    tui: &mut ScopeTui,
    pause_signal: &AtomicBool,
    clock: Instant,
) -> Result<(), anyhow::Error> {
    loop {
        let command = tui.handle_input()?;

        if pause_signal.swap(false, Ordering::Relaxed) {
            tui.is_paused = !tui.is_paused;
            tracing::info!(
                "Received SIGUSR1: {}",
                if tui.is_paused { "pausing" } else { "resuming" }
            );
            if !tui.is_paused {
                stream.resync(clock.elapsed().as_secs_f64() * 1000.0);
            }
        }

        match command {
            ScopeCommand::Quit => return Ok(()),
            ScopeCommand::TogglePause => {
                // handle_input already flipped the flag; on resume, drop the
                // paused interval instead of producing a catch-up batch
                if !tui.is_paused {
                    stream.resync(clock.elapsed().as_secs_f64() * 1000.0);
                }
            }
            ScopeCommand::Continue => {}
        }

        if !tui.is_paused {
            let now_ms = clock.elapsed().as_secs_f64() * 1000.0;
            stream.tick(now_ms);
        }

        tui.render(stream.writer())?;
    }
}

/// Shows an error on a dedicated full-screen TUI, then restores the terminal.
fn show_error_screen(message: &str) -> Result<(), anyhow::Error> {
    let mut error_screen = ErrorScreen::new()?;
    error_screen.show_error(message)?;
    error_screen.cleanup()?;
    Ok(())
}
