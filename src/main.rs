//! A scroll-driven 3D card stack for browsing a project portfolio in the
//! terminal.
//!
//! Run the binary to browse the built-in demo gallery, or pass
//! `--gallery <file.json>` to load your own.  `--dump-gallery` prints the
//! gallery as JSON, which is a handy starting point for writing one.

mod app;
mod config;
mod core;
mod ui;

use std::fs::File;
use std::io::{self, Stdout};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::Rect,
    widgets::Paragraph,
    Frame, Terminal,
};
use tokio::time::MissedTickBehavior;

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    state::AppState,
    texture_runtime::{self, TextureUpdate},
};
use crate::core::gallery::Gallery;
use crate::ui::{
    detail_widget::DetailPanel, nav_widget::NavRail, spinner::LoadingIndicator,
    stage_widget::StageWidget, theme::Theme,
};

/// Longest frame step fed to the animation; longer stalls are clamped.
const MAX_FRAME_DT: f32 = 0.1;

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Scroll-driven 3D portfolio card stack")]
struct Cli {
    /// Gallery JSON file (defaults to the built-in demo).
    #[arg(long)]
    gallery: Option<PathBuf>,

    /// Frames per second (overrides the config file).
    #[arg(long)]
    fps: Option<u32>,

    /// Vertical gap between stacked cards (overrides the config file).
    #[arg(long)]
    gap: Option<f32>,

    /// Print the gallery as JSON and exit.
    #[arg(long = "dump-gallery")]
    dump_gallery: bool,

    /// Write logs to this file instead of stderr.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    /// Write the effective configuration (file plus flags) to the config
    /// path and exit.
    #[arg(long = "write-config")]
    write_config: bool,
}

fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr) // the UI owns stdout
                .init();
        }
    }
    Ok(())
}

// ───────────────────────────────────────── drawing ───────────

fn draw(frame: &mut Frame, state: &mut AppState) {
    state.terminal_area = frame.area();
    let layout = state.layout();
    let viewing = state.frame.mode.is_viewing();

    state.stage_hits = StageWidget {
        frame: &state.frame,
        gallery: state.stage.gallery(),
        textures: &state.textures,
    }
    .render_and_hit(layout.stage_area, frame.buffer_mut());

    if let (Some(area), Some(item)) = (layout.detail_area, state.stage.open_item()) {
        frame.render_widget(
            DetailPanel {
                item,
                offset: state.scroll.offset(),
                dominant: state.frame.blend.map_or(0, |b| b.dominant()),
            },
            area,
        );
    }

    let rail_canvas = Rect {
        width: layout.stage_area.width + layout.rail_area.width,
        ..layout.stage_area
    };
    state.nav_hits = NavRail {
        gallery: state.stage.gallery(),
        highlighted: state.frame.indicator_index(),
        viewing,
        hovered: state.nav_hovered,
    }
    .render_and_hit(layout.rail_area, rail_canvas, frame.buffer_mut());

    frame.render_widget(
        Paragraph::new(status_line(state)).style(Theme::status_bar_style()),
        layout.status_area,
    );

    if state.textures.is_loading() {
        frame.render_widget(
            LoadingIndicator {
                pending: state.textures.pending_count(),
                tick: state.tick / 3,
            },
            layout.stage_area,
        );
    }
}

fn apply_texture_update(state: &mut AppState, update: TextureUpdate) {
    if let Err(e) = &update.result {
        state.status_message = Some(e.to_string());
    }
    state.textures.finish(update.reference, update.result);
}

/// Scroll position followed by either the status message or the key hints.
fn status_line(state: &AppState) -> String {
    let percent = (state.frame.progress * 100.0).round() as u32;
    match &state.status_message {
        Some(message) => format!("{percent:>3}% │ {message}"),
        None => format!(
            "{percent:>3}% │ {}",
            state.config.status_bar_hint(state.frame.mode.is_viewing())
        ),
    }
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref())?;

    let gallery = match &cli.gallery {
        Some(path) => Gallery::load(path).with_context(|| format!("cannot load gallery {}", path.display()))?,
        None => Gallery::demo(),
    };

    if cli.dump_gallery {
        println!("{}", gallery.to_json()?);
        return Ok(());
    }

    let mut user_config = config::AppConfig::load();
    if let Some(fps) = cli.fps {
        user_config.motion.fps = fps.clamp(5, 120);
    }
    if let Some(gap) = cli.gap.filter(|g| g.is_finite() && *g > 0.0) {
        user_config.motion.gap = gap;
    }

    if cli.write_config {
        let path = config::config_path();
        user_config.save_to(&path)?;
        println!("{}", path.display());
        return Ok(());
    }

    tracing::info!(items = gallery.len(), fps = user_config.motion.fps, "starting");

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, gallery, user_config).await;

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    gallery: Gallery,
    user_config: config::AppConfig,
) -> Result<()> {
    let size = terminal.size()?;
    let frame_interval = user_config.motion.frame_interval();
    let mut state = AppState::new(gallery, user_config, Rect::new(0, 0, size.width, size.height));

    // ── async channels ────────────────────────────────────────
    let mut events = spawn_event_reader();
    let (texture_tx, mut texture_rx) = tokio::sync::mpsc::unbounded_channel::<TextureUpdate>();
    let refs = state.stage.gallery().image_refs();
    texture_runtime::request_all(&mut state.textures, refs.iter().map(String::as_str), &texture_tx);

    let mut ticker = tokio::time::interval(frame_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_frame = Instant::now();

    // ── event loop ────────────────────────────────────────────
    loop {
        terminal.draw(|frame| draw(frame, &mut state))?;

        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                let now = Instant::now();
                match event {
                    AppEvent::Key(k) => handler::handle_key(&mut state, k, now),
                    AppEvent::Mouse(m) => handler::handle_mouse(&mut state, m, now),
                    AppEvent::Resize(w, h) => state.terminal_area = Rect::new(0, 0, w, h),
                }
            }

            Some(update) = texture_rx.recv() => {
                apply_texture_update(&mut state, update);
                // Drain everything currently queued before redrawing.
                while let Ok(update) = texture_rx.try_recv() {
                    apply_texture_update(&mut state, update);
                }
            }

            _ = ticker.tick() => {
                let now = Instant::now();
                let dt = now.duration_since(last_frame).as_secs_f32().min(MAX_FRAME_DT);
                last_frame = now;
                state.advance(dt, now);
            }
        }

        if state.should_quit {
            break;
        }
    }

    tracing::info!(frames = state.tick, "exiting");
    Ok(())
}
