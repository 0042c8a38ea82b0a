#![allow(clippy::too_many_arguments)]

mod animations;
mod app;
mod config;
mod render;
mod theme;

use app::App;
use clap::Parser;
use config::{Args, Config};
use crossterm::{
    cursor::Show,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::LevelFilter;
use std::error::Error;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::time::{Duration, Instant};

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let config = match Config::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            return Err(e.into());
        }
    };

    if args.print_content {
        println!("{}", config.content.to_json()?);
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    // Run the app
    let result = run_app(&mut stdout, config);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout, Show, LeaveAlternateScreen, DisableMouseCapture)?;

    if let Err(e) = &result {
        log::error!("terminal error: {}", e);
    }
    result.map_err(Into::into)
}

/// Logs go to `log_file` at `info` when given. Without one they go to
/// stderr as they happen, filtered to `error` so the alternate screen
/// stays clean. A `RUST_LOG` above that writes into the screen.
fn init_logging(log_file: Option<&Path>) -> io::Result<()> {
    let mut builder = env_logger::Builder::new();
    match log_file {
        Some(path) => {
            let file = File::create(path)?;
            builder
                .filter_level(LevelFilter::Info)
                .target(env_logger::Target::Pipe(Box::new(file)));
        }
        None => {
            builder.filter_level(LevelFilter::Error);
        }
    }
    // RUST_LOG wins over the defaults above
    builder.parse_default_env().init();
    Ok(())
}

fn run_app(stdout: &mut io::Stdout, config: Config) -> io::Result<()> {
    let mut app = App::new(config);
    let started = Instant::now();
    let mut last_tick = Instant::now();

    log::info!("starting at stage {}", app.stage());

    loop {
        let tick_rate = app.get_tick_rate();

        render::render(stdout, &mut app)?;
        stdout.flush()?;

        // Handle input with timeout for animation updates
        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout.min(Duration::from_millis(33)))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if key.modifiers.contains(KeyModifiers::CONTROL)
                        && key.code == KeyCode::Char('c')
                    {
                        break;
                    }
                    match app.handle_key(key) {
                        app::AppAction::Continue => {}
                        app::AppAction::Quit => break,
                    }
                }
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                Event::Resize(width, height) => app.resize(width, height),
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick_at(started.elapsed());
            last_tick = Instant::now();
        }
    }

    log::info!("leaving at stage {}", app.stage());
    Ok(())
}
