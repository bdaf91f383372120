use imgbrowse::cli::{AppConfig, Args};
use imgbrowse::domain::{discover_images_with_options, AppState, ImageSlot};
use imgbrowse::error::Result;
use imgbrowse::loader::SyncImageLoader;
use imgbrowse::logging::init_logging;
use imgbrowse::preview::PreviewCache;
use imgbrowse::tui::{
    handle_help_input, handle_key_event, handle_mouse_event, render, render_help_overlay, Action,
    BrowserLayout, ViewState, THUMB_BOX,
};

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{fs, io, time::Duration};

fn main() {
    // Parse command line arguments; clap exits with status 2 on usage errors
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Convert to config
    let config: AppConfig = args.into();

    if let Err(e) = run_app_with_config(&config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Runs the TUI application with configuration
pub fn run_app_with_config(config: &AppConfig) -> Result<()> {
    if let Err(e) = init_logging(config.log_file.as_deref()) {
        eprintln!("Warning: {}", e);
    }

    let directory = fs::canonicalize(&config.directory).unwrap_or_else(|_| config.directory.clone());
    let files = discover_images_with_options(&directory, &config.discovery_options())?;
    tracing::info!(
        directory = %directory.display(),
        images = files.len(),
        "starting browser"
    );

    // Initialize state and start loading every image in the background
    let mut app_state = AppState::new(directory, files);
    let mut loader = SyncImageLoader::new(THUMB_BOX)?;
    loader.start(&app_state.files);
    let mut cache = PreviewCache::default();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_loop(&mut terminal, &mut app_state, &mut loader, &mut cache, config);

    // Restore terminal
    let restored = restore_terminal(&mut terminal);
    loader.shutdown();

    result?;
    restored?;
    Ok(())
}

fn restore_terminal<B: ratatui::backend::Backend + io::Write>(
    terminal: &mut Terminal<B>,
) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Main application loop
fn run_loop<B: ratatui::backend::Backend + io::Write>(
    terminal: &mut Terminal<B>,
    app_state: &mut AppState,
    loader: &mut SyncImageLoader,
    cache: &mut PreviewCache,
    config: &AppConfig,
) -> Result<()> {
    let mut view_state = ViewState::Browsing;
    let mut layout: Option<BrowserLayout> = None;
    let mut needs_redraw = true;

    loop {
        // Apply finished loads before drawing
        for load in loader.poll() {
            match load.result {
                Err(e) if config.fail_fast => {
                    tracing::error!(path = %load.path.display(), "stopping on failed load");
                    return Err(e);
                }
                result => {
                    needs_redraw |= app_state.apply_load(load.index, result);
                }
            }
        }

        // The preview spinner animates while the current image is loading
        let spinning = app_state.current_slot().is_some_and(ImageSlot::is_loading);
        if needs_redraw || spinning {
            terminal.draw(|frame| {
                layout = Some(render(frame, app_state, cache, config.stretch));

                if view_state == ViewState::Help {
                    render_help_overlay(frame);
                }
            })?;
            needs_redraw = false;
        }

        // Handle input; the short timeout keeps the loading spinner moving
        if !event::poll(Duration::from_millis(50))? {
            continue;
        }

        let action = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if view_state == ViewState::Help {
                    if handle_help_input(key) {
                        view_state = ViewState::Browsing;
                        needs_redraw = true;
                    }
                    continue;
                }
                handle_key_event(key)
            }
            Event::Mouse(mouse) if view_state == ViewState::Browsing => match layout {
                Some(ref layout) => handle_mouse_event(mouse, layout, app_state),
                None => Action::None,
            },
            Event::Resize(..) => {
                needs_redraw = true;
                Action::None
            }
            _ => Action::None,
        };

        needs_redraw |= match action {
            Action::Quit => break,
            Action::Next => app_state.next(),
            Action::Previous => app_state.previous(),
            Action::First => app_state.first(),
            Action::Last => app_state.last(),
            Action::Select(index) => app_state.select(index),
            Action::Help => {
                view_state = ViewState::Help;
                true
            }
            Action::None => false,
        };
    }

    Ok(())
}
