//! Runtime: event loop and input routing for the terminal UI.
//!
//! Responsibilities
//! - Own the terminal lifecycle (enter/leave alternate screen, raw mode).
//! - Drive a single event loop over terminal input, an animation ticker,
//!   pending task handles and Ctrl-C.
//! - Translate keys into [`Msg`]s, apply them with [`app::update`] and spawn
//!   the [`Task`] an update returns.
//! - Render via `ui::main::draw` whenever something visible changed.
//!
//! Ticking strategy: a fast interval (100 ms) while a task is in flight so
//! the throbber animates, a long interval (5 s) when idle.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use cloudgate_api::ProviderFactory;
use cloudgate_types::{Msg, Task, TaskOutcome};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::{StreamExt, stream::FuturesUnordered};
use ratatui::{Terminal, prelude::*};
use tokio::task::JoinHandle;
use tokio::{
    signal,
    sync::mpsc,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, warn};

use crate::RunOptions;
use crate::app::{self, App};
use crate::cmd;
use crate::ui::main::draw;
use crate::ui::theme::{self, Theme};

type TerminalBackend = CrosstermBackend<std::io::Stdout>;

/// Spawn a dedicated input thread that blocks on terminal input and forwards
/// `crossterm` events over a Tokio channel.
fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(256);
    std::thread::spawn(move || {
        loop {
            match event::read() {
                Ok(event) => {
                    if sender.blocking_send(event).is_err() {
                        break;
                    }
                }
                Err(error) => {
                    warn!(%error, "failed to read terminal event");
                    break;
                }
            }
        }
    });
    receiver
}

/// Put the terminal into raw mode and enter the alternate screen.
fn setup_terminal() -> Result<Terminal<TerminalBackend>> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    Ok(terminal)
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut Terminal<TerminalBackend>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Map a key press to a message for the current mode.
///
/// Ctrl-C is handled by the loop itself and never reaches this function.
pub fn key_to_msg(app: &App, key: KeyEvent) -> Option<Msg> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    match key.code {
        KeyCode::Enter => Some(Msg::Confirm),
        KeyCode::Esc => Some(Msg::Back),
        KeyCode::Up => Some(Msg::MoveSelection(-1)),
        KeyCode::Down => Some(Msg::MoveSelection(1)),
        KeyCode::Home => Some(Msg::SelectFirst),
        KeyCode::End => Some(Msg::SelectLast),
        KeyCode::Left if app.manual_input => Some(Msg::InputLeft),
        KeyCode::Right if app.manual_input => Some(Msg::InputRight),
        KeyCode::Backspace if app.manual_input => Some(Msg::InputBackspace),
        KeyCode::Char(c) if app.manual_input && !key.modifiers.contains(KeyModifiers::CONTROL) => Some(Msg::InputChar(c)),
        KeyCode::Char('k') => Some(Msg::MoveSelection(-1)),
        KeyCode::Char('j') => Some(Msg::MoveSelection(1)),
        KeyCode::Char('q') => Some(Msg::Back),
        _ => None,
    }
}

fn is_ctrl_c(event: &Event) -> bool {
    matches!(
        event,
        Event::Key(KeyEvent { code: KeyCode::Char('c'), modifiers, .. }) if modifiers.contains(KeyModifiers::CONTROL)
    )
}

fn render(terminal: &mut Terminal<TerminalBackend>, app: &App, theme: &dyn Theme) -> Result<()> {
    terminal.draw(|frame| draw(frame, app, theme))?;
    Ok(())
}

/// Apply `msg`, spawning the task the update returns.
fn dispatch(
    app: App,
    msg: Msg,
    factory: &Arc<dyn ProviderFactory>,
    pending: &mut FuturesUnordered<JoinHandle<TaskOutcome>>,
) -> App {
    let (app, task) = app::update(app, msg);
    if let Some(task) = task {
        spawn(task, factory, pending);
    }
    app
}

fn spawn(task: Task, factory: &Arc<dyn ProviderFactory>, pending: &mut FuturesUnordered<JoinHandle<TaskOutcome>>) {
    debug!(task = task.label(), "spawning task");
    pending.push(cmd::spawn_task(Arc::clone(factory), task));
}

/// Entry point for the runtime: sets up the terminal, runs the event loop and
/// restores the terminal on exit.
pub async fn run_app(options: RunOptions) -> Result<()> {
    let RunOptions {
        profiles,
        regions,
        factory,
        theme: preferred_theme,
    } = options;
    let loaded = theme::load(preferred_theme.as_deref());
    debug!(theme = loaded.definition.id, "theme loaded");
    let theme = loaded.theme;

    let mut input_receiver = spawn_input_thread();
    let app = App::new(profiles, regions);
    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, &mut input_receiver, app, &factory, theme.as_ref()).await;
    cleanup_terminal(&mut terminal)?;
    result
}

async fn event_loop(
    terminal: &mut Terminal<TerminalBackend>,
    input_receiver: &mut mpsc::Receiver<Event>,
    mut app: App,
    factory: &Arc<dyn ProviderFactory>,
    theme: &dyn Theme,
) -> Result<()> {
    let mut pending: FuturesUnordered<JoinHandle<TaskOutcome>> = FuturesUnordered::new();

    let fast_interval = Duration::from_millis(100);
    let idle_interval = Duration::from_millis(5000);
    let mut current_interval = idle_interval;
    let mut ticker = time::interval(current_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    render(terminal, &app, theme)?;

    loop {
        let target_interval = if app.is_loading { fast_interval } else { idle_interval };
        if target_interval != current_interval {
            current_interval = target_interval;
            ticker = time::interval(current_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        }

        let mut needs_render = false;
        tokio::select! {
            maybe_event = input_receiver.recv() => {
                let Some(event) = maybe_event else {
                    // Input channel closed; shut down cleanly.
                    break;
                };
                if is_ctrl_c(&event) {
                    break;
                }
                match event {
                    Event::Key(key) => {
                        if let Some(msg) = key_to_msg(&app, key) {
                            app = dispatch(app, msg, factory, &mut pending);
                        }
                    }
                    Event::Resize(width, height) => {
                        app = dispatch(app, Msg::Resize(width, height), factory, &mut pending);
                    }
                    _ => {}
                }
                needs_render = true;
            }

            _ = ticker.tick() => {
                needs_render = app.is_loading;
                app = dispatch(app, Msg::Tick, factory, &mut pending);
            }

            Some(joined) = pending.next(), if !pending.is_empty() => {
                let outcome = joined.unwrap_or_else(cmd::crashed);
                app = dispatch(app, Msg::TaskCompleted(Box::new(outcome)), factory, &mut pending);
                needs_render = true;
            }

            _ = signal::ctrl_c() => { break; }
        }

        if app.should_quit {
            break;
        }
        if needs_render {
            render(terminal, &app, theme)?;
        }
    }

    Ok(())
}
