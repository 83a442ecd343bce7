/// Terminal frontend for keyframe animation of a wireframe object
use crossterm::{
    cursor,
    event::{self, Event},
    execute,
    terminal::{self},
};
use kframe_core::{Action, AnimationState, Error, Result, Session, SimulationConfig};
use log::{debug, info};
use std::io::{self, stdout, Stdout};
use std::time::Duration;

pub mod cli;
pub mod input;
pub mod renderer;

pub use input::KeyBindings;
pub use renderer::WireframeRenderer;

const HELP: &str =
    "Shift+arrows/A/D rotate | arrows/W/S move | N/M scale | 1/2 record | P play | Q quit";

/// Main application struct for the interactive terminal session
pub struct TerminalApp {
    session: Session,
    bindings: KeyBindings,
    renderer: WireframeRenderer<Stdout>,
    idle_poll: Duration,
    notice: Option<String>,
}

impl TerminalApp {
    pub fn new(config: &SimulationConfig, session: Session) -> Result<Self> {
        let (columns, rows) = terminal::size()?;
        Ok(Self {
            session,
            bindings: KeyBindings::from_config(config),
            renderer: WireframeRenderer::new(
                stdout(),
                columns,
                rows,
                (config.screen_width, config.screen_height),
                config.frame_duration(),
            ),
            idle_poll: config.frame_duration(),
            notice: None,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        let guard = TerminalGuard::enter()?;
        let result = self.main_loop();
        let restored = guard.restore();
        result.and(restored)
    }

    fn main_loop(&mut self) -> Result<()> {
        while self.session.is_running() {
            self.renderer.set_status(status_line(
                self.session.animation.state(),
                self.notice.as_deref(),
            ));
            self.session.render(&mut self.renderer)?;

            if !event::poll(self.idle_poll)? {
                continue;
            }
            match event::read()? {
                Event::Key(key) => {
                    if let Some(action) = self.bindings.action_for(&key) {
                        self.handle(action)?;
                    }
                }
                Event::Resize(columns, rows) => self.renderer.resize(columns, rows),
                _ => {}
            }
        }

        info!("session closed");
        Ok(())
    }

    /// Dispatch one action. Rejected actions end up on the status line;
    /// only renderer failures stop the loop.
    fn handle(&mut self, action: Action) -> Result<()> {
        self.notice = None;
        if action == Action::Play {
            if self.session.animation.state() != AnimationState::Ready {
                self.notice = Some("record keyframes 1 and 2 before playing".to_string());
            } else {
                self.renderer.set_status("kframe | playing | Q/Esc stops");
            }
        }

        match self.session.dispatch(action, &mut self.renderer) {
            Ok(()) => Ok(()),
            Err(e @ Error::Render(_)) => Err(e),
            Err(e) => {
                debug!("{action:?} rejected: {e}");
                self.notice = Some(e.to_string());
                Ok(())
            }
        }
    }
}

/// Text of the line above the canvas
pub fn status_line(state: AnimationState, notice: Option<&str>) -> String {
    match notice {
        Some(notice) => format!("kframe | keyframes: {state:?} | {notice}"),
        None => format!("kframe | keyframes: {state:?} | {HELP}"),
    }
}

/// Raw mode plus the alternate screen, undone on drop if not restored
struct TerminalGuard {
    active: bool,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        let guard = Self { active: true };
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        Ok(guard)
    }

    fn restore(mut self) -> Result<()> {
        self.active = false;
        restore_terminal()?;
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.active {
            let _ = restore_terminal();
        }
    }
}

fn leave_screen() -> io::Result<()> {
    execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)
}

fn restore_terminal() -> io::Result<()> {
    run_all(&[terminal::disable_raw_mode, leave_screen])
}

/// Run every step even when an earlier one fails and report the first error
fn run_all(steps: &[fn() -> io::Result<()>]) -> io::Result<()> {
    let mut first = Ok(());
    for step in steps {
        let result = step();
        if first.is_ok() {
            first = result;
        }
    }
    first
}
