use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use analyst_core::{update, Msg, PanelState, PanelVariant, SessionId};
use engine_logging::{engine_debug, engine_info};

use crate::commands::{self, Command};
use crate::effects::{event_to_msg, EffectRunner};
use crate::render;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

enum Input {
    Line(String),
    Closed,
}

/// Terminal host for one panel: stdin lines become messages, engine
/// completions are folded back in, and effects are run after each update.
pub struct App<W: Write> {
    state: PanelState,
    runner: EffectRunner<W>,
    was_loading: bool,
}

impl<W: Write> App<W> {
    pub fn new(variant: PanelVariant, runner: EffectRunner<W>) -> Self {
        Self {
            state: PanelState::with_variant(variant),
            runner,
            was_loading: false,
        }
    }

    pub fn run(mut self, session_id: SessionId) -> io::Result<()> {
        let (input_tx, input_rx) = mpsc::channel();
        thread::Builder::new()
            .name("analyst-stdin".to_string())
            .spawn(move || read_stdin(input_tx))?;

        engine_logging::set_session_label(&session_id);
        engine_info!("panel opened");
        self.dispatch(Msg::PanelOpened { session_id });
        self.print(commands::HELP);

        loop {
            while let Some(event) = self.runner.engine().try_recv() {
                self.dispatch(event_to_msg(event));
            }
            match input_rx.recv_timeout(POLL_INTERVAL) {
                Ok(Input::Line(line)) => {
                    if !self.handle_line(&line) {
                        break;
                    }
                }
                Ok(Input::Closed) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
                Err(mpsc::RecvTimeoutError::Timeout) => self.dispatch(Msg::Tick),
            }
        }

        self.dispatch(Msg::PanelClosed);
        engine_info!("panel closed");
        engine_logging::clear_session_label();
        Ok(())
    }

    /// Returns false once the user asked to quit.
    fn handle_line(&mut self, line: &str) -> bool {
        let command = match commands::parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return true,
            Err(err) => {
                self.print(&format!("! {err}"));
                return true;
            }
        };
        match command {
            Command::Quit => return false,
            Command::Help => self.print(commands::HELP),
            Command::Show => self.show_panel(),
            Command::Example(index) => {
                for msg in Command::Example(index).into_msgs(None) {
                    self.dispatch(msg);
                }
                let draft = format!("draft: {} (/send to ask)", self.state.input());
                self.print(&draft);
            }
            other => {
                let latest = render::latest_link(&self.state.view());
                for msg in other.into_msgs(latest) {
                    self.dispatch(msg);
                }
            }
        }
        true
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.run(&self.state, effects);

        if self.state.consume_dirty() {
            let loading = self.state.view().loading_context;
            if self.was_loading && !loading {
                engine_debug!("session context settled");
                self.show_panel();
            }
            self.was_loading = loading;
        }
    }

    fn show_panel(&mut self) {
        for line in render::render_panel(&self.state.view()) {
            self.print(&line);
        }
    }

    fn print(&mut self, text: &str) {
        let out = self.runner.out();
        let _ = writeln!(out, "{text}");
        let _ = out.flush();
    }
}

fn read_stdin(input_tx: mpsc::Sender<Input>) {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else {
            break;
        };
        if input_tx.send(Input::Line(line)).is_err() {
            return;
        }
    }
    let _ = input_tx.send(Input::Closed);
}
