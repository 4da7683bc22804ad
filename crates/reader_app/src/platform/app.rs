use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use reader_core::{update, AppState, Msg, Notice};
use reader_engine::ClientSettings;
use reader_logging::{reader_debug, reader_info};

use super::commands::{self, Input, HELP};
use super::effects::EffectRunner;
use super::logging::{self, LogDestination};
use super::ui;

const MAX_NOTICES: usize = 5;

pub fn run_app() -> anyhow::Result<()> {
    logging::initialize(LogDestination::from_env());

    let settings = ClientSettings::from_env().context("invalid client settings")?;
    reader_info!("Starting deep_reader against {}", settings.base_url);

    let (input_tx, input_rx) = mpsc::channel::<Input>();
    let runner =
        EffectRunner::new(&settings, input_tx.clone()).context("failed to start engine")?;

    // Stdin is read on its own thread so engine results keep flowing while
    // the user types. EOF counts as quit.
    let stdin_tx = input_tx.clone();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if stdin_tx.send(commands::parse_line(&line)).is_err() {
                return;
            }
        }
        let _ = stdin_tx.send(Input::Quit);
    });
    drop(input_tx);

    let mut app = App::new(runner);
    app.dispatch(Msg::Started)?;

    while let Ok(input) = input_rx.recv() {
        match input {
            Input::Dispatch(msg) => app.dispatch(msg)?,
            Input::Help => app.show_help()?,
            Input::Unknown(line) => {
                app.push_notice(Notice::info(format!(
                    "Unknown command '{line}'. Type 'help' for commands."
                )));
                app.render()?;
            }
            Input::Quit => break,
        }
    }

    reader_info!("Shutting down");
    // Dropping the runner stops the engine and any active poll loop.
    drop(app);
    Ok(())
}

struct App {
    state: AppState,
    runner: EffectRunner,
    notices: VecDeque<Notice>,
}

impl App {
    fn new(runner: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            runner,
            notices: VecDeque::new(),
        }
    }

    fn dispatch(&mut self, msg: Msg) -> io::Result<()> {
        reader_debug!("dispatch {:?}", msg);
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;

        let notices = self.runner.enqueue(effects);
        let has_notices = !notices.is_empty();
        for notice in notices {
            self.push_notice(notice);
        }

        if was_dirty || has_notices {
            self.render()?;
        }
        Ok(())
    }

    fn push_notice(&mut self, notice: Notice) {
        if self.notices.len() == MAX_NOTICES {
            self.notices.pop_front();
        }
        self.notices.push_back(notice);
    }

    fn render(&self) -> io::Result<()> {
        let notices: Vec<Notice> = self.notices.iter().cloned().collect();
        let frame = ui::render::render(&self.state.view(), &notices);
        let mut stdout = io::stdout().lock();
        stdout.write_all(frame.as_bytes())?;
        write!(stdout, "> ")?;
        stdout.flush()
    }

    fn show_help(&self) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{HELP}")?;
        write!(stdout, "> ")?;
        stdout.flush()
    }
}
