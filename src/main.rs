mod commands;
mod explorer;
mod github;
mod logger;
mod machine;
mod state;
mod testgen;
mod ui;

use std::{error::Error, io, time::Duration};

use crossterm::{
    event, execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};

use ratatui::{backend::CrosstermBackend, Terminal};

use clap::Parser;

use crate::{
    logger::log,
    state::{LogLevel, PendingAction, WizardState},
    ui::{main_ui::handle_event, tui::draw_ui},
};

#[derive(Parser)]
#[command(
    name = "testforge",
    version,
    about = "A terminal wizard that suggests, generates, and submits test cases for a GitHub repository."
)]
struct Cli {
    /// Repository owner (connects on startup when --repo is also given)
    #[arg(long)]
    owner: Option<String>,

    /// Repository name
    #[arg(long)]
    repo: Option<String>,

    /// GitHub access token (falls back to GITHUB_TOKEN)
    #[arg(long)]
    token: Option<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let token = cli
        .token
        .or_else(|| std::env::var("GITHUB_TOKEN").ok())
        .unwrap_or_default();

    run_tui(token, cli.owner, cli.repo)
}

fn run_tui(
    token: String,
    owner: Option<String>,
    repo: Option<String>,
) -> Result<(), Box<dyn Error>> {
    setup_terminal()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let mut state = WizardState::new(token);

    log(&mut state, LogLevel::Info, "Welcome to testforge. Type `help` for commands.");
    state.set_hint("connect <owner>/<repo>");
    if state.token.is_empty() {
        log(
            &mut state,
            LogLevel::Warn,
            "No access token. Set GITHUB_TOKEN or use `token <value>`.",
        );
    }

    if let (Some(owner), Some(repo)) = (owner, repo) {
        log(&mut state, LogLevel::Info, format!("Connecting to {owner}/{repo}..."));
        state.pending = Some(PendingAction::Connect { owner, repo });
    }

    loop {
        draw_ui(&mut terminal, &state)?;

        if event::poll(Duration::from_millis(120))? {
            let ev = event::read()?;
            handle_event(&mut state, ev);
        }

        if state.execution_pending {
            state.execution_pending = false;
            let cmd = state.commit_input();
            commands::handle_command(&mut state, &cmd);
        }

        machine::step(&mut state);

        if state.should_exit {
            break;
        }
    }

    teardown_terminal(&mut terminal)?;
    Ok(())
}

fn setup_terminal() -> Result<(), Box<dyn Error>> {
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen)?;
    Ok(())
}

fn teardown_terminal(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<(), Box<dyn Error>> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
