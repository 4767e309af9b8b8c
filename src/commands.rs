//! commands.rs
//!
//! Command interpretation layer.
//!
//! Responsibilities:
//! - Parse and validate user commands
//! - Translate commands into explicit state mutations / pending actions
//! - Emit informational logs
//!
//! Non-responsibilities:
//! - Provider side effects (the machine owns those)
//! - UI rendering logic

use crate::logger::{log, log_user_input};
use crate::state::{LogLevel, PendingAction, Phase, WizardState};

pub fn handle_command(state: &mut WizardState, cmd: &str) {
    state.clear_hint();

    // never echo the credential into the log panel
    if let Some(rest) = cmd.strip_prefix("token ") {
        log_user_input(state, "token ••••");
        set_token(state, rest.trim());
        return;
    }

    if !cmd.is_empty() {
        log_user_input(state, cmd);
    }

    match cmd {
        "help" => help(state),
        cmd if cmd.starts_with("connect ") => connect(state, cmd),
        cmd if cmd.starts_with("expand ") => expand(state, cmd),
        cmd if cmd.starts_with("select ") => select(state, cmd),
        cmd if cmd.starts_with("view ") => view(state, cmd),
        "selection" => show_selection(state),
        "generate" => generate(state),
        "suggestions" => list_suggestions(state),
        cmd if cmd.starts_with("pick ") => pick(state, cmd),
        "code" => show_code(state),
        "pr" => open_pr(state),
        "finish" => finish(state),
        "restart" => {
            state.pending = Some(PendingAction::Restart);
        }
        "quit" => {
            state.should_exit = true;
        }
        "" => {}
        _ => {
            log(state, LogLevel::Warn, "Unknown command. Type `help`.");
        }
    }
}

/* ============================================================
   Command implementations
   ============================================================ */

fn help(state: &mut WizardState) {
    use LogLevel::Info;

    log(state, Info, "Commands:");
    log(state, Info, "  connect <owner>/<repo>  - connect to a repository");
    log(state, Info, "  token <value>           - set the access token");
    log(state, Info, "  expand <n>              - expand/collapse directory row n");
    log(state, Info, "  select <n>              - select/deselect file row n");
    log(state, Info, "  view <n>                - print the contents of file row n");
    log(state, Info, "  selection               - list selected files");
    log(state, Info, "  generate                - suggest test cases for the selection");
    log(state, Info, "  suggestions             - list generated suggestions");
    log(state, Info, "  pick <n>                - resolve suggestion n into code");
    log(state, Info, "  code                    - print the generated test file");
    log(state, Info, "  pr                      - open a pull request with the code");
    log(state, Info, "  finish                  - complete without a pull request");
    log(state, Info, "  restart                 - drop the session and reconnect");
    log(state, Info, "  quit                    - exit testforge");
}

fn set_token(state: &mut WizardState, token: &str) {
    if token.is_empty() {
        log(state, LogLevel::Warn, "Usage: token <value>");
        return;
    }
    state.token = token.to_string();
    log(state, LogLevel::Success, "Access token updated.");
}

fn connect(state: &mut WizardState, cmd: &str) {
    let arg = cmd.trim_start_matches("connect ").trim();

    let Some((owner, repo)) = arg.split_once('/') else {
        log(state, LogLevel::Warn, "Usage: connect <owner>/<repo>");
        return;
    };

    if owner.is_empty() || repo.is_empty() {
        log(state, LogLevel::Warn, "Usage: connect <owner>/<repo>");
        return;
    }

    if state.token.is_empty() {
        log(
            state,
            LogLevel::Warn,
            "No access token. Set GITHUB_TOKEN or use `token <value>` first.",
        );
        return;
    }

    log(state, LogLevel::Info, format!("Connecting to {owner}/{repo}..."));
    state.pending = Some(PendingAction::Connect {
        owner: owner.to_string(),
        repo: repo.to_string(),
    });
}

fn expand(state: &mut WizardState, cmd: &str) {
    let Some(n) = row_arg(state, cmd, "expand") else {
        return;
    };

    let Some((path, is_dir)) = row_lookup(state, n) else {
        log(state, LogLevel::Warn, "No such row. The tree panel numbers the rows.");
        return;
    };

    if !is_dir {
        log(state, LogLevel::Warn, "Not a directory. Use `select <n>` for files.");
        return;
    }

    state.pending = Some(PendingAction::Expand(path));
}

fn select(state: &mut WizardState, cmd: &str) {
    let Some(n) = row_arg(state, cmd, "select") else {
        return;
    };

    let Some((path, is_dir)) = row_lookup(state, n) else {
        log(state, LogLevel::Warn, "No such row. The tree panel numbers the rows.");
        return;
    };

    if is_dir {
        log(state, LogLevel::Warn, "Directories cannot be selected. `expand <n>` instead.");
        return;
    }

    state.explorer.toggle_select(&path);
    let verb = if state.explorer.is_selected(&path) {
        "Selected"
    } else {
        "Deselected"
    };
    let count = state.explorer.selected_count();
    log(state, LogLevel::Info, format!("{verb} {path} ({count} selected)"));
}

fn view(state: &mut WizardState, cmd: &str) {
    let Some(n) = row_arg(state, cmd, "view") else {
        return;
    };

    let Some((path, is_dir)) = row_lookup(state, n) else {
        log(state, LogLevel::Warn, "No such row. The tree panel numbers the rows.");
        return;
    };

    if is_dir {
        log(state, LogLevel::Warn, "Directories have no content. `expand <n>` instead.");
        return;
    }

    state.pending = Some(PendingAction::View(path));
}

fn show_selection(state: &mut WizardState) {
    let lines: Vec<String> = state
        .explorer
        .current_selection()
        .iter()
        .map(|n| format!("  {} ({} bytes)", n.path, n.size))
        .collect();

    if lines.is_empty() {
        log(state, LogLevel::Info, "Nothing selected.");
        return;
    }

    log(state, LogLevel::Info, format!("{} selected:", lines.len()));
    for line in lines {
        log(state, LogLevel::Info, line);
    }
}

fn generate(state: &mut WizardState) {
    if state.config.is_none() {
        log(state, LogLevel::Warn, "Not connected. Use `connect <owner>/<repo>`.");
        return;
    }
    state.pending = Some(PendingAction::Generate);
}

fn list_suggestions(state: &mut WizardState) {
    if state.suggestions.is_empty() {
        log(state, LogLevel::Info, "No suggestions yet. `generate` first.");
        return;
    }

    let lines: Vec<String> = state
        .suggestions
        .iter()
        .enumerate()
        .map(|(i, s)| {
            format!(
                "  {}. {} [{}] ({}, {})",
                i + 1,
                s.title,
                s.framework,
                s.complexity,
                s.estimated_effort
            )
        })
        .collect();

    for line in lines {
        log(state, LogLevel::Info, line);
    }
}

fn pick(state: &mut WizardState, cmd: &str) {
    if state.suggestions.is_empty() {
        log(state, LogLevel::Warn, "No suggestions yet. `generate` first.");
        return;
    }

    let Some(n) = row_arg(state, cmd, "pick") else {
        return;
    };

    state.pending = Some(PendingAction::Resolve(n - 1));
}

fn show_code(state: &mut WizardState) {
    let Some(artifact) = state.artifact.clone() else {
        log(state, LogLevel::Warn, "No code yet. `pick <n>` a suggestion first.");
        return;
    };

    log(state, LogLevel::Info, format!("--- {} ---", artifact.output_file_name));
    for line in artifact.code.lines() {
        log(state, LogLevel::Info, format!("  {line}"));
    }
}

fn open_pr(state: &mut WizardState) {
    if state.artifact.is_none() {
        log(state, LogLevel::Warn, "No code yet. `pick <n>` a suggestion first.");
        return;
    }
    log(state, LogLevel::Info, "Opening pull request...");
    state.pending = Some(PendingAction::OpenChange);
}

fn finish(state: &mut WizardState) {
    if state.phase != Phase::Code {
        log(state, LogLevel::Warn, "Nothing to finish yet.");
        return;
    }
    state.phase = Phase::Complete;
    log(state, LogLevel::Success, "Done. Copy the code from `code`, or `restart`.");
}

/* ---------- parsing ---------- */

/// Resolve a 1-based tree row to its path and kind.
fn row_lookup(state: &WizardState, n: usize) -> Option<(String, bool)> {
    state
        .explorer
        .visible_rows()
        .get(n - 1)
        .map(|r| (r.node.path.clone(), r.node.is_dir()))
}

/// Parse the 1-based numeric argument of `<verb> <n>`.
fn row_arg(state: &mut WizardState, cmd: &str, verb: &str) -> Option<usize> {
    let arg = cmd[verb.len()..].trim();
    match arg.parse::<usize>() {
        Ok(n) if n >= 1 => Some(n),
        _ => {
            log(state, LogLevel::Warn, format!("Usage: {verb} <n>"));
            None
        }
    }
}

/* ============================================================
   Tests
   ============================================================ */

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> WizardState {
        WizardState::new("tok".into())
    }

    #[test]
    fn connect_requires_owner_slash_repo() {
        let mut state = fresh();
        handle_command(&mut state, "connect nonsense");
        assert!(state.pending.is_none());

        handle_command(&mut state, "connect octo/demo");
        assert!(matches!(
            state.pending,
            Some(PendingAction::Connect { ref owner, ref repo }) if owner == "octo" && repo == "demo"
        ));
    }

    #[test]
    fn connect_without_token_is_refused() {
        let mut state = WizardState::new(String::new());
        handle_command(&mut state, "connect octo/demo");
        assert!(state.pending.is_none());
    }

    #[test]
    fn token_value_never_reaches_the_logs() {
        let mut state = fresh();
        handle_command(&mut state, "token ghp_supersecret");
        assert_eq!(state.token, "ghp_supersecret");
        assert!(state.logs.iter().all(|l| !l.text.contains("ghp_supersecret")));
    }

    #[test]
    fn pick_needs_generated_suggestions() {
        let mut state = fresh();
        handle_command(&mut state, "pick 1");
        assert!(state.pending.is_none());
    }

    #[test]
    fn view_refuses_directories() {
        use crate::github::{FileNode, NodeKind};

        let mut state = fresh();
        state
            .explorer
            .load_root(|| {
                Ok(vec![FileNode {
                    name: "src".into(),
                    path: "src".into(),
                    kind: NodeKind::Directory,
                    size: 0,
                    identity: String::new(),
                    content: None,
                }])
            })
            .unwrap();

        handle_command(&mut state, "view 1");
        assert!(state.pending.is_none());
    }

    #[test]
    fn quit_flags_exit() {
        let mut state = fresh();
        handle_command(&mut state, "quit");
        assert!(state.should_exit);
    }

    #[test]
    fn unknown_commands_only_warn() {
        let mut state = fresh();
        handle_command(&mut state, "frobnicate");
        assert!(state.pending.is_none());
        assert!(!state.should_exit);
    }
}
