//! machine.rs
//!
//! Wizard lifecycle: executes the pending action recorded by the
//! command layer and moves the linear step machine
//! connect → select → generate → code → complete.
//!
//! Every provider call runs to completion (success or failure) before
//! the next action is accepted; failures become log lines and leave the
//! wizard in a state the user can retry from.

use crate::explorer::ExplorerState;
use crate::github::{FileEdit, FileNode, GitHubClient, RepoConfig};
use crate::logger::log;
use crate::state::{LogLevel, PendingAction, Phase, WizardState};
use crate::testgen::template;

pub fn step(state: &mut WizardState) {
    let Some(action) = state.pending.take() else {
        return;
    };

    match action {
        PendingAction::Connect { owner, repo } => connect(state, owner, repo),
        PendingAction::Expand(path) => expand(state, path),
        PendingAction::View(path) => view(state, path),
        PendingAction::Generate => generate(state),
        PendingAction::Resolve(idx) => resolve(state, idx),
        PendingAction::OpenChange => open_change(state),
        PendingAction::Restart => restart(state),
    }
}

fn connect(state: &mut WizardState, owner: String, repo: String) {
    let client = match GitHubClient::new(&state.token) {
        Ok(c) => c,
        Err(e) => {
            log(state, LogLevel::Error, format!("HTTP client setup failed: {e}"));
            return;
        }
    };

    let info = match client.repository_info(&owner, &repo) {
        Ok(i) => i,
        Err(e) => {
            log(
                state,
                LogLevel::Error,
                format!("Failed to fetch repository information: {e}"),
            );
            return;
        }
    };

    log(
        state,
        LogLevel::Success,
        format!(
            "Connected to {}/{} (default branch: {})",
            info.owner, info.name, info.default_branch
        ),
    );

    state.explorer = ExplorerState::new();
    if let Err(e) = state
        .explorer
        .load_root(|| client.list_directory(&owner, &repo, ""))
    {
        log(
            state,
            LogLevel::Error,
            format!("Failed to load repository files: {e}. Run `connect` again to retry."),
        );
        return;
    }

    state.config = Some(RepoConfig {
        owner,
        repo,
        branch: info.default_branch.clone(),
        token: state.token.clone(),
    });
    state.repo = Some(info);

    let count = state.explorer.visible_rows().len();
    log(
        state,
        LogLevel::Info,
        format!("Loaded {count} root entries. `expand <n>` / `select <n>` to browse."),
    );
    transition(state, Phase::Select);
}

fn expand(state: &mut WizardState, path: String) {
    let Some(cfg) = state.config.clone() else {
        log(state, LogLevel::Warn, "Not connected. Use `connect <owner>/<repo>`.");
        return;
    };

    let client = match GitHubClient::new(&cfg.token) {
        Ok(c) => c,
        Err(e) => {
            log(state, LogLevel::Error, format!("HTTP client setup failed: {e}"));
            return;
        }
    };

    let was_expanded = state.explorer.is_expanded(&path);
    let result = state
        .explorer
        .toggle_expand(&path, |p| client.list_directory(&cfg.owner, &cfg.repo, p));

    match result {
        Ok(()) if !was_expanded && state.explorer.is_expanded(&path) => {
            log(state, LogLevel::Info, format!("Expanded {path}"));
        }
        Ok(()) => {}
        Err(e) => {
            log(
                state,
                LogLevel::Error,
                format!("Failed to load folder contents for {path}: {e}. Re-expand to retry."),
            );
        }
    }
}

fn view(state: &mut WizardState, path: String) {
    let Some(cfg) = state.config.clone() else {
        log(state, LogLevel::Warn, "Not connected. Use `connect <owner>/<repo>`.");
        return;
    };

    let client = match GitHubClient::new(&cfg.token) {
        Ok(c) => c,
        Err(e) => {
            log(state, LogLevel::Error, format!("HTTP client setup failed: {e}"));
            return;
        }
    };

    match client.get_file_content(&cfg.owner, &cfg.repo, &path) {
        Ok(content) => {
            log(state, LogLevel::Info, format!("--- {path} ---"));
            let total = content.lines().count();
            for line in content.lines().take(40) {
                log(state, LogLevel::Info, format!("  {line}"));
            }
            if total > 40 {
                log(state, LogLevel::Info, format!("  ... ({} more lines)", total - 40));
            }
        }
        Err(e) => {
            log(state, LogLevel::Error, format!("Failed to fetch {path}: {e}"));
        }
    }
}

fn generate(state: &mut WizardState) {
    let files: Vec<FileNode> = state
        .explorer
        .current_selection()
        .into_iter()
        .cloned()
        .collect();

    if files.is_empty() {
        log(state, LogLevel::Warn, "Select at least one file first.");
        return;
    }

    state.suggestions = state.engine.generate(&files);
    transition(state, Phase::Generate);

    log(
        state,
        LogLevel::Success,
        format!(
            "Generated {} suggestions for {} files:",
            state.suggestions.len(),
            files.len()
        ),
    );

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
    log(state, LogLevel::Info, "`pick <n>` to resolve one into test code.");
}

fn resolve(state: &mut WizardState, idx: usize) {
    let Some(suggestion) = state.suggestions.get(idx).cloned() else {
        log(
            state,
            LogLevel::Warn,
            format!("No suggestion #{}. `suggestions` to list them.", idx + 1),
        );
        return;
    };

    let artifact = template::resolve(&suggestion);

    log(
        state,
        LogLevel::Success,
        format!(
            "Resolved \"{}\" to {} ({} dependencies)",
            suggestion.title,
            artifact.output_file_name,
            artifact.dependencies.len()
        ),
    );
    if !artifact.dependencies.is_empty() {
        let deps = artifact.dependencies.join(", ");
        log(state, LogLevel::Info, format!("  requires: {deps}"));
    }
    log(state, LogLevel::Info, "`code` to view, `pr` to open a pull request.");

    state.chosen = Some(suggestion);
    state.artifact = Some(artifact);
    transition(state, Phase::Code);
}

fn open_change(state: &mut WizardState) {
    let (Some(cfg), Some(chosen), Some(artifact)) =
        (state.config.clone(), state.chosen.clone(), state.artifact.clone())
    else {
        log(state, LogLevel::Warn, "Nothing to submit. `pick <n>` a suggestion first.");
        return;
    };

    let client = match GitHubClient::new(&cfg.token) {
        Ok(c) => c,
        Err(e) => {
            log(state, LogLevel::Error, format!("HTTP client setup failed: {e}"));
            return;
        }
    };

    let edits = [FileEdit {
        path: format!("tests/{}", artifact.output_file_name),
        content: artifact.code.clone(),
    }];

    let description = format!(
        "{}\n\nCovers: {}\n\nGenerated by testforge.",
        chosen.description,
        chosen.files.join(", ")
    );

    match client.open_change(&cfg, &chosen.title, &description, &edits) {
        Ok(url) => {
            log(state, LogLevel::Success, format!("Pull request opened: {url}"));
            state.pr_url = Some(url);
            transition(state, Phase::Complete);
        }
        Err(e) => {
            // remediation differs from listing failures: this is almost
            // always token scope or branch protection
            log(
                state,
                LogLevel::Error,
                format!(
                    "Pull request creation failed: {e}. \
                     Check token write permissions, then `pr` to retry."
                ),
            );
        }
    }
}

fn restart(state: &mut WizardState) {
    state.reset_session();
    log(state, LogLevel::Info, "Session reset. `connect <owner>/<repo>` to start over.");
}

fn transition(state: &mut WizardState, next: Phase) {
    state.phase = next;
    state.set_hint(match next {
        Phase::Connect => "connect <owner>/<repo>",
        Phase::Select => "expand <n> / select <n> / view <n>, then generate",
        Phase::Generate => "pick <n> to resolve a suggestion",
        Phase::Code => "code / pr / finish",
        Phase::Complete => "restart or quit",
    });
}

/* ============================================================
   Tests
   ============================================================ */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::NodeKind;

    fn file(name: &str) -> FileNode {
        FileNode {
            name: name.to_string(),
            path: name.to_string(),
            kind: NodeKind::File,
            size: 64,
            identity: String::new(),
            content: None,
        }
    }

    /// Full offline pass: load a tree, select a file, generate, pick the
    /// unit suggestion, and check the resolved artifact.
    #[test]
    fn select_generate_pick_produces_a_jest_artifact() {
        let mut state = WizardState::new("tok".into());

        state
            .explorer
            .load_root(|| Ok(vec![file("auth.js"), file("README.md")]))
            .unwrap();
        state.explorer.toggle_select("auth.js");

        state.pending = Some(PendingAction::Generate);
        step(&mut state);
        assert_eq!(state.phase, Phase::Generate);
        assert!(!state.suggestions.is_empty());

        let idx = state
            .suggestions
            .iter()
            .position(|s| s.title == "JavaScript Unit Tests")
            .unwrap();

        state.pending = Some(PendingAction::Resolve(idx));
        step(&mut state);
        assert_eq!(state.phase, Phase::Code);

        let artifact = state.artifact.as_ref().unwrap();
        assert_eq!(artifact.output_file_name, "JavaScriptUnitTests.test.js");
        assert_eq!(artifact.framework, "Jest");
        assert!(artifact
            .dependencies
            .contains(&"@testing-library/react".to_string()));
        assert!(artifact.code.contains("JavaScript Unit Tests"));
    }

    #[test]
    fn generate_with_empty_selection_stays_put() {
        let mut state = WizardState::new("tok".into());
        state.pending = Some(PendingAction::Generate);
        step(&mut state);
        assert_eq!(state.phase, Phase::Connect);
        assert!(state.suggestions.is_empty());
    }

    #[test]
    fn resolve_out_of_range_only_warns() {
        let mut state = WizardState::new("tok".into());
        state.pending = Some(PendingAction::Resolve(7));
        step(&mut state);
        assert!(state.artifact.is_none());
        assert_eq!(state.phase, Phase::Connect);
    }

    #[test]
    fn restart_keeps_the_token() {
        let mut state = WizardState::new("tok".into());
        state.phase = Phase::Code;
        state.pending = Some(PendingAction::Restart);
        step(&mut state);
        assert_eq!(state.phase, Phase::Connect);
        assert_eq!(state.token, "tok");
    }
}
