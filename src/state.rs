use std::collections::VecDeque;
use std::time::Instant;

use crate::explorer::ExplorerState;
use crate::github::{RepoConfig, RepositoryInfo};
use crate::testgen::engine::SuggestionEngine;
use crate::testgen::suggestion::SuggestionDescriptor;
use crate::testgen::template::CodeArtifact;

pub const MAX_LOGS: usize = 1000;

/* ---------- lifecycle ---------- */

/// Wizard steps, advanced linearly by explicit user actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Connect,
    Select,
    Generate,
    Code,
    Complete,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Connect => "connect",
            Phase::Select => "select files",
            Phase::Generate => "generate tests",
            Phase::Code => "view code",
            Phase::Complete => "complete",
        }
    }
}

/// Intent recorded by the command layer, executed by the machine on the
/// next tick. One action runs to completion at a time; the event loop
/// serializes user actions.
#[derive(Clone, Debug)]
pub enum PendingAction {
    Connect { owner: String, repo: String },
    Expand(String),
    View(String),
    Generate,
    Resolve(usize),
    OpenChange,
    Restart,
}

/* ---------- logging ---------- */

#[derive(Clone, Copy, Debug)]
pub enum LogLevel {
    Info,
    Success,
    Warn,
    Error,
}

#[derive(Clone, Debug)]
pub struct LogLine {
    pub level: LogLevel,
    pub text: String,
    pub at: Instant,
}

/* ---------- wizard state ---------- */

pub struct WizardState {
    /* lifecycle */
    pub phase: Phase,
    pub pending: Option<PendingAction>,

    /* session */
    pub token: String,
    pub config: Option<RepoConfig>,
    pub repo: Option<RepositoryInfo>,
    pub explorer: ExplorerState,
    pub engine: SuggestionEngine,
    pub suggestions: Vec<SuggestionDescriptor>,
    pub chosen: Option<SuggestionDescriptor>,
    pub artifact: Option<CodeArtifact>,
    pub pr_url: Option<String>,

    /* input */
    pub input: String,
    pub execution_pending: bool,
    pub history: Vec<String>,
    pub history_index: Option<usize>,
    pub hint: Option<String>,

    /* logs (ring buffer) */
    pub logs: VecDeque<LogLine>,

    /* ui */
    pub log_scroll: usize, // usize::MAX follows the tail
    pub tree_scroll: usize,
    pub should_exit: bool,
}

impl WizardState {
    pub fn new(token: String) -> Self {
        Self {
            phase: Phase::Connect,
            pending: None,

            token,
            config: None,
            repo: None,
            explorer: ExplorerState::new(),
            engine: SuggestionEngine::new(),
            suggestions: Vec::new(),
            chosen: None,
            artifact: None,
            pr_url: None,

            input: String::new(),
            execution_pending: false,
            history: Vec::new(),
            history_index: None,
            hint: None,

            logs: VecDeque::new(),

            log_scroll: usize::MAX,
            tree_scroll: 0,
            should_exit: false,
        }
    }

    /// Drop everything tied to the current repository connection. The
    /// token survives so the user can reconnect without re-entering it.
    pub fn reset_session(&mut self) {
        self.config = None;
        self.repo = None;
        self.explorer = ExplorerState::new();
        self.suggestions.clear();
        self.chosen = None;
        self.artifact = None;
        self.pr_url = None;
        self.tree_scroll = 0;
        self.phase = Phase::Connect;
    }

    /* ---------- input helpers ---------- */

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
        self.history_index = None;
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    pub fn history_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }

        let idx = match self.history_index {
            Some(i) if i > 0 => i - 1,
            Some(i) => i,
            None => self.history.len() - 1,
        };

        self.history_index = Some(idx);
        self.input = self.history[idx].clone();
    }

    pub fn history_next(&mut self) {
        match self.history_index {
            Some(i) if i + 1 < self.history.len() => {
                self.history_index = Some(i + 1);
                self.input = self.history[i + 1].clone();
            }
            _ => {
                self.history_index = None;
                self.input.clear();
            }
        }
    }

    pub fn commit_input(&mut self) -> String {
        let cmd = self.input.trim().to_string();

        if !cmd.is_empty() {
            self.history.push(cmd.clone());
        }

        self.input.clear();
        self.history_index = None;
        self.hint = None;

        cmd
    }

    pub fn set_hint(&mut self, hint: impl Into<String>) {
        self.hint = Some(hint.into());
    }

    pub fn clear_hint(&mut self) {
        self.hint = None;
    }
}
