use std::time::Instant;

use crate::state::{LogLevel, LogLine, WizardState, MAX_LOGS};

pub fn log(state: &mut WizardState, level: LogLevel, msg: impl Into<String>) {
    if state.logs.len() >= MAX_LOGS {
        state.logs.pop_front();
    }

    state.logs.push_back(LogLine {
        level,
        text: msg.into(),
        at: Instant::now(),
    });
}

/// Echo a committed command into the log panel.
pub fn log_user_input(state: &mut WizardState, text: &str) {
    log(state, LogLevel::Info, format!(">_ {text}"));
}
