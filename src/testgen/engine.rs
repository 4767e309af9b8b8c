//! engine.rs
//!
//! Rule-based suggestion generation.
//!
//! Pure classification over file names: no network, no state beyond
//! the id sequence. Files are classified independently; extension
//! families are mutually exclusive with each other, while the keyword
//! families below each contribute their suggestions on top. A file
//! matching several families accumulates all of them — observable
//! suggestion counts depend on this, so it must not be collapsed to
//! first-match-wins.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::github::FileNode;
use crate::testgen::suggestion::{Complexity, SuggestionDescriptor};

/* ============================================================
   Rule tables
   ============================================================ */

struct RuleLine {
    tag: &'static str,
    title: &'static str,
    description: &'static str,
    framework: &'static str,
    effort: &'static str,
    complexity: Complexity,
}

const CALCULATOR: [RuleLine; 3] = [
    RuleLine {
        tag: "calc-unit",
        title: "Calculator Unit Tests",
        description: "Comprehensive unit tests for mathematical functions including edge cases and error handling",
        framework: "Jest",
        effort: "2-3 hours",
        complexity: Complexity::Medium,
    },
    RuleLine {
        tag: "calc-integration",
        title: "Calculator Integration Tests",
        description: "Integration tests for calculator workflows and complex calculations",
        framework: "Jest",
        effort: "1-2 hours",
        complexity: Complexity::Medium,
    },
    RuleLine {
        tag: "calc-performance",
        title: "Calculator Performance Tests",
        description: "Performance testing for large calculations and memory usage",
        framework: "Jest",
        effort: "1-2 hours",
        complexity: Complexity::High,
    },
];

const REACT_ENTITY: [RuleLine; 3] = [
    RuleLine {
        tag: "react-component",
        title: "React Component Tests",
        description: "Component testing with user interactions, form validation, and state management",
        framework: "React Testing Library",
        effort: "3-4 hours",
        complexity: Complexity::High,
    },
    RuleLine {
        tag: "react-hooks",
        title: "React Hooks Tests",
        description: "Testing custom hooks, useEffect, useState, and other React hooks",
        framework: "React Testing Library",
        effort: "2-3 hours",
        complexity: Complexity::Medium,
    },
    RuleLine {
        tag: "react-accessibility",
        title: "React Accessibility Tests",
        description: "Accessibility testing with jest-axe and screen reader compatibility",
        framework: "React Testing Library + jest-axe",
        effort: "2-3 hours",
        complexity: Complexity::Medium,
    },
];

const SCRIPT_GENERIC: [RuleLine; 3] = [
    RuleLine {
        tag: "js-unit",
        title: "JavaScript Unit Tests",
        description: "Unit tests for JavaScript functions and modules",
        framework: "Jest",
        effort: "1-2 hours",
        complexity: Complexity::Low,
    },
    RuleLine {
        tag: "js-integration",
        title: "JavaScript Integration Tests",
        description: "Integration tests for module interactions and data flow",
        framework: "Jest",
        effort: "2-3 hours",
        complexity: Complexity::Medium,
    },
    RuleLine {
        tag: "js-error",
        title: "JavaScript Error Handling Tests",
        description: "Error handling and edge case testing for robust code",
        framework: "Jest",
        effort: "1-2 hours",
        complexity: Complexity::Medium,
    },
];

const PYTHON_DATA: [RuleLine; 3] = [
    RuleLine {
        tag: "python-data",
        title: "Python Data Processing Tests",
        description: "Unit tests for data processing, validation, and analysis functions",
        framework: "pytest",
        effort: "2-3 hours",
        complexity: Complexity::Medium,
    },
    RuleLine {
        tag: "python-performance",
        title: "Python Performance Tests",
        description: "Performance testing for data processing with large datasets",
        framework: "pytest + pytest-benchmark",
        effort: "2-3 hours",
        complexity: Complexity::High,
    },
    RuleLine {
        tag: "python-memory",
        title: "Python Memory Tests",
        description: "Memory usage testing and optimization validation",
        framework: "pytest + memory-profiler",
        effort: "1-2 hours",
        complexity: Complexity::High,
    },
];

const PYTHON_GENERIC: [RuleLine; 3] = [
    RuleLine {
        tag: "python-unit",
        title: "Python Unit Tests",
        description: "Comprehensive unit tests for Python functions and classes",
        framework: "pytest",
        effort: "1-2 hours",
        complexity: Complexity::Low,
    },
    RuleLine {
        tag: "python-mock",
        title: "Python Mock Tests",
        description: "Mock testing for external dependencies and API calls",
        framework: "pytest + pytest-mock",
        effort: "2-3 hours",
        complexity: Complexity::Medium,
    },
    RuleLine {
        tag: "python-async",
        title: "Python Async Tests",
        description: "Asynchronous testing for async/await functions",
        framework: "pytest + pytest-asyncio",
        effort: "2-3 hours",
        complexity: Complexity::Medium,
    },
];

const API: [RuleLine; 3] = [
    RuleLine {
        tag: "api-integration",
        title: "API Integration Tests",
        description: "End-to-end API testing for REST endpoints with proper error handling",
        framework: "Supertest",
        effort: "1-2 hours",
        complexity: Complexity::Low,
    },
    RuleLine {
        tag: "api-unit",
        title: "API Unit Tests",
        description: "Unit tests for API controllers and business logic",
        framework: "Jest",
        effort: "2-3 hours",
        complexity: Complexity::Medium,
    },
    RuleLine {
        tag: "api-security",
        title: "API Security Tests",
        description: "Security testing for authentication, authorization, and input validation",
        framework: "Jest + Supertest",
        effort: "2-3 hours",
        complexity: Complexity::High,
    },
];

const BROWSER: [RuleLine; 3] = [
    RuleLine {
        tag: "selenium-e2e",
        title: "Selenium E2E Tests",
        description: "End-to-end browser automation tests for web application functionality",
        framework: "Selenium WebDriver",
        effort: "4-5 hours",
        complexity: Complexity::High,
    },
    RuleLine {
        tag: "selenium-performance",
        title: "Selenium Performance Tests",
        description: "Performance testing for web page load times and user interactions",
        framework: "Selenium WebDriver + pytest",
        effort: "3-4 hours",
        complexity: Complexity::High,
    },
    RuleLine {
        tag: "selenium-cross-browser",
        title: "Cross-Browser Tests",
        description: "Cross-browser compatibility testing with Chrome, Firefox, Safari",
        framework: "Selenium WebDriver + pytest",
        effort: "5-6 hours",
        complexity: Complexity::High,
    },
];

const DATABASE: [RuleLine; 2] = [
    RuleLine {
        tag: "db-unit",
        title: "Database Unit Tests",
        description: "Unit tests for database models and queries",
        framework: "Jest + SQLite",
        effort: "2-3 hours",
        complexity: Complexity::Medium,
    },
    RuleLine {
        tag: "db-integration",
        title: "Database Integration Tests",
        description: "Integration tests for database operations and transactions",
        framework: "Jest + PostgreSQL",
        effort: "3-4 hours",
        complexity: Complexity::High,
    },
];

const CONFIG: [RuleLine; 1] = [RuleLine {
    tag: "config-validation",
    title: "Configuration Validation Tests",
    description: "Tests for configuration validation and environment setup",
    framework: "Jest",
    effort: "1-2 hours",
    complexity: Complexity::Low,
}];

const FALLBACK: [RuleLine; 2] = [
    RuleLine {
        tag: "generic-unit",
        title: "Generic Unit Tests",
        description: "Basic unit tests for the selected files",
        framework: "Jest",
        effort: "1-2 hours",
        complexity: Complexity::Low,
    },
    RuleLine {
        tag: "generic-integration",
        title: "Generic Integration Tests",
        description: "Integration tests for file interactions and workflows",
        framework: "Jest",
        effort: "2-3 hours",
        complexity: Complexity::Medium,
    },
];

const SCRIPT_EXTENSIONS: [&str; 4] = [".js", ".ts", ".jsx", ".tsx"];

fn contains_any(name: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| name.contains(k))
}

/* ============================================================
   Engine
   ============================================================ */

pub struct SuggestionEngine {
    seq: AtomicU64,
}

impl Default for SuggestionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SuggestionEngine {
    pub fn new() -> Self {
        Self {
            seq: AtomicU64::new(1),
        }
    }

    /// Map the selected files to suggestions. Cannot fail: an empty
    /// (or unmatched) selection yields the generic fallback pair.
    pub fn generate(&self, files: &[FileNode]) -> Vec<SuggestionDescriptor> {
        let mut out = Vec::new();

        for file in files {
            let name = file.name.to_lowercase();

            if SCRIPT_EXTENSIONS.iter().any(|e| name.ends_with(e)) {
                if contains_any(&name, &["calculator", "math", "calc"]) {
                    self.emit(&mut out, &CALCULATOR, &file.name);
                } else if contains_any(&name, &["user", "profile", "form"]) {
                    self.emit(&mut out, &REACT_ENTITY, &file.name);
                } else {
                    self.emit(&mut out, &SCRIPT_GENERIC, &file.name);
                }
            } else if name.ends_with(".py") {
                if contains_any(&name, &["data", "process", "analysis"]) {
                    self.emit(&mut out, &PYTHON_DATA, &file.name);
                } else {
                    self.emit(&mut out, &PYTHON_GENERIC, &file.name);
                }
            }

            // keyword families are evaluated regardless of extension
            if contains_any(&name, &["api", "route", "controller"]) {
                self.emit(&mut out, &API, &file.name);
            }
            if contains_any(&name, &["page", "e2e", "selenium"]) {
                self.emit(&mut out, &BROWSER, &file.name);
            }
            if contains_any(&name, &["db", "database", "model"]) {
                self.emit(&mut out, &DATABASE, &file.name);
            }
            if contains_any(&name, &["config", "env", "settings"]) {
                self.emit(&mut out, &CONFIG, &file.name);
            }
        }

        if out.is_empty() {
            let all_names: Vec<String> = files.iter().map(|f| f.name.clone()).collect();
            for line in &FALLBACK {
                out.push(self.build(line, all_names.clone()));
            }
        }

        out
    }

    fn emit(&self, out: &mut Vec<SuggestionDescriptor>, lines: &[RuleLine], file_name: &str) {
        for line in lines {
            out.push(self.build(line, vec![file_name.to_string()]));
        }
    }

    fn build(&self, line: &RuleLine, files: Vec<String>) -> SuggestionDescriptor {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);

        SuggestionDescriptor {
            id: format!("{}-{}", line.tag, seq),
            title: line.title.to_string(),
            description: line.description.to_string(),
            framework: line.framework.to_string(),
            files,
            estimated_effort: line.effort.to_string(),
            complexity: line.complexity,
        }
    }
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
            size: 0,
            identity: String::new(),
            content: None,
        }
    }

    #[test]
    fn calculator_emits_the_jest_trio_in_order() {
        let engine = SuggestionEngine::new();
        let out = engine.generate(&[file("calculator.js")]);

        assert_eq!(out.len(), 3);
        assert_eq!(out[0].title, "Calculator Unit Tests");
        assert_eq!(out[1].title, "Calculator Integration Tests");
        assert_eq!(out[2].title, "Calculator Performance Tests");
        assert_eq!(
            out.iter().map(|s| s.complexity).collect::<Vec<_>>(),
            [Complexity::Medium, Complexity::Medium, Complexity::High]
        );
        assert!(out.iter().all(|s| s.files == ["calculator.js"]));
    }

    #[test]
    fn empty_selection_yields_the_fallback_pair() {
        let engine = SuggestionEngine::new();
        let out = engine.generate(&[]);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].title, "Generic Unit Tests");
        assert_eq!(out[0].complexity, Complexity::Low);
        assert_eq!(out[1].title, "Generic Integration Tests");
        assert_eq!(out[1].complexity, Complexity::Medium);
        assert!(out[0].files.is_empty());
    }

    #[test]
    fn fallback_lists_every_selected_file() {
        let engine = SuggestionEngine::new();
        // .md matches no rule family
        let out = engine.generate(&[file("README.md"), file("LICENSE.md")]);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].files, ["README.md", "LICENSE.md"]);
        assert_eq!(out[1].files, ["README.md", "LICENSE.md"]);
    }

    // The overlap is intended union semantics: a file matching both the
    // UI-entity branch and the API keyword family gets both rule sets.
    #[test]
    fn keyword_families_accumulate_across_matches() {
        let engine = SuggestionEngine::new();
        let out = engine.generate(&[file("user-api-controller.js")]);

        assert_eq!(out.len(), 6);
        assert_eq!(out[0].title, "React Component Tests");
        assert_eq!(out[3].title, "API Integration Tests");
    }

    #[test]
    fn python_data_branch_wins_over_generic() {
        let engine = SuggestionEngine::new();
        let out = engine.generate(&[file("data_processor.py")]);

        assert_eq!(out.len(), 3);
        assert_eq!(out[0].framework, "pytest");
        assert_eq!(out[1].framework, "pytest + pytest-benchmark");
        assert_eq!(out[2].complexity, Complexity::High);
    }

    #[test]
    fn persistence_and_config_families_match_without_extension() {
        let engine = SuggestionEngine::new();

        let db = engine.generate(&[file("models.go")]);
        assert_eq!(db.len(), 2);
        assert_eq!(db[0].title, "Database Unit Tests");

        let cfg = engine.generate(&[file("settings.yaml")]);
        assert_eq!(cfg.len(), 1);
        assert_eq!(cfg[0].title, "Configuration Validation Tests");
        assert_eq!(cfg[0].complexity, Complexity::Low);
    }

    #[test]
    fn page_keyword_emits_the_browser_trio() {
        let engine = SuggestionEngine::new();
        let out = engine.generate(&[file("HomePage.kt")]);

        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|s| s.complexity == Complexity::High));
    }

    #[test]
    fn ids_stay_unique_across_repeated_passes() {
        let engine = SuggestionEngine::new();
        let first = engine.generate(&[file("auth.js")]);
        let second = engine.generate(&[file("auth.js")]);

        let mut ids: Vec<&str> = first
            .iter()
            .chain(second.iter())
            .map(|s| s.id.as_str())
            .collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn files_are_classified_independently() {
        let engine = SuggestionEngine::new();
        let out = engine.generate(&[file("calculator.js"), file("config.toml")]);

        assert_eq!(out.len(), 4);
        assert_eq!(out[3].title, "Configuration Validation Tests");
        assert_eq!(out[3].files, ["config.toml"]);
    }
}
