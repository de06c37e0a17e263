//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion.
//!
//! # Example
//!
//! ```
//! use waldo::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.key_value("Branch", "main");
//! ui.warning("No git information");
//!
//! assert_eq!(ui.value_of("Branch"), Some("main"));
//! assert!(ui.has_warning("git"));
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use super::{OutputMode, SpinnerHandle, UserInterface};

/// Mock UI implementation for testing.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    warnings: Vec<String>,
    errors: Vec<String>,
    headers: Vec<String>,
    pairs: Vec<(String, String)>,
    details: Vec<(String, String)>,
    spinners: Vec<String>,
    spinner_outcomes: Rc<RefCell<Vec<Result<String, String>>>>,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Captured `key_value` calls, in order.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Captured `detail` blocks as (title, body). Recorded in every mode.
    pub fn details(&self) -> &[(String, String)] {
        &self.details
    }

    /// Spinner messages that were started.
    pub fn spinners(&self) -> &[String] {
        &self.spinners
    }

    /// How each spinner finished: `Ok(msg)` for success, `Err(msg)` for error.
    pub fn spinner_outcomes(&self) -> Vec<Result<String, String>> {
        self.spinner_outcomes.borrow().clone()
    }

    /// Value of the last `key_value` line with this key.
    pub fn value_of(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_warning(&self, msg: &str) -> bool {
        self.warnings.iter().any(|m| m.contains(msg))
    }

    pub fn has_error(&self, msg: &str) -> bool {
        self.errors.iter().any(|m| m.contains(msg))
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn key_value(&mut self, key: &str, value: &str) {
        self.pairs.push((key.to_string(), value.to_string()));
    }

    fn detail(&mut self, title: &str, body: &str) {
        self.details.push((title.to_string(), body.to_string()));
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        self.spinners.push(message.to_string());
        Box::new(MockSpinner {
            outcomes: Rc::clone(&self.spinner_outcomes),
        })
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }
}

/// Spinner returned by [`MockUI`]; reports how it finished back to the UI.
pub struct MockSpinner {
    outcomes: Rc<RefCell<Vec<Result<String, String>>>>,
}

impl SpinnerHandle for MockSpinner {
    fn finish_success(&mut self, msg: &str) {
        self.outcomes.borrow_mut().push(Ok(msg.to_string()));
    }

    fn finish_error(&mut self, msg: &str) {
        self.outcomes.borrow_mut().push(Err(msg.to_string()));
    }
}
