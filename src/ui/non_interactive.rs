//! Plain line output for CI logs and pipes.

use super::{OutputMode, SpinnerHandle, UserInterface};

/// UI that never draws spinners or colors.
///
/// Spinner start and finish messages become ordinary lines so CI logs keep
/// a record of each step.
pub struct NonInteractiveUI {
    mode: OutputMode,
}

impl NonInteractiveUI {
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn warning(&mut self, msg: &str) {
        eprintln!("⚠ {}", msg);
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn key_value(&mut self, key: &str, value: &str) {
        println!("{:<10} {}", format!("{}:", key), value);
    }

    fn detail(&mut self, title: &str, body: &str) {
        if self.mode.shows_details() {
            println!("\n--- {} ---\n{}\n", title, body);
        }
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            println!("{}", message);
        }
        Box::new(LineSpinner)
    }

    fn show_header(&mut self, title: &str) {
        println!("{}\n", title);
    }
}

struct LineSpinner;

impl SpinnerHandle for LineSpinner {
    fn finish_success(&mut self, msg: &str) {
        println!("✓ {}", msg);
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }
}
