//! Visual theme and styling.

use console::Style;

/// Colors used by the terminal UI.
#[derive(Debug, Clone)]
pub struct WaldoTheme {
    pub success: Style,
    pub warning: Style,
    pub error: Style,
    /// Spinner and header accent.
    pub info: Style,
    pub highlight: Style,
    /// Labels in key-value displays.
    pub key: Style,
    /// Borders around verbose detail blocks.
    pub border: Style,
}

impl Default for WaldoTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl WaldoTheme {
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red().bold(),
            info: Style::new().cyan(),
            highlight: Style::new().bold(),
            key: Style::new().bold(),
            border: Style::new().dim(),
        }
    }

    /// Create a theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            info: Style::new(),
            highlight: Style::new(),
            key: Style::new(),
            border: Style::new(),
        }
    }

    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    pub fn format_warning(&self, msg: &str) -> String {
        format!("{}", self.warning.apply_to(format!("⚠ {}", msg)))
    }

    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }

    pub fn format_header(&self, title: &str) -> String {
        format!("{} {}", self.info.apply_to("◉"), self.highlight.apply_to(title))
    }

    /// `key:` padded to a fixed column, then the value.
    pub fn format_key_value(&self, key: &str, value: &str) -> String {
        format!(
            "{} {}",
            self.key.apply_to(format!("{:<10}", format!("{}:", key))),
            value
        )
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    // https://no-color.org/
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    console::Term::stdout().is_term()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_formats_status_lines() {
        let theme = WaldoTheme::plain();
        assert_eq!(theme.format_success("Uploaded"), "✓ Uploaded");
        assert_eq!(theme.format_warning("Careful"), "⚠ Careful");
        assert_eq!(theme.format_error("Failed"), "✗ Failed");
    }

    #[test]
    fn theme_formats_key_value() {
        let theme = WaldoTheme::plain();
        assert_eq!(theme.format_key_value("Branch", "main"), "Branch:    main");
    }

    #[test]
    fn theme_formats_header() {
        let msg = WaldoTheme::plain().format_header("Waldo Agent");
        assert!(msg.contains("Waldo Agent"));
    }

    #[test]
    fn default_impl_matches_new() {
        assert_eq!(
            WaldoTheme::default().format_success("x"),
            WaldoTheme::new().format_success("x")
        );
    }
}
