//! Severity colouring for terminal output
//!
//! Honours `--no-color`, the `[display] color` config key and `NO_COLOR`.

use colored::{ColoredString, Colorize};

use crate::notifications::{NotificationType, Priority};

/// Manages colour output for the CLI
#[derive(Debug, Clone, Copy)]
pub struct ColourManager {
    enabled: bool,
}

impl ColourManager {
    /// Detect from the environment: `NO_COLOR` disables, as does a non-terminal stdout
    pub fn new() -> Self {
        use std::io::IsTerminal;
        let enabled = std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal();
        Self { enabled }
    }

    /// Explicit colour control
    pub fn with_colours(enabled: bool) -> Self {
        Self { enabled }
    }

    /// CLI `--no-color` beats the config file, which beats detection
    pub fn from_args_and_config(no_color_flag: bool, config_enabled: Option<bool>) -> Self {
        if no_color_flag {
            return Self::with_colours(false);
        }
        match config_enabled {
            Some(false) => Self::with_colours(false),
            _ => Self::new(),
        }
    }

    pub fn colours_enabled(&self) -> bool {
        self.enabled
    }

    /// Type label coloured by outcome
    pub fn kind(&self, kind: NotificationType) -> ColoredString {
        let text = kind.as_str();
        if !self.enabled {
            return text.normal();
        }
        match kind {
            NotificationType::Success => text.green(),
            NotificationType::Error => text.red().bold(),
            NotificationType::Warning => text.yellow(),
            NotificationType::Info => text.blue(),
        }
    }

    /// Priority label; high stands out, low fades
    pub fn priority(&self, priority: Priority) -> ColoredString {
        let text = priority.as_str();
        if !self.enabled {
            return text.normal();
        }
        match priority {
            Priority::High => text.red().bold(),
            Priority::Medium => text.yellow(),
            Priority::Low => text.bright_black(),
        }
    }

    /// Marker for unread records
    pub fn unread_marker(&self, read: bool) -> ColoredString {
        match (read, self.enabled) {
            (true, _) => " ".normal(),
            (false, true) => "*".cyan().bold(),
            (false, false) => "*".normal(),
        }
    }

    pub fn highlight(&self, text: &str) -> ColoredString {
        if self.enabled {
            text.cyan().bold()
        } else {
            text.normal()
        }
    }
}

impl Default for ColourManager {
    fn default() -> Self {
        Self::new()
    }
}
