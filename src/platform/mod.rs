//! Host collaborator
//!
//! The page (or the native runner) owns user-facing notifications and the
//! file picker; the game reaches them only through [`Host`].

use log::{info, warn};

pub trait Host {
    /// Show a blocking message to the user
    fn alert(&mut self, message: &str);

    /// Forget the file chosen for import, so the same file can be picked again
    fn clear_file_selection(&mut self);
}

/// Host for headless runs: alerts go to the log and are kept for inspection
#[derive(Debug, Clone, Default)]
pub struct LogHost {
    alerts: Vec<String>,
    selection_clears: u32,
}

impl LogHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    pub fn selection_clears(&self) -> u32 {
        self.selection_clears
    }
}

impl Host for LogHost {
    fn alert(&mut self, message: &str) {
        warn!("{message}");
        self.alerts.push(message.to_string());
    }

    fn clear_file_selection(&mut self) {
        info!("File selection cleared");
        self.selection_clears += 1;
    }
}
