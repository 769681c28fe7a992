use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
/// Start-up navigation state.
pub struct NavigationOptions {
    /// Address opened at start-up. Overridden by the command line.
    pub initial_address: String,
    /// Sidebar expanded at start-up.
    pub sidebar_open: bool,
}

impl Default for NavigationOptions {
    fn default() -> Self {
        Self {
            initial_address: "/".to_owned(),
            sidebar_open: true,
        }
    }
}
