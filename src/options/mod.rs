//! Application options with TOML preset support.
//!
//! Window placement, start-up navigation, the shared surface defaults, the
//! parameter panel and keybindings live here. Options serialize to/from TOML
//! so users can keep presets next to the binary.

mod keybindings;
mod navigation;
mod panel;
mod surface;
mod window;

use std::path::Path;

pub use keybindings::KeybindingOptions;
pub use navigation::NavigationOptions;
pub use panel::PanelOptions;
use serde::{Deserialize, Serialize};
pub use surface::SurfaceOptions;
pub use window::WindowOptions;

use crate::error::VistaError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[surface]`) work correctly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Options {
    /// Native window.
    pub window: WindowOptions,
    /// Start-up navigation.
    pub navigation: NavigationOptions,
    /// Shared surface defaults.
    pub surface: SurfaceOptions,
    /// Parameter panel.
    pub panel: PanelOptions,
    /// Keyboard binding options.
    pub keybindings: KeybindingOptions,
}

impl Options {
    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, VistaError> {
        let content = std::fs::read_to_string(path).map_err(VistaError::Io)?;
        let mut opts: Self = toml::from_str(&content)
            .map_err(|e| VistaError::OptionsParse(e.to_string()))?;
        opts.keybindings.rebuild_reverse_map();
        Ok(opts)
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), VistaError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| VistaError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(VistaError::Io)?;
        }
        std::fs::write(path, content).map_err(VistaError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyAction;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let mut parsed: Options = toml::from_str(&toml_str).unwrap();
        parsed.keybindings.rebuild_reverse_map();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
[surface]
fov_y = 70.0

[navigation]
initial_address = "/category/lights"
"#;
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.surface.fov_y, 70.0);
        assert_eq!(opts.navigation.initial_address, "/category/lights");
        // Everything else should be default
        assert_eq!(opts.surface.rotate_speed, 1.0);
        assert!(opts.navigation.sidebar_open);
        assert_eq!(opts.window, WindowOptions::default());
    }

    #[test]
    fn keybinding_lookup() {
        let opts = Options::default();
        assert_eq!(opts.keybindings.lookup("KeyQ"), Some(KeyAction::ResetCamera));
        assert_eq!(
            opts.keybindings.lookup("BracketRight"),
            Some(KeyAction::NextCategory)
        );
        assert_eq!(opts.keybindings.lookup("KeyZ"), None);
    }

    #[test]
    fn load_rebuilds_reverse_map() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "[keybindings.bindings]\nreset_camera = \"KeyR\"\n",
        )
        .unwrap();
        let opts = Options::load(&path).unwrap();
        assert_eq!(opts.keybindings.lookup("KeyR"), Some(KeyAction::ResetCamera));
        assert_eq!(opts.keybindings.lookup("KeyQ"), None);
    }

    #[test]
    fn save_then_load_and_list() {
        let dir = tempfile::tempdir().unwrap();
        let mut opts = Options::default();
        opts.window.width = 1600;
        opts.save(&dir.path().join("presets/wide.toml")).unwrap();
        Options::default()
            .save(&dir.path().join("presets/default.toml"))
            .unwrap();
        std::fs::write(dir.path().join("presets/notes.txt"), "x").unwrap();

        let loaded = Options::load(&dir.path().join("presets/wide.toml")).unwrap();
        assert_eq!(loaded.window.width, 1600);
        assert_eq!(
            Options::list_presets(&dir.path().join("presets")),
            ["default", "wide"]
        );
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[surface\nfov_y = ").unwrap();
        assert!(matches!(Options::load(&path), Err(VistaError::OptionsParse(_))));
        assert!(matches!(
            Options::load(&dir.path().join("missing.toml")),
            Err(VistaError::Io(_))
        ));
    }
}
