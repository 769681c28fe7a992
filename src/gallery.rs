//! The gallery: catalog, registry, navigation, shell and mount wired
//! together.
//!
//! All UI input arrives as [`UiAction`]s (from the webview) or
//! [`KeyAction`]s (from the keyboard). Navigation actions are only queued;
//! [`Gallery::pump`] commits them, re-derives the selection and brings the
//! mounted sample in line with the new address.

use serde_json::Value;

use crate::catalog::Catalog;
use crate::error::VistaError;
use crate::input::KeyAction;
use crate::navigation::{Navigator, Screen};
use crate::registry::SampleRegistry;
use crate::shell::{ContentView, Shell, ShellView};
use crate::surface::{RenderSurface, SurfaceConfig, SurfaceFactory};
use crate::views::home::APP_SHORT_TITLE;
use crate::views::{HomeView, ListingView, Mounted, SampleMount, SourceView};

/// Actions sent by the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    /// Go to any address.
    Navigate {
        /// Address to resolve.
        path: String,
    },
    /// Open a category listing.
    OpenCategory {
        /// Category id.
        category: String,
    },
    /// Open a sample.
    OpenSample {
        /// Category id.
        category: String,
        /// Sample id.
        sample: String,
    },
    /// Go to the home screen.
    GoHome,
    /// History back.
    Back,
    /// History forward.
    Forward,
    /// Collapse or expand the sidebar.
    ToggleSidebar,
    /// Edit one panel control: `values[group][field] = value`.
    SetParam {
        /// Group key (empty for top-level fields).
        group: String,
        /// Field key within the group.
        field: String,
        /// New JSON value.
        value: Value,
    },
    /// Restore every panel control to its default.
    ResetParams,
    /// Return the camera to its configured placement.
    ResetCamera,
}

impl UiAction {
    /// Parse an IPC message (`{"action": "...", ...}`).
    #[must_use]
    pub fn parse(msg: &Value) -> Option<Self> {
        let text = |key: &str| msg.get(key)?.as_str().map(str::to_owned);
        let action = msg.get("action")?.as_str()?;
        match action {
            "navigate" => Some(Self::Navigate { path: text("path")? }),
            "open_category" => Some(Self::OpenCategory {
                category: text("category")?,
            }),
            "open_sample" => Some(Self::OpenSample {
                category: text("category")?,
                sample: text("sample")?,
            }),
            "go_home" => Some(Self::GoHome),
            "back" => Some(Self::Back),
            "forward" => Some(Self::Forward),
            "toggle_sidebar" => Some(Self::ToggleSidebar),
            "set_param" => Some(Self::SetParam {
                group: text("group").unwrap_or_default(),
                field: text("field")?,
                value: msg.get("value")?.clone(),
            }),
            "reset_params" => Some(Self::ResetParams),
            "reset_camera" => Some(Self::ResetCamera),
            _ => None,
        }
    }
}

/// Catalog browser bound to one surface back end.
pub struct Gallery<F: SurfaceFactory> {
    catalog: Catalog,
    registry: SampleRegistry,
    navigator: Navigator,
    shell: Shell,
    mount: SampleMount<F>,
    parameter_count: usize,
    dirty: bool,
}

impl<F: SurfaceFactory> std::fmt::Debug for Gallery<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gallery")
            .field("location", &self.navigator.location())
            .field("shell", &self.shell)
            .field("mount", &self.mount)
            .finish_non_exhaustive()
    }
}

impl<F: SurfaceFactory> Gallery<F> {
    /// Gallery starting at `address` (cold load). Nothing is mounted until
    /// the first [`pump`](Self::pump).
    pub fn new(
        registry: SampleRegistry,
        factory: F,
        defaults: SurfaceConfig,
        address: &str,
        sidebar_open: bool,
    ) -> Self {
        let parameter_count = registry.parameter_count();
        Self {
            catalog: Catalog::builtin(),
            registry,
            navigator: Navigator::new(address),
            shell: Shell::new(sidebar_open),
            mount: SampleMount::new(factory, defaults),
            parameter_count,
            dirty: true,
        }
    }

    /// Apply one UI action. Navigation is queued until the next
    /// [`pump`](Self::pump); everything else takes effect immediately.
    pub fn dispatch(&mut self, action: UiAction) {
        match action {
            UiAction::Navigate { path } => self.navigator.navigate(path),
            UiAction::OpenCategory { category } => {
                self.navigator.navigate_to_category(&category);
            }
            UiAction::OpenSample { category, sample } => {
                self.navigator.navigate_to_sample(&category, &sample);
            }
            UiAction::GoHome => self.navigator.navigate_home(),
            UiAction::Back => self.navigator.back(),
            UiAction::Forward => self.navigator.forward(),
            UiAction::ToggleSidebar => {
                self.shell.toggle_sidebar();
                self.dirty = true;
            }
            UiAction::SetParam {
                group,
                field,
                value,
            } => {
                if let Some(mounted) = self.mount.mounted_mut() {
                    if let Err(e) = mounted.panel_mut().set(&group, &field, value) {
                        log::warn!("rejected edit: {e}");
                    }
                    // Re-push either way so the UI shows the accepted value.
                    self.dirty = true;
                }
            }
            UiAction::ResetParams => {
                if let Some(mounted) = self.mount.mounted_mut() {
                    mounted.panel_mut().reset();
                    self.dirty = true;
                }
            }
            UiAction::ResetCamera => {
                if let Some(mounted) = self.mount.mounted_mut() {
                    mounted.surface_mut().reset_camera();
                }
            }
        }
    }

    /// Apply a bound key. Returns `false` for actions the gallery does not
    /// own (the caller handles those).
    pub fn key_action(&mut self, action: KeyAction) -> bool {
        match action {
            KeyAction::Back => self.dispatch(UiAction::Back),
            KeyAction::Forward => self.dispatch(UiAction::Forward),
            KeyAction::Home => self.dispatch(UiAction::GoHome),
            KeyAction::ToggleSidebar => self.dispatch(UiAction::ToggleSidebar),
            KeyAction::ResetCamera => self.dispatch(UiAction::ResetCamera),
            KeyAction::NextCategory => self.step_category(1),
            KeyAction::PreviousCategory => self.step_category(-1),
            KeyAction::NextSample => self.step_sample(1),
            KeyAction::PreviousSample => self.step_sample(-1),
            KeyAction::TogglePanel => return false,
        }
        true
    }

    fn step_category(&mut self, step: isize) {
        let all = self.catalog.all();
        let current = self
            .catalog
            .position(&self.shell.selection().current_category);
        let next = match current {
            Some(i) => wrap(i, step, all.len()),
            None => 0,
        };
        if let Some(category) = all.get(next) {
            self.navigator.navigate_to_category(category.id);
        }
    }

    fn step_sample(&mut self, step: isize) {
        let selection = self.shell.selection();
        let category = selection.current_category.clone();
        let samples = self.registry.lookup_category(&category);
        let current = selection
            .current_sample
            .as_deref()
            .and_then(|id| samples.iter().position(|s| s.id() == id));
        let next = match current {
            Some(i) => wrap(i, step, samples.len()),
            None if step < 0 => samples.len().saturating_sub(1),
            None => 0,
        };
        if let Some(entry) = samples.get(next) {
            self.navigator.navigate_to_sample(&category, entry.id());
        }
    }

    /// Commit queued navigation and bring the mount in line with the
    /// resulting address. Returns `true` if the view changed.
    ///
    /// # Errors
    ///
    /// Surface creation failures are propagated; the gallery is left with
    /// nothing mounted.
    pub fn pump(&mut self) -> Result<bool, VistaError> {
        let mut changed = false;
        while let Some(change) = self.navigator.poll() {
            self.shell.apply(&change);
            changed = true;
        }
        if changed {
            self.dirty = true;
            let selection = self.shell.selection();
            match (self.shell.screen(), &selection.current_sample) {
                (Screen::Browsing, Some(sample)) => {
                    let category = selection.current_category.clone();
                    let sample = sample.clone();
                    self.mount.render(&self.registry, &category, &sample)?;
                }
                _ => self.mount.unmount(),
            }
        }
        Ok(changed)
    }

    /// Advance the mounted sample by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        if let Some(mounted) = self.mount.mounted_mut() {
            mounted.tick(dt);
        }
    }

    /// Full view model for the UI.
    #[must_use]
    pub fn view(&self) -> ShellView {
        match self.shell.screen() {
            Screen::Home => ShellView::Home {
                home: HomeView::render(
                    &self.catalog,
                    &self.registry,
                    self.parameter_count,
                ),
            },
            Screen::Browsing => {
                let selection = self.shell.selection();
                let content = match self.mount.view() {
                    Some(mount) if selection.current_sample.is_some() => {
                        ContentView::Sample(mount)
                    }
                    _ => ContentView::Listing(ListingView::render(
                        &self.catalog,
                        &self.registry,
                        &selection.current_category,
                    )),
                };
                ShellView::Browsing {
                    sidebar: self.shell.sidebar(&self.catalog),
                    header: self.shell.header(
                        &self.catalog,
                        self.navigator.can_go_back(),
                        self.navigator.can_go_forward(),
                    ),
                    content,
                }
            }
        }
    }

    /// `true` once since the view last changed.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Native window title mirroring the header.
    #[must_use]
    pub fn window_title(&self) -> String {
        match self.shell.screen() {
            Screen::Home => APP_SHORT_TITLE.to_owned(),
            Screen::Browsing => self
                .shell
                .header(&self.catalog, false, false)
                .window_title(APP_SHORT_TITLE),
        }
    }

    /// Committed address.
    #[must_use]
    pub fn location(&self) -> String {
        self.navigator.location()
    }

    /// The category catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The sample registry.
    #[must_use]
    pub fn registry(&self) -> &SampleRegistry {
        &self.registry
    }

    /// Shell state.
    #[must_use]
    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    /// The live mount, if any.
    #[must_use]
    pub fn mounted(&self) -> Option<&Mounted<F::Surface>> {
        self.mount.mounted()
    }

    /// Source text of the mounted sample for the code viewer.
    #[must_use]
    pub fn source_view(&self) -> Option<SourceView> {
        self.mount.source_view()
    }

    /// Mutable access to the live mount.
    pub fn mounted_mut(&mut self) -> Option<&mut Mounted<F::Surface>> {
        self.mount.mounted_mut()
    }

    /// The surface factory.
    pub fn factory_mut(&mut self) -> &mut F {
        self.mount.factory_mut()
    }

    /// The surface factory.
    #[must_use]
    pub fn factory(&self) -> &F {
        self.mount.factory()
    }

    /// Drop the mount and its surface.
    pub fn shutdown(&mut self) {
        self.mount.unmount();
    }
}

fn wrap(index: usize, step: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (index as isize + step).rem_euclid(len as isize) as usize
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::surface::recording::{RecordingFactory, SurfaceEvent};
    use crate::views::listing::EMPTY_LISTING_TEXT;
    use crate::views::mount::NOT_FOUND_TEXT;
    use crate::views::MountView;

    fn gallery(address: &str) -> Gallery<RecordingFactory> {
        let mut gallery = Gallery::new(
            SampleRegistry::builtin().unwrap(),
            RecordingFactory::default(),
            SurfaceConfig::default(),
            address,
            true,
        );
        let _ = gallery.pump().unwrap();
        gallery
    }

    fn content(gallery: &Gallery<RecordingFactory>) -> ContentView {
        match gallery.view() {
            ShellView::Browsing { content, .. } => content,
            ShellView::Home { .. } => panic!("expected browsing"),
        }
    }

    #[test]
    fn basics_listing_shows_exactly_basics() {
        let g = gallery("/category/basics");
        let ContentView::Listing(listing) = content(&g) else {
            panic!("expected listing");
        };
        let ids: Vec<_> = listing.cards.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["basic-cube", "basic-sphere"]);
        assert_eq!(g.factory().live(), 0);
    }

    #[test]
    fn basic_cube_creates_one_shared_surface() {
        let g = gallery("/category/basics/basic-cube");
        assert_eq!(g.factory().events(), [SurfaceEvent::Created(1)]);
        assert_eq!(g.mounted().unwrap().surface().config, SurfaceConfig::default());
    }

    #[test]
    fn switching_samples_tears_down_first() {
        let mut g = gallery("/category/basics/basic-cube");
        g.dispatch(UiAction::Navigate {
            path: "/category/materials/material-showcase".to_owned(),
        });
        assert!(g.pump().unwrap());
        assert_eq!(
            g.factory().events(),
            [
                SurfaceEvent::Created(1),
                SurfaceEvent::Dropped(1),
                SurfaceEvent::Created(2),
            ]
        );
    }

    #[test]
    fn unknown_category_shows_coming_soon() {
        let g = gallery("/category/unknown-category");
        let ContentView::Listing(listing) = content(&g) else {
            panic!("expected listing");
        };
        assert_eq!(listing.empty_message, Some(EMPTY_LISTING_TEXT));
    }

    #[test]
    fn unknown_sample_shows_not_found() {
        let g = gallery("/category/basics/nope");
        assert!(matches!(
            content(&g),
            ContentView::Sample(MountView::NotFound { message: NOT_FOUND_TEXT, .. })
        ));
        assert_eq!(g.factory().live(), 0);
    }

    #[test]
    fn root_lands_on_home_without_surface() {
        let g = gallery("/");
        assert!(matches!(g.view(), ShellView::Home { .. }));
        assert_eq!(g.location(), "/home");
        assert_eq!(g.factory().live(), 0);
    }

    #[test]
    fn going_home_unmounts() {
        let mut g = gallery("/category/lights/lighting-demo");
        g.dispatch(UiAction::GoHome);
        let _ = g.pump().unwrap();
        assert_eq!(g.factory().live(), 0);
        assert_eq!(g.shell().selection().current_category, "lights");
    }

    #[test]
    fn navigation_waits_for_pump() {
        let mut g = gallery("/category/basics");
        g.dispatch(UiAction::OpenSample {
            category: "basics".to_owned(),
            sample: "basic-sphere".to_owned(),
        });
        assert_eq!(g.location(), "/category/basics");
        assert!(g.mounted().is_none());
        let _ = g.pump().unwrap();
        assert_eq!(g.location(), "/category/basics/basic-sphere");
        assert!(g.mounted().is_some());
    }

    #[test]
    fn back_restores_previous_sample() {
        let mut g = gallery("/category/basics/basic-cube");
        g.dispatch(UiAction::OpenCategory {
            category: "lights".to_owned(),
        });
        let _ = g.pump().unwrap();
        g.dispatch(UiAction::Back);
        let _ = g.pump().unwrap();
        assert_eq!(g.location(), "/category/basics/basic-cube");
        assert_eq!(g.factory().live(), 1);
    }

    #[test]
    fn sidebar_toggle_keeps_address_and_mount() {
        let mut g = gallery("/category/basics/basic-cube");
        let _ = g.take_dirty();
        g.dispatch(UiAction::ToggleSidebar);
        assert!(!g.pump().unwrap());
        assert!(g.take_dirty());
        assert_eq!(g.location(), "/category/basics/basic-cube");
        assert_eq!(g.factory().events(), [SurfaceEvent::Created(1)]);
    }

    #[test]
    fn param_edits_reach_the_panel() {
        let mut g = gallery("/category/basics/basic-cube");
        let panel = g.mounted().unwrap().panel();
        let group = panel.spec().groups()[0].key.clone();
        let toggle = panel.spec().groups()[0]
            .fields
            .iter()
            .find(|f| f.kind == crate::panel::ControlKind::Toggle)
            .map(|f| f.key.clone())
            .unwrap();
        g.dispatch(UiAction::SetParam {
            group: group.clone(),
            field: toggle.clone(),
            value: json!(true),
        });
        assert_eq!(
            g.mounted().unwrap().panel().get(&group, &toggle),
            Some(&json!(true))
        );
        g.dispatch(UiAction::SetParam {
            group,
            field: toggle,
            value: json!("not a bool"),
        });
        assert_eq!(g.mounted().unwrap().panel().revision(), 1);
        g.dispatch(UiAction::ResetParams);
        assert_eq!(g.mounted().unwrap().panel().revision(), 2);
    }

    #[test]
    fn reset_camera_reaches_the_surface() {
        let mut g = gallery("/category/basics/basic-cube");
        g.dispatch(UiAction::ResetCamera);
        assert_eq!(
            g.factory().events(),
            [SurfaceEvent::Created(1), SurfaceEvent::CameraReset(1)]
        );
    }

    #[test]
    fn keys_step_through_categories_and_samples() {
        let mut g = gallery("/category/basics");
        assert!(g.key_action(KeyAction::NextSample));
        let _ = g.pump().unwrap();
        assert_eq!(g.location(), "/category/basics/basic-cube");
        assert!(g.key_action(KeyAction::NextSample));
        let _ = g.pump().unwrap();
        assert_eq!(g.location(), "/category/basics/basic-sphere");
        assert!(g.key_action(KeyAction::NextSample));
        let _ = g.pump().unwrap();
        assert_eq!(g.location(), "/category/basics/basic-cube");

        assert!(g.key_action(KeyAction::PreviousCategory));
        let _ = g.pump().unwrap();
        assert_eq!(g.location(), "/category/advanced");
        assert!(!g.key_action(KeyAction::TogglePanel));
    }

    #[test]
    fn window_title_follows_header() {
        let g = gallery("/category/basics/basic-cube");
        assert_eq!(g.window_title(), "Vista - Basics / basic-cube");
    }

    #[test]
    fn shutdown_drops_everything() {
        let mut g = gallery("/category/basics/basic-cube");
        g.shutdown();
        assert_eq!(g.factory().live(), 0);
    }

    #[test]
    fn surface_failure_is_propagated() {
        let mut g = gallery("/category/basics");
        g.factory_mut().fail = true;
        g.dispatch(UiAction::OpenSample {
            category: "basics".to_owned(),
            sample: "basic-cube".to_owned(),
        });
        assert!(matches!(g.pump(), Err(VistaError::Surface(_))));
    }

    #[test]
    fn ipc_messages_parse() {
        assert_eq!(
            UiAction::parse(&json!({"action": "open_sample", "category": "a", "sample": "b"})),
            Some(UiAction::OpenSample {
                category: "a".to_owned(),
                sample: "b".to_owned()
            })
        );
        assert_eq!(
            UiAction::parse(&json!({"action": "set_param", "field": "x", "value": 1})),
            Some(UiAction::SetParam {
                group: String::new(),
                field: "x".to_owned(),
                value: json!(1)
            })
        );
        assert_eq!(UiAction::parse(&json!({"action": "back"})), Some(UiAction::Back));
        assert_eq!(UiAction::parse(&json!({"action": "open_sample"})), None);
        assert_eq!(UiAction::parse(&json!({"action": "explode"})), None);
        assert_eq!(UiAction::parse(&json!({})), None);
    }
}
