//! Resolves a (category, sample) pair and owns the mounted sample.
//!
//! A mount bundles the sample instance, its parameter panel and the surface
//! it draws into. All three live and die together: switching samples drops
//! the previous mount (and with it the surface) before the next surface is
//! created.

use serde::Serialize;
use serde_json::Value;

use crate::error::VistaError;
use crate::panel::{ParameterGroup, ParameterPanel};
use crate::registry::{SampleEntry, SampleRegistry};
use crate::sample::{FrameInput, Sample};
use crate::scene::Scene;
use crate::surface::{RenderSurface, SurfaceConfig, SurfaceFactory};

/// Placeholder shown when the pair is not registered.
pub const NOT_FOUND_TEXT: &str = "Sample not found";

/// Identity of a mount.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MountKey {
    /// Category id.
    pub category: String,
    /// Sample id.
    pub sample: String,
}

impl MountKey {
    fn matches(&self, category: &str, sample: &str) -> bool {
        self.category == category && self.sample == sample
    }
}

/// A live sample with its panel and surface.
pub struct Mounted<S> {
    key: MountKey,
    entry: SampleEntry,
    unit: Box<dyn Sample>,
    panel: ParameterPanel,
    surface: S,
    frame: FrameInput,
    scene: Scene,
}

impl<S: RenderSurface> Mounted<S> {
    /// Registry entry of the mounted sample.
    #[must_use]
    pub fn entry(&self) -> &SampleEntry {
        &self.entry
    }

    /// Parameter panel of this mount.
    #[must_use]
    pub fn panel(&self) -> &ParameterPanel {
        &self.panel
    }

    /// Mutable parameter panel.
    pub fn panel_mut(&mut self) -> &mut ParameterPanel {
        &mut self.panel
    }

    /// Surface owned by this mount.
    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable surface.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Scene written by the last [`tick`](Self::tick).
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Surface and scene together, for drawing.
    pub fn stage(&mut self) -> (&mut S, &Scene) {
        (&mut self.surface, &self.scene)
    }

    /// Timing of the last frame.
    #[must_use]
    pub fn frame(&self) -> &FrameInput {
        &self.frame
    }

    /// Advance by `dt` seconds and let the sample rebuild its scene.
    pub fn tick(&mut self, dt: f32) {
        self.frame = self.frame.advance(dt);
        self.frame.eye = self.surface.eye();
        self.scene.clear();
        self.unit.update(&self.frame, &self.panel, &mut self.scene);
    }
}

impl<S> std::fmt::Debug for Mounted<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mounted")
            .field("key", &self.key)
            .field("frame", &self.frame)
            .finish_non_exhaustive()
    }
}

enum MountState<S> {
    Empty,
    NotFound(MountKey),
    Mounted(Box<Mounted<S>>),
}

/// What the content area shows for a sample address.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum MountView {
    /// The pair is not registered.
    NotFound {
        /// Placeholder text.
        message: &'static str,
        /// Requested category id.
        category: String,
        /// Requested sample id.
        sample: String,
    },
    /// A sample is mounted.
    Mounted {
        /// Category id.
        category: String,
        /// Sample id.
        sample: String,
        /// Display title.
        title: &'static str,
        /// Description.
        description: &'static str,
        /// Whether the sample configured its own surface.
        own_surface: bool,
        /// Panel controls.
        groups: Vec<ParameterGroup>,
        /// Current panel values.
        values: Value,
        /// Bumped on every panel edit.
        revision: u64,
        /// Whether source text can be requested for the code viewer.
        has_source: bool,
    },
}

/// Source text of the mounted sample, pushed on request so panel edits do
/// not re-send it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceView {
    /// Category id.
    pub category: String,
    /// Sample id.
    pub sample: String,
    /// Full source text.
    pub text: &'static str,
}

/// Sample mount view: keeps at most one sample mounted.
pub struct SampleMount<F: SurfaceFactory> {
    factory: F,
    defaults: SurfaceConfig,
    state: MountState<F::Surface>,
}

impl<F: SurfaceFactory> std::fmt::Debug for SampleMount<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &self.state {
            MountState::Empty => "empty",
            MountState::NotFound(_) => "not found",
            MountState::Mounted(_) => "mounted",
        };
        f.debug_struct("SampleMount")
            .field("state", &state)
            .finish_non_exhaustive()
    }
}

impl<F: SurfaceFactory> SampleMount<F> {
    /// Nothing mounted. `defaults` configures the shared surface.
    pub fn new(factory: F, defaults: SurfaceConfig) -> Self {
        Self {
            factory,
            defaults,
            state: MountState::Empty,
        }
    }

    /// Show `(category, sample)`.
    ///
    /// Rendering the pair that is already mounted keeps the mount as is.
    /// Otherwise the current mount is dropped first, then the pair is
    /// resolved: unregistered pairs end in the not-found state, registered
    /// ones get a fresh instance, panel and surface.
    ///
    /// # Errors
    ///
    /// Propagates surface creation failures; nothing is mounted afterwards.
    pub fn render(
        &mut self,
        registry: &SampleRegistry,
        category: &str,
        sample: &str,
    ) -> Result<(), VistaError> {
        match &self.state {
            MountState::Mounted(m) if m.key.matches(category, sample) => {
                return Ok(())
            }
            MountState::NotFound(key) if key.matches(category, sample) => {
                return Ok(())
            }
            _ => {}
        }
        self.unmount();

        let key = MountKey {
            category: category.to_owned(),
            sample: sample.to_owned(),
        };
        let Some(entry) = registry.lookup_sample(category, sample).copied()
        else {
            log::info!("no sample '{sample}' in '{category}'");
            self.state = MountState::NotFound(key);
            return Ok(());
        };

        let unit = entry.instantiate();
        let config = if entry.renders_own_surface() {
            unit.surface_config(&self.defaults)
        } else {
            self.defaults.clone()
        };
        let surface = self.factory.create(config)?;
        let panel = ParameterPanel::new(unit.parameters());
        log::info!(
            "mounted {category}/{sample} ({} controls, {} surface)",
            panel.spec().parameter_count(),
            if entry.renders_own_surface() { "own" } else { "shared" }
        );
        self.state = MountState::Mounted(Box::new(Mounted {
            key,
            entry,
            unit,
            panel,
            surface,
            frame: FrameInput::default(),
            scene: Scene::new(),
        }));
        Ok(())
    }

    /// Drop the current mount, if any.
    pub fn unmount(&mut self) {
        if let MountState::Mounted(m) =
            std::mem::replace(&mut self.state, MountState::Empty)
        {
            log::debug!("unmount {}/{}", m.key.category, m.key.sample);
            drop(m);
        }
    }

    /// The live mount, if a registered sample is shown.
    #[must_use]
    pub fn mounted(&self) -> Option<&Mounted<F::Surface>> {
        match &self.state {
            MountState::Mounted(m) => Some(m.as_ref()),
            _ => None,
        }
    }

    /// Mutable access to the live mount.
    pub fn mounted_mut(&mut self) -> Option<&mut Mounted<F::Surface>> {
        match &mut self.state {
            MountState::Mounted(m) => Some(m.as_mut()),
            _ => None,
        }
    }

    /// Content view for the current state; `None` when nothing was
    /// requested.
    #[must_use]
    pub fn view(&self) -> Option<MountView> {
        match &self.state {
            MountState::Empty => None,
            MountState::NotFound(key) => Some(MountView::NotFound {
                message: NOT_FOUND_TEXT,
                category: key.category.clone(),
                sample: key.sample.clone(),
            }),
            MountState::Mounted(m) => Some(MountView::Mounted {
                category: m.key.category.clone(),
                sample: m.key.sample.clone(),
                title: m.entry.title(),
                description: m.entry.description(),
                own_surface: m.entry.renders_own_surface(),
                groups: m.panel.spec().groups().to_vec(),
                values: m.panel.values().clone(),
                revision: m.panel.revision(),
                has_source: m.entry.source().is_some(),
            }),
        }
    }

    /// Source text of the mounted sample, if it registered any.
    #[must_use]
    pub fn source_view(&self) -> Option<SourceView> {
        let MountState::Mounted(m) = &self.state else {
            return None;
        };
        m.entry.source().map(|text| SourceView {
            category: m.key.category.clone(),
            sample: m.key.sample.clone(),
            text,
        })
    }

    /// Configuration of the shared surface.
    #[must_use]
    pub fn defaults(&self) -> &SurfaceConfig {
        &self.defaults
    }

    /// The surface factory.
    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }

    /// The surface factory.
    #[must_use]
    pub fn factory(&self) -> &F {
        &self.factory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::recording::{RecordingFactory, SurfaceEvent};

    fn setup() -> (SampleRegistry, SampleMount<RecordingFactory>) {
        let registry = SampleRegistry::builtin().unwrap();
        let mount = SampleMount::new(RecordingFactory::default(), SurfaceConfig::default());
        (registry, mount)
    }

    #[test]
    fn shared_sample_gets_one_default_surface() {
        let (registry, mut mount) = setup();
        mount.render(&registry, "basics", "basic-cube").unwrap();
        assert_eq!(mount.factory().events(), [SurfaceEvent::Created(1)]);
        let mounted = mount.mounted().unwrap();
        assert_eq!(mounted.surface().config, SurfaceConfig::default());
        assert!(!mounted.panel().spec().is_empty());
    }

    #[test]
    fn rerendering_same_pair_keeps_mount() {
        let (registry, mut mount) = setup();
        mount.render(&registry, "basics", "basic-cube").unwrap();
        mount.render(&registry, "basics", "basic-cube").unwrap();
        assert_eq!(mount.factory().events(), [SurfaceEvent::Created(1)]);
    }

    #[test]
    fn switching_tears_down_before_creating() {
        let (registry, mut mount) = setup();
        mount.render(&registry, "basics", "basic-cube").unwrap();
        mount
            .render(&registry, "materials", "material-showcase")
            .unwrap();
        assert_eq!(
            mount.factory().events(),
            [
                SurfaceEvent::Created(1),
                SurfaceEvent::Dropped(1),
                SurfaceEvent::Created(2),
            ]
        );
        assert_eq!(mount.factory().live(), 1);
    }

    #[test]
    fn own_surface_samples_supply_their_config() {
        let (registry, mut mount) = setup();
        mount
            .render(&registry, "postprocessing", "basic-postprocessing")
            .unwrap();
        let config = &mount.mounted().unwrap().surface().config;
        assert!(!config.post.is_empty());
    }

    #[test]
    fn unknown_pair_is_not_found_without_surface() {
        let (registry, mut mount) = setup();
        mount.render(&registry, "basics", "basic-cube").unwrap();
        mount.render(&registry, "basics", "no-such-sample").unwrap();
        assert!(mount.mounted().is_none());
        assert_eq!(mount.factory().live(), 0);
        assert!(matches!(
            mount.view(),
            Some(MountView::NotFound { message: NOT_FOUND_TEXT, .. })
        ));
    }

    #[test]
    fn panels_are_per_mount() {
        let (registry, mut mount) = setup();
        mount.render(&registry, "basics", "basic-cube").unwrap();
        mount.mounted_mut().unwrap().panel_mut().reset();
        assert_eq!(mount.mounted().unwrap().panel().revision(), 1);

        mount.render(&registry, "basics", "basic-sphere").unwrap();
        mount.render(&registry, "basics", "basic-cube").unwrap();
        let panel = mount.mounted().unwrap().panel();
        assert_eq!(panel.revision(), 0);
        assert_eq!(panel.values(), panel.spec().defaults());
    }

    #[test]
    fn source_is_served_apart_from_the_view() {
        let (registry, mut mount) = setup();
        assert!(mount.source_view().is_none());
        mount.render(&registry, "basics", "basic-cube").unwrap();

        let view = serde_json::to_value(mount.view().unwrap()).unwrap();
        assert!(view.get("source").is_none());
        assert_eq!(view["has_source"], Value::Bool(true));

        let source = mount.source_view().unwrap();
        assert_eq!((source.category.as_str(), source.sample.as_str()), ("basics", "basic-cube"));
        assert_eq!(Some(source.text), mount.mounted().unwrap().entry().source());

        mount.unmount();
        assert!(mount.source_view().is_none());
    }

    #[test]
    fn surface_failure_leaves_nothing_mounted() {
        let (registry, mut mount) = setup();
        mount.render(&registry, "basics", "basic-cube").unwrap();
        mount.factory_mut().fail = true;
        let err = mount.render(&registry, "lights", "lighting-demo");
        assert!(matches!(err, Err(VistaError::Surface(_))));
        assert!(mount.mounted().is_none());
        assert_eq!(mount.factory().live(), 0);
        assert!(mount.view().is_none());
    }

    #[test]
    fn tick_lets_the_sample_build_a_scene() {
        let (registry, mut mount) = setup();
        mount.render(&registry, "basics", "basic-cube").unwrap();
        let mounted = mount.mounted_mut().unwrap();
        mounted.tick(1.0 / 60.0);
        assert_eq!(mounted.frame().frame, 1);
        assert!(!mounted.scene().objects.is_empty());
    }

    #[test]
    fn unmount_drops_the_surface() {
        let (registry, mut mount) = setup();
        mount.render(&registry, "basics", "basic-cube").unwrap();
        mount.unmount();
        assert_eq!(mount.factory().live(), 0);
    }
}
