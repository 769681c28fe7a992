//! Static mapping from (category, sample) ids to sample constructors.
//!
//! The registry is built once at startup through [`RegistryBuilder`] and
//! is read-only afterwards. Entries store a constructor, never a live
//! sample: every mount gets a fresh instance.

use rustc_hash::FxHashMap;

use crate::error::VistaError;
use crate::sample::Sample;

/// Description shown for entries registered without one.
pub const DEFAULT_DESCRIPTION: &str = "Sample description";

/// Creates a fresh sample instance.
pub type SampleConstructor = fn() -> Box<dyn Sample>;

/// One registered sample.
#[derive(Clone, Copy)]
pub struct SampleEntry {
    id: &'static str,
    title: Option<&'static str>,
    description: Option<&'static str>,
    renders_own_surface: bool,
    construct: SampleConstructor,
    source: Option<&'static str>,
}

impl std::fmt::Debug for SampleEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SampleEntry")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("renders_own_surface", &self.renders_own_surface)
            .finish_non_exhaustive()
    }
}

impl SampleEntry {
    /// Entry with only an id and a constructor.
    #[must_use]
    pub const fn new(id: &'static str, construct: SampleConstructor) -> Self {
        Self {
            id,
            title: None,
            description: None,
            renders_own_surface: false,
            construct,
            source: None,
        }
    }

    /// Set the display title.
    #[must_use]
    pub const fn titled(mut self, title: &'static str) -> Self {
        self.title = Some(title);
        self
    }

    /// Set the one-line description.
    #[must_use]
    pub const fn described(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    /// Mark the sample as supplying its own surface configuration.
    #[must_use]
    pub const fn own_surface(mut self) -> Self {
        self.renders_own_surface = true;
        self
    }

    /// Attach source text for the code viewer.
    #[must_use]
    pub const fn with_source(mut self, source: &'static str) -> Self {
        self.source = Some(source);
        self
    }

    /// Id, unique within the category.
    #[must_use]
    pub fn id(&self) -> &'static str {
        self.id
    }

    /// Display title, falling back to the id.
    #[must_use]
    pub fn title(&self) -> &'static str {
        self.title.unwrap_or(self.id)
    }

    /// Description, falling back to [`DEFAULT_DESCRIPTION`].
    #[must_use]
    pub fn description(&self) -> &'static str {
        self.description.unwrap_or(DEFAULT_DESCRIPTION)
    }

    /// Whether the sample configures its own surface.
    #[must_use]
    pub fn renders_own_surface(&self) -> bool {
        self.renders_own_surface
    }

    /// Source text, if registered.
    #[must_use]
    pub fn source(&self) -> Option<&'static str> {
        self.source
    }

    /// Create a fresh instance.
    #[must_use]
    pub fn instantiate(&self) -> Box<dyn Sample> {
        (self.construct)()
    }
}

/// Collects entries and rejects duplicate keys.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    categories: FxHashMap<&'static str, Vec<SampleEntry>>,
}

impl RegistryBuilder {
    /// Empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `entry` under `category`. Order of registration is the listing
    /// order.
    ///
    /// # Errors
    ///
    /// [`VistaError::DuplicateSample`] if the category already has a sample
    /// with the same id.
    pub fn register(
        &mut self,
        category: &'static str,
        entry: SampleEntry,
    ) -> Result<&mut Self, VistaError> {
        let samples = self.categories.entry(category).or_default();
        if samples.iter().any(|s| s.id == entry.id) {
            return Err(VistaError::DuplicateSample {
                category: category.to_owned(),
                sample: entry.id.to_owned(),
            });
        }
        samples.push(entry);
        Ok(self)
    }

    /// Freeze into a [`SampleRegistry`].
    #[must_use]
    pub fn build(self) -> SampleRegistry {
        SampleRegistry {
            categories: self.categories,
        }
    }
}

/// Read-only (category, sample) → [`SampleEntry`] mapping.
#[derive(Debug, Default)]
pub struct SampleRegistry {
    categories: FxHashMap<&'static str, Vec<SampleEntry>>,
}

impl SampleRegistry {
    /// Registry holding every built-in sample.
    ///
    /// # Errors
    ///
    /// Propagates duplicate registrations.
    pub fn builtin() -> Result<Self, VistaError> {
        let mut builder = RegistryBuilder::new();
        crate::samples::register_all(&mut builder)?;
        let registry = builder.build();
        log::debug!(
            "registered {} samples in {} categories",
            registry.sample_count(),
            registry.category_count()
        );
        Ok(registry)
    }

    /// Samples of a category in registration order; empty for unknown ids.
    #[must_use]
    pub fn lookup_category(&self, category: &str) -> &[SampleEntry] {
        self.categories
            .get(category)
            .map_or(&[][..], Vec::as_slice)
    }

    /// One sample, or `None` if the pair is not registered.
    #[must_use]
    pub fn lookup_sample(
        &self,
        category: &str,
        sample: &str,
    ) -> Option<&SampleEntry> {
        self.lookup_category(category)
            .iter()
            .find(|s| s.id == sample)
    }

    /// Total number of registered samples.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    /// Number of categories with at least one sample.
    #[must_use]
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Number of panel controls summed over every sample.
    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.categories
            .values()
            .flatten()
            .map(|entry| entry.instantiate().parameters().parameter_count())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::panel::ParameterPanel;
    use crate::sample::FrameInput;
    use crate::scene::Scene;

    struct Empty;

    impl Sample for Empty {
        fn update(&mut self, _: &FrameInput, _: &ParameterPanel, _: &mut Scene) {}
    }

    fn empty() -> Box<dyn Sample> {
        Box::new(Empty)
    }

    #[test]
    fn duplicates_are_rejected() {
        let mut builder = RegistryBuilder::new();
        let _ = builder.register("basics", SampleEntry::new("a", empty)).unwrap();
        let _ = builder.register("lights", SampleEntry::new("a", empty)).unwrap();
        let err = builder
            .register("basics", SampleEntry::new("a", empty))
            .unwrap_err();
        assert!(matches!(
            err,
            VistaError::DuplicateSample { ref category, ref sample }
                if category == "basics" && sample == "a"
        ));
    }

    #[test]
    fn lookup_keeps_registration_order() {
        let mut builder = RegistryBuilder::new();
        let _ = builder
            .register("basics", SampleEntry::new("second", empty))
            .unwrap()
            .register("basics", SampleEntry::new("first", empty))
            .unwrap();
        let registry = builder.build();
        let ids: Vec<_> = registry
            .lookup_category("basics")
            .iter()
            .map(SampleEntry::id)
            .collect();
        assert_eq!(ids, ["second", "first"]);
        assert!(registry.lookup_category("nope").is_empty());
        assert!(registry.lookup_sample("basics", "first").is_some());
        assert!(registry.lookup_sample("basics", "third").is_none());
        assert!(registry.lookup_sample("nope", "first").is_none());
    }

    #[test]
    fn missing_metadata_falls_back() {
        let bare = SampleEntry::new("raw-id", empty);
        assert_eq!(bare.title(), "raw-id");
        assert_eq!(bare.description(), DEFAULT_DESCRIPTION);
        assert!(!bare.renders_own_surface());
        let full = bare.titled("Raw").described("Text").own_surface();
        assert_eq!(full.title(), "Raw");
        assert_eq!(full.description(), "Text");
        assert!(full.renders_own_surface());
    }

    #[test]
    fn builtin_lookups_never_fail_for_catalog_categories() {
        let registry = SampleRegistry::builtin().unwrap();
        for category in Catalog::builtin().all() {
            for entry in registry.lookup_category(category.id) {
                assert!(registry.lookup_sample(category.id, entry.id()).is_some());
            }
        }
        assert_eq!(registry.sample_count(), 17);
        assert!(registry.parameter_count() > 0);
    }

    #[test]
    fn builtin_categories_are_all_in_the_catalog() {
        let registry = SampleRegistry::builtin().unwrap();
        let catalog = Catalog::builtin();
        for category in registry.categories.keys() {
            assert!(catalog.find(category).is_some(), "{category}");
        }
    }

    #[test]
    fn builtin_basics_are_cube_then_sphere() {
        let registry = SampleRegistry::builtin().unwrap();
        let ids: Vec<_> = registry
            .lookup_category("basics")
            .iter()
            .map(SampleEntry::id)
            .collect();
        assert_eq!(ids, ["basic-cube", "basic-sphere"]);
    }

    #[test]
    fn registry_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SampleRegistry>();
    }
}
