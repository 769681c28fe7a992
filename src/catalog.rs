//! The fixed, ordered list of sample categories.
//!
//! Order matters: it is the order of the sidebar menu and of the home page
//! tiles. The catalog is built once and never changes for the lifetime of
//! the process.

use serde::Serialize;

/// Display metadata for one category of samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryDescriptor {
    /// Stable identifier used in addresses (`/category/{id}`).
    pub id: &'static str,
    /// Human-readable title shown in the sidebar and header.
    pub title: &'static str,
    /// One-line summary shown under the title.
    pub description: &'static str,
    /// Icon name resolved by the UI.
    pub icon: &'static str,
}

/// Category selected when an address omits the category segment.
pub const DEFAULT_CATEGORY: &str = "basics";

const BUILTIN: [CategoryDescriptor; 12] = [
    CategoryDescriptor {
        id: "basics",
        title: "Basics",
        description: "Core concepts: meshes, materials and the render loop",
        icon: "Box",
    },
    CategoryDescriptor {
        id: "geometries",
        title: "Geometries",
        description: "Built-in shapes and their parameters",
        icon: "Shapes",
    },
    CategoryDescriptor {
        id: "materials",
        title: "Materials",
        description: "Surface shading models and their properties",
        icon: "Palette",
    },
    CategoryDescriptor {
        id: "lights",
        title: "Lights",
        description: "Light types, intensity and shadows",
        icon: "Lightbulb",
    },
    CategoryDescriptor {
        id: "cameras",
        title: "Cameras",
        description: "Projections, viewports and camera rigs",
        icon: "Camera",
    },
    CategoryDescriptor {
        id: "animations",
        title: "Animations",
        description: "Motion, easing and interaction",
        icon: "Play",
    },
    CategoryDescriptor {
        id: "textures",
        title: "Textures",
        description: "Texture mapping and UV coordinates",
        icon: "Image",
    },
    CategoryDescriptor {
        id: "shaders",
        title: "Shaders",
        description: "Custom shading and procedural effects",
        icon: "Code",
    },
    CategoryDescriptor {
        id: "postprocessing",
        title: "Post-processing",
        description: "Screen-space effects and filters",
        icon: "Sparkles",
    },
    CategoryDescriptor {
        id: "physics",
        title: "Physics",
        description: "Simple physical simulation",
        icon: "Zap",
    },
    CategoryDescriptor {
        id: "performance",
        title: "Performance",
        description: "Optimization techniques",
        icon: "Gauge",
    },
    CategoryDescriptor {
        id: "advanced",
        title: "Advanced",
        description: "Advanced techniques and applications",
        icon: "Cpu",
    },
];

/// Immutable, ordered collection of [`CategoryDescriptor`]s.
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    categories: &'static [CategoryDescriptor],
}

impl Catalog {
    /// The built-in catalog of twelve categories.
    #[must_use]
    pub const fn builtin() -> Self {
        Self {
            categories: &BUILTIN,
        }
    }

    /// All categories in menu order.
    #[must_use]
    pub fn all(&self) -> &'static [CategoryDescriptor] {
        self.categories
    }

    /// Look up a category by id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&'static CategoryDescriptor> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Position of a category in menu order.
    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.id == id)
    }

    /// Number of categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// `true` if the catalog has no categories.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn has_twelve_unique_categories() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 12);
        let ids: HashSet<_> = catalog.all().iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), catalog.len());
    }

    #[test]
    fn order_is_stable_across_calls() {
        let catalog = Catalog::builtin();
        let first: Vec<_> = catalog.all().iter().map(|c| c.id).collect();
        let second: Vec<_> = catalog.all().iter().map(|c| c.id).collect();
        assert_eq!(first, second);
        assert_eq!(
            first,
            [
                "basics",
                "geometries",
                "materials",
                "lights",
                "cameras",
                "animations",
                "textures",
                "shaders",
                "postprocessing",
                "physics",
                "performance",
                "advanced",
            ]
        );
    }

    #[test]
    fn find_hits_and_misses() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.find("lights").map(|c| c.icon), Some("Lightbulb"));
        assert!(catalog.find("unknown-category").is_none());
        assert!(catalog.find(DEFAULT_CATEGORY).is_some());
    }

    #[test]
    fn every_field_is_filled() {
        for category in Catalog::builtin().all() {
            assert!(!category.id.is_empty());
            assert!(!category.title.is_empty());
            assert!(!category.description.is_empty());
            assert!(!category.icon.is_empty());
        }
    }
}
