//! Landing page: title, highlight counters, features and category tiles.

use serde::Serialize;

use crate::catalog::Catalog;
use crate::registry::SampleRegistry;
use crate::route::Route;

/// Application title.
pub const APP_TITLE: &str = "Vista Rendering Playground";

/// Short title for the collapsed sidebar and the window title.
pub const APP_SHORT_TITLE: &str = "Vista";

/// Tagline under the title.
pub const TAGLINE: &str =
    "Learn real-time 3D rendering through interactive samples with live controls";

/// One counter in the highlight strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Highlight {
    /// Displayed value.
    pub value: String,
    /// Label under the value.
    pub label: &'static str,
}

/// One entry of the feature list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Feature {
    /// Icon name.
    pub icon: &'static str,
    /// Short title.
    pub title: &'static str,
    /// One-line description.
    pub description: &'static str,
}

/// Clickable category tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTile {
    /// Category id.
    pub id: &'static str,
    /// Display title.
    pub title: &'static str,
    /// Icon name.
    pub icon: &'static str,
    /// Address the tile navigates to.
    pub address: String,
}

const FEATURES: [Feature; 4] = [
    Feature {
        icon: "Sparkles",
        title: "Interactive",
        description: "Tune every parameter in real time",
    },
    Feature {
        icon: "Code2",
        title: "Readable source",
        description: "Every sample ships with its source code",
    },
    Feature {
        icon: "Palette",
        title: "Native UI",
        description: "A web UI hosted next to a native GPU viewport",
    },
    Feature {
        icon: "Zap",
        title: "Fast",
        description: "Rendered with wgpu on the native graphics API",
    },
];

/// Home screen content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HomeView {
    /// Application title.
    pub title: &'static str,
    /// Tagline.
    pub tagline: &'static str,
    /// Address of the "get started" button.
    pub start_address: String,
    /// Counters.
    pub highlights: Vec<Highlight>,
    /// Feature list.
    pub features: Vec<Feature>,
    /// One tile per category in menu order.
    pub categories: Vec<CategoryTile>,
}

impl HomeView {
    /// Build the home view. `parameter_count` is the total number of panel
    /// controls over every sample (see
    /// [`SampleRegistry::parameter_count`]), passed in because computing it
    /// instantiates every sample.
    #[must_use]
    pub fn render(
        catalog: &Catalog,
        registry: &SampleRegistry,
        parameter_count: usize,
    ) -> Self {
        let highlights = vec![
            Highlight {
                value: catalog.len().to_string(),
                label: "Categories",
            },
            Highlight {
                value: registry.sample_count().to_string(),
                label: "Samples",
            },
            Highlight {
                value: parameter_count.to_string(),
                label: "Parameters",
            },
            Highlight {
                value: "∞".to_owned(),
                label: "Possibilities",
            },
        ];
        let categories = catalog
            .all()
            .iter()
            .map(|c| CategoryTile {
                id: c.id,
                title: c.title,
                icon: c.icon,
                address: Route::category(c.id).path(),
            })
            .collect();
        Self {
            title: APP_TITLE,
            tagline: TAGLINE,
            start_address: catalog
                .all()
                .first()
                .map_or_else(|| Route::Home.path(), |c| Route::category(c.id).path()),
            highlights,
            features: FEATURES.to_vec(),
            categories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_reflect_catalog_and_registry() {
        let registry = SampleRegistry::builtin().unwrap();
        let view = HomeView::render(&Catalog::builtin(), &registry, 42);
        let values: Vec<_> = view.highlights.iter().map(|h| h.value.as_str()).collect();
        assert_eq!(values, ["12", "17", "42", "∞"]);
    }

    #[test]
    fn tiles_follow_menu_order() {
        let registry = SampleRegistry::builtin().unwrap();
        let view = HomeView::render(&Catalog::builtin(), &registry, 0);
        assert_eq!(view.categories.len(), 12);
        assert_eq!(view.categories[0].address, "/category/basics");
        assert_eq!(view.categories[11].id, "advanced");
        assert_eq!(view.start_address, "/category/basics");
    }
}
