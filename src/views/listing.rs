//! Directory of one category's samples.

use serde::Serialize;

use crate::catalog::Catalog;
use crate::registry::SampleRegistry;
use crate::route::Route;

/// Placeholder shown for a category without registered samples.
pub const EMPTY_LISTING_TEXT: &str = "Samples for this category are coming soon.";

/// Tags shown on every sample card.
pub const CARD_TAGS: [&str; 2] = ["Interactive", "GUI controls"];

/// One clickable sample card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleCard {
    /// Sample id.
    pub id: String,
    /// Display title (falls back to the id).
    pub title: String,
    /// Description (falls back to the default text).
    pub description: String,
    /// Constant tags.
    pub tags: [&'static str; 2],
    /// Address the card navigates to.
    pub address: String,
}

/// Listing for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingView {
    /// Category id as it appears in the address.
    pub category_id: String,
    /// Heading (category title, or the raw id for unknown categories).
    pub heading: String,
    /// Category description, if the category is known.
    pub description: Option<String>,
    /// Cards in registration order.
    pub cards: Vec<SampleCard>,
    /// Set when there are no cards.
    pub empty_message: Option<&'static str>,
}

impl ListingView {
    /// Build the listing for `category_id`.
    #[must_use]
    pub fn render(
        catalog: &Catalog,
        registry: &SampleRegistry,
        category_id: &str,
    ) -> Self {
        let category = catalog.find(category_id);
        let cards: Vec<SampleCard> = registry
            .lookup_category(category_id)
            .iter()
            .map(|entry| SampleCard {
                id: entry.id().to_owned(),
                title: entry.title().to_owned(),
                description: entry.description().to_owned(),
                tags: CARD_TAGS,
                address: Route::sample(category_id, entry.id()).path(),
            })
            .collect();
        Self {
            category_id: category_id.to_owned(),
            heading: category.map_or(category_id, |c| c.title).to_owned(),
            description: category.map(|c| c.description.to_owned()),
            empty_message: cards.is_empty().then_some(EMPTY_LISTING_TEXT),
            cards,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(category: &str) -> ListingView {
        let registry = SampleRegistry::builtin().unwrap();
        ListingView::render(&Catalog::builtin(), &registry, category)
    }

    #[test]
    fn basics_lists_exactly_its_samples() {
        let view = listing("basics");
        let ids: Vec<_> = view.cards.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["basic-cube", "basic-sphere"]);
        assert_eq!(view.heading, "Basics");
        assert!(view.empty_message.is_none());
        assert_eq!(view.cards[0].address, "/category/basics/basic-cube");
        assert_eq!(view.cards[0].tags, CARD_TAGS);
    }

    #[test]
    fn unknown_category_shows_placeholder() {
        let view = listing("unknown-category");
        assert!(view.cards.is_empty());
        assert_eq!(view.empty_message, Some(EMPTY_LISTING_TEXT));
        assert_eq!(view.heading, "unknown-category");
        assert!(view.description.is_none());
    }

    #[test]
    fn every_catalog_category_renders() {
        for category in Catalog::builtin().all() {
            let view = listing(category.id);
            assert_eq!(view.cards.is_empty(), view.empty_message.is_some());
        }
    }
}
