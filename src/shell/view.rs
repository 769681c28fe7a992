//! Serializable view model pushed to the UI every time the shell changes.

use serde::Serialize;

use crate::views::{HomeView, ListingView, MountView};

/// One category entry in the sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidebarItem {
    /// Category id.
    pub id: &'static str,
    /// Display title.
    pub title: &'static str,
    /// Description (shown only when expanded).
    pub description: &'static str,
    /// Icon name.
    pub icon: &'static str,
    /// Address the entry navigates to.
    pub address: String,
    /// Entry matches the current category.
    pub active: bool,
}

/// Collapsible category menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidebarView {
    /// Expanded (full titles) or collapsed (icons only).
    pub open: bool,
    /// Title at the top: long when open, short when collapsed.
    pub title: &'static str,
    /// Categories in menu order.
    pub items: Vec<SidebarItem>,
}

/// Bar above the content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderView {
    /// Category title, or the application title for unknown categories.
    pub title: String,
    /// Raw sample id, if one is selected.
    pub sample: Option<String>,
    /// History can move back.
    pub can_go_back: bool,
    /// History can move forward.
    pub can_go_forward: bool,
}

impl HeaderView {
    /// Native window title mirroring the header.
    #[must_use]
    pub fn window_title(&self, app: &str) -> String {
        match &self.sample {
            Some(sample) => format!("{app} - {} / {sample}", self.title),
            None => format!("{app} - {}", self.title),
        }
    }
}

/// Main content slot while browsing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentView {
    /// Category listing.
    Listing(ListingView),
    /// Mounted sample or the not-found placeholder.
    Sample(MountView),
}

/// Complete shell state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum ShellView {
    /// Landing page without sidebar or header.
    Home {
        /// Page content.
        home: HomeView,
    },
    /// Sidebar, header and content.
    Browsing {
        /// Category menu.
        sidebar: SidebarView,
        /// Header bar.
        header: HeaderView,
        /// Listing or sample.
        content: ContentView,
    },
}

impl ShellView {
    /// Header, when browsing.
    #[must_use]
    pub fn header(&self) -> Option<&HeaderView> {
        match self {
            Self::Home { .. } => None,
            Self::Browsing { header, .. } => Some(header),
        }
    }

    /// `true` if a sample is mounted and the viewport should be visible.
    #[must_use]
    pub fn shows_viewport(&self) -> bool {
        matches!(
            self,
            Self::Browsing {
                content: ContentView::Sample(MountView::Mounted { .. }),
                ..
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_title_mirrors_header() {
        let header = HeaderView {
            title: "Basics".to_owned(),
            sample: Some("basic-cube".to_owned()),
            can_go_back: false,
            can_go_forward: false,
        };
        assert_eq!(header.window_title("Vista"), "Vista - Basics / basic-cube");
        let listing = HeaderView {
            sample: None,
            ..header
        };
        assert_eq!(listing.window_title("Vista"), "Vista - Basics");
    }
}
