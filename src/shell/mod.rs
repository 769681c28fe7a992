//! Shell layout: sidebar, header and content slot around the current view.
//!
//! The shell owns the [`SelectionState`] but never decides it: every
//! committed [`RouteChange`] replaces it through
//! [`selection_for`](crate::navigation::selection_for). The only state the
//! shell changes on its own is whether the sidebar is open.

/// Serializable view model.
pub mod view;

pub use view::{ContentView, HeaderView, ShellView, SidebarItem, SidebarView};

use crate::catalog::Catalog;
use crate::navigation::{selection_for, RouteChange, Screen, SelectionState};
use crate::route::Route;
use crate::views::home::{APP_SHORT_TITLE, APP_TITLE};

/// Selection plus current screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shell {
    selection: SelectionState,
    screen: Screen,
}

impl Default for Shell {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Shell {
    /// Shell on the home screen with the default category.
    #[must_use]
    pub fn new(sidebar_open: bool) -> Self {
        Self {
            selection: SelectionState {
                sidebar_open,
                ..SelectionState::default()
            },
            screen: Screen::Home,
        }
    }

    /// Re-derive the selection from a committed route.
    pub fn apply(&mut self, change: &RouteChange) {
        self.selection = selection_for(&change.route, &self.selection);
        self.screen = Screen::of(&change.route);
    }

    /// Collapse or expand the sidebar. Does not touch the route.
    pub fn toggle_sidebar(&mut self) {
        self.selection.sidebar_open = !self.selection.sidebar_open;
    }

    /// Current selection.
    #[must_use]
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Current screen.
    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Sidebar for the current selection.
    #[must_use]
    pub fn sidebar(&self, catalog: &Catalog) -> SidebarView {
        let open = self.selection.sidebar_open;
        SidebarView {
            open,
            title: if open { APP_TITLE } else { APP_SHORT_TITLE },
            items: catalog
                .all()
                .iter()
                .map(|c| SidebarItem {
                    id: c.id,
                    title: c.title,
                    description: c.description,
                    icon: c.icon,
                    address: Route::category(c.id).path(),
                    active: c.id == self.selection.current_category,
                })
                .collect(),
        }
    }

    /// Header for the current selection.
    #[must_use]
    pub fn header(
        &self,
        catalog: &Catalog,
        can_go_back: bool,
        can_go_forward: bool,
    ) -> HeaderView {
        HeaderView {
            title: catalog
                .find(&self.selection.current_category)
                .map_or(APP_TITLE, |c| c.title)
                .to_owned(),
            sample: self.selection.current_sample.clone(),
            can_go_back,
            can_go_forward,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::ChangeCause;

    fn change(route: Route) -> RouteChange {
        RouteChange {
            previous: None,
            route,
            cause: ChangeCause::Push,
            redirected: false,
        }
    }

    #[test]
    fn sidebar_marks_active_category() {
        let mut shell = Shell::default();
        shell.apply(&change(Route::category("lights")));
        let sidebar = shell.sidebar(&Catalog::builtin());
        let active: Vec<_> = sidebar.items.iter().filter(|i| i.active).map(|i| i.id).collect();
        assert_eq!(active, ["lights"]);
        assert_eq!(sidebar.items.len(), 12);
    }

    #[test]
    fn toggle_is_local() {
        let mut shell = Shell::default();
        shell.apply(&change(Route::sample("basics", "basic-cube")));
        shell.toggle_sidebar();
        assert!(!shell.selection().sidebar_open);
        assert_eq!(shell.sidebar(&Catalog::builtin()).title, APP_SHORT_TITLE);
        shell.apply(&change(Route::category("materials")));
        assert!(!shell.selection().sidebar_open);
        assert_eq!(shell.selection().current_category, "materials");
    }

    #[test]
    fn header_falls_back_to_app_title() {
        let mut shell = Shell::default();
        shell.apply(&change(Route::sample("unknown-category", "x")));
        let header = shell.header(&Catalog::builtin(), true, false);
        assert_eq!(header.title, APP_TITLE);
        assert_eq!(header.sample.as_deref(), Some("x"));
        assert!(header.can_go_back);
    }

    #[test]
    fn screen_follows_route() {
        let mut shell = Shell::default();
        assert_eq!(shell.screen(), Screen::Home);
        shell.apply(&change(Route::category("basics")));
        assert_eq!(shell.screen(), Screen::Browsing);
        shell.apply(&change(Route::Home));
        assert_eq!(shell.screen(), Screen::Home);
        assert_eq!(shell.selection().current_category, "basics");
    }
}
