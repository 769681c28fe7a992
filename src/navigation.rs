//! Route binder: navigation requests, history and the derived selection.
//!
//! The current address is the single source of truth. UI code never writes
//! the selection; it asks the [`Navigator`] for a transition, the
//! transition is committed by [`Navigator::poll`], and the selection is
//! recomputed from the committed route with [`on_route_change`].

use std::collections::VecDeque;

use serde::Serialize;

use crate::catalog::DEFAULT_CATEGORY;
use crate::route::{Resolved, Route};

/// Top-level screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    /// Landing page.
    Home,
    /// Sidebar + header + listing or sample.
    Browsing,
}

impl Screen {
    /// Screen shown for a route.
    #[must_use]
    pub fn of(route: &Route) -> Self {
        match route {
            Route::Home => Self::Home,
            Route::Category { .. } => Self::Browsing,
        }
    }
}

/// What the shell is showing, derived from the route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionState {
    /// Category id from the address (not validated).
    pub current_category: String,
    /// Sample id from the address (not validated).
    pub current_sample: Option<String>,
    /// Sidebar expanded. Local UI state, never part of the address.
    pub sidebar_open: bool,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            current_category: DEFAULT_CATEGORY.to_owned(),
            current_sample: None,
            sidebar_open: true,
        }
    }
}

/// Derive the selection for a new address.
///
/// The category and sample come from the address; the home screen keeps the
/// previous category and drops the sample. `sidebar_open` is always carried
/// over.
#[must_use]
pub fn on_route_change(path: &str, previous: &SelectionState) -> SelectionState {
    selection_for(Route::resolve(path).route(), previous)
}

/// [`on_route_change`] for an already parsed route.
#[must_use]
pub fn selection_for(route: &Route, previous: &SelectionState) -> SelectionState {
    match route {
        Route::Home => SelectionState {
            current_category: previous.current_category.clone(),
            current_sample: None,
            sidebar_open: previous.sidebar_open,
        },
        Route::Category { category, sample } => SelectionState {
            current_category: category.clone(),
            current_sample: sample.clone(),
            sidebar_open: previous.sidebar_open,
        },
    }
}

/// Why a route was committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeCause {
    /// First address of the session (cold load).
    Initial,
    /// A navigation request pushed a history entry.
    Push,
    /// History moved backwards.
    Back,
    /// History moved forwards.
    Forward,
}

/// A committed transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteChange {
    /// Route before the transition (`None` on cold load).
    pub previous: Option<Route>,
    /// Route after the transition.
    pub route: Route,
    /// What caused it.
    pub cause: ChangeCause,
    /// The requested address was replaced by a canonical one.
    pub redirected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Request {
    Go(String),
    Back,
    Forward,
}

/// Queue of navigation requests plus back/forward history.
#[derive(Debug)]
pub struct Navigator {
    current: Route,
    back: Vec<Route>,
    forward: Vec<Route>,
    pending: VecDeque<Request>,
    initial: Option<RouteChange>,
}

impl Navigator {
    /// Start at `address`. The first [`poll`](Self::poll) reports it as an
    /// [`ChangeCause::Initial`] change.
    #[must_use]
    pub fn new(address: &str) -> Self {
        let resolved = Route::resolve(address);
        let redirected = resolved.is_redirect();
        let route = resolved.route().clone();
        if redirected {
            log::debug!("initial address '{address}' replaced by '{route}'");
        }
        Self {
            current: route.clone(),
            back: Vec::new(),
            forward: Vec::new(),
            pending: VecDeque::new(),
            initial: Some(RouteChange {
                previous: None,
                route,
                cause: ChangeCause::Initial,
                redirected,
            }),
        }
    }

    /// Committed route.
    #[must_use]
    pub fn current(&self) -> &Route {
        &self.current
    }

    /// Committed address.
    #[must_use]
    pub fn location(&self) -> String {
        self.current.path()
    }

    /// Request any address.
    pub fn navigate(&mut self, address: impl Into<String>) {
        self.pending.push_back(Request::Go(address.into()));
    }

    /// Request a category listing.
    pub fn navigate_to_category(&mut self, category: &str) {
        self.navigate(Route::category(category).path());
    }

    /// Request a sample.
    pub fn navigate_to_sample(&mut self, category: &str, sample: &str) {
        self.navigate(Route::sample(category, sample).path());
    }

    /// Request the home screen.
    pub fn navigate_home(&mut self) {
        self.navigate(Route::Home.path());
    }

    /// Request one step back in history.
    pub fn back(&mut self) {
        self.pending.push_back(Request::Back);
    }

    /// Request one step forward in history.
    pub fn forward(&mut self) {
        self.pending.push_back(Request::Forward);
    }

    /// Whether [`back`](Self::back) would move, once pending requests settle.
    #[must_use]
    pub fn can_go_back(&self) -> bool {
        !self.back.is_empty()
    }

    /// Whether [`forward`](Self::forward) would move.
    #[must_use]
    pub fn can_go_forward(&self) -> bool {
        !self.forward.is_empty()
    }

    /// `true` if a change is waiting to be committed.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.initial.is_some() || !self.pending.is_empty()
    }

    /// Commit the next request that changes the route.
    ///
    /// Requests that would not move (navigating to the current address,
    /// back/forward at the end of history) are dropped silently.
    pub fn poll(&mut self) -> Option<RouteChange> {
        if let Some(initial) = self.initial.take() {
            log::info!("start at {}", initial.route);
            return Some(initial);
        }
        while let Some(request) = self.pending.pop_front() {
            if let Some(change) = self.apply(request) {
                if let Some(previous) = &change.previous {
                    log::info!("navigate {previous} → {}", change.route);
                }
                return Some(change);
            }
        }
        None
    }

    fn apply(&mut self, request: Request) -> Option<RouteChange> {
        let (route, cause, redirected) = match request {
            Request::Go(address) => {
                let resolved = Route::resolve(&address);
                let redirected = resolved.is_redirect();
                let route = match resolved {
                    Resolved::Route(r) | Resolved::Redirect(r) => r,
                };
                if route == self.current {
                    return None;
                }
                self.forward.clear();
                self.back.push(self.current.clone());
                (route, ChangeCause::Push, redirected)
            }
            Request::Back => {
                let route = self.back.pop()?;
                self.forward.push(self.current.clone());
                (route, ChangeCause::Back, false)
            }
            Request::Forward => {
                let route = self.forward.pop()?;
                self.back.push(self.current.clone());
                (route, ChangeCause::Forward, false)
            }
        };
        let previous = std::mem::replace(&mut self.current, route.clone());
        Some(RouteChange {
            previous: Some(previous),
            route,
            cause,
            redirected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(nav: &mut Navigator) -> Vec<RouteChange> {
        std::iter::from_fn(|| nav.poll()).collect()
    }

    #[test]
    fn cold_load_reports_initial_route() {
        let mut nav = Navigator::new("/category/lights/lighting-demo");
        let changes = drain(&mut nav);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].cause, ChangeCause::Initial);
        assert_eq!(changes[0].route, Route::sample("lights", "lighting-demo"));
        assert!(!changes[0].redirected);
        assert!(!nav.can_go_back());
    }

    #[test]
    fn root_is_replaced_without_history() {
        let mut nav = Navigator::new("/");
        let change = nav.poll().unwrap();
        assert_eq!(change.route, Route::Home);
        assert!(change.redirected);
        assert_eq!(nav.location(), "/home");
        assert!(!nav.can_go_back());
    }

    #[test]
    fn requests_are_deferred_until_poll() {
        let mut nav = Navigator::new("/home");
        let _ = nav.poll();
        nav.navigate_to_category("materials");
        assert_eq!(nav.current(), &Route::Home);
        assert!(nav.has_pending());
        let change = nav.poll().unwrap();
        assert_eq!(change.previous, Some(Route::Home));
        assert_eq!(change.route, Route::category("materials"));
        assert_eq!(nav.location(), "/category/materials");
    }

    #[test]
    fn navigate_then_read_address_round_trips() {
        let mut nav = Navigator::new("/home");
        let _ = nav.poll();
        nav.navigate_to_sample("shaders", "basic-shader");
        let _ = nav.poll();
        let reparsed = Route::resolve(&nav.location());
        assert_eq!(reparsed, Resolved::Route(Route::sample("shaders", "basic-shader")));
    }

    #[test]
    fn back_and_forward_walk_history() {
        let mut nav = Navigator::new("/home");
        nav.navigate_to_category("basics");
        nav.navigate_to_sample("basics", "basic-cube");
        let _ = drain(&mut nav);

        nav.back();
        let change = nav.poll().unwrap();
        assert_eq!(change.cause, ChangeCause::Back);
        assert_eq!(change.route, Route::category("basics"));
        assert!(nav.can_go_forward());

        nav.forward();
        assert_eq!(nav.poll().unwrap().route, Route::sample("basics", "basic-cube"));

        nav.back();
        nav.back();
        let _ = drain(&mut nav);
        assert_eq!(nav.current(), &Route::Home);
        nav.back();
        assert!(nav.poll().is_none());
    }

    #[test]
    fn push_truncates_forward_history() {
        let mut nav = Navigator::new("/home");
        nav.navigate_to_category("basics");
        nav.back();
        nav.navigate_to_category("lights");
        let _ = drain(&mut nav);
        assert!(!nav.can_go_forward());
    }

    #[test]
    fn navigating_to_current_address_is_a_no_op() {
        let mut nav = Navigator::new("/category/basics");
        let _ = nav.poll();
        nav.navigate_to_category("basics");
        nav.navigate("/category/basics?x=1");
        assert!(nav.poll().is_none());
        assert!(!nav.can_go_back());
    }

    #[test]
    fn selection_follows_route() {
        let previous = SelectionState {
            current_category: "lights".to_owned(),
            current_sample: Some("lighting-demo".to_owned()),
            sidebar_open: false,
        };
        let next = on_route_change("/category/materials/material-showcase", &previous);
        assert_eq!(next.current_category, "materials");
        assert_eq!(next.current_sample.as_deref(), Some("material-showcase"));
        assert!(!next.sidebar_open);

        let listing = on_route_change("/category/materials", &next);
        assert_eq!(listing.current_sample, None);
    }

    #[test]
    fn home_keeps_previous_category() {
        let previous = SelectionState {
            current_category: "physics".to_owned(),
            current_sample: Some("basic-physics".to_owned()),
            sidebar_open: true,
        };
        let home = on_route_change("/home", &previous);
        assert_eq!(home.current_category, "physics");
        assert_eq!(home.current_sample, None);
    }

    #[test]
    fn unregistered_ids_are_still_stored() {
        let next = on_route_change("/category/basics/no-such-sample", &SelectionState::default());
        assert_eq!(next.current_sample.as_deref(), Some("no-such-sample"));
    }

    #[test]
    fn screen_follows_route() {
        assert_eq!(Screen::of(&Route::Home), Screen::Home);
        assert_eq!(Screen::of(&Route::category("basics")), Screen::Browsing);
    }
}
