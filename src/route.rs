//! Address scheme: parsing and formatting of gallery addresses.
//!
//! ```text
//! /                                  → redirect (replace) to /home
//! /home                              → Home
//! /category/{category}               → Browsing, no sample
//! /category/{category}/{sample}      → Browsing with sample
//! ```
//!
//! Id tokens are percent-encoded when formatted and decoded when parsed,
//! so formatting then parsing returns the same ids for any string. Tokens
//! are never checked against the catalog or the registry.

use std::fmt;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

use crate::catalog::DEFAULT_CATEGORY;

/// Address of the home screen.
pub const HOME_PATH: &str = "/home";

/// Characters escaped inside an id token.
const TOKEN: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// A parsed, canonical address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// The home screen.
    Home,
    /// A category listing, or a sample inside it.
    Category {
        /// Category id (raw, decoded).
        category: String,
        /// Sample id (raw, decoded), if any.
        sample: Option<String>,
    },
}

/// Result of resolving an incoming address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// The address names a route directly.
    Route(Route),
    /// The address must be replaced by another one without a history entry.
    Redirect(Route),
}

impl Resolved {
    /// The route to display, whether reached directly or by redirect.
    #[must_use]
    pub fn route(&self) -> &Route {
        match self {
            Self::Route(r) | Self::Redirect(r) => r,
        }
    }

    /// `true` if the address was replaced.
    #[must_use]
    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect(_))
    }
}

impl Route {
    /// Browsing a category without a sample.
    #[must_use]
    pub fn category(category: impl Into<String>) -> Self {
        Self::Category {
            category: category.into(),
            sample: None,
        }
    }

    /// Browsing a sample.
    #[must_use]
    pub fn sample(category: impl Into<String>, sample: impl Into<String>) -> Self {
        Self::Category {
            category: category.into(),
            sample: Some(sample.into()),
        }
    }

    /// Resolve any address string.
    ///
    /// Query strings and fragments are stripped. `/category` without an id
    /// falls back to the default category, an empty sample segment means no
    /// sample, extra segments are ignored, and anything unrecognized
    /// redirects home. A non-canonical spelling of a recognized address
    /// (trailing slash, extra segments, missing category) is reported as a
    /// redirect to the canonical form.
    #[must_use]
    pub fn resolve(address: &str) -> Resolved {
        let path = address
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        let trimmed = path.trim_start_matches('/');
        let mut segments = trimmed.split('/');
        let route = match segments.next().unwrap_or_default() {
            "" if trimmed.is_empty() => return Resolved::Redirect(Self::Home),
            "home" => Self::Home,
            "category" => {
                let category = segments
                    .next()
                    .filter(|s| !s.is_empty())
                    .map_or_else(|| DEFAULT_CATEGORY.to_owned(), decode);
                let sample = segments.next().filter(|s| !s.is_empty()).map(decode);
                Self::Category { category, sample }
            }
            _ => return Resolved::Redirect(Self::Home),
        };
        if route.path() == address {
            Resolved::Route(route)
        } else {
            Resolved::Redirect(route)
        }
    }

    /// Canonical address string.
    #[must_use]
    pub fn path(&self) -> String {
        self.to_string()
    }

    /// Category id, if browsing.
    #[must_use]
    pub fn category_id(&self) -> Option<&str> {
        match self {
            Self::Home => None,
            Self::Category { category, .. } => Some(category),
        }
    }

    /// Sample id, if one is selected.
    #[must_use]
    pub fn sample_id(&self) -> Option<&str> {
        match self {
            Self::Home => None,
            Self::Category { sample, .. } => sample.as_deref(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => f.write_str(HOME_PATH),
            Self::Category { category, sample } => {
                write!(f, "/category/{}", utf8_percent_encode(category, TOKEN))?;
                if let Some(sample) = sample {
                    write!(f, "/{}", utf8_percent_encode(sample, TOKEN))?;
                }
                Ok(())
            }
        }
    }
}

fn decode(token: &str) -> String {
    percent_decode_str(token).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_addresses_parse_directly() {
        assert_eq!(Route::resolve("/home"), Resolved::Route(Route::Home));
        assert_eq!(
            Route::resolve("/category/basics"),
            Resolved::Route(Route::category("basics"))
        );
        assert_eq!(
            Route::resolve("/category/basics/basic-cube"),
            Resolved::Route(Route::sample("basics", "basic-cube"))
        );
    }

    #[test]
    fn root_redirects_home() {
        let resolved = Route::resolve("/");
        assert!(resolved.is_redirect());
        assert_eq!(resolved.route(), &Route::Home);
        assert_eq!(Route::resolve("").route(), &Route::Home);
    }

    #[test]
    fn missing_category_uses_default() {
        for address in ["/category", "/category/"] {
            let resolved = Route::resolve(address);
            assert!(resolved.is_redirect(), "{address}");
            assert_eq!(resolved.route(), &Route::category(DEFAULT_CATEGORY));
        }
    }

    #[test]
    fn empty_sample_segment_means_no_sample() {
        assert_eq!(
            Route::resolve("/category/lights/").route(),
            &Route::category("lights")
        );
    }

    #[test]
    fn extra_segments_are_ignored() {
        assert_eq!(
            Route::resolve("/category/lights/lighting-demo/extra/more").route(),
            &Route::sample("lights", "lighting-demo")
        );
    }

    #[test]
    fn query_and_fragment_are_stripped() {
        assert_eq!(
            Route::resolve("/category/basics/basic-cube?debug=1#top"),
            Resolved::Redirect(Route::sample("basics", "basic-cube"))
        );
        assert_eq!(Route::resolve("/home#x").route(), &Route::Home);
    }

    #[test]
    fn unknown_paths_redirect_home() {
        for address in ["/nowhere", "/samples/basics", "/homepage"] {
            assert_eq!(
                Route::resolve(address),
                Resolved::Redirect(Route::Home),
                "{address}"
            );
        }
    }

    #[test]
    fn format_then_parse_is_identity() {
        let ids = [
            ("basics", "basic-cube"),
            ("with space", "slash/inside"),
            ("percent%20", "query?and#hash"),
            ("ünïcödé", "emoji-🎨"),
        ];
        for (category, sample) in ids {
            let route = Route::sample(category, sample);
            assert_eq!(Route::resolve(&route.path()), Resolved::Route(route.clone()));
            let listing = Route::category(category);
            assert_eq!(Route::resolve(&listing.path()), Resolved::Route(listing));
        }
    }

    #[test]
    fn tokens_are_not_validated() {
        assert_eq!(
            Route::resolve("/category/unknown-category/nothing").route(),
            &Route::sample("unknown-category", "nothing")
        );
    }
}
