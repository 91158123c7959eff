//! Search domains and their fan-out order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three search domains. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    /// Q&A corpus (questions and answers).
    #[default]
    Qa,
    /// Source-code host; requires a connected account.
    Code,
    /// Documentation index, restricted to the enabled doc sources.
    Docs,
}

impl Filter {
    /// All filters in their fixed fallback order.
    pub const ALL: [Self; 3] = [Self::Qa, Self::Docs, Self::Code];

    /// Order in which a fan-out visits the backends when `self` is active.
    ///
    /// The active filter goes first; the remaining two keep the fallback
    /// order of [`Filter::ALL`].
    ///
    /// ```
    /// use devsearch::Filter;
    ///
    /// assert_eq!(Filter::Code.search_order(), [Filter::Code, Filter::Qa, Filter::Docs]);
    /// assert_eq!(Filter::Docs.search_order(), [Filter::Docs, Filter::Qa, Filter::Code]);
    /// ```
    #[must_use]
    pub fn search_order(self) -> [Self; 3] {
        let mut order = [self; 3];
        let mut slot = 1;
        for filter in Self::ALL {
            if filter != self {
                order[slot] = filter;
                slot += 1;
            }
        }
        order
    }

    /// Stable lowercase name used in persisted preferences and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Qa => "qa",
            Self::Code => "code",
            Self::Docs => "docs",
        }
    }

    /// Parses the name produced by [`Filter::as_str`].
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "qa" => Some(Self::Qa),
            "code" => Some(Self::Code),
            "docs" => Some(Self::Docs),
            _ => None,
        }
    }

    pub(crate) const fn slot(self) -> usize {
        match self {
            Self::Qa => 0,
            Self::Code => 1,
            Self::Docs => 2,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
