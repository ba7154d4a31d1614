/// Pagination state definitions for one harvest run
///
/// A run starts in `Fetching(0)` and always ends in exactly one of the two
/// disjoint terminal states `Done` and `Failed`.
use std::fmt;

/// Represents the current state of the pagination controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaginationState {
    // ===== Active States =====
    /// Requesting the page with the given index
    Fetching(u32),

    /// Extracting records from the page with the given index
    Extracting(u32),

    /// Appending the records of the page with the given index
    Accumulating(u32),

    // ===== Terminal States =====
    /// Pagination ended normally, the snapshot goes to the store
    Done,

    /// Pagination aborted, the store must not be touched
    Failed,
}

impl PaginationState {
    /// Initial state of every run
    pub fn initial() -> Self {
        Self::Fetching(0)
    }

    /// Returns true if no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Returns true if this is an active state
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Page index the state refers to, if any
    pub fn page_index(&self) -> Option<u32> {
        match self {
            Self::Fetching(page) | Self::Extracting(page) | Self::Accumulating(page) => Some(*page),
            Self::Done | Self::Failed => None,
        }
    }

    /// Returns true if moving from `self` to `next` is a legal transition
    ///
    /// | From | To |
    /// |------|----|
    /// | `Fetching(n)` | `Extracting(n)`, `Done`, `Failed` |
    /// | `Extracting(n)` | `Accumulating(n)`, `Done`, `Failed` |
    /// | `Accumulating(n)` | `Fetching(n + 1)`, `Done` |
    pub fn can_transition_to(&self, next: &Self) -> bool {
        match (self, next) {
            (Self::Fetching(a), Self::Extracting(b)) => a == b,
            (Self::Fetching(_), Self::Done | Self::Failed) => true,
            (Self::Extracting(a), Self::Accumulating(b)) => a == b,
            (Self::Extracting(_), Self::Done | Self::Failed) => true,
            (Self::Accumulating(a), Self::Fetching(b)) => a.checked_add(1) == Some(*b),
            (Self::Accumulating(_), Self::Done) => true,
            _ => false,
        }
    }
}

impl fmt::Display for PaginationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetching(page) => write!(f, "fetching({})", page),
            Self::Extracting(page) => write!(f, "extracting({})", page),
            Self::Accumulating(page) => write!(f, "accumulating({})", page),
            Self::Done => write!(f, "done"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Reason a run reached `Done`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Termination {
    /// A page contained no listing cards
    EmptyPage,

    /// The site answered a page request with HTTP 404
    EndOfResults,

    /// The configured page ceiling was reached
    PageLimit,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::EmptyPage => "empty page",
            Self::EndOfResults => "end of results",
            Self::PageLimit => "page limit",
        };
        write!(f, "{}", label)
    }
}
