//! Observable state of one cache slot.

/// Tri-state outcome of a cached read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// No result has been delivered yet.
    Pending,
    /// The most recent fetch failed.
    Error,
    /// Data is available and the most recent fetch succeeded.
    Success,
}

/// Point-in-time copy of a cache slot.
///
/// ## Invariants
/// - `is_stale` is set by invalidation and cleared only by a fetch that
///   started after the latest invalidation.
/// - A failed fetch keeps previously delivered data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySnapshot<T, E> {
    pub(super) data: Option<T>,
    pub(super) error: Option<E>,
    pub(super) is_fetching: bool,
    pub(super) is_stale: bool,
    pub(super) generation: u64,
}

impl<T, E> Default for QuerySnapshot<T, E> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            is_fetching: false,
            is_stale: false,
            generation: 0,
        }
    }
}

impl<T, E> QuerySnapshot<T, E> {
    /// Derived tri-state status.
    pub const fn status(&self) -> QueryStatus {
        if self.error.is_some() {
            QueryStatus::Error
        } else if self.data.is_some() {
            QueryStatus::Success
        } else {
            QueryStatus::Pending
        }
    }

    /// Latest delivered data, possibly stale.
    pub const fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// Error from the most recent fetch, if it failed.
    pub const fn error(&self) -> Option<&E> {
        self.error.as_ref()
    }

    /// Whether a fetch is in flight.
    pub const fn is_fetching(&self) -> bool {
        self.is_fetching
    }

    /// Whether the slot was invalidated after its last delivered result.
    pub const fn is_stale(&self) -> bool {
        self.is_stale
    }

    /// In flight with nothing to show yet.
    pub const fn is_loading(&self) -> bool {
        self.is_fetching && self.data.is_none() && self.error.is_none()
    }

    /// A delivered result that no invalidation has superseded.
    pub(super) const fn has_fresh_result(&self) -> bool {
        !self.is_stale && (self.data.is_some() || self.error.is_some())
    }

    /// The same snapshot with any delivered result removed.
    pub(super) fn without_result(mut self) -> Self {
        self.data = None;
        self.error = None;
        self
    }
}
