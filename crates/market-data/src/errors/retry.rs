use std::time::Duration;

/// Classification for retry policy.
///
/// | Class | Retry? | Delay before retry |
/// |-------|--------|--------------------|
/// | `Never` | No | - |
/// | `Once` | One more attempt | none |
/// | `WithBackoff` | One more attempt | [`RetryClass::BACKOFF`] |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Never retry - bad symbol, empty range, or validation error.
    /// The request is fundamentally invalid and retrying won't help.
    Never,

    /// Retry immediately, at most once.
    Once,

    /// Transient failure such as rate limiting (429) or timeout.
    /// Retry after waiting [`RetryClass::BACKOFF`].
    WithBackoff,
}

impl RetryClass {
    /// Delay applied before retrying a `WithBackoff` failure.
    pub const BACKOFF: Duration = Duration::from_millis(500);

    /// Delay to wait before the retry, or `None` when no retry should happen.
    pub fn delay(&self) -> Option<Duration> {
        match self {
            RetryClass::Never => None,
            RetryClass::Once => Some(Duration::ZERO),
            RetryClass::WithBackoff => Some(Self::BACKOFF),
        }
    }
}
