//! Microbe errors

use microbe_dom::{DomError, SelectorError};
use microbe_html::HtmlError;

/// Result type for collection operations
pub type MicrobeResult<T> = Result<T, MicrobeError>;

/// Errors surfaced by collection operations.
///
/// Host DOM faults are passed through unchanged; nothing is retried or
/// rolled back.
#[derive(Debug, thiserror::Error)]
pub enum MicrobeError {
    #[error("DOM error: {0}")]
    Dom(#[from] DomError),

    #[error("Invalid selector {selector:?}: {source}")]
    Selector {
        selector: String,
        #[source]
        source: SelectorError,
    },

    #[error("HTML error: {0}")]
    Html(#[from] HtmlError),
}
