use thiserror::Error;

use crate::widget::WidgetError;

/// Everything that can go wrong between the facade and the widget.
///
/// None of these are recovered internally and nothing is retried: tour calls
/// are not idempotent (`next` twice advances twice), so the caller decides
/// what a failure means for the user.
#[derive(Debug, Error)]
pub enum TourError {
    #[error("no tour registered under id `{0}`")]
    UnknownId(String),

    #[error("a tour is already registered under id `{0}`")]
    DuplicateId(String),

    #[error("tour widgets have no method `{0}`")]
    UnknownMethod(String),

    #[error("bad arguments for `{method}`: {reason}")]
    ArgumentMismatch { method: String, reason: String },

    #[error("`{method}` failed inside the widget")]
    TargetInvocation {
        method: String,
        #[source]
        source: WidgetError,
    },

    #[error("boundary closed before the call completed")]
    BoundaryClosed,

    #[error("could not decode the result of `{method}`")]
    Decode {
        method: String,
        #[source]
        source: serde_json::Error,
    },
}
