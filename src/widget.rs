use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::options::{Step, TourOptions};

/// A live tour on the widget side of the boundary.
pub type WidgetHandle = Arc<dyn TourWidget>;

/// A caller-side object receiving lifecycle events from a tour.
pub type EventHandle = Arc<dyn TourEventHandler>;

/// Failure raised by the underlying widget operation. Opaque to the bridge;
/// the dispatcher wraps it and propagates it to the caller untouched.
#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("tour has no step `{0}`")]
    UnknownStep(String),
    #[error("{0}")]
    Other(String),
}

/// The capability surface of one live tour instance.
///
/// Implementations must tolerate interleaved calls or rely on callers
/// serializing themselves; the bridge does not lock per instance.
#[async_trait]
pub trait TourWidget: Send + Sync {
    /// Start the tour at its first eligible step.
    async fn start(&self) -> Result<(), WidgetError>;
    /// Advance one step; completes the tour when already at the end.
    async fn next(&self) -> Result<(), WidgetError>;
    /// Go back one step.
    async fn back(&self) -> Result<(), WidgetError>;
    /// End the tour through the cancel path.
    async fn cancel(&self) -> Result<(), WidgetError>;
    /// End the tour through the complete path.
    async fn complete(&self) -> Result<(), WidgetError>;
    /// Hide the current step without leaving the tour.
    async fn hide(&self) -> Result<(), WidgetError>;
    /// Show a specific step; `key` is a step id or a numeric index.
    async fn show(&self, key: &str, forward: bool) -> Result<(), WidgetError>;
    /// Insert a step at `index` (clamped to the step count).
    async fn add_step(&self, step: Step, index: usize) -> Result<(), WidgetError>;
    /// Append steps in order.
    async fn add_steps(&self, steps: Vec<Step>) -> Result<(), WidgetError>;
    /// Remove the step with the given id; unknown ids are a no-op.
    async fn remove_step(&self, step_id: &str) -> Result<(), WidgetError>;
    async fn step_by_id(&self, step_id: &str) -> Result<Option<Step>, WidgetError>;
    async fn current_step(&self) -> Result<Option<Step>, WidgetError>;
    async fn is_active(&self) -> Result<bool, WidgetError>;
}

/// Constructs widget instances on the far side of the boundary. The one seam
/// the `setup` path needs that the generic call path does not.
#[async_trait]
pub trait TourFactory: Send + Sync {
    async fn create(
        &self,
        options: TourOptions,
        events: Option<EventHandle>,
    ) -> Result<WidgetHandle, WidgetError>;
}

/// Lifecycle events a tour reports back to its caller-side handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum TourEvent {
    Start,
    Show {
        #[serde(rename = "stepId")]
        step_id: Option<String>,
    },
    Hide,
    Complete,
    Cancel,
}

/// Outbound direction of the boundary: the widget invokes this, the caller
/// implements it. `tour_name` is the widget's generated instance name, not
/// the registry id.
#[async_trait]
pub trait TourEventHandler: Send + Sync {
    async fn on_event(&self, tour_name: &str, event: TourEvent);
}
