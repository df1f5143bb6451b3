use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::boundary::BoundaryHandle;
use crate::dispatch::{Dispatcher, TourCommand};
use crate::error::TourError;
use crate::options::{Step, TourOptions};
use crate::widget::EventHandle;

/// Typed facade over the boundary. One async method per widget capability;
/// callers never touch method-name strings or raw JSON args.
///
/// All methods address a tour by the caller-assigned `id` passed to
/// [`Tour::setup`]. Calls issued sequentially against one id apply in that
/// order.
#[derive(Clone)]
pub struct Tour {
    boundary: BoundaryHandle,
}

impl Tour {
    pub fn new(boundary: BoundaryHandle) -> Self {
        Self { boundary }
    }

    /// Convenience wiring for in-process use: a fresh registry behind a
    /// direct boundary.
    pub fn with_dispatcher(dispatcher: Dispatcher) -> Self {
        Self {
            boundary: crate::boundary::LocalBoundary::new(dispatcher),
        }
    }

    async fn invoke(&self, id: &str, command: TourCommand) -> Result<Value, TourError> {
        self.boundary.call(command.into_call(id)).await
    }

    async fn invoke_for<T: DeserializeOwned>(
        &self,
        id: &str,
        command: TourCommand,
    ) -> Result<T, TourError> {
        let method = command.method();
        let value = self.invoke(id, command).await?;
        serde_json::from_value(value).map_err(|source| TourError::Decode {
            method: method.to_string(),
            source,
        })
    }

    /// Creates the underlying widget instance from `options` and registers it
    /// under `id`. The one operation that does not travel through the generic
    /// call path. Pair every `setup` with a [`Tour::teardown`] when the owning
    /// component goes away.
    pub async fn setup(
        &self,
        id: &str,
        events: Option<EventHandle>,
        options: TourOptions,
    ) -> Result<(), TourError> {
        self.boundary.setup(id, events, options).await
    }

    /// Releases the instance registered under `id`. Subsequent calls against
    /// the id fail with `UnknownId`.
    pub async fn teardown(&self, id: &str) -> Result<(), TourError> {
        self.boundary.teardown(id).await
    }

    /// Adds a step at `index`.
    pub async fn add_step(&self, id: &str, step: Step, index: usize) -> Result<(), TourError> {
        self.invoke(id, TourCommand::AddStep { step, index })
            .await
            .map(|_| ())
    }

    /// Appends steps in order.
    pub async fn add_steps(&self, id: &str, steps: Vec<Step>) -> Result<(), TourError> {
        self.invoke(id, TourCommand::AddSteps { steps })
            .await
            .map(|_| ())
    }

    /// Go to the previous step.
    pub async fn back(&self, id: &str) -> Result<(), TourError> {
        self.invoke(id, TourCommand::Back).await.map(|_| ())
    }

    /// End the tour through the cancel path. When the tour was configured
    /// with `confirm_cancel`, the widget asks the user first.
    pub async fn cancel(&self, id: &str) -> Result<(), TourError> {
        self.invoke(id, TourCommand::Cancel).await.map(|_| ())
    }

    /// End the tour through the complete path.
    pub async fn complete(&self, id: &str) -> Result<(), TourError> {
        self.invoke(id, TourCommand::Complete).await.map(|_| ())
    }

    /// Looks a step up by its id.
    pub async fn get_by_id(&self, id: &str, step_id: &str) -> Result<Option<Step>, TourError> {
        self.invoke_for(
            id,
            TourCommand::GetById {
                step_id: step_id.to_string(),
            },
        )
        .await
    }

    /// The step currently shown, if any.
    pub async fn get_current_step(&self, id: &str) -> Result<Option<Step>, TourError> {
        self.invoke_for(id, TourCommand::GetCurrentStep).await
    }

    /// Hide the current step without leaving the tour.
    pub async fn hide(&self, id: &str) -> Result<(), TourError> {
        self.invoke(id, TourCommand::Hide).await.map(|_| ())
    }

    pub async fn is_active(&self, id: &str) -> Result<bool, TourError> {
        self.invoke_for(id, TourCommand::IsActive).await
    }

    /// Advance one step; completes the tour when already at the end.
    pub async fn next(&self, id: &str) -> Result<(), TourError> {
        self.invoke(id, TourCommand::Next).await.map(|_| ())
    }

    /// Removes the step with the given id.
    pub async fn remove_step(&self, id: &str, step_id: &str) -> Result<(), TourError> {
        self.invoke(
            id,
            TourCommand::RemoveStep {
                step_id: step_id.to_string(),
            },
        )
        .await
        .map(|_| ())
    }

    /// Show a specific step. `key` is a step id or a numeric index; `forward`
    /// tells the widget which direction it is moving for skip logic.
    pub async fn show(&self, id: &str, key: &str, forward: bool) -> Result<(), TourError> {
        self.invoke(
            id,
            TourCommand::Show {
                key: key.to_string(),
                forward,
            },
        )
        .await
        .map(|_| ())
    }

    /// Show with the widget defaults: first step, moving forward.
    pub async fn show_first(&self, id: &str) -> Result<(), TourError> {
        self.show(id, "0", true).await
    }

    /// Start the tour.
    pub async fn start(&self, id: &str) -> Result<(), TourError> {
        self.invoke(id, TourCommand::Start).await.map(|_| ())
    }
}
