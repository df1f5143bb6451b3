use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use crate::error::TourError;
use crate::options::{Step, TourOptions};
use crate::registry::TourRegistry;
use crate::widget::{EventHandle, TourFactory};

/// Wire form of one invocation: which tour, which method, positional args.
/// Transient; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodCall {
    pub target_id: String,
    pub method: String,
    #[serde(default)]
    pub args: Vec<Value>,
}

/// The closed set of operations a tour widget exposes. The facade builds these
/// directly, so `UnknownMethod`/`ArgumentMismatch` can only arise when a raw
/// `MethodCall` comes in from elsewhere on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum TourCommand {
    AddStep { step: Step, index: usize },
    AddSteps { steps: Vec<Step> },
    Back,
    Cancel,
    Complete,
    GetById { step_id: String },
    GetCurrentStep,
    Hide,
    IsActive,
    Next,
    RemoveStep { step_id: String },
    Show { key: String, forward: bool },
    Start,
}

impl TourCommand {
    /// The method-name literal this command travels under. Matches the
    /// widget's own method names one for one.
    pub fn method(&self) -> &'static str {
        match self {
            TourCommand::AddStep { .. } => "addStep",
            TourCommand::AddSteps { .. } => "addSteps",
            TourCommand::Back => "back",
            TourCommand::Cancel => "cancel",
            TourCommand::Complete => "complete",
            TourCommand::GetById { .. } => "getById",
            TourCommand::GetCurrentStep => "getCurrentStep",
            TourCommand::Hide => "hide",
            TourCommand::IsActive => "isActive",
            TourCommand::Next => "next",
            TourCommand::RemoveStep { .. } => "removeStep",
            TourCommand::Show { .. } => "show",
            TourCommand::Start => "start",
        }
    }

    /// Decodes a wire call into a command. Extra positional args are ignored,
    /// the way the widget itself ignores them.
    pub fn parse(call: &MethodCall) -> Result<Self, TourError> {
        let command = match call.method.as_str() {
            "addStep" => TourCommand::AddStep {
                step: require(call, 0, "step")?,
                index: require(call, 1, "index")?,
            },
            "addSteps" => TourCommand::AddSteps {
                steps: require(call, 0, "steps")?,
            },
            "back" => TourCommand::Back,
            "cancel" => TourCommand::Cancel,
            "complete" => TourCommand::Complete,
            "getById" => TourCommand::GetById {
                step_id: require(call, 0, "stepId")?,
            },
            "getCurrentStep" => TourCommand::GetCurrentStep,
            "hide" => TourCommand::Hide,
            "isActive" => TourCommand::IsActive,
            "next" => TourCommand::Next,
            "removeStep" => TourCommand::RemoveStep {
                step_id: require(call, 0, "stepId")?,
            },
            "show" => TourCommand::Show {
                key: optional(call, 0, "key")?.unwrap_or_else(|| "0".to_string()),
                forward: optional(call, 1, "forward")?.unwrap_or(true),
            },
            "start" => TourCommand::Start,
            other => return Err(TourError::UnknownMethod(other.to_string())),
        };
        Ok(command)
    }

    /// Encodes this command as a wire call against `target_id`.
    pub fn into_call(self, target_id: &str) -> MethodCall {
        let method = self.method().to_string();
        let args = match self {
            TourCommand::AddStep { step, index } => vec![json!(step), json!(index)],
            TourCommand::AddSteps { steps } => vec![json!(steps)],
            TourCommand::GetById { step_id } => vec![json!(step_id)],
            TourCommand::RemoveStep { step_id } => vec![json!(step_id)],
            TourCommand::Show { key, forward } => vec![json!(key), json!(forward)],
            TourCommand::Back
            | TourCommand::Cancel
            | TourCommand::Complete
            | TourCommand::GetCurrentStep
            | TourCommand::Hide
            | TourCommand::IsActive
            | TourCommand::Next
            | TourCommand::Start => vec![],
        };
        MethodCall {
            target_id: target_id.to_string(),
            method,
            args,
        }
    }
}

fn require<T: DeserializeOwned>(
    call: &MethodCall,
    index: usize,
    what: &str,
) -> Result<T, TourError> {
    let value = call.args.get(index).cloned().ok_or_else(|| {
        TourError::ArgumentMismatch {
            method: call.method.clone(),
            reason: format!("missing argument {index} ({what})"),
        }
    })?;
    serde_json::from_value(value).map_err(|err| TourError::ArgumentMismatch {
        method: call.method.clone(),
        reason: format!("argument {index} ({what}): {err}"),
    })
}

fn optional<T: DeserializeOwned>(
    call: &MethodCall,
    index: usize,
    what: &str,
) -> Result<Option<T>, TourError> {
    match call.args.get(index) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|err| TourError::ArgumentMismatch {
                method: call.method.clone(),
                reason: format!("argument {index} ({what}): {err}"),
            }),
    }
}

/// Far side of the boundary: resolves the target in the registry and performs
/// a typed invocation on the widget handle. Widget failures wrap as
/// `TargetInvocation` and propagate; nothing is caught or retried here.
#[derive(Clone)]
pub struct Dispatcher {
    registry: TourRegistry,
    factory: Arc<dyn TourFactory>,
}

impl Dispatcher {
    pub fn new(registry: TourRegistry, factory: Arc<dyn TourFactory>) -> Self {
        Self { registry, factory }
    }

    pub fn registry(&self) -> &TourRegistry {
        &self.registry
    }

    /// The one asymmetric operation: builds a fresh widget instance from
    /// `options` and registers it under `id`, so generic calls can find it.
    pub async fn setup(
        &self,
        id: &str,
        events: Option<EventHandle>,
        options: TourOptions,
    ) -> Result<(), TourError> {
        debug!(id, steps = options.steps.len(), "setting up tour");
        let handle = self
            .factory
            .create(options, events.clone())
            .await
            .map_err(|source| TourError::TargetInvocation {
                method: "setup".to_string(),
                source,
            })?;
        self.registry.register(id, handle, events)
    }

    /// Releases the instance registered under `id`. Pairs with `setup`.
    pub async fn teardown(&self, id: &str) -> Result<(), TourError> {
        self.registry.unregister(id).map(|_| ())
    }

    pub async fn call(&self, call: MethodCall) -> Result<Value, TourError> {
        let command = TourCommand::parse(&call)?;
        let instance = self.registry.resolve(&call.target_id)?;
        debug!(target_id = %call.target_id, method = %call.method, "dispatching tour call");

        let widget = instance.handle();
        let outcome = match command {
            TourCommand::AddStep { step, index } => {
                widget.add_step(step, index).await.map(|_| Value::Null)
            }
            TourCommand::AddSteps { steps } => {
                widget.add_steps(steps).await.map(|_| Value::Null)
            }
            TourCommand::Back => widget.back().await.map(|_| Value::Null),
            TourCommand::Cancel => widget.cancel().await.map(|_| Value::Null),
            TourCommand::Complete => widget.complete().await.map(|_| Value::Null),
            TourCommand::GetById { step_id } => {
                widget.step_by_id(&step_id).await.map(|step| json!(step))
            }
            TourCommand::GetCurrentStep => {
                widget.current_step().await.map(|step| json!(step))
            }
            TourCommand::Hide => widget.hide().await.map(|_| Value::Null),
            TourCommand::IsActive => widget.is_active().await.map(|active| json!(active)),
            TourCommand::Next => widget.next().await.map(|_| Value::Null),
            TourCommand::RemoveStep { step_id } => {
                widget.remove_step(&step_id).await.map(|_| Value::Null)
            }
            TourCommand::Show { key, forward } => {
                widget.show(&key, forward).await.map(|_| Value::Null)
            }
            TourCommand::Start => widget.start().await.map(|_| Value::Null),
        };

        outcome.map_err(|source| TourError::TargetInvocation {
            method: call.method,
            source,
        })
    }
}
