use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A CSS selector addressing an element on the hosting page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ElementRef(pub String);

impl ElementRef {
    pub fn new(selector: &str) -> Self {
        Self(selector.to_string())
    }
}

/// Name of a host-registered function. The widget host resolves the name at
/// call time; the bridge never carries executable code across the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CallbackRef(pub String);

impl CallbackRef {
    pub fn new(name: &str) -> Self {
        Self(name.to_string())
    }
}

/// Body text of a step. Kept as an explicit variant type so the three cases
/// the widget accepts stay distinguishable on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum StepText {
    /// Raw HTML string rendered into the step body.
    Html(String),
    /// A pre-rendered element already present on the page.
    Element(ElementRef),
    /// Host callback executed when the step is built; must yield one of the
    /// other two forms.
    Deferred(CallbackRef),
}

/// Scroll behavior when a step is shown: plain on/off, or the params object
/// handed to `scrollIntoView` verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ScrollTo {
    Auto(bool),
    Params(Value),
}

impl Default for ScrollTo {
    fn default() -> Self {
        ScrollTo::Auto(true)
    }
}

/// The element a step is attached to, and where the tooltip sits relative to
/// it ("top", "bottom-start", "left-end", ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttachTo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<ElementRef>,
    #[serde(default = "AttachTo::default_on")]
    pub on: String,
}

impl AttachTo {
    fn default_on() -> String {
        "bottom".to_string()
    }

    pub fn element(selector: &str) -> Self {
        Self {
            element: Some(ElementRef::new(selector)),
            on: Self::default_on(),
        }
    }
}

impl Default for AttachTo {
    fn default() -> Self {
        Self {
            element: None,
            on: Self::default_on(),
        }
    }
}

/// A page event that advances the tour to the next step. The event can fire
/// on any element, not just tour-managed ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceOn {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
}

/// Options for the "✕" cancel icon in the step header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CancelIcon {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// aria-label text for the icon.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Default for CancelIcon {
    fn default() -> Self {
        Self {
            enabled: true,
            label: None,
        }
    }
}

/// One button in a step footer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Button {
    /// Widget-side action expression, bound to the owning tour (so
    /// "tour.next" works).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classes: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    /// aria-label text of the button.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub secondary: bool,
    /// HTML text of the button.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Button {
    /// Primary "next step" button.
    pub fn next() -> Self {
        Self {
            action: Some("tour.next".to_string()),
            classes: Some("btn btn-primary".to_string()),
            text: Some("Next".to_string()),
            ..Default::default()
        }
    }

    /// Secondary "previous step" button.
    pub fn back() -> Self {
        Self {
            action: Some("tour.back".to_string()),
            classes: Some("btn btn-secondary".to_string()),
            secondary: true,
            text: Some("Back".to_string()),
            ..Default::default()
        }
    }

    /// Secondary "cancel the tour" button.
    pub fn cancel() -> Self {
        Self {
            action: Some("tour.cancel".to_string()),
            classes: Some("btn btn-secondary".to_string()),
            secondary: true,
            text: Some("Cancel".to_string()),
            ..Default::default()
        }
    }
}

/// One stop in a tour. Field names serialize camelCase so the whole struct can
/// be handed to the widget's step constructor verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Whether to display the tooltip arrow.
    #[serde(default = "default_true")]
    pub arrow: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attach_to: Option<AttachTo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advance_on: Option<AdvanceOn>,
    /// Async gate: the step is shown only once this callback's promise
    /// resolves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_show: Option<CallbackRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buttons: Option<Vec<Button>>,
    /// When false, the target gets `pointer-events: none`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_click_target: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_icon: Option<CancelIcon>,
    /// Extra classes for the step's content element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classes: Option<String>,
    /// Class applied to the attach target while this step is active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub modal_overlay_opening_padding: u32,
    #[serde(default)]
    pub modal_overlay_opening_radius: u32,
    /// Extra options passed to the positioning engine, forwarded opaquely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floating_ui_options: Option<Value>,
    #[serde(default)]
    pub scroll_to: ScrollTo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_to_handler: Option<CallbackRef>,
    /// Predicate deciding whether the step is shown or skipped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_on: Option<CallbackRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<StepText>,
    /// Rendered as an h3 at the top of the step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Lifecycle hooks ("show", "hide", ...) by event name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<HashMap<String, CallbackRef>>,
}

impl Default for Step {
    fn default() -> Self {
        Self {
            arrow: true,
            attach_to: None,
            advance_on: None,
            before_show: None,
            buttons: None,
            can_click_target: None,
            cancel_icon: None,
            classes: None,
            highlight_class: None,
            id: None,
            modal_overlay_opening_padding: 0,
            modal_overlay_opening_radius: 0,
            floating_ui_options: None,
            scroll_to: ScrollTo::default(),
            scroll_to_handler: None,
            show_on: None,
            text: None,
            title: None,
            when: None,
        }
    }
}

/// Tour-level configuration, forwarded to the widget's tour constructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TourOptions {
    /// When true, cancelling asks the user for confirmation first.
    #[serde(default)]
    pub confirm_cancel: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirm_cancel_message: Option<String>,
    /// Prefix for the widget's generated class names and step-id data
    /// attributes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_prefix: Option<String>,
    /// Defaults merged into every step created through addStep, forwarded
    /// opaquely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_step_options: Option<Value>,
    /// Escape exits the tour unless explicitly disabled.
    #[serde(default = "default_true")]
    pub exit_on_esc: bool,
    /// Arrow-key navigation unless explicitly disabled.
    #[serde(default = "default_true")]
    pub keyboard_navigation: bool,
    /// Container for step elements; the page body when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps_container: Option<ElementRef>,
    /// Container for the modal overlay; the page body when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modal_container: Option<ElementRef>,
    #[serde(default)]
    pub steps: Vec<Step>,
    /// Appended to the widget's generated instance id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tour_name: Option<String>,
    /// Darkened overlay with an interactive opening around the target.
    #[serde(default = "default_true")]
    pub use_modal_overlay: bool,
}

impl Default for TourOptions {
    fn default() -> Self {
        Self {
            confirm_cancel: false,
            confirm_cancel_message: None,
            class_prefix: None,
            default_step_options: None,
            exit_on_esc: true,
            keyboard_navigation: true,
            steps_container: None,
            modal_container: None,
            steps: vec![],
            tour_name: None,
            use_modal_overlay: true,
        }
    }
}

fn default_true() -> bool {
    true
}
