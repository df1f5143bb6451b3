//! Headless tour widget for tests and UI-less embeddings.
//!
//! `ScriptedTour` implements the observable state machine of a real tour
//! widget ({not started} → {active, step k} → {completed | cancelled}) with
//! no rendering at all, and keeps an ordered call log so tests can assert
//! exactly what reached the widget and in which order.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::options::{Step, TourOptions};
use crate::widget::{
    EventHandle, TourEvent, TourEventHandler, TourFactory, TourWidget, WidgetError, WidgetHandle,
};

#[derive(Debug, Default)]
struct TourState {
    steps: Vec<Step>,
    current: Option<usize>,
    active: bool,
    calls: Vec<String>,
}

/// In-memory tour instance.
pub struct ScriptedTour {
    name: String,
    events: Option<EventHandle>,
    state: Mutex<TourState>,
}

impl ScriptedTour {
    pub fn new(options: TourOptions, events: Option<EventHandle>) -> Arc<Self> {
        // Real widgets append a generated suffix to the configured name.
        let name = match &options.tour_name {
            Some(tour_name) => format!("{tour_name}--{}", Uuid::new_v4()),
            None => Uuid::new_v4().to_string(),
        };
        Arc::new(Self {
            name,
            events,
            state: Mutex::new(TourState {
                steps: options.steps,
                ..Default::default()
            }),
        })
    }

    /// The widget-generated instance name (reported with events).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Every call that reached this instance, in arrival order.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    async fn emit(&self, event: TourEvent) {
        if let Some(handler) = &self.events {
            handler.on_event(&self.name, event).await;
        }
    }

    fn record(&self, call: &str) {
        self.state.lock().unwrap().calls.push(call.to_string());
    }

    fn step_id_at(state: &TourState, index: usize) -> Option<String> {
        state.steps.get(index).and_then(|step| step.id.clone())
    }
}

#[async_trait]
impl TourWidget for ScriptedTour {
    async fn start(&self) -> Result<(), WidgetError> {
        self.record("start");
        let shown = {
            let mut state = self.state.lock().unwrap();
            state.active = true;
            state.current = if state.steps.is_empty() { None } else { Some(0) };
            state.current.map(|index| Self::step_id_at(&state, index))
        };
        debug!(tour = %self.name, "start");
        self.emit(TourEvent::Start).await;
        if let Some(step_id) = shown {
            self.emit(TourEvent::Show { step_id }).await;
        }
        Ok(())
    }

    async fn next(&self) -> Result<(), WidgetError> {
        self.record("next");
        enum Outcome {
            Ignored,
            Shown(Option<String>),
            Completed,
        }
        let outcome = {
            let mut state = self.state.lock().unwrap();
            if !state.active {
                Outcome::Ignored
            } else {
                match state.current {
                    Some(index) if index + 1 < state.steps.len() => {
                        state.current = Some(index + 1);
                        Outcome::Shown(Self::step_id_at(&state, index + 1))
                    }
                    // At the end (or no step at all): finish through complete.
                    _ => {
                        state.active = false;
                        state.current = None;
                        Outcome::Completed
                    }
                }
            }
        };
        match outcome {
            Outcome::Ignored => {}
            Outcome::Shown(step_id) => self.emit(TourEvent::Show { step_id }).await,
            Outcome::Completed => self.emit(TourEvent::Complete).await,
        }
        Ok(())
    }

    async fn back(&self) -> Result<(), WidgetError> {
        self.record("back");
        let shown = {
            let mut state = self.state.lock().unwrap();
            match (state.active, state.current) {
                (true, Some(index)) => {
                    let previous = index.saturating_sub(1);
                    state.current = Some(previous);
                    Some(Self::step_id_at(&state, previous))
                }
                _ => None,
            }
        };
        if let Some(step_id) = shown {
            self.emit(TourEvent::Show { step_id }).await;
        }
        Ok(())
    }

    async fn cancel(&self) -> Result<(), WidgetError> {
        self.record("cancel");
        let was_active = {
            let mut state = self.state.lock().unwrap();
            let was_active = state.active;
            state.active = false;
            state.current = None;
            was_active
        };
        if was_active {
            self.emit(TourEvent::Cancel).await;
        }
        Ok(())
    }

    async fn complete(&self) -> Result<(), WidgetError> {
        self.record("complete");
        let was_active = {
            let mut state = self.state.lock().unwrap();
            let was_active = state.active;
            state.active = false;
            state.current = None;
            was_active
        };
        if was_active {
            self.emit(TourEvent::Complete).await;
        }
        Ok(())
    }

    async fn hide(&self) -> Result<(), WidgetError> {
        self.record("hide");
        // Hiding keeps the tour active and the current step addressable.
        let had_current = self.state.lock().unwrap().current.is_some();
        if had_current {
            self.emit(TourEvent::Hide).await;
        }
        Ok(())
    }

    async fn show(&self, key: &str, forward: bool) -> Result<(), WidgetError> {
        self.record("show");
        debug!(tour = %self.name, key, forward, "show");
        let shown = {
            let mut state = self.state.lock().unwrap();
            let by_id = state
                .steps
                .iter()
                .position(|step| step.id.as_deref() == Some(key));
            let index = by_id.or_else(|| {
                key.parse::<usize>()
                    .ok()
                    .filter(|candidate| *candidate < state.steps.len())
            });
            match index {
                Some(index) => {
                    state.active = true;
                    state.current = Some(index);
                    Self::step_id_at(&state, index)
                }
                None => return Err(WidgetError::UnknownStep(key.to_string())),
            }
        };
        self.emit(TourEvent::Show { step_id: shown }).await;
        Ok(())
    }

    async fn add_step(&self, step: Step, index: usize) -> Result<(), WidgetError> {
        self.record("addStep");
        let mut state = self.state.lock().unwrap();
        let index = index.min(state.steps.len());
        state.steps.insert(index, step);
        // Keep the pointer on the step the user is looking at.
        if let Some(current) = state.current {
            if index <= current {
                state.current = Some(current + 1);
            }
        }
        Ok(())
    }

    async fn add_steps(&self, steps: Vec<Step>) -> Result<(), WidgetError> {
        self.record("addSteps");
        self.state.lock().unwrap().steps.extend(steps);
        Ok(())
    }

    async fn remove_step(&self, step_id: &str) -> Result<(), WidgetError> {
        self.record("removeStep");
        let hid_current = {
            let mut state = self.state.lock().unwrap();
            let position = state
                .steps
                .iter()
                .position(|step| step.id.as_deref() == Some(step_id));
            match position {
                None => false,
                Some(index) => {
                    state.steps.remove(index);
                    match state.current {
                        Some(current) if current == index => {
                            state.current = None;
                            true
                        }
                        Some(current) if current > index => {
                            state.current = Some(current - 1);
                            false
                        }
                        _ => false,
                    }
                }
            }
        };
        if hid_current {
            self.emit(TourEvent::Hide).await;
        }
        Ok(())
    }

    async fn step_by_id(&self, step_id: &str) -> Result<Option<Step>, WidgetError> {
        self.record("getById");
        let state = self.state.lock().unwrap();
        Ok(state
            .steps
            .iter()
            .find(|step| step.id.as_deref() == Some(step_id))
            .cloned())
    }

    async fn current_step(&self) -> Result<Option<Step>, WidgetError> {
        self.record("getCurrentStep");
        let state = self.state.lock().unwrap();
        Ok(state
            .current
            .and_then(|index| state.steps.get(index))
            .cloned())
    }

    async fn is_active(&self) -> Result<bool, WidgetError> {
        self.record("isActive");
        Ok(self.state.lock().unwrap().active)
    }
}

/// Factory for `ScriptedTour` instances. Remembers what it created so tests
/// can reach the concrete instance behind the widget handle.
#[derive(Default)]
pub struct ScriptedTourFactory {
    created: Mutex<Vec<Arc<ScriptedTour>>>,
}

impl ScriptedTourFactory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn created(&self) -> Vec<Arc<ScriptedTour>> {
        self.created.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Arc<ScriptedTour>> {
        self.created.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl TourFactory for ScriptedTourFactory {
    async fn create(
        &self,
        options: TourOptions,
        events: Option<EventHandle>,
    ) -> Result<WidgetHandle, WidgetError> {
        let tour = ScriptedTour::new(options, events);
        self.created.lock().unwrap().push(tour.clone());
        Ok(tour as WidgetHandle)
    }
}

/// Event handler that stores everything it receives.
#[derive(Default)]
pub struct RecordingHandler {
    events: Mutex<Vec<(String, TourEvent)>>,
}

impl RecordingHandler {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<(String, TourEvent)> {
        self.events.lock().unwrap().clone()
    }

    /// Just the event payloads, order preserved.
    pub fn event_kinds(&self) -> Vec<TourEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|(_, event)| event.clone())
            .collect()
    }
}

#[async_trait]
impl TourEventHandler for RecordingHandler {
    async fn on_event(&self, tour_name: &str, event: TourEvent) {
        self.events
            .lock()
            .unwrap()
            .push((tour_name.to_string(), event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps(ids: &[&str]) -> Vec<Step> {
        ids.iter()
            .map(|id| Step {
                id: Some(id.to_string()),
                ..Default::default()
            })
            .collect()
    }

    fn make_tour(ids: &[&str]) -> Arc<ScriptedTour> {
        ScriptedTour::new(
            TourOptions {
                steps: steps(ids),
                ..Default::default()
            },
            None,
        )
    }

    #[tokio::test]
    async fn test_start_activates_first_step() {
        let tour = make_tour(&["s1", "s2"]);
        assert!(!tour.is_active().await.unwrap());

        tour.start().await.unwrap();
        assert!(tour.is_active().await.unwrap());
        let current = tour.current_step().await.unwrap().unwrap();
        assert_eq!(current.id.as_deref(), Some("s1"));
    }

    #[tokio::test]
    async fn test_next_past_the_end_completes() {
        let tour = make_tour(&["s1", "s2"]);
        tour.start().await.unwrap();
        tour.next().await.unwrap();
        assert_eq!(
            tour.current_step().await.unwrap().unwrap().id.as_deref(),
            Some("s2")
        );

        tour.next().await.unwrap();
        assert!(!tour.is_active().await.unwrap());
        assert!(tour.current_step().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_back_stops_at_the_first_step() {
        let tour = make_tour(&["s1", "s2"]);
        tour.start().await.unwrap();
        tour.back().await.unwrap();
        assert_eq!(
            tour.current_step().await.unwrap().unwrap().id.as_deref(),
            Some("s1")
        );
    }

    #[tokio::test]
    async fn test_show_resolves_id_then_index() {
        let tour = make_tour(&["s1", "s2"]);
        tour.show("s2", true).await.unwrap();
        assert!(tour.is_active().await.unwrap());
        assert_eq!(
            tour.current_step().await.unwrap().unwrap().id.as_deref(),
            Some("s2")
        );

        tour.show("0", true).await.unwrap();
        assert_eq!(
            tour.current_step().await.unwrap().unwrap().id.as_deref(),
            Some("s1")
        );

        let err = tour.show("nope", true).await.unwrap_err();
        assert!(matches!(err, WidgetError::UnknownStep(key) if key == "nope"));
    }

    #[tokio::test]
    async fn test_cancel_is_terminal() {
        let tour = make_tour(&["s1"]);
        tour.start().await.unwrap();
        tour.cancel().await.unwrap();
        assert!(!tour.is_active().await.unwrap());
    }

    #[tokio::test]
    async fn test_add_step_clamps_index_and_keeps_current() {
        let tour = make_tour(&["s1", "s2"]);
        tour.start().await.unwrap();

        // Insert before the current step: the pointer must follow it.
        tour.add_step(
            Step {
                id: Some("s0".to_string()),
                ..Default::default()
            },
            0,
        )
        .await
        .unwrap();
        assert_eq!(
            tour.current_step().await.unwrap().unwrap().id.as_deref(),
            Some("s1")
        );

        // Way-out-of-range index appends.
        tour.add_step(
            Step {
                id: Some("s9".to_string()),
                ..Default::default()
            },
            99,
        )
        .await
        .unwrap();
        let last = tour.step_by_id("s9").await.unwrap();
        assert!(last.is_some());
    }

    #[tokio::test]
    async fn test_remove_current_step_hides_it() {
        let events = RecordingHandler::new();
        let tour = ScriptedTour::new(
            TourOptions {
                steps: steps(&["s1", "s2"]),
                ..Default::default()
            },
            Some(events.clone() as EventHandle),
        );
        tour.start().await.unwrap();
        tour.remove_step("s1").await.unwrap();

        assert!(tour.current_step().await.unwrap().is_none());
        assert!(tour.is_active().await.unwrap());
        assert!(events.event_kinds().contains(&TourEvent::Hide));
    }

    #[tokio::test]
    async fn test_events_carry_generated_tour_name() {
        let events = RecordingHandler::new();
        let tour = ScriptedTour::new(
            TourOptions {
                tour_name: Some("onboarding".to_string()),
                steps: steps(&["s1"]),
                ..Default::default()
            },
            Some(events.clone() as EventHandle),
        );
        assert!(tour.name().starts_with("onboarding--"));

        tour.start().await.unwrap();
        let recorded = events.events();
        assert!(!recorded.is_empty());
        assert!(recorded.iter().all(|(name, _)| name == tour.name()));
    }
}
