// End-to-end runs of the facade → boundary → dispatcher → widget stack
// against the headless widget.

use std::sync::Arc;

use tour_bridge::boundary::QueuedBoundary;
use tour_bridge::dispatch::Dispatcher;
use tour_bridge::error::TourError;
use tour_bridge::mock::{RecordingHandler, ScriptedTourFactory};
use tour_bridge::options::{AttachTo, Step, StepText, TourOptions};
use tour_bridge::registry::TourRegistry;
use tour_bridge::tour::Tour;
use tour_bridge::widget::{EventHandle, TourEvent};

struct Harness {
    tour: Tour,
    factory: Arc<ScriptedTourFactory>,
}

fn make_harness() -> Harness {
    let factory = ScriptedTourFactory::new();
    let dispatcher = Dispatcher::new(TourRegistry::new(), factory.clone());
    Harness {
        tour: Tour::new(QueuedBoundary::spawn(dispatcher)),
        factory,
    }
}

fn step(id: &str, text: &str) -> Step {
    Step {
        id: Some(id.to_string()),
        text: Some(StepText::Html(text.to_string())),
        attach_to: Some(AttachTo::element("#addAction")),
        ..Default::default()
    }
}

fn two_step_options() -> TourOptions {
    TourOptions {
        tour_name: Some("onboarding".to_string()),
        steps: vec![step("s1", "welcome"), step("s2", "second")],
        ..Default::default()
    }
}

#[tokio::test]
async fn walks_a_two_step_tour_to_completion() {
    let harness = make_harness();
    let events = RecordingHandler::new();
    harness
        .tour
        .setup("t", Some(events.clone() as EventHandle), two_step_options())
        .await
        .unwrap();

    harness.tour.start("t").await.unwrap();
    assert!(harness.tour.is_active("t").await.unwrap());
    assert_eq!(
        harness
            .tour
            .get_current_step("t")
            .await
            .unwrap()
            .unwrap()
            .id
            .as_deref(),
        Some("s1")
    );

    harness.tour.next("t").await.unwrap();
    assert_eq!(
        harness
            .tour
            .get_current_step("t")
            .await
            .unwrap()
            .unwrap()
            .id
            .as_deref(),
        Some("s2")
    );

    harness.tour.next("t").await.unwrap();
    assert!(!harness.tour.is_active("t").await.unwrap());

    assert_eq!(
        events.event_kinds(),
        vec![
            TourEvent::Start,
            TourEvent::Show {
                step_id: Some("s1".to_string())
            },
            TourEvent::Show {
                step_id: Some("s2".to_string())
            },
            TourEvent::Complete,
        ]
    );
}

#[tokio::test]
async fn sequential_calls_reach_the_widget_in_order() {
    let harness = make_harness();
    harness
        .tour
        .setup("t", None, two_step_options())
        .await
        .unwrap();

    harness.tour.start("t").await.unwrap();
    harness.tour.next("t").await.unwrap();
    harness.tour.next("t").await.unwrap();
    harness.tour.back("t").await.unwrap();

    let widget = harness.factory.last().expect("tour was created");
    assert_eq!(widget.calls(), vec!["start", "next", "next", "back"]);
}

#[tokio::test]
async fn show_first_lands_on_index_zero() {
    let harness = make_harness();
    harness
        .tour
        .setup("t", None, two_step_options())
        .await
        .unwrap();

    harness.tour.show_first("t").await.unwrap();
    let current = harness.tour.get_current_step("t").await.unwrap().unwrap();
    assert_eq!(current.id.as_deref(), Some("s1"));
    assert_eq!(current.text, Some(StepText::Html("welcome".to_string())));
}

#[tokio::test]
async fn tours_under_distinct_ids_do_not_interfere() {
    let harness = make_harness();
    harness
        .tour
        .setup("a", None, two_step_options())
        .await
        .unwrap();
    harness
        .tour
        .setup("b", None, two_step_options())
        .await
        .unwrap();

    assert_eq!(harness.factory.created().len(), 2);

    harness.tour.start("a").await.unwrap();
    harness.tour.next("a").await.unwrap();
    harness.tour.cancel("a").await.unwrap();

    assert!(!harness.tour.is_active("b").await.unwrap());
    assert!(harness.tour.get_current_step("b").await.unwrap().is_none());

    harness.tour.start("b").await.unwrap();
    assert!(harness.tour.is_active("b").await.unwrap());
}

#[tokio::test]
async fn setup_under_a_live_id_is_rejected() {
    let harness = make_harness();
    harness
        .tour
        .setup("t", None, two_step_options())
        .await
        .unwrap();

    let err = harness
        .tour
        .setup("t", None, two_step_options())
        .await
        .unwrap_err();
    assert!(matches!(err, TourError::DuplicateId(id) if id == "t"));
}

#[tokio::test]
async fn teardown_pairs_with_setup() {
    let harness = make_harness();
    harness
        .tour
        .setup("t", None, two_step_options())
        .await
        .unwrap();
    harness.tour.teardown("t").await.unwrap();

    let err = harness.tour.is_active("t").await.unwrap_err();
    assert!(matches!(err, TourError::UnknownId(_)));

    // The id is free again after teardown.
    harness
        .tour
        .setup("t", None, two_step_options())
        .await
        .unwrap();
}

#[tokio::test]
async fn hide_keeps_the_tour_active() {
    let harness = make_harness();
    let events = RecordingHandler::new();
    harness
        .tour
        .setup("t", Some(events.clone() as EventHandle), two_step_options())
        .await
        .unwrap();

    harness.tour.start("t").await.unwrap();
    harness.tour.hide("t").await.unwrap();

    assert!(harness.tour.is_active("t").await.unwrap());
    assert!(events.event_kinds().contains(&TourEvent::Hide));
}
