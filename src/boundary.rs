use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::dispatch::{Dispatcher, MethodCall};
use crate::error::TourError;
use crate::options::TourOptions;
use crate::widget::EventHandle;

/// The transport seam between the caller-side facade and the far-side
/// dispatcher. `setup`/`teardown` bracket an instance's lifetime; everything
/// else travels through `call`.
///
/// Requests issued sequentially by one caller are applied in that order.
/// There is no cancellation: once a call is issued it runs; callers that want
/// a timeout layer one around the await.
#[async_trait]
pub trait TourBoundary: Send + Sync {
    async fn setup(
        &self,
        id: &str,
        events: Option<EventHandle>,
        options: TourOptions,
    ) -> Result<(), TourError>;
    async fn call(&self, call: MethodCall) -> Result<Value, TourError>;
    async fn teardown(&self, id: &str) -> Result<(), TourError>;
}

pub type BoundaryHandle = Arc<dyn TourBoundary>;

/// In-process boundary: awaits the dispatcher directly. Per-caller ordering
/// falls out of the caller awaiting each round trip.
pub struct LocalBoundary {
    dispatcher: Dispatcher,
}

impl LocalBoundary {
    pub fn new(dispatcher: Dispatcher) -> Arc<Self> {
        Arc::new(Self { dispatcher })
    }
}

#[async_trait]
impl TourBoundary for LocalBoundary {
    async fn setup(
        &self,
        id: &str,
        events: Option<EventHandle>,
        options: TourOptions,
    ) -> Result<(), TourError> {
        self.dispatcher.setup(id, events, options).await
    }

    async fn call(&self, call: MethodCall) -> Result<Value, TourError> {
        self.dispatcher.call(call).await
    }

    async fn teardown(&self, id: &str) -> Result<(), TourError> {
        self.dispatcher.teardown(id).await
    }
}

enum BoundaryRequest {
    Setup {
        id: String,
        events: Option<EventHandle>,
        options: TourOptions,
        reply: oneshot::Sender<Result<(), TourError>>,
    },
    Call {
        call: MethodCall,
        reply: oneshot::Sender<Result<Value, TourError>>,
    },
    Teardown {
        id: String,
        reply: oneshot::Sender<Result<(), TourError>>,
    },
}

/// Queued boundary: models the cross-runtime hop. A spawned pump task owns
/// the dispatcher and applies requests strictly in arrival order, which makes
/// the FIFO guarantee hold even across callers sharing the queue.
pub struct QueuedBoundary {
    queue: mpsc::Sender<BoundaryRequest>,
}

impl QueuedBoundary {
    pub fn spawn(dispatcher: Dispatcher) -> Arc<Self> {
        let (queue, mut requests) = mpsc::channel::<BoundaryRequest>(64);
        tokio::spawn(async move {
            while let Some(request) = requests.recv().await {
                match request {
                    BoundaryRequest::Setup {
                        id,
                        events,
                        options,
                        reply,
                    } => {
                        let _ = reply.send(dispatcher.setup(&id, events, options).await);
                    }
                    BoundaryRequest::Call { call, reply } => {
                        let _ = reply.send(dispatcher.call(call).await);
                    }
                    BoundaryRequest::Teardown { id, reply } => {
                        let _ = reply.send(dispatcher.teardown(&id).await);
                    }
                }
            }
            debug!("boundary queue closed, pump exiting");
        });
        Arc::new(Self { queue })
    }

    async fn send(&self, request: BoundaryRequest) -> Result<(), TourError> {
        self.queue
            .send(request)
            .await
            .map_err(|_| TourError::BoundaryClosed)
    }
}

#[async_trait]
impl TourBoundary for QueuedBoundary {
    async fn setup(
        &self,
        id: &str,
        events: Option<EventHandle>,
        options: TourOptions,
    ) -> Result<(), TourError> {
        let (reply, done) = oneshot::channel();
        self.send(BoundaryRequest::Setup {
            id: id.to_string(),
            events,
            options,
            reply,
        })
        .await?;
        done.await.map_err(|_| TourError::BoundaryClosed)?
    }

    async fn call(&self, call: MethodCall) -> Result<Value, TourError> {
        let (reply, done) = oneshot::channel();
        self.send(BoundaryRequest::Call { call, reply }).await?;
        done.await.map_err(|_| TourError::BoundaryClosed)?
    }

    async fn teardown(&self, id: &str) -> Result<(), TourError> {
        let (reply, done) = oneshot::channel();
        self.send(BoundaryRequest::Teardown {
            id: id.to_string(),
            reply,
        })
        .await?;
        done.await.map_err(|_| TourError::BoundaryClosed)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::TourCommand;
    use crate::mock::ScriptedTourFactory;
    use crate::options::{Step, TourOptions};
    use crate::registry::TourRegistry;

    fn two_step_options() -> TourOptions {
        TourOptions {
            steps: vec![
                Step {
                    id: Some("s1".to_string()),
                    ..Default::default()
                },
                Step {
                    id: Some("s2".to_string()),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_queued_boundary_applies_calls_in_issue_order() {
        let factory = ScriptedTourFactory::new();
        let dispatcher = Dispatcher::new(TourRegistry::new(), factory.clone());
        let boundary = QueuedBoundary::spawn(dispatcher);

        boundary
            .setup("t", None, two_step_options())
            .await
            .unwrap();
        for command in [
            TourCommand::Start,
            TourCommand::Next,
            TourCommand::Next,
            TourCommand::Back,
        ] {
            boundary.call(command.into_call("t")).await.unwrap();
        }

        let tour = factory.last().expect("factory created a tour");
        assert_eq!(tour.calls(), vec!["start", "next", "next", "back"]);
    }

    #[tokio::test]
    async fn test_queued_boundary_propagates_dispatch_errors() {
        let dispatcher = Dispatcher::new(TourRegistry::new(), ScriptedTourFactory::new());
        let boundary = QueuedBoundary::spawn(dispatcher);

        let err = boundary
            .call(TourCommand::Start.into_call("ghost"))
            .await
            .unwrap_err();
        assert!(matches!(err, TourError::UnknownId(_)));
    }
}
