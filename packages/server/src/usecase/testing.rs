//! Test doubles shared by the use case tests.

use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use tertulia_shared::time::FixedClock;
use tokio::sync::{Mutex, mpsc};

use crate::domain::{
    ConnectionId, MessagePushError, MessagePusher, PusherChannel, RelayEvent, RelayState,
    Session, Timestamp,
};

use super::{FanoutRouter, SharedRelayState};

pub(crate) const NOW: i64 = 1672531200000;

/// MessagePusher that records every delivery instead of writing to a socket.
#[derive(Default)]
pub(crate) struct RecordingPusher {
    deliveries: StdMutex<Vec<(ConnectionId, RelayEvent)>>,
}

impl RecordingPusher {
    fn record(&self, id: &ConnectionId, event: &RelayEvent) {
        if let Ok(mut deliveries) = self.deliveries.lock() {
            deliveries.push((id.clone(), event.clone()));
        }
    }

    pub(crate) fn deliveries(&self) -> Vec<(ConnectionId, RelayEvent)> {
        self.deliveries
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }

    /// Events delivered to one connection, in delivery order.
    pub(crate) fn events_for(&self, id: &ConnectionId) -> Vec<RelayEvent> {
        self.deliveries()
            .into_iter()
            .filter(|(to, _)| to == id)
            .map(|(_, event)| event)
            .collect()
    }

    /// Recipients of every event of one kind, in delivery order.
    pub(crate) fn recipients_of(&self, kind: &str) -> Vec<ConnectionId> {
        self.deliveries()
            .into_iter()
            .filter(|(_, event)| event.kind() == kind)
            .map(|(to, _)| to)
            .collect()
    }

    pub(crate) fn count_of(&self, kind: &str) -> usize {
        self.recipients_of(kind).len()
    }

    pub(crate) fn clear(&self) {
        if let Ok(mut deliveries) = self.deliveries.lock() {
            deliveries.clear();
        }
    }
}

#[async_trait]
impl MessagePusher for RecordingPusher {
    async fn register_client(&self, _client_id: ConnectionId, _sender: PusherChannel) {}

    async fn unregister_client(&self, _client_id: &ConnectionId) {}

    async fn push_to(
        &self,
        client_id: &ConnectionId,
        event: &RelayEvent,
    ) -> Result<(), MessagePushError> {
        self.record(client_id, event);
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: &[ConnectionId],
        event: &RelayEvent,
    ) -> Result<(), MessagePushError> {
        for target in targets {
            self.record(target, event);
        }
        Ok(())
    }
}

/// Fresh relay state, router and recording pusher.
pub(crate) struct Fixture {
    pub(crate) state: SharedRelayState,
    pub(crate) router: FanoutRouter,
    pub(crate) pusher: Arc<RecordingPusher>,
    pub(crate) clock: Arc<FixedClock>,
}

impl Fixture {
    pub(crate) fn new() -> Self {
        let pusher = Arc::new(RecordingPusher::default());
        Self {
            state: Arc::new(Mutex::new(RelayState::new(Timestamp::new(NOW)))),
            router: FanoutRouter::new(pusher.clone()),
            pusher,
            clock: Arc::new(FixedClock::new(NOW)),
        }
    }

    /// Connect a session directly through the state, without fan-out.
    pub(crate) async fn connect(&self) -> Session {
        self.state.lock().await.connect()
    }
}

/// Sender half whose receiver is dropped immediately.
pub(crate) fn detached_channel() -> PusherChannel {
    mpsc::unbounded_channel().0
}
