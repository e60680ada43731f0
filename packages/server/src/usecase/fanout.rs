//! Fan-out router: delivers one envelope to the connections its scope names.
//!
//! Recipients are computed from the relay state the caller has locked, so
//! the set always matches the membership at the moment of the transition.
//! Closed or unknown transports are skipped without error.

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, RelayEvent, RelayState, RoomId};

#[derive(Clone)]
pub struct FanoutRouter {
    pusher: Arc<dyn MessagePusher>,
}

impl FanoutRouter {
    pub fn new(pusher: Arc<dyn MessagePusher>) -> Self {
        Self { pusher }
    }

    pub fn pusher(&self) -> &Arc<dyn MessagePusher> {
        &self.pusher
    }

    /// Deliver to one connection.
    pub async fn send_to(&self, id: &ConnectionId, event: &RelayEvent) {
        if let Err(e) = self.pusher.push_to(id, event).await {
            tracing::debug!("Dropped '{}' for '{}': {}", event.kind(), id, e);
        }
    }

    /// Deliver to every member of a room, optionally skipping one connection.
    pub async fn send_to_room(
        &self,
        state: &RelayState,
        room_id: &RoomId,
        event: &RelayEvent,
        exclude: Option<&ConnectionId>,
    ) {
        let targets: Vec<ConnectionId> = state
            .members_of(room_id)
            .into_iter()
            .filter(|id| Some(id) != exclude)
            .collect();
        self.deliver(&targets, event).await;
    }

    /// Deliver to every live connection.
    pub async fn broadcast_all(&self, state: &RelayState, event: &RelayEvent) {
        self.deliver(&state.connection_ids(), event).await;
    }

    /// Send the room's current presence list to all of its members.
    pub async fn publish_presence(&self, state: &RelayState, room_id: &RoomId) {
        let event = RelayEvent::UsersList {
            users: state.presence(room_id),
            room_id: room_id.clone(),
        };
        self.send_to_room(state, room_id, &event, None).await;
    }

    /// Re-announce rooms to every connection with their live member counts.
    ///
    /// Clients update the count of a room they already know when a
    /// `roomCreated` for it arrives again.
    pub async fn publish_room_counts(&self, state: &RelayState, room_ids: &[&RoomId]) {
        for room_id in room_ids {
            if let Some(room) = state.directory().get(room_id) {
                self.broadcast_all(state, &RelayEvent::RoomCreated(room.summary()))
                    .await;
            }
        }
    }

    async fn deliver(&self, targets: &[ConnectionId], event: &RelayEvent) {
        if let Err(e) = self.pusher.broadcast(targets, event).await {
            tracing::warn!("Failed to fan out '{}': {}", event.kind(), e);
        }
    }
}
