//! Connection registry: live connection → session.

use std::collections::HashMap;

use super::{
    entity::Session,
    error::RelayError,
    value_object::{Color, ConnectionId, DisplayName, RoomId},
};

/// Owns every live session. Mutated only through the serialized relay state.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    sessions: HashMap<ConnectionId, Session>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a session with a fresh id, a guest name and a random color.
    pub fn register(&mut self, room_id: RoomId) -> Session {
        let mut id = ConnectionId::generate();
        while self.sessions.contains_key(&id) {
            id = ConnectionId::generate();
        }
        let session = Session {
            name: DisplayName::guest_for(&id),
            color: Color::random(),
            id: id.clone(),
            room_id,
        };
        self.sessions.insert(id, session.clone());
        session
    }

    /// Replace the display name. Returns the previous name.
    pub fn rename(
        &mut self,
        id: &ConnectionId,
        name: DisplayName,
    ) -> Result<DisplayName, RelayError> {
        let session = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| RelayError::InvalidState(id.to_string()))?;
        Ok(std::mem::replace(&mut session.name, name))
    }

    /// Point the session at another room. Membership sets are the caller's job.
    pub fn set_room(&mut self, id: &ConnectionId, room_id: RoomId) -> Result<(), RelayError> {
        let session = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| RelayError::InvalidState(id.to_string()))?;
        session.room_id = room_id;
        Ok(())
    }

    /// Remove the session. Unknown ids are a no-op.
    pub fn unregister(&mut self, id: &ConnectionId) -> Option<Session> {
        self.sessions.remove(id)
    }

    pub fn get(&self, id: &ConnectionId) -> Option<&Session> {
        self.sessions.get(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &ConnectionId> {
        self.sessions.keys()
    }

    pub fn sessions(&self) -> impl Iterator<Item = &Session> {
        self.sessions.values()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
