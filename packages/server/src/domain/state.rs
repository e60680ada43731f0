//! Relay state: the registry and the directory kept in step.
//!
//! This is the only shared mutable state of the relay. It is owned by a
//! single mutex in the use case layer; every transition below keeps the
//! invariant that a connection is a member of exactly the room its session
//! points at.

use super::{
    directory::RoomDirectory,
    entity::{Participant, RoomSummary, Session},
    error::RelayError,
    registry::ConnectionRegistry,
    value_object::{ConnectionId, DisplayName, RoomId, RoomName, Timestamp},
};

/// Outcome of moving a connection between rooms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomTransfer {
    /// Session after the move.
    pub session: Session,
    pub from: RoomId,
    pub to: RoomId,
    pub room_name: RoomName,
}

#[derive(Debug)]
pub struct RelayState {
    registry: ConnectionRegistry,
    directory: RoomDirectory,
}

impl RelayState {
    /// Build an empty relay with the default room in place.
    pub fn new(created_at: Timestamp) -> Self {
        let mut directory = RoomDirectory::new();
        directory.ensure_default_room(created_at);
        Self {
            registry: ConnectionRegistry::new(),
            directory,
        }
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    pub fn directory(&self) -> &RoomDirectory {
        &self.directory
    }

    pub fn session(&self, id: &ConnectionId) -> Result<&Session, RelayError> {
        self.registry
            .get(id)
            .ok_or_else(|| RelayError::InvalidState(id.to_string()))
    }

    /// Register a new connection and place it in the default room.
    pub fn connect(&mut self) -> Session {
        let session = self.registry.register(RoomId::default_room());
        let joined = self
            .directory
            .add_member(&session.room_id, session.id.clone());
        debug_assert!(joined.is_ok(), "default room always exists");
        debug_assert!(self.is_consistent());
        session
    }

    /// Move a connection to `target`.
    ///
    /// Returns `Ok(None)` when the connection is already there.
    pub fn transfer(
        &mut self,
        id: &ConnectionId,
        target: &RoomId,
    ) -> Result<Option<RoomTransfer>, RelayError> {
        let room_name = self
            .directory
            .get(target)
            .map(|room| room.name.clone())
            .ok_or_else(|| RelayError::NotFound(target.to_string()))?;
        let from = self.session(id)?.room_id.clone();
        if &from == target {
            return Ok(None);
        }

        self.directory.remove_member(&from, id);
        self.directory.add_member(target, id.clone())?;
        self.registry.set_room(id, target.clone())?;
        debug_assert!(self.is_consistent());

        Ok(Some(RoomTransfer {
            session: self.session(id)?.clone(),
            from,
            to: target.clone(),
            room_name,
        }))
    }

    /// Rename a session. Returns the previous name and the updated session.
    pub fn rename(
        &mut self,
        id: &ConnectionId,
        name: DisplayName,
    ) -> Result<(DisplayName, Session), RelayError> {
        let previous = self.registry.rename(id, name)?;
        Ok((previous, self.session(id)?.clone()))
    }

    pub fn create_room(
        &mut self,
        name: RoomName,
        id: Option<RoomId>,
        created_at: Timestamp,
    ) -> Result<RoomSummary, RelayError> {
        self.directory.create_room(name, id, created_at)
    }

    /// Drop a connection from its room and from the registry.
    ///
    /// Unknown ids are a no-op and return `None`.
    pub fn disconnect(&mut self, id: &ConnectionId) -> Option<Session> {
        let session = self.registry.unregister(id)?;
        self.directory.remove_member(&session.room_id, id);
        debug_assert!(self.is_consistent());
        Some(session)
    }

    /// Presence list of a room, ordered by connection id.
    pub fn presence(&self, room_id: &RoomId) -> Vec<Participant> {
        self.directory
            .members_of(room_id)
            .iter()
            .filter_map(|id| self.registry.get(id))
            .map(Participant::from)
            .collect()
    }

    pub fn members_of(&self, room_id: &RoomId) -> Vec<ConnectionId> {
        self.directory.members_of(room_id)
    }

    pub fn connection_ids(&self) -> Vec<ConnectionId> {
        self.registry.ids().cloned().collect()
    }

    pub fn snapshot(&self) -> Vec<RoomSummary> {
        self.directory.snapshot()
    }

    /// Every session sits in exactly the room it points at, and every
    /// member of every room has a session.
    pub fn is_consistent(&self) -> bool {
        let sessions_placed = self.registry.sessions().all(|session| {
            self.directory
                .rooms()
                .filter(|room| room.members.contains(&session.id))
                .map(|room| &room.id)
                .eq(std::iter::once(&session.room_id))
        });
        let members_known = self
            .directory
            .rooms()
            .flat_map(|room| room.members.iter())
            .all(|id| self.registry.get(id).is_some());
        sessions_placed && members_known && self.directory.contains(&RoomId::default_room())
    }
}
