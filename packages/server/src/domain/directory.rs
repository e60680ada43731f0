//! Room directory: room id → metadata and member set.

use std::collections::HashMap;

use super::{
    entity::{Room, RoomSummary},
    error::RelayError,
    value_object::{ConnectionId, RoomId, RoomName, Timestamp},
};

/// Every room known to the relay, in creation order.
///
/// Rooms live until process end; there is no deletion.
#[derive(Debug, Default)]
pub struct RoomDirectory {
    rooms: HashMap<RoomId, Room>,
    order: Vec<RoomId>,
}

impl RoomDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the well-known default room if it is missing.
    ///
    /// Returns `true` when the room was created by this call.
    pub fn ensure_default_room(&mut self, created_at: Timestamp) -> bool {
        let id = RoomId::default_room();
        if self.rooms.contains_key(&id) {
            return false;
        }
        self.insert(Room::new(id, RoomName::default_room(), created_at));
        true
    }

    /// Create an empty room. Ids must be unique, names need not be.
    pub fn create_room(
        &mut self,
        name: RoomName,
        id: Option<RoomId>,
        created_at: Timestamp,
    ) -> Result<RoomSummary, RelayError> {
        let id = match id {
            Some(id) if self.rooms.contains_key(&id) => {
                return Err(RelayError::AlreadyExists(id.into_string()));
            }
            Some(id) => id,
            None => self.unused_id(),
        };
        let room = Room::new(id, name, created_at);
        let summary = room.summary();
        self.insert(room);
        Ok(summary)
    }

    pub fn add_member(&mut self, room_id: &RoomId, id: ConnectionId) -> Result<(), RelayError> {
        let room = self
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| RelayError::NotFound(room_id.to_string()))?;
        room.members.insert(id);
        Ok(())
    }

    /// Returns `true` if the connection was a member of the room.
    pub fn remove_member(&mut self, room_id: &RoomId, id: &ConnectionId) -> bool {
        self.rooms
            .get_mut(room_id)
            .is_some_and(|room| room.members.remove(id))
    }

    pub fn get(&self, room_id: &RoomId) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    pub fn contains(&self, room_id: &RoomId) -> bool {
        self.rooms.contains_key(room_id)
    }

    /// Members of a room; empty for unknown rooms.
    pub fn members_of(&self, room_id: &RoomId) -> Vec<ConnectionId> {
        self.rooms
            .get(room_id)
            .map(|room| room.members.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Live membership counts in creation order.
    pub fn snapshot(&self) -> Vec<RoomSummary> {
        self.rooms().map(Room::summary).collect()
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.order.iter().filter_map(|id| self.rooms.get(id))
    }

    fn insert(&mut self, room: Room) {
        self.order.push(room.id.clone());
        self.rooms.insert(room.id.clone(), room);
    }

    fn unused_id(&self) -> RoomId {
        let mut id = RoomId::generate();
        while self.rooms.contains_key(&id) {
            id = RoomId::generate();
        }
        id
    }
}
