//! Party entity
//!
//! One group's membership and invite state. A `Party` enforces only its own
//! invariants; keeping a player in at most one party is the directory's job.

use crate::ids::{PartyId, PlayerId};
use indexmap::IndexSet;
use serde::Serialize;

/// Default maximum number of members in a party.
pub const PARTY_CAPACITY: usize = 4;

/// A capacity-bounded group with one owner and a set of pending invitees.
///
/// Invariants held by every method:
/// - the owner is a member
/// - members are unique and keep join order
/// - no player is both a member and pending
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Party {
    id: PartyId,
    owner: PlayerId,
    members: IndexSet<PlayerId>,
    pending: IndexSet<PlayerId>,
    capacity: usize,
}

impl Party {
    /// Create a party with `owner` as its sole member.
    pub fn new(owner: PlayerId, capacity: usize) -> Self {
        let mut members = IndexSet::with_capacity(capacity);
        members.insert(owner);

        Self {
            id: PartyId::new(),
            owner,
            members,
            pending: IndexSet::new(),
            capacity,
        }
    }

    /// Unique identifier for this party
    pub fn id(&self) -> PartyId {
        self.id
    }

    /// Current owner
    pub fn owner(&self) -> PlayerId {
        self.owner
    }

    /// Members in join order
    pub fn members(&self) -> &IndexSet<PlayerId> {
        &self.members
    }

    /// Players invited but not yet joined
    pub fn pending(&self) -> &IndexSet<PlayerId> {
        &self.pending
    }

    /// Maximum number of members
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get the number of current members.
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Get available member slots.
    pub fn available_slots(&self) -> usize {
        self.capacity.saturating_sub(self.members.len())
    }

    /// Make `player` the owner. Fails unless they are already a member.
    pub fn set_owner(&mut self, player: PlayerId) -> bool {
        if self.contains(&player) {
            self.owner = player;
            true
        } else {
            false
        }
    }

    /// Check if the party has no free slot.
    pub fn is_full(&self) -> bool {
        self.members.len() >= self.capacity
    }

    /// Record a pending invite.
    ///
    /// Returns false if `player` is already a member or already pending.
    pub fn invite(&mut self, player: PlayerId) -> bool {
        if self.contains(&player) {
            return false;
        }
        self.pending.insert(player)
    }

    /// Promote a pending invitee to member.
    pub fn accept_invite(&mut self, player: PlayerId) -> bool {
        if self.is_invited(&player) {
            self.add(player);
            true
        } else {
            false
        }
    }

    /// Add a member unconditionally, dropping any pending invite.
    ///
    /// Capacity and cross-party checks are the caller's responsibility.
    pub fn add(&mut self, player: PlayerId) {
        self.pending.shift_remove(&player);
        self.members.insert(player);
    }

    /// Remove a member, or failing that a pending invite.
    ///
    /// Member removal keeps the join order of the remaining members.
    pub fn remove(&mut self, player: &PlayerId) -> bool {
        if self.members.shift_remove(player) {
            return true;
        }
        self.pending.shift_remove(player)
    }

    /// Check if a player is a member.
    pub fn contains(&self, player: &PlayerId) -> bool {
        self.members.contains(player)
    }

    /// Check if a player holds a pending invite.
    pub fn is_invited(&self, player: &PlayerId) -> bool {
        self.pending.contains(player)
    }

    /// Check if a player is the owner.
    pub fn is_owner(&self, player: &PlayerId) -> bool {
        self.owner == *player
    }

    /// Members other than `player`.
    pub fn peers(&self, player: &PlayerId) -> Vec<PlayerId> {
        self.members
            .iter()
            .filter(|m| *m != player)
            .copied()
            .collect()
    }

    /// Hand ownership to the earliest remaining member.
    ///
    /// Returns the new owner, or `None` if the party is empty.
    pub(crate) fn succeed_owner(&mut self) -> Option<PlayerId> {
        let next = self.members.first().copied()?;
        self.owner = next;
        Some(next)
    }
}
