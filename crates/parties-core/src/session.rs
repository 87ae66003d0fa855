//! Session-scoped shared directory
//!
//! A [`PartySession`] owns the one directory of an active server session. It is
//! built when the session starts and dropped when it ends; collaborators get a
//! [`SharedDirectory`] handle passed to them explicitly.
//!
//! Each handle method takes the lock once, so a transition (lookup, mutate,
//! reindex) is never observed half-done by another thread. Lookups return
//! owned snapshots rather than guards.

use crate::config::PartyConfig;
use crate::directory::PartyDirectory;
use crate::error::{InvariantViolation, PartyResult};
use crate::facts::PartyFact;
use crate::ids::{PartyId, PlayerId, SessionId};
use crate::matchmaking::MemberScope;
use crate::party::Party;
use crate::presence::PlayerPresence;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::info;

/// Cloneable, thread-safe handle to a session's directory.
#[derive(Debug, Clone, Default)]
pub struct SharedDirectory {
    inner: Arc<Mutex<PartyDirectory>>,
}

impl SharedDirectory {
    /// Wrap a directory.
    pub fn new(directory: PartyDirectory) -> Self {
        Self {
            inner: Arc::new(Mutex::new(directory)),
        }
    }

    /// Run `f` with exclusive access, for compound operations that must be
    /// atomic as a whole.
    pub fn with<R>(&self, f: impl FnOnce(&mut PartyDirectory) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// See [`PartyDirectory::invite_player`].
    pub fn invite_player(&self, owner: PlayerId, target: PlayerId) -> PartyResult {
        self.inner.lock().invite_player(owner, target)
    }

    /// See [`PartyDirectory::kick_player`].
    pub fn kick_player(&self, owner: PlayerId, target: PlayerId) -> PartyResult {
        self.inner.lock().kick_player(owner, target)
    }

    /// See [`PartyDirectory::accept_invite`].
    pub fn accept_invite(&self, player: PlayerId, party: Option<PartyId>) -> PartyResult {
        self.inner.lock().accept_invite(player, party)
    }

    /// See [`PartyDirectory::leave_party`].
    pub fn leave_party(&self, player: PlayerId) -> PartyResult {
        self.inner.lock().leave_party(player)
    }

    /// See [`PartyDirectory::remove_player`].
    pub fn remove_player(&self, player: PlayerId) -> PartyResult {
        self.inner.lock().remove_player(player)
    }

    /// See [`PartyDirectory::transfer_party`].
    pub fn transfer_party(&self, from: PlayerId, to: PlayerId) -> PartyResult {
        self.inner.lock().transfer_party(from, to)
    }

    /// See [`PartyDirectory::disband`].
    pub fn disband(&self, owner: PlayerId) -> PartyResult {
        self.inner.lock().disband(owner)
    }

    /// See [`PartyDirectory::add_player`].
    pub fn add_player(&self, player: PlayerId, party: Option<PartyId>) -> PartyResult {
        self.inner.lock().add_player(player, party)
    }

    /// See [`PartyDirectory::add_player_to_owner`].
    pub fn add_player_to_owner(&self, player: PlayerId, owner: PlayerId) -> PartyResult {
        self.inner.lock().add_player_to_owner(player, owner)
    }

    /// Snapshot of the party `player` is in.
    pub fn party_of(&self, player: &PlayerId) -> Option<Party> {
        self.inner.lock().party_of(player).cloned()
    }

    /// Snapshot of a party by id.
    pub fn party_by_id(&self, party_id: PartyId) -> Option<Party> {
        self.inner.lock().party_by_id(party_id).cloned()
    }

    /// Snapshot of the party `player` owns.
    pub fn own_party(&self, player: &PlayerId) -> Option<Party> {
        self.inner.lock().own_party(player).cloned()
    }

    /// Snapshots of all live parties, ordered by id.
    pub fn all_parties(&self) -> Vec<Party> {
        self.inner
            .lock()
            .all_parties()
            .into_iter()
            .cloned()
            .collect()
    }

    /// See [`PartyDirectory::take_facts`].
    pub fn take_facts(&self) -> Vec<PartyFact> {
        self.inner.lock().take_facts()
    }

    /// See [`PartyDirectory::check_invariants`].
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        self.inner.lock().check_invariants()
    }

    /// See [`PartyDirectory::party_members`].
    pub fn party_members(
        &self,
        player: PlayerId,
        scope: MemberScope,
        presence: &impl PlayerPresence,
    ) -> Vec<PlayerId> {
        self.inner.lock().party_members(player, scope, presence)
    }

    /// See [`PartyDirectory::collect_additional_players`].
    pub fn collect_additional_players(
        &self,
        player: PlayerId,
        presence: &impl PlayerPresence,
        in_activity: impl Fn(&PlayerId) -> bool,
    ) -> Vec<PlayerId> {
        self.inner
            .lock()
            .collect_additional_players(player, presence, in_activity)
    }

    /// See [`PartyDirectory::group_for_allocation`].
    pub fn group_for_allocation(
        &self,
        players: &[PlayerId],
        presence: &impl PlayerPresence,
    ) -> Vec<Vec<PlayerId>> {
        self.inner.lock().group_for_allocation(players, presence)
    }
}

/// The party state of one running server session.
#[derive(Debug)]
pub struct PartySession {
    id: SessionId,
    directory: SharedDirectory,
}

impl PartySession {
    /// Start a session with an empty directory.
    pub fn start(config: PartyConfig) -> Self {
        let id = SessionId::new();
        info!(session = %id, capacity = config.capacity, "party session started");
        Self {
            id,
            directory: SharedDirectory::new(PartyDirectory::new(config)),
        }
    }

    /// Session identifier
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Handle to this session's directory.
    pub fn directory(&self) -> SharedDirectory {
        self.directory.clone()
    }

    /// End the session and discard its parties.
    ///
    /// Returns how many parties were still alive. Handles cloned from this
    /// session keep working on the old state but are no longer this session's.
    pub fn end(self) -> usize {
        let dropped = self.directory.with(|dir| dir.party_count());
        info!(session = %self.id, parties = dropped, "party session ended");
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_sessions_are_independent() {
        let first = PartySession::start(PartyConfig::default());
        let second = PartySession::start(PartyConfig::default());
        assert_ne!(first.id(), second.id());

        let a = PlayerId::from_name("a");
        let b = PlayerId::from_name("b");
        first.directory().invite_player(a, b).unwrap();

        assert!(first.directory().own_party(&a).is_some());
        assert!(second.directory().own_party(&a).is_none());

        assert_eq!(first.end(), 1);
        assert_eq!(second.end(), 0);
    }

    #[test]
    fn test_concurrent_transitions_keep_invariants() {
        let session = PartySession::start(PartyConfig::default());
        let owner = PlayerId::from_name("owner");

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let directory = session.directory();
                thread::spawn(move || {
                    let guest = PlayerId::from_name(&format!("guest-{i}"));
                    if let Ok(party) = directory.invite_player(owner, guest) {
                        let _ = directory.accept_invite(guest, Some(party.id()));
                    }
                    directory.check_invariants()
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap().is_ok());
        }

        let directory = session.directory();
        let party = directory.own_party(&owner).unwrap();
        assert_eq!(party.member_count(), party.capacity());
        assert!(directory.check_invariants().is_ok());
    }
}
