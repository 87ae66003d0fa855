//! Party directory
//!
//! The authoritative index from player to party, and the only place parties
//! are created, destroyed, or have players moved between them.
//!
//! Parties live in an arena keyed by [`PartyId`]; the index maps each member
//! to the id of their party. A party leaves the arena in the same call that
//! removes its last member, so a party is tracked exactly as long as it is
//! reachable through a member.
//!
//! Every public transition checks all of its preconditions before touching
//! any state, so a refused operation never leaves a partial change behind.

use crate::config::PartyConfig;
use crate::error::{InvariantViolation, PartyError, PartyResult};
use crate::facts::{LeaveReason, PartyFact, TransferReason};
use crate::ids::{PartyId, PlayerId};
use crate::party::Party;
use std::collections::HashMap;
use tracing::{debug, info};

/// Index of all live parties for one server session.
#[derive(Debug, Default)]
pub struct PartyDirectory {
    config: PartyConfig,
    parties: HashMap<PartyId, Party>,
    index: HashMap<PlayerId, PartyId>,
    facts: Vec<PartyFact>,
}

impl PartyDirectory {
    /// Create an empty directory.
    pub fn new(config: PartyConfig) -> Self {
        Self {
            config,
            parties: HashMap::new(),
            index: HashMap::new(),
            facts: Vec::new(),
        }
    }

    /// Configuration this directory was built with.
    pub fn config(&self) -> &PartyConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------

    /// The party `player` is a member of.
    pub fn party_of(&self, player: &PlayerId) -> Option<&Party> {
        self.index.get(player).and_then(|id| self.parties.get(id))
    }

    /// A live party by id.
    pub fn party_by_id(&self, party_id: PartyId) -> Option<&Party> {
        self.parties.get(&party_id)
    }

    /// The party `player` owns. Plain membership is not enough.
    pub fn own_party(&self, player: &PlayerId) -> Option<&Party> {
        self.party_of(player).filter(|party| party.is_owner(player))
    }

    /// All live parties, ordered by id.
    pub fn all_parties(&self) -> Vec<&Party> {
        let mut parties: Vec<&Party> = self.parties.values().collect();
        parties.sort_by_key(|party| party.id());
        parties
    }

    /// Parties holding a pending invite for `player`, ordered by id.
    pub fn parties_inviting(&self, player: &PlayerId) -> Vec<&Party> {
        let mut parties: Vec<&Party> = self
            .parties
            .values()
            .filter(|party| party.is_invited(player))
            .collect();
        parties.sort_by_key(|party| party.id());
        parties
    }

    /// Number of live parties.
    pub fn party_count(&self) -> usize {
        self.parties.len()
    }

    /// Number of players currently in some party.
    pub fn tracked_players(&self) -> usize {
        self.index.len()
    }

    /// Drain the facts recorded since the last call.
    pub fn take_facts(&mut self) -> Vec<PartyFact> {
        std::mem::take(&mut self.facts)
    }

    /// Number of facts waiting to be drained.
    pub(crate) fn pending_facts(&self) -> usize {
        self.facts.len()
    }

    /// Drop facts recorded after the first `keep`.
    pub(crate) fn discard_facts_after(&mut self, keep: usize) {
        self.facts.truncate(keep);
    }

    fn own_party_id(&self, player: &PlayerId) -> Option<PartyId> {
        self.own_party(player).map(Party::id)
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    /// Invite `target` to the party `owner` owns, creating it if `owner` has
    /// no party yet.
    ///
    /// A newly created party is only kept if the invite succeeds.
    pub fn invite_player(&mut self, owner: PlayerId, target: PlayerId) -> PartyResult {
        let Some(party_id) = self.index.get(&owner).copied() else {
            let mut party = Party::new(owner, self.config.capacity);
            validate_invite(&party, &target)?;
            party.invite(target);

            let party_id = party.id();
            info!(party = %party_id, owner = %owner, "created party");
            self.facts.push(PartyFact::PartyCreated { party_id, owner });
            self.facts.push(PartyFact::MemberInvited {
                party_id,
                owner,
                invitee: target,
            });
            self.index.insert(owner, party_id);
            self.parties.insert(party_id, party.clone());
            debug!(party = %party_id, player = %target, "invited player");
            return Ok(party);
        };

        let party = self
            .parties
            .get_mut(&party_id)
            .ok_or(PartyError::DoesNotExist)?;
        if !party.is_owner(&owner) {
            return Err(PartyError::DoesNotExist);
        }
        validate_invite(party, &target)?;
        party.invite(target);

        self.facts.push(PartyFact::MemberInvited {
            party_id,
            owner,
            invitee: target,
        });
        debug!(party = %party_id, player = %target, "invited player");
        Ok(party.clone())
    }

    /// Remove `target` from the party `owner` owns.
    pub fn kick_player(&mut self, owner: PlayerId, target: PlayerId) -> PartyResult {
        if owner == target {
            return Err(PartyError::CannotRemoveSelf);
        }

        let party_id = self.own_party_id(&owner).ok_or(PartyError::DoesNotExist)?;
        let member = self
            .parties
            .get(&party_id)
            .is_some_and(|party| party.contains(&target));
        if !member {
            return Err(PartyError::NotInParty);
        }

        self.detach(target, party_id, LeaveReason::Kicked)
    }

    /// Join `party` using a pending invite.
    ///
    /// `None` stands for a party the caller could not resolve and is refused
    /// the same way as a party that never invited the player.
    pub fn accept_invite(&mut self, player: PlayerId, party: Option<PartyId>) -> PartyResult {
        if self.index.contains_key(&player) {
            return Err(PartyError::AlreadyInAParty);
        }

        let party_id = party.ok_or(PartyError::NotInvited)?;
        let party = self
            .parties
            .get_mut(&party_id)
            .ok_or(PartyError::NotInvited)?;
        if party.is_full() {
            return Err(PartyError::PartyFull);
        }
        if !party.accept_invite(player) {
            return Err(PartyError::NotInvited);
        }

        self.index.insert(player, party_id);
        self.facts
            .push(PartyFact::MemberJoined { party_id, player });
        debug!(party = %party_id, player = %player, "accepted invite");
        Ok(party.clone())
    }

    /// Leave the current party.
    pub fn leave_party(&mut self, player: PlayerId) -> PartyResult {
        self.detach_current(player, LeaveReason::Left)
    }

    /// Remove `player` from whatever party they are in (administrative).
    pub fn remove_player(&mut self, player: PlayerId) -> PartyResult {
        self.detach_current(player, LeaveReason::Removed)
    }

    /// Remove a player who dropped off the server.
    pub fn disconnect_player(&mut self, player: PlayerId) -> PartyResult {
        self.detach_current(player, LeaveReason::Disconnected)
    }

    /// Hand ownership of the party `from` owns to `to`, who must already be a
    /// member.
    pub fn transfer_party(&mut self, from: PlayerId, to: PlayerId) -> PartyResult {
        let party_id = self.own_party_id(&from).ok_or(PartyError::DoesNotExist)?;
        let party = self
            .parties
            .get_mut(&party_id)
            .ok_or(PartyError::DoesNotExist)?;
        if !party.set_owner(to) {
            return Err(PartyError::NotInParty);
        }

        if from != to {
            self.facts.push(PartyFact::OwnershipTransferred {
                party_id,
                previous: from,
                new_owner: to,
                reason: TransferReason::Transfer,
            });
            debug!(party = %party_id, from = %from, to = %to, "transferred ownership");
        }
        Ok(party.clone())
    }

    /// Dissolve the party `owner` owns. Every member becomes unaffiliated.
    ///
    /// Returns the party as it was at the moment it was disbanded.
    pub fn disband(&mut self, owner: PlayerId) -> PartyResult {
        let party_id = self.own_party_id(&owner).ok_or(PartyError::DoesNotExist)?;
        let party = self
            .parties
            .remove(&party_id)
            .ok_or(PartyError::DoesNotExist)?;

        for member in party.members() {
            if self.index.get(member) == Some(&party_id) {
                self.index.remove(member);
            }
        }

        self.facts.push(PartyFact::PartyDisbanded {
            party_id,
            members: party.members().iter().copied().collect(),
        });
        info!(party = %party_id, owner = %owner, members = party.member_count(), "disbanded party");
        Ok(party)
    }

    /// Put `player` into `party`, pulling them out of any other party first.
    ///
    /// This bypasses invites and is meant for administrators.
    pub fn add_player(&mut self, player: PlayerId, party: Option<PartyId>) -> PartyResult {
        let party_id = party.ok_or(PartyError::DoesNotExist)?;
        let target = self
            .parties
            .get(&party_id)
            .ok_or(PartyError::DoesNotExist)?;

        let previous = self.index.get(&player).copied();
        if previous == Some(party_id) {
            return Err(PartyError::AlreadyJoined);
        }
        if target.is_full() {
            return Err(PartyError::PartyFull);
        }

        if let Some(previous) = previous {
            self.detach(player, previous, LeaveReason::Moved)?;
        }

        let party = self
            .parties
            .get_mut(&party_id)
            .ok_or(PartyError::DoesNotExist)?;
        party.add(player);
        self.index.insert(player, party_id);
        self.facts
            .push(PartyFact::MemberJoined { party_id, player });
        debug!(party = %party_id, player = %player, "added player");
        Ok(party.clone())
    }

    /// Put `player` into the party `owner` is in, creating a party owned by
    /// `owner` if they are in none.
    ///
    /// The new party is only created once every check has passed.
    pub fn add_player_to_owner(&mut self, player: PlayerId, owner: PlayerId) -> PartyResult {
        if let Some(party_id) = self.index.get(&owner).copied() {
            return self.add_player(player, Some(party_id));
        }

        if player == owner {
            return Err(PartyError::AlreadyJoined);
        }
        let party = Party::new(owner, self.config.capacity);
        if party.is_full() {
            return Err(PartyError::PartyFull);
        }

        if let Some(previous) = self.index.get(&player).copied() {
            self.detach(player, previous, LeaveReason::Moved)?;
        }

        let party_id = party.id();
        info!(party = %party_id, owner = %owner, "created party");
        self.facts.push(PartyFact::PartyCreated { party_id, owner });
        self.index.insert(owner, party_id);
        self.parties.insert(party_id, party);
        self.add_player(player, Some(party_id))
    }

    fn detach_current(&mut self, player: PlayerId, reason: LeaveReason) -> PartyResult {
        let party_id = self
            .index
            .get(&player)
            .copied()
            .ok_or(PartyError::NotInParty)?;
        self.detach(player, party_id, reason)
    }

    /// Remove a member from `party_id`, running ownership succession if they
    /// owned it and dropping the party if they were the last member.
    ///
    /// A dropped party is returned with no members.
    fn detach(&mut self, player: PlayerId, party_id: PartyId, reason: LeaveReason) -> PartyResult {
        let party = self
            .parties
            .get_mut(&party_id)
            .ok_or(PartyError::NotInParty)?;
        if !party.contains(&player) {
            return Err(PartyError::NotInParty);
        }

        let was_owner = party.is_owner(&player);
        party.remove(&player);
        if self.index.get(&player) == Some(&party_id) {
            self.index.remove(&player);
        }
        self.facts.push(PartyFact::MemberLeft {
            party_id,
            player,
            reason,
        });
        debug!(party = %party_id, player = %player, reason = ?reason, "member left");

        if was_owner {
            if let Some(new_owner) = party.succeed_owner() {
                self.facts.push(PartyFact::OwnershipTransferred {
                    party_id,
                    previous: player,
                    new_owner,
                    reason: TransferReason::Succession,
                });
                debug!(party = %party_id, new_owner = %new_owner, "ownership passed to next member");
            }
        }

        if party.member_count() > 0 {
            return Ok(party.clone());
        }

        let party = self
            .parties
            .remove(&party_id)
            .ok_or(PartyError::NotInParty)?;
        self.facts.push(PartyFact::PartyDissolved { party_id });
        info!(party = %party_id, "last member left, party dissolved");
        Ok(party)
    }

    // ------------------------------------------------------------------
    // Audit
    // ------------------------------------------------------------------

    /// Verify every cross-party invariant.
    ///
    /// Checks that each player is in at most one party, that the index and
    /// the member lists agree in both directions, and that every party keeps
    /// its owner, capacity and pending-set rules.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let mut seen: HashMap<PlayerId, PartyId> = HashMap::new();

        for (&party_id, party) in &self.parties {
            if party.members().is_empty() {
                return Err(InvariantViolation::EmptyParty { party: party_id });
            }
            if !party.contains(&party.owner()) {
                return Err(InvariantViolation::OwnerNotMember { party: party_id });
            }
            if party.member_count() > party.capacity() {
                return Err(InvariantViolation::OverCapacity {
                    party: party_id,
                    members: party.member_count(),
                    capacity: party.capacity(),
                });
            }
            if let Some(&player) = party.pending().iter().find(|p| party.contains(p)) {
                return Err(InvariantViolation::PendingMember {
                    party: party_id,
                    player,
                });
            }

            for &member in party.members() {
                if let Some(first) = seen.insert(member, party_id) {
                    return Err(InvariantViolation::MultipleParties {
                        player: member,
                        first,
                        second: party_id,
                    });
                }
                if self.index.get(&member) != Some(&party_id) {
                    return Err(InvariantViolation::UnindexedMember {
                        player: member,
                        party: party_id,
                    });
                }
            }
        }

        for (&player, &party_id) in &self.index {
            let member = self
                .parties
                .get(&party_id)
                .is_some_and(|party| party.contains(&player));
            if !member {
                return Err(InvariantViolation::StaleIndex {
                    player,
                    party: party_id,
                });
            }
        }

        Ok(())
    }
}

fn validate_invite(party: &Party, target: &PlayerId) -> Result<(), PartyError> {
    if party.is_full() {
        return Err(PartyError::PartyFull);
    }
    if party.contains(target) {
        return Err(PartyError::AlreadyJoined);
    }
    if party.is_invited(target) {
        return Err(PartyError::AlreadyInvited);
    }
    Ok(())
}
