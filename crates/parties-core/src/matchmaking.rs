//! Matchmaking queries
//!
//! Read-only views of the directory used by activity allocators to keep
//! party members together. Nothing here changes directory state.

use crate::directory::PartyDirectory;
use crate::ids::PlayerId;
use crate::presence::PlayerPresence;
use std::collections::HashSet;

/// Which party a grouping query should follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberScope {
    /// Only the party the player owns
    Own,
    /// Whatever party the player is in
    Any,
}

impl PartyDirectory {
    /// Online members of the player's party, or just the player if the scope
    /// finds no party.
    pub fn party_members(
        &self,
        player: PlayerId,
        scope: MemberScope,
        presence: &impl PlayerPresence,
    ) -> Vec<PlayerId> {
        let party = match scope {
            MemberScope::Own => self.own_party(&player),
            MemberScope::Any => self.party_of(&player),
        };

        match party {
            Some(party) => party
                .members()
                .iter()
                .filter(|member| presence.is_online(member))
                .copied()
                .collect(),
            None => vec![player],
        }
    }

    /// Members of the party `player` owns that should follow them into an
    /// activity, skipping anyone `in_activity` reports as already there.
    pub fn collect_additional_players(
        &self,
        player: PlayerId,
        presence: &impl PlayerPresence,
        in_activity: impl Fn(&PlayerId) -> bool,
    ) -> Vec<PlayerId> {
        self.party_members(player, MemberScope::Own, presence)
            .into_iter()
            .filter(|member| !in_activity(member))
            .collect()
    }

    /// Split `players` into allocation groups, one per party.
    ///
    /// Players are visited in order; the first ungrouped player of a party
    /// pulls in every online member and those members are not visited again.
    /// Unaffiliated players form singleton groups.
    pub fn group_for_allocation(
        &self,
        players: &[PlayerId],
        presence: &impl PlayerPresence,
    ) -> Vec<Vec<PlayerId>> {
        let mut ungrouped: HashSet<PlayerId> = players.iter().copied().collect();
        let mut groups = Vec::new();

        for player in players {
            if !ungrouped.contains(player) {
                continue;
            }

            let members = self.party_members(*player, MemberScope::Any, presence);
            ungrouped.remove(player);
            for member in &members {
                ungrouped.remove(member);
            }
            groups.push(members);
        }

        groups
    }
}
