//! Connection lifecycle hooks
//!
//! `PartyHooks` bundles a directory handle with the host's presence and
//! notification seams and implements what happens to parties when players
//! connect and disconnect.

use crate::error::PartyResult;
use crate::ids::PlayerId;
use crate::presence::{PartyNotice, PartyNotifier, PlayerPresence};
use crate::session::SharedDirectory;
use tracing::debug;

/// Party reactions to players connecting and disconnecting.
///
/// Facts produced by a disconnect are delivered as [`PartyNotice`]s and are
/// not left in the directory's outbox. Facts from other transitions are still
/// drained with [`SharedDirectory::take_facts`].
pub struct PartyHooks<P, N> {
    directory: SharedDirectory,
    presence: P,
    notifier: N,
}

impl<P, N> PartyHooks<P, N>
where
    P: PlayerPresence,
    N: PartyNotifier,
{
    /// Create hooks over a session's directory.
    pub fn new(directory: SharedDirectory, presence: P, notifier: N) -> Self {
        Self {
            directory,
            presence,
            notifier,
        }
    }

    /// Directory these hooks act on.
    pub fn directory(&self) -> &SharedDirectory {
        &self.directory
    }

    /// Remind a (re)connecting player of every invite still waiting for them.
    ///
    /// Reminders are only sent for parties whose owner is online. Returns the
    /// number of reminders sent.
    pub fn on_player_join(&self, player: PlayerId) -> usize {
        let open: Vec<_> = self.directory.with(|dir| {
            dir.parties_inviting(&player)
                .into_iter()
                .map(|party| (party.id(), party.owner()))
                .collect()
        });

        let mut sent = 0;
        for (party_id, owner) in open {
            if self.presence.is_online(&owner) {
                self.notifier
                    .notify(player, PartyNotice::InviteStillOpen { party_id, owner });
                sent += 1;
            }
        }
        debug!(player = %player, reminders = sent, "player joined");
        sent
    }

    /// Take a departing player out of their party.
    ///
    /// Online members left behind hear about the departure, and if the player
    /// owned the party the successor is told they now own it. Returns `None`
    /// if the player was not in a party.
    pub fn on_player_disconnect(&self, player: PlayerId) -> Option<PartyResult> {
        let (peers, was_owner, result) = self.directory.with(|dir| {
            let party = dir.party_of(&player)?;
            let peers = party.peers(&player);
            let was_owner = party.is_owner(&player);
            let mark = dir.pending_facts();
            let result = dir.disconnect_player(player);
            dir.discard_facts_after(mark);
            Some((peers, was_owner, result))
        })?;

        if let Ok(party) = &result {
            let party_id = party.id();
            for peer in peers.iter().filter(|p| self.presence.is_online(p)) {
                self.notifier
                    .notify(*peer, PartyNotice::MemberLeftGame { party_id, player });
            }

            let new_owner = party.owner();
            if was_owner && party.contains(&new_owner) && self.presence.is_online(&new_owner) {
                self.notifier.notify(
                    new_owner,
                    PartyNotice::OwnershipTransferred {
                        party_id,
                        previous_owner: player,
                    },
                );
            }
        }

        debug!(player = %player, "player disconnected");
        Some(result)
    }
}
