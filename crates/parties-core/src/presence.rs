//! Presence and notification seams
//!
//! The directory tracks identities, not connections. Hosts tell the core who
//! is online through [`PlayerPresence`] and receive structured notices through
//! [`PartyNotifier`]; turning a notice into a chat message is up to them.

use crate::ids::{PartyId, PlayerId};
use std::collections::{BTreeSet, HashSet};

/// Trait for checking if players are currently connected.
pub trait PlayerPresence: Send + Sync {
    /// Check if a player is online.
    fn is_online(&self, player: &PlayerId) -> bool;
}

/// Blanket implementation for closures.
impl<F> PlayerPresence for F
where
    F: Fn(&PlayerId) -> bool + Send + Sync,
{
    fn is_online(&self, player: &PlayerId) -> bool {
        (self)(player)
    }
}

impl PlayerPresence for HashSet<PlayerId> {
    fn is_online(&self, player: &PlayerId) -> bool {
        self.contains(player)
    }
}

impl PlayerPresence for BTreeSet<PlayerId> {
    fn is_online(&self, player: &PlayerId) -> bool {
        self.contains(player)
    }
}

/// Something a player should be told about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartyNotice {
    /// An invite the player holds is still open; sent when they reconnect.
    InviteStillOpen {
        /// Inviting party
        party_id: PartyId,
        /// Owner who can be named in the reminder
        owner: PlayerId,
    },
    /// A fellow member dropped off the server and left the party.
    MemberLeftGame {
        /// Party that was left
        party_id: PartyId,
        /// Departed member
        player: PlayerId,
    },
    /// The recipient now owns the party.
    OwnershipTransferred {
        /// Affected party
        party_id: PartyId,
        /// Owner before the change
        previous_owner: PlayerId,
    },
}

/// Delivers notices to players.
pub trait PartyNotifier: Send + Sync {
    /// Deliver `notice` to `recipient`.
    fn notify(&self, recipient: PlayerId, notice: PartyNotice);
}

/// Blanket implementation for closures.
impl<F> PartyNotifier for F
where
    F: Fn(PlayerId, PartyNotice) + Send + Sync,
{
    fn notify(&self, recipient: PlayerId, notice: PartyNotice) {
        (self)(recipient, notice);
    }
}
