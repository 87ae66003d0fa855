//! Party facts
//!
//! Every successful directory transition records what it changed as a list of
//! `PartyFact`s. Collaborators drain them with
//! [`PartyDirectory::take_facts`](crate::PartyDirectory::take_facts) to announce
//! changes to players; the facts themselves carry no text.
//!
//! # Example
//!
//! ```ignore
//! directory.leave_party(alice)?;
//! for fact in directory.take_facts() {
//!     if let PartyFact::OwnershipTransferred { new_owner, .. } = fact {
//!         notify(new_owner, "you now own the party");
//!     }
//! }
//! ```

use crate::ids::{PartyId, PlayerId};
use serde::{Deserialize, Serialize};

/// How a member came to leave a party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeaveReason {
    /// Left on their own
    Left,
    /// Kicked by the owner
    Kicked,
    /// Removed by an administrator
    Removed,
    /// Disconnected from the server
    Disconnected,
    /// Moved into another party by an administrator
    Moved,
}

/// Why ownership changed hands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransferReason {
    /// The owner handed the party over explicitly
    Transfer,
    /// The owner left and the earliest remaining member took over
    Succession,
}

/// One change made by a directory transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartyFact {
    /// Party created with its owner as sole member
    PartyCreated {
        /// New party
        party_id: PartyId,
        /// Creator and owner
        owner: PlayerId,
    },
    /// Invite recorded
    MemberInvited {
        /// Inviting party
        party_id: PartyId,
        /// Owner who sent the invite
        owner: PlayerId,
        /// Invited player
        invitee: PlayerId,
    },
    /// Player became a member
    MemberJoined {
        /// Joined party
        party_id: PartyId,
        /// New member
        player: PlayerId,
    },
    /// Player stopped being a member
    MemberLeft {
        /// Party that was left
        party_id: PartyId,
        /// Departed player
        player: PlayerId,
        /// How they left
        reason: LeaveReason,
    },
    /// Owner changed
    OwnershipTransferred {
        /// Affected party
        party_id: PartyId,
        /// Owner before the change
        previous: PlayerId,
        /// Owner after the change
        new_owner: PlayerId,
        /// Why it changed
        reason: TransferReason,
    },
    /// Owner disbanded the party; all listed members are now unaffiliated
    PartyDisbanded {
        /// Disbanded party
        party_id: PartyId,
        /// Members at the time of disbanding
        members: Vec<PlayerId>,
    },
    /// Last member left; the party no longer exists
    PartyDissolved {
        /// Dissolved party
        party_id: PartyId,
    },
}

impl PartyFact {
    /// Party this fact is about.
    pub fn party_id(&self) -> PartyId {
        match self {
            PartyFact::PartyCreated { party_id, .. }
            | PartyFact::MemberInvited { party_id, .. }
            | PartyFact::MemberJoined { party_id, .. }
            | PartyFact::MemberLeft { party_id, .. }
            | PartyFact::OwnershipTransferred { party_id, .. }
            | PartyFact::PartyDisbanded { party_id, .. }
            | PartyFact::PartyDissolved { party_id } => *party_id,
        }
    }

    /// Stable name of the fact kind, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            PartyFact::PartyCreated { .. } => "party-created",
            PartyFact::MemberInvited { .. } => "member-invited",
            PartyFact::MemberJoined { .. } => "member-joined",
            PartyFact::MemberLeft { .. } => "member-left",
            PartyFact::OwnershipTransferred { .. } => "ownership-transferred",
            PartyFact::PartyDisbanded { .. } => "party-disbanded",
            PartyFact::PartyDissolved { .. } => "party-dissolved",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_party_id_and_kind() {
        let party_id = PartyId::new();
        let player = PlayerId::from_name("alice");

        let fact = PartyFact::MemberLeft {
            party_id,
            player,
            reason: LeaveReason::Kicked,
        };
        assert_eq!(fact.party_id(), party_id);
        assert_eq!(fact.kind(), "member-left");

        let fact = PartyFact::PartyDissolved { party_id };
        assert_eq!(fact.party_id(), party_id);
        assert_eq!(fact.kind(), "party-dissolved");
    }

    #[test]
    fn test_fact_serializes() {
        let fact = PartyFact::OwnershipTransferred {
            party_id: PartyId::new(),
            previous: PlayerId::from_name("a"),
            new_owner: PlayerId::from_name("b"),
            reason: TransferReason::Succession,
        };
        let json = serde_json::to_string(&fact).unwrap();
        assert!(json.contains("Succession"));
        let restored: PartyFact = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, fact);
    }
}
