//! Party error types
//!
//! Errors returned by directory transitions, plus the non-domain errors of
//! configuration loading and invariant audits.

use crate::ids::{PartyId, PlayerId};
use thiserror::Error;

/// Why a directory transition was refused.
///
/// This is a closed set: every refused operation reports exactly one of these
/// and leaves the directory untouched. Rendering them for players is the
/// caller's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum PartyError {
    /// The addressed party does not exist, or the caller owns none.
    #[error("party does not exist")]
    DoesNotExist,

    /// The target already has a pending invite to this party.
    #[error("player is already invited")]
    AlreadyInvited,

    /// The target is already a member of this party.
    #[error("player has already joined the party")]
    AlreadyJoined,

    /// The player already belongs to some party.
    #[error("player is already in a party")]
    AlreadyInAParty,

    /// An owner tried to kick themselves.
    #[error("cannot remove yourself from the party")]
    CannotRemoveSelf,

    /// The target is not a member of the addressed party.
    #[error("player is not in the party")]
    NotInParty,

    /// The player is not a member of any party.
    #[error("player is not in any party")]
    NotInAnyParty,

    /// The player holds no invite to the addressed party.
    #[error("player is not invited")]
    NotInvited,

    /// The party is at capacity.
    #[error("party is full")]
    PartyFull,
}

/// Result of a directory transition: the affected party after the change.
pub type PartyResult = Result<crate::Party, PartyError>;

/// Errors from loading or validating [`crate::PartyConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid TOML for this schema.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is out of range.
    #[error("invalid config value: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Create an invalid value error.
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid(reason.into())
    }
}

/// A broken cross-party invariant found by
/// [`crate::PartyDirectory::check_invariants`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// A player is a member of more than one party.
    #[error("{player} is a member of both {first} and {second}")]
    MultipleParties {
        /// The duplicated player
        player: PlayerId,
        /// One party containing the player
        first: PartyId,
        /// Another party containing the player
        second: PartyId,
    },

    /// An index entry points at a party that is gone or lacks the player.
    #[error("{player} is indexed to {party} but is not a member of it")]
    StaleIndex {
        /// The indexed player
        player: PlayerId,
        /// The party the index points at
        party: PartyId,
    },

    /// A member has no index entry for their party.
    #[error("{player} is a member of {party} but is not indexed")]
    UnindexedMember {
        /// The unindexed member
        player: PlayerId,
        /// The party they belong to
        party: PartyId,
    },

    /// The owner is not among the members.
    #[error("owner of {party} is not a member")]
    OwnerNotMember {
        /// The broken party
        party: PartyId,
    },

    /// More members than the party's capacity.
    #[error("{party} holds {members} members (capacity {capacity})")]
    OverCapacity {
        /// The broken party
        party: PartyId,
        /// Current member count
        members: usize,
        /// Party capacity
        capacity: usize,
    },

    /// A player is both a member and pending.
    #[error("{player} is both a member and pending in {party}")]
    PendingMember {
        /// The broken party
        party: PartyId,
        /// The doubly-listed player
        player: PlayerId,
    },

    /// A party with no members is still stored.
    #[error("{party} has no members but is still tracked")]
    EmptyParty {
        /// The empty party
        party: PartyId,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert!(PartyError::PartyFull.to_string().contains("full"));
        assert!(PartyError::CannotRemoveSelf.to_string().contains("yourself"));

        let err = ConfigError::invalid("capacity must be at least 1");
        assert!(err.to_string().contains("capacity"));

        let party = PartyId::new();
        let err = InvariantViolation::OverCapacity {
            party,
            members: 5,
            capacity: 4,
        };
        assert!(err.to_string().contains(&party.to_string()));
        assert!(err.to_string().contains("capacity 4"));
    }
}
