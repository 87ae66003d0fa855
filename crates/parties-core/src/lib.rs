//! Parties - Group Membership Core
//!
//! In-memory party management for a game server: players form parties of a
//! bounded size, invite each other, accept invites, hand over ownership, and
//! are kept together by matchmaking.
//!
//! - Entity: [`Party`] holds one group's members, owner and pending invites
//! - Manager: [`PartyDirectory`] indexes every player to at most one party and
//!   performs all invariant-checked transitions
//! - Session: [`PartySession`] scopes one directory to one server session and
//!   hands out [`SharedDirectory`] handles
//! - Hooks: [`PartyHooks`] reacts to connects and disconnects
//!
//! # Transitions
//!
//! Every transition returns a [`PartyResult`]: the affected party on success,
//! or exactly one [`PartyError`] with no state changed. Successful transitions
//! also record [`PartyFact`]s for collaborators to announce.
//!
//! # Example
//!
//! ```
//! use parties_core::{PartyConfig, PartySession, PlayerId};
//!
//! let session = PartySession::start(PartyConfig::default());
//! let directory = session.directory();
//!
//! let alice = PlayerId::from_name("alice");
//! let bob = PlayerId::from_name("bob");
//!
//! let party = directory.invite_player(alice, bob).unwrap();
//! let party = directory.accept_invite(bob, Some(party.id())).unwrap();
//! assert_eq!(party.member_count(), 2);
//! assert!(party.is_owner(&alice));
//! ```

pub mod config;
pub mod directory;
pub mod error;
pub mod facts;
pub mod hooks;
pub mod ids;
pub mod matchmaking;
pub mod party;
pub mod presence;
pub mod session;

// Re-export primary types
pub use config::PartyConfig;
pub use directory::PartyDirectory;
pub use error::{ConfigError, InvariantViolation, PartyError, PartyResult};
pub use facts::{LeaveReason, PartyFact, TransferReason};
pub use hooks::PartyHooks;
pub use ids::{PartyId, PlayerId, SessionId};
pub use matchmaking::MemberScope;
pub use party::{Party, PARTY_CAPACITY};
pub use presence::{PartyNotice, PartyNotifier, PlayerPresence};
pub use session::{PartySession, SharedDirectory};
