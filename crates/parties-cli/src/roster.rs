//! Player roster
//!
//! Maps the names typed at the shell to stable identities and tracks who is
//! connected and who may run admin verbs.

use parties_core::PlayerId;
use std::collections::{HashMap, HashSet};

/// Known players of a shell session.
#[derive(Debug, Default)]
pub struct Roster {
    names: HashMap<PlayerId, String>,
    online: HashSet<PlayerId>,
    admins: HashSet<PlayerId>,
}

impl Roster {
    /// Create an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a name, remembering it for display. Names are case-insensitive.
    pub fn resolve(&mut self, name: &str) -> PlayerId {
        let key = name.to_lowercase();
        let id = PlayerId::from_name(&key);
        self.names.entry(id).or_insert_with(|| name.to_string());
        id
    }

    /// Resolve a name only if that player is online.
    pub fn resolve_online(&mut self, name: &str) -> Option<PlayerId> {
        let id = self.resolve(name);
        self.is_online(&id).then_some(id)
    }

    /// Display name for an id.
    pub fn name(&self, id: &PlayerId) -> String {
        self.names
            .get(id)
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }

    /// Mark a player connected. Returns false if they already were.
    pub fn connect(&mut self, id: PlayerId, admin: bool) -> bool {
        if admin {
            self.admins.insert(id);
        }
        self.online.insert(id)
    }

    /// Mark a player disconnected. Returns false if they were not online.
    pub fn disconnect(&mut self, id: &PlayerId) -> bool {
        self.online.remove(id)
    }

    /// Check if a player is connected.
    pub fn is_online(&self, id: &PlayerId) -> bool {
        self.online.contains(id)
    }

    /// Check if a player may run admin verbs.
    pub fn is_admin(&self, id: &PlayerId) -> bool {
        self.admins.contains(id)
    }

    /// Snapshot of the connected players, usable as presence.
    pub fn online(&self) -> HashSet<PlayerId> {
        self.online.clone()
    }
}
