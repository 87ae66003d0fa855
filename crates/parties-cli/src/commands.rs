//! Shell line grammar.
//!
//! Every line typed at the shell (or read from a script) is parsed with clap:
//!
//! ```text
//! connect alice [--admin]
//! disconnect alice
//! as alice invite bob
//! as bob accept alice
//! group alice bob carol
//! check
//! ```

use clap::{Parser, Subcommand};

/// One parsed shell line.
#[derive(Debug, Parser)]
#[command(name = "party", no_binary_name = true, disable_version_flag = true)]
pub struct Line {
    /// What to do
    #[command(subcommand)]
    pub command: ShellCommand,
}

impl Line {
    /// Parse a line of whitespace-separated words.
    pub fn parse_line(line: &str) -> Result<Self, clap::Error> {
        Self::try_parse_from(line.split_whitespace())
    }
}

/// Top-level shell commands.
#[derive(Debug, Clone, Subcommand)]
pub enum ShellCommand {
    /// Connect a player to the server
    Connect {
        /// Player name
        name: String,
        /// Grant admin verbs
        #[arg(long)]
        admin: bool,
    },

    /// Disconnect a player from the server
    Disconnect {
        /// Player name
        name: String,
    },

    /// Run a party verb as a connected player
    As {
        /// Acting player
        actor: String,
        /// Verb to run
        #[command(subcommand)]
        verb: PartyVerb,
    },

    /// Group players for team allocation, keeping parties together
    Group {
        /// Players entering the activity, in queue order
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Audit directory invariants
    Check,
}

/// Party verbs, one per directory operation.
#[derive(Debug, Clone, Subcommand)]
pub enum PartyVerb {
    /// List every party (admin)
    ListAll {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show your own party
    List,

    /// Invite a connected player to your party
    Invite {
        /// Player to invite
        player: String,
    },

    /// Kick a player from your party
    Kick {
        /// Player to kick
        player: String,
    },

    /// Hand your party to another member
    Transfer {
        /// New owner
        player: String,
    },

    /// Accept an invite, naming the party by its owner or by its id
    Accept {
        /// Owner name or party id
        party: String,
    },

    /// Leave your party
    Leave,

    /// Disband your party
    Disband,

    /// Put a player into a party (admin)
    Add {
        /// Player to add
        player: String,
        /// Owner name or party id
        party: String,
    },

    /// Take a player out of their party (admin)
    Remove {
        /// Player to remove
        player: String,
    },
}

impl PartyVerb {
    /// Verbs limited to admins.
    pub fn requires_admin(&self) -> bool {
        matches!(
            self,
            PartyVerb::ListAll { .. } | PartyVerb::Add { .. } | PartyVerb::Remove { .. }
        )
    }
}
