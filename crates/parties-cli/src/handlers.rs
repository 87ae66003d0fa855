//! Shell command handlers.
//!
//! Resolves names, checks permissions, calls the directory, and turns the
//! results into messages addressed to players.

use crate::commands::{Line, PartyVerb, ShellCommand};
use crate::roster::Roster;
use crate::texts;
use anyhow::{Context, Result};
use parking_lot::Mutex;
use parties_core::{
    Party, PartyDirectory, PartyError, PartyFact, PartyHooks, PartyId, PartyNotice, PartyNotifier,
    PartyResult, PartySession, PlayerId, SharedDirectory, TransferReason,
};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

type Outbox = Arc<Mutex<Vec<(PlayerId, PartyNotice)>>>;

/// One message produced by a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    /// Who receives it; `None` means the issuer of the command
    pub recipient: Option<String>,
    /// Message text
    pub text: String,
}

impl Output {
    fn feedback(text: impl Into<String>) -> Self {
        Self {
            recipient: None,
            text: text.into(),
        }
    }

    fn to(recipient: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            recipient: Some(recipient.into()),
            text: text.into(),
        }
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.recipient {
            Some(recipient) => write!(f, "[{recipient}] {}", self.text),
            None => write!(f, "{}", self.text),
        }
    }
}

/// Interactive party shell over one session.
pub struct Shell {
    session: PartySession,
    roster: Roster,
}

impl Shell {
    /// Create a shell owning `session`.
    pub fn new(session: PartySession) -> Self {
        Self {
            session,
            roster: Roster::new(),
        }
    }

    /// Directory of the shell's session.
    pub fn directory(&self) -> SharedDirectory {
        self.session.directory()
    }

    /// End the session, returning how many parties were dropped.
    pub fn finish(self) -> usize {
        self.session.end()
    }

    /// Execute one line. Blank lines and `#` comments produce nothing.
    pub fn execute(&mut self, line: &str) -> Vec<Output> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Vec::new();
        }

        match Line::parse_line(line) {
            Ok(parsed) => self.dispatch(parsed.command),
            Err(err) => vec![Output::feedback(err.render().to_string().trim_end())],
        }
    }

    fn dispatch(&mut self, command: ShellCommand) -> Vec<Output> {
        match command {
            ShellCommand::Connect { name, admin } => self.connect(&name, admin),
            ShellCommand::Disconnect { name } => self.disconnect(&name),
            ShellCommand::As { actor, verb } => self.run_verb(&actor, verb),
            ShellCommand::Group { names } => self.group(&names),
            ShellCommand::Check => match self.directory().check_invariants() {
                Ok(()) => vec![Output::feedback("ok")],
                Err(violation) => {
                    vec![Output::feedback(format!("invariant violated: {violation}"))]
                }
            },
        }
    }

    /// Connection hooks over the current roster. Notices collect in the
    /// returned outbox.
    fn hooks(&self) -> (PartyHooks<HashSet<PlayerId>, impl PartyNotifier>, Outbox) {
        let outbox = Outbox::default();
        let sink = outbox.clone();
        let hooks = PartyHooks::new(
            self.directory(),
            self.roster.online(),
            move |recipient: PlayerId, notice: PartyNotice| sink.lock().push((recipient, notice)),
        );
        (hooks, outbox)
    }

    fn deliver(&self, notices: Vec<(PlayerId, PartyNotice)>) -> Vec<Output> {
        notices
            .into_iter()
            .map(|(recipient, notice)| {
                Output::to(
                    self.roster.name(&recipient),
                    texts::notice_text(&notice, &self.roster),
                )
            })
            .collect()
    }

    fn connect(&mut self, name: &str, admin: bool) -> Vec<Output> {
        let player = self.roster.resolve(name);
        if !self.roster.connect(player, admin) {
            return vec![Output::feedback(format!("{name} is already connected"))];
        }

        let (hooks, outbox) = self.hooks();
        hooks.on_player_join(player);
        let mut out = vec![Output::feedback(format!("{name} connected"))];
        out.extend(self.deliver(std::mem::take(&mut *outbox.lock())));
        out
    }

    fn disconnect(&mut self, name: &str) -> Vec<Output> {
        let player = self.roster.resolve(name);
        if !self.roster.disconnect(&player) {
            return vec![Output::feedback(format!("{name} is not connected"))];
        }

        let (hooks, outbox) = self.hooks();
        hooks.on_player_disconnect(player);

        let mut out = vec![Output::feedback(format!("{name} disconnected"))];
        out.extend(self.deliver(std::mem::take(&mut *outbox.lock())));
        out
    }

    fn group(&mut self, names: &[String]) -> Vec<Output> {
        let players: Vec<PlayerId> = names.iter().map(|n| self.roster.resolve(n)).collect();
        let groups = self
            .directory()
            .group_for_allocation(&players, &self.roster.online());

        groups
            .iter()
            .enumerate()
            .map(|(i, group)| {
                let names: Vec<String> = group.iter().map(|p| self.roster.name(p)).collect();
                Output::feedback(format!("group {}: {}", i + 1, names.join(", ")))
            })
            .collect()
    }

    fn run_verb(&mut self, actor_name: &str, verb: PartyVerb) -> Vec<Output> {
        let Some(actor) = self.roster.resolve_online(actor_name) else {
            return vec![Output::feedback(format!("{actor_name} is not connected"))];
        };
        if verb.requires_admin() && !self.roster.is_admin(&actor) {
            return vec![Output::feedback("You do not have permission to do that.")];
        }
        debug!(actor = %actor, verb = ?verb, "running party verb");

        let mut out = match self.handle_verb(actor, actor_name, verb) {
            Ok(out) => out,
            Err(err) => vec![Output::feedback(format!("{err:#}"))],
        };
        out.extend(self.announce_succession());
        out
    }

    fn handle_verb(
        &mut self,
        actor: PlayerId,
        actor_name: &str,
        verb: PartyVerb,
    ) -> Result<Vec<Output>> {
        let directory = self.directory();
        let capacity = directory.with(|dir| dir.config().capacity);

        let out = match verb {
            PartyVerb::ListAll { json } => self.list_all(json)?,

            PartyVerb::List => match directory.party_of(&actor) {
                Some(party) => texts::party_listing(&party, &self.roster)
                    .into_iter()
                    .map(Output::feedback)
                    .collect(),
                None => vec![Output::feedback(texts::error_text(
                    PartyError::NotInAnyParty,
                    actor_name,
                    capacity,
                ))],
            },

            PartyVerb::Invite { player } => {
                let target = self.online_player(&player)?;
                let result = directory.invite_player(actor, target);
                self.render(result, &player, capacity, |party| {
                    vec![
                        Output::feedback(format!("Invited {player} to the party.")),
                        Output::to(
                            player.clone(),
                            texts::invited_receiver(actor_name, &party.id()),
                        ),
                    ]
                })
            }

            PartyVerb::Kick { player } => {
                let target = self.roster.resolve(&player);
                let online = self.roster.is_online(&target);
                let result = directory.kick_player(actor, target);
                self.render(result, &player, capacity, |party| {
                    let text = format!("{player} has been kicked from the party.");
                    let mut out = self.to_members(party.members().iter(), &text);
                    if online {
                        out.push(Output::to(
                            player.clone(),
                            "You have been kicked from the party.",
                        ));
                    }
                    out
                })
            }

            PartyVerb::Transfer { player } => {
                let target = self.online_player(&player)?;
                let result = directory.transfer_party(actor, target);
                self.render(result, &player, capacity, |_| {
                    let mut out = Vec::new();
                    if target != actor {
                        out.push(Output::feedback(format!(
                            "Transferred the party to {player}."
                        )));
                    }
                    out.push(Output::to(
                        player.clone(),
                        texts::transferred_receiver(actor_name),
                    ));
                    out
                })
            }

            PartyVerb::Accept { party } => {
                let party_id =
                    self.resolve_party(&party, |dir, owner| dir.own_party(owner).map(Party::id))?;
                let result = directory.accept_invite(actor, party_id);
                self.render(result, actor_name, capacity, |party| {
                    let text = format!("{actor_name} has joined the party!");
                    self.to_members(party.members().iter(), &text)
                })
            }

            PartyVerb::Leave => {
                let result = directory.leave_party(actor);
                self.render(result, actor_name, capacity, |party| {
                    let text = format!("{actor_name} has left the party.");
                    let mut out = self.to_members(party.members().iter(), &text);
                    out.push(Output::feedback("You left the party."));
                    out
                })
            }

            PartyVerb::Disband => {
                let result = directory.disband(actor);
                self.render(result, actor_name, capacity, |party| {
                    self.to_members(party.members().iter(), "The party has been disbanded.")
                })
            }

            PartyVerb::Add { player, party } => {
                let target = self.online_player(&player)?;
                let result = match party.parse::<PartyId>() {
                    Ok(party_id) => directory.add_player(target, Some(party_id)),
                    Err(_) => {
                        let owner = self.online_player(&party)?;
                        directory.add_player_to_owner(target, owner)
                    }
                };
                self.render(result, &player, capacity, |party| {
                    let mut out = vec![Output::feedback(format!(
                        "Added {player} to party {}.",
                        party.id()
                    ))];
                    let text = format!("{player} has joined the party!");
                    out.extend(self.to_members(party.members().iter(), &text));
                    out
                })
            }

            PartyVerb::Remove { player } => {
                let target = self.online_player(&player)?;
                let result = directory.remove_player(target);
                self.render(result, &player, capacity, |_| {
                    vec![
                        Output::feedback(format!("Removed {player} from their party.")),
                        Output::to(player.clone(), "You have been removed from the party."),
                    ]
                })
            }
        };

        Ok(out)
    }

    fn list_all(&self, json: bool) -> Result<Vec<Output>> {
        let parties = self.directory().all_parties();
        if json {
            let text =
                serde_json::to_string_pretty(&parties).context("failed to encode parties")?;
            return Ok(vec![Output::feedback(text)]);
        }
        if parties.is_empty() {
            return Ok(vec![Output::feedback("There are no parties.")]);
        }

        Ok(parties
            .iter()
            .flat_map(|party| texts::party_listing(party, &self.roster))
            .map(Output::feedback)
            .collect())
    }

    /// Render a transition result: `on_ok` builds messages from the party,
    /// errors are explained to the issuer.
    fn render(
        &self,
        result: PartyResult,
        subject: &str,
        capacity: usize,
        on_ok: impl FnOnce(&Party) -> Vec<Output>,
    ) -> Vec<Output> {
        match result {
            Ok(party) => on_ok(&party),
            Err(error) => vec![Output::feedback(texts::error_text(error, subject, capacity))],
        }
    }

    fn to_members<'a>(
        &self,
        members: impl Iterator<Item = &'a PlayerId>,
        text: &str,
    ) -> Vec<Output> {
        members
            .filter(|m| self.roster.is_online(m))
            .map(|m| Output::to(self.roster.name(m), text))
            .collect()
    }

    fn online_player(&mut self, name: &str) -> Result<PlayerId> {
        self.roster
            .resolve_online(name)
            .with_context(|| format!("{name} is not connected"))
    }

    /// A party named by id, or by a connected player through `by_player`.
    fn resolve_party(
        &mut self,
        reference: &str,
        by_player: impl FnOnce(&PartyDirectory, &PlayerId) -> Option<PartyId>,
    ) -> Result<Option<PartyId>> {
        if let Ok(party_id) = reference.parse::<PartyId>() {
            return Ok(Some(party_id));
        }
        let player = self.online_player(reference)?;
        Ok(self.directory().with(|dir| by_player(dir, &player)))
    }

    /// Tell new owners chosen by succession about their promotion.
    fn announce_succession(&self) -> Vec<Output> {
        self.directory()
            .take_facts()
            .into_iter()
            .filter_map(|fact| match fact {
                PartyFact::OwnershipTransferred {
                    previous,
                    new_owner,
                    reason: TransferReason::Succession,
                    ..
                } if self.roster.is_online(&new_owner) => Some(Output::to(
                    self.roster.name(&new_owner),
                    texts::transferred_receiver(&self.roster.name(&previous)),
                )),
                _ => None,
            })
            .collect()
    }
}
