//! Player-facing text for party results, errors and notices.

use crate::roster::Roster;
use parties_core::{Party, PartyError, PartyNotice};

/// Explain a refused operation. `player` is the name the error is about.
pub fn error_text(error: PartyError, player: &str, capacity: usize) -> String {
    match error {
        PartyError::DoesNotExist => "You do not control any party!".to_string(),
        PartyError::AlreadyInvited => format!("{player} is already invited to this party!"),
        PartyError::AlreadyJoined => "That player has already joined the party!".to_string(),
        PartyError::AlreadyInAParty => "You are already in a party!".to_string(),
        PartyError::CannotRemoveSelf => "You cannot remove yourself from the party!".to_string(),
        PartyError::NotInParty => format!("{player} is not in this party!"),
        PartyError::NotInAnyParty => "You are not in any party!".to_string(),
        PartyError::NotInvited => "You are not invited to this party!".to_string(),
        PartyError::PartyFull => {
            format!("The party is full! A party holds at most {capacity} players.")
        }
    }
}

/// Render a notice for its recipient.
pub fn notice_text(notice: &PartyNotice, roster: &Roster) -> String {
    match notice {
        PartyNotice::InviteStillOpen { party_id, owner } => {
            invited_receiver(&roster.name(owner), party_id)
        }
        PartyNotice::MemberLeftGame { player, .. } => {
            format!("{} has left the game and the party.", roster.name(player))
        }
        PartyNotice::OwnershipTransferred { previous_owner, .. } => {
            transferred_receiver(&roster.name(previous_owner))
        }
    }
}

/// Invitation as seen by the invitee.
pub fn invited_receiver(owner: &str, party_id: &impl std::fmt::Display) -> String {
    format!(
        "{owner} has invited you to their party! \
         Type `as <you> accept {owner}` or `as <you> accept {party_id}` to join."
    )
}

/// Ownership hand-over as seen by the new owner.
pub fn transferred_receiver(previous: &str) -> String {
    format!("{previous} has transferred party ownership to you.")
}

/// Multi-line listing of one party: id, then members in join order, then
/// pending invitees.
pub fn party_listing(party: &Party, roster: &Roster) -> Vec<String> {
    let mut lines = vec![format!(
        "Party {} ({}/{})",
        party.id(),
        party.member_count(),
        party.capacity()
    )];

    for member in party.members() {
        let role = if party.is_owner(member) { " (owner)" } else { "" };
        lines.push(format!("  - {}{role}", roster.name(member)));
    }
    for invitee in party.pending() {
        lines.push(format!("  - {} (pending)", roster.name(invitee)));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use parties_core::{PartyId, PlayerId, PARTY_CAPACITY};

    #[test]
    fn test_error_text_mentions_context() {
        let text = error_text(PartyError::PartyFull, "bob", PARTY_CAPACITY);
        assert!(text.contains('4'));

        let text = error_text(PartyError::NotInParty, "bob", PARTY_CAPACITY);
        assert!(text.starts_with("bob"));
    }

    #[test]
    fn test_party_listing() {
        let mut roster = Roster::new();
        let alice = roster.resolve("alice");
        let bob = roster.resolve("bob");
        let carol = roster.resolve("carol");

        let mut party = Party::new(alice, PARTY_CAPACITY);
        party.add(bob);
        party.invite(carol);

        let lines = party_listing(&party, &roster);
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("(2/4)"));
        assert_eq!(lines[1], "  - alice (owner)");
        assert_eq!(lines[2], "  - bob");
        assert_eq!(lines[3], "  - carol (pending)");
    }

    #[test]
    fn test_notice_text() {
        let mut roster = Roster::new();
        let alice = roster.resolve("alice");
        let notice = PartyNotice::InviteStillOpen {
            party_id: PartyId::new(),
            owner: alice,
        };
        assert!(notice_text(&notice, &roster).starts_with("alice has invited you"));

        let stranger = PlayerId::from_name("stranger");
        let notice = PartyNotice::OwnershipTransferred {
            party_id: PartyId::new(),
            previous_owner: stranger,
        };
        assert!(notice_text(&notice, &roster).contains(&stranger.to_string()));
    }

    #[test]
    fn test_party_listing_follows_join_order() {
        let mut roster = Roster::new();
        let owner = roster.resolve("owner");
        let mut guests: Vec<PlayerId> = ["dan", "eve", "fay"]
            .iter()
            .map(|name| roster.resolve(name))
            .collect();
        // Join in descending id order so join order and id order disagree.
        guests.sort_by(|a, b| b.cmp(a));

        let mut party = Party::new(owner, PARTY_CAPACITY);
        for guest in &guests {
            party.add(*guest);
        }

        let lines = party_listing(&party, &roster);
        let expected: Vec<String> = guests
            .iter()
            .map(|guest| format!("  - {}", roster.name(guest)))
            .collect();
        assert_eq!(lines[2..], expected[..]);
    }
}
