//! Shell Session Tests
//!
//! Runs scripted command lines through the shell and checks the messages
//! players would see.

use parties_cli::{Output, Shell};
use parties_core::{PartyConfig, PartySession};

fn shell() -> Shell {
    Shell::new(PartySession::start(PartyConfig::default()))
}

fn run(shell: &mut Shell, lines: &[&str]) -> Vec<Output> {
    lines.iter().flat_map(|line| shell.execute(line)).collect()
}

fn texts_for<'a>(outputs: &'a [Output], recipient: &str) -> Vec<&'a str> {
    outputs
        .iter()
        .filter(|o| o.recipient.as_deref() == Some(recipient))
        .map(|o| o.text.as_str())
        .collect()
}

fn feedback(outputs: &[Output]) -> Vec<&str> {
    outputs
        .iter()
        .filter(|o| o.recipient.is_none())
        .map(|o| o.text.as_str())
        .collect()
}

// ============================================================================
// Invites
// ============================================================================

#[test]
fn test_invite_and_accept_by_owner_name() {
    let mut shell = shell();
    let out = run(
        &mut shell,
        &["connect alice", "connect bob", "as alice invite bob"],
    );
    assert!(texts_for(&out, "bob")[0].starts_with("alice has invited you"));

    let out = shell.execute("as bob accept alice");
    assert_eq!(texts_for(&out, "alice"), vec!["bob has joined the party!"]);
    assert_eq!(texts_for(&out, "bob"), vec!["bob has joined the party!"]);

    let out = shell.execute("as bob list");
    let lines = feedback(&out);
    assert!(lines[0].ends_with("(2/4)"));
    assert_eq!(lines[1], "  - alice (owner)");
    assert_eq!(lines[2], "  - bob");
}

#[test]
fn test_accept_by_party_id() {
    let mut shell = shell();
    run(&mut shell, &["connect alice", "connect bob", "as alice invite bob"]);

    let party_id = shell
        .directory()
        .all_parties()
        .first()
        .map(|p| p.id())
        .unwrap();

    let out = shell.execute(&format!("as bob accept {party_id}"));
    assert_eq!(texts_for(&out, "alice"), vec!["bob has joined the party!"]);
}

#[test]
fn test_refusals_are_explained() {
    let mut shell = shell();
    let out = run(
        &mut shell,
        &[
            "connect alice",
            "connect bob",
            "as alice invite bob",
            "as alice invite bob",
        ],
    );
    assert_eq!(feedback(&out).last().copied(), Some("bob is already invited to this party!"));

    let out = shell.execute("as alice invite carol");
    assert_eq!(feedback(&out), vec!["carol is not connected"]);

    let out = shell.execute("as carol list");
    assert_eq!(feedback(&out), vec!["carol is not connected"]);

    let out = shell.execute("as bob list");
    assert_eq!(feedback(&out), vec!["You are not in any party!"]);
}

#[test]
fn test_full_party() {
    let mut shell = Shell::new(PartySession::start(PartyConfig { capacity: 2 }));
    let out = run(
        &mut shell,
        &[
            "connect alice",
            "connect bob",
            "connect carol",
            "as alice invite bob",
            "as bob accept alice",
            "as alice invite carol",
        ],
    );
    assert_eq!(
        feedback(&out).last().copied(),
        Some("The party is full! A party holds at most 2 players.")
    );
}

// ============================================================================
// Ownership
// ============================================================================

#[test]
fn test_owner_leaving_announces_successor() {
    let mut shell = shell();
    run(
        &mut shell,
        &[
            "connect alice",
            "connect bob",
            "as alice invite bob",
            "as bob accept alice",
        ],
    );

    let out = shell.execute("as alice leave");
    assert!(texts_for(&out, "bob").contains(&"alice has left the party."));
    assert!(texts_for(&out, "bob").contains(&"alice has transferred party ownership to you."));
    assert!(feedback(&out).contains(&"You left the party."));

    let party = shell.directory().all_parties().pop().unwrap();
    assert_eq!(party.member_count(), 1);
}

#[test]
fn test_transfer_and_kick() {
    let mut shell = shell();
    run(
        &mut shell,
        &[
            "connect alice",
            "connect bob",
            "as alice invite bob",
            "as bob accept alice",
        ],
    );

    let out = shell.execute("as alice transfer bob");
    assert_eq!(feedback(&out), vec!["Transferred the party to bob."]);

    let out = shell.execute("as alice kick bob");
    assert_eq!(feedback(&out), vec!["You do not control any party!"]);

    let out = shell.execute("as bob kick alice");
    assert!(texts_for(&out, "alice").contains(&"You have been kicked from the party."));
}

// ============================================================================
// Admin verbs
// ============================================================================

#[test]
fn test_admin_verbs_need_permission() {
    let mut shell = shell();
    run(&mut shell, &["connect alice", "connect root --admin"]);

    let out = shell.execute("as alice list-all");
    assert_eq!(feedback(&out), vec!["You do not have permission to do that."]);

    let out = shell.execute("as root list-all");
    assert_eq!(feedback(&out), vec!["There are no parties."]);
}

#[test]
fn test_admin_add_and_remove() {
    let mut shell = shell();
    run(
        &mut shell,
        &[
            "connect root --admin",
            "connect alice",
            "connect bob",
            "connect carol",
            "as alice invite bob",
            "as bob accept alice",
        ],
    );

    let out = shell.execute("as root add carol alice");
    assert!(feedback(&out)[0].starts_with("Added carol to party"));
    assert!(texts_for(&out, "alice").contains(&"carol has joined the party!"));

    let out = shell.execute("as root list-all --json");
    let parties: serde_json::Value = serde_json::from_str(feedback(&out)[0]).unwrap();
    assert_eq!(parties[0]["members"].as_array().map(Vec::len), Some(3));

    let out = shell.execute("as root remove carol");
    assert_eq!(feedback(&out), vec!["Removed carol from their party."]);
    assert_eq!(
        texts_for(&out, "carol"),
        vec!["You have been removed from the party."]
    );
}

#[test]
fn test_admin_add_to_owner_without_party() {
    let mut shell = shell();
    run(
        &mut shell,
        &["connect root --admin", "connect alice", "connect carol"],
    );

    let out = shell.execute("as root add carol alice");
    assert!(feedback(&out)[0].starts_with("Added carol to party"));
    assert_eq!(texts_for(&out, "alice"), vec!["carol has joined the party!"]);

    let parties = shell.directory().all_parties();
    assert_eq!(parties.len(), 1);
    assert_eq!(parties[0].member_count(), 2);

    let out = shell.execute("as alice list");
    let lines = feedback(&out);
    assert_eq!(lines[1], "  - alice (owner)");
    assert_eq!(lines[2], "  - carol");
}

// ============================================================================
// Connections
// ============================================================================

#[test]
fn test_reconnect_reminds_of_open_invites() {
    let mut shell = shell();
    run(
        &mut shell,
        &[
            "connect alice",
            "connect bob",
            "as alice invite bob",
            "disconnect bob",
        ],
    );

    let out = shell.execute("connect bob");
    assert_eq!(feedback(&out), vec!["bob connected"]);
    assert!(texts_for(&out, "bob")[0].starts_with("alice has invited you"));
}

#[test]
fn test_owner_disconnect_hands_over_party() {
    let mut shell = shell();
    run(
        &mut shell,
        &[
            "connect alice",
            "connect bob",
            "as alice invite bob",
            "as bob accept alice",
        ],
    );

    let out = shell.execute("disconnect alice");
    assert_eq!(
        texts_for(&out, "bob"),
        vec![
            "alice has left the game and the party.",
            "alice has transferred party ownership to you.",
        ]
    );

    // Succession was already announced by the disconnect.
    let out = shell.execute("as bob list");
    assert!(texts_for(&out, "bob").is_empty());
    assert_eq!(feedback(&out)[1], "  - bob (owner)");
}

// ============================================================================
// Grouping and audit
// ============================================================================

#[test]
fn test_group_keeps_parties_together() {
    let mut shell = shell();
    run(
        &mut shell,
        &[
            "connect alice",
            "connect bob",
            "connect carol",
            "as alice invite bob",
            "as bob accept alice",
        ],
    );

    let out = shell.execute("group carol bob alice");
    assert_eq!(feedback(&out), vec!["group 1: carol", "group 2: alice, bob"]);

    let out = shell.execute("check");
    assert_eq!(feedback(&out), vec!["ok"]);
}

#[test]
fn test_comments_and_bad_lines() {
    let mut shell = shell();
    assert!(shell.execute("# setup").is_empty());
    assert!(shell.execute("   ").is_empty());

    let out = shell.execute("dance");
    assert_eq!(out.len(), 1);
    assert!(out[0].recipient.is_none());

    let out = shell.execute("connect alice");
    assert_eq!(out[0].to_string(), "alice connected");
    let out = shell.execute("connect alice");
    assert_eq!(feedback(&out), vec!["alice is already connected"]);
}
