//! End-to-end pipeline tests: message in, reply out, ledger on disk.

use chatwiz_common::CategoryTotals;
use chatwizd::backend::FakeBackend;
use chatwizd::bot::Bot;
use chatwizd::chatlog::MessageLog;
use chatwizd::engine::ScoreEngine;
use chatwizd::ledger::ScoreLedger;
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;

fn bot_with_backend(dir: &Path, backend: FakeBackend) -> Bot {
    let engine = ScoreEngine::with_prompts(
        Arc::new(backend),
        "Rate the grammar 0-10: ",
        "Rate the friendliness 0-10: ",
        "Rate the humor 0-10: ",
    );
    let ledger = ScoreLedger::load(dir.join("scores.json")).unwrap();
    let log = MessageLog::new(dir.join("log.txt"));
    Bot::new(engine, ledger, log)
}

fn reload_totals(dir: &Path, user: &str) -> Option<CategoryTotals> {
    ScoreLedger::load(dir.join("scores.json"))
        .unwrap()
        .get(user)
        .cloned()
}

#[tokio::test]
async fn fresh_user_accumulates_from_baseline() {
    // Scenario A: grammar +1, friendliness 0, humor -1 on a fresh user.
    let dir = tempdir().unwrap();
    let backend = FakeBackend::new()
        .respond("grammar", "7")
        .respond("friendliness", "5")
        .respond("humor", "2");
    let bot = bot_with_backend(dir.path(), backend);

    let reply = bot.handle_message("u1", "alice", "nice weather today").await.unwrap();
    assert!(reply.contains("Grammar: **Appropriate**"));
    assert!(reply.contains("Friendliness: **Natural**"));
    assert!(reply.contains("Humor: **Not funny**"));

    let totals = reload_totals(dir.path(), "u1").unwrap();
    assert_eq!(totals.grammar, 11);
    assert_eq!(totals.friendliness, 10);
    assert_eq!(totals.humor, 9);
}

#[tokio::test]
async fn unusable_output_renders_not_calculated_and_adds_nothing() {
    // Scenario C: "abc" for one category degrades only that category.
    let dir = tempdir().unwrap();
    let backend = FakeBackend::new()
        .respond("grammar", "abc")
        .respond("friendliness", "8")
        .respond("humor", "8");
    let bot = bot_with_backend(dir.path(), backend);

    let reply = bot.handle_message("u1", "alice", "hello").await.unwrap();
    assert!(reply.contains("Grammar: **Not calculated**"));
    assert!(reply.contains("Friendliness: **Friendly**"));

    let totals = reload_totals(dir.path(), "u1").unwrap();
    assert_eq!(totals.grammar, 10);
    assert_eq!(totals.friendliness, 11);
    assert_eq!(totals.humor, 11);
}

#[tokio::test]
async fn reset_restores_baseline_exactly() {
    // Scenario D: reset a user with a non-default record.
    let dir = tempdir().unwrap();
    let backend = FakeBackend::new()
        .respond("grammar", "10")
        .respond("friendliness", "10")
        .respond("humor", "10");
    let bot = bot_with_backend(dir.path(), backend);

    bot.handle_message("u1", "alice", "first").await.unwrap();
    bot.handle_message("u1", "alice", "second").await.unwrap();
    assert_ne!(reload_totals(dir.path(), "u1").unwrap(), CategoryTotals::baseline());

    let reply = bot.handle_message("u1", "alice", "!reset").await.unwrap();
    assert_eq!(reply, "Your scores have reset!");
    assert_eq!(reload_totals(dir.path(), "u1").unwrap(), CategoryTotals::baseline());
}

#[tokio::test]
async fn concurrent_accumulates_both_land() {
    // Scenario E: two users racing through the pipeline must both be
    // reflected in the persisted document.
    let dir = tempdir().unwrap();
    let backend = FakeBackend::new()
        .respond("grammar", "9")
        .respond("friendliness", "9")
        .respond("humor", "9");
    let bot = Arc::new(bot_with_backend(dir.path(), backend));

    let bot_a = Arc::clone(&bot);
    let bot_b = Arc::clone(&bot);
    let task_a = tokio::spawn(async move { bot_a.handle_message("u1", "alice", "hi").await });
    let task_b = tokio::spawn(async move { bot_b.handle_message("u2", "bob", "hey").await });
    task_a.await.unwrap().unwrap();
    task_b.await.unwrap().unwrap();

    let ledger = ScoreLedger::load(dir.path().join("scores.json")).unwrap();
    assert_eq!(ledger.get("u1").unwrap().grammar, 11);
    assert_eq!(ledger.get("u2").unwrap().grammar, 11);
}

#[tokio::test]
async fn help_command_skips_scoring_and_ledger() {
    let dir = tempdir().unwrap();
    // A backend with no canned responses: any scoring attempt would come
    // back all-sentinel, but !help must not attempt one at all.
    let bot = bot_with_backend(dir.path(), FakeBackend::new());

    let reply = bot.handle_message("u1", "alice", "!help").await.unwrap();
    assert!(reply.contains("!me"));
    assert!(reply.contains("!reset"));
    assert!(reload_totals(dir.path(), "u1").is_none());
}

#[tokio::test]
async fn me_command_reports_totals_or_not_found() {
    let dir = tempdir().unwrap();
    let backend = FakeBackend::new()
        .respond("grammar", "7")
        .respond("friendliness", "7")
        .respond("humor", "7");
    let bot = bot_with_backend(dir.path(), backend);

    let reply = bot.handle_message("u1", "alice", "!me").await.unwrap();
    assert_eq!(reply, "Sorry, I couldn't find your scores.");

    bot.handle_message("u1", "alice", "a message").await.unwrap();
    let reply = bot.handle_message("u1", "alice", "!me").await.unwrap();
    assert_eq!(reply, "Grammar: **11**\nFriendliness: **11**\nHumor: **11**");
}

#[tokio::test]
async fn backend_outage_degrades_every_category_but_still_replies() {
    let dir = tempdir().unwrap();
    let bot = bot_with_backend(dir.path(), FakeBackend::failing());

    let reply = bot.handle_message("u1", "alice", "hello").await.unwrap();
    assert_eq!(
        reply,
        "Grammar: **Not calculated**\nFriendliness: **Not calculated**\nHumor: **Not calculated**"
    );
    // The user record still exists at the baseline: the message counted,
    // the failed measurements did not.
    assert_eq!(reload_totals(dir.path(), "u1").unwrap(), CategoryTotals::baseline());
}

#[tokio::test]
async fn every_message_is_appended_to_the_log() {
    let dir = tempdir().unwrap();
    let bot = bot_with_backend(dir.path(), FakeBackend::failing());

    bot.handle_message("u1", "alice", "!help").await.unwrap();
    bot.handle_message("u2", "bob", "hello").await.unwrap();

    let log = std::fs::read_to_string(dir.path().join("log.txt")).unwrap();
    assert_eq!(log, "Log file created.\nalice: !help\nbob: hello\n");
}
