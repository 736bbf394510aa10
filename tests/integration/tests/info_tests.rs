//! Upcoming event listing and voting
//!
//! Run with: cargo test -p integration-tests --test info_tests

use chrono::Duration;
use ctf_bot::interactions::Route;
use ctf_core::{vote_emoji, ErrorKind, MAX_VOTE_OPTIONS};
use integration_tests::{fixed_now, sample_event, TestBot, PLAYER_ID};

fn seed_events(bot: &TestBot, count: i64) {
    for i in 0..count {
        bot.calendar
            .push(sample_event(1000 + i, &format!("CTF {i}"), 1 + i % 10));
    }
}

#[tokio::test]
async fn test_info_is_private_and_posts_nothing() {
    let bot = TestBot::new();
    seed_events(&bot, 3);
    // outside the default two week window
    bot.calendar.push(sample_event(9000, "Far away CTF", 30));

    let player = bot.member(PLAYER_ID, bot.lobby.id, &[]);
    let reply = bot.run(&player, Route::Info { weeks: None }).await.unwrap();

    assert!(reply.is_ephemeral());
    assert_eq!(reply.message.embeds.len(), 3);
    assert_eq!(reply.message.embeds[0].title.as_deref(), Some("CTF 0"));
    let summary = reply.message.content.unwrap();
    assert!(summary.starts_with("Listed 3 upcoming CTFs"));
    assert!(summary.contains(&format!(
        "<t:{}:F>",
        (fixed_now() + Duration::weeks(2)).timestamp()
    )));

    assert!(bot.platform.messages().is_empty());
    assert!(bot.platform.reactions().is_empty());

    let filter = bot.calendar.last_filter().unwrap();
    assert_eq!(filter.start, Some(fixed_now()));
    assert_eq!(filter.limit, MAX_VOTE_OPTIONS as u32);
}

#[tokio::test]
async fn test_info_weeks_widen_window() {
    let bot = TestBot::new();
    bot.calendar.push(sample_event(9000, "Far away CTF", 30));

    let player = bot.member(PLAYER_ID, bot.lobby.id, &[]);
    let reply = bot
        .run(&player, Route::Info { weeks: Some(6) })
        .await
        .unwrap();
    assert_eq!(reply.message.embeds.len(), 1);

    let err = bot
        .run(&player, Route::Info { weeks: Some(0) })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Invalid);
}

#[tokio::test]
async fn test_vote_posts_numbered_cards_with_reactions() {
    let bot = TestBot::new();
    seed_events(&bot, 3);

    let admin = bot.admin(bot.lobby.id);
    let reply = bot.run(&admin, Route::Vote { weeks: None }).await.unwrap();
    assert!(reply.is_ephemeral());
    assert!(reply
        .message
        .content
        .as_deref()
        .is_some_and(|c| c.starts_with("Listed 3 upcoming CTFs")));

    let messages = bot.platform.messages();
    assert_eq!(messages.len(), 1);
    let posted = &messages[0];
    assert_eq!(posted.channel_id, bot.lobby.id);
    assert_eq!(posted.message.embeds.len(), 3);
    assert_eq!(
        posted.message.embeds[1].title,
        Some(format!("{} CTF 1", vote_emoji(2).unwrap()))
    );

    let reactions = bot.platform.reactions();
    let expected: Vec<_> = (1..=3)
        .map(|n| (posted.id, vote_emoji(n).unwrap().to_string()))
        .collect();
    assert_eq!(reactions, expected);
}

#[tokio::test]
async fn test_vote_caps_options() {
    let bot = TestBot::new();
    seed_events(&bot, 14);

    let admin = bot.admin(bot.lobby.id);
    bot.run(&admin, Route::Vote { weeks: None }).await.unwrap();

    let messages = bot.platform.messages();
    assert_eq!(messages[0].message.embeds.len(), MAX_VOTE_OPTIONS);
    assert_eq!(bot.platform.reactions().len(), MAX_VOTE_OPTIONS);
}

#[tokio::test]
async fn test_vote_without_events_posts_nothing() {
    let bot = TestBot::new();

    let admin = bot.admin(bot.lobby.id);
    let reply = bot.run(&admin, Route::Vote { weeks: None }).await.unwrap();

    assert!(reply
        .message
        .content
        .as_deref()
        .is_some_and(|c| c.starts_with("Listed 0 upcoming CTFs")));
    assert!(bot.platform.messages().is_empty());
    assert!(bot.platform.reactions().is_empty());
}
