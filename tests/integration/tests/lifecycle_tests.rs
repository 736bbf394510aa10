//! CTF lifecycle scenarios against in-memory collaborators
//!
//! Run with: cargo test -p integration-tests --test lifecycle_tests

use ctf_bot::interactions::{execute, Route};
use ctf_common::CompensationPolicy;
use ctf_core::{
    cheer, ChatPlatform, CtfFilter, CtfRepository, DomainError, ErrorKind, Marker, Snowflake,
};
use ctf_service::{
    BotSettings, CreateCtfRequest, NewChallengeRequest, ReplyMode, ServiceError,
    CTF_NAME_MAX_CHARS,
};
use integration_tests::{fixed_now, sample_event, TestBot, PLAYER_ID};
use tokio_util::sync::CancellationToken;

fn chal(name: &str) -> Route {
    Route::Chal(NewChallengeRequest {
        name: name.to_string(),
    })
}

fn join(ctf: &str) -> Route {
    Route::Join {
        ctf: ctf.to_string(),
    }
}

fn best_effort() -> TestBot {
    TestBot::with_settings(BotSettings::default().with_compensation(CompensationPolicy::BestEffort))
}

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn test_create_provisions_resources_and_record() {
    let bot = TestBot::new();

    let reply = bot.create_ctf("demoCTF").await.unwrap();
    assert_eq!(reply.mode, ReplyMode::Update);
    assert_eq!(
        reply.message.embeds[0].description.as_deref(),
        Some("CTF `demoCTF` was successfully created!")
    );

    let ctf = bot.repo.find_by_name("demoCTF").await.unwrap();
    assert!(ctf.can_join);
    assert_eq!(ctf.start, fixed_now());
    assert!(ctf.ctftime_url.is_empty());

    let role = bot.platform.role_named("demoCTF").unwrap();
    assert_eq!(ctf.role_id, role.id);
    assert!(role.mentionable);

    let (category, registration, general) = bot.ctf_channels("demoCTF");
    assert!(category.is_category());
    assert_eq!(registration.topic.as_deref(), Some("demoCTF player registration"));
    assert_eq!(general.parent_id, Some(category.id));

    let messages = bot.platform.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].channel_id, registration.id);
    assert_eq!(messages[0].message.buttons[0].custom_id, "join/demoCTF");
}

#[tokio::test]
async fn test_create_from_calendar_event() {
    let bot = TestBot::new();
    let event = sample_event(2300, "demoCTF 2026", 5);
    bot.calendar.push(event.clone());

    let admin = bot.admin(bot.lobby.id);
    bot.run(&admin, Route::Create(CreateCtfRequest::new("demoCTF", Some(2300))))
        .await
        .unwrap();

    let ctf = bot.repo.find_by_name("demoCTF").await.unwrap();
    assert_eq!(ctf.start, event.start);
    assert_eq!(ctf.ctftime_url, "https://ctftime.org/event/2300/");
}

#[tokio::test]
async fn test_create_unknown_event_touches_nothing() {
    let bot = TestBot::new();
    let admin = bot.admin(bot.lobby.id);

    let err = bot
        .run(&admin, Route::Create(CreateCtfRequest::new("demoCTF", Some(9))))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(bot.platform.call_count(), 0);
    assert!(bot.repo.rows().is_empty());
}

#[tokio::test]
async fn test_confirm_create_prompts_with_button() {
    let bot = TestBot::new();
    let admin = bot.admin(bot.lobby.id);

    let reply = bot
        .run(&admin, Route::New(CreateCtfRequest::new("demoCTF", Some(2300))))
        .await
        .unwrap();

    assert!(reply.is_ephemeral());
    assert_eq!(reply.message.buttons[0].custom_id, "new/demoCTF/create/2300");
    assert_eq!(bot.platform.call_count(), 0);
}

#[tokio::test]
async fn test_duplicate_create_conflicts() {
    let bot = TestBot::new();
    bot.create_ctf("demoCTF").await.unwrap();
    let calls = bot.platform.call_count();

    let err = bot.create_ctf("demoCTF").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(err.to_string(), "CTF `demoCTF` already exists.");
    assert_eq!(bot.platform.call_count(), calls);

    let admin = bot.admin(bot.lobby.id);
    let err = bot
        .run(&admin, Route::New(CreateCtfRequest::new("demoCTF", None)))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn test_concurrent_create_stores_one_record() {
    let bot = TestBot::new();
    // Both callers pass the name check before either inserts
    bot.repo.hold_lookups(2);

    let (first, second) = tokio::join!(bot.create_ctf("demoCTF"), bot.create_ctf("demoCTF"));

    let outcomes = [first, second];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    let loser = outcomes.iter().find_map(|r| r.as_ref().err()).unwrap();
    assert!(matches!(
        loser,
        ServiceError::Domain(DomainError::CtfAlreadyExists(name)) if name == "demoCTF"
    ));
    assert_eq!(loser.kind(), ErrorKind::Conflict);

    let (ctfs, total) = bot.repo.find(&CtfFilter::by_name("demoCTF")).await.unwrap();
    assert_eq!(ctfs.len(), 1);
    assert_eq!(total, 1);

    // Manual policy: the loser's resources stay for an operator
    let roles = bot.platform.roles();
    assert_eq!(roles.len(), 2);
    assert!(roles.iter().any(|r| r.id == ctfs[0].role_id));
    assert_eq!(bot.platform.channels().len(), 1 + 2 * 3);
}

#[tokio::test]
async fn test_concurrent_create_best_effort_removes_losing_resources() {
    let bot = best_effort();
    bot.repo.hold_lookups(2);

    let (first, second) = tokio::join!(bot.create_ctf("demoCTF"), bot.create_ctf("demoCTF"));
    assert_eq!([&first, &second].iter().filter(|r| r.is_ok()).count(), 1);

    let ctf = bot.repo.find_by_name("demoCTF").await.unwrap();
    let roles = bot.platform.roles();
    assert_eq!(roles.len(), 1);
    assert_eq!(roles[0].id, ctf.role_id);

    // Lobby plus the winner's category, registration and general
    let channels = bot.platform.channels();
    assert_eq!(channels.len(), 4);
    let (category, _, _) = bot.ctf_channels("demoCTF");
    assert_eq!(
        channels.iter().filter(|c| c.parent_id == Some(category.id)).count(),
        2
    );
}

#[tokio::test]
async fn test_longest_name_creates() {
    let bot = TestBot::new();
    let name = "n".repeat(usize::from(CTF_NAME_MAX_CHARS));

    bot.create_ctf(&name).await.unwrap();

    let messages = bot.platform.messages();
    assert_eq!(messages[0].message.buttons[0].label, format!("Join {name}"));
    assert!(bot.repo.find_by_name(&name).await.is_ok());
}

#[tokio::test]
async fn test_overlong_name_touches_nothing() {
    let bot = TestBot::new();
    let name = "n".repeat(usize::from(CTF_NAME_MAX_CHARS) + 1);

    let err = bot.create_ctf(&name).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Invalid);

    let admin = bot.admin(bot.lobby.id);
    let err = bot
        .run(&admin, Route::New(CreateCtfRequest::new(name, Some(2300))))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Invalid);

    assert_eq!(bot.platform.call_count(), 0);
    assert_eq!(bot.repo.query_count(), 0);
}

#[tokio::test]
async fn test_invalid_name_rejected() {
    let bot = TestBot::new();

    let err = bot.create_ctf("a/b").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Invalid);
    assert_eq!(bot.platform.call_count(), 0);
}

// ============================================================================
// Provisioning failures
// ============================================================================

#[tokio::test]
async fn test_manual_policy_leaves_completed_steps() {
    let bot = TestBot::new();
    // role, category, then the registration channel fails
    bot.platform.fail_at(3);

    let err = bot.create_ctf("demoCTF").await.unwrap_err();
    assert!(err.is_internal());

    assert!(bot.platform.role_named("demoCTF").is_some());
    assert!(bot.platform.channel_named("demoCTF", None).is_some());
    assert_eq!(bot.platform.channels().len(), 2);
    assert!(bot.repo.rows().is_empty());
}

#[tokio::test]
async fn test_best_effort_policy_removes_completed_steps() {
    for failing_call in 1..=5 {
        let bot = best_effort();
        bot.platform.fail_at(failing_call);

        let err = bot.create_ctf("demoCTF").await.unwrap_err();
        assert!(err.is_internal(), "call {failing_call}");

        assert!(bot.platform.roles().is_empty(), "call {failing_call}");
        assert_eq!(
            bot.platform.channels(),
            vec![bot.lobby.clone()],
            "call {failing_call}"
        );
        assert!(bot.repo.rows().is_empty(), "call {failing_call}");
    }
}

#[tokio::test]
async fn test_cancellation_stops_before_next_step() {
    let bot = TestBot::new();
    let token = CancellationToken::new();
    bot.platform.cancel_at(2, token.clone());

    let admin = bot.admin(bot.lobby.id);
    let route = Route::Create(CreateCtfRequest::new("demoCTF", None));
    let err = execute(&bot.ctx, &admin, &route, &token).await.unwrap_err();

    assert!(matches!(err, ServiceError::Domain(DomainError::Cancelled)));
    assert_eq!(bot.platform.call_count(), 2);
    assert!(bot.platform.role_named("demoCTF").is_some());
    assert!(bot.repo.rows().is_empty());
}

// ============================================================================
// Guards
// ============================================================================

#[tokio::test]
async fn test_admin_check_runs_before_context_lookup() {
    let bot = TestBot::new();
    let player = bot.member(PLAYER_ID, bot.lobby.id, &[]);

    for route in [Route::Open, Route::Close, Route::Delete, Route::DeleteConfirmed] {
        let err = bot.run(&player, route).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::NotAdministrator)));
    }
    assert_eq!(bot.repo.query_count(), 0);
}

#[tokio::test]
async fn test_admin_commands_need_capability() {
    let bot = TestBot::new();
    let player = bot.member(PLAYER_ID, bot.lobby.id, &[]);

    let err = bot
        .run(&player, Route::New(CreateCtfRequest::new("demoCTF", None)))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    let err = bot.run(&player, Route::Vote { weeks: None }).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
}

#[tokio::test]
async fn test_context_commands_outside_ctf() {
    let bot = TestBot::new();
    bot.create_ctf("demoCTF").await.unwrap();
    let stray = bot.platform.seed_channel("random", Some(bot.lobby.id));

    for channel_id in [bot.lobby.id, stray.id, Snowflake::new(999_999)] {
        let player = bot.member(PLAYER_ID, channel_id, &[]);
        let err = bot.run(&player, Route::Mark(Marker::Flag)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::NotInsideCtf)));
    }
}

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn test_close_and_open_registration() {
    let bot = TestBot::new();
    bot.create_ctf("demoCTF").await.unwrap();
    let (_, _, general) = bot.ctf_channels("demoCTF");
    let admin = bot.admin(general.id);

    let reply = bot.run(&admin, Route::Close).await.unwrap();
    assert_eq!(
        reply.message.embeds[0].description.as_deref(),
        Some("You successfully set registrations for CTF `demoCTF` to false.")
    );
    assert!(!bot.repo.find_by_name("demoCTF").await.unwrap().can_join);

    bot.run(&admin, Route::Open).await.unwrap();
    assert!(bot.repo.find_by_name("demoCTF").await.unwrap().can_join);
}

#[tokio::test]
async fn test_join_grants_role_once() {
    let bot = TestBot::new();
    bot.create_ctf("demoCTF").await.unwrap();
    let (_, registration, _) = bot.ctf_channels("demoCTF");
    let role_id = bot.repo.find_by_name("demoCTF").await.unwrap().role_id;
    let existing = Snowflake::new(7);

    let player = bot.member(PLAYER_ID, registration.id, &[existing]);
    let reply = bot.run(&player, join("demoCTF")).await.unwrap();
    assert!(reply.is_ephemeral());
    assert_eq!(
        bot.platform.member_roles(PLAYER_ID),
        Some(vec![existing, role_id])
    );

    let joined = bot.member(PLAYER_ID, registration.id, &[existing, role_id]);
    let err = bot.run(&joined, join("demoCTF")).await.unwrap_err();
    assert!(matches!(err, ServiceError::Domain(DomainError::AlreadyJoined(_))));
}

#[tokio::test]
async fn test_join_closed_ctf_grants_nothing() {
    let bot = TestBot::new();
    bot.create_ctf("demoCTF").await.unwrap();
    let (_, registration, _) = bot.ctf_channels("demoCTF");
    bot.run(&bot.admin(registration.id), Route::Close)
        .await
        .unwrap();

    let player = bot.member(PLAYER_ID, registration.id, &[]);
    let err = bot.run(&player, join("demoCTF")).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert!(bot.platform.member_roles(PLAYER_ID).is_none());
}

#[tokio::test]
async fn test_join_button_from_other_ctf_rejected() {
    let bot = TestBot::new();
    bot.create_ctf("demoCTF").await.unwrap();
    let (_, registration, _) = bot.ctf_channels("demoCTF");

    let player = bot.member(PLAYER_ID, registration.id, &[]);
    let err = bot.run(&player, join("otherCTF")).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Invalid);
    assert!(bot.platform.member_roles(PLAYER_ID).is_none());
}

// ============================================================================
// Challenges
// ============================================================================

#[tokio::test]
async fn test_flag_marks_channel_once() {
    let bot = TestBot::new();
    bot.create_ctf("demoCTF").await.unwrap();
    let (category, _, general) = bot.ctf_channels("demoCTF");
    let role_id = bot.repo.find_by_name("demoCTF").await.unwrap().role_id;

    let member = bot.member(PLAYER_ID, general.id, &[role_id]);
    bot.run(&member, chal("pwn-1")).await.unwrap();
    let pwn = bot.platform.channel_named("pwn-1", Some(category.id)).unwrap();

    let player = bot.member(PLAYER_ID, pwn.id, &[role_id]);
    let reply = bot.run(&player, Route::Mark(Marker::Flag)).await.unwrap();
    assert_eq!(reply.mode, ReplyMode::Public);
    assert_eq!(
        reply.message.content.as_deref(),
        Some(format!("\u{1F6A9} {}! <@300> has flagged pwn-1.", cheer(0)).as_str())
    );
    assert_eq!(
        bot.platform.channel(pwn.id).unwrap().name,
        Marker::Flag.apply("pwn-1")
    );

    for marker in [Marker::Flag, Marker::Blood] {
        let err = bot.run(&player, Route::Mark(marker)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::AlreadySolved)));
    }
}

#[tokio::test]
async fn test_shared_channels_never_markable() {
    let bot = TestBot::new();
    bot.create_ctf("demoCTF").await.unwrap();
    let (_, registration, general) = bot.ctf_channels("demoCTF");

    for channel in [registration, general] {
        let player = bot.member(PLAYER_ID, channel.id, &[]);
        let err = bot.run(&player, Route::Mark(Marker::Blood)).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::ChannelNotMarkable(_))
        ));
        assert_eq!(bot.platform.channel(channel.id).unwrap().name, channel.name);
    }
}

#[tokio::test]
async fn test_challenge_names_compare_logically() {
    let bot = TestBot::new();
    bot.create_ctf("demoCTF").await.unwrap();
    let (category, _, general) = bot.ctf_channels("demoCTF");
    let role_id = bot.repo.find_by_name("demoCTF").await.unwrap().role_id;
    let member = bot.member(PLAYER_ID, general.id, &[role_id]);

    bot.run(&member, chal("Baby Heap")).await.unwrap();
    let heap = bot
        .platform
        .channel_named("baby-heap", Some(category.id))
        .unwrap();

    let solver = bot.member(PLAYER_ID, heap.id, &[role_id]);
    bot.run(&solver, Route::Mark(Marker::Blood)).await.unwrap();

    let err = bot.run(&member, chal("baby-heap")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(err.to_string(), "Channel `baby-heap` already exists.");

    let err = bot.run(&member, chal("  ")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Invalid);
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test]
async fn test_delete_asks_then_removes_everything() {
    let bot = TestBot::new();
    bot.create_ctf("demoCTF").await.unwrap();
    let (_, _, general) = bot.ctf_channels("demoCTF");
    let role_id = bot.repo.find_by_name("demoCTF").await.unwrap().role_id;
    bot.run(&bot.member(PLAYER_ID, general.id, &[role_id]), chal("web"))
        .await
        .unwrap();

    let admin = bot.admin(general.id);
    let prompt = bot.run(&admin, Route::Delete).await.unwrap();
    assert_eq!(prompt.message.buttons[0].custom_id, "delete/really");
    assert!(bot.repo.find_by_name("demoCTF").await.is_ok());

    let reply = bot.run(&admin, Route::DeleteConfirmed).await.unwrap();
    assert_eq!(reply.mode, ReplyMode::Update);

    assert!(bot.platform.roles().is_empty());
    assert_eq!(bot.platform.channels(), vec![bot.lobby.clone()]);
    assert!(bot
        .repo
        .find_by_name("demoCTF")
        .await
        .unwrap_err()
        .is_not_found());
}

#[tokio::test]
async fn test_delete_with_role_already_removed() {
    let bot = TestBot::new();
    bot.create_ctf("demoCTF").await.unwrap();
    let (_, _, general) = bot.ctf_channels("demoCTF");
    let role_id = bot.repo.find_by_name("demoCTF").await.unwrap().role_id;
    bot.platform.remove_role_out_of_band(role_id);

    let admin = bot.admin(general.id);
    bot.run(&admin, Route::DeleteConfirmed).await.unwrap();

    assert_eq!(bot.platform.channels(), vec![bot.lobby.clone()]);
    assert!(bot.repo.rows().is_empty());
}

#[tokio::test]
async fn test_delete_retry_after_partial_failure() {
    let bot = TestBot::new();
    bot.create_ctf("demoCTF").await.unwrap();
    let (category, _, general) = bot.ctf_channels("demoCTF");
    // Registration and general go, the category delete fails
    bot.platform.fail_at(bot.platform.call_count() + 3);

    let err = bot
        .run(&bot.admin(general.id), Route::DeleteConfirmed)
        .await
        .unwrap_err();
    assert!(err.is_internal());
    assert!(bot.repo.find_by_name("demoCTF").await.is_ok());

    // Any channel left under the category reaches the record again
    let leftover = bot.platform.seed_channel("leftover", Some(category.id));
    bot.run(&bot.admin(leftover.id), Route::DeleteConfirmed)
        .await
        .unwrap();

    assert!(bot.platform.roles().is_empty());
    assert_eq!(bot.platform.channels(), vec![bot.lobby.clone()]);
    assert!(bot.repo.rows().is_empty());
}

// ============================================================================
// End to end
// ============================================================================

#[tokio::test]
async fn test_full_lifecycle() {
    let bot = TestBot::new();
    bot.create_ctf("demoCTF").await.unwrap();
    let (category, registration, general) = bot.ctf_channels("demoCTF");
    let role_id = bot.repo.find_by_name("demoCTF").await.unwrap().role_id;

    bot.run(&bot.member(PLAYER_ID, registration.id, &[]), join("demoCTF"))
        .await
        .unwrap();
    let roles = bot.platform.member_roles(PLAYER_ID).unwrap();
    assert!(roles.contains(&role_id));

    let member = bot.member(PLAYER_ID, general.id, &roles);
    bot.run(&member, chal("rev-1")).await.unwrap();
    let rev = bot.platform.channel_named("rev-1", Some(category.id)).unwrap();

    bot.run(&bot.member(PLAYER_ID, rev.id, &roles), Route::Mark(Marker::Flag))
        .await
        .unwrap();
    bot.run(&bot.admin(general.id), Route::Close).await.unwrap();
    bot.run(&bot.admin(rev.id), Route::DeleteConfirmed)
        .await
        .unwrap();

    assert!(bot.repo.rows().is_empty());
    assert!(bot.platform.channels_in(category.id).is_empty());
}
