//! End-to-end scenarios over the interaction and notification fabric
//!
//! Every test runs the real services, fan-out coordinator, push
//! dispatcher, and connection registry over in-memory repositories.

use std::time::Duration;

use integration_tests::fixtures::{assert_no_push, next_push};
use integration_tests::TestFabric;

use forum_core::entities::{NotificationKind, TeamRole, TOMBSTONE_CONTENT};
use forum_core::{Snowflake, Topic, VotableKind, VoteDirection, VoteState};
use forum_service::dto::{
    CreateCommentRequest, NotificationListParams, ReplyListParams, VoteRequest,
};
use forum_service::{MembershipService, NotificationService, ThreadService, VoteService};

const ALICE: Snowflake = Snowflake::new(1);
const BOB: Snowflake = Snowflake::new(2);
const CAROL: Snowflake = Snowflake::new(3);

fn up() -> VoteRequest {
    VoteRequest {
        direction: VoteDirection::Up,
    }
}

fn down() -> VoteRequest {
    VoteRequest {
        direction: VoteDirection::Down,
    }
}

fn comment(content: &str) -> CreateCommentRequest {
    CreateCommentRequest {
        content: content.to_string(),
        parent_comment_id: None,
    }
}

fn reply(content: &str, parent: Snowflake) -> CreateCommentRequest {
    CreateCommentRequest {
        content: content.to_string(),
        parent_comment_id: Some(parent.to_string()),
    }
}

// ============================================================================
// Score Ledger
// ============================================================================

#[tokio::test]
async fn vote_toggle_sequence_matches_ledger_semantics() {
    let fabric = TestFabric::new();
    let post = fabric.seed_post(ALICE, "Lifetimes explained").await;
    let votes = VoteService::new(&fabric.ctx);

    // Fresh upvote
    let result = votes
        .apply_vote(VotableKind::Post, post.id, BOB, up())
        .await
        .unwrap();
    assert_eq!(result.score, 1);
    assert_eq!(result.vote_state, VoteState::Up);

    // Switching sides never leaves the actor in both sets
    let result = votes
        .apply_vote(VotableKind::Post, post.id, BOB, down())
        .await
        .unwrap();
    assert_eq!(result.score, -1);
    assert_eq!(result.vote_state, VoteState::Down);

    let stored = fabric.posts.get(post.id).await.unwrap();
    assert!(!stored.votes.upvoters.contains(&BOB));
    assert!(stored.votes.downvoters.contains(&BOB));

    // Same direction again toggles the vote off
    let result = votes
        .apply_vote(VotableKind::Post, post.id, BOB, down())
        .await
        .unwrap();
    assert_eq!(result.score, 0);
    assert_eq!(result.vote_state, VoteState::None);

    let stored = fabric.posts.get(post.id).await.unwrap();
    assert!(stored.votes.upvoters.is_empty());
    assert!(stored.votes.downvoters.is_empty());
}

#[tokio::test]
async fn upvote_toggle_off_restores_original_score() {
    let fabric = TestFabric::new();
    let post = fabric.seed_post(ALICE, "Pin explained").await;
    let votes = VoteService::new(&fabric.ctx);

    votes
        .apply_vote(VotableKind::Post, post.id, BOB, up())
        .await
        .unwrap();
    let result = votes
        .apply_vote(VotableKind::Post, post.id, BOB, up())
        .await
        .unwrap();

    assert_eq!(result.score, 0);
    assert_eq!(result.vote_state, VoteState::None);
}

#[tokio::test]
async fn vote_on_missing_post_is_not_found() {
    let fabric = TestFabric::new();
    let votes = VoteService::new(&fabric.ctx);

    let err = votes
        .apply_vote(VotableKind::Post, Snowflake::new(999), BOB, up())
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "NOT_FOUND");
}

#[tokio::test]
async fn concurrent_votes_on_one_post_all_land() {
    let fabric = TestFabric::new();
    let post = fabric.seed_post(ALICE, "Atomics in practice").await;

    let mut handles = Vec::new();
    for actor in 10..30 {
        let ctx = fabric.ctx.clone();
        let post_id = post.id;
        handles.push(tokio::spawn(async move {
            VoteService::new(&ctx)
                .apply_vote(VotableKind::Post, post_id, Snowflake::new(actor), up())
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let stored = fabric.posts.get(post.id).await.unwrap();
    assert_eq!(stored.score(), 20);
}

#[tokio::test]
async fn held_entity_lock_turns_into_conflict() {
    let fabric = TestFabric::with_lock_wait(Duration::from_millis(50));
    let post = fabric.seed_post(ALICE, "Deadlocks").await;

    let _guard = fabric
        .ctx
        .locks()
        .acquire(&format!("post:{}", post.id))
        .await
        .unwrap();

    let err = VoteService::new(&fabric.ctx)
        .apply_vote(VotableKind::Post, post.id, BOB, up())
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "CONFLICT");
}

// ============================================================================
// Thread Store
// ============================================================================

#[tokio::test]
async fn reply_on_foreign_post_is_invalid_reference() {
    let fabric = TestFabric::new();
    let post_a = fabric.seed_post(ALICE, "First post").await;
    let post_b = fabric.seed_post(BOB, "Second post").await;
    let threads = ThreadService::new(&fabric.ctx);

    let parent = threads
        .create_comment(post_a.id, BOB, comment("On the first post"))
        .await
        .unwrap();

    let err = threads
        .create_comment(
            post_b.id,
            CAROL,
            reply("Wrong thread", Snowflake::parse(&parent.id).unwrap()),
        )
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "INVALID_REFERENCE");

    // Nothing was silently reparented
    assert_eq!(fabric.comments.len().await, 1);
}

#[tokio::test]
async fn soft_delete_requires_the_author() {
    let fabric = TestFabric::new();
    let post = fabric.seed_post(ALICE, "Moderation").await;
    let threads = ThreadService::new(&fabric.ctx);

    let created = threads
        .create_comment(post.id, BOB, comment("My take"))
        .await
        .unwrap();
    let comment_id = Snowflake::parse(&created.id).unwrap();

    let err = threads.delete_comment(comment_id, CAROL).await.unwrap_err();
    assert_eq!(err.error_code(), "NOT_AUTHORIZED");

    let stored = fabric.comments.get(comment_id).await.unwrap();
    assert!(!stored.is_deleted);
}

#[tokio::test]
async fn deleted_reply_stays_listed_while_it_anchors_descendants() {
    let fabric = TestFabric::new();
    let post = fabric.seed_post(ALICE, "Threading").await;
    let threads = ThreadService::new(&fabric.ctx);

    let top = threads
        .create_comment(post.id, ALICE, comment("Top level"))
        .await
        .unwrap();
    let top_id = Snowflake::parse(&top.id).unwrap();

    let branch = threads
        .create_comment(post.id, BOB, reply("Disagree", top_id))
        .await
        .unwrap();
    let branch_id = Snowflake::parse(&branch.id).unwrap();

    let leaf = threads
        .create_comment(post.id, CAROL, reply("Agree", top_id))
        .await
        .unwrap();
    let leaf_id = Snowflake::parse(&leaf.id).unwrap();

    threads
        .create_comment(post.id, CAROL, reply("Why though?", branch_id))
        .await
        .unwrap();

    // The branch has a child: tombstoned but still listed
    threads.delete_comment(branch_id, BOB).await.unwrap();
    let page = threads
        .list_replies(top_id, ReplyListParams::default())
        .await
        .unwrap();
    assert_eq!(page.total, 2);
    let tombstone = page.data.iter().find(|c| c.id == branch.id).unwrap();
    assert!(tombstone.is_deleted);
    assert_eq!(tombstone.content, TOMBSTONE_CONTENT);

    // The leaf has no children: it vanishes from the listing
    threads.delete_comment(leaf_id, CAROL).await.unwrap();
    let page = threads
        .list_replies(top_id, ReplyListParams::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert!(page.data.iter().all(|c| c.id != leaf.id));
}

#[tokio::test]
async fn replies_order_by_score_then_creation_time() {
    let fabric = TestFabric::new();
    let post = fabric.seed_post(ALICE, "Sorting").await;
    let threads = ThreadService::new(&fabric.ctx);
    let votes = VoteService::new(&fabric.ctx);

    let top = threads
        .create_comment(post.id, ALICE, comment("Sort these"))
        .await
        .unwrap();
    let top_id = Snowflake::parse(&top.id).unwrap();

    let mut reply_ids = Vec::new();
    for text in ["first", "second", "third"] {
        let created = threads
            .create_comment(post.id, BOB, reply(text, top_id))
            .await
            .unwrap();
        reply_ids.push(Snowflake::parse(&created.id).unwrap());
    }

    // second: +2, third: +1, first: 0
    for actor in [CAROL, Snowflake::new(4)] {
        votes
            .apply_vote(VotableKind::Comment, reply_ids[1], actor, up())
            .await
            .unwrap();
    }
    votes
        .apply_vote(VotableKind::Comment, reply_ids[2], CAROL, up())
        .await
        .unwrap();

    let page = threads
        .list_replies(top_id, ReplyListParams::default())
        .await
        .unwrap();
    let listed: Vec<&str> = page.data.iter().map(|c| c.content.as_str()).collect();
    assert_eq!(listed, vec!["second", "third", "first"]);
}

#[tokio::test]
async fn reply_listing_paginates_deterministically() {
    let fabric = TestFabric::new();
    let post = fabric.seed_post(ALICE, "Pages").await;
    let threads = ThreadService::new(&fabric.ctx);

    let top = threads
        .create_comment(post.id, ALICE, comment("Root"))
        .await
        .unwrap();
    let top_id = Snowflake::parse(&top.id).unwrap();

    for n in 0..5 {
        threads
            .create_comment(post.id, BOB, reply(&format!("reply {n}"), top_id))
            .await
            .unwrap();
    }

    let first = threads
        .list_replies(
            top_id,
            ReplyListParams {
                page: Some(1),
                limit: Some(2),
            },
        )
        .await
        .unwrap();
    let second = threads
        .list_replies(
            top_id,
            ReplyListParams {
                page: Some(2),
                limit: Some(2),
            },
        )
        .await
        .unwrap();

    assert_eq!(first.total, 5);
    assert_eq!(first.data.len(), 2);
    assert_eq!(second.data.len(), 2);

    // Equal scores fall back to creation order, so pages never overlap
    let first_ids: Vec<&str> = first.data.iter().map(|c| c.id.as_str()).collect();
    assert!(second.data.iter().all(|c| !first_ids.contains(&c.id.as_str())));
    assert_eq!(first.data[0].content, "reply 0");
    assert_eq!(second.data[0].content, "reply 2");
}

// ============================================================================
// Membership Registry
// ============================================================================

#[tokio::test]
async fn full_team_rejects_join_and_keeps_members() {
    let fabric = TestFabric::new();
    let team = fabric.seed_team(ALICE, "pair", 2, true).await;
    let membership = MembershipService::new(&fabric.ctx);

    membership.join_team(team.id, BOB).await.unwrap();

    let err = membership.join_team(team.id, CAROL).await.unwrap_err();
    assert_eq!(err.error_code(), "TEAM_FULL");

    let stored = fabric.teams.get(team.id).await.unwrap();
    assert_eq!(stored.member_count(), 2);
    assert!(stored.is_member(ALICE));
    assert!(stored.is_member(BOB));
}

#[tokio::test]
async fn membership_rule_violations_map_to_error_kinds() {
    let fabric = TestFabric::new();
    let open_team = fabric.seed_team(ALICE, "open", 8, true).await;
    let closed_team = fabric.seed_team(ALICE, "invite-only", 8, false).await;
    let membership = MembershipService::new(&fabric.ctx);

    membership.join_team(open_team.id, BOB).await.unwrap();
    let err = membership.join_team(open_team.id, BOB).await.unwrap_err();
    assert_eq!(err.error_code(), "ALREADY_MEMBER");

    let err = membership.join_team(closed_team.id, BOB).await.unwrap_err();
    assert_eq!(err.error_code(), "TEAM_CLOSED");

    let err = membership.leave_team(open_team.id, CAROL).await.unwrap_err();
    assert_eq!(err.error_code(), "NOT_MEMBER");

    // Creator is pinned while others remain
    let err = membership.leave_team(open_team.id, ALICE).await.unwrap_err();
    assert_eq!(err.error_code(), "CREATOR_MUST_TRANSFER");
}

#[tokio::test]
async fn creator_leaving_last_empties_the_team() {
    let fabric = TestFabric::new();
    let team = fabric.seed_team(ALICE, "ephemeral", 4, true).await;
    let membership = MembershipService::new(&fabric.ctx);

    membership.join_team(team.id, BOB).await.unwrap();

    let result = membership.leave_team(team.id, BOB).await.unwrap();
    assert!(!result.team_now_empty);

    let result = membership.leave_team(team.id, ALICE).await.unwrap();
    assert!(result.team_now_empty);

    let stored = fabric.teams.get(team.id).await.unwrap();
    assert!(stored.is_empty());
}

#[tokio::test]
async fn join_records_member_role_and_join_time() {
    let fabric = TestFabric::new();
    let team = fabric.seed_team(ALICE, "rustaceans", 4, true).await;
    let membership = MembershipService::new(&fabric.ctx);

    let result = membership.join_team(team.id, BOB).await.unwrap();
    assert_eq!(result.role.as_deref(), Some("member"));

    let stored = fabric.teams.get(team.id).await.unwrap();
    let creator = stored.member(ALICE).unwrap();
    let joiner = stored.member(BOB).unwrap();
    assert_eq!(creator.role, TeamRole::Admin);
    assert_eq!(joiner.role, TeamRole::Member);
    assert!(joiner.joined_at >= creator.joined_at);
}

// ============================================================================
// Notification Journal
// ============================================================================

#[tokio::test]
async fn self_vote_creates_no_notification() {
    let fabric = TestFabric::new();
    let post = fabric.seed_post(ALICE, "Self promotion").await;

    VoteService::new(&fabric.ctx)
        .apply_vote(VotableKind::Post, post.id, ALICE, up())
        .await
        .unwrap();

    tokio::task::yield_now().await;
    assert!(fabric.notifications.is_empty().await);
}

#[tokio::test]
async fn mark_read_is_recipient_only() {
    let fabric = TestFabric::new();
    let post = fabric.seed_post(ALICE, "Ownership").await;

    VoteService::new(&fabric.ctx)
        .apply_vote(VotableKind::Post, post.id, BOB, up())
        .await
        .unwrap();

    let notifications = NotificationService::new(&fabric.ctx);
    let page = notifications
        .list_for_recipient(ALICE, NotificationListParams::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.unread, 1);
    let record_id = Snowflake::parse(&page.data[0].id).unwrap();

    // Only the recipient may flip the read flag
    let err = notifications.mark_read(record_id, BOB).await.unwrap_err();
    assert_eq!(err.error_code(), "NOT_AUTHORIZED");

    let marked = notifications.mark_read(record_id, ALICE).await.unwrap();
    assert!(marked.read);
    assert!(marked.read_at.is_some());

    assert_eq!(notifications.unread_count(ALICE).await.unwrap(), 0);
}

#[tokio::test]
async fn unread_filter_and_mark_all_read() {
    let fabric = TestFabric::new();
    let post = fabric.seed_post(ALICE, "Badges").await;
    let votes = VoteService::new(&fabric.ctx);
    let threads = ThreadService::new(&fabric.ctx);

    votes
        .apply_vote(VotableKind::Post, post.id, BOB, up())
        .await
        .unwrap();
    threads
        .create_comment(post.id, CAROL, comment("Nice one"))
        .await
        .unwrap();

    let notifications = NotificationService::new(&fabric.ctx);
    let unread = notifications
        .list_for_recipient(
            ALICE,
            NotificationListParams {
                unread_only: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(unread.data.len(), 2);
    // Newest first
    assert_eq!(unread.data[0].kind, "post_comment");
    assert_eq!(unread.data[1].kind, "post_upvote");

    let result = notifications.mark_all_read(ALICE).await.unwrap();
    assert_eq!(result.updated, 2);

    let unread = notifications
        .list_for_recipient(
            ALICE,
            NotificationListParams {
                unread_only: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(unread.data.is_empty());
    assert_eq!(unread.total, 2);
    assert_eq!(unread.unread, 0);
}

#[tokio::test]
async fn journal_outage_never_blocks_the_mutation_or_pushes() {
    let fabric = TestFabric::new();
    let post = fabric.seed_post(ALICE, "Durability").await;
    fabric.notifications.fail_writes(true);

    let mut alice_rx = fabric.connect("conn-alice", ALICE);
    fabric.subscribe("conn-alice", Topic::user(ALICE)).await;

    let result = VoteService::new(&fabric.ctx)
        .apply_vote(VotableKind::Post, post.id, BOB, up())
        .await
        .unwrap();
    assert_eq!(result.score, 1);

    // The push still arrives even though the journal write failed
    let push = next_push(&mut alice_rx).await;
    assert_eq!(push.kind, "score_changed");
    assert!(fabric.notifications.is_empty().await);
}

// ============================================================================
// Presence & fan-out
// ============================================================================

#[tokio::test]
async fn upvote_reaches_live_author_and_the_journal() {
    let fabric = TestFabric::new();
    let post = fabric.seed_post(ALICE, "Borrow checker tips").await;

    let mut alice_rx = fabric.connect("conn-alice", ALICE);
    fabric.subscribe("conn-alice", Topic::user(ALICE)).await;
    assert!(fabric.registry.is_online(ALICE));

    let result = VoteService::new(&fabric.ctx)
        .apply_vote(VotableKind::Post, post.id, BOB, up())
        .await
        .unwrap();
    assert_eq!(result.score, 1);
    assert_eq!(result.vote_state, VoteState::Up);

    let push = next_push(&mut alice_rx).await;
    assert_eq!(push.kind, "score_changed");
    assert_eq!(push.topic, Topic::user(ALICE));
    assert_eq!(push.payload["score"], 1);

    let page = NotificationService::new(&fabric.ctx)
        .list_for_recipient(
            ALICE,
            NotificationListParams {
                unread_only: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].kind, "post_upvote");
    assert_eq!(page.data[0].sender_id, BOB.to_string());
    assert!(!page.data[0].read);
}

#[tokio::test]
async fn offline_author_still_gets_the_durable_record() {
    let fabric = TestFabric::new();
    let post = fabric.seed_post(ALICE, "Async traits").await;
    assert!(!fabric.registry.is_online(ALICE));

    VoteService::new(&fabric.ctx)
        .apply_vote(VotableKind::Post, post.id, BOB, up())
        .await
        .unwrap();

    let page = NotificationService::new(&fabric.ctx)
        .list_for_recipient(
            ALICE,
            NotificationListParams {
                unread_only: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].kind, "post_upvote");
}

#[tokio::test]
async fn topic_isolation_holds_across_connection_close() {
    let fabric = TestFabric::new();
    let post_one = fabric.seed_post(ALICE, "Post one").await;
    let post_two = fabric.seed_post(ALICE, "Post two").await;
    let votes = VoteService::new(&fabric.ctx);

    let mut bob_rx = fabric.connect("conn-bob", BOB);
    let mut carol_rx = fabric.connect("conn-carol", CAROL);
    fabric.subscribe("conn-bob", Topic::post(post_one.id)).await;
    fabric
        .subscribe("conn-carol", Topic::post(post_two.id))
        .await;

    // A publish to post two never reaches the post-one subscriber
    votes
        .apply_vote(VotableKind::Post, post_two.id, CAROL, up())
        .await
        .unwrap();
    let push = next_push(&mut carol_rx).await;
    assert_eq!(push.topic, Topic::post(post_two.id));
    assert_no_push(&mut bob_rx).await;

    // Closing Bob's connection leaves Carol's subscription intact
    fabric.registry.remove_connection("conn-bob").await;
    votes
        .apply_vote(VotableKind::Post, post_two.id, BOB, up())
        .await
        .unwrap();
    let push = next_push(&mut carol_rx).await;
    assert_eq!(push.topic, Topic::post(post_two.id));
    assert_eq!(push.payload["score"], 2);
}

#[tokio::test]
async fn reply_fans_out_to_parent_author_and_post_author() {
    let fabric = TestFabric::new();
    let post = fabric.seed_post(ALICE, "Threads").await;
    let threads = ThreadService::new(&fabric.ctx);

    let parent = threads
        .create_comment(post.id, BOB, comment("Original comment"))
        .await
        .unwrap();
    let parent_id = Snowflake::parse(&parent.id).unwrap();

    let mut alice_rx = fabric.connect("conn-alice", ALICE);
    let mut bob_rx = fabric.connect("conn-bob", BOB);
    fabric.subscribe("conn-alice", Topic::user(ALICE)).await;
    fabric.subscribe("conn-bob", Topic::user(BOB)).await;

    threads
        .create_comment(post.id, CAROL, reply("Replying", parent_id))
        .await
        .unwrap();

    // Live pushes to both personal topics
    assert_eq!(next_push(&mut alice_rx).await.kind, "comment_created");
    assert_eq!(next_push(&mut bob_rx).await.kind, "comment_created");

    // Durable records: reply to the parent author, comment to the post author
    let notifications = NotificationService::new(&fabric.ctx);
    let bob_page = notifications
        .list_for_recipient(BOB, NotificationListParams::default())
        .await
        .unwrap();
    assert_eq!(bob_page.data.len(), 1);
    assert_eq!(bob_page.data[0].kind, "comment_reply");

    let alice_page = notifications
        .list_for_recipient(ALICE, NotificationListParams::default())
        .await
        .unwrap();
    // The earlier top-level comment by Bob also notified Alice
    assert_eq!(alice_page.data.len(), 2);
    assert_eq!(alice_page.data[0].kind, "post_comment");
}

#[tokio::test]
async fn team_join_notifies_creator_and_team_topic() {
    let fabric = TestFabric::new();
    let team = fabric.seed_team(ALICE, "gophers anonymous", 8, true).await;

    let mut alice_rx = fabric.connect("conn-alice", ALICE);
    let mut carol_rx = fabric.connect("conn-carol", CAROL);
    fabric.subscribe("conn-alice", Topic::user(ALICE)).await;
    fabric.subscribe("conn-carol", Topic::team(team.id)).await;

    MembershipService::new(&fabric.ctx)
        .join_team(team.id, BOB)
        .await
        .unwrap();

    let team_push = next_push(&mut carol_rx).await;
    assert_eq!(team_push.kind, "member_joined");
    assert_eq!(team_push.topic, Topic::team(team.id));

    let personal_push = next_push(&mut alice_rx).await;
    assert_eq!(personal_push.topic, Topic::user(ALICE));

    let page = NotificationService::new(&fabric.ctx)
        .list_for_recipient(ALICE, NotificationListParams::default())
        .await
        .unwrap();
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].kind, NotificationKind::TeamJoin.as_str());
    assert_eq!(page.data[0].team_id, Some(team.id.to_string()));
}
