// tests/tracker_tests.rs

use std::time::Duration;

use blackjack_tracker::domain::{Chips, Decision, HandResult};
use blackjack_tracker::engine::{
    extract_observation, infer_decision, EmbedSnapshot, HandTracker, Observation, SnapshotOutcome,
};
use chrono::{TimeZone, Utc};

/// Утилита: наблюдение без разбора embed.
fn obs(bet: u64, cards: &[&str], total: u32, dealer: &str, result: Option<HandResult>) -> Observation {
    Observation {
        bet_amount: Chips(bet),
        player_cards: cards.iter().map(|c| c.to_string()).collect(),
        player_total: total,
        dealer_card: dealer.to_string(),
        result,
    }
}

// ----------------------
// infer_decision
// ----------------------

#[test]
fn total_increase_is_hit() {
    assert_eq!(infer_decision(15, Chips(100), 18, Chips(100)), Some(Decision::Hit));
}

#[test]
fn hit_takes_priority_over_bet_increase() {
    assert_eq!(infer_decision(11, Chips(100), 20, Chips(200)), Some(Decision::Hit));
}

#[test]
fn bet_increase_without_total_increase_is_double() {
    assert_eq!(infer_decision(11, Chips(100), 11, Chips(200)), Some(Decision::Double));
    assert_eq!(infer_decision(11, Chips(100), 5, Chips(200)), Some(Decision::Double));
}

#[test]
fn no_change_is_stand() {
    assert_eq!(infer_decision(17, Chips(100), 17, Chips(100)), Some(Decision::Stand));
}

#[test]
fn total_drop_without_bet_increase_is_ambiguous() {
    assert_eq!(infer_decision(17, Chips(100), 12, Chips(100)), None);
    assert_eq!(infer_decision(17, Chips(100), 12, Chips(50)), None);
}

// ----------------------
// HandTracker
// ----------------------

#[test]
fn first_sighting_opens_hand() {
    let mut tracker = HandTracker::new();
    let out = tracker.on_snapshot(42, 7, &obs(100, &["K♠", "5♦"], 15, "9♣", None));

    assert_eq!(out, SnapshotOutcome::Opened);
    let hand = tracker.active_hand(42).expect("hand is tracked");
    assert_eq!(hand.bet_amount, Chips(100));
    assert_eq!(hand.initial_hand.total, 15);
    assert_eq!(hand.last_total, 15);
    assert_eq!(hand.dealer_card, "9♣");
    assert_eq!(hand.guild_id, 7);
}

#[test]
fn end_to_end_hit_then_win() {
    let mut tracker = HandTracker::new();

    let first = EmbedSnapshot::from_pairs(
        "Blackjack",
        &[("Bet", "100"), ("Your Hand", "K♠ 5♦ total: 15"), ("Dealer", "9♣")],
    );
    let second = EmbedSnapshot::from_pairs(
        "Blackjack",
        &[
            ("Bet", "100"),
            ("Your Hand", "K♠ 5♦ 3♥ total: 18"),
            ("Dealer", "9♣"),
            ("Result", "You win!"),
        ],
    );

    let o1 = extract_observation(&first).unwrap();
    assert_eq!(tracker.on_snapshot(42, 1, &o1), SnapshotOutcome::Opened);

    let o2 = extract_observation(&second).unwrap();
    let record = match tracker.on_snapshot(42, 1, &o2) {
        SnapshotOutcome::Finalized(r) => r,
        other => panic!("expected finalized record, got {other:?}"),
    };

    assert_eq!(record.player_id, 42);
    assert_eq!(record.guild_id, 1);
    assert_eq!(record.decision, Decision::Hit);
    assert_eq!(record.initial_hand.total, 15);
    assert_eq!(record.initial_hand.cards, vec!["K♠", "5♦"]);
    assert_eq!(record.final_hand.total, 18);
    assert_eq!(record.final_hand.cards, vec!["K♠", "5♦", "3♥"]);
    assert_eq!(record.dealer_card, "9♣");
    assert_eq!(record.bet_amount, Chips(100));
    assert_eq!(record.result, HandResult::Win);

    assert!(!tracker.has_active_hand(42));
    assert_eq!(tracker.active_count(), 0);
}

#[test]
fn mid_hand_hit_updates_last_total_only() {
    let mut tracker = HandTracker::new();
    tracker.on_snapshot(1, 0, &obs(50, &["2♠", "3♦"], 5, "K♣", None));

    let out = tracker.on_snapshot(1, 0, &obs(50, &["2♠", "3♦", "9♥"], 14, "K♣", None));
    assert_eq!(out, SnapshotOutcome::Progressed(Decision::Hit));

    let hand = tracker.active_hand(1).unwrap();
    assert_eq!(hand.last_total, 14);
    // стартовая рука не меняется
    assert_eq!(hand.initial_hand.total, 5);
    assert_eq!(hand.initial_hand.cards.len(), 2);
}

#[test]
fn stand_then_terminal_finalizes_with_stand() {
    let mut tracker = HandTracker::new();
    tracker.on_snapshot(5, 0, &obs(100, &["K♠", "8♦"], 18, "7♣", None));

    let out = tracker.on_snapshot(5, 0, &obs(100, &["K♠", "8♦"], 18, "7♣", Some(HandResult::Tie)));
    match out {
        SnapshotOutcome::Finalized(r) => {
            assert_eq!(r.decision, Decision::Stand);
            assert_eq!(r.result, HandResult::Tie);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn double_is_inferred_from_bet_increase() {
    let mut tracker = HandTracker::new();
    tracker.on_snapshot(9, 0, &obs(100, &["6♠", "5♦"], 11, "6♣", None));

    // сумма не изменилась (карта после удвоения закрыта), ставка выросла
    let out = tracker.on_snapshot(9, 0, &obs(200, &["6♠", "5♦"], 11, "6♣", Some(HandResult::Lose)));
    match out {
        SnapshotOutcome::Finalized(r) => {
            assert_eq!(r.decision, Decision::Double);
            // ставка записи – ставка открытия руки
            assert_eq!(r.bet_amount, Chips(100));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn ambiguous_transition_leaves_hand_unchanged() {
    let mut tracker = HandTracker::new();
    tracker.on_snapshot(3, 0, &obs(100, &["K♠", "7♦"], 17, "9♣", None));
    let before = tracker.active_hand(3).cloned().unwrap();

    let out = tracker.on_snapshot(3, 0, &obs(100, &["K♠", "2♦"], 12, "9♣", Some(HandResult::Lose)));
    assert_eq!(out, SnapshotOutcome::Ignored);
    assert_eq!(tracker.active_hand(3), Some(&before));
}

#[test]
fn terminal_snapshot_for_unknown_player_opens_hand_without_record() {
    let mut tracker = HandTracker::new();
    let out = tracker.on_snapshot(8, 0, &obs(100, &["K♠", "9♦"], 19, "5♣", Some(HandResult::Win)));

    assert_eq!(out, SnapshotOutcome::Opened);
    assert!(tracker.has_active_hand(8));
}

#[test]
fn replayed_terminal_snapshot_after_finalize_is_fresh_sighting() {
    let mut tracker = HandTracker::new();
    let terminal = obs(100, &["K♠", "5♦", "3♥"], 18, "9♣", Some(HandResult::Win));

    tracker.on_snapshot(42, 0, &obs(100, &["K♠", "5♦"], 15, "9♣", None));
    assert!(matches!(
        tracker.on_snapshot(42, 0, &terminal),
        SnapshotOutcome::Finalized(_)
    ));

    // тот же финальный снапшот ещё раз: новая рука, без записи
    assert_eq!(tracker.on_snapshot(42, 0, &terminal), SnapshotOutcome::Opened);
    assert_eq!(tracker.active_hand(42).unwrap().last_total, 18);
}

#[test]
fn hands_are_tracked_per_player() {
    let mut tracker = HandTracker::new();
    tracker.on_snapshot(1, 0, &obs(10, &["K♠", "5♦"], 15, "9♣", None));
    tracker.on_snapshot(2, 0, &obs(20, &["A♠", "5♦"], 16, "6♣", None));
    assert_eq!(tracker.active_count(), 2);

    let out = tracker.on_snapshot(2, 0, &obs(20, &["A♠", "5♦"], 16, "6♣", Some(HandResult::Win)));
    assert!(matches!(out, SnapshotOutcome::Finalized(ref r) if r.player_id == 2));

    assert!(tracker.has_active_hand(1));
    assert!(!tracker.has_active_hand(2));
}

#[test]
fn text_decisions_are_recognized_but_do_not_mutate_totals() {
    let mut tracker = HandTracker::new();
    tracker.on_snapshot(4, 0, &obs(100, &["K♠", "5♦"], 15, "9♣", None));

    assert_eq!(tracker.on_text_decision(4, "Hit"), Some(Decision::Hit));
    assert_eq!(tracker.on_text_decision(4, "DOUBLE DOWN"), Some(Decision::Double));
    assert_eq!(tracker.on_text_decision(4, "double"), Some(Decision::Double));
    assert_eq!(tracker.on_text_decision(4, "stand"), Some(Decision::Stand));
    assert_eq!(tracker.on_text_decision(4, "I will hit now"), None);

    let hand = tracker.active_hand(4).unwrap();
    assert_eq!(hand.last_total, 15);
    assert_eq!(hand.announced, Some(Decision::Stand));

    // без активной руки решение всё равно распознаётся
    assert_eq!(tracker.on_text_decision(99, "hit"), Some(Decision::Hit));
    assert!(!tracker.has_active_hand(99));
}

#[test]
fn announced_decision_never_overrides_inferred_one() {
    let mut tracker = HandTracker::new();
    tracker.on_snapshot(4, 0, &obs(100, &["K♠", "5♦"], 15, "9♣", None));
    tracker.on_text_decision(4, "stand");

    let out = tracker.on_snapshot(4, 0, &obs(100, &["K♠", "5♦", "2♠"], 17, "9♣", Some(HandResult::Lose)));
    match out {
        SnapshotOutcome::Finalized(r) => assert_eq!(r.decision, Decision::Hit),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn game_command_grammar() {
    assert!(HandTracker::is_game_command(".bj"));
    assert!(HandTracker::is_game_command(".BJ 500"));
    assert!(HandTracker::is_game_command(".blackjack all"));
    assert!(HandTracker::is_game_command(".Blackjack   250"));
    assert!(!HandTracker::is_game_command("bj 100"));
    assert!(!HandTracker::is_game_command("hey .bj"));
    assert!(!HandTracker::is_game_command(".roulette 100"));
}

// ----------------------
// устаревание рук
// ----------------------

#[test]
fn stale_hand_is_replaced_by_fresh_sighting() {
    let mut tracker = HandTracker::with_stale_after(Duration::from_secs(600));
    let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let later = t0 + chrono::Duration::minutes(30);

    tracker.on_snapshot_at(1, 0, &obs(100, &["K♠", "5♦"], 15, "9♣", None), t0);

    let out = tracker.on_snapshot_at(
        1,
        0,
        &obs(100, &["K♠", "5♦", "3♥"], 18, "9♣", Some(HandResult::Win)),
        later,
    );
    assert_eq!(out, SnapshotOutcome::Opened);
    assert_eq!(tracker.active_hand(1).unwrap().started_at, later);
}

#[test]
fn fresh_hand_is_not_stale() {
    let mut tracker = HandTracker::with_stale_after(Duration::from_secs(600));
    let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

    tracker.on_snapshot_at(1, 0, &obs(100, &["K♠", "5♦"], 15, "9♣", None), t0);
    let out = tracker.on_snapshot_at(
        1,
        0,
        &obs(100, &["K♠", "5♦", "3♥"], 18, "9♣", Some(HandResult::Win)),
        t0 + chrono::Duration::minutes(2),
    );
    match out {
        SnapshotOutcome::Finalized(r) => assert_eq!(r.timestamp, t0 + chrono::Duration::minutes(2)),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn progress_keeps_hand_alive_past_timeout() {
    let mut tracker = HandTracker::with_stale_after(Duration::from_secs(60));
    let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

    tracker.on_snapshot_at(1, 0, &obs(100, &["7♠", "5♦"], 12, "9♣", None), t0);

    let out = tracker.on_snapshot_at(
        1,
        0,
        &obs(100, &["7♠", "5♦", "3♥"], 15, "9♣", None),
        t0 + chrono::Duration::seconds(50),
    );
    assert_eq!(out, SnapshotOutcome::Progressed(Decision::Hit));

    let hand = tracker.active_hand(1).unwrap();
    assert_eq!(hand.started_at, t0);
    assert_eq!(hand.last_seen, t0 + chrono::Duration::seconds(50));

    // 70с от начала, но всего 20с с последнего обновления
    let out = tracker.on_snapshot_at(
        1,
        0,
        &obs(100, &["7♠", "5♦", "3♥", "4♣"], 19, "9♣", Some(HandResult::Win)),
        t0 + chrono::Duration::seconds(70),
    );
    match out {
        SnapshotOutcome::Finalized(r) => {
            assert_eq!(r.decision, Decision::Hit);
            assert_eq!(r.initial_hand.total, 12);
            assert_eq!(r.final_hand.total, 19);
        }
        other => panic!("unexpected {other:?}"),
    }

    // prune тоже смотрит на последнее обновление
    tracker.on_snapshot_at(2, 0, &obs(10, &["K♠", "2♦"], 12, "9♣", None), t0);
    tracker.on_snapshot_at(
        2,
        0,
        &obs(10, &["K♠", "2♦", "2♣"], 14, "9♣", None),
        t0 + chrono::Duration::seconds(50),
    );
    assert_eq!(tracker.prune_stale(t0 + chrono::Duration::seconds(100)), 0);
    assert_eq!(tracker.prune_stale(t0 + chrono::Duration::seconds(111)), 1);
}

#[test]
fn prune_stale_evicts_only_old_hands() {
    let mut tracker = HandTracker::with_stale_after(Duration::from_secs(60));
    let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

    tracker.on_snapshot_at(1, 0, &obs(10, &["K♠", "5♦"], 15, "9♣", None), t0);
    tracker.on_snapshot_at(2, 0, &obs(10, &["K♠", "6♦"], 16, "9♣", None), t0 + chrono::Duration::seconds(90));

    let removed = tracker.prune_stale(t0 + chrono::Duration::seconds(100));
    assert_eq!(removed, 1);
    assert!(!tracker.has_active_hand(1));
    assert!(tracker.has_active_hand(2));
}

#[test]
fn tracker_without_timeout_never_prunes() {
    let mut tracker = HandTracker::new();
    let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    tracker.on_snapshot_at(1, 0, &obs(10, &["K♠", "5♦"], 15, "9♣", None), t0);

    assert_eq!(tracker.prune_stale(t0 + chrono::Duration::days(30)), 0);
    assert_eq!(tracker.stale_after(), None);
    assert!(tracker.has_active_hand(1));
}
