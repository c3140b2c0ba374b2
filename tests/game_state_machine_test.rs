//! Game state machine behavior: jump debounce, duck priority, pausing, scoring, game over


use face_runner::{
    character::{Hitbox, Posture},
    game::{ControlMode, GameEvent, GamePhase, GameSettings, GameStateMachine, PauseReason},
    gesture::SignalState,
};
use rand::{rngs::StdRng, SeedableRng};
use std::time::{Duration, Instant};
use test_helpers::*;

#[test]
fn test_jump_on_rising_edge_only() {
    let t0 = Instant::now();
    let (mut game, t) = running_machine(GameSettings::default(), t0);

    let events = game.tick(t + ms(10), true, mouth_open());
    assert_eq!(jumps(&events), 1);
    assert!(events.contains(&GameEvent::Jumped { velocity: -650.0 }));
    assert_eq!(game.character().posture(), Posture::Jumping);

    // Holding the mouth open never jumps again
    game.tick(t + ms(20), false, mouth_open());
    let events = game.tick(t + ms(400), true, mouth_open());
    assert!(events.contains(&GameEvent::Landed));
    assert_eq!(jumps(&events), 0);
    let events = game.tick(t + ms(500), true, mouth_open());
    assert_eq!(jumps(&events), 0);
}

#[test]
fn test_jump_debounce_window() {
    let t0 = Instant::now();
    let (mut game, t) = running_machine(GameSettings::default(), t0);

    assert_eq!(jumps(&game.tick(t + ms(10), true, mouth_open())), 1);
    assert_eq!(game.character().jump_lock_expiry(), Some(t + ms(160)));
    game.tick(t + ms(20), false, idle());

    // Landed and a fresh edge, but still inside the 150 ms lock
    let events = game.tick(t + ms(100), true, mouth_open());
    assert!(events.contains(&GameEvent::Landed));
    assert_eq!(jumps(&events), 0);

    game.tick(t + ms(200), true, idle());
    let events = game.tick(t + ms(220), true, mouth_open());
    assert_eq!(jumps(&events), 1);
}

#[test]
fn test_no_jump_while_airborne() {
    let t0 = Instant::now();
    let (mut game, t) = running_machine(GameSettings::default(), t0);

    game.tick(t + ms(10), false, idle());
    let events = game.tick(t + ms(20), false, mouth_open());
    assert_eq!(jumps(&events), 0);
    assert!(!game.jump(t + ms(30), false));
}

#[test]
fn test_duck_takes_priority_over_jump() {
    let t0 = Instant::now();
    let (mut game, t) = running_machine(GameSettings::default(), t0);

    // Eyes close and mouth opens on the same tick
    let events = game.tick(t + ms(10), true, eyes_closed(SignalState::Open));
    assert!(events.contains(&GameEvent::DuckStarted));
    assert_eq!(jumps(&events), 0);
    assert!(game.character().is_ducking());
    assert_eq!(game.character().hitbox(), Hitbox::DUCKING);

    // The suppressed edge does not fire once the duck ends
    let events = game.tick(t + ms(20), true, mouth_open());
    assert!(events.contains(&GameEvent::DuckEnded));
    assert_eq!(jumps(&events), 0);
    assert_eq!(game.character().posture(), Posture::Running);
    assert_eq!(game.character().hitbox(), Hitbox::STANDING);
}

#[test]
fn test_duck_requires_ground() {
    let t0 = Instant::now();
    let (mut game, t) = running_machine(GameSettings::default(), t0);

    assert_eq!(jumps(&game.tick(t + ms(10), true, mouth_open())), 1);
    let events = game.tick(t + ms(20), false, eyes_closed(SignalState::Closed));
    assert!(!has_event(&events, |e| matches!(e, GameEvent::DuckStarted)));
    assert_eq!(game.character().posture(), Posture::Jumping);
}

#[test]
fn test_leaving_ground_ends_duck() {
    let t0 = Instant::now();
    let (mut game, t) = running_machine(GameSettings::default(), t0);

    game.tick(t + ms(10), true, eyes_closed(SignalState::Closed));
    assert!(game.character().is_ducking());

    let events = game.tick(t + ms(20), false, eyes_closed(SignalState::Closed));
    assert!(events.contains(&GameEvent::DuckEnded));
    assert_eq!(game.character().posture(), Posture::Jumping);

    let events = game.tick(t + ms(30), true, idle());
    assert!(events.contains(&GameEvent::Landed));
    assert_eq!(game.character().posture(), Posture::Running);
}

#[test]
fn test_score_cadence() {
    let t0 = Instant::now();
    let (mut game, t) = running_machine(GameSettings::default(), t0);
    assert_eq!(game.score(), 0);

    game.tick(t + ms(1000), true, idle());
    assert_eq!(game.score(), 10);
    game.tick(t + ms(1050), true, idle());
    assert_eq!(game.score(), 10);
    game.tick(t + ms(1100), true, idle());
    assert_eq!(game.score(), 11);
    assert_eq!(game.score_remaining(t + ms(1100)), Some(ms(100)));
}

#[test]
fn test_face_loss_pauses_and_keeps_remaining_delay() {
    let t0 = Instant::now();
    let (mut game, t) = running_machine(GameSettings::default(), t0);

    let gap = game.spawn_remaining(t).unwrap();
    let paused_at = t + gap - ms(800);
    let events = game.tick(paused_at, true, no_face());
    assert!(events.contains(&GameEvent::Paused(PauseReason::FaceLost)));
    assert_eq!(game.phase(), GamePhase::Paused);
    assert!(!game.physics_active());
    let score = game.score();

    // Frozen while paused
    let resumed_at = paused_at + Duration::from_secs(10);
    assert_eq!(game.spawn_remaining(resumed_at), Some(ms(800)));
    let events = game.tick(paused_at + ms(5000), true, no_face());
    assert!(events.is_empty());

    let events = game.tick(resumed_at, true, idle());
    assert!(events.contains(&GameEvent::Resumed));
    assert_eq!(game.phase(), GamePhase::Running);
    assert_eq!(game.score(), score);
    assert_eq!(game.spawn_remaining(resumed_at), Some(ms(800)));

    let events = game.tick(resumed_at + ms(799), true, idle());
    assert!(!has_event(&events, |e| matches!(e, GameEvent::ObstacleSpawned(_))));
    let events = game.tick(resumed_at + ms(800), true, idle());
    assert!(has_event(&events, |e| matches!(e, GameEvent::ObstacleSpawned(_))));
}

#[test]
fn test_pause_freezes_jump_lock() {
    let t0 = Instant::now();
    let (mut game, t) = running_machine(GameSettings::default(), t0);

    game.tick(t + ms(10), true, mouth_open());
    assert!(game.pause(t + ms(60)));
    assert!(game.resume(t + ms(5060)));
    assert_eq!(game.character().jump_lock_remaining(t + ms(5060)), Some(ms(100)));
    game.drain_events();

    // Still locked 50 ms after resuming
    game.tick(t + ms(5110), true, idle());
    let events = game.tick(t + ms(5120), true, mouth_open());
    assert_eq!(jumps(&events), 0);
}

#[test]
fn test_touch_mode() {
    let t0 = Instant::now();
    let settings = GameSettings {
        mode: ControlMode::Touch,
        ..GameSettings::default()
    };
    let (mut game, t) = running_machine(settings, t0);

    // Facial signals are ignored, losing the face never pauses
    let events = game.tick(t + ms(10), true, mouth_open());
    assert_eq!(jumps(&events), 0);
    let events = game.tick(t + ms(20), true, eyes_closed(SignalState::Closed));
    assert!(!has_event(&events, |e| matches!(e, GameEvent::DuckStarted)));
    game.tick(t + ms(30), true, no_face());
    assert_eq!(game.phase(), GamePhase::Running);

    assert!(game.tap(t + ms(40), true));
    assert_eq!(jumps(&game.drain_events()), 1);
    assert!(!game.tap(t + ms(100), true));
    assert!(game.tap(t + ms(200), true));
}

#[test]
fn test_collision_ends_game_once() {
    let t0 = Instant::now();
    let (mut game, t) = running_machine(GameSettings::default(), t0);

    let hit_at = t + ms(4200);
    game.tick(hit_at, true, idle());
    assert_eq!(game.score(), 42);

    assert!(game.on_overlap(hit_at));
    let events = game.drain_events();
    assert!(events.contains(&GameEvent::GameOver { final_score: 42 }));
    assert_eq!(game.phase(), GamePhase::GameOver { final_score: 42 });
    assert_eq!(game.character().posture(), Posture::Hit);

    // A second overlap 10 ms later is a no-op
    assert!(!game.on_overlap(hit_at + ms(10)));
    assert!(game.drain_events().is_empty());

    let spawned = game.obstacles_spawned();
    let events = game.tick(hit_at + ms(999), true, idle());
    assert!(events.is_empty());
    assert_eq!(game.score(), 42);

    let events = game.tick(hit_at + ms(1000), true, idle());
    assert_eq!(events, vec![GameEvent::ScoreReported { final_score: 42 }]);
    assert!(game.obstacles().is_empty());

    assert!(game.tick(hit_at + ms(5000), true, mouth_open()).is_empty());
    assert_eq!(game.obstacles_spawned(), spawned);
    assert!(!game.jump(hit_at + ms(5000), true));
    assert!(!game.pause(hit_at + ms(5000)));
}

#[test]
fn test_overlap_between_ticks_counts_due_score() {
    let t0 = Instant::now();
    let (mut game, t) = running_machine(GameSettings::default(), t0);

    game.tick(t + ms(4190), true, idle());
    assert_eq!(game.score(), 41);

    // The 42nd increment is due at 4200 even though no tick ran there
    assert!(game.on_overlap(t + ms(4200)));
    assert_eq!(game.phase(), GamePhase::GameOver { final_score: 42 });
    assert!(game.drain_events().contains(&GameEvent::GameOver { final_score: 42 }));
}

#[test]
fn test_host_pause_between_ticks_keeps_scroll_and_score() {
    let t0 = Instant::now();
    let (mut game, t) = running_machine(GameSettings::default(), t0);

    let spawn_at = t + game.spawn_remaining(t).unwrap();
    game.tick(spawn_at, true, idle());
    let score = game.score();
    assert_eq!(game.obstacles()[0].x, 530.0);

    // 500 ms at 260 px/s without a tick, then a long pause
    assert!(game.pause(spawn_at + ms(500)));
    assert_eq!(game.score(), score + 5);
    assert!((game.obstacles()[0].x - 400.0).abs() < 1e-6);

    let resumed_at = spawn_at + ms(10_000);
    assert!(game.resume(resumed_at));
    game.tick(resumed_at, true, idle());
    assert!((game.obstacles()[0].x - 400.0).abs() < 1e-6);
    assert_eq!(game.score(), score + 5);
}

#[test]
fn test_overlap_ignored_outside_running() {
    let t0 = Instant::now();
    let mut game = machine_with(GameSettings::default(), t0);
    assert!(!game.on_overlap(t0 + ms(100)));

    game.tick(t0 + ms(RUNNING_AT_MS), true, idle());
    game.tick(t0 + ms(RUNNING_AT_MS + 10), true, no_face());
    assert_eq!(game.phase(), GamePhase::Paused);
    assert!(!game.on_overlap(t0 + ms(RUNNING_AT_MS + 20)));
    assert_eq!(game.phase(), GamePhase::Paused);
}

#[test]
fn test_obstacles_scroll_and_leave() {
    let t0 = Instant::now();
    let (mut game, t) = running_machine(GameSettings::default(), t0);

    let spawn_at = t + game.spawn_remaining(t).unwrap();
    let events = game.tick(spawn_at, true, idle());
    let id = events
        .iter()
        .find_map(|e| match e {
            GameEvent::ObstacleSpawned(obstacle) => Some(obstacle.id),
            _ => None,
        })
        .unwrap();
    assert_eq!(game.obstacles()[0].x, 530.0);

    game.tick(spawn_at + ms(1000), true, idle());
    assert!((game.obstacles()[0].x - 270.0).abs() < 1e-6);

    // 580 px at 260 px/s
    let events = game.tick(spawn_at + ms(2240), true, idle());
    assert!(events.contains(&GameEvent::ObstacleRemoved { id }));
}

#[test]
fn test_sessions_are_independent_and_deterministic() {
    let t0 = Instant::now();
    let mut first = GameStateMachine::new(GameSettings::default(), StdRng::seed_from_u64(9), t0);
    let mut second = GameStateMachine::new(GameSettings::default(), StdRng::seed_from_u64(9), t0);
    assert_eq!(second.phase(), GamePhase::Countdown { remaining: 3 });
    assert_eq!(second.score(), 0);

    let started = t0 + ms(RUNNING_AT_MS);
    first.tick(started, true, idle());
    second.tick(started, true, idle());
    assert_eq!(first.spawn_remaining(started), second.spawn_remaining(started));
}
