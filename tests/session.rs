// Whole-session behaviour through the public API.

use glam::DVec2;
use granny_arcade::granny::{GameSession, MoveInput, SessionConfig, SessionStatus};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn new_session_waits_in_menu() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut session = GameSession::default();
    assert_eq!(session.status(), SessionStatus::Menu);
    assert!(session.update(1.0, &MoveInput::default(), &mut rng).is_empty());
    assert_eq!(session.timer_secs(), 0);
}

#[test]
fn idle_player_at_start_is_never_found_on_the_attic_patrol() {
    let mut rng = StdRng::seed_from_u64(2);
    let mut session = GameSession::default();
    session.start(&mut rng);
    for _ in 0..20 * 60 {
        let events = session.update(1.0 / 60.0, &MoveInput::default(), &mut rng);
        assert!(events.is_empty(), "unexpected {events:?}");
    }
    assert_eq!(session.status(), SessionStatus::Playing);
    assert_eq!(session.lives(), 3);
    assert!(session.timer_secs() >= 19);
    assert_eq!(session.pursuer().state().name(), "patrolling");
}

#[test]
fn walking_moves_the_player_and_drains_stamina_when_running() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut session = GameSession::default();
    session.start(&mut rng);
    let input = MoveInput {
        down: true,
        run: true,
        ..MoveInput::default()
    };
    for _ in 0..10 {
        session.update(0.05, &input, &mut rng);
    }
    // 200 * 1.6 units per second for half a second.
    let moved = session.player().position() - DVec2::new(100.0, 100.0);
    assert!((moved.y - 160.0).abs() < 1e-6, "moved {moved}");
    assert!(session.player().stamina() < 100.0);
}

#[test]
fn configured_lives_are_used() {
    let mut rng = StdRng::seed_from_u64(4);
    let config = SessionConfig::from_json(r#"{"lives": 1}"#).unwrap();
    let mut session = GameSession::new(config);
    session.start(&mut rng);
    assert_eq!(session.lives(), 1);
}
