//! One run of the game: score, lives, level progression and the per-frame
//! collision rules tying player, pursuer, items and exit together.

use std::f64::consts::TAU;

use glam::DVec2;
use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::items::ItemManager;
use super::level::LevelDesc;
use super::levels;
use super::player::{MoveInput, Player, PlayerConfig};
use super::pursuer::{Pursuer, PursuerConfig};
use crate::error::GameError;

/// Seconds after which a finished level no longer earns a time bonus.
const PAR_SECS: u64 = 300;
const TIME_BONUS_PER_SEC: i64 = 10;
/// A weapon only works this close to the pursuer.
const STUN_RANGE: f64 = 100.0;
const TEXT_OFFSET: DVec2 = DVec2::new(0.0, -30.0);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub player: PlayerConfig,
    pub pursuer: PursuerConfig,
    pub lives: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            player: PlayerConfig::default(),
            pursuer: PursuerConfig::default(),
            lives: 3,
        }
    }
}

impl SessionConfig {
    /// Partial JSON is fine; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        serde_json::from_str(json).map_err(GameError::Config)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SessionStatus {
    Menu,
    Playing,
    Paused,
    LevelComplete {
        time_bonus: i64,
        items_found: usize,
        total_items: usize,
    },
    GameOver,
    Won,
}

/// Things the frontend should show. The session itself never touches the DOM.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    FloatingText {
        text: String,
        position: DVec2,
        color: &'static str,
    },
    /// Player was caught; the screen flashes.
    Caught { lives: u32 },
    LevelComplete {
        time_bonus: i64,
        items_found: usize,
        total_items: usize,
    },
    GameOver { score: i64, level: u32 },
    Won { score: i64 },
}

pub struct GameSession {
    config: SessionConfig,
    status: SessionStatus,
    score: i64,
    level: u32,
    lives: u32,
    elapsed: f64,
    at_exit: bool,
    player: Player,
    pursuer: Pursuer,
    items: ItemManager,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl GameSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            player: Player::new(config.player.clone()),
            pursuer: Pursuer::new(config.pursuer.clone()),
            items: ItemManager::default(),
            status: SessionStatus::Menu,
            score: 0,
            level: 1,
            lives: config.lives,
            elapsed: 0.0,
            at_exit: false,
            config,
        }
    }

    /// New run from level 1.
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.score = 0;
        self.level = 1;
        self.lives = self.config.lives;
        self.load_level(rng);
        self.status = SessionStatus::Playing;
    }

    pub fn retry<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.start(rng);
    }

    /// Only valid from the level-complete screen. Past the last level the run
    /// is won.
    pub fn next_level<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<SessionEvent> {
        if !matches!(self.status, SessionStatus::LevelComplete { .. }) {
            return None;
        }
        if self.level as usize >= levels().len() {
            self.status = SessionStatus::Won;
            info!("all levels cleared with score {}", self.score);
            return Some(SessionEvent::Won { score: self.score });
        }
        self.level += 1;
        self.load_level(rng);
        self.status = SessionStatus::Playing;
        None
    }

    pub fn toggle_pause(&mut self) {
        self.status = match self.status {
            SessionStatus::Playing => SessionStatus::Paused,
            SessionStatus::Paused => SessionStatus::Playing,
            other => other,
        };
    }

    fn load_level<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let level = self.level_desc();
        self.elapsed = 0.0;
        self.at_exit = false;
        self.player.reset_state();
        self.player.reset_position(Some(level.player_start));
        self.pursuer.set_patrol_points(level.patrol);
        self.pursuer.reset_position(Some(level.pursuer_start));
        self.items.load(level.items, || rng.gen_range(0.0..TAU));
        info!("loaded level {} ({})", self.level, level.name);
    }

    /// One frame. Does nothing unless playing.
    pub fn update<R: Rng + ?Sized>(&mut self, dt: f64, input: &MoveInput, rng: &mut R) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if self.status != SessionStatus::Playing {
            return events;
        }
        let level = self.level_desc();
        self.elapsed += dt;

        self.player.update(dt, input, level);
        self.pursuer.advance(dt, &self.player.snapshot(), level, rng);
        self.items.update(dt);

        if self.player_caught() {
            self.on_caught(&mut events);
            return events;
        }
        self.collect_items(&mut events);
        self.check_exit(level, &mut events);
        events
    }

    fn player_caught(&self) -> bool {
        self.player
            .hitbox()
            .is_some_and(|hitbox| hitbox.intersects(&self.pursuer.hitbox()))
    }

    fn on_caught(&mut self, events: &mut Vec<SessionEvent>) {
        let level = self.level_desc();
        self.lives = self.lives.saturating_sub(1);
        self.player.reset_position(Some(level.player_start));
        self.pursuer.reset_position(Some(level.pursuer_start));
        events.push(SessionEvent::Caught { lives: self.lives });
        if self.lives == 0 {
            self.status = SessionStatus::GameOver;
            info!("game over on level {} with score {}", self.level, self.score);
            events.push(SessionEvent::GameOver {
                score: self.score,
                level: self.level,
            });
        }
    }

    fn collect_items(&mut self, events: &mut Vec<SessionEvent>) {
        for pickup in self.items.collect_touching(&mut self.player) {
            self.score += pickup.points;
            let at = self.player.position() + TEXT_OFFSET;
            events.push(SessionEvent::FloatingText {
                text: format!("+{}", pickup.points),
                position: at,
                color: "#fff",
            });
            if let Some(text) = pickup.message {
                events.push(SessionEvent::FloatingText {
                    text,
                    position: at + TEXT_OFFSET,
                    color: pickup.kind.color(),
                });
            }
            if !pickup.stored {
                events.push(SessionEvent::FloatingText {
                    text: "Inventory full".into(),
                    position: at + TEXT_OFFSET,
                    color: "#ff0",
                });
            }
        }
    }

    fn check_exit(&mut self, level: &LevelDesc, events: &mut Vec<SessionEvent>) {
        let inside = level.exit_contains(self.player.position());
        let entered = inside && !self.at_exit;
        self.at_exit = inside;
        if !inside {
            return;
        }
        match level.missing_key(self.player.inventory()) {
            Some(key) => {
                if entered {
                    events.push(SessionEvent::FloatingText {
                        text: format!("Need the {} key", key.replace('_', " ")),
                        position: self.player.position() + TEXT_OFFSET,
                        color: "#ff0",
                    });
                }
            }
            None => self.complete_level(events),
        }
    }

    fn complete_level(&mut self, events: &mut Vec<SessionEvent>) {
        let time_bonus = PAR_SECS.saturating_sub(self.timer_secs()) as i64 * TIME_BONUS_PER_SEC;
        self.score += time_bonus;
        let items_found = self.items.collected_count();
        let total_items = self.items.total();
        self.status = SessionStatus::LevelComplete {
            time_bonus,
            items_found,
            total_items,
        };
        info!(
            "level {} complete in {}s, bonus {time_bonus}, items {items_found}/{total_items}",
            self.level,
            self.timer_secs()
        );
        events.push(SessionEvent::LevelComplete {
            time_bonus,
            items_found,
            total_items,
        });
    }

    /// Toggle hiding. Hiding needs a hide spot under the player; leaving
    /// always works.
    pub fn interact(&mut self) -> Option<SessionEvent> {
        if self.status != SessionStatus::Playing {
            return None;
        }
        if self.player.is_hiding() {
            self.player.unhide();
            return None;
        }
        let spot = self.level_desc().hide_spot_at(self.player.position())?;
        self.player.hide();
        Some(SessionEvent::FloatingText {
            text: format!("Hiding in the {}", spot.kind.label()),
            position: self.player.position() + TEXT_OFFSET,
            color: "#aaa",
        })
    }

    /// Stun the pursuer with the first weapon in the inventory. The weapon is
    /// only spent when the pursuer is in range.
    pub fn use_item(&mut self) -> Option<SessionEvent> {
        if self.status != SessionStatus::Playing {
            return None;
        }
        if self.player.position().distance(self.pursuer.position()) >= STUN_RANGE {
            return None;
        }
        let weapon = self.player.inventory_mut().take_weapon()?;
        self.pursuer.stun();
        Some(SessionEvent::FloatingText {
            text: format!("Stunned Granny with the {weapon}!"),
            position: self.pursuer.position() + TEXT_OFFSET,
            color: "#e74c3c",
        })
    }

    pub fn level_desc(&self) -> &'static LevelDesc {
        let all = levels();
        all[(self.level as usize).saturating_sub(1).min(all.len() - 1)]
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    /// Whole seconds spent on the current level.
    pub fn timer_secs(&self) -> u64 {
        self.elapsed as u64
    }

    /// `MM:SS`
    pub fn timer_text(&self) -> String {
        let secs = self.timer_secs();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn pursuer(&self) -> &Pursuer {
        &self.pursuer
    }

    pub fn items(&self) -> &ItemManager {
        &self.items
    }

    pub(crate) fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub(crate) fn pursuer_mut(&mut self) -> &mut Pursuer {
        &mut self.pursuer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::granny::player::InventoryItem;
    use crate::granny::pursuer::PursuerState;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const DT: f64 = 0.016;

    fn started() -> (GameSession, StdRng) {
        let mut rng = StdRng::seed_from_u64(11);
        let mut session = GameSession::default();
        session.start(&mut rng);
        (session, rng)
    }

    fn idle() -> MoveInput {
        MoveInput::default()
    }

    #[test]
    fn start_places_actors_at_level_starts() {
        let (session, _) = started();
        assert_eq!(session.status(), SessionStatus::Playing);
        assert_eq!((session.level(), session.lives(), session.score()), (1, 3, 0));
        assert_eq!(session.player().position(), DVec2::new(100.0, 100.0));
        assert_eq!(session.pursuer().position(), DVec2::new(800.0, 700.0));
        assert_eq!(session.items().total(), 4);
    }

    #[test]
    fn caught_costs_a_life_and_resets_positions() {
        let (mut session, mut rng) = started();
        session.pursuer_mut().reset_position(Some(DVec2::new(110.0, 100.0)));
        let events = session.update(DT, &idle(), &mut rng);
        assert_eq!(events, vec![SessionEvent::Caught { lives: 2 }]);
        assert_eq!(session.player().position(), DVec2::new(100.0, 100.0));
        assert_eq!(session.pursuer().position(), DVec2::new(800.0, 700.0));
        assert_eq!(session.pursuer().state(), PursuerState::Patrolling);
    }

    #[test]
    fn third_catch_ends_the_run() {
        let (mut session, mut rng) = started();
        for _ in 0..3 {
            session.pursuer_mut().reset_position(Some(DVec2::new(110.0, 100.0)));
            session.update(DT, &idle(), &mut rng);
        }
        assert_eq!(session.status(), SessionStatus::GameOver);
        assert_eq!(session.lives(), 0);
        assert!(session.update(DT, &idle(), &mut rng).is_empty());
    }

    #[test]
    fn hidden_player_cannot_be_caught() {
        let (mut session, mut rng) = started();
        let bed = DVec2::new(340.0, 220.0);
        session.player_mut().reset_position(Some(bed));
        assert!(session.interact().is_some());
        assert!(session.player().is_hiding());
        session.pursuer_mut().reset_position(Some(bed));
        let events = session.update(DT, &idle(), &mut rng);
        assert!(!events.iter().any(|e| matches!(e, SessionEvent::Caught { .. })));
        assert_eq!(session.lives(), 3);

        assert!(session.interact().is_none());
        assert!(!session.player().is_hiding());
    }

    #[test]
    fn interact_away_from_hide_spot_does_nothing() {
        let (mut session, _) = started();
        assert!(session.interact().is_none());
        assert!(!session.player().is_hiding());
    }

    #[test]
    fn pickups_add_score() {
        let (mut session, mut rng) = started();
        session.player_mut().reset_position(Some(DVec2::new(150.0, 700.0)));
        let events = session.update(DT, &idle(), &mut rng);
        assert_eq!(session.score(), 200);
        assert!(events.iter().any(|e| matches!(
            e,
            SessionEvent::FloatingText { text, .. } if text == "+200"
        )));
        assert!(events.iter().any(|e| matches!(
            e,
            SessionEvent::FloatingText { text, .. } if text == "Found photo!"
        )));
    }

    #[test]
    fn exit_without_key_shows_hint_once() {
        let (mut session, mut rng) = started();
        session.player_mut().reset_position(Some(DVec2::new(960.0, 430.0)));
        let first = session.update(DT, &idle(), &mut rng);
        assert_eq!(first.len(), 1);
        assert!(matches!(
            &first[0],
            SessionEvent::FloatingText { text, .. } if text == "Need the front door key"
        ));
        assert!(session.update(DT, &idle(), &mut rng).is_empty());
        assert_eq!(session.status(), SessionStatus::Playing);
    }

    #[test]
    fn exit_with_key_completes_level_with_time_bonus() {
        let (mut session, mut rng) = started();
        session.player_mut().inventory_mut().add(InventoryItem::Key("front_door"));
        session.player_mut().reset_position(Some(DVec2::new(960.0, 430.0)));
        let events = session.update(DT, &idle(), &mut rng);
        let expected = SessionStatus::LevelComplete {
            time_bonus: 3000,
            items_found: 0,
            total_items: 4,
        };
        assert_eq!(session.status(), expected);
        assert_eq!(session.score(), 3000);
        assert!(matches!(events[0], SessionEvent::LevelComplete { time_bonus: 3000, .. }));
    }

    #[test]
    fn time_bonus_shrinks_with_whole_seconds() {
        let (mut session, mut rng) = started();
        for _ in 0..10 {
            session.update(0.25, &idle(), &mut rng);
        }
        assert_eq!(session.timer_secs(), 2);
        assert_eq!(session.timer_text(), "00:02");
        assert_eq!(session.status(), SessionStatus::Playing);
        session.player_mut().inventory_mut().add(InventoryItem::Key("front_door"));
        session.player_mut().reset_position(Some(DVec2::new(960.0, 430.0)));
        session.pursuer_mut().reset_position(Some(DVec2::new(100.0, 700.0)));
        session.update(0.25, &idle(), &mut rng);
        assert!(matches!(
            session.status(),
            SessionStatus::LevelComplete { time_bonus: 2980, .. }
        ));
    }

    #[test]
    fn walking_into_the_exit_completes_the_level() {
        let (mut session, mut rng) = started();
        session.player_mut().inventory_mut().add(InventoryItem::Key("front_door"));
        session.player_mut().reset_position(Some(DVec2::new(903.0, 430.0)));
        let right = MoveInput {
            right: true,
            ..MoveInput::default()
        };
        for _ in 0..20 {
            session.update(0.05, &right, &mut rng);
        }
        assert!(matches!(session.status(), SessionStatus::LevelComplete { .. }));
        assert!(session.player().position().x > 950.0);
    }

    #[test]
    fn next_level_then_win() {
        let (mut session, mut rng) = started();
        session.player_mut().inventory_mut().add(InventoryItem::Key("front_door"));
        session.player_mut().reset_position(Some(DVec2::new(960.0, 430.0)));
        session.update(DT, &idle(), &mut rng);
        assert!(session.next_level(&mut rng).is_none());
        assert_eq!(session.level(), 2);
        assert_eq!(session.status(), SessionStatus::Playing);
        assert_eq!(session.level_desc().name, "Granny's Living Room");
        assert!(session.player().inventory().items().is_empty());

        let inv = session.player_mut().inventory_mut();
        inv.add(InventoryItem::Key("basement"));
        inv.add(InventoryItem::Key("drawer"));
        session.player_mut().reset_position(Some(DVec2::new(1160.0, 830.0)));
        session.pursuer_mut().reset_position(Some(DVec2::new(100.0, 100.0)));
        session.update(DT, &idle(), &mut rng);
        assert!(matches!(session.status(), SessionStatus::LevelComplete { .. }));
        let won = session.next_level(&mut rng);
        assert!(matches!(won, Some(SessionEvent::Won { .. })));
        assert_eq!(session.status(), SessionStatus::Won);
    }

    #[test]
    fn next_level_requires_completed_level() {
        let (mut session, mut rng) = started();
        assert!(session.next_level(&mut rng).is_none());
        assert_eq!(session.level(), 1);
    }

    #[test]
    fn weapon_stuns_only_in_range() {
        let (mut session, _) = started();
        session.player_mut().inventory_mut().add(InventoryItem::Weapon("hammer"));
        assert!(session.use_item().is_none());
        assert_eq!(session.player().inventory().items().len(), 1);

        session.pursuer_mut().reset_position(Some(DVec2::new(180.0, 100.0)));
        assert!(session.use_item().is_some());
        assert!(session.pursuer().state().is_stunned());
        assert!(session.player().inventory().items().is_empty());
    }

    #[test]
    fn pause_freezes_the_world() {
        let (mut session, mut rng) = started();
        session.toggle_pause();
        assert_eq!(session.status(), SessionStatus::Paused);
        let before = session.pursuer().position();
        assert!(session.update(1.0, &idle(), &mut rng).is_empty());
        assert_eq!(session.pursuer().position(), before);
        session.toggle_pause();
        assert_eq!(session.status(), SessionStatus::Playing);
    }

    #[test]
    fn retry_restores_a_fresh_run() {
        let (mut session, mut rng) = started();
        session.pursuer_mut().reset_position(Some(DVec2::new(110.0, 100.0)));
        session.update(DT, &idle(), &mut rng);
        session.retry(&mut rng);
        assert_eq!((session.lives(), session.score(), session.level()), (3, 0, 1));
    }

    #[test]
    fn config_overrides_merge_with_defaults() {
        let config = SessionConfig::from_json(r#"{"pursuer": {"speed": 90.0}, "lives": 5}"#).unwrap();
        assert_eq!(config.pursuer.speed, 90.0);
        assert_eq!(config.pursuer.detection_radius, 200.0);
        assert_eq!(config.player, PlayerConfig::default());
        assert_eq!(config.lives, 5);
        assert!(matches!(SessionConfig::from_json("[1,"), Err(GameError::Config(_))));
    }
}
