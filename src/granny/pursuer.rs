//! Granny's pursuit AI.
//!
//! Four mutually exclusive behaviours, each carrying its own timers:
//!
//! ```text
//! Patrolling --sees player--> Chasing --10s unseen--> Searching --15s--> Patrolling
//!      ^                         ^                        |
//!      |                         +------sees player-------+
//!      +---- reset ----      any --stun()--> Stunned --3s--> Searching
//! ```
//!
//! Perception (sight within the detection radius with a clear ray, hearing a
//! running player within the hearing radius) runs after the per-state update
//! every tick unless stunned. Time only advances through the `dt` passed to
//! [`Pursuer::advance`] and randomness only comes from the caller's RNG, so a
//! fixed `dt` sequence with a seeded RNG replays exactly.

use std::collections::VecDeque;
use std::f64::consts::TAU;

use glam::DVec2;
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::level::{Geometry, Rect};

const DEFAULT_POSITION: DVec2 = DVec2::new(500.0, 500.0);
const ANIMATION_FRAMES: u8 = 4;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PursuerConfig {
    /// Units per second.
    pub speed: f64,
    pub size: f64,
    pub detection_radius: f64,
    pub hearing_radius: f64,
    pub chase_multiplier: f64,
    pub max_chase_secs: f64,
    pub max_search_secs: f64,
    pub max_stun_secs: f64,
    pub replan_interval: f64,
    pub wander_radius: f64,
    pub wander_speed_factor: f64,
    /// A waypoint closer than this counts as reached.
    pub arrival_radius: f64,
    pub animation_step_secs: f64,
}

impl Default for PursuerConfig {
    fn default() -> Self {
        Self {
            speed: 120.0,
            size: 50.0,
            detection_radius: 200.0,
            hearing_radius: 300.0,
            chase_multiplier: 1.2,
            max_chase_secs: 10.0,
            max_search_secs: 15.0,
            max_stun_secs: 3.0,
            replan_interval: 0.5,
            wander_radius: 50.0,
            wander_speed_factor: 0.7,
            arrival_radius: 5.0,
            animation_step_secs: 0.2,
        }
    }
}

/// Behaviour state. Timers count up from zero on every (re-)entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PursuerState {
    Patrolling,
    Chasing {
        elapsed: f64,
        /// Time since the path was last re-planned toward the player.
        since_replan: f64,
    },
    Searching {
        elapsed: f64,
    },
    Stunned {
        elapsed: f64,
    },
}

impl PursuerState {
    pub fn name(&self) -> &'static str {
        match self {
            PursuerState::Patrolling => "patrolling",
            PursuerState::Chasing { .. } => "chasing",
            PursuerState::Searching { .. } => "searching",
            PursuerState::Stunned { .. } => "stunned",
        }
    }

    pub fn is_chasing(&self) -> bool {
        matches!(self, PursuerState::Chasing { .. })
    }

    pub fn is_stunned(&self) -> bool {
        matches!(self, PursuerState::Stunned { .. })
    }
}

/// Read-only view of the player used for perception.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    pub position: DVec2,
    pub hidden: bool,
    pub running: bool,
}

/// Turns a target into waypoints. The pursuer pops waypoints as it reaches
/// them; an empty plan is valid.
pub trait PathPlanner {
    fn plan(&self, from: DVec2, to: DVec2) -> VecDeque<DVec2>;
}

/// Straight line to the target, no obstacle avoidance.
#[derive(Clone, Copy, Debug, Default)]
pub struct DirectPath;

impl PathPlanner for DirectPath {
    fn plan(&self, _from: DVec2, to: DVec2) -> VecDeque<DVec2> {
        VecDeque::from([to])
    }
}

/// Result of one perception pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Perception {
    pub sees_player: bool,
    pub hears_player: bool,
}

pub struct Pursuer<P: PathPlanner = DirectPath> {
    config: PursuerConfig,
    planner: P,
    position: DVec2,
    state: PursuerState,
    patrol: Vec<DVec2>,
    patrol_index: usize,
    path: VecDeque<DVec2>,
    target: DVec2,
    animation_frame: u8,
    animation_timer: f64,
}

impl Pursuer<DirectPath> {
    pub fn new(config: PursuerConfig) -> Self {
        Self::with_planner(config, DirectPath)
    }
}

impl<P: PathPlanner> Pursuer<P> {
    pub fn with_planner(config: PursuerConfig, planner: P) -> Self {
        Self {
            config,
            planner,
            position: DEFAULT_POSITION,
            state: PursuerState::Patrolling,
            patrol: Vec::new(),
            patrol_index: 0,
            path: VecDeque::new(),
            target: DVec2::ZERO,
            animation_frame: 0,
            animation_timer: 0.0,
        }
    }

    /// One simulation step: state update, then perception, then animation.
    pub fn advance<R>(
        &mut self,
        dt: f64,
        player: &PlayerSnapshot,
        geometry: &(impl Geometry + ?Sized),
        rng: &mut R,
    ) where
        R: Rng + ?Sized,
    {
        self.update_state(dt, player, rng);

        if !self.state.is_stunned() {
            let seen = self.perceive(player, geometry);
            if seen.sees_player {
                self.start_chasing(player.position);
            }
            if seen.hears_player {
                self.start_searching(player.position);
            }
        }

        self.animation_timer += dt;
        if self.animation_timer >= self.config.animation_step_secs {
            self.animation_timer = 0.0;
            self.animation_frame = (self.animation_frame + 1) % ANIMATION_FRAMES;
        }
    }

    /// Sight needs an unhidden player inside the detection radius with no wall
    /// edge on the line between; hearing needs an unhidden running player
    /// inside the hearing radius.
    pub fn perceive(&self, player: &PlayerSnapshot, geometry: &(impl Geometry + ?Sized)) -> Perception {
        if player.hidden {
            return Perception::default();
        }
        let distance = self.position.distance(player.position);
        let sees_player = distance < self.config.detection_radius
            && !geometry.ray_occluded(self.position, player.position);
        let hears_player = player.running && distance < self.config.hearing_radius;
        Perception {
            sees_player,
            hears_player,
        }
    }

    fn update_state<R: Rng + ?Sized>(&mut self, dt: f64, player: &PlayerSnapshot, rng: &mut R) {
        match self.state {
            PursuerState::Patrolling => self.patrol_step(dt),
            PursuerState::Chasing {
                elapsed,
                since_replan,
            } => {
                let elapsed = elapsed + dt;
                if elapsed >= self.config.max_chase_secs {
                    // Lost the player for too long: a timed-out chase becomes a
                    // search around the last target, bypassing chase priority.
                    self.enter_searching(self.target);
                    return;
                }
                let mut since_replan = since_replan + dt;
                if since_replan >= self.config.replan_interval {
                    since_replan = 0.0;
                    self.target = player.position;
                    self.path = self.planner.plan(self.position, self.target);
                }
                self.state = PursuerState::Chasing {
                    elapsed,
                    since_replan,
                };
                self.follow_path(dt, self.config.speed * self.config.chase_multiplier);
            }
            PursuerState::Searching { elapsed } => {
                let elapsed = elapsed + dt;
                if elapsed >= self.config.max_search_secs {
                    self.set_state(PursuerState::Patrolling);
                    return;
                }
                self.state = PursuerState::Searching { elapsed };
                if self.path.is_empty() {
                    self.wander_step(dt, rng);
                } else {
                    self.follow_path(dt, self.config.speed);
                }
            }
            PursuerState::Stunned { elapsed } => {
                let elapsed = elapsed + dt;
                if elapsed >= self.config.max_stun_secs {
                    // Whatever path was pending survives the stun; with none
                    // left the search wanders around the player's spot.
                    self.set_state(PursuerState::Searching { elapsed: 0.0 });
                    self.target = player.position;
                } else {
                    self.state = PursuerState::Stunned { elapsed };
                }
            }
        }
    }

    fn patrol_step(&mut self, dt: f64) {
        let Some(&waypoint) = self.patrol.get(self.patrol_index) else {
            return;
        };
        if self.position.distance(waypoint) < self.config.arrival_radius {
            self.patrol_index = (self.patrol_index + 1) % self.patrol.len();
        } else {
            self.step_toward(waypoint, self.config.speed * dt);
        }
    }

    /// Jitters around the last known target: a fresh random point on the
    /// wander circle every tick.
    fn wander_step<R: Rng + ?Sized>(&mut self, dt: f64, rng: &mut R) {
        let angle = rng.gen_range(0.0..TAU);
        let candidate = self.target + DVec2::new(angle.cos(), angle.sin()) * self.config.wander_radius;
        if self.position.distance(candidate) > self.config.arrival_radius {
            let speed = self.config.speed * self.config.wander_speed_factor;
            self.step_toward(candidate, speed * dt);
        }
    }

    fn follow_path(&mut self, dt: f64, speed: f64) {
        let Some(&next) = self.path.front() else {
            return;
        };
        if self.position.distance(next) < self.config.arrival_radius {
            self.path.pop_front();
        } else {
            self.step_toward(next, speed * dt);
        }
    }

    fn step_toward(&mut self, point: DVec2, step: f64) {
        let dir = (point - self.position).normalize_or_zero();
        self.position += dir * step;
    }

    fn set_state(&mut self, next: PursuerState) {
        if self.state.name() != next.name() {
            debug!("pursuer {} -> {}", self.state.name(), next.name());
        }
        self.state = next;
    }

    fn enter_searching(&mut self, target: DVec2) {
        self.set_state(PursuerState::Searching { elapsed: 0.0 });
        self.target = target;
        self.path = self.planner.plan(self.position, target);
    }

    /// Always succeeds; restarts the chase timer.
    pub fn start_chasing(&mut self, target: DVec2) {
        let since_replan = match self.state {
            PursuerState::Chasing { since_replan, .. } => since_replan,
            _ => 0.0,
        };
        self.set_state(PursuerState::Chasing {
            elapsed: 0.0,
            since_replan,
        });
        self.target = target;
        self.path = self.planner.plan(self.position, target);
    }

    /// Ignored while chasing; otherwise (re)starts a search at `target`.
    pub fn start_searching(&mut self, target: DVec2) {
        if self.state.is_chasing() {
            return;
        }
        self.enter_searching(target);
    }

    /// Interrupts any state.
    pub fn stun(&mut self) {
        self.set_state(PursuerState::Stunned { elapsed: 0.0 });
    }

    /// Back to patrol at `position` (or the default spawn). The patrol route
    /// and index survive; any pending path is dropped.
    pub fn reset_position(&mut self, position: Option<DVec2>) {
        self.position = position.unwrap_or(DEFAULT_POSITION);
        self.path.clear();
        self.set_state(PursuerState::Patrolling);
    }

    pub fn set_patrol_points(&mut self, points: impl Into<Vec<DVec2>>) {
        self.patrol = points.into();
        self.patrol_index = 0;
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn state(&self) -> PursuerState {
        self.state
    }

    /// Last commanded target (chase or search).
    pub fn target(&self) -> DVec2 {
        self.target
    }

    /// Heading toward the last target, radians.
    pub fn facing(&self) -> f64 {
        let d = self.target - self.position;
        d.y.atan2(d.x)
    }

    pub fn patrol_index(&self) -> usize {
        self.patrol_index
    }

    pub fn path(&self) -> &VecDeque<DVec2> {
        &self.path
    }

    pub fn animation_frame(&self) -> u8 {
        self.animation_frame
    }

    pub fn config(&self) -> &PursuerConfig {
        &self.config
    }

    pub fn size(&self) -> f64 {
        self.config.size
    }

    /// Body box centred on the position, for contact with the player.
    pub fn hitbox(&self) -> Rect {
        let s = self.config.size;
        Rect::new(self.position.x - s / 2.0, self.position.y - s / 2.0, s, s)
    }
}
