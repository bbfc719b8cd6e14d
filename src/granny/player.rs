//! Player model: WASD movement with axis-separated wall collision, stamina
//! driven running, hiding and a small inventory.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::items::PowerupKind;
use super::level::{Geometry, Rect};
use super::pursuer::PlayerSnapshot;

const DIAGONAL_FACTOR: f64 = 0.7071;
const DEFAULT_START: DVec2 = DVec2::new(100.0, 100.0);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub speed: f64,
    pub size: f64,
    pub max_stamina: f64,
    pub stamina_regen: f64,
    pub stamina_drain: f64,
    pub run_multiplier: f64,
    pub inventory_capacity: usize,
    pub speed_boost_factor: f64,
    pub speed_boost_secs: f64,
    pub invisibility_secs: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: 200.0,
            size: 40.0,
            max_stamina: 100.0,
            stamina_regen: 10.0,
            stamina_drain: 20.0,
            run_multiplier: 1.6,
            inventory_capacity: 5,
            speed_boost_factor: 1.5,
            speed_boost_secs: 10.0,
            invisibility_secs: 5.0,
        }
    }
}

/// Per-frame movement intent, filled by the input layer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MoveInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub run: bool,
    /// Pointer position in world coordinates; overrides facing when present.
    pub pointer: Option<DVec2>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InventoryItem {
    Key(&'static str),
    Weapon(&'static str),
}

impl InventoryItem {
    pub fn display_name(self) -> String {
        match self {
            InventoryItem::Key(name) => format!("{} Key", capitalize(name)),
            InventoryItem::Weapon(name) => capitalize(name),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Clone, Debug)]
pub struct Inventory {
    items: Vec<InventoryItem>,
    capacity: usize,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::with_capacity(PlayerConfig::default().inventory_capacity)
    }
}

impl Inventory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            capacity,
        }
    }

    /// Returns false (and drops the item) when full.
    pub fn add(&mut self, item: InventoryItem) -> bool {
        if self.items.len() >= self.capacity {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn has_key(&self, name: &str) -> bool {
        self.items
            .iter()
            .any(|it| matches!(it, InventoryItem::Key(k) if *k == name))
    }

    /// Remove and return the first weapon, if any.
    pub fn take_weapon(&mut self) -> Option<&'static str> {
        let idx = self
            .items
            .iter()
            .position(|it| matches!(it, InventoryItem::Weapon(_)))?;
        match self.items.remove(idx) {
            InventoryItem::Weapon(name) => Some(name),
            InventoryItem::Key(_) => None,
        }
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

pub struct Player {
    config: PlayerConfig,
    position: DVec2,
    direction: f64,
    stamina: f64,
    running: bool,
    hiding: bool,
    speed_boost_left: f64,
    invisibility_left: f64,
    inventory: Inventory,
}

impl Player {
    pub fn new(config: PlayerConfig) -> Self {
        let inventory = Inventory::with_capacity(config.inventory_capacity);
        Self {
            position: DEFAULT_START,
            direction: 0.0,
            stamina: config.max_stamina,
            running: false,
            hiding: false,
            speed_boost_left: 0.0,
            invisibility_left: 0.0,
            inventory,
            config,
        }
    }

    pub fn update(&mut self, dt: f64, input: &MoveInput, geometry: &(impl Geometry + ?Sized)) {
        self.tick_effects(dt);
        if self.hiding {
            return;
        }

        let mut mv = DVec2::ZERO;
        if input.up {
            mv.y -= 1.0;
        }
        if input.down {
            mv.y += 1.0;
        }
        if input.left {
            mv.x -= 1.0;
        }
        if input.right {
            mv.x += 1.0;
        }
        if mv.x != 0.0 && mv.y != 0.0 {
            mv *= DIAGONAL_FACTOR;
        }
        let moving = mv != DVec2::ZERO;
        if moving {
            self.direction = mv.y.atan2(mv.x);
        }

        self.running = input.run && self.stamina > 0.0;
        let mut speed = self.current_speed();
        if self.running && moving {
            speed *= self.config.run_multiplier;
            self.stamina = (self.stamina - self.config.stamina_drain * dt).max(0.0);
        } else {
            self.stamina = (self.stamina + self.config.stamina_regen * dt).min(self.config.max_stamina);
        }

        let next = self.position + mv * speed * dt;
        if !geometry.wall_collision(self.box_at(DVec2::new(next.x, self.position.y))) {
            self.position.x = next.x;
        }
        if !geometry.wall_collision(self.box_at(DVec2::new(self.position.x, next.y))) {
            self.position.y = next.y;
        }

        if let Some(pointer) = input.pointer {
            let d = pointer - self.position;
            self.direction = d.y.atan2(d.x);
        }
    }

    /// Square body centred on `center`.
    fn box_at(&self, center: DVec2) -> Rect {
        let size = self.config.size;
        Rect::new(center.x - size / 2.0, center.y - size / 2.0, size, size)
    }

    fn tick_effects(&mut self, dt: f64) {
        self.speed_boost_left = (self.speed_boost_left - dt).max(0.0);
        self.invisibility_left = (self.invisibility_left - dt).max(0.0);
    }

    fn current_speed(&self) -> f64 {
        if self.speed_boost_left > 0.0 {
            self.config.speed * self.config.speed_boost_factor
        } else {
            self.config.speed
        }
    }

    pub fn apply_powerup(&mut self, kind: PowerupKind) {
        match kind {
            PowerupKind::Speed => self.speed_boost_left = self.config.speed_boost_secs,
            PowerupKind::Invisibility => self.invisibility_left = self.config.invisibility_secs,
            PowerupKind::Stamina => self.stamina = self.config.max_stamina,
        }
    }

    /// What the pursuer can observe. Invisibility reads as hiding.
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            position: self.position,
            hidden: self.hiding || self.is_invisible(),
            running: self.running,
        }
    }

    /// Bounding box used for pursuer contact; `None` while hiding.
    pub fn hitbox(&self) -> Option<Rect> {
        if self.hiding {
            return None;
        }
        Some(self.box_at(self.position))
    }

    pub fn reset_position(&mut self, position: Option<DVec2>) {
        self.position = position.unwrap_or(DEFAULT_START);
    }

    /// Full reset for a new run: stamina, effects, hiding and inventory.
    pub fn reset_state(&mut self) {
        self.stamina = self.config.max_stamina;
        self.running = false;
        self.hiding = false;
        self.speed_boost_left = 0.0;
        self.invisibility_left = 0.0;
        self.inventory.clear();
    }

    pub fn hide(&mut self) {
        self.hiding = true;
        self.running = false;
    }

    pub fn unhide(&mut self) {
        self.hiding = false;
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn direction(&self) -> f64 {
        self.direction
    }

    pub fn width(&self) -> f64 {
        self.config.size
    }

    pub fn stamina(&self) -> f64 {
        self.stamina
    }

    pub fn stamina_fraction(&self) -> f64 {
        self.stamina / self.config.max_stamina
    }

    pub(crate) fn set_stamina(&mut self, value: f64) {
        self.stamina = value.clamp(0.0, self.config.max_stamina);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_hiding(&self) -> bool {
        self.hiding
    }

    pub fn is_invisible(&self) -> bool {
        self.invisibility_left > 0.0
    }

    pub fn has_speed_boost(&self) -> bool {
        self.speed_boost_left > 0.0
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPEN: [Rect; 0] = [];

    fn player_at(x: f64, y: f64) -> Player {
        let mut p = Player::new(PlayerConfig::default());
        p.reset_position(Some(DVec2::new(x, y)));
        p
    }

    #[test]
    fn moves_right_at_base_speed() {
        let mut p = player_at(100.0, 100.0);
        let input = MoveInput { right: true, ..Default::default() };
        p.update(0.5, &input, &OPEN[..]);
        assert_eq!(p.position(), DVec2::new(200.0, 100.0));
        assert_eq!(p.direction(), 0.0);
    }

    #[test]
    fn diagonal_movement_is_normalized() {
        let mut p = player_at(0.0, 0.0);
        let input = MoveInput { right: true, down: true, ..Default::default() };
        p.update(1.0, &input, &OPEN[..]);
        assert!((p.position().x - 141.42).abs() < 1e-9);
        assert!((p.position().y - 141.42).abs() < 1e-9);
    }

    #[test]
    fn running_drains_and_idle_regenerates_stamina() {
        let mut p = player_at(0.0, 0.0);
        let run = MoveInput { right: true, run: true, ..Default::default() };
        p.update(1.0, &run, &OPEN[..]);
        assert!(p.is_running());
        assert_eq!(p.stamina(), 80.0);
        assert!((p.position().x - 320.0).abs() < 1e-9);

        p.update(1.0, &MoveInput::default(), &OPEN[..]);
        assert!(!p.is_running());
        assert_eq!(p.stamina(), 90.0);
    }

    #[test]
    fn exhausted_player_cannot_run() {
        let mut p = player_at(0.0, 0.0);
        p.set_stamina(0.0);
        let run = MoveInput { right: true, run: true, ..Default::default() };
        p.update(0.1, &run, &OPEN[..]);
        assert!(!p.is_running());
    }

    #[test]
    fn wall_blocks_only_the_colliding_axis() {
        // Wall just right of the player's body; moving down-right should still go down.
        let walls = [Rect::new(125.0, 0.0, 20.0, 1000.0)];
        let mut p = player_at(100.0, 100.0);
        let input = MoveInput { right: true, down: true, ..Default::default() };
        p.update(0.1, &input, &walls[..]);
        assert_eq!(p.position().x, 100.0);
        assert!(p.position().y > 100.0);
    }

    #[test]
    fn hiding_freezes_movement_and_hides_from_snapshot() {
        let mut p = player_at(100.0, 100.0);
        p.hide();
        p.update(1.0, &MoveInput { right: true, ..Default::default() }, &OPEN[..]);
        assert_eq!(p.position(), DVec2::new(100.0, 100.0));
        assert!(p.snapshot().hidden);
        assert!(p.hitbox().is_none());
        p.unhide();
        assert!(!p.snapshot().hidden);
    }

    #[test]
    fn invisibility_wears_off() {
        let mut p = player_at(0.0, 0.0);
        p.apply_powerup(PowerupKind::Invisibility);
        assert!(p.snapshot().hidden);
        p.update(5.0, &MoveInput::default(), &OPEN[..]);
        assert!(!p.snapshot().hidden);
    }

    #[test]
    fn speed_boost_multiplies_then_expires() {
        let mut p = player_at(0.0, 0.0);
        p.apply_powerup(PowerupKind::Speed);
        let input = MoveInput { right: true, ..Default::default() };
        p.update(1.0, &input, &OPEN[..]);
        assert_eq!(p.position().x, 300.0);
        p.update(9.0, &MoveInput::default(), &OPEN[..]);
        assert!(!p.has_speed_boost());
    }

    #[test]
    fn inventory_is_capped() {
        let mut inv = Inventory::with_capacity(2);
        assert!(inv.add(InventoryItem::Key("a")));
        assert!(inv.add(InventoryItem::Weapon("hammer")));
        assert!(!inv.add(InventoryItem::Key("b")));
        assert_eq!(inv.take_weapon(), Some("hammer"));
        assert_eq!(inv.take_weapon(), None);
        assert_eq!(InventoryItem::Key("front_door").display_name(), "Front_door Key");
    }

    #[test]
    fn pointer_sets_facing() {
        let mut p = player_at(0.0, 0.0);
        let input = MoveInput {
            pointer: Some(DVec2::new(0.0, 10.0)),
            ..Default::default()
        };
        p.update(0.016, &input, &OPEN[..]);
        assert!((p.direction() - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }
}
