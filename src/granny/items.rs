//! Pickups scattered around a level: keys, weapons, collectibles, power-ups.

use glam::DVec2;

use super::level::ItemSpawn;
use super::player::{InventoryItem, Player};

pub const ITEM_RADIUS: f64 = 15.0;
const BOB_HEIGHT: f64 = 5.0;
const BOB_SPEED: f64 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerupKind {
    Speed,
    Invisibility,
    Stamina,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemKind {
    Key(&'static str),
    Weapon(&'static str),
    Collectible(&'static str),
    Powerup(PowerupKind),
}

impl ItemKind {
    pub fn subtype(self) -> &'static str {
        match self {
            ItemKind::Key(name) | ItemKind::Weapon(name) | ItemKind::Collectible(name) => name,
            ItemKind::Powerup(PowerupKind::Speed) => "speed",
            ItemKind::Powerup(PowerupKind::Invisibility) => "invisibility",
            ItemKind::Powerup(PowerupKind::Stamina) => "stamina",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            ItemKind::Key(_) => "#f1c40f",
            ItemKind::Weapon(_) => "#e74c3c",
            ItemKind::Collectible(_) => "#9b59b6",
            ItemKind::Powerup(_) => "#3498db",
        }
    }

    pub fn glow_color(self) -> &'static str {
        match self {
            ItemKind::Key(_) => "rgba(255, 215, 0, 0.7)",
            ItemKind::Weapon(_) => "rgba(192, 57, 43, 0.7)",
            ItemKind::Collectible(_) => "rgba(155, 89, 182, 0.7)",
            ItemKind::Powerup(_) => "rgba(52, 152, 219, 0.7)",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Item {
    pub position: DVec2,
    pub kind: ItemKind,
    pub points: i64,
    bob_phase: f64,
    glow: f64,
    glow_rising: bool,
}

impl Item {
    fn new(spawn: &ItemSpawn, bob_phase: f64) -> Self {
        Self {
            position: spawn.position,
            kind: spawn.kind,
            points: spawn.points,
            bob_phase,
            glow: 0.0,
            glow_rising: true,
        }
    }

    fn update(&mut self, dt: f64) {
        self.bob_phase += BOB_SPEED * dt;
        if self.glow_rising {
            self.glow += dt;
            if self.glow > 1.0 {
                self.glow = 1.0;
                self.glow_rising = false;
            }
        } else {
            self.glow -= dt;
            if self.glow < 0.0 {
                self.glow = 0.0;
                self.glow_rising = true;
            }
        }
    }

    /// Position including the floating bob offset.
    pub fn draw_position(&self) -> DVec2 {
        self.position + DVec2::new(0.0, self.bob_phase.sin() * BOB_HEIGHT)
    }

    /// 0..=1
    pub fn glow(&self) -> f64 {
        self.glow
    }
}

/// What picking an item up did, so the session can score it and the
/// frontend can show a message.
#[derive(Clone, Debug, PartialEq)]
pub struct Pickup {
    pub kind: ItemKind,
    pub points: i64,
    pub message: Option<String>,
    /// False when the inventory was full; the item is still consumed.
    pub stored: bool,
}

#[derive(Default)]
pub struct ItemManager {
    items: Vec<Item>,
    collected: Vec<ItemKind>,
    total: usize,
}

impl ItemManager {
    /// Replace the active items with a level's spawns. `bob_phase` supplies a
    /// starting animation phase per item (random in the frontend).
    pub fn load(&mut self, spawns: &[ItemSpawn], mut bob_phase: impl FnMut() -> f64) {
        self.items = spawns.iter().map(|s| Item::new(s, bob_phase())).collect();
        self.collected.clear();
        self.total = self.items.len();
    }

    pub fn update(&mut self, dt: f64) {
        for item in &mut self.items {
            item.update(dt);
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn collected_count(&self) -> usize {
        self.collected.len()
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Collect every item the player touches. Hidden players still pick up
    /// items they are standing on.
    pub fn collect_touching(&mut self, player: &mut Player) -> Vec<Pickup> {
        let reach = player.width() / 2.0 + ITEM_RADIUS;
        let mut pickups = Vec::new();
        // Walk backwards so removals don't shift unvisited items.
        for idx in (0..self.items.len()).rev() {
            if self.items[idx].position.distance(player.position()) < reach {
                let item = self.items.remove(idx);
                pickups.push(apply_pickup(&item, player));
                self.collected.push(item.kind);
            }
        }
        pickups
    }
}

fn apply_pickup(item: &Item, player: &mut Player) -> Pickup {
    let (stored, message) = match item.kind {
        ItemKind::Key(name) => (player.inventory_mut().add(InventoryItem::Key(name)), None),
        ItemKind::Weapon(name) => (player.inventory_mut().add(InventoryItem::Weapon(name)), None),
        ItemKind::Collectible(name) => (true, Some(format!("Found {name}!"))),
        ItemKind::Powerup(kind) => {
            player.apply_powerup(kind);
            let msg = match kind {
                PowerupKind::Speed => "Speed Boost!",
                PowerupKind::Invisibility => "Invisibility!",
                PowerupKind::Stamina => "Stamina Restored!",
            };
            (true, Some(msg.to_string()))
        }
    };
    Pickup {
        kind: item.kind,
        points: item.points,
        message,
        stored,
    }
}
