// Granny level 1 definition
// Tutorial floor: one key, one weapon, a single long patrol loop.
use glam::DVec2;

use super::items::{ItemKind, PowerupKind};
use super::level::{HideSpot, HideSpotKind, ItemSpawn, LevelDesc, Rect};

const WALLS: [Rect; 8] = [
    // outer
    Rect::new(0.0, 0.0, 1000.0, 20.0),
    Rect::new(0.0, 0.0, 20.0, 800.0),
    Rect::new(0.0, 780.0, 1000.0, 20.0),
    Rect::new(980.0, 0.0, 20.0, 800.0),
    // inner
    Rect::new(200.0, 100.0, 20.0, 400.0),
    Rect::new(400.0, 300.0, 400.0, 20.0),
    Rect::new(600.0, 100.0, 20.0, 200.0),
    Rect::new(200.0, 600.0, 600.0, 20.0),
];

const HIDE_SPOTS: [HideSpot; 3] = [
    HideSpot { rect: Rect::new(300.0, 200.0, 80.0, 40.0), kind: HideSpotKind::Bed },
    HideSpot { rect: Rect::new(700.0, 150.0, 60.0, 60.0), kind: HideSpotKind::Closet },
    HideSpot { rect: Rect::new(850.0, 650.0, 60.0, 60.0), kind: HideSpotKind::Wardrobe },
];

const ITEMS: [ItemSpawn; 4] = [
    ItemSpawn { position: DVec2::new(350.0, 180.0), kind: ItemKind::Key("front_door"), points: 100 },
    ItemSpawn { position: DVec2::new(750.0, 500.0), kind: ItemKind::Weapon("hammer"), points: 50 },
    ItemSpawn { position: DVec2::new(150.0, 700.0), kind: ItemKind::Collectible("photo"), points: 200 },
    ItemSpawn { position: DVec2::new(600.0, 400.0), kind: ItemKind::Powerup(PowerupKind::Speed), points: 75 },
];

const PATROL: [DVec2; 5] = [
    DVec2::new(800.0, 700.0),
    DVec2::new(500.0, 700.0),
    DVec2::new(300.0, 500.0),
    DVec2::new(300.0, 200.0),
    DVec2::new(800.0, 200.0),
];

pub static LEVEL_ATTIC: LevelDesc = LevelDesc {
    name: "Granny's Attic",
    width: 1000.0,
    height: 800.0,
    walls: &WALLS,
    hide_spots: &HIDE_SPOTS,
    items: &ITEMS,
    exit: Rect::new(950.0, 400.0, 30.0, 60.0),
    player_start: DVec2::new(100.0, 100.0),
    pursuer_start: DVec2::new(800.0, 700.0),
    patrol: &PATROL,
    required_keys: &["front_door"],
    difficulty: 1,
    ambient_sounds: &["creaking", "wind"],
};
