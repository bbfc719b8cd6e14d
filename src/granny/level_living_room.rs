// Granny level 2 definition
// Denser wall layout, two keys required at the exit.
use glam::DVec2;

use super::items::{ItemKind, PowerupKind};
use super::level::{HideSpot, HideSpotKind, ItemSpawn, LevelDesc, Rect};

const WALLS: [Rect; 14] = [
    // outer
    Rect::new(0.0, 0.0, 1200.0, 20.0),
    Rect::new(0.0, 0.0, 20.0, 900.0),
    Rect::new(0.0, 880.0, 1200.0, 20.0),
    Rect::new(1180.0, 0.0, 20.0, 900.0),
    // inner
    Rect::new(200.0, 100.0, 20.0, 300.0),
    Rect::new(200.0, 100.0, 400.0, 20.0),
    Rect::new(600.0, 100.0, 20.0, 200.0),
    Rect::new(600.0, 300.0, 200.0, 20.0),
    Rect::new(800.0, 150.0, 20.0, 150.0),
    Rect::new(800.0, 150.0, 200.0, 20.0),
    Rect::new(400.0, 400.0, 20.0, 300.0),
    Rect::new(400.0, 700.0, 400.0, 20.0),
    Rect::new(800.0, 500.0, 20.0, 220.0),
    Rect::new(600.0, 500.0, 200.0, 20.0),
];

const HIDE_SPOTS: [HideSpot; 4] = [
    HideSpot { rect: Rect::new(300.0, 200.0, 80.0, 40.0), kind: HideSpotKind::Couch },
    HideSpot { rect: Rect::new(700.0, 200.0, 60.0, 60.0), kind: HideSpotKind::Cabinet },
    HideSpot { rect: Rect::new(900.0, 250.0, 60.0, 60.0), kind: HideSpotKind::Bookshelf },
    HideSpot { rect: Rect::new(500.0, 600.0, 60.0, 60.0), kind: HideSpotKind::Table },
];

const ITEMS: [ItemSpawn; 6] = [
    ItemSpawn { position: DVec2::new(350.0, 180.0), kind: ItemKind::Key("basement"), points: 150 },
    ItemSpawn { position: DVec2::new(750.0, 400.0), kind: ItemKind::Weapon("vase"), points: 75 },
    ItemSpawn { position: DVec2::new(950.0, 200.0), kind: ItemKind::Collectible("diary"), points: 250 },
    ItemSpawn { position: DVec2::new(300.0, 600.0), kind: ItemKind::Collectible("necklace"), points: 300 },
    ItemSpawn { position: DVec2::new(600.0, 800.0), kind: ItemKind::Powerup(PowerupKind::Invisibility), points: 125 },
    ItemSpawn { position: DVec2::new(900.0, 700.0), kind: ItemKind::Key("drawer"), points: 100 },
];

const PATROL: [DVec2; 6] = [
    DVec2::new(1000.0, 600.0),
    DVec2::new(700.0, 600.0),
    DVec2::new(700.0, 400.0),
    DVec2::new(1000.0, 400.0),
    DVec2::new(1000.0, 200.0),
    DVec2::new(500.0, 200.0),
];

pub static LEVEL_LIVING_ROOM: LevelDesc = LevelDesc {
    name: "Granny's Living Room",
    width: 1200.0,
    height: 900.0,
    walls: &WALLS,
    hide_spots: &HIDE_SPOTS,
    items: &ITEMS,
    exit: Rect::new(1150.0, 800.0, 30.0, 60.0),
    player_start: DVec2::new(100.0, 100.0),
    pursuer_start: DVec2::new(1000.0, 600.0),
    patrol: &PATROL,
    required_keys: &["basement", "drawer"],
    difficulty: 2,
    ambient_sounds: &["clock", "floorboards", "thunder"],
};
