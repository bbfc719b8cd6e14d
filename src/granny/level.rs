//! Level geometry: walls, hide spots, items, exit and the pursuer's patrol
//! route. Walls are axis-aligned rectangles; visibility is a segment test
//! against every wall edge.

use glam::DVec2;

use super::items::ItemKind;
use super::player::Inventory;

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Overlap test; touching edges do not count.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }

    /// Strict interior test (points on the border are outside).
    pub fn contains(&self, p: DVec2) -> bool {
        p.x > self.x && p.x < self.x + self.w && p.y > self.y && p.y < self.y + self.h
    }

    /// Top, left, bottom, right.
    pub fn edges(&self) -> [(DVec2, DVec2); 4] {
        let tl = DVec2::new(self.x, self.y);
        let tr = DVec2::new(self.x + self.w, self.y);
        let bl = DVec2::new(self.x, self.y + self.h);
        let br = DVec2::new(self.x + self.w, self.y + self.h);
        [(tl, tr), (tl, bl), (bl, br), (tr, br)]
    }
}

/// Parametric two-segment intersection. Parallel or coincident segments
/// (zero denominator) never intersect; endpoints are inclusive.
pub fn segments_intersect(a1: DVec2, a2: DVec2, b1: DVec2, b2: DVec2) -> bool {
    let denominator = (b2.y - b1.y) * (a2.x - a1.x) - (b2.x - b1.x) * (a2.y - a1.y);
    if denominator == 0.0 {
        return false;
    }
    let ua = ((b2.x - b1.x) * (a1.y - b1.y) - (b2.y - b1.y) * (a1.x - b1.x)) / denominator;
    let ub = ((a2.x - a1.x) * (a1.y - b1.y) - (a2.y - a1.y) * (a1.x - b1.x)) / denominator;
    (0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub)
}

/// Read-only level queries the pursuer and player need.
pub trait Geometry {
    fn wall_collision(&self, rect: Rect) -> bool;
    /// True when any wall edge crosses the segment `from`-`to`.
    fn ray_occluded(&self, from: DVec2, to: DVec2) -> bool;
}

impl Geometry for [Rect] {
    fn wall_collision(&self, rect: Rect) -> bool {
        self.iter().any(|wall| wall.intersects(&rect))
    }

    fn ray_occluded(&self, from: DVec2, to: DVec2) -> bool {
        self.iter().any(|wall| {
            wall.edges()
                .iter()
                .any(|&(e1, e2)| segments_intersect(from, to, e1, e2))
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HideSpotKind {
    Bed,
    Closet,
    Wardrobe,
    Couch,
    Cabinet,
    Bookshelf,
    Table,
}

impl HideSpotKind {
    pub fn label(self) -> &'static str {
        match self {
            HideSpotKind::Bed => "bed",
            HideSpotKind::Closet => "closet",
            HideSpotKind::Wardrobe => "wardrobe",
            HideSpotKind::Couch => "couch",
            HideSpotKind::Cabinet => "cabinet",
            HideSpotKind::Bookshelf => "bookshelf",
            HideSpotKind::Table => "table",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct HideSpot {
    pub rect: Rect,
    pub kind: HideSpotKind,
}

#[derive(Clone, Copy, Debug)]
pub struct ItemSpawn {
    pub position: DVec2,
    pub kind: ItemKind,
    pub points: i64,
}

/// Level descriptor (immutable, 'static like the rest of the level tables).
#[derive(Debug)]
pub struct LevelDesc {
    pub name: &'static str,
    pub width: f64,
    pub height: f64,
    pub walls: &'static [Rect],
    pub hide_spots: &'static [HideSpot],
    pub items: &'static [ItemSpawn],
    pub exit: Rect,
    pub player_start: DVec2,
    pub pursuer_start: DVec2,
    pub patrol: &'static [DVec2],
    /// Key names that must be in the inventory to use the exit.
    pub required_keys: &'static [&'static str],
    pub difficulty: u8,
    pub ambient_sounds: &'static [&'static str],
}

impl LevelDesc {
    pub fn hide_spot_at(&self, p: DVec2) -> Option<&HideSpot> {
        self.hide_spots.iter().find(|spot| spot.rect.contains(p))
    }

    pub fn exit_contains(&self, p: DVec2) -> bool {
        self.exit.contains(p)
    }

    /// First required key the inventory lacks, if any.
    pub fn missing_key(&self, inventory: &Inventory) -> Option<&'static str> {
        self.required_keys
            .iter()
            .copied()
            .find(|key| !inventory.has_key(key))
    }
}

impl Geometry for LevelDesc {
    fn wall_collision(&self, rect: Rect) -> bool {
        self.walls.wall_collision(rect)
    }

    fn ray_occluded(&self, from: DVec2, to: DVec2) -> bool {
        self.walls.ray_occluded(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::granny::player::InventoryItem;

    fn v(x: f64, y: f64) -> DVec2 {
        DVec2::new(x, y)
    }

    #[test]
    fn crossing_segments_intersect() {
        assert!(segments_intersect(v(0.0, 0.0), v(10.0, 10.0), v(0.0, 10.0), v(10.0, 0.0)));
    }

    #[test]
    fn parallel_and_collinear_segments_do_not_intersect() {
        assert!(!segments_intersect(v(0.0, 0.0), v(10.0, 0.0), v(0.0, 5.0), v(10.0, 5.0)));
        assert!(!segments_intersect(v(0.0, 0.0), v(10.0, 0.0), v(5.0, 0.0), v(15.0, 0.0)));
    }

    #[test]
    fn touching_endpoint_counts_as_intersection() {
        assert!(segments_intersect(v(0.0, 0.0), v(5.0, 0.0), v(5.0, -5.0), v(5.0, 5.0)));
    }

    #[test]
    fn short_segment_stops_before_edge() {
        assert!(!segments_intersect(v(0.0, 0.0), v(4.0, 0.0), v(5.0, -5.0), v(5.0, 5.0)));
    }

    #[test]
    fn wall_between_points_occludes() {
        let walls = [Rect::new(40.0, -50.0, 20.0, 100.0)];
        assert!(walls.ray_occluded(v(0.0, 0.0), v(100.0, 0.0)));
        assert!(!walls.ray_occluded(v(0.0, 100.0), v(100.0, 100.0)));
    }

    #[test]
    fn rect_overlap_ignores_touching_edges() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!a.intersects(&Rect::new(10.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn hide_spot_and_exit_lookup() {
        let lvl = super::super::levels()[0];
        assert_eq!(lvl.hide_spot_at(v(320.0, 220.0)).map(|s| s.kind), Some(HideSpotKind::Bed));
        assert!(lvl.hide_spot_at(v(50.0, 50.0)).is_none());
        assert!(lvl.exit_contains(v(960.0, 430.0)));
        assert!(!lvl.exit_contains(v(950.0, 430.0)));
    }

    #[test]
    fn missing_key_reports_first_absent_key() {
        let lvl = super::super::levels()[1];
        let mut inv = Inventory::default();
        assert_eq!(lvl.missing_key(&inv), Some("basement"));
        inv.add(InventoryItem::Key("basement"));
        assert_eq!(lvl.missing_key(&inv), Some("drawer"));
        inv.add(InventoryItem::Key("drawer"));
        assert_eq!(lvl.missing_key(&inv), None);
    }
}
