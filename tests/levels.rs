// Level dataset invariants. Native-only; no browser APIs.

use std::collections::HashSet;

use granny_arcade::granny::items::ItemKind;
use granny_arcade::granny::{Geometry, Rect, levels};
use glam::DVec2;

fn centred(p: DVec2, size: f64) -> Rect {
    Rect::new(p.x - size / 2.0, p.y - size / 2.0, size, size)
}

fn in_bounds(p: DVec2, width: f64, height: f64) -> bool {
    p.x > 0.0 && p.y > 0.0 && p.x < width && p.y < height
}

#[test]
fn levels_are_ordered_and_named_uniquely() {
    let names: Vec<&str> = levels().iter().map(|l| l.name).collect();
    assert_eq!(names, vec!["Granny's Attic", "Granny's Living Room"]);
    let difficulties: Vec<u8> = levels().iter().map(|l| l.difficulty).collect();
    assert!(difficulties.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn starts_are_clear_of_walls() {
    for level in levels() {
        assert!(
            !level.wall_collision(centred(level.player_start, 40.0)),
            "player start blocked in {}",
            level.name
        );
        assert!(
            !level.wall_collision(centred(level.pursuer_start, 50.0)),
            "pursuer start blocked in {}",
            level.name
        );
    }
}

#[test]
fn patrol_points_and_items_avoid_walls() {
    for level in levels() {
        assert!(!level.patrol.is_empty(), "{} has no patrol route", level.name);
        for p in level.patrol {
            assert!(in_bounds(*p, level.width, level.height), "{p} outside {}", level.name);
            assert!(
                !level.walls.iter().any(|w| w.contains(*p)),
                "patrol point {p} inside a wall in {}",
                level.name
            );
        }
        for item in level.items {
            assert!(in_bounds(item.position, level.width, level.height));
            assert!(
                !level.walls.iter().any(|w| w.contains(item.position)),
                "item {:?} inside a wall in {}",
                item.kind,
                level.name
            );
            assert!(item.points > 0);
        }
    }
}

#[test]
fn every_required_key_is_placed() {
    for level in levels() {
        let keys: HashSet<&str> = level
            .items
            .iter()
            .filter_map(|i| match i.kind {
                ItemKind::Key(name) => Some(name),
                _ => None,
            })
            .collect();
        assert!(!level.required_keys.is_empty());
        for key in level.required_keys {
            assert!(keys.contains(key), "{} requires missing key {key}", level.name);
        }
    }
}

#[test]
fn exit_admits_the_player() {
    for level in levels() {
        let e = level.exit;
        let spot = DVec2::new(e.x + 10.0, e.y + e.h / 2.0);
        assert!(level.exit_contains(spot));
        assert!(
            !level.wall_collision(centred(spot, 40.0)),
            "exit of {} unreachable",
            level.name
        );
    }
}

#[test]
fn hide_spots_are_in_open_floor() {
    for level in levels() {
        for spot in level.hide_spots {
            let r = spot.rect;
            let centre = DVec2::new(r.x + r.w / 2.0, r.y + r.h / 2.0);
            assert!(level.hide_spot_at(centre).is_some());
            assert!(!level.walls.iter().any(|w| w.intersects(&r)), "{} overlaps a wall", spot.kind.label());
        }
    }
}
