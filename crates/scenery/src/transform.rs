//! Per-element rotate / mirror / translate.
//!
//! Positions are transformed inside a template frame of `size` world units.
//! Orientation fields follow the host's clockwise, north-origin numbering;
//! every rule here has to match what the host would place bit for bit, or the
//! ghost preview diverges from the real build.

use bevy::math::{IVec2, IVec3};

use crate::coords;
use crate::element::{path_direction, Element, ElementKind};
use crate::objects::ObjectResolver;

fn rotate_dir(direction: u8) -> u8 {
    direction.wrapping_add(1) & 3
}

/// North and south swap under reflection across the x axis.
fn mirror_dir(direction: u8) -> u8 {
    let direction = direction & 3;
    if direction & 1 != 0 {
        direction ^ 2
    } else {
        direction
    }
}

pub fn translate(element: &Element, delta: IVec3) -> Element {
    let position = coords::add(IVec2::new(element.x, element.y), delta.truncate());
    Element {
        x: position.x,
        y: position.y,
        z: element.z + delta.z,
        kind: element.kind.clone(),
    }
}

/// Rotate by `steps` quarter turns inside a frame of `size`. The frame folds
/// to `(size.y, size.x)` after every step.
pub fn rotate(
    element: &Element,
    steps: u8,
    size: IVec2,
    objects: &dyn ObjectResolver,
) -> Element {
    let mut out = element.clone();
    let mut size = size;
    for _ in 0..(steps & 3) {
        out = rotate_once(&out, size, objects);
        size = IVec2::new(size.y, size.x);
    }
    out
}

/// `(x, y) -> (y, size.x - x)`.
pub fn rotate_position(position: IVec2, size: IVec2) -> IVec2 {
    coords::add(coords::rotate(position, 3), IVec2::new(0, size.x))
}

/// `(x, y) -> (x, size.y - y)`.
pub fn mirror_position(position: IVec2, size: IVec2) -> IVec2 {
    coords::add(coords::mirror(position), IVec2::new(0, size.y))
}

fn rotate_once(element: &Element, size: IVec2, objects: &dyn ObjectResolver) -> Element {
    let position = rotate_position(IVec2::new(element.x, element.y), size);
    let mut kind = element.kind.clone();
    match &mut kind {
        ElementKind::Footpath(p) => {
            p.slope = p.slope.rotated();
            p.direction = path_direction(p.direction).map(rotate_dir);
        }
        ElementKind::FootpathSurface(p) => {
            p.slope = p.slope.rotated();
            p.direction = path_direction(p.direction).map(rotate_dir);
        }
        ElementKind::FootpathRailings(p) => {
            p.slope = p.slope.rotated();
        }
        ElementKind::FootpathAddition(_) => {}
        ElementKind::SmallScenery(s) => {
            s.direction = rotate_dir(s.direction);
            if !objects.shape(&s.qualifier).full_tile {
                s.quadrant = rotate_dir(s.quadrant);
            }
        }
        ElementKind::LargeScenery(l) => l.direction = rotate_dir(l.direction),
        ElementKind::Wall(w) => w.edge = rotate_dir(w.edge),
        ElementKind::Banner(b) => b.direction = rotate_dir(b.direction),
        ElementKind::Entrance(e) => e.direction = rotate_dir(e.direction),
        ElementKind::Track(t) => t.direction = rotate_dir(t.direction),
    }
    Element {
        x: position.x,
        y: position.y,
        z: element.z,
        kind,
    }
}

/// Reflect across the template frame's x axis (`y -> size.y - y`).
///
/// Large scenery keeps its orientation: remapping a multi-tile footprint is
/// not supported, so a mirrored large object is placed unmirrored. Track
/// pieces likewise keep their direction, since a mirrored piece would need a
/// different track type.
pub fn mirror(element: &Element, size: IVec2, objects: &dyn ObjectResolver) -> Element {
    let position = mirror_position(IVec2::new(element.x, element.y), size);
    let mut kind = element.kind.clone();
    match &mut kind {
        ElementKind::Footpath(p) => p.slope = p.slope.mirrored(),
        ElementKind::FootpathSurface(p) => p.slope = p.slope.mirrored(),
        ElementKind::FootpathRailings(p) => p.slope = p.slope.mirrored(),
        ElementKind::FootpathAddition(_) => {}
        ElementKind::SmallScenery(s) => {
            let shape = objects.shape(&s.qualifier);
            if shape.diagonal {
                s.direction = (s.direction & 3) ^ 1;
                if !shape.full_tile {
                    s.quadrant = (s.quadrant & 3) ^ 1;
                }
            } else {
                s.direction = mirror_dir(s.direction);
                if !shape.half_space {
                    s.quadrant = (s.quadrant & 3) ^ 1;
                }
            }
        }
        ElementKind::LargeScenery(_) => {}
        ElementKind::Wall(w) => w.edge = mirror_dir(w.edge),
        ElementKind::Banner(b) => b.direction = mirror_dir(b.direction),
        ElementKind::Entrance(e) => e.direction = mirror_dir(e.direction),
        ElementKind::Track(_) => {}
    }
    Element {
        x: position.x,
        y: position.y,
        z: element.z,
        kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TILE_SIZE;
    use crate::element::{
        Banner, ElementType, Entrance, Footpath, FootpathAddition, FootpathRailings,
        FootpathSurface, LargeScenery, SmallScenery, Slope, Track, Wall,
    };
    use crate::test_support::{
        objects, small_scenery, DIAGONAL, DIAGONAL_FULL, FULL_TILE, HALF_SPACE, QUARTER,
    };
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn random_element(rng: &mut ChaCha8Rng) -> Element {
        let x = rng.gen_range(0..8) * TILE_SIZE;
        let y = rng.gen_range(0..8) * TILE_SIZE;
        let z = rng.gen_range(2..40) * 8;
        let dir = rng.gen_range(0..4u8);
        let slope = if rng.gen_bool(0.3) {
            Slope::FLAT
        } else {
            Slope::raised(rng.gen_range(0..4u8))
        };
        let kind = match rng.gen_range(0..10) {
            0 => ElementKind::Footpath(Footpath {
                qualifier: "rct2.footpath.tarmac".to_string(),
                slope,
                is_queue: rng.gen_bool(0.5),
                direction: if rng.gen_bool(0.5) { Some(dir) } else { None },
            }),
            1 => ElementKind::FootpathSurface(FootpathSurface {
                qualifier: "rct2.footpath_surface.tarmac".to_string(),
                slope,
                is_queue: false,
                direction: None,
            }),
            2 => ElementKind::FootpathRailings(FootpathRailings {
                qualifier: "rct2.footpath_railings.wood".to_string(),
                slope,
            }),
            3 => ElementKind::FootpathAddition(FootpathAddition {
                qualifier: "rct2.footpath_item.bench1".to_string(),
            }),
            4 => {
                let qualifiers = [QUARTER, FULL_TILE, DIAGONAL, DIAGONAL_FULL, HALF_SPACE];
                ElementKind::SmallScenery(SmallScenery {
                    qualifier: qualifiers[rng.gen_range(0..qualifiers.len())].to_string(),
                    direction: dir,
                    quadrant: rng.gen_range(0..4u8),
                    primary_colour: rng.gen_range(0..32u8),
                    secondary_colour: 0,
                    tertiary_colour: 0,
                })
            }
            5 => ElementKind::LargeScenery(LargeScenery {
                qualifier: "rct2.scenery_large.glthent".to_string(),
                direction: dir,
                primary_colour: 0,
                secondary_colour: 0,
                tertiary_colour: 0,
            }),
            6 => ElementKind::Wall(Wall {
                qualifier: "rct2.scenery_wall.wallbr32".to_string(),
                edge: dir,
                primary_colour: 0,
                secondary_colour: 0,
                tertiary_colour: 0,
            }),
            7 => ElementKind::Banner(Banner {
                qualifier: "rct2.banner.bn1".to_string(),
                direction: dir,
                primary_colour: 0,
            }),
            8 => ElementKind::Entrance(Entrance {
                qualifier: "rct2.park_entrance.pkent1".to_string(),
                direction: dir,
                entrance_type: 2,
            }),
            _ => ElementKind::Track(Track {
                qualifier: "rct2.ride.twist1".to_string(),
                direction: dir,
                track_type: 1,
            }),
        };
        Element::new(x, y, z, kind)
    }

    #[test]
    fn test_four_rotations_are_identity() {
        let objects = objects();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let size = IVec2::new(8 * TILE_SIZE, 5 * TILE_SIZE);
        for _ in 0..500 {
            let e = random_element(&mut rng);
            let mut r = e.clone();
            let mut s = size;
            for _ in 0..4 {
                r = rotate(&r, 1, s, &objects);
                s = IVec2::new(s.y, s.x);
            }
            assert_eq!(r, e, "rotate^4 drifted for {e:?}");
            assert_eq!(rotate(&e, 4, size, &objects), e);
        }
    }

    #[test]
    fn test_rotate_steps_compose() {
        let objects = objects();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let size = IVec2::new(3 * TILE_SIZE, 6 * TILE_SIZE);
        for _ in 0..200 {
            let e = random_element(&mut rng);
            let once = rotate(&e, 1, size, &objects);
            let twice = rotate(&once, 1, IVec2::new(size.y, size.x), &objects);
            assert_eq!(rotate(&e, 2, size, &objects), twice);
        }
    }

    #[test]
    fn test_mirror_twice_is_identity() {
        let objects = objects();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let size = IVec2::new(4 * TILE_SIZE, 4 * TILE_SIZE);
        for _ in 0..500 {
            let e = random_element(&mut rng);
            let twice = mirror(&mirror(&e, size, &objects), size, &objects);
            assert_eq!(twice, e, "mirror^2 changed {e:?}");
        }
    }

    #[test]
    fn test_large_scenery_mirror_keeps_orientation() {
        let objects = objects();
        let e = Element::new(
            0,
            32,
            16,
            ElementKind::LargeScenery(LargeScenery {
                qualifier: "rct2.scenery_large.glthent".to_string(),
                direction: 1,
                primary_colour: 0,
                secondary_colour: 0,
                tertiary_colour: 0,
            }),
        );
        let m = mirror(&e, IVec2::new(64, 64), &objects);
        assert_eq!(m.element_type(), ElementType::LargeScenery);
        assert_eq!(m.kind, e.kind);
        assert_eq!((m.x, m.y), (0, 32));
    }

    #[test]
    fn test_translate_is_a_group_action() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..200 {
            let e = random_element(&mut rng);
            let a = IVec3::new(rng.gen_range(-64..64), rng.gen_range(-64..64), 8);
            let b = IVec3::new(rng.gen_range(-64..64), rng.gen_range(-64..64), -16);
            assert_eq!(translate(&translate(&e, a), b), translate(&e, a + b));
            assert_eq!(translate(&e, IVec3::ZERO), e);
        }
    }

    #[test]
    fn test_small_scenery_single_rotation_scenario() {
        let objects = objects();
        let size = IVec2::new(2 * TILE_SIZE, 2 * TILE_SIZE);
        let e = small_scenery(TILE_SIZE, 0, 0, 0, QUARTER);
        let r = rotate(&e, 1, size, &objects);
        let ElementKind::SmallScenery(s) = &r.kind else {
            panic!("expected small scenery");
        };
        assert_eq!(s.quadrant, 1);
        assert_eq!(s.direction, 1);
        assert_eq!((r.x, r.y), (e.y, 2 * TILE_SIZE - e.x));
    }

    #[test]
    fn test_full_tile_quadrant_fixed_under_rotate_and_mirror() {
        let objects = objects();
        let size = IVec2::new(64, 64);
        let e = small_scenery(0, 0, 2, 0, FULL_TILE);
        for steps in 0..4 {
            let ElementKind::SmallScenery(s) = rotate(&e, steps, size, &objects).kind else {
                panic!("expected small scenery");
            };
            assert_eq!(s.quadrant, 2);
        }
        let ElementKind::SmallScenery(s) = mirror(&e, size, &objects).kind else {
            panic!("expected small scenery");
        };
        assert_eq!(s.quadrant, 2);
    }

    #[test]
    fn test_quarter_tile_quadrant_advances_per_step() {
        let objects = objects();
        let e = small_scenery(0, 0, 3, 0, QUARTER);
        let ElementKind::SmallScenery(s) = rotate(&e, 1, IVec2::new(32, 32), &objects).kind
        else {
            panic!("expected small scenery");
        };
        assert_eq!(s.quadrant, 0);
    }

    #[test]
    fn test_mirror_small_scenery_rules() {
        let objects = objects();
        let size = IVec2::new(64, 64);
        let quadrant_and_dir = |qualifier: &str, quadrant: u8, direction: u8| {
            let e = small_scenery(0, 0, quadrant, direction, qualifier);
            match mirror(&e, size, &objects).kind {
                ElementKind::SmallScenery(s) => (s.quadrant, s.direction),
                other => panic!("unexpected {other:?}"),
            }
        };
        // Diagonal: direction bit0 flips, quadrant bit0 flips.
        assert_eq!(quadrant_and_dir(DIAGONAL, 0, 0), (1, 1));
        // Diagonal full tile: quadrant untouched.
        assert_eq!(quadrant_and_dir(DIAGONAL_FULL, 2, 2), (2, 3));
        // Plain quarter: odd directions swap, quadrant bit0 flips.
        assert_eq!(quadrant_and_dir(QUARTER, 2, 1), (3, 3));
        assert_eq!(quadrant_and_dir(QUARTER, 2, 2), (3, 2));
        // Half space: quadrant untouched.
        assert_eq!(quadrant_and_dir(HALF_SPACE, 1, 3), (1, 1));
    }

    #[test]
    fn test_mirror_wall_banner_and_footpath() {
        let objects = objects();
        let size = IVec2::new(32, 96);
        let wall = Element::new(
            0,
            32,
            16,
            ElementKind::Wall(Wall {
                qualifier: "rct2.scenery_wall.wallbr32".to_string(),
                edge: 1,
                primary_colour: 0,
                secondary_colour: 0,
                tertiary_colour: 0,
            }),
        );
        let m = mirror(&wall, size, &objects);
        assert_eq!((m.x, m.y), (0, 64));
        let ElementKind::Wall(w) = &m.kind else {
            panic!("expected wall");
        };
        assert_eq!(w.edge, 3);

        let banner = Element::new(
            0,
            0,
            16,
            ElementKind::Banner(Banner {
                qualifier: "rct2.banner.bn1".to_string(),
                direction: 2,
                primary_colour: 0,
            }),
        );
        let ElementKind::Banner(b) = mirror(&banner, size, &objects).kind else {
            panic!("expected banner");
        };
        assert_eq!(b.direction, 2);

        let path = Element::new(
            0,
            0,
            16,
            ElementKind::Footpath(Footpath {
                qualifier: "rct2.footpath.tarmac".to_string(),
                slope: Slope::raised(1),
                is_queue: false,
                direction: None,
            }),
        );
        let ElementKind::Footpath(p) = mirror(&path, size, &objects).kind else {
            panic!("expected footpath");
        };
        assert_eq!(p.slope, Slope::raised(3));
    }

    #[test]
    fn test_flat_slope_invariant_under_rotate_and_mirror() {
        let objects = objects();
        let path = Element::new(
            0,
            0,
            16,
            ElementKind::Footpath(Footpath {
                qualifier: "rct2.footpath.tarmac".to_string(),
                slope: Slope::FLAT,
                is_queue: false,
                direction: None,
            }),
        );
        let size = IVec2::new(32, 32);
        for steps in 0..4 {
            let ElementKind::Footpath(p) = rotate(&path, steps, size, &objects).kind else {
                panic!("expected footpath");
            };
            assert_eq!(p.slope, Slope::FLAT);
            assert_eq!(p.direction, None);
        }
        let ElementKind::Footpath(p) = mirror(&path, size, &objects).kind else {
            panic!("expected footpath");
        };
        assert_eq!(p.slope, Slope::FLAT);
    }

    #[test]
    fn test_sloped_footpath_rotates_north_to_east() {
        let objects = objects();
        let path = Element::new(
            0,
            0,
            16,
            ElementKind::Footpath(Footpath {
                qualifier: "rct2.footpath.tarmac".to_string(),
                slope: Slope::raised(0),
                is_queue: false,
                direction: None,
            }),
        );
        let ElementKind::Footpath(p) = rotate(&path, 1, IVec2::new(32, 32), &objects).kind else {
            panic!("expected footpath");
        };
        assert!(p.slope.is_sloped());
        assert_eq!(p.slope.direction(), 1);
    }

    #[test]
    fn test_no_direction_sentinel_survives_rotation() {
        let objects = objects();
        let path = Element::new(
            0,
            0,
            16,
            ElementKind::Footpath(Footpath {
                qualifier: "rct2.footpath.tarmac".to_string(),
                slope: Slope::FLAT,
                is_queue: true,
                direction: Some(crate::config::NO_DIRECTION),
            }),
        );
        let ElementKind::Footpath(p) = rotate(&path, 3, IVec2::new(32, 32), &objects).kind else {
            panic!("expected footpath");
        };
        assert_eq!(p.direction, None);
    }

    #[test]
    fn test_out_of_range_orientation_is_reduced_mod_4() {
        let objects = objects();
        let size = IVec2::new(32, 32);
        let scenery = small_scenery(0, 0, 6, 255, QUARTER);
        let ElementKind::SmallScenery(s) = rotate(&scenery, 1, size, &objects).kind else {
            panic!("expected small scenery");
        };
        assert_eq!((s.direction, s.quadrant), (0, 3));

        let ElementKind::SmallScenery(s) = mirror(&scenery, size, &objects).kind else {
            panic!("expected small scenery");
        };
        assert_eq!((s.direction, s.quadrant), (1, 3));

        let diagonal = small_scenery(0, 0, 5, 6, DIAGONAL);
        let ElementKind::SmallScenery(s) = mirror(&diagonal, size, &objects).kind else {
            panic!("expected small scenery");
        };
        assert_eq!((s.direction, s.quadrant), (3, 0));

        let wall = Element::new(
            0,
            0,
            16,
            ElementKind::Wall(Wall {
                qualifier: "rct2.scenery_wall.wallbr32".to_string(),
                edge: 7,
                primary_colour: 0,
                secondary_colour: 0,
                tertiary_colour: 0,
            }),
        );
        let ElementKind::Wall(w) = mirror(&wall, size, &objects).kind else {
            panic!("expected wall");
        };
        assert_eq!(w.edge, 1);
        let ElementKind::Wall(w) = rotate(&wall, 1, size, &objects).kind else {
            panic!("expected wall");
        };
        assert_eq!(w.edge, 0);
    }
}
