//! End-to-end behavior of `PhysicsWorld` driven through the public API.

use std::path::PathBuf;

use tp_core::{
    BodyHandle, MovementPolicy, OpenField, PhysicsBody, PhysicsWorld, PresetLoader, ShapeKind,
    Tile, TileGrid, Vec2, WorldConfig, WorldEvent,
};

fn presets_path() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(manifest_dir).join("..").join("presets")
}

fn world_with_sub_steps(sub_steps: u32) -> PhysicsWorld {
    PhysicsWorld::with_config(WorldConfig {
        sub_steps,
        tile_size: 16.0,
    })
    .unwrap()
}

fn ball(x: f32, y: f32, radius: f32, velocity: Vec2) -> PhysicsBody {
    let size = radius * 2.0;
    PhysicsBody::new("ball", Vec2::new(x, y), size, size, ShapeKind::Circle, MovementPolicy::Fly)
        .unwrap()
        .with_velocity(velocity)
}

/// 8x8 box that walks but cannot swim.
fn walker(name: &str, position: Vec2, velocity: Vec2) -> PhysicsBody {
    PhysicsBody::new(name, position, 8.0, 8.0, ShapeKind::Box, MovementPolicy::OnlyWalk)
        .unwrap()
        .with_velocity(velocity)
}

#[test]
fn test_elastic_head_on_circles_exchange_velocities() {
    let mut world = world_with_sub_steps(1);
    // Centers at (0, 0) and (1.5, 0), radius 1
    let left = world.add_body(ball(-1.0, -1.0, 1.0, Vec2::new(1.0, 0.0)));
    let right = world.add_body(ball(0.5, -1.0, 1.0, Vec2::new(-1.0, 0.0)));

    world.step(0.0, &OpenField);

    assert_eq!(world.body(left).unwrap().velocity(), Vec2::new(-1.0, 0.0));
    assert_eq!(world.body(right).unwrap().velocity(), Vec2::new(1.0, 0.0));
}

#[test]
fn test_immobile_body_never_moves() {
    let mut grid = TileGrid::new(8, 8, 16.0, Tile::GROUND);
    grid.set(4, 4, Tile::Wall);

    let mut world = PhysicsWorld::new();
    let tree = PhysicsBody::new(
        "tree",
        Vec2::new(40.0, 40.0),
        16.0,
        16.0,
        ShapeKind::Box,
        MovementPolicy::Immobile,
    )
    .unwrap()
    .with_velocity(Vec2::new(3.0, 3.0));
    let tree = world.add_body(tree);

    // Bodies charging at the tree from every side, before and after it in order
    let chargers = [
        (Vec2::new(10.0, 44.0), Vec2::new(2.0, 0.0)),
        (Vec2::new(80.0, 44.0), Vec2::new(-2.0, 0.0)),
        (Vec2::new(44.0, 10.0), Vec2::new(0.0, 2.0)),
        (Vec2::new(44.0, 80.0), Vec2::new(0.0, -2.0)),
    ];
    for (position, velocity) in chargers {
        world.add_body(walker("charger", position, velocity));
    }
    let _late = world.add_body(ball(20.0, 20.0, 4.0, Vec2::new(1.5, 1.5)));

    let mut contacts = 0;
    for _ in 0..120 {
        world.step(1.0 / 60.0, &grid);
        contacts += world
            .events()
            .iter()
            .filter(|event| matches!(event, WorldEvent::Contact { .. }))
            .count();

        let tree = world.body(tree).unwrap();
        assert_eq!(tree.position(), Vec2::new(40.0, 40.0));
        assert_eq!(tree.velocity(), Vec2::new(3.0, 3.0));
    }
    assert!(contacts > 0, "chargers never reached the tree");
}

#[test]
fn test_sub_step_count_does_not_change_free_motion() {
    let velocity = Vec2::new(1.5, -0.5);
    let start = Vec2::new(100.0, 100.0);
    let frame = 0.1;

    let mut positions = Vec::new();
    for sub_steps in [1, 5] {
        let mut world = world_with_sub_steps(sub_steps);
        let handle = world.add_body(
            PhysicsBody::new("runner", start, 8.0, 8.0, ShapeKind::Box, MovementPolicy::OnlyWalk)
                .unwrap()
                .with_velocity(velocity),
        );
        world.step(frame, &OpenField);
        positions.push(world.body(handle).unwrap().position());
    }

    let expected = start + velocity * (frame * 16.0);
    for position in positions {
        assert!(
            (position - expected).length() < 1e-3,
            "got {position}, expected {expected}"
        );
    }
}

#[test]
fn test_removing_unknown_handle_keeps_registry() {
    let mut world = PhysicsWorld::new();
    let first = world.add_body(ball(0.0, 0.0, 1.0, Vec2::ZERO));
    let second = world.add_body(ball(10.0, 0.0, 1.0, Vec2::ZERO));

    let mut other = PhysicsWorld::new();
    for i in 0..4 {
        other.add_body(ball(i as f32 * 10.0, 50.0, 1.0, Vec2::ZERO));
    }
    let foreign = *other.handles().last().unwrap();

    assert!(world.remove_body(foreign).is_none());
    assert!(world.remove_body(BodyHandle::default()).is_none());

    assert_eq!(world.len(), 2);
    assert_eq!(world.handles(), &[first, second]);
}

#[test]
fn test_walker_stops_at_water_swimmer_does_not() {
    let mut lake = TileGrid::new(8, 2, 16.0, Tile::GROUND);
    for column in 4..8 {
        lake.set(column, 0, Tile::Water { speed: 0.5 });
        lake.set(column, 1, Tile::Water { speed: 0.5 });
    }

    let mut world = PhysicsWorld::new();
    let walker = world.add_body(walker("walker", Vec2::new(40.0, 4.0), Vec2::new(1.0, 0.0)));
    let swimmer = PhysicsBody::new(
        "swimmer",
        Vec2::new(40.0, 20.0),
        8.0,
        8.0,
        ShapeKind::Box,
        MovementPolicy::WalkAndSwim,
    )
    .unwrap()
    .with_velocity(Vec2::new(1.0, 0.0));
    let swimmer = world.add_body(swimmer);

    // Three seconds: the swimmer slows to half speed once it touches water
    for _ in 0..180 {
        world.step(1.0 / 60.0, &lake);
    }

    // Shoreline at x = 64
    let walker = world.body(walker).unwrap();
    assert!(
        walker.position().x + walker.width() <= 64.0 + 1e-3,
        "walker at {}",
        walker.position()
    );
    assert!(world.body(swimmer).unwrap().position().x > 64.0);
}

#[test]
fn test_presets_populate_a_world() {
    let loader = PresetLoader::new(presets_path());
    let mut world = PhysicsWorld::with_config(loader.load_world().unwrap()).unwrap();

    for name in loader.list_bodies().unwrap() {
        let body = loader.load_body(&name).unwrap().build(Vec2::ZERO).unwrap();
        world.add_body(body);
    }

    assert_eq!(world.len(), 4);
    // Everything spawned on one spot: one step must not blow up
    world.step(1.0 / 60.0, &OpenField);
    assert!(world.iter().all(|(_, body)| body.position().is_finite()));
}
