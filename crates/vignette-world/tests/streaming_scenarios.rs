use std::collections::HashSet;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use vignette_core::ManualClock;
use vignette_world::{
    ChunkConfig, ChunkCoord, ChunkGenerator, Environment, EnvironmentConfig, SceneGraph, SineHash,
    StreamingDelta, Wind, WorldStreamer,
};

fn streamer() -> WorldStreamer {
    WorldStreamer::new(ChunkConfig {
        cosmetic_seed: Some(1),
        ..Default::default()
    })
}

fn square(cx: i32, cz: i32) -> HashSet<ChunkCoord> {
    ChunkCoord::new(cx, cz).square_around(2).collect()
}

fn xs(coords: &[ChunkCoord]) -> HashSet<i32> {
    coords.iter().map(|c| c.x).collect()
}

#[test]
fn test_origin_loads_five_by_five_keys() {
    let mut scene = SceneGraph::new();
    let mut streamer = streamer();
    streamer.update(Vec3::ZERO, &mut scene);

    let mut expected = Vec::new();
    for cx in -2..=2 {
        for cz in -2..=2 {
            expected.push(format!("{cx}:{cz}"));
        }
    }
    let mut keys = streamer.resident_keys();
    keys.sort();
    expected.sort();
    assert_eq!(keys, expected);
}

#[test]
fn test_crossing_one_boundary_swaps_a_column() {
    let mut scene = SceneGraph::new();
    let mut streamer = streamer();
    streamer.update(Vec3::ZERO, &mut scene);

    let StreamingDelta { loaded, unloaded } = streamer.update(Vec3::new(61.0, 0.0, 0.0), &mut scene);
    assert_eq!(unloaded.len(), 5);
    assert_eq!(loaded.len(), 5);
    assert_eq!(xs(&unloaded), HashSet::from([-2]));
    assert_eq!(xs(&loaded), HashSet::from([3]));
    assert_eq!(streamer.resident_count(), 25);
    assert_eq!(streamer.resident_coords(), square(1, 0));
}

#[test]
fn test_exact_boundary_belongs_to_positive_side() {
    let mut scene = SceneGraph::new();
    let mut streamer = streamer();

    streamer.update(Vec3::new(30.0, 0.0, -30.0), &mut scene);
    assert_eq!(streamer.resident_coords(), square(1, 0));

    streamer.update(Vec3::new(-90.0, 0.0, 90.0), &mut scene);
    assert_eq!(streamer.resident_coords(), square(-1, 2));
}

#[test]
fn test_jump_across_two_boundaries() {
    let mut scene = SceneGraph::new();
    let mut streamer = streamer();
    streamer.update(Vec3::ZERO, &mut scene);

    let delta = streamer.update(Vec3::new(125.0, 0.0, 125.0), &mut scene);
    assert_eq!(streamer.resident_coords(), square(2, 2));
    // overlap of the two squares is 3x3
    assert_eq!(delta.loaded.len(), 16);
    assert_eq!(delta.unloaded.len(), 16);
    assert_eq!(scene.count(|r| matches!(r, vignette_world::Renderable::Chunk(_))), 25);
}

#[test]
fn test_random_walk_keeps_registry_exact() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut scene = SceneGraph::new();
    let mut streamer = streamer();
    let mut pos = Vec3::ZERO;

    for _ in 0..200 {
        pos += Vec3::new(rng.gen_range(-150.0..150.0), 0.0, rng.gen_range(-150.0..150.0));
        streamer.update(pos, &mut scene);
        let center = ChunkCoord::from_world_pos(pos, 60.0);
        assert_eq!(streamer.resident_coords(), square(center.x, center.z));
        assert_eq!(scene.count(|r| matches!(r, vignette_world::Renderable::Chunk(_))), 25);
    }
}

#[test]
fn test_regenerate_matches_fresh_environment() {
    let viewer = Vec3::new(200.0, 1.6, -75.0);

    let mut scene = SceneGraph::new();
    let mut env = Environment::new(EnvironmentConfig::default());
    env.init(Vec3::ZERO, &mut scene);
    env.update(viewer, &ManualClock::new(0), &mut scene);
    let delta = env.regenerate_world(viewer, &mut scene);
    assert_eq!(delta.loaded.len(), 25);
    assert!(delta.unloaded.is_empty());

    let mut fresh_scene = SceneGraph::new();
    let mut fresh = Environment::new(EnvironmentConfig::default());
    fresh.init(viewer, &mut fresh_scene);

    assert_eq!(env.streamer().resident_keys(), fresh.streamer().resident_keys());
    for chunk in fresh.streamer().resident_chunks() {
        let other = env
            .streamer()
            .get_chunk(&chunk.content.coord)
            .expect("same chunk resident");
        assert_eq!(other.content.grass, chunk.content.grass);
        assert_eq!(other.content.rocks.len(), chunk.content.rocks.len());
        assert_eq!(other.content.trees.len(), chunk.content.trees.len());
    }
}

#[test]
fn test_no_tree_near_landmark_across_random_chunks() {
    let mut rng = StdRng::seed_from_u64(2024);
    let mut generator = ChunkGenerator::with_rng(ChunkConfig::default(), SineHash, StdRng::seed_from_u64(3));

    let mut trees = 0;
    for i in 0..1200 {
        // half near the clearing, half anywhere
        let coord = if i % 2 == 0 {
            ChunkCoord::new(rng.gen_range(-1..=1), rng.gen_range(0..=1))
        } else {
            ChunkCoord::new(rng.gen_range(-500..500), rng.gen_range(-500..500))
        };
        let content = generator.generate(coord);
        for tree in &content.trees {
            trees += 1;
            let world = content.tree_world_position(tree);
            assert!(
                !(world.x.abs() < 10.0 && (world.z - 40.0).abs() < 10.0),
                "tree at {world:?} in chunk {coord}"
            );
        }
    }
    assert!(trees > 0);
}

#[test]
fn test_wind_stays_in_range() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut wind = Wind::new();
    let mut now = 1_700_000_000_000u64;
    for _ in 0..10_000 {
        now += rng.gen_range(0..100_000);
        wind.advance(now);
        assert!((0.1..=0.9).contains(&wind.strength));
        assert!((wind.direction.length() - 1.0).abs() < 1e-5);
    }
}
