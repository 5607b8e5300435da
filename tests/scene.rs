//! End-to-end scene behaviour

use voronoi_shards::*;

fn scene(layout: ParticleLayout, seed: u64) -> ShardScene {
    let config = SceneConfigBuilder::new()
        .seed(seed)
        .layout(layout)
        .unwrap()
        .build()
        .unwrap();
    ShardScene::new(config)
}

#[test]
fn test_regular_layout_frames() {
    let mut scene = scene(ParticleLayout::Regular { gap: 0.25 }, 48923);
    assert!(!scene.particles().is_empty());

    for frame in 0..4 {
        scene.update(frame as f64 * 16.0);
        let stats = scene.build_frame(0.0).unwrap();
        assert!(stats.sites <= scene.particles().len());
        assert_eq!(stats.cells + stats.culled, stats.sites);
        assert!(stats.cells > 0);
    }
}

#[test]
fn test_particles_stay_inside_region() {
    let mut scene = scene(ParticleLayout::Random { count: 40 }, 3);
    let tester = scene.tester().clone();
    let started_inside: Vec<bool> = scene
        .particles()
        .iter()
        .map(|p| tester.is_inside(p.position))
        .collect();

    for frame in 0..500 {
        scene.update(frame as f64 * 16.0);
    }
    for (particle, inside) in scene.particles().iter().zip(started_inside) {
        if inside {
            assert!(tester.is_inside(particle.position));
        }
    }
}

#[test]
fn test_extra_displacement_moves_shards_outward() {
    let mut calm = scene(ParticleLayout::Random { count: 30 }, 11);
    let mut loud = scene(ParticleLayout::Random { count: 30 }, 11);
    calm.update(0.0);
    loud.update(0.0);
    calm.build_frame(0.0).unwrap();
    loud.build_frame(2.0).unwrap();

    let spread = |scene: &ShardScene| -> f32 {
        scene
            .meshes()
            .flat_map(|m| m.positions.iter())
            .map(|p| p[0] * p[0] + p[2] * p[2])
            .sum()
    };
    assert!(spread(&loud) > spread(&calm));
}

#[test]
fn test_mirror_z_flag() {
    let config = SceneConfigBuilder::new()
        .seed(5)
        .walls(WallPreset::None)
        .layout(ParticleLayout::Random { count: 1 })
        .unwrap()
        .displace_by(0.0)
        .unwrap()
        .inset_by(0.0)
        .unwrap()
        .build()
        .unwrap();

    let mut mirrored = ShardScene::new(config.clone());
    let mut plain = ShardScene::new(SceneConfig {
        mirror_z: false,
        ..config
    });
    mirrored.build_frame(0.0).unwrap();
    plain.build_frame(0.0).unwrap();

    let a = mirrored.meshes().next().unwrap();
    let b = plain.meshes().next().unwrap();
    assert_eq!(a.vertex_count(), b.vertex_count());

    let sum_z = |m: &ShardMesh| -> f32 { m.positions.iter().map(|p| p[2]).sum() };
    assert!((sum_z(a) + sum_z(b)).abs() < 1e-3);
}
