//! Run the animated shard scene headless for a few seconds of frames

use voronoi_shards::*;

fn main() -> Result<()> {
    let config = SceneConfigBuilder::new()
        .seed(48923)
        .layout(ParticleLayout::Regular { gap: 0.2 })?
        .build()?;

    let mut scene = ShardScene::new(config);
    println!("Particles: {}", scene.particles().len());

    let frame_ms = 1000.0 / 60.0;
    for frame in 0..180 {
        let time = frame as f64 * frame_ms;
        scene.update(time);
        let stats = scene.build_frame(0.0)?;

        if frame % 30 == 0 {
            println!(
                "t={:>6.0}ms rot={:.3} inset={:.4} shards={} culled={} triangles={}",
                time,
                scene.y_rotation(),
                scene.inset_distance(),
                stats.cells,
                stats.culled,
                stats.triangles
            );
        }
        if frame == 90 {
            scene.reshuffle_colors();
            println!("Colors reshuffled");
        }
    }

    let vertices: usize = scene.meshes().map(|m| m.vertex_count()).sum();
    println!("\nLast frame: {} meshes, {} vertices", scene.meshes().count(), vertices);

    Ok(())
}
