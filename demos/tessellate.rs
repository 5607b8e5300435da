//! Tessellate a walled cube and print per-cell statistics

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use voronoi_shards::*;

fn main() -> Result<()> {
    let region = BoundedRegion::cube(1.0).with_walls(tetra_walls());
    let tester = VolumeTester::new(&region);
    println!("Region volume: {:.4}", region.volume());

    // Rejection-sample sites inside the walls
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut sites = Vec::new();
    while sites.len() < 200 {
        let p = DVec3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        if tester.is_inside(p) {
            sites.push(Site::new(sites.len(), p));
        }
    }

    let start = std::time::Instant::now();
    let tessellation = build_cells(&region, &sites, 0.01)?;
    println!(
        "Built {} cells in {:.2?} (total volume {:.4})",
        tessellation.len(),
        start.elapsed(),
        tessellation.total_volume()
    );

    let degenerate = tessellation.cells.iter().filter(|c| c.is_degenerate()).count();
    let faces: usize = tessellation.cells.iter().map(|c| c.face_count()).sum();
    let triangles: usize = tessellation.shells().map(|s| triangulate(s).len() / 3).sum();
    println!("\nCell statistics:");
    println!("  Degenerate: {}", degenerate);
    println!("  Average faces: {:.1}", faces as f64 / tessellation.len() as f64);
    println!("  Shell triangles: {}", triangles);

    println!("\nFirst cells:");
    for (cell, shell) in tessellation.cells.iter().zip(tessellation.shells()).take(5) {
        println!(
            "  #{:<3} volume {:.5} -> inset {:.5}, {} vertices, {} faces",
            cell.id,
            cell.volume,
            shell.volume,
            cell.vertex_count(),
            cell.face_count()
        );
    }

    Ok(())
}
