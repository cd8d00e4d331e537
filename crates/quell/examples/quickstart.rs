//! Minimal end-to-end run of both models, printed as ASCII art.
//!
//! Run with: `cargo run --example quickstart`

use quell::prelude::*;

fn print_grid(label: &str, pixels: &[u32], width: usize) {
    println!("{label}:");
    for row in pixels.chunks(width) {
        let line: String = row
            .iter()
            .map(|&p| {
                // Luma threshold on the blended channels.
                let luma = u32::from(pixel::red(p))
                    + u32::from(pixel::green(p))
                    + u32::from(pixel::blue(p));
                if luma > 3 * 128 {
                    '#'
                } else {
                    '.'
                }
            })
            .collect();
        println!("  {line}");
    }
}

fn overlapping_demo() {
    let black = 0xff000000u32;
    let white = 0xffffffffu32;
    // A 4x4 sample with a white diagonal band.
    let sample = [
        white, white, black, black, //
        white, black, black, white, //
        black, black, white, white, //
        black, white, white, white,
    ];

    let mut model = OverlappingModel::new(
        &sample,
        4,
        4,
        OverlappingOptions {
            pattern_size: 3,
            symmetry: 8,
            periodic: true,
            width: 24,
            height: 12,
            seed: 7,
            ..OverlappingOptions::default()
        },
    )
    .expect("sample is well-formed");

    if model.run(10_000) {
        let (w, h) = model.render_size();
        let mut pixels = vec![0u32; w * h];
        model.render(&mut pixels).expect("buffer sized to render");
        print_grid("overlapping", &pixels, w);
    } else {
        let state = model.state();
        println!(
            "overlapping run hit a contradiction after {} of {} cells",
            state.collapsed_cells, state.total_cells
        );
    }
    let metrics = model.metrics();
    println!(
        "  ({} steps, {} propagation pops, peak stack {})",
        metrics.steps, metrics.propagation_pops, metrics.peak_stack_depth
    );
}

fn tiled_demo() {
    let solid = |name: &str, colour: u32| TileDef {
        name: name.into(),
        symmetry: SymmetryClass::X,
        weight: 1.0,
        pixels: vec![colour; 4],
    };
    let defs = [solid("dark", 0xff202020), solid("light", 0xffe0e0e0)];
    let rules = [
        NeighbourRule::new("dark", "light"),
        NeighbourRule::new("light", "dark"),
    ];
    let tileset = Tileset::assemble(2, &defs, &rules, None).expect("rules are well-formed");

    let mut model = SimpleTiledModel::new(
        tileset,
        TiledOptions {
            width: 12,
            height: 6,
            periodic: true,
            seed: 11,
            ..TiledOptions::default()
        },
    )
    .expect("tileset is well-formed");

    assert!(model.run(10_000), "alternating tiles cannot contradict");
    let (w, h) = model.render_size();
    let mut pixels = vec![0u32; w * h];
    model.render(&mut pixels).expect("buffer sized to render");
    print_grid("tiled", &pixels, w);
}

fn main() {
    overlapping_demo();
    tiled_demo();
}
