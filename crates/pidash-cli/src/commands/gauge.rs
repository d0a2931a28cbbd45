//! Render the semicircle gauge as a standalone SVG.

use pidash_core::SemiGauge;

pub fn run(value: f64, size: f64, stroke_width: f64, output: Option<&str>) {
    let svg = SemiGauge::new(size, stroke_width).render_svg(value);
    match output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, svg) {
                eprintln!("write to {path} failed: {e}");
                std::process::exit(1);
            }
            println!("gauge written to {path}");
        }
        None => print!("{svg}"),
    }
}
