use scalekit::color::diverging::DivergingScale;
use scalekit::color::sequential::SequentialScale;
use scalekit::interpolator::{ColorSpace, ValueInterpolator};
use scalekit_common::value::Value;
use std::sync::Arc;

fn main() {
    tracing_subscriber::fmt::init();

    println!("=== Sequential (Lab) ===\n");
    let mut sequential = SequentialScale::<Value>::linear().with_domain((0.0, 100.0));
    sequential.set_range_with(
        Arc::new(ValueInterpolator::new(ColorSpace::Lab)),
        ["white", "steelblue"],
    );
    for x in [0.0, 25.0, 50.0, 75.0, 100.0] {
        if let Some(color) = sequential.scale(x) {
            println!("  {x:>5.1} → {color}");
        }
    }

    println!("\n=== Diverging ===\n");
    let diverging = DivergingScale::<Value>::linear()
        .with_domain((-10.0, 0.0, 40.0))
        .with_range(["firebrick", "white", "royalblue"])
        .with_clamp(true);
    for x in [-20.0, -10.0, -5.0, 0.0, 10.0, 40.0] {
        if let Some(color) = diverging.scale(x) {
            println!("  {x:>5.1} → {color}");
        }
    }
}
