use scalekit::quantile::QuantileScale;
use scalekit::quantize::QuantizeScale;
use scalekit::threshold::ThresholdScale;

fn main() {
    tracing_subscriber::fmt::init();

    let scores = [
        45.0, 52.0, 58.0, 61.0, 67.0, 69.0, 72.0, 74.0, 76.0, 78.0, 80.0, 82.0, 84.0, 86.0, 87.0,
        89.0, 91.0, 93.0, 95.0, 98.0,
    ];
    let grades = ["D", "C", "B", "A"];

    let quantile = QuantileScale::default()
        .with_domain(scores)
        .with_range(grades);
    println!("Quartile cut points: {:?}", quantile.quantiles());

    let quantize = QuantizeScale::default()
        .with_domain((40.0, 100.0))
        .with_range(grades);
    println!("Uniform cut points:  {:?}", quantize.thresholds());

    let threshold = ThresholdScale::default()
        .with_domain([60.0, 70.0, 85.0])
        .with_range(grades);

    println!("\nscore  quantile  quantize  threshold");
    for score in [50.0, 65.0, 75.0, 88.0, 97.0] {
        println!(
            "{score:>5}  {:>8}  {:>8}  {:>9}",
            quantile.scale(score).unwrap_or("-"),
            quantize.scale(score).unwrap_or("-"),
            threshold.scale(&score).unwrap_or("-"),
        );
    }

    if let Some((lo, hi)) = quantile.invert_extent(&"A") {
        println!("\nGrade A covers [{lo}, {hi})");
    }
}
