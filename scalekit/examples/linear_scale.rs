use scalekit::numeric::linear::LinearScale;
use scalekit::numeric::log::LogScale;
use scalekit::numeric::{ContinuousScale, Linearish};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("=== Linear Scale ===\n");
    let mut scale = LinearScale::<f64>::default()
        .with_domain([0.3, 98.6])
        .with_range([0.0, 500.0]);
    scale.nice(10.0);
    println!("Niced domain: {:?}", scale.domain());

    for x in [0.0, 25.0, 50.0, 75.0, 100.0] {
        let y = scale.scale(x).unwrap_or(f64::NAN);
        println!("  {x:>5.1} → {y:>5.1} → {:>5.1}", scale.invert(y));
    }

    let format = scale.tick_format(10.0, None)?;
    let labels: Vec<String> = scale.ticks(10.0).iter().map(|t| format.format(*t)).collect();
    println!("Ticks: {}", labels.join(", "));

    println!("\n=== Log Scale ===\n");
    let log = LogScale::<f64>::default()
        .with_domain([1.0, 10_000.0])
        .with_range([0.0, 400.0]);
    let format = log.tick_format(5.0, None)?;
    for tick in log.ticks(5.0) {
        let label = format.format(tick);
        if !label.is_empty() {
            println!("  {label:>4} at {:.1}", log.scale(tick).unwrap_or(f64::NAN));
        }
    }

    Ok(())
}
