use chrono::{TimeZone, Utc};
use scalekit::temporal::interval::{SteppedInterval, TimeInterval};
use scalekit::temporal::TimeScale;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let mut scale = TimeScale::<f64>::local(chrono_tz::America::New_York)
        .with_domain([
            Utc.with_ymd_and_hms(2024, 3, 8, 15, 20, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 12, 2, 0, 0).unwrap(),
        ])
        .with_range([0.0, 960.0]);
    scale.nice(TimeInterval::Day);
    println!("Niced domain: {:?}", scale.domain());

    let format = scale.tick_format(None)?;
    for tick in scale.ticks(8.0) {
        println!("  {:>10} at {:>6.1}", format.format(&tick), scale.scale(&tick).unwrap_or(f64::NAN));
    }

    let every_six_hours: SteppedInterval = "6 hours".parse()?;
    let labels: Vec<String> = scale
        .ticks(every_six_hours)
        .iter()
        .map(|t| format.format(t))
        .collect();
    println!("\nEvery 6 hours: {}", labels.join(" "));

    Ok(())
}
