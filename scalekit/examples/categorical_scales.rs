use scalekit::band::BandScale;
use scalekit::ordinal::OrdinalScale;
use scalekit::point::PointScale;

fn main() {
    tracing_subscriber::fmt::init();

    let fruits = ["apple", "banana", "cherry", "date"];

    println!("=== Band Scale ===\n");
    let mut band = BandScale::default()
        .with_domain(fruits)
        .with_padding_inner(0.1)
        .with_padding_outer(0.2);
    band.range_round((0.0, 400.0));
    println!("step {} bandwidth {}", band.step(), band.bandwidth());
    for fruit in fruits {
        println!("  {fruit:>7} starts at {:?}", band.scale(&fruit));
    }
    println!("  pixel 150 is over {:?}", band.invert(150.0));

    println!("\n=== Point Scale ===\n");
    let point = PointScale::default()
        .with_domain(fruits)
        .with_range((0.0, 400.0))
        .with_padding(0.5);
    for fruit in fruits {
        println!("  {fruit:>7} at {:?}", point.scale(&fruit));
    }

    println!("\n=== Ordinal Scale ===\n");
    let mut ordinal = OrdinalScale::default().with_range(["circle", "square", "triangle"]);
    for fruit in fruits {
        println!("  {fruit:>7} → {:?}", ordinal.lookup_or_insert(fruit));
    }
    println!("  domain grew to {:?}", ordinal.domain());
}
