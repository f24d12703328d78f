//! Append throughput: `GrowVec` vs `Vec` over growing element counts.
//!
//! Usage: `cargo run --release -p strand-bench --example append_throughput [max_elements]`

use strand_bench::{measure_appends, BenchProfile};

fn main() {
    let max = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(BenchProfile::DEFAULT_ELEMENT_COUNT * 10);

    println!("=== strand append throughput ===\n");
    println!("{:>12} {:>14} {:>14} {:>8}", "elements", "GrowVec", "Vec", "ratio");

    let mut n = 1_000;
    while n <= max {
        let report = measure_appends(&BenchProfile::new(n));
        println!(
            "{:>12} {:>14} {:>14} {:>8.2}",
            report.elements,
            format!("{:?}", report.grow_vec),
            format!("{:?}", report.std_vec),
            report.ratio(),
        );
        n *= 10;
    }
}
