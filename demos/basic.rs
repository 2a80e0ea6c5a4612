use memora::memoize;
use std::time::Instant;

#[memoize]
fn fibonacci(n: u32) -> u64 {
    if n <= 1 {
        return n as u64;
    }
    fibonacci(n - 1) + fibonacci(n - 2)
}

#[memoize(name = "slow_square")]
fn slow_square(x: u64) -> u64 {
    println!("  computing {}^2 ...", x);
    std::thread::sleep(std::time::Duration::from_millis(50));
    x * x
}

fn main() {
    println!("=== Memora: basic memoization ===\n");

    let start = Instant::now();
    println!("fibonacci(90) = {}", fibonacci(90));
    println!("computed in {:?}\n", start.elapsed());

    for x in [3, 4, 3, 3, 4] {
        println!("slow_square({}) = {}", x, slow_square(x));
    }

    #[cfg(feature = "stats")]
    if let Some(stats) = memora::stats_registry::get("slow_square") {
        println!(
            "\nslow_square: {} hits, {} misses, hit rate {:.0}%",
            stats.hits(),
            stats.misses(),
            stats.hit_rate() * 100.0
        );
    }
}
