//! Basic logger usage example
//!
//! Demonstrates the per-severity operations, structured payloads, explicit
//! traces and level exclusion.
//!
//! Run with: cargo run --example basic_usage

use rust_service_logger::prelude::*;
use serde_json::json;
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== Rust Service Logger - Basic Usage Example ===\n");

    let logger = Logger::builder()
        .context("storefront|checkout_flow")
        .excluded_levels(ExcludedLevelSet::new())
        .build();

    println!("1. Logging at different severities:");
    logger.log("Checkout service started");
    logger.debug("Loaded 12 payment providers");
    logger.verbose("Warming price cache");
    logger.warn("Inventory service is slow to answer");
    logger.error("Payment provider rejected the card");

    println!("\n2. Elapsed time between lines:");
    thread::sleep(Duration::from_millis(25));
    logger.log("About 25ms after the previous line");

    println!("\n3. Structured payloads and explicit traces:");
    logger.log(json!({"order": 1042, "items": 3, "total": 59.9}));
    logger.error_with(
        "Order could not be persisted",
        LogOptions::new().trace("INSERT INTO orders ...").time_diff(false),
    );

    println!("\n4. Dispatch by severity name:");
    logger.make_log("warn", "Retrying webhook delivery", None)?;

    println!("\n5. Excluding severities:");
    let quiet = Logger::builder()
        .context("storefront|checkout_flow")
        .excluded_levels(ExcludedLevelSet::parse("debug, verbose")?)
        .build();
    quiet.debug("Debug message (hidden)");
    quiet.verbose("Verbose message (hidden)");
    quiet.log("Log message (visible)");

    println!("\n6. ORM adapter:");
    let orm = OrmLogger::from_logger(&logger);
    orm.log_query("SELECT id, total FROM orders WHERE id = $1");
    orm.log_query_slow(2.4, "SELECT * FROM order_lines");

    logger.flush()?;
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
