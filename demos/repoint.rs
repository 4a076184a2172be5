//! Moving the gate to a different backing resource.
//!
//! Two ways to repoint: an explicit close_pool followed by a fresh connect,
//! and the atomic reconnect that swaps without ever exposing an empty gate
//! to concurrent callers.
//!
//! Run with: cargo run --example repoint

use poolgate::driver::MemoryDriver;
use poolgate::{ConnectRequest, PoolGate};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let gate = PoolGate::new(MemoryDriver::new());

    // Step one: the deliberate two-call variant.
    let primary = gate.connect(ConnectRequest::to("memory://primary")).await?;
    println!("connected to {} (handle {})", primary.uri(), primary.id());

    gate.close_pool(false).await?;
    println!("closed; gate is {}", gate.phase());

    let standby = gate.connect(ConnectRequest::to("memory://standby")).await?;
    println!("connected to {} (handle {})", standby.uri(), standby.id());

    // Step two: the atomic variant. No caller can sneak a dial in between
    // the close and the new connect.
    let replica = gate.reconnect(ConnectRequest::to("memory://replica")).await?;
    println!("repointed to {} (handle {})", replica.uri(), replica.id());

    let stats = gate.driver().stats();
    println!(
        "driver connects: {}, handles open: {} (replaced handles were closed)",
        stats.connects, stats.open
    );

    gate.close_pool(false).await?;
    Ok(())
}
