//! Ten concurrent callers, one driver dial.
//!
//! The scenario this crate exists for: every corner of an application asks
//! for "the" connection, and without a gate each ask is a fresh dial. Here
//! ten tasks probe the connection concurrently right after startup and the
//! driver's own counters show a single connect, capped at the requested
//! pool size.
//!
//! Run with: cargo run --example shared_status

use poolgate::driver::{MemoryDriver, MemoryError};
use poolgate::{ConnectRequest, Error, PoolGate};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let gate = PoolGate::new(MemoryDriver::new());

    // Ten probes fired before anything is connected. The first one in dials;
    // the rest join its attempt.
    let mut probes = Vec::new();
    for i in 0..10 {
        let gate = gate.clone();
        probes.push(tokio::spawn(async move {
            let handle = gate
                .get_connection(ConnectRequest::to("memory://primary").pool_size(3))
                .await?;
            println!(
                "probe {i:2}: handle {} via {} (pool_size {:?})",
                handle.id(),
                handle.uri(),
                handle.pool_size()
            );
            Ok::<_, Error<MemoryError>>(())
        }));
    }
    for probe in probes {
        probe.await??;
    }

    let stats = gate.driver().stats();
    println!("driver connects: {}, handles open: {}", stats.connects, stats.open);

    gate.close_pool(false).await?;
    println!("closed; gate empty: {}", gate.db().is_none());
    Ok(())
}
