//! Basic example: fill a small array and print its layout.

use anyhow::Context;
use lla::{Lla, LlaConfig, LlaError};

fn main() -> anyhow::Result<()> {
    // Small structure so the snapshot fits on one line.
    let config = LlaConfig::new(8, 4, 0.5, 0.75);
    let mut lla = Lla::new(config).context("invalid configuration")?;

    for x in [42, 7, 19, 3, 88, 7, 61, 25] {
        lla.insert(x).with_context(|| format!("insert {x}"))?;
    }
    println!("{lla}");

    // Keep going until the root refuses.
    let mut next = 100;
    loop {
        match lla.insert(next) {
            Ok(()) => next += 1,
            Err(err @ LlaError::CapacityExceeded { .. }) => {
                println!("stopped after {} elements: {err}", lla.len());
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    println!("sorted: {:?}", lla.values().collect::<Vec<_>>());
    Ok(())
}
