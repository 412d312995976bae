use anyhow::{Context, Result};
use rota::Balancer;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Backend {
    name: String,
    addr: String,
}

fn main() -> Result<()> {
    let file = std::fs::File::open("demos/data/backends.json")
        .context("backends.json should open read only")?;
    let backends: Vec<Backend> =
        serde_json::from_reader(file).context("backends.json should be proper JSON")?;

    let balancer = Balancer::round_robin(backends)?;
    println!("dispatching across {} backends", balancer.len());
    for _ in 0..balancer.len() * 2 {
        let (backend, ordinal) = balancer.next()?;
        println!("-> [{ordinal}] {} ({})", backend.name, backend.addr);
    }

    // Two backends fail their health probe.
    for down in [1, 3] {
        if balancer.retain(down)? {
            println!("retained [{down}]");
        }
    }
    for _ in 0..balancer.len() {
        let (backend, ordinal) = balancer.next()?;
        println!("-> [{ordinal}] {} ({})", backend.name, backend.addr);
    }

    // They come back; the rotation heals in order.
    for up in [3, 1] {
        if balancer.recover(up) {
            println!("recovered [{up}]");
        }
    }
    for _ in 0..balancer.len() {
        let (backend, ordinal) = balancer.next()?;
        println!("-> [{ordinal}] {} ({})", backend.name, backend.addr);
    }

    Ok(())
}
