use std::{error::Error, thread, time::Duration};

use rand::Rng;

use miner_econ::prelude::*;

const BURST_SECS: f64 = 10.0;

fn main() -> Result<(), Box<dyn Error>> {
    // A wall-clock burst, the way an interactive operator would run one:
    // tick, sleep a random 0.1-1.0 s, repeat.
    let mut session = Session::builder()
        .hash_rate(400_000.0)
        .price_model(PriceModel::Normal { drift: 0.0005, volatility: 0.01 })
        .build()?;

    let mut rng = rand::thread_rng();
    let mut elapsed = 0.0;
    while elapsed < BURST_SECS {
        let outcome = session.tick();
        if outcome.block_found {
            println!(
                "Block mined! Received {:.8} coins at ${:.2}",
                MinerAccount::BLOCK_REWARD,
                outcome.price
            );
        }

        let pause = rng.gen_range(0.1..=1.0);
        thread::sleep(Duration::from_secs_f64(pause));
        elapsed += pause;
    }

    println!("{}\n", session.status());

    // The same configuration as a deterministic Monte-Carlo batch.
    let outputs = SessionGroup::new(
        Session::builder()
            .hash_rate(400_000.0)
            .price_model(PriceModel::Normal {
                drift: 0.0005,
                volatility: 0.01,
            })
            .manual_clock(Duration::from_millis(500))
            .ticks(1000),
    )
    .with_seeds(0..32)
    .run_all()?;

    let summary = GroupSummary::of(&outputs)
        .expect("non-empty batch")
        .format(Format::PrettyPrint);
    println!("{}", summary);

    Ok(())
}
