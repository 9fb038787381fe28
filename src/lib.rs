/*!
Discrete-time simulator of the economics of a solo cryptocurrency miner.

Each simulated tick updates a randomly walking asset price, gives the miner
one hash-rate-weighted chance at finding a block, and charges power cost for
the elapsed time. Sessions are built with
[`SessionBuilder`](session::SessionBuilder), driven tick-by-tick or run to
completion, and batched into Monte-Carlo groups with
[`SessionGroup`](session::SessionGroup).

```
use miner_econ::prelude::*;
use std::time::Duration;

let output = Session::builder()
    .hash_rate(250_000.0)
    .manual_clock(Duration::from_secs(30))
    .rng_seed(7)
    .ticks(1000)
    .build()
    .unwrap()
    .run();

println!("mined {} blocks", output.blocks_found);
```

This is not a difficulty-retargeting or proof-of-work model: block discovery
is a fixed linear function of hash rate, and the price walk carries no
market microstructure.
*/

pub mod account;
pub mod clock;
pub mod prelude;
pub mod price;
pub mod results;
pub mod rig;
pub mod session;

pub use session::{Session, SessionBuilder};
