/*!
Re-export of common values and datatypes used for building and analyzing
mining sessions. Must be imported manually.

```
use miner_econ::prelude::*;
```
*/

use crate::{account, clock, price, results, rig, session};

pub use account::{MinerAccount, Status};

pub use clock::{Clock, ManualClock, SystemClock};

pub use price::{
    Price, PriceModel, PriceModelError, PriceProcess, DEFAULT_SEED_PRICE,
};

pub use results::{Format, GroupSummary, SessionOutput};

pub use rig::{HashRate, MiningRig, RigError};

pub use session::{
    Session, SessionBuildError, SessionBuilder, SessionGroup, TickOutcome,
};
