use chrono::{DateTime, Utc};
use weatherdash_core::clock::{ManualClock, SharedClock, SystemClock};
use weatherdash_core::timeline::truncate_to_millis;
use weatherdash_core::{BoundsAuthority, Config};

pub fn run(now: Option<DateTime<Utc>>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let clock: SharedClock = match now {
        Some(at) => ManualClock::shared(truncate_to_millis(at)),
        None => std::sync::Arc::new(SystemClock),
    };
    let authority = BoundsAuthority::new(clock, &config.timeline)?;
    let json = serde_json::to_string_pretty(&authority.get_bounds())?;
    println!("{json}");
    Ok(())
}
