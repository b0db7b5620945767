use crate::service::{OfficeService, RandomSource};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

/// Periodically perturb temperature and garbage level
///
/// Demo stand-in for real sensors. Each tick runs one temperature step and
/// one garbage step through the regular update path, so alerts fire exactly
/// as they would for reported values. The first tick fires immediately.
pub async fn run_simulation<R>(service: Arc<OfficeService>, interval_seconds: u64, mut rng: R)
where
    R: RandomSource + 'static,
{
    let period = Duration::from_secs(interval_seconds.max(1));
    let mut ticker = interval(period);

    // Skip missed ticks to prevent bursts after a stall
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(interval_seconds = period.as_secs(), "Sensor simulation started");

    loop {
        ticker.tick().await;

        let temperature = service.simulate_temperature_change(&mut rng);
        let garbage = service.simulate_garbage_level_change(&mut rng);

        debug!(temperature, garbage, "Simulated sensor readings");
    }
}
