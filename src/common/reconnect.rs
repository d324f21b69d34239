//! Fixed-delay reconnection policy.

use std::time::Duration;

use backon::BackoffBuilder;

/// Delays between C-Gate reconnection attempts: a constant interval,
/// retried forever.
pub fn reconnect_delays(delay: Duration) -> impl Iterator<Item = Duration> {
    backon::ConstantBuilder::default()
        .with_delay(delay)
        .without_max_times()
        .build()
}
