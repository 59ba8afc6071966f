use log::info;
use rand::Rng;
use serde::Deserialize;
use std::thread;
use std::time::Duration;

pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_secs(5);

/// How long the pipeline waits after each page of search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelayPolicy {
    Fixed(Duration),
    /// Whole seconds drawn uniformly from `min_secs..=max_secs`.
    Random { min_secs: u64, max_secs: u64 },
    Disabled,
}

impl Default for DelayPolicy {
    fn default() -> Self {
        DelayPolicy::Fixed(DEFAULT_PAGE_DELAY)
    }
}

impl DelayPolicy {
    pub fn next_delay(&self) -> Duration {
        match *self {
            DelayPolicy::Fixed(d) => d,
            DelayPolicy::Random { min_secs, max_secs } => {
                let (lo, hi) = if min_secs <= max_secs {
                    (min_secs, max_secs)
                } else {
                    (max_secs, min_secs)
                };
                let mut rng = rand::thread_rng();
                Duration::from_secs(rng.gen_range(lo..=hi))
            }
            DelayPolicy::Disabled => Duration::ZERO,
        }
    }

    /// Blocks the calling thread for the next delay.
    pub fn pause(&self) {
        let delay = self.next_delay();
        if delay.is_zero() {
            return;
        }
        info!("Waiting for {} seconds (Page Delay)...", delay.as_secs_f64());
        thread::sleep(delay);
    }
}
