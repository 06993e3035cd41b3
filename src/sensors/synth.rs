//! Synthetic environmental data for degraded-mode operation.
//!
//! When the BME280 is absent at boot the node keeps its telemetry cadence
//! alive with plausible substitute values. The ranges below are the
//! documented fallback bounds; in particular the temperature ceiling sits
//! exactly at the high-temperature alert threshold so synthetic data can
//! never trigger a temperature alert storm.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

/// Synthetic temperature bounds (°C).
pub const TEMP_MIN_C: f32 = 15.0;
pub const TEMP_MAX_C: f32 = 35.0;
/// Synthetic relative-humidity bounds (%).
pub const HUMIDITY_MIN_PCT: f32 = 30.0;
pub const HUMIDITY_MAX_PCT: f32 = 80.0;
/// Synthetic pressure bounds (hPa).
pub const PRESSURE_MIN_HPA: f32 = 963.0;
pub const PRESSURE_MAX_HPA: f32 = 1063.0;

/// Seeded generator of substitute environment readings.
pub struct SyntheticEnv {
    rng: SmallRng,
}

impl SyntheticEnv {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Draw one (temperature °C, humidity %, pressure hPa) triple.
    pub fn next_env(&mut self) -> (f32, f32, f32) {
        (
            self.rng.random_range(TEMP_MIN_C..=TEMP_MAX_C),
            self.rng.random_range(HUMIDITY_MIN_PCT..=HUMIDITY_MAX_PCT),
            self.rng.random_range(PRESSURE_MIN_HPA..=PRESSURE_MAX_HPA),
        )
    }
}
