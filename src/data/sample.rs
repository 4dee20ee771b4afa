//! Synthetic company generation.
//!
//! This is the sole producer on the fallback path, so it is infallible and
//! fully determined by `(n, seed)`.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::StandardNormal;

use crate::domain::{CompanyRecord, Dataset, Provenance};

/// Default number of synthetic companies.
pub const DEFAULT_SAMPLE_COUNT: usize = 100;
/// Default generator seed.
pub const DEFAULT_SEED: u64 = 42;

pub const INDUSTRIES: [&str; 5] = ["Software", "Fintech", "Healthcare", "E-commerce", "AI/ML"];
pub const LOCATIONS: [&str; 5] = ["San Francisco", "New York", "London", "Singapore", "Berlin"];

/// Log-space mean of the funding distribution (e^15 ≈ $3.3M median).
const FUNDING_LOG_MEAN: f64 = 15.0;
/// Log-space standard deviation of the funding distribution.
const FUNDING_LOG_SIGMA: f64 = 1.5;

/// Employee count range, half-open.
const EMPLOYEES_MIN: u32 = 10;
const EMPLOYEES_MAX: u32 = 1000;

/// Founding year range, half-open.
const YEAR_MIN: i32 = 2010;
const YEAR_MAX: i32 = 2024;

/// Probability that a synthetic company has raised money.
pub const RAISED_PROBABILITY: f64 = 0.7;

/// Generate `n` synthetic companies.
///
/// Every field is drawn independently; the label does not depend on the
/// features, so a model trained on this data mostly learns the base rate.
pub fn generate_sample(n: usize, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut records = Vec::with_capacity(n);

    for i in 0..n {
        // exp(mu + sigma * z) is a log-normal draw without a fallible constructor.
        let z: f64 = rng.sample(StandardNormal);
        let funding_amount = (FUNDING_LOG_MEAN + FUNDING_LOG_SIGMA * z).exp();

        let industry = INDUSTRIES[rng.gen_range(0..INDUSTRIES.len())];
        let location = LOCATIONS[rng.gen_range(0..LOCATIONS.len())];
        let employee_count = rng.gen_range(EMPLOYEES_MIN..EMPLOYEES_MAX);
        let founding_year = rng.gen_range(YEAR_MIN..YEAR_MAX);
        let raised_money = rng.gen_bool(RAISED_PROBABILITY);

        records.push(CompanyRecord {
            name: format!("Company_{i}"),
            funding_amount,
            industry: industry.to_string(),
            location: location.to_string(),
            employee_count,
            founding_year,
            raised_money,
        });
    }

    Dataset::new(Provenance::Synthetic, records)
}
