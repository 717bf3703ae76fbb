pub mod metrics;
pub mod tiers;
