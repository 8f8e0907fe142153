use std::sync::Arc;

use binscout::application::cascade::Cascade;
use binscout::application::query::Params;
use binscout::application::relax::RelaxationDriver;
use binscout::application::service::{ScoutService, ServiceSettings};
use binscout::testkit::domain::coarse_policy;
use binscout::testkit::source::{adapters, StubSource};

/// Thresholds used by every scenario.
pub const THRESHOLDS: [i64; 4] = [800, 700, 600, 500];

pub fn params(pairs: &[(&str, &str)]) -> Params {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

pub fn driver(min_viable: usize) -> RelaxationDriver {
    RelaxationDriver::new(coarse_policy(), THRESHOLDS.to_vec(), min_viable)
}

/// A service over stub sources with the coarse policy and `min_viable` 5.
pub fn service(stubs: &[&Arc<StubSource>]) -> ScoutService {
    ScoutService::new(
        Cascade::new(adapters(stubs)),
        driver(5),
        ServiceSettings::default(),
    )
}
