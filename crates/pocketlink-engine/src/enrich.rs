use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Traffic source labels a click can be attributed to.
pub const SOURCES: [&str; 5] = ["Direct", "Email", "Social Media", "Search Engine", "Referral"];

/// Coarse location labels a click can be attributed to.
pub const LOCATIONS: [&str; 8] = [
    "New York, US",
    "London, UK",
    "Tokyo, JP",
    "Sydney, AU",
    "Toronto, CA",
    "Berlin, DE",
    "Mumbai, IN",
    "São Paulo, BR",
];

/// Analytics attached to a click when it is recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrichment {
    pub source: String,
    pub location: String,
}

/// Strategy deciding the source and location of a click.
///
/// There is no real analytics pipeline; the default implementation picks
/// labels at random.
pub trait ClickEnricher: Send + Sync + 'static {
    fn enrich(&self) -> Enrichment;
}

/// Picks a source from [`SOURCES`] and a location from [`LOCATIONS`],
/// each uniformly at random.
#[derive(Debug)]
pub struct RandomEnricher {
    rng: Mutex<StdRng>,
}

impl RandomEnricher {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomEnricher {
    fn default() -> Self {
        Self::new()
    }
}

impl ClickEnricher for RandomEnricher {
    fn enrich(&self) -> Enrichment {
        let mut rng = self.rng.lock();
        let source = SOURCES[rng.random_range(0..SOURCES.len())];
        let location = LOCATIONS[rng.random_range(0..LOCATIONS.len())];
        Enrichment {
            source: source.to_string(),
            location: location.to_string(),
        }
    }
}

/// Attributes every click to the same source and location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedEnricher {
    enrichment: Enrichment,
}

impl FixedEnricher {
    pub fn new(source: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            enrichment: Enrichment {
                source: source.into(),
                location: location.into(),
            },
        }
    }
}

impl ClickEnricher for FixedEnricher {
    fn enrich(&self) -> Enrichment {
        self.enrichment.clone()
    }
}
