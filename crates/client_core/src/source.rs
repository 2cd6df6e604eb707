//! Loading collaborators that feed the models their initial data.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use shared::{
    domain::{Destination, OffersByType, TripEvent},
    protocol::ItineraryBundle,
};
use tracing::{info, warn};

use crate::model::Models;

pub trait DataSource {
    fn fetch_events(&self) -> Result<Vec<TripEvent>>;
    fn fetch_destinations(&self) -> Result<Vec<Destination>>;
    fn fetch_offers(&self) -> Result<Vec<OffersByType>>;
}

/// Data decoded from a JSON itinerary bundle.
#[derive(Debug, Clone)]
pub struct BundleSource {
    bundle: ItineraryBundle,
}

impl BundleSource {
    pub fn from_bundle(bundle: ItineraryBundle) -> Self {
        Self { bundle }
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let bundle = serde_json::from_str(raw).context("failed to decode itinerary bundle")?;
        Ok(Self { bundle })
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read itinerary bundle {}", path.display()))?;
        Self::from_json_str(&raw)
            .with_context(|| format!("invalid itinerary bundle {}", path.display()))
    }
}

impl DataSource for BundleSource {
    fn fetch_events(&self) -> Result<Vec<TripEvent>> {
        Ok(self.bundle.events.clone())
    }

    fn fetch_destinations(&self) -> Result<Vec<Destination>> {
        Ok(self.bundle.destinations.clone())
    }

    fn fetch_offers(&self) -> Result<Vec<OffersByType>> {
        Ok(self.bundle.offers.clone())
    }
}

/// Source with nothing behind it.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptySource;

impl DataSource for EmptySource {
    fn fetch_events(&self) -> Result<Vec<TripEvent>> {
        Ok(Vec::new())
    }

    fn fetch_destinations(&self) -> Result<Vec<Destination>> {
        Ok(Vec::new())
    }

    fn fetch_offers(&self) -> Result<Vec<OffersByType>> {
        Ok(Vec::new())
    }
}

/// Delivers each collection to its model exactly once. Reference data goes
/// first so rows can resolve names when events arrive. A failed fetch still
/// initializes its model, empty, so the loading gate always opens.
pub fn load_models(source: &dyn DataSource, models: &Models) {
    let destinations = source.fetch_destinations().unwrap_or_else(|err| {
        warn!("source: destinations unavailable: {err:#}");
        Vec::new()
    });
    models.destinations.init(destinations);

    let offers = source.fetch_offers().unwrap_or_else(|err| {
        warn!("source: offers unavailable: {err:#}");
        Vec::new()
    });
    models.offers.init(offers);

    let events = source.fetch_events().unwrap_or_else(|err| {
        warn!("source: trip events unavailable: {err:#}");
        Vec::new()
    });
    models.trip_events.init(events);
    info!("source: initial load finished");
}
