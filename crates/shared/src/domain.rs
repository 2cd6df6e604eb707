use std::{fmt, str::FromStr};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ParseEnumError;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(EventId);
id_newtype!(DestinationId);
id_newtype!(OfferId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventType {
    #[default]
    Taxi,
    Bus,
    Train,
    Ship,
    Drive,
    Flight,
    CheckIn,
    Sightseeing,
    Restaurant,
}

impl EventType {
    pub const ALL: [EventType; 9] = [
        EventType::Taxi,
        EventType::Bus,
        EventType::Train,
        EventType::Ship,
        EventType::Drive,
        EventType::Flight,
        EventType::CheckIn,
        EventType::Sightseeing,
        EventType::Restaurant,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Taxi => "taxi",
            EventType::Bus => "bus",
            EventType::Train => "train",
            EventType::Ship => "ship",
            EventType::Drive => "drive",
            EventType::Flight => "flight",
            EventType::CheckIn => "check-in",
            EventType::Sightseeing => "sightseeing",
            EventType::Restaurant => "restaurant",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        EventType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == lower)
            .ok_or_else(|| ParseEnumError::new("event type", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Picture {
    pub src: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub id: DestinationId,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub pictures: Vec<Picture>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub id: OfferId,
    pub title: String,
    pub price: u32,
}

/// Offers available to one event type, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffersByType {
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub offers: Vec<Offer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripEvent {
    pub id: EventId,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub base_price: u32,
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
    pub destination: DestinationId,
    #[serde(default)]
    pub offers: Vec<OfferId>,
    #[serde(default)]
    pub is_favorite: bool,
}

impl TripEvent {
    pub fn duration(&self) -> Duration {
        self.date_to - self.date_from
    }
}

/// A trip event that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTripEvent {
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub base_price: u32,
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
    pub destination: DestinationId,
    #[serde(default)]
    pub offers: Vec<OfferId>,
    #[serde(default)]
    pub is_favorite: bool,
}

impl NewTripEvent {
    pub fn with_id(self, id: EventId) -> TripEvent {
        TripEvent {
            id,
            event_type: self.event_type,
            base_price: self.base_price,
            date_from: self.date_from,
            date_to: self.date_to,
            destination: self.destination,
            offers: self.offers,
            is_favorite: self.is_favorite,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterType {
    #[default]
    Everything,
    Future,
    Present,
    Past,
}

impl FilterType {
    pub const ALL: [FilterType; 4] = [
        FilterType::Everything,
        FilterType::Future,
        FilterType::Present,
        FilterType::Past,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterType::Everything => "everything",
            FilterType::Future => "future",
            FilterType::Present => "present",
            FilterType::Past => "past",
        }
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        FilterType::ALL
            .into_iter()
            .find(|filter| filter.as_str() == lower)
            .ok_or_else(|| ParseEnumError::new("filter", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortType {
    #[default]
    Day,
    Time,
    Price,
}

impl SortType {
    pub const ALL: [SortType; 3] = [SortType::Day, SortType::Time, SortType::Price];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortType::Day => "day",
            SortType::Time => "time",
            SortType::Price => "price",
        }
    }
}

impl fmt::Display for SortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        SortType::ALL
            .into_iter()
            .find(|sort| sort.as_str() == lower)
            .ok_or_else(|| ParseEnumError::new("sort", s))
    }
}

/// Severity tag carried by every model notification. It decides how much of
/// the list is re-rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateType {
    /// One entity changed in place.
    Patch,
    /// Structural change such as a new filter or sort.
    Minor,
    /// The whole list is invalid, e.g. after create or delete.
    Major,
    /// A model received its initial data.
    Init,
}
