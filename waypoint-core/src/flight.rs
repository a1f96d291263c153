use serde::{Deserialize, Serialize};

use crate::dates::same_city;

/// Natural key of a leg. A `flight_id` recurs across dates, so the
/// departure date is part of the identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegKey {
    pub flight_id: String,
    pub depart_date: String,
}

impl LegKey {
    pub fn new(flight_id: impl Into<String>, depart_date: impl Into<String>) -> Self {
        Self {
            flight_id: flight_id.into(),
            depart_date: depart_date.into(),
        }
    }
}

/// One directional flight on a specific date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightLeg {
    pub flight_id: String,
    pub origin: String,
    pub destination: String,
    #[serde(alias = "departureDate")]
    pub depart_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_date: Option<String>,
    #[serde(default, alias = "departureTime", skip_serializing_if = "Option::is_none")]
    pub depart_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_time: Option<String>,
    #[serde(default)]
    pub available_seats: u32,
    #[serde(default)]
    pub price: f64,
    /// Fields we don't model are carried through a rewrite untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl FlightLeg {
    pub fn key(&self) -> LegKey {
        LegKey::new(self.flight_id.clone(), self.depart_date.clone())
    }

    pub fn has_key(&self, key: &LegKey) -> bool {
        self.flight_id == key.flight_id && self.depart_date == key.depart_date
    }

    /// Route, date and capacity predicate used by availability search.
    pub fn satisfies(&self, origin: &str, destination: &str, date: &str, min_seats: u32) -> bool {
        same_city(&self.origin, origin)
            && same_city(&self.destination, destination)
            && self.depart_date == date
            && self.available_seats >= min_seats
    }
}

#[cfg(test)]
pub(crate) fn leg(flight_id: &str, origin: &str, destination: &str, date: &str, seats: u32) -> FlightLeg {
    FlightLeg {
        flight_id: flight_id.to_string(),
        origin: origin.to_string(),
        destination: destination.to_string(),
        depart_date: date.to_string(),
        arrival_date: Some(date.to_string()),
        depart_time: Some("08:00".to_string()),
        arrival_time: Some("09:10".to_string()),
        available_seats: seats,
        price: 120.0,
        extra: serde_json::Map::new(),
    }
}
