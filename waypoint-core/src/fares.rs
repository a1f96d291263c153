use serde::{Deserialize, Serialize};

use crate::flight::FlightLeg;
use crate::{CoreError, CoreResult};

pub const CHILD_FARE_RATIO: f64 = 0.70;
pub const INFANT_FARE_RATIO: f64 = 0.10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassengerCounts {
    #[serde(default)]
    pub adults: u32,
    #[serde(default)]
    pub children: u32,
    #[serde(default)]
    pub infants: u32,
}

impl PassengerCounts {
    /// Seats the party occupies; infants are counted like everyone else.
    /// `None` when the counts don't fit in a `u32`.
    pub fn total(&self) -> Option<u32> {
        self.adults
            .checked_add(self.children)?
            .checked_add(self.infants)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FareQuote {
    pub adult_fare: f64,
    pub total: f64,
    pub passengers: u32,
}

/// Prices an itinerary. The adult fare is the sum of the leg prices;
/// children and infants pay a fixed share of it.
pub fn quote(legs: &[FlightLeg], counts: PassengerCounts) -> CoreResult<FareQuote> {
    let passengers = counts
        .total()
        .ok_or_else(|| CoreError::InvalidRequest("too many passengers".to_string()))?;
    if passengers == 0 {
        return Err(CoreError::InvalidRequest(
            "at least one passenger is required".to_string(),
        ));
    }

    let adult_fare: f64 = legs.iter().map(|leg| leg.price).sum();
    let total = counts.adults as f64 * adult_fare
        + counts.children as f64 * adult_fare * CHILD_FARE_RATIO
        + counts.infants as f64 * adult_fare * INFANT_FARE_RATIO;

    Ok(FareQuote {
        adult_fare,
        total,
        passengers,
    })
}
