use async_trait::async_trait;

use crate::flight::{FlightLeg, LegKey};
use crate::CoreResult;

/// Authoritative flight inventory.
///
/// Implementations must serialize `decrement_seats` calls so that two
/// overlapping bookings cannot lose an update.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Full collection. A missing or malformed backing store is an error,
    /// never an empty list.
    async fn load_all(&self) -> CoreResult<Vec<FlightLeg>>;

    /// Takes `amount` seats from every leg matching one of `keys` and
    /// returns the updated collection once it is durable.
    async fn decrement_seats(&self, keys: &[LegKey], amount: u32) -> CoreResult<Vec<FlightLeg>>;

    async fn find(&self, key: &LegKey) -> CoreResult<Option<FlightLeg>> {
        let legs = self.load_all().await?;
        Ok(legs.into_iter().find(|leg| leg.has_key(key)))
    }
}
