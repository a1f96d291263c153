use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::flight::{FlightLeg, LegKey};
use crate::inventory::{apply_decrement, ensure_unique_keys, validate_amount};
use crate::repository::InventoryStore;
use crate::CoreResult;

/// In-memory inventory, for tests and for running without a backing file.
pub struct InMemoryInventory {
    legs: RwLock<Vec<FlightLeg>>,
}

impl InMemoryInventory {
    /// Fails if two legs share a key.
    pub fn new(legs: Vec<FlightLeg>) -> CoreResult<Self> {
        ensure_unique_keys(&legs)?;
        Ok(Self {
            legs: RwLock::new(legs),
        })
    }
}

impl Default for InMemoryInventory {
    fn default() -> Self {
        Self {
            legs: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl InventoryStore for InMemoryInventory {
    async fn load_all(&self) -> CoreResult<Vec<FlightLeg>> {
        Ok(self.legs.read().await.clone())
    }

    async fn decrement_seats(&self, keys: &[LegKey], amount: u32) -> CoreResult<Vec<FlightLeg>> {
        validate_amount(amount)?;

        let mut legs = self.legs.write().await;
        let touched = apply_decrement(&mut legs, keys, amount);
        tracing::debug!("Decremented {} seat(s) on {} leg(s)", amount, touched);

        Ok(legs.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flight::leg;
    use crate::CoreError;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_decrement_scenario() {
        let store = InMemoryInventory::new(vec![leg("A1", "Austin", "Dallas", "2024-09-10", 2)]).unwrap();
        let keys = vec![LegKey::new("A1", "2024-09-10")];

        let updated = store.decrement_seats(&keys, 2).await.unwrap();
        assert_eq!(updated[0].available_seats, 0);

        let updated = store.decrement_seats(&keys, 1).await.unwrap();
        assert_eq!(updated[0].available_seats, 0);
    }

    #[tokio::test]
    async fn test_zero_amount_is_invalid() {
        let store = InMemoryInventory::new(vec![leg("A1", "Austin", "Dallas", "2024-09-10", 2)]).unwrap();
        let err = store
            .decrement_seats(&[LegKey::new("A1", "2024-09-10")], 0)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidRequest(_)));
    }

    #[test]
    fn test_duplicate_keys_rejected_on_construction() {
        let legs = vec![
            leg("A1", "Austin", "Dallas", "2024-09-10", 5),
            leg("A1", "Austin", "Dallas", "2024-09-10", 5),
        ];
        assert!(matches!(
            InMemoryInventory::new(legs),
            Err(CoreError::StorageUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_decrements_are_not_lost() {
        let store = Arc::new(
            InMemoryInventory::new(vec![leg("A1", "Austin", "Dallas", "2024-09-10", 50)]).unwrap(),
        );
        let key = LegKey::new("A1", "2024-09-10");

        let mut handles = Vec::new();
        for _ in 0..20 {
            let store = store.clone();
            let key = key.clone();
            handles.push(tokio::spawn(async move {
                store.decrement_seats(&[key], 2).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let found = store.find(&key).await.unwrap().unwrap();
        assert_eq!(found.available_seats, 10);
    }
}
