use std::collections::HashSet;

use crate::flight::{FlightLeg, LegKey};
use crate::{CoreError, CoreResult};

/// A collection where two legs share a `(flightId, departDate)` can't be
/// booked against, so it is treated as unusable storage.
pub fn ensure_unique_keys(legs: &[FlightLeg]) -> CoreResult<()> {
    let mut seen = HashSet::with_capacity(legs.len());
    for leg in legs {
        let key = leg.key();
        if !seen.insert(key.clone()) {
            return Err(CoreError::StorageUnavailable(format!(
                "duplicate flight {} on {}",
                key.flight_id, key.depart_date
            )));
        }
    }
    Ok(())
}

pub fn validate_amount(amount: u32) -> CoreResult<()> {
    if amount == 0 {
        return Err(CoreError::InvalidRequest(
            "seat amount must be a positive integer".to_string(),
        ));
    }
    Ok(())
}

/// Takes `amount` seats from every leg whose key is in `keys`, flooring at
/// zero. Keys that match no leg are ignored; a leg listed twice is only
/// decremented once. Returns the number of legs touched.
pub fn apply_decrement(legs: &mut [FlightLeg], keys: &[LegKey], amount: u32) -> usize {
    let mut touched = 0;

    for leg in legs.iter_mut() {
        if keys.iter().any(|key| leg.has_key(key)) {
            leg.available_seats = leg.available_seats.saturating_sub(amount);
            touched += 1;
        }
    }

    touched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flight::leg;

    #[test]
    fn test_decrement_floors_at_zero() {
        let mut legs = vec![leg("A1", "Austin", "Dallas", "2024-09-10", 2)];
        let keys = vec![LegKey::new("A1", "2024-09-10")];

        apply_decrement(&mut legs, &keys, 2);
        assert_eq!(legs[0].available_seats, 0);

        apply_decrement(&mut legs, &keys, 1);
        assert_eq!(legs[0].available_seats, 0);
    }

    #[test]
    fn test_decrement_matches_on_date_as_well_as_id() {
        let mut legs = vec![
            leg("A1", "Austin", "Dallas", "2024-09-10", 5),
            leg("A1", "Austin", "Dallas", "2024-09-11", 5),
        ];
        let touched = apply_decrement(&mut legs, &[LegKey::new("A1", "2024-09-11")], 3);

        assert_eq!(touched, 1);
        assert_eq!(legs[0].available_seats, 5);
        assert_eq!(legs[1].available_seats, 2);
    }

    #[test]
    fn test_unknown_keys_change_nothing() {
        let mut legs = vec![leg("A1", "Austin", "Dallas", "2024-09-10", 5)];
        let before = legs.clone();

        let touched = apply_decrement(&mut legs, &[LegKey::new("ZZ9", "2024-09-10")], 1);

        assert_eq!(touched, 0);
        assert_eq!(legs, before);
    }

    #[test]
    fn test_duplicate_keys_decrement_once() {
        let mut legs = vec![leg("A1", "Austin", "Dallas", "2024-09-10", 5)];
        let key = LegKey::new("A1", "2024-09-10");

        apply_decrement(&mut legs, &[key.clone(), key], 2);
        assert_eq!(legs[0].available_seats, 3);
    }

    #[test]
    fn test_duplicate_leg_keys_rejected() {
        let legs = vec![
            leg("A1", "Austin", "Dallas", "2024-09-10", 5),
            leg("A1", "Austin", "Dallas", "2024-09-11", 5),
        ];
        assert!(ensure_unique_keys(&legs).is_ok());

        let legs = vec![
            leg("A1", "Austin", "Dallas", "2024-09-10", 5),
            leg("A1", "Austin", "Houston", "2024-09-10", 3),
        ];
        assert!(matches!(
            ensure_unique_keys(&legs),
            Err(CoreError::StorageUnavailable(_))
        ));
    }

    #[test]
    fn test_zero_amount_rejected() {
        assert!(matches!(validate_amount(0), Err(CoreError::InvalidRequest(_))));
        assert!(validate_amount(1).is_ok());
    }
}
