use serde::{Deserialize, Serialize};

use crate::dates::{format_date, parse_date, shift_days};
use crate::flight::FlightLeg;

/// Half-width, in days, of the window scanned when the requested date has
/// no match.
pub const ALTERNATIVE_WINDOW_DAYS: i64 = 3;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub origin: String,
    pub destination: String,
    pub date: String,
    #[serde(default = "default_seats", alias = "seats")]
    pub min_seats: u32,
    /// Inclusive lower bound for alternative dates. A return leg passes the
    /// outbound departure date here.
    #[serde(default, alias = "notBefore")]
    pub lower_bound: Option<String>,
}

fn default_seats() -> u32 {
    1
}

impl SearchQuery {
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        date: impl Into<String>,
        min_seats: u32,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            date: date.into(),
            min_seats,
            lower_bound: None,
        }
    }

    pub fn not_before(mut self, lower_bound: impl Into<String>) -> Self {
        self.lower_bound = Some(lower_bound.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayAlternatives {
    pub date: String,
    pub flights: Vec<FlightLeg>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResult {
    pub exact: Vec<FlightLeg>,
    pub alternatives: Vec<DayAlternatives>,
}

impl SearchResult {
    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.alternatives.is_empty()
    }
}

/// Exact-date matches, or failing that the days within
/// ±[`ALTERNATIVE_WINDOW_DAYS`] that have at least one match.
///
/// An unparsable `query.date` is treated as "no results", not an error.
pub fn search(legs: &[FlightLeg], query: &SearchQuery) -> SearchResult {
    let Some(center) = parse_date(&query.date) else {
        return SearchResult::default();
    };

    let exact = matching(legs, query, &format_date(center));
    if !exact.is_empty() {
        return SearchResult {
            exact,
            alternatives: Vec::new(),
        };
    }

    let mut alternatives: Vec<DayAlternatives> = (-ALTERNATIVE_WINDOW_DAYS..=ALTERNATIVE_WINDOW_DAYS)
        .filter(|offset| *offset != 0)
        .filter_map(|offset| shift_days(center, offset))
        .map(format_date)
        .filter(|day| match &query.lower_bound {
            Some(bound) => day.as_str() >= bound.as_str(),
            None => true,
        })
        .filter_map(|day| {
            let flights = matching(legs, query, &day);
            (!flights.is_empty()).then_some(DayAlternatives { date: day, flights })
        })
        .collect();

    alternatives.sort_by(|a, b| a.date.cmp(&b.date));

    SearchResult {
        exact: Vec::new(),
        alternatives,
    }
}

fn matching(legs: &[FlightLeg], query: &SearchQuery, date: &str) -> Vec<FlightLeg> {
    legs.iter()
        .filter(|leg| leg.satisfies(&query.origin, &query.destination, date, query.min_seats))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flight::leg;

    fn ids(flights: &[FlightLeg]) -> Vec<&str> {
        flights.iter().map(|f| f.flight_id.as_str()).collect()
    }

    #[test]
    fn test_exact_match() {
        let legs = vec![leg("A1", "Austin", "Dallas", "2024-09-10", 2)];
        let result = search(&legs, &SearchQuery::new("Austin", "Dallas", "2024-09-10", 2));

        assert_eq!(ids(&result.exact), vec!["A1"]);
        assert!(result.alternatives.is_empty());
    }

    #[test]
    fn test_padded_date_still_matches_exactly() {
        let legs = vec![leg("A1", "Austin", "Dallas", "2024-09-10", 2)];
        let result = search(&legs, &SearchQuery::new("Austin", "Dallas", " 2024-09-10 ", 2));

        assert_eq!(ids(&result.exact), vec!["A1"]);
        assert!(result.alternatives.is_empty());
    }

    #[test]
    fn test_alternative_within_window() {
        let legs = vec![leg("A1", "Austin", "Dallas", "2024-09-10", 2)];
        let result = search(&legs, &SearchQuery::new("Austin", "Dallas", "2024-09-12", 1));

        assert!(result.exact.is_empty());
        assert_eq!(result.alternatives.len(), 1);
        assert_eq!(result.alternatives[0].date, "2024-09-10");
        assert_eq!(ids(&result.alternatives[0].flights), vec!["A1"]);
    }

    #[test]
    fn test_exact_match_suppresses_alternatives() {
        let legs = vec![
            leg("A1", "Austin", "Dallas", "2024-09-10", 5),
            leg("A1", "Austin", "Dallas", "2024-09-11", 5),
            leg("A2", "Austin", "Dallas", "2024-09-09", 5),
        ];
        let result = search(&legs, &SearchQuery::new("austin", "DALLAS", "2024-09-10", 1));

        assert_eq!(ids(&result.exact), vec!["A1"]);
        assert!(result.alternatives.is_empty());
    }

    #[test]
    fn test_zero_seats_always_finds_exact_leg() {
        let legs = vec![leg("A1", "Austin", "Dallas", "2024-09-10", 0)];
        let result = search(&legs, &SearchQuery::new("Austin", "Dallas", "2024-09-10", 0));
        assert_eq!(ids(&result.exact), vec!["A1"]);
    }

    #[test]
    fn test_insufficient_seats_fall_through_to_window() {
        let legs = vec![
            leg("A1", "Austin", "Dallas", "2024-09-10", 1),
            leg("A2", "Austin", "Dallas", "2024-09-13", 4),
            leg("A3", "Austin", "Dallas", "2024-09-14", 4),
        ];
        let result = search(&legs, &SearchQuery::new("Austin", "Dallas", "2024-09-10", 3));

        assert!(result.exact.is_empty());
        let dates: Vec<&str> = result.alternatives.iter().map(|d| d.date.as_str()).collect();
        // 09-14 is four days out
        assert_eq!(dates, vec!["2024-09-13"]);
    }

    #[test]
    fn test_alternatives_sorted_and_grouped_by_day() {
        let legs = vec![
            leg("B2", "Houston", "Austin", "2024-10-03", 2),
            leg("B1", "Houston", "Austin", "2024-09-29", 2),
            leg("B3", "Houston", "Austin", "2024-10-03", 2),
            leg("B4", "Houston", "Austin", "2024-09-30", 2),
        ];
        let result = search(&legs, &SearchQuery::new("Houston", "Austin", "2024-10-01", 1));

        let dates: Vec<&str> = result.alternatives.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-09-29", "2024-09-30", "2024-10-03"]);
        assert_eq!(ids(&result.alternatives[2].flights), vec!["B2", "B3"]);
    }

    #[test]
    fn test_lower_bound_is_inclusive() {
        let legs = vec![
            leg("R1", "Dallas", "Austin", "2024-09-08", 2),
            leg("R2", "Dallas", "Austin", "2024-09-09", 2),
            leg("R3", "Dallas", "Austin", "2024-09-12", 2),
        ];
        let query = SearchQuery::new("Dallas", "Austin", "2024-09-10", 1).not_before("2024-09-09");
        let result = search(&legs, &query);

        let dates: Vec<&str> = result.alternatives.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-09-09", "2024-09-12"]);
        assert!(result.alternatives.iter().all(|d| d.date.as_str() >= "2024-09-09"));
    }

    #[test]
    fn test_window_crosses_year_boundary() {
        let legs = vec![leg("N1", "Fresno", "Oakland", "2025-01-01", 3)];
        let result = search(&legs, &SearchQuery::new("Fresno", "Oakland", "2024-12-30", 1));
        assert_eq!(result.alternatives[0].date, "2025-01-01");
    }

    #[test]
    fn test_invalid_date_returns_nothing() {
        let legs = vec![leg("A1", "Austin", "Dallas", "2024-09-10", 2)];
        let result = search(&legs, &SearchQuery::new("Austin", "Dallas", "2024-09-31", 1));
        assert!(result.is_empty());
    }
}
