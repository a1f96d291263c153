use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, Json, Query, State},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use waypoint_core::fares::{self, FareQuote, PassengerCounts};
use waypoint_core::{search, FlightLeg, LegKey, SearchQuery, SearchResult};

use crate::error::AppError;
use crate::state::AppState;

/// Both fields are checked by hand: a leg without a string `flightId` and
/// `departDate` can't match anything and is skipped, and `take` accepts any
/// positive integral number.
#[derive(Debug, Deserialize)]
struct BookRequest {
    #[serde(default)]
    legs: Value,
    #[serde(default)]
    take: Value,
}

impl BookRequest {
    fn leg_keys(&self) -> Result<Vec<LegKey>, AppError> {
        let legs = self
            .legs
            .as_array()
            .ok_or_else(|| AppError::ValidationError("legs must be an array".to_string()))?;

        Ok(legs
            .iter()
            .filter_map(|leg| {
                let flight_id = leg.get("flightId")?.as_str()?;
                let depart_date = leg.get("departDate")?.as_str()?;
                Some(LegKey::new(flight_id, depart_date))
            })
            .collect())
    }

    /// Seats never go below zero, so anything past `u32::MAX` is clamped.
    fn seat_count(&self) -> Result<u32, AppError> {
        let invalid = || AppError::ValidationError("take must be a positive integer".to_string());
        let number = self.take.as_number().ok_or_else(invalid)?;

        let take = match number.as_u64() {
            Some(take) => take as f64,
            None => number.as_f64().ok_or_else(invalid)?,
        };
        if !(take >= 1.0 && take.fract() == 0.0) {
            return Err(invalid());
        }

        Ok(take.min(u32::MAX as f64) as u32)
    }
}

#[derive(Debug, Serialize)]
struct BookResponse {
    ok: bool,
    flights: Vec<FlightLeg>,
}

#[derive(Debug, Deserialize)]
struct QuoteRequest {
    legs: Vec<LegKey>,
    counts: PassengerCounts,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/flights", get(list_flights))
        .route("/api/flights/search", get(search_flights))
        .route("/api/book", post(book))
        .route("/api/quote", post(quote))
}

async fn list_flights(State(state): State<AppState>) -> Result<Json<Vec<FlightLeg>>, AppError> {
    let flights = state.flights.load_all().await?;
    Ok(Json(flights))
}

async fn search_flights(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<SearchResult>, AppError> {
    let Query(query) = query?;
    let flights = state.flights.load_all().await?;
    Ok(Json(search(&flights, &query)))
}

async fn book(
    State(state): State<AppState>,
    payload: Result<Json<BookRequest>, JsonRejection>,
) -> Result<Json<BookResponse>, AppError> {
    let Json(req) = payload?;

    let keys = req.leg_keys()?;
    let take = req.seat_count()?;

    let flights = state.flights.decrement_seats(&keys, take).await?;
    info!("Booked {} seat(s) on {} leg(s)", take, keys.len());

    Ok(Json(BookResponse { ok: true, flights }))
}

async fn quote(
    State(state): State<AppState>,
    payload: Result<Json<QuoteRequest>, JsonRejection>,
) -> Result<Json<FareQuote>, AppError> {
    let Json(req) = payload?;
    let flights = state.flights.load_all().await?;

    let legs = req
        .legs
        .iter()
        .map(|key| {
            flights
                .iter()
                .find(|leg| leg.has_key(key))
                .cloned()
                .ok_or_else(|| {
                    AppError::NotFoundError(format!(
                        "flight {} on {} not found",
                        key.flight_id, key.depart_date
                    ))
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(fares::quote(&legs, req.counts)?))
}
