use axum::{
    extract::{rejection::JsonRejection, Json, State},
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use waypoint_store::HotelUpdate;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateHotelRequest {
    hotel_id: String,
    new_available_rooms: i64,
}

#[derive(Debug, Serialize)]
struct UpdateHotelResponse {
    ok: bool,
    #[serde(flatten)]
    update: HotelUpdate,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/update_hotel", post(update_hotel))
}

async fn update_hotel(
    State(state): State<AppState>,
    payload: Result<Json<UpdateHotelRequest>, JsonRejection>,
) -> Result<Json<UpdateHotelResponse>, AppError> {
    let Json(req) = payload?;

    let hotel_id = req.hotel_id.trim();
    if hotel_id.is_empty() {
        return Err(AppError::ValidationError("hotelId is required".to_string()));
    }
    let rooms = u32::try_from(req.new_available_rooms).map_err(|_| {
        AppError::ValidationError("newAvailableRooms must be a non-negative integer".to_string())
    })?;

    let update = state
        .hotels
        .set_available_rooms(hotel_id, rooms)
        .await
        .map_err(|err| match err {
            waypoint_core::CoreError::NotFound(_) => AppError::NotFoundError("Hotel not found".to_string()),
            other => other.into(),
        })?;

    Ok(Json(UpdateHotelResponse { ok: true, update }))
}
