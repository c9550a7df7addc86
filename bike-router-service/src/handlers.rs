use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use bike_router_core::nearest::nearest;

use crate::error::ApiError;
use crate::extract::ApiQuery;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NearestParams {
    lat: f64,
    lon: f64,
}

/// `GET /nearest?lat=F&lon=F`
///
/// # Errors
///
/// Never actually fails; the `Result` return type matches the other
/// handlers for uniform `ApiError` error-body handling.
pub async fn get_nearest(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<NearestParams>,
) -> Result<Json<Value>, ApiError> {
    let id = nearest(&state.graph, params.lat, params.lon);
    let node = state.graph.node(id);
    Ok(Json(json!({
        "nodeId": id,
        "lat": node.lat,
        "lon": node.lon,
    })))
}

#[derive(Debug, Deserialize)]
pub struct RouteParams {
    from: u32,
    to: u32,
    slider: f64,
}

/// `GET /route?from=I&to=I&slider=F`
///
/// # Errors
///
/// Returns a 400 `ApiError` for an out-of-range slider or node id, or a
/// 404 `ApiError` if no route exists between `from` and `to`.
pub async fn get_route(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<RouteParams>,
) -> Result<Json<Value>, ApiError> {
    if !(0.0..=1.0).contains(&params.slider) {
        return Err(ApiError::bad_request("slider must be in [0, 1]"));
    }
    if params.from as usize >= state.graph.node_count() || params.to as usize >= state.graph.node_count() {
        return Err(ApiError::bad_request("from/to must be valid node ids"));
    }

    let mut route_service = state
        .route_service
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    let result = route_service.route(&state.graph, params.from, params.to, params.slider)?;

    Ok(Json(json!({
        "distanceCm": result.distance_cm,
        "elevationGainCm": result.elevation_gain_cm,
        "geojson": {
            "type": "LineString",
            "coordinates": result.coordinates,
        },
    })))
}

/// `GET /bounds`
pub async fn get_bounds(State(state): State<Arc<AppState>>) -> Json<Value> {
    let (centroid_lat, centroid_lon) = state.bounds.centroid();
    Json(json!({
        "minLat": state.bounds.min_lat,
        "maxLat": state.bounds.max_lat,
        "minLon": state.bounds.min_lon,
        "maxLon": state.bounds.max_lon,
        "centroid": { "lat": centroid_lat, "lon": centroid_lon },
    }))
}
