//! # Domain event catalogue: the closed set of wire event keys.
//!
//! Every outbound event key and its expected parameter shape lives here, as
//! typed records validated at the call site rather than untyped dictionaries
//! validated at the wire boundary.
//!
//! ## Key contract
//! | Key | Direction | Parameters |
//! |-----|-----------|------------|
//! | `update-location` | outbound | `{customer_id, lat, lng}` |
//! | `get-fare-estimate` | outbound | `{customer_id, pickup_lat, pickup_lng, dropoff_lat, dropoff_lng}` |
//! | `nearby-workers` | outbound | `{customer_id, current_lat, current_lng}` |
//! | `message` / `arabic_message` | inbound | server-pushed notification; spelling selected by [`Language::message_key`](crate::locale::Language::message_key) |
//!
//! Inbound keys beyond the catalogue are arbitrary server-pushed strings and
//! are registered directly with
//! [`DispatchTable::observe`](crate::dispatch::DispatchTable::observe).

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Geographic coordinate supplied by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

/// Outbound event keys with stable wire strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiKey {
    /// Periodic rider position update.
    UpdateLocation,
    /// Fare estimate request for a pickup/dropoff pair.
    FareEstimate,
    /// Query for workers near the rider's current position.
    NearbyWorkers,
}

impl ApiKey {
    /// Returns the stable wire string for this key.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiKey::UpdateLocation => "update-location",
            ApiKey::FareEstimate => "get-fare-estimate",
            ApiKey::NearbyWorkers => "nearby-workers",
        }
    }

    /// All catalogued outbound keys, for bulk operations over the closed set.
    pub fn all() -> &'static [ApiKey] {
        &[
            ApiKey::UpdateLocation,
            ApiKey::FareEstimate,
            ApiKey::NearbyWorkers,
        ]
    }
}

/// Typed parameter record for one domain emission.
///
/// Each variant lowers to its documented wire parameter shape via
/// [`EmitAction::params`]; the pairing of key and parameters can never drift
/// apart at a call site.
#[derive(Debug, Clone, PartialEq)]
pub enum EmitAction {
    /// Report the rider's current position.
    UpdateLocation {
        /// Rider identifier.
        customer_id: String,
        /// Current position.
        location: GeoPoint,
    },
    /// Request a fare estimate between two points.
    RequestFareEstimate {
        /// Rider identifier.
        customer_id: String,
        /// Trip start.
        pickup: GeoPoint,
        /// Trip end.
        dropoff: GeoPoint,
    },
    /// Request the set of workers near a position.
    RequestNearbyWorkers {
        /// Rider identifier.
        customer_id: String,
        /// Position to search around.
        location: GeoPoint,
    },
}

impl EmitAction {
    /// The wire key this action emits under.
    pub fn key(&self) -> ApiKey {
        match self {
            EmitAction::UpdateLocation { .. } => ApiKey::UpdateLocation,
            EmitAction::RequestFareEstimate { .. } => ApiKey::FareEstimate,
            EmitAction::RequestNearbyWorkers { .. } => ApiKey::NearbyWorkers,
        }
    }

    /// Lowers the typed record to its wire parameter object.
    pub fn params(&self) -> Value {
        match self {
            EmitAction::UpdateLocation {
                customer_id,
                location,
            } => json!({
                "customer_id": customer_id,
                "lat": location.lat,
                "lng": location.lng,
            }),
            EmitAction::RequestFareEstimate {
                customer_id,
                pickup,
                dropoff,
            } => json!({
                "customer_id": customer_id,
                "pickup_lat": pickup.lat,
                "pickup_lng": pickup.lng,
                "dropoff_lat": dropoff.lat,
                "dropoff_lng": dropoff.lng,
            }),
            EmitAction::RequestNearbyWorkers {
                customer_id,
                location,
            } => json!({
                "customer_id": customer_id,
                "current_lat": location.lat,
                "current_lng": location.lng,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_stable() {
        assert_eq!(ApiKey::UpdateLocation.as_str(), "update-location");
        assert_eq!(ApiKey::FareEstimate.as_str(), "get-fare-estimate");
        assert_eq!(ApiKey::NearbyWorkers.as_str(), "nearby-workers");
    }

    #[test]
    fn test_update_location_param_shape() {
        let action = EmitAction::UpdateLocation {
            customer_id: "c-1".into(),
            location: GeoPoint { lat: 1.5, lng: 2.5 },
        };
        assert_eq!(action.key(), ApiKey::UpdateLocation);
        assert_eq!(
            action.params(),
            json!({"customer_id": "c-1", "lat": 1.5, "lng": 2.5})
        );
    }

    #[test]
    fn test_nearby_workers_param_shape() {
        let action = EmitAction::RequestNearbyWorkers {
            customer_id: "c-2".into(),
            location: GeoPoint { lat: 3.0, lng: 4.0 },
        };
        assert_eq!(
            action.params(),
            json!({"customer_id": "c-2", "current_lat": 3.0, "current_lng": 4.0})
        );
    }

    #[test]
    fn test_fare_estimate_param_shape() {
        let action = EmitAction::RequestFareEstimate {
            customer_id: "c-3".into(),
            pickup: GeoPoint { lat: 1.0, lng: 2.0 },
            dropoff: GeoPoint { lat: 3.0, lng: 4.0 },
        };
        let params = action.params();
        assert_eq!(params["pickup_lat"], 1.0);
        assert_eq!(params["dropoff_lng"], 4.0);
    }

    #[test]
    fn test_catalogue_is_closed() {
        assert_eq!(ApiKey::all().len(), 3);
    }
}
