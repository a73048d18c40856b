use crate::models::Coordinates;
use std::f64::consts::FRAC_PI_2;

/// Mean Earth radius in miles
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

const FEET_PER_MILE: f64 = 5280.0;

/// Largest amount a true distance can exceed its one-decimal rounding by, plus float slack
const ROUNDING_SLACK_MILES: f64 = 0.06;

/// Great-circle distance in miles between two points, rounded to one decimal place.
///
/// Inputs are not range-checked.
pub fn calculate_distance(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos()
            * b.latitude.to_radians().cos()
            * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    (EARTH_RADIUS_MILES * c * 10.0).round() / 10.0
}

/// Human-readable distance: feet under a mile, one decimal under ten miles,
/// whole miles beyond that.
pub fn format_distance(distance: f64) -> String {
    if distance < 1.0 {
        format!("{} feet", (distance * FEET_PER_MILE).round() as i64)
    } else if distance < 10.0 {
        format!("{:.1} miles", distance)
    } else {
        format!("{} miles", distance.round() as i64)
    }
}

/// Lat/lon rectangle enclosing every point within a radius of an origin.
///
/// Used to skip the trigonometry for listings that cannot be in range. The box
/// is padded for the one-decimal rounding of [`calculate_distance`], so it never
/// rejects a point the exact check would accept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl BoundingBox {
    pub fn around(origin: Coordinates, radius_miles: f64) -> Self {
        let angular = (radius_miles + ROUNDING_SLACK_MILES) / EARTH_RADIUS_MILES;
        let lat_delta = angular.to_degrees();

        let min_latitude = origin.latitude - lat_delta;
        let max_latitude = origin.latitude + lat_delta;

        // Circle reaches a pole: every meridian is in range.
        if max_latitude >= 90.0 || min_latitude <= -90.0 || angular >= FRAC_PI_2 {
            return Self {
                min_latitude: min_latitude.max(-90.0),
                max_latitude: max_latitude.min(90.0),
                min_longitude: -180.0,
                max_longitude: 180.0,
            };
        }

        let ratio = angular.sin() / origin.latitude.to_radians().cos();
        if ratio >= 1.0 {
            return Self {
                min_latitude,
                max_latitude,
                min_longitude: -180.0,
                max_longitude: 180.0,
            };
        }

        let lon_delta = ratio.asin().to_degrees();
        let min_longitude = origin.longitude - lon_delta;
        let max_longitude = origin.longitude + lon_delta;

        // Crossing the antimeridian: give up on the longitude bound.
        if min_longitude < -180.0 || max_longitude > 180.0 {
            return Self {
                min_latitude,
                max_latitude,
                min_longitude: -180.0,
                max_longitude: 180.0,
            };
        }

        Self {
            min_latitude,
            max_latitude,
            min_longitude,
            max_longitude,
        }
    }

    pub fn contains(&self, point: Coordinates) -> bool {
        point.latitude >= self.min_latitude
            && point.latitude <= self.max_latitude
            && point.longitude >= self.min_longitude
            && point.longitude <= self.max_longitude
    }
}
