#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::Deserialize;
use tripbreaker_core::gps_processor::{GpsPoint, Point, RawData};
use tripbreaker_core::trip::{Trip, TripSegment};

#[derive(Deserialize)]
struct FixRow {
    latitude: f64,
    longitude: f64,
    timestamp: DateTime<Utc>,
    h_accuracy: f64,
    speed: f64,
}

#[derive(Deserialize)]
struct EntranceRow {
    latitude: f64,
    longitude: f64,
}

// A morning commute with a subway ride in the middle and an afternoon walk,
// recorded in Montreal. It contains one low accuracy fix, one speed spike and
// two fixes sharing a timestamp.
pub fn load_commute_fixes_for_test() -> Vec<RawData> {
    let mut reader = csv::Reader::from_path("./tests/data/commute_fixes.csv").unwrap();
    reader
        .deserialize()
        .map(|row| {
            let row: FixRow = row.unwrap();
            RawData {
                point: Point {
                    latitude: row.latitude,
                    longitude: row.longitude,
                },
                timestamp: Some(row.timestamp),
                horizontal_accuracy: Some(row.h_accuracy),
                speed: Some(row.speed),
            }
        })
        .collect()
}

pub fn load_subway_entrances_for_test() -> Vec<Point> {
    let mut reader = csv::Reader::from_path("./tests/data/subway_entrances.csv").unwrap();
    reader
        .deserialize()
        .map(|row| {
            let row: EntranceRow = row.unwrap();
            Point {
                latitude: row.latitude,
                longitude: row.longitude,
            }
        })
        .collect()
}

pub const BASE_LAT: f64 = 45.5017;
pub const BASE_LNG: f64 = -73.5673;

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2018, 5, 14, 8, 0, 0).unwrap()
}

// Moves `point` by roughly `east_m`/`north_m` meters.
pub fn offset(point: Point, east_m: f64, north_m: f64) -> Point {
    Point {
        latitude: point.latitude + north_m / 111_132.,
        longitude: point.longitude
            + east_m / (111_320. * point.latitude.to_radians().cos()),
    }
}

pub fn base_point() -> Point {
    Point {
        latitude: BASE_LAT,
        longitude: BASE_LNG,
    }
}

pub fn raw(point: Point, seconds: i64, accuracy: f64) -> RawData {
    RawData {
        point,
        timestamp: Some(base_time() + Duration::seconds(seconds)),
        horizontal_accuracy: Some(accuracy),
        speed: None,
    }
}

// A fix `east_m` meters east of the base point, `seconds` after the base time.
pub fn gps_point(east_m: f64, seconds: i64) -> GpsPoint {
    GpsPoint::from_raw(0, &raw(offset(base_point(), east_m, 0.), seconds, 5.)).unwrap()
}

pub fn gps_point_at(point: Point, seconds: i64) -> GpsPoint {
    GpsPoint::from_raw(0, &raw(point, seconds, 5.)).unwrap()
}

pub fn trip_of(num: u32, points: Vec<GpsPoint>) -> Trip {
    Trip::new(
        num,
        TripSegment {
            group: num,
            period_before_seconds: 0.,
            points,
        },
    )
}
