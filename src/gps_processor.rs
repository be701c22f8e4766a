use std::iter::Peekable;

use chrono::{DateTime, Utc};
use geo::{Distance, Geodesic};

use crate::error::{Result, TripDetectionError};
use crate::projection::{self, planar_distance, Projected};

/// One fix as handed over by the storage layer. Optional fields may be absent
/// in the source data; `GpsPoint::from_raw` decides which ones are required.
#[derive(Clone, Debug, PartialEq)]
pub struct RawData {
    pub point: Point,
    pub timestamp: Option<DateTime<Utc>>,
    pub horizontal_accuracy: Option<f64>,
    pub speed: Option<f64>,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
}

impl Point {
    pub fn geodesic_distance(&self, other: &Point) -> f64 {
        Geodesic.distance(
            geo::Point::new(self.longitude, self.latitude),
            geo::Point::new(other.longitude, other.latitude),
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GpsPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub easting: f64,
    pub northing: f64,
    pub zone_number: u8,
    pub speed: Option<f64>,
    pub horizontal_accuracy: f64,
    pub timestamp: DateTime<Utc>,
    // gap to the previous accepted point, only known after segmentation
    pub period_before_seconds: f64,
}

impl GpsPoint {
    /// `index` is the position of the fix in the input, used for error reporting.
    pub fn from_raw(index: usize, raw: &RawData) -> Result<Self> {
        let timestamp = raw.timestamp.ok_or(TripDetectionError::MissingField {
            field: "timestamp",
            index,
        })?;
        let horizontal_accuracy = raw
            .horizontal_accuracy
            .ok_or(TripDetectionError::MissingField {
                field: "horizontal_accuracy",
                index,
            })?;
        let utm = projection::project(raw.point.latitude, raw.point.longitude)?;
        Ok(GpsPoint {
            latitude: raw.point.latitude,
            longitude: raw.point.longitude,
            easting: utm.easting,
            northing: utm.northing,
            zone_number: utm.zone_number,
            speed: raw.speed,
            horizontal_accuracy,
            timestamp,
            period_before_seconds: 0.,
        })
    }

    pub fn point(&self) -> Point {
        Point {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    pub fn seconds_since(&self, earlier: &GpsPoint) -> f64 {
        (self.timestamp - earlier.timestamp).num_milliseconds() as f64 / 1000.
    }
}

impl Projected for GpsPoint {
    fn easting(&self) -> f64 {
        self.easting
    }

    fn northing(&self) -> f64 {
        self.northing
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SubwayEntrance {
    pub latitude: f64,
    pub longitude: f64,
    pub easting: f64,
    pub northing: f64,
}

impl SubwayEntrance {
    pub fn new(point: &Point) -> Result<Self> {
        let utm = projection::project(point.latitude, point.longitude)?;
        Ok(SubwayEntrance {
            latitude: point.latitude,
            longitude: point.longitude,
            easting: utm.easting,
            northing: utm.northing,
        })
    }
}

impl Projected for SubwayEntrance {
    fn easting(&self) -> f64 {
        self.easting
    }

    fn northing(&self) -> f64 {
        self.northing
    }
}

pub fn generate_gps_points(fixes: &[RawData]) -> Result<Vec<GpsPoint>> {
    fixes
        .iter()
        .enumerate()
        .map(|(i, raw)| GpsPoint::from_raw(i, raw))
        .collect()
}

pub fn generate_subway_entrances(points: &[Point]) -> Result<Vec<SubwayEntrance>> {
    points.iter().map(SubwayEntrance::new).collect()
}

/// Keeps points whose reported horizontal accuracy is within `cutoff_m`.
pub struct AccuracyFilter<I> {
    points: I,
    cutoff_m: f64,
}

impl<I: Iterator<Item = GpsPoint>> AccuracyFilter<I> {
    pub fn new(points: I, cutoff_m: f64) -> Self {
        AccuracyFilter { points, cutoff_m }
    }
}

impl<I: Iterator<Item = GpsPoint>> Iterator for AccuracyFilter<I> {
    type Item = GpsPoint;

    fn next(&mut self) -> Option<GpsPoint> {
        let cutoff_m = self.cutoff_m;
        self.points.find(|p| p.horizontal_accuracy <= cutoff_m)
    }
}

/// Drops speed spikes. For three consecutive points (last accepted, current,
/// next), `current` is dropped when reaching it from the last accepted point
/// implies at least `speed_threshold_kph` and `next` lies closer to the last
/// accepted point than `current` does.
///
/// Accepted points are never revisited, and a dropped point does not become
/// the reference, so a run of spikes is measured against the same point.
pub struct SpeedAnomalyFilter<I: Iterator<Item = GpsPoint>> {
    points: Peekable<I>,
    speed_threshold_kph: f64,
    last_accepted: Option<GpsPoint>,
}

impl<I: Iterator<Item = GpsPoint>> SpeedAnomalyFilter<I> {
    pub fn new(points: I, speed_threshold_kph: f64) -> Self {
        SpeedAnomalyFilter {
            points: points.peekable(),
            speed_threshold_kph,
            last_accepted: None,
        }
    }

    fn is_anomaly(&mut self, current: &GpsPoint) -> bool {
        let last = match &self.last_accepted {
            // the first point is always trusted
            None => return false,
            Some(last) => last,
        };
        let seconds = current.seconds_since(last);
        if seconds == 0. {
            // speed is indeterminate, not a spike
            return false;
        }
        let distance = planar_distance(last, current);
        let kph = distance / seconds * 3.6;
        if kph < self.speed_threshold_kph {
            return false;
        }
        match self.points.peek() {
            Some(next) => planar_distance(last, next) < distance,
            None => false,
        }
    }
}

impl<I: Iterator<Item = GpsPoint>> Iterator for SpeedAnomalyFilter<I> {
    type Item = GpsPoint;

    fn next(&mut self) -> Option<GpsPoint> {
        loop {
            let current = self.points.next()?;
            if self.is_anomaly(&current) {
                debug!(
                    "dropping speed spike at {} ({}, {})",
                    current.timestamp, current.latitude, current.longitude
                );
                continue;
            }
            self.last_accepted = Some(current.clone());
            return Some(current);
        }
    }
}
