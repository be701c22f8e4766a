use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::Serialize;

use crate::gps_processor::GpsPoint;

#[derive(Clone, Debug, PartialEq)]
pub struct TripSegment {
    pub group: u32,
    pub period_before_seconds: f64,
    pub points: Vec<GpsPoint>,
}

impl TripSegment {
    pub fn start(&self) -> Option<&GpsPoint> {
        self.points.first()
    }

    pub fn end(&self) -> Option<&GpsPoint> {
        self.points.last()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    Subway,
    Velocity,
}

impl LinkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkType::Subway => "subway",
            LinkType::Velocity => "velocity",
        }
    }
}

/// Records that the segments starting at `first_segment` were absorbed from
/// another trip.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TripLink {
    pub link_type: LinkType,
    pub first_segment: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Trip {
    pub num: u32,
    pub trip_code: Option<i32>,
    pub segments: Vec<TripSegment>,
    pub links: Vec<TripLink>,
}

impl Trip {
    pub fn new(num: u32, segment: TripSegment) -> Self {
        Trip {
            num,
            trip_code: None,
            segments: vec![segment],
            links: Vec::new(),
        }
    }

    pub fn first_segment(&self) -> Option<&TripSegment> {
        self.segments.first()
    }

    pub fn last_segment(&self) -> Option<&TripSegment> {
        self.segments.last()
    }

    // `None` for a trip without points
    pub fn start_point(&self) -> Option<&GpsPoint> {
        self.points().next()
    }

    pub fn end_point(&self) -> Option<&GpsPoint> {
        self.segments.iter().rev().find_map(|s| s.end())
    }

    pub fn points(&self) -> impl Iterator<Item = &GpsPoint> {
        self.segments.iter().flat_map(|s| s.points.iter())
    }

    /// Takes over all segments of `other`, which is consumed.
    pub fn absorb(&mut self, other: Trip, link_type: LinkType) {
        let first_segment = self.segments.len();
        self.links.push(TripLink {
            link_type,
            first_segment,
        });
        // links of `other` point into its own segment list
        self.links.extend(other.links.into_iter().map(|link| TripLink {
            link_type: link.link_type,
            first_segment: link.first_segment + first_segment,
        }));
        self.segments.extend(other.segments);
    }

    // unit: meter
    pub fn distance(&self) -> f64 {
        self.points()
            .tuple_windows()
            .map(|(a, b)| a.point().geodesic_distance(&b.point()))
            .sum()
    }

    pub fn start_utc(&self) -> Option<DateTime<Utc>> {
        self.start_point().map(|p| p.timestamp)
    }

    pub fn end_utc(&self) -> Option<DateTime<Utc>> {
        self.end_point().map(|p| p.timestamp)
    }

    // (longitude, latitude) as geojson expects
    pub fn geojson_coordinates(&self) -> Vec<(f64, f64)> {
        self.points().map(|p| (p.longitude, p.latitude)).collect()
    }

    pub fn summary(&self) -> TripSummary {
        TripSummary {
            num: self.num,
            trip_code: self.trip_code,
            start_utc: self.start_utc(),
            end_utc: self.end_utc(),
            distance_m: self.distance(),
            coordinates: self.geojson_coordinates(),
        }
    }
}

/// What a trip sink gets to persist for each trip.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TripSummary {
    pub num: u32,
    pub trip_code: Option<i32>,
    pub start_utc: Option<DateTime<Utc>>,
    pub end_utc: Option<DateTime<Utc>>,
    pub distance_m: f64,
    pub coordinates: Vec<(f64, f64)>,
}
