/* Stitching reconstitutes full trips from segment-trips. Every heuristic is a
`StitchRule` that looks at two adjacent trips, and `stitch` does a single left
to right pass: each trip is compared against the last retained trip, and
either gets absorbed into it or is retained itself.
*/
use crate::gps_processor::{GpsPoint, SubwayEntrance};
use crate::projection::planar_distance;
use crate::trip::{LinkType, Trip};

pub trait StitchRule {
    fn link_type(&self) -> LinkType;

    /// Whether `current` continues the journey of `previous`.
    fn should_link(&self, previous: &Trip, current: &Trip) -> bool;
}

pub fn stitch<R: StitchRule + ?Sized>(trips: Vec<Trip>, rule: &R) -> Vec<Trip> {
    let mut connected_trips: Vec<Trip> = Vec::with_capacity(trips.len());
    for trip in trips {
        match connected_trips.last_mut() {
            Some(previous) if rule.should_link(previous, &trip) => {
                debug!(
                    "linking trip {} into trip {} ({})",
                    trip.num,
                    previous.num,
                    rule.link_type().as_str()
                );
                previous.absorb(trip, rule.link_type());
            }
            Some(_) | None => connected_trips.push(trip),
        }
    }
    connected_trips
}

/// Links two trips when the previous one ends near a subway entrance and the
/// next one starts near a (different) subway entrance.
pub struct SubwayStitcher<'a> {
    entrances: &'a [SubwayEntrance],
    buffer_m: f64,
}

impl<'a> SubwayStitcher<'a> {
    pub fn new(entrances: &'a [SubwayEntrance], buffer_m: f64) -> Self {
        SubwayStitcher {
            entrances,
            buffer_m,
        }
    }

    // Returns the entrances matched at the end of the previous trip and the
    // start of the current one. An entrance within reach of the end point is
    // never tested against the start point, so a stop that merely happens to
    // be close to one entrance does not match both sides. The last match wins.
    fn matched_entrances(
        &self,
        end_point: &GpsPoint,
        start_point: &GpsPoint,
    ) -> (Option<&'a SubwayEntrance>, Option<&'a SubwayEntrance>) {
        let mut end_entrance = None;
        let mut start_entrance = None;
        for entrance in self.entrances {
            if planar_distance(entrance, end_point) <= self.buffer_m {
                end_entrance = Some(entrance);
            } else if planar_distance(entrance, start_point) <= self.buffer_m {
                start_entrance = Some(entrance);
            }
        }
        (end_entrance, start_entrance)
    }
}

impl StitchRule for SubwayStitcher<'_> {
    fn link_type(&self) -> LinkType {
        LinkType::Subway
    }

    fn should_link(&self, previous: &Trip, current: &Trip) -> bool {
        let (end_point, start_point) = match (previous.end_point(), current.start_point()) {
            (Some(end_point), Some(start_point)) => (end_point, start_point),
            _ => return false,
        };
        match self.matched_entrances(end_point, start_point) {
            (Some(end_entrance), Some(start_entrance)) => {
                let seconds = start_point.seconds_since(end_point);
                let distance = planar_distance(end_point, start_point);
                debug!(
                    "subway link: ({}, {}) -> ({}, {}), {:.0}m in {}s",
                    end_entrance.latitude,
                    end_entrance.longitude,
                    start_entrance.latitude,
                    start_entrance.longitude,
                    distance,
                    seconds
                );
                true
            }
            _ => false,
        }
    }
}

/// Links two trips when the gap between them could have been covered without
/// stopping, i.e. the implied speed over the gap stays at or below
/// `max_plausible_kph`.
pub struct VelocityStitcher {
    max_plausible_kph: f64,
}

impl VelocityStitcher {
    pub fn new(max_plausible_kph: f64) -> Self {
        VelocityStitcher { max_plausible_kph }
    }

    // `None` if no time passed between the two trips, or one of them has no
    // points
    pub fn gap_kph(previous: &Trip, current: &Trip) -> Option<f64> {
        let end_point = previous.end_point()?;
        let start_point = current.start_point()?;
        let seconds = start_point.seconds_since(end_point);
        if seconds <= 0. {
            return None;
        }
        Some(planar_distance(end_point, start_point) / seconds * 3.6)
    }
}

impl StitchRule for VelocityStitcher {
    fn link_type(&self) -> LinkType {
        LinkType::Velocity
    }

    fn should_link(&self, previous: &Trip, current: &Trip) -> bool {
        match Self::gap_kph(previous, current) {
            Some(kph) => kph <= self.max_plausible_kph,
            None => false,
        }
    }
}
