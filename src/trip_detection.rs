use std::time::Instant;

use crate::config::TripDetectionConfig;
use crate::error::{Result, TripDetectionError};
use crate::gps_processor::{
    self, AccuracyFilter, GpsPoint, RawData, SpeedAnomalyFilter, SubwayEntrance,
};
use crate::stitching::{self, SubwayStitcher, VelocityStitcher};
use crate::trip::{Trip, TripSegment};

/// Splits points into segments wherever more than `break_period_s` seconds
/// pass between two consecutive points. Every point gets its
/// `period_before_seconds` here.
pub fn segment<I>(points: I, break_period_s: f64) -> Vec<TripSegment>
where
    I: IntoIterator<Item = GpsPoint>,
{
    let mut segments: Vec<TripSegment> = Vec::new();
    let mut group: u32 = 0;
    for mut point in points {
        // the last point seen is always the end of the last segment
        let period = match segments.last().and_then(|s| s.end()) {
            None => 0.,
            Some(last) => point.seconds_since(last),
        };
        if period > break_period_s {
            group += 1;
        }
        point.period_before_seconds = period;

        match segments.last_mut() {
            Some(segment) if segment.group == group => segment.points.push(point),
            Some(_) | None => segments.push(TripSegment {
                group,
                period_before_seconds: period,
                points: vec![point],
            }),
        }
    }
    segments
}

/// Starts out with one trip per segment, numbered from `first_num`. Fails if
/// the numbers would not fit in a `u32`.
pub fn initialize_trips(segments: Vec<TripSegment>, first_num: u32) -> Result<Vec<Trip>> {
    // `first_num..` computes one past the last number handed out
    let fits = u32::try_from(segments.len())
        .ok()
        .and_then(|count| first_num.checked_add(count))
        .is_some();
    if !fits {
        return Err(TripDetectionError::InvalidConfig(format!(
            "`first_trip_num` {} leaves no room for {} trips",
            first_num,
            segments.len()
        )));
    }
    Ok(segments
        .into_iter()
        .zip(first_num..)
        .map(|(segment, num)| Trip::new(num, segment))
        .collect())
}

/// Runs the full pipeline for one user: projection, cleaning, segmentation
/// and stitching. `fixes` must be ordered by timestamp. The entrances are
/// shared between users, so they come in already projected (see
/// `gps_processor::generate_subway_entrances`).
pub fn detect_trips(
    fixes: &[RawData],
    subway_entrances: &[SubwayEntrance],
    config: &TripDetectionConfig,
) -> Result<Vec<Trip>> {
    let started_at = Instant::now();
    config.validate()?;

    let points = gps_processor::generate_gps_points(fixes)?;

    let high_accuracy_points =
        AccuracyFilter::new(points.into_iter(), config.accuracy_cutoff_meters);
    let cleaned_points =
        SpeedAnomalyFilter::new(high_accuracy_points, config.erroneous_speed_kph);

    let segments = segment(cleaned_points, config.break_interval_seconds);
    let cleaned_count: usize = segments.iter().map(|s| s.points.len()).sum();
    info!(
        "{} of {} fixes kept after cleaning, {} segments",
        cleaned_count,
        fixes.len(),
        segments.len()
    );

    let trips = initialize_trips(segments, config.first_trip_num)?;
    let trips = stitching::stitch(
        trips,
        &SubwayStitcher::new(subway_entrances, config.subway_buffer_meters),
    );
    let trips = match config.velocity_link_max_kph {
        Some(max_kph) => stitching::stitch(trips, &VelocityStitcher::new(max_kph)),
        None => trips,
    };

    info!(
        "detected {} trips in {:.2} s",
        trips.len(),
        started_at.elapsed().as_secs_f64()
    );
    Ok(trips)
}
