/* Runs trip detection over many users. Users share nothing but the subway
entrances and the config, so they are processed in parallel. A user whose data
is broken is reported and skipped, the rest of the batch goes on.
*/
use anyhow::{Context, Result};
use rayon::prelude::*;

use crate::config::TripDetectionConfig;
use crate::gps_processor::{self, Point, RawData, SubwayEntrance};
use crate::trip::TripSummary;
use crate::trip_detection;

/// Where fixes and reference data come from (a survey database, an export
/// directory, ...).
pub trait FixSource: Sync {
    fn user_ids(&self) -> Result<Vec<String>>;

    /// Fixes of one user, ordered by timestamp.
    fn load_fixes(&self, user_id: &str) -> Result<Vec<RawData>>;

    fn load_subway_entrances(&self) -> Result<Vec<Point>>;
}

pub trait TripSink {
    fn write_trips(&mut self, user_id: &str, trips: &[TripSummary]) -> Result<()>;
}

pub struct UserOutcome {
    pub user_id: String,
    // number of trips written
    pub result: Result<usize>,
}

fn detect_for_user(
    source: &dyn FixSource,
    user_id: &str,
    subway_entrances: &[SubwayEntrance],
    config: &TripDetectionConfig,
) -> Result<Vec<TripSummary>> {
    let fixes = source.load_fixes(user_id)?;
    let trips = trip_detection::detect_trips(&fixes, subway_entrances, config)?;
    Ok(trips.iter().map(|trip| trip.summary()).collect())
}

/// Fails as a whole only if the shared inputs cannot be loaded; per-user
/// failures end up in the returned outcomes.
///
/// Users are handled in chunks of one user per worker thread: a chunk is
/// detected in parallel and written out before the next one starts, so only
/// one chunk of results is held in memory.
pub fn process_users<S: FixSource, K: TripSink>(
    source: &S,
    sink: &mut K,
    config: &TripDetectionConfig,
) -> Result<Vec<UserOutcome>> {
    config.validate()?;
    let subway_entrances = source.load_subway_entrances()?;
    let subway_entrances = gps_processor::generate_subway_entrances(&subway_entrances)
        .context("invalid subway entrance")?;
    let user_ids = source.user_ids()?;
    info!(
        "processing {} users with {} subway entrances",
        user_ids.len(),
        subway_entrances.len()
    );

    let chunk_size = rayon::current_num_threads().max(1);
    let mut outcomes: Vec<UserOutcome> = Vec::with_capacity(user_ids.len());
    for chunk in user_ids.chunks(chunk_size) {
        let detected: Vec<Result<Vec<TripSummary>>> = chunk
            .par_iter()
            .map(|user_id| detect_for_user(source, user_id, &subway_entrances, config))
            .collect();

        for (user_id, result) in chunk.iter().zip(detected) {
            let result = result.and_then(|trips| {
                sink.write_trips(user_id, &trips)?;
                Ok(trips.len())
            });
            if let Err(e) = &result {
                warn!("trip detection failed for user {}: {:#}", user_id, e);
            }
            outcomes.push(UserOutcome {
                user_id: user_id.clone(),
                result,
            });
        }
    }

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    info!(
        "batch finished: {} users ok, {} failed",
        outcomes.len() - failed,
        failed
    );
    Ok(outcomes)
}
