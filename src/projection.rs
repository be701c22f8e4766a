use crate::error::{Result, TripDetectionError};

pub use utm::lat_lon_to_zone_number as zone_number;

const MIN_LATITUDE: f64 = -80.0;
const MAX_LATITUDE: f64 = 84.0;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UtmCoordinate {
    pub easting: f64,
    pub northing: f64,
    pub zone_number: u8,
}

/// Anything that carries a projected position. Only meaningful to compare
/// two values projected in the same zone.
pub trait Projected {
    fn easting(&self) -> f64;
    fn northing(&self) -> f64;
}

impl Projected for UtmCoordinate {
    fn easting(&self) -> f64 {
        self.easting
    }

    fn northing(&self) -> f64 {
        self.northing
    }
}

pub fn planar_distance<A: Projected + ?Sized, B: Projected + ?Sized>(a: &A, b: &B) -> f64 {
    (b.easting() - a.easting()).hypot(b.northing() - a.northing())
}

/// Projects a WGS84 position into its own UTM zone. There is no check that
/// consecutive points share a zone.
pub fn project(latitude: f64, longitude: f64) -> Result<UtmCoordinate> {
    if !latitude.is_finite()
        || !longitude.is_finite()
        || !(MIN_LATITUDE..=MAX_LATITUDE).contains(&latitude)
        || !(-180.0..=180.0).contains(&longitude)
    {
        return Err(TripDetectionError::InvalidCoordinate {
            latitude,
            longitude,
        });
    }

    let zone_number = zone_number(latitude, longitude);
    let (northing, easting, _meridian_convergence) =
        utm::to_utm_wgs84(latitude, longitude, zone_number);
    Ok(UtmCoordinate {
        easting,
        northing,
        zone_number,
    })
}
