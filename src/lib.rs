#[macro_use]
extern crate log;

pub mod batch;
pub mod config;
pub mod error;
pub mod gps_processor;
pub mod logs;
pub mod projection;
pub mod stitching;
pub mod trip;
pub mod trip_detection;
