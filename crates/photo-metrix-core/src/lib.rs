//! Core types and utilities for photo distance measurement.
//!
//! This crate is intentionally small and purely geometric. It does *not*
//! depend on any object detector, EXIF reader or image type: those are
//! collaborators that hand values into the types defined here.

mod geometry;
mod geotag;
mod logger;

pub use geometry::{euclidean_distance, BoundingBox, Point};
pub use geotag::{
    photos_to_geojson, Dms, GeotagError, GeotaggedPhoto, GpsFix, Hemisphere, GEOJSON_CRS84,
};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
