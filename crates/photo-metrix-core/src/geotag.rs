//! GPS value types for geotagged photos.
//!
//! EXIF stores latitude/longitude as degree/minute/second triples plus a
//! hemisphere reference. Reading those bytes is left to a metadata
//! collaborator; this module only turns the triples into decimal degrees and
//! exports fixes as GeoJSON.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::str::FromStr;

/// CRS identifier written into exported GeoJSON collections.
pub const GEOJSON_CRS84: &str = "urn:ogc:def:crs:OGC:1.3:CRS84";

/// Errors raised while building GPS fixes.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum GeotagError {
    #[error("invalid hemisphere reference {0:?} (expected N, S, E or W)")]
    InvalidHemisphere(String),
    #[error("dms component out of range (degrees={degrees}, minutes={minutes}, seconds={seconds})")]
    InvalidDms {
        degrees: f64,
        minutes: f64,
        seconds: f64,
    },
    #[error("latitude {0} outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

/// Hemisphere reference attached to a DMS coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hemisphere {
    #[serde(rename = "N", alias = "n")]
    North,
    #[serde(rename = "S", alias = "s")]
    South,
    #[serde(rename = "E", alias = "e")]
    East,
    #[serde(rename = "W", alias = "w")]
    West,
}

impl Hemisphere {
    /// Sign applied to the decimal value.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Hemisphere::North | Hemisphere::East => 1.0,
            Hemisphere::South | Hemisphere::West => -1.0,
        }
    }

    #[inline]
    pub fn is_latitude(self) -> bool {
        matches!(self, Hemisphere::North | Hemisphere::South)
    }
}

impl FromStr for Hemisphere {
    type Err = GeotagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "N" => Ok(Hemisphere::North),
            "S" => Ok(Hemisphere::South),
            "E" => Ok(Hemisphere::East),
            "W" => Ok(Hemisphere::West),
            _ => Err(GeotagError::InvalidHemisphere(s.to_owned())),
        }
    }
}

/// Degrees-minutes-seconds angle, as found in EXIF GPS tags.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Dms {
    pub degrees: f64,
    pub minutes: f64,
    pub seconds: f64,
}

impl Dms {
    pub fn new(degrees: f64, minutes: f64, seconds: f64) -> Self {
        Self {
            degrees,
            minutes,
            seconds,
        }
    }

    /// Unsigned decimal degrees: `d + m/60 + s/3600`.
    pub fn to_decimal(&self) -> Result<f64, GeotagError> {
        let finite =
            self.degrees.is_finite() && self.minutes.is_finite() && self.seconds.is_finite();
        if !finite || self.degrees < 0.0 || self.minutes < 0.0 || self.seconds < 0.0 {
            return Err(GeotagError::InvalidDms {
                degrees: self.degrees,
                minutes: self.minutes,
                seconds: self.seconds,
            });
        }
        Ok(self.degrees + self.minutes / 60.0 + self.seconds / 3600.0)
    }

    /// Signed decimal degrees for the given hemisphere.
    pub fn to_signed_decimal(&self, hemisphere: Hemisphere) -> Result<f64, GeotagError> {
        Ok(hemisphere.sign() * self.to_decimal()?)
    }
}

impl From<[f64; 3]> for Dms {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<Dms> for [f64; 3] {
    fn from(d: Dms) -> Self {
        [d.degrees, d.minutes, d.seconds]
    }
}

/// A GPS position in WGS84 decimal degrees with optional altitude.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GpsFix {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub altitude_m: Option<f64>,
}

impl GpsFix {
    /// Build a fix from decimal degrees, rejecting out-of-range values.
    pub fn new(latitude: f64, longitude: f64, altitude_m: Option<f64>) -> Result<Self, GeotagError> {
        if !latitude.is_finite() || latitude.abs() > 90.0 {
            return Err(GeotagError::LatitudeOutOfRange(latitude));
        }
        if !longitude.is_finite() || longitude.abs() > 180.0 {
            return Err(GeotagError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
            altitude_m,
        })
    }

    /// Build a fix from EXIF-style DMS triples and hemisphere references.
    pub fn from_dms(
        latitude: Dms,
        latitude_ref: Hemisphere,
        longitude: Dms,
        longitude_ref: Hemisphere,
        altitude_m: Option<f64>,
    ) -> Result<Self, GeotagError> {
        if !latitude_ref.is_latitude() {
            return Err(GeotagError::InvalidHemisphere(format!("{latitude_ref:?}")));
        }
        if longitude_ref.is_latitude() {
            return Err(GeotagError::InvalidHemisphere(format!("{longitude_ref:?}")));
        }
        Self::new(
            latitude.to_signed_decimal(latitude_ref)?,
            longitude.to_signed_decimal(longitude_ref)?,
            altitude_m,
        )
    }
}

/// One photo with the GPS fix its metadata yielded, if any.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeotaggedPhoto {
    pub filename: String,
    pub path: String,
    #[serde(default)]
    pub fix: Option<GpsFix>,
}

impl GeotaggedPhoto {
    #[inline]
    pub fn has_gps(&self) -> bool {
        self.fix.is_some()
    }
}

/// Export photos with a GPS fix as a GeoJSON `FeatureCollection`.
///
/// Photos without a fix are skipped. Coordinates follow GeoJSON order
/// `[longitude, latitude]`.
pub fn photos_to_geojson(photos: &[GeotaggedPhoto]) -> Value {
    let features: Vec<Value> = photos
        .iter()
        .filter_map(|photo| {
            let fix = photo.fix?;
            Some(json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [fix.longitude, fix.latitude],
                },
                "properties": {
                    "filename": photo.filename,
                    "path": photo.path,
                    "altitude_m": fix.altitude_m,
                },
            }))
        })
        .collect();

    json!({
        "type": "FeatureCollection",
        "crs": { "type": "name", "properties": { "name": GEOJSON_CRS84 } },
        "features": features,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn dms_converts_to_decimal() {
        let dms = Dms::new(40.0, 26.0, 46.0);
        assert_relative_eq!(dms.to_decimal().unwrap(), 40.446_111_111, epsilon = 1e-9);
    }

    #[test]
    fn southern_and_western_hemispheres_are_negative() {
        let dms = Dms::new(33.0, 52.0, 4.0);
        let south = dms.to_signed_decimal(Hemisphere::South).unwrap();
        let west = dms.to_signed_decimal(Hemisphere::West).unwrap();
        assert!(south < 0.0);
        assert_relative_eq!(south, west);
        assert_relative_eq!(dms.to_signed_decimal(Hemisphere::North).unwrap(), -south);
    }

    #[test]
    fn negative_dms_component_is_rejected() {
        let err = Dms::new(10.0, -1.0, 0.0).to_decimal().unwrap_err();
        assert!(matches!(err, GeotagError::InvalidDms { .. }));
    }

    #[test]
    fn hemisphere_parses_case_insensitively() {
        assert_eq!("n".parse::<Hemisphere>().unwrap(), Hemisphere::North);
        assert_eq!(" W ".parse::<Hemisphere>().unwrap(), Hemisphere::West);
        assert!("X".parse::<Hemisphere>().is_err());
    }

    #[test]
    fn from_dms_rejects_swapped_references() {
        let err = GpsFix::from_dms(
            Dms::new(1.0, 0.0, 0.0),
            Hemisphere::East,
            Dms::new(2.0, 0.0, 0.0),
            Hemisphere::North,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, GeotagError::InvalidHemisphere(_)));
    }

    #[test]
    fn out_of_range_latitude_is_rejected() {
        assert_eq!(
            GpsFix::new(91.0, 0.0, None).unwrap_err(),
            GeotagError::LatitudeOutOfRange(91.0)
        );
        assert_eq!(
            GpsFix::new(0.0, -180.5, None).unwrap_err(),
            GeotagError::LongitudeOutOfRange(-180.5)
        );
    }

    #[test]
    fn geojson_skips_photos_without_fix() {
        let photos = vec![
            GeotaggedPhoto {
                filename: "a.jpg".into(),
                path: "/photos/a.jpg".into(),
                fix: Some(GpsFix::new(-12.5, 130.25, Some(42.0)).unwrap()),
            },
            GeotaggedPhoto {
                filename: "b.jpg".into(),
                path: "/photos/b.jpg".into(),
                fix: None,
            },
        ];
        let fc = photos_to_geojson(&photos);
        let features = fc["features"].as_array().expect("features");
        assert_eq!(features.len(), 1);
        assert_eq!(features[0]["geometry"]["coordinates"][0], 130.25);
        assert_eq!(features[0]["geometry"]["coordinates"][1], -12.5);
        assert_eq!(features[0]["properties"]["filename"], "a.jpg");
        assert_eq!(features[0]["properties"]["altitude_m"], 42.0);
    }
}
