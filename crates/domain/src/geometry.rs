//! Geometry helpers: great-circle distance and encoded polylines
//!
//! Polylines use the common signed-varint encoding with five decimal
//! places of precision: each coordinate is stored as the delta from the
//! previous point, zig-zag encoded and split into 5-bit chunks offset by 63.

use crate::errors::DomainError;
use crate::value_objects::GeoLocation;

/// Mean Earth radius used for haversine distances
pub const EARTH_RADIUS_KM: f64 = 6371.0;

const POLYLINE_PRECISION: f64 = 1e5;
const CHUNK_OFFSET: u8 = 63;
const CONTINUATION_BIT: i64 = 0x20;
const CHUNK_MASK: i64 = 0x1f;
/// Longest shift a valid coordinate delta can need (seven chunks)
const MAX_SHIFT: u32 = 35;

/// Great-circle distance between two locations in kilometers
///
/// Uses the haversine formula on a sphere of radius [`EARTH_RADIUS_KM`].
#[must_use]
pub fn haversine_distance_km(a: &GeoLocation, b: &GeoLocation) -> f64 {
    let lat1_rad = a.latitude().to_radians();
    let lat2_rad = b.latitude().to_radians();
    let delta_lat = (b.latitude() - a.latitude()).to_radians();
    let delta_lon = (b.longitude() - a.longitude()).to_radians();

    let h = (lat1_rad.cos() * lat2_rad.cos()).mul_add(
        (delta_lon / 2.0).sin().powi(2),
        (delta_lat / 2.0).sin().powi(2),
    );
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Total great-circle length of a path in kilometers
#[must_use]
pub fn path_length_km(path: &[GeoLocation]) -> f64 {
    path.windows(2)
        .map(|pair| haversine_distance_km(&pair[0], &pair[1]))
        .sum()
}

/// Decode an encoded polyline into a coordinate sequence
///
/// An empty string decodes to an empty path.
///
/// # Errors
///
/// Returns `DomainError::InvalidPolyline` when the input contains characters
/// outside the encoding alphabet, ends in the middle of a value, or decodes to
/// a point outside the valid coordinate range.
pub fn decode_polyline(encoded: &str) -> Result<Vec<GeoLocation>, DomainError> {
    let bytes = encoded.as_bytes();
    let mut index = 0;
    let mut latitude: i64 = 0;
    let mut longitude: i64 = 0;
    let mut points = Vec::new();

    while index < bytes.len() {
        latitude += next_value(bytes, &mut index)?;
        longitude += next_value(bytes, &mut index)?;

        #[allow(clippy::cast_precision_loss)] // Bounded by MAX_SHIFT, well inside f64 mantissa
        let point = GeoLocation::new(
            latitude as f64 / POLYLINE_PRECISION,
            longitude as f64 / POLYLINE_PRECISION,
        )
        .map_err(|_| {
            DomainError::InvalidPolyline(format!("point {} is out of range", points.len()))
        })?;
        points.push(point);
    }

    Ok(points)
}

/// Encode a coordinate sequence as a polyline (inverse of [`decode_polyline`])
#[must_use]
pub fn encode_polyline(points: &[GeoLocation]) -> String {
    let mut encoded = String::new();
    let mut previous = (0_i64, 0_i64);

    for point in points {
        let latitude = to_fixed(point.latitude());
        let longitude = to_fixed(point.longitude());
        push_value(latitude - previous.0, &mut encoded);
        push_value(longitude - previous.1, &mut encoded);
        previous = (latitude, longitude);
    }

    encoded
}

#[allow(clippy::cast_possible_truncation)] // |degrees| <= 180, so the scaled value fits easily
fn to_fixed(degrees: f64) -> i64 {
    (degrees * POLYLINE_PRECISION).round() as i64
}

fn next_value(bytes: &[u8], index: &mut usize) -> Result<i64, DomainError> {
    let mut result: i64 = 0;
    let mut shift: u32 = 0;

    loop {
        let Some(&byte) = bytes.get(*index) else {
            return Err(DomainError::InvalidPolyline(
                "input ends in the middle of a value".to_string(),
            ));
        };
        *index += 1;

        let Some(chunk) = byte.checked_sub(CHUNK_OFFSET).filter(|c| *c < 64) else {
            return Err(DomainError::InvalidPolyline(format!(
                "invalid character at offset {}",
                *index - 1
            )));
        };
        if shift >= MAX_SHIFT {
            return Err(DomainError::InvalidPolyline(
                "value exceeds coordinate precision".to_string(),
            ));
        }

        let chunk = i64::from(chunk);
        result |= (chunk & CHUNK_MASK) << shift;
        shift += 5;

        if chunk & CONTINUATION_BIT == 0 {
            break;
        }
    }

    Ok(if result & 1 == 1 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

fn push_value(value: i64, out: &mut String) {
    let mut remaining = if value < 0 { !(value << 1) } else { value << 1 };

    while remaining >= CONTINUATION_BIT {
        out.push(chunk_char((remaining & CHUNK_MASK) | CONTINUATION_BIT));
        remaining >>= 5;
    }
    out.push(chunk_char(remaining));
}

fn chunk_char(chunk: i64) -> char {
    // chunk is always < 64, so the offset stays within printable ASCII
    char::from(u8::try_from(chunk).unwrap_or(0) + CHUNK_OFFSET)
}
