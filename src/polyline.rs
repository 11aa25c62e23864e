//! Polyline representation for route geometries.
//!
//! Routes arrive from the directions provider in the encoded polyline
//! format (precision 1e5). Decoding happens once at the boundary; the rest
//! of the crate works with the decoded coordinate sequence.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed-point precision of the encoded polyline format.
const PRECISION: f64 = 1e5;

/// Offset added to every 5-bit chunk to land in printable ASCII.
const CHAR_OFFSET: u8 = 63;

/// Continuation flag on an encoded chunk.
const CONTINUATION: u8 = 0x20;

const CHUNK_MASK: u8 = 0x1f;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolylineError {
    #[error("invalid polyline character {byte:#04x} at offset {position}")]
    InvalidCharacter { position: usize, byte: u8 },

    #[error("polyline ends inside an unterminated group at offset {position}")]
    UnterminatedGroup { position: usize },

    #[error("polyline ends after a latitude with no longitude")]
    MissingLongitude,

    #[error("polyline value at offset {position} overflows")]
    Overflow { position: usize },
}

/// A polyline representing a route geometry as decoded coordinates.
///
/// Each point is a (latitude, longitude) tuple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<(f64, f64)>,
}

impl Polyline {
    /// Creates a new Polyline from decoded coordinate points.
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    /// Decodes an encoded polyline string.
    pub fn decode(encoded: &str) -> Result<Self, PolylineError> {
        decode(encoded).map(Self::new)
    }

    /// Encodes the points back into the compact string form.
    pub fn encode(&self) -> String {
        encode(&self.points)
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Consumes the polyline and returns the owned coordinate points.
    pub fn into_points(self) -> Vec<(f64, f64)> {
        self.points
    }
}

/// Decodes an encoded polyline into (latitude, longitude) pairs.
pub fn decode(encoded: &str) -> Result<Vec<(f64, f64)>, PolylineError> {
    let bytes = encoded.as_bytes();
    let mut points = Vec::with_capacity(bytes.len() / 4);
    let mut position = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;

    while position < bytes.len() {
        let (delta_lat, next) = decode_value(bytes, position)?;
        if next >= bytes.len() {
            return Err(PolylineError::MissingLongitude);
        }
        let (delta_lng, next) = decode_value(bytes, next)?;
        position = next;

        lat = lat
            .checked_add(delta_lat)
            .ok_or(PolylineError::Overflow { position })?;
        lng = lng
            .checked_add(delta_lng)
            .ok_or(PolylineError::Overflow { position })?;

        points.push((lat as f64 / PRECISION, lng as f64 / PRECISION));
    }

    Ok(points)
}

/// Reads one zig-zag encoded value starting at `start`.
///
/// Returns the value and the offset of the first byte after it.
fn decode_value(bytes: &[u8], start: usize) -> Result<(i64, usize), PolylineError> {
    let mut result: u64 = 0;
    let mut shift: u32 = 0;
    let mut position = start;

    loop {
        let Some(&byte) = bytes.get(position) else {
            return Err(PolylineError::UnterminatedGroup { position });
        };
        if !(CHAR_OFFSET..=CHAR_OFFSET + 0x3f).contains(&byte) {
            return Err(PolylineError::InvalidCharacter { position, byte });
        }
        if shift > 60 {
            return Err(PolylineError::Overflow { position });
        }

        let chunk = byte - CHAR_OFFSET;
        result |= u64::from(chunk & CHUNK_MASK) << shift;
        shift += 5;
        position += 1;

        if chunk & CONTINUATION == 0 {
            break;
        }
    }

    let value = if result & 1 == 1 {
        !((result >> 1) as i64)
    } else {
        (result >> 1) as i64
    };

    Ok((value, position))
}

/// Encodes (latitude, longitude) pairs into the compact polyline format.
///
/// Only needed for tests and round-trips; the routing core consumes
/// geometry, it never produces it.
pub fn encode(points: &[(f64, f64)]) -> String {
    let mut out = String::with_capacity(points.len() * 8);
    let mut prev_lat: i64 = 0;
    let mut prev_lng: i64 = 0;

    for &(lat, lng) in points {
        let lat = (lat * PRECISION).round() as i64;
        let lng = (lng * PRECISION).round() as i64;
        encode_value(lat - prev_lat, &mut out);
        encode_value(lng - prev_lng, &mut out);
        prev_lat = lat;
        prev_lng = lng;
    }

    out
}

fn encode_value(value: i64, out: &mut String) {
    let mut v = if value < 0 {
        !((value as u64) << 1)
    } else {
        (value as u64) << 1
    };

    while v >= u64::from(CONTINUATION) {
        let chunk = (CONTINUATION | (v as u8 & CHUNK_MASK)) + CHAR_OFFSET;
        out.push(char::from(chunk));
        v >>= 5;
    }
    out.push(char::from(v as u8 + CHAR_OFFSET));
}
