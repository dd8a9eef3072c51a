//! Geospatial module for Tenerife.Music.
//!
//! Provides the spatial layer behind venue and event search:
//! - Geohash encoding and decoding (base-32, prefix-compatible keys)
//! - Geohash cell bounds and neighbour sets
//! - Bounding-box construction, containment and Haversine distance
//! - Prefix sets covering a bounding box, sampled or exact
//! - An in-memory index that answers box and radius queries by prefix scan
//!
//! # Search Model
//!
//! Every geohash is a prefix of all longer geohashes inside its cell, so a
//! sorted index can be scanned by prefix. Prefix scans return candidates whose
//! cells overlap the query; candidates are always post-filtered against the
//! exact bounding box.
//!
//! # Example Usage
//!
//! ```
//! use tenerife_geo::geo::{
//!     create_bounding_box, encode_geohash, geohash_prefixes_for_bounding_box,
//!     is_within_bounding_box, Coordinate,
//! };
//!
//! // Santa Cruz de Tenerife
//! let santa_cruz = Coordinate::new(28.463_629_6, -16.251_846_7);
//! let geohash = encode_geohash(santa_cruz.lat, santa_cruz.lng, 7).unwrap();
//! assert_eq!(geohash, "eth3yjt");
//!
//! // Everything within 10 km, as prefixes for a geohash-sorted index
//! let bbox = create_bounding_box(&santa_cruz, 10.0);
//! assert!(is_within_bounding_box(&santa_cruz, &bbox));
//!
//! let prefixes = geohash_prefixes_for_bounding_box(&bbox, 5).unwrap();
//! assert!(prefixes.iter().any(|p| geohash.starts_with(p.as_str())));
//! ```

pub mod bbox;
pub mod cover;
pub mod error;
pub mod geohash;
pub mod index;
pub mod settings;
pub mod types;

pub use bbox::{
    calculate_distance, create_bounding_box, geohash_prefixes_for_bounding_box,
    is_within_bounding_box,
};
pub use cover::geohash_cells_covering_bounding_box;
pub use error::{GeoError, Result};
pub use geohash::{
    decode_geohash, encode_coordinate, encode_geohash, geohash_bounds, geohash_neighbors,
};
pub use index::{GeohashIndex, Nearby};
pub use settings::{CoverStrategy, GeoSettings};
pub use types::{geohash_error_radius, BoundingBox, Coordinate, GeohashBounds};
