//! Typed, alias-driven tabular record codec.
//!
//! Three layers, in dependency order: scalar coercers turn cell text into
//! typed values, the tabular codec moves rows between byte buffers and
//! ordered flat rows, and the grouping structurer folds a flat row's
//! repeated-group columns into one nested page snapshot.

pub mod coerce;
pub mod error;
pub mod structure;
pub mod tabular;

pub use coerce::{
    CoerceError, parse_duration_seconds, parse_float, parse_magnitude, parse_percentage,
    parse_rank, parse_timestamp,
};
pub use error::{CodecError, Result};
pub use structure::{Converter, GroupFamily, structure_external_row};
pub use tabular::{
    check_row_headers, decode_records, decode_rows, decode_snapshots, encode_records,
    row_to_snapshot,
};
