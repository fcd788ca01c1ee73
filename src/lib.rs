//! Conversion of room-number keyed building room JSON into a GeoJSON
//! `FeatureCollection`.

use std::path::Path;

pub mod converter;
pub mod error;
pub mod room;

pub use converter::{convert, convert_with_options, Conversion, ConvertOptions};
pub use error::ConvertError;
pub use room::{Document, Room};

/// Input file read when none is given on the command line.
pub const DEFAULT_INPUT: &str = "ansys_1.json";
/// Output file written when none is given on the command line.
pub const DEFAULT_OUTPUT: &str = "ansys_1.geojson";

/// Converts `input` to `output`, optionally in strict mode. Returns the
/// number of features written.
pub fn process_file(
    input: &Path,
    output: &Path,
    strict: bool,
) -> Result<usize, ConvertError> {
    convert_with_options(input, output, &ConvertOptions { strict })
}
