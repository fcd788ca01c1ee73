use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use geo::LineString;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value as GeoJsonValue};
use log::{debug, info, trace};
use tempfile::Builder;

use crate::error::ConvertError;
use crate::room::{Document, Room};

/// Switches for a conversion run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertOptions {
    /// Reject rooms that lack `floor`, `floor.buildingCode`, `floor.level`
    /// or `labelPosition`, or whose `type`, `alias`, `buildingCode` or label
    /// coordinates have the wrong JSON type, instead of passing them through.
    pub strict: bool,
}

/// Result of converting a parsed document.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub collection: FeatureCollection,
    /// Rooms that produced no feature because they have no boundary.
    pub skipped: usize,
}

// Closes the ring by repeating its first coordinate; a no-op when already closed or empty
pub fn close_ring(ring: &mut LineString<f64>) {
    ring.close();
}

fn ring_positions(ring: &LineString<f64>) -> Vec<Vec<f64>> {
    ring.points().map(|p| vec![p.x(), p.y()]).collect()
}

/// Builds the geometry of a room from its rings.
///
/// Empty rings are dropped and the rest are closed. A single ring becomes a
/// `Polygon`; several rings become a `MultiPolygon` whose only polygon holds
/// all of them. Returns `None` when no ring is left.
pub fn room_geometry(rings: Vec<LineString<f64>>) -> Option<Geometry> {
    let mut rings: Vec<Vec<Vec<f64>>> = rings
        .into_iter()
        .filter(|ring| !ring.0.is_empty())
        .map(|mut ring| {
            close_ring(&mut ring);
            ring_positions(&ring)
        })
        .collect();

    let value = match rings.len() {
        0 => return None,
        1 => GeoJsonValue::Polygon(vec![rings.remove(0)]),
        _ => GeoJsonValue::MultiPolygon(vec![rings]),
    };
    Some(Geometry::new(value))
}

/// Property object of a room feature. `alias` is only written when the
/// record carries the key.
pub fn room_properties(room_number: &str, room: &Room) -> JsonObject {
    let mut properties = JsonObject::new();
    properties.insert("room_number".to_string(), JsonValue::from(room_number));
    properties.insert("type".to_string(), room.room_type.clone());
    properties.insert("buildingCode".to_string(), room.building_code());
    properties.insert("level".to_string(), room.level());
    properties.insert("labelLatitude".to_string(), room.label_latitude());
    properties.insert("labelLongitude".to_string(), room.label_longitude());
    if let Some(alias) = &room.alias {
        properties.insert("alias".to_string(), alias.clone());
    }
    properties
}

/// Maps one room to a feature, or `None` when it has no boundary.
pub fn room_to_feature(room_number: &str, room: &Room) -> Option<Feature> {
    let geometry = room_geometry(room.rings())?;
    Some(Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(room_properties(room_number, room)),
        foreign_members: None,
    })
}

/// Converts every room of `document`, keeping document order.
pub fn convert_document(
    document: &Document,
    options: &ConvertOptions,
) -> Result<Conversion, ConvertError> {
    let mut features = Vec::with_capacity(document.len());
    let mut skipped = 0;

    for (room_number, value) in document {
        let room = Room::from_value(room_number, value)?;
        match room_to_feature(room_number, &room) {
            Some(feature) => {
                if options.strict {
                    room.check_complete(room_number)?;
                }
                trace!("Converted room {}", room_number);
                features.push(feature);
            }
            None => {
                debug!("Skipping room {} without points", room_number);
                skipped += 1;
            }
        }
    }

    Ok(Conversion {
        collection: FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        },
        skipped,
    })
}

/// Reads the input file as a room-number keyed object.
pub fn load_document(path: &Path) -> Result<Document, ConvertError> {
    info!("Loading file: {}", path.display());
    let file = File::open(path).map_err(|e| ConvertError::io(path, e))?;
    let reader = BufReader::new(file);

    let document: Document = serde_json::from_reader(reader).map_err(|e| {
        if e.is_io() {
            ConvertError::io(path, e.into())
        } else {
            ConvertError::parse(path, e)
        }
    })?;
    info!("Found {} rooms in file", document.len());
    Ok(document)
}

/// Writes the collection as 2-space indented JSON.
///
/// The text goes to a temporary file next to `path` first, is synced to
/// disk, and is then renamed over `path`, so a failed run never leaves a
/// partial output. An existing output keeps its permissions; a new one gets
/// the mode a plain create would give it.
pub fn write_collection(collection: &FeatureCollection, path: &Path) -> Result<(), ConvertError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut builder = Builder::new();
    // umask still applies
    #[cfg(unix)]
    builder.permissions(fs::Permissions::from_mode(0o666));
    let mut file = builder
        .tempfile_in(dir)
        .map_err(|e| ConvertError::io(path, e))?;

    if let Ok(metadata) = fs::metadata(path) {
        file.as_file()
            .set_permissions(metadata.permissions())
            .map_err(|e| ConvertError::io(path, e))?;
    }

    {
        let mut writer = BufWriter::new(file.as_file_mut());
        serde_json::to_writer_pretty(&mut writer, collection)
            .map_err(|e| ConvertError::io(path, e.into()))?;
        writer.flush().map_err(|e| ConvertError::io(path, e))?;
    }
    file.as_file()
        .sync_all()
        .map_err(|e| ConvertError::io(path, e))?;

    file.persist(path).map_err(|e| ConvertError::io(path, e.error))?;
    Ok(())
}

/// Converts `input` into a GeoJSON file at `output` and returns the number
/// of features written.
pub fn convert_with_options(
    input: &Path,
    output: &Path,
    options: &ConvertOptions,
) -> Result<usize, ConvertError> {
    let document = load_document(input)?;
    let conversion = convert_document(&document, options)?;
    let count = conversion.collection.features.len();

    write_collection(&conversion.collection, output)?;
    info!(
        "Wrote {} features to {} ({} rooms skipped)",
        count,
        output.display(),
        conversion.skipped
    );
    Ok(count)
}

pub fn convert(input: &Path, output: &Path) -> Result<usize, ConvertError> {
    convert_with_options(input, output, &ConvertOptions::default())
}
