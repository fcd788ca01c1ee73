use geo::LineString;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::ConvertError;

/// Parsed input file: room number to raw room record, in file order.
pub type Document = serde_json::Map<String, Value>;

/// One room record of the input file.
///
/// Fields that only feed output properties are kept as raw JSON so that any
/// value the record carries is passed through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    /// Boundary rings, each a list of points in latitude/longitude order.
    pub points: Option<Vec<Vec<LatLng>>>,
    #[serde(rename = "type", default)]
    pub room_type: Value,
    pub floor: Option<Floor>,
    pub label_position: Option<LabelPosition>,
    /// `None` when the key is absent, `Some(Value::Null)` when it is `null`.
    #[serde(default, deserialize_with = "present")]
    pub alias: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Floor {
    #[serde(default)]
    pub building_code: Value,
    #[serde(default)]
    pub level: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LabelPosition {
    #[serde(default)]
    pub latitude: Value,
    #[serde(default)]
    pub longitude: Value,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl Room {
    /// Decodes the record stored under `room_number`.
    pub fn from_value(room_number: &str, value: &Value) -> Result<Room, ConvertError> {
        Room::deserialize(value).map_err(|e| ConvertError::schema(room_number, e.to_string()))
    }

    /// Boundary rings with x = longitude and y = latitude.
    pub fn rings(&self) -> Vec<LineString<f64>> {
        self.points
            .iter()
            .flatten()
            .map(|ring| {
                LineString::from(
                    ring.iter()
                        .map(|point| (point.longitude, point.latitude))
                        .collect::<Vec<_>>(),
                )
            })
            .collect()
    }

    pub fn building_code(&self) -> Value {
        self.floor
            .as_ref()
            .map(|floor| floor.building_code.clone())
            .unwrap_or(Value::Null)
    }

    pub fn level(&self) -> Value {
        self.floor
            .as_ref()
            .map(|floor| floor.level.clone())
            .unwrap_or(Value::Null)
    }

    pub fn label_latitude(&self) -> Value {
        self.label_position
            .as_ref()
            .map(|label| label.latitude.clone())
            .unwrap_or(Value::Null)
    }

    pub fn label_longitude(&self) -> Value {
        self.label_position
            .as_ref()
            .map(|label| label.longitude.clone())
            .unwrap_or(Value::Null)
    }

    /// Fails when a nested field the output properties are built from is
    /// missing or has the wrong type. Only used in strict mode.
    pub fn check_complete(&self, room_number: &str) -> Result<(), ConvertError> {
        if !(self.room_type.is_null() || self.room_type.is_string()) {
            return Err(ConvertError::schema(room_number, "`type` is not a string"));
        }
        if let Some(alias) = &self.alias {
            if !(alias.is_null() || alias.is_string()) {
                return Err(ConvertError::schema(room_number, "`alias` is not a string"));
            }
        }
        let floor = self
            .floor
            .as_ref()
            .ok_or_else(|| ConvertError::schema(room_number, "missing field `floor`"))?;
        if floor.building_code.is_null() {
            return Err(ConvertError::schema(
                room_number,
                "missing field `floor.buildingCode`",
            ));
        }
        if !floor.building_code.is_string() {
            return Err(ConvertError::schema(
                room_number,
                "`floor.buildingCode` is not a string",
            ));
        }
        if floor.level.is_null() {
            return Err(ConvertError::schema(room_number, "missing field `floor.level`"));
        }
        let label = (self.label_latitude(), self.label_longitude());
        if label.0.is_null() || label.1.is_null() {
            return Err(ConvertError::schema(
                room_number,
                "missing field `labelPosition`",
            ));
        }
        if !(label.0.is_number() && label.1.is_number()) {
            return Err(ConvertError::schema(
                room_number,
                "`labelPosition` coordinates are not numbers",
            ));
        }
        Ok(())
    }
}
