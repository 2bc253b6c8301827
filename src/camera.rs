// src/camera.rs

use crate::coordinates::parse_coordinates;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One camera as delivered by the upstream feed. Field names are the feed's.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ExternalRecord {
    #[serde(rename = "Lokasi CCTV (latitude,longitude)", default, deserialize_with = "loose_string")]
    pub coordinates: Option<String>,
    #[serde(rename = "Alamat Lengkap", default, deserialize_with = "loose_string")]
    pub address: Option<String>,
    #[serde(rename = "Kota/Area/Wilayah", default, deserialize_with = "loose_string")]
    pub area: Option<String>,
    #[serde(rename = "Tipe", default, deserialize_with = "loose_string")]
    pub kind: Option<String>,
    #[serde(rename = "Nama CCTV", default, deserialize_with = "loose_string")]
    pub name: Option<String>,
    #[serde(rename = "Tautan/URL CCTV", default, deserialize_with = "loose_string")]
    pub url: Option<String>,
    #[serde(rename = "Kota", default, deserialize_with = "loose_string")]
    pub city: Option<String>,
    #[serde(rename = "Kategori/Tag", default, deserialize_with = "loose_string")]
    pub tag: Option<String>,
    #[serde(rename = "Status", default, deserialize_with = "loose_string")]
    pub status: Option<String>,
    #[serde(rename = "Keterangan", default, deserialize_with = "loose_string")]
    pub note: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CameraLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub city: String,
}

/// Consumer-facing camera shape. Absent upstream fields stay absent.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CanonicalCamera {
    pub location: CameraLocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// The single cached artifact and the success body of the endpoint.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct CachedResponse {
    pub data: Vec<CanonicalCamera>,
}

#[derive(Debug, Default)]
pub struct TransformSummary {
    pub cameras: Vec<CanonicalCamera>,
    pub skipped: usize,
}

const WEB_LINK_TYPE: &str = "Web Link";
const HTTP_TYPE: &str = "http";

impl From<ExternalRecord> for CanonicalCamera {
    fn from(record: ExternalRecord) -> Self {
        let (latitude, longitude) =
            parse_coordinates(record.coordinates.as_deref().unwrap_or_default()).lat_lon();

        CanonicalCamera {
            location: CameraLocation {
                latitude,
                longitude,
                address: record.address.unwrap_or_default(),
                city: record.area.unwrap_or_default().to_uppercase(),
            },
            name: record.name,
            url: record.url,
            city: record.city.map(|c| c.to_uppercase()),
            tag: record.tag,
            status: record.status,
            note: record.note,
            kind: record.kind.map(normalize_type),
        }
    }
}

fn normalize_type(kind: String) -> String {
    if kind == WEB_LINK_TYPE {
        HTTP_TYPE.to_string()
    } else {
        kind
    }
}

impl ExternalRecord {
    /// Reads one element of the upstream `data` array. Only JSON objects are
    /// records; anything else yields `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        match ExternalRecord::deserialize(value) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("Could not read upstream record: {}", e);
                None
            }
        }
    }
}

/// Transforms every object in the upstream `data` array, counting the
/// elements that were not records.
pub fn transform_all(items: &[Value]) -> TransformSummary {
    let mut summary = TransformSummary::default();
    for item in items {
        match ExternalRecord::from_value(item) {
            Some(record) => summary.cameras.push(record.into()),
            None => {
                log::debug!("Skipping non-record element in upstream data: {}", item);
                summary.skipped += 1;
            }
        }
    }
    summary
}

/// Accepts any JSON value for a text field. `null` is treated as absent,
/// scalars are stringified and nested values keep their JSON text.
fn loose_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
