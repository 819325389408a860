//! Business object instances embedded in action responses.

use serde::{Deserialize, Serialize};

use crate::codec::ActionResponse;
use crate::error::SchemaError;
use crate::schema::{array_field, as_record, object_field, str_field};

/// Response key carrying object records.
pub const MXOBJECTS_KEY: &str = "mxobjects";

/// An instance of a business object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MxObject {
    /// Attributes in unspecified order.
    pub attributes: Vec<MxObjectAttribute>,
    /// Global identifier.
    pub guid: String,
    /// Entity name of this object.
    #[serde(rename = "objectType")]
    pub object_type: String,
}

impl MxObject {
    /// Value of the named attribute, if present.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&serde_json::Value> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| &a.value)
    }
}

/// One attribute value of an [`MxObject`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MxObjectAttribute {
    /// Attribute name.
    pub name: String,
    /// Attribute value as sent by the server.
    pub value: serde_json::Value,
    /// Whether the attribute is read-only.
    ///
    /// [`decode_mxobjects`] does not populate this; it is always `false`.
    #[serde(rename = "readonly", default, skip_serializing_if = "is_false")]
    pub read_only: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Project the `mxobjects` key of an action response into [`MxObject`]s.
///
/// An absent key is the normal "no objects returned" case and yields an
/// empty vector. An attribute without a `value` decodes to `null`.
///
/// # Errors
///
/// Returns a [`SchemaError`] naming the object and field when a present
/// record is malformed (including `mxobjects: null`).
pub fn decode_mxobjects(response: &ActionResponse) -> Result<Vec<MxObject>, SchemaError> {
    if !response.contains_key(MXOBJECTS_KEY) {
        return Ok(Vec::new());
    }

    array_field(response, MXOBJECTS_KEY, "action response")?
        .iter()
        .enumerate()
        .map(|(index, value)| -> Result<MxObject, SchemaError> {
            let context = format!("mxobject #{index}");
            let field = format!("{MXOBJECTS_KEY}[{index}]");
            let record = as_record(value, &field, "action response")?;
            let guid = str_field(record, "guid", &context)?.to_string();
            let context = format!("mxobject '{guid}'");
            let object_type = str_field(record, "objectType", &context)?.to_string();

            let attributes = object_field(record, "attributes", &context)?
                .iter()
                .map(|(name, details)| -> Result<MxObjectAttribute, SchemaError> {
                    let details = as_record(details, name, &context)?;
                    // TODO: read `readonly` once servers are confirmed to always send it.
                    Ok(MxObjectAttribute {
                        name: name.clone(),
                        value: details.get("value").cloned().unwrap_or_default(),
                        read_only: false,
                    })
                })
                .collect::<Result<_, _>>()?;

            Ok(MxObject {
                attributes,
                guid,
                object_type,
            })
        })
        .collect()
}
