//! Server-declared object model, projected from a session-data response.

use serde::{Deserialize, Serialize};

use crate::codec::ActionResponse;
use crate::error::SchemaError;
use crate::schema::{array_field, as_record, bool_field, object_field, str_field};

/// Attribute type tag denoting a reference to another entity.
pub const OBJECT_REFERENCE: &str = "ObjectReference";

/// The object model declared by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Every entity in the model.
    pub entities: Vec<Entity>,
}

impl Metadata {
    /// Look up an entity by name.
    #[must_use]
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }
}

/// A business object type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Qualified entity name, e.g. `Sales.Customer`.
    pub name: String,
    /// Whether instances are stored in the database.
    pub persistable: bool,
    /// Attributes in unspecified order.
    pub attributes: Vec<Attribute>,
}

impl Entity {
    /// Look up an attribute by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

/// One attribute of an [`Entity`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name.
    pub name: String,
    /// Server type tag, e.g. `String` or `ObjectReference`.
    #[serde(rename = "type")]
    pub attribute_type: String,
    /// Target entity; set only for object references.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl Attribute {
    /// Whether this attribute points at another entity.
    #[must_use]
    pub fn is_reference(&self) -> bool {
        self.attribute_type == OBJECT_REFERENCE
    }
}

/// Project the `metadata` key of a session-data response into [`Metadata`].
///
/// # Errors
///
/// Returns a [`SchemaError`] naming the entity and field when the `metadata`
/// key or any record inside it is missing or mistyped.
pub fn decode_metadata(session_data: &ActionResponse) -> Result<Metadata, SchemaError> {
    let records = array_field(session_data, "metadata", "session data")?;
    let entities = records
        .iter()
        .enumerate()
        .map(|(index, value)| -> Result<Entity, SchemaError> {
            let record = as_record(value, &format!("metadata[{index}]"), "session data")?;
            decode_entity(record, index)
        })
        .collect::<Result<_, _>>()?;
    Ok(Metadata { entities })
}

fn decode_entity(
    record: &serde_json::Map<String, serde_json::Value>,
    index: usize,
) -> Result<Entity, SchemaError> {
    let name = str_field(record, "objectType", &format!("entity #{index}"))?.to_string();
    let context = format!("entity '{name}'");
    let persistable = bool_field(record, "persistable", &context)?;

    let attributes = object_field(record, "attributes", &context)?
        .iter()
        .map(|(attribute, details)| -> Result<Attribute, SchemaError> {
            let attribute_context = format!("{context} attribute '{attribute}'");
            let details = as_record(details, attribute, &context)?;
            let attribute_type = str_field(details, "type", &attribute_context)?.to_string();
            let reference = if attribute_type == OBJECT_REFERENCE {
                Some(str_field(details, "klass", &attribute_context)?.to_string())
            } else {
                None
            };
            Ok(Attribute {
                name: attribute.clone(),
                attribute_type,
                reference,
            })
        })
        .collect::<Result<_, _>>()?;

    Ok(Entity {
        name,
        persistable,
        attributes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: serde_json::Value) -> ActionResponse {
        value.as_object().cloned().expect("object fixture")
    }

    #[test]
    fn decodes_entity_with_reference() {
        let metadata = decode_metadata(&response(json!({
            "metadata": [{
                "objectType": "Customer",
                "persistable": true,
                "attributes": {
                    "Name": {"type": "String"},
                    "Parent": {"type": "ObjectReference", "klass": "Company"}
                }
            }]
        })))
        .expect("valid metadata");

        assert_eq!(metadata.entities.len(), 1);
        let customer = metadata.entity("Customer").expect("entity present");
        assert!(customer.persistable);
        assert_eq!(customer.attributes.len(), 2);

        let name = customer.attribute("Name").expect("Name present");
        assert_eq!(name.attribute_type, "String");
        assert_eq!(name.reference, None);
        assert!(!name.is_reference());

        let parent = customer.attribute("Parent").expect("Parent present");
        assert_eq!(parent.attribute_type, "ObjectReference");
        assert_eq!(parent.reference.as_deref(), Some("Company"));
        assert!(parent.is_reference());
    }

    #[test]
    fn empty_metadata_array_yields_no_entities() {
        let metadata = decode_metadata(&response(json!({"metadata": []}))).expect("valid");
        assert!(metadata.entities.is_empty());
        assert!(metadata.entity("Customer").is_none());
    }

    #[test]
    fn klass_is_ignored_for_non_references() {
        let metadata = decode_metadata(&response(json!({
            "metadata": [{
                "objectType": "A",
                "persistable": false,
                "attributes": {"N": {"type": "Integer", "klass": "Ignored"}}
            }]
        })))
        .expect("valid");
        assert_eq!(metadata.entities[0].attributes[0].reference, None);
    }

    #[test]
    fn missing_metadata_key_is_schema_error() {
        let err = decode_metadata(&response(json!({"csrftoken": "t"}))).expect_err("no metadata");
        assert_eq!(err.field, "metadata");
        assert_eq!(err.actual, "missing");
    }

    #[test]
    fn mistyped_persistable_names_entity() {
        let err = decode_metadata(&response(json!({
            "metadata": [{"objectType": "Customer", "persistable": "yes", "attributes": {}}]
        })))
        .expect_err("mistyped");
        assert_eq!(err.context, "entity 'Customer'");
        assert_eq!(err.field, "persistable");
        assert_eq!((err.expected, err.actual), ("bool", "string"));
    }

    #[test]
    fn missing_object_type_names_index() {
        let err = decode_metadata(&response(json!({
            "metadata": [{"persistable": true, "attributes": {}}]
        })))
        .expect_err("missing name");
        assert_eq!(err.context, "entity #0");
        assert_eq!(err.field, "objectType");
    }

    #[test]
    fn reference_without_klass_names_attribute() {
        let err = decode_metadata(&response(json!({
            "metadata": [{
                "objectType": "Order",
                "persistable": true,
                "attributes": {"Customer": {"type": "ObjectReference"}}
            }]
        })))
        .expect_err("missing klass");
        assert_eq!(err.context, "entity 'Order' attribute 'Customer'");
        assert_eq!(err.field, "klass");
        assert_eq!(err.actual, "missing");
    }

    #[test]
    fn non_object_record_is_schema_error() {
        let err = decode_metadata(&response(json!({"metadata": ["Customer"]})))
            .expect_err("string record");
        assert_eq!(err.field, "metadata[0]");
        assert_eq!((err.expected, err.actual), ("object", "string"));
    }
}
