//! Compiled schema units, as they appear on the wire.
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::classify::Scalar;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    /// Declared field order.
    #[serde(default)]
    pub properties: IndexMap<String, Property>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Integer,
    Number,
    String,
    Boolean,
    Array,
}

/// One field or array element.
///
/// Exactly one of `data_type` / `reference` is set. `items` is only present
/// for arrays and is itself a primitive, a `$ref` or a nested array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataType>,
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Property>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Model {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), ..Self::default() }
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }
}

impl Property {
    pub fn primitive(scalar: Scalar) -> Self {
        Self { data_type: Some(scalar.into()), ..Self::default() }
    }

    pub fn reference(id: impl Into<String>) -> Self {
        Self { reference: Some(id.into()), ..Self::default() }
    }

    pub fn array(items: Property) -> Self {
        Self {
            data_type: Some(DataType::Array),
            items: Some(Box::new(items)),
            ..Self::default()
        }
    }

    pub fn is_array(&self) -> bool {
        self.data_type == Some(DataType::Array)
    }
}

impl From<Scalar> for DataType {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Integer => DataType::Integer,
            Scalar::Number => DataType::Number,
            Scalar::String => DataType::String,
            Scalar::Boolean => DataType::Boolean,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn wire_form_of_a_model() {
        let mut model = Model::new("swagger.Response");
        model.properties.insert("Code".into(), Property::primitive(Scalar::Integer));
        model.properties.insert(
            "Items".into(),
            Property::array(Property::reference("swagger.Item")),
        );
        model.properties.insert("Owner".into(), Property::reference("swagger.User"));

        assert_eq!(
            serde_json::to_value(&model).unwrap(),
            json!({
                "id": "swagger.Response",
                "properties": {
                    "Code": {"type": "integer"},
                    "Items": {"type": "array", "items": {"$ref": "swagger.Item"}},
                    "Owner": {"$ref": "swagger.User"}
                }
            })
        );
    }

    #[test]
    fn required_and_description_are_emitted_when_set() {
        let mut model = Model::new("m");
        model.required.push("id".into());
        let mut id = Property::primitive(Scalar::String);
        id.description = Some("identifier".into());
        model.properties.insert("id".into(), id);

        let value = serde_json::to_value(&model).unwrap();
        assert_eq!(value["required"], json!(["id"]));
        assert_eq!(value["properties"]["id"]["description"], "identifier");
    }

    #[test]
    fn property_order_is_preserved() {
        let mut model = Model::new("m");
        for name in ["z", "a", "m"] {
            model.properties.insert(name.into(), Property::primitive(Scalar::Boolean));
        }
        let text = serde_json::to_string(&model).unwrap();
        let at = |key: &str| text.find(&format!("{key:?}")).unwrap();
        assert!(at("z") < at("a") && at("a") < at("m"));
    }
}
