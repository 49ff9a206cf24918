use std::borrow::Cow;

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::config::{FieldDefinition, FieldType};

/// A topic record: a unique id plus named field values.
///
/// Values are held as text; whatever scalar the JSON file stores is read
/// back as its textual form. A field missing from the record reads as "".
///
/// Non-string JSON values are remembered as loaded and written back as such
/// while their text is unchanged, so saving never retypes untouched fields.
/// Equality compares the id and the text values only.
#[derive(Debug, Clone, Default)]
pub struct Topic {
    pub id: u64,
    pub fields: IndexMap<String, String>,
    loaded: IndexMap<String, serde_json::Value>,
}

impl PartialEq for Topic {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.fields == other.fields
    }
}

impl Eq for Topic {}

impl Topic {
    pub fn new(id: u64) -> Self {
        Topic {
            id,
            fields: IndexMap::new(),
            loaded: IndexMap::new(),
        }
    }

    /// Stored value of a field, "" when the record does not carry it.
    pub fn value(&self, name: &str) -> &str {
        self.fields.get(name).map(|s| s.as_str()).unwrap_or("")
    }
}

impl Serialize for Topic {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        map.serialize_entry("id", &self.id)?;
        for (k, v) in &self.fields {
            if k == "id" {
                continue;
            }
            match self.loaded.get(k) {
                Some(original) if value_text(original) == v.as_str() => {
                    map.serialize_entry(k, original)?
                }
                _ => map.serialize_entry(k, v)?,
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Topic {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut raw = IndexMap::<String, serde_json::Value>::deserialize(deserializer)?;
        let id = match raw.shift_remove("id") {
            Some(serde_json::Value::Number(n)) => n.as_u64(),
            Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        }
        .ok_or_else(|| serde::de::Error::custom("topic without a valid integer `id`"))?;

        let mut fields = IndexMap::with_capacity(raw.len());
        let mut loaded = IndexMap::new();
        for (k, v) in raw {
            fields.insert(k.clone(), value_text(&v).into_owned());
            if !v.is_string() {
                loaded.insert(k, v);
            }
        }
        Ok(Topic { id, fields, loaded })
    }
}

fn value_text(value: &serde_json::Value) -> Cow<'_, str> {
    match value {
        serde_json::Value::Null => Cow::Borrowed(""),
        serde_json::Value::String(s) => Cow::Borrowed(s),
        other => Cow::Owned(other.to_string()),
    }
}

/// A live value in the topic form, tagged by the kind of input holding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Single- or multi-line text, number and date inputs
    Text(String),
    /// A select; `None` is the blank selection
    Choice(Option<String>),
}

impl FieldValue {
    /// The value an input of the given field shows for stored text.
    pub fn for_field(field: &FieldDefinition, stored: &str) -> FieldValue {
        match field.field_type {
            FieldType::Select if stored.is_empty() => FieldValue::Choice(None),
            FieldType::Select => FieldValue::Choice(Some(stored.to_string())),
            FieldType::String | FieldType::Number | FieldType::Date => {
                FieldValue::Text(stored.to_string())
            }
        }
    }

    /// Textual form compared against (and written to) the store. The blank
    /// selection reads as "".
    pub fn as_text(&self) -> &str {
        match self {
            FieldValue::Text(s) => s,
            FieldValue::Choice(Some(s)) => s,
            FieldValue::Choice(None) => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn deserializes_flat_object_with_scalars() {
        let topic: Topic =
            serde_json::from_str(r#"{"id": 4, "title": "Rust", "hours": 12, "done": false, "x": null}"#)
                .unwrap();
        assert_eq!(topic.id, 4);
        assert_eq!(topic.value("title"), "Rust");
        assert_eq!(topic.value("hours"), "12");
        assert_eq!(topic.value("done"), "false");
        assert_eq!(topic.value("x"), "");
        assert_eq!(topic.value("missing"), "");
    }

    #[test]
    fn missing_id_is_an_error() {
        assert!(serde_json::from_str::<Topic>(r#"{"title": "no id"}"#).is_err());
        assert!(serde_json::from_str::<Topic>(r#"{"id": -1}"#).is_err());
    }

    #[test]
    fn serializes_id_first_then_fields_in_order() {
        let mut topic = Topic::new(2);
        topic.fields.insert("title".into(), "T".into());
        topic.fields.insert("status".into(), "".into());
        let json = serde_json::to_string(&topic).unwrap();
        assert_eq!(json, r#"{"id":2,"title":"T","status":""}"#);
    }

    #[test]
    fn untouched_scalars_keep_their_json_type() {
        let mut topic: Topic =
            serde_json::from_str(r#"{"id": 1, "effort": 12, "done": false, "note": null}"#)
                .unwrap();
        assert_eq!(
            serde_json::to_string(&topic).unwrap(),
            r#"{"id":1,"effort":12,"done":false,"note":null}"#
        );

        topic.fields.insert("effort".into(), "13".into());
        topic.fields.insert("note".into(), "set".into());
        assert_eq!(
            serde_json::to_string(&topic).unwrap(),
            r#"{"id":1,"effort":"13","done":false,"note":"set"}"#
        );
    }

    #[test]
    fn equality_ignores_loaded_json_types() {
        let loaded: Topic = serde_json::from_str(r#"{"id": 3, "effort": 5}"#).unwrap();
        let mut built = Topic::new(3);
        built.fields.insert("effort".into(), "5".into());
        assert_eq!(loaded, built);
    }

    #[test]
    fn blank_selection_reads_as_empty() {
        let select = FieldDefinition {
            name: "status".into(),
            caption: "Status".into(),
            field_type: FieldType::Select,
            lines: 1,
            options: vec!["open".into()],
            show_in_table: true,
            column_width: None,
            input_width: None,
            read_only: false,
            computed: None,
        };
        assert_eq!(FieldValue::for_field(&select, ""), FieldValue::Choice(None));
        assert_eq!(FieldValue::Choice(None).as_text(), "");
        assert_eq!(FieldValue::for_field(&select, "open").as_text(), "open");
    }
}
