//! The flattened network as sent to the solver.
//!
//! On the wire the payload is a JSON object keyed by position (`"0"`,
//! `"1"`, ...). Positions carry no meaning beyond the canonical kind order;
//! each record says what it is through its `typ` label.

use super::connectivity::BusRefs;
use crate::components::ComponentKind;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// One flattened cell.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentRecord {
    /// Kind of the source cell
    pub kind: ComponentKind,
    /// Sequential label such as `Transformer0`
    pub typ: String,
    /// Source cell id
    pub id: String,
    /// Display name, empty when unset
    pub name: String,
    /// Bus reference fields; `None` when unresolved
    pub buses: BusRefs,
    /// Raw attribute strings, in schema order
    pub attributes: Vec<(&'static str, String)>,
}

impl ComponentRecord {
    /// Resolved bus reference by field name.
    pub fn bus(&self, field: &str) -> Option<&str> {
        self.buses
            .iter()
            .find(|(name, _)| *name == field)
            .and_then(|(_, id)| id.as_deref())
    }

    /// Raw attribute value by field name.
    pub fn attribute(&self, field: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, value)| value.as_str())
    }
}

impl Serialize for ComponentRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map =
            serializer.serialize_map(Some(3 + self.buses.len() + self.attributes.len()))?;
        map.serialize_entry("typ", &self.typ)?;
        map.serialize_entry("name", &self.name)?;
        map.serialize_entry("id", &self.id)?;
        for (field, bus) in &self.buses {
            map.serialize_entry(field, bus)?;
        }
        for (field, value) in &self.attributes {
            map.serialize_entry(field, value)?;
        }
        map.end()
    }
}

/// All records of one flattening call, in canonical order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkPayload {
    records: Vec<ComponentRecord>,
}

impl NetworkPayload {
    pub(crate) fn from_records(records: Vec<ComponentRecord>) -> Self {
        Self { records }
    }

    /// All records in payload order.
    pub fn records(&self) -> &[ComponentRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no cell was flattened.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records of one kind, in traversal order.
    pub fn of_kind(&self, kind: ComponentKind) -> impl Iterator<Item = &ComponentRecord> {
        self.records.iter().filter(move |record| record.kind == kind)
    }

    /// Compact JSON form, as submitted.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Indented JSON form, for export.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Serialize for NetworkPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.records.len()))?;
        for (position, record) in self.records.iter().enumerate() {
            map.serialize_entry(&position.to_string(), record)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_keys_come_in_fixed_order() {
        let record = ComponentRecord {
            kind: ComponentKind::Line,
            typ: "Line0".into(),
            id: "7".into(),
            name: "Feeder".into(),
            buses: vec![("from_bus", Some("2".into())), ("to_bus", None)],
            attributes: vec![("length_km", "1.5".into())],
        };
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"typ":"Line0","name":"Feeder","id":"7","from_bus":"2","to_bus":null,"length_km":"1.5"}"#
        );
        assert_eq!(record.bus("from_bus"), Some("2"));
        assert_eq!(record.bus("to_bus"), None);
        assert_eq!(record.attribute("length_km"), Some("1.5"));
    }

    #[test]
    fn payload_is_keyed_by_position() {
        let bus = |n: usize| ComponentRecord {
            kind: ComponentKind::Bus,
            typ: format!("Bus{n}"),
            id: format!("b{n}"),
            name: format!("b{n}"),
            buses: Vec::new(),
            attributes: Vec::new(),
        };
        let payload = NetworkPayload::from_records((0..12).map(bus).collect());
        let json = payload.to_json().unwrap();
        assert!(json.starts_with(r#"{"0":{"typ":"Bus0""#));
        // "10" must follow "9", not "1".
        let nine = json.find(r#""9":"#).unwrap();
        let ten = json.find(r#""10":"#).unwrap();
        assert!(nine < ten);
        assert_eq!(payload.of_kind(ComponentKind::Bus).count(), 12);
    }

    #[test]
    fn empty_payload_is_empty_object() {
        let payload = NetworkPayload::default();
        assert!(payload.is_empty());
        assert_eq!(payload.to_json().unwrap(), "{}");
    }
}
