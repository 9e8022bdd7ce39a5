//! Reading named attributes off a cell into a sparse record.

use super::adapter::DiagramSource;
use crate::components::ComponentKind;
use crate::schema;

/// One output field and the attribute it is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeField {
    /// Key in the output record
    pub field: &'static str,
    /// Attribute name in the cell's bag
    pub attribute: &'static str,
    /// Left out of the record when the cell lacks it
    pub optional: bool,
}

/// Attribute fields carried into the payload for a component kind.
///
/// Parameter ids double as attribute names, so this is a projection of
/// the kind's schema table.
pub fn fields_for(kind: ComponentKind) -> Vec<AttributeField> {
    schema::fields(kind)
        .iter()
        .map(|spec| AttributeField {
            field: spec.id,
            attribute: spec.id,
            optional: spec.optional,
        })
        .collect()
}

/// Reads the listed attributes of `cell`.
///
/// Only fields whose attribute exists on the cell appear in the result, in
/// field-list order. Absent attributes are omitted whether or not they are
/// marked optional; values are the raw strings.
pub fn read_attributes<S: DiagramSource + ?Sized>(
    source: &S,
    cell: &str,
    fields: &[AttributeField],
) -> Vec<(&'static str, String)> {
    fields
        .iter()
        .filter_map(|field| {
            source
                .attribute_of(cell, field.attribute)
                .map(|value| (field.field, value.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::DiagramView;
    use crate::types::{Cell, Diagram};

    #[test]
    fn missing_attributes_are_omitted() {
        let mut diagram = Diagram::new();
        diagram.add_cell(
            Cell::component(ComponentKind::Transformer, "T1", (0.0, 0.0))
                .with_id("t")
                .with_attribute("vn_lv_kv", "20")
                .with_attribute("sn_mva", "40"),
        );
        let view = DiagramView::new(&diagram);

        let record = read_attributes(&view, "t", &fields_for(ComponentKind::Transformer));
        assert_eq!(record, vec![("sn_mva", "40".to_string()), ("vn_lv_kv", "20".to_string())]);
        assert!(record.iter().all(|(name, _)| *name != "vector_group"));
    }

    #[test]
    fn field_and_attribute_names_may_differ() {
        let mut diagram = Diagram::new();
        diagram.add_cell(
            Cell::component(ComponentKind::Load, "L", (0.0, 0.0))
                .with_id("l")
                .with_attribute("P", "3"),
        );
        let view = DiagramView::new(&diagram);
        let fields = [
            AttributeField {
                field: "p_mw",
                attribute: "P",
                optional: false,
            },
            AttributeField {
                field: "q_mvar",
                attribute: "q_mvar",
                optional: false,
            },
        ];
        assert_eq!(read_attributes(&view, "l", &fields), vec![("p_mw", "3".to_string())]);
    }

    #[test]
    fn unknown_cell_reads_nothing() {
        let diagram = Diagram::new();
        let view = DiagramView::new(&diagram);
        assert!(read_attributes(&view, "ghost", &fields_for(ComponentKind::Transformer)).is_empty());
    }

    #[test]
    fn projection_keeps_optional_markers() {
        let fields = fields_for(ComponentKind::Transformer);
        let vector_group = fields.iter().find(|f| f.field == "vector_group").unwrap();
        assert!(vector_group.optional);
        let sn = fields.iter().find(|f| f.field == "sn_mva").unwrap();
        assert!(!sn.optional);
    }
}
