//! Built-in sample networks that can be loaded from the toolbar.
//!
//! Each sample is small enough to read at a glance and exercises a
//! different part of the flattening: single-bus attachment, two-winding
//! incidence order, and an AC/DC link.

use crate::components::ComponentKind;
use crate::constants::{NOT_EDITABLE_LINE, STYLE_TAG_KEY};
use crate::types::*;

/// Kinds of built-in samples available from the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExampleKind {
    /// External grid feeding a load over one line
    TwoBusFeeder,
    /// 110/20 kV transformer with load and PV on the low side
    Substation,
    /// Converter station linking an AC bus to a DC network
    DcLink,
}

/// Metadata for a single sample.
pub struct ExampleInfo {
    /// Which sample this describes
    pub kind: ExampleKind,
    /// Menu label
    pub name: &'static str,
}

/// Returns all samples with their display names.
pub const fn all_examples() -> &'static [ExampleInfo] {
    const EXAMPLES: &[ExampleInfo] = &[
        ExampleInfo {
            kind: ExampleKind::TwoBusFeeder,
            name: "Two-Bus Feeder",
        },
        ExampleInfo {
            kind: ExampleKind::Substation,
            name: "110/20 kV Substation",
        },
        ExampleInfo {
            kind: ExampleKind::DcLink,
            name: "AC/DC Converter Link",
        },
    ];
    EXAMPLES
}

/// Builds the diagram for the given sample.
pub fn build_example(kind: ExampleKind) -> Diagram {
    match kind {
        ExampleKind::TwoBusFeeder => build_two_bus_feeder(),
        ExampleKind::Substation => build_substation(),
        ExampleKind::DcLink => build_dc_link(),
    }
}

fn place(
    diagram: &mut Diagram,
    kind: ComponentKind,
    name: &str,
    position: (f32, f32),
    attributes: &[(&str, &str)],
) -> CellId {
    let mut cell = Cell::component(kind, name, position);
    for (key, value) in attributes {
        cell = cell.with_attribute(key, value);
    }
    diagram.add_cell(cell)
}

fn wire(diagram: &mut Diagram, from: &str, to: &str) {
    let style = format!("{STYLE_TAG_KEY}={NOT_EDITABLE_LINE};endArrow=none");
    if let Err(err) = diagram.connect(&style, from, to) {
        log::warn!("sample wire {from} -> {to} skipped: {err}");
    }
}

fn line(diagram: &mut Diagram, kind: ComponentKind, name: &str, from: &str, to: &str, attributes: &[(&str, &str)]) {
    let mut cell = Cell::edge(
        format!("{STYLE_TAG_KEY}={};endArrow=none", kind.tag()),
        Some(from.to_string()),
        Some(to.to_string()),
    );
    cell.value = Some(CellValue {
        label: name.to_string(),
        attributes: attributes.iter().copied().collect(),
    });
    diagram.add_cell(cell);
}

fn build_two_bus_feeder() -> Diagram {
    let mut d = Diagram::new();
    place(
        &mut d,
        ComponentKind::SimulationParameters,
        "Load Flow",
        (-220.0, -120.0),
        &[("frequency", "50"), ("algorithm", "nr")],
    );
    let grid = place(
        &mut d,
        ComponentKind::ExternalGrid,
        "Grid",
        (0.0, -120.0),
        &[("vm_pu", "1.02"), ("va_degree", "0")],
    );
    let hv = place(&mut d, ComponentKind::Bus, "Bus 1", (0.0, -40.0), &[("vn_kv", "20")]);
    let lv = place(&mut d, ComponentKind::Bus, "Bus 2", (0.0, 120.0), &[("vn_kv", "20")]);
    let load = place(
        &mut d,
        ComponentKind::Load,
        "Load",
        (0.0, 200.0),
        &[("p_mw", "0.1"), ("q_mvar", "0.05")],
    );
    wire(&mut d, &grid, &hv);
    line(
        &mut d,
        ComponentKind::Line,
        "Feeder",
        &hv,
        &lv,
        &[
            ("length_km", "0.1"),
            ("r_ohm_per_km", "0.642"),
            ("x_ohm_per_km", "0.083"),
            ("c_nf_per_km", "210"),
            ("max_i_ka", "0.142"),
        ],
    );
    wire(&mut d, &load, &lv);
    d
}

fn build_substation() -> Diagram {
    let mut d = Diagram::new();
    let grid = place(&mut d, ComponentKind::ExternalGrid, "Transmission", (0.0, -200.0), &[]);
    let hv = place(&mut d, ComponentKind::Bus, "110 kV", (0.0, -120.0), &[("vn_kv", "110")]);
    let mv = place(&mut d, ComponentKind::Bus, "20 kV", (0.0, 80.0), &[("vn_kv", "20")]);
    // The high-voltage wire is drawn first, so the HV bus resolves as hv_bus.
    let trafo = place(
        &mut d,
        ComponentKind::Transformer,
        "T1",
        (0.0, -20.0),
        &[
            ("sn_mva", "25"),
            ("vn_hv_kv", "110"),
            ("vn_lv_kv", "20"),
            ("vk_percent", "12"),
            ("vkr_percent", "0.41"),
            ("pfe_kw", "14"),
            ("i0_percent", "0.07"),
            ("vector_group", "Dyn5"),
        ],
    );
    wire(&mut d, &grid, &hv);
    wire(&mut d, &trafo, &hv);
    wire(&mut d, &trafo, &mv);

    let load = place(
        &mut d,
        ComponentKind::Load,
        "Town",
        (-120.0, 180.0),
        &[("p_mw", "8"), ("q_mvar", "2")],
    );
    let pv = place(
        &mut d,
        ComponentKind::StaticGenerator,
        "PV Park",
        (0.0, 180.0),
        &[("p_mw", "3"), ("type", "PV")],
    );
    let shunt = place(
        &mut d,
        ComponentKind::ShuntReactor,
        "Reactor",
        (120.0, 180.0),
        &[("q_mvar", "1"), ("p_mw", "0")],
    );
    wire(&mut d, &load, &mv);
    wire(&mut d, &pv, &mv);
    wire(&mut d, &shunt, &mv);
    d
}

fn build_dc_link() -> Diagram {
    let mut d = Diagram::new();
    let grid = place(&mut d, ComponentKind::ExternalGrid, "Grid", (-200.0, -160.0), &[]);
    let ac = place(&mut d, ComponentKind::Bus, "AC Bus", (-200.0, -80.0), &[("vn_kv", "110")]);
    let dc_a = place(&mut d, ComponentKind::DcBus, "DC Bus A", (-200.0, 120.0), &[("vn_kv", "150")]);
    let dc_b = place(&mut d, ComponentKind::DcBus, "DC Bus B", (200.0, 120.0), &[("vn_kv", "150")]);
    let vsc = place(
        &mut d,
        ComponentKind::Vsc,
        "Converter",
        (-200.0, 20.0),
        &[("r_ohm", "0.5"), ("x_ohm", "4"), ("control_mode_ac", "vm_pu")],
    );
    let dc_load = place(&mut d, ComponentKind::DcLoad, "DC Load", (200.0, 200.0), &[("p_mw", "5")]);
    wire(&mut d, &grid, &ac);
    wire(&mut d, &vsc, &ac);
    wire(&mut d, &vsc, &dc_a);
    line(
        &mut d,
        ComponentKind::DcLine,
        "DC Cable",
        &dc_a,
        &dc_b,
        &[("length_km", "40"), ("r_ohm_per_km", "0.02"), ("max_i_ka", "1")],
    );
    wire(&mut d, &dc_load, &dc_b);
    d
}
