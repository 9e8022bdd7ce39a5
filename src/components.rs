//! The closed catalogue of electrical component kinds.
//!
//! Every kind knows the tag string stored under the `shapeELXXX` style key,
//! the label prefix used for its flattened records, and how its bus
//! references are resolved.

use serde::{Deserialize, Serialize};

/// How a component's bus references are found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    /// Carries no bus references (buses themselves, simulation parameters).
    None,
    /// One bus reference: the first adjacent bus.
    Single(&'static str),
    /// Two bus references in incidence order.
    Double(&'static str, &'static str),
    /// Three bus references in incidence order.
    Triple(&'static str, &'static str, &'static str),
}

impl Connectivity {
    /// Output field names of the bus references, in resolution order.
    pub fn field_names(&self) -> Vec<&'static str> {
        match *self {
            Connectivity::None => Vec::new(),
            Connectivity::Single(a) => vec![a],
            Connectivity::Double(a, b) => vec![a, b],
            Connectivity::Triple(a, b, c) => vec![a, b, c],
        }
    }

    /// Number of bus references this strategy produces.
    pub fn arity(&self) -> usize {
        match self {
            Connectivity::None => 0,
            Connectivity::Single(_) => 1,
            Connectivity::Double(..) => 2,
            Connectivity::Triple(..) => 3,
        }
    }
}

/// Electrical component types known to the editor and the solver.
///
/// The declaration order is the canonical payload order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComponentKind {
    /// Solver options (frequency, algorithm, ...), drawn as a settings card.
    SimulationParameters,
    /// Slack connection to the upstream grid
    ExternalGrid,
    /// Voltage-controlled (PV) generator
    Generator,
    /// Fixed-output (PQ) generator
    StaticGenerator,
    /// Per-phase static generator
    AsymmetricStaticGenerator,
    /// AC busbar
    Bus,
    /// Two-winding transformer
    Transformer,
    /// Three-winding transformer
    ThreeWindingTransformer,
    /// Shunt reactor
    ShuntReactor,
    /// Shunt capacitor
    Capacitor,
    /// Symmetric load
    Load,
    /// Per-phase load
    AsymmetricLoad,
    /// Series impedance between two buses
    Impedance,
    /// Ward equivalent
    Ward,
    /// Extended ward equivalent
    ExtendedWard,
    /// Induction motor
    Motor,
    /// Battery storage
    Storage,
    /// Static synchronous compensator
    Ssc,
    /// Static var compensator
    Svc,
    /// Thyristor-controlled series capacitor
    Tcsc,
    /// Voltage source converter
    Vsc,
    /// Back-to-back converter
    B2bVsc,
    /// DC busbar
    DcBus,
    /// DC load
    DcLoad,
    /// DC source
    DcSource,
    /// Bus-bus or bus-element switch
    Switch,
    /// DC line
    DcLine,
    /// AC line
    Line,
}

impl ComponentKind {
    /// All kinds in canonical payload order.
    pub const ALL: [ComponentKind; 28] = [
        ComponentKind::SimulationParameters,
        ComponentKind::ExternalGrid,
        ComponentKind::Generator,
        ComponentKind::StaticGenerator,
        ComponentKind::AsymmetricStaticGenerator,
        ComponentKind::Bus,
        ComponentKind::Transformer,
        ComponentKind::ThreeWindingTransformer,
        ComponentKind::ShuntReactor,
        ComponentKind::Capacitor,
        ComponentKind::Load,
        ComponentKind::AsymmetricLoad,
        ComponentKind::Impedance,
        ComponentKind::Ward,
        ComponentKind::ExtendedWard,
        ComponentKind::Motor,
        ComponentKind::Storage,
        ComponentKind::Ssc,
        ComponentKind::Svc,
        ComponentKind::Tcsc,
        ComponentKind::Vsc,
        ComponentKind::B2bVsc,
        ComponentKind::DcBus,
        ComponentKind::DcLoad,
        ComponentKind::DcSource,
        ComponentKind::Switch,
        ComponentKind::DcLine,
        ComponentKind::Line,
    ];

    /// Position of this kind in the canonical payload order.
    pub fn order_index(self) -> usize {
        self as usize
    }

    /// Tag stored under the `shapeELXXX` style key.
    pub fn tag(self) -> &'static str {
        match self {
            ComponentKind::SimulationParameters => "Simulation Parameters",
            ComponentKind::ExternalGrid => "External Grid",
            ComponentKind::Generator => "Generator",
            ComponentKind::StaticGenerator => "Static Generator",
            ComponentKind::AsymmetricStaticGenerator => "Asymmetric Static Generator",
            ComponentKind::Bus => "Bus",
            ComponentKind::Transformer => "Transformer",
            ComponentKind::ThreeWindingTransformer => "Three Winding Transformer",
            ComponentKind::ShuntReactor => "Shunt Reactor",
            ComponentKind::Capacitor => "Capacitor",
            ComponentKind::Load => "Load",
            ComponentKind::AsymmetricLoad => "Asymmetric Load",
            ComponentKind::Impedance => "Impedance",
            ComponentKind::Ward => "Ward",
            ComponentKind::ExtendedWard => "Extended Ward",
            ComponentKind::Motor => "Motor",
            ComponentKind::Storage => "Storage",
            ComponentKind::Ssc => "SSC",
            ComponentKind::Svc => "SVC",
            ComponentKind::Tcsc => "TCSC",
            ComponentKind::Vsc => "VSC",
            ComponentKind::B2bVsc => "B2B VSC",
            ComponentKind::DcBus => "DC Bus",
            ComponentKind::DcLoad => "DC Load",
            ComponentKind::DcSource => "DC Source",
            ComponentKind::Switch => "Switch",
            ComponentKind::DcLine => "DC Line",
            ComponentKind::Line => "Line",
        }
    }

    /// Looks up a kind by its style tag.
    ///
    /// `Busbar` is accepted as a legacy spelling of `Bus`. Tags of
    /// annotation, result and label shapes are not components.
    pub fn from_tag(tag: &str) -> Option<Self> {
        if tag == "Busbar" {
            return Some(ComponentKind::Bus);
        }
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    /// Prefix of the sequential record label (`"Transformer"` + counter).
    pub fn record_label(self) -> &'static str {
        self.tag()
    }

    /// Name shown in the palette and dialog titles.
    pub fn display_name(self) -> &'static str {
        self.tag()
    }

    /// How bus references of this kind are resolved.
    pub fn connectivity(self) -> Connectivity {
        use ComponentKind::*;
        match self {
            SimulationParameters | Bus | DcBus => Connectivity::None,
            ExternalGrid | Generator | StaticGenerator | AsymmetricStaticGenerator
            | ShuntReactor | Capacitor | Load | AsymmetricLoad | Ward | ExtendedWard | Motor
            | Storage | Ssc | Svc | DcLoad | DcSource => Connectivity::Single("bus"),
            Transformer => Connectivity::Double("hv_bus", "lv_bus"),
            ThreeWindingTransformer => Connectivity::Triple("hv_bus", "mv_bus", "lv_bus"),
            Impedance | Tcsc | DcLine | Line => Connectivity::Double("from_bus", "to_bus"),
            Vsc | B2bVsc => Connectivity::Double("bus", "bus_dc"),
            Switch => Connectivity::Double("bus", "element"),
        }
    }

    /// Whether cells of this kind are valid targets of bus resolution.
    pub fn is_bus_like(self) -> bool {
        matches!(self, ComponentKind::Bus | ComponentKind::DcBus)
    }

    /// Whether the editor draws this kind as an edge between two cells.
    pub fn is_edge_kind(self) -> bool {
        matches!(self, ComponentKind::Line | ComponentKind::DcLine)
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip_through_lookup() {
        for kind in ComponentKind::ALL {
            assert_eq!(ComponentKind::from_tag(kind.tag()), Some(kind));
        }
    }

    #[test]
    fn all_is_in_declaration_order() {
        for (index, kind) in ComponentKind::ALL.iter().enumerate() {
            assert_eq!(kind.order_index(), index);
        }
    }

    #[test]
    fn busbar_alias_and_unknown_tags() {
        assert_eq!(ComponentKind::from_tag("Busbar"), Some(ComponentKind::Bus));
        assert_eq!(ComponentKind::from_tag("Result"), None);
        assert_eq!(ComponentKind::from_tag("generator"), None);
    }

    #[test]
    fn canonical_order_starts_with_parameters_and_ends_with_line() {
        assert_eq!(ComponentKind::ALL[0], ComponentKind::SimulationParameters);
        assert_eq!(ComponentKind::ALL[1], ComponentKind::ExternalGrid);
        assert_eq!(ComponentKind::ALL[27], ComponentKind::Line);
        assert!(ComponentKind::Bus < ComponentKind::Transformer);
        assert!(ComponentKind::Switch < ComponentKind::DcLine);
    }

    #[test]
    fn arity_follows_classifier_branch() {
        assert_eq!(ComponentKind::Generator.connectivity().arity(), 1);
        assert_eq!(ComponentKind::Load.connectivity().arity(), 1);
        assert_eq!(ComponentKind::Transformer.connectivity().arity(), 2);
        assert_eq!(ComponentKind::Line.connectivity().arity(), 2);
        assert_eq!(ComponentKind::ThreeWindingTransformer.connectivity().arity(), 3);
        assert_eq!(ComponentKind::Bus.connectivity().arity(), 0);
        for kind in ComponentKind::ALL {
            assert!(kind.connectivity().arity() <= 3);
        }
    }

    #[test]
    fn transformer_fields_are_hv_then_lv() {
        assert_eq!(
            ComponentKind::Transformer.connectivity().field_names(),
            vec!["hv_bus", "lv_bus"]
        );
    }
}
