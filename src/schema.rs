//! Declarative parameter tables for every component kind.
//!
//! A [`FieldSpec`] names one solver parameter: its id (the solver's schema
//! name, which is also the attribute name in the cell's bag), label, type,
//! unit, default and the dialog tab it lives on. The tables drive both the
//! component dialogs and the attribute reader of the flattening pass.
//!
//! [`ParamValue::parse`] and [`ParamValue::to_attr_string`] are the only
//! places where attribute strings turn into typed values and back.

use crate::components::ComponentKind;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Value type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldType {
    /// Real number
    Number,
    /// Whole number
    Integer,
    /// `true` or `false`
    Bool,
    /// Free text
    Text,
    /// One of a fixed set of strings
    Choice(&'static [&'static str]),
}

/// Dialog tab a parameter is shown on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tab {
    /// Power flow parameters
    LoadFlow,
    /// Fault calculation parameters
    ShortCircuit,
    /// Optimal power flow
    Opf,
    /// Zero-sequence data for unbalanced studies
    ZeroSequence,
}

impl Tab {
    /// Caption shown on the tab.
    pub fn title(self) -> &'static str {
        match self {
            Tab::LoadFlow => "Load Flow",
            Tab::ShortCircuit => "Short Circuit",
            Tab::Opf => "OPF",
            Tab::ZeroSequence => "Zero Sequence",
        }
    }
}

/// One editable, solver-visible parameter of a component kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// Attribute name, also the payload key
    pub id: &'static str,
    /// Caption in the dialog
    pub label: &'static str,
    /// Value type
    pub ty: FieldType,
    /// Unit shown next to the input
    pub unit: Option<&'static str>,
    /// Value seeded into the dialog when the cell has no such attribute
    pub default: &'static str,
    /// Optional parameters may be left blank; they are then omitted
    pub optional: bool,
    /// Dialog tab the field sits on
    pub tab: Tab,
    /// Inclusive lower bound for numeric fields
    pub min: Option<f64>,
}

impl FieldSpec {
    const fn new(id: &'static str, label: &'static str, ty: FieldType, default: &'static str) -> Self {
        Self {
            id,
            label,
            ty,
            unit: None,
            default,
            optional: false,
            tab: Tab::LoadFlow,
            min: None,
        }
    }

    const fn unit(mut self, unit: &'static str) -> Self {
        self.unit = Some(unit);
        self
    }

    const fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    const fn tab(mut self, tab: Tab) -> Self {
        self.tab = tab;
        self
    }

    const fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }
}

const fn num(id: &'static str, label: &'static str, unit: &'static str, default: &'static str) -> FieldSpec {
    FieldSpec::new(id, label, FieldType::Number, default).unit(unit)
}

const fn ratio(id: &'static str, label: &'static str, default: &'static str) -> FieldSpec {
    FieldSpec::new(id, label, FieldType::Number, default)
}

const fn int(id: &'static str, label: &'static str, default: &'static str) -> FieldSpec {
    FieldSpec::new(id, label, FieldType::Integer, default)
}

const fn flag(id: &'static str, label: &'static str, default: &'static str) -> FieldSpec {
    FieldSpec::new(id, label, FieldType::Bool, default)
}

const fn text(id: &'static str, label: &'static str, default: &'static str) -> FieldSpec {
    FieldSpec::new(id, label, FieldType::Text, default)
}

const fn choice(
    id: &'static str,
    label: &'static str,
    options: &'static [&'static str],
    default: &'static str,
) -> FieldSpec {
    FieldSpec::new(id, label, FieldType::Choice(options), default)
}

use Tab::{Opf, ShortCircuit, ZeroSequence};

const ALGORITHMS: &[&str] = &["nr", "iwamoto_nr", "bfsw", "gs", "fdbx", "fdxb"];
const VOLTAGE_ANGLES: &[&str] = &["auto", "True", "False"];
const INIT_MODES: &[&str] = &["auto", "flat", "dc", "results"];
const TAP_SIDES: &[&str] = &["hv", "lv"];
const TAP_SIDES_3W: &[&str] = &["hv", "mv", "lv"];
const LOAD_TYPES: &[&str] = &["wye", "delta"];
const BUS_TYPES: &[&str] = &["b", "n", "m"];
const LINE_TYPES: &[&str] = &["ol", "cs"];
const SWITCH_TYPES: &[&str] = &["CB", "LS", "LBS", "DS"];
const VSC_AC_MODES: &[&str] = &["vm_pu", "q_mvar", "slack"];
const VSC_DC_MODES: &[&str] = &["vm_pu", "p_mw"];
const SGEN_TYPES: &[&str] = &["motor", "PV", "WP", "CHP", "fuel cell"];
const SGEN_GEN_TYPES: &[&str] = &["current_source", "async", "async_doubly_fed"];

static SIMULATION_PARAMETERS: &[FieldSpec] = &[
    num("frequency", "Frequency", "Hz", "50").min(0.0),
    choice("algorithm", "Algorithm", ALGORITHMS, "nr"),
    choice("calculate_voltage_angles", "Calculate voltage angles", VOLTAGE_ANGLES, "auto"),
    choice("initialization", "Initialization", INIT_MODES, "auto"),
    int("max_iteration", "Maximum iterations", "10").optional(),
    ratio("tolerance_mva", "Tolerance (MVA)", "1e-8").optional(),
];

static EXTERNAL_GRID: &[FieldSpec] = &[
    ratio("vm_pu", "Voltage setpoint (p.u.)", "1.0").min(0.0),
    num("va_degree", "Voltage angle", "deg", "0"),
    ratio("slack_weight", "Slack weight", "1.0").optional(),
    flag("in_service", "In service", "true"),
    num("s_sc_max_mva", "Max short-circuit power", "MVA", "1000").tab(ShortCircuit).optional(),
    num("s_sc_min_mva", "Min short-circuit power", "MVA", "800").tab(ShortCircuit).optional(),
    ratio("rx_max", "Max R/X ratio", "0.1").tab(ShortCircuit).optional(),
    ratio("rx_min", "Min R/X ratio", "0.1").tab(ShortCircuit).optional(),
    ratio("r0x0_max", "Max R0/X0 ratio", "0.1").tab(ZeroSequence).optional(),
    ratio("x0x_max", "Max X0/X ratio", "1.0").tab(ZeroSequence).optional(),
    num("max_p_mw", "Max active power", "MW", "").tab(Opf).optional(),
    num("min_p_mw", "Min active power", "MW", "").tab(Opf).optional(),
    num("max_q_mvar", "Max reactive power", "MVAr", "").tab(Opf).optional(),
    num("min_q_mvar", "Min reactive power", "MVAr", "").tab(Opf).optional(),
];

static GENERATOR: &[FieldSpec] = &[
    num("p_mw", "Active power", "MW", "0"),
    ratio("vm_pu", "Voltage setpoint (p.u.)", "1.0").min(0.0),
    num("sn_mva", "Nominal power", "MVA", "").optional().min(0.0),
    ratio("scaling", "Scaling", "1.0").min(0.0),
    ratio("slack_weight", "Slack weight", "0.0").optional(),
    flag("slack", "Slack", "false"),
    flag("in_service", "In service", "true"),
    num("vn_kv", "Rated voltage", "kV", "").tab(ShortCircuit).optional(),
    ratio("xdss_pu", "Subtransient reactance (p.u.)", "").tab(ShortCircuit).optional(),
    num("rdss_ohm", "Subtransient resistance", "Ω", "").tab(ShortCircuit).optional(),
    ratio("cos_phi", "Rated cos(phi)", "").tab(ShortCircuit).optional(),
    ratio("pg_percent", "Rated voltage regulation", "").tab(ShortCircuit).optional(),
    flag("controllable", "Controllable", "true").tab(Opf),
    num("max_p_mw", "Max active power", "MW", "").tab(Opf).optional(),
    num("min_p_mw", "Min active power", "MW", "").tab(Opf).optional(),
    num("max_q_mvar", "Max reactive power", "MVAr", "").tab(Opf).optional(),
    num("min_q_mvar", "Min reactive power", "MVAr", "").tab(Opf).optional(),
];

static STATIC_GENERATOR: &[FieldSpec] = &[
    num("p_mw", "Active power", "MW", "0"),
    num("q_mvar", "Reactive power", "MVAr", "0"),
    num("sn_mva", "Nominal power", "MVA", "").optional().min(0.0),
    ratio("scaling", "Scaling", "1.0").min(0.0),
    choice("type", "Type", SGEN_TYPES, "PV").optional(),
    flag("in_service", "In service", "true"),
    choice("generator_type", "Generator type", SGEN_GEN_TYPES, "current_source")
        .tab(ShortCircuit)
        .optional(),
    ratio("k", "Short-circuit current ratio", "").tab(ShortCircuit).optional(),
    ratio("rx", "R/X ratio", "").tab(ShortCircuit).optional(),
    ratio("lrc_pu", "Locked rotor current (p.u.)", "").tab(ShortCircuit).optional(),
    num("max_ik_ka", "Max fault current", "kA", "").tab(ShortCircuit).optional(),
    ratio("kappa", "Peak factor", "").tab(ShortCircuit).optional(),
    flag("current_source", "Current source", "true").tab(ShortCircuit),
    flag("controllable", "Controllable", "false").tab(Opf),
    num("max_p_mw", "Max active power", "MW", "").tab(Opf).optional(),
    num("min_p_mw", "Min active power", "MW", "").tab(Opf).optional(),
];

static ASYMMETRIC_STATIC_GENERATOR: &[FieldSpec] = &[
    num("p_a_mw", "Active power phase A", "MW", "0"),
    num("p_b_mw", "Active power phase B", "MW", "0"),
    num("p_c_mw", "Active power phase C", "MW", "0"),
    num("q_a_mvar", "Reactive power phase A", "MVAr", "0"),
    num("q_b_mvar", "Reactive power phase B", "MVAr", "0"),
    num("q_c_mvar", "Reactive power phase C", "MVAr", "0"),
    num("sn_mva", "Nominal power", "MVA", "").optional().min(0.0),
    ratio("scaling", "Scaling", "1.0").min(0.0),
    choice("type", "Connection", LOAD_TYPES, "wye"),
    flag("in_service", "In service", "true"),
];

static BUS: &[FieldSpec] = &[
    num("vn_kv", "Nominal voltage", "kV", "20").min(0.0),
    choice("type", "Bus type", BUS_TYPES, "b"),
    text("zone", "Zone", "").optional(),
    flag("in_service", "In service", "true"),
    ratio("max_vm_pu", "Max voltage (p.u.)", "").tab(Opf).optional(),
    ratio("min_vm_pu", "Min voltage (p.u.)", "").tab(Opf).optional(),
];

static TRANSFORMER: &[FieldSpec] = &[
    num("sn_mva", "Rated power", "MVA", "25").min(0.0),
    num("vn_hv_kv", "HV rated voltage", "kV", "110").min(0.0),
    num("vn_lv_kv", "LV rated voltage", "kV", "20").min(0.0),
    num("vk_percent", "Short-circuit voltage", "%", "12").min(0.0),
    num("vkr_percent", "Short-circuit voltage real part", "%", "0.41").min(0.0),
    num("pfe_kw", "Iron losses", "kW", "14").min(0.0),
    num("i0_percent", "Open-loop current", "%", "0.07").min(0.0),
    num("shift_degree", "Phase shift", "deg", "150"),
    choice("tap_side", "Tap side", TAP_SIDES, "hv").optional(),
    int("tap_neutral", "Tap neutral position", "0").optional(),
    int("tap_min", "Minimum tap position", "-9").optional(),
    int("tap_max", "Maximum tap position", "9").optional(),
    num("tap_step_percent", "Tap step", "%", "1.5").optional(),
    num("tap_step_degree", "Tap step angle", "deg", "0").optional(),
    int("tap_pos", "Current tap position", "0").optional(),
    flag("tap_phase_shifter", "Ideal phase shifter", "false"),
    int("parallel", "Parallel transformers", "1").min(1.0),
    ratio("df", "Derating factor", "1.0").min(0.0),
    flag("in_service", "In service", "true"),
    text("vector_group", "Vector group", "Dyn").tab(ZeroSequence).optional(),
    num("vk0_percent", "Zero-sequence short-circuit voltage", "%", "").tab(ZeroSequence).optional(),
    num("vkr0_percent", "Zero-sequence real part", "%", "").tab(ZeroSequence).optional(),
    ratio("mag0_percent", "Zero-sequence magnetizing ratio", "").tab(ZeroSequence).optional(),
    ratio("mag0_rx", "Zero-sequence magnetizing R/X", "").tab(ZeroSequence).optional(),
    ratio("si0_hv_partial", "Zero-sequence HV partial", "").tab(ZeroSequence).optional(),
    num("max_loading_percent", "Max loading", "%", "").tab(Opf).optional(),
];

static THREE_WINDING_TRANSFORMER: &[FieldSpec] = &[
    num("sn_hv_mva", "HV rated power", "MVA", "63").min(0.0),
    num("sn_mv_mva", "MV rated power", "MVA", "25").min(0.0),
    num("sn_lv_mva", "LV rated power", "MVA", "38").min(0.0),
    num("vn_hv_kv", "HV rated voltage", "kV", "110").min(0.0),
    num("vn_mv_kv", "MV rated voltage", "kV", "20").min(0.0),
    num("vn_lv_kv", "LV rated voltage", "kV", "10").min(0.0),
    num("vk_hv_percent", "HV short-circuit voltage", "%", "10.04").min(0.0),
    num("vk_mv_percent", "MV short-circuit voltage", "%", "10.04").min(0.0),
    num("vk_lv_percent", "LV short-circuit voltage", "%", "10.04").min(0.0),
    num("vkr_hv_percent", "HV real part", "%", "0.31").min(0.0),
    num("vkr_mv_percent", "MV real part", "%", "0.31").min(0.0),
    num("vkr_lv_percent", "LV real part", "%", "0.31").min(0.0),
    num("pfe_kw", "Iron losses", "kW", "35").min(0.0),
    num("i0_percent", "Open-loop current", "%", "0.89").min(0.0),
    num("shift_mv_degree", "MV phase shift", "deg", "0"),
    num("shift_lv_degree", "LV phase shift", "deg", "0"),
    choice("tap_side", "Tap side", TAP_SIDES_3W, "hv").optional(),
    int("tap_neutral", "Tap neutral position", "0").optional(),
    int("tap_min", "Minimum tap position", "-10").optional(),
    int("tap_max", "Maximum tap position", "10").optional(),
    num("tap_step_percent", "Tap step", "%", "1.2").optional(),
    num("tap_step_degree", "Tap step angle", "deg", "0").optional(),
    int("tap_pos", "Current tap position", "0").optional(),
    flag("tap_at_star_point", "Tap at star point", "false"),
    flag("in_service", "In service", "true"),
    text("vector_group", "Vector group", "").tab(ZeroSequence).optional(),
    num("vk0_hv_percent", "HV zero-sequence voltage", "%", "").tab(ZeroSequence).optional(),
    num("vk0_mv_percent", "MV zero-sequence voltage", "%", "").tab(ZeroSequence).optional(),
    num("vk0_lv_percent", "LV zero-sequence voltage", "%", "").tab(ZeroSequence).optional(),
    num("max_loading_percent", "Max loading", "%", "").tab(Opf).optional(),
];

static SHUNT_REACTOR: &[FieldSpec] = &[
    num("p_mw", "Active power at 1 p.u.", "MW", "0"),
    num("q_mvar", "Reactive power at 1 p.u.", "MVAr", "1"),
    num("vn_kv", "Rated voltage", "kV", "").optional().min(0.0),
    int("step", "Step", "1").min(0.0),
    int("max_step", "Max step", "1").min(1.0),
    flag("in_service", "In service", "true"),
];

static CAPACITOR: &[FieldSpec] = &[
    num("q_mvar", "Reactive power", "MVAr", "-1"),
    ratio("loss_factor", "Loss factor", "0"),
    num("vn_kv", "Rated voltage", "kV", "").optional().min(0.0),
    int("step", "Step", "1").min(0.0),
    int("max_step", "Max step", "1").min(1.0),
    flag("in_service", "In service", "true"),
];

static LOAD: &[FieldSpec] = &[
    num("p_mw", "Active power", "MW", "0"),
    num("q_mvar", "Reactive power", "MVAr", "0"),
    num("const_z_percent", "Constant impedance share", "%", "0").min(0.0),
    num("const_i_percent", "Constant current share", "%", "0").min(0.0),
    num("sn_mva", "Rated power", "MVA", "").optional().min(0.0),
    ratio("scaling", "Scaling", "1.0").min(0.0),
    choice("type", "Connection", LOAD_TYPES, "wye"),
    flag("in_service", "In service", "true"),
    flag("controllable", "Controllable", "false").tab(Opf),
    num("max_p_mw", "Max active power", "MW", "").tab(Opf).optional(),
    num("min_p_mw", "Min active power", "MW", "").tab(Opf).optional(),
];

static ASYMMETRIC_LOAD: &[FieldSpec] = &[
    num("p_a_mw", "Active power phase A", "MW", "0"),
    num("p_b_mw", "Active power phase B", "MW", "0"),
    num("p_c_mw", "Active power phase C", "MW", "0"),
    num("q_a_mvar", "Reactive power phase A", "MVAr", "0"),
    num("q_b_mvar", "Reactive power phase B", "MVAr", "0"),
    num("q_c_mvar", "Reactive power phase C", "MVAr", "0"),
    num("sn_mva", "Rated power", "MVA", "").optional().min(0.0),
    ratio("scaling", "Scaling", "1.0").min(0.0),
    choice("type", "Connection", LOAD_TYPES, "wye"),
    flag("in_service", "In service", "true"),
];

static IMPEDANCE: &[FieldSpec] = &[
    ratio("rft_pu", "Resistance from-to (p.u.)", "0.01"),
    ratio("xft_pu", "Reactance from-to (p.u.)", "0.01"),
    ratio("rtf_pu", "Resistance to-from (p.u.)", "0.01"),
    ratio("xtf_pu", "Reactance to-from (p.u.)", "0.01"),
    num("sn_mva", "Reference power", "MVA", "1").min(0.0),
    flag("in_service", "In service", "true"),
];

static WARD: &[FieldSpec] = &[
    num("ps_mw", "Constant active power", "MW", "0"),
    num("qs_mvar", "Constant reactive power", "MVAr", "0"),
    num("pz_mw", "Constant impedance active power", "MW", "0"),
    num("qz_mvar", "Constant impedance reactive power", "MVAr", "0"),
    flag("in_service", "In service", "true"),
];

static EXTENDED_WARD: &[FieldSpec] = &[
    num("ps_mw", "Constant active power", "MW", "0"),
    num("qs_mvar", "Constant reactive power", "MVAr", "0"),
    num("pz_mw", "Constant impedance active power", "MW", "0"),
    num("qz_mvar", "Constant impedance reactive power", "MVAr", "0"),
    num("r_ohm", "Internal resistance", "Ω", "0.1").min(0.0),
    num("x_ohm", "Internal reactance", "Ω", "0.1"),
    ratio("vm_pu", "Internal voltage (p.u.)", "1.0").min(0.0),
    flag("in_service", "In service", "true"),
];

static MOTOR: &[FieldSpec] = &[
    num("pn_mech_mw", "Mechanical rated power", "MW", "0.1").min(0.0),
    ratio("cos_phi", "cos(phi) at operating point", "0.9"),
    num("efficiency_percent", "Efficiency at operating point", "%", "100").min(0.0),
    num("loading_percent", "Mechanical loading", "%", "100").min(0.0),
    ratio("scaling", "Scaling", "1.0").min(0.0),
    flag("in_service", "In service", "true"),
    ratio("cos_phi_n", "Rated cos(phi)", "").tab(ShortCircuit).optional(),
    num("efficiency_n_percent", "Rated efficiency", "%", "").tab(ShortCircuit).optional(),
    ratio("lrc_pu", "Locked rotor current (p.u.)", "").tab(ShortCircuit).optional(),
    ratio("rx", "R/X ratio", "").tab(ShortCircuit).optional(),
    num("vn_kv", "Rated voltage", "kV", "").tab(ShortCircuit).optional(),
];

static STORAGE: &[FieldSpec] = &[
    num("p_mw", "Active power", "MW", "0"),
    num("max_e_mwh", "Max energy", "MWh", "1").min(0.0),
    num("q_mvar", "Reactive power", "MVAr", "0"),
    num("sn_mva", "Rated power", "MVA", "").optional().min(0.0),
    num("soc_percent", "State of charge", "%", "50").optional().min(0.0),
    num("min_e_mwh", "Min energy", "MWh", "0").min(0.0),
    ratio("scaling", "Scaling", "1.0").min(0.0),
    text("type", "Type", "").optional(),
    flag("in_service", "In service", "true"),
    flag("controllable", "Controllable", "false").tab(Opf),
    num("max_p_mw", "Max active power", "MW", "").tab(Opf).optional(),
    num("min_p_mw", "Min active power", "MW", "").tab(Opf).optional(),
];

static SSC: &[FieldSpec] = &[
    num("r_ohm", "Coupling resistance", "Ω", "0").min(0.0),
    num("x_ohm", "Coupling reactance", "Ω", "5"),
    ratio("set_vm_pu", "Voltage setpoint (p.u.)", "1.0").min(0.0),
    ratio("vm_internal_pu", "Internal voltage (p.u.)", "1.0").min(0.0),
    num("va_internal_degree", "Internal voltage angle", "deg", "0"),
    flag("controllable", "Controllable", "true"),
    flag("in_service", "In service", "true"),
];

static SVC: &[FieldSpec] = &[
    num("x_l_ohm", "Reactor reactance", "Ω", "1"),
    num("x_cvar_ohm", "Capacitor reactance", "Ω", "-10"),
    ratio("set_vm_pu", "Voltage setpoint (p.u.)", "1.0").min(0.0),
    num("thyristor_firing_angle_degree", "Thyristor firing angle", "deg", "90"),
    flag("controllable", "Controllable", "true"),
    num("min_angle_degree", "Min firing angle", "deg", "90"),
    num("max_angle_degree", "Max firing angle", "deg", "180"),
    flag("in_service", "In service", "true"),
];

static TCSC: &[FieldSpec] = &[
    num("x_l_ohm", "Reactor reactance", "Ω", "1"),
    num("x_cvar_ohm", "Capacitor reactance", "Ω", "-10"),
    num("set_p_to_mw", "Active power setpoint", "MW", "0"),
    num("thyristor_firing_angle_degree", "Thyristor firing angle", "deg", "90"),
    flag("controllable", "Controllable", "true"),
    num("min_angle_degree", "Min firing angle", "deg", "90"),
    num("max_angle_degree", "Max firing angle", "deg", "180"),
    flag("in_service", "In service", "true"),
];

static VSC: &[FieldSpec] = &[
    num("r_ohm", "AC resistance", "Ω", "0").min(0.0),
    num("x_ohm", "AC reactance", "Ω", "1"),
    num("r_dc_ohm", "DC resistance", "Ω", "0").min(0.0),
    num("pl_dc_mw", "DC losses", "MW", "0"),
    choice("control_mode_ac", "AC control mode", VSC_AC_MODES, "vm_pu"),
    ratio("control_value_ac", "AC control value", "1.0"),
    choice("control_mode_dc", "DC control mode", VSC_DC_MODES, "p_mw"),
    ratio("control_value_dc", "DC control value", "0"),
    flag("controllable", "Controllable", "true"),
    flag("in_service", "In service", "true"),
];

static B2B_VSC: &[FieldSpec] = &[
    num("r_ohm", "AC resistance", "Ω", "0").min(0.0),
    num("x_ohm", "AC reactance", "Ω", "1"),
    num("r_dc_ohm", "DC resistance", "Ω", "0").min(0.0),
    num("pl_dc_mw", "DC losses", "MW", "0"),
    choice("control_mode_ac", "AC control mode", VSC_AC_MODES, "vm_pu"),
    ratio("control_value_ac", "AC control value", "1.0"),
    choice("control_mode_dc", "DC control mode", VSC_DC_MODES, "vm_pu"),
    ratio("control_value_dc", "DC control value", "1.0"),
    flag("controllable", "Controllable", "true"),
    flag("in_service", "In service", "true"),
];

static DC_BUS: &[FieldSpec] = &[
    num("vn_kv", "Nominal voltage", "kV", "320").min(0.0),
    flag("in_service", "In service", "true"),
];

static DC_LOAD: &[FieldSpec] = &[
    num("p_mw", "Active power", "MW", "0"),
    ratio("scaling", "Scaling", "1.0").min(0.0),
    text("type", "Type", "").optional(),
    flag("in_service", "In service", "true"),
];

static DC_SOURCE: &[FieldSpec] = &[
    ratio("vm_pu", "Voltage setpoint (p.u.)", "1.0").min(0.0),
    flag("in_service", "In service", "true"),
];

static SWITCH: &[FieldSpec] = &[
    choice("et", "Element type", &["b", "l", "t", "t3"], "b"),
    flag("closed", "Closed", "true"),
    choice("type", "Switch type", SWITCH_TYPES, "CB").optional(),
    num("z_ohm", "Impedance", "Ω", "0").min(0.0),
    num("in_ka", "Rated current", "kA", "").optional().min(0.0),
];

static DC_LINE: &[FieldSpec] = &[
    num("p_mw", "Transmitted power", "MW", "0"),
    num("loss_percent", "Relative losses", "%", "0").min(0.0),
    num("loss_mw", "Total losses", "MW", "0").min(0.0),
    ratio("vm_from_pu", "From voltage (p.u.)", "1.0").min(0.0),
    ratio("vm_to_pu", "To voltage (p.u.)", "1.0").min(0.0),
    flag("in_service", "In service", "true"),
    num("max_p_mw", "Max active power", "MW", "").tab(Opf).optional(),
];

static LINE: &[FieldSpec] = &[
    num("length_km", "Length", "km", "1").min(0.0),
    num("r_ohm_per_km", "Resistance", "Ω/km", "0.122").min(0.0),
    num("x_ohm_per_km", "Reactance", "Ω/km", "0.112"),
    num("c_nf_per_km", "Capacitance", "nF/km", "304").min(0.0),
    num("g_us_per_km", "Dielectric conductance", "µS/km", "0").min(0.0),
    num("max_i_ka", "Max thermal current", "kA", "0.421").min(0.0),
    choice("type", "Line type", LINE_TYPES, "cs").optional(),
    int("parallel", "Parallel lines", "1").min(1.0),
    ratio("df", "Derating factor", "1.0").min(0.0),
    flag("in_service", "In service", "true"),
    num("endtemp_degree", "End temperature", "°C", "").tab(ShortCircuit).optional(),
    num("r0_ohm_per_km", "Zero-sequence resistance", "Ω/km", "").tab(ZeroSequence).optional(),
    num("x0_ohm_per_km", "Zero-sequence reactance", "Ω/km", "").tab(ZeroSequence).optional(),
    num("c0_nf_per_km", "Zero-sequence capacitance", "nF/km", "").tab(ZeroSequence).optional(),
    num("max_loading_percent", "Max loading", "%", "").tab(Opf).optional(),
];

/// Parameter table of a component kind.
pub fn fields(kind: ComponentKind) -> &'static [FieldSpec] {
    use ComponentKind::*;
    match kind {
        SimulationParameters => SIMULATION_PARAMETERS,
        ExternalGrid => EXTERNAL_GRID,
        Generator => GENERATOR,
        StaticGenerator => STATIC_GENERATOR,
        AsymmetricStaticGenerator => ASYMMETRIC_STATIC_GENERATOR,
        Bus => BUS,
        Transformer => TRANSFORMER,
        ThreeWindingTransformer => THREE_WINDING_TRANSFORMER,
        ShuntReactor => SHUNT_REACTOR,
        Capacitor => CAPACITOR,
        Load => LOAD,
        AsymmetricLoad => ASYMMETRIC_LOAD,
        Impedance => IMPEDANCE,
        Ward => WARD,
        ExtendedWard => EXTENDED_WARD,
        Motor => MOTOR,
        Storage => STORAGE,
        Ssc => SSC,
        Svc => SVC,
        Tcsc => TCSC,
        Vsc => VSC,
        B2bVsc => B2B_VSC,
        DcBus => DC_BUS,
        DcLoad => DC_LOAD,
        DcSource => DC_SOURCE,
        Switch => SWITCH,
        DcLine => DC_LINE,
        Line => LINE,
    }
}

/// Looks up a single field of a kind by id.
pub fn field(kind: ComponentKind, id: &str) -> Option<&'static FieldSpec> {
    fields(kind).iter().find(|spec| spec.id == id)
}

/// Tabs used by a kind, in display order.
pub fn tabs(kind: ComponentKind) -> Vec<Tab> {
    let mut tabs: Vec<Tab> = fields(kind).iter().map(|spec| spec.tab).collect();
    tabs.sort();
    tabs.dedup();
    tabs
}

/// Why a raw input was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{label}: {reason}")]
pub struct ValidationError {
    /// Field id
    pub field: &'static str,
    /// Field label, for messages
    pub label: &'static str,
    /// Human-readable cause
    pub reason: String,
}

impl ValidationError {
    fn new(spec: &FieldSpec, reason: impl Into<String>) -> Self {
        Self {
            field: spec.id,
            label: spec.label,
            reason: reason.into(),
        }
    }
}

/// A typed parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Value of a [`FieldType::Number`] field
    Number(f64),
    /// Value of a [`FieldType::Integer`] field
    Integer(i64),
    /// Value of a [`FieldType::Bool`] field
    Bool(bool),
    /// Free text or a choice
    Text(String),
}

impl ParamValue {
    /// Parses the raw text of a field.
    ///
    /// # Returns
    ///
    /// `Ok(None)` for a blank optional field, the typed value otherwise,
    /// or a [`ValidationError`] naming the field.
    pub fn parse(spec: &FieldSpec, raw: &str) -> Result<Option<ParamValue>, ValidationError> {
        let raw = raw.trim();
        if raw.is_empty() && !matches!(spec.ty, FieldType::Bool | FieldType::Text) {
            if spec.optional {
                return Ok(None);
            }
            return Err(ValidationError::new(spec, "a value is required"));
        }
        let value = match spec.ty {
            FieldType::Number => {
                let number: f64 = raw
                    .parse()
                    .map_err(|_| ValidationError::new(spec, format!("'{raw}' is not a number")))?;
                if !number.is_finite() {
                    return Err(ValidationError::new(spec, "must be a finite number"));
                }
                ParamValue::Number(number)
            }
            FieldType::Integer => {
                let integer = match raw.parse::<i64>() {
                    Ok(integer) => integer,
                    Err(_) => match raw.parse::<f64>() {
                        Ok(number) if number.is_finite() && number.fract() == 0.0 => number as i64,
                        _ => {
                            return Err(ValidationError::new(
                                spec,
                                format!("'{raw}' is not a whole number"),
                            ))
                        }
                    },
                };
                ParamValue::Integer(integer)
            }
            FieldType::Bool => ParamValue::Bool(raw.eq_ignore_ascii_case("true")),
            FieldType::Text => {
                if raw.is_empty() && spec.optional {
                    return Ok(None);
                }
                ParamValue::Text(raw.to_string())
            }
            FieldType::Choice(options) => {
                if !options.contains(&raw) {
                    return Err(ValidationError::new(
                        spec,
                        format!("'{raw}' is not one of {}", options.join(", ")),
                    ));
                }
                ParamValue::Text(raw.to_string())
            }
        };
        if let (Some(min), Some(number)) = (spec.min, value.as_f64()) {
            if number < min {
                return Err(ValidationError::new(spec, format!("must be at least {min}")));
            }
        }
        Ok(Some(value))
    }

    /// String form stored in the attribute bag.
    pub fn to_attr_string(&self) -> String {
        match self {
            ParamValue::Number(number) => number.to_string(),
            ParamValue::Integer(integer) => integer.to_string(),
            ParamValue::Bool(flag) => flag.to_string(),
            ParamValue::Text(text) => text.clone(),
        }
    }

    /// Numeric view of numbers and integers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Number(number) => Some(*number),
            ParamValue::Integer(integer) => Some(*integer as f64),
            _ => None,
        }
    }
}

impl Serialize for ParamValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ParamValue::Number(number) => serializer.serialize_f64(*number),
            ParamValue::Integer(integer) => serializer.serialize_i64(*integer),
            ParamValue::Bool(flag) => serializer.serialize_bool(*flag),
            ParamValue::Text(text) => serializer.serialize_str(text),
        }
    }
}

/// Field id to typed value, in schema order; what a dialog hands back on Apply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamValues {
    entries: Vec<(&'static str, ParamValue)>,
}

impl ParamValues {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a value, replacing any earlier one for `id`.
    pub fn insert(&mut self, id: &'static str, value: ParamValue) {
        match self.entries.iter_mut().find(|(key, _)| *key == id) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((id, value)),
        }
    }

    /// Value for `id`, if present.
    pub fn get(&self, id: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(key, _)| *key == id)
            .map(|(_, value)| value)
    }

    /// Iterates values in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ParamValue)> {
        self.entries.iter().map(|(key, value)| (*key, value))
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no value is set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ParamValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
