//! Resolving which buses a component is attached to.
//!
//! A vertex component's neighbours are the far ends of its incident edges,
//! in incidence order. An edge component (a line drawn between two buses)
//! is attached to its own source and target. Only bus-like neighbours
//! count. When more buses are attached than the component has terminals,
//! the first ones in incidence order win; there is no other tie-break.

use super::adapter::DiagramSource;
use crate::components::{ComponentKind, Connectivity};
use crate::style::{self, StyleCache};

/// Bus reference fields of one record, in resolution order.
pub type BusRefs = Vec<(&'static str, Option<String>)>;

fn is_bus<S: DiagramSource + ?Sized>(source: &S, cache: &mut StyleCache, id: &str) -> bool {
    let Some(raw) = source.style_of(id) else {
        return false;
    };
    style::component_tag(cache.get(raw))
        .and_then(ComponentKind::from_tag)
        .is_some_and(ComponentKind::is_bus_like)
}

/// Far ends of the edges incident to `cell`, in incidence order.
///
/// Dangling edges and self-loops contribute nothing.
pub fn neighbours<'s, S: DiagramSource + ?Sized>(source: &'s S, cell: &str) -> Vec<&'s str> {
    let mut out = Vec::new();
    for edge in source.incident_edges(cell) {
        let Some((from, to)) = source.terminals_of(edge) else {
            continue;
        };
        let other = if from == Some(cell) { to } else { from };
        if let Some(other) = other {
            if other != cell {
                out.push(other);
            }
        }
    }
    out
}

/// Adjacent bus ids of a vertex, in incidence order, each id once.
pub fn adjacent_buses<S: DiagramSource + ?Sized>(
    source: &S,
    cache: &mut StyleCache,
    cell: &str,
) -> Vec<String> {
    let mut buses: Vec<String> = Vec::new();
    for other in neighbours(source, cell) {
        if is_bus(source, cache, other) && !buses.iter().any(|b| b == other) {
            buses.push(other.to_string());
        }
    }
    buses
}

/// Resolves the bus references of `cell` for the given strategy.
///
/// The result always has one entry per field of the strategy; entries for
/// which no bus was found are `None`. Never fails.
pub fn resolve<S: DiagramSource + ?Sized>(
    source: &S,
    cache: &mut StyleCache,
    cell: &str,
    connectivity: Connectivity,
) -> BusRefs {
    let names = connectivity.field_names();
    if names.is_empty() {
        return Vec::new();
    }

    let candidates: Vec<Option<String>> = match source.terminals_of(cell) {
        // Edge components are attached by their own ends, positionally.
        Some((from, to)) => [from, to]
            .into_iter()
            .map(|end| end.filter(|id| is_bus(source, cache, id)).map(str::to_string))
            .collect(),
        None => adjacent_buses(source, cache, cell)
            .into_iter()
            .map(Some)
            .collect(),
    };

    names
        .into_iter()
        .enumerate()
        .map(|(position, name)| (name, candidates.get(position).cloned().flatten()))
        .collect()
}
