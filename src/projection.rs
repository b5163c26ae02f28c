//! Render projection: catalog defaults merged with the override documents
//!
//! `project` is a pure function of its three inputs; calling it twice with
//! identical inputs yields identical output. Keys present in the override
//! documents but absent from the catalog are never rendered.

use crate::catalog::Section;
use crate::overrides::{OrderOverrides, VisibilityOverrides};

/// One catalog entry with its effective (override-or-default) values applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedSection {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub effective_visible: bool,
    pub effective_order: f64,
}

/// Merge catalog defaults with the override documents and sort by effective
/// order. Ties resolve to catalog enumeration order (the sort is stable).
pub fn project(
    catalog: &[Section],
    visibility: &VisibilityOverrides,
    order: &OrderOverrides,
) -> Vec<ProjectedSection> {
    let mut sections: Vec<ProjectedSection> = catalog
        .iter()
        .map(|section| ProjectedSection {
            key: section.key,
            name: section.name,
            description: section.description,
            icon: section.icon,
            effective_visible: visibility.get(section.key).unwrap_or(section.default_visible),
            effective_order: order.get(section.key).unwrap_or(section.default_order),
        })
        .collect();
    sections.sort_by(|a, b| a.effective_order.total_cmp(&b.effective_order));
    sections
}

/// The ordered list filtered to visible entries: what the public renderer
/// mounts. The navigation bar is outside this list's authority and is always
/// rendered regardless.
pub fn visible_sections(
    catalog: &[Section],
    visibility: &VisibilityOverrides,
    order: &OrderOverrides,
) -> Vec<ProjectedSection> {
    project(catalog, visibility, order)
        .into_iter()
        .filter(|section| section.effective_visible)
        .collect()
}
