//! Section manager: optimistic local state over the config store
//!
//! Holds the last confirmed override documents plus the projection derived
//! from them. Operator actions apply to the local projection first, then the
//! replacement document is written wholesale; on failure the local state
//! rolls back to the last confirmed documents and the error is surfaced to
//! the caller. No queueing or mutual exclusion is applied between writes:
//! the last write to reach the store wins on the whole document.

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::catalog::{self, SECTIONS};
use crate::constants::documents;
use crate::overrides::{OrderOverrides, VisibilityOverrides};
use crate::projection::{self, ProjectedSection};
use crate::reorder;
use crate::store::ConfigStore;

pub struct SectionManager {
    store: Box<dyn ConfigStore>,

    // Last confirmed documents; rollback target after a failed write
    visibility: VisibilityOverrides,
    order: OrderOverrides,

    // Local projection, kept ahead of confirmed writes during an operation
    sections: Vec<ProjectedSection>,
}

impl SectionManager {
    /// Create a manager showing catalog defaults until the first refresh
    pub fn new(store: Box<dyn ConfigStore>) -> Self {
        let visibility = VisibilityOverrides::default();
        let order = OrderOverrides::default();
        let sections = projection::project(SECTIONS, &visibility, &order);
        Self {
            store,
            visibility,
            order,
            sections,
        }
    }

    /// The current ordered, visibility-annotated section list
    pub fn sections(&self) -> &[ProjectedSection] {
        &self.sections
    }

    /// The list the public renderer would mount (visible entries only)
    pub fn visible_sections(&self) -> Vec<ProjectedSection> {
        projection::visible_sections(SECTIONS, &self.visibility, &self.order)
    }

    /// Re-fetch the override documents and rebuild the projection.
    /// On read failure the projection falls back to catalog defaults only;
    /// the error is returned for the caller to surface.
    pub fn refresh(&mut self) -> Result<()> {
        match self.store.fetch_all() {
            Ok(documents) => {
                self.visibility = documents
                    .get(documents::SECTIONS_VISIBILITY)
                    .map(VisibilityOverrides::from_value)
                    .unwrap_or_default();
                self.order = documents
                    .get(documents::SECTIONS_ORDER)
                    .map(OrderOverrides::from_value)
                    .unwrap_or_default();
                self.reproject();
                debug!(sections = self.sections.len(), "Refreshed section projection");
                Ok(())
            }
            Err(err) => {
                warn!(error = ?err, "Config fetch failed, falling back to catalog defaults");
                self.visibility = VisibilityOverrides::default();
                self.order = OrderOverrides::default();
                self.reproject();
                Err(err).context("Failed to fetch configuration documents")
            }
        }
    }

    /// Toggle one section's visibility and persist the merged document.
    /// Returns `Ok(false)` for keys outside the catalog (no-op).
    pub fn set_visibility(&mut self, key: &str, visible: bool) -> Result<bool> {
        if !catalog::contains(key) {
            debug!(key = %key, "Ignoring visibility toggle for unknown section");
            return Ok(false);
        }

        let candidate = self.visibility.with(key, visible);

        // Optimistic: show the new value before the write confirms
        self.sections = projection::project(SECTIONS, &candidate, &self.order);

        match self
            .store
            .upsert(documents::SECTIONS_VISIBILITY, candidate.to_value())
        {
            Ok(()) => {
                self.visibility = candidate;
                info!(key = %key, visible = visible, "Section visibility updated");
                Ok(true)
            }
            Err(err) => {
                self.reproject(); // roll back to the last confirmed documents
                Err(err).with_context(|| format!("Failed to save visibility for '{key}'"))
            }
        }
    }

    /// Apply a drag of `moved_key` onto `target_key` and persist the
    /// renumbered order document. Returns `Ok(false)` when the drag is a
    /// no-op (same key, or either key unknown).
    pub fn reorder(&mut self, moved_key: &str, target_key: &str) -> Result<bool> {
        let Some(new_order) = reorder::reorder(&self.sections, moved_key, target_key) else {
            return Ok(false);
        };
        self.commit_order(new_order)
    }

    /// Index-based variant for the drag-and-drop UI
    pub fn reorder_by_index(&mut self, from: usize, to: usize) -> Result<bool> {
        let Some(new_order) = reorder::reorder_by_index(&self.sections, from, to) else {
            return Ok(false);
        };
        self.commit_order(new_order)
    }

    fn commit_order(&mut self, new_order: OrderOverrides) -> Result<bool> {
        // Optimistic: show the new arrangement before the write confirms
        self.sections = projection::project(SECTIONS, &self.visibility, &new_order);

        match self
            .store
            .upsert(documents::SECTIONS_ORDER, new_order.to_value())
        {
            Ok(()) => {
                self.order = new_order;
                info!("Section order updated");
                Ok(true)
            }
            Err(err) => {
                self.reproject(); // roll back to the pre-drag arrangement
                Err(err).context("Failed to save section order")
            }
        }
    }

    fn reproject(&mut self) {
        self.sections = projection::project(SECTIONS, &self.visibility, &self.order);
    }
}
