//! Consistency passes over an assembled OTM document.
//!
//! Run in this order by [`ConsistencyPasses::run`]:
//!
//! 1. [`prune_orphan_dataflows`]: dataflows must join two components
//! 2. [`unify_trust_zones`]: a zone's type becomes its id; duplicates merge
//! 3. [`prune_incomplete_representations`]: representations are all or nothing

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use log::{debug, info};

use tzmap_core::otm::{Otm, Parent, ParentKind, TrustZone};

/// Drops dataflows whose source or destination is not a component.
pub fn prune_orphan_dataflows(otm: &mut Otm) {
    let component_ids: HashSet<&str> = otm.components.iter().map(|c| c.id.as_str()).collect();
    let before = otm.dataflows.len();
    otm.dataflows.retain(|dataflow| {
        component_ids.contains(dataflow.source_id.as_str())
            && component_ids.contains(dataflow.destination_id.as_str())
    });
    debug!(removed_count = before - otm.dataflows.len(); "Orphan dataflows pruned");
}

/// Replaces every trust zone's id with its type and merges zones that end
/// up sharing an id, keeping the first.
///
/// Parent references to a zone are rewritten to the new id; a zone that
/// would become its own parent loses its parent instead.
pub fn unify_trust_zones(otm: &mut Otm) {
    let renamed: HashMap<String, String> = otm
        .trust_zones
        .iter()
        .map(|zone| (zone.id.clone(), zone.zone_type.clone()))
        .collect();

    let rewrite = |parent: &mut Parent| {
        if parent.kind() != ParentKind::TrustZone {
            return;
        }
        if let Some(new_id) = renamed.get(parent.id()) {
            parent.set_id(new_id.clone());
        }
    };

    for component in &mut otm.components {
        rewrite(&mut component.parent);
    }

    let before = otm.trust_zones.len();
    let mut unified: IndexMap<String, TrustZone> = IndexMap::new();
    for mut zone in std::mem::take(&mut otm.trust_zones) {
        zone.id = zone.zone_type.clone();
        if let Some(parent) = zone.parent.as_mut() {
            rewrite(parent);
        }
        if zone.parent.as_ref().is_some_and(|p| p.id() == zone.id) {
            zone.parent = None;
        }
        unified.entry(zone.id.clone()).or_insert(zone);
    }
    otm.trust_zones = unified.into_values().collect();

    debug!(
        trust_zones_count = otm.trust_zones.len(),
        merged_count = before - otm.trust_zones.len();
        "Trust zones unified"
    );
}

fn has_missing_representations(otm: &Otm) -> bool {
    otm.representations.is_empty()
        || otm.trust_zones.iter().any(|z| z.representations.is_empty())
        || otm.components.iter().any(|c| c.representations.is_empty())
}

/// Strips every trust zone and component representation if the document
/// has no top-level representation or any zone or component lacks one.
pub fn prune_incomplete_representations(otm: &mut Otm) {
    if !has_missing_representations(otm) {
        return;
    }
    for zone in &mut otm.trust_zones {
        zone.representations.clear();
    }
    for component in &mut otm.components {
        component.representations.clear();
    }
    debug!("Incomplete representations removed");
}

/// The consistency passes, configured once per run.
#[derive(Debug, Clone, Copy)]
pub struct ConsistencyPasses {
    prune_representations: bool,
}

impl ConsistencyPasses {
    /// `prune_representations` enables the all-or-nothing representation pass.
    pub fn new(prune_representations: bool) -> Self {
        Self {
            prune_representations,
        }
    }

    pub fn run(&self, otm: &mut Otm) {
        info!("Running consistency passes");
        prune_orphan_dataflows(otm);
        unify_trust_zones(otm);
        if self.prune_representations {
            prune_incomplete_representations(otm);
        }
    }
}
