//! Diagram pruning against the configured labels.
//!
//! Pruning runs in three fixed phases:
//!
//! 1. shapes whose name, type label and unique id are all unknown to the
//!    mappings are marked removed
//! 2. edges touching a removed shape are dropped
//! 3. surviving shapes whose parent was removed are re-attached to their
//!    nearest surviving ancestor
//!
//! The arena is compacted last, so phase 3 can still walk the original
//! parent chains through removed shapes.

use std::collections::HashSet;

use log::{debug, trace};

use tzmap_source::shape::normalize_label;

use crate::diagram::{Diagram, DiagramShape, ShapeIndex};

/// Removes diagram shapes that no mapping refers to.
#[derive(Debug, Clone)]
pub struct DiagramPruner {
    labels: HashSet<String>,
}

impl DiagramPruner {
    /// Creates a pruner for the given configured labels.
    ///
    /// Labels are whitespace-normalized; empty labels are ignored.
    pub fn new<I, L>(labels: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: AsRef<str>,
    {
        let labels = labels
            .into_iter()
            .map(|label| normalize_label(label.as_ref()))
            .filter(|label| !label.is_empty())
            .collect();
        Self { labels }
    }

    fn is_mapped(&self, shape: &DiagramShape) -> bool {
        self.labels.contains(shape.name())
            || self.labels.contains(shape.type_label())
            || (!shape.unique_id().is_empty() && self.labels.contains(shape.unique_id()))
    }

    /// Runs all three phases and returns the compacted diagram.
    pub fn prune(&self, mut diagram: Diagram) -> Diagram {
        let keep: Vec<bool> = diagram
            .shapes
            .iter()
            .map(|shape| {
                let mapped = self.is_mapped(shape);
                if !mapped {
                    trace!(shape_id = shape.id(), name = shape.name(); "Shape unmapped");
                }
                mapped
            })
            .collect();

        let removed_ids: HashSet<String> = diagram
            .shapes
            .iter()
            .zip(&keep)
            .filter(|(_, kept)| !**kept)
            .map(|(shape, _)| shape.id.clone())
            .collect();

        let edges_before = diagram.edges.len();
        diagram
            .edges
            .retain(|edge| !removed_ids.contains(edge.from_id()) && !removed_ids.contains(edge.to_id()));

        let surviving_parents: Vec<Option<ShapeIndex>> = diagram
            .indexed_shapes()
            .map(|(index, _)| {
                diagram
                    .ancestors(index)
                    .find(|ancestor| keep[ancestor.get()])
            })
            .collect();

        let mut remap = vec![None; keep.len()];
        let mut next = 0;
        for (old, kept) in keep.iter().enumerate() {
            if *kept {
                remap[old] = Some(ShapeIndex::new(next));
                next += 1;
            }
        }

        let shapes = std::mem::take(&mut diagram.shapes);
        diagram.shapes = shapes
            .into_iter()
            .zip(surviving_parents)
            .zip(&keep)
            .filter(|(_, kept)| **kept)
            .map(|((mut shape, parent), _)| {
                shape.parent = parent.and_then(|p| remap[p.get()]);
                shape
            })
            .collect();

        debug!(
            removed_shapes_count = removed_ids.len(),
            removed_edges_count = edges_before - diagram.edges.len(),
            shapes_count = diagram.shapes.len();
            "Diagram pruned"
        );

        diagram
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;
    use tzmap_core::geometry::{Bounds, Point, Size};

    use super::*;
    use crate::diagram::{DiagramBounds, ShapeOrigin};

    /// Random forest: every shape's parent, if any, comes earlier in the arena
    fn forest() -> impl Strategy<Value = (Vec<Option<usize>>, Vec<bool>)> {
        (1usize..24).prop_flat_map(|n| {
            let parents = (0..n)
                .map(|i| {
                    if i == 0 {
                        Just(None::<usize>).boxed()
                    } else {
                        proptest::option::of(0..i).boxed()
                    }
                })
                .collect::<Vec<_>>();
            (parents, proptest::collection::vec(any::<bool>(), n))
        })
    }

    proptest! {
        #[test]
        fn no_dangling_parents_after_pruning((parents, mapped) in forest()) {
            let footprint = Bounds::new_from_center(Point::new(0.0, 0.0), Size::new(1.0, 1.0));
            let mut shapes: Vec<DiagramShape> = (0..parents.len())
                .map(|i| {
                    let name = if mapped[i] { format!("keep-{i}") } else { format!("drop-{i}") };
                    DiagramShape::new(i.to_string(), name, "", ShapeOrigin::Simple, footprint, None)
                })
                .collect();
            for (shape, parent) in shapes.iter_mut().zip(&parents) {
                shape.parent = parent.map(ShapeIndex::new);
            }
            let original = Diagram::new(
                shapes,
                Vec::new(),
                DiagramBounds::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0)),
            );

            let labels: Vec<String> = (0..parents.len())
                .filter(|i| mapped[*i])
                .map(|i| format!("keep-{i}"))
                .collect();
            let pruned = DiagramPruner::new(&labels).prune(original.clone());

            prop_assert_eq!(pruned.shapes().len(), labels.len());
            for (index, shape) in pruned.indexed_shapes() {
                let Some(parent) = shape.parent() else { continue };
                prop_assert!(parent.get() < pruned.shapes().len());
                prop_assert!(pruned.shape(parent).name().starts_with("keep-"));

                // The new parent is the nearest mapped ancestor in the original chain
                let old = original.find(shape.id()).unwrap();
                let expected = original
                    .ancestors(old)
                    .find(|a| mapped[a.get()])
                    .map(|a| original.shape(a).id().to_string());
                prop_assert_eq!(Some(pruned.shape(parent).id().to_string()), expected);
                prop_assert_ne!(parent, index);
            }
        }
    }
}
