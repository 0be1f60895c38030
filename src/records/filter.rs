use std::collections::HashSet;

use log::{debug, info, warn};

use crate::graph::Edge;

use super::{MIN_WEIGHT, RelationRecord};

/// Drops weak, malformed and self-referential records and colors the rest.
/// Input order is preserved.
pub fn filter_records<I>(records: I) -> Vec<Edge>
where
    I: IntoIterator<Item = RelationRecord>,
{
    let mut seen = 0usize;
    let mut unknown_kinds = HashSet::new();

    let edges = records
        .into_iter()
        .filter_map(|record| {
            seen += 1;

            let Some(weight) = record.weight.filter(|weight| weight.is_finite()) else {
                debug!(
                    "dropping {} -> {}: missing or non-finite weight",
                    record.source, record.target
                );
                return None;
            };

            if weight < MIN_WEIGHT {
                debug!(
                    "dropping {} -> {}: weight {weight} below {MIN_WEIGHT}",
                    record.source, record.target
                );
                return None;
            }

            if record.source == record.target {
                debug!("dropping self-loop on {}", record.source);
                return None;
            }

            if !record.relation.is_known() && unknown_kinds.insert(record.relation.clone()) {
                warn!(
                    "relation kind {} has no palette entry; using {}",
                    record.relation,
                    record.relation.color().name()
                );
            }

            Some(Edge::new(record.source, record.target, record.relation, weight))
        })
        .collect::<Vec<_>>();

    info!("record filter kept {} of {seen} records", edges.len());
    edges
}
