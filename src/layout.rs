use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};
use log::info;
use thiserror::Error;

use crate::graph::GraphModel;
use crate::util::stable_pair;

/// Half-width of the coordinate space the renderer shows.
pub const LAYOUT_BOUND: f32 = 1.5;

const MIN_DISTANCE: f32 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutConfig {
    pub seed: u64,
    pub iterations: usize,
    /// Largest absolute coordinate after rescaling.
    pub scale: f32,
    /// Mean per-node movement below which iteration stops early.
    pub threshold: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            iterations: 50,
            scale: 1.0,
            threshold: 1e-4,
        }
    }
}

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("edge {from} -> {to} has non-finite weight {weight}")]
    NonFiniteWeight { from: String, to: String, weight: f64 },

    #[error("layout produced a non-finite position for node {node}")]
    NonFinitePosition { node: String },
}

/// Fruchterman-Reingold spring layout. Returns one position per node, indexed
/// like [`GraphModel::nodes`].
///
/// Nodes are processed in id order and start from a point hashed from the
/// seed and their id, so the result does not depend on the order in which
/// nodes or edges were inserted.
pub fn spring_layout(graph: &GraphModel, config: &LayoutConfig) -> Result<Vec<Vec2>, LayoutError> {
    if let Some(edge) = graph.edges().iter().find(|edge| !edge.weight.is_finite()) {
        return Err(LayoutError::NonFiniteWeight {
            from: edge.source.clone(),
            to: edge.target.clone(),
            weight: edge.weight,
        });
    }

    let nodes = graph.nodes();
    let n = nodes.len();
    if n == 0 {
        return Ok(Vec::new());
    }
    if n == 1 {
        return Ok(vec![Vec2::ZERO]);
    }

    let mut order = (0..n).collect::<Vec<_>>();
    order.sort_by(|a, b| nodes[*a].id.cmp(&nodes[*b].id));
    let mut slot_of = vec![0usize; n];
    for (slot, &index) in order.iter().enumerate() {
        slot_of[index] = slot;
    }

    // Spring strengths are relative to the heaviest edge so huge finite
    // weights cannot overflow f32.
    let heaviest = graph
        .edges()
        .iter()
        .map(|edge| edge.weight.abs())
        .fold(0.0_f64, f64::max);
    let mut springs = graph
        .edges()
        .iter()
        .filter_map(|edge| {
            let from = slot_of[graph.node_index(&edge.source)?];
            let to = slot_of[graph.node_index(&edge.target)?];
            let strength = if heaviest > 0.0 {
                (edge.weight / heaviest) as f32
            } else {
                0.0
            };
            (from != to).then(|| (from.min(to), from.max(to), strength))
        })
        .collect::<Vec<_>>();
    springs.sort_by(|a, b| {
        a.0.cmp(&b.0)
            .then(a.1.cmp(&b.1))
            .then(a.2.total_cmp(&b.2))
    });

    let mut positions = order
        .iter()
        .map(|&index| {
            let (x, y) = stable_pair(config.seed, &nodes[index].id);
            vec2(x, y)
        })
        .collect::<Vec<_>>();

    let k = (1.0 / n as f32).sqrt();
    let mut temperature = extent(&positions).max(MIN_DISTANCE) * 0.1;
    let cooling = temperature / (config.iterations as f32 + 1.0);
    let mut iterations_run = 0usize;

    for _ in 0..config.iterations {
        iterations_run += 1;
        let mut disp = vec![Vec2::ZERO; n];

        for i in 0..n {
            for j in (i + 1)..n {
                let (direction, distance) = separation(positions[i], positions[j], i, j);
                let force = (k * k) / distance;
                disp[i] += direction * force;
                disp[j] -= direction * force;
            }
        }

        for &(from, to, weight) in &springs {
            let (direction, distance) = separation(positions[from], positions[to], from, to);
            let force = weight * distance * distance / k;
            disp[from] -= direction * force;
            disp[to] += direction * force;
        }

        let mut moved = 0.0_f32;
        for (position, d) in positions.iter_mut().zip(&disp) {
            let length = d.length();
            if length > 0.0 {
                let step = *d / length * length.min(temperature);
                *position += step;
                moved += step.length();
            }
        }

        temperature -= cooling;
        if moved / (n as f32) < config.threshold {
            break;
        }
    }

    rescale(&mut positions, config.scale.min(LAYOUT_BOUND));

    let result = unslot(graph, &order, positions)?;
    info!("spring layout placed {n} nodes in {iterations_run} iterations");
    Ok(result)
}

/// Maps slot-ordered positions back to node order, rejecting any that are
/// not finite.
fn unslot(
    graph: &GraphModel,
    order: &[usize],
    positions: Vec<Vec2>,
) -> Result<Vec<Vec2>, LayoutError> {
    let mut result = vec![Vec2::ZERO; positions.len()];
    for (slot, position) in positions.into_iter().enumerate() {
        let index = order[slot];
        if !position.x.is_finite() || !position.y.is_finite() {
            return Err(LayoutError::NonFinitePosition {
                node: graph.nodes()[index].id.clone(),
            });
        }
        result[index] = position;
    }
    Ok(result)
}

/// Unit vector from `b` to `a` and their (floored) distance. Coincident
/// points get a fixed direction derived from their slots.
fn separation(a: Vec2, b: Vec2, slot_a: usize, slot_b: usize) -> (Vec2, f32) {
    let delta = a - b;
    let length = delta.length();
    let direction = if length > 1e-6 {
        delta / length
    } else {
        let angle = ((slot_a as f32) * 0.618_034 + (slot_b as f32) * 0.414_214) * TAU;
        vec2(angle.cos(), angle.sin())
    };
    (direction, length.max(MIN_DISTANCE))
}

fn extent(positions: &[Vec2]) -> f32 {
    let mut min = vec2(f32::INFINITY, f32::INFINITY);
    let mut max = vec2(f32::NEG_INFINITY, f32::NEG_INFINITY);
    for point in positions {
        min = min.min(*point);
        max = max.max(*point);
    }
    (max.x - min.x).max(max.y - min.y)
}

/// Centers on the mean and scales so the largest coordinate is `scale`.
fn rescale(positions: &mut [Vec2], scale: f32) {
    let mut center = Vec2::ZERO;
    for position in positions.iter() {
        center += *position;
    }
    center /= positions.len() as f32;

    let mut limit = 0.0_f32;
    for position in positions.iter_mut() {
        *position -= center;
        limit = limit.max(position.x.abs()).max(position.y.abs());
    }

    if limit > 0.0 {
        for position in positions.iter_mut() {
            *position *= scale / limit;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::graph::Edge;
    use crate::records::{RelationKind, RelationRecord, filter_records};

    fn chain() -> Vec<RelationRecord> {
        vec![
            RelationRecord::new("Anna", "Boris", "INTERACTS1", 5.0),
            RelationRecord::new("Boris", "Clara", "INTERACTS2", 3.0),
            RelationRecord::new("Clara", "Dmitri", "INTERACTS3", 2.0),
            RelationRecord::new("Dmitri", "Anna", "INTERACTS45", 4.0),
            RelationRecord::new("Elena", "Fyodor", "INTERACTS1", 6.0),
        ]
    }

    fn by_id(graph: &GraphModel, positions: &[Vec2]) -> HashMap<String, Vec2> {
        graph
            .nodes()
            .iter()
            .zip(positions)
            .map(|(node, position)| (node.id.clone(), *position))
            .collect()
    }

    #[test]
    fn same_seed_same_positions() {
        let graph = GraphModel::build(filter_records(chain()));
        let config = LayoutConfig::default();

        let first = spring_layout(&graph, &config).unwrap();
        let second = spring_layout(&graph, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn insertion_order_does_not_leak_into_positions() {
        let forward = GraphModel::build(filter_records(chain()));
        let mut reversed_records = chain();
        reversed_records.reverse();
        let reversed = GraphModel::build(filter_records(reversed_records));
        let config = LayoutConfig::default();

        let forward_positions = spring_layout(&forward, &config).unwrap();
        let reversed_positions = spring_layout(&reversed, &config).unwrap();
        assert_eq!(
            by_id(&forward, &forward_positions),
            by_id(&reversed, &reversed_positions)
        );
    }

    #[test]
    fn different_seed_moves_nodes() {
        let graph = GraphModel::build(filter_records(chain()));
        let first = spring_layout(&graph, &LayoutConfig::default()).unwrap();
        let second = spring_layout(
            &graph,
            &LayoutConfig {
                seed: 7,
                ..LayoutConfig::default()
            },
        )
        .unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn positions_stay_inside_the_bound() {
        let graph = GraphModel::build(filter_records(chain()));
        let positions = spring_layout(&graph, &LayoutConfig::default()).unwrap();

        assert_eq!(positions.len(), graph.node_count());
        for position in positions {
            assert!(position.x.is_finite() && position.y.is_finite());
            assert!(position.x.abs() <= 1.0 + 1e-4, "{position:?}");
            assert!(position.y.abs() <= 1.0 + 1e-4, "{position:?}");
        }
    }

    #[test]
    fn empty_and_single_node_graphs_are_fine() {
        let config = LayoutConfig::default();
        assert!(
            spring_layout(&GraphModel::build(Vec::new()), &config)
                .unwrap()
                .is_empty()
        );

        let lonely = GraphModel::build(vec![Edge::new(
            "A".into(),
            "A".into(),
            RelationKind::Interacts1,
            2.0,
        )]);
        assert_eq!(spring_layout(&lonely, &config).unwrap(), vec![Vec2::ZERO]);

        let pair = GraphModel::build(vec![Edge::new(
            "A".into(),
            "B".into(),
            RelationKind::Interacts1,
            2.0,
        )]);
        let positions = spring_layout(&pair, &config).unwrap();
        assert_eq!(positions.len(), 2);
        assert_ne!(positions[0], positions[1]);
    }

    #[test]
    fn connected_nodes_end_up_closer_than_strangers() {
        let graph = GraphModel::build(filter_records(vec![
            RelationRecord::new("A", "B", "INTERACTS1", 10.0),
            RelationRecord::new("C", "D", "INTERACTS1", 10.0),
        ]));
        let positions = by_id(
            &graph,
            &spring_layout(&graph, &LayoutConfig::default()).unwrap(),
        );
        let distance = |a: &str, b: &str| (positions[a] - positions[b]).length();

        let strangers = [("A", "C"), ("A", "D"), ("B", "C"), ("B", "D")]
            .iter()
            .map(|(a, b)| distance(a, b))
            .sum::<f32>()
            / 4.0;
        assert!(distance("A", "B") < strangers);
        assert!(distance("C", "D") < strangers);
    }

    #[test]
    fn non_finite_weight_is_rejected() {
        let graph = GraphModel::build(vec![Edge::new(
            "A".into(),
            "B".into(),
            RelationKind::Interacts1,
            f64::INFINITY,
        )]);

        let error = spring_layout(&graph, &LayoutConfig::default()).unwrap_err();
        assert!(matches!(error, LayoutError::NonFiniteWeight { .. }));
    }

    #[test]
    fn huge_finite_weights_still_lay_out() {
        let graph = GraphModel::build(filter_records(vec![
            RelationRecord::new("A", "B", "INTERACTS1", 1e39),
            RelationRecord::new("B", "C", "INTERACTS1", 3.0),
        ]));
        assert_eq!(graph.edge_count(), 2);

        let positions = spring_layout(&graph, &LayoutConfig::default()).unwrap();
        assert_eq!(positions.len(), 3);
        for position in positions {
            assert!(position.x.is_finite() && position.y.is_finite(), "{position:?}");
        }
    }

    #[test]
    fn non_finite_position_names_the_node() {
        let graph = GraphModel::build(filter_records(vec![RelationRecord::new(
            "A",
            "B",
            "INTERACTS1",
            3.0,
        )]));
        // Slot 0 is "A" (node 0), slot 1 is "B" (node 1).
        let error = unslot(&graph, &[0, 1], vec![Vec2::ZERO, vec2(f32::NAN, 0.0)]).unwrap_err();
        assert!(matches!(
            error,
            LayoutError::NonFinitePosition { ref node } if node == "B"
        ));

        let placed = unslot(&graph, &[1, 0], vec![vec2(1.0, 0.0), vec2(-1.0, 0.0)]).unwrap();
        assert_eq!(placed, vec![vec2(-1.0, 0.0), vec2(1.0, 0.0)]);
    }
}
