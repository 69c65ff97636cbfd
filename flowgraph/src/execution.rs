use crate::{BlockDefinition, ConnectionDefinition};
use std::collections::{BTreeSet, HashMap, HashSet};

pub fn order_blocks_for_execution(
    blocks: &[BlockDefinition],
    connections: &[ConnectionDefinition],
) -> Vec<BlockDefinition> {
    // Deterministic topological traversal (Kahn) with the smallest ready id first.
    // Blocks left over by a cycle are appended with non-sinks first, then sinks,
    // tie-broken by block id; they read their upstream outputs from the previous tick.
    let mut sorted: Vec<&BlockDefinition> = blocks.iter().collect();
    sorted.sort_by_key(|b| b.id);

    let ids: HashSet<u64> = sorted.iter().map(|b| b.id).collect();
    let mut indegree: HashMap<u64, usize> = ids.iter().map(|id| (*id, 0)).collect();
    let mut edges: HashMap<u64, Vec<u64>> = HashMap::new();

    for conn in connections {
        if ids.contains(&conn.from_block) && ids.contains(&conn.to_block) {
            edges.entry(conn.from_block).or_default().push(conn.to_block);
            if let Some(count) = indegree.get_mut(&conn.to_block) {
                *count += 1;
            }
        }
    }

    let mut ready: BTreeSet<u64> = indegree
        .iter()
        .filter(|(_, count)| **count == 0)
        .map(|(id, _)| *id)
        .collect();

    let mut ordered_ids: Vec<u64> = Vec::new();
    while let Some(id) = ready.pop_first() {
        ordered_ids.push(id);
        if let Some(children) = edges.get(&id) {
            for child in children {
                if let Some(count) = indegree.get_mut(child) {
                    if *count > 0 {
                        *count -= 1;
                        if *count == 0 {
                            ready.insert(*child);
                        }
                    }
                }
            }
        }
    }

    let ordered_set: HashSet<u64> = ordered_ids.iter().copied().collect();
    let mut remaining: Vec<u64> = ids
        .iter()
        .filter(|id| !ordered_set.contains(id))
        .copied()
        .collect();
    remaining.sort_by(|a, b| {
        let a_sink = edges.get(a).map_or(0, |v| v.len()) == 0;
        let b_sink = edges.get(b).map_or(0, |v| v.len()) == 0;
        a_sink.cmp(&b_sink).then_with(|| a.cmp(b))
    });
    ordered_ids.extend(remaining);

    ordered_ids
        .into_iter()
        .filter_map(|id| sorted.iter().find(|b| b.id == id).map(|b| (*b).clone()))
        .collect()
}
