use lsrpc_types::{PathError, PathHop, ServiceNode};
use rand_core::CryptoRngCore;
use tracing::debug;

/// Uniform index in `0..bound` by rejection sampling, so no modulo bias
/// creeps into hop selection.
fn uniform_index<R: CryptoRngCore + ?Sized>(rng: &mut R, bound: usize) -> usize {
    let bound = bound as u64;
    let zone = (u64::MAX / bound) * bound;
    loop {
        let v = rng.next_u64();
        if v < zone {
            return (v % bound) as usize;
        }
    }
}

/// Picks `length` distinct hops uniformly at random from the valid subset of
/// `candidates`. The first element is the entry hop, the last the terminal
/// hop. Duplicate entries in the candidate list are each independently
/// eligible; the list is used as provided.
pub fn select_path<R: CryptoRngCore + ?Sized>(
    candidates: &[ServiceNode],
    length: usize,
    rng: &mut R,
) -> Result<Vec<PathHop>, PathError> {
    if length == 0 {
        return Err(PathError::ZeroLength);
    }

    let eligible: Vec<PathHop> = candidates
        .iter()
        .filter(|node| node.is_valid())
        .filter_map(|node| PathHop::try_from(node).ok())
        .collect();

    if eligible.len() < length {
        return Err(PathError::Insufficient {
            need: length,
            got: eligible.len(),
        });
    }

    let mut chosen: Vec<usize> = Vec::with_capacity(length);
    while chosen.len() < length {
        let idx = uniform_index(rng, eligible.len());
        if !chosen.contains(&idx) {
            chosen.push(idx);
        }
    }

    let path: Vec<PathHop> = chosen.into_iter().map(|i| eligible[i].clone()).collect();
    if let (Some(entry), Some(terminal)) = (path.first(), path.last()) {
        debug!(
            entry = %entry.ip,
            terminal = %terminal.ip,
            hops = length,
            "selected onion path"
        );
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;
    use std::collections::HashMap;

    fn node(i: u8) -> ServiceNode {
        ServiceNode {
            pubkey_ed25519: hex::encode([i; 32]),
            pubkey_x25519: hex::encode([i.wrapping_add(100); 32]),
            public_ip: format!("10.0.0.{i}"),
            storage_port: 22020 + i as u16,
            storage_lmq_port: 20200,
            swarm_id: i as u64,
        }
    }

    fn invalid_node() -> ServiceNode {
        ServiceNode {
            public_ip: "0.0.0.0".into(),
            ..node(99)
        }
    }

    #[test]
    fn test_zero_length_rejected() {
        let candidates = vec![node(1), node(2)];
        assert_eq!(
            select_path(&candidates, 0, &mut OsRng).unwrap_err(),
            PathError::ZeroLength
        );
    }

    #[test]
    fn test_insufficient_candidates() {
        // Two valid candidates plus one invalid; asking for three fails.
        let candidates = vec![node(1), node(2), invalid_node()];
        assert_eq!(
            select_path(&candidates, 3, &mut OsRng).unwrap_err(),
            PathError::Insufficient { need: 3, got: 2 }
        );
    }

    #[test]
    fn test_no_duplicates_within_path() {
        let candidates: Vec<_> = (1..=5).map(node).collect();

        for _ in 0..200 {
            let path = select_path(&candidates, 3, &mut OsRng).unwrap();
            assert_eq!(path.len(), 3);
            for i in 0..path.len() {
                for j in i + 1..path.len() {
                    assert_ne!(path[i], path[j]);
                }
            }
        }
    }

    #[test]
    fn test_invalid_candidates_filtered() {
        let candidates = vec![node(1), invalid_node(), node(2), node(3)];
        let path = select_path(&candidates, 3, &mut OsRng).unwrap();
        assert!(path.iter().all(|h| h.ip != "0.0.0.0"));
    }

    #[test]
    fn test_selection_roughly_uniform() {
        let candidates: Vec<_> = (1..=5).map(node).collect();
        let mut counts: HashMap<String, usize> = HashMap::new();

        let runs = 1000;
        for _ in 0..runs {
            let path = select_path(&candidates, 3, &mut OsRng).unwrap();
            for hop in path {
                *counts.entry(hop.ip).or_default() += 1;
            }
        }

        // Each of 5 nodes should land in ~3/5 of the paths.
        let expected = runs * 3 / 5;
        let tolerance = expected * 15 / 100;
        for (ip, count) in counts {
            assert!(
                count.abs_diff(expected) <= tolerance,
                "node {ip} selected {count} times, expected {expected} +/- {tolerance}"
            );
        }
    }

    #[test]
    fn test_entry_and_terminal_ordering() {
        let candidates = vec![node(1)];
        let path = select_path(&candidates, 1, &mut OsRng).unwrap();
        assert_eq!(path.len(), 1);
        assert_eq!(path[0].ip, "10.0.0.1");
    }
}
