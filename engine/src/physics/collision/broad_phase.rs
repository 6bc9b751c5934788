//! Broad phase collision detection using sweep and prune

use super::Bounds;
use glam::Vec2;
use hecs::Entity;
use std::cmp::Ordering;

/// Entry for broad phase collision detection
#[derive(Debug, Clone, Copy)]
pub struct BroadPhaseEntry {
    pub entity: Entity,
    pub bounds: Bounds,
}

/// Axis for sweep and prune
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

/// Endpoint for sweep and prune
struct Endpoint {
    value: f32,
    index: usize,
    is_min: bool,
}

/// Perform broad phase collision detection using sweep and prune
///
/// Returns index pairs `(i, j)` with `i < j` whose bounds collide, sorted.
pub fn sweep_and_prune(entries: &[BroadPhaseEntry]) -> Vec<(usize, usize)> {
    if entries.len() < 2 {
        return Vec::new();
    }

    let axis = determine_best_axis(entries);

    let mut endpoints = create_endpoints(entries, axis);
    // Openings sort before closings at the same value so shared edges pair up
    endpoints.sort_by(|a, b| {
        a.value
            .partial_cmp(&b.value)
            .unwrap_or(Ordering::Equal)
            .then(b.is_min.cmp(&a.is_min))
    });

    let mut pairs = Vec::new();
    let mut active: Vec<usize> = Vec::new();

    for endpoint in endpoints {
        if endpoint.is_min {
            for &active_index in &active {
                let entry_a = &entries[active_index];
                let entry_b = &entries[endpoint.index];
                if Bounds::collides(&entry_a.bounds, &entry_b.bounds) {
                    pairs.push((
                        active_index.min(endpoint.index),
                        active_index.max(endpoint.index),
                    ));
                }
            }
            active.push(endpoint.index);
        } else {
            active.retain(|&idx| idx != endpoint.index);
        }
    }

    pairs.sort_unstable();
    pairs.dedup();
    pairs
}

/// Pick the axis along which the bounds centers spread the most
fn determine_best_axis(entries: &[BroadPhaseEntry]) -> Axis {
    let count = entries.len() as f32;
    let mean = entries
        .iter()
        .fold(Vec2::ZERO, |sum, entry| sum + entry.bounds.center)
        / count;
    let variance = entries.iter().fold(Vec2::ZERO, |sum, entry| {
        let diff = entry.bounds.center - mean;
        sum + diff * diff
    }) / count;

    if variance.x >= variance.y {
        Axis::X
    } else {
        Axis::Y
    }
}

fn create_endpoints(entries: &[BroadPhaseEntry], axis: Axis) -> Vec<Endpoint> {
    let mut endpoints = Vec::with_capacity(entries.len() * 2);

    for (index, entry) in entries.iter().enumerate() {
        let (min, max) = match axis {
            Axis::X => (entry.bounds.left(), entry.bounds.right()),
            Axis::Y => (entry.bounds.bottom(), entry.bounds.top()),
        };
        endpoints.push(Endpoint {
            value: min,
            index,
            is_min: true,
        });
        endpoints.push(Endpoint {
            value: max,
            index,
            is_min: false,
        });
    }

    endpoints
}

/// Simple O(n²) broad phase for small numbers of objects
pub fn brute_force_pairs(entries: &[BroadPhaseEntry]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();

    for i in 0..entries.len() {
        for j in (i + 1)..entries.len() {
            if Bounds::collides(&entries[i].bounds, &entries[j].bounds) {
                pairs.push((i, j));
            }
        }
    }

    pairs
}
