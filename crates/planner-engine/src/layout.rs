//! Assign side-by-side lanes to overlapping events of a day.
//!
//! Events are sorted by `(start, end, id)` and cut into clusters: maximal runs
//! whose intervals form a connected overlap chain. Within a cluster each event
//! takes the first lane that is free at its start (interval-graph colouring),
//! which opens as many lanes as the cluster's peak concurrency. Every member of
//! the cluster then shares that lane count, so a renderer can give each one
//! `1 / lane_count` of the track width.
//!
//! A zero-length event inside a running cluster counts as occupying its start
//! instant: it cannot share a lane with an event that is still running then,
//! so it may open a lane beyond the peak of positive-length events.

use serde::{Deserialize, Serialize};

use crate::event::Event;
use crate::time::ClockTime;

/// An event annotated with its lane inside its overlap cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaidOutEvent {
    pub event: Event,
    /// Zero-based column within the cluster.
    pub lane: usize,
    /// Number of lanes the cluster needs.
    pub lane_count: usize,
}

impl LaidOutEvent {
    /// Horizontal placement `(left, width)` inside a track of `track_width`,
    /// with `gutter` between adjacent lanes.
    pub fn column(&self, track_width: f64, gutter: f64) -> (f64, f64) {
        let lanes = self.lane_count.max(1) as f64;
        let width = ((track_width - gutter * (lanes - 1.0)) / lanes).max(0.0);
        let left = self.lane as f64 * (width + gutter);
        (left, width)
    }
}

/// Lay out one day's normalized events. The result is in sorted order.
pub fn layout_lanes(day_events: &[Event]) -> Vec<LaidOutEvent> {
    let mut sorted: Vec<&Event> = day_events.iter().collect();
    sorted.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then(a.end.cmp(&b.end))
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut result = Vec::with_capacity(sorted.len());
    let mut cluster: Vec<&Event> = Vec::new();
    let mut cluster_end = ClockTime::MIDNIGHT;

    for event in sorted {
        if !cluster.is_empty() && event.start >= cluster_end {
            flush_cluster(&cluster, &mut result);
            cluster.clear();
        }
        if cluster.is_empty() {
            cluster_end = event.end;
        } else {
            cluster_end = cluster_end.max(event.end);
        }
        cluster.push(event);
    }
    flush_cluster(&cluster, &mut result);

    result
}

/// Greedy first-free-lane assignment for one cluster.
fn flush_cluster(cluster: &[&Event], out: &mut Vec<LaidOutEvent>) {
    if cluster.is_empty() {
        return;
    }

    // End time of the last event placed in each lane.
    let mut lane_ends: Vec<ClockTime> = Vec::new();
    let first = out.len();

    for event in cluster {
        let lane = match lane_ends.iter().position(|&end| end <= event.start) {
            Some(free) => {
                lane_ends[free] = event.end;
                free
            }
            None => {
                lane_ends.push(event.end);
                lane_ends.len() - 1
            }
        };
        out.push(LaidOutEvent {
            event: (*event).clone(),
            lane,
            lane_count: 0,
        });
    }

    let lane_count = lane_ends.len();
    for placed in &mut out[first..] {
        placed.lane_count = lane_count;
    }
    log::trace!(
        "flushed cluster of {} events into {} lanes",
        cluster.len(),
        lane_count
    );
}
