//! Segment list transformations.
//!
//! Every function here takes the current list by reference (or by value for
//! [`consolidate`]) and returns a new list, so a drag can recompute its preview
//! from the same pre-gesture baseline on every pointer move.
//!
//! # Canonical form
//!
//! After [`consolidate`] a list produced from paint/clear calls is:
//! - sorted ascending by start
//! - pairwise disjoint (half-open `[start, end)`)
//! - free of touching neighbours that share a label
//!
//! Paint and clear may leave the list unsorted; consolidation restores order.

use chrono::{DateTime, Utc};

use crate::stage::StageLabel;
use crate::types::Segment;

/// A normalized `[start, end)` range. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeRange {
    /// Range between two instants in either order.
    pub fn between(a: DateTime<Utc>, b: DateTime<Utc>) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Overwrites `range` with a new `label` segment.
///
/// Anything beneath the range is clipped away first, so the newest paint
/// always wins. Segments that straddle the range are split around it. The new
/// segment is appended at the end with a provisional id. An empty range leaves
/// the list unchanged.
pub fn paint(segments: &[Segment], range: TimeRange, label: StageLabel) -> Vec<Segment> {
    match Segment::provisional(label, range.start, range.end) {
        Ok(segment) => overwrite(segments, segment),
        Err(_) => segments.to_vec(),
    }
}

/// Removes all coverage inside `range` without inserting anything.
///
/// Segments partially inside are truncated, segments fully inside are dropped
/// and a segment containing the range strictly inside is split in two. The
/// part after the hole gets a fresh id; both parts keep the label.
pub fn clear(segments: &[Segment], range: TimeRange) -> Vec<Segment> {
    if range.is_empty() {
        return segments.to_vec();
    }

    let mut out = Vec::with_capacity(segments.len() + 1);
    for segment in segments {
        if !segment.overlaps(range.start, range.end) {
            out.push(segment.clone());
            continue;
        }

        let keeps_head = segment.start() < range.start;
        let keeps_tail = segment.end() > range.end;
        match (keeps_head, keeps_tail) {
            (true, true) => {
                out.push(segment.with_bounds(segment.start(), range.start));
                out.push(segment.split_off(range.end, segment.end()));
            }
            (true, false) => out.push(segment.with_bounds(segment.start(), range.start)),
            (false, true) => out.push(segment.with_bounds(range.end, segment.end())),
            (false, false) => {}
        }
    }
    out
}

/// Clears the span of `segment` and appends it, keeping its id.
pub(crate) fn overwrite(segments: &[Segment], segment: Segment) -> Vec<Segment> {
    let mut out = clear(segments, TimeRange::between(segment.start(), segment.end()));
    out.push(segment);
    out
}

/// Sorts by start and merges touching or overlapping same-label neighbours.
///
/// A merged segment spans the earliest start to the latest end of its parts
/// and gets a fresh id. Running this on its own output changes nothing.
pub fn consolidate(mut segments: Vec<Segment>) -> Vec<Segment> {
    segments.sort_by_key(Segment::start);

    let mut merged: Vec<Segment> = Vec::with_capacity(segments.len());
    for segment in segments {
        if let Some(last) = merged.last_mut() {
            if last.label() == segment.label() && segment.start() <= last.end() {
                let end = last.end().max(segment.end());
                *last = last.split_off(last.start(), end);
                continue;
            }
        }
        merged.push(segment);
    }
    merged
}

/// Whether the list is sorted, disjoint and has no mergeable neighbours.
pub fn is_canonical(segments: &[Segment]) -> bool {
    segments.windows(2).all(|pair| {
        let (a, b) = (&pair[0], &pair[1]);
        a.end() <= b.start() && !(a.end() == b.start() && a.label() == b.label())
    })
}
