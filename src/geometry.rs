//! Track size bookkeeping used to turn a segment index into race progress.

use crate::model::Track;

/// Sizes derived once per race from the track's segment lengths.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackGeometry {
    pub total_size: f64,
    /// Running sum of segment lengths; entry `i` is the distance covered
    /// once segment `i` is complete.
    pub cumulative_size_by_segment: Vec<f64>,
}

impl TrackGeometry {
    pub fn from_segments(segments: &[f64]) -> Self {
        let cumulative_size_by_segment: Vec<f64> = segments
            .iter()
            .scan(0.0, |acc, &len| {
                *acc += len;
                Some(*acc)
            })
            .collect();
        let total_size = cumulative_size_by_segment.last().copied().unwrap_or(0.0);

        Self {
            total_size,
            cumulative_size_by_segment,
        }
    }

    pub fn from_track(track: &Track) -> Self {
        Self::from_segments(&track.segments)
    }

    pub fn segment_count(&self) -> usize {
        self.cumulative_size_by_segment.len()
    }

    /// Rounded percentage of the track covered by a racer at `lead_segment`.
    ///
    /// Segment 0 means the racer has not left the grid yet. Segments past
    /// the end of the track count as a full lap.
    pub fn completion_percent(&self, lead_segment: usize) -> u32 {
        if lead_segment == 0 || self.total_size <= 0.0 {
            return 0;
        }
        let idx = (lead_segment - 1).min(self.segment_count().saturating_sub(1));
        let covered = self.cumulative_size_by_segment.get(idx).copied().unwrap_or(0.0);
        let pct = (covered / self.total_size * 100.0).round();
        pct.clamp(0.0, 100.0) as u32
    }
}
