//! Lane model
//!
//! An ordered table of lateral offsets. The avatar always sits exactly on one
//! of them; lane changes are discrete steps with no wraparound.

use crate::consts::LANE_EPSILON;

/// Direction of a lateral step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneStep {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LaneTable {
    offsets: Vec<f32>,
}

impl LaneTable {
    /// Build from left-to-right offsets. An empty table becomes a single lane at 0.
    pub fn new(offsets: Vec<f32>) -> Self {
        if offsets.is_empty() {
            return Self { offsets: vec![0.0] };
        }
        Self { offsets }
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Offset of lane `index`, clamped into the table
    pub fn offset(&self, index: usize) -> f32 {
        self.offsets[self.clamp(index)]
    }

    pub fn clamp(&self, index: usize) -> usize {
        index.min(self.offsets.len() - 1)
    }

    /// Lane whose offset is within [`LANE_EPSILON`] of `x`, if any
    pub fn index_of(&self, x: f32) -> Option<usize> {
        self.offsets
            .iter()
            .position(|offset| (x - offset).abs() < LANE_EPSILON)
    }

    /// Lane reached by stepping once from `index`; stays put at the edges
    pub fn step(&self, index: usize, step: LaneStep) -> usize {
        let index = self.clamp(index);
        match step {
            LaneStep::Left => index.saturating_sub(1),
            LaneStep::Right => (index + 1).min(self.offsets.len() - 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> LaneTable {
        LaneTable::new(vec![-1.15, 0.0, 1.15])
    }

    #[test]
    fn nearest_match_within_epsilon() {
        let lanes = table();
        assert_eq!(lanes.index_of(0.05), Some(1));
        assert_eq!(lanes.index_of(-1.1), Some(0));
        assert_eq!(lanes.index_of(0.5), None);
    }

    #[test]
    fn steps_clamp_at_edges() {
        let lanes = table();
        assert_eq!(lanes.step(0, LaneStep::Left), 0);
        assert_eq!(lanes.step(0, LaneStep::Right), 1);
        assert_eq!(lanes.step(2, LaneStep::Right), 2);
        assert_eq!(lanes.step(2, LaneStep::Left), 1);
    }

    #[test]
    fn empty_table_has_one_lane() {
        let lanes = LaneTable::new(Vec::new());
        assert_eq!(lanes.len(), 1);
        assert_eq!(lanes.offset(4), 0.0);
    }
}
