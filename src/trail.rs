//! Fixed-length position history used for arrow and dash streaks.
//!
//! Purely visual: nothing in the simulation reads a trail back.

use bevy::prelude::*;
use std::collections::VecDeque;

#[derive(Component, Debug, Clone, Default)]
pub struct Trail {
    points: VecDeque<Vec2>,
    max_len: usize,
}

impl Trail {
    pub fn new(max_len: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(max_len + 1),
            max_len,
        }
    }

    /// Append a point, dropping the oldest once the trail is full.
    pub fn push(&mut self, point: Vec2) {
        self.points.push_back(point);
        while self.points.len() > self.max_len {
            self.points.pop_front();
        }
    }

    /// Drop the oldest point; lets a trail shrink away after its source stops.
    pub fn fade(&mut self) {
        self.points.pop_front();
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Consecutive segments oldest-first with an opacity in `(0, 1]`; the
    /// newest segment is fully opaque.
    pub fn segments(&self) -> impl Iterator<Item = (Vec2, Vec2, f32)> + '_ {
        let n = self.points.len() as f32;
        self.points
            .iter()
            .zip(self.points.iter().skip(1))
            .enumerate()
            .map(move |(i, (a, b))| (*a, *b, (i as f32 + 2.0) / n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_length() {
        let mut trail = Trail::new(3);
        for i in 0..10 {
            trail.push(Vec2::splat(i as f32));
        }
        assert_eq!(trail.len(), 3);
        let first = trail.segments().next().unwrap();
        assert_eq!(first.0, Vec2::splat(7.0));
    }

    #[test]
    fn newest_segment_is_opaque() {
        let mut trail = Trail::new(4);
        for i in 0..4 {
            trail.push(Vec2::new(i as f32, 0.0));
        }
        let alphas: Vec<f32> = trail.segments().map(|(_, _, a)| a).collect();
        assert_eq!(alphas.len(), 3);
        assert!((alphas[2] - 1.0).abs() < 1e-6);
        assert!(alphas.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn single_point_has_no_segments() {
        let mut trail = Trail::new(4);
        trail.push(Vec2::ZERO);
        assert_eq!(trail.segments().count(), 0);
        trail.fade();
        assert!(trail.is_empty());
    }
}
