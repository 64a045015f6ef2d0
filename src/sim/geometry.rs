//! Block geometry and slicing
//!
//! Blocks are axis-aligned boxes described by a center and full dimensions.
//! Slicing works on one horizontal axis at a time:
//! - overlap: the shared 1-D interval between moving block and stack top
//! - perfect: overlap leaves at most `PERFECT_TOLERANCE` uncovered
//! - slice: split the moving block into a kept part and a fallen overhang

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Horizontal axis the current block sweeps along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Axis {
    #[default]
    X,
    Z,
}

impl Axis {
    /// The other horizontal axis
    #[inline]
    pub fn flip(self) -> Self {
        match self {
            Axis::X => Axis::Z,
            Axis::Z => Axis::X,
        }
    }

    /// Read this axis' component of a vector
    #[inline]
    pub fn component(self, v: Vec3) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Z => v.z,
        }
    }

    /// Copy of `v` with this axis' component replaced
    #[inline]
    pub fn with_component(self, v: Vec3, value: f32) -> Vec3 {
        match self {
            Axis::X => Vec3::new(value, v.y, v.z),
            Axis::Z => Vec3::new(v.x, v.y, value),
        }
    }
}

/// A placed, moving, or fallen block (immutable value)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: u32,
    /// Center of the box
    pub position: Vec3,
    /// Full width × height × depth
    pub dimensions: Vec3,
}

impl Block {
    pub fn new(id: u32, position: Vec3, dimensions: Vec3) -> Self {
        Self {
            id,
            position,
            dimensions,
        }
    }

    /// Center along `axis`
    #[inline]
    pub fn center_on(&self, axis: Axis) -> f32 {
        axis.component(self.position)
    }

    /// Size along `axis`
    #[inline]
    pub fn size_on(&self, axis: Axis) -> f32 {
        axis.component(self.dimensions)
    }

    /// Same block with a new center and size along `axis`
    pub fn resized_on(&self, axis: Axis, center: f32, size: f32) -> Self {
        Self {
            id: self.id,
            position: axis.with_component(self.position, center),
            dimensions: axis.with_component(self.dimensions, size),
        }
    }
}

/// 1-D overlap of two intervals
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlap {
    pub min: f32,
    pub max: f32,
    pub size: f32,
}

impl Overlap {
    #[inline]
    pub fn center(&self) -> f32 {
        (self.min + self.max) / 2.0
    }
}

/// Outcome of dropping a moving block onto the stack top
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceResult {
    /// Part that stays on the stack (None on a miss)
    pub kept: Option<Block>,
    /// Part that falls off (None on a perfect hit)
    pub fallen: Option<Block>,
    pub is_perfect: bool,
}

impl SliceResult {
    /// True when nothing landed on the stack
    pub fn is_miss(&self) -> bool {
        self.kept.is_none()
    }
}

/// Overlap of two centered intervals, or None if they are disjoint or only touch
pub fn calculate_axis_overlap(
    moving_center: f32,
    moving_size: f32,
    base_center: f32,
    base_size: f32,
) -> Option<Overlap> {
    let moving_min = moving_center - moving_size / 2.0;
    let moving_max = moving_center + moving_size / 2.0;
    let base_min = base_center - base_size / 2.0;
    let base_max = base_center + base_size / 2.0;

    let min = moving_min.max(base_min);
    let max = moving_max.min(base_max);

    // Touching edges are not an overlap
    if min >= max {
        return None;
    }

    Some(Overlap {
        min,
        max,
        size: max - min,
    })
}

/// Whether the moving interval lands within `tolerance` of full coverage
pub fn is_perfect_hit(
    moving_center: f32,
    moving_size: f32,
    base_center: f32,
    base_size: f32,
    tolerance: f32,
) -> bool {
    calculate_axis_overlap(moving_center, moving_size, base_center, base_size)
        .is_some_and(|overlap| moving_size - overlap.size <= tolerance)
}

/// Slice `moving` against `base` along `axis`
pub fn slice_block(moving: &Block, base: &Block, axis: Axis) -> SliceResult {
    let moving_center = moving.center_on(axis);
    let moving_size = moving.size_on(axis);
    let base_center = base.center_on(axis);
    let base_size = base.size_on(axis);

    if is_perfect_hit(
        moving_center,
        moving_size,
        base_center,
        base_size,
        PERFECT_TOLERANCE,
    ) {
        // Snap exactly onto the base so repeated perfects never drift
        let kept = Block {
            position: axis.with_component(moving.position, base_center),
            ..*moving
        };
        return SliceResult {
            kept: Some(kept),
            fallen: None,
            is_perfect: true,
        };
    }

    let Some(overlap) = calculate_axis_overlap(moving_center, moving_size, base_center, base_size)
    else {
        return SliceResult {
            kept: None,
            fallen: Some(*moving),
            is_perfect: false,
        };
    };

    let kept = moving.resized_on(axis, overlap.center(), overlap.size);

    let moving_min = moving_center - moving_size / 2.0;
    let moving_max = moving_center + moving_size / 2.0;
    let (fallen_min, fallen_max) = if moving_min < overlap.min {
        (moving_min, overlap.min)
    } else {
        (overlap.max, moving_max)
    };
    let fallen = moving.resized_on(
        axis,
        (fallen_min + fallen_max) / 2.0,
        fallen_max - fallen_min,
    );

    SliceResult {
        kept: Some(kept),
        fallen: Some(fallen),
        is_perfect: false,
    }
}

/// The platform every run starts on
pub fn create_base_block() -> Block {
    Block::new(
        0,
        Vec3::ZERO,
        Vec3::new(BASE_BLOCK_SIZE, BLOCK_HEIGHT, BASE_BLOCK_SIZE),
    )
}

/// Next moving block, one layer above `last_block`, at the start of its sweep
pub fn create_moving_block(id: u32, last_block: &Block, axis: Axis) -> Block {
    let above = last_block.position + Vec3::new(0.0, BLOCK_HEIGHT, 0.0);
    Block::new(
        id,
        axis.with_component(above, -OSCILLATION_AMPLITUDE),
        last_block.dimensions,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f32 = 1e-5;

    fn block_at(x: f32, z: f32, size: f32) -> Block {
        Block::new(1, Vec3::new(x, BLOCK_HEIGHT, z), Vec3::new(size, BLOCK_HEIGHT, size))
    }

    #[test]
    fn test_overlap_partial() {
        let overlap = calculate_axis_overlap(1.0, 3.0, 0.0, 3.0).unwrap();
        assert!((overlap.min - -0.5).abs() < EPS);
        assert!((overlap.max - 1.5).abs() < EPS);
        assert!((overlap.size - 2.0).abs() < EPS);
        assert!((overlap.center() - 0.5).abs() < EPS);
    }

    #[test]
    fn test_touching_is_not_overlap() {
        assert!(calculate_axis_overlap(1.0, 1.0, 0.0, 1.0).is_none());
        assert!(calculate_axis_overlap(-1.0, 1.0, 0.0, 1.0).is_none());
    }

    #[test]
    fn test_disjoint_is_not_overlap() {
        assert!(calculate_axis_overlap(10.0, 3.0, 0.0, 3.0).is_none());
    }

    #[test]
    fn test_perfect_hit_tolerance() {
        assert!(is_perfect_hit(0.05, 3.0, 0.0, 3.0, PERFECT_TOLERANCE));
        assert!(is_perfect_hit(0.0, 3.0, 0.0, 3.0, PERFECT_TOLERANCE));
        assert!(!is_perfect_hit(0.5, 3.0, 0.0, 3.0, PERFECT_TOLERANCE));
        // No overlap is never perfect
        assert!(!is_perfect_hit(10.0, 3.0, 0.0, 3.0, PERFECT_TOLERANCE));
    }

    #[test]
    fn test_slice_perfect_snaps_to_base() {
        let base = block_at(0.25, 0.0, 3.0);
        let moving = block_at(0.3, 0.0, 3.0);

        let result = slice_block(&moving, &base, Axis::X);
        assert!(result.is_perfect);
        assert!(result.fallen.is_none());
        let kept = result.kept.unwrap();
        assert_eq!(kept.position.x, base.position.x);
        assert_eq!(kept.dimensions, moving.dimensions);
        assert_eq!(kept.position.y, moving.position.y);
    }

    #[test]
    fn test_slice_partial_positive_overhang() {
        let base = create_base_block();
        let moving = block_at(1.0, 0.0, 3.0);

        let result = slice_block(&moving, &base, Axis::X);
        assert!(!result.is_perfect);
        let kept = result.kept.unwrap();
        let fallen = result.fallen.unwrap();
        assert!((kept.dimensions.x - 2.0).abs() < EPS);
        assert!((kept.position.x - 0.5).abs() < EPS);
        assert!((fallen.dimensions.x - 1.0).abs() < EPS);
        assert!((fallen.position.x - 2.0).abs() < EPS);
        // Other axis untouched
        assert_eq!(kept.dimensions.z, 3.0);
        assert_eq!(fallen.position.z, 0.0);
    }

    #[test]
    fn test_slice_partial_negative_overhang_on_z() {
        let base = create_base_block();
        let moving = block_at(0.0, -1.0, 3.0);

        let result = slice_block(&moving, &base, Axis::Z);
        let kept = result.kept.unwrap();
        let fallen = result.fallen.unwrap();
        assert!((kept.position.z - -0.5).abs() < EPS);
        assert!((kept.dimensions.z - 2.0).abs() < EPS);
        assert!((fallen.position.z - -2.0).abs() < EPS);
        assert!((fallen.dimensions.z - 1.0).abs() < EPS);
        assert_eq!(kept.dimensions.x, 3.0);
    }

    #[test]
    fn test_slice_miss_returns_whole_block() {
        let base = create_base_block();
        let moving = block_at(10.0, 0.0, 3.0);

        let result = slice_block(&moving, &base, Axis::X);
        assert!(result.is_miss());
        assert!(!result.is_perfect);
        assert_eq!(result.fallen, Some(moving));
    }

    #[test]
    fn test_create_moving_block() {
        let base = create_base_block();
        let moving = create_moving_block(7, &base, Axis::Z);
        assert_eq!(moving.id, 7);
        assert_eq!(moving.position.y, base.position.y + BLOCK_HEIGHT);
        assert_eq!(moving.position.z, -OSCILLATION_AMPLITUDE);
        assert_eq!(moving.position.x, base.position.x);
        assert_eq!(moving.dimensions, base.dimensions);
    }

    proptest! {
        #[test]
        fn prop_overlap_symmetric(
            a in -20.0f32..20.0,
            sa in 0.1f32..6.0,
            b in -20.0f32..20.0,
            sb in 0.1f32..6.0,
        ) {
            let ab = calculate_axis_overlap(a, sa, b, sb);
            let ba = calculate_axis_overlap(b, sb, a, sa);
            prop_assert_eq!(ab, ba);
        }

        #[test]
        fn prop_partial_slice_conserves_size(offset in -2.9f32..2.9) {
            let base = create_base_block();
            let moving = block_at(offset, 0.0, 3.0);
            let result = slice_block(&moving, &base, Axis::X);
            if let (Some(kept), Some(fallen)) = (result.kept, result.fallen) {
                let total = kept.dimensions.x + fallen.dimensions.x;
                prop_assert!((total - moving.dimensions.x).abs() < 1e-4);
            }
        }
    }
}
