//! Axis-aligned cuboid regions.
//!
//! A [`Region`] is the volume primitive of the [`RegionTree`](crate::RegionTree):
//! every tree node owns one, and range queries are expressed as one.

use glam::Vec3;

/// An axis-aligned cuboid described by its center and half-extents.
///
/// Bounds are inclusive on every face.
///
/// # Example
///
/// ```
/// use flocksim::{Region, Vec3};
///
/// let cage = Region::new(Vec3::ZERO, Vec3::new(10.0, 5.0, 5.0));
/// assert!(cage.contains(Vec3::new(10.0, -5.0, 0.0)));
/// assert!(!cage.contains(Vec3::new(10.1, 0.0, 0.0)));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Region {
    /// Center of the cuboid.
    pub center: Vec3,
    /// Half the size along each axis. Never negative.
    pub half_extents: Vec3,
}

impl Region {
    /// Create a region from a center and half-extents.
    ///
    /// Negative half-extents are folded to their absolute value.
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents: half_extents.abs(),
        }
    }

    /// A cube with the same half-extent on every axis.
    pub fn cube(center: Vec3, half: f32) -> Self {
        Self::new(center, Vec3::splat(half))
    }

    /// Create a region spanning `min..=max`.
    pub fn from_min_max(min: Vec3, max: Vec3) -> Self {
        let lo = min.min(max);
        let hi = min.max(max);
        Self::new((lo + hi) * 0.5, (hi - lo) * 0.5)
    }

    /// Minimum corner.
    #[inline]
    pub fn min(&self) -> Vec3 {
        self.center - self.half_extents
    }

    /// Maximum corner.
    #[inline]
    pub fn max(&self) -> Vec3 {
        self.center + self.half_extents
    }

    /// Full size along each axis.
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.half_extents * 2.0
    }

    /// Whether `point` lies inside the region (faces included).
    #[inline]
    pub fn contains(&self, point: Vec3) -> bool {
        let min = self.min();
        let max = self.max();
        point.cmpge(min).all() && point.cmple(max).all()
    }

    /// Whether two regions overlap. Touching faces count as overlap.
    ///
    /// Two cuboids overlap only when their extents overlap on all three axes.
    #[inline]
    pub fn intersects(&self, other: &Region) -> bool {
        self.min().cmple(other.max()).all() && self.max().cmpge(other.min()).all()
    }

    /// Whether `other` lies entirely inside this region.
    #[inline]
    pub fn contains_region(&self, other: &Region) -> bool {
        other.min().cmpge(self.min()).all() && other.max().cmple(self.max()).all()
    }

    /// Split into eight equal octants.
    ///
    /// Order is fixed: x varies fastest, then y, then z, negative side first
    /// (NWT, NET, SWT, SET, NWB, NEB, SWB, SEB). Tree insertion tries children
    /// in this order, so points on a shared face land in the earliest octant.
    pub fn octants(&self) -> [Region; 8] {
        let half = self.half_extents * 0.5;
        std::array::from_fn(|i| {
            let sign = Vec3::new(
                if i & 1 == 0 { -1.0 } else { 1.0 },
                if i & 2 == 0 { -1.0 } else { 1.0 },
                if i & 4 == 0 { -1.0 } else { 1.0 },
            );
            Region {
                center: self.center + sign * half,
                half_extents: half,
            }
        })
    }

    /// Index into [`octants`](Self::octants) of the octant holding `point`.
    ///
    /// A point on a shared face resolves to the negative side, which is the
    /// earliest octant in the fixed order that contains it.
    #[inline]
    pub fn octant_index(&self, point: Vec3) -> usize {
        let mut index = 0;
        if point.x > self.center.x {
            index |= 1;
        }
        if point.y > self.center.y {
            index |= 2;
        }
        if point.z > self.center.z {
            index |= 4;
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_folds_negative_extents() {
        let r = Region::new(Vec3::ZERO, Vec3::new(-1.0, 2.0, -3.0));
        assert_eq!(r.half_extents, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_min_max() {
        let r = Region::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(1.0, 1.0, 2.0));
        assert_eq!(r.min(), Vec3::new(0.0, 1.0, 1.0));
        assert_eq!(r.max(), Vec3::new(2.0, 3.0, 5.0));
        assert_eq!(r.size(), Vec3::new(2.0, 2.0, 4.0));
    }

    #[test]
    fn test_from_min_max_swapped() {
        let r = Region::from_min_max(Vec3::splat(4.0), Vec3::ZERO);
        assert_eq!(r.center, Vec3::splat(2.0));
        assert_eq!(r.half_extents, Vec3::splat(2.0));
    }

    #[test]
    fn test_contains_inclusive() {
        let r = Region::cube(Vec3::ZERO, 1.0);
        assert!(r.contains(Vec3::ZERO));
        assert!(r.contains(Vec3::splat(1.0)));
        assert!(r.contains(Vec3::splat(-1.0)));
        assert!(!r.contains(Vec3::new(0.0, 1.001, 0.0)));
        assert!(!r.contains(Vec3::new(0.0, 0.0, -1.001)));
    }

    #[test]
    fn test_intersects_overlap_and_touch() {
        let a = Region::cube(Vec3::ZERO, 1.0);
        let b = Region::cube(Vec3::new(1.5, 0.5, -0.5), 1.0);
        let touching = Region::cube(Vec3::new(2.0, 0.0, 0.0), 1.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(a.intersects(&touching));
    }

    #[test]
    fn test_intersects_requires_all_axes() {
        // Overlaps on x only. An OR-combined test would report a hit here.
        let a = Region::cube(Vec3::ZERO, 1.0);
        let b = Region::cube(Vec3::new(0.0, 5.0, 5.0), 1.0);
        assert!(!a.intersects(&b));

        // Overlaps on x and y, separated on z.
        let c = Region::cube(Vec3::new(0.5, 0.5, 3.0), 1.0);
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_intersects_nested() {
        let outer = Region::cube(Vec3::ZERO, 10.0);
        let inner = Region::cube(Vec3::new(1.0, 1.0, 1.0), 0.5);
        assert!(outer.intersects(&inner));
        assert!(inner.intersects(&outer));
        assert!(outer.contains_region(&inner));
        assert!(!inner.contains_region(&outer));
    }

    #[test]
    fn test_octants_partition_parent() {
        let parent = Region::new(Vec3::new(1.0, -2.0, 3.0), Vec3::new(4.0, 2.0, 6.0));
        let octants = parent.octants();

        for child in &octants {
            assert_eq!(child.half_extents, parent.half_extents * 0.5);
            assert!(parent.contains_region(child));
        }

        // NWT first, SEB last
        assert_eq!(octants[0].center, Vec3::new(-1.0, -3.0, 0.0));
        assert_eq!(octants[1].center, Vec3::new(3.0, -3.0, 0.0));
        assert_eq!(octants[2].center, Vec3::new(-1.0, -1.0, 0.0));
        assert_eq!(octants[7].center, Vec3::new(3.0, -1.0, 6.0));

        // Points resolve to the octant that holds them
        for (i, octant) in octants.iter().enumerate() {
            assert_eq!(parent.octant_index(octant.center), i);
        }
        // The center touches all eight; the first one wins
        assert_eq!(parent.octant_index(parent.center), 0);

        // All centers distinct
        for i in 0..8 {
            for j in (i + 1)..8 {
                assert_ne!(octants[i].center, octants[j].center);
            }
        }
    }
}
