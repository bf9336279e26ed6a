use crate::{Affine, Interval, MathError, Point3, Ray};

/// Minimum extent of a box along any axis.
///
/// Planar geometry (quads) would otherwise produce zero-thickness boxes that
/// the slab test can never hit.
const MIN_EXTENT: f64 = 1e-4;

/// One of the three coordinate axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl TryFrom<usize> for Axis {
    type Error = MathError;

    fn try_from(n: usize) -> Result<Self, Self::Error> {
        match n {
            0 => Ok(Axis::X),
            1 => Ok(Axis::Y),
            2 => Ok(Axis::Z),
            _ => Err(MathError::InvalidAxis(n)),
        }
    }
}

/// Axis-Aligned Bounding Box for spatial acceleration structures (BVH).
///
/// An AABB is defined by three intervals (one per axis) that bound a 3D volume.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Create a new AABB from three intervals.
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        let mut aabb = Self { x, y, z };
        aabb.pad_to_minimums();
        aabb
    }

    /// Create an AABB from two corner points.
    pub fn from_points(a: Point3, b: Point3) -> Self {
        Self::new(
            Interval::ordered(a.x, b.x),
            Interval::ordered(a.y, b.y),
            Interval::ordered(a.z, b.z),
        )
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    /// The box enclosing this box after it is carried through `affine`.
    ///
    /// All eight corners are transformed, so the result stays conservative
    /// under rotation.
    pub fn transformed(&self, affine: &Affine) -> Aabb {
        let mut min = Point3::INFINITY;
        let mut max = Point3::NEG_INFINITY;

        for x in [self.x.min, self.x.max] {
            for y in [self.y.min, self.y.max] {
                for z in [self.z.min, self.z.max] {
                    let corner = affine.apply_point(Point3::new(x, y, z));
                    min = min.min(corner);
                    max = max.max(corner);
                }
            }
        }

        Aabb::from_points(min, max)
    }

    /// Get the interval for a specific axis.
    pub fn axis_interval(&self, axis: Axis) -> Interval {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Intersect a ray with this box using the slab method.
    ///
    /// Returns the part of `ray_t` inside the box, or `None` on a miss.
    pub fn hit(&self, r: &Ray, ray_t: Interval) -> Option<Interval> {
        let origin = r.origin();
        let direction = r.direction();
        let mut t_min = ray_t.min;
        let mut t_max = ray_t.max;

        for axis in Axis::ALL {
            let slab = self.axis_interval(axis);
            let i = axis.index();
            let adinv = 1.0 / direction[i];

            let t0 = (slab.min - origin[i]) * adinv;
            let t1 = (slab.max - origin[i]) * adinv;

            if t0 < t1 {
                t_min = t0.max(t_min);
                t_max = t1.min(t_max);
            } else {
                t_min = t1.max(t_min);
                t_max = t0.min(t_max);
            }

            if t_max <= t_min {
                return None;
            }
        }

        Some(Interval::new(t_min, t_max))
    }

    /// Pad intervals to avoid zero-width AABBs (degenerate cases).
    fn pad_to_minimums(&mut self) {
        if self.x.size() < MIN_EXTENT {
            self.x = self.x.expand(MIN_EXTENT);
        }
        if self.y.size() < MIN_EXTENT {
            self.y = self.y.expand(MIN_EXTENT);
        }
        if self.z.size() < MIN_EXTENT {
            self.z = self.z.expand(MIN_EXTENT);
        }
    }

    /// Returns the axis with the longest extent. Ties go to the later axis.
    pub fn longest_axis(&self) -> Axis {
        let x_size = self.x.size();
        let y_size = self.y.size();
        let z_size = self.z.size();

        if x_size > y_size {
            if x_size > z_size {
                Axis::X
            } else {
                Axis::Z
            }
        } else if y_size > z_size {
            Axis::Y
        } else {
            Axis::Z
        }
    }

    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };
}
