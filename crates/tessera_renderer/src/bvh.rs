//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Top-down recursive partitioning: each level sorts its span of objects on a
//! randomly chosen axis and splits it in half by count.

use std::cmp::Ordering;
use std::sync::Arc;

use rand::{Rng, RngCore};

use crate::hittable::{HitRecord, Hittable, Object};
use tessera_math::{Aabb, Interval, Ray};

/// BVH node - either a branch with two children or the empty sentinel.
///
/// Children are shared through `Arc` so a single-object span can alias the
/// same object on both sides without cloning it.
#[derive(Debug, Clone)]
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Arc<Object>,
        right: Arc<Object>,
        bbox: Aabb,
    },
    /// Built from an empty object list. Never hit.
    Empty,
}

impl BvhNode {
    /// Create a BVH from a list of objects, picking split axes with the
    /// thread-local generator.
    pub fn new(objects: Vec<Object>) -> Self {
        Self::with_rng(objects, &mut rand::thread_rng())
    }

    /// Create a BVH with an explicit generator for reproducible trees.
    pub fn with_rng(objects: Vec<Object>, rng: &mut dyn RngCore) -> Self {
        if objects.is_empty() {
            return BvhNode::Empty;
        }
        let mut objects: Vec<Arc<Object>> = objects.into_iter().map(Arc::new).collect();
        Self::build(&mut objects, rng)
    }

    /// Recursive BVH construction over a non-empty span.
    fn build(objects: &mut [Arc<Object>], rng: &mut dyn RngCore) -> Self {
        let axis = rng.gen_range(0..3);
        let by_axis_min = |a: &Arc<Object>, b: &Arc<Object>| box_compare(a, b, axis);

        let (left, right) = match objects.len() {
            1 => (objects[0].clone(), objects[0].clone()),
            2 => {
                if by_axis_min(&objects[0], &objects[1]) == Ordering::Greater {
                    (objects[1].clone(), objects[0].clone())
                } else {
                    (objects[0].clone(), objects[1].clone())
                }
            }
            n => {
                objects.sort_unstable_by(by_axis_min);
                let (lo, hi) = objects.split_at_mut(n / 2);
                (
                    Arc::new(Object::Bvh(Self::build(lo, rng))),
                    Arc::new(Object::Bvh(Self::build(hi, rng))),
                )
            }
        };

        let bbox = Aabb::surrounding(&left.bounding_box(), &right.bounding_box());
        BvhNode::Branch { left, right, bbox }
    }

    /// The two children of a branch, `None` for the empty sentinel.
    pub fn children(&self) -> Option<(&Object, &Object)> {
        match self {
            BvhNode::Branch { left, right, .. } => Some((left.as_ref(), right.as_ref())),
            BvhNode::Empty => None,
        }
    }

    /// Number of BVH levels from this node down to the deepest leaf object.
    pub fn depth(&self) -> usize {
        match self.children() {
            None => 0,
            Some((left, right)) => 1 + node_depth(left).max(node_depth(right)),
        }
    }
}

fn node_depth(object: &Object) -> usize {
    match object {
        Object::Bvh(node) => node.depth(),
        _ => 0,
    }
}

fn box_compare(a: &Object, b: &Object, axis: usize) -> Ordering {
    let a_min = a.bounding_box().axis_interval(axis).min;
    let b_min = b.bounding_box().axis_interval(axis).min;
    a_min.partial_cmp(&b_min).unwrap_or(Ordering::Equal)
}

impl Hittable for BvhNode {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        match self {
            BvhNode::Empty => None,

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }

                let hit_left = left.hit(ray, ray_t);

                // Only check right up to closest hit
                let right_max = hit_left.map_or(ray_t.max, |rec| rec.t);
                let hit_right = right.hit(ray, Interval::new(ray_t.min, right_max));

                hit_right.or(hit_left)
            }
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}
