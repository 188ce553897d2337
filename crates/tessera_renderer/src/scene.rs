//! The world a render sees: the BVH over every object plus the background.

use std::time::Instant;

use log::debug;
use rand::RngCore;

use crate::hittable::{HitRecord, Hittable, Object};
use crate::{Background, BvhNode};
use tessera_math::{Aabb, Interval, Ray};

/// Immutable scene, shared by reference across all render workers.
#[derive(Debug, Clone)]
pub struct Scene {
    world: BvhNode,
    background: Background,
    object_count: usize,
}

impl Scene {
    /// Build the BVH over `objects`. This is the only place the tree is built.
    pub fn new(objects: Vec<Object>, background: Background) -> Self {
        Self::build(objects, background, |objects| BvhNode::new(objects))
    }

    /// Like [`Scene::new`] with an explicit generator for the split axes.
    pub fn with_rng(objects: Vec<Object>, background: Background, rng: &mut dyn RngCore) -> Self {
        Self::build(objects, background, |objects| BvhNode::with_rng(objects, rng))
    }

    fn build(
        objects: Vec<Object>,
        background: Background,
        build_bvh: impl FnOnce(Vec<Object>) -> BvhNode,
    ) -> Self {
        let object_count = objects.len();
        let start = Instant::now();
        let world = build_bvh(objects);

        debug!(
            "Built BVH over {} objects in {:.2?} (depth {})",
            object_count,
            start.elapsed(),
            world.depth()
        );

        Self {
            world,
            background,
            object_count,
        }
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn world(&self) -> &BvhNode {
        &self.world
    }

    /// Number of top-level objects the scene was built from.
    pub fn object_count(&self) -> usize {
        self.object_count
    }
}

impl Hittable for Scene {
    #[inline]
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        self.world.hit(ray, ray_t)
    }

    fn bounding_box(&self) -> Aabb {
        self.world.bounding_box()
    }
}
