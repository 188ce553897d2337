//! Offset wrapper that moves an object without rebuilding it.

use crate::hittable::{HitRecord, Hittable, Object};
use tessera_math::{Aabb, Interval, Ray, Vec3};

#[derive(Debug, Clone)]
pub struct Translate {
    object: Box<Object>,
    offset: Vec3,
    bbox: Aabb,
}

impl Translate {
    pub fn new(object: impl Into<Object>, offset: Vec3) -> Self {
        let object = object.into();
        let bbox = object.bounding_box().translate(offset);
        Self {
            object: Box::new(object),
            offset,
            bbox,
        }
    }

    pub fn offset(&self) -> Vec3 {
        self.offset
    }
}

impl Hittable for Translate {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        // Move the ray into object space, then the hit point back out
        let local = ray.offset_by(self.offset);
        let mut rec = self.object.hit(&local, ray_t)?;
        rec.p += self.offset;
        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
