//! Hittable trait, HitRecord, and the closed set of scene objects.

use crate::{
    BvhNode, ConstantMedium, Material, Quad, Quadric, Sphere, Translate, Triangle,
};
use tessera_math::{Aabb, Interval, Ray, Vec3};

/// Record of a ray-object intersection.
///
/// Lives on the stack of a single intersection query and borrows the material
/// from the primitive that was hit.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Vec3,
    /// Surface normal at intersection (always points against ray)
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: &'a Material,
    /// UV texture coordinates
    pub u: f32,
    pub v: f32,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl<'a> HitRecord<'a> {
    /// Build a record for a hit at `t`, orienting `outward_normal` against the ray.
    pub fn new(
        ray: &Ray,
        t: f32,
        outward_normal: Vec3,
        (u, v): (f32, f32),
        material: &'a Material,
    ) -> Self {
        let mut rec = Self {
            p: ray.at(t),
            normal: outward_normal,
            material,
            u,
            v,
            t,
            front_face: true,
        };
        rec.set_face_normal(ray, outward_normal);
        rec
    }

    /// Set the face normal based on ray direction and outward normal.
    ///
    /// The normal is always stored pointing against the ray,
    /// so we need to track whether we hit the front or back face.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction.dot(outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Capability shared by everything a ray can hit.
///
/// Scene objects are immutable once built and shared across render workers,
/// hence the `Send + Sync` bound.
pub trait Hittable: Send + Sync {
    /// Nearest intersection with parameter strictly inside `ray_t`, if any.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>>;

    /// Axis-aligned box enclosing the object for every ray time.
    fn bounding_box(&self) -> Aabb;
}

/// Every kind of object a scene can contain.
///
/// The set is closed so the innermost intersection loop dispatches with a
/// `match` instead of a virtual call.
#[derive(Debug, Clone)]
pub enum Object {
    Sphere(Sphere),
    Triangle(Triangle),
    Quad(Quad),
    Quadric(Quadric),
    ConstantMedium(ConstantMedium),
    Translate(Translate),
    Bvh(BvhNode),
    List(HittableList),
}

impl Hittable for Object {
    #[inline]
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        match self {
            Object::Sphere(s) => s.hit(ray, ray_t),
            Object::Triangle(t) => t.hit(ray, ray_t),
            Object::Quad(q) => q.hit(ray, ray_t),
            Object::Quadric(q) => q.hit(ray, ray_t),
            Object::ConstantMedium(m) => m.hit(ray, ray_t),
            Object::Translate(t) => t.hit(ray, ray_t),
            Object::Bvh(b) => b.hit(ray, ray_t),
            Object::List(l) => l.hit(ray, ray_t),
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            Object::Sphere(s) => s.bounding_box(),
            Object::Triangle(t) => t.bounding_box(),
            Object::Quad(q) => q.bounding_box(),
            Object::Quadric(q) => q.bounding_box(),
            Object::ConstantMedium(m) => m.bounding_box(),
            Object::Translate(t) => t.bounding_box(),
            Object::Bvh(b) => b.bounding_box(),
            Object::List(l) => l.bounding_box(),
        }
    }
}

impl From<Sphere> for Object {
    fn from(s: Sphere) -> Self {
        Object::Sphere(s)
    }
}

impl From<Triangle> for Object {
    fn from(t: Triangle) -> Self {
        Object::Triangle(t)
    }
}

impl From<Quad> for Object {
    fn from(q: Quad) -> Self {
        Object::Quad(q)
    }
}

impl From<Quadric> for Object {
    fn from(q: Quadric) -> Self {
        Object::Quadric(q)
    }
}

impl From<ConstantMedium> for Object {
    fn from(m: ConstantMedium) -> Self {
        Object::ConstantMedium(m)
    }
}

impl From<Translate> for Object {
    fn from(t: Translate) -> Self {
        Object::Translate(t)
    }
}

impl From<BvhNode> for Object {
    fn from(b: BvhNode) -> Self {
        Object::Bvh(b)
    }
}

impl From<HittableList> for Object {
    fn from(l: HittableList) -> Self {
        Object::List(l)
    }
}

/// A flat list of objects, searched linearly.
#[derive(Debug, Clone)]
pub struct HittableList {
    objects: Vec<Object>,
    bbox: Aabb,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            bbox: Aabb::EMPTY,
        }
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: impl Into<Object>) {
        let object = object.into();
        self.bbox = Aabb::surrounding(&self.bbox, &object.bounding_box());
        self.objects.push(object);
    }

    /// Clear all objects from the list.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.bbox = Aabb::EMPTY;
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    /// Hand the objects over, e.g. to build a BVH from them.
    pub fn into_objects(self) -> Vec<Object> {
        self.objects
    }
}

impl Default for HittableList {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<Object>> for HittableList {
    fn from(objects: Vec<Object>) -> Self {
        let bbox = objects.iter().fold(Aabb::EMPTY, |acc, o| {
            Aabb::surrounding(&acc, &o.bounding_box())
        });
        Self { objects, bbox }
    }
}

impl FromIterator<Object> for HittableList {
    fn from_iter<I: IntoIterator<Item = Object>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl Hittable for HittableList {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let mut closest: Option<HitRecord<'_>> = None;

        for object in &self.objects {
            let max = closest.map_or(ray_t.max, |rec| rec.t);
            if let Some(rec) = object.hit(ray, Interval::new(ray_t.min, max)) {
                closest = Some(rec);
            }
        }

        closest
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
