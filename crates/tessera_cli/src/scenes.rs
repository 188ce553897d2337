//! Built-in demo scenes.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::ValueEnum;
use rand::Rng;
use tessera_renderer::{
    make_box, Background, Camera, Color, ConstantMedium, CubeMap, Material, Object, Quad, Quadric,
    Sphere, Texture, Translate, Triangle, Vec3,
};

/// Hard-coded scenes to choose from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneType {
    /// Field of random diffuse, metal and glass spheres with three large feature spheres
    Spheres,
    /// Cornell box with a tall box and a smoke-filled short box
    Cornell,
    /// Checkered ground and an image-textured globe
    Textures,
    /// Sphere, cylinder and cone built from quadric coefficients
    Quadrics,
    /// Flat and smooth shaded octahedra
    Triangles,
}

/// Scene-independent knobs coming from the command line.
#[derive(Debug, Clone)]
pub struct SceneOptions {
    pub width: u32,
    pub aspect: Option<f32>,
    pub texture: PathBuf,
    pub skybox: Option<PathBuf>,
}

/// A scene ready to hand to the renderer: flat object list, background and
/// a configured (not yet initialized) camera.
pub struct SceneSetup {
    pub objects: Vec<Object>,
    pub background: Background,
    pub camera: Camera,
}

/// Lens and framing of a scene's default camera.
struct View {
    aspect: f32,
    look_from: Vec3,
    look_at: Vec3,
    vfov: f32,
    defocus_angle: f32,
    focus_dist: f32,
}

impl Default for View {
    fn default() -> Self {
        Self {
            aspect: 16.0 / 9.0,
            look_from: Vec3::new(13.0, 2.0, 3.0),
            look_at: Vec3::ZERO,
            vfov: 20.0,
            defocus_angle: 0.0,
            focus_dist: 10.0,
        }
    }
}

pub fn build_scene(scene: SceneType, options: &SceneOptions, rng: &mut impl Rng) -> Result<SceneSetup> {
    let (objects, mut background, view) = match scene {
        SceneType::Spheres => spheres(rng),
        SceneType::Cornell => cornell(),
        SceneType::Textures => textures(&options.texture),
        SceneType::Quadrics => quadrics(),
        SceneType::Triangles => triangles(),
    };

    if let Some(dir) = &options.skybox {
        background = Background::Environment(Arc::new(load_skybox(dir)?));
    }

    let camera = Camera::new()
        .with_aspect_ratio(options.width, options.aspect.unwrap_or(view.aspect))
        .with_position(view.look_from, view.look_at, Vec3::Y)
        .with_lens(view.vfov, view.defocus_angle, view.focus_dist);

    Ok(SceneSetup {
        objects,
        background,
        camera,
    })
}

fn load_skybox(dir: &Path) -> Result<CubeMap> {
    let faces = ["right", "left", "top", "bottom", "front", "back"].map(|face| dir.join(format!("{face}.png")));
    CubeMap::open(faces).with_context(|| format!("loading skybox from {}", dir.display()))
}

fn lambertian(albedo: Color) -> Arc<Material> {
    Arc::new(Material::lambertian(albedo))
}

fn random_color(rng: &mut impl Rng) -> Color {
    Color::new(rng.gen(), rng.gen(), rng.gen())
}

fn spheres(rng: &mut impl Rng) -> (Vec<Object>, Background, View) {
    let mut objects: Vec<Object> = vec![Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Material::lambertian_texture(Texture::checker_colors(
            0.32,
            Color::new(0.2, 0.3, 0.1),
            Color::splat(0.9),
        ))),
    )
    .into()];

    for a in -11..11 {
        for b in -11..11 {
            let center = Vec3::new(
                a as f32 + 0.9 * rng.gen::<f32>(),
                0.2,
                b as f32 + 0.9 * rng.gen::<f32>(),
            );
            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let choose_mat: f32 = rng.gen();
            let sphere = if choose_mat < 0.8 {
                let albedo = random_color(rng) * random_color(rng);
                // Some diffuse spheres bounce during the shutter interval
                if rng.gen_bool(0.25) {
                    let center1 = center + Vec3::new(0.0, rng.gen_range(0.0..0.5), 0.0);
                    Sphere::moving(center, center1, 0.2, lambertian(albedo))
                } else {
                    Sphere::new(center, 0.2, lambertian(albedo))
                }
            } else if choose_mat < 0.95 {
                let albedo = Color::splat(0.5) + 0.5 * random_color(rng);
                let fuzz = rng.gen_range(0.0..0.5);
                Sphere::new(center, 0.2, Arc::new(Material::metal(albedo, fuzz)))
            } else {
                Sphere::new(center, 0.2, Arc::new(Material::dielectric(1.5)))
            };
            objects.push(sphere.into());
        }
    }

    objects.push(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, Arc::new(Material::dielectric(1.5))).into());
    objects.push(Sphere::new(Vec3::new(-4.0, 1.0, 0.0), 1.0, lambertian(Color::new(0.4, 0.2, 0.1))).into());
    objects.push(
        Sphere::new(
            Vec3::new(4.0, 1.0, 0.0),
            1.0,
            Arc::new(Material::metal(Color::new(0.7, 0.6, 0.5), 0.0)),
        )
        .into(),
    );

    let view = View {
        defocus_angle: 0.6,
        ..Default::default()
    };
    (objects, Background::Sky, view)
}

fn cornell() -> (Vec<Object>, Background, View) {
    let red = lambertian(Color::new(0.65, 0.05, 0.05));
    let white = lambertian(Color::splat(0.73));
    let green = lambertian(Color::new(0.12, 0.45, 0.15));
    let light = Arc::new(Material::diffuse_light(Color::splat(15.0)));

    let mut objects: Vec<Object> = vec![
        Quad::new(Vec3::new(555.0, 0.0, 0.0), Vec3::new(0.0, 555.0, 0.0), Vec3::new(0.0, 0.0, 555.0), green).into(),
        Quad::new(Vec3::ZERO, Vec3::new(0.0, 555.0, 0.0), Vec3::new(0.0, 0.0, 555.0), red).into(),
        Quad::new(
            Vec3::new(343.0, 554.0, 332.0),
            Vec3::new(-130.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, -105.0),
            light,
        )
        .into(),
        Quad::new(Vec3::ZERO, Vec3::new(555.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 555.0), white.clone()).into(),
        Quad::new(
            Vec3::splat(555.0),
            Vec3::new(-555.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, -555.0),
            white.clone(),
        )
        .into(),
        Quad::new(Vec3::new(0.0, 0.0, 555.0), Vec3::new(555.0, 0.0, 0.0), Vec3::new(0.0, 555.0, 0.0), white.clone())
            .into(),
    ];

    let tall = make_box(Vec3::ZERO, Vec3::new(165.0, 330.0, 165.0), white.clone());
    objects.push(Translate::new(tall, Vec3::new(265.0, 0.0, 295.0)).into());

    let short = make_box(Vec3::ZERO, Vec3::splat(165.0), white);
    let short = Translate::new(short, Vec3::new(130.0, 0.0, 65.0));
    objects.push(ConstantMedium::new(short, 0.01, Texture::Solid(Color::ZERO)).into());

    let view = View {
        aspect: 1.0,
        look_from: Vec3::new(278.0, 278.0, -800.0),
        look_at: Vec3::new(278.0, 278.0, 0.0),
        vfov: 40.0,
        ..Default::default()
    };
    (objects, Background::Solid(Color::ZERO), view)
}

fn textures(texture: &Path) -> (Vec<Object>, Background, View) {
    let checker = Texture::checker_colors(0.5, Color::new(0.2, 0.3, 0.1), Color::splat(0.9));
    let globe = Texture::image_or_debug(texture);

    let objects: Vec<Object> = vec![
        Sphere::new(
            Vec3::new(0.0, -1000.0, 0.0),
            1000.0,
            Arc::new(Material::lambertian_texture(checker)),
        )
        .into(),
        Sphere::new(Vec3::new(0.0, 2.0, 0.0), 2.0, Arc::new(Material::lambertian_texture(globe))).into(),
        Sphere::new(Vec3::new(3.5, 1.0, 1.5), 1.0, Arc::new(Material::metal(Color::splat(0.8), 0.05))).into(),
    ];

    let view = View {
        look_from: Vec3::new(0.0, 3.0, 14.0),
        look_at: Vec3::new(0.0, 1.5, 0.0),
        vfov: 30.0,
        ..Default::default()
    };
    (objects, Background::Sky, view)
}

fn quadrics() -> (Vec<Object>, Background, View) {
    let ground = Arc::new(Material::lambertian_texture(Texture::checker_colors(
        1.0,
        Color::splat(0.2),
        Color::splat(0.8),
    )));

    let objects: Vec<Object> = vec![
        Quad::new(Vec3::new(-50.0, 0.0, -50.0), Vec3::new(100.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 100.0), ground).into(),
        Quadric::sphere(Vec3::new(-3.0, 1.0, 0.0), 1.0, lambertian(Color::new(0.8, 0.3, 0.3))).into(),
        Quadric::cylinder(
            Vec3::new(0.0, 0.0, -1.0),
            0.6,
            Arc::new(Material::metal(Color::new(0.8, 0.8, 0.9), 0.1)),
        )
        .into(),
        Quadric::cone(Vec3::new(3.0, 1.0, 0.0), 0.45, lambertian(Color::new(0.3, 0.4, 0.8))).into(),
        Sphere::new(Vec3::new(0.0, 8.0, 6.0), 2.0, Arc::new(Material::diffuse_light(Color::splat(4.0)))).into(),
    ];

    let view = View {
        look_from: Vec3::new(0.0, 3.0, 12.0),
        look_at: Vec3::new(0.0, 1.0, 0.0),
        vfov: 35.0,
        ..Default::default()
    };
    (objects, Background::Sky, view)
}

/// Eight faces of a unit octahedron around `center`, outward winding.
fn octahedron(center: Vec3, radius: f32, material: Arc<Material>, smooth: bool) -> Vec<Object> {
    let corners = [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y, Vec3::Z, Vec3::NEG_Z];
    let faces = [
        (0, 2, 4),
        (4, 2, 1),
        (1, 2, 5),
        (5, 2, 0),
        (4, 3, 0),
        (1, 3, 4),
        (5, 3, 1),
        (0, 3, 5),
    ];

    faces
        .iter()
        .map(|&(a, b, c)| {
            let [na, nb, nc] = [corners[a], corners[b], corners[c]];
            let [pa, pb, pc] = [na, nb, nc].map(|n| center + radius * n);
            let triangle = if smooth {
                Triangle::with_normals(pa, pb, pc, [na, nb, nc], material.clone())
            } else {
                Triangle::new(pa, pb, pc, material.clone())
            };
            triangle.into()
        })
        .collect()
}

fn triangles() -> (Vec<Object>, Background, View) {
    let ground = Arc::new(Material::lambertian_texture(Texture::checker_colors(
        0.5,
        Color::new(0.2, 0.3, 0.1),
        Color::splat(0.9),
    )));

    let mut objects: Vec<Object> = vec![Quad::new(
        Vec3::new(-20.0, 0.0, -20.0),
        Vec3::new(40.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 40.0),
        ground,
    )
    .into()];
    objects.extend(octahedron(Vec3::new(-1.6, 1.2, 0.0), 1.2, lambertian(Color::new(0.7, 0.4, 0.2)), false));
    objects.extend(octahedron(
        Vec3::new(1.6, 1.2, 0.0),
        1.2,
        Arc::new(Material::metal(Color::new(0.8, 0.8, 0.85), 0.15)),
        true,
    ));

    let view = View {
        look_from: Vec3::new(0.0, 3.0, 9.0),
        look_at: Vec3::new(0.0, 1.0, 0.0),
        vfov: 35.0,
        ..Default::default()
    };
    (objects, Background::Sky, view)
}
