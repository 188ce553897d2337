//! Simple tiled render example.
//!
//! Renders a field of random spheres on every core and saves it as a PPM.

use std::sync::Arc;

use image::RgbImage;
use rand::Rng;
use tessera_renderer::{
    Background, Camera, Color, Framebuffer, Material, NullSink, Object, RenderConfig,
    RenderContext, RenderOutcome, Scene, Sphere, TileScheduler, Vec3,
};

fn main() {
    println!("Tessera - Simple Example");
    println!("========================");

    let start = std::time::Instant::now();
    let scene = Scene::new(build_objects(), Background::Sky);
    println!("Scene built in {:?}", start.elapsed());

    let camera = Camera::new()
        .with_resolution(800, 450)
        .with_position(
            Vec3::new(13.0, 2.0, 3.0), // look_from
            Vec3::new(0.0, 0.0, 0.0),  // look_at
            Vec3::new(0.0, 1.0, 0.0),  // vup
        )
        .with_lens(20.0, 0.6, 10.0);

    let config = RenderConfig {
        samples_per_pixel: 50,
        max_depth: 10,
        ..Default::default()
    };

    println!(
        "Rendering {}x{} @ {} spp...",
        camera.image_width, camera.image_height, config.samples_per_pixel
    );

    let context = RenderContext::new(camera, scene, config).expect("invalid render config");
    let start = std::time::Instant::now();
    let outcome = TileScheduler::new(context)
        .run(&NullSink)
        .expect("render failed");
    println!("Rendered in {:?}", start.elapsed());

    if let RenderOutcome::Done(framebuffer) = outcome {
        let filename = "output.ppm";
        save_ppm(&framebuffer, filename).expect("Failed to save image");
        println!("Saved to {}", filename);
    }
}

fn build_objects() -> Vec<Object> {
    let mut objects: Vec<Object> = Vec::new();

    // Ground
    objects.push(
        Sphere::new(
            Vec3::new(0.0, -1000.0, 0.0),
            1000.0,
            Arc::new(Material::lambertian(Color::splat(0.5))),
        )
        .into(),
    );

    // Three main spheres
    objects.push(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, Arc::new(Material::dielectric(1.5))).into());
    objects.push(
        Sphere::new(
            Vec3::new(-4.0, 1.0, 0.0),
            1.0,
            Arc::new(Material::lambertian(Color::new(0.4, 0.2, 0.1))),
        )
        .into(),
    );
    objects.push(
        Sphere::new(
            Vec3::new(4.0, 1.0, 0.0),
            1.0,
            Arc::new(Material::metal(Color::new(0.7, 0.6, 0.5), 0.0)),
        )
        .into(),
    );

    // Small random spheres
    let mut rng = rand::thread_rng();
    for a in -5..5 {
        for b in -5..5 {
            let center = Vec3::new(
                a as f32 + 0.9 * rng.gen::<f32>(),
                0.2,
                b as f32 + 0.9 * rng.gen::<f32>(),
            );
            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let choose_mat: f32 = rng.gen();
            let material = if choose_mat < 0.8 {
                let albedo = Color::new(
                    rng.gen::<f32>() * rng.gen::<f32>(),
                    rng.gen::<f32>() * rng.gen::<f32>(),
                    rng.gen::<f32>() * rng.gen::<f32>(),
                );
                Material::lambertian(albedo)
            } else if choose_mat < 0.95 {
                let albedo = Color::new(
                    0.5 + 0.5 * rng.gen::<f32>(),
                    0.5 + 0.5 * rng.gen::<f32>(),
                    0.5 + 0.5 * rng.gen::<f32>(),
                );
                Material::metal(albedo, 0.5 * rng.gen::<f32>())
            } else {
                Material::dielectric(1.5)
            };
            objects.push(Sphere::new(center, 0.2, Arc::new(material)).into());
        }
    }

    println!("Created {} objects", objects.len());
    objects
}

fn save_ppm(framebuffer: &Framebuffer, filename: &str) -> image::ImageResult<()> {
    let image = RgbImage::from_raw(
        framebuffer.width(),
        framebuffer.height(),
        framebuffer.as_bytes().to_vec(),
    )
    .expect("framebuffer matches its dimensions");
    image.save(filename)
}
