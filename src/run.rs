use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use glam::{UVec3, Vec3};
use indicatif::{ProgressBar, ProgressIterator, ProgressStyle};

use breeze_fluids::{
    emitter::{point::Point, slab::Slab},
    grid::IndexLayout,
    scene::Scene,
    stable::{StableFluid3D, StableFluid3DParams},
};
use breeze_io::encode::WindDataEncoder;

#[derive(Args)]
pub struct SimulateArgs {
    /// Directory to record into.
    out: PathBuf,
    /// Grid size, in cells.
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], default_values_t = [16, 8, 16])]
    size: Vec<u32>,
    #[arg(long, default_value_t = 60)]
    fps: u32,
    /// Length of the recording, in seconds.
    #[arg(long, default_value_t = 10.0)]
    duration: f32,
    /// Wind blown by the wall on the x = 0 face.
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_hyphen_values = true, default_values_t = [1.0, 0.0, 0.0])]
    wind: Vec<f32>,
    /// Density source placed at the centre of the grid.
    #[arg(long, default_value_t = 1.0)]
    density: f32,
    /// Seconds between switching the wall on and off. Zero keeps it blowing.
    #[arg(long, default_value_t = 0.0)]
    gust_period: f32,
    /// Use the summed-stride indexing of older recordings.
    #[arg(long)]
    aliased_layout: bool,
    #[arg(long, default_value_t = 20)]
    diffusion_iters: usize,
    #[arg(long, default_value_t = 20)]
    pressure_iters: usize,
}

pub fn simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let size = UVec3::from_slice(&args.size);
    let wind = Vec3::from_slice(&args.wind);

    let params = StableFluid3DParams {
        num_diffusion_iters: args.diffusion_iters,
        num_pressure_iters: args.pressure_iters,
        layout: if args.aliased_layout { IndexLayout::Aliased } else { IndexLayout::Linear },
        ..Default::default()
    };
    let fluid = StableFluid3D::with_params(size, params).context("cannot build wind grid")?;
    log::info!("simulating a {} wind grid with {:?}", fluid.size(), fluid.params());
    let mut scene = Scene::new(fluid);

    let wall = Slab::wall_x(0, wind);
    let wall_id = scene.add_emitter(wall)?;
    scene.add_emitter(Point::new((size / 2).as_ivec3(), Vec3::ZERO, args.density))?;

    let frames = (args.duration * args.fps as f32).round().max(0.0) as u64;
    let dt = 1.0 / args.fps.max(1) as f32;

    let mut encoder = WindDataEncoder::new(args.out.clone(), frames, args.fps)
        .with_context(|| format!("cannot record into {}", args.out.display()))?;
    encoder.encode_metadata(&scene)?;

    let bar_template = "Running Simulation {spinner:.green} [{elapsed}] [{bar:50.white/white}] {pos}/{len} ({eta})";
    let style = ProgressStyle::with_template(bar_template)?
        .progress_chars("=> ").tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
    let progress = ProgressBar::new(frames).with_style(style);

    let mut blowing = true;

    for frame in (0..frames).progress_with(progress) {
        let t = frame as f32 * dt;

        // Gusts
        if args.gust_period > 0.0 {
            let on = (t / args.gust_period) as u64 % 2 == 0;
            if on != blowing {
                if on {
                    scene.insert_emitter(wall_id, wall)?;
                } else {
                    scene.remove_emitter(wall_id)?;
                }
                blowing = on;
            }
        }

        scene.step(dt);
        encoder.encode_frame(&scene)?;

        if frame % args.fps.max(1) as u64 == 0 {
            let stats = scene.fluid().stats();
            log::debug!(
                "t = {t:.2}s: max speed {:.4}, energy {:.6}, density {:.4}, max |div| {:.2e}",
                stats.max_speed,
                stats.kinetic_energy,
                stats.total_density,
                stats.max_abs_divergence,
            );

            if !stats.is_finite() {
                log::warn!("wind field became non-finite at t = {t:.2}s");
            }
        }
    }

    log::info!("recorded {frames} frames of a {size} wind field to {}", args.out.display());

    Ok(())
}
