use std::path::PathBuf;

use anyhow::Context;

use breeze_io::decode::WindDataDecoder;

pub fn inspect(path: PathBuf) -> anyhow::Result<()> {
    let mut decoder = WindDataDecoder::new(path.clone());
    let meta = decoder
        .decode_metadata()
        .with_context(|| format!("cannot read recording in {}", path.display()))?;

    log::info!(
        "{} frames at {} fps on a {} grid ({:?} layout)",
        meta.num_frames,
        meta.fps,
        meta.size,
        meta.layout,
    );

    let mut frame_nr = 0;
    while let Some(frame) = decoder.decode_frame().with_context(|| format!("cannot read frame {frame_nr}"))? {
        let stats = frame.stats();
        println!(
            "{frame_nr:>6}  speed {:>10.4}  energy {:>12.6}  density {:>10.4}  |div| {:>10.2e}",
            stats.max_speed,
            stats.kinetic_energy,
            stats.total_density,
            stats.max_abs_divergence,
        );

        frame_nr += 1;
    }

    Ok(())
}
