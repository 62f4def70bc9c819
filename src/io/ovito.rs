//! XYZ export for Ovito: every trajectory frame plus eight fixed marker particles that
//! outline the box and the two segments of the partition.

use crate::error::{Error, Result};
use crate::io::LineReader;
use crate::setup::StaticConfig;
use std::io::{BufRead, Write};

/// Number of marker particles appended to every frame.
pub const MARKERS: usize = 8;

/// Copy the frames of `trajectory` (as written by
/// [`write_frame`](crate::io::output::write_frame)) into `out` in XYZ layout.
pub fn export_ovito<R: BufRead, W: Write>(config: &StaticConfig, opening: f64, trajectory: R, mut out: W) -> Result<()> {
    let n = config.n;
    let markers = markers(config, opening);
    let mut lines = LineReader::new(trajectory);
    let mut frames = 0usize;

    while let Some(iteration) = lines.try_next_line()? {
        if iteration.trim().is_empty() {
            continue;
        }
        writeln!(out, "{}", n + MARKERS)?;
        writeln!(out, "{}", iteration.trim())?;
        for _ in 0..n {
            let particle = lines.next_line("particle line")?;
            if particle.split_whitespace().count() < 9 {
                return Err(Error::Format {
                    line: lines.line(),
                    msg: "particle line needs id, type, x, y, vx, vy and an RGB colour".into(),
                });
            }
            writeln!(out, "{particle}")?;
        }
        out.write_all(markers.as_bytes())?;
        frames += 1;
    }
    out.flush()?;
    tracing::info!(frames, "ovito export written");
    Ok(())
}

/// Black, motionless markers: the four box corners, then the bottom and top partition
/// segments (each sharing one type).
fn markers(config: &StaticConfig, opening: f64) -> String {
    let n = config.n;
    let (w, l) = (config.width, config.height);
    let lower = n + 5;
    let upper = n + 6;
    let points = [
        (n + 1, n + 1, 0.0, 0.0),
        (n + 2, n + 2, w, 0.0),
        (n + 3, n + 3, w, l),
        (n + 4, n + 4, 0.0, l),
        (n + 5, lower, w / 2.0, 0.0),
        (n + 6, lower, w / 2.0, (l - opening) / 2.0),
        (n + 7, upper, w / 2.0, (l + opening) / 2.0),
        (n + 8, upper, w / 2.0, l),
    ];
    points
        .iter()
        .map(|(id, ty, x, y)| format!("{id}\t{ty}\t{x}\t{y}\t0\t0\t0\t0\t0\n"))
        .collect()
}
