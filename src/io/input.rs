//! Static file: `N`, mass, speed, `N` radius lines, `L`, `W` (one value per line).
//! Dynamic file: a time line, then `x y vx vy` per particle.

use crate::core::{IdGenerator, Particle};
use crate::error::{Error, Result};
use crate::io::{parse_token, LineReader};
use crate::setup::StaticConfig;
use std::io::{BufRead, Write};

pub fn read_static<R: BufRead>(reader: R) -> Result<StaticConfig> {
    let mut lines = LineReader::new(reader);
    let n: usize = lines.next_value("N")?;
    let mass = lines.next_value("mass")?;
    let speed = lines.next_value("speed")?;
    // `n` is untrusted until every radius line has been read.
    let mut radii = Vec::new();
    for _ in 0..n {
        radii.push(lines.next_value("radius")?);
    }
    let height = lines.next_value("L")?;
    let width = lines.next_value("W")?;

    let config = StaticConfig {
        n,
        mass,
        speed,
        radii,
        height,
        width,
    };
    config.validate()?;
    Ok(config)
}

pub fn write_static<W: Write>(mut w: W, config: &StaticConfig) -> Result<()> {
    writeln!(w, "{}", config.n)?;
    writeln!(w, "{}", config.mass)?;
    writeln!(w, "{}", config.speed)?;
    for r in &config.radii {
        writeln!(w, "{r}")?;
    }
    writeln!(w, "{}", config.height)?;
    writeln!(w, "{}", config.width)?;
    w.flush()?;
    Ok(())
}

/// Read the particles of a dynamic file. Radii and mass come from `config`; ids are drawn
/// from `ids` in file order.
pub fn read_dynamic<R: BufRead>(reader: R, config: &StaticConfig, ids: &mut IdGenerator) -> Result<Vec<Particle>> {
    let mut lines = LineReader::new(reader);
    // initial time, unused
    lines.next_line("time")?;

    let mut particles = Vec::with_capacity(config.radii.len());
    for &radius in &config.radii {
        let line = lines.next_line("particle")?;
        let mut tokens = line.split_whitespace();
        let at = lines.line();
        let x = parse_token(tokens.next(), "x", at)?;
        let y = parse_token(tokens.next(), "y", at)?;
        let vx = parse_token(tokens.next(), "vx", at)?;
        let vy = parse_token(tokens.next(), "vy", at)?;
        let p = Particle::new(ids.next_id(), [x, y], [vx, vy], radius, config.mass).map_err(|e| {
            Error::Format {
                line: at,
                msg: e.to_string(),
            }
        })?;
        particles.push(p);
    }
    Ok(particles)
}

pub fn write_dynamic<W: Write>(mut w: W, particles: &[Particle]) -> Result<()> {
    writeln!(w, "0")?;
    for p in particles {
        writeln!(w, "{}\t{}\t{}\t{}", p.r[0], p.r[1], p.v[0], p.v[1])?;
    }
    w.flush()?;
    Ok(())
}
