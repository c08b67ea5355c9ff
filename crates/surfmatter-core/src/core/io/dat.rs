use crate::core::io::traits::ParticleFile;
use crate::core::models::particle::Particle;
use crate::core::models::system::ParticleSystem;
use nalgebra::{Point3, Vector3};
use std::io::{self, BufRead, Write};
use thiserror::Error;

/// Column order written by [`DatFile::write_to`].
pub const OUTPUT_KEYS: [&str; 14] = [
    "id", "type", "radius", "x", "y", "z", "vx", "vy", "vz", "nx", "ny", "nz", "omega", "age",
];

/// Minimum number of columns in an input record.
const REQUIRED_COLUMNS: usize = 12;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatMetadata {
    /// Comment lines (without the leading `#`) found before the first record.
    pub header_lines: Vec<String>,
}

#[derive(Debug, Error)]
pub enum DatError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: DatParseErrorKind },
}

#[derive(Debug, Error, PartialEq)]
pub enum DatParseErrorKind {
    #[error("Expected at least 12 columns, found {0}")]
    TooFewColumns(usize),
    #[error("Invalid integer in column '{column}' (value: '{value}')")]
    InvalidInt { column: &'static str, value: String },
    #[error("Invalid float in column '{column}' (value: '{value}')")]
    InvalidFloat { column: &'static str, value: String },
}

/// Whitespace-separated particle table.
///
/// Input records are `id type radius x y z vx vy vz nx ny nz`, optionally followed by
/// `omega age`. Lines starting with `#` are comments; blank lines are skipped.
pub struct DatFile;

fn parse_int(fields: &[&str], col: usize) -> Result<usize, DatParseErrorKind> {
    fields[col]
        .parse()
        .map_err(|_| DatParseErrorKind::InvalidInt {
            column: OUTPUT_KEYS[col],
            value: fields[col].to_string(),
        })
}

fn parse_float(fields: &[&str], col: usize) -> Result<f64, DatParseErrorKind> {
    fields[col]
        .parse()
        .map_err(|_| DatParseErrorKind::InvalidFloat {
            column: OUTPUT_KEYS[col],
            value: fields[col].to_string(),
        })
}

fn parse_record(fields: &[&str]) -> Result<Particle, DatParseErrorKind> {
    if fields.len() < REQUIRED_COLUMNS {
        return Err(DatParseErrorKind::TooFewColumns(fields.len()));
    }
    let f = |col| parse_float(fields, col);

    let mut particle = Particle::new(
        parse_int(fields, 0)?,
        Point3::new(f(3)?, f(4)?, f(5)?),
        Vector3::new(f(9)?, f(10)?, f(11)?),
    )
    .with_type(parse_int(fields, 1)?)
    .with_radius(f(2)?)
    .with_velocity(Vector3::new(f(6)?, f(7)?, f(8)?));

    if fields.len() >= OUTPUT_KEYS.len() {
        particle.omega = f(12)?;
        particle.age = f(13)?;
    }
    Ok(particle)
}

impl ParticleFile for DatFile {
    type Metadata = DatMetadata;
    type Error = DatError;

    fn read_from(
        reader: &mut impl BufRead,
    ) -> Result<(ParticleSystem, Self::Metadata), Self::Error> {
        let mut system = ParticleSystem::new();
        let mut metadata = DatMetadata::default();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if let Some(comment) = trimmed.strip_prefix('#') {
                if system.is_empty() && !comment.trim_start().starts_with("keys:") {
                    metadata.header_lines.push(comment.trim().to_string());
                }
                continue;
            }

            let fields: Vec<&str> = trimmed.split_whitespace().collect();
            let particle = parse_record(&fields).map_err(|kind| DatError::Parse {
                line: line_num + 1,
                kind,
            })?;
            system.add_particle(particle);
        }

        Ok((system, metadata))
    }

    fn write_to(
        system: &ParticleSystem,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        for line in &metadata.header_lines {
            writeln!(writer, "# {}", line)?;
        }
        writeln!(writer, "# keys: {}", OUTPUT_KEYS.join(" "))?;

        for p in system.particles() {
            writeln!(
                writer,
                "{} {} {:.6} {:.10} {:.10} {:.10} {:.10} {:.10} {:.10} {:.10} {:.10} {:.10} {:.10} {:.6}",
                p.id,
                p.particle_type,
                p.radius,
                p.position.x,
                p.position.y,
                p.position.z,
                p.velocity.x,
                p.velocity.y,
                p.velocity.z,
                p.director.x,
                p.director.y,
                p.director.z,
                p.omega,
                p.age,
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = "\
# spherical shell, R = 10
# generated for tests

0 1 1.0  0.0 0.0 10.0  0.0 0.0 0.0  1.0 0.0 0.0
1 2 0.5  10.0 0.0 0.0  0.1 0.2 0.0  0.0 1.0 0.0
";

    #[test]
    fn read_parses_records_and_header_comments() {
        let (system, metadata) = DatFile::read_from(&mut Cursor::new(SAMPLE)).unwrap();

        assert_eq!(system.len(), 2);
        assert_eq!(
            metadata.header_lines,
            vec!["spherical shell, R = 10", "generated for tests"]
        );
        let p = system.particle(1).unwrap();
        assert_eq!(p.id, 1);
        assert_eq!(p.particle_type, 2);
        assert_eq!(p.radius, 0.5);
        assert_eq!(p.position, Point3::new(10.0, 0.0, 0.0));
        assert_eq!(p.velocity, Vector3::new(0.1, 0.2, 0.0));
        assert_eq!(p.director, Vector3::y());
    }

    #[test]
    fn read_reports_line_number_for_short_records() {
        let input = "0 1 1.0 0 0 0 0 0 0 1 0 0\n1 1 1.0 0 0\n";
        let err = DatFile::read_from(&mut Cursor::new(input)).unwrap_err();
        match err {
            DatError::Parse { line, kind } => {
                assert_eq!(line, 2);
                assert_eq!(kind, DatParseErrorKind::TooFewColumns(5));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn read_reports_invalid_float_column() {
        let input = "0 1 1.0 0 abc 0 0 0 0 1 0 0\n";
        let err = DatFile::read_from(&mut Cursor::new(input)).unwrap_err();
        assert!(matches!(
            err,
            DatError::Parse {
                line: 1,
                kind: DatParseErrorKind::InvalidFloat { column: "y", .. }
            }
        ));
    }

    #[test]
    fn written_file_reads_back_with_omega_and_age() {
        let (mut system, metadata) = DatFile::read_from(&mut Cursor::new(SAMPLE)).unwrap();
        system.particle_mut(0).unwrap().omega = 0.25;
        system.particle_mut(0).unwrap().age = 1.5;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.dat");
        DatFile::write_to_path(&system, &metadata, &path).unwrap();
        let (reread, remeta) = DatFile::read_from_path(&path).unwrap();

        assert_eq!(remeta, metadata);
        assert_eq!(reread.len(), 2);
        let p = reread.particle(0).unwrap();
        assert_eq!(p.omega, 0.25);
        assert_eq!(p.age, 1.5);
        assert_eq!(p.position, Point3::new(0.0, 0.0, 10.0));
    }
}
