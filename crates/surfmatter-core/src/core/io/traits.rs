use crate::core::models::system::ParticleSystem;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for reading and writing particle configuration formats.
///
/// Implementors handle format-specific parsing and serialization; the path helpers are
/// shared.
pub trait ParticleFile {
    /// Format-specific data carried alongside the particles (e.g. header comments).
    type Metadata;

    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Reads a particle system from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or the reader fails.
    fn read_from(reader: &mut impl BufRead)
    -> Result<(ParticleSystem, Self::Metadata), Self::Error>;

    /// Writes a particle system and metadata to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_to(
        system: &ParticleSystem,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error>;

    /// Reads a particle system from a file path.
    fn read_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<(ParticleSystem, Self::Metadata), Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Writes a particle system and metadata to a file path.
    fn write_to_path<P: AsRef<Path>>(
        system: &ParticleSystem,
        metadata: &Self::Metadata,
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(system, metadata, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
