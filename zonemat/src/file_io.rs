//! Path-level access to matrix files
//!
//! [`MatrixFile`] owns the file handle for the duration of each call and
//! hands a stream to the codecs. Reads go through a memory map when the
//! `mmap` feature is enabled; writes go through a `BufWriter` that is
//! flushed before returning so that write errors are not lost on drop.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use tracing::debug;
use zonemat_core::MatrixElement;

use crate::emx;
use crate::error::{Error, Result};
use crate::fortran::{self, FortranReadOptions, FortranWriteOptions};
use crate::labels::AxisLabels;
use crate::matrix::{Decoded, MatrixInput, MdfMatrix, OutputMode, ZoneSpec};
use crate::mdf;

/// On-disk format, as named by the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// `.mdf`, `.emxd`
    Mdf,
    /// `.emx`
    Emx,
    /// `.bin`
    Fortran,
}

impl FileFormat {
    /// Format for a path's extension, ignoring case
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let extension = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "mdf" | "emxd" => Some(FileFormat::Mdf),
            "emx" => Some(FileFormat::Emx),
            "bin" => Some(FileFormat::Fortran),
            _ => None,
        }
    }
}

/// Matrix file on disk
#[derive(Debug, Clone)]
pub struct MatrixFile {
    path: PathBuf,
}

impl MatrixFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Format named by the extension, if recognised
    pub fn format(&self) -> Option<FileFormat> {
        FileFormat::from_path(&self.path)
    }

    /// Run `decode` over the file contents
    #[cfg(feature = "mmap")]
    fn with_reader<T>(&self, decode: impl FnOnce(&mut dyn Read) -> Result<T>) -> Result<T> {
        let file = File::open(&self.path)?;
        // SAFETY: read-only map, dropped before this call returns
        let map = unsafe { memmap2::Mmap::map(&file)? };
        let mut reader: &[u8] = &map;
        decode(&mut reader)
    }

    /// Run `decode` over the file contents
    #[cfg(not(feature = "mmap"))]
    fn with_reader<T>(&self, decode: impl FnOnce(&mut dyn Read) -> Result<T>) -> Result<T> {
        let file = File::open(&self.path)?;
        let mut reader = std::io::BufReader::new(file);
        decode(&mut reader)
    }

    /// Create or truncate the file and run `encode` against it
    fn with_writer(&self, encode: impl FnOnce(&mut dyn Write) -> Result<()>) -> Result<()> {
        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        encode(&mut writer)?;
        writer.flush()?;
        debug!(path = %self.path.display(), "wrote matrix file");
        Ok(())
    }

    /// Read with the codec named by the extension, using default options
    ///
    /// MDF files come back labelled and wide. EMX and square FORTRAN files
    /// carry no labels and come back raw, as float32.
    pub fn read(&self) -> Result<MdfMatrix> {
        match self.format() {
            Some(FileFormat::Mdf) => self.read_mdf(OutputMode::default()),
            Some(FileFormat::Emx) => Ok(MdfMatrix::F32(self.read_emx(&ZoneSpec::Inferred, false)?)),
            Some(FileFormat::Fortran) => Ok(MdfMatrix::F32(
                self.read_fortran_square(&ZoneSpec::Inferred, false)?,
            )),
            None => Err(Error::UnknownFormat(self.path.display().to_string())),
        }
    }

    pub fn read_mdf(&self, mode: OutputMode) -> Result<MdfMatrix> {
        self.with_reader(|reader| mdf::read_mdf(reader, mode))
    }

    pub fn peek_mdf(&self) -> Result<Vec<AxisLabels>> {
        self.with_reader(|reader| mdf::peek_mdf(reader))
    }

    pub fn write_mdf<A: MatrixElement>(&self, input: &MatrixInput<A>) -> Result<()> {
        self.with_writer(|writer| mdf::write_mdf(writer, input))
    }

    pub fn write_mdf_native<A: MatrixElement>(&self, input: &MatrixInput<A>) -> Result<()> {
        self.with_writer(|writer| mdf::write_mdf_native(writer, input))
    }

    pub fn read_emx(&self, zones: &ZoneSpec, tall: bool) -> Result<Decoded<f32>> {
        self.with_reader(|reader| emx::read_emx(reader, zones, tall))
    }

    pub fn write_emx<A: MatrixElement>(&self, input: &MatrixInput<A>, emmebank_zones: i64) -> Result<()> {
        self.with_writer(|writer| emx::write_emx(writer, input, emmebank_zones))
    }

    pub fn read_fortran_square(&self, zones: &ZoneSpec, tall: bool) -> Result<Decoded<f32>> {
        self.with_reader(|reader| fortran::read_fortran_square(reader, zones, tall))
    }

    pub fn read_fortran_rectangle(
        &self,
        n_columns: i64,
        options: &FortranReadOptions,
    ) -> Result<Decoded<f32>> {
        self.with_reader(|reader| fortran::read_fortran_rectangle(reader, n_columns, options))
    }

    pub fn write_fortran<A: MatrixElement>(
        &self,
        input: &MatrixInput<A>,
        options: &FortranWriteOptions,
    ) -> Result<()> {
        self.with_writer(|writer| fortran::write_fortran(writer, input, options))
    }
}
