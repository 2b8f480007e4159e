//! MDF codec
//!
//! Self-describing matrix files: a 16-byte preamble, the axis lengths, one
//! i32 label array per axis and a row-major payload whose element type is
//! named in the preamble.
//!
//! The magic number is read and checked on its own so that a stream which
//! is not an MDF file is rejected after exactly four bytes.

use std::io::{Read, Write};

use ndarray::{Array1, Array2, ArrayD, IxDyn};
use tracing::{debug, warn};
use zonemat_core::{DataType, FormatError, MatrixElement, MdfHeader, MdfShape};

use crate::binary::{read_elements, read_word, read_words, write_elements};
use crate::coerce::{coerce_labeled, narrow_to_f32};
use crate::error::Result;
use crate::labels::AxisLabels;
use crate::matrix::{Decoded, Frame, MatrixInput, MdfMatrix, Orientation, OutputMode, Series};

/// Preamble, shape and labels of an MDF stream
struct MdfPrefix {
    data_type: DataType,
    shape: MdfShape,
    labels: Vec<AxisLabels>,
}

fn read_prefix<R: Read + ?Sized>(reader: &mut R) -> Result<MdfPrefix> {
    let magic = read_word(reader)?;
    MdfHeader::check_magic(magic)?;

    let rest = read_words(reader, 3)?;
    let header = MdfHeader {
        magic,
        version: rest[0],
        data_type: rest[1],
        ndim: rest[2],
    };
    header.validate()?;
    let data_type = header.element_type()?;

    let dims = read_words(reader, header.ndim as usize)?;
    let shape = match dims.as_slice() {
        [len] => MdfShape::vector(*len),
        [rows, cols] => MdfShape::matrix(*rows, *cols),
        _ => return Err(FormatError::InvalidDimension(dims.len() as i64).into()),
    };

    let mut labels = Vec::with_capacity(shape.ndim());
    for &len in shape.dims() {
        labels.push(AxisLabels::new(read_elements::<i32, _>(reader, len as usize)?));
    }

    Ok(MdfPrefix {
        data_type,
        shape,
        labels,
    })
}

fn decode_payload<A: MatrixElement, R: Read + ?Sized>(
    reader: &mut R,
    prefix: MdfPrefix,
    mode: OutputMode,
) -> Result<Decoded<A>> {
    let count = prefix.shape.element_count()?;
    let values = read_elements::<A, _>(reader, count)?;

    let dims: Vec<usize> = prefix.shape.dims().iter().map(|&d| d as usize).collect();
    let mut labels = prefix.labels.into_iter();

    let decoded = match mode {
        OutputMode::Raw(orientation) => {
            let shape = match orientation {
                Orientation::Tall => vec![count],
                Orientation::Wide => dims,
            };
            let array = ArrayD::from_shape_vec(IxDyn(&shape), values)
                .map_err(|_| FormatError::SizeOverflow)?;
            Decoded::Raw(array)
        }
        OutputMode::Labeled(orientation) => {
            let rows = labels.next().unwrap_or_default();
            match labels.next() {
                None => Decoded::Series(Series::new(Array1::from(values), rows)?),
                Some(cols) => {
                    let data = Array2::from_shape_vec((dims[0], dims[1]), values)
                        .map_err(|_| FormatError::SizeOverflow)?;
                    let frame = Frame::new(data, rows, cols)?;
                    match orientation {
                        Orientation::Wide => Decoded::Wide(frame),
                        Orientation::Tall => Decoded::Tall(frame.stack()),
                    }
                }
            }
        }
    };
    Ok(decoded)
}

/// Read an MDF matrix
///
/// `Raw(Tall)` returns the flat payload, `Raw(Wide)` the payload in the
/// declared shape. Labelled modes return a [`Series`] for 1-D files and a
/// frame (or its tall form) for 2-D files.
pub fn read_mdf<R: Read + ?Sized>(reader: &mut R, mode: OutputMode) -> Result<MdfMatrix> {
    let prefix = read_prefix(reader)?;
    let data_type = prefix.data_type;
    debug!(%data_type, dims = ?prefix.shape.dims(), ?mode, "decoding MDF matrix");

    let matrix = match data_type {
        DataType::F32 => MdfMatrix::F32(decode_payload(reader, prefix, mode)?),
        DataType::F64 => MdfMatrix::F64(decode_payload(reader, prefix, mode)?),
        DataType::I32 => MdfMatrix::I32(decode_payload(reader, prefix, mode)?),
        DataType::U32 => MdfMatrix::U32(decode_payload(reader, prefix, mode)?),
    };
    Ok(matrix)
}

/// Read only the axis labels of an MDF stream, one sequence per axis
///
/// No payload byte is read.
pub fn peek_mdf<R: Read + ?Sized>(reader: &mut R) -> Result<Vec<AxisLabels>> {
    let prefix = read_prefix(reader)?;
    debug!(dims = ?prefix.shape.dims(), "peeked MDF labels");
    Ok(prefix.labels)
}

fn write_frame<A: MatrixElement, W: Write + ?Sized>(writer: &mut W, frame: &Frame<A>) -> Result<()> {
    let (rows, cols) = frame.dim();
    let header = MdfHeader::new(A::DATA_TYPE, 2);

    writer.write_all(&header.to_bytes())?;
    write_elements(writer, [rows as u32, cols as u32])?;
    write_elements(writer, frame.rows().iter().copied())?;
    write_elements(writer, frame.cols().iter().copied())?;
    write_elements(writer, frame.data().iter().copied())?;

    debug!(data_type = %A::DATA_TYPE, rows, cols, "encoded MDF matrix");
    Ok(())
}

/// Write a labelled matrix as float32 MDF
///
/// The payload is always stored as float32, so wider inputs lose
/// precision. Use [`write_mdf_native`] to keep the input element type.
/// Raw buffers are rejected with `RawNotAllowed`.
pub fn write_mdf<A: MatrixElement, W: Write + ?Sized>(
    writer: &mut W,
    input: &MatrixInput<A>,
) -> Result<()> {
    let frame = coerce_labeled(input, false)?;
    if A::DATA_TYPE != DataType::F32 {
        warn!(from = %A::DATA_TYPE, "narrowing MDF payload to f32");
    }

    let (data, rows, cols) = frame.into_parts();
    let narrowed = Frame::new(narrow_to_f32(&data), rows, cols)?;
    write_frame(writer, &narrowed)
}

/// Write a labelled matrix as MDF in its own element type
pub fn write_mdf_native<A: MatrixElement, W: Write + ?Sized>(
    writer: &mut W,
    input: &MatrixInput<A>,
) -> Result<()> {
    let frame = coerce_labeled(input, false)?;
    write_frame(writer, &frame)
}
