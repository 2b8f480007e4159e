//! Format constants shared by the read and write paths

/// Size of one on-disk word (u32, i32 and f32 alike)
pub const WORD_SIZE: usize = 4;

/// MDF ("matrix data file") constants
pub mod mdf {
    /// Magic number opening every MDF file
    pub const MAGIC: u32 = 0xC4D4_F1B2;

    /// The only format version understood
    pub const VERSION: u32 = 1;

    /// Fixed preamble: magic, version, data type, ndim
    pub const HEADER_SIZE: usize = 16;

    /// Highest dimensionality stored in MDF files
    pub const MAX_NDIM: u32 = 2;

    /// Data type code table, in code order
    pub const DATA_TYPE_CODES: [u32; 4] = [1, 2, 3, 4];
}

/// FORTRAN "simple binary" constants
pub mod fortran {
    /// Row tags are 1-based
    pub const INDEX_BASE: i64 = 1;

    /// Words preceding the data in every row
    pub const TAG_WORDS: usize = 1;
}

/// Name of the mapping written to OMX containers unless told otherwise
pub const DEFAULT_OMX_MAPPING: &str = "zone_numbers";
