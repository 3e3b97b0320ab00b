//! Parameter sets for the picnic library
//!
//! A parameter set is an immutable record; every engine component reads its
//! sizes from one. Presets live in [`pqc::picnic`].

pub mod pqc;

pub use pqc::picnic::{
    ConfigError, HashVariant, ParameterSet, Picnic2L1FsParams, Picnic2L3FsParams,
    Picnic2L5FsParams, PicnicSchemeParams, PICNIC2_L1_FS, PICNIC2_L3_FS, PICNIC2_L5_FS,
};
