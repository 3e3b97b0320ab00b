pub mod picnic;

pub use picnic::{Picnic, Picnic2L1Fs, Picnic2L3Fs, Picnic2L5Fs};
