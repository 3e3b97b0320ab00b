//! Block ciphers

pub mod lowmc;
