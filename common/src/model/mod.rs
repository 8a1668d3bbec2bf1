//! Domain models for the crypto tracker

pub mod market;
pub mod settings;
