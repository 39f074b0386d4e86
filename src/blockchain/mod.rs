// src/blockchain/mod.rs

pub mod chains;
pub mod models;
pub mod services;

pub use chains::{Chain, FraxChain};
