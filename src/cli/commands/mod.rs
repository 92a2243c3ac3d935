//! Command implementations

pub mod bom;
pub mod catalog;
pub mod category;
pub mod completions;
pub mod cost;
pub mod fixed;
pub mod hw;
pub mod init;
pub mod installments;
pub mod labor;
pub mod piece;
pub mod proposal;
pub mod rate;
pub mod reset;
pub mod service;
pub mod settings;
pub mod stats;
