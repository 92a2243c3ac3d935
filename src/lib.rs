//! JQT: Joinery Quote Toolkit
//!
//! Costing and pricing for custom furniture jobs. A project is a plain-text
//! YAML store of catalogs, cut pieces and hardware; the engine turns it
//! into material, labor and overhead costs, a sales price, a bill of
//! materials and a card installment table.

pub mod cli;
pub mod core;
pub mod engine;
pub mod entities;
pub mod render;
pub mod yaml;
