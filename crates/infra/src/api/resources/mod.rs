//! Typed resources returned by domain calls

pub mod product;

pub use product::Product;
