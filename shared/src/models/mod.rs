//! Domain models for the inventory production planner

mod product;
mod product_material;
mod production;
mod raw_material;

pub use product::*;
pub use product_material::*;
pub use production::*;
pub use raw_material::*;
