//! HTTP request handlers for the inventory planner

pub mod health;
pub mod product_materials;
pub mod production;
pub mod products;
pub mod raw_materials;

pub use health::*;
pub use product_materials::*;
pub use production::*;
pub use products::*;
pub use raw_materials::*;
