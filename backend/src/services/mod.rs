//! Business logic services for the inventory planner

pub mod product;
pub mod product_material;
pub mod production;
pub mod raw_material;

pub use product::ProductService;
pub use product_material::ProductMaterialService;
pub use production::ProductionService;
pub use raw_material::RawMaterialService;
