//! HTTP handlers for the meat shop inventory system

pub mod category;
pub mod customer;
pub mod dashboard;
pub mod health;
pub mod inventory;
pub mod pieces;
pub mod product;
pub mod purchase;
pub mod sale;
pub mod vendor;
pub mod waste;

pub use category::*;
pub use customer::*;
pub use dashboard::*;
pub use health::*;
pub use inventory::*;
pub use pieces::*;
pub use product::*;
pub use purchase::*;
pub use sale::*;
pub use vendor::*;
pub use waste::*;
