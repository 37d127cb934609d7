//! Domain models for the Meat Inventory System

pub mod category;
pub mod customer;
pub mod product;
pub mod purchase;
pub mod sale;
pub mod summary;
pub mod tracking;
pub mod vendor;

pub use category::MainCategory;
pub use customer::Customer;
pub use product::{DerivedProduct, SaleUnit};
pub use purchase::PurchaseLot;
pub use sale::{PaymentMethod, Sale, SaleItem};
pub use summary::{AlertLevel, CategorySummary, StockThresholds};
pub use tracking::{PiecesTracking, WasteRecord};
pub use vendor::Vendor;
