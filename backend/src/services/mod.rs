//! Business logic services for the meat shop inventory system

pub mod category;
pub mod customer;
pub mod inventory;
pub mod ledger;
pub mod pieces;
pub mod product;
pub mod purchase;
pub mod reporting;
pub mod sale;
pub mod vendor;
pub mod waste;

pub use category::CategoryService;
pub use customer::CustomerService;
pub use inventory::InventoryService;
pub use ledger::LedgerService;
pub use pieces::PiecesService;
pub use product::ProductService;
pub use purchase::PurchaseService;
pub use reporting::ReportingService;
pub use sale::SaleService;
pub use vendor::VendorService;
pub use waste::WasteService;
