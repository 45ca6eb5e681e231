//! Business services
//!
//! Each service owns a pool handle and the server clock; handlers call
//! them and never touch repositories directly.

pub mod availability;
pub mod contact_service;
pub mod dashboard;
pub mod menu_service;
pub mod order_service;
pub mod reservation_service;
pub mod seed;
pub mod table_registry;

pub use availability::AvailabilityChecker;
pub use contact_service::ContactService;
pub use dashboard::DashboardService;
pub use menu_service::MenuService;
pub use order_service::OrderService;
pub use reservation_service::ReservationService;
pub use table_registry::TableRegistry;
