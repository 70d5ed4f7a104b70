//! Data models shared by the pricing service and its clients

pub mod dynamic_price;
pub mod menu;

pub use dynamic_price::DynamicPrice;
pub use menu::{InventoryLevel, MenuItem};
