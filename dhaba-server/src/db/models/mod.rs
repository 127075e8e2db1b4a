//! Database Models

// Serde helpers
pub mod serde_helpers;

// Catalog
pub mod product;

// Location
pub mod dining_table;

// Orders
pub mod order;

// Staff
pub mod user;

// Settings
pub mod restaurant;

// Re-exports
pub use dining_table::{DiningTable, DiningTableCreate, DiningTableUpdate};
pub use order::{Order, OrderItemLine, OrderPaymentInfo, OrderStatus};
pub use product::{FoodType, Product, ProductCreate, ProductUpdate};
pub use restaurant::{Restaurant, RestaurantUpdate};
pub use user::{User, UserCreate, UserResponse, UserUpdate};
