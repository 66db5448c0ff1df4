mod log;
mod order;

pub use log::{ChangeType, OrderLog};
pub use order::{NewOrder, OrderPatch, OrderStatus, OrderType, Priority, ProviderType, ServiceOrder};
