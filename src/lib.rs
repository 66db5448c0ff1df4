pub mod audit;
pub mod cli;
pub mod cpf;
pub mod entity;
pub mod error;
pub mod import;
pub mod overview;
pub mod service;
pub mod sla;
pub mod store;

pub use error::{OrdemError, Result};
pub use service::OrderService;
pub use store::OrderStore;
