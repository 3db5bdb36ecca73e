//! Domain models for the pharmacy catalog and stock ledger.

mod category;
mod lenient;
mod medicine;
mod stock;

pub use category::*;
pub use medicine::*;
pub use stock::*;
