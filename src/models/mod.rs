mod checkout;
mod drop;
mod product;
mod stock;

pub use checkout::*;
pub use drop::*;
pub use product::*;
pub use stock::*;
