//! Ready-made schema trees for the sport inserts we support.
//!
//! Each sport is a plain struct of [`Field`](crate::Field) and
//! [`BooleanField`](crate::BooleanField) leaves addressed at the item numbers
//! the console transmits for that insert. Feed decoded packets to a tree with
//! [`apply`](crate::apply) and read or subscribe to the leaves directly.

mod common;

pub mod basketball;
pub mod volleyball;

pub use basketball::Basketball;
pub use common::{GameClock, Horn, Timeouts};
pub use volleyball::Volleyball;
