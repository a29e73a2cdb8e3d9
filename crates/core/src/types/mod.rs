//! Type-safe wrappers for domain primitives.
//!
//! # Design Principles
//!
//! 1. **Newtype pattern**: Wrap primitives to prevent mixing incompatible
//!    values (e.g., an `OrderId` where a `ProductId` is expected)
//! 2. **Validation at boundaries**: Parse, don't validate - constructors
//!    reject invalid data
//! 3. **Zero-cost**: Wrappers compile away; serde sees the inner value

mod id;
mod phone;
mod price;
mod status;

pub use id::{OrderId, PaymentId, ProductId, TransactionRef, UserId};
pub use phone::{Phone, PhoneError};
pub use price::{CurrencyCode, Price};
pub use status::{OrderStatus, PaymentStatus, UserRole};
