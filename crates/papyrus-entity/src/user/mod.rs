//! User accounts and the permission context derived from them.

pub mod account;
pub mod context;
pub mod model;

pub use account::{AccountType, Permission};
pub use context::UserContext;
pub use model::{NewUser, UserAccount};
