pub mod content;
pub mod error;
pub mod format;
pub mod lifecycle;
pub mod listing;
pub mod selection;
pub mod session;
pub mod views;

pub use content::{ContentKind, Record};
pub use error::Error;
pub use listing::{ListQuery, ListResult, Listable, SortDirection, SortPreset};
pub use session::{Access, AuthUser, IdentityProvider, Session, SessionGate};

pub type Result<T, E = Error> = std::result::Result<T, E>;
