// Application layer: the ledger operations every client goes through.
// The CLI never touches the repository directly.

pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
