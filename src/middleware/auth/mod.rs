pub mod access;
mod error;

pub use access::AccessGate;
pub use error::GateError;
