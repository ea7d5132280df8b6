pub mod compiler;
pub mod error;
pub mod ports;
pub mod project;
pub mod quality;

pub use error::DomainError;
