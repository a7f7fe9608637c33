//! Infrastructure Layer
//!
//! Database implementations and external service integrations.

pub mod media;
pub mod memory;
pub mod postgres;

pub use media::HttpMediaGateway;
pub use memory::InMemoryUserRepository;
pub use postgres::PgUserRepository;
