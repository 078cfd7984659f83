//! Repository abstractions for data access.

pub mod audit;
pub mod configuration;
pub mod etat;
pub mod source;

pub use audit::AuditRepository;
pub use configuration::ConfigurationRepository;
pub use etat::EtatRepository;
pub use source::SourceRepository;
