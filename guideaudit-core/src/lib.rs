pub mod aggregate;
pub mod audit;
pub mod config;
pub mod error;
pub mod export;
pub mod harvest;
pub mod redirects;
pub mod report;
pub mod resolve;

pub use aggregate::{Referrer, UrlUsageIndex};
pub use audit::{AuditReport, execute_audit, generate_audit_summary};
pub use config::AuditOptions;
pub use error::{AuditError, Result};
pub use harvest::HarvestedPage;
pub use redirects::KnownRedirectSet;
pub use resolve::{Resolution, ResolutionOutcome};
