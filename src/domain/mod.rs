pub mod classify;
mod error;
mod record;
pub mod reload;
pub mod ssl;
pub mod template;

pub use error::AppError;
pub use record::DomainRecord;
pub use reload::{ReloadAction, ReloadPolicy};
pub use ssl::{CertificateLifecycle, SslListener};
