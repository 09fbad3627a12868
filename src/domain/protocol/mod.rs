//! Protocol module - generation/format resolution and fixed wire names.

mod generation;
pub mod names;
mod resolver;

pub use generation::{ApiGeneration, ProtocolContext, SourceFormat};
pub use names::{
    BuiltInArgName, SignInStatus, StandardIntent, SupportedPermission,
    TransactionRequirementsResult,
};
pub use resolver::VersionResolver;
