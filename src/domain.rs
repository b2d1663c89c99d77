// Domain layer modules
pub mod access_policy;
pub mod access_request;
pub mod entity_reference;
pub mod extension;

// Re-exports
pub use access_policy::AccessViolation;
pub use access_request::AccessRequest;
pub use entity_reference::{EntityReference, ParsedReference, ReferenceParseError};
pub use extension::{Extension, Reference};
