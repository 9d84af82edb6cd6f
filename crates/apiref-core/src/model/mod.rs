pub mod endpoint;
pub mod navigation;
pub mod schema;
pub mod spec;

pub use endpoint::*;
pub use navigation::NavigationNode;
pub use schema::{AdditionalProperties, SchemaNode, SchemaType, TypeSet, UnifiedSchema};
pub use spec::{ApiInfo, DeclaredTag, ParsedSpec, get_endpoint_by_operation_id, get_endpoint_by_path};
