//! Parse OpenAPI 3.x and Swagger 2.0 documents into one dialect-agnostic
//! model and build the navigation tree of an API reference site.
//!
//! ```no_run
//! let raw = apiref_core::parse::from_yaml(&std::fs::read_to_string("openapi.yaml")?)?;
//! let spec = apiref_core::parse_spec(&raw)?;
//! for endpoint in &spec.endpoints {
//!     println!("{} {} -> {}", endpoint.method, endpoint.path, endpoint.nav_path);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod model;
pub mod parse;
pub mod transform;

pub use cache::SpecCache;
pub use config::{CollisionPolicy, ParserConfig};
pub use error::{Diagnostic, ParseError};
pub use model::{ParsedSpec, get_endpoint_by_operation_id, get_endpoint_by_path};
pub use transform::SpecParser;
pub use transform::parse as parse_spec;
