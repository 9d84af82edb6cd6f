pub mod navigation;
pub mod normalize;
pub mod operation;
pub mod security;
pub mod spec_parser;

pub use navigation::{Navigation, NavigationGenerator, group_title, slugify};
pub use normalize::{SchemaFragment, normalize};
pub use operation::{DialectOperation, OperationContext, parse_operation};
pub use spec_parser::{SpecParser, parse};
