//! Translation between remote action definitions, form fields and execute requests

pub mod demo;
pub mod extract;
pub mod humanize;
pub mod node;
pub mod parser;
pub mod request;

pub use demo::{autofill, generate};
pub use extract::{locate_body_schema, LocatedSchema, SCHEMA_LOCATIONS};
pub use humanize::humanize_field_name;
pub use node::SchemaNode;
pub use parser::{detect_http_method, generic_schema, parse_action_schema};
pub use request::{build_request, set_nested_value};
