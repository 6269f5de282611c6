//! YAML catalog parsing support

pub mod diagnostics;

pub use diagnostics::{parse_yaml, YamlSyntaxError};
