// Style DSL Parser Module

pub mod categories;
pub mod labels;
pub mod layout;
pub mod lexer;
pub mod pipeline;

// Public API re-exports
pub use pipeline::{parse_commands, parse_style, StyleCommand};
