//! Query language AST and parsing utilities
//!
//! The query language accepted by the engine is a brace-delimited
//! selection set: each selection is a field name with an optional alias
//! (`alias: field`), an optional parenthesized argument list
//! (`name: literal`) and an optional nested selection set.
//!
//! ```rust
//! use graphql_query_parser::parse_query;
//!
//! let document = parse_query("{actor{favDishes(size: 2, prefix: \"b\")}}").unwrap();
//! assert_eq!(document.selection_set.items[0].name, "actor");
//! ```
//!
//! Argument lists carry no ordering requirement: two lists with the same
//! name/literal pairs compare equal no matter the order they were written
//! in, and execute identically.

mod error;
mod grammar;
mod lexer;

pub mod ast;

pub use error::ParseError;
pub use grammar::{parse_query, parse_query_with_depth_limit, DEFAULT_DEPTH_LIMIT};
pub use lexer::Pos;
