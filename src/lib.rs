//! Grammar-Solver generates random sentences from simple BNF-style grammars.
//!
//! A grammar is a list of rule lines of the form `<symbol>::=alt1|alt2|...`,
//! where each alternative is a whitespace-separated sequence of tokens. A
//! token that is itself a defined symbol is expanded recursively; any other
//! token is emitted as written.
//!
//! # Example
//!
//! ```rust
//! use grammar_solver::GrammarSolver;
//!
//! let grammar = GrammarSolver::build([
//!     "<greeting>::=Hello <subject>",
//!     "<subject>::=world|Rust programmers",
//! ])
//! .unwrap();
//!
//! assert!(grammar.contains("<subject>").unwrap());
//! assert_eq!(grammar.symbols(), "[<greeting>, <subject>]");
//!
//! let text = grammar.generate("<greeting>").unwrap();
//! assert!(text == "Hello world" || text == "Hello Rust programmers");
//! ```

pub mod grammar;
pub mod utils;

pub use grammar::{GrammarSolver, Production};
pub use utils::{GrammarError, RandomPick, Result, RngPick};
