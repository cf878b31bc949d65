//! Canonical types and use-def graphs for an SSA compiler IR.
//!
//! This library provides the substrate of an LLVM-like intermediate
//! representation:
//!
//! * A canonical type table. Structurally identical types are created
//!   once per context, so comparing types is comparing handles.
//! * A value graph that records every use of every value, and supports
//!   operand rewriting and replacing all uses of a value in time
//!   proportional to the number of uses.
//! * Safe downcasting of values by kind tags and opcode ranges.
//! * Ordered basic blocks and instructions.
//!
//! Parsing, printing and optimizing the IR are not part of this library.
//!
//! # Errors
//!
//! Recoverable errors are reported as [`error::Error`]. Broken invariants,
//! such as erasing a value that is still used, are reported by
//! [`error::report_fatal_error`], which panics.

pub mod error;
pub mod ir;
