//! The in-memory form of the IR.
//!
//! A [`Context`] owns everything: canonical types ([`Type`]) in its
//! [`TypeTable`](type_table::TypeTable), and values ([`Value`]) in its
//! [`DataFlowGraph`](dfg::DataFlowGraph), whose use-def chains are kept
//! up to date by every mutation.
//!
//! # Example
//!
//! ```
//! use llir::ir::{BinaryOperator, Context, Opcode};
//!
//! let mut ctx = Context::new();
//! let i32_ty = ctx.types().int32();
//! let fn_ty = ctx.function_type(i32_ty, &[i32_ty], false).unwrap();
//! let func = ctx.new_function("double", fn_ty).unwrap();
//! let entry = ctx.new_bb(Some("entry"));
//! ctx.append_bb(func, entry).unwrap();
//!
//! let x = func.args(&ctx)[0].value();
//! let sum = ctx.build().at_end(entry).binary(Opcode::Add, x, x).unwrap();
//! ctx.build().at_end(entry).ret(Some(sum.value())).unwrap();
//!
//! assert_eq!(ctx.num_uses(x), 2);
//! assert!(ctx.isa::<BinaryOperator>(sum.value()));
//! ```

pub mod builder;
pub mod classes;
pub mod context;
pub mod dfg;
pub mod entities;
pub mod instructions;
pub mod layout;
pub mod type_table;
pub mod types;
pub mod uses;
pub mod values;

mod idman;

pub use builder::{InsertPoint, InstBuilder};
pub use classes::*;
pub use context::Context;
pub use entities::{Value, ValueData, ValueKind};
pub use instructions::{
  CallingConv, FloatPredicate, IntPredicate, Opcode, OpcodeCategory, TailCallKind,
};
pub use type_table::{TypeTable, MAX_INT_BITS, MIN_INT_BITS};
pub use types::{Type, TypeData, TypeKind};
pub use uses::{Arity, Use, UseData};
