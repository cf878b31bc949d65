//! Typed value handles and safe downcasting ([`ValueClass`]).
//!
//! Every value carries a [`ValueKind`] fixed at construction. A value class
//! is a typed wrapper of [`Value`] together with a static predicate on
//! [`ValueKind`], so checking whether a value belongs to a class never
//! needs an instance of the class. For instruction classes the predicate
//! is an interval test on the opcode number.
//!
//! Use [`Context::isa`](crate::ir::Context::isa),
//! [`Context::dyn_cast`](crate::ir::Context::dyn_cast) and
//! [`Context::cast`](crate::ir::Context::cast) to downcast values.

use crate::ir::entities::{Value, ValueKind};
use crate::ir::instructions::Opcode;

/// A class of values.
pub trait ValueClass: Copy + Into<Value> {
  /// Returns `true` if values of the given kind belong to the class.
  fn classof(kind: &ValueKind) -> bool;

  /// Wraps the given value without checking its kind.
  #[doc(hidden)]
  fn from_value_unchecked(value: Value) -> Self;
}

impl ValueClass for Value {
  #[inline]
  fn classof(_: &ValueKind) -> bool {
    true
  }

  #[inline]
  fn from_value_unchecked(value: Value) -> Self {
    value
  }
}

/// Defines a value class and its upcasts.
macro_rules! value_class {
  ($(#[$attr:meta])* $name:ident $(: $($parent:ident),+)?, |$kind:ident| $pred:expr) => {
    $(#[$attr])*
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    pub struct $name(Value);

    impl $name {
      /// Returns the underlying value handle.
      #[inline]
      pub fn value(self) -> Value {
        self.0
      }
    }

    impl ValueClass for $name {
      #[inline]
      fn classof($kind: &ValueKind) -> bool {
        $pred
      }

      #[inline]
      fn from_value_unchecked(value: Value) -> Self {
        Self(value)
      }
    }

    impl From<$name> for Value {
      #[inline]
      fn from(v: $name) -> Self {
        v.0
      }
    }

    $($(
      impl From<$name> for $parent {
        #[inline]
        fn from(v: $name) -> Self {
          $parent(v.0)
        }
      }
    )+)?
  };
}

#[inline]
fn has_opcode(kind: &ValueKind, opcode: Opcode) -> bool {
  kind.opcode() == Some(opcode)
}

value_class!(
  /// Values that use other values, i.e. instructions.
  User,
  |kind| kind.opcode().is_some()
);

value_class!(
  /// Constants, uniqued by the context.
  Constant,
  |kind| matches!(
    kind,
    ValueKind::ConstantInt(..) | ValueKind::ConstantFp(..) | ValueKind::ConstantNull | ValueKind::Undef
  )
);

value_class!(
  /// Integer constants.
  ConstantInt: Constant,
  |kind| matches!(kind, ValueKind::ConstantInt(..))
);

value_class!(
  /// Floating point constants.
  ConstantFp: Constant,
  |kind| matches!(kind, ValueKind::ConstantFp(..))
);

value_class!(
  /// Null pointer constants.
  ConstantPointerNull: Constant,
  |kind| matches!(kind, ValueKind::ConstantNull)
);

value_class!(
  /// Undefined values.
  UndefValue: Constant,
  |kind| matches!(kind, ValueKind::Undef)
);

value_class!(
  /// Function arguments.
  Argument,
  |kind| matches!(kind, ValueKind::Argument(..))
);

value_class!(
  /// Basic blocks.
  BasicBlock,
  |kind| matches!(kind, ValueKind::BasicBlock)
);

value_class!(
  /// Functions.
  Function,
  |kind| matches!(kind, ValueKind::Function(..))
);

value_class!(
  /// Instructions.
  Instruction: User,
  |kind| kind.opcode().is_some()
);

value_class!(
  /// Instructions that end basic blocks.
  TerminatorInst: Instruction, User,
  |kind| kind.opcode().map_or(false, Opcode::is_terminator)
);

value_class!(
  /// Binary operators.
  BinaryOperator: Instruction, User,
  |kind| kind.opcode().map_or(false, Opcode::is_binary_op)
);

value_class!(
  /// Cast operators.
  CastInst: Instruction, User,
  |kind| kind.opcode().map_or(false, Opcode::is_cast)
);

value_class!(
  /// Comparisons.
  CmpInst: Instruction, User,
  |kind| has_opcode(kind, Opcode::ICmp) || has_opcode(kind, Opcode::FCmp)
);

value_class!(
  /// Integer comparisons.
  ICmpInst: CmpInst, Instruction, User,
  |kind| has_opcode(kind, Opcode::ICmp)
);

value_class!(
  /// Floating point comparisons.
  FCmpInst: CmpInst, Instruction, User,
  |kind| has_opcode(kind, Opcode::FCmp)
);

value_class!(
  /// Function returns.
  ReturnInst: TerminatorInst, Instruction, User,
  |kind| has_opcode(kind, Opcode::Ret)
);

value_class!(
  /// Conditional and unconditional branches.
  BranchInst: TerminatorInst, Instruction, User,
  |kind| has_opcode(kind, Opcode::Br)
);

value_class!(
  /// Multi-way branches.
  SwitchInst: TerminatorInst, Instruction, User,
  |kind| has_opcode(kind, Opcode::Switch)
);

value_class!(
  /// Unreachable markers.
  UnreachableInst: TerminatorInst, Instruction, User,
  |kind| has_opcode(kind, Opcode::Unreachable)
);

value_class!(
  /// Stack allocations.
  AllocaInst: Instruction, User,
  |kind| has_opcode(kind, Opcode::Alloca)
);

value_class!(
  /// Memory loads.
  LoadInst: Instruction, User,
  |kind| has_opcode(kind, Opcode::Load)
);

value_class!(
  /// Memory stores.
  StoreInst: Instruction, User,
  |kind| has_opcode(kind, Opcode::Store)
);

value_class!(
  /// Address computations.
  GetElementPtrInst: Instruction, User,
  |kind| has_opcode(kind, Opcode::GetElementPtr)
);

value_class!(
  /// Phi functions.
  PhiNode: Instruction, User,
  |kind| has_opcode(kind, Opcode::Phi)
);

value_class!(
  /// Function calls.
  CallInst: Instruction, User,
  |kind| has_opcode(kind, Opcode::Call)
);

value_class!(
  /// Selections.
  SelectInst: Instruction, User,
  |kind| has_opcode(kind, Opcode::Select)
);
