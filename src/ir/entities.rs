//! IR entities: values ([`Value`], [`ValueData`]) and their kinds
//! ([`ValueKind`]).

use crate::ir::idman::{ContextId, ValueId};
use crate::ir::instructions::InstData;
use crate::ir::types::Type;
use crate::ir::uses::{OperandList, Use};
use crate::ir::values::*;

/// A handle of an IR value.
///
/// You can fetch [`ValueData`] from the
/// [`DataFlowGraph`](crate::ir::dfg::DataFlowGraph) of the context that
/// created this handle.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Value {
  ctx: ContextId,
  id: ValueId,
}

impl Value {
  pub(in crate::ir) fn new(ctx: ContextId, id: ValueId) -> Self {
    Self { ctx, id }
  }

  pub(in crate::ir) fn ctx(self) -> ContextId {
    self.ctx
  }

  /// Returns the ID of the value, unique in its context.
  pub fn id(self) -> u32 {
    self.id.get()
  }
}

/// Data of IR values.
///
/// `ValueData` holds the type, the name and the kind of a value, the
/// operands if the value is a user, and the head of its use list.
#[derive(Debug)]
pub struct ValueData {
  ty: Type,
  name: Option<String>,
  kind: ValueKind,
  pub(in crate::ir) operands: OperandList,
  pub(in crate::ir) first_use: Option<Use>,
  pub(in crate::ir) num_uses: usize,
}

impl ValueData {
  pub(in crate::ir) fn new(ty: Type, kind: ValueKind, operands: OperandList) -> Self {
    Self {
      ty,
      name: None,
      kind,
      operands,
      first_use: None,
      num_uses: 0,
    }
  }

  /// Returns the type of the value.
  pub fn ty(&self) -> Type {
    self.ty
  }

  /// Returns the name of the value.
  pub fn name(&self) -> Option<&str> {
    self.name.as_deref()
  }

  pub(in crate::ir) fn set_name(&mut self, name: Option<String>) {
    self.name = name;
  }

  /// Returns the kind of the value.
  pub fn kind(&self) -> &ValueKind {
    &self.kind
  }

  pub(in crate::ir) fn kind_mut(&mut self) -> &mut ValueKind {
    &mut self.kind
  }

  /// Returns the operand slots, empty if the value is not a user.
  pub fn operands(&self) -> &[Use] {
    self.operands.as_slice()
  }

  /// Returns the number of uses of the value.
  pub fn num_uses(&self) -> usize {
    self.num_uses
  }

  /// Returns `true` if the value has operands.
  pub fn is_user(&self) -> bool {
    self.operands.is_user()
  }
}

/// Kind of IR values.
///
/// The kind of a value is fixed at construction.
#[derive(Clone, Debug, PartialEq)]
pub enum ValueKind {
  /// Function argument.
  Argument(ArgumentData),
  /// Basic block.
  BasicBlock,
  /// Function.
  Function(FunctionData),
  /// Integer constant.
  ConstantInt(ConstantIntData),
  /// Floating point constant.
  ConstantFp(ConstantFpData),
  /// Null pointer constant.
  ConstantNull,
  /// Undefined value.
  Undef,
  /// Instruction.
  Instruction(InstData),
}

impl ValueKind {
  /// Returns `true` if the kind is a constant kind.
  pub fn is_constant(&self) -> bool {
    matches!(
      self,
      ValueKind::ConstantInt(..)
        | ValueKind::ConstantFp(..)
        | ValueKind::ConstantNull
        | ValueKind::Undef
    )
  }

  /// Returns `true` if values of the kind have operands.
  pub fn is_user(&self) -> bool {
    matches!(self, ValueKind::Instruction(..))
  }
}
