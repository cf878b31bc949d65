//! Kind-specific data of non-instruction values, and queries on
//! arguments, functions, basic blocks and constants.

use crate::error::fatal;
use crate::ir::classes::*;
use crate::ir::context::Context;
use crate::ir::entities::ValueKind;
use crate::ir::types::Type;

/// Data of function arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArgumentData {
  parent: Function,
  index: usize,
}

impl ArgumentData {
  pub(in crate::ir) fn new(parent: Function, index: usize) -> Self {
    Self { parent, index }
  }

  /// Returns the function that owns the argument.
  pub fn parent(&self) -> Function {
    self.parent
  }

  /// Returns the position of the argument in the parameter list.
  pub fn index(&self) -> usize {
    self.index
  }
}

/// Data of functions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionData {
  ty: Type,
  args: Vec<Argument>,
}

impl FunctionData {
  pub(in crate::ir) fn new(ty: Type) -> Self {
    Self { ty, args: Vec::new() }
  }

  /// Returns the function type (not the pointer type of the value).
  pub fn ty(&self) -> Type {
    self.ty
  }

  /// Returns the arguments.
  pub fn args(&self) -> &[Argument] {
    &self.args
  }

  pub(in crate::ir) fn args_mut(&mut self) -> &mut Vec<Argument> {
    &mut self.args
  }
}

/// Data of integer constants.
///
/// The value is stored zero-extended to 64 bits, bits beyond the width
/// are always zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConstantIntData {
  value: u64,
  width: u32,
}

impl ConstantIntData {
  pub(in crate::ir) fn new(value: u64, width: u32) -> Self {
    debug_assert!(width > 0 && width <= 64);
    Self {
      value: value & Self::mask(width),
      width,
    }
  }

  pub(in crate::ir) fn mask(width: u32) -> u64 {
    if width >= 64 {
      u64::MAX
    } else {
      (1 << width) - 1
    }
  }

  /// Returns the bit width.
  pub fn width(&self) -> u32 {
    self.width
  }

  /// Returns the value zero-extended to 64 bits.
  pub fn zext_value(&self) -> u64 {
    self.value
  }

  /// Returns the value sign-extended to 64 bits.
  pub fn sext_value(&self) -> i64 {
    let shift = 64 - self.width;
    ((self.value << shift) as i64) >> shift
  }
}

/// Data of floating point constants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConstantFpData {
  bits: u64,
}

impl ConstantFpData {
  pub(in crate::ir) fn new(value: f64) -> Self {
    Self {
      bits: value.to_bits(),
    }
  }

  pub(in crate::ir) fn bits(&self) -> u64 {
    self.bits
  }

  /// Returns the value.
  pub fn value(&self) -> f64 {
    f64::from_bits(self.bits)
  }
}

impl Argument {
  fn data(self, ctx: &Context) -> &ArgumentData {
    match ctx.value_data(self.value()).kind() {
      ValueKind::Argument(data) => data,
      _ => fatal!("argument without argument data"),
    }
  }

  /// Returns the function that owns the argument.
  pub fn parent(self, ctx: &Context) -> Function {
    self.data(ctx).parent()
  }

  /// Returns the position of the argument in the parameter list.
  pub fn index(self, ctx: &Context) -> usize {
    self.data(ctx).index()
  }
}

impl Function {
  fn data(self, ctx: &Context) -> &FunctionData {
    match ctx.value_data(self.value()).kind() {
      ValueKind::Function(data) => data,
      _ => fatal!("function without function data"),
    }
  }

  /// Returns the name of the function.
  pub fn name(self, ctx: &Context) -> &str {
    ctx.value_data(self.value()).name().unwrap_or_default()
  }

  /// Returns the function type.
  pub fn function_type(self, ctx: &Context) -> Type {
    self.data(ctx).ty()
  }

  /// Returns the arguments.
  pub fn args(self, ctx: &Context) -> &[Argument] {
    self.data(ctx).args()
  }

  /// Returns the basic blocks in layout order.
  pub fn basic_blocks(self, ctx: &Context) -> Vec<BasicBlock> {
    ctx.layout().bbs(self)
  }

  /// Returns the entry basic block, `None` if the function is a declaration.
  pub fn entry_bb(self, ctx: &Context) -> Option<BasicBlock> {
    ctx.layout().entry_bb(self)
  }

  /// Returns `true` if the function has no body.
  pub fn is_declaration(self, ctx: &Context) -> bool {
    self.entry_bb(ctx).is_none()
  }
}

impl BasicBlock {
  /// Returns the parent function, `None` if detached.
  pub fn parent(self, ctx: &Context) -> Option<Function> {
    ctx.layout().parent_func(self)
  }

  /// Returns the instructions in layout order.
  pub fn insts(self, ctx: &Context) -> Vec<Instruction> {
    ctx.layout().insts(self)
  }

  /// Returns the first instruction.
  pub fn front(self, ctx: &Context) -> Option<Instruction> {
    ctx.layout().front_inst(self)
  }

  /// Returns the last instruction.
  pub fn back(self, ctx: &Context) -> Option<Instruction> {
    ctx.layout().back_inst(self)
  }

  /// Returns the terminator, `None` if the last instruction is not
  /// a terminator or the basic block is empty.
  pub fn terminator(self, ctx: &Context) -> Option<TerminatorInst> {
    self.back(ctx).and_then(|inst| ctx.dyn_cast(inst.value()))
  }
}

impl ConstantInt {
  fn data(self, ctx: &Context) -> &ConstantIntData {
    match ctx.value_data(self.value()).kind() {
      ValueKind::ConstantInt(data) => data,
      _ => fatal!("integer constant without integer data"),
    }
  }

  /// Returns the bit width.
  pub fn width(self, ctx: &Context) -> u32 {
    self.data(ctx).width()
  }

  /// Returns the value zero-extended to 64 bits.
  pub fn zext_value(self, ctx: &Context) -> u64 {
    self.data(ctx).zext_value()
  }

  /// Returns the value sign-extended to 64 bits.
  pub fn sext_value(self, ctx: &Context) -> i64 {
    self.data(ctx).sext_value()
  }
}

impl ConstantFp {
  /// Returns the value.
  pub fn value_f64(self, ctx: &Context) -> f64 {
    match ctx.value_data(self.value()).kind() {
      ValueKind::ConstantFp(data) => data.value(),
      _ => fatal!("floating point constant without data"),
    }
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn integer_extension() {
    let c = ConstantIntData::new(0xff, 8);
    assert_eq!(c.zext_value(), 255);
    assert_eq!(c.sext_value(), -1);
    let c = ConstantIntData::new(0x1ff, 8);
    assert_eq!(c.zext_value(), 0xff);
    let c = ConstantIntData::new(1, 1);
    assert_eq!(c.sext_value(), -1);
    let c = ConstantIntData::new(u64::MAX, 64);
    assert_eq!(c.zext_value(), u64::MAX);
    assert_eq!(c.sext_value(), -1);
    let c = ConstantIntData::new(5, 32);
    assert_eq!(c.sext_value(), 5);
  }

  #[test]
  fn fp_bits() {
    let c = ConstantFpData::new(1.5);
    assert_eq!(c.value(), 1.5);
    assert_eq!(c.bits(), 1.5f64.to_bits());
  }
}
