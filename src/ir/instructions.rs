//! Instruction opcodes ([`Opcode`]), comparison predicates and
//! instruction-specific queries.
//!
//! Opcodes are numbered so that every instruction category occupies one
//! contiguous range:
//!
//! | category   | range                                  |
//! |------------|----------------------------------------|
//! | terminator | [`TERM_OPS_BEGIN`], [`TERM_OPS_END`]     |
//! | binary     | [`BINARY_OPS_BEGIN`], [`BINARY_OPS_END`] |
//! | memory     | [`MEMORY_OPS_BEGIN`], [`MEMORY_OPS_END`] |
//! | cast       | [`CAST_OPS_BEGIN`], [`CAST_OPS_END`]     |
//! | other      | [`OTHER_OPS_BEGIN`], [`OTHER_OPS_END`]   |
//!
//! All ranges are half-open, so each category predicate is a single
//! interval comparison.

use crate::error::{ensure_arg, fatal, Result};
use crate::ir::classes::*;
use crate::ir::context::Context;
use crate::ir::entities::{Value, ValueKind};
use crate::ir::types::Type;
use crate::ir::uses::Arity;
use std::fmt;

/// Defines [`Opcode`] and its per-opcode tables.
macro_rules! opcodes {
  ($($name:ident = $num:literal => $mnemonic:literal, $arity:expr;)*) => {
    /// Opcodes of instructions.
    #[repr(u32)]
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    pub enum Opcode {
      $(
        #[doc = concat!("`", $mnemonic, "`.")]
        $name = $num,
      )*
    }

    impl Opcode {
      /// All opcodes, ordered by their numbers.
      pub const ALL: &'static [Opcode] = &[$(Opcode::$name,)*];

      /// Returns the opcode with the given number.
      pub fn from_u32(num: u32) -> Option<Self> {
        match num {
          $($num => Some(Opcode::$name),)*
          _ => None,
        }
      }

      /// Returns the mnemonic of the opcode.
      pub fn mnemonic(self) -> &'static str {
        match self {
          $(Opcode::$name => $mnemonic,)*
        }
      }

      /// Returns the operand count policy of instructions
      /// with the opcode.
      pub fn arity(self) -> Arity {
        use Arity::*;
        match self {
          $(Opcode::$name => $arity,)*
        }
      }
    }
  };
}

opcodes! {
  // terminators
  Ret = 1 => "ret", Variadic;
  Br = 2 => "br", Variadic;
  Switch = 3 => "switch", Variadic;
  Unreachable = 4 => "unreachable", Fixed(0);
  // binary operators
  Add = 5 => "add", Fixed(2);
  FAdd = 6 => "fadd", Fixed(2);
  Sub = 7 => "sub", Fixed(2);
  FSub = 8 => "fsub", Fixed(2);
  Mul = 9 => "mul", Fixed(2);
  FMul = 10 => "fmul", Fixed(2);
  UDiv = 11 => "udiv", Fixed(2);
  SDiv = 12 => "sdiv", Fixed(2);
  FDiv = 13 => "fdiv", Fixed(2);
  URem = 14 => "urem", Fixed(2);
  SRem = 15 => "srem", Fixed(2);
  FRem = 16 => "frem", Fixed(2);
  Shl = 17 => "shl", Fixed(2);
  LShr = 18 => "lshr", Fixed(2);
  AShr = 19 => "ashr", Fixed(2);
  And = 20 => "and", Fixed(2);
  Or = 21 => "or", Fixed(2);
  Xor = 22 => "xor", Fixed(2);
  // memory operators
  Alloca = 23 => "alloca", Fixed(1);
  Load = 24 => "load", Fixed(1);
  Store = 25 => "store", Fixed(2);
  GetElementPtr = 26 => "getelementptr", Variadic;
  // cast operators
  Trunc = 27 => "trunc", Fixed(1);
  ZExt = 28 => "zext", Fixed(1);
  SExt = 29 => "sext", Fixed(1);
  FPToUI = 30 => "fptoui", Fixed(1);
  FPToSI = 31 => "fptosi", Fixed(1);
  UIToFP = 32 => "uitofp", Fixed(1);
  SIToFP = 33 => "sitofp", Fixed(1);
  FPTrunc = 34 => "fptrunc", Fixed(1);
  FPExt = 35 => "fpext", Fixed(1);
  PtrToInt = 36 => "ptrtoint", Fixed(1);
  IntToPtr = 37 => "inttoptr", Fixed(1);
  BitCast = 38 => "bitcast", Fixed(1);
  // other operators
  ICmp = 39 => "icmp", Fixed(2);
  FCmp = 40 => "fcmp", Fixed(2);
  Phi = 41 => "phi", Variadic;
  Call = 42 => "call", Variadic;
  Select = 43 => "select", Fixed(3);
}

/// First terminator opcode number.
pub const TERM_OPS_BEGIN: u32 = Opcode::Ret as u32;
/// One past the last terminator opcode number.
pub const TERM_OPS_END: u32 = Opcode::Unreachable as u32 + 1;
/// First binary operator opcode number.
pub const BINARY_OPS_BEGIN: u32 = Opcode::Add as u32;
/// One past the last binary operator opcode number.
pub const BINARY_OPS_END: u32 = Opcode::Xor as u32 + 1;
/// First memory operator opcode number.
pub const MEMORY_OPS_BEGIN: u32 = Opcode::Alloca as u32;
/// One past the last memory operator opcode number.
pub const MEMORY_OPS_END: u32 = Opcode::GetElementPtr as u32 + 1;
/// First cast operator opcode number.
pub const CAST_OPS_BEGIN: u32 = Opcode::Trunc as u32;
/// One past the last cast operator opcode number.
pub const CAST_OPS_END: u32 = Opcode::BitCast as u32 + 1;
/// First opcode number of other operators.
pub const OTHER_OPS_BEGIN: u32 = Opcode::ICmp as u32;
/// One past the last opcode number of other operators.
pub const OTHER_OPS_END: u32 = Opcode::Select as u32 + 1;

/// Category of opcodes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum OpcodeCategory {
  /// Instructions that end a basic block.
  Terminator,
  /// Binary operators.
  Binary,
  /// Memory operators.
  Memory,
  /// Casts.
  Cast,
  /// Comparisons, phis, calls and selects.
  Other,
}

impl OpcodeCategory {
  /// All categories, ordered by their ranges.
  pub const ALL: [OpcodeCategory; 5] = [
    OpcodeCategory::Terminator,
    OpcodeCategory::Binary,
    OpcodeCategory::Memory,
    OpcodeCategory::Cast,
    OpcodeCategory::Other,
  ];

  /// Returns the half-open opcode number range of the category.
  pub fn range(self) -> (u32, u32) {
    match self {
      OpcodeCategory::Terminator => (TERM_OPS_BEGIN, TERM_OPS_END),
      OpcodeCategory::Binary => (BINARY_OPS_BEGIN, BINARY_OPS_END),
      OpcodeCategory::Memory => (MEMORY_OPS_BEGIN, MEMORY_OPS_END),
      OpcodeCategory::Cast => (CAST_OPS_BEGIN, CAST_OPS_END),
      OpcodeCategory::Other => (OTHER_OPS_BEGIN, OTHER_OPS_END),
    }
  }
}

impl Opcode {
  #[inline]
  fn in_range(self, begin: u32, end: u32) -> bool {
    let num = self as u32;
    num >= begin && num < end
  }

  /// Returns `true` if the opcode is a terminator.
  #[inline]
  pub fn is_terminator(self) -> bool {
    self.in_range(TERM_OPS_BEGIN, TERM_OPS_END)
  }

  /// Returns `true` if the opcode is a binary operator.
  #[inline]
  pub fn is_binary_op(self) -> bool {
    self.in_range(BINARY_OPS_BEGIN, BINARY_OPS_END)
  }

  /// Returns `true` if the opcode is a memory operator.
  #[inline]
  pub fn is_memory_op(self) -> bool {
    self.in_range(MEMORY_OPS_BEGIN, MEMORY_OPS_END)
  }

  /// Returns `true` if the opcode is a cast operator.
  #[inline]
  pub fn is_cast(self) -> bool {
    self.in_range(CAST_OPS_BEGIN, CAST_OPS_END)
  }

  /// Returns `true` if the opcode is none of the above.
  #[inline]
  pub fn is_other_op(self) -> bool {
    self.in_range(OTHER_OPS_BEGIN, OTHER_OPS_END)
  }

  /// Returns the category of the opcode.
  pub fn category(self) -> OpcodeCategory {
    if self.is_terminator() {
      OpcodeCategory::Terminator
    } else if self.is_binary_op() {
      OpcodeCategory::Binary
    } else if self.is_memory_op() {
      OpcodeCategory::Memory
    } else if self.is_cast() {
      OpcodeCategory::Cast
    } else {
      OpcodeCategory::Other
    }
  }

  /// Returns `true` if the binary operator works on floating points.
  pub fn is_fp_binary_op(self) -> bool {
    matches!(
      self,
      Opcode::FAdd | Opcode::FSub | Opcode::FMul | Opcode::FDiv | Opcode::FRem
    )
  }

  /// Returns `true` if `op x, y` equals to `op y, x`.
  pub fn is_commutative(self) -> bool {
    matches!(
      self,
      Opcode::Add
        | Opcode::FAdd
        | Opcode::Mul
        | Opcode::FMul
        | Opcode::And
        | Opcode::Or
        | Opcode::Xor
    )
  }
}

impl fmt::Display for Opcode {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.write_str(self.mnemonic())
  }
}

/// Integer comparison predicates.
#[rustfmt::skip]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum IntPredicate {
  Eq, Ne,
  // unsigned
  Ugt, Uge, Ult, Ule,
  // signed
  Sgt, Sge, Slt, Sle,
}

impl IntPredicate {
  /// Returns the predicate of `icmp y, x` when the current one is
  /// `icmp x, y`.
  pub fn swapped(self) -> Self {
    use IntPredicate::*;
    match self {
      Eq => Eq,
      Ne => Ne,
      Ugt => Ult,
      Uge => Ule,
      Ult => Ugt,
      Ule => Uge,
      Sgt => Slt,
      Sge => Sle,
      Slt => Sgt,
      Sle => Sge,
    }
  }

  /// Returns `true` if the predicate is a signed comparison.
  pub fn is_signed(self) -> bool {
    use IntPredicate::*;
    matches!(self, Sgt | Sge | Slt | Sle)
  }
}

impl fmt::Display for IntPredicate {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    use IntPredicate::*;
    f.write_str(match self {
      Eq => "eq",
      Ne => "ne",
      Ugt => "ugt",
      Uge => "uge",
      Ult => "ult",
      Ule => "ule",
      Sgt => "sgt",
      Sge => "sge",
      Slt => "slt",
      Sle => "sle",
    })
  }
}

/// Floating point comparison predicates.
///
/// `O*` predicates are false if any operand is NaN, `U*` predicates
/// are true if any operand is NaN.
#[rustfmt::skip]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum FloatPredicate {
  False, True,
  // ordered
  Oeq, Ogt, Oge, Olt, Ole, One, Ord,
  // unordered
  Ueq, Ugt, Uge, Ult, Ule, Une, Uno,
}

impl fmt::Display for FloatPredicate {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    use FloatPredicate::*;
    f.write_str(match self {
      False => "false",
      True => "true",
      Oeq => "oeq",
      Ogt => "ogt",
      Oge => "oge",
      Olt => "olt",
      Ole => "ole",
      One => "one",
      Ord => "ord",
      Ueq => "ueq",
      Ugt => "ugt",
      Uge => "uge",
      Ult => "ult",
      Ule => "ule",
      Une => "une",
      Uno => "uno",
    })
  }
}

/// Tail call markers of `call` instructions.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum TailCallKind {
  /// Not a tail call.
  #[default]
  None,
  /// The call may be performed as a tail call.
  Tail,
  /// The call must be performed as a tail call.
  MustTail,
}

impl fmt::Display for TailCallKind {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.write_str(match self {
      TailCallKind::None => "",
      TailCallKind::Tail => "tail",
      TailCallKind::MustTail => "musttail",
    })
  }
}

/// Calling convention of a call, identified by its number.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct CallingConv(u32);

impl CallingConv {
  /// The C calling convention.
  pub const C: Self = Self(0);
  /// Fast calling convention.
  pub const FAST: Self = Self(8);
  /// Calling convention for rarely executed callees.
  pub const COLD: Self = Self(9);

  /// Creates a calling convention from its number.
  pub fn new(id: u32) -> Self {
    Self(id)
  }

  /// Returns the number of the calling convention.
  pub fn id(self) -> u32 {
    self.0
  }
}

impl Default for CallingConv {
  fn default() -> Self {
    Self::C
  }
}

impl fmt::Display for CallingConv {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      Self::C => f.write_str("ccc"),
      Self::FAST => f.write_str("fastcc"),
      Self::COLD => f.write_str("coldcc"),
      Self(id) => write!(f, "cc {}", id),
    }
  }
}

/// Data of instructions, except operands.
#[derive(Clone, Debug, PartialEq)]
pub struct InstData {
  opcode: Opcode,
  extra: InstExtra,
}

/// Opcode specific data of instructions.
#[derive(Clone, Debug, PartialEq)]
pub(in crate::ir) enum InstExtra {
  None,
  IntPredicate(IntPredicate),
  FloatPredicate(FloatPredicate),
  /// Allocated type.
  Alloca(Type),
  /// Source element type.
  GetElementPtr(Type, bool),
  /// Callee function type and call markers.
  Call {
    fn_ty: Type,
    tail: TailCallKind,
    conv: CallingConv,
  },
}

impl InstData {
  pub(in crate::ir) fn new(opcode: Opcode, extra: InstExtra) -> Self {
    Self { opcode, extra }
  }

  /// Returns the opcode.
  pub fn opcode(&self) -> Opcode {
    self.opcode
  }

  pub(in crate::ir) fn extra(&self) -> &InstExtra {
    &self.extra
  }

  pub(in crate::ir) fn extra_mut(&mut self) -> &mut InstExtra {
    &mut self.extra
  }
}

impl Instruction {
  /// Returns the opcode of the instruction.
  pub fn opcode(self, ctx: &Context) -> Opcode {
    ctx.inst_data(self).opcode()
  }

  /// Returns the parent basic block, `None` if detached.
  pub fn parent(self, ctx: &Context) -> Option<BasicBlock> {
    ctx.layout().parent_bb(self)
  }

  /// Returns `true` if the instruction is a terminator.
  pub fn is_terminator(self, ctx: &Context) -> bool {
    self.opcode(ctx).is_terminator()
  }

  /// Returns `true` if the instruction is a binary operator.
  pub fn is_binary_op(self, ctx: &Context) -> bool {
    self.opcode(ctx).is_binary_op()
  }

  /// Returns `true` if the instruction is a memory operator.
  pub fn is_memory_op(self, ctx: &Context) -> bool {
    self.opcode(ctx).is_memory_op()
  }

  /// Returns `true` if the instruction is a cast.
  pub fn is_cast(self, ctx: &Context) -> bool {
    self.opcode(ctx).is_cast()
  }

  /// Returns the next instruction in the parent basic block.
  pub fn next(self, ctx: &Context) -> Option<Instruction> {
    ctx.layout().next_inst(self)
  }

  /// Returns the previous instruction in the parent basic block.
  pub fn prev(self, ctx: &Context) -> Option<Instruction> {
    ctx.layout().prev_inst(self)
  }
}

impl ReturnInst {
  /// Returns the returned value, `None` for `ret void`.
  pub fn return_value(self, ctx: &Context) -> Option<Value> {
    ctx.operand_slots(self.value()).first().and_then(|&u| ctx.use_data(u).value())
  }
}

impl BranchInst {
  /// Returns `true` if the branch is conditional.
  pub fn is_conditional(self, ctx: &Context) -> bool {
    ctx.operand_slots(self.value()).len() == 3
  }

  /// Returns the condition of conditional branches.
  pub fn condition(self, ctx: &Context) -> Option<Value> {
    if self.is_conditional(ctx) {
      ctx.operand_at(self.value(), 0)
    } else {
      None
    }
  }

  /// Returns the successor basic blocks, the `true` target first.
  pub fn successors(self, ctx: &Context) -> Vec<BasicBlock> {
    let skip = if self.is_conditional(ctx) { 1 } else { 0 };
    ctx
      .operand_values(self.value())
      .skip(skip)
      .flatten()
      .map(|v| ctx.cast::<BasicBlock>(v))
      .collect()
  }
}

impl SwitchInst {
  /// Returns the switch condition.
  pub fn condition(self, ctx: &Context) -> Option<Value> {
    ctx.operand_at(self.value(), 0)
  }

  /// Returns the default destination.
  pub fn default_dest(self, ctx: &Context) -> Option<BasicBlock> {
    ctx.operand_at(self.value(), 1).map(|v| ctx.cast(v))
  }

  /// Returns the number of cases, excluding the default one.
  pub fn num_cases(self, ctx: &Context) -> usize {
    (ctx.operand_slots(self.value()).len() - 2) / 2
  }

  /// Returns the case value and destination of the given case.
  pub fn case(self, ctx: &Context, index: usize) -> Option<(ConstantInt, BasicBlock)> {
    if index >= self.num_cases(ctx) {
      return None;
    }
    let value = ctx.operand_at(self.value(), 2 + index * 2)?;
    let dest = ctx.operand_at(self.value(), 3 + index * 2)?;
    Some((ctx.cast(value), ctx.cast(dest)))
  }

  /// Adds a new case to the switch.
  ///
  /// Fails if the case value is not of the condition's type.
  pub fn add_case(self, ctx: &mut Context, value: ConstantInt, dest: BasicBlock) -> Result<()> {
    ctx.check_value(value.value())?;
    ctx.check_value(dest.value())?;
    let cond_ty = self.condition(ctx).map(|c| ctx.value_type(c));
    ensure_arg!(
      cond_ty == Some(ctx.value_type(value.value())),
      "case value type mismatch"
    );
    ctx.push_operand(self.value(), value.value())?;
    ctx.push_operand(self.value(), dest.value())
  }
}

impl AllocaInst {
  /// Returns the allocated type.
  pub fn allocated_type(self, ctx: &Context) -> Type {
    match ctx.inst_data(self.into()).extra() {
      InstExtra::Alloca(ty) => *ty,
      _ => fatal!("alloca without allocated type"),
    }
  }

  /// Returns the number of allocated elements.
  pub fn array_size(self, ctx: &Context) -> Option<Value> {
    ctx.operand_at(self.value(), 0)
  }
}

impl LoadInst {
  /// Returns the pointer to load from.
  pub fn pointer_operand(self, ctx: &Context) -> Option<Value> {
    ctx.operand_at(self.value(), 0)
  }
}

impl StoreInst {
  /// Returns the stored value.
  pub fn value_operand(self, ctx: &Context) -> Option<Value> {
    ctx.operand_at(self.value(), 0)
  }

  /// Returns the pointer to store to.
  pub fn pointer_operand(self, ctx: &Context) -> Option<Value> {
    ctx.operand_at(self.value(), 1)
  }
}

impl GetElementPtrInst {
  /// Returns the base pointer.
  pub fn pointer_operand(self, ctx: &Context) -> Option<Value> {
    ctx.operand_at(self.value(), 0)
  }

  /// Returns the type the base pointer points to.
  pub fn source_element_type(self, ctx: &Context) -> Type {
    match ctx.inst_data(self.into()).extra() {
      InstExtra::GetElementPtr(ty, _) => *ty,
      _ => fatal!("getelementptr without source element type"),
    }
  }

  /// Returns `true` if the address computation is in bounds.
  pub fn is_inbounds(self, ctx: &Context) -> bool {
    matches!(
      ctx.inst_data(self.into()).extra(),
      InstExtra::GetElementPtr(_, true)
    )
  }

  /// Returns the number of indices.
  pub fn num_indices(self, ctx: &Context) -> usize {
    ctx.operand_slots(self.value()).len() - 1
  }
}

impl ICmpInst {
  /// Returns the comparison predicate.
  pub fn predicate(self, ctx: &Context) -> IntPredicate {
    match ctx.inst_data(self.into()).extra() {
      InstExtra::IntPredicate(pred) => *pred,
      _ => fatal!("icmp without predicate"),
    }
  }
}

impl FCmpInst {
  /// Returns the comparison predicate.
  pub fn predicate(self, ctx: &Context) -> FloatPredicate {
    match ctx.inst_data(self.into()).extra() {
      InstExtra::FloatPredicate(pred) => *pred,
      _ => fatal!("fcmp without predicate"),
    }
  }
}

impl PhiNode {
  /// Returns the number of incoming edges.
  pub fn num_incoming(self, ctx: &Context) -> usize {
    ctx.operand_slots(self.value()).len() / 2
  }

  /// Returns the incoming value of the given edge.
  pub fn incoming_value(self, ctx: &Context, index: usize) -> Option<Value> {
    if index < self.num_incoming(ctx) {
      ctx.operand_at(self.value(), index * 2)
    } else {
      None
    }
  }

  /// Returns the incoming basic block of the given edge.
  pub fn incoming_block(self, ctx: &Context, index: usize) -> Option<BasicBlock> {
    if index < self.num_incoming(ctx) {
      ctx.operand_at(self.value(), index * 2 + 1).map(|v| ctx.cast(v))
    } else {
      None
    }
  }

  /// Adds a new incoming edge.
  ///
  /// Fails if the incoming value is not of the phi's type.
  pub fn add_incoming(self, ctx: &mut Context, value: Value, bb: BasicBlock) -> Result<()> {
    ctx.check_value(value)?;
    ctx.check_value(bb.value())?;
    ensure_arg!(
      ctx.value_type(value) == ctx.value_type(self.value()),
      "incoming value type mismatch"
    );
    ctx.push_operand(self.value(), value)?;
    ctx.push_operand(self.value(), bb.value())
  }
}

impl CallInst {
  /// Returns the called value, which is the last operand.
  pub fn called_value(self, ctx: &Context) -> Option<Value> {
    let n = ctx.operand_slots(self.value()).len();
    ctx.operand_at(self.value(), n - 1)
  }

  /// Returns the called function, `None` for indirect calls.
  pub fn called_function(self, ctx: &Context) -> Option<Function> {
    self.called_value(ctx).and_then(|v| ctx.dyn_cast(v))
  }

  /// Returns the type of the callee.
  pub fn function_type(self, ctx: &Context) -> Type {
    match ctx.inst_data(self.into()).extra() {
      InstExtra::Call { fn_ty, .. } => *fn_ty,
      _ => fatal!("call without function type"),
    }
  }

  /// Returns the tail call marker.
  pub fn tail_call_kind(self, ctx: &Context) -> TailCallKind {
    match ctx.inst_data(self.into()).extra() {
      InstExtra::Call { tail, .. } => *tail,
      _ => fatal!("call without tail call marker"),
    }
  }

  /// Sets the tail call marker.
  pub fn set_tail_call_kind(self, ctx: &mut Context, kind: TailCallKind) {
    match ctx.inst_data_mut(self.into()).extra_mut() {
      InstExtra::Call { tail, .. } => *tail = kind,
      _ => fatal!("call without tail call marker"),
    }
  }

  /// Returns `true` if the call is marked `tail` or `musttail`.
  pub fn is_tail_call(self, ctx: &Context) -> bool {
    self.tail_call_kind(ctx) != TailCallKind::None
  }

  /// Returns the calling convention.
  pub fn calling_conv(self, ctx: &Context) -> CallingConv {
    match ctx.inst_data(self.into()).extra() {
      InstExtra::Call { conv, .. } => *conv,
      _ => fatal!("call without calling convention"),
    }
  }

  /// Sets the calling convention.
  pub fn set_calling_conv(self, ctx: &mut Context, cc: CallingConv) {
    match ctx.inst_data_mut(self.into()).extra_mut() {
      InstExtra::Call { conv, .. } => *conv = cc,
      _ => fatal!("call without calling convention"),
    }
  }

  /// Returns the number of arguments.
  pub fn num_args(self, ctx: &Context) -> usize {
    ctx.operand_slots(self.value()).len() - 1
  }

  /// Returns the argument at the given index.
  pub fn arg(self, ctx: &Context, index: usize) -> Option<Value> {
    if index < self.num_args(ctx) {
      ctx.operand_at(self.value(), index)
    } else {
      None
    }
  }
}

impl SelectInst {
  /// Returns the condition.
  pub fn condition(self, ctx: &Context) -> Option<Value> {
    ctx.operand_at(self.value(), 0)
  }

  /// Returns the value selected if the condition is true.
  pub fn true_value(self, ctx: &Context) -> Option<Value> {
    ctx.operand_at(self.value(), 1)
  }

  /// Returns the value selected if the condition is false.
  pub fn false_value(self, ctx: &Context) -> Option<Value> {
    ctx.operand_at(self.value(), 2)
  }
}

impl ValueKind {
  /// Returns the opcode if the kind is an instruction.
  #[inline]
  pub fn opcode(&self) -> Option<Opcode> {
    match self {
      ValueKind::Instruction(inst) => Some(inst.opcode()),
      _ => None,
    }
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn opcode_ranges_are_disjoint() {
    for op in Opcode::ALL {
      let hits = [
        op.is_terminator(),
        op.is_binary_op(),
        op.is_memory_op(),
        op.is_cast(),
        op.is_other_op(),
      ];
      assert_eq!(hits.iter().filter(|h| **h).count(), 1, "{}", op);
      let (begin, end) = op.category().range();
      assert!(begin <= *op as u32 && (*op as u32) < end);
    }
  }

  #[test]
  fn ranges_are_contiguous() {
    let mut expected = TERM_OPS_BEGIN;
    for cat in OpcodeCategory::ALL {
      let (begin, end) = cat.range();
      assert_eq!(begin, expected);
      assert!(end > begin);
      expected = end;
    }
    assert_eq!(expected as usize - TERM_OPS_BEGIN as usize, Opcode::ALL.len());
  }

  #[test]
  fn opcode_numbers() {
    for op in Opcode::ALL {
      assert_eq!(Opcode::from_u32(*op as u32), Some(*op));
    }
    assert_eq!(Opcode::from_u32(0), None);
    assert_eq!(Opcode::from_u32(OTHER_OPS_END), None);
    assert_eq!(Opcode::GetElementPtr.to_string(), "getelementptr");
    assert_eq!(Opcode::Store.arity(), Arity::Fixed(2));
    assert_eq!(Opcode::Call.arity(), Arity::Variadic);
  }

  #[test]
  fn predicates() {
    assert_eq!(IntPredicate::Slt.swapped(), IntPredicate::Sgt);
    assert_eq!(IntPredicate::Eq.swapped(), IntPredicate::Eq);
    assert!(IntPredicate::Sge.is_signed());
    assert!(!IntPredicate::Uge.is_signed());
    assert_eq!(IntPredicate::Ule.to_string(), "ule");
    assert_eq!(FloatPredicate::Uno.to_string(), "uno");
    assert!(Opcode::FRem.is_fp_binary_op());
    assert!(Opcode::Xor.is_commutative());
    assert!(!Opcode::Sub.is_commutative());
  }

  #[test]
  fn call_markers() {
    assert_eq!(TailCallKind::default(), TailCallKind::None);
    assert_eq!(TailCallKind::MustTail.to_string(), "musttail");
    assert_eq!(CallingConv::default(), CallingConv::C);
    assert_eq!(CallingConv::new(8), CallingConv::FAST);
    assert_eq!(CallingConv::COLD.to_string(), "coldcc");
    assert_eq!(CallingConv::new(64).to_string(), "cc 64");
    assert_eq!(CallingConv::new(64).id(), 64);
  }
}
