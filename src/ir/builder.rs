//! Instruction builder ([`InstBuilder`]) and insertion points
//! ([`InsertPoint`]).

use crate::error::{ensure_arg, Error, Result};
use crate::ir::classes::*;
use crate::ir::context::Context;
use crate::ir::entities::Value;
use crate::ir::instructions::{
  CallingConv, FloatPredicate, InstData, InstExtra, IntPredicate, Opcode, TailCallKind,
};
use crate::ir::types::{Type, TypeData, TypeKind};

/// Where the instruction builder places new instructions.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InsertPoint {
  /// Not placed in any basic block.
  Detached,
  /// Before the given instruction, in the same basic block.
  Before(Instruction),
  /// At the end of the given basic block.
  AtEnd(BasicBlock),
}

impl Default for InsertPoint {
  fn default() -> Self {
    InsertPoint::Detached
  }
}

/// A builder for building and inserting instructions.
///
/// Every factory method checks its operands first, and fails without
/// changing anything if any check fails.
pub struct InstBuilder<'c> {
  ctx: &'c mut Context,
  at: InsertPoint,
  name: Option<String>,
}

impl<'c> InstBuilder<'c> {
  pub(in crate::ir) fn new(ctx: &'c mut Context) -> Self {
    Self {
      ctx,
      at: InsertPoint::Detached,
      name: None,
    }
  }

  /// Places the new instruction before the given instruction.
  pub fn before(mut self, inst: Instruction) -> Self {
    self.at = InsertPoint::Before(inst);
    self
  }

  /// Places the new instruction at the end of the given basic block.
  pub fn at_end(mut self, bb: BasicBlock) -> Self {
    self.at = InsertPoint::AtEnd(bb);
    self
  }

  /// Places the new instruction at the given insertion point.
  pub fn at(mut self, at: InsertPoint) -> Self {
    self.at = at;
    self
  }

  /// Names the new instruction.
  pub fn name(mut self, name: &str) -> Self {
    self.name = Some(name.into());
    self
  }

  fn check(&self, values: &[Value]) -> Result<()> {
    for &v in values {
      self.ctx.check_value(v)?;
    }
    Ok(())
  }

  fn ty(&self, value: Value) -> Type {
    self.ctx.value_type(value)
  }

  fn kind(&self, ty: Type) -> TypeKind {
    self.ctx.types().kind(ty)
  }

  fn display(&self, ty: Type) -> String {
    self.ctx.types().display(ty).to_string()
  }

  /// Returns the scalar type and the lane count (if vector) of `ty`.
  fn shape(&self, ty: Type) -> (Type, Option<u32>) {
    match self.ctx.types().data(ty) {
      TypeData::Vector(elem, len) => (*elem, Some(*len)),
      _ => (ty, None),
    }
  }

  /// Gets `i1`, or the vector of `i1` with the same shape as `ty`.
  fn bool_like(&mut self, ty: Type) -> Result<Type> {
    let bool_ty = self.ctx.bool_type();
    match self.shape(ty).1 {
      Some(len) => self.ctx.types_mut().get_vector(bool_ty, len),
      None => Ok(bool_ty),
    }
  }

  fn is_bool(&self, value: Value) -> bool {
    self.ty(value) == self.ctx.bool_type()
  }

  fn insert<T: ValueClass>(self, ty: Type, data: InstData, operands: &[Option<Value>]) -> Result<T> {
    self.ctx.check_insert_point(self.at)?;
    // check if a void-typed instruction is named
    ensure_arg!(
      self.name.is_none() || ty != self.ctx.void_type(),
      "can not name an instruction of type `void`"
    );
    let inst = self
      .ctx
      .insert_new_inst(ty, data, operands, self.at, self.name);
    Ok(T::from_value_unchecked(inst.value()))
  }

  /// Creates a `ret` instruction, `None` for `ret void`.
  pub fn ret(self, value: Option<Value>) -> Result<ReturnInst> {
    let operands = match value {
      Some(v) => {
        self.check(&[v])?;
        // check if the returned value is first-class
        ensure_arg!(
          self.kind(self.ty(v)).is_first_class(),
          "can not return a value of type `{}`",
          self.display(self.ty(v))
        );
        vec![Some(v)]
      }
      None => vec![],
    };
    let ty = self.ctx.void_type();
    self.insert(ty, InstData::new(Opcode::Ret, InstExtra::None), &operands)
  }

  /// Creates an unconditional `br` instruction.
  pub fn br(self, dest: BasicBlock) -> Result<BranchInst> {
    self.check(&[dest.value()])?;
    let ty = self.ctx.void_type();
    self.insert(
      ty,
      InstData::new(Opcode::Br, InstExtra::None),
      &[Some(dest.value())],
    )
  }

  /// Creates a conditional `br` instruction.
  pub fn cond_br(self, cond: Value, true_bb: BasicBlock, false_bb: BasicBlock) -> Result<BranchInst> {
    self.check(&[cond, true_bb.value(), false_bb.value()])?;
    // check if the condition is `i1`
    ensure_arg!(self.is_bool(cond), "branch condition must be `i1`");
    let ty = self.ctx.void_type();
    self.insert(
      ty,
      InstData::new(Opcode::Br, InstExtra::None),
      &[Some(cond), Some(true_bb.value()), Some(false_bb.value())],
    )
  }

  /// Creates a `switch` instruction without cases.
  ///
  /// Cases can be added by [`SwitchInst::add_case`].
  pub fn switch(self, cond: Value, default: BasicBlock) -> Result<SwitchInst> {
    self.check(&[cond, default.value()])?;
    // check if the condition is an integer
    ensure_arg!(
      self.kind(self.ty(cond)) == TypeKind::Integer,
      "switch condition must be an integer"
    );
    let ty = self.ctx.void_type();
    self.insert(
      ty,
      InstData::new(Opcode::Switch, InstExtra::None),
      &[Some(cond), Some(default.value())],
    )
  }

  /// Creates an `unreachable` instruction.
  pub fn unreachable(self) -> Result<UnreachableInst> {
    let ty = self.ctx.void_type();
    self.insert(ty, InstData::new(Opcode::Unreachable, InstExtra::None), &[])
  }

  /// Creates a binary operator.
  pub fn binary(self, op: Opcode, lhs: Value, rhs: Value) -> Result<BinaryOperator> {
    ensure_arg!(op.is_binary_op(), "`{}` is not a binary operator", op);
    self.check(&[lhs, rhs])?;
    let ty = self.ty(lhs);
    // check if the operands have the same type
    ensure_arg!(ty == self.ty(rhs), "operands of `{}` have different types", op);
    // check if the operand type fits the operator
    let types = self.ctx.types();
    if op.is_fp_binary_op() {
      ensure_arg!(
        types.is_fp_or_fp_vector(ty),
        "`{}` requires floating point operands",
        op
      );
    } else {
      ensure_arg!(
        types.is_int_or_int_vector(ty),
        "`{}` requires integer operands",
        op
      );
    }
    self.insert(
      ty,
      InstData::new(op, InstExtra::None),
      &[Some(lhs), Some(rhs)],
    )
  }

  /// Creates an `alloca` instruction, the array size defaults to
  /// `i32 1`.
  pub fn alloca(self, ty: Type, array_size: Option<Value>) -> Result<AllocaInst> {
    self.ctx.types().check(ty)?;
    if let Some(size) = array_size {
      self.check(&[size])?;
      // check if the array size is an integer
      ensure_arg!(
        self.kind(self.ty(size)) == TypeKind::Integer,
        "array size must be an integer"
      );
    }
    // check if the allocated type is sized
    ensure_arg!(
      self.ctx.types().is_loadable_or_storable(ty) && self.ctx.types().is_sized(ty),
      "can not allocate type `{}`",
      self.display(ty)
    );
    self.ctx.check_insert_point(self.at)?;
    let ptr_ty = self.ctx.types_mut().get_pointer(ty, 0)?;
    let size = match array_size {
      Some(size) => size,
      None => {
        let i32_ty = self.ctx.types().int32();
        self.ctx.const_int(i32_ty, 1)?.value()
      }
    };
    self.insert(
      ptr_ty,
      InstData::new(Opcode::Alloca, InstExtra::Alloca(ty)),
      &[Some(size)],
    )
  }

  /// Creates a `load` instruction.
  pub fn load(self, ptr: Value) -> Result<LoadInst> {
    self.check(&[ptr])?;
    let ty = match self.ctx.types().data(self.ty(ptr)) {
      TypeData::Pointer(pointee, _) => *pointee,
      _ => return Err(Error::InvalidArgument("`load` requires a pointer".into())),
    };
    // check if the pointee can be loaded
    ensure_arg!(
      self.ctx.types().is_loadable_or_storable(ty) && self.ctx.types().is_sized(ty),
      "can not load a value of type `{}`",
      self.display(ty)
    );
    self.insert(
      ty,
      InstData::new(Opcode::Load, InstExtra::None),
      &[Some(ptr)],
    )
  }

  /// Creates a `store` instruction.
  pub fn store(self, value: Value, ptr: Value) -> Result<StoreInst> {
    self.check(&[value, ptr])?;
    let pointee = match self.ctx.types().data(self.ty(ptr)) {
      TypeData::Pointer(pointee, _) => *pointee,
      _ => return Err(Error::InvalidArgument("`store` requires a pointer".into())),
    };
    // check if the pointer points to the stored type
    ensure_arg!(
      pointee == self.ty(value),
      "can not store a value of type `{}` to a pointer to `{}`",
      self.display(self.ty(value)),
      self.display(pointee)
    );
    ensure_arg!(
      self.ctx.types().is_loadable_or_storable(pointee),
      "can not store a value of type `{}`",
      self.display(pointee)
    );
    let ty = self.ctx.void_type();
    self.insert(
      ty,
      InstData::new(Opcode::Store, InstExtra::None),
      &[Some(value), Some(ptr)],
    )
  }

  /// Creates a `getelementptr` instruction.
  ///
  /// The first index steps over the base pointer, every following index
  /// steps into the current aggregate. Struct indices must be integer
  /// constants.
  pub fn gep(self, ptr: Value, indices: &[Value], inbounds: bool) -> Result<GetElementPtrInst> {
    self.check(&[ptr])?;
    self.check(indices)?;
    let (source, addr_space) = match self.ctx.types().data(self.ty(ptr)) {
      TypeData::Pointer(pointee, addr_space) => (*pointee, *addr_space),
      _ => {
        return Err(Error::InvalidArgument(
          "`getelementptr` requires a pointer".into(),
        ))
      }
    };
    ensure_arg!(!indices.is_empty(), "`getelementptr` requires indices");
    // check if all indices are integers
    for &idx in indices {
      ensure_arg!(
        self.kind(self.ty(idx)) == TypeKind::Integer,
        "`getelementptr` indices must be integers"
      );
    }
    // compute the result element type
    let mut cur = source;
    for &idx in &indices[1..] {
      let index = if self.kind(cur) == TypeKind::Struct {
        match self.ctx.dyn_cast::<ConstantInt>(idx) {
          Some(c) => c.zext_value(self.ctx),
          None => {
            return Err(Error::InvalidArgument(
              "struct indices must be integer constants".into(),
            ))
          }
        }
      } else {
        0
      };
      cur = self.ctx.types().type_at_index(cur, index)?;
    }
    self.ctx.check_insert_point(self.at)?;
    let ty = self.ctx.types_mut().get_pointer(cur, addr_space)?;
    let operands: Vec<_> = std::iter::once(ptr)
      .chain(indices.iter().copied())
      .map(Some)
      .collect();
    self.insert(
      ty,
      InstData::new(Opcode::GetElementPtr, InstExtra::GetElementPtr(source, inbounds)),
      &operands,
    )
  }

  /// Creates a cast operator.
  pub fn cast(self, op: Opcode, value: Value, ty: Type) -> Result<CastInst> {
    ensure_arg!(op.is_cast(), "`{}` is not a cast operator", op);
    self.check(&[value])?;
    self.ctx.types().check(ty)?;
    let src = self.ty(value);
    ensure_arg!(
      self.is_valid_cast(op, src, ty),
      "invalid cast `{}` from `{}` to `{}`",
      op,
      self.display(src),
      self.display(ty)
    );
    self.insert(ty, InstData::new(op, InstExtra::None), &[Some(value)])
  }

  fn is_valid_cast(&self, op: Opcode, src: Type, dst: Type) -> bool {
    let types = self.ctx.types();
    let ((src_elem, src_len), (dst_elem, dst_len)) = (self.shape(src), self.shape(dst));
    let (src_kind, dst_kind) = (self.kind(src_elem), self.kind(dst_elem));
    let (src_bits, dst_bits) = (
      types.primitive_size_in_bits(src),
      types.primitive_size_in_bits(dst),
    );
    let same_shape = src_len == dst_len;
    let int_to_int = src_kind == TypeKind::Integer && dst_kind == TypeKind::Integer;
    let fp_to_fp = src_kind.is_floating_point() && dst_kind.is_floating_point();
    match op {
      Opcode::Trunc => same_shape && int_to_int && src_bits > dst_bits,
      Opcode::ZExt | Opcode::SExt => same_shape && int_to_int && src_bits < dst_bits,
      Opcode::FPToUI | Opcode::FPToSI => {
        same_shape && src_kind.is_floating_point() && dst_kind == TypeKind::Integer
      }
      Opcode::UIToFP | Opcode::SIToFP => {
        same_shape && src_kind == TypeKind::Integer && dst_kind.is_floating_point()
      }
      Opcode::FPTrunc => same_shape && fp_to_fp && src_bits > dst_bits,
      Opcode::FPExt => same_shape && fp_to_fp && src_bits < dst_bits,
      Opcode::PtrToInt => {
        same_shape && src_kind == TypeKind::Pointer && dst_kind == TypeKind::Integer
      }
      Opcode::IntToPtr => {
        same_shape && src_kind == TypeKind::Integer && dst_kind == TypeKind::Pointer
      }
      Opcode::BitCast => {
        let (src_ptr, dst_ptr) = (src_kind == TypeKind::Pointer, dst_kind == TypeKind::Pointer);
        if src_ptr || dst_ptr {
          src_ptr
            && dst_ptr
            && same_shape
            && types.address_space(src_elem) == types.address_space(dst_elem)
        } else {
          self.kind(src).is_single_value()
            && self.kind(dst).is_single_value()
            && src_bits == dst_bits
        }
      }
      _ => false,
    }
  }

  /// Creates an `icmp` instruction.
  pub fn icmp(mut self, pred: IntPredicate, lhs: Value, rhs: Value) -> Result<ICmpInst> {
    self.check(&[lhs, rhs])?;
    let ty = self.ty(lhs);
    // check if the operands have the same integer or pointer type
    ensure_arg!(ty == self.ty(rhs), "operands of `icmp` have different types");
    let scalar = self.kind(self.shape(ty).0);
    ensure_arg!(
      scalar == TypeKind::Integer || scalar == TypeKind::Pointer,
      "`icmp` requires integer or pointer operands"
    );
    self.ctx.check_insert_point(self.at)?;
    let result = self.bool_like(ty)?;
    self.insert(
      result,
      InstData::new(Opcode::ICmp, InstExtra::IntPredicate(pred)),
      &[Some(lhs), Some(rhs)],
    )
  }

  /// Creates an `fcmp` instruction.
  pub fn fcmp(mut self, pred: FloatPredicate, lhs: Value, rhs: Value) -> Result<FCmpInst> {
    self.check(&[lhs, rhs])?;
    let ty = self.ty(lhs);
    // check if the operands have the same floating point type
    ensure_arg!(ty == self.ty(rhs), "operands of `fcmp` have different types");
    ensure_arg!(
      self.ctx.types().is_fp_or_fp_vector(ty),
      "`fcmp` requires floating point operands"
    );
    self.ctx.check_insert_point(self.at)?;
    let result = self.bool_like(ty)?;
    self.insert(
      result,
      InstData::new(Opcode::FCmp, InstExtra::FloatPredicate(pred)),
      &[Some(lhs), Some(rhs)],
    )
  }

  /// Creates a `phi` instruction without incoming edges.
  ///
  /// Incoming edges can be added by [`PhiNode::add_incoming`].
  pub fn phi(self, ty: Type) -> Result<PhiNode> {
    self.ctx.types().check(ty)?;
    // check if the type is first-class
    ensure_arg!(
      self.kind(ty).is_first_class(),
      "`phi` of type `{}` is not allowed",
      self.display(ty)
    );
    self.insert(ty, InstData::new(Opcode::Phi, InstExtra::None), &[])
  }

  /// Creates a `call` instruction.
  ///
  /// The callee must be a pointer to a function.
  pub fn call(self, callee: Value, args: &[Value]) -> Result<CallInst> {
    self.check(&[callee])?;
    self.check(args)?;
    let fn_ty = match self.ctx.types().data(self.ty(callee)) {
      TypeData::Pointer(pointee, _) if self.kind(*pointee) == TypeKind::Function => *pointee,
      _ => {
        return Err(Error::InvalidArgument(
          "callee must be a pointer to a function".into(),
        ))
      }
    };
    let (ret, params, var_arg) = match self.ctx.types().function(fn_ty) {
      Some(f) => (f.ret(), f.params().to_vec(), f.is_var_arg()),
      None => return Err(Error::InvalidArgument("callee is not a function".into())),
    };
    // check the argument count and types
    ensure_arg!(
      args.len() == params.len() || (var_arg && args.len() > params.len()),
      "expected {} arguments, found {}",
      params.len(),
      args.len()
    );
    for (i, (&arg, &param)) in args.iter().zip(&params).enumerate() {
      ensure_arg!(
        self.ty(arg) == param,
        "argument {} has type `{}`, expected `{}`",
        i,
        self.display(self.ty(arg)),
        self.display(param)
      );
    }
    let operands: Vec<_> = args
      .iter()
      .copied()
      .chain(std::iter::once(callee))
      .map(Some)
      .collect();
    self.insert(
      ret,
      InstData::new(
        Opcode::Call,
        InstExtra::Call {
          fn_ty,
          tail: TailCallKind::None,
          conv: CallingConv::C,
        },
      ),
      &operands,
    )
  }

  /// Creates a `select` instruction.
  pub fn select(self, cond: Value, true_val: Value, false_val: Value) -> Result<SelectInst> {
    self.check(&[cond, true_val, false_val])?;
    // check if the condition is `i1`
    ensure_arg!(self.is_bool(cond), "select condition must be `i1`");
    let ty = self.ty(true_val);
    ensure_arg!(
      ty == self.ty(false_val),
      "operands of `select` have different types"
    );
    ensure_arg!(
      self.kind(ty).is_first_class(),
      "`select` of type `{}` is not allowed",
      self.display(ty)
    );
    self.insert(
      ty,
      InstData::new(Opcode::Select, InstExtra::None),
      &[Some(cond), Some(true_val), Some(false_val)],
    )
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::ir::instructions::Opcode::*;
  use pretty_assertions::assert_eq;

  struct Env {
    ctx: Context,
    func: Function,
    bb: BasicBlock,
    i32_ty: Type,
  }

  fn env() -> Env {
    let mut ctx = Context::new();
    let i32_ty = ctx.types().int32();
    let fn_ty = ctx.function_type(i32_ty, &[i32_ty, i32_ty], false).unwrap();
    let func = ctx.new_function("main", fn_ty).unwrap();
    let bb = ctx.new_bb(Some("entry"));
    ctx.append_bb(func, bb).unwrap();
    Env {
      ctx,
      func,
      bb,
      i32_ty,
    }
  }

  #[test]
  fn binary_operators() {
    let Env { mut ctx, func, bb, i32_ty } = env();
    let a = func.args(&ctx)[0].value();
    let add = ctx.build().at_end(bb).name("sum").binary(Add, a, a).unwrap();
    assert_eq!(ctx.value_type(add.value()), i32_ty);
    assert_eq!(ctx.value_name(add.value()), Some("sum"));
    let err = ctx.build().at_end(bb).binary(FAdd, a, a).unwrap_err();
    assert!(err.is_invalid_argument());
    let i8_ty = ctx.types().int8();
    let c = ctx.const_int(i8_ty, 1).unwrap();
    let err = ctx.build().at_end(bb).binary(Add, a, c.value()).unwrap_err();
    assert!(err.is_invalid_argument());
    let err = ctx.build().at_end(bb).binary(Load, a, a).unwrap_err();
    assert!(err.is_invalid_argument());
    assert_eq!(bb.insts(&ctx).len(), 1);
  }

  #[test]
  fn memory_operators() {
    let Env { mut ctx, func, bb, i32_ty } = env();
    let a = func.args(&ctx)[0].value();
    let slot = ctx.build().at_end(bb).alloca(i32_ty, None).unwrap();
    let ptr_ty = ctx.pointer_to(i32_ty).unwrap();
    assert_eq!(ctx.value_type(slot.value()), ptr_ty);
    assert_eq!(slot.allocated_type(&ctx), i32_ty);
    let one = ctx.const_int(i32_ty, 1).unwrap();
    assert_eq!(slot.array_size(&ctx), Some(one.value()));
    let store = ctx.build().at_end(bb).store(a, slot.value()).unwrap();
    assert_eq!(store.value_operand(&ctx), Some(a));
    assert_eq!(store.pointer_operand(&ctx), Some(slot.value()));
    let load = ctx.build().at_end(bb).load(slot.value()).unwrap();
    assert_eq!(ctx.value_type(load.value()), i32_ty);
    assert!(ctx.build().at_end(bb).load(a).unwrap_err().is_invalid_argument());
    let i8_ty = ctx.types().int8();
    let c = ctx.const_int(i8_ty, 0).unwrap();
    let err = ctx.build().at_end(bb).store(c.value(), slot.value()).unwrap_err();
    assert!(err.is_invalid_argument());
    // storing returns void, so it can not be named
    let err = ctx.build().at_end(bb).name("s").store(a, slot.value()).unwrap_err();
    assert!(err.is_invalid_argument());
    assert_eq!(bb.insts(&ctx).len(), 3);
    ctx.check_use_lists();
  }

  #[test]
  fn allocate_self_containing_struct() {
    let Env { mut ctx, bb, .. } = env();
    let s = ctx.types_mut().create_struct(Some("s"));
    ctx.types_mut().set_struct_body(s, &[s], false).unwrap();
    let err = ctx.build().at_end(bb).alloca(s, None).unwrap_err();
    assert!(err.is_invalid_argument());
    assert!(bb.insts(&ctx).is_empty());
  }

  #[test]
  fn getelementptr() {
    let Env { mut ctx, bb, i32_ty, .. } = env();
    let i8_ty = ctx.types().int8();
    let arr = ctx.types_mut().get_array(i8_ty, 4).unwrap();
    let st = ctx.types_mut().get_struct(&[i32_ty, arr], false).unwrap();
    let slot = ctx.build().at_end(bb).alloca(st, None).unwrap();
    let zero = ctx.const_int(i32_ty, 0).unwrap().value();
    let one = ctx.const_int(i32_ty, 1).unwrap().value();
    let gep = ctx
      .build()
      .at_end(bb)
      .gep(slot.value(), &[zero, one, zero], true)
      .unwrap();
    let i8_ptr = ctx.pointer_to(i8_ty).unwrap();
    assert_eq!(ctx.value_type(gep.value()), i8_ptr);
    assert_eq!(gep.source_element_type(&ctx), st);
    assert!(gep.is_inbounds(&ctx));
    assert_eq!(gep.num_indices(&ctx), 3);
    assert_eq!(gep.pointer_operand(&ctx), Some(slot.value()));
    // struct indices must be constants
    let load = ctx.build().at_end(bb).load(slot.value());
    assert!(load.is_ok());
    let n = ctx.build().at_end(bb).binary(Add, zero, one).unwrap();
    let err = ctx
      .build()
      .at_end(bb)
      .gep(slot.value(), &[zero, n.value()], false)
      .unwrap_err();
    assert!(err.is_invalid_argument());
    let two = ctx.const_int(i32_ty, 2).unwrap().value();
    let err = ctx
      .build()
      .at_end(bb)
      .gep(slot.value(), &[zero, two], false)
      .unwrap_err();
    assert!(err.is_invalid_argument());
  }

  #[test]
  fn casts() {
    let Env { mut ctx, func, bb, i32_ty } = env();
    let a = func.args(&ctx)[0].value();
    let (i8_ty, i64_ty) = (ctx.types().int8(), ctx.types().int64());
    let (float, double) = (ctx.types().float(), ctx.types().double());
    let b = ctx.build().at_end(bb).cast(Trunc, a, i8_ty).unwrap();
    assert_eq!(ctx.value_type(b.value()), i8_ty);
    assert!(ctx.build().cast(Trunc, a, i64_ty).unwrap_err().is_invalid_argument());
    assert!(ctx.build().cast(ZExt, a, i64_ty).is_ok());
    let f = ctx.build().cast(SIToFP, a, float).unwrap();
    assert!(ctx.build().cast(FPExt, f.value(), double).is_ok());
    assert!(ctx.build().cast(FPTrunc, f.value(), double).unwrap_err().is_invalid_argument());
    assert!(ctx.build().cast(BitCast, a, float).is_ok());
    assert!(ctx.build().cast(BitCast, a, i64_ty).unwrap_err().is_invalid_argument());
    let ptr = ctx.pointer_to(i32_ty).unwrap();
    let p = ctx.build().cast(IntToPtr, a, ptr).unwrap();
    let i8_ptr = ctx.pointer_to(i8_ty).unwrap();
    assert!(ctx.build().cast(BitCast, p.value(), i8_ptr).is_ok());
    let as1 = ctx.types_mut().get_pointer(i8_ty, 1).unwrap();
    assert!(ctx.build().cast(BitCast, p.value(), as1).unwrap_err().is_invalid_argument());
    assert!(ctx.build().cast(Add, a, i64_ty).unwrap_err().is_invalid_argument());
  }

  #[test]
  fn comparisons_and_select() {
    let Env { mut ctx, func, bb, i32_ty } = env();
    let (a, b) = (func.args(&ctx)[0].value(), func.args(&ctx)[1].value());
    let cmp = ctx.build().at_end(bb).icmp(IntPredicate::Slt, a, b).unwrap();
    assert_eq!(ctx.value_type(cmp.value()), ctx.bool_type());
    assert_eq!(cmp.predicate(&ctx), IntPredicate::Slt);
    assert!(ctx.isa::<CmpInst>(cmp.value()));
    let sel = ctx.build().at_end(bb).select(cmp.value(), a, b).unwrap();
    assert_eq!(ctx.value_type(sel.value()), i32_ty);
    assert_eq!(sel.condition(&ctx), Some(cmp.value()));
    assert_eq!(sel.false_value(&ctx), Some(b));
    assert!(ctx.build().select(a, a, b).unwrap_err().is_invalid_argument());
    let float = ctx.types().float();
    let x = ctx.const_fp(float, 1.0).unwrap().value();
    let fcmp = ctx.build().fcmp(FloatPredicate::Olt, x, x).unwrap();
    assert_eq!(fcmp.predicate(&ctx), FloatPredicate::Olt);
    assert!(ctx.build().fcmp(FloatPredicate::Olt, a, b).unwrap_err().is_invalid_argument());
    let v4 = ctx.types_mut().get_vector(i32_ty, 4).unwrap();
    let u = ctx.undef(v4).unwrap().value();
    let vcmp = ctx.build().icmp(IntPredicate::Eq, u, u).unwrap();
    let bool_ty = ctx.bool_type();
    let b4 = ctx.types_mut().get_vector(bool_ty, 4).unwrap();
    assert_eq!(ctx.value_type(vcmp.value()), b4);
  }

  #[test]
  fn control_flow() {
    let Env { mut ctx, func, bb, i32_ty } = env();
    let a = func.args(&ctx)[0].value();
    let (then_bb, else_bb) = (ctx.new_bb(Some("then")), ctx.new_bb(Some("else")));
    ctx.append_bb(func, then_bb).unwrap();
    ctx.append_bb(func, else_bb).unwrap();
    let sw = ctx.build().at_end(bb).switch(a, else_bb).unwrap();
    let c1 = ctx.const_int(i32_ty, 1).unwrap();
    sw.add_case(&mut ctx, c1, then_bb).unwrap();
    let i8_ty = ctx.types().int8();
    let c8 = ctx.const_int(i8_ty, 1).unwrap();
    assert!(sw.add_case(&mut ctx, c8, then_bb).unwrap_err().is_invalid_argument());
    assert_eq!(sw.num_cases(&ctx), 1);
    assert_eq!(sw.case(&ctx, 0), Some((c1, then_bb)));
    assert_eq!(sw.default_dest(&ctx), Some(else_bb));
    assert_eq!(ctx.num_uses(then_bb.value()), 1);
    let t = ctx.const_bool(true).value();
    let br = ctx.build().at_end(then_bb).cond_br(t, else_bb, then_bb).unwrap();
    assert!(br.is_conditional(&ctx));
    assert_eq!(br.condition(&ctx), Some(t));
    assert_eq!(br.successors(&ctx), vec![else_bb, then_bb]);
    assert!(ctx.build().cond_br(a, else_bb, then_bb).unwrap_err().is_invalid_argument());
    let phi = ctx.build().at_end(else_bb).phi(i32_ty).unwrap();
    phi.add_incoming(&mut ctx, a, bb).unwrap();
    phi.add_incoming(&mut ctx, c1.value(), then_bb).unwrap();
    assert!(phi.add_incoming(&mut ctx, t, bb).unwrap_err().is_invalid_argument());
    assert_eq!(phi.num_incoming(&ctx), 2);
    assert_eq!(phi.incoming_value(&ctx, 1), Some(c1.value()));
    assert_eq!(phi.incoming_block(&ctx, 0), Some(bb));
    let ret = ctx.build().at_end(else_bb).ret(Some(phi.value())).unwrap();
    assert_eq!(else_bb.terminator(&ctx).map(Value::from), Some(ret.value()));
    ctx.build().unreachable().unwrap();
    ctx.check_use_lists();
  }

  #[test]
  fn calls() {
    let Env { mut ctx, func, bb, i32_ty } = env();
    let a = func.args(&ctx)[0].value();
    let void = ctx.void_type();
    let i8_ptr = {
      let i8_ty = ctx.types().int8();
      ctx.pointer_to(i8_ty).unwrap()
    };
    let printf_ty = ctx.function_type(i32_ty, &[i8_ptr], true).unwrap();
    let printf = ctx.new_function("printf", printf_ty).unwrap();
    let fmt = ctx.const_null(i8_ptr).unwrap().value();
    let call = ctx
      .build()
      .at_end(bb)
      .call(printf.value(), &[fmt, a, a])
      .unwrap();
    assert_eq!(call.called_function(&ctx), Some(printf));
    assert_eq!(call.num_args(&ctx), 3);
    assert_eq!(call.arg(&ctx, 1), Some(a));
    assert_eq!(call.function_type(&ctx), printf_ty);
    assert_eq!(ctx.value_type(call.value()), i32_ty);
    assert!(ctx.build().call(printf.value(), &[]).unwrap_err().is_invalid_argument());
    assert!(ctx.build().call(printf.value(), &[a]).unwrap_err().is_invalid_argument());
    assert!(ctx.build().call(a, &[]).unwrap_err().is_invalid_argument());
    let fn_ty = ctx.function_type(void, &[], false).unwrap();
    let g = ctx.new_function("g", fn_ty).unwrap();
    let err = ctx.build().name("x").call(g.value(), &[]).unwrap_err();
    assert!(err.is_invalid_argument());
    let c = ctx.build().call(g.value(), &[]).unwrap();
    assert_eq!(ctx.value_type(c.value()), void);
    assert_eq!(ctx.num_uses(printf.value()), 1);
    // tail call marker and calling convention
    assert_eq!(c.tail_call_kind(&ctx), TailCallKind::None);
    assert!(!c.is_tail_call(&ctx));
    assert_eq!(c.calling_conv(&ctx), CallingConv::C);
    c.set_tail_call_kind(&mut ctx, TailCallKind::MustTail);
    c.set_calling_conv(&mut ctx, CallingConv::FAST);
    assert_eq!(c.tail_call_kind(&ctx), TailCallKind::MustTail);
    assert!(c.is_tail_call(&ctx));
    assert_eq!(c.calling_conv(&ctx), CallingConv::FAST);
    assert_eq!(call.tail_call_kind(&ctx), TailCallKind::None);
    assert_eq!(call.calling_conv(&ctx), CallingConv::C);
  }
}
