//! Context ([`Context`]), the owner of all types and values.

use crate::error::{ensure_arg, fatal, Error, Result};
use crate::ir::builder::{InsertPoint, InstBuilder};
use crate::ir::classes::*;
use crate::ir::dfg::DataFlowGraph;
use crate::ir::entities::{Value, ValueData, ValueKind};
use crate::ir::idman::{next_context_id, ContextId};
use crate::ir::instructions::InstData;
use crate::ir::layout::Layout;
use crate::ir::type_table::TypeTable;
use crate::ir::types::{Type, TypeData, TypeKind};
use crate::ir::uses::{Use, UseData, UseIter};
use crate::ir::values::*;
use log::{debug, trace};
use std::collections::HashMap;

/// An IR context.
///
/// `Context` owns the canonical type table ([`TypeTable`]), the data flow
/// graph ([`DataFlowGraph`]) of every value created through it, the layout
/// ([`Layout`]) of functions and basic blocks, and the constant pools.
///
/// Every handle produced by a context carries the ID of the context.
/// Passing a handle to another context is rejected.
pub struct Context {
  id: ContextId,
  types: TypeTable,
  dfg: DataFlowGraph,
  layout: Layout,
  int_consts: HashMap<(Type, u64), ConstantInt>,
  fp_consts: HashMap<(Type, u64), ConstantFp>,
  null_consts: HashMap<Type, ConstantPointerNull>,
  undefs: HashMap<Type, UndefValue>,
  funcs: Vec<Function>,
  func_names: HashMap<String, Function>,
}

impl Context {
  /// Creates a new context.
  pub fn new() -> Self {
    let id = next_context_id();
    debug!("new context {:?}", id);
    Self {
      id,
      types: TypeTable::new(id),
      dfg: DataFlowGraph::new(id),
      layout: Layout::new(),
      int_consts: HashMap::new(),
      fp_consts: HashMap::new(),
      null_consts: HashMap::new(),
      undefs: HashMap::new(),
      funcs: Vec::new(),
      func_names: HashMap::new(),
    }
  }

  /// Returns a reference to the type table.
  pub fn types(&self) -> &TypeTable {
    &self.types
  }

  /// Returns a mutable reference to the type table.
  pub fn types_mut(&mut self) -> &mut TypeTable {
    &mut self.types
  }

  /// Returns a reference to the data flow graph.
  pub fn dfg(&self) -> &DataFlowGraph {
    &self.dfg
  }

  /// Returns a reference to the layout.
  pub fn layout(&self) -> &Layout {
    &self.layout
  }

  /// Returns the `void` type.
  pub fn void_type(&self) -> Type {
    self.types.void()
  }

  /// Returns the `label` type.
  pub fn label_type(&self) -> Type {
    self.types.label()
  }

  /// Returns the `i1` type.
  pub fn bool_type(&self) -> Type {
    self.types.int1()
  }

  /// Gets the integer type with the given bit width.
  pub fn int_type(&mut self, bits: u32) -> Result<Type> {
    self.types.get_int(bits)
  }

  /// Gets the pointer type to the given type in address space 0.
  pub fn pointer_to(&mut self, pointee: Type) -> Result<Type> {
    self.types.get_pointer(pointee, 0)
  }

  /// Gets the function type.
  pub fn function_type(&mut self, ret: Type, params: &[Type], var_arg: bool) -> Result<Type> {
    self.types.get_function(ret, params, var_arg)
  }

  /// Checks if the given value is alive in the current context.
  ///
  /// Returns [`Error::CrossContext`] for values of other contexts.
  ///
  /// # Panics
  ///
  /// Panics if the value has been erased.
  pub fn check_value(&self, value: Value) -> Result<()> {
    self.dfg.check_value(value)
  }

  /// Returns a reference to the data of the given value.
  ///
  /// # Panics
  ///
  /// Panics if the value belongs to another context or has been erased.
  pub fn value_data(&self, value: Value) -> &ValueData {
    if value.ctx() != self.id {
      fatal!("value {:?} belongs to another context", value);
    }
    self.dfg.value(value)
  }

  /// Returns the type of the given value.
  pub fn value_type(&self, value: Value) -> Type {
    self.value_data(value).ty()
  }

  /// Returns the kind of the given value.
  pub fn value_kind(&self, value: Value) -> &ValueKind {
    self.value_data(value).kind()
  }

  /// Returns the name of the given value.
  pub fn value_name(&self, value: Value) -> Option<&str> {
    self.value_data(value).name()
  }

  /// Sets the name of the given value.
  ///
  /// Void-typed values can not be named. Function names must be unique
  /// in the context.
  pub fn set_value_name(&mut self, value: Value, name: Option<&str>) -> Result<()> {
    self.check_value(value)?;
    ensure_arg!(
      name.is_none() || self.value_type(value) != self.types.void(),
      "can not name a value of type `void`"
    );
    if let Some(func) = self.dyn_cast::<Function>(value) {
      let name = name.ok_or_else(|| Error::InvalidArgument("functions must be named".into()))?;
      match self.func_names.get(name) {
        Some(f) if *f == func => return Ok(()),
        Some(_) => {
          return Err(Error::InvalidArgument(format!(
            "function `{}` already exists",
            name
          )))
        }
        None => (),
      }
      if let Some(old) = self.value_name(value) {
        let old = old.to_string();
        self.func_names.remove(&old);
      }
      self.func_names.insert(name.into(), func);
    }
    self
      .dfg
      .value_mut(value)
      .set_name(name.map(|n| n.to_string()));
    Ok(())
  }

  /// Returns `true` if values of the given class include `value`.
  pub fn isa<T: ValueClass>(&self, value: Value) -> bool {
    T::classof(self.value_kind(value))
  }

  /// Downcasts the given value, returns `None` if the value is not of
  /// the given class.
  pub fn dyn_cast<T: ValueClass>(&self, value: Value) -> Option<T> {
    if self.isa::<T>(value) {
      Some(T::from_value_unchecked(value))
    } else {
      None
    }
  }

  /// Downcasts the given value.
  ///
  /// # Panics
  ///
  /// Panics if the value is not of the given class.
  pub fn cast<T: ValueClass>(&self, value: Value) -> T {
    match self.dyn_cast(value) {
      Some(v) => v,
      None => fatal!(
        "can not cast {:?} to `{}`",
        value,
        std::any::type_name::<T>()
      ),
    }
  }

  /// Returns the value in operand slot `index` of `user`, `None` if the
  /// slot is empty.
  ///
  /// Fails if `user` is not a user or the index is out of range.
  pub fn operand(&self, user: Value, index: usize) -> Result<Option<Value>> {
    self.check_value(user)?;
    let data = self.value_data(user);
    ensure_arg!(data.is_user(), "value {:?} is not a user", user);
    let u = data.operands().get(index).ok_or_else(|| {
      Error::InvalidArgument(format!(
        "operand index {} out of range, user has {} operands",
        index,
        data.operands().len()
      ))
    })?;
    Ok(self.dfg.use_data(*u).value())
  }

  /// Returns all operands of the given value in order.
  pub fn operands(&self, user: Value) -> Vec<Option<Value>> {
    self.operand_values(user).collect()
  }

  /// Returns the number of operands of the given value.
  pub fn num_operands(&self, user: Value) -> usize {
    self.operand_slots(user).len()
  }

  /// Returns an iterator over the use list of the given value, starting
  /// from the most recently attached use.
  pub fn uses(&self, value: Value) -> UseIter {
    self.value_data(value);
    self.dfg.uses(value)
  }

  /// Returns a reference to the data of the given use.
  pub fn use_data(&self, u: Use) -> &UseData {
    self.dfg.use_data(u)
  }

  /// Returns the users of the given value, one entry per use.
  pub fn users(&self, value: Value) -> Vec<Value> {
    self
      .uses(value)
      .map(|u| self.dfg.use_data(u).user())
      .collect()
  }

  /// Returns the number of uses of the given value.
  pub fn num_uses(&self, value: Value) -> usize {
    self.value_data(value).num_uses()
  }

  /// Returns `true` if the given value has any use.
  pub fn has_uses(&self, value: Value) -> bool {
    self.num_uses(value) != 0
  }

  /// Returns `true` if the given value has exactly one use.
  pub fn has_one_use(&self, value: Value) -> bool {
    self.num_uses(value) == 1
  }

  /// Points operand slot `index` of `user` to `value`, or empties the
  /// slot if `value` is `None`.
  ///
  /// Fails without changing anything if `user` is not a user, the index is
  /// out of range, or any value belongs to another context.
  pub fn set_operand(&mut self, user: Value, index: usize, value: Option<Value>) -> Result<()> {
    self.check_value(user)?;
    if let Some(value) = value {
      self.check_value(value)?;
    }
    self.dfg.set_operand(user, index, value)
  }

  /// Makes every use of `old` point to `new`.
  ///
  /// Fails if the values have different types. Does nothing if `old`
  /// and `new` are the same value.
  pub fn replace_all_uses_with(&mut self, old: Value, new: Value) -> Result<()> {
    self.check_value(old)?;
    self.check_value(new)?;
    self.dfg.replace_all_uses_with(old, new)
  }

  /// Empties every use of the given value.
  pub fn drop_all_uses(&mut self, value: Value) -> Result<()> {
    self.check_value(value)?;
    self.dfg.drop_all_uses(value);
    Ok(())
  }

  /// Empties every operand slot of the given user, so it no longer uses
  /// any value.
  pub fn drop_all_references(&mut self, user: Value) -> Result<()> {
    self.check_value(user)?;
    self.dfg.drop_all_references(user);
    Ok(())
  }

  /// Checks that operand slots and use lists of the whole context agree
  /// with each other.
  ///
  /// # Panics
  ///
  /// Panics if any mismatch is found.
  pub fn check_use_lists(&self) {
    self.dfg.check_use_lists()
  }

  /// Gets the integer constant of the given type.
  ///
  /// The value is truncated to the bit width of the type.
  pub fn const_int(&mut self, ty: Type, value: u64) -> Result<ConstantInt> {
    self.types.check(ty)?;
    let width = match self.types.data(ty) {
      TypeData::Integer(width) => *width,
      TypeData::Vector(..) => return Err(Error::Unsupported("vector constants".into())),
      _ => {
        return Err(Error::InvalidArgument(format!(
          "`{}` is not an integer type",
          self.types.display(ty)
        )))
      }
    };
    if width > 64 {
      return Err(Error::Unsupported(format!(
        "integer constants wider than 64 bits (`i{}`)",
        width
      )));
    }
    let data = ConstantIntData::new(value, width);
    let key = (ty, data.zext_value());
    let dfg = &mut self.dfg;
    Ok(
      *self
        .int_consts
        .entry(key)
        .or_insert_with(|| {
          let value = dfg.new_value(ty, ValueKind::ConstantInt(data));
          ConstantInt::from_value_unchecked(value)
        }),
    )
  }

  /// Gets the `i1` constant of the given boolean.
  pub fn const_bool(&mut self, value: bool) -> ConstantInt {
    let ty = self.types.int1();
    let data = ConstantIntData::new(value as u64, 1);
    let dfg = &mut self.dfg;
    *self
      .int_consts
      .entry((ty, value as u64))
      .or_insert_with(|| {
        let value = dfg.new_value(ty, ValueKind::ConstantInt(data));
        ConstantInt::from_value_unchecked(value)
      })
  }

  /// Gets the floating point constant of the given type.
  ///
  /// The value is rounded to the precision of the type.
  pub fn const_fp(&mut self, ty: Type, value: f64) -> Result<ConstantFp> {
    self.types.check(ty)?;
    let value = match self.types.kind(ty) {
      TypeKind::Float => value as f32 as f64,
      TypeKind::Double => value,
      TypeKind::Half => return Err(Error::Unsupported("`half` constants".into())),
      _ => {
        return Err(Error::InvalidArgument(format!(
          "`{}` is not a floating point type",
          self.types.display(ty)
        )))
      }
    };
    let data = ConstantFpData::new(value);
    let dfg = &mut self.dfg;
    Ok(
      *self
        .fp_consts
        .entry((ty, data.bits()))
        .or_insert_with(|| {
          let value = dfg.new_value(ty, ValueKind::ConstantFp(data));
          ConstantFp::from_value_unchecked(value)
        }),
    )
  }

  /// Gets the null pointer constant of the given pointer type.
  pub fn const_null(&mut self, ty: Type) -> Result<ConstantPointerNull> {
    self.types.check(ty)?;
    ensure_arg!(
      self.types.kind(ty) == TypeKind::Pointer,
      "`{}` is not a pointer type",
      self.types.display(ty)
    );
    let dfg = &mut self.dfg;
    Ok(
      *self
        .null_consts
        .entry(ty)
        .or_insert_with(|| {
          let value = dfg.new_value(ty, ValueKind::ConstantNull);
          ConstantPointerNull::from_value_unchecked(value)
        }),
    )
  }

  /// Gets the undefined value of the given first-class type.
  pub fn undef(&mut self, ty: Type) -> Result<UndefValue> {
    self.types.check(ty)?;
    ensure_arg!(
      self.types.kind(ty).is_first_class(),
      "`{}` is not a first-class type",
      self.types.display(ty)
    );
    let dfg = &mut self.dfg;
    Ok(
      *self
        .undefs
        .entry(ty)
        .or_insert_with(|| UndefValue::from_value_unchecked(dfg.new_value(ty, ValueKind::Undef))),
    )
  }

  /// Creates a new function with the given name and function type.
  ///
  /// The function value is of the pointer type to the function type, and
  /// has one argument for each parameter.
  pub fn new_function(&mut self, name: &str, ty: Type) -> Result<Function> {
    self.types.check(ty)?;
    ensure_arg!(
      self.types.kind(ty) == TypeKind::Function,
      "`{}` is not a function type",
      self.types.display(ty)
    );
    ensure_arg!(
      !self.func_names.contains_key(name),
      "function `{}` already exists",
      name
    );
    let ptr_ty = self.types.get_pointer(ty, 0)?;
    let params = match self.types.function(ty) {
      Some(f) => f.params().to_vec(),
      None => fatal!("function type without parameters"),
    };
    let value = self
      .dfg
      .new_value(ptr_ty, ValueKind::Function(FunctionData::new(ty)));
    let func = Function::from_value_unchecked(value);
    for (i, param) in params.into_iter().enumerate() {
      let arg = self
        .dfg
        .new_value(param, ValueKind::Argument(ArgumentData::new(func, i)));
      if let ValueKind::Function(data) = self.dfg.value_mut(value).kind_mut() {
        data.args_mut().push(Argument::from_value_unchecked(arg));
      }
    }
    self.dfg.value_mut(value).set_name(Some(name.into()));
    self.func_names.insert(name.into(), func);
    self.funcs.push(func);
    self.layout.new_func(func);
    debug!("new function `{}`", name);
    Ok(func)
  }

  /// Returns the function with the given name.
  pub fn get_function(&self, name: &str) -> Option<Function> {
    self.func_names.get(name).copied()
  }

  /// Returns all functions in creation order.
  pub fn functions(&self) -> &[Function] {
    &self.funcs
  }

  /// Creates a new detached basic block.
  pub fn new_bb(&mut self, name: Option<&str>) -> BasicBlock {
    let value = self.dfg.new_value(self.types.label(), ValueKind::BasicBlock);
    self.dfg.value_mut(value).set_name(name.map(|n| n.to_string()));
    let bb = BasicBlock::from_value_unchecked(value);
    self.layout.new_bb(bb);
    bb
  }

  /// Appends the given detached basic block to the end of `func`.
  pub fn append_bb(&mut self, func: Function, bb: BasicBlock) -> Result<()> {
    self.check_value(func.value())?;
    self.check_detached_bb(bb)?;
    self.layout.push_bb_back(func, bb);
    Ok(())
  }

  /// Inserts the given detached basic block before `before`.
  pub fn insert_bb_before(&mut self, before: BasicBlock, bb: BasicBlock) -> Result<()> {
    self.check_value(before.value())?;
    self.check_detached_bb(bb)?;
    ensure_arg!(
      self.layout.parent_func(before).is_some(),
      "basic block {:?} is detached",
      before
    );
    self.layout.insert_bb_before(before, bb);
    Ok(())
  }

  /// Detaches the given basic block from its parent function.
  /// Returns the old parent.
  pub fn remove_bb_from_parent(&mut self, bb: BasicBlock) -> Result<Option<Function>> {
    self.check_value(bb.value())?;
    Ok(self.layout.remove_bb(bb))
  }

  fn check_detached_bb(&self, bb: BasicBlock) -> Result<()> {
    self.check_value(bb.value())?;
    ensure_arg!(
      self.layout.parent_func(bb).is_none(),
      "basic block {:?} is already in a function",
      bb
    );
    Ok(())
  }

  /// Returns an instruction builder, which creates detached
  /// instructions by default.
  pub fn build(&mut self) -> InstBuilder {
    InstBuilder::new(self)
  }

  /// Detaches the given instruction from its parent basic block.
  /// Returns the old parent.
  pub fn remove_from_parent(&mut self, inst: Instruction) -> Result<Option<BasicBlock>> {
    self.check_value(inst.value())?;
    Ok(self.layout.remove_inst(inst))
  }

  /// Inserts the given detached instruction before `before`.
  pub fn insert_before(&mut self, inst: Instruction, before: Instruction) -> Result<()> {
    self.check_detached_inst(inst)?;
    self.check_insert_point(InsertPoint::Before(before))?;
    self.layout.insert_inst_before(before, inst);
    Ok(())
  }

  /// Appends the given detached instruction to the end of `bb`.
  pub fn append(&mut self, inst: Instruction, bb: BasicBlock) -> Result<()> {
    self.check_detached_inst(inst)?;
    self.check_value(bb.value())?;
    self.layout.push_inst_back(bb, inst);
    Ok(())
  }

  /// Moves the given instruction before `before`, possibly to another
  /// basic block.
  pub fn move_before(&mut self, inst: Instruction, before: Instruction) -> Result<()> {
    self.check_value(inst.value())?;
    ensure_arg!(inst != before, "can not move an instruction before itself");
    self.check_insert_point(InsertPoint::Before(before))?;
    self.layout.remove_inst(inst);
    self.layout.insert_inst_before(before, inst);
    Ok(())
  }

  /// Moves the given instruction to the end of `bb`.
  pub fn move_to_end(&mut self, inst: Instruction, bb: BasicBlock) -> Result<()> {
    self.check_value(inst.value())?;
    self.check_value(bb.value())?;
    self.layout.remove_inst(inst);
    self.layout.push_inst_back(bb, inst);
    Ok(())
  }

  fn check_detached_inst(&self, inst: Instruction) -> Result<()> {
    self.check_value(inst.value())?;
    ensure_arg!(
      self.layout.parent_bb(inst).is_none(),
      "instruction {:?} is already in a basic block",
      inst
    );
    Ok(())
  }

  /// Checks if instructions can be inserted at the given point.
  pub(in crate::ir) fn check_insert_point(&self, at: InsertPoint) -> Result<()> {
    match at {
      InsertPoint::Detached => Ok(()),
      InsertPoint::AtEnd(bb) => self.check_value(bb.value()),
      InsertPoint::Before(inst) => {
        self.check_value(inst.value())?;
        ensure_arg!(
          self.layout.parent_bb(inst).is_some(),
          "can not insert before detached instruction {:?}",
          inst
        );
        Ok(())
      }
    }
  }

  /// Creates a new instruction and inserts it at the given point.
  ///
  /// All operands and the insertion point must have been checked.
  pub(in crate::ir) fn insert_new_inst(
    &mut self,
    ty: Type,
    data: InstData,
    operands: &[Option<Value>],
    at: InsertPoint,
    name: Option<String>,
  ) -> Instruction {
    let arity = data.opcode().arity();
    let value = self
      .dfg
      .new_user(ty, ValueKind::Instruction(data), arity, operands);
    self.dfg.value_mut(value).set_name(name);
    let inst = Instruction::from_value_unchecked(value);
    match at {
      InsertPoint::Detached => (),
      InsertPoint::AtEnd(bb) => self.layout.push_inst_back(bb, inst),
      InsertPoint::Before(before) => self.layout.insert_inst_before(before, inst),
    }
    inst
  }

  /// Detaches the given instruction from its parent, and destroys it.
  ///
  /// # Panics
  ///
  /// Panics if the instruction is still used.
  pub fn erase_inst(&mut self, inst: Instruction) -> Result<()> {
    self.check_value(inst.value())?;
    self.ensure_unused(inst.value());
    self.layout.remove_inst(inst);
    self.dfg.remove_value(inst.value());
    Ok(())
  }

  /// Detaches the given basic block from its parent, and destroys it
  /// together with all its instructions.
  ///
  /// References of the contained instructions are dropped first, so
  /// instructions in the basic block may use each other.
  ///
  /// # Panics
  ///
  /// Panics if the basic block or any of its instructions is still used.
  pub fn erase_bb(&mut self, bb: BasicBlock) -> Result<()> {
    self.check_value(bb.value())?;
    let insts = self.layout.insts(bb);
    for &inst in &insts {
      self.dfg.drop_all_references(inst.value());
    }
    self.ensure_unused(bb.value());
    for inst in insts {
      self.erase_inst(inst)?;
    }
    self.layout.remove_bb(bb);
    self.layout.drop_bb(bb);
    self.dfg.remove_value(bb.value());
    Ok(())
  }

  /// Destroys the given function together with its basic blocks and
  /// arguments.
  ///
  /// # Panics
  ///
  /// Panics if the function or anything in it is still used from outside.
  pub fn erase_function(&mut self, func: Function) -> Result<()> {
    self.check_value(func.value())?;
    let bbs = self.layout.bbs(func);
    for &bb in &bbs {
      for inst in self.layout.insts(bb) {
        self.dfg.drop_all_references(inst.value());
      }
    }
    self.ensure_unused(func.value());
    for bb in bbs {
      self.erase_bb(bb)?;
    }
    for arg in func.args(self).to_vec() {
      self.dfg.remove_value(arg.value());
    }
    if let Some(name) = self.value_name(func.value()) {
      let name = name.to_string();
      self.func_names.remove(&name);
    }
    self.funcs.retain(|f| *f != func);
    self.layout.drop_func(func);
    self.dfg.remove_value(func.value());
    Ok(())
  }

  /// Destroys the given value according to its kind.
  ///
  /// Constants are owned by the context and arguments by their function,
  /// neither of them can be erased.
  pub fn erase_value(&mut self, value: Value) -> Result<()> {
    self.check_value(value)?;
    if let Some(inst) = self.dyn_cast::<Instruction>(value) {
      self.erase_inst(inst)
    } else if let Some(bb) = self.dyn_cast::<BasicBlock>(value) {
      self.erase_bb(bb)
    } else if let Some(func) = self.dyn_cast::<Function>(value) {
      self.erase_function(func)
    } else if self.isa::<Argument>(value) {
      Err(Error::InvalidArgument(
        "arguments are erased with their function".into(),
      ))
    } else {
      Err(Error::InvalidArgument(format!(
        "constant {:?} can not be erased",
        value
      )))
    }
  }

  fn ensure_unused(&self, value: Value) {
    let num_uses = self.num_uses(value);
    if num_uses != 0 {
      fatal!("value {:?} is still used by {} uses", value, num_uses);
    }
  }

  pub(in crate::ir) fn inst_data(&self, inst: Instruction) -> &InstData {
    match self.value_kind(inst.value()) {
      ValueKind::Instruction(data) => data,
      _ => fatal!("value {:?} is not an instruction", inst),
    }
  }

  pub(in crate::ir) fn inst_data_mut(&mut self, inst: Instruction) -> &mut InstData {
    self.value_data(inst.value());
    match self.dfg.value_mut(inst.value()).kind_mut() {
      ValueKind::Instruction(data) => data,
      _ => fatal!("value {:?} is not an instruction", inst),
    }
  }

  pub(in crate::ir) fn operand_slots(&self, user: Value) -> &[Use] {
    self.value_data(user).operands()
  }

  pub(in crate::ir) fn operand_at(&self, user: Value, index: usize) -> Option<Value> {
    self.value_data(user);
    self.dfg.operand(user, index)
  }

  pub(in crate::ir) fn operand_values(&self, user: Value) -> impl Iterator<Item = Option<Value>> + '_ {
    self
      .operand_slots(user)
      .iter()
      .map(move |&u| self.dfg.use_data(u).value())
  }

  pub(in crate::ir) fn push_operand(&mut self, user: Value, value: Value) -> Result<()> {
    self.check_value(user)?;
    self.check_value(value)?;
    self.dfg.push_operand(user, value)
  }
}

impl Default for Context {
  fn default() -> Self {
    Self::new()
  }
}

impl Drop for Context {
  fn drop(&mut self) {
    debug!(
      "drop context {:?}: {} types, {} values, {} use edges",
      self.id,
      self.types.len(),
      self.dfg.num_values(),
      self.dfg.num_use_edges()
    );
    trace!("context {:?} had {} functions", self.id, self.funcs.len());
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::ir::instructions::Opcode;
  use pretty_assertions::assert_eq;

  fn new_func(ctx: &mut Context) -> (Function, BasicBlock) {
    let i32_ty = ctx.types().int32();
    let fn_ty = ctx.function_type(i32_ty, &[i32_ty, i32_ty], false).unwrap();
    let func = ctx.new_function("f", fn_ty).unwrap();
    let bb = ctx.new_bb(Some("entry"));
    ctx.append_bb(func, bb).unwrap();
    (func, bb)
  }

  #[test]
  fn pooled_constants() {
    let mut ctx = Context::new();
    let i8_ty = ctx.types().int8();
    let a = ctx.const_int(i8_ty, 0x1ff).unwrap();
    let b = ctx.const_int(i8_ty, 0xff).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.sext_value(&ctx), -1);
    assert_eq!(ctx.const_bool(true), ctx.const_bool(true));
    assert_ne!(ctx.const_bool(true), ctx.const_bool(false));
    let i128_ty = ctx.int_type(128).unwrap();
    assert!(ctx.const_int(i128_ty, 1).unwrap_err().is_unsupported());
    let half = ctx.types().half();
    assert!(ctx.const_fp(half, 1.0).unwrap_err().is_unsupported());
    let float = ctx.types().float();
    let f = ctx.const_fp(float, 0.1).unwrap();
    assert_eq!(f.value_f64(&ctx), 0.1f32 as f64);
    assert!(ctx.const_null(i8_ty).unwrap_err().is_invalid_argument());
    let ptr = ctx.pointer_to(i8_ty).unwrap();
    assert_eq!(ctx.const_null(ptr).unwrap(), ctx.const_null(ptr).unwrap());
    let void = ctx.void_type();
    assert!(ctx.undef(void).unwrap_err().is_invalid_argument());
    let u = ctx.undef(i8_ty).unwrap();
    assert!(ctx.isa::<Constant>(u.value()));
    assert!(ctx.erase_value(u.value()).unwrap_err().is_invalid_argument());
  }

  #[test]
  fn functions_and_arguments() {
    let mut ctx = Context::new();
    let (func, bb) = new_func(&mut ctx);
    let fn_ty = func.function_type(&ctx);
    assert_eq!(ctx.value_type(func.value()), ctx.pointer_to(fn_ty).unwrap());
    assert_eq!(func.args(&ctx).len(), 2);
    let arg = func.args(&ctx)[1];
    assert_eq!(arg.index(&ctx), 1);
    assert_eq!(arg.parent(&ctx), func);
    assert_eq!(func.entry_bb(&ctx), Some(bb));
    assert_eq!(bb.parent(&ctx), Some(func));
    assert_eq!(ctx.get_function("f"), Some(func));
    assert!(ctx.new_function("f", fn_ty).unwrap_err().is_invalid_argument());
    ctx.erase_function(func).unwrap();
    assert_eq!(ctx.get_function("f"), None);
    assert!(ctx.functions().is_empty());
    ctx.check_use_lists();
  }

  #[test]
  fn replace_and_restore() {
    let mut ctx = Context::new();
    let (func, bb) = new_func(&mut ctx);
    let (a, b) = (func.args(&ctx)[0].value(), func.args(&ctx)[1].value());
    let add = ctx.build().at_end(bb).binary(Opcode::Add, a, a).unwrap();
    let mul = ctx.build().at_end(bb).binary(Opcode::Mul, b, a).unwrap();
    assert_eq!(ctx.num_uses(a), 3);
    ctx.replace_all_uses_with(a, b).unwrap();
    assert!(!ctx.has_uses(a));
    assert_eq!(ctx.operands(add.value()), vec![Some(b), Some(b)]);
    assert_eq!(ctx.operands(mul.value()), vec![Some(b), Some(b)]);
    // move the uses at operand 0 of `add` and operand 1 of `mul` back
    ctx.set_operand(add.value(), 0, Some(a)).unwrap();
    ctx.set_operand(add.value(), 1, Some(a)).unwrap();
    ctx.set_operand(mul.value(), 1, Some(a)).unwrap();
    assert_eq!(ctx.operands(add.value()), vec![Some(a), Some(a)]);
    assert_eq!(ctx.operands(mul.value()), vec![Some(b), Some(a)]);
    assert_eq!(ctx.num_uses(a), 3);
    assert!(ctx.has_one_use(b));
    ctx.check_use_lists();
  }

  #[test]
  fn replace_back_and_forth() {
    let mut ctx = Context::new();
    let (func, bb) = new_func(&mut ctx);
    let (a, b) = (func.args(&ctx)[0].value(), func.args(&ctx)[1].value());
    let add = ctx.build().at_end(bb).binary(Opcode::Add, a, a).unwrap();
    let shl = ctx.build().at_end(bb).binary(Opcode::Shl, add.value(), a).unwrap();
    let before = (ctx.operands(add.value()), ctx.operands(shl.value()));
    assert_eq!(ctx.num_uses(b), 0);
    ctx.replace_all_uses_with(a, b).unwrap();
    assert_eq!(ctx.num_uses(a), 0);
    assert_eq!(ctx.num_uses(b), 3);
    ctx.replace_all_uses_with(b, a).unwrap();
    assert_eq!(ctx.operands(add.value()), before.0);
    assert_eq!(ctx.operands(shl.value()), before.1);
    assert_eq!(ctx.num_uses(a), 3);
    assert_eq!(ctx.num_uses(b), 0);
    ctx.check_use_lists();
  }

  #[test]
  fn set_operand_out_of_range() {
    let mut ctx = Context::new();
    let (func, bb) = new_func(&mut ctx);
    let a = func.args(&ctx)[0].value();
    let add = ctx.build().at_end(bb).binary(Opcode::Add, a, a).unwrap();
    let err = ctx.set_operand(add.value(), 2, None).unwrap_err();
    assert!(err.is_invalid_argument());
    assert!(ctx.operand(add.value(), 2).unwrap_err().is_invalid_argument());
    assert_eq!(ctx.operands(add.value()), vec![Some(a), Some(a)]);
    assert!(ctx.set_operand(a, 0, None).unwrap_err().is_invalid_argument());
  }

  #[test]
  fn users_in_use_order() {
    let mut ctx = Context::new();
    let (func, bb) = new_func(&mut ctx);
    let a = func.args(&ctx)[0].value();
    let x = ctx.build().at_end(bb).binary(Opcode::Add, a, a).unwrap();
    let y = ctx.build().at_end(bb).binary(Opcode::Sub, a, a).unwrap();
    let users = ctx.users(a);
    assert_eq!(users, vec![y.value(), y.value(), x.value(), x.value()]);
    let nos: Vec<_> = ctx.uses(a).map(|u| ctx.use_data(u).operand_no()).collect();
    assert_eq!(nos, vec![1, 0, 1, 0]);
  }

  #[test]
  fn insertion_modes() {
    let mut ctx = Context::new();
    let (func, bb) = new_func(&mut ctx);
    let a = func.args(&ctx)[0].value();
    let x = ctx.build().at_end(bb).binary(Opcode::Add, a, a).unwrap();
    let z = ctx.build().at_end(bb).binary(Opcode::Mul, a, a).unwrap();
    let y = ctx.build().before(z.into()).binary(Opcode::Sub, a, a).unwrap();
    let d = ctx.build().binary(Opcode::Xor, a, a).unwrap();
    let (x, y, z, d) = (Instruction::from(x), Instruction::from(y), Instruction::from(z), Instruction::from(d));
    assert_eq!(bb.insts(&ctx), vec![x, y, z]);
    assert_eq!(d.parent(&ctx), None);
    assert_eq!(y.parent(&ctx), Some(bb));
    assert_eq!(y.prev(&ctx), Some(x));
    assert_eq!(y.next(&ctx), Some(z));
    ctx.insert_before(d, x).unwrap();
    assert_eq!(bb.insts(&ctx), vec![d, x, y, z]);
    assert!(ctx.insert_before(d, z).unwrap_err().is_invalid_argument());
    ctx.move_before(z, x).unwrap();
    assert_eq!(bb.insts(&ctx), vec![d, z, x, y]);
    ctx.move_to_end(d, bb).unwrap();
    assert_eq!(bb.insts(&ctx), vec![z, x, y, d]);
    assert_eq!(ctx.remove_from_parent(x).unwrap(), Some(bb));
    assert_eq!(x.parent(&ctx), None);
    assert_eq!(bb.insts(&ctx), vec![z, y, d]);
    assert!(ctx.build().before(x).binary(Opcode::Add, a, a).unwrap_err().is_invalid_argument());
    ctx.append(x, bb).unwrap();
    assert_eq!(bb.back(&ctx), Some(x));
    ctx.erase_inst(y).unwrap();
    assert_eq!(bb.insts(&ctx), vec![z, d, x]);
    ctx.check_use_lists();
  }

  #[test]
  fn basic_block_order() {
    let mut ctx = Context::new();
    let (func, entry) = new_func(&mut ctx);
    let exit = ctx.new_bb(Some("exit"));
    let mid = ctx.new_bb(None);
    ctx.append_bb(func, exit).unwrap();
    ctx.insert_bb_before(exit, mid).unwrap();
    assert_eq!(func.basic_blocks(&ctx), vec![entry, mid, exit]);
    assert_eq!(ctx.layout().next_bb(mid), Some(exit));
    assert!(ctx.append_bb(func, mid).unwrap_err().is_invalid_argument());
    assert_eq!(ctx.remove_bb_from_parent(mid).unwrap(), Some(func));
    assert_eq!(mid.parent(&ctx), None);
    assert_eq!(func.basic_blocks(&ctx), vec![entry, exit]);
    assert_eq!(ctx.value_name(exit.value()), Some("exit"));
    assert_eq!(ctx.value_type(exit.value()), ctx.label_type());
  }

  #[test]
  fn erase_block_with_cycles() {
    let mut ctx = Context::new();
    let (func, entry) = new_func(&mut ctx);
    let a = func.args(&ctx)[0].value();
    let bb = ctx.new_bb(Some("loop"));
    ctx.append_bb(func, bb).unwrap();
    ctx.build().at_end(entry).br(bb).unwrap();
    let i32_ty = ctx.types().int32();
    let phi = ctx.build().at_end(bb).phi(i32_ty).unwrap();
    let next = ctx.build().at_end(bb).binary(Opcode::Add, phi.value(), a).unwrap();
    phi.add_incoming(&mut ctx, a, entry).unwrap();
    phi.add_incoming(&mut ctx, next.value(), bb).unwrap();
    ctx.build().at_end(bb).br(bb).unwrap();
    // the branch in `entry` still uses the block
    let br = entry.terminator(&ctx).unwrap();
    ctx.erase_inst(br.into()).unwrap();
    ctx.erase_bb(bb).unwrap();
    assert_eq!(func.basic_blocks(&ctx), vec![entry]);
    assert_eq!(ctx.num_uses(a), 0);
    ctx.check_use_lists();
  }

  #[test]
  #[should_panic(expected = "is still used")]
  fn erase_used_value() {
    let mut ctx = Context::new();
    let (func, bb) = new_func(&mut ctx);
    let a = func.args(&ctx)[0].value();
    let x = ctx.build().at_end(bb).binary(Opcode::Add, a, a).unwrap();
    ctx.build().at_end(bb).ret(Some(x.value())).unwrap();
    let _ = ctx.erase_inst(x.into());
  }

  #[test]
  fn cross_context_rejected() {
    let mut ctx = Context::new();
    let mut other = Context::new();
    let (func, bb) = new_func(&mut ctx);
    let a = func.args(&ctx)[0].value();
    let foreign = other.const_bool(true);
    let i32_ty = other.types().int32();
    assert!(ctx.const_int(i32_ty, 1).unwrap_err().is_cross_context());
    assert!(ctx.build().at_end(bb).binary(Opcode::Add, a, foreign.value()).unwrap_err().is_cross_context());
    assert!(ctx.replace_all_uses_with(a, foreign.value()).unwrap_err().is_cross_context());
    assert!(other.append_bb(func, bb).unwrap_err().is_cross_context());
    assert!(bb.insts(&ctx).is_empty());
  }

  #[test]
  #[should_panic(expected = "belongs to another context")]
  fn cross_context_query() {
    let ctx = Context::new();
    let mut other = Context::new();
    let v = other.const_bool(false);
    ctx.value_type(v.value());
  }

  #[test]
  fn value_names() {
    let mut ctx = Context::new();
    let (func, bb) = new_func(&mut ctx);
    let a = func.args(&ctx)[0].value();
    ctx.set_value_name(a, Some("a")).unwrap();
    assert_eq!(ctx.value_name(a), Some("a"));
    let ret = ctx.build().at_end(bb).ret(Some(a)).unwrap();
    assert!(ctx.set_value_name(ret.value(), Some("r")).unwrap_err().is_invalid_argument());
    let i32_ty = ctx.types().int32();
    let fn_ty = ctx.function_type(i32_ty, &[], false).unwrap();
    let g = ctx.new_function("g", fn_ty).unwrap();
    assert!(ctx.set_value_name(g.value(), Some("f")).unwrap_err().is_invalid_argument());
    ctx.set_value_name(g.value(), Some("h")).unwrap();
    assert_eq!(ctx.get_function("h"), Some(g));
    assert_eq!(ctx.get_function("g"), None);
    assert_eq!(g.name(&ctx), "h");
  }

  #[test]
  fn class_predicates_agree_with_categories() {
    let mut ctx = Context::new();
    let (func, bb) = new_func(&mut ctx);
    let a = func.args(&ctx)[0].value();
    let add = ctx.build().at_end(bb).binary(Opcode::Add, a, a).unwrap();
    let i64_ty = ctx.types().int64();
    let ext = ctx.build().at_end(bb).cast(Opcode::SExt, a, i64_ty).unwrap();
    let ret = ctx.build().at_end(bb).ret(Some(a)).unwrap();
    for inst in bb.insts(&ctx) {
      let v = inst.value();
      let op = inst.opcode(&ctx);
      assert_eq!(ctx.isa::<TerminatorInst>(v), op.is_terminator());
      assert_eq!(ctx.isa::<BinaryOperator>(v), op.is_binary_op());
      assert_eq!(ctx.isa::<CastInst>(v), op.is_cast());
      assert!(ctx.isa::<User>(v));
    }
    assert!(ctx.dyn_cast::<BinaryOperator>(add.value()).is_some());
    assert!(ctx.dyn_cast::<ReturnInst>(ext.value()).is_none());
    assert!(!ctx.isa::<Instruction>(a));
    assert!(ctx.isa::<Argument>(a));
    assert_eq!(ret.return_value(&ctx), Some(a));
    assert_eq!(bb.terminator(&ctx).map(Value::from), Some(ret.value()));
  }

  #[test]
  #[should_panic(expected = "can not cast")]
  fn failed_cast() {
    let mut ctx = Context::new();
    let v = ctx.const_bool(true);
    ctx.cast::<Instruction>(v.value());
  }
}
