//! Data flow graph ([`DataFlowGraph`]) of a context.

use crate::error::{ensure_arg, fatal, Error, Result};
use crate::ir::entities::{Value, ValueData, ValueKind};
use crate::ir::idman::{ContextId, ValueIdAllocator};
use crate::ir::types::Type;
use crate::ir::uses::{Arity, OperandList, Use, UseData, UseIter};
use log::trace;
use std::collections::HashMap;

/// Data flow graph of a context.
///
/// `DataFlowGraph` holds all data of values ([`ValueData`]) and all use
/// edges ([`UseData`]), and maintains the use-define and define-use chain.
///
/// Use edges live in an arena. Every value keeps a doubly linked list of
/// the uses that target it, threaded through the arena by `prev` and
/// `next`, so attaching and detaching a use are both O(1).
pub struct DataFlowGraph {
  ctx: ContextId,
  ids: ValueIdAllocator,
  values: HashMap<Value, ValueData>,
  uses: Vec<UseSlot>,
  free_uses: Vec<u32>,
}

/// A slot in the use arena.
struct UseSlot {
  gen: u32,
  data: Option<UseData>,
}

/// Returns a mutable reference of the use data by the given use handle.
macro_rules! use_mut {
  ($self:ident, $u:expr) => {
    match $self.uses.get_mut($u.index()) {
      Some(UseSlot {
        gen,
        data: Some(data),
      }) if *gen == $u.gen() => data,
      _ => fatal!("use {:?} does not exist", $u),
    }
  };
}

impl DataFlowGraph {
  /// Creates a new data flow graph.
  pub(in crate::ir) fn new(ctx: ContextId) -> Self {
    Self {
      ctx,
      ids: ValueIdAllocator::new(),
      values: HashMap::new(),
      uses: Vec::new(),
      free_uses: Vec::new(),
    }
  }

  /// Creates a new value without operands.
  /// Returns the handle of the created value.
  pub(in crate::ir) fn new_value(&mut self, ty: Type, kind: ValueKind) -> Value {
    let value = Value::new(self.ctx, self.ids.next_id());
    trace!("new value {:?}: {:?}", value, kind);
    self
      .values
      .insert(value, ValueData::new(ty, kind, OperandList::None));
    value
  }

  /// Creates a new user, and attaches each operand slot to the
  /// corresponding value. Returns the handle of the created user.
  ///
  /// All operands must have been checked by the caller.
  pub(in crate::ir) fn new_user(
    &mut self,
    ty: Type,
    kind: ValueKind,
    arity: Arity,
    operands: &[Option<Value>],
  ) -> Value {
    let value = Value::new(self.ctx, self.ids.next_id());
    trace!("new user {:?}: {:?}", value, kind);
    let uses: Vec<_> = (0..operands.len())
      .map(|i| self.alloc_use(value, i))
      .collect();
    let list = match arity {
      Arity::Fixed(n) => {
        debug_assert_eq!(n, operands.len(), "operand count mismatch");
        OperandList::Fixed(uses.clone().into_boxed_slice())
      }
      Arity::Variadic => OperandList::Variadic(uses.clone()),
    };
    self.values.insert(value, ValueData::new(ty, kind, list));
    for (u, v) in uses.into_iter().zip(operands) {
      if let Some(v) = v {
        self.attach(u, *v);
      }
    }
    value
  }

  /// Checks if the given value belongs to the current graph.
  ///
  /// Returns [`Error::CrossContext`] if the value was created by another
  /// context.
  ///
  /// # Panics
  ///
  /// Panics if the value was created by the current context but has
  /// already been erased.
  pub fn check_value(&self, value: Value) -> Result<()> {
    if value.ctx() != self.ctx {
      return Err(Error::CrossContext(format!(
        "value {:?} belongs to another context",
        value
      )));
    }
    if !self.values.contains_key(&value) {
      fatal!("value {:?} has been erased", value);
    }
    Ok(())
  }

  /// Returns `true` if the given value is alive in the current graph.
  pub fn contains(&self, value: Value) -> bool {
    self.values.contains_key(&value)
  }

  /// Returns a reference to the data of the given value.
  ///
  /// # Panics
  ///
  /// Panics if the given value does not exist.
  pub fn value(&self, value: Value) -> &ValueData {
    match self.values.get(&value) {
      Some(data) => data,
      None => fatal!("value {:?} does not exist", value),
    }
  }

  /// Returns a mutable reference to the data of the given value.
  ///
  /// # Panics
  ///
  /// Panics if the given value does not exist.
  pub(in crate::ir) fn value_mut(&mut self, value: Value) -> &mut ValueData {
    match self.values.get_mut(&value) {
      Some(data) => data,
      None => fatal!("value {:?} does not exist", value),
    }
  }

  /// Returns an iterator over all alive values, in no particular order.
  pub fn values(&self) -> impl Iterator<Item = (&Value, &ValueData)> {
    self.values.iter()
  }

  /// Returns the number of alive values.
  pub fn num_values(&self) -> usize {
    self.values.len()
  }

  /// Returns the number of alive use edges.
  pub fn num_use_edges(&self) -> usize {
    self.uses.len() - self.free_uses.len()
  }

  /// Returns a reference to the data of the given use.
  ///
  /// # Panics
  ///
  /// Panics if the given use does not exist, or its edge has been
  /// removed.
  pub fn use_data(&self, u: Use) -> &UseData {
    match self.uses.get(u.index()) {
      Some(UseSlot {
        gen,
        data: Some(data),
      }) if *gen == u.gen() => data,
      _ => fatal!("use {:?} does not exist", u),
    }
  }

  /// Returns an iterator over the use list of the given value.
  pub fn uses(&self, value: Value) -> UseIter {
    UseIter {
      dfg: self,
      cur: self.value(value).first_use,
    }
  }

  /// Returns the value in operand slot `index` of `user`, `None` if the
  /// slot is empty or out of range.
  pub fn operand(&self, user: Value, index: usize) -> Option<Value> {
    self
      .value(user)
      .operands()
      .get(index)
      .and_then(|&u| self.use_data(u).value)
  }

  fn alloc_use(&mut self, user: Value, operand_no: usize) -> Use {
    let data = UseData::new(user, operand_no);
    match self.free_uses.pop() {
      Some(index) => {
        let slot = &mut self.uses[index as usize];
        slot.data = Some(data);
        Use::new(index, slot.gen)
      }
      None => {
        self.uses.push(UseSlot {
          gen: 0,
          data: Some(data),
        });
        Use::new((self.uses.len() - 1) as u32, 0)
      }
    }
  }

  fn free_use(&mut self, u: Use) {
    self.detach(u);
    let slot = &mut self.uses[u.index()];
    slot.data = None;
    slot.gen = slot.gen.wrapping_add(1);
    self.free_uses.push(u.index() as u32);
  }

  /// Links the given empty use at the head of the use list of `target`.
  fn attach(&mut self, u: Use, target: Value) {
    let head = {
      let data = self.value_mut(target);
      let head = data.first_use.replace(u);
      data.num_uses += 1;
      head
    };
    if let Some(head) = head {
      use_mut!(self, head).prev = Some(u);
    }
    let data = use_mut!(self, u);
    debug_assert!(data.value.is_none(), "attaching an attached use");
    data.value = Some(target);
    data.prev = None;
    data.next = head;
  }

  /// Unlinks the given use from the use list of its target,
  /// does nothing if the use is empty.
  fn detach(&mut self, u: Use) {
    let (target, prev, next) = {
      let data = use_mut!(self, u);
      let target = match data.value.take() {
        Some(target) => target,
        None => return,
      };
      (target, data.prev.take(), data.next.take())
    };
    match prev {
      Some(prev) => use_mut!(self, prev).next = next,
      None => self.value_mut(target).first_use = next,
    }
    if let Some(next) = next {
      use_mut!(self, next).prev = prev;
    }
    self.value_mut(target).num_uses -= 1;
  }

  /// Points operand slot `index` of `user` to `value`, or empties the slot
  /// if `value` is `None`.
  ///
  /// Fails without changing anything if `user` is not a user or the index
  /// is out of range.
  pub(in crate::ir) fn set_operand(
    &mut self,
    user: Value,
    index: usize,
    value: Option<Value>,
  ) -> Result<()> {
    let data = self.value(user);
    ensure_arg!(data.is_user(), "value {:?} is not a user", user);
    let u = match data.operands().get(index) {
      Some(u) => *u,
      None => {
        return Err(Error::InvalidArgument(format!(
          "operand index {} out of range, user has {} operands",
          index,
          data.operands().len()
        )))
      }
    };
    self.detach(u);
    if let Some(value) = value {
      self.attach(u, value);
    }
    Ok(())
  }

  /// Appends a new operand slot pointing to `value` to a variadic user.
  pub(in crate::ir) fn push_operand(&mut self, user: Value, value: Value) -> Result<()> {
    ensure_arg!(
      matches!(self.value(user).operands, OperandList::Variadic(..)),
      "value {:?} has no variadic operands",
      user
    );
    let index = self.value(user).operands().len();
    let u = self.alloc_use(user, index);
    if let OperandList::Variadic(uses) = &mut self.value_mut(user).operands {
      uses.push(u);
    }
    self.attach(u, value);
    Ok(())
  }

  /// Retargets every use of `old` to `new`, then the use list of `old`
  /// is empty. Does nothing if `old` and `new` are the same value.
  pub(in crate::ir) fn replace_all_uses_with(&mut self, old: Value, new: Value) -> Result<()> {
    if old == new {
      return Ok(());
    }
    let (old_ty, new_ty) = (self.value(old).ty(), self.value(new).ty());
    ensure_arg!(
      old_ty == new_ty,
      "can not replace {:?} with a value of another type",
      old
    );
    trace!("replace all uses of {:?} with {:?}", old, new);
    while let Some(u) = self.value(old).first_use {
      self.detach(u);
      self.attach(u, new);
    }
    Ok(())
  }

  /// Empties every use of the given value.
  pub(in crate::ir) fn drop_all_uses(&mut self, value: Value) {
    while let Some(u) = self.value(value).first_use {
      self.detach(u);
    }
  }

  /// Empties every operand slot of the given user.
  pub(in crate::ir) fn drop_all_references(&mut self, user: Value) {
    let uses = self.value(user).operands().to_vec();
    for u in uses {
      self.detach(u);
    }
  }

  /// Removes the given value and frees its operand slots.
  /// Returns the corresponding value data.
  ///
  /// # Panics
  ///
  /// Panics if the given value does not exist, or the removed value is
  /// currently used by other values.
  pub(in crate::ir) fn remove_value(&mut self, value: Value) -> ValueData {
    let num_uses = self.value(value).num_uses();
    if num_uses != 0 {
      fatal!("value {:?} is still used by {} uses", value, num_uses);
    }
    let uses = self.value(value).operands().to_vec();
    for u in uses {
      self.free_use(u);
    }
    trace!("remove value {:?}", value);
    match self.values.remove(&value) {
      Some(data) => data,
      None => fatal!("value {:?} does not exist", value),
    }
  }

  /// Walks the whole graph and checks that operand slots and use lists
  /// agree with each other.
  ///
  /// # Panics
  ///
  /// Panics if any mismatch is found.
  pub fn check_use_lists(&self) {
    let mut attached = 0;
    for (&value, data) in &self.values {
      // every use in the list targets the value and links back
      let mut prev = None;
      let mut count = 0;
      for u in self.uses(value) {
        let ud = self.use_data(u);
        if ud.value != Some(value) {
          fatal!("use {:?} in the list of {:?} targets {:?}", u, value, ud.value);
        }
        if ud.prev != prev {
          fatal!("broken back link of use {:?}", u);
        }
        if !self.values.contains_key(&ud.user()) {
          fatal!("use {:?} of {:?} is owned by an erased user", u, value);
        }
        prev = Some(u);
        count += 1;
      }
      if count != data.num_uses() {
        fatal!(
          "value {:?} has {} uses in its list but counts {}",
          value,
          count,
          data.num_uses()
        );
      }
      // every operand slot is owned by the user
      for (i, &u) in data.operands().iter().enumerate() {
        let ud = self.use_data(u);
        if ud.user() != value || ud.operand_no() != i {
          fatal!("operand {} of {:?} is owned by another slot", i, value);
        }
        if ud.value.is_some() {
          attached += 1;
        }
      }
    }
    let listed: usize = self.values.values().map(|d| d.num_uses()).sum();
    if listed != attached {
      fatal!(
        "{} attached operand slots but {} uses in use lists",
        attached,
        listed
      );
    }
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::ir::idman::next_context_id;

  fn new_graph() -> (DataFlowGraph, Type) {
    let ctx = next_context_id();
    (DataFlowGraph::new(ctx), Type::new(ctx, 0))
  }

  fn users_of(dfg: &DataFlowGraph, value: Value) -> Vec<(Value, usize)> {
    dfg
      .uses(value)
      .map(|u| {
        let ud = dfg.use_data(u);
        (ud.user(), ud.operand_no())
      })
      .collect()
  }

  #[test]
  fn attach_and_detach() {
    let (mut dfg, ty) = new_graph();
    let a = dfg.new_value(ty, ValueKind::Undef);
    let b = dfg.new_value(ty, ValueKind::ConstantNull);
    let u1 = dfg.new_user(ty, ValueKind::BasicBlock, Arity::Fixed(2), &[Some(a), Some(a)]);
    let u2 = dfg.new_user(ty, ValueKind::BasicBlock, Arity::Variadic, &[None, Some(b)]);
    assert_eq!(dfg.value(a).num_uses(), 2);
    assert_eq!(users_of(&dfg, a), vec![(u1, 1), (u1, 0)]);
    assert_eq!(dfg.operand(u2, 0), None);
    assert_eq!(dfg.operand(u2, 1), Some(b));
    dfg.set_operand(u1, 0, Some(b)).unwrap();
    assert_eq!(users_of(&dfg, a), vec![(u1, 1)]);
    assert_eq!(users_of(&dfg, b), vec![(u1, 0), (u2, 1)]);
    dfg.check_use_lists();
  }

  #[test]
  fn set_operand_out_of_range() {
    let (mut dfg, ty) = new_graph();
    let a = dfg.new_value(ty, ValueKind::Undef);
    let u = dfg.new_user(ty, ValueKind::BasicBlock, Arity::Fixed(1), &[Some(a)]);
    assert!(dfg.set_operand(u, 1, None).unwrap_err().is_invalid_argument());
    assert!(dfg.set_operand(a, 0, None).unwrap_err().is_invalid_argument());
    assert_eq!(dfg.operand(u, 0), Some(a));
    assert!(dfg.push_operand(u, a).unwrap_err().is_invalid_argument());
    assert_eq!(dfg.value(u).operands().len(), 1);
  }

  #[test]
  fn replace_and_restore() {
    let (mut dfg, ty) = new_graph();
    let a = dfg.new_value(ty, ValueKind::Undef);
    let b = dfg.new_value(ty, ValueKind::Undef);
    let u1 = dfg.new_user(ty, ValueKind::BasicBlock, Arity::Fixed(2), &[Some(a), Some(b)]);
    let u2 = dfg.new_user(ty, ValueKind::BasicBlock, Arity::Variadic, &[Some(a)]);
    dfg.push_operand(u2, a).unwrap();
    dfg.replace_all_uses_with(a, b).unwrap();
    assert_eq!(dfg.value(a).num_uses(), 0);
    assert_eq!(dfg.value(b).num_uses(), 4);
    assert_eq!(dfg.operand(u1, 0), Some(b));
    assert_eq!(dfg.operand(u2, 1), Some(b));
    dfg.replace_all_uses_with(b, b).unwrap();
    assert_eq!(dfg.value(b).num_uses(), 4);
    dfg.check_use_lists();
  }

  #[test]
  fn drop_references_and_remove() {
    let (mut dfg, ty) = new_graph();
    let a = dfg.new_value(ty, ValueKind::Undef);
    let u = dfg.new_user(ty, ValueKind::BasicBlock, Arity::Fixed(2), &[Some(a), Some(a)]);
    let edges = dfg.num_use_edges();
    dfg.drop_all_references(u);
    assert_eq!(dfg.value(a).num_uses(), 0);
    dfg.remove_value(u);
    assert_eq!(dfg.num_use_edges(), edges - 2);
    dfg.remove_value(a);
    assert_eq!(dfg.num_values(), 0);
    dfg.check_use_lists();
  }

  #[test]
  #[should_panic(expected = "is still used")]
  fn remove_used_value() {
    let (mut dfg, ty) = new_graph();
    let a = dfg.new_value(ty, ValueKind::Undef);
    dfg.new_user(ty, ValueKind::BasicBlock, Arity::Fixed(1), &[Some(a)]);
    dfg.remove_value(a);
  }

  #[test]
  fn reused_use_slot() {
    let (mut dfg, ty) = new_graph();
    let a = dfg.new_value(ty, ValueKind::Undef);
    let u1 = dfg.new_user(ty, ValueKind::BasicBlock, Arity::Fixed(1), &[Some(a)]);
    let old = dfg.value(u1).operands()[0];
    dfg.drop_all_references(u1);
    dfg.remove_value(u1);
    let u2 = dfg.new_user(ty, ValueKind::BasicBlock, Arity::Fixed(1), &[Some(a)]);
    let new = dfg.value(u2).operands()[0];
    assert_eq!(new.index(), old.index());
    assert_ne!(new, old);
    assert_eq!(dfg.use_data(new).user(), u2);
    dfg.check_use_lists();
  }

  #[test]
  #[should_panic(expected = "does not exist")]
  fn stale_use() {
    let (mut dfg, ty) = new_graph();
    let a = dfg.new_value(ty, ValueKind::Undef);
    let u1 = dfg.new_user(ty, ValueKind::BasicBlock, Arity::Fixed(1), &[Some(a)]);
    let old = dfg.value(u1).operands()[0];
    dfg.drop_all_references(u1);
    dfg.remove_value(u1);
    dfg.new_user(ty, ValueKind::BasicBlock, Arity::Fixed(1), &[Some(a)]);
    dfg.use_data(old);
  }

  #[test]
  fn foreign_value() {
    let (dfg, ty) = new_graph();
    let (mut other, _) = new_graph();
    let v = other.new_value(ty, ValueKind::Undef);
    assert!(dfg.check_value(v).unwrap_err().is_cross_context());
  }
}
