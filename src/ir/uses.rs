//! Use edges ([`Use`], [`UseData`]) and operand storage of users.
//!
//! Every operand slot of a user owns exactly one [`Use`] record for the
//! whole lifetime of the user. Changing an operand only retargets the
//! record, i.e. unlinks it from the use list of the old value and links it
//! into the use list of the new one.

use crate::ir::dfg::DataFlowGraph;
use crate::ir::entities::Value;

/// A handle of a use edge.
///
/// You can fetch [`UseData`] from the [`DataFlowGraph`] of the context
/// that created this handle.
///
/// Arena slots of freed edges are reused. Every handle carries the
/// generation of its slot, so a handle kept past the removal of its edge
/// is reported as stale instead of resolving to another edge.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Use {
  index: u32,
  gen: u32,
}

impl Use {
  pub(in crate::ir) fn new(index: u32, gen: u32) -> Self {
    Self { index, gen }
  }

  pub(in crate::ir) fn index(self) -> usize {
    self.index as usize
  }

  pub(in crate::ir) fn gen(self) -> u32 {
    self.gen
  }
}

/// Data of a use edge.
///
/// The edge goes from operand slot `operand_no` of `user` to `value`,
/// and is linked into the use list of `value` by `prev` and `next`.
#[derive(Debug)]
pub struct UseData {
  user: Value,
  operand_no: u32,
  pub(in crate::ir) value: Option<Value>,
  pub(in crate::ir) prev: Option<Use>,
  pub(in crate::ir) next: Option<Use>,
}

impl UseData {
  pub(in crate::ir) fn new(user: Value, operand_no: usize) -> Self {
    Self {
      user,
      operand_no: operand_no as u32,
      value: None,
      prev: None,
      next: None,
    }
  }

  /// Returns the user that owns the use.
  pub fn user(&self) -> Value {
    self.user
  }

  /// Returns the operand index of the use in its user.
  pub fn operand_no(&self) -> usize {
    self.operand_no as usize
  }

  /// Returns the used value, `None` if the operand slot is empty.
  pub fn value(&self) -> Option<Value> {
    self.value
  }
}

/// Operand count policy of a user kind.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Arity {
  /// Statically known operand count.
  Fixed(usize),
  /// Operand count given at construction, can grow afterwards.
  Variadic,
}

/// Operand storage of values.
#[derive(Debug)]
pub(in crate::ir) enum OperandList {
  /// The value is not a user.
  None,
  /// Fixed-arity operands, the storage never changes its length.
  Fixed(Box<[Use]>),
  /// Variadic operands.
  Variadic(Vec<Use>),
}

impl OperandList {
  pub(in crate::ir) fn as_slice(&self) -> &[Use] {
    match self {
      OperandList::None => &[],
      OperandList::Fixed(uses) => uses,
      OperandList::Variadic(uses) => uses,
    }
  }

  pub(in crate::ir) fn is_user(&self) -> bool {
    !matches!(self, OperandList::None)
  }
}

/// An iterator over the use list of a value.
///
/// Uses are yielded from the most recently attached one.
pub struct UseIter<'a> {
  pub(in crate::ir) dfg: &'a DataFlowGraph,
  pub(in crate::ir) cur: Option<Use>,
}

impl<'a> Iterator for UseIter<'a> {
  type Item = Use;

  fn next(&mut self) -> Option<Self::Item> {
    let cur = self.cur?;
    self.cur = self.dfg.use_data(cur).next;
    Some(cur)
  }
}
