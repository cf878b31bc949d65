//! Layout ([`Layout`]), basic block list and instruction list
//! related implementations.

use crate::error::fatal;
use crate::ir::classes::{BasicBlock, Function, Instruction};
use key_node_list::{impl_node, KeyNodeList};
use std::collections::HashMap;

/// Layout of instructions and basic blocks.
///
/// `Layout` maintains the order of basic blocks ([`BasicBlock`]) in every
/// function, the order of instructions ([`Instruction`]) in every basic
/// block, and the parent links of both.
#[derive(Default)]
pub struct Layout {
  bbs: HashMap<Function, BasicBlockList>,
  insts: HashMap<BasicBlock, InstList>,
  bb_func: HashMap<BasicBlock, Function>,
  inst_bb: HashMap<Instruction, BasicBlock>,
}

impl Layout {
  /// Creates a new layout.
  pub(in crate::ir) fn new() -> Self {
    Self::default()
  }

  /// Registers an empty basic block list for the given function.
  pub(in crate::ir) fn new_func(&mut self, func: Function) {
    self.bbs.insert(func, BasicBlockList::new());
  }

  /// Registers an empty instruction list for the given basic block.
  pub(in crate::ir) fn new_bb(&mut self, bb: BasicBlock) {
    self.insts.insert(bb, InstList::new());
  }

  /// Returns the basic blocks of the given function in layout order.
  pub fn bbs(&self, func: Function) -> Vec<BasicBlock> {
    self
      .bbs
      .get(&func)
      .map(|l| l.keys().copied().collect())
      .unwrap_or_default()
  }

  /// Returns the instructions of the given basic block in layout order.
  pub fn insts(&self, bb: BasicBlock) -> Vec<Instruction> {
    self
      .insts
      .get(&bb)
      .map(|l| l.keys().copied().collect())
      .unwrap_or_default()
  }

  /// Returns the number of instructions in the given basic block.
  pub fn num_insts(&self, bb: BasicBlock) -> usize {
    self.insts.get(&bb).map_or(0, |l| l.len())
  }

  /// Returns the entry basic block of the function, returns `None` if
  /// the function is a declaration.
  pub fn entry_bb(&self, func: Function) -> Option<BasicBlock> {
    self.bbs.get(&func)?.front_key().copied()
  }

  /// Returns the first instruction of the given basic block.
  pub fn front_inst(&self, bb: BasicBlock) -> Option<Instruction> {
    self.insts.get(&bb)?.front_key().copied()
  }

  /// Returns the last instruction of the given basic block.
  pub fn back_inst(&self, bb: BasicBlock) -> Option<Instruction> {
    self.insts.get(&bb)?.back_key().copied()
  }

  /// Returns the parent basic block of the given instruction, returns
  /// `None` if the given instruction is detached.
  pub fn parent_bb(&self, inst: Instruction) -> Option<BasicBlock> {
    self.inst_bb.get(&inst).copied()
  }

  /// Returns the parent function of the given basic block, returns
  /// `None` if the given basic block is detached.
  pub fn parent_func(&self, bb: BasicBlock) -> Option<Function> {
    self.bb_func.get(&bb).copied()
  }

  fn inst_node(&self, inst: Instruction) -> Option<&InstNode> {
    let bb = self.parent_bb(inst)?;
    self.insts.get(&bb)?.node(&inst)
  }

  /// Returns the instruction after the given one in the same basic block.
  pub fn next_inst(&self, inst: Instruction) -> Option<Instruction> {
    self.inst_node(inst)?.next
  }

  /// Returns the instruction before the given one in the same basic block.
  pub fn prev_inst(&self, inst: Instruction) -> Option<Instruction> {
    self.inst_node(inst)?.prev
  }

  /// Returns the basic block after the given one in the same function.
  pub fn next_bb(&self, bb: BasicBlock) -> Option<BasicBlock> {
    let func = self.parent_func(bb)?;
    self.bbs.get(&func)?.node(&bb)?.next
  }

  fn inst_list_mut(&mut self, bb: BasicBlock) -> &mut InstList {
    match self.insts.get_mut(&bb) {
      Some(list) => list,
      None => fatal!("basic block {:?} has no instruction list", bb),
    }
  }

  fn bb_list_mut(&mut self, func: Function) -> &mut BasicBlockList {
    match self.bbs.get_mut(&func) {
      Some(list) => list,
      None => fatal!("function {:?} has no basic block list", func),
    }
  }

  /// Appends the given detached instruction to the end of `bb`.
  pub(in crate::ir) fn push_inst_back(&mut self, bb: BasicBlock, inst: Instruction) {
    if self.inst_list_mut(bb).push_key_back(inst).is_err() {
      fatal!("instruction {:?} is already in {:?}", inst, bb);
    }
    self.inst_bb.insert(inst, bb);
  }

  /// Inserts the given detached instruction before `before`.
  pub(in crate::ir) fn insert_inst_before(&mut self, before: Instruction, inst: Instruction) {
    let bb = match self.parent_bb(before) {
      Some(bb) => bb,
      None => fatal!("instruction {:?} is detached", before),
    };
    if self
      .inst_list_mut(bb)
      .cursor_mut(before)
      .insert_key_before(inst)
      .is_err()
    {
      fatal!("instruction {:?} is already in {:?}", inst, bb);
    }
    self.inst_bb.insert(inst, bb);
  }

  /// Detaches the given instruction from its parent basic block.
  /// Returns the old parent, `None` if the instruction was detached.
  pub(in crate::ir) fn remove_inst(&mut self, inst: Instruction) -> Option<BasicBlock> {
    let bb = self.inst_bb.remove(&inst)?;
    self.inst_list_mut(bb).remove(&inst);
    Some(bb)
  }

  /// Appends the given detached basic block to the end of `func`.
  pub(in crate::ir) fn push_bb_back(&mut self, func: Function, bb: BasicBlock) {
    if self.bb_list_mut(func).push_key_back(bb).is_err() {
      fatal!("basic block {:?} is already in {:?}", bb, func);
    }
    self.bb_func.insert(bb, func);
  }

  /// Inserts the given detached basic block before `before`.
  pub(in crate::ir) fn insert_bb_before(&mut self, before: BasicBlock, bb: BasicBlock) {
    let func = match self.parent_func(before) {
      Some(func) => func,
      None => fatal!("basic block {:?} is detached", before),
    };
    if self
      .bb_list_mut(func)
      .cursor_mut(before)
      .insert_key_before(bb)
      .is_err()
    {
      fatal!("basic block {:?} is already in {:?}", bb, func);
    }
    self.bb_func.insert(bb, func);
  }

  /// Detaches the given basic block from its parent function.
  /// Returns the old parent, `None` if the basic block was detached.
  pub(in crate::ir) fn remove_bb(&mut self, bb: BasicBlock) -> Option<Function> {
    let func = self.bb_func.remove(&bb)?;
    self.bb_list_mut(func).remove(&bb);
    Some(func)
  }

  /// Forgets the given detached and empty basic block.
  pub(in crate::ir) fn drop_bb(&mut self, bb: BasicBlock) {
    debug_assert!(!self.bb_func.contains_key(&bb));
    if let Some(list) = self.insts.remove(&bb) {
      debug_assert!(list.is_empty(), "dropping a non-empty basic block");
    }
  }

  /// Forgets the given function, which must have no basic blocks.
  pub(in crate::ir) fn drop_func(&mut self, func: Function) {
    if let Some(list) = self.bbs.remove(&func) {
      debug_assert!(list.is_empty(), "dropping a non-empty function");
    }
  }
}

/// Basic block list, stores the order of all basic blocks in a function.
///
/// Basic block list is a [`KeyNodeList`], with the key is [`BasicBlock`],
/// and the node is [`BasicBlockNode`].
pub type BasicBlockList = KeyNodeList<BasicBlock, BasicBlockNode>;

/// The node in [`BasicBlockList`].
pub struct BasicBlockNode {
  prev: Option<BasicBlock>,
  next: Option<BasicBlock>,
}

impl_node!(BasicBlockNode { Key = BasicBlock, prev = prev, next = next });

impl From<()> for BasicBlockNode {
  fn from(_: ()) -> Self {
    Self {
      prev: None,
      next: None,
    }
  }
}

/// Instruction list, stores the order of all instructions in a basic
/// block.
///
/// Instruction list is a [`KeyNodeList`], with the key is
/// [`Instruction`], and the node is [`InstNode`].
pub type InstList = KeyNodeList<Instruction, InstNode>;

/// The node in [`InstList`].
pub struct InstNode {
  prev: Option<Instruction>,
  next: Option<Instruction>,
}

impl_node!(InstNode { Key = Instruction, prev = prev, next = next });

impl From<()> for InstNode {
  fn from(_: ()) -> Self {
    Self {
      prev: None,
      next: None,
    }
  }
}
