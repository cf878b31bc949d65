//! Types of IR values ([`Type`], [`TypeKind`] and [`TypeData`]).
//!
//! [`Type`]s are handles of canonical type instances owned by a
//! [`TypeTable`](crate::ir::type_table::TypeTable). Two structurally
//! identical types (except identified structs) always have the same handle,
//! so comparing handles is enough to compare types.

use crate::ir::idman::ContextId;

/// A handle of a canonical type.
///
/// You can fetch [`TypeData`] from the [`TypeTable`](crate::ir::type_table::TypeTable)
/// of the context that created this handle.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Type {
  ctx: ContextId,
  index: u32,
}

impl Type {
  pub(in crate::ir) fn new(ctx: ContextId, index: usize) -> Self {
    Self {
      ctx,
      index: index as u32,
    }
  }

  pub(in crate::ir) fn ctx(self) -> ContextId {
    self.ctx
  }

  pub(in crate::ir) fn index(self) -> usize {
    self.index as usize
  }
}

/// Discriminant of types.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum TypeKind {
  /// Type with no size.
  Void,
  /// 16-bit floating point.
  Half,
  /// 32-bit floating point.
  Float,
  /// 64-bit floating point.
  Double,
  /// Basic block labels.
  Label,
  /// Metadata.
  Metadata,
  /// Integers of arbitrary bit width.
  Integer,
  /// Functions.
  Function,
  /// Structures.
  Struct,
  /// Arrays.
  Array,
  /// SIMD vectors.
  Vector,
  /// Pointers.
  Pointer,
}

impl TypeKind {
  /// Returns `true` if the kind is one of the floating point kinds.
  pub fn is_floating_point(self) -> bool {
    matches!(self, TypeKind::Half | TypeKind::Float | TypeKind::Double)
  }

  /// Returns `true` if values can have types of this kind.
  pub fn is_first_class(self) -> bool {
    !matches!(
      self,
      TypeKind::Void | TypeKind::Label | TypeKind::Metadata | TypeKind::Function
    )
  }

  /// Returns `true` if the kind has no contained types.
  pub fn is_primitive(self) -> bool {
    !self.is_composite() && self != TypeKind::Function
  }

  /// Returns `true` if the kind is struct, array, vector or pointer.
  pub fn is_composite(self) -> bool {
    matches!(
      self,
      TypeKind::Struct | TypeKind::Array | TypeKind::Vector | TypeKind::Pointer
    )
  }

  /// Returns `true` if the kind is struct or array.
  pub fn is_aggregate(self) -> bool {
    matches!(self, TypeKind::Struct | TypeKind::Array)
  }

  /// Returns `true` if values of this kind fit in a register.
  pub fn is_single_value(self) -> bool {
    self.is_floating_point()
      || matches!(
        self,
        TypeKind::Integer | TypeKind::Pointer | TypeKind::Vector
      )
  }
}

/// Data of a canonical type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeData {
  /// `void`.
  Void,
  /// `half`.
  Half,
  /// `float`.
  Float,
  /// `double`.
  Double,
  /// `label`.
  Label,
  /// `metadata`.
  Metadata,
  /// Integer with bit width.
  Integer(u32),
  /// Function.
  Function(FunctionType),
  /// Struct, identified or literal.
  Struct(StructType),
  /// Array with element type and length.
  Array(Type, u64),
  /// Vector with element type and lane count.
  Vector(Type, u32),
  /// Pointer with pointee type and address space.
  Pointer(Type, u32),
}

impl TypeData {
  /// Returns the kind of the type.
  pub fn kind(&self) -> TypeKind {
    match self {
      TypeData::Void => TypeKind::Void,
      TypeData::Half => TypeKind::Half,
      TypeData::Float => TypeKind::Float,
      TypeData::Double => TypeKind::Double,
      TypeData::Label => TypeKind::Label,
      TypeData::Metadata => TypeKind::Metadata,
      TypeData::Integer(..) => TypeKind::Integer,
      TypeData::Function(..) => TypeKind::Function,
      TypeData::Struct(..) => TypeKind::Struct,
      TypeData::Array(..) => TypeKind::Array,
      TypeData::Vector(..) => TypeKind::Vector,
      TypeData::Pointer(..) => TypeKind::Pointer,
    }
  }

  /// Returns the types contained in the type.
  ///
  /// For functions, the first one is the return type.
  pub fn contained_types(&self) -> &[Type] {
    match self {
      TypeData::Function(f) => &f.contained,
      TypeData::Struct(s) => s.elems(),
      TypeData::Array(t, _) | TypeData::Vector(t, _) | TypeData::Pointer(t, _) => {
        std::slice::from_ref(t)
      }
      _ => &[],
    }
  }
}

/// Data of function types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionType {
  /// Return type followed by parameter types.
  contained: Vec<Type>,
  var_arg: bool,
}

impl FunctionType {
  pub(in crate::ir) fn new(ret: Type, params: &[Type], var_arg: bool) -> Self {
    let mut contained = Vec::with_capacity(params.len() + 1);
    contained.push(ret);
    contained.extend_from_slice(params);
    Self { contained, var_arg }
  }

  /// Returns the return type.
  pub fn ret(&self) -> Type {
    self.contained[0]
  }

  /// Returns the parameter types.
  pub fn params(&self) -> &[Type] {
    &self.contained[1..]
  }

  /// Returns `true` if the function takes variable arguments.
  pub fn is_var_arg(&self) -> bool {
    self.var_arg
  }
}

/// Data of struct types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructType {
  name: Option<String>,
  body: Option<StructBody>,
  literal: bool,
}

/// Fields of a struct type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(in crate::ir) struct StructBody {
  pub(in crate::ir) elems: Vec<Type>,
  pub(in crate::ir) packed: bool,
}

impl StructType {
  pub(in crate::ir) fn literal(body: StructBody) -> Self {
    Self {
      name: None,
      body: Some(body),
      literal: true,
    }
  }

  pub(in crate::ir) fn identified(name: Option<String>) -> Self {
    Self {
      name,
      body: None,
      literal: false,
    }
  }

  /// Returns the name, literal structs have no name.
  pub fn name(&self) -> Option<&str> {
    self.name.as_deref()
  }

  pub(in crate::ir) fn set_name(&mut self, name: Option<String>) {
    self.name = name;
  }

  /// Returns `true` if the struct is a literal (anonymous) struct.
  pub fn is_literal(&self) -> bool {
    self.literal
  }

  /// Returns `true` if the struct has no body yet.
  pub fn is_opaque(&self) -> bool {
    self.body.is_none()
  }

  /// Returns `true` if the struct is packed.
  pub fn is_packed(&self) -> bool {
    self.body.as_ref().map_or(false, |b| b.packed)
  }

  /// Returns the field types, empty for opaque structs.
  pub fn elems(&self) -> &[Type] {
    self.body.as_ref().map_or(&[], |b| &b.elems)
  }

  pub(in crate::ir) fn body(&self) -> Option<&StructBody> {
    self.body.as_ref()
  }

  pub(in crate::ir) fn set_body(&mut self, body: StructBody) {
    self.body = Some(body);
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::ir::idman::next_context_id;

  #[test]
  fn kind_classification() {
    assert!(TypeKind::Integer.is_first_class());
    assert!(TypeKind::Struct.is_first_class());
    for kind in [
      TypeKind::Void,
      TypeKind::Label,
      TypeKind::Metadata,
      TypeKind::Function,
    ] {
      assert!(!kind.is_first_class());
    }
    assert!(TypeKind::Double.is_floating_point());
    assert!(TypeKind::Pointer.is_composite());
    assert!(!TypeKind::Pointer.is_aggregate());
    assert!(TypeKind::Vector.is_single_value());
    assert!(!TypeKind::Array.is_single_value());
    assert!(TypeKind::Label.is_primitive());
    assert!(!TypeKind::Function.is_primitive());
  }

  #[test]
  fn function_contained_types() {
    let ctx = next_context_id();
    let (i32_ty, i8_ty) = (Type::new(ctx, 0), Type::new(ctx, 1));
    let data = TypeData::Function(FunctionType::new(i32_ty, &[i8_ty, i32_ty], true));
    assert_eq!(data.kind(), TypeKind::Function);
    assert_eq!(data.contained_types(), &[i32_ty, i8_ty, i32_ty]);
    match data {
      TypeData::Function(f) => {
        assert_eq!(f.ret(), i32_ty);
        assert_eq!(f.params(), &[i8_ty, i32_ty]);
        assert!(f.is_var_arg());
      }
      _ => unreachable!(),
    }
  }
}
