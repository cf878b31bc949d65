//! Canonical type table ([`TypeTable`]).
//!
//! The table hash-conses every type of one context: requesting a type
//! twice with the same structural description returns the same [`Type`]
//! handle. Identified structs are the only exception, they are nominal.

use crate::error::{ensure_arg, fatal, Error, Result};
use crate::ir::idman::ContextId;
use crate::ir::types::{FunctionType, StructBody, StructType, Type, TypeData, TypeKind};
use log::{debug, trace};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Minimum bit width of integer types.
pub const MIN_INT_BITS: u32 = 1;

/// Maximum bit width of integer types.
pub const MAX_INT_BITS: u32 = (1 << 24) - 1;

/// Key of function types.
///
/// The derived hash combines the identity of the return type, the
/// order-sensitive identities of the parameter types and the flag.
#[derive(PartialEq, Eq, Hash)]
struct FunctionKey {
  ret: Type,
  params: Vec<Type>,
  var_arg: bool,
}

/// Canonical type table of a context.
pub struct TypeTable {
  ctx: ContextId,
  types: Vec<TypeData>,
  void: Type,
  half: Type,
  float: Type,
  double: Type,
  label: Type,
  metadata: Type,
  int1: Type,
  int8: Type,
  int16: Type,
  int32: Type,
  int64: Type,
  int_types: HashMap<u32, Type>,
  func_types: HashMap<FunctionKey, Type>,
  ptr_types: HashMap<Type, Type>,
  as_ptr_types: HashMap<(Type, u32), Type>,
  array_types: HashMap<(Type, u64), Type>,
  vector_types: HashMap<(Type, u32), Type>,
  literal_struct_types: HashMap<StructBody, Type>,
  struct_names: HashMap<String, Type>,
  name_suffix: u32,
}

/// Allocates a new canonical type in the given arena.
fn alloc(ctx: ContextId, types: &mut Vec<TypeData>, data: TypeData) -> Type {
  let ty = Type::new(ctx, types.len());
  trace!("new canonical type #{}: {:?}", ty.index(), data.kind());
  types.push(data);
  ty
}

impl TypeTable {
  /// Creates a new type table with all primitive types registered.
  pub(in crate::ir) fn new(ctx: ContextId) -> Self {
    let mut types = Vec::new();
    let mut new_ty = |data| alloc(ctx, &mut types, data);
    let void = new_ty(TypeData::Void);
    let half = new_ty(TypeData::Half);
    let float = new_ty(TypeData::Float);
    let double = new_ty(TypeData::Double);
    let label = new_ty(TypeData::Label);
    let metadata = new_ty(TypeData::Metadata);
    let int1 = new_ty(TypeData::Integer(1));
    let int8 = new_ty(TypeData::Integer(8));
    let int16 = new_ty(TypeData::Integer(16));
    let int32 = new_ty(TypeData::Integer(32));
    let int64 = new_ty(TypeData::Integer(64));
    Self {
      ctx,
      types,
      void,
      half,
      float,
      double,
      label,
      metadata,
      int1,
      int8,
      int16,
      int32,
      int64,
      int_types: HashMap::new(),
      func_types: HashMap::new(),
      ptr_types: HashMap::new(),
      as_ptr_types: HashMap::new(),
      array_types: HashMap::new(),
      vector_types: HashMap::new(),
      literal_struct_types: HashMap::new(),
      struct_names: HashMap::new(),
      name_suffix: 0,
    }
  }

  /// Checks if the given type belongs to the current table.
  pub fn check(&self, ty: Type) -> Result<()> {
    if ty.ctx() == self.ctx {
      Ok(())
    } else {
      Err(Error::CrossContext(format!(
        "type #{} belongs to another context",
        ty.index()
      )))
    }
  }

  /// Returns the number of canonical types in the table.
  pub fn len(&self) -> usize {
    self.types.len()
  }

  /// Returns `true` if the table holds no type, which never happens.
  pub fn is_empty(&self) -> bool {
    self.types.is_empty()
  }

  /// Returns a reference to the data of the given type.
  ///
  /// # Panics
  ///
  /// Panics if the given type belongs to another context.
  pub fn data(&self, ty: Type) -> &TypeData {
    if ty.ctx() != self.ctx {
      fatal!("type #{} belongs to another context", ty.index());
    }
    &self.types[ty.index()]
  }

  /// Returns the kind of the given type.
  pub fn kind(&self, ty: Type) -> TypeKind {
    self.data(ty).kind()
  }

  /// Returns the `void` type.
  pub fn void(&self) -> Type {
    self.void
  }

  /// Returns the `half` type.
  pub fn half(&self) -> Type {
    self.half
  }

  /// Returns the `float` type.
  pub fn float(&self) -> Type {
    self.float
  }

  /// Returns the `double` type.
  pub fn double(&self) -> Type {
    self.double
  }

  /// Returns the `label` type.
  pub fn label(&self) -> Type {
    self.label
  }

  /// Returns the `metadata` type.
  pub fn metadata(&self) -> Type {
    self.metadata
  }

  /// Returns the `i1` type.
  pub fn int1(&self) -> Type {
    self.int1
  }

  /// Returns the `i8` type.
  pub fn int8(&self) -> Type {
    self.int8
  }

  /// Returns the `i16` type.
  pub fn int16(&self) -> Type {
    self.int16
  }

  /// Returns the `i32` type.
  pub fn int32(&self) -> Type {
    self.int32
  }

  /// Returns the `i64` type.
  pub fn int64(&self) -> Type {
    self.int64
  }

  /// Gets an integer type with the given bit width.
  ///
  /// Fails if the bit width is not in `[MIN_INT_BITS, MAX_INT_BITS]`.
  pub fn get_int(&mut self, bits: u32) -> Result<Type> {
    ensure_arg!(bits >= MIN_INT_BITS, "bitwidth {} too small", bits);
    ensure_arg!(bits <= MAX_INT_BITS, "bitwidth {} too large", bits);
    Ok(match bits {
      1 => self.int1,
      8 => self.int8,
      16 => self.int16,
      32 => self.int32,
      64 => self.int64,
      _ => {
        let (ctx, types) = (self.ctx, &mut self.types);
        *self
          .int_types
          .entry(bits)
          .or_insert_with(|| alloc(ctx, types, TypeData::Integer(bits)))
      }
    })
  }

  /// Gets a function type.
  ///
  /// Fails if the return type is a function, label or metadata type, or
  /// any parameter type is not a first-class type.
  pub fn get_function(&mut self, ret: Type, params: &[Type], var_arg: bool) -> Result<Type> {
    self.check(ret)?;
    ensure_arg!(
      self.is_valid_return_type(ret),
      "invalid return type `{}` for function",
      self.display(ret)
    );
    for &param in params {
      self.check(param)?;
      ensure_arg!(
        self.is_valid_argument_type(param),
        "`{}` is not a valid type for function argument",
        self.display(param)
      );
    }
    let key = FunctionKey {
      ret,
      params: params.to_vec(),
      var_arg,
    };
    let (ctx, types) = (self.ctx, &mut self.types);
    Ok(*self.func_types.entry(key).or_insert_with(|| {
      alloc(
        ctx,
        types,
        TypeData::Function(FunctionType::new(ret, params, var_arg)),
      )
    }))
  }

  /// Gets a pointer type in the given address space.
  ///
  /// Fails if the pointee is a void, label or metadata type.
  pub fn get_pointer(&mut self, pointee: Type, addr_space: u32) -> Result<Type> {
    self.check(pointee)?;
    ensure_arg!(
      self.is_valid_pointer_element(pointee),
      "invalid type `{}` for pointer element",
      self.display(pointee)
    );
    let (ctx, types) = (self.ctx, &mut self.types);
    let data = || TypeData::Pointer(pointee, addr_space);
    Ok(if addr_space == 0 {
      *self
        .ptr_types
        .entry(pointee)
        .or_insert_with(|| alloc(ctx, types, data()))
    } else {
      *self
        .as_ptr_types
        .entry((pointee, addr_space))
        .or_insert_with(|| alloc(ctx, types, data()))
    })
  }

  /// Gets an array type.
  ///
  /// Fails if the element type is not a valid array element type.
  pub fn get_array(&mut self, elem: Type, len: u64) -> Result<Type> {
    self.check(elem)?;
    ensure_arg!(
      self.is_valid_array_element(elem),
      "invalid array element type `{}`",
      self.display(elem)
    );
    let (ctx, types) = (self.ctx, &mut self.types);
    Ok(*self
      .array_types
      .entry((elem, len))
      .or_insert_with(|| alloc(ctx, types, TypeData::Array(elem, len))))
  }

  /// Gets a vector type.
  ///
  /// Fails if the lane count is zero or the element type is not an
  /// integer, floating point or pointer type.
  pub fn get_vector(&mut self, elem: Type, len: u32) -> Result<Type> {
    self.check(elem)?;
    ensure_arg!(len > 0, "vector must have at least one element");
    ensure_arg!(
      self.is_valid_vector_element(elem),
      "invalid vector element type `{}`",
      self.display(elem)
    );
    let (ctx, types) = (self.ctx, &mut self.types);
    Ok(*self
      .vector_types
      .entry((elem, len))
      .or_insert_with(|| alloc(ctx, types, TypeData::Vector(elem, len))))
  }

  /// Gets a literal (anonymous) struct type.
  ///
  /// Literal structs with the same fields and packing are the same type.
  pub fn get_struct(&mut self, elems: &[Type], packed: bool) -> Result<Type> {
    self.check_struct_elems(elems)?;
    let body = StructBody {
      elems: elems.to_vec(),
      packed,
    };
    let (ctx, types) = (self.ctx, &mut self.types);
    Ok(match self.literal_struct_types.entry(body) {
      Entry::Occupied(e) => *e.get(),
      Entry::Vacant(e) => {
        let data = TypeData::Struct(StructType::literal(e.key().clone()));
        *e.insert(alloc(ctx, types, data))
      }
    })
  }

  /// Creates a new opaque identified struct type.
  ///
  /// If the given name has already been taken, a unique suffix is
  /// appended to the name. Empty names are treated as no name.
  pub fn create_struct(&mut self, name: Option<&str>) -> Type {
    let ty = alloc(
      self.ctx,
      &mut self.types,
      TypeData::Struct(StructType::identified(None)),
    );
    let name = name.filter(|n| !n.is_empty()).map(|n| self.unique_name(n, ty));
    debug!("created identified struct #{} ({:?})", ty.index(), name);
    self.struct_mut(ty).set_name(name);
    ty
  }

  /// Creates a new identified struct type with the given body.
  pub fn create_struct_with_body(
    &mut self,
    name: Option<&str>,
    elems: &[Type],
    packed: bool,
  ) -> Result<Type> {
    self.check_struct_elems(elems)?;
    let ty = self.create_struct(name);
    self.set_struct_body(ty, elems, packed)?;
    Ok(ty)
  }

  /// Sets the body of the given identified struct type.
  ///
  /// Fails if the type is not an identified struct, or its body has
  /// already been set.
  pub fn set_struct_body(&mut self, ty: Type, elems: &[Type], packed: bool) -> Result<()> {
    self.check(ty)?;
    match self.data(ty) {
      TypeData::Struct(s) if !s.is_literal() => {
        ensure_arg!(s.is_opaque(), "body of struct has already been set")
      }
      _ => {
        return Err(Error::InvalidArgument(format!(
          "`{}` is not an identified struct",
          self.display(ty)
        )))
      }
    }
    self.check_struct_elems(elems)?;
    self.struct_mut(ty).set_body(StructBody {
      elems: elems.to_vec(),
      packed,
    });
    Ok(())
  }

  /// Renames the given identified struct type, `None` removes the name.
  pub fn set_struct_name(&mut self, ty: Type, name: Option<&str>) -> Result<()> {
    self.check(ty)?;
    let old = match self.data(ty) {
      TypeData::Struct(s) if !s.is_literal() => s.name().map(str::to_string),
      _ => {
        return Err(Error::InvalidArgument(format!(
          "`{}` is not an identified struct",
          self.display(ty)
        )))
      }
    };
    if old.as_deref() == name {
      return Ok(());
    }
    if let Some(old) = old {
      self.struct_names.remove(&old);
    }
    let name = name.filter(|n| !n.is_empty()).map(|n| self.unique_name(n, ty));
    self.struct_mut(ty).set_name(name);
    Ok(())
  }

  /// Returns the identified struct type with the given name.
  pub fn struct_by_name(&self, name: &str) -> Option<Type> {
    self.struct_names.get(name).copied()
  }

  /// Returns the name of the given struct type.
  pub fn struct_name(&self, ty: Type) -> Option<&str> {
    match self.data(ty) {
      TypeData::Struct(s) => s.name(),
      _ => None,
    }
  }

  /// Checks if two struct types have the same fields and packing.
  ///
  /// Names are ignored. Opaque structs are only layout identical
  /// to themselves.
  pub fn is_layout_identical(&self, lhs: Type, rhs: Type) -> Result<bool> {
    self.check(lhs)?;
    self.check(rhs)?;
    if lhs == rhs {
      return Ok(true);
    }
    match (self.data(lhs), self.data(rhs)) {
      (TypeData::Struct(l), TypeData::Struct(r)) => Ok(match (l.body(), r.body()) {
        (Some(lb), Some(rb)) => lb == rb,
        _ => false,
      }),
      _ => Err(Error::InvalidArgument(
        "layout comparison requires two struct types".into(),
      )),
    }
  }

  /// Returns the bit width of the given integer type.
  pub fn int_width(&self, ty: Type) -> Option<u32> {
    match self.data(ty) {
      TypeData::Integer(bits) => Some(*bits),
      _ => None,
    }
  }

  /// Returns the types contained in the given type.
  pub fn contained_types(&self, ty: Type) -> &[Type] {
    self.data(ty).contained_types()
  }

  /// Returns the element type of the given array, vector or pointer type.
  pub fn element_type(&self, ty: Type) -> Option<Type> {
    match self.data(ty) {
      TypeData::Array(t, _) | TypeData::Vector(t, _) | TypeData::Pointer(t, _) => Some(*t),
      _ => None,
    }
  }

  /// Returns the number of elements of the given array or vector type.
  pub fn num_elements(&self, ty: Type) -> Option<u64> {
    match self.data(ty) {
      TypeData::Array(_, len) => Some(*len),
      TypeData::Vector(_, len) => Some(*len as u64),
      _ => None,
    }
  }

  /// Returns the address space of the given pointer type.
  pub fn address_space(&self, ty: Type) -> Option<u32> {
    match self.data(ty) {
      TypeData::Pointer(_, addr_space) => Some(*addr_space),
      _ => None,
    }
  }

  /// Returns the function type data of the given type.
  pub fn function(&self, ty: Type) -> Option<&FunctionType> {
    match self.data(ty) {
      TypeData::Function(f) => Some(f),
      _ => None,
    }
  }

  /// Returns `true` if the given type is an integer type,
  /// or a vector of integers.
  pub fn is_int_or_int_vector(&self, ty: Type) -> bool {
    self.scalar_kind(ty) == TypeKind::Integer
  }

  /// Returns `true` if the given type is a floating point type,
  /// or a vector of floating points.
  pub fn is_fp_or_fp_vector(&self, ty: Type) -> bool {
    self.scalar_kind(ty).is_floating_point()
  }

  /// Returns the element type of vectors, or the type itself.
  pub fn scalar_type(&self, ty: Type) -> Type {
    match self.data(ty) {
      TypeData::Vector(elem, _) => *elem,
      _ => ty,
    }
  }

  fn scalar_kind(&self, ty: Type) -> TypeKind {
    self.kind(self.scalar_type(ty))
  }

  /// Returns the size in bits of primitive types and vectors of them,
  /// returns 0 for other types.
  pub fn primitive_size_in_bits(&self, ty: Type) -> u64 {
    match self.data(ty) {
      TypeData::Half => 16,
      TypeData::Float => 32,
      TypeData::Double => 64,
      TypeData::Integer(bits) => *bits as u64,
      TypeData::Vector(elem, len) => self.primitive_size_in_bits(*elem) * *len as u64,
      _ => 0,
    }
  }

  /// Returns `true` if the given type has a size.
  ///
  /// Opaque structs are unsized, and so is any struct that contains an
  /// unsized field or contains itself.
  pub fn is_sized(&self, ty: Type) -> bool {
    self.is_sized_in(ty, &mut HashSet::new())
  }

  /// `visiting` holds the structs on the current path.
  fn is_sized_in(&self, ty: Type, visiting: &mut HashSet<Type>) -> bool {
    match self.data(ty) {
      TypeData::Integer(..)
      | TypeData::Half
      | TypeData::Float
      | TypeData::Double
      | TypeData::Pointer(..)
      | TypeData::Vector(..) => true,
      TypeData::Array(elem, _) => self.is_sized_in(*elem, visiting),
      TypeData::Struct(s) => {
        if s.is_opaque() || !visiting.insert(ty) {
          return false;
        }
        let sized = s.elems().iter().all(|e| self.is_sized_in(*e, visiting));
        visiting.remove(&ty);
        sized
      }
      _ => false,
    }
  }

  /// Returns the type of the field/element at the given index of
  /// the given struct, array or vector type.
  pub fn type_at_index(&self, ty: Type, index: u64) -> Result<Type> {
    self.check(ty)?;
    match self.data(ty) {
      TypeData::Struct(s) => {
        ensure_arg!(!s.is_opaque(), "can not index into an opaque struct");
        s.elems()
          .get(index as usize)
          .copied()
          .ok_or_else(|| Error::InvalidArgument(format!("struct index {} out of range", index)))
      }
      TypeData::Array(elem, _) | TypeData::Vector(elem, _) => Ok(*elem),
      _ => Err(Error::InvalidArgument(format!(
        "`{}` is not an aggregate or vector type",
        self.display(ty)
      ))),
    }
  }

  /// Checks if the given type is a valid function return type.
  pub fn is_valid_return_type(&self, ty: Type) -> bool {
    !matches!(
      self.kind(ty),
      TypeKind::Function | TypeKind::Label | TypeKind::Metadata
    )
  }

  /// Checks if the given type is a valid function parameter type.
  pub fn is_valid_argument_type(&self, ty: Type) -> bool {
    self.kind(ty).is_first_class()
  }

  /// Checks if the given type can be pointed to.
  pub fn is_valid_pointer_element(&self, ty: Type) -> bool {
    !matches!(
      self.kind(ty),
      TypeKind::Void | TypeKind::Label | TypeKind::Metadata
    )
  }

  /// Checks if values of the given type can be loaded or stored
  /// through a pointer.
  pub fn is_loadable_or_storable(&self, ty: Type) -> bool {
    self.is_valid_pointer_element(ty) && self.kind(ty) != TypeKind::Function
  }

  /// Checks if the given type is a valid array element type.
  pub fn is_valid_array_element(&self, ty: Type) -> bool {
    self.kind(ty).is_first_class()
  }

  /// Checks if the given type is a valid vector element type.
  pub fn is_valid_vector_element(&self, ty: Type) -> bool {
    let kind = self.kind(ty);
    kind == TypeKind::Integer || kind == TypeKind::Pointer || kind.is_floating_point()
  }

  /// Checks if the given type is a valid struct field type.
  pub fn is_valid_struct_element(&self, ty: Type) -> bool {
    self.kind(ty).is_first_class()
  }

  /// Gets the integer vector type with the same shape as the given vector.
  pub fn vector_integer(&mut self, ty: Type) -> Result<Type> {
    let (elem_bits, len) = self.vector_shape(ty)?;
    ensure_arg!(elem_bits != 0, "element size must be of a non-zero size");
    let elem = self.get_int(elem_bits)?;
    self.get_vector(elem, len)
  }

  /// Gets the integer vector type whose elements are twice as wide as
  /// the given vector's.
  pub fn vector_extended_element(&mut self, ty: Type) -> Result<Type> {
    let (elem_bits, len) = self.vector_shape(ty)?;
    let elem = self.get_int(elem_bits * 2)?;
    self.get_vector(elem, len)
  }

  /// Gets the integer vector type whose elements are half as wide as
  /// the given vector's.
  pub fn vector_truncated_element(&mut self, ty: Type) -> Result<Type> {
    let (elem_bits, len) = self.vector_shape(ty)?;
    ensure_arg!(
      elem_bits & 1 == 0,
      "can not truncate vector element with odd bit-width"
    );
    let elem = self.get_int(elem_bits / 2)?;
    self.get_vector(elem, len)
  }

  /// Gets the vector type with half as many elements as the given vector.
  pub fn vector_half_elements(&mut self, ty: Type) -> Result<Type> {
    let (_, len) = self.vector_shape(ty)?;
    ensure_arg!(len & 1 == 0, "can not halve vector with odd number of elements");
    let elem = self.scalar_type(ty);
    self.get_vector(elem, len / 2)
  }

  /// Gets the vector type with twice as many elements as the given vector.
  pub fn vector_double_elements(&mut self, ty: Type) -> Result<Type> {
    let (_, len) = self.vector_shape(ty)?;
    let len = len
      .checked_mul(2)
      .ok_or_else(|| Error::InvalidArgument("too many vector elements".into()))?;
    let elem = self.scalar_type(ty);
    self.get_vector(elem, len)
  }

  /// Returns a [`Display`](fmt::Display) adaptor of the given type.
  pub fn display(&self, ty: Type) -> TypeDisplay {
    TypeDisplay { table: self, ty }
  }

  /// Returns the element bit width and lane count of the given vector type.
  fn vector_shape(&self, ty: Type) -> Result<(u32, u32)> {
    self.check(ty)?;
    match self.data(ty) {
      TypeData::Vector(elem, len) => Ok((self.primitive_size_in_bits(*elem) as u32, *len)),
      _ => Err(Error::InvalidArgument(format!(
        "`{}` is not a vector type",
        self.display(ty)
      ))),
    }
  }

  fn check_struct_elems(&self, elems: &[Type]) -> Result<()> {
    for &elem in elems {
      self.check(elem)?;
      ensure_arg!(
        self.is_valid_struct_element(elem),
        "invalid struct element type `{}`",
        self.display(elem)
      );
    }
    Ok(())
  }

  fn struct_mut(&mut self, ty: Type) -> &mut StructType {
    match &mut self.types[ty.index()] {
      TypeData::Struct(s) => s,
      _ => fatal!("type #{} is not a struct", ty.index()),
    }
  }

  /// Registers a unique struct name for the given type.
  fn unique_name(&mut self, name: &str, ty: Type) -> String {
    let mut unique = name.to_string();
    while self.struct_names.contains_key(&unique) {
      self.name_suffix += 1;
      unique = format!("{}.{}", name, self.name_suffix);
    }
    self.struct_names.insert(unique.clone(), ty);
    unique
  }
}

/// Displays a type in LLVM-like syntax.
pub struct TypeDisplay<'t> {
  table: &'t TypeTable,
  ty: Type,
}

impl<'t> TypeDisplay<'t> {
  fn with(&self, ty: Type) -> Self {
    Self {
      table: self.table,
      ty,
    }
  }

  fn fmt_list(&self, f: &mut fmt::Formatter, tys: &[Type]) -> fmt::Result {
    for (i, ty) in tys.iter().enumerate() {
      if i != 0 {
        write!(f, ", ")?;
      }
      write!(f, "{}", self.with(*ty))?;
    }
    Ok(())
  }
}

impl<'t> fmt::Display for TypeDisplay<'t> {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    if self.ty.ctx() != self.table.ctx {
      return write!(f, "<foreign type #{}>", self.ty.index());
    }
    match self.table.data(self.ty) {
      TypeData::Void => write!(f, "void"),
      TypeData::Half => write!(f, "half"),
      TypeData::Float => write!(f, "float"),
      TypeData::Double => write!(f, "double"),
      TypeData::Label => write!(f, "label"),
      TypeData::Metadata => write!(f, "metadata"),
      TypeData::Integer(bits) => write!(f, "i{}", bits),
      TypeData::Function(func) => {
        write!(f, "{} (", self.with(func.ret()))?;
        self.fmt_list(f, func.params())?;
        if func.is_var_arg() {
          if !func.params().is_empty() {
            write!(f, ", ")?;
          }
          write!(f, "...")?;
        }
        write!(f, ")")
      }
      TypeData::Struct(s) if !s.is_literal() => match s.name() {
        Some(name) => write!(f, "%{}", name),
        None => write!(f, "%{}", self.ty.index()),
      },
      TypeData::Struct(s) => {
        if s.is_packed() {
          write!(f, "<")?;
        }
        if s.elems().is_empty() {
          write!(f, "{{}}")?;
        } else {
          write!(f, "{{ ")?;
          self.fmt_list(f, s.elems())?;
          write!(f, " }}")?;
        }
        if s.is_packed() {
          write!(f, ">")?;
        }
        Ok(())
      }
      TypeData::Array(elem, len) => write!(f, "[{} x {}]", len, self.with(*elem)),
      TypeData::Vector(elem, len) => write!(f, "<{} x {}>", len, self.with(*elem)),
      TypeData::Pointer(elem, 0) => write!(f, "{}*", self.with(*elem)),
      TypeData::Pointer(elem, addr_space) => {
        write!(f, "{} addrspace({})*", self.with(*elem), addr_space)
      }
    }
  }
}
