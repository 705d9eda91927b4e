//! Lexical type scopes.
//!
//! A scope is a singly-linked stack of [`TypedEntities`] frames. Each frame
//! maps variable names to their types and function names to their return
//! types. Lookups start at the innermost frame and walk outward.

use mt_ir::{Name, Type};
use rustc_hash::FxHashMap;

use crate::ScopeError;

/// One scope frame.
#[derive(Clone, Debug, Default)]
pub struct TypedEntities {
    variables: FxHashMap<Name, Type>,
    methods: FxHashMap<Name, Type>,
    parent: Option<Box<TypedEntities>>,
}

impl TypedEntities {
    fn variable(&self, name: &str) -> Option<&Type> {
        self.variables
            .get(name)
            .or_else(|| self.parent.as_ref().and_then(|p| p.variable(name)))
    }

    fn method(&self, name: &str) -> Option<&Type> {
        self.methods
            .get(name)
            .or_else(|| self.parent.as_ref().and_then(|p| p.method(name)))
    }

    pub fn variables(&self) -> impl Iterator<Item = (&Name, &Type)> {
        self.variables.iter()
    }

    pub fn methods(&self) -> impl Iterator<Item = (&Name, &Type)> {
        self.methods.iter()
    }
}

/// Stack of scope frames, innermost on top.
///
/// The root frame always exists. A fresh `TypeScope` belongs to one
/// translation and is never shared.
#[derive(Clone, Debug, Default)]
pub struct TypeScope {
    current: TypedEntities,
    depth: usize,
}

impl TypeScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames above the root.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The innermost frame.
    pub fn current(&self) -> &TypedEntities {
        &self.current
    }

    /// Push a new innermost frame.
    pub fn enter(&mut self) {
        let parent = std::mem::take(&mut self.current);
        self.current.parent = Some(Box::new(parent));
        self.depth += 1;
    }

    /// Pop the innermost frame.
    ///
    /// At the root frame this is a no-op, or `ScopeError::LeaveRoot` when
    /// `root_must_exist` is set.
    pub fn leave(&mut self, root_must_exist: bool) -> Result<(), ScopeError> {
        match self.current.parent.take() {
            Some(parent) => {
                self.current = *parent;
                self.depth -= 1;
                Ok(())
            }
            None if root_must_exist => Err(ScopeError::LeaveRoot),
            None => Ok(()),
        }
    }

    /// Declare a variable in the innermost frame, shadowing outer ones.
    pub fn add_variable(&mut self, name: impl Into<Name>, ty: Type) {
        self.current.variables.insert(name.into(), ty);
    }

    /// Record a function's return type in the innermost frame.
    pub fn add_method(&mut self, name: impl Into<Name>, ret: Type) {
        self.current.methods.insert(name.into(), ret);
    }

    /// Type of a variable visible from the innermost frame.
    pub fn variable_type(&self, name: &str) -> Option<&Type> {
        self.current.variable(name)
    }

    /// Return type of a function visible from the innermost frame,
    /// `Type::Unknown` when it was never recorded.
    pub fn method_return_type(&self, name: &str) -> Type {
        self.current.method(name).cloned().unwrap_or(Type::Unknown)
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.variable_type(name).is_some()
    }

    /// Whether the innermost frame itself declares `name`.
    pub fn is_declared_locally(&self, name: &str) -> bool {
        self.current.variables.contains_key(name)
    }

    /// Set a variable's type in the innermost frame.
    ///
    /// With `create_if_missing` unset, the variable must already be visible.
    pub fn change_variable_type(
        &mut self,
        name: &str,
        ty: Type,
        create_if_missing: bool,
    ) -> Result<(), ScopeError> {
        if !create_if_missing && !self.has_variable(name) {
            return Err(ScopeError::NoSuchVariable(name.into()));
        }
        self.current.variables.insert(name.into(), ty);
        Ok(())
    }

    /// [`TypeScope::change_variable_type`], creating the variable if needed.
    pub fn set_variable_type(&mut self, name: &str, ty: Type) {
        self.current.variables.insert(name.into(), ty);
    }
}
