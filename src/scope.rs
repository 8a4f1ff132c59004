//! Enclosing-declaration classification for JSX elements.
//!
//! The call shape of a component reference depends on where it appears:
//! inside a function it is invoked, inside a class it is constructed and
//! rendered. Only the innermost declaration counts.

/// Upper bound on ancestor hops. Reaching it is the same as finding no scope.
pub const MAX_SCOPE_HOPS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FunctionScope {
    /// Declared name, or the binding an anonymous function/arrow is assigned to.
    pub name: Option<String>,
    pub is_arrow: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassScope {
    pub name: Option<String>,
    /// Identifiers from the `extends` clause, including the list form `extends [A, B]`.
    pub superclass_names: Vec<String>,
    /// Identifiers from the `implements` clause.
    pub implemented_interface_names: Vec<String>,
}

/// A declaration that can enclose JSX. Stored on scope nodes of the element tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeDecl {
    Function(FunctionScope),
    Class(ClassScope),
}

/// Classification of an element's nearest enclosing declaration.
/// Recomputed for every element, never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeMetadata {
    Function(FunctionScope),
    Class(ClassScope),
    Unknown,
}

impl ScopeMetadata {
    pub fn name(&self) -> Option<&str> {
        match self {
            ScopeMetadata::Function(f) => f.name.as_deref(),
            ScopeMetadata::Class(c) => c.name.as_deref(),
            ScopeMetadata::Unknown => None,
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self, ScopeMetadata::Function(_))
    }

    pub fn is_class(&self) -> bool {
        matches!(self, ScopeMetadata::Class(_))
    }
}

impl From<&ScopeDecl> for ScopeMetadata {
    fn from(decl: &ScopeDecl) -> Self {
        match decl {
            ScopeDecl::Function(f) => ScopeMetadata::Function(f.clone()),
            ScopeDecl::Class(c) => ScopeMetadata::Class(c.clone()),
        }
    }
}

/// Walk `ancestors` innermost-first and classify the first declaration found.
///
/// Each item is one ancestor; `None` marks an ancestor that is not a declaration.
/// The walk stops at the end of the chain or after [`MAX_SCOPE_HOPS`] ancestors.
pub fn resolve_scope<'a, I>(ancestors: I) -> ScopeMetadata
where
    I: IntoIterator<Item = Option<&'a ScopeDecl>>,
{
    let mut chain = ancestors.into_iter();
    let mut hops = 0;
    while hops < MAX_SCOPE_HOPS {
        match chain.next() {
            Some(Some(decl)) => return ScopeMetadata::from(decl),
            Some(None) => hops += 1,
            None => break,
        }
    }
    ScopeMetadata::Unknown
}
