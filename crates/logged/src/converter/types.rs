use std::fmt;

const OBJECT_TYPE: TypeInfo = TypeInfo {
    name: "object",
    superclass: None,
    interfaces: &[],
    enclosing: None,
};

/// Root of every class hierarchy. Has no superclass, which terminates ancestry walks.
pub static OBJECT: TypeInfo = OBJECT_TYPE;

/// Statically declared description of a runtime type.
///
/// The name is the identity of the type: converters are registered and resolved by name.
/// Hierarchies are acyclic by construction since a type can only reference types that
/// already exist.
///
/// ```ignore
/// static IDENTIFIED: TypeInfo = TypeInfo::interface("shop::Identified");
/// static ENTITY: TypeInfo = TypeInfo::class("shop::Entity");
/// static CUSTOMER: TypeInfo = TypeInfo::class("shop::Customer").extends(&ENTITY).implements(&[&IDENTIFIED]);
/// ```
#[derive(Debug)]
pub struct TypeInfo {
    name: &'static str,
    superclass: Option<&'static TypeInfo>,
    interfaces: &'static [&'static TypeInfo],
    enclosing: Option<&'static TypeInfo>,
}

impl TypeInfo {
    /// Declares a class extending [`OBJECT`].
    pub const fn class(name: &'static str) -> Self {
        Self {
            name,
            superclass: Some(&OBJECT_TYPE),
            interfaces: &[],
            enclosing: None,
        }
    }

    /// Declares a capability set. Interfaces have no superclass but may extend other interfaces
    /// through [`Self::implements`].
    pub const fn interface(name: &'static str) -> Self {
        Self {
            name,
            superclass: None,
            interfaces: &[],
            enclosing: None,
        }
    }

    pub const fn extends(mut self, superclass: &'static TypeInfo) -> Self {
        self.superclass = Some(superclass);
        self
    }

    pub const fn implements(mut self, interfaces: &'static [&'static TypeInfo]) -> Self {
        self.interfaces = interfaces;
        self
    }

    /// Declares the type as nested inside `enclosing`.
    pub const fn nested_in(mut self, enclosing: &'static TypeInfo) -> Self {
        self.enclosing = Some(enclosing);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn superclass(&self) -> Option<&'static TypeInfo> {
        self.superclass
    }

    pub fn interfaces(&self) -> &'static [&'static TypeInfo] {
        self.interfaces
    }

    pub fn enclosing(&self) -> Option<&'static TypeInfo> {
        self.enclosing
    }

    /// Walks up the enclosure chain to the top-level type.
    pub fn outermost(&self) -> &TypeInfo {
        let mut current = self;
        while let Some(enclosing) = current.enclosing {
            current = enclosing;
        }

        current
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for TypeInfo {}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

pub mod builtin {
    use super::TypeInfo;

    pub static UNIT: TypeInfo = TypeInfo::class("unit");

    pub static COMPARABLE: TypeInfo = TypeInfo::interface("comparable");
    pub static CHAR_SEQUENCE: TypeInfo = TypeInfo::interface("char_sequence");

    pub static BOOL: TypeInfo = TypeInfo::class("bool").implements(&[&COMPARABLE]);
    pub static NUMBER: TypeInfo = TypeInfo::class("number");

    pub static I32: TypeInfo = TypeInfo::class("i32").extends(&NUMBER).implements(&[&COMPARABLE]);
    pub static I64: TypeInfo = TypeInfo::class("i64").extends(&NUMBER).implements(&[&COMPARABLE]);
    pub static U32: TypeInfo = TypeInfo::class("u32").extends(&NUMBER).implements(&[&COMPARABLE]);
    pub static U64: TypeInfo = TypeInfo::class("u64").extends(&NUMBER).implements(&[&COMPARABLE]);
    pub static USIZE: TypeInfo = TypeInfo::class("usize").extends(&NUMBER).implements(&[&COMPARABLE]);
    pub static F32: TypeInfo = TypeInfo::class("f32").extends(&NUMBER);
    pub static F64: TypeInfo = TypeInfo::class("f64").extends(&NUMBER);
    pub static DECIMAL: TypeInfo = TypeInfo::class("decimal").extends(&NUMBER).implements(&[&COMPARABLE]);

    pub static STRING: TypeInfo = TypeInfo::class("string").implements(&[&CHAR_SEQUENCE, &COMPARABLE]);
}

#[cfg(test)]
mod tests {
    use super::*;

    static OUTER: TypeInfo = TypeInfo::class("Outer");
    static MIDDLE: TypeInfo = TypeInfo::class("Outer::Middle").nested_in(&OUTER);
    static INNER: TypeInfo = TypeInfo::class("Outer::Middle::Inner").nested_in(&MIDDLE);

    #[test]
    fn class_extends_object_by_default() {
        assert_eq!(TypeInfo::class("Foo").superclass(), Some(&OBJECT));
    }

    #[test]
    fn interface_and_object_have_no_superclass() {
        assert!(TypeInfo::interface("Foo").superclass().is_none());
        assert!(OBJECT.superclass().is_none());
    }

    #[test]
    fn outermost_walks_up_enclosing_types() {
        assert_eq!(INNER.outermost().name(), "Outer");
        assert_eq!(MIDDLE.outermost().name(), "Outer");
        assert_eq!(OUTER.outermost().name(), "Outer");
    }

    #[test]
    fn identity_is_the_name() {
        assert_eq!(TypeInfo::class("Foo"), TypeInfo::interface("Foo"));
        assert_ne!(TypeInfo::class("Foo"), TypeInfo::class("Bar"));
    }
}
