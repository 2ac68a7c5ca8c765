use std::any::type_name;
use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

/// A fully qualified type name used as a type-descriptor value.
///
/// Rust types are described by their `std::any::type_name` path, but any
/// qualified name can be supplied, so descriptors of foreign types (for
/// example names read from a schema) work the same way.
///
/// # Example
///
/// ```
/// use msgfmt::TypeName;
///
/// let name = TypeName::new("app::model::Order");
/// assert_eq!(name.qualified(), "app::model::Order");
/// assert_eq!(name.simple_name(), "Order");
///
/// struct Invoice;
/// assert_eq!(TypeName::of::<Invoice>().simple_name(), "Invoice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeName(String);

impl TypeName {
    /// Creates a type name from a qualified path.
    pub fn new(qualified: impl Into<String>) -> Self {
        Self(qualified.into())
    }

    /// Describes the Rust type `T`.
    pub fn of<T: ?Sized>() -> Self {
        Self(type_name::<T>().to_string())
    }

    /// The fully qualified name.
    pub fn qualified(&self) -> &str {
        &self.0
    }

    /// The last path segment, without generic arguments.
    ///
    /// Both `::` and `.` are accepted as path separators.
    pub fn simple_name(&self) -> &str {
        let base = self.0.split('<').next().unwrap_or(&self.0);
        base.rsplit("::")
            .next()
            .and_then(|segment| segment.rsplit('.').next())
            .unwrap_or(base)
    }
}

impl Display for TypeName {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// A member of an enumerated type, displayed as `Type#Member`.
///
/// # Example
///
/// ```
/// use msgfmt::{EnumValue, TypeName};
///
/// let role = EnumValue::new(TypeName::new("auth::Role"), "Admin");
/// assert_eq!(role.to_string(), "Role#Admin");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnumValue {
    /// The declaring type.
    pub type_name: TypeName,
    /// The member name.
    pub member: String,
}

impl EnumValue {
    /// Creates an enumerated value from its declaring type and member name.
    pub fn new(type_name: TypeName, member: impl Into<String>) -> Self {
        Self {
            type_name,
            member: member.into(),
        }
    }

    /// Describes member `member` of the Rust enum `T`.
    ///
    /// A common pattern is to pass the `Debug` rendering of a fieldless enum:
    ///
    /// ```
    /// use msgfmt::EnumValue;
    ///
    /// #[derive(Debug)]
    /// enum Role {
    ///     Admin,
    /// }
    ///
    /// let value = EnumValue::of::<Role>(format!("{:?}", Role::Admin));
    /// assert_eq!(value.to_string(), "Role#Admin");
    /// ```
    pub fn of<T: ?Sized>(member: impl Into<String>) -> Self {
        Self::new(TypeName::of::<T>(), member)
    }
}

impl Display for EnumValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}#{}", self.type_name.simple_name(), self.member)
    }
}
