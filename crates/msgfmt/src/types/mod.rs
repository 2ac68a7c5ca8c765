mod parameter;
mod type_name;
mod value;

pub use parameter::Parameter;
pub use type_name::{EnumValue, TypeName};
pub use value::{SharedList, Value};
