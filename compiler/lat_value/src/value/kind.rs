//! Kind tags and mutability classes.

use std::fmt;

/// Whether operators may write a value in place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mutability {
    /// Shared literal: operators allocate a new value instead of writing.
    Constant,
    /// Uniquely or transiently owned: operators may write in place.
    Mutable,
}

impl Mutability {
    /// Returns `true` if this is `Mutable`.
    #[inline]
    pub fn is_mutable(self) -> bool {
        matches!(self, Mutability::Mutable)
    }
}

/// The closed set of runtime value kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Short,
    Integer,
    Float32,
    Float64,
    String,
    List,
    LinkedList,
    IntVector,
    ShortVector,
    FloatVector,
    NumberVector,
    StringVector,
    IntSet,
    NumberSet,
    Matrix32,
    Matrix64,
    Tensor32,
    Tensor64,
    Nil,
    Zero,
}

impl ValueKind {
    /// Name used in error messages.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Integer => "integer",
            Self::Float32 => "float",
            Self::Float64 => "number",
            Self::String => "string",
            Self::List => "list",
            Self::LinkedList => "llist",
            Self::IntVector => "integers",
            Self::ShortVector => "shorts",
            Self::FloatVector => "floats",
            Self::NumberVector => "numbers",
            Self::StringVector => "strings",
            Self::IntSet => "set_i",
            Self::NumberSet => "set_n",
            Self::Matrix32 => "matrix_float",
            Self::Matrix64 => "matrix_number",
            Self::Tensor32 => "tensor_float",
            Self::Tensor64 => "tensor_number",
            Self::Nil => "nil",
            Self::Zero => "zero",
        }
    }

    /// Single-valued numeric kinds.
    pub const fn is_scalar(self) -> bool {
        matches!(
            self,
            Self::Short | Self::Integer | Self::Float32 | Self::Float64 | Self::Zero
        )
    }

    /// Homogeneous vector kinds.
    pub const fn is_vector(self) -> bool {
        matches!(
            self,
            Self::IntVector
                | Self::ShortVector
                | Self::FloatVector
                | Self::NumberVector
                | Self::StringVector
        )
    }

    /// Kinds whose payload is text.
    pub const fn is_textual(self) -> bool {
        matches!(self, Self::String | Self::StringVector)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
