//! Arithmetic and bitwise operators.
//!
//! The operator set is closed: every operator the numeric core understands
//! is a variant of [`ArithOp`]. Bitwise-not is unary and handled separately
//! by the evaluator.

/// Binary arithmetic and bitwise operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ArithOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,

    // Bitwise
    BitAnd,
    BitAndNot,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

impl ArithOp {
    /// Every operator, in symbol-table order.
    pub const ALL: [ArithOp; 12] = [
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Div,
        Self::Mod,
        Self::Pow,
        Self::BitAnd,
        Self::BitAndNot,
        Self::BitOr,
        Self::BitXor,
        Self::Shl,
        Self::Shr,
    ];

    /// Returns the source-level symbol for this operator.
    ///
    /// Used in error messages to show the exact operator that failed.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Pow => "^^",
            Self::BitAnd => "&",
            Self::BitAndNot => "&~",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::Shl => "<<",
            Self::Shr => ">>",
        }
    }

    /// Returns the compound-assignment symbol (`+=`, `^^=`, ...).
    pub const fn as_compound_symbol(self) -> &'static str {
        match self {
            Self::Add => "+=",
            Self::Sub => "-=",
            Self::Mul => "*=",
            Self::Div => "/=",
            Self::Mod => "%=",
            Self::Pow => "^^=",
            Self::BitAnd => "&=",
            Self::BitAndNot => "&~=",
            Self::BitOr => "|=",
            Self::BitXor => "^=",
            Self::Shl => "<<=",
            Self::Shr => ">>=",
        }
    }

    /// Resolve a plain operator symbol.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_symbol() == symbol)
    }

    /// Resolve a compound-assignment symbol.
    pub fn from_compound_symbol(symbol: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_compound_symbol() == symbol)
    }

    /// Whether `a op b == b op a` for every pair of numbers.
    ///
    /// Scalar-on-container dispatch swaps the operands for these and
    /// broadcasts the scalar for the rest.
    pub const fn is_commutative(self) -> bool {
        matches!(
            self,
            Self::Add | Self::Mul | Self::BitAnd | Self::BitOr | Self::BitXor
        )
    }

    /// Whether a zero right operand is rejected with `DivisionByZero`.
    pub const fn rejects_zero_divisor(self) -> bool {
        matches!(self, Self::Div | Self::Mod)
    }

    /// Whether both operands are truncated to integers before applying.
    pub const fn truncates_operands(self) -> bool {
        matches!(self, Self::Mod | Self::Shl | Self::Shr)
    }

    /// Whether the operator reinterprets float bit patterns.
    pub const fn is_bitwise(self) -> bool {
        matches!(
            self,
            Self::BitAnd | Self::BitAndNot | Self::BitOr | Self::BitXor
        )
    }

    /// Whether strings accept this operator (concatenation only).
    pub const fn applies_to_strings(self) -> bool {
        matches!(self, Self::Add)
    }
}

#[cfg(test)]
mod tests;
