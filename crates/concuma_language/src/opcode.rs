//! Opcode tables for the Concuma instruction format.
//!
//! Statements and expressions are self-delimiting byte regions introduced by a
//! one-byte opcode. Optional children are preceded by a lookahead byte: `0x00`
//! means absent, anything else is the first byte of the child.

#![allow(clippy::doc_markdown)]

macro_rules! byte_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $byte:literal, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        #[repr(u8)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant = $byte, )*
        }

        impl $name {
            /// Decodes an opcode byte.
            #[must_use]
            pub const fn from_byte(byte: u8) -> Option<Self> {
                match byte {
                    $( $byte => Some(Self::$variant), )*
                    _ => None,
                }
            }

            /// Returns the encoded byte.
            #[must_use]
            pub const fn byte(self) -> u8 {
                self as u8
            }
        }
    };
}

byte_enum! {
    /// Statement opcodes.
    pub enum StmtOp {
        /// `01 expr` - evaluate and print one expression.
        Print = 0x01,
        /// `02 cond then (00 | else)`
        If = 0x02,
        /// `03 i32 n, n×stmt` - scoped statement sequence.
        Block = 0x03,
        /// `04 u8 const, i32 id, (00 | init)`
        Declaration = 0x04,
        /// `05 i32 id, expr` - assignment.
        Definition = 0x05,
        /// `06 (00 | init) cond body (00 | step)`
        For = 0x06,
        /// `07`
        Break = 0x07,
        /// `08 i32 id, i32 n, n×i32 param, body`
        Function = 0x08,
        /// `09 i32 id, i32 n, n×expr` - call, result discarded.
        Call = 0x09,
        /// `0A (00 | expr)`
        Return = 0x0A,
        /// `0B i32 id, i32 n, n×stmt, i32 m, m×stmt` - recorded, not executed.
        Class = 0x0B,
        /// `0C i32 id, i32 n, n×stmt, i32 m, m×stmt` - executed in a fresh scope.
        Module = 0x0C,
        /// `0D i32 id, (00 | i32 alias)`
        Import = 0x0D,
        /// `0E i32 id, i32, i32, stmt` - reserved; skippable but not executable.
        Reserved = 0x0E,
    }
}

byte_enum! {
    /// Expression opcodes.
    pub enum ExprOp {
        /// `01 u8 op, expr`
        Unary = 0x01,
        /// `02 u8 op, lhs, rhs`
        Binary = 0x02,
        /// `03 expr` - parenthesization.
        Group = 0x03,
        /// `04 u8 tag, payload`
        Literal = 0x04,
        /// `05 i32 id` - evaluates to the binding itself.
        Var = 0x05,
        /// `06 i32 id, i32 n, n×expr`
        Call = 0x06,
        /// `07 lhs rhs` - evaluates `rhs` inside the module named by `lhs`.
        Accessor = 0x07,
    }
}

byte_enum! {
    /// Literal payload tags.
    pub enum LiteralTag {
        /// No payload.
        Null = 0x00,
        /// `u8`, `0x01` is true.
        Bool = 0x01,
        /// Little-endian `i32`.
        Int = 0x02,
        /// Little-endian `f64`.
        Float = 0x03,
        /// `u32` length, then one byte per character.
        String = 0x04,
    }
}

byte_enum! {
    /// Unary operators.
    pub enum UnaryOp {
        /// `!` - logical / zero-test negation.
        Not = 0x01,
        /// `-` - arithmetic negation.
        Negate = 0x02,
    }
}

byte_enum! {
    /// Binary operators.
    pub enum BinaryOp {
        /// `+`
        Add = 0x01,
        /// `-`
        Subtract = 0x02,
        /// `*`
        Multiply = 0x03,
        /// `/`
        Divide = 0x04,
        /// `==`
        Equal = 0x05,
        /// `!=`
        NotEqual = 0x06,
        /// `<`
        Less = 0x07,
        /// `<=`
        LessEqual = 0x08,
        /// `>`
        Greater = 0x09,
        /// `>=`
        GreaterEqual = 0x0A,
        /// `.` - reads the right operand through a module-valued left operand.
        Member = 0x0B,
    }
}

impl UnaryOp {
    /// Source-level spelling.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Not => "!",
            Self::Negate => "-",
        }
    }
}

impl BinaryOp {
    /// Source-level spelling.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::Member => ".",
        }
    }
}
