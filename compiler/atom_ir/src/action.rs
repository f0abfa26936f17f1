//! Native actions: the callable words of the language.
//!
//! Uses enum dispatch rather than boxed closures. Every action is plain data,
//! so actions can sit on the operand stack, be stored in bindings, cross the
//! observer thread and be compared, and the evaluator matches on them
//! exhaustively.

use std::fmt;

use crate::HostType;

/// A callable stored in set-bindings or produced by `make-operation`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NativeAction {
    /// A built-in primitive word.
    Primitive(Primitive),
    /// A late-bound operator of fixed arity.
    Operator(OperatorKind),
    /// A late-bound explicit conversion to a host type.
    Convert(HostType),
}

impl fmt::Display for NativeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeAction::Primitive(primitive) => f.write_str(primitive.word()),
            NativeAction::Operator(op) => f.write_str(op.word()),
            NativeAction::Convert(ty) => write!(f, "convert-to-{ty}"),
        }
    }
}

/// Built-in primitive words registered in set-bindings at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    If,
    While,
    Evaluate,
    EvaluateAndSplit,
    Split,
    Join,
    Set,
    Put,
    Get,
    Cast,
    ToName,
    MakeOperation,
    MakeBinaryAction,
    MakeUnaryAction,
    Execute,
    Invoke,
    Reference,
    CreateEventHandler,
    CreateDelegate,
    Break,
    Output,
    Show,
    Trace,
}

impl Primitive {
    /// Every primitive, in registration order.
    pub const ALL: [Primitive; 23] = [
        Primitive::If,
        Primitive::While,
        Primitive::Evaluate,
        Primitive::EvaluateAndSplit,
        Primitive::Split,
        Primitive::Join,
        Primitive::Set,
        Primitive::Put,
        Primitive::Get,
        Primitive::Cast,
        Primitive::ToName,
        Primitive::MakeOperation,
        Primitive::MakeBinaryAction,
        Primitive::MakeUnaryAction,
        Primitive::Execute,
        Primitive::Invoke,
        Primitive::Reference,
        Primitive::CreateEventHandler,
        Primitive::CreateDelegate,
        Primitive::Break,
        Primitive::Output,
        Primitive::Show,
        Primitive::Trace,
    ];

    /// The word the primitive is bound to.
    pub fn word(self) -> &'static str {
        match self {
            Primitive::If => "if",
            Primitive::While => "while",
            Primitive::Evaluate => "evaluate",
            Primitive::EvaluateAndSplit => "evaluate-and-split",
            Primitive::Split => "split",
            Primitive::Join => "join",
            Primitive::Set => "set",
            Primitive::Put => "put",
            Primitive::Get => "get",
            Primitive::Cast => "cast",
            Primitive::ToName => "to-name",
            Primitive::MakeOperation => "make-operation",
            Primitive::MakeBinaryAction => "make-binary-action",
            Primitive::MakeUnaryAction => "make-unary-action",
            Primitive::Execute => "execute",
            Primitive::Invoke => "invoke",
            Primitive::Reference => "reference",
            Primitive::CreateEventHandler => "create-event-handler",
            Primitive::CreateDelegate => "create-delegate",
            Primitive::Break => "break",
            Primitive::Output => "output",
            Primitive::Show => "show",
            Primitive::Trace => "trace",
        }
    }
}

/// Operator identifiers understood by the late-bound operator factory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    And,
    Or,
    ExclusiveOr,
    LeftShift,
    RightShift,
    Negate,
    Not,
    OnesComplement,
}

impl OperatorKind {
    pub const ALL: [OperatorKind; 19] = [
        OperatorKind::Add,
        OperatorKind::Subtract,
        OperatorKind::Multiply,
        OperatorKind::Divide,
        OperatorKind::Modulo,
        OperatorKind::Equal,
        OperatorKind::NotEqual,
        OperatorKind::LessThan,
        OperatorKind::LessThanOrEqual,
        OperatorKind::GreaterThan,
        OperatorKind::GreaterThanOrEqual,
        OperatorKind::And,
        OperatorKind::Or,
        OperatorKind::ExclusiveOr,
        OperatorKind::LeftShift,
        OperatorKind::RightShift,
        OperatorKind::Negate,
        OperatorKind::Not,
        OperatorKind::OnesComplement,
    ];

    /// The language word registered for this operator at startup.
    pub fn word(self) -> &'static str {
        match self {
            OperatorKind::Add => "add",
            OperatorKind::Subtract => "subtract",
            OperatorKind::Multiply => "multiply",
            OperatorKind::Divide => "divide",
            OperatorKind::Modulo => "modulo",
            OperatorKind::Equal => "equal",
            OperatorKind::NotEqual => "not-equal",
            OperatorKind::LessThan => "less",
            OperatorKind::LessThanOrEqual => "less-or-equal",
            OperatorKind::GreaterThan => "greater",
            OperatorKind::GreaterThanOrEqual => "greater-or-equal",
            OperatorKind::And => "and",
            OperatorKind::Or => "or",
            OperatorKind::ExclusiveOr => "exclusive-or",
            OperatorKind::LeftShift => "left-shift",
            OperatorKind::RightShift => "right-shift",
            OperatorKind::Negate => "negate",
            OperatorKind::Not => "not",
            OperatorKind::OnesComplement => "ones-complement",
        }
    }

    /// The host expression-kind name (`ExpressionType` field name).
    pub fn host_name(self) -> &'static str {
        match self {
            OperatorKind::Add => "Add",
            OperatorKind::Subtract => "Subtract",
            OperatorKind::Multiply => "Multiply",
            OperatorKind::Divide => "Divide",
            OperatorKind::Modulo => "Modulo",
            OperatorKind::Equal => "Equal",
            OperatorKind::NotEqual => "NotEqual",
            OperatorKind::LessThan => "LessThan",
            OperatorKind::LessThanOrEqual => "LessThanOrEqual",
            OperatorKind::GreaterThan => "GreaterThan",
            OperatorKind::GreaterThanOrEqual => "GreaterThanOrEqual",
            OperatorKind::And => "And",
            OperatorKind::Or => "Or",
            OperatorKind::ExclusiveOr => "ExclusiveOr",
            OperatorKind::LeftShift => "LeftShift",
            OperatorKind::RightShift => "RightShift",
            OperatorKind::Negate => "Negate",
            OperatorKind::Not => "Not",
            OperatorKind::OnesComplement => "OnesComplement",
        }
    }

    /// Number of operands popped.
    pub fn arity(self) -> usize {
        match self {
            OperatorKind::Negate | OperatorKind::Not | OperatorKind::OnesComplement => 1,
            _ => 2,
        }
    }

    /// Resolve a word or host expression-kind name.
    pub fn from_identifier(identifier: &str) -> Option<OperatorKind> {
        OperatorKind::ALL
            .into_iter()
            .find(|op| op.word() == identifier || op.host_name() == identifier)
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.word())
    }
}
