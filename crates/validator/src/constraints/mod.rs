//! Built-in constraints
//!
//! Every constraint a field can declare is one variant of the closed
//! [`Constraint`] enum. Each variant wraps a concrete constraint type that
//! implements [`Check`] and, for coercing constraints, [`Transform`].
//!
//! # Categories
//!
//! - **Transformers**: [`BooleanTransformer`], [`IntegerTransformer`], [`FloatTransformer`], [`TextTransformer`]
//! - **Length**: [`MinLength`], [`MaxLength`], [`LengthRange`]
//! - **Range**: [`Min`], [`Max`], [`InRange`]
//! - **Pattern and choice**: [`Matches`], [`Choice`]
//! - **Formats**: [`Email`], [`Url`], [`Date`], [`Time`], [`DateTime`]
//! - **Uploads**: [`Upload`]
//! - **References**: [`Reference`], [`ReferenceList`]
//! - **Nested models**: [`Nested`], [`NestedList`]
//!
//! # Examples
//!
//! ```rust,ignore
//! use sieve_validator::constraints::*;
//!
//! FieldDecl::string("name")
//!     .constraint(min_length(1))
//!     .constraint(max_length(50));
//! ```

mod choice;
mod format;
mod length;
mod nested;
mod pattern;
mod range;
mod reference;
mod transform;
mod upload;

pub use choice::{Choice, choice};
pub use format::{Date, DateTime, Email, Time, Url, date, datetime, email, now, time, url};
pub use length::{LengthRange, MaxLength, MinLength, length_range, max_length, min_length};
pub use nested::{Nested, NestedList, nested, nested_list};
pub use pattern::{Matches, matches};
pub use range::{InRange, Max, Min, in_range, max, min};
pub use reference::{
    InMemoryLookup, LookupError, Reference, ReferenceKey, ReferenceList, ReferenceLookup,
    reference, reference_list,
};
pub use transform::{
    BooleanTransformer, FloatTransformer, IntegerTransformer, TextTransformer, boolean, float,
    integer, text,
};
pub use upload::{Upload, upload};

use crate::foundation::{Check, CheckContext, CheckError, Transform, TransformError, Value};

// ============================================================================
// CONSTRAINT SET
// ============================================================================

macro_rules! constraint_set {
    ($($variant:ident($ty:ty) => $label:literal),+ $(,)?) => {
        /// One element of a field's constraint chain.
        #[derive(Debug, Clone)]
        #[non_exhaustive]
        pub enum Constraint {
            $($variant($ty),)+
        }

        impl Constraint {
            /// Stable name of the constraint kind.
            #[must_use]
            pub const fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant(_) => $label,)+
                }
            }

            pub(crate) fn check(
                &self,
                value: Value,
                ctx: &CheckContext<'_>,
            ) -> Result<Value, CheckError> {
                match self {
                    $(Self::$variant(c) => Check::check(c, value, ctx),)+
                }
            }
        }

        $(
            impl From<$ty> for Constraint {
                fn from(c: $ty) -> Self {
                    Self::$variant(c)
                }
            }
        )+
    };
}

constraint_set! {
    Boolean(BooleanTransformer) => "boolean",
    Integer(IntegerTransformer) => "integer",
    Float(FloatTransformer) => "float",
    Text(TextTransformer) => "text",
    MinLength(MinLength) => "min_length",
    MaxLength(MaxLength) => "max_length",
    LengthRange(LengthRange) => "length_range",
    Min(Min) => "min",
    Max(Max) => "max",
    InRange(InRange) => "in_range",
    Matches(Matches) => "matches",
    Choice(Choice) => "choice",
    Email(Email) => "email",
    Url(Url) => "url",
    Date(Date) => "date",
    Time(Time) => "time",
    DateTime(DateTime) => "datetime",
    Upload(Upload) => "upload",
    Reference(Reference) => "reference",
    ReferenceList(ReferenceList) => "reference_list",
    Nested(Nested) => "nested",
    NestedList(NestedList) => "nested_list",
}

impl Constraint {
    /// The transform capability, if this constraint coerces raw input.
    #[must_use]
    pub fn as_transform(&self) -> Option<&dyn Transform> {
        match self {
            Self::Boolean(c) => Some(c),
            Self::Integer(c) => Some(c),
            Self::Float(c) => Some(c),
            Self::Text(c) => Some(c),
            Self::Upload(c) => Some(c),
            Self::Reference(c) => Some(c),
            Self::ReferenceList(c) => Some(c),
            _ => None,
        }
    }

    #[must_use]
    pub fn can_transform(&self) -> bool {
        self.as_transform().is_some()
    }

    /// Coerces `raw`, or returns it unchanged if this constraint does not
    /// transform.
    pub fn transform(&self, raw: Value) -> Result<Value, TransformError> {
        match self.as_transform() {
            Some(transformer) => transformer.transform(raw),
            None => Ok(raw),
        }
    }

    pub(crate) const fn is_nested(&self) -> bool {
        matches!(self, Self::Nested(_) | Self::NestedList(_))
    }
}
