//! Macros for declaring constraints with minimal boilerplate.
//!
//! # Available Macros
//!
//! - [`constraint!`]: struct + `Check` impl + factory fn for a rule over a typed view
//!
//! # Examples
//!
//! ```rust,ignore
//! use sieve_validator::constraint;
//! use sieve_validator::foundation::FieldError;
//!
//! // Unit constraint (no fields)
//! constraint! {
//!     pub Lowercase for str;
//!     rule(input) { input.chars().all(|c| !c.is_uppercase()) }
//!     error(input) { FieldError::new("lowercase", "Must be lowercase.") }
//!     fn lowercase();
//! }
//!
//! // Struct with fields
//! constraint! {
//!     #[derive(Copy, PartialEq, Eq, Hash)]
//!     pub MultipleOf { step: i64 } for Number;
//!     rule(self, input) { matches!(input, Number::Int(i) if i % self.step == 0) }
//!     error(self, input) {
//!         FieldError::new("multiple_of", "Must be a multiple of {step}.").with_param("step", self.step)
//!     }
//!     fn multiple_of(step: i64);
//! }
//! ```

// ============================================================================
// CONSTRAINT MACRO
// ============================================================================

/// Creates a complete constraint: struct definition, `Check` implementation,
/// constructor, and factory function.
///
/// The rule runs on a typed view of the value obtained through
/// [`AsValidatable`](crate::foundation::AsValidatable); a value of any other
/// kind fails with `invalid_type` before the rule runs. A passing value is
/// handed to the next check unchanged.
///
/// `#[derive(Debug, Clone)]` is always applied. Add extra derives via `#[derive(...)]`.
///
/// # Variants
///
/// **Unit constraint** (zero-sized, no fields):
/// ```rust,ignore
/// constraint! {
///     pub Email for str;
///     rule(input) { EMAIL_REGEX.is_match(input) }
///     error(input) { FieldError::new("email", "Must be a valid email address.") }
///     fn email();
/// }
/// ```
///
/// **Struct with fields** (auto `new` from all fields):
/// ```rust,ignore
/// constraint! {
///     #[derive(Copy, PartialEq, Eq, Hash)]
///     pub MinLength { min: usize } for str;
///     rule(self, input) { measure(input) >= self.min }
///     error(self, input) { FieldError::new("min_length", "...").with_param("min", self.min) }
///     fn min_length(min: usize);
/// }
/// ```
///
/// **Custom constructor** (overrides auto `new`):
/// ```rust,ignore
/// constraint! {
///     pub Max { max: Number } for Number;
///     rule(self, input) { *input <= self.max }
///     error(self, input) { FieldError::new("max", "...").with_param("max", self.max) }
///     new(max: impl Into<Number>) { Self { max: max.into() } }
///     fn max(max: impl Into<Number>);
/// }
/// ```
///
/// **Fallible constructor** (the type after `->` is the error type):
/// ```rust,ignore
/// constraint! {
///     pub Matches { regex: regex::Regex } for str;
///     rule(self, input) { self.regex.is_match(input) }
///     error(self, input) { FieldError::new("matches", "...") }
///     new(pattern: &str) -> regex::Error { Ok(Self { regex: regex::Regex::new(pattern)? }) }
///     fn matches(pattern: &str) -> regex::Error;
/// }
/// ```
#[macro_export]
macro_rules! constraint {
    // ── Internal: struct definition + Check impl ─────────────────────────
    (
        @struct
        $(#[$meta:meta])*
        $vis:vis $name:ident { $($field:ident: $fty:ty),+ } for $input:ty;
        rule($self_:ident, $inp:ident) $rule:block
        error($self2:ident, $einp:ident) $err:block
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        $vis struct $name {
            $(pub $field: $fty,)+
        }

        impl $crate::foundation::Check for $name {
            #[allow(unused_variables)]
            fn check(
                &$self_,
                value: $crate::foundation::Value,
                _ctx: &$crate::foundation::CheckContext<'_>,
            ) -> ::std::result::Result<$crate::foundation::Value, $crate::foundation::CheckError> {
                let rejection = {
                    let view = <$crate::foundation::Value as $crate::foundation::AsValidatable<$input>>::as_validatable(&value)?;
                    let $inp: &$input = ::std::borrow::Borrow::borrow(&view);
                    if $rule {
                        None
                    } else {
                        let $einp = $inp;
                        Some($err)
                    }
                };
                match rejection {
                    None => Ok(value),
                    Some(error) => Err(error.into()),
                }
            }
        }
    };

    // ── Variant 1: Unit constraint (no fields) + factory fn ──────────────
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident for $input:ty;
        rule($inp:ident) $rule:block
        error($einp:ident) $err:block
        fn $factory:ident();
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        $vis struct $name;

        impl $crate::foundation::Check for $name {
            #[allow(unused_variables)]
            fn check(
                &self,
                value: $crate::foundation::Value,
                _ctx: &$crate::foundation::CheckContext<'_>,
            ) -> ::std::result::Result<$crate::foundation::Value, $crate::foundation::CheckError> {
                let rejection = {
                    let view = <$crate::foundation::Value as $crate::foundation::AsValidatable<$input>>::as_validatable(&value)?;
                    let $inp: &$input = ::std::borrow::Borrow::borrow(&view);
                    if $rule {
                        None
                    } else {
                        let $einp = $inp;
                        Some($err)
                    }
                };
                match rejection {
                    None => Ok(value),
                    Some(error) => Err(error.into()),
                }
            }
        }

        #[must_use]
        $vis const fn $factory() -> $name { $name }
    };

    // ── Variant 2: Struct with fields + custom new + factory fn ──────────
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident { $($field:ident: $fty:ty),+ $(,)? } for $input:ty;
        rule($self_:ident, $inp:ident) $rule:block
        error($self2:ident, $einp:ident) $err:block
        new($($narg:ident: $naty:ty),* $(,)?) $new_body:block
        fn $factory:ident($($farg:ident: $faty:ty),* $(,)?);
    ) => {
        $crate::constraint! {
            @struct
            $(#[$meta])*
            $vis $name { $($field: $fty),+ } for $input;
            rule($self_, $inp) $rule
            error($self2, $einp) $err
        }

        #[allow(clippy::new_without_default)]
        impl $name {
            #[must_use]
            pub fn new($($narg: $naty),*) -> Self $new_body
        }

        #[must_use]
        $vis fn $factory($($farg: $faty),*) -> $name {
            $name::new($($farg),*)
        }
    };

    // ── Variant 3: Struct with fields + fallible new + fallible factory ──
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident { $($field:ident: $fty:ty),+ $(,)? } for $input:ty;
        rule($self_:ident, $inp:ident) $rule:block
        error($self2:ident, $einp:ident) $err:block
        new($($narg:ident: $naty:ty),* $(,)?) -> $ety:ty $new_body:block
        fn $factory:ident($($farg:ident: $faty:ty),* $(,)?) -> $efty:ty;
    ) => {
        $crate::constraint! {
            @struct
            $(#[$meta])*
            $vis $name { $($field: $fty),+ } for $input;
            rule($self_, $inp) $rule
            error($self2, $einp) $err
        }

        impl $name {
            pub fn new($($narg: $naty),*) -> ::std::result::Result<Self, $ety> $new_body
        }

        $vis fn $factory($($farg: $faty),*) -> ::std::result::Result<$name, $efty> {
            $name::new($($farg),*)
        }
    };

    // ── Variant 4: Struct with fields + auto new + factory fn ────────────
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident { $($field:ident: $fty:ty),+ $(,)? } for $input:ty;
        rule($self_:ident, $inp:ident) $rule:block
        error($self2:ident, $einp:ident) $err:block
        fn $factory:ident($($farg:ident: $faty:ty),* $(,)?);
    ) => {
        $crate::constraint! {
            @struct
            $(#[$meta])*
            $vis $name { $($field: $fty),+ } for $input;
            rule($self_, $inp) $rule
            error($self2, $einp) $err
        }

        impl $name {
            #[must_use]
            pub const fn new($($field: $fty),+) -> Self {
                Self { $($field),+ }
            }
        }

        #[must_use]
        $vis fn $factory($($farg: $faty),*) -> $name {
            $name::new($($farg),*)
        }
    };
}
