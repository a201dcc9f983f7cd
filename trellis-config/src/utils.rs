/// Flag, with an optional explicit value.
///
/// Intended to be used as an `Option<Flag>` field, as a tri-state:
/// - (missing): unset, `None`
/// - just `field`: set, `Some(Flag(true))`
/// - explicitly `field true` or `field false`: set, `Some(Flag(true))` or `Some(Flag(false))`
#[derive(knuffel::Decode, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flag(#[knuffel(argument, default = true)] pub bool);
