//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have no identity and are never mutated in place: an updated
/// balance snapshot or price quote is a new value. Two value objects holding
/// the same attributes are interchangeable.
///
/// ```ignore
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// struct GoldPriceQuote { usd_per_unit: f64 }
///
/// impl ValueObject for GoldPriceQuote {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
