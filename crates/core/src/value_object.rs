//! Value object trait: equality by value, not identity.
//!
//! Discounts, tax rates and computed totals have no identity of their own;
//! two of them with the same values are interchangeable.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one. The derived amounts of an invoice are value objects: a
/// recomputation either yields an equal value (nothing to write back) or a
/// different one.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct Discount {
///     kind: DiscountType,
///     value: f64,
/// }
///
/// impl ValueObject for Discount {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
