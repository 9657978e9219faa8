/// Data layer: loading, type inference, and wire encoding.
///
/// Architecture:
/// ```text
///  .csv / .xls / .xlsx
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file → RawTable
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐   ┌──────────┐
///   │ normalize │ ─►│ classify │  one column at a time → TypedColumn
///   └───────────┘   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ serialize │  TypedTable → JSON rows + dtype labels
///   └───────────┘
/// ```

pub mod classify;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod serialize;
