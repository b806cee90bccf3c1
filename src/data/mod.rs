/// Data layer: naming, storage, parsing and inspection.
///
/// Architecture:
/// ```text
///   upload(name, bytes)
///        │
///        ▼
///   ┌──────────┐
///   │  naming   │  raw name → safe filename under the root
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  store    │  persist / list / load (no cache)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  CSV → Table (typed columns)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ inspect   │  datatype + values per column
///   └──────────┘
/// ```

pub mod features;
pub mod inspect;
pub mod loader;
pub mod model;
pub mod naming;
pub mod store;
pub mod writer;
