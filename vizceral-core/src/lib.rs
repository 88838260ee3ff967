pub mod error;
pub mod ingest;
pub mod model;
pub mod translate;

pub use error::{Result, TranslateError};
pub use ingest::{DEFAULT_DUPLICATE_POLICY, DuplicatePolicy, EdgeSet, ingest, ingest_with_policy};
pub use model::{DisplayClass, Edge, RawEdge, Renderer, VizConnection, VizMetrics, VizNode};
pub use translate::{VizceralGraph, translate, translate_at};
