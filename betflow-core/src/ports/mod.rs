pub mod connector;

pub use connector::{Connector, RelationColumn};
