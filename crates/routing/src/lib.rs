//! Lumber routing - which sink a log call is written to
//!
//! A logger owns a small, fixed set of sinks: one general sink, an optional
//! request sink and, when level separation is on, one sink per level. The
//! [`RoutingTable`] is built once from [`RoutingOptions`] and answers, for
//! every call, which [`SinkId`] receives the event.
//!
//! # Routing rules
//!
//! - Without level separation every non-request event goes to the general sink
//! - With it, each level has its own sink and panic/fatal share the error sink
//! - Request calls go to the request sink, or nowhere if it was not created
//! - Unknown level tags fall back to the general sink
//!
//! # Example
//!
//! ```
//! use lumber_encoding::Level;
//! use lumber_routing::{RoutingOptions, RoutingTable, SinkId};
//!
//! let table = RoutingTable::new(RoutingOptions::default());
//!
//! // Single general sink
//! assert_eq!(table.route(Level::Error), SinkId::GENERAL);
//! assert_eq!(table.route_request(), None);
//! ```

mod error;
mod file_type;
mod sink_id;
mod table;


pub use error::{Result, RoutingError};
pub use file_type::FileType;
pub use sink_id::SinkId;
pub use table::{RoutingOptions, RoutingTable};
