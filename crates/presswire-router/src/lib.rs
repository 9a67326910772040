//! Presswire Router
//!
//! Final pipeline stage: packages a fully processed item into a
//! [`RoutedRecord`](presswire_domain::RoutedRecord), writes it to the bucket
//! configured for its content type, and keeps per-type counts.
//!
//! # Example
//!
//! ```
//! use presswire_domain::ContentType;
//! use presswire_router::{Router, RouterConfig};
//! use presswire_store::MemorySink;
//!
//! let router = Router::new(MemorySink::new(), RouterConfig::default());
//! assert_eq!(router.destination(ContentType::InjuryUpdate).0, "injury_updates");
//! assert_eq!(router.get_stats().total(), 0);
//! ```

#![warn(missing_docs)]

mod config;
mod router;

pub use config::RouterConfig;
pub use router::{record_name, RouteError, RouteReceipt, RouteRequest, Router};
