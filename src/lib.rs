#![doc = include_str!("../README.md")]
#![deny(
    warnings,
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    unused_allocation,
    unused_comparisons,
    unused_parens,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results,
    unreachable_pub,
    deprecated,
    unknown_lints,
    unreachable_code,
    unused_mut,
    clippy::wildcard_imports
)]

pub mod config;
mod error;
pub mod event;
mod forwarder;
mod normalize;
pub mod relay;
pub mod retry;
pub mod server;

pub use self::config::{Mode, Settings, Target};
pub use self::error::*;
pub use self::event::{CloudEvent, Event};
pub use self::forwarder::*;
pub use self::normalize::*;
pub use self::relay::{Delivery, Managed, Noop, Raw, Relay};
