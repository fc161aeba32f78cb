//! Reactive pagination and query models.
//!
//! Small primitives ([`StateCell`], [`EventStream`], [`Effect`]) are
//! composed into reusable models ([`QueryModel`], [`PaginationModel`]) and
//! wired together by [`sample`] rules. [`Pokedex`] is the two-stage paged
//! catalog browser built from them.

mod async_error;
mod async_state;
mod catalog;
mod cell;
mod effect;
mod event;
mod execution_result;
pub mod mock;
mod pagination;
mod pokedex;
mod query;
mod sample;
mod stream_ext;

pub use async_error::*;
pub use async_state::*;
pub use catalog::*;
pub use cell::*;
pub use effect::*;
pub use event::*;
pub use execution_result::*;
pub use pagination::*;
pub use pokedex::*;
pub use query::*;
pub use sample::*;
pub use stream_ext::*;

#[cfg(test)]
mod unit_tests;

/// Bound shared by cell values and event payloads.
pub trait State: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> State for T {}
