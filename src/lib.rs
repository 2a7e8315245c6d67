// Global allocator: jemalloc on every target that supports it
#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

pub mod application;
pub mod domain;
pub mod interfaces;
pub mod shared;

pub use application::{ApplyOutcome, OrderBookEngine};
pub use domain::{BookView, SpreadMetrics, ViewRow};
pub use shared::EngineConfig;
