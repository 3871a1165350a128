//! Application framework based on [scoped_inject] registries.
//!
//! Traditional applications start in the `main()` function and explicitly pass around various
//! services. With a [TypeRegistry](scoped_inject::registry::TypeRegistry) in place, services can
//! be registered once and injected into any prepared function. This crate provides an entrypoint
//! for such applications in the form of [Application](application::Application), which runs
//! [ApplicationRunners](runner::ApplicationRunner) and configures supporting infrastructure, e.g.
//! logging.
//!
//! ### Features
//!
//! * `threadsafe` - use threadsafe pointers and `Send + Sync` trait bounds

pub mod application;
pub mod config;
pub mod runner;
