//! Performance testing tools for the Ed-Fi ODS/API.
//!
//! Four tools share one measurement pipeline:
//!
//! - `paging` sweeps every page of each resource collection
//! - `query` reads collections through filter sets of increasing size
//! - `pipeclean` smoke-tests the full CRUD cycle of every catalog resource
//! - `volume` drives sustained create/update/delete load from simulated users
//!
//! Every tool records per-request measurements into a shared
//! [`perf_report::RequestLog`] and finishes by writing detail and summary
//! reports through [`perf_report::Reporter`].
//!
//! # CLI Usage
//!
//! ```bash
//! # Paging sweep over every discoverable resource
//! edfi-perf-test paging -b https://localhost/WebApi -k <key> -s <secret>
//!
//! # Pipeclean a handful of resources, keeping created data
//! edfi-perf-test pipeclean -b ... -k ... -s ... -r schools,students --delete-resources false
//!
//! # Thirty seconds of volume load from ten users
//! edfi-perf-test volume -b ... -k ... -s ... --users 10 --duration 30
//! ```

pub mod config;
pub mod fatal;
pub mod paging;
pub mod pipeclean;
pub mod query;
pub mod volume;
