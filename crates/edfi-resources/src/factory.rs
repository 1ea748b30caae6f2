//! Randomized payload attribute helpers and descriptor URI construction.
//!
//! Ed-Fi descriptors are namespaced URIs of the form
//! `uri://ed-fi.org/GradeLevelDescriptor#Sixth grade`. Identity attributes
//! that must be unique across runs get random lowercase identifiers or
//! random integer primary keys within the ODS column range.

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde_json::{json, Value};

/// Largest value accepted by the ODS integer primary key columns.
pub const MAX_PRIMARY_KEY: i64 = 2_147_483_647;

/// Builds a descriptor URI, appending the `Descriptor` suffix to the type
/// name when the caller leaves it off.
pub fn build_descriptor(kind: &str, value: &str) -> String {
    if kind.ends_with("Descriptor") {
        format!("uri://ed-fi.org/{kind}#{value}")
    } else {
        format!("uri://ed-fi.org/{kind}Descriptor#{value}")
    }
}

/// Builds the list-of-objects shape many payloads use for descriptor
/// collections, e.g. `[{"gradeLevelDescriptor": "uri://..."}]`.
pub fn build_descriptor_dicts(kind: &str, key: &str, values: &[&str]) -> Value {
    Value::Array(
        values
            .iter()
            .map(|value| json!({ key: build_descriptor(kind, value) }))
            .collect(),
    )
}

/// A 32-character lowercase alphanumeric identifier.
pub fn unique_id<R: Rng>(rng: &mut R) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(32)
        .map(|c| (c as char).to_ascii_lowercase())
        .collect()
}

/// A random integer primary key within the ODS column range.
pub fn unique_primary_key<R: Rng>(rng: &mut R) -> i64 {
    rng.gen_range(1..MAX_PRIMARY_KEY)
}

/// Appends a short random uppercase suffix so repeated runs do not collide
/// on natural-key name fields.
pub fn random_suffix<R: Rng>(rng: &mut R, base: &str) -> String {
    let suffix: String = (0..4)
        .map(|_| rng.gen_range(b'A'..=b'Z') as char)
        .collect();
    format!("{base} {suffix}")
}

/// A date in the `MM/DD/YYYY` form the ODS accepts, within `year`.
pub fn random_date_in_year<R: Rng>(rng: &mut R, year: i32) -> String {
    let month = rng.gen_range(1..=12);
    let day = rng.gen_range(1..=28);
    formatted_date(month, day, year)
}

/// `MM/DD/YYYY` with zero padding.
pub fn formatted_date(month: u32, day: u32, year: i32) -> String {
    format!("{month:02}/{day:02}/{year}")
}
