//! The built-in resource catalog.
//!
//! Each submodule contributes descriptors for one slice of the Ed-Fi data
//! model. Payload shapes and dependency chains follow the ODS "Grand Bend"
//! sample dataset conventions: the shared schools live in local education
//! agency 255901 and everything is anchored to the 2014 school year.

mod education;
mod scheduling;
mod staff;
mod student;

use crate::descriptor::ResourceDescriptor;

/// The local education agency every created school belongs to. It ships
/// with the ODS sample data and is never created by the test suite.
pub const LOCAL_EDUCATION_AGENCY_ID: i64 = 255_901;

/// The school year all created resources reference.
pub const SCHOOL_YEAR: i64 = 2014;

/// All built-in resource descriptors.
pub fn descriptors() -> Vec<ResourceDescriptor> {
    let mut all = Vec::new();
    all.extend(education::descriptors());
    all.extend(scheduling::descriptors());
    all.extend(staff::descriptors());
    all.extend(student::descriptors());
    all
}
