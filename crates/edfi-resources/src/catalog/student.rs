//! Students and their school and section enrollments.

use serde_json::json;

use super::SCHOOL_YEAR;
use crate::descriptor::{Binding, DependencySpec, ResourceDescriptor, UpdateSpec};
use crate::factory::{build_descriptor, unique_id};
use crate::kind::{ResourceKind, SharedSlot};

pub(super) fn descriptors() -> Vec<ResourceDescriptor> {
    vec![
        student(),
        student_school_association(),
        student_section_association(),
    ]
}

fn student() -> ResourceDescriptor {
    ResourceDescriptor {
        kind: ResourceKind::Student,
        read_only: false,
        template: |rng| {
            json!({
                "studentUniqueId": unique_id(rng),
                "firstName": "Austin",
                "lastSurname": "Jones",
                "birthDate": "01/01/2009",
                "birthCity": "Grand Bend",
                "birthStateAbbreviationDescriptor":
                    build_descriptor("StateAbbreviation", "TX"),
            })
        },
        dependencies: vec![],
        update: Some(UpdateSpec {
            path: "firstName",
            value: |_| json!("Madison"),
        }),
    }
}

fn student_school_association() -> ResourceDescriptor {
    ResourceDescriptor {
        kind: ResourceKind::StudentSchoolAssociation,
        read_only: false,
        template: |_| {
            json!({
                "entryDate": "08/23/2014",
                "entryGradeLevelDescriptor": build_descriptor("GradeLevel", "Ninth grade"),
                "studentReference": { "studentUniqueId": null },
                "schoolReference": { "schoolId": null },
            })
        },
        dependencies: vec![
            DependencySpec::fresh(
                ResourceKind::Student,
                const { &[Binding::new("studentUniqueId", "studentReference.studentUniqueId")] },
            ),
            DependencySpec::shared(
                SharedSlot::HighSchool,
                const { &[Binding::new("schoolId", "schoolReference.schoolId")] },
            ),
        ],
        update: Some(UpdateSpec {
            path: "entryGradeLevelDescriptor",
            value: |_| json!(build_descriptor("GradeLevel", "Tenth grade")),
        }),
    }
}

fn student_section_association() -> ResourceDescriptor {
    ResourceDescriptor {
        kind: ResourceKind::StudentSectionAssociation,
        read_only: false,
        template: |_| {
            json!({
                "beginDate": "08/23/2014",
                "sectionReference": {
                    "sectionIdentifier": null,
                    "localCourseCode": null,
                    "schoolId": null,
                    "schoolYear": SCHOOL_YEAR,
                    "sessionName": null,
                },
                "studentReference": { "studentUniqueId": null },
            })
        },
        dependencies: vec![
            DependencySpec::fresh(
                ResourceKind::Section,
                const { &[
                    Binding::new("sectionIdentifier", "sectionReference.sectionIdentifier"),
                    Binding::new(
                        "courseOfferingReference.localCourseCode",
                        "sectionReference.localCourseCode",
                    ),
                    Binding::new(
                        "courseOfferingReference.sessionName",
                        "sectionReference.sessionName",
                    ),
                ] },
            ),
            DependencySpec::shared(
                SharedSlot::HighSchool,
                const { &[Binding::new("schoolId", "sectionReference.schoolId")] },
            ),
            DependencySpec::fresh(
                ResourceKind::Student,
                const { &[Binding::new("studentUniqueId", "studentReference.studentUniqueId")] },
            ),
        ],
        update: Some(UpdateSpec {
            path: "endDate",
            value: |_| json!("12/19/2014"),
        }),
    }
}
