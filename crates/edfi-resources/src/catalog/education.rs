//! Schools, calendars, and the other education-organization descriptors.

use rand::rngs::StdRng;
use serde_json::{json, Value};

use super::{LOCAL_EDUCATION_AGENCY_ID, SCHOOL_YEAR};
use crate::descriptor::{Binding, DependencySpec, ResourceDescriptor, UpdateSpec};
use crate::factory::{
    build_descriptor, build_descriptor_dicts, random_suffix, unique_id, unique_primary_key,
};
use crate::kind::{ResourceKind, SharedSlot};

pub(super) fn descriptors() -> Vec<ResourceDescriptor> {
    vec![
        school(),
        school_year_type(),
        location(),
        calendar(),
        calendar_date(),
        grading_period(),
        academic_week(),
        program(),
        cohort(),
    ]
}

fn school_template(rng: &mut StdRng) -> Value {
    json!({
        "schoolId": unique_primary_key(rng),
        "nameOfInstitution": random_suffix(rng, "Grand Bend High School"),
        "shortNameOfInstitution": "GBHS",
        "addresses": [
            {
                "addressTypeDescriptor": build_descriptor("AddressType", "Physical"),
                "city": "Grand Bend",
                "postalCode": "78834",
                "stateAbbreviationDescriptor": build_descriptor("StateAbbreviation", "TX"),
                "streetNumberName": "53 Plum Drive",
            }
        ],
        "educationOrganizationCategories": build_descriptor_dicts(
            "EducationOrganizationCategory",
            "educationOrganizationCategoryDescriptor",
            &["School"],
        ),
        "gradeLevels": build_descriptor_dicts(
            "GradeLevel",
            "gradeLevelDescriptor",
            &["Ninth grade", "Tenth grade", "Eleventh grade", "Twelfth grade"],
        ),
        "localEducationAgencyReference": {
            "localEducationAgencyId": LOCAL_EDUCATION_AGENCY_ID,
        },
    })
}

fn school() -> ResourceDescriptor {
    ResourceDescriptor {
        kind: ResourceKind::School,
        read_only: false,
        template: school_template,
        dependencies: vec![],
        update: Some(UpdateSpec {
            path: "nameOfInstitution",
            value: |rng| json!(random_suffix(rng, "Updated High School")),
        }),
    }
}

fn school_year_type() -> ResourceDescriptor {
    ResourceDescriptor {
        kind: ResourceKind::SchoolYearType,
        read_only: true,
        template: |_| json!({}),
        dependencies: vec![],
        update: None,
    }
}

fn location() -> ResourceDescriptor {
    ResourceDescriptor {
        kind: ResourceKind::Location,
        read_only: false,
        template: |rng| {
            json!({
                "classroomIdentificationCode": random_suffix(rng, "Room 101"),
                "maximumNumberOfSeats": 30,
                "schoolReference": { "schoolId": null },
            })
        },
        dependencies: vec![DependencySpec::shared(
            SharedSlot::HighSchool,
            const { &[Binding::new("schoolId", "schoolReference.schoolId")] },
        )],
        update: Some(UpdateSpec {
            path: "maximumNumberOfSeats",
            value: |_| json!(35),
        }),
    }
}

fn calendar() -> ResourceDescriptor {
    ResourceDescriptor {
        kind: ResourceKind::Calendar,
        read_only: false,
        template: |rng| {
            json!({
                "calendarCode": random_suffix(rng, "107"),
                "calendarTypeDescriptor": build_descriptor("CalendarType", "Student Specific"),
                "schoolReference": { "schoolId": null },
                "schoolYearTypeReference": { "schoolYear": SCHOOL_YEAR },
            })
        },
        dependencies: vec![DependencySpec::shared(
            SharedSlot::HighSchool,
            const { &[Binding::new("schoolId", "schoolReference.schoolId")] },
        )],
        update: Some(UpdateSpec {
            path: "calendarTypeDescriptor",
            value: |_| json!(build_descriptor("CalendarType", "IEP")),
        }),
    }
}

fn calendar_date() -> ResourceDescriptor {
    ResourceDescriptor {
        kind: ResourceKind::CalendarDate,
        read_only: false,
        template: |_| {
            json!({
                "date": "09/16/2014",
                "calendarEvents": build_descriptor_dicts(
                    "CalendarEvent",
                    "calendarEventDescriptor",
                    &["Instructional day"],
                ),
                "calendarReference": {
                    "calendarCode": null,
                    "schoolId": null,
                    "schoolYear": SCHOOL_YEAR,
                },
            })
        },
        dependencies: vec![
            DependencySpec::fresh(
                ResourceKind::Calendar,
                const { &[Binding::new("calendarCode", "calendarReference.calendarCode")] },
            ),
            DependencySpec::shared(
                SharedSlot::HighSchool,
                const { &[Binding::new("schoolId", "calendarReference.schoolId")] },
            ),
        ],
        update: Some(UpdateSpec {
            path: "calendarEvents",
            value: |_| {
                build_descriptor_dicts("CalendarEvent", "calendarEventDescriptor", &["Holiday"])
            },
        }),
    }
}

fn grading_period() -> ResourceDescriptor {
    ResourceDescriptor {
        kind: ResourceKind::GradingPeriod,
        read_only: false,
        template: |rng| {
            json!({
                "gradingPeriodDescriptor": build_descriptor("GradingPeriod", "First six weeks"),
                "gradingPeriodName": random_suffix(rng, "Grading Period"),
                "periodSequence": unique_primary_key(rng),
                "beginDate": "08/23/2014",
                "endDate": "10/01/2014",
                "totalInstructionalDays": 29,
                "schoolReference": { "schoolId": null },
                "schoolYearTypeReference": { "schoolYear": SCHOOL_YEAR },
            })
        },
        dependencies: vec![DependencySpec::shared(
            SharedSlot::HighSchool,
            const { &[Binding::new("schoolId", "schoolReference.schoolId")] },
        )],
        update: Some(UpdateSpec {
            path: "totalInstructionalDays",
            value: |_| json!(30),
        }),
    }
}

fn academic_week() -> ResourceDescriptor {
    ResourceDescriptor {
        kind: ResourceKind::AcademicWeek,
        read_only: false,
        template: |rng| {
            json!({
                "weekIdentifier": unique_id(rng),
                "beginDate": "09/15/2014",
                "endDate": "09/19/2014",
                "totalInstructionalDays": 5,
                "schoolReference": { "schoolId": null },
            })
        },
        dependencies: vec![DependencySpec::shared(
            SharedSlot::HighSchool,
            const { &[Binding::new("schoolId", "schoolReference.schoolId")] },
        )],
        update: Some(UpdateSpec {
            path: "totalInstructionalDays",
            value: |_| json!(4),
        }),
    }
}

fn program() -> ResourceDescriptor {
    ResourceDescriptor {
        kind: ResourceKind::Program,
        read_only: false,
        template: |rng| {
            json!({
                "programName": random_suffix(rng, "Gifted and Talented"),
                "programTypeDescriptor": build_descriptor("ProgramType", "Gifted and Talented"),
                "programId": unique_primary_key(rng).to_string(),
                "educationOrganizationReference": { "educationOrganizationId": null },
            })
        },
        dependencies: vec![DependencySpec::shared(
            SharedSlot::HighSchool,
            const { &[Binding::new(
                "schoolId",
                "educationOrganizationReference.educationOrganizationId",
            )] },
        )],
        update: Some(UpdateSpec {
            path: "programId",
            value: |rng| json!(unique_primary_key(rng).to_string()),
        }),
    }
}

fn cohort() -> ResourceDescriptor {
    ResourceDescriptor {
        kind: ResourceKind::Cohort,
        read_only: false,
        template: |rng| {
            json!({
                "cohortIdentifier": unique_id(rng),
                "cohortDescription": "Cohort created for performance testing",
                "cohortTypeDescriptor": build_descriptor("CohortType", "Study Hall"),
                "educationOrganizationReference": { "educationOrganizationId": null },
            })
        },
        dependencies: vec![DependencySpec::shared(
            SharedSlot::HighSchool,
            const { &[Binding::new(
                "schoolId",
                "educationOrganizationReference.educationOrganizationId",
            )] },
        )],
        update: Some(UpdateSpec {
            path: "cohortDescription",
            value: |_| json!("Updated cohort description"),
        }),
    }
}
