//! Courses, sessions, and the section scheduling chain.
//!
//! This is the deepest part of the dependency graph: a section needs a
//! class period, a location, and a course offering, and the course offering
//! in turn needs a session (with its grading periods) and a course.

use serde_json::json;

use super::SCHOOL_YEAR;
use crate::descriptor::{Binding, DependencySpec, ResourceDescriptor, UpdateSpec};
use crate::factory::{build_descriptor, random_suffix, unique_id};
use crate::kind::{ResourceKind, SharedSlot};

pub(super) fn descriptors() -> Vec<ResourceDescriptor> {
    vec![
        course(),
        class_period(),
        bell_schedule(),
        session(),
        course_offering(),
        section(),
    ]
}

fn course() -> ResourceDescriptor {
    ResourceDescriptor {
        kind: ResourceKind::Course,
        read_only: false,
        template: |rng| {
            json!({
                "courseCode": random_suffix(rng, "ELA-01"),
                "courseTitle": "English Language Arts, Grade 1",
                "numberOfParts": 1,
                "academicSubjectDescriptor":
                    build_descriptor("AcademicSubject", "English Language Arts"),
                "identificationCodes": [
                    {
                        "courseIdentificationSystemDescriptor":
                            build_descriptor("CourseIdentificationSystem", "LEA course code"),
                        "identificationCode": "ELA-01",
                    }
                ],
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
            path: "courseTitle",
            value: |_| json!("English Language Arts, Grade 1 (Revised)"),
        }),
    }
}

fn class_period() -> ResourceDescriptor {
    ResourceDescriptor {
        kind: ResourceKind::ClassPeriod,
        read_only: false,
        template: |rng| {
            json!({
                "classPeriodName": random_suffix(rng, "Class Period"),
                "officialAttendancePeriod": false,
                "schoolReference": { "schoolId": null },
            })
        },
        dependencies: vec![DependencySpec::shared(
            SharedSlot::HighSchool,
            const { &[Binding::new("schoolId", "schoolReference.schoolId")] },
        )],
        update: Some(UpdateSpec {
            path: "officialAttendancePeriod",
            value: |_| json!(true),
        }),
    }
}

fn bell_schedule() -> ResourceDescriptor {
    ResourceDescriptor {
        kind: ResourceKind::BellSchedule,
        read_only: false,
        template: |rng| {
            json!({
                "bellScheduleName": random_suffix(rng, "Normal Schedule"),
                "alternateDayName": "A",
                "classPeriods": [
                    { "classPeriodReference": { "classPeriodName": null, "schoolId": null } }
                ],
                "schoolReference": { "schoolId": null },
            })
        },
        dependencies: vec![
            DependencySpec::shared(
                SharedSlot::HighSchool,
                const { &[
                    Binding::new("schoolId", "schoolReference.schoolId"),
                    Binding::new("schoolId", "classPeriods.0.classPeriodReference.schoolId"),
                ] },
            ),
            DependencySpec::fresh(
                ResourceKind::ClassPeriod,
                const { &[Binding::new(
                    "classPeriodName",
                    "classPeriods.0.classPeriodReference.classPeriodName",
                )] },
            ),
        ],
        update: Some(UpdateSpec {
            path: "alternateDayName",
            value: |_| json!("B"),
        }),
    }
}

fn session() -> ResourceDescriptor {
    ResourceDescriptor {
        kind: ResourceKind::Session,
        read_only: false,
        template: |rng| {
            json!({
                "sessionName": random_suffix(rng, "Fall Semester"),
                "beginDate": "08/23/2014",
                "endDate": "12/19/2014",
                "termDescriptor": build_descriptor("Term", "Fall Semester"),
                "totalInstructionalDays": 81,
                "schoolReference": { "schoolId": null },
                "schoolYearTypeReference": { "schoolYear": SCHOOL_YEAR },
                "gradingPeriods": [
                    {
                        "gradingPeriodReference": {
                            "gradingPeriodDescriptor": null,
                            "gradingPeriodName": null,
                            "periodSequence": null,
                            "schoolId": null,
                            "schoolYear": SCHOOL_YEAR,
                        }
                    },
                    {
                        "gradingPeriodReference": {
                            "gradingPeriodDescriptor": null,
                            "gradingPeriodName": null,
                            "periodSequence": null,
                            "schoolId": null,
                            "schoolYear": SCHOOL_YEAR,
                        }
                    }
                ],
            })
        },
        dependencies: vec![
            DependencySpec::shared(
                SharedSlot::HighSchool,
                const { &[
                    Binding::new("schoolId", "schoolReference.schoolId"),
                    Binding::new("schoolId", "gradingPeriods.0.gradingPeriodReference.schoolId"),
                    Binding::new("schoolId", "gradingPeriods.1.gradingPeriodReference.schoolId"),
                ] },
            ),
            DependencySpec::fresh(
                ResourceKind::GradingPeriod,
                const { &[
                    Binding::new(
                        "gradingPeriodDescriptor",
                        "gradingPeriods.0.gradingPeriodReference.gradingPeriodDescriptor",
                    ),
                    Binding::new(
                        "gradingPeriodName",
                        "gradingPeriods.0.gradingPeriodReference.gradingPeriodName",
                    ),
                    Binding::new(
                        "periodSequence",
                        "gradingPeriods.0.gradingPeriodReference.periodSequence",
                    ),
                ] },
            ),
            DependencySpec::fresh(
                ResourceKind::GradingPeriod,
                const { &[
                    Binding::new(
                        "gradingPeriodDescriptor",
                        "gradingPeriods.1.gradingPeriodReference.gradingPeriodDescriptor",
                    ),
                    Binding::new(
                        "gradingPeriodName",
                        "gradingPeriods.1.gradingPeriodReference.gradingPeriodName",
                    ),
                    Binding::new(
                        "periodSequence",
                        "gradingPeriods.1.gradingPeriodReference.periodSequence",
                    ),
                ] },
            ),
        ],
        update: Some(UpdateSpec {
            path: "totalInstructionalDays",
            value: |_| json!(82),
        }),
    }
}

fn course_offering() -> ResourceDescriptor {
    ResourceDescriptor {
        kind: ResourceKind::CourseOffering,
        read_only: false,
        template: |rng| {
            json!({
                "localCourseCode": random_suffix(rng, "ELA-01"),
                "localCourseTitle": "English Language Arts, Grade 1",
                "schoolReference": { "schoolId": null },
                "sessionReference": {
                    "sessionName": null,
                    "schoolId": null,
                    "schoolYear": SCHOOL_YEAR,
                },
                "courseReference": {
                    "courseCode": null,
                    "educationOrganizationId": null,
                },
            })
        },
        dependencies: vec![
            DependencySpec::shared(
                SharedSlot::HighSchool,
                const { &[
                    Binding::new("schoolId", "schoolReference.schoolId"),
                    Binding::new("schoolId", "sessionReference.schoolId"),
                    Binding::new("schoolId", "courseReference.educationOrganizationId"),
                ] },
            ),
            DependencySpec::fresh(
                ResourceKind::Session,
                const { &[Binding::new("sessionName", "sessionReference.sessionName")] },
            ),
            DependencySpec::fresh(
                ResourceKind::Course,
                const { &[Binding::new("courseCode", "courseReference.courseCode")] },
            ),
        ],
        update: Some(UpdateSpec {
            path: "localCourseTitle",
            value: |_| json!("English Language Arts, Grade 1 (Revised)"),
        }),
    }
}

fn section() -> ResourceDescriptor {
    ResourceDescriptor {
        kind: ResourceKind::Section,
        read_only: false,
        template: |rng| {
            json!({
                "sectionIdentifier": unique_id(rng),
                "sequenceOfCourse": 1,
                "availableCredits": 1.0,
                "educationalEnvironmentDescriptor":
                    build_descriptor("EducationalEnvironment", "Classroom"),
                "classPeriods": [
                    { "classPeriodReference": { "classPeriodName": null, "schoolId": null } }
                ],
                "courseOfferingReference": {
                    "localCourseCode": null,
                    "schoolId": null,
                    "schoolYear": SCHOOL_YEAR,
                    "sessionName": null,
                },
                "locationReference": {
                    "classroomIdentificationCode": null,
                    "schoolId": null,
                },
            })
        },
        dependencies: vec![
            DependencySpec::shared(
                SharedSlot::HighSchool,
                const { &[
                    Binding::new("schoolId", "classPeriods.0.classPeriodReference.schoolId"),
                    Binding::new("schoolId", "courseOfferingReference.schoolId"),
                    Binding::new("schoolId", "locationReference.schoolId"),
                ] },
            ),
            DependencySpec::fresh(
                ResourceKind::ClassPeriod,
                const { &[Binding::new(
                    "classPeriodName",
                    "classPeriods.0.classPeriodReference.classPeriodName",
                )] },
            ),
            DependencySpec::fresh(
                ResourceKind::CourseOffering,
                const { &[
                    Binding::new("localCourseCode", "courseOfferingReference.localCourseCode"),
                    Binding::new(
                        "sessionReference.sessionName",
                        "courseOfferingReference.sessionName",
                    ),
                ] },
            ),
            DependencySpec::fresh(
                ResourceKind::Location,
                const { &[Binding::new(
                    "classroomIdentificationCode",
                    "locationReference.classroomIdentificationCode",
                )] },
            ),
        ],
        update: Some(UpdateSpec {
            path: "availableCredits",
            value: |_| json!(2.0),
        }),
    }
}
