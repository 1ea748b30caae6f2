//! Resource kind and shared-slot identifiers.

use std::fmt;
use std::str::FromStr;

/// Every resource kind the test suite knows how to create or exercise.
///
/// The variant order is insignificant; ordering of reports is always by the
/// API endpoint name, not by this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceKind {
    AcademicWeek,
    BellSchedule,
    Calendar,
    CalendarDate,
    ClassPeriod,
    Cohort,
    Course,
    CourseOffering,
    GradingPeriod,
    Location,
    Program,
    School,
    SchoolYearType,
    Section,
    Session,
    Staff,
    Student,
    StudentSchoolAssociation,
    StudentSectionAssociation,
}

impl ResourceKind {
    /// All kinds, in catalog order.
    pub fn all() -> &'static [ResourceKind] {
        use ResourceKind::*;
        &[
            AcademicWeek,
            BellSchedule,
            Calendar,
            CalendarDate,
            ClassPeriod,
            Cohort,
            Course,
            CourseOffering,
            GradingPeriod,
            Location,
            Program,
            School,
            SchoolYearType,
            Section,
            Session,
            Staff,
            Student,
            StudentSchoolAssociation,
            StudentSectionAssociation,
        ]
    }

    /// The API collection endpoint, relative to the `/data/v3/ed-fi` prefix.
    pub fn endpoint(&self) -> &'static str {
        use ResourceKind::*;
        match self {
            AcademicWeek => "academicWeeks",
            BellSchedule => "bellSchedules",
            Calendar => "calendars",
            CalendarDate => "calendarDates",
            ClassPeriod => "classPeriods",
            Cohort => "cohorts",
            Course => "courses",
            CourseOffering => "courseOfferings",
            GradingPeriod => "gradingPeriods",
            Location => "locations",
            Program => "programs",
            School => "schools",
            SchoolYearType => "schoolYearTypes",
            Section => "sections",
            Session => "sessions",
            Staff => "staffs",
            Student => "students",
            StudentSchoolAssociation => "studentSchoolAssociations",
            StudentSectionAssociation => "studentSectionAssociations",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        ResourceKind::all()
            .iter()
            .find(|k| k.endpoint().to_lowercase() == lowered)
            .copied()
            .ok_or_else(|| format!("unknown resource kind: {s}"))
    }
}

/// A named slot for a resource created at most once per run and reused by
/// every dependent that names the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SharedSlot {
    ElementarySchool,
    HighSchool,
}

impl SharedSlot {
    /// The kind of resource the slot holds.
    pub fn kind(&self) -> ResourceKind {
        ResourceKind::School
    }

    /// Stable cache key for the slot.
    pub fn name(&self) -> &'static str {
        match self {
            SharedSlot::ElementarySchool => "elementary-school",
            SharedSlot::HighSchool => "high-school",
        }
    }
}
