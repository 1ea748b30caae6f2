//! Staff members.

use serde_json::json;

use crate::descriptor::{ResourceDescriptor, UpdateSpec};
use crate::factory::{build_descriptor, unique_id};
use crate::kind::ResourceKind;

pub(super) fn descriptors() -> Vec<ResourceDescriptor> {
    vec![staff()]
}

fn staff() -> ResourceDescriptor {
    ResourceDescriptor {
        kind: ResourceKind::Staff,
        read_only: false,
        template: |rng| {
            let staff_unique_id = unique_id(rng);
            json!({
                "staffUniqueId": staff_unique_id.clone(),
                "firstName": "John",
                "middleName": "Michael",
                "lastSurname": "Loyo",
                "hispanicLatinoEthnicity": true,
                "birthDate": "04/30/1959",
                "generationCodeSuffix": "Sr",
                "highestCompletedLevelOfEducationDescriptor":
                    build_descriptor("LevelOfEducation", "Master's"),
                "highlyQualifiedTeacher": true,
                "personalTitlePrefix": "Mr",
                "sexDescriptor": build_descriptor("Sex", "Male"),
                "electronicMails": [{
                    "electronicMailAddress": "johnloyo@edficert.org",
                    "electronicMailTypeDescriptor":
                        build_descriptor("ElectronicMailType", "Work"),
                }],
                "identificationCodes": [{
                    "staffIdentificationSystemDescriptor":
                        build_descriptor("StaffIdentificationSystem", "State"),
                    "identificationCode": staff_unique_id,
                }],
                "languages": [{
                    "languageDescriptor": build_descriptor("Language", "spa"),
                }],
            })
        },
        dependencies: vec![],
        update: Some(UpdateSpec {
            path: "highlyQualifiedTeacher",
            value: |_| json!(false),
        }),
    }
}
