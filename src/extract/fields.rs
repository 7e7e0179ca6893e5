use serde::Serialize;

/// Identifiers of the fields this source can extract.
///
/// The numeric values are part of the host contract and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum FieldId {
    Src = 0,
    Name = 1,
    User = 2,
    Region = 3,
    BucketName = 4,
}

impl FieldId {
    pub const ALL: [FieldId; 5] = [
        FieldId::Src,
        FieldId::Name,
        FieldId::User,
        FieldId::Region,
        FieldId::BucketName,
    ];

    pub fn from_u32(id: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|field| *field as u32 == id)
    }

    /// Resolve a field by its public name, e.g. `ct.user`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }

    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    pub fn descriptor(self) -> &'static FieldDescriptor {
        &FIELDS[self as usize]
    }
}

/// One row of the field table as published to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    #[serde(rename = "type")]
    pub field_type: &'static str,
    pub name: &'static str,
    pub desc: &'static str,
}

/// Field table, indexed by `FieldId`.
pub static FIELDS: [FieldDescriptor; 5] = [
    FieldDescriptor {
        field_type: "string",
        name: "ct.src",
        desc: "the source of the cloudtrail event (eventSource in the json, without the '.amazonaws.com' trailer).",
    },
    FieldDescriptor {
        field_type: "string",
        name: "ct.name",
        desc: "the name of the cloudtrail event (eventName in the json).",
    },
    FieldDescriptor {
        field_type: "string",
        name: "ct.user",
        desc: "the user of the cloudtrail event (userIdentity.userName in the json).",
    },
    FieldDescriptor {
        field_type: "string",
        name: "ct.region",
        desc: "the region of the cloudtrail event (awsRegion in the json).",
    },
    FieldDescriptor {
        field_type: "string",
        name: "ct.bucketname",
        desc: "the bucket name for s3 events (requestParameters.bucketName in the json).",
    },
];

/// Serialize the field table as the JSON array the host expects.
pub fn fields_json() -> Result<String, serde_json::Error> {
    serde_json::to_string(&FIELDS)
}
