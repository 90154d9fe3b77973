use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(rename = "groupId")]
    pub group_id: i64,
    #[serde(rename = "groupName")]
    pub group_name: String,
    #[serde(rename = "createdBy")]
    pub created_by: Option<String>,
    #[serde(default)]
    pub members: Vec<GroupMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMember {
    pub uuid: String,
    pub name: Option<String>,
}
