use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "transactionId")]
    pub transaction_id: i64,
    #[serde(rename = "groupId")]
    pub group_id: i64,
    pub description: Option<String>,
    pub amount: f64,
    #[serde(rename = "paidBy")]
    pub paid_by: String,
    #[serde(rename = "splitAmong", default)]
    pub split_among: Vec<String>,
    #[serde(rename = "categoryId")]
    pub category_id: Option<i64>,
    #[serde(rename = "subCategoryId")]
    pub sub_category_id: Option<i64>,
    /// ISO-8601 timestamp from the backend
    pub date: Option<String>,
    /// Settle-up payments are recorded as transactions with this flag set
    #[serde(rename = "isSettleUp", default)]
    pub is_settle_up: bool,
}

/// Body for recording a settle-up payment between two group members.
#[derive(Debug, Clone, Serialize)]
pub struct SettleUpRequest {
    #[serde(rename = "groupId")]
    pub group_id: i64,
    #[serde(rename = "paidBy")]
    pub paid_by: String,
    #[serde(rename = "paidTo")]
    pub paid_to: String,
    pub amount: f64,
}
