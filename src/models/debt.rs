//! Debt summary shapes.
//!
//! Netting between group members happens on the backend; the client only
//! renders the creditor/debtor lists it gets back.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CalculateDebtResponse {
    #[serde(default)]
    pub creditors: Vec<DebtMember>,
    #[serde(default)]
    pub debtors: Vec<DebtMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtMember {
    pub uuid: String,
    pub name: Option<String>,
    pub amount: f64,
}

impl CalculateDebtResponse {
    /// Net position of one member: positive when owed money, negative
    /// when owing, zero when settled or not present.
    pub fn net_for(&self, uuid: &str) -> f64 {
        let credit: f64 = self
            .creditors
            .iter()
            .filter(|m| m.uuid == uuid)
            .map(|m| m.amount)
            .sum();
        let debt: f64 = self
            .debtors
            .iter()
            .filter(|m| m.uuid == uuid)
            .map(|m| m.amount)
            .sum();
        credit - debt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_calculate_debt_response() {
        let json = r#"{
            "creditors": [{"uuid": "5f3a", "name": "Asha", "amount": 613.50}],
            "debtors": [
                {"uuid": "9b01", "name": "Dev", "amount": 306.75},
                {"uuid": "c2d4", "name": "Mira", "amount": 306.75}
            ]
        }"#;
        let resp: CalculateDebtResponse = serde_json::from_str(json).expect("parse debt");
        assert_eq!(resp.creditors.len(), 1);
        assert_eq!(resp.debtors.len(), 2);
        assert!((resp.net_for("5f3a") - 613.50).abs() < f64::EPSILON);
        assert!((resp.net_for("9b01") + 306.75).abs() < f64::EPSILON);
        assert_eq!(resp.net_for("nobody"), 0.0);
    }

    #[test]
    fn test_empty_body_parses_to_default() {
        let resp: CalculateDebtResponse = serde_json::from_str("{}").expect("parse empty");
        assert!(resp.creditors.is_empty());
        assert!(resp.debtors.is_empty());
    }
}
