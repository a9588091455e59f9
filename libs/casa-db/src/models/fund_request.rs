use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A request for payment or reimbursement filed under a case.
///
/// Every submitted value is kept exactly as typed; nothing is parsed or normalized.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FundRequest {
    pub id: i64,
    pub casa_case_id: i64,
    pub user_id: Option<i64>,
    pub submitter_email: Option<String>,
    pub youth_name: Option<String>,
    pub payment_amount: Option<String>,
    pub deadline: Option<String>,
    pub request_purpose: Option<String>,
    pub payee_name: Option<String>,
    pub requested_by_and_relationship: Option<String>,
    pub other_funding_source_sought: Option<String>,
    pub impact: Option<String>,
    pub extra_information: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Submitted form fields. A key absent from the form stays `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFundRequest {
    pub submitter_email: Option<String>,
    pub youth_name: Option<String>,
    pub payment_amount: Option<String>,
    pub deadline: Option<String>,
    pub request_purpose: Option<String>,
    pub payee_name: Option<String>,
    pub requested_by_and_relationship: Option<String>,
    pub other_funding_source_sought: Option<String>,
    pub impact: Option<String>,
    pub extra_information: Option<String>,
}

pub const FUND_REQUEST_FIELDS: [(&str, &str); 10] = [
    ("submitter_email", "Submitter email"),
    ("youth_name", "Youth name or case number"),
    ("payment_amount", "Payment amount"),
    ("deadline", "Deadline"),
    ("request_purpose", "Request purpose"),
    ("payee_name", "Payee name"),
    ("requested_by_and_relationship", "Requested by and relationship"),
    ("other_funding_source_sought", "Other funding source sought"),
    ("impact", "Impact"),
    ("extra_information", "Extra information"),
];

impl NewFundRequest {
    /// Submitted values in `FUND_REQUEST_FIELDS` order.
    pub fn values(&self) -> [Option<&str>; 10] {
        [
            self.submitter_email.as_deref(),
            self.youth_name.as_deref(),
            self.payment_amount.as_deref(),
            self.deadline.as_deref(),
            self.request_purpose.as_deref(),
            self.payee_name.as_deref(),
            self.requested_by_and_relationship.as_deref(),
            self.other_funding_source_sought.as_deref(),
            self.impact.as_deref(),
            self.extra_information.as_deref(),
        ]
    }
}

impl FundRequest {
    /// `(label, value)` pairs for display, in form order.
    pub fn labeled_values(&self) -> Vec<(&'static str, &str)> {
        let values = [
            self.submitter_email.as_deref(),
            self.youth_name.as_deref(),
            self.payment_amount.as_deref(),
            self.deadline.as_deref(),
            self.request_purpose.as_deref(),
            self.payee_name.as_deref(),
            self.requested_by_and_relationship.as_deref(),
            self.other_funding_source_sought.as_deref(),
            self.impact.as_deref(),
            self.extra_information.as_deref(),
        ];
        FUND_REQUEST_FIELDS
            .iter()
            .zip(values)
            .map(|((_, label), value)| (*label, value.unwrap_or("")))
            .collect()
    }
}
