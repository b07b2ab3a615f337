use serde::{Deserialize, Serialize};

/// A prospective customer record. Sent once, not retained after success.
#[derive(Clone, Debug, Serialize)]
pub struct NewLead {
    pub name: String,
    pub phone: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LeadCreated {
    pub id: i64,
}

/// Server-side tally of a CSV bulk import.
#[derive(Clone, Debug, Deserialize)]
pub struct LeadImportReport {
    pub imported: u64,
}
