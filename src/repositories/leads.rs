use std::path::Path;

use crate::models::leads::{LeadCreated, LeadImportReport, NewLead};
use anyhow::bail;
use reqwest;

#[derive(Clone)]
pub struct LeadsApi {
    url: String,
    client: reqwest::Client,
}

impl LeadsApi {
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }

    pub async fn add_lead(&self, token: &str, lead: &NewLead) -> Result<LeadCreated, anyhow::Error> {
        let response = self
            .client
            .post(format!("{}/leads/add", self.url))
            .bearer_auth(token)
            .json(lead)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        parse_lead_created(status, &body)
    }

    /// Uploads a CSV file as-is; the server parses rows and reports how many
    /// it accepted. An empty file is rejected before any request is sent.
    pub async fn upload_csv(
        &self,
        token: &str,
        path: &Path,
    ) -> Result<LeadImportReport, anyhow::Error> {
        let bytes = tokio::fs::read(path).await?;
        if bytes.is_empty() {
            bail!("Leads: CSV file is empty: {}", path.display());
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "leads.csv".to_string());

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("text/csv")?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}/leads/upload_csv", self.url))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        parse_import_report(status, &body)
    }
}

pub fn parse_lead_created(status: u16, body: &str) -> Result<LeadCreated, anyhow::Error> {
    if !(200..300).contains(&status) {
        bail!("Leads: add failed ({}): {}", status, body);
    }

    match serde_json::from_str(body) {
        Ok(created) => Ok(created),
        Err(_) => bail!("Leads: Bad response format."),
    }
}

pub fn parse_import_report(status: u16, body: &str) -> Result<LeadImportReport, anyhow::Error> {
    if !(200..300).contains(&status) {
        bail!("Leads: CSV import failed ({}): {}", status, body);
    }

    match serde_json::from_str(body) {
        Ok(report) => Ok(report),
        Err(_) => bail!("Leads: Bad import report format."),
    }
}
