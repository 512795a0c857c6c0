use crate::{SupabaseConfig, SupabaseError, SupabaseResult};
use handover_core::constants::REPORTS_TABLE;
use handover_core::{GatewayError, GatewayResult, ReportGateway, StoredReport};
use handover_types::Mrn;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;

/// PostgREST media type asking for a single JSON object instead of an array.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

#[derive(Clone, Debug)]
pub struct SupabaseGateway {
    client: Client,
    config: SupabaseConfig,
}

#[derive(Deserialize)]
struct AuthUser {
    id: String,
}

#[derive(Deserialize)]
struct PostgrestError {
    message: String,
}

impl SupabaseGateway {
    pub fn new(config: SupabaseConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.config.url(), REPORTS_TABLE)
    }

    fn authorised(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", self.config.anon_key())
            .header("Authorization", format!("Bearer {}", self.config.bearer()))
    }

    /// Id of the signed-in user, if an access token is configured and still valid.
    async fn current_user_id(&self) -> Option<String> {
        self.config.access_token()?;
        let url = format!("{}/auth/v1/user", self.config.url());
        let result = async {
            let response = checked(self.authorised(self.client.get(url)).send().await?).await?;
            Ok::<_, SupabaseError>(response.json::<AuthUser>().await?.id)
        }
        .await;
        match result {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!("could not resolve signed-in user, saving without author: {}", e);
                None
            }
        }
    }

    async fn insert(&self, mrn: &Mrn, report_data: &serde_json::Value) -> SupabaseResult<StoredReport> {
        let created_by = self.current_user_id().await;
        let body = json!({
            "mrn": mrn.as_str(),
            "report_data": report_data,
            "created_by": created_by,
        });
        let request = self
            .client
            .post(self.table_url())
            .header("Prefer", "return=representation")
            .header("Accept", SINGLE_OBJECT)
            .json(&body);
        let response = checked(self.authorised(request).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn patch(
        &self,
        id: &str,
        mrn: &Mrn,
        report_data: &serde_json::Value,
    ) -> SupabaseResult<StoredReport> {
        let body = json!({
            "mrn": mrn.as_str(),
            "report_data": report_data,
        });
        let request = self
            .client
            .patch(self.table_url())
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .header("Accept", SINGLE_OBJECT)
            .json(&body);
        let response = checked(self.authorised(request).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn select(&self, mrn: Option<&Mrn>) -> SupabaseResult<Vec<StoredReport>> {
        let mut query = vec![("select", "*".to_string())];
        if let Some(mrn) = mrn {
            query.push(("mrn", format!("eq.{}", mrn)));
        }
        query.push(("order", "created_at.desc".to_string()));

        let request = self.client.get(self.table_url()).query(&query);
        let response = checked(self.authorised(request).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn delete(&self, id: &str) -> SupabaseResult<Vec<StoredReport>> {
        let request = self
            .client
            .delete(self.table_url())
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation");
        let response = checked(self.authorised(request).send().await?).await?;
        Ok(response.json().await?)
    }
}

/// Turns a non-success response into [`SupabaseError::Status`], using the PostgREST error
/// message when the body carries one.
async fn checked(response: Response) -> SupabaseResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<PostgrestError>(&body)
        .map(|e| e.message)
        .unwrap_or(body);
    tracing::error!("hosted database returned {}: {}", status, message);
    Err(SupabaseError::Status {
        status: status.as_u16(),
        message,
    })
}

/// PostgREST answers 406 when a single-object request matched no rows.
fn not_found_on_406(id: &str, err: SupabaseError) -> GatewayError {
    match err {
        SupabaseError::Status { status, .. } if status == StatusCode::NOT_ACCEPTABLE.as_u16() => {
            GatewayError::NotFound(id.to_string())
        }
        other => other.into(),
    }
}

impl ReportGateway for SupabaseGateway {
    async fn save(&self, mrn: &Mrn, report_data: &serde_json::Value) -> GatewayResult<StoredReport> {
        Ok(self.insert(mrn, report_data).await?)
    }

    async fn update(
        &self,
        id: &str,
        mrn: &Mrn,
        report_data: &serde_json::Value,
    ) -> GatewayResult<StoredReport> {
        self.patch(id, mrn, report_data)
            .await
            .map_err(|e| not_found_on_406(id, e))
    }

    async fn find_by_mrn(&self, mrn: &Mrn) -> GatewayResult<Vec<StoredReport>> {
        Ok(self.select(Some(mrn)).await?)
    }

    async fn list_all(&self) -> GatewayResult<Vec<StoredReport>> {
        Ok(self.select(None).await?)
    }

    async fn remove(&self, id: &str) -> GatewayResult<()> {
        let deleted = self.delete(id).await?;
        if deleted.is_empty() {
            return Err(GatewayError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
