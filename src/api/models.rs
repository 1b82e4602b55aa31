use crate::api::{error_message_from_body, ModelsResponse};
use crate::utils::url::construct_api_url;

/// Fetch the provider's model list.
///
/// This is also the credential probe: a successful response is how a new API
/// key is validated before it is stored.
pub async fn fetch_models(
    client: &reqwest::Client,
    base_url: &str,
    api_key: &str,
) -> Result<ModelsResponse, Box<dyn std::error::Error>> {
    let models_url = construct_api_url(base_url, "models");
    let response = client
        .get(models_url)
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {api_key}"))
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(format!(
            "API request failed with status {status}: {}",
            error_message_from_body(&error_text)
        )
        .into());
    }

    let models_response = response.json::<ModelsResponse>().await?;
    Ok(models_response)
}
