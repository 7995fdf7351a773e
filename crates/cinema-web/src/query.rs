use reqwest::header::CONTENT_TYPE;
use thiserror::Error;

const REQUESTED_WITH: &str = "X-Requested-With";
const XML_HTTP_REQUEST: &str = "XMLHttpRequest";
const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

#[derive(Debug, Error)]
pub enum RequestFailure {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("server responded with status {0}")]
    Status(u16),
}

/// Posts an already encoded form body, any 2xx counts as success.
pub async fn post_form(url: &str, body: String) -> Result<(), RequestFailure> {
    let client = reqwest::Client::new();

    let res = client
        .post(url)
        .header(REQUESTED_WITH, XML_HTTP_REQUEST)
        .header(CONTENT_TYPE, FORM_URLENCODED)
        .body(body)
        .send()
        .await?;

    let status = res.status();
    if !status.is_success() {
        return Err(RequestFailure::Status(status.as_u16()));
    }

    let text = res.text().await?;
    debug!("{} responded {} ({} bytes)", url, status, text.len());

    Ok(())
}
