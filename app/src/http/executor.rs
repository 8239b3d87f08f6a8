use infrastructure::HttpClientConfig;
use reqwest_middleware::ClientWithMiddleware;

use super::{HttpMethod, HttpResponse, HttpTransport};

/// [`HttpTransport`] backed by a traced reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransactionExecutor {
    client: ClientWithMiddleware,
    config: HttpClientConfig,
}

impl HttpTransactionExecutor {
    pub fn new(config: HttpClientConfig) -> anyhow::Result<Self> {
        let client = config.new_tracing_client()?;
        Ok(Self { client, config })
    }

    async fn send(&self, method: HttpMethod, url: &str, data: Option<&str>) -> anyhow::Result<HttpResponse> {
        let mut request = match method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
        };

        if let Some((username, password)) = self.config.basic_auth() {
            request = request.basic_auth(username, password);
        }

        if let Some(data) = data {
            request = request.body(data.to_owned());
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(HttpResponse { status, body })
    }
}

impl HttpTransport for HttpTransactionExecutor {
    #[tracing::instrument(skip(self, data))]
    async fn execute(&self, method: HttpMethod, url: &str, data: Option<&str>) -> Option<HttpResponse> {
        tracing::debug!("Sending {} request to {} with data {:?}", method, url, data);

        match self.send(method, url, data).await {
            Ok(response) => {
                tracing::debug!("Response: {} - {}", response.status, response.body);
                Some(response)
            }
            Err(e) => {
                tracing::error!("Error executing {} request to {}: {:?}", method, url, e);
                None
            }
        }
    }
}
