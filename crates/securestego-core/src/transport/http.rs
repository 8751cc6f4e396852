use async_trait::async_trait;
use log::debug;
use reqwest::multipart::{Form, Part};

use super::{
    ClientOptions, Endpoint, FormValue, MultipartForm, ServiceResponse, Transport, TransportError,
};

/// [`Transport`] over HTTP(S) backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    options: ClientOptions,
}

impl HttpTransport {
    pub fn new(options: ClientOptions) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(options.timeout)
            .user_agent(concat!("securestego/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, options })
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    fn absolute(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            self.options.url_for(path)
        }
    }

    async fn read(response: reqwest::Response) -> Result<ServiceResponse, TransportError> {
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        debug!("response {} with {} bytes", status, body.len());

        Ok(ServiceResponse { status, body })
    }
}

fn to_reqwest_form(form: MultipartForm) -> Result<Form, TransportError> {
    let mut body = Form::new();
    for (name, value) in form.into_parts() {
        body = match value {
            FormValue::Text(text) => body.text(name, text),
            FormValue::File(file) => {
                let (file_name, mime, data) = file.into_parts();
                let part = Part::bytes(data).file_name(file_name).mime_str(&mime)?;
                body.part(name, part)
            }
        };
    }

    Ok(body)
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_multipart(
        &self,
        endpoint: Endpoint,
        form: MultipartForm,
    ) -> Result<ServiceResponse, TransportError> {
        let url = self.absolute(endpoint.path());
        debug!("POST {} with fields {:?}", url, form.field_names());

        let response = self
            .client
            .post(&url)
            .multipart(to_reqwest_form(form)?)
            .send()
            .await?;

        Self::read(response).await
    }

    async fn get(&self, path: &str) -> Result<ServiceResponse, TransportError> {
        let url = self.absolute(path);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        Self::read(response).await
    }
}
