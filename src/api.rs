use reqwest::Method;
use serde_json::Value;

use crate::error::ClientError;
use crate::network_common::url_join;
use crate::types::{Action, MockUpdate, PresetSelection, Variables};

/// Remote control for an apimock server.
///
/// Implementors supply the request primitive and the two host hooks; every
/// endpoint operation is expressed in terms of those.
#[async_trait::async_trait]
pub trait Client: Send + Sync {
    /// Identifier the mock server uses to keep this client's state apart.
    fn apimock_id(&self) -> &str;

    /// Api root, e.g. `http://localhost:9000/ngapimock`.
    fn base_url(&self) -> &str;

    /// Name of the cookie (or header) the apimock id travels in.
    fn identifier(&self) -> &str;

    /// Invokes the api and handles the response.
    ///
    /// `body` is sent as JSON for every method except `GET` and `HEAD`.
    ///
    /// # Errors
    /// Returns [`ClientError::Status`] for any non-success status code.
    async fn invoke(
        &self,
        query: &str,
        method: Method,
        body: &Value,
    ) -> Result<reqwest::Response, ClientError>;

    async fn open_url(&self, url: &str) -> Result<(), ClientError>;

    async fn set_cookie(&self, name: &str, value: &str) -> Result<(), ClientError>;

    async fn delay_response(&self, name: &str, delay: u64) -> Result<(), ClientError> {
        let body = serde_json::to_value(MockUpdate::delay(name, delay))?;
        self.invoke("mocks", Method::PUT, &body).await?;
        Ok(())
    }

    async fn delete_variable(&self, key: &str) -> Result<(), ClientError> {
        self.invoke(&format!("variables/{}", key), Method::DELETE, &empty_body())
            .await?;
        Ok(())
    }

    async fn echo_request(&self, name: &str, echo: bool) -> Result<(), ClientError> {
        let body = serde_json::to_value(MockUpdate::echo(name, echo))?;
        self.invoke("mocks", Method::PUT, &body).await?;
        Ok(())
    }

    async fn get_mocks(&self) -> Result<Value, ClientError> {
        get_json(self, "mocks").await
    }

    async fn get_presets(&self) -> Result<Value, ClientError> {
        get_json(self, "presets").await
    }

    async fn get_recordings(&self) -> Result<Value, ClientError> {
        get_json(self, "recordings").await
    }

    async fn get_variables(&self) -> Result<Value, ClientError> {
        get_json(self, "variables").await
    }

    async fn record_requests(&self, record: bool) -> Result<(), ClientError> {
        perform(self, Action::Record { record }).await
    }

    /// Sets the selected scenario of every mock back to its default.
    async fn reset_mocks_to_default(&self) -> Result<(), ClientError> {
        perform(self, Action::Defaults).await
    }

    async fn select_preset(&self, name: &str) -> Result<(), ClientError> {
        let body = serde_json::to_value(PresetSelection::new(name))?;
        self.invoke("presets", Method::PUT, &body).await?;
        Ok(())
    }

    async fn select_scenario(&self, name: &str, scenario: &str) -> Result<(), ClientError> {
        let body = serde_json::to_value(MockUpdate::scenario(name, scenario))?;
        self.invoke("mocks", Method::PUT, &body).await?;
        Ok(())
    }

    async fn set_mocks_to_pass_through(&self) -> Result<(), ClientError> {
        perform(self, Action::PassThroughs).await
    }

    /// Opens the api `init` url and hands the apimock id to the host as a
    /// cookie, so requests the host makes are attributed to this client.
    async fn set_apimock_cookie(&self) -> Result<(), ClientError> {
        let init_url = url_join([self.base_url(), "init"]);
        self.open_url(&init_url).await?;
        self.set_cookie(self.identifier(), self.apimock_id()).await
    }

    async fn set_variable(&self, key: &str, value: Value) -> Result<(), ClientError> {
        let mut variables = Variables::new();
        variables.insert(key.to_string(), value);
        self.set_variables(variables).await
    }

    async fn set_variables(&self, variables: Variables) -> Result<(), ClientError> {
        self.invoke("variables", Method::PUT, &Value::Object(variables))
            .await?;
        Ok(())
    }
}

async fn perform<C: Client + ?Sized>(client: &C, action: Action) -> Result<(), ClientError> {
    let body = serde_json::to_value(action)?;
    client.invoke("actions", Method::PUT, &body).await?;
    Ok(())
}

async fn get_json<C: Client + ?Sized>(client: &C, query: &str) -> Result<Value, ClientError> {
    let response = client.invoke(query, Method::GET, &empty_body()).await?;
    Ok(response.json().await?)
}

fn empty_body() -> Value {
    Value::Object(serde_json::Map::new())
}
