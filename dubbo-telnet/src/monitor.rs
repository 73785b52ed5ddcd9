//! Facade for the web layer.
//!
//! The HTTP endpoints receive a console port plus service/method/parameters
//! and expect a service list, a method list or an invoke result back. The
//! console host is fixed by configuration; the port varies per request.

use serde::{Deserialize, Serialize};

use crate::client::ConsoleClient;
use crate::error::Result;

/// Query for all services exported on a port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicesQuery {
    pub port: u16,
}

/// Query for the methods of one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodsQuery {
    pub port: u16,
    pub service: String,
}

/// Request to invoke a method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokeMethodRequest {
    pub port: u16,
    pub service_name: String,
    pub method_name: String,
    /// JSON argument list, without the surrounding parentheses.
    pub json_params: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicesList {
    pub services: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodsList {
    pub methods: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokeMethodResponse {
    /// Returned value, verbatim.
    pub result: String,
    /// Elapsed milliseconds reported by the console.
    pub time: u64,
}

/// Service behind the monitor endpoints.
#[derive(Debug, Clone)]
pub struct MonitorService {
    client: ConsoleClient,
}

impl MonitorService {
    /// Create a service; `client` supplies host, timeouts and limits, its
    /// port is replaced per request.
    pub fn new(client: ConsoleClient) -> Self {
        Self { client }
    }

    pub async fn get_all_services(&self, query: &ServicesQuery) -> Result<ServicesList> {
        let services = self.client.with_port(query.port).services().await?;
        Ok(ServicesList {
            services: services.into_vec(),
        })
    }

    pub async fn get_methods(&self, query: &MethodsQuery) -> Result<MethodsList> {
        let methods = self
            .client
            .with_port(query.port)
            .methods(&query.service)
            .await?;
        Ok(MethodsList {
            methods: methods.into_vec(),
        })
    }

    pub async fn invoke_method(&self, request: &InvokeMethodRequest) -> Result<InvokeMethodResponse> {
        let result = self
            .client
            .with_port(request.port)
            .invoke(&request.service_name, &request.method_name, &request.json_params)
            .await?;
        Ok(InvokeMethodResponse {
            result: result.result,
            time: result.elapsed_millis,
        })
    }
}
