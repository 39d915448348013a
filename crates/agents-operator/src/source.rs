//! Where the webhook reads Namespaces and Instrumentations from
//!
//! The trait is the seam between the admission handler and the Kubernetes
//! API, so the handler can be tested against a mock.

use agents_common::crd::Instrumentation;
use agents_common::Error;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Namespace;
use kube::api::ListParams;
use kube::{Api, Client};

#[cfg(test)]
use mockall::automock;

/// Read access to the objects the webhook consults per admission request
#[cfg_attr(test, automock)]
#[async_trait]
pub trait InstrumentationSource: Send + Sync {
    /// Get a Namespace by name, `None` if it doesn't exist
    async fn namespace(&self, name: &str) -> Result<Option<Namespace>, Error>;

    /// List the Instrumentations that may apply to a Pod in `pod_namespace`
    async fn instrumentations(&self, pod_namespace: &str) -> Result<Vec<Instrumentation>, Error>;
}

/// Namespace Instrumentations are listed from: the configured one, else the Pod's own
pub fn instrumentation_scope<'a>(configured: Option<&'a str>, pod_namespace: &'a str) -> &'a str {
    match configured.map(str::trim) {
        Some(ns) if !ns.is_empty() => ns,
        _ => pod_namespace,
    }
}

/// Kubernetes-backed [`InstrumentationSource`]
pub struct KubeInstrumentationSource {
    client: Client,
    namespace: Option<String>,
}

impl KubeInstrumentationSource {
    /// Read Instrumentations from `namespace`, or from each Pod's own namespace when `None`
    pub fn new(client: Client, namespace: Option<String>) -> Self {
        Self { client, namespace }
    }
}

#[async_trait]
impl InstrumentationSource for KubeInstrumentationSource {
    async fn namespace(&self, name: &str) -> Result<Option<Namespace>, Error> {
        if name.trim().is_empty() {
            return Err(Error::config("namespace name must not be blank"));
        }
        let api: Api<Namespace> = Api::all(self.client.clone());
        match api.get(name).await {
            Ok(ns) => Ok(Some(ns)),
            Err(kube::Error::Api(ae)) if ae.code == 404 => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn instrumentations(&self, pod_namespace: &str) -> Result<Vec<Instrumentation>, Error> {
        let scope = instrumentation_scope(self.namespace.as_deref(), pod_namespace);
        let api: Api<Instrumentation> = Api::namespaced(self.client.clone(), scope);
        let list = api.list(&ListParams::default()).await?;
        Ok(list.items)
    }
}
