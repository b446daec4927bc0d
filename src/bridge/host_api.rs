//! Dispatcher for host calls made by the remote side.
//!
//! | Method | Effect |
//! |--------|--------|
//! | `webChromeClient.create` | Builds a chrome client and registers it |
//! | `webChromeClient.setWebViewClient` | Swaps a chrome client's policy |
//! | `webViewClient.create` | Builds a [`NavigationClient`] and registers it |
//! | `webViewClient.setOverrideUrlLoading` | Changes a policy's local answer |
//! | `instanceManager.remove` | Removes and releases one instance |
//! | `instanceManager.clear` | Removes and releases everything |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::engine::NavigationPolicy;
use crate::error::{Error, Result};
use crate::identifiers::InstanceId;
use crate::protocol::{HostCall, HostMethod, Reply};
use crate::registry::InstanceRegistry;

use super::{ChromeClientFactory, NavigationClient, Notifier};

// ============================================================================
// HostApi
// ============================================================================

/// Executes host calls against the registry.
#[derive(Clone)]
pub struct HostApi {
    registry: Arc<InstanceRegistry>,
    notifier: Notifier,
    chrome_client_factory: Arc<dyn ChromeClientFactory>,
}

impl fmt::Debug for HostApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostApi")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl HostApi {
    /// Creates a dispatcher.
    #[must_use]
    pub fn new(
        registry: Arc<InstanceRegistry>,
        notifier: Notifier,
        chrome_client_factory: Arc<dyn ChromeClientFactory>,
    ) -> Self {
        Self {
            registry,
            notifier,
            chrome_client_factory,
        }
    }

    /// Executes one call and builds its reply.
    ///
    /// Never fails: errors become error replies.
    pub fn dispatch(&self, call: HostCall) -> Reply {
        let id = call.id;

        match call.parse().and_then(|method| self.execute(method)) {
            Ok(result) => Reply::success(id, result),
            Err(e) => {
                warn!(%id, method = %call.method, error = %e, "Host call failed");
                Reply::failure(id, &e)
            }
        }
    }

    /// Executes a parsed method.
    ///
    /// # Errors
    ///
    /// Registry errors from the lookups and insertions involved.
    pub fn execute(&self, method: HostMethod) -> Result<Value> {
        debug!(method = method.name(), "Executing host call");

        match method {
            HostMethod::CreateChromeClient {
                instance_id,
                web_view_client_instance_id,
            } => {
                let policy = self
                    .registry
                    .get_navigation_policy(web_view_client_instance_id)?;
                let client = self
                    .chrome_client_factory
                    .create_chrome_client(self.notifier.clone(), policy);
                self.registry.add(client, instance_id)?;
            }

            HostMethod::SetWebViewClient {
                instance_id,
                web_view_client_instance_id,
            } => {
                let client = self.registry.get_chrome_client(instance_id)?;
                let policy = self
                    .registry
                    .get_navigation_policy(web_view_client_instance_id)?;
                client.set_navigation_policy(policy);
            }

            HostMethod::CreateWebViewClient {
                instance_id,
                override_url_loading,
                ask_remote,
            } => {
                let client: Arc<dyn NavigationPolicy> = Arc::new(NavigationClient::new(
                    self.notifier.clone(),
                    override_url_loading,
                    ask_remote,
                ));
                self.registry.add(client, instance_id)?;
            }

            HostMethod::SetOverrideUrlLoading { instance_id, value } => {
                let policy = self.registry.get_navigation_policy(instance_id)?;
                if !policy.set_override_url_loading(value) {
                    return Err(Error::type_mismatch(
                        instance_id,
                        "configurable navigation policy",
                        "navigation policy",
                    ));
                }
            }

            HostMethod::RemoveInstance { instance_id } => self.remove(instance_id),

            HostMethod::Clear => self.clear(),
        }

        Ok(Value::Null)
    }

    /// Removes and releases one instance. Unknown ids are ignored.
    pub fn remove(&self, instance_id: InstanceId) {
        if let Some(instance) = self.registry.remove(instance_id) {
            instance.release(instance_id);
        }
    }

    /// Removes and releases every instance.
    pub fn clear(&self) {
        let entries = self.registry.drain();
        debug!(count = entries.len(), "Clearing registry");

        for (instance_id, instance) in entries {
            instance.release(instance_id);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use async_trait::async_trait;

    use crate::bridge::DefaultChromeClientFactory;
    use crate::chooser::{ChooserRouter, ExternalPicker, PickerLaunch};
    use crate::engine::{NavigationRequest, ViewFactory, WebView};
    use crate::identifiers::ChooserRequestId;
    use crate::protocol::ReplyType;
    use crate::registry::Instance;
    use crate::transport::{RemoteEnd, memory};

    struct StaticView;

    impl WebView for StaticView {
        fn load_url(&self, _url: &str) {}
        fn set_navigation_policy(&self, _policy: Arc<dyn NavigationPolicy>) {}
    }

    struct StaticFactory;

    impl ViewFactory for StaticFactory {
        fn create_view(&self, _origin: &Arc<dyn WebView>) -> Arc<dyn WebView> {
            Arc::new(StaticView)
        }
    }

    struct NoPicker;

    impl ExternalPicker for NoPicker {
        fn camera_permission_granted(&self) -> bool {
            false
        }
        fn request_camera_permission(&self, _request_id: ChooserRequestId) {}
        fn launch(&self, _launch: PickerLaunch) {}
    }

    struct ExternalPolicy;

    #[async_trait]
    impl NavigationPolicy for ExternalPolicy {
        async fn should_override(&self, _view: &Arc<dyn WebView>, _request: &NavigationRequest) -> bool {
            false
        }
    }

    fn id(value: i64) -> InstanceId {
        InstanceId::new(value).expect("valid instance id")
    }

    fn setup() -> (HostApi, Arc<InstanceRegistry>, RemoteEnd) {
        let (channel, remote) = memory::pair();
        let registry = Arc::new(InstanceRegistry::new());
        let notifier = Notifier::new(channel, Arc::clone(&registry));
        let factory = DefaultChromeClientFactory::new(
            Arc::new(StaticFactory),
            ChooserRouter::new(Arc::new(NoPicker)),
            true,
        );

        let api = HostApi::new(Arc::clone(&registry), notifier, Arc::new(factory));
        (api, registry, remote)
    }

    fn call(api: &HostApi, method: &HostMethod) -> Reply {
        api.dispatch(HostCall::new(method).expect("call"))
    }

    #[tokio::test]
    async fn test_create_clients() {
        let (api, registry, _remote) = setup();

        let reply = call(
            &api,
            &HostMethod::CreateWebViewClient {
                instance_id: id(1),
                override_url_loading: false,
                ask_remote: false,
            },
        );
        assert_eq!(reply.reply_type, ReplyType::Success);

        let reply = call(
            &api,
            &HostMethod::CreateChromeClient {
                instance_id: id(2),
                web_view_client_instance_id: id(1),
            },
        );
        assert_eq!(reply.reply_type, ReplyType::Success);

        assert!(registry.get_navigation_policy(id(1)).is_ok());
        assert!(registry.get_chrome_client(id(2)).is_ok());
    }

    #[tokio::test]
    async fn test_create_chrome_client_with_unknown_policy_fails() {
        let (api, registry, _remote) = setup();

        let reply = call(
            &api,
            &HostMethod::CreateChromeClient {
                instance_id: id(2),
                web_view_client_instance_id: id(1),
            },
        );
        assert!(reply.is_error());
        assert_eq!(reply.error.as_deref(), Some("not found"));
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let (api, _registry, _remote) = setup();
        let method = HostMethod::CreateWebViewClient {
            instance_id: id(1),
            override_url_loading: false,
            ask_remote: false,
        };

        assert!(call(&api, &method).is_success());
        let reply = call(&api, &method);
        assert_eq!(reply.error.as_deref(), Some("duplicate id"));
    }

    #[tokio::test]
    async fn test_set_override_url_loading() {
        let (api, registry, _remote) = setup();
        call(
            &api,
            &HostMethod::CreateWebViewClient {
                instance_id: id(1),
                override_url_loading: false,
                ask_remote: false,
            },
        );

        let reply = call(
            &api,
            &HostMethod::SetOverrideUrlLoading {
                instance_id: id(1),
                value: true,
            },
        );
        assert!(reply.is_success());

        let external: Arc<dyn NavigationPolicy> = Arc::new(ExternalPolicy);
        registry.add(external, id(5)).expect("add");
        let reply = call(
            &api,
            &HostMethod::SetOverrideUrlLoading {
                instance_id: id(5),
                value: true,
            },
        );
        assert_eq!(reply.error.as_deref(), Some("type mismatch"));
    }

    #[tokio::test]
    async fn test_remove_releases_and_is_idempotent() {
        let (api, registry, mut remote) = setup();
        call(
            &api,
            &HostMethod::CreateWebViewClient {
                instance_id: id(1),
                override_url_loading: false,
                ask_remote: false,
            },
        );
        call(
            &api,
            &HostMethod::CreateChromeClient {
                instance_id: id(2),
                web_view_client_instance_id: id(1),
            },
        );

        let method = HostMethod::RemoveInstance { instance_id: id(2) };
        assert!(call(&api, &method).is_success());
        assert!(call(&api, &method).is_success());
        assert!(!registry.contains(id(2)));

        let frame = remote
            .recv_timeout(Duration::from_secs(1))
            .await
            .expect("dispose frame");
        assert_eq!(frame["method"], "webChromeClient.dispose");
        assert_eq!(frame["params"]["instanceId"], 2);
        assert!(remote.recv_timeout(Duration::from_millis(50)).await.is_none());
    }

    #[tokio::test]
    async fn test_clear() {
        let (api, registry, _remote) = setup();
        call(
            &api,
            &HostMethod::CreateWebViewClient {
                instance_id: id(1),
                override_url_loading: false,
                ask_remote: false,
            },
        );
        registry
            .add_host_created(Instance::object(Arc::new(3_u8)))
            .expect("add");

        assert!(call(&api, &HostMethod::Clear).is_success());
        assert!(registry.is_empty());
    }
}
