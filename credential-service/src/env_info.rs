use axum::http::header::{ACCEPT_LANGUAGE, USER_AGENT};
use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};

pub const TERMINAL_TYPE_WEB: &str = "WEB";

/// Caller environment block forwarded as-is in the consult request `env`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvInfo {
    pub terminal_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_language: Option<String>,
}

pub trait RequestContext: Send + Sync {
    fn compose_env_info(&self) -> EnvInfo;
}

/// Builds the environment block from the admin's inbound request headers.
pub struct HeaderRequestContext {
    headers: HeaderMap,
}

impl HeaderRequestContext {
    pub fn new(headers: HeaderMap) -> Self {
        Self { headers }
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    fn client_ip(&self) -> Option<String> {
        self.header("X-Forwarded-For")
            .and_then(|chain| chain.split(',').next())
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
            .or_else(|| self.header("X-Real-IP"))
            .map(str::to_string)
    }

    fn device_language(&self) -> Option<String> {
        self.header(ACCEPT_LANGUAGE.as_str())
            .and_then(|value| value.split(',').next())
            .and_then(|tag| tag.split(';').next())
            .map(str::trim)
            .filter(|tag| !tag.is_empty() && *tag != "*")
            .map(str::to_string)
    }
}

fn os_type_from_user_agent(user_agent: &str) -> Option<String> {
    if user_agent.contains("iPhone") || user_agent.contains("iPad") {
        Some("IOS".to_string())
    } else if user_agent.contains("Android") {
        Some("ANDROID".to_string())
    } else {
        None
    }
}

impl RequestContext for HeaderRequestContext {
    fn compose_env_info(&self) -> EnvInfo {
        let user_agent = self.header(USER_AGENT.as_str()).map(str::to_string);
        EnvInfo {
            terminal_type: TERMINAL_TYPE_WEB.to_string(),
            os_type: user_agent.as_deref().and_then(os_type_from_user_agent),
            user_agent,
            client_ip: self.client_ip(),
            device_language: self.device_language(),
        }
    }
}

/// Fixed environment block, for callers without an inbound HTTP request.
pub struct StaticRequestContext(pub EnvInfo);

impl RequestContext for StaticRequestContext {
    fn compose_env_info(&self) -> EnvInfo {
        self.0.clone()
    }
}
