use crate::error::ConfigError;

const SERVICE_HOSTENV: &str = "KUBERNETES_SERVICE_HOST";
const SERVICE_PORTENV: &str = "KUBERNETES_SERVICE_PORT";
// Mounted service account namespace
const SERVICE_DEFAULT_NS: &str = "/var/run/secrets/kubernetes.io/serviceaccount/namespace";

/// Returns the apiserver url advertised to pods through the service environment variables.
pub fn cluster_url_from_env() -> Result<http::Uri, ConfigError> {
    let host = std::env::var(SERVICE_HOSTENV);
    let port = std::env::var(SERVICE_PORTENV);
    match (host, port) {
        (Ok(host), Ok(port)) => cluster_url(&host, &port),
        _ => Err(ConfigError::MissingInClusterVariables {
            hostenv: SERVICE_HOSTENV,
            portenv: SERVICE_PORTENV,
        }),
    }
}

fn cluster_url(host: &str, port: &str) -> Result<http::Uri, ConfigError> {
    let host = if host.contains(':') && !host.starts_with('[') {
        format!("[{host}]")
    } else {
        host.to_string()
    };
    format!("https://{host}:{port}")
        .parse()
        .map_err(ConfigError::ParseClusterUrl)
}

/// Reads the namespace of the mounted service account.
pub fn load_default_ns() -> Result<String, ConfigError> {
    std::fs::read_to_string(SERVICE_DEFAULT_NS)
        .map(|ns| ns.trim().to_string())
        .map_err(ConfigError::InvalidInClusterNamespace)
}
