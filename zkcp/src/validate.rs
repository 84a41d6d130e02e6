/// Splits a comma-separated ensemble connection string into its endpoints.
///
/// # Returns
/// * `Ok(endpoints)` - Non-empty list of trimmed "host:port" entries
/// * `Err(...)` - If the list is empty or contains an empty entry (e.g. "a:2181,,b:2181")
pub fn parse_endpoints(flag: &str, endpoints: &str) -> anyhow::Result<Vec<String>> {
    if endpoints.trim().is_empty() {
        return Err(anyhow::anyhow!("--{flag} cannot be empty"));
    }
    endpoints
        .split(',')
        .map(|endpoint| {
            let endpoint = endpoint.trim();
            if endpoint.is_empty() {
                return Err(anyhow::anyhow!(
                    "--{flag} {endpoints:?} contains an empty endpoint"
                ));
            }
            Ok(endpoint.to_string())
        })
        .collect()
}

/// Validated inputs of a single copy, checked before any connection is attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub source_endpoints: Vec<String>,
    pub destination_endpoints: Vec<String>,
    pub source_path: String,
    pub destination_path: String,
}

impl Plan {
    pub fn new(
        source_zk: &str,
        destination_zk: &str,
        source_path: &str,
        destination_path: &str,
    ) -> anyhow::Result<Self> {
        if source_zk.is_empty()
            || destination_zk.is_empty()
            || source_path.is_empty()
            || destination_path.is_empty()
        {
            return Err(anyhow::anyhow!(
                "missing required arguments: --source-zk, --destination-zk, --source-path and --destination-path must all be non-empty"
            ));
        }
        let source_endpoints = parse_endpoints("source-zk", source_zk)?;
        let destination_endpoints = parse_endpoints("destination-zk", destination_zk)?;
        common::znode::validate_source_path(source_path)?;
        common::znode::validate_destination_path(destination_path)?;
        Ok(Self {
            source_endpoints,
            destination_endpoints,
            source_path: source_path.to_string(),
            destination_path: destination_path.to_string(),
        })
    }
}
