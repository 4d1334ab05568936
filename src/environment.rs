/// Base path ("slug") of the organization API behind the gateway.
pub const ORGANIZATION_API_BASE_PATH: &str = "organization-api";

/// Known deployments of the organization API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Qa,
    Prod,
    Gov,
}

impl Environment {
    /// API gateway serving this deployment.
    pub fn gateway_url(&self) -> &'static str {
        match self {
            Environment::Qa => "https://3dsim-qa.cloud.tyk.io",
            Environment::Prod | Environment::Gov => "https://3dsim.cloud.tyk.io",
        }
    }

    /// Audience to request tokens for.
    pub fn audience(&self) -> &'static str {
        match self {
            Environment::Qa => "https://organization-qa.3dsim.com/v2",
            Environment::Prod => "https://organization.3dsim.com/v2",
            Environment::Gov => "https://organization-gov.3dsim.com",
        }
    }
}
