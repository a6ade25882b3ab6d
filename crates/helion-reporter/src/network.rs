use url::Url;

/// Static description of the network being reported on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NetworkConfig {
    pub(crate) name: String,
    pub(crate) chain_id: u64,
    pub(crate) rpc_url: String,
    explorer_url: String,
}

impl NetworkConfig {
    pub(crate) const BASE_SEPOLIA_RPC: &'static str = "https://sepolia.base.org";
    pub(crate) const BASE_SEPOLIA_EXPLORER: &'static str = "https://sepolia.basescan.org";

    pub(crate) fn base_sepolia() -> Self {
        Self {
            name: "Base Sepolia".to_owned(),
            chain_id: 84532,
            rpc_url: Self::BASE_SEPOLIA_RPC.to_owned(),
            explorer_url: Self::BASE_SEPOLIA_EXPLORER.to_owned(),
        }
    }

    pub(crate) fn with_rpc_url(mut self, rpc_url: &Url) -> Self {
        self.rpc_url = rpc_url.to_string();
        self
    }

    pub(crate) fn with_explorer_url(mut self, explorer_url: &Url) -> Self {
        // Url always renders a bare host with a trailing slash
        self.explorer_url = explorer_url.as_str().trim_end_matches('/').to_owned();
        self
    }

    pub(crate) fn explorer_url(&self) -> &str {
        &self.explorer_url
    }

    pub(crate) fn address_link(&self, address: &str) -> String {
        format!("{}/address/{}", self.explorer_url, address)
    }

    pub(crate) fn block_link(&self, block_number: u64) -> String {
        format!("{}/block/{}", self.explorer_url, block_number)
    }

    pub(crate) fn code_link(&self, address: &str) -> String {
        format!("{}/address/{}#code", self.explorer_url, address)
    }
}

/// `0x1234...cdef` style abbreviation used on report lines.
pub(crate) fn short_address(address: &str) -> String {
    if address.len() < 10 || !address.is_ascii() {
        return address.to_owned();
    }

    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}
