pub mod env {
    /// Prefix of every environment override, e.g.
    /// `VERICODE__VERIFICATION__POLICY__ALIAS_RESTRICTION_ENABLED=true`.
    pub const ENV_PREFIX: &str = "VERICODE";
    pub const ENV_SEPARATOR: &str = "__";
    pub const LIST_SEPARATOR: &str = ",";
    /// Keys whose environment value is a comma-separated list.
    pub const LIST_KEYS: &[&str] = &["verification.policy.domain_whitelist"];
}

/// Base name of the optional settings file, resolved with any format the
/// `config` crate knows (`vericode.json`, `vericode.toml`, ...).
pub const CONFIG_FILE: &str = "config/vericode";

pub mod prod {
    pub mod email_client {
        pub const BASE_URL: &str = "https://api.postmarkapp.com/";
        pub const TIMEOUT_IN_MILLIS: u64 = 10_000;
    }
    pub mod redis {
        pub const HOST_NAME: &str = "127.0.0.1";
    }
    pub const SWEEP_INTERVAL_SECONDS: u64 = 60;
}

pub mod test {
    pub mod email_client {
        pub const SENDER: &str = "test@email.com";
        pub const TIMEOUT_IN_MILLIS: u64 = 200;
    }
}
