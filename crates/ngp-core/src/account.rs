use crate::route::ProxyRoute;

/// Bearer token for one account. Never printed in full.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for the `Authorization` header only.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Last four characters behind a `***` mask; short tokens are fully masked.
    pub fn redacted(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 8 {
            return "***".to_string();
        }
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("***{tail}")
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Credential({})", self.redacted())
    }
}

impl std::fmt::Display for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.redacted())
    }
}

/// One roster entry. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Zero-based position in the roster.
    pub index: usize,
    pub credential: Credential,
    pub route: Option<ProxyRoute>,
}

impl Account {
    pub fn new(index: usize, credential: Credential, route: Option<ProxyRoute>) -> Self {
        Self {
            index,
            credential,
            route,
        }
    }

    /// Human label used in logs and progress lines, 1-based.
    pub fn label(&self) -> String {
        format!("account #{} ({})", self.index + 1, self.credential.redacted())
    }
}
