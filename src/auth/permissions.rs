// src/auth/permissions.rs

use astra::Request;
use std::collections::HashSet;
use std::fmt;

/// Write actions the back office gates. Reading status needs no permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    Progress,
    FinalCheck,
    Billing,
    Records,
}

impl Permission {
    pub fn as_str(self) -> &'static str {
        match self {
            Permission::Progress => "progress",
            Permission::FinalCheck => "final_check",
            Permission::Billing => "billing",
            Permission::Records => "records",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "progress" => Some(Permission::Progress),
            "final_check" => Some(Permission::FinalCheck),
            "billing" => Some(Permission::Billing),
            "records" => Some(Permission::Records),
            _ => None,
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The yes/no predicate screens consult before offering a write action.
pub trait PermissionCheck {
    fn has_permission(&self, permission: Permission) -> bool;
}

/// Permissions granted to one request.
#[derive(Debug, Clone, Default)]
pub struct PermissionSet {
    granted: HashSet<Permission>,
    all: bool,
}

impl PermissionSet {
    pub fn all() -> Self {
        Self {
            granted: HashSet::new(),
            all: true,
        }
    }

    /// Parses a comma separated list; unknown names are ignored.
    pub fn from_list(list: &str) -> Self {
        Self {
            granted: list.split(',').filter_map(Permission::parse).collect(),
            all: false,
        }
    }

    /// Reads the `X-Permissions` header set by the fronting auth proxy.
    pub fn from_request(req: &Request, trust_all: bool) -> Self {
        if trust_all {
            return Self::all();
        }
        req.headers()
            .get("X-Permissions")
            .and_then(|v| v.to_str().ok())
            .map(Self::from_list)
            .unwrap_or_default()
    }
}

impl PermissionCheck for PermissionSet {
    fn has_permission(&self, permission: Permission) -> bool {
        self.all || self.granted.contains(&permission)
    }
}
