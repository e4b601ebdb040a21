use crewdeck_core::config::{AccessConfig, PLACEHOLDER_SECRET};
use rusqlite::Connection;
use tracing::{info, warn};

use crate::error::{AccessError, Result};
use crate::operators::OperatorStore;
use crate::permissions::{Capability, PermissionCheck, PermissionChecker};
use crate::token::TokenSigner;
use crate::types::Claims;

/// Login, token check and capability check behind one handle.
pub struct AccessGate {
    operators: OperatorStore,
    signer: TokenSigner,
}

impl AccessGate {
    /// Open the operator store on `conn` and seed it from `config`.
    ///
    /// A blank token secret or the shipped placeholder is refused: anyone
    /// knowing it could sign their own manager token.
    pub fn new(conn: Connection, config: &AccessConfig) -> Result<Self> {
        if config.token_secret.trim().is_empty() {
            return Err(AccessError::InsecureSecret("token secret is empty".to_string()));
        }
        if config.token_secret == PLACEHOLDER_SECRET {
            return Err(AccessError::InsecureSecret(
                "token secret is the shipped placeholder".to_string(),
            ));
        }
        let operators = OperatorStore::new(conn)?;
        operators.sync(&config.operators)?;
        if config.operators.is_empty() {
            warn!("no operators configured; every login will fail");
        }
        Ok(Self {
            operators,
            signer: TokenSigner::new(&config.token_secret, config.token_ttl_hours),
        })
    }

    pub fn operators(&self) -> &OperatorStore {
        &self.operators
    }

    /// Verify a username/password pair and issue a bearer token.
    pub fn login(&self, username: &str, password: &str) -> Result<String> {
        match self.operators.verify(username, password)? {
            Some(operator) => {
                let token = self.signer.issue(&operator)?;
                info!(%username, role = %operator.role, "operator logged in");
                Ok(token)
            }
            None => {
                warn!(%username, "login rejected");
                Err(AccessError::InvalidCredentials)
            }
        }
    }

    /// Check the raw `Authorization` header value.
    ///
    /// Absent or non-Bearer → `MissingToken`; bad signature or expired → `InvalidToken`.
    pub fn authenticate(&self, authorization: Option<&str>) -> Result<Claims> {
        let token = authorization
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AccessError::MissingToken)?;
        self.signer.verify(token)
    }

    /// The single "may this caller do X" predicate the rest of the service consults.
    pub fn authorize(&self, claims: &Claims, capability: Capability) -> Result<()> {
        match PermissionChecker::check(claims.role, capability) {
            PermissionCheck::Allowed => Ok(()),
            PermissionCheck::Denied { reason } => {
                warn!(operator = %claims.sub, ?capability, %reason, "access denied");
                Err(AccessError::Forbidden(reason))
            }
        }
    }
}
