use serde::Serialize;
use thiserror::Error;

/// Errors produced while resolving and evaluating policies.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DialogPolicyError {
    /// The policy denied the attempted action.
    #[error("{message}")]
    NotAuthorized {
        /// The action that was attempted.
        action: String,
        /// The resource type the action was attempted on.
        resource: String,
        /// Human readable explanation suitable for display.
        message: String,
    },

    /// A handler completed without calling `can`.
    #[error("Must use can or exclude this action from the authorization check")]
    AuthNotUsed,

    /// A handler completed without calling `scope`.
    #[error("Must use scope or exclude this action from the scope check")]
    ScopeNotUsed,

    /// A handler completed without calling `instance_can`.
    #[error("Must use instance_can or exclude this action from the instance check")]
    InstanceNotProtected,

    /// No policy is registered under the name derived from the resource type.
    #[error("No policy '{policy}' is registered for resource '{resource}'")]
    PolicyNotFound {
        /// The resource type that was looked up.
        resource: String,
        /// The policy name derived from it.
        policy: String,
    },

    /// A policy was registered twice under the same derived name.
    #[error("Policy '{policy}' is already registered")]
    DuplicatePolicy {
        /// The derived policy name.
        policy: String,
    },

    /// The actor's roles could not be interpreted.
    #[error(
        "Problem fetching actor roles. If actor roles are stored differently, override fetch_roles: {0}"
    )]
    RoleFetch(String),

    /// A value could not be normalized into an identifier.
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// The policy does not implement the requested operation.
    #[error("Policy '{policy}' does not support {operation}")]
    Unsupported {
        /// Name of the policy.
        policy: String,
        /// The operation that was requested.
        operation: &'static str,
    },
}

/// Error classification for hosts translating failures into responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // 400 Bad Request
    /// An action or role could not be normalized
    InvalidIdentifier,

    // 403 Forbidden
    /// The policy denied access
    NotAuthorized,

    // 500 Internal Server Error
    /// A handler skipped a required authorization call
    AuthorizationNotUsed,
    /// The policy registry is misconfigured
    PolicyMisconfigured,
    /// The actor's roles could not be read
    RoleFetchFailed,
}

impl ErrorCode {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorCode::InvalidIdentifier => 400,
            ErrorCode::NotAuthorized => 403,
            ErrorCode::AuthorizationNotUsed
            | ErrorCode::PolicyMisconfigured
            | ErrorCode::RoleFetchFailed => 500,
        }
    }
}

impl DialogPolicyError {
    /// Classify this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            DialogPolicyError::NotAuthorized { .. } => ErrorCode::NotAuthorized,
            DialogPolicyError::AuthNotUsed
            | DialogPolicyError::ScopeNotUsed
            | DialogPolicyError::InstanceNotProtected => ErrorCode::AuthorizationNotUsed,
            DialogPolicyError::PolicyNotFound { .. }
            | DialogPolicyError::DuplicatePolicy { .. }
            | DialogPolicyError::Unsupported { .. } => ErrorCode::PolicyMisconfigured,
            DialogPolicyError::RoleFetch(_) => ErrorCode::RoleFetchFailed,
            DialogPolicyError::InvalidIdentifier(_) => ErrorCode::InvalidIdentifier,
        }
    }

    /// Shorthand for `self.code().status_code()`.
    pub fn status_code(&self) -> u16 {
        self.code().status_code()
    }
}
