#![warn(missing_docs)]

//! Per-request authorization for request handlers.
//!
//! Each resource type is guarded by a [`Policy`]. A policy is built fresh
//! for every check from the current actor, the attempted action and an
//! optional scope qualifier (a branch, a tenant). It answers three
//! questions:
//!
//! - may the actor perform the action at all ([`Policy::can_access`])
//! - may the actor perform it on a given record ([`Policy::can_access_instance`])
//! - which records may the actor see ([`Policy::scope`])
//!
//! Handlers never talk to policies directly. They go through a
//! [`RequestGuard`], which looks the policy up in a [`PolicyRegistry`] and
//! records which kinds of checks were made. After the handler returns,
//! the framework calls [`RequestGuard::finish`] (or the individual
//! `ensure_*` methods) so that a handler which forgot to authorize fails
//! loudly instead of silently serving data.
//!
//! # Example
//!
//! ```rust
//! use dialog_policy::*;
//! use std::sync::Arc;
//!
//! struct User {
//!     roles: Vec<Role>,
//! }
//!
//! impl Actor for User {
//!     fn roles(&self) -> Vec<Role> {
//!         self.roles.clone()
//!     }
//! }
//!
//! struct App;
//!
//! impl Domain for App {
//!     type Actor = User;
//!     type Qualifier = String;
//!     type Target = ();
//!     type Scope = Vec<String>;
//! }
//!
//! struct SamplePolicy(PolicyContext<App>);
//!
//! impl Policy<App> for SamplePolicy {
//!     fn can_access(&self) -> Result<bool, DialogPolicyError> {
//!         Ok(self.0.is_action(["index", "show"])? && self.0.has_any_role("admin")?)
//!     }
//!
//!     fn build(context: PolicyContext<App>) -> Self {
//!         SamplePolicy(context)
//!     }
//! }
//!
//! struct Request(Arc<User>);
//!
//! impl Handler<App> for Request {
//!     fn current_actor(&self) -> Option<Arc<User>> {
//!         Some(self.0.clone())
//!     }
//! }
//!
//! # fn main() -> Result<(), DialogPolicyError> {
//! let registry = PolicyRegistry::<App>::new().with::<SamplePolicy>("samples")?;
//! let request = Request(Arc::new(User {
//!     roles: vec![Role::try_from("admin")?],
//! }));
//!
//! let mut guard = RequestGuard::new(&registry, &request);
//! assert!(guard.can("index", "sample")?);
//! assert!(guard.can("destroy", "sample").is_err());
//! guard.finish(Requirements::none().auth())?;
//! # Ok(())
//! # }
//! ```

mod error;
pub use error::*;

mod identifier;
pub use identifier::*;

mod role;
pub use role::*;

mod policy;
pub use policy::*;

mod inflection;
pub use inflection::*;

mod registry;
pub use registry::*;

mod guard;
pub use guard::*;
