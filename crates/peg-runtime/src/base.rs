//! The base system port.

use peg_types::{Action, BaseRequest, BaseSystemView, EngineError, Name};

/// Write side of the base system, on top of the read-only view.
///
/// `apply` executes one base-denominated request and returns the follow-up
/// actions it triggers (transfer notifications aimed at the core). Failures
/// surface as [`EngineError::Base`] with the base system's own message and
/// abort the enclosing request.
pub trait BaseSystem: BaseSystemView {
    fn apply(&mut self, authorizer: &Name, request: &BaseRequest)
        -> Result<Vec<Action>, EngineError>;
}
