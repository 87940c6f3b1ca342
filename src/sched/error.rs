use thiserror::Error;

use crate::common::LinkId;

/// Recoverable scheduler rejections. None of these abort operation; the
/// caller observes an empty or reduced scheduling decision for the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SchedError {
    /// A call referenced a link the scheduler does not serve.
    #[error("unknown link {0}")]
    UnknownLink(LinkId),
    /// A solicited-uplink request is already armed on this link; it must
    /// resolve or time out before a new one can be armed.
    #[error("access request already pending on link {0}")]
    SolicitationPending(LinkId),
}
