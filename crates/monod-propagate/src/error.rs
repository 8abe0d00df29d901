//! Error type for evaluation passes.

use thiserror::Error;

use monod_graph::NetworkError;

/// Errors raised while running a propagation pass.
#[derive(Debug, Error)]
pub enum PropagateError {
    #[error("network error: {0}")]
    Network(#[from] NetworkError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use monod_graph::EntityId;

    #[test]
    fn wraps_network_errors() {
        let err = PropagateError::from(NetworkError::UnknownEntity(EntityId(3)));
        assert_eq!(err.to_string(), "network error: unknown entity: E3");
    }
}
