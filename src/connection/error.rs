//! Error types for the connection manager

/// Error type returned by client factories and handshakes
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// No client handle exists yet; handled inside `acquire` by building one
    #[error("client needs to be built")]
    ClientNotBuilt,

    /// Connect handshake on a freshly built client failed
    #[error("handshake failed: {0}")]
    Handshake(#[source] BoxError),

    /// The client factory failed to construct a client
    #[error("client build failed: {0}")]
    Build(#[source] BoxError),

    /// A bounded retry policy ran out of attempts
    #[error("gave up after {attempts} connection attempts")]
    RetriesExhausted { attempts: u32 },
}

impl ConnectionError {
    pub fn handshake(source: impl Into<BoxError>) -> Self {
        ConnectionError::Handshake(source.into())
    }

    pub fn build(source: impl Into<BoxError>) -> Self {
        ConnectionError::Build(source.into())
    }

    /// Whether this is the internal "no client yet" signal
    pub fn is_not_built(&self) -> bool {
        matches!(self, ConnectionError::ClientNotBuilt)
    }
}
