//! The outbound side of a cycle: payload, raw reply and the transport seam.

use thiserror::Error;

use crate::prelude::*;

/// Request body of `insert_live_data`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Payload<'a> {
    pub p_api_key: &'a str,
    pub p_value: f64,
    pub p_unit: &'a str,
}

/// Status and raw body of a completed request.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request has timed out")]
    Timeout,

    #[error("connection has failed: {0}")]
    Connection(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Delivers a payload to the endpoint.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn post(&self, payload: &Payload<'_>) -> Result<Reply, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    async fn post(&self, payload: &Payload<'_>) -> Result<Reply, TransportError> {
        (**self).post(payload).await
    }
}
