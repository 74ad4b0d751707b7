//! Errors that stop a files collection.

/// Failure fetching or decoding one page of the files listing.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Curl reported an error (DNS, connect, TLS, timeout...).
    #[error("transport error: {0}")]
    Transport(#[from] curl::Error),
    /// Non-2xx response without a GraphQL error payload.
    #[error("HTTP {status}: {body}")]
    Http { status: u32, body: String },
    /// Body was not the expected JSON shape.
    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),
    /// The API answered with an `errors` payload.
    #[error("API error: {0}")]
    Api(String),
    /// Neither `data.files` nor `errors` in the response.
    #[error("response contained no files data")]
    MissingData,
    /// `hasNextPage` was true but the cursor was missing or did not advance.
    #[error("server reported more pages but did not advance the cursor")]
    StalledCursor,
}
