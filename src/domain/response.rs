#[derive(Debug, Clone, PartialEq, Eq)]
/// Gateway response to one delivered chunk.
pub struct ChunkResponse {
    pub status: u16,
    /// Response body as returned by the gateway; usually empty.
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Responses for every chunk of a message, in send order.
pub struct SendResponse {
    pub chunks: Vec<ChunkResponse>,
}

impl SendResponse {
    /// Response to the final chunk.
    pub fn last(&self) -> Option<&ChunkResponse> {
        self.chunks.last()
    }

    /// Number of chunks delivered.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}
