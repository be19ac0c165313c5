/// Side effects the host must perform (HTTP calls)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Kick off a meeting; progress arrives later on the event stream
    StartSession { symbol_key: String, query: String },

    /// Ask the server to purge its transcript for a symbol
    ClearRemoteHistory { symbol_key: String },
}
