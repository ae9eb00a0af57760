// thenlper/gte-small, the default encoder
pub const MAX_TOKENS_PER_CHUNK: usize = 512; // gte-small embedding model max tokens limit
