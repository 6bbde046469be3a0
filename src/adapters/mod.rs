// Adapters layer: concrete implementations for external systems (text codecs, stores).

pub mod codec;
pub mod store;
