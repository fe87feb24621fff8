pub mod providers;

pub use providers::gemini::GeminiProvider;
pub use providers::{ContentProvider, ProviderError};
