//! Provider and encoding metadata.
//!
//! - `Provider`: which tokenizer family a model belongs to
//! - `Encoding`: which BPE table counts tokens locally
//!
//! # Example
//!
//! ```
//! use token_bench::models::{Encoding, Provider};
//!
//! assert_eq!(Provider::OpenAI.name(), "openai");
//! assert_eq!(Encoding::for_model("gpt-4o"), Some(Encoding::O200kBase));
//! ```

mod encoding;
mod provider;

pub use encoding::Encoding;
pub use provider::Provider;
