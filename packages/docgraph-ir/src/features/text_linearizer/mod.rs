// Text Linearizer
//
// Walks tokens in document order and produces the datasource string plus a
// half-open char range per content-bearing token. Runs before every span
// converter, which read the recorded offsets.

pub mod domain;
pub mod infrastructure;

pub use domain::{LinearizedText, SpacingPolicy, TextChannel};
pub use infrastructure::TextLinearizer;
