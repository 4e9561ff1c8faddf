/*!
 * Session context extractor
 *
 * Responsibility:
 * - Hand the gate-approved session (SessionCtx) to handlers
 * - Type in `types`, axum glue in `core`
 */

mod core;
mod types;

pub use core::SessionCtxExtractor;
pub use types::SessionCtx;
