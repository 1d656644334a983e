//! Pipeline stages for image-to-PDF conversion.
//!
//! Each submodule implements one transformation step and is testable on its
//! own. The orchestrator in [`crate::convert`] runs them strictly in order:
//! the next stage starts only once the previous one has resolved.
//!
//! ## Data Flow
//!
//! ```text
//! read ──▶ decode ──▶ layout ──▶ pdf
//! (data URL) (bitmap)  (page size) (bytes)
//! ```
//!
//! 1. [`read`]: staged content (memory or path) → base64 data URL
//! 2. [`decode`]: data URL → `DynamicImage`, in `spawn_blocking`
//! 3. [`layout`]: scale-to-width page geometry and the output filename
//! 4. [`pdf`]: JPEG-embed the bitmap on one page with lopdf, in
//!    `spawn_blocking`

pub mod decode;
pub mod layout;
pub mod pdf;
pub mod read;
