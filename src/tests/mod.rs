mod test_helpers;

mod test_core;
mod test_lexical;

use crate::geometry::Viewport;

/// Shared drawing area: center (200, 200), projection radius 160.
pub const TEST_VIEWPORT: Viewport = Viewport { width: 400.0, height: 400.0 };

/// Fixed seed for deterministic fallback placement in tests.
pub const TEST_SEED: u64 = 128;
