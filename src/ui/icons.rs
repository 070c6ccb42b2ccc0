//! Shared UI icons, with plain-text fallbacks for terminals without emoji.

use console::Emoji;

// Status indicators
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK]");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[ERR]");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[WARN]");

// Sequence indicators
pub static GROUP: Emoji<'_, '_> = Emoji("📦 ", "[G]");
pub static STEP: Emoji<'_, '_> = Emoji("▶️  ", "[>]");
pub static PLANNED: Emoji<'_, '_> = Emoji("📝 ", "[P]");
pub static SKIPPED: Emoji<'_, '_> = Emoji("⏭️  ", "[S]");

// Repository indicators
pub static REMOTE: Emoji<'_, '_> = Emoji("🌐 ", "[R]");
pub static FOLDER: Emoji<'_, '_> = Emoji("📁 ", "");
