//! External-facing code generation
//!
//! 对外编码统一由此生成，避免各处散落的格式化逻辑。
//! Codes are opaque to clients; the prefix only aids support/debugging.

use uuid::Uuid;

/// Order code, e.g. `ORD-1F3A9C2B7D4E`
pub fn order_code() -> String {
    format!("ORD-{}", short_id())
}

/// Order group code, e.g. `GRP-8C1D2E3F4A5B`
pub fn group_code() -> String {
    format!("GRP-{}", short_id())
}

/// Checkout draft code, e.g. `DFT-0A1B2C3D4E5F`
pub fn draft_code() -> String {
    format!("DFT-{}", short_id())
}

/// Dispute id, e.g. `DSP-9E8D7C6B5A4F`
pub fn dispute_id() -> String {
    format!("DSP-{}", short_id())
}

/// 12 hex chars from a v4 UUID — collision odds are negligible at this scale
fn short_id() -> String {
    Uuid::new_v4().simple().to_string()[..12].to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_prefixed_and_unique() {
        let a = order_code();
        let b = order_code();
        assert!(a.starts_with("ORD-"));
        assert_eq!(a.len(), 16);
        assert_ne!(a, b);
    }
}
