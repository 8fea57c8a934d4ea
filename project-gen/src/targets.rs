/// Boards known without any definitions file, with their CPU core.
pub const KNOWN_TARGETS: &[(&str, &str)] = &[
    ("K64F", "cortex-m4f"),
    ("K22F", "cortex-m4f"),
    ("KL05Z", "cortex-m0plus"),
    ("KL25Z", "cortex-m0plus"),
    ("KL46Z", "cortex-m0plus"),
    ("LPC11U24", "cortex-m0"),
    ("LPC1768", "cortex-m3"),
    ("NRF51822", "cortex-m0"),
    ("NUCLEO_F401RE", "cortex-m4f"),
    ("NUCLEO_F411RE", "cortex-m4f"),
    ("NUCLEO_L053R8", "cortex-m0plus"),
    ("DISCO_F429ZI", "cortex-m4f"),
];

/// Core of a known board. Board names compare case-insensitively.
#[must_use]
pub fn core_for(target: &str) -> Option<&'static str> {
    KNOWN_TARGETS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(target))
        .map(|(_, core)| *core)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ignores_case() {
        assert_eq!(core_for("k64f"), Some("cortex-m4f"));
        assert_eq!(core_for("LPC1768"), Some("cortex-m3"));
        assert_eq!(core_for("NOT_A_BOARD"), None);
    }
}
