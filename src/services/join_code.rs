use rand::Rng;

/// Number of random bytes behind a join code; rendered as four uppercase hex
/// characters.
const JOIN_CODE_BYTES: usize = 2;

/// Generate a short shareable join code.
pub fn generate() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; JOIN_CODE_BYTES] = rng.random();
    bytes.iter().map(|byte| format!("{byte:02X}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_four_uppercase_hex_characters() {
        for _ in 0..64 {
            let code = generate();
            assert_eq!(code.len(), 4);
            assert!(
                code.chars()
                    .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)),
                "unexpected character in `{code}`"
            );
        }
    }

    #[test]
    fn codes_vary_between_draws() {
        let codes: std::collections::HashSet<String> = (0..64).map(|_| generate()).collect();
        // 65536 possible codes; 64 draws colliding into one value would mean
        // a broken generator.
        assert!(codes.len() > 1);
    }
}
