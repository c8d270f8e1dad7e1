use base64::{Engine, engine::general_purpose::STANDARD};
use rand::RngCore;
use rand::rngs::OsRng;

/// Bytes of entropy behind every generated password.
pub const PASSWORD_ENTROPY_BYTES: usize = 32;

/// Produces secrets for new accounts.
pub trait PasswordGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// 32 bytes from the OS CSPRNG, standard padded base64 (44 chars).
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPassword;

impl PasswordGenerator for RandomPassword {
    fn generate(&self) -> String {
        let mut buf = [0u8; PASSWORD_ENTROPY_BYTES];
        OsRng.fill_bytes(&mut buf);
        STANDARD.encode(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn fixed_length_and_entropy() {
        let pw = RandomPassword.generate();
        assert_eq!(pw.len(), 44);
        let raw = STANDARD.decode(&pw).expect("generated password is not base64");
        assert_eq!(raw.len(), PASSWORD_ENTROPY_BYTES);
    }

    #[test]
    fn no_collisions_in_ten_thousand() {
        let generator = RandomPassword;
        let seen: HashSet<String> = (0..10_000).map(|_| generator.generate()).collect();
        assert_eq!(seen.len(), 10_000);
    }
}
