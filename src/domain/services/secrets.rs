//! Secret generation

use rand::Rng;

/// Characters a generated secret is drawn from
pub const SECRET_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_!@";

/// Shortest secret length the configuration may request
pub const MIN_SECRET_LENGTH: usize = 16;
pub const DEFAULT_SECRET_LENGTH: usize = 20;

/// Source of fresh secrets
pub trait SecretGenerator {
    fn generate(&self, length: usize) -> String;
}

impl<G: SecretGenerator + ?Sized> SecretGenerator for &G {
    fn generate(&self, length: usize) -> String {
        (**self).generate(length)
    }
}

/// Uniform draw from `SECRET_ALPHABET` using the OS CSPRNG
#[derive(Debug, Default, Clone, Copy)]
pub struct OsSecretGenerator;

impl SecretGenerator for OsSecretGenerator {
    fn generate(&self, length: usize) -> String {
        let mut rng = rand::rngs::OsRng;
        (0..length)
            .map(|_| SECRET_ALPHABET[rng.gen_range(0..SECRET_ALPHABET.len())] as char)
            .collect()
    }
}
