//! AES-CBC codec with strict padding and base64 framing.
//!
//! The codec is provider agnostic: callers supply the key and IV, the codec
//! never generates or rotates them. The key length picks the AES variant
//! (16, 24 or 32 bytes), the IV must be exactly one block.
//!
//! ```
//! let key = b"0123456789abcdef";
//! let iv = b"fedcba9876543210";
//! let sealed = cbc_codec::encrypt(b"episode-42", key, iv).unwrap();
//! assert_eq!(cbc_codec::decrypt(&sealed, key, iv).unwrap(), b"episode-42");
//! ```

pub mod error;
pub mod padding;

use aes::{Aes128, Aes192, Aes256};
use base64::{Engine, engine::general_purpose::STANDARD};
use cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::NoPadding};

pub use error::CodecError;
pub use padding::{pad, unpad};

/// AES block size in bytes.
pub const BLOCK_SIZE: usize = 16;

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes192CbcEnc = cbc::Encryptor<Aes192>;
type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;
type Aes192CbcDec = cbc::Decryptor<Aes192>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

fn init_error(key: &[u8], iv: &[u8]) -> CodecError {
    CodecError::CipherInit {
        reason: format!(
            "unsupported key/iv length (key {} bytes, iv {} bytes)",
            key.len(),
            iv.len()
        ),
    }
}

/// Encrypts `buf` in place. `buf` must already be padded.
fn encrypt_blocks(buf: &mut [u8], key: &[u8], iv: &[u8]) -> Result<(), CodecError> {
    let len = buf.len();
    let sealed = match key.len() {
        16 => Aes128CbcEnc::new_from_slices(key, iv)
            .map_err(|_| init_error(key, iv))?
            .encrypt_padded_mut::<NoPadding>(buf, len)
            .is_ok(),
        24 => Aes192CbcEnc::new_from_slices(key, iv)
            .map_err(|_| init_error(key, iv))?
            .encrypt_padded_mut::<NoPadding>(buf, len)
            .is_ok(),
        32 => Aes256CbcEnc::new_from_slices(key, iv)
            .map_err(|_| init_error(key, iv))?
            .encrypt_padded_mut::<NoPadding>(buf, len)
            .is_ok(),
        _ => return Err(init_error(key, iv)),
    };

    if sealed {
        Ok(())
    } else {
        Err(CodecError::malformed("plaintext is not block aligned"))
    }
}

/// Decrypts `buf` in place without touching the padding.
fn decrypt_blocks(buf: &mut [u8], key: &[u8], iv: &[u8]) -> Result<(), CodecError> {
    let opened = match key.len() {
        16 => Aes128CbcDec::new_from_slices(key, iv)
            .map_err(|_| init_error(key, iv))?
            .decrypt_padded_mut::<NoPadding>(buf)
            .is_ok(),
        24 => Aes192CbcDec::new_from_slices(key, iv)
            .map_err(|_| init_error(key, iv))?
            .decrypt_padded_mut::<NoPadding>(buf)
            .is_ok(),
        32 => Aes256CbcDec::new_from_slices(key, iv)
            .map_err(|_| init_error(key, iv))?
            .decrypt_padded_mut::<NoPadding>(buf)
            .is_ok(),
        _ => return Err(init_error(key, iv)),
    };

    if opened {
        Ok(())
    } else {
        Err(CodecError::malformed("ciphertext is not block aligned"))
    }
}

/// Pads, encrypts and base64 encodes `plaintext`.
pub fn encrypt(plaintext: &[u8], key: &[u8], iv: &[u8]) -> Result<String, CodecError> {
    let mut buf = pad(plaintext);
    encrypt_blocks(&mut buf, key, iv)?;
    Ok(STANDARD.encode(buf))
}

/// Base64 decodes, decrypts and unpads `ciphertext_b64`.
///
/// Fails with [`CodecError::MalformedCiphertext`] for invalid base64 or a
/// decoded length that is not a positive multiple of [`BLOCK_SIZE`], and
/// with [`CodecError::InvalidPadding`] when the trailing pad does not verify.
pub fn decrypt(ciphertext_b64: &str, key: &[u8], iv: &[u8]) -> Result<Vec<u8>, CodecError> {
    let mut buf = STANDARD
        .decode(ciphertext_b64.trim())
        .map_err(|e| CodecError::malformed(format!("base64 decode failed: {e}")))?;

    if buf.is_empty() || buf.len() % BLOCK_SIZE != 0 {
        return Err(CodecError::malformed(format!(
            "decoded length {} is not a multiple of the block size",
            buf.len()
        )));
    }

    decrypt_blocks(&mut buf, key, iv)?;
    let plain_len = unpad(&buf)?.len();
    buf.truncate(plain_len);
    Ok(buf)
}

/// A fixed key/IV pair.
///
/// Lengths are validated once at construction so a misconfigured secret
/// fails at startup instead of on the first request.
#[derive(Clone, PartialEq, Eq)]
pub struct Cipher {
    key: Vec<u8>,
    iv: [u8; BLOCK_SIZE],
}

impl Cipher {
    pub fn new(key: impl AsRef<[u8]>, iv: impl AsRef<[u8]>) -> Result<Self, CodecError> {
        let key = key.as_ref();
        let iv_bytes = iv.as_ref();
        if !matches!(key.len(), 16 | 24 | 32) {
            return Err(init_error(key, iv_bytes));
        }
        let iv: [u8; BLOCK_SIZE] = iv_bytes.try_into().map_err(|_| init_error(key, iv_bytes))?;
        Ok(Self {
            key: key.to_vec(),
            iv,
        })
    }

    pub fn encrypt(&self, plaintext: &[u8]) -> Result<String, CodecError> {
        encrypt(plaintext, &self.key, &self.iv)
    }

    pub fn decrypt(&self, ciphertext_b64: &str) -> Result<Vec<u8>, CodecError> {
        decrypt(ciphertext_b64, &self.key, &self.iv)
    }
}

// Secrets stay out of logs.
impl std::fmt::Debug for Cipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cipher")
            .field("key_len", &self.key.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_256: &[u8] = b"37911490979715163134003223491201";
    const IV: &[u8] = b"3134003223491201";

    fn key_128() -> Vec<u8> {
        (0u8..16).collect()
    }

    #[test]
    fn test_known_answer_aes256() {
        assert_eq!(
            encrypt(b"MTgxNDkx", KEY_256, IV).unwrap(),
            "XFCwFqIdtJTo2TN7hdzXug=="
        );
        assert_eq!(
            decrypt("XFCwFqIdtJTo2TN7hdzXug==", KEY_256, IV).unwrap(),
            b"MTgxNDkx"
        );
    }

    #[test]
    fn test_known_answer_aes128() {
        let iv = [7u8; 16];
        assert_eq!(
            encrypt(b"hello world", &key_128(), &iv).unwrap(),
            "/35VpxPgIzDLBWjCvzOFEA=="
        );
        assert_eq!(
            encrypt(b"", &key_128(), &iv).unwrap(),
            "zxgNHMCDfMsZXxgkJio6DQ=="
        );
    }

    #[test]
    fn test_roundtrip_various_lengths() {
        let key = [0x42u8; 24];
        for len in [0usize, 1, 15, 16, 17, 31, 32, 100] {
            let plaintext: Vec<u8> = (0..len).map(|i| (i * 7) as u8).collect();
            let sealed = encrypt(&plaintext, &key, IV).unwrap();
            assert_eq!(decrypt(&sealed, &key, IV).unwrap(), plaintext, "len {len}");
        }
    }

    #[test]
    fn test_bad_key_length() {
        let err = encrypt(b"data", b"short", IV).unwrap_err();
        assert!(matches!(err, CodecError::CipherInit { .. }));
        let err = decrypt("XFCwFqIdtJTo2TN7hdzXug==", b"short", IV).unwrap_err();
        assert!(matches!(err, CodecError::CipherInit { .. }));
    }

    #[test]
    fn test_bad_iv_length() {
        let err = encrypt(b"data", KEY_256, b"123").unwrap_err();
        assert!(matches!(err, CodecError::CipherInit { .. }));
    }

    #[test]
    fn test_invalid_base64() {
        let err = decrypt("not base64!!", KEY_256, IV).unwrap_err();
        assert!(matches!(err, CodecError::MalformedCiphertext { .. }));
    }

    #[test]
    fn test_unaligned_ciphertext() {
        // 5 bytes once decoded
        let err = decrypt("aGVsbG8=", KEY_256, IV).unwrap_err();
        assert!(matches!(err, CodecError::MalformedCiphertext { .. }));
        let err = decrypt("", KEY_256, IV).unwrap_err();
        assert!(matches!(err, CodecError::MalformedCiphertext { .. }));
    }

    #[test]
    fn test_tampered_final_byte_rejected() {
        for key in [key_128(), KEY_256.to_vec()] {
            let sealed = encrypt(b"attack at dawn", &key, IV).unwrap();
            let mut raw = STANDARD.decode(sealed).unwrap();
            *raw.last_mut().unwrap() ^= 0x01;
            let err = decrypt(&STANDARD.encode(raw), &key, IV).unwrap_err();
            assert!(
                matches!(
                    err,
                    CodecError::InvalidPadding { .. } | CodecError::MalformedCiphertext { .. }
                ),
                "unexpected error {err:?}"
            );
        }
    }

    #[test]
    fn test_tampered_pad_block_rejected() {
        // Flipping the previous block's last byte flips the final pad byte
        // from 0x10 to 0x11, which can never verify.
        let plaintext = [b'x'; 16];
        let sealed = encrypt(&plaintext, KEY_256, IV).unwrap();
        let mut raw = STANDARD.decode(sealed).unwrap();
        raw[15] ^= 0x01;
        let err = decrypt(&STANDARD.encode(raw), KEY_256, IV).unwrap_err();
        assert!(matches!(err, CodecError::InvalidPadding { .. }));
    }

    #[test]
    fn test_wrong_key_does_not_yield_plaintext() {
        let sealed = encrypt(b"attack at dawn", KEY_256, IV).unwrap();
        let other = b"54674138327930866480207815084989";
        if let Ok(plain) = decrypt(&sealed, other, IV) {
            assert_ne!(plain, b"attack at dawn");
        }
    }

    #[test]
    fn test_cipher_validates_lengths() {
        assert!(Cipher::new(KEY_256, IV).is_ok());
        assert!(Cipher::new(b"tooshort", IV).is_err());
        assert!(Cipher::new(KEY_256, b"tooshort").is_err());
    }

    #[test]
    fn test_cipher_roundtrip_and_debug_hides_key() {
        let cipher = Cipher::new(KEY_256, IV).unwrap();
        let sealed = cipher.encrypt(b"alias=one-piece").unwrap();
        assert_eq!(cipher.decrypt(&sealed).unwrap(), b"alias=one-piece");
        let debug = format!("{cipher:?}");
        assert!(!debug.contains("3791149"));
    }
}
